use std::sync::Arc;

use async_trait::async_trait;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, PendingTransaction, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, TxHash, U256, U64},
};
use tracing::{debug, info};

use crate::{
    abi::{CryptoDevToken, CryptoDevsNft},
    config::Settings,
    error::IcoError,
    wallet::WalletBackend,
};

// 带签名的客户端
pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

// 通过 HTTP RPC 与链交互的钱包后端
pub struct EthersWallet {
    provider: Arc<Provider<Http>>,
    wallet: Option<LocalWallet>,
    token_address: Address,
    nft_address: Address,
}

impl EthersWallet {
    pub fn new(
        rpc_url: &str,
        wallet: Option<LocalWallet>,
        token_address: Address,
        nft_address: Address,
    ) -> Result<Self, IcoError> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|error| IcoError::InvalidEnv {
                name: crate::config::QUICKNODE_HTTP_URL,
                reason: error.to_string(),
            })?;
        Ok(Self {
            provider: Arc::new(provider),
            wallet,
            token_address,
            nft_address,
        })
    }

    // 根据配置构造；私钥缺失时仍可创建，但连接会被拒绝
    pub fn from_settings(settings: &Settings) -> Result<Self, IcoError> {
        let wallet = match settings.wallet() {
            Ok(wallet) => Some(wallet),
            Err(IcoError::WalletUnavailable) => None,
            Err(error) => return Err(error),
        };
        Self::new(
            &settings.rpc_url,
            wallet,
            settings.token_contract,
            settings.nft_contract,
        )
    }

    fn wallet(&self) -> Result<&LocalWallet, IcoError> {
        self.wallet.as_ref().ok_or(IcoError::WalletUnavailable)
    }

    // 只读合约实例
    fn token(&self) -> CryptoDevToken<Provider<Http>> {
        CryptoDevToken::new(self.token_address, self.provider.clone())
    }

    fn nft(&self) -> CryptoDevsNft<Provider<Http>> {
        CryptoDevsNft::new(self.nft_address, self.provider.clone())
    }

    // 可签名的合约实例，链 ID 每次从节点读取
    async fn signing_token(&self) -> Result<CryptoDevToken<SignerClient>, IcoError> {
        let wallet = self.wallet()?.clone();
        let chain_id = self.provider.get_chainid().await?.as_u64();
        let client = SignerMiddleware::new(
            self.provider.as_ref().clone(),
            wallet.with_chain_id(chain_id),
        );
        Ok(CryptoDevToken::new(self.token_address, Arc::new(client)))
    }
}

#[async_trait]
impl WalletBackend for EthersWallet {
    async fn request_connection(&self) -> Result<(), IcoError> {
        // 本地私钥相当于已授权的钱包
        let wallet = self.wallet()?;
        debug!(address = ?wallet.address(), "using local signing key");
        Ok(())
    }

    async fn chain_id(&self) -> Result<u64, IcoError> {
        Ok(self.provider.get_chainid().await?.as_u64())
    }

    async fn signer_address(&self) -> Result<Address, IcoError> {
        Ok(self.wallet()?.address())
    }

    async fn token_balance_of(&self, owner: Address) -> Result<U256, IcoError> {
        self.token()
            .balance_of(owner)
            .call()
            .await
            .map_err(IcoError::contract)
    }

    async fn token_total_supply(&self) -> Result<U256, IcoError> {
        self.token()
            .total_supply()
            .call()
            .await
            .map_err(IcoError::contract)
    }

    async fn token_ids_claimed(&self, token_id: U256) -> Result<bool, IcoError> {
        self.token()
            .token_ids_claimed(token_id)
            .call()
            .await
            .map_err(IcoError::contract)
    }

    async fn nft_balance_of(&self, owner: Address) -> Result<U256, IcoError> {
        self.nft()
            .balance_of(owner)
            .call()
            .await
            .map_err(IcoError::contract)
    }

    async fn nft_token_of_owner_by_index(
        &self,
        owner: Address,
        index: U256,
    ) -> Result<U256, IcoError> {
        self.nft()
            .token_of_owner_by_index(owner, index)
            .call()
            .await
            .map_err(IcoError::contract)
    }

    async fn send_mint(&self, amount: U256, value: U256) -> Result<TxHash, IcoError> {
        let token = self.signing_token().await?;
        let call = token.mint(amount).value(value);
        let pending = call.send().await.map_err(IcoError::contract)?;
        let tx_hash = *pending;
        info!(?tx_hash, %amount, %value, "mint transaction submitted");
        Ok(tx_hash)
    }

    async fn send_claim(&self) -> Result<TxHash, IcoError> {
        let token = self.signing_token().await?;
        let call = token.claim();
        let pending = call.send().await.map_err(IcoError::contract)?;
        let tx_hash = *pending;
        info!(?tx_hash, "claim transaction submitted");
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<(), IcoError> {
        let receipt = PendingTransaction::new(tx_hash, self.provider.as_ref())
            .await?
            .ok_or(IcoError::TransactionDropped(tx_hash))?;
        // status 为 0 表示执行回滚
        if receipt.status == Some(U64::zero()) {
            return Err(IcoError::TransactionReverted(tx_hash));
        }
        debug!(?tx_hash, block = ?receipt.block_number, "transaction mined");
        Ok(())
    }
}
