// 钱包连接：provider 和 signer 句柄只能在网络检查通过后获得

use async_trait::async_trait;
use ethers::types::{Address, TxHash, U256};
use tracing::debug;

use crate::{config::Network, error::IcoError};

// 钱包后端：浏览器注入的 provider 在这里被抽象成一个 trait
#[async_trait]
pub trait WalletBackend: Send + Sync {
    // 请求用户授权连接钱包
    async fn request_connection(&self) -> Result<(), IcoError>;

    // 当前连接的链 ID
    async fn chain_id(&self) -> Result<u64, IcoError>;

    // 签名账户地址
    async fn signer_address(&self) -> Result<Address, IcoError>;

    // CryptoDevToken.balanceOf
    async fn token_balance_of(&self, owner: Address) -> Result<U256, IcoError>;

    // CryptoDevToken.totalSupply
    async fn token_total_supply(&self) -> Result<U256, IcoError>;

    // CryptoDevToken.tokenIdsClaimed
    async fn token_ids_claimed(&self, token_id: U256) -> Result<bool, IcoError>;

    // NFT.balanceOf
    async fn nft_balance_of(&self, owner: Address) -> Result<U256, IcoError>;

    // NFT.tokenOfOwnerByIndex
    async fn nft_token_of_owner_by_index(
        &self,
        owner: Address,
        index: U256,
    ) -> Result<U256, IcoError>;

    // 提交带 value 的 mint 交易，返回交易哈希
    async fn send_mint(&self, amount: U256, value: U256) -> Result<TxHash, IcoError>;

    // 提交 claim 交易
    async fn send_claim(&self) -> Result<TxHash, IcoError>;

    // 阻塞直到交易被打包
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<(), IcoError>;
}

// 连接钱包并校验网络；每次获取 provider 或 signer 都会重新执行，不做缓存
pub async fn require_network<B>(backend: &B, network: Network) -> Result<(), IcoError>
where
    B: WalletBackend + ?Sized,
{
    backend.request_connection().await?;
    let chain_id = backend.chain_id().await?;
    if chain_id != network.chain_id() {
        return Err(IcoError::WrongNetwork {
            expected_name: network.display_name(),
            expected: network.chain_id(),
            actual: chain_id,
        });
    }
    debug!(chain_id, "wallet connected to the expected network");
    Ok(())
}

// 只读句柄
pub struct ProviderHandle<'a, B: ?Sized> {
    backend: &'a B,
}

impl<'a, B> ProviderHandle<'a, B>
where
    B: WalletBackend + ?Sized,
{
    pub async fn acquire(backend: &'a B, network: Network) -> Result<Self, IcoError> {
        require_network(backend, network).await?;
        Ok(Self { backend })
    }

    pub async fn token_balance_of(&self, owner: Address) -> Result<U256, IcoError> {
        self.backend.token_balance_of(owner).await
    }

    pub async fn token_total_supply(&self) -> Result<U256, IcoError> {
        self.backend.token_total_supply().await
    }

    pub async fn token_ids_claimed(&self, token_id: U256) -> Result<bool, IcoError> {
        self.backend.token_ids_claimed(token_id).await
    }

    pub async fn nft_balance_of(&self, owner: Address) -> Result<U256, IcoError> {
        self.backend.nft_balance_of(owner).await
    }

    pub async fn nft_token_of_owner_by_index(
        &self,
        owner: Address,
        index: U256,
    ) -> Result<U256, IcoError> {
        self.backend.nft_token_of_owner_by_index(owner, index).await
    }
}

// 可发送交易的句柄，附带调用者地址
pub struct SignerHandle<'a, B: ?Sized> {
    backend: &'a B,
    address: Address,
}

impl<'a, B> SignerHandle<'a, B>
where
    B: WalletBackend + ?Sized,
{
    pub async fn acquire(backend: &'a B, network: Network) -> Result<Self, IcoError> {
        require_network(backend, network).await?;
        let address = backend.signer_address().await?;
        Ok(Self { backend, address })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn send_mint(&self, amount: U256, value: U256) -> Result<TxHash, IcoError> {
        self.backend.send_mint(amount, value).await
    }

    pub async fn send_claim(&self) -> Result<TxHash, IcoError> {
        self.backend.send_claim().await
    }

    pub async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<(), IcoError> {
        self.backend.wait_for_receipt(tx_hash).await
    }
}
