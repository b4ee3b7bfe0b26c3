// ICO 页面控制器：持有页面状态并驱动所有钱包交互
// 错误只记录日志，只有网络错误和成功提示会弹给用户

use ethers::types::U256;
use tracing::{debug, info, warn};

use crate::{
    config::Network,
    error::IcoError,
    units::{mint_cost, parse_token_amount},
    view::View,
    wallet::{ProviderHandle, SignerHandle, WalletBackend},
};

// 向用户弹出提示
pub trait Notifier {
    fn alert(&self, message: &str);
}

// 命令行下直接打印到标准输出
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        println!("{message}");
    }
}

pub const MINTED_MESSAGE: &str = "CD Tokens minted successfully";
pub const CLAIMED_MESSAGE: &str = "CD Tokens claimed successfully";

// 页面状态，只能由控制器自己的处理函数修改
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    pub wallet_connected: bool,
    // 已发行总量
    pub tokens_minted: U256,
    // 当前账户余额
    pub tokens_owned: U256,
    // 输入框中的铸造数量
    pub token_amount: U256,
    pub loading: bool,
    // 未领取代币的 NFT 数量
    pub tokens_to_be_claimed: U256,
}

// 钱包会话：后端、提示方式和唯一允许的网络
struct Session<B, N> {
    backend: B,
    notifier: N,
    network: Network,
}

impl<B, N> Session<B, N>
where
    B: WalletBackend,
    N: Notifier,
{
    // 获取只读 provider；网络不对时提示用户
    async fn provider(&self) -> Result<ProviderHandle<'_, B>, IcoError> {
        let result = ProviderHandle::acquire(&self.backend, self.network).await;
        self.alert_on_wrong_network(result)
    }

    // 获取 signer，同样会重新检查网络
    async fn signer(&self) -> Result<SignerHandle<'_, B>, IcoError> {
        let result = SignerHandle::acquire(&self.backend, self.network).await;
        self.alert_on_wrong_network(result)
    }

    fn alert_on_wrong_network<T>(&self, result: Result<T, IcoError>) -> Result<T, IcoError> {
        if let Err(IcoError::WrongNetwork { expected_name, .. }) = &result {
            self.notifier
                .alert(&format!("Change the network to {expected_name}"));
        }
        result
    }

    async fn fetch_balance(&self) -> Result<U256, IcoError> {
        let provider = self.provider().await?;
        let signer = self.signer().await?;
        provider.token_balance_of(signer.address()).await
    }

    async fn fetch_total_supply(&self) -> Result<U256, IcoError> {
        self.provider().await?.token_total_supply().await
    }

    // 依次查询每个 NFT 是否已领取，统计未领取的数量
    async fn fetch_claimable(&self) -> Result<U256, IcoError> {
        let provider = self.provider().await?;
        let signer = self.signer().await?;
        let address = signer.address();
        debug!(?address, "counting unclaimed NFTs");

        let balance = provider.nft_balance_of(address).await?;
        if balance.is_zero() {
            return Ok(U256::zero());
        }
        let mut amount = U256::zero();
        let mut index = U256::zero();
        while index < balance {
            let token_id = provider.nft_token_of_owner_by_index(address, index).await?;
            if !provider.token_ids_claimed(token_id).await? {
                amount += U256::one();
            }
            index += U256::one();
        }
        Ok(amount)
    }
}

pub struct IcoController<B, N = ConsoleNotifier> {
    session: Session<B, N>,
    state: ViewState,
}

impl<B, N> IcoController<B, N>
where
    B: WalletBackend,
    N: Notifier,
{
    pub fn new(backend: B, notifier: N, network: Network) -> Self {
        Self {
            session: Session {
                backend,
                notifier,
                network,
            },
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.session.backend
    }

    pub fn notifier(&self) -> &N {
        &self.session.notifier
    }

    // 当前应当展示的页面
    pub fn view(&self) -> View {
        View::from_state(&self.state)
    }

    // 连接钱包；失败只记录日志
    pub async fn connect_wallet(&mut self) {
        match self.session.provider().await {
            Ok(_) => {
                self.state.wallet_connected = true;
                info!("wallet connected");
            }
            Err(error) => warn!(%error, "wallet connection failed"),
        }
    }

    // 页面加载：未连接时连接钱包并读取全部状态
    pub async fn load(&mut self) {
        if self.state.wallet_connected {
            return;
        }
        self.connect_wallet().await;
        self.refresh().await;
    }

    // 读取余额、总量和可领取数量
    pub async fn refresh(&mut self) {
        self.read_balance().await;
        self.read_total_supply().await;
        self.read_claimable().await;
    }

    // 读取失败时保留上一次的值
    pub async fn read_balance(&mut self) {
        match self.session.fetch_balance().await {
            Ok(balance) => self.state.tokens_owned = balance,
            Err(error) => warn!(%error, "failed to read the token balance"),
        }
    }

    pub async fn read_total_supply(&mut self) {
        match self.session.fetch_total_supply().await {
            Ok(total_supply) => self.state.tokens_minted = total_supply,
            Err(error) => warn!(%error, "failed to read the total supply"),
        }
    }

    // 出错时可领取数量归零
    pub async fn read_claimable(&mut self) {
        self.state.tokens_to_be_claimed = match self.session.fetch_claimable().await {
            Ok(amount) => amount,
            Err(error) => {
                warn!(%error, "failed to read claimable tokens");
                U256::zero()
            }
        };
    }

    // 输入框变化
    pub fn set_token_amount(&mut self, input: &str) {
        self.state.token_amount = parse_token_amount(input);
    }

    // 数量大于 0 时才允许铸造
    pub fn mint_enabled(&self) -> bool {
        !self.state.token_amount.is_zero()
    }

    // 按单价支付并铸造 amount 个代币，成功后刷新状态
    pub async fn mint_tokens(&mut self, amount: U256) {
        match self.submit_mint(amount).await {
            Ok(()) => {
                self.session.notifier.alert(MINTED_MESSAGE);
                self.refresh().await;
            }
            Err(error) => warn!(%error, %amount, "mint failed"),
        }
    }

    async fn submit_mint(&mut self, amount: U256) -> Result<(), IcoError> {
        let signer = self.session.signer().await?;
        let value = mint_cost(amount)?;
        self.state.loading = true;
        let result = async {
            let tx_hash = signer.send_mint(amount, value).await?;
            signer.wait_for_receipt(tx_hash).await
        }
        .await;
        self.state.loading = false;
        result
    }

    // 与页面一致：只有显示铸造表单且按钮可用时才铸造
    pub async fn request_mint(&mut self, input: &str) -> Result<(), IcoError> {
        self.set_token_amount(input);
        match self.view() {
            View::Mint {
                enabled: true,
                amount,
            } => {
                self.mint_tokens(amount).await;
                Ok(())
            }
            View::Mint { enabled: false, .. } => {
                Err(IcoError::MintDisabled(input.trim().to_string()))
            }
            View::Claim { tokens } => Err(IcoError::ClaimPending(tokens)),
            View::Loading => Err(IcoError::TransactionInFlight),
        }
    }

    // 只有显示领取按钮时才领取
    pub async fn request_claim(&mut self) -> Result<(), IcoError> {
        match self.view() {
            View::Claim { .. } => {
                self.claim_tokens().await;
                Ok(())
            }
            View::Loading => Err(IcoError::TransactionInFlight),
            View::Mint { .. } => Err(IcoError::NothingToClaim),
        }
    }

    // 凭 NFT 领取代币
    pub async fn claim_tokens(&mut self) {
        match self.submit_claim().await {
            Ok(()) => {
                self.session.notifier.alert(CLAIMED_MESSAGE);
                self.refresh().await;
            }
            Err(error) => warn!(%error, "claim failed"),
        }
    }

    async fn submit_claim(&mut self) -> Result<(), IcoError> {
        let signer = self.session.signer().await?;
        let tx_hash = signer.send_claim().await?;
        self.state.loading = true;
        let result = signer.wait_for_receipt(tx_hash).await;
        self.state.loading = false;
        result
    }
}
