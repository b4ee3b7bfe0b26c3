use ethers::{
    providers::ProviderError,
    signers::WalletError,
    types::{TxHash, U256},
};
use thiserror::Error;

// 客户端和部署脚本共用的错误类型
#[derive(Debug, Error)]
pub enum IcoError {
    // 缺少必需的环境变量
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    // 环境变量格式不正确
    #[error("environment variable {name} is invalid: {reason}")]
    InvalidEnv { name: &'static str, reason: String },

    // 钱包未配置或用户拒绝连接
    #[error("wallet connection rejected")]
    WalletUnavailable,

    // 当前链不是唯一允许的网络
    #[error("change network to {expected_name} (expected chain id {expected}, got {actual})")]
    WrongNetwork {
        expected_name: &'static str,
        expected: u64,
        actual: u64,
    },

    // 价格乘以数量溢出
    #[error("mint amount {0} overflows the payment value")]
    AmountOverflow(U256),

    // 输入的数量不是正整数，铸造按钮禁用
    #[error("amount must be a positive whole number, got {0:?}")]
    MintDisabled(String),

    // 还有待领取的代币，页面不显示铸造表单
    #[error("claim your {0} tokens before minting")]
    ClaimPending(U256),

    #[error("no tokens to claim")]
    NothingToClaim,

    #[error("a transaction is already in flight")]
    TransactionInFlight,

    // 交易被节点丢弃，没有回执
    #[error("transaction {0:?} was dropped from the mempool")]
    TransactionDropped(TxHash),

    // 交易已上链但执行失败
    #[error("transaction {0:?} reverted")]
    TransactionReverted(TxHash),

    // 合约调用失败（回滚、编码错误等）
    #[error("contract call failed: {0}")]
    Contract(String),

    // 部署失败
    #[error("failed to deploy the smart contract: {0}")]
    Deploy(String),

    // 合约编译产物无法读取
    #[error("invalid contract artifact: {0}")]
    Artifact(String),

    #[error("invalid address {0}")]
    InvalidAddress(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl IcoError {
    // 把 ethers 的泛型合约错误折叠成字符串，避免错误类型依赖中间件
    pub fn contract<E: std::fmt::Display>(error: E) -> Self {
        IcoError::Contract(error.to_string())
    }
}
