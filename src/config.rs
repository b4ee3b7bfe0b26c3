use std::str::FromStr;

use clap::ValueEnum;
use ethers::{signers::LocalWallet, types::Address};

use crate::error::IcoError;

// 环境变量名称
pub const PRIVATE_KEY: &str = "PRIVATE_KEY";
pub const QUICKNODE_HTTP_URL: &str = "QUICKNODE_HTTP_URL";
pub const NFT_CONTRACT_ADDRESS: &str = "NFT_CONTRACT_ADDRESS";
pub const TOKEN_CONTRACT_ADDRESS: &str = "TOKEN_CONTRACT_ADDRESS";

// 已部署的 CryptoDevToken 地址
pub const DEFAULT_TOKEN_CONTRACT_ADDRESS: &str = "0x92879E8A15857c062ED7BD63b0Ce94166A1b260c";

// 默认的 hardhat 编译产物路径
pub const DEFAULT_ARTIFACT_PATH: &str = "artifacts/contracts/CryptoDevToken.sol/CryptoDevToken.json";

// 支持的网络，目前只有 goerli
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Network {
    #[default]
    Goerli,
}

impl Network {
    // 网络对应的链 ID
    pub fn chain_id(self) -> u64 {
        match self {
            Network::Goerli => 5,
        }
    }

    // 提示用户时使用的名称
    pub fn display_name(self) -> &'static str {
        match self {
            Network::Goerli => "Goerli",
        }
    }
}

// 运行所需的全部配置
#[derive(Clone, Debug)]
pub struct Settings {
    pub network: Network,
    pub rpc_url: String,
    pub private_key: Option<String>,
    pub nft_contract: Address,
    pub token_contract: Address,
}

impl Settings {
    // 从进程环境读取配置（调用前应先加载 .env）
    pub fn from_env(network: Network) -> Result<Self, IcoError> {
        Self::from_lookup(network, |name| std::env::var(name).ok())
    }

    // 通过查找函数读取配置，便于测试
    pub fn from_lookup<F>(network: Network, lookup: F) -> Result<Self, IcoError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        // 空字符串和未设置同样处理
        let get = |name| lookup(name).filter(|value| !value.trim().is_empty());

        let rpc_url = get(QUICKNODE_HTTP_URL).ok_or(IcoError::MissingEnv(QUICKNODE_HTTP_URL))?;
        let nft_contract = get(NFT_CONTRACT_ADDRESS)
            .ok_or(IcoError::MissingEnv(NFT_CONTRACT_ADDRESS))
            .and_then(|value| parse_address(NFT_CONTRACT_ADDRESS, &value))?;
        let token_contract = parse_address(
            TOKEN_CONTRACT_ADDRESS,
            &get(TOKEN_CONTRACT_ADDRESS).unwrap_or_else(|| DEFAULT_TOKEN_CONTRACT_ADDRESS.into()),
        )?;

        Ok(Self {
            network,
            rpc_url,
            private_key: get(PRIVATE_KEY),
            nft_contract,
            token_contract,
        })
    }

    // 构造签名钱包，未配置私钥时视为钱包不可用
    pub fn wallet(&self) -> Result<LocalWallet, IcoError> {
        let key = self.private_key.as_deref().ok_or(IcoError::WalletUnavailable)?;
        parse_private_key(key)
    }

    // 部署脚本必须有私钥，缺失时报出变量名
    pub fn deployer_wallet(&self) -> Result<LocalWallet, IcoError> {
        let key = self.private_key.as_deref().ok_or(IcoError::MissingEnv(PRIVATE_KEY))?;
        parse_private_key(key)
    }
}

fn parse_address(name: &'static str, value: &str) -> Result<Address, IcoError> {
    Address::from_str(value.trim()).map_err(|error| IcoError::InvalidEnv {
        name,
        reason: error.to_string(),
    })
}

// 私钥为 32 字节十六进制，可带 0x 前缀
pub fn parse_private_key(key: &str) -> Result<LocalWallet, IcoError> {
    let key = key.trim();
    let key = key.strip_prefix("0x").unwrap_or(key);
    let bytes = hex::decode(key).map_err(|error| IcoError::InvalidEnv {
        name: PRIVATE_KEY,
        reason: error.to_string(),
    })?;
    Ok(LocalWallet::from_bytes(&bytes)?)
}
