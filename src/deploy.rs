use std::{fs, path::Path, sync::Arc};

use ethers::{
    abi::Abi,
    contract::ContractFactory,
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, Bytes},
};
use serde::Deserialize;
use tracing::info;

use crate::{config::Settings, error::IcoError};

// hardhat 编译产物中需要的字段
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardhatArtifact {
    #[serde(default)]
    pub contract_name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
}

impl HardhatArtifact {
    pub fn from_json(json: &str) -> Result<Self, IcoError> {
        let artifact: Self = serde_json::from_str(json)?;
        if artifact.bytecode.is_empty() {
            // 接口或抽象合约没有字节码
            return Err(IcoError::Artifact(format!(
                "{} has no deployable bytecode",
                artifact.contract_name
            )));
        }
        Ok(artifact)
    }

    pub fn load(path: &Path) -> Result<Self, IcoError> {
        let json = fs::read_to_string(path)
            .map_err(|error| IcoError::Artifact(format!("{}: {error}", path.display())))?;
        Self::from_json(&json)
    }
}

// 部署 CryptoDevToken，构造参数为 NFT 合约地址；等待交易打包后返回合约地址
pub async fn deploy_token(
    settings: &Settings,
    artifact: HardhatArtifact,
) -> Result<Address, IcoError> {
    let wallet: LocalWallet = settings.deployer_wallet()?;
    let provider = Provider::<Http>::try_from(settings.rpc_url.as_str()).map_err(|error| {
        IcoError::InvalidEnv {
            name: crate::config::QUICKNODE_HTTP_URL,
            reason: error.to_string(),
        }
    })?;
    let chain_id = provider.get_chainid().await?.as_u64();
    let client = Arc::new(SignerMiddleware::new(
        provider,
        wallet.with_chain_id(chain_id),
    ));
    info!(
        chain_id,
        deployer = ?client.address(),
        nft_contract = ?settings.nft_contract,
        "deploying CryptoDevToken"
    );

    let factory = ContractFactory::new(artifact.abi, artifact.bytecode, client);
    let contract = factory
        .deploy(settings.nft_contract)
        .map_err(|error| IcoError::Deploy(error.to_string()))?
        .send()
        .await
        .map_err(|error| IcoError::Deploy(error.to_string()))?;
    Ok(contract.address())
}
