use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crypto_devs_ico::{
    config::DEFAULT_ARTIFACT_PATH,
    deploy::{deploy_token, HardhatArtifact},
    ConsoleNotifier, EthersWallet, IcoController, Network, Page, Settings,
};
use ethers::utils::to_checksum;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

// Crypto Devs ICO 命令行
#[derive(Parser)]
#[command(name = "crypto_devs_ico", about = "Deploy and use the Crypto Devs ICO token")]
struct Options {
    /// Network to use.
    #[arg(long, value_enum, default_value_t = Network::Goerli)]
    network: Network,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Deploy CryptoDevToken with NFT_CONTRACT_ADDRESS as constructor argument.
    Deploy {
        /// Compiled hardhat artifact of the token contract.
        #[arg(long, default_value = DEFAULT_ARTIFACT_PATH)]
        artifact: PathBuf,
    },
    #[command(flatten)]
    Client(ClientCommand),
}

// 与页面按钮对应的操作
#[derive(Subcommand)]
enum ClientCommand {
    /// Connect the wallet and check the network.
    Connect,
    /// Show balances, supply and claimable tokens.
    Status,
    /// Mint tokens at 0.001 ether each.
    Mint {
        /// Amount of tokens.
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Claim tokens for every unclaimed Crypto Devs NFT.
    Claim,
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // 加载 .env 中的配置
    dotenv::from_filename(".env").ok();
    init_tracing();

    let options = Options::parse();
    let settings = Settings::from_env(options.network)?;

    match options.command {
        Command::Deploy { artifact } => {
            let artifact = HardhatArtifact::load(&artifact)?;
            let address = deploy_token(&settings, artifact).await?;
            println!("CryptoDevsToken deployed to: {}", to_checksum(&address, None));
        }
        Command::Client(command) => run_client(&settings, command).await?,
    }
    Ok(())
}

// 前端页面的命令行版本：先执行页面加载，再按页面显示的按钮执行操作
async fn run_client(settings: &Settings, command: ClientCommand) -> eyre::Result<()> {
    let backend = EthersWallet::from_settings(settings)?;
    let mut controller = IcoController::new(backend, ConsoleNotifier, settings.network);
    controller.load().await;

    match command {
        ClientCommand::Connect | ClientCommand::Status => {}
        ClientCommand::Mint { amount } => controller.request_mint(&amount).await?,
        ClientCommand::Claim => controller.request_claim().await?,
    }

    println!("{}", Page::new(controller.state()));
    Ok(())
}
