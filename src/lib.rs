// Crypto Devs ICO：部署 CryptoDevToken 合约，并通过钱包后端铸造、领取代币

// 引入模块
pub mod abi;
pub mod config;
pub mod controller;
pub mod deploy;
pub mod error;
pub mod ethers_backend;
pub mod units;
pub mod view;
pub mod wallet;

#[cfg(test)]
mod test_utils;

pub use crate::{
    config::{Network, Settings},
    controller::{ConsoleNotifier, IcoController, Notifier, ViewState},
    error::IcoError,
    ethers_backend::EthersWallet,
    view::{Page, View},
    wallet::WalletBackend,
};
