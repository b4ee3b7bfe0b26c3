use std::fmt;

use ethers::types::U256;

use crate::{
    controller::ViewState,
    units::{claimable_tokens, display_ether, MAX_TOTAL_SUPPLY},
};

// 页面下半部分可执行的操作
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum View {
    // 交易进行中
    Loading,
    // 有未领取的 NFT，只显示领取按钮
    Claim { tokens: U256 },
    // 铸造表单，数量为 0 时按钮禁用
    Mint { amount: U256, enabled: bool },
}

impl View {
    pub fn from_state(state: &ViewState) -> Self {
        if state.loading {
            return View::Loading;
        }
        if !state.tokens_to_be_claimed.is_zero() {
            return View::Claim {
                tokens: claimable_tokens(state.tokens_to_be_claimed),
            };
        }
        View::Mint {
            amount: state.token_amount,
            enabled: !state.token_amount.is_zero(),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Loading => write!(f, "Loading....."),
            View::Claim { tokens } => {
                writeln!(f, "You have {tokens} tokens to be claimed")?;
                write!(f, "[Claim Tokens]")
            }
            View::Mint { amount, enabled } => {
                let button = if *enabled { "[Mint Tokens]" } else { "[Mint Tokens] (disabled)" };
                write!(f, "Amount of tokens: {amount} {button}")
            }
        }
    }
}

// 整个页面的文本渲染
pub struct Page<'a> {
    state: &'a ViewState,
}

impl<'a> Page<'a> {
    pub fn new(state: &'a ViewState) -> Self {
        Self { state }
    }
}

impl fmt::Display for Page<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Crypto Devs ICO")?;
        writeln!(f, "Claim or mint CD tokens here")?;
        writeln!(f, "{} CD tokens owned", display_ether(self.state.tokens_owned))?;
        if self.state.wallet_connected {
            writeln!(
                f,
                "{}/{} CD tokens have been minted till now",
                display_ether(self.state.tokens_minted),
                MAX_TOTAL_SUPPLY
            )?;
        } else {
            writeln!(f, "[Connect wallet]")?;
        }
        write!(f, "{}", View::from_state(self.state))
    }
}
