use ethers::{types::U256, utils::format_ether};

use crate::error::IcoError;

// 每个 CD 代币的价格：0.001 ether
pub const TOKEN_PRICE_WEI: u64 = 1_000_000_000_000_000;

// 每个未领取的 NFT 可领取的代币数量
pub const TOKENS_PER_NFT: u64 = 10;

// 最大发行量（整币）
pub const MAX_TOTAL_SUPPLY: u64 = 10_000;

// 铸造 amount 个代币需要支付的 wei，按单价线性计算
pub fn mint_cost(amount: U256) -> Result<U256, IcoError> {
    amount
        .checked_mul(U256::from(TOKEN_PRICE_WEI))
        .ok_or(IcoError::AmountOverflow(amount))
}

// 待领取的代币数量 = 未领取 NFT 数 * 10
pub fn claimable_tokens(unclaimed_nfts: U256) -> U256 {
    unclaimed_nfts.saturating_mul(U256::from(TOKENS_PER_NFT))
}

// 把链上 18 位精度的数量格式化为 ether 单位
pub fn display_ether(amount: U256) -> String {
    format_ether(amount)
}

// 解析用户输入的铸造数量；非数字、负数或空输入都按 0 处理
pub fn parse_token_amount(input: &str) -> U256 {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return U256::zero();
    }
    U256::from_dec_str(input).unwrap_or_default()
}
