// 测试用的内存钱包：模拟 Crypto Devs NFT 与 CryptoDevToken 两个合约的状态
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, MutexGuard,
    },
};

use async_trait::async_trait;
use ethers::types::{Address, TxHash, U256};

use crate::{
    controller::Notifier,
    error::IcoError,
    units::{MAX_TOTAL_SUPPLY, TOKENS_PER_NFT, TOKEN_PRICE_WEI},
    wallet::WalletBackend,
};

// 代币精度
fn one_token() -> U256 {
    U256::exp10(18)
}

// 可枚举 ERC-721 的最小模型
#[derive(Default)]
struct NftLedger {
    // token_id 到拥有者地址的映射
    owners: BTreeMap<U256, Address>,
    // 地址到余额的映射
    balances: HashMap<Address, U256>,
    // 总供应量，同时作为下一个 token_id
    total_supply: U256,
}

impl NftLedger {
    // 铸造新 token 并转给 to
    fn mint(&mut self, to: Address) -> U256 {
        let token_id = self.total_supply;
        self.total_supply += U256::one();
        self.owners.insert(token_id, to);
        *self.balances.entry(to).or_default() += U256::one();
        token_id
    }

    fn balance_of(&self, owner: Address) -> U256 {
        self.balances.get(&owner).copied().unwrap_or_default()
    }

    // 按 token_id 顺序枚举 owner 持有的第 index 个 token
    fn token_of_owner_by_index(&self, owner: Address, index: U256) -> Result<U256, IcoError> {
        let index = usize::try_from(index.as_u128()).unwrap_or(usize::MAX);
        self.owners
            .iter()
            .filter(|(_, holder)| **holder == owner)
            .map(|(token_id, _)| *token_id)
            .nth(index)
            .ok_or_else(|| IcoError::Contract("ERC721Enumerable: owner index out of bounds".into()))
    }

    fn tokens_of(&self, owner: Address) -> Vec<U256> {
        self.owners
            .iter()
            .filter(|(_, holder)| **holder == owner)
            .map(|(token_id, _)| *token_id)
            .collect()
    }
}

// CryptoDevToken 的最小模型
#[derive(Default)]
struct TokenLedger {
    balances: HashMap<Address, U256>,
    total_supply: U256,
    // 已领取过代币的 NFT
    claimed: HashSet<U256>,
}

impl TokenLedger {
    fn credit(&mut self, to: Address, amount: U256) -> Result<(), IcoError> {
        let max = U256::from(MAX_TOTAL_SUPPLY) * one_token();
        if self.total_supply + amount > max {
            return Err(IcoError::Contract(
                "Exceeds the max total supply available.".into(),
            ));
        }
        self.total_supply += amount;
        *self.balances.entry(to).or_default() += amount;
        Ok(())
    }
}

#[derive(Default)]
struct Ledger {
    nft: NftLedger,
    token: TokenLedger,
    // 已提交但尚未查询回执的交易
    pending: HashSet<TxHash>,
    next_tx: u64,
}

impl Ledger {
    fn submit(&mut self) -> TxHash {
        self.next_tx += 1;
        let tx_hash = TxHash::from_low_u64_be(self.next_tx);
        self.pending.insert(tx_hash);
        tx_hash
    }
}

// 每个后端方法被调用的次数
#[derive(Clone, Debug, Default)]
pub struct CallLog {
    pub request_connection: usize,
    pub chain_id: usize,
    pub signer_address: usize,
    pub token_balance_of: usize,
    pub token_total_supply: usize,
    pub token_ids_claimed: usize,
    pub nft_balance_of: usize,
    pub nft_token_of_owner_by_index: usize,
    pub send_mint: usize,
    pub send_claim: usize,
    pub wait_for_receipt: usize,
    // 每次 mint 附带的 value
    pub mint_values: Vec<U256>,
}

impl CallLog {
    // 对合约发起的读写调用总数
    pub fn contract_calls(&self) -> usize {
        self.token_balance_of
            + self.token_total_supply
            + self.token_ids_claimed
            + self.nft_balance_of
            + self.nft_token_of_owner_by_index
            + self.send_mint
            + self.send_claim
    }
}

pub struct FakeWallet {
    chain_id: u64,
    reject_connection: bool,
    failing_reads: AtomicBool,
    owner: Address,
    ledger: Mutex<Ledger>,
    calls: Mutex<CallLog>,
}

impl Default for FakeWallet {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeWallet {
    // 默认连接 goerli、账户没有任何 NFT
    pub fn new() -> Self {
        Self {
            chain_id: 5,
            reject_connection: false,
            failing_reads: AtomicBool::new(false),
            owner: Address::from_low_u64_be(0xc0ffee),
            ledger: Mutex::new(Ledger::default()),
            calls: Mutex::new(CallLog::default()),
        }
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    // 模拟用户拒绝连接
    pub fn rejecting_connection(mut self) -> Self {
        self.reject_connection = true;
        self
    }

    // 给账户铸造 NFT，claimed[i] 表示第 i 个是否已领取过
    pub fn with_nfts(self, claimed: &[bool]) -> Self {
        {
            let mut ledger = self.ledger();
            for &was_claimed in claimed {
                let token_id = ledger.nft.mint(self.owner);
                if was_claimed {
                    ledger.token.claimed.insert(token_id);
                }
            }
        }
        self
    }

    // 给其他地址铸造 NFT，使账户的 token 不连续
    pub fn with_foreign_nfts(self, count: usize) -> Self {
        {
            let mut ledger = self.ledger();
            for _ in 0..count {
                ledger.nft.mint(Address::from_low_u64_be(0xbad));
            }
        }
        self
    }

    // 之后的只读调用全部失败
    pub fn set_failing_reads(&self, failing: bool) {
        self.failing_reads.store(failing, Ordering::SeqCst);
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn calls(&self) -> CallLog {
        self.calls.lock().unwrap().clone()
    }

    pub fn token_balance(&self, owner: Address) -> U256 {
        self.ledger().token.balances.get(&owner).copied().unwrap_or_default()
    }

    pub fn token_supply(&self) -> U256 {
        self.ledger().token.total_supply
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap()
    }

    fn record(&self, f: impl FnOnce(&mut CallLog)) {
        f(&mut self.calls.lock().unwrap());
    }

    fn check_read(&self) -> Result<(), IcoError> {
        if self.failing_reads.load(Ordering::SeqCst) {
            return Err(IcoError::Contract("could not detect network".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl WalletBackend for FakeWallet {
    async fn request_connection(&self) -> Result<(), IcoError> {
        self.record(|calls| calls.request_connection += 1);
        if self.reject_connection {
            return Err(IcoError::WalletUnavailable);
        }
        Ok(())
    }

    async fn chain_id(&self) -> Result<u64, IcoError> {
        self.record(|calls| calls.chain_id += 1);
        Ok(self.chain_id)
    }

    async fn signer_address(&self) -> Result<Address, IcoError> {
        self.record(|calls| calls.signer_address += 1);
        Ok(self.owner)
    }

    async fn token_balance_of(&self, owner: Address) -> Result<U256, IcoError> {
        self.record(|calls| calls.token_balance_of += 1);
        self.check_read()?;
        Ok(self.token_balance(owner))
    }

    async fn token_total_supply(&self) -> Result<U256, IcoError> {
        self.record(|calls| calls.token_total_supply += 1);
        self.check_read()?;
        Ok(self.token_supply())
    }

    async fn token_ids_claimed(&self, token_id: U256) -> Result<bool, IcoError> {
        self.record(|calls| calls.token_ids_claimed += 1);
        self.check_read()?;
        Ok(self.ledger().token.claimed.contains(&token_id))
    }

    async fn nft_balance_of(&self, owner: Address) -> Result<U256, IcoError> {
        self.record(|calls| calls.nft_balance_of += 1);
        self.check_read()?;
        Ok(self.ledger().nft.balance_of(owner))
    }

    async fn nft_token_of_owner_by_index(
        &self,
        owner: Address,
        index: U256,
    ) -> Result<U256, IcoError> {
        self.record(|calls| calls.nft_token_of_owner_by_index += 1);
        self.check_read()?;
        self.ledger().nft.token_of_owner_by_index(owner, index)
    }

    async fn send_mint(&self, amount: U256, value: U256) -> Result<TxHash, IcoError> {
        self.record(|calls| {
            calls.send_mint += 1;
            calls.mint_values.push(value);
        });
        let mut ledger = self.ledger();
        // 与合约一致：支付金额不足则回滚
        let required = amount.saturating_mul(U256::from(TOKEN_PRICE_WEI));
        if value < required {
            return Err(IcoError::Contract("Ether sent is incorrect".into()));
        }
        ledger.token.credit(self.owner, amount.saturating_mul(one_token()))?;
        Ok(ledger.submit())
    }

    async fn send_claim(&self) -> Result<TxHash, IcoError> {
        self.record(|calls| calls.send_claim += 1);
        let mut ledger = self.ledger();
        let unclaimed: Vec<U256> = ledger
            .nft
            .tokens_of(self.owner)
            .into_iter()
            .filter(|token_id| !ledger.token.claimed.contains(token_id))
            .collect();
        if unclaimed.is_empty() {
            return Err(IcoError::Contract(
                "You have already claimed all the tokens".into(),
            ));
        }
        let amount = U256::from(unclaimed.len()) * U256::from(TOKENS_PER_NFT) * one_token();
        ledger.token.credit(self.owner, amount)?;
        ledger.token.claimed.extend(unclaimed);
        Ok(ledger.submit())
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<(), IcoError> {
        self.record(|calls| calls.wait_for_receipt += 1);
        if self.ledger().pending.remove(&tx_hash) {
            Ok(())
        } else {
            Err(IcoError::TransactionDropped(tx_hash))
        }
    }
}

// 记录所有弹出的提示
#[derive(Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}
