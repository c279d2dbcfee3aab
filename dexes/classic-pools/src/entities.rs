// ─────────────────────────────────────────────────────────────────────────────
// Derived entities reconstructed from pool events
// ─────────────────────────────────────────────────────────────────────────────

use std::sync::Arc;
use substreams::scalar::{BigDecimal, BigInt};

/// Key of the single Bundle record
pub const BUNDLE_ID: &str = "1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Factory,
    Bundle,
    Token,
    Pool,
    Transaction,
    Mint,
    Burn,
    Swap,
    User,
    UserPosition,
    PoolDayData,
    PoolHourData,
    TokenDayData,
    GlobalDayData,
}

/// A record addressable in an [`crate::store::EntityStore`].
pub trait Entity: Clone + Sized {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    fn into_stored(self) -> StoredEntity;

    fn from_stored(stored: &StoredEntity) -> Option<Self>;
}

/// Type-erased entity as held by a store
#[derive(Debug, Clone, PartialEq)]
pub enum StoredEntity {
    Factory(Factory),
    Bundle(Bundle),
    Token(Token),
    Pool(Pool),
    Transaction(Transaction),
    Mint(MintEvent),
    Burn(BurnEvent),
    Swap(SwapEvent),
    User(User),
    UserPosition(UserPosition),
    PoolDayData(PoolDayData),
    PoolHourData(PoolHourData),
    TokenDayData(TokenDayData),
    GlobalDayData(GlobalDayData),
}

macro_rules! impl_entity {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl Entity for $ty {
                const KIND: EntityKind = EntityKind::$variant;

                fn id(&self) -> &str {
                    &self.id
                }

                fn into_stored(self) -> StoredEntity {
                    StoredEntity::$variant(self)
                }

                fn from_stored(stored: &StoredEntity) -> Option<Self> {
                    match stored {
                        StoredEntity::$variant(entity) => Some(entity.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_entity! {
    Factory => Factory,
    Bundle => Bundle,
    Token => Token,
    Pool => Pool,
    Transaction => Transaction,
    MintEvent => Mint,
    BurnEvent => Burn,
    SwapEvent => Swap,
    User => User,
    UserPosition => UserPosition,
    PoolDayData => PoolDayData,
    PoolHourData => PoolHourData,
    TokenDayData => TokenDayData,
    GlobalDayData => GlobalDayData,
}

/// Protocol-wide running totals, keyed by the factory address
#[derive(Debug, Clone, PartialEq)]
pub struct Factory {
    pub id: String,
    pub pool_count: u64,
    pub total_volume_usd: BigDecimal,
    pub total_volume_eth: BigDecimal,
    pub untracked_volume_usd: BigDecimal,
    pub total_liquidity_usd: BigDecimal,
    pub total_liquidity_eth: BigDecimal,
    pub tx_count: u64,
    pub user_count: u64,
}

impl Factory {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            pool_count: 0,
            total_volume_usd: BigDecimal::zero(),
            total_volume_eth: BigDecimal::zero(),
            untracked_volume_usd: BigDecimal::zero(),
            total_liquidity_usd: BigDecimal::zero(),
            total_liquidity_eth: BigDecimal::zero(),
            tx_count: 0,
            user_count: 0,
        }
    }
}

/// USD price of the reference asset
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    pub id: String,
    pub eth_price: BigDecimal,
}

impl Bundle {
    pub fn new() -> Self {
        Self {
            id: BUNDLE_ID.to_string(),
            eth_price: BigDecimal::zero(),
        }
    }
}

impl Default for Bundle {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u64,
    pub total_supply: BigInt,
    pub derived_eth: BigDecimal,
    pub trade_volume: BigDecimal,
    pub trade_volume_usd: BigDecimal,
    pub untracked_volume_usd: BigDecimal,
    pub total_liquidity: BigDecimal,
    pub tx_count: u64,
}

impl Token {
    pub fn new(
        id: &str,
        symbol: String,
        name: String,
        decimals: u64,
        total_supply: BigInt,
    ) -> Self {
        Self {
            id: id.to_string(),
            symbol,
            name,
            decimals,
            total_supply,
            derived_eth: BigDecimal::zero(),
            trade_volume: BigDecimal::zero(),
            trade_volume_usd: BigDecimal::zero(),
            untracked_volume_usd: BigDecimal::zero(),
            total_liquidity: BigDecimal::zero(),
            tx_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pool {
    pub id: String,
    pub token0: String,
    pub token1: String,
    pub reserve0: BigDecimal,
    pub reserve1: BigDecimal,
    /// Liquidity token supply
    pub total_supply: BigDecimal,
    pub reserve_eth: BigDecimal,
    pub reserve_usd: BigDecimal,
    /// Whitelist-backed reserve value, the pool's share of factory liquidity
    pub tracked_reserve_eth: BigDecimal,
    /// token0 per token1
    pub token0_price: BigDecimal,
    /// token1 per token0
    pub token1_price: BigDecimal,
    pub volume_token0: BigDecimal,
    pub volume_token1: BigDecimal,
    pub volume_usd: BigDecimal,
    pub untracked_volume_usd: BigDecimal,
    pub tx_count: u64,
    pub liquidity_provider_count: u64,
    pub created_at_timestamp: u64,
    pub created_at_block_number: u64,
}

impl Pool {
    pub fn new(id: &str, token0: &str, token1: &str, timestamp: u64, block_number: u64) -> Self {
        Self {
            id: id.to_string(),
            token0: token0.to_string(),
            token1: token1.to_string(),
            reserve0: BigDecimal::zero(),
            reserve1: BigDecimal::zero(),
            total_supply: BigDecimal::zero(),
            reserve_eth: BigDecimal::zero(),
            reserve_usd: BigDecimal::zero(),
            tracked_reserve_eth: BigDecimal::zero(),
            token0_price: BigDecimal::zero(),
            token1_price: BigDecimal::zero(),
            volume_token0: BigDecimal::zero(),
            volume_token1: BigDecimal::zero(),
            volume_usd: BigDecimal::zero(),
            untracked_volume_usd: BigDecimal::zero(),
            tx_count: 0,
            liquidity_provider_count: 0,
            created_at_timestamp: timestamp,
            created_at_block_number: block_number,
        }
    }
}

/// Ordered ids of the sub-events of one kind within a transaction.
///
/// Updates return a new list and leave the receiver untouched; clones share
/// storage until one of them is changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventIds(Arc<Vec<String>>);

impl EventIds {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn appended(&self, id: String) -> Self {
        let mut next = self.clone();
        Arc::make_mut(&mut next.0).push(id);
        next
    }

    pub fn without_last(&self) -> Self {
        let mut next = self.clone();
        Arc::make_mut(&mut next.0).pop();
        next
    }

    /// Replace the trailing id, or append when the list is empty
    pub fn with_last_replaced(&self, id: String) -> Self {
        let mut next = self.clone();
        let ids = Arc::make_mut(&mut next.0);
        match ids.last_mut() {
            Some(last) => *last = id,
            None => ids.push(id),
        }
        next
    }
}

impl<S: Into<String>> FromIterator<S> for EventIds {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(Arc::new(iter.into_iter().map(Into::into).collect()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub block_number: u64,
    pub timestamp: u64,
    pub mints: EventIds,
    pub burns: EventIds,
    pub swaps: EventIds,
}

impl Transaction {
    pub fn new(id: &str, block_number: u64, timestamp: u64) -> Self {
        Self {
            id: id.to_string(),
            block_number,
            timestamp,
            mints: EventIds::default(),
            burns: EventIds::default(),
            swaps: EventIds::default(),
        }
    }

    /// Id for the next sub-event appended to `ids`
    pub fn next_event_id(&self, ids: &EventIds) -> String {
        format!("{}-{}", self.id, ids.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MintEvent {
    pub id: String,
    pub transaction: String,
    pub timestamp: u64,
    pub pool: String,
    pub to: String,
    pub liquidity: BigDecimal,
    /// Set by the Mint event; absent while the mint is pending
    pub sender: Option<String>,
    pub amount0: Option<BigDecimal>,
    pub amount1: Option<BigDecimal>,
    pub log_index: Option<u64>,
    pub amount_usd: Option<BigDecimal>,
}

impl MintEvent {
    pub fn is_complete(&self) -> bool {
        self.sender.is_some()
    }
}

/// Progress of a logical burn across its two liquidity-token transfers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurnState {
    /// Tokens reached the pool; the transfer to the zero address is pending
    AwaitingSecondLeg,
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BurnEvent {
    pub id: String,
    pub transaction: String,
    pub timestamp: u64,
    pub pool: String,
    pub liquidity: BigDecimal,
    pub sender: Option<String>,
    pub to: Option<String>,
    pub state: BurnState,
    pub amount0: Option<BigDecimal>,
    pub amount1: Option<BigDecimal>,
    pub log_index: Option<u64>,
    pub amount_usd: Option<BigDecimal>,
    /// Protocol fee recipient of a fee mint folded into this burn
    pub fee_to: Option<String>,
    pub fee_liquidity: Option<BigDecimal>,
}

impl BurnEvent {
    pub fn new(id: String, transaction: &Transaction, pool: &str, liquidity: BigDecimal) -> Self {
        Self {
            id,
            transaction: transaction.id.clone(),
            timestamp: transaction.timestamp,
            pool: pool.to_string(),
            liquidity,
            sender: None,
            to: None,
            state: BurnState::Closed,
            amount0: None,
            amount1: None,
            log_index: None,
            amount_usd: None,
            fee_to: None,
            fee_liquidity: None,
        }
    }

    pub fn needs_complete(&self) -> bool {
        self.state == BurnState::AwaitingSecondLeg
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwapEvent {
    pub id: String,
    pub transaction: String,
    pub timestamp: u64,
    pub pool: String,
    pub sender: String,
    /// Transaction sender
    pub from: String,
    pub to: String,
    pub amount0_in: BigDecimal,
    pub amount1_in: BigDecimal,
    pub amount0_out: BigDecimal,
    pub amount1_out: BigDecimal,
    pub log_index: u64,
    pub amount_usd: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub usd_swapped: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserPosition {
    pub id: String,
    pub user: String,
    pub pool: String,
    pub liquidity: BigDecimal,
    pub amount0: BigDecimal,
    pub amount1: BigDecimal,
}

impl UserPosition {
    pub fn key(user: &str, pool: &str) -> String {
        format!("{user}-{pool}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolDayData {
    pub id: String,
    pub date: u64,
    pub pool: String,
    pub token0: String,
    pub token1: String,
    pub reserve0: BigDecimal,
    pub reserve1: BigDecimal,
    pub total_supply: BigDecimal,
    pub reserve_usd: BigDecimal,
    pub daily_volume_token0: BigDecimal,
    pub daily_volume_token1: BigDecimal,
    pub daily_volume_usd: BigDecimal,
    pub daily_txns: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolHourData {
    pub id: String,
    pub hour_start_unix: u64,
    pub pool: String,
    pub reserve0: BigDecimal,
    pub reserve1: BigDecimal,
    pub total_supply: BigDecimal,
    pub reserve_usd: BigDecimal,
    pub hourly_volume_token0: BigDecimal,
    pub hourly_volume_token1: BigDecimal,
    pub hourly_volume_usd: BigDecimal,
    pub hourly_txns: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenDayData {
    pub id: String,
    pub date: u64,
    pub token: String,
    pub price_usd: BigDecimal,
    pub total_liquidity_token: BigDecimal,
    pub total_liquidity_eth: BigDecimal,
    pub total_liquidity_usd: BigDecimal,
    pub daily_volume_token: BigDecimal,
    pub daily_volume_eth: BigDecimal,
    pub daily_volume_usd: BigDecimal,
    pub daily_txns: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalDayData {
    pub id: String,
    pub date: u64,
    pub daily_volume_usd: BigDecimal,
    pub daily_volume_eth: BigDecimal,
    pub daily_volume_untracked: BigDecimal,
    pub total_volume_usd: BigDecimal,
    pub total_volume_eth: BigDecimal,
    pub total_liquidity_usd: BigDecimal,
    pub total_liquidity_eth: BigDecimal,
    /// Factory transaction count at the last update
    pub tx_count: u64,
    pub daily_txns: u64,
}
