// ─────────────────────────────────────────────────────────────────────────────
// On-chain lookups: token metadata and the factory's pool registry
// ─────────────────────────────────────────────────────────────────────────────

use crate::config::IndexerConfig;
use crate::error::CallReverted;
use std::collections::HashMap;
use substreams::log;
use substreams::scalar::BigInt;

/// Returned by bytes32 getters of broken tokens that expose no real value
const NULL_BYTES32_VALUE: [u8; 32] = {
    let mut value = [0u8; 32];
    value[31] = 1;
    value
};

/// Fallback for undecodable symbols and names
pub const UNKNOWN: &str = "unknown";

/// ERC-20 getters of a token contract. Every call may revert.
pub trait TokenMetadataOracle {
    fn symbol(&self, token: &str) -> Result<String, CallReverted>;

    /// `symbol()` for tokens declaring it as `bytes32`
    fn symbol_bytes32(&self, token: &str) -> Result<[u8; 32], CallReverted>;

    fn name(&self, token: &str) -> Result<String, CallReverted>;

    /// `name()` for tokens declaring it as `bytes32`
    fn name_bytes32(&self, token: &str) -> Result<[u8; 32], CallReverted>;

    fn decimals(&self, token: &str) -> Result<BigInt, CallReverted>;

    fn total_supply(&self, token: &str) -> Result<BigInt, CallReverted>;
}

/// The factory's `getPool(tokenA, tokenB)` lookup
pub trait PoolRegistry {
    fn pool_for(&self, token_a: &str, token_b: &str) -> Option<String>;

    /// Called when the factory announces a pool; on-chain registries already
    /// know about it and can ignore the notification.
    fn record_pool(&mut self, _token0: &str, _token1: &str, _pool: &str) {}
}

fn decode_bytes32(value: &[u8; 32]) -> Option<String> {
    if value == &NULL_BYTES32_VALUE {
        return None;
    }

    let end = value.iter().rposition(|byte| *byte != 0).map_or(0, |index| index + 1);
    Some(String::from_utf8_lossy(&value[..end]).into_owned())
}

/// Token symbol, trying the string ABI, then the bytes32 ABI, then `unknown`
pub fn fetch_token_symbol<M: TokenMetadataOracle>(oracle: &M, token: &str) -> String {
    match oracle.symbol(token) {
        Ok(symbol) => symbol,
        Err(_) => oracle
            .symbol_bytes32(token)
            .ok()
            .and_then(|value| decode_bytes32(&value))
            .unwrap_or_else(|| UNKNOWN.to_string()),
    }
}

/// Token name, with the same fallbacks as [`fetch_token_symbol`]
pub fn fetch_token_name<M: TokenMetadataOracle>(oracle: &M, token: &str) -> String {
    match oracle.name(token) {
        Ok(name) => name,
        Err(_) => oracle
            .name_bytes32(token)
            .ok()
            .and_then(|value| decode_bytes32(&value))
            .unwrap_or_else(|| UNKNOWN.to_string()),
    }
}

/// Total supply, zero when the call reverts or the token is known to overflow
pub fn fetch_token_total_supply<M: TokenMetadataOracle>(
    oracle: &M,
    config: &IndexerConfig,
    token: &str,
) -> BigInt {
    if config.skips_total_supply(token) {
        return BigInt::zero();
    }

    oracle.total_supply(token).unwrap_or_else(|_| BigInt::zero())
}

/// Token decimals; `None` when the call reverts or returns an implausible value
pub fn fetch_token_decimals<M: TokenMetadataOracle>(oracle: &M, token: &str) -> Option<u64> {
    match oracle.decimals(token) {
        Ok(decimals) if decimals < BigInt::from(255) && decimals >= BigInt::zero() => {
            Some(decimals.to_u64())
        }
        Ok(decimals) => {
            log::info!("token {} reports unusable decimals {}", token, decimals);
            None
        }
        Err(_) => None,
    }
}

/// Canned answers for the ERC-20 getters of one token. `None` reverts.
#[derive(Debug, Clone, Default)]
pub struct TokenMetadata {
    pub symbol: Option<String>,
    pub symbol_bytes32: Option<[u8; 32]>,
    pub name: Option<String>,
    pub name_bytes32: Option<[u8; 32]>,
    pub decimals: Option<BigInt>,
    pub total_supply: Option<BigInt>,
}

impl TokenMetadata {
    pub fn erc20(symbol: &str, name: &str, decimals: u64, total_supply: BigInt) -> Self {
        Self {
            symbol: Some(symbol.to_string()),
            name: Some(name.to_string()),
            decimals: Some(BigInt::from(decimals)),
            total_supply: Some(total_supply),
            ..Default::default()
        }
    }
}

/// Metadata oracle answering from a preloaded table, for replays and tests
#[derive(Debug, Clone, Default)]
pub struct StaticTokenOracle {
    tokens: HashMap<String, TokenMetadata>,
}

impl StaticTokenOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: &str, metadata: TokenMetadata) -> Self {
        self.insert(token, metadata);
        self
    }

    pub fn insert(&mut self, token: &str, metadata: TokenMetadata) {
        self.tokens.insert(token.to_lowercase(), metadata);
    }

    fn get<T: Clone>(
        &self,
        token: &str,
        field: impl Fn(&TokenMetadata) -> &Option<T>,
    ) -> Result<T, CallReverted> {
        self.tokens
            .get(token)
            .and_then(|metadata| field(metadata).clone())
            .ok_or(CallReverted)
    }
}

impl TokenMetadataOracle for StaticTokenOracle {
    fn symbol(&self, token: &str) -> Result<String, CallReverted> {
        self.get(token, |metadata| &metadata.symbol)
    }

    fn symbol_bytes32(&self, token: &str) -> Result<[u8; 32], CallReverted> {
        self.get(token, |metadata| &metadata.symbol_bytes32)
    }

    fn name(&self, token: &str) -> Result<String, CallReverted> {
        self.get(token, |metadata| &metadata.name)
    }

    fn name_bytes32(&self, token: &str) -> Result<[u8; 32], CallReverted> {
        self.get(token, |metadata| &metadata.name_bytes32)
    }

    fn decimals(&self, token: &str) -> Result<BigInt, CallReverted> {
        self.get(token, |metadata| &metadata.decimals)
    }

    fn total_supply(&self, token: &str) -> Result<BigInt, CallReverted> {
        self.get(token, |metadata| &metadata.total_supply)
    }
}

/// Pool registry built from observed pool-creation events
#[derive(Debug, Clone, Default)]
pub struct MemoryPoolRegistry {
    pools: HashMap<(String, String), String>,
}

impl MemoryPoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(token_a: &str, token_b: &str) -> (String, String) {
        if token_a <= token_b {
            (token_a.to_string(), token_b.to_string())
        } else {
            (token_b.to_string(), token_a.to_string())
        }
    }
}

impl PoolRegistry for MemoryPoolRegistry {
    fn pool_for(&self, token_a: &str, token_b: &str) -> Option<String> {
        self.pools.get(&Self::key(token_a, token_b)).cloned()
    }

    fn record_pool(&mut self, token0: &str, token1: &str, pool: &str) {
        self.pools.insert(Self::key(token0, token1), pool.to_string());
    }
}
