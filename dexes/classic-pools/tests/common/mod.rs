#![allow(dead_code)]

use coinranking_classic_pools::config::{USDC_WETH_POOL, WETH_ADDRESS};
use coinranking_classic_pools::entities::Factory;
use coinranking_classic_pools::events::{
    Burn, EventContext, EventKind, Mint, PoolCreated, PoolEvent, Swap, Sync, Transfer,
};
use coinranking_classic_pools::oracle::TokenMetadata;
use coinranking_classic_pools::{
    EntityStore, Indexer, IndexerConfig, MemoryPoolRegistry, MemoryStore, StaticTokenOracle,
};
use std::str::FromStr;
use substreams::scalar::{BigDecimal, BigInt};

pub const WETH: &str = WETH_ADDRESS;
pub const USDC: &str = "0x700722d24f9256be288f56449e8ab1d27c4a70ca";
pub const STABLE_POOL: &str = USDC_WETH_POOL;
pub const TOKEN: &str = "0x1111111111111111111111111111111111111111";
pub const OTHER: &str = "0x2222222222222222222222222222222222222222";
pub const TOKEN_POOL: &str = "0x00000000000000000000000000000000000000a1";
pub const ZERO: &str = "0x0000000000000000000000000000000000000000";
pub const LP: &str = "0x00000000000000000000000000000000000000b1";
pub const ROUTER: &str = "0x00000000000000000000000000000000000000b2";
pub const FEE_TO: &str = "0x00000000000000000000000000000000000000b3";
pub const TRADER: &str = "0x00000000000000000000000000000000000000b4";

pub type TestIndexer = Indexer<MemoryStore, StaticTokenOracle, MemoryPoolRegistry>;

pub fn dec(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap()
}

pub fn raw(value: &str) -> BigInt {
    BigInt::from_str(value).unwrap()
}

pub fn oracle() -> StaticTokenOracle {
    StaticTokenOracle::new()
        .with_token(
            WETH,
            TokenMetadata::erc20("WETH", "Wrapped Ether", 18, raw("1000000000000000000000")),
        )
        .with_token(USDC, TokenMetadata::erc20("USDC", "USD Coin", 6, raw("1000000000000")))
        .with_token(TOKEN, TokenMetadata::erc20("TKN", "Token", 18, raw("5000000000000000000000")))
        .with_token(OTHER, TokenMetadata::erc20("OTH", "Other", 18, raw("5000000000000000000000")))
}

pub fn indexer() -> TestIndexer {
    Indexer::new(
        IndexerConfig::default(),
        MemoryStore::new(),
        oracle(),
        MemoryPoolRegistry::new(),
    )
    .unwrap()
}

pub fn factory(indexer: &TestIndexer) -> Factory {
    indexer
        .store()
        .load::<Factory>(&indexer.config().factory_address)
        .unwrap()
}

/// Hands out events in chain order within one block
pub struct Tape {
    pub block_number: u64,
    pub timestamp: u64,
    log_index: u64,
}

impl Tape {
    pub fn new(block_number: u64, timestamp: u64) -> Self {
        Self {
            block_number,
            timestamp,
            log_index: 0,
        }
    }

    pub fn event(&mut self, transaction: &str, address: &str, kind: EventKind) -> PoolEvent {
        let event = PoolEvent {
            context: EventContext {
                block_number: self.block_number,
                timestamp: self.timestamp,
                transaction_hash: transaction.to_string(),
                transaction_from: TRADER.to_string(),
                log_index: self.log_index,
                address: address.to_string(),
            },
            kind,
        };
        self.log_index += 1;
        event
    }

    pub fn pool_created(&mut self, token0: &str, token1: &str, pool: &str) -> PoolEvent {
        let factory = IndexerConfig::default().factory_address;
        self.event(
            "0xcreate",
            &factory,
            EventKind::PoolCreated(PoolCreated {
                token0: token0.to_string(),
                token1: token1.to_string(),
                pool: pool.to_string(),
            }),
        )
    }

    pub fn transfer(
        &mut self,
        transaction: &str,
        pool: &str,
        from: &str,
        to: &str,
        value: &str,
    ) -> PoolEvent {
        self.event(
            transaction,
            pool,
            EventKind::Transfer(Transfer {
                from: from.to_string(),
                to: to.to_string(),
                value: raw(value),
            }),
        )
    }

    pub fn sync(
        &mut self,
        transaction: &str,
        pool: &str,
        reserve0: &str,
        reserve1: &str,
    ) -> PoolEvent {
        self.event(
            transaction,
            pool,
            EventKind::Sync(Sync {
                reserve0: raw(reserve0),
                reserve1: raw(reserve1),
            }),
        )
    }

    pub fn mint(
        &mut self,
        transaction: &str,
        pool: &str,
        amount0: &str,
        amount1: &str,
    ) -> PoolEvent {
        self.event(
            transaction,
            pool,
            EventKind::Mint(Mint {
                sender: ROUTER.to_string(),
                amount0: raw(amount0),
                amount1: raw(amount1),
            }),
        )
    }

    pub fn burn(
        &mut self,
        transaction: &str,
        pool: &str,
        amount0: &str,
        amount1: &str,
    ) -> PoolEvent {
        self.event(
            transaction,
            pool,
            EventKind::Burn(Burn {
                sender: ROUTER.to_string(),
                amount0: raw(amount0),
                amount1: raw(amount1),
                to: LP.to_string(),
            }),
        )
    }

    pub fn swap(
        &mut self,
        transaction: &str,
        pool: &str,
        amounts_in: (&str, &str),
        amounts_out: (&str, &str),
    ) -> PoolEvent {
        self.event(
            transaction,
            pool,
            EventKind::Swap(Swap {
                sender: ROUTER.to_string(),
                amount0_in: raw(amounts_in.0),
                amount1_in: raw(amounts_in.1),
                amount0_out: raw(amounts_out.0),
                amount1_out: raw(amounts_out.1),
                to: TRADER.to_string(),
            }),
        )
    }
}

/// Registers the USDC/WETH reference pool and prices WETH at 2000 USD.
///
/// Price discovery reads the reserve value stored by the previous sync, so
/// the second sync is the first one to price USDC.
pub fn priced_stable_pool(indexer: &mut TestIndexer, tape: &mut Tape) {
    let events = [
        tape.pool_created(USDC, WETH, STABLE_POOL),
        tape.sync("0xseed", STABLE_POOL, "2000000000", "1000000000000000000"),
        tape.sync("0xseed", STABLE_POOL, "2000000000", "1000000000000000000"),
    ];
    let summary = indexer.process(&events);
    assert!(summary.dropped.is_empty(), "{:?}", summary.dropped);
}
