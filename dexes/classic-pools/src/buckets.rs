// ─────────────────────────────────────────────────────────────────────────────
// Hourly and daily rollups per pool, per token and protocol-wide
// ─────────────────────────────────────────────────────────────────────────────

use crate::entities::{
    Factory, GlobalDayData, Pool, PoolDayData, PoolHourData, Token, TokenDayData,
};
use crate::store::EntityStore;
use substreams::scalar::BigDecimal;

/// Duration of a daily bucket in seconds
pub const DAY_SECONDS: u64 = 86_400;

/// Duration of an hourly bucket in seconds
pub const HOUR_SECONDS: u64 = 3_600;

#[inline]
pub fn bucket_index(timestamp: u64, bucket_seconds: u64) -> u64 {
    timestamp / bucket_seconds
}

#[inline]
pub fn bucket_id(entity: &str, index: u64) -> String {
    format!("{entity}-{index}")
}

pub fn update_pool_day_data<S: EntityStore>(
    store: &mut S,
    pool: &Pool,
    timestamp: u64,
) -> PoolDayData {
    let day = bucket_index(timestamp, DAY_SECONDS);
    let id = bucket_id(&pool.id, day);

    let mut bucket = store.load::<PoolDayData>(&id).unwrap_or_else(|| PoolDayData {
        id,
        date: day * DAY_SECONDS,
        pool: pool.id.clone(),
        token0: pool.token0.clone(),
        token1: pool.token1.clone(),
        reserve0: BigDecimal::zero(),
        reserve1: BigDecimal::zero(),
        total_supply: BigDecimal::zero(),
        reserve_usd: BigDecimal::zero(),
        daily_volume_token0: BigDecimal::zero(),
        daily_volume_token1: BigDecimal::zero(),
        daily_volume_usd: BigDecimal::zero(),
        daily_txns: 0,
    });

    bucket.reserve0 = pool.reserve0.clone();
    bucket.reserve1 = pool.reserve1.clone();
    bucket.total_supply = pool.total_supply.clone();
    bucket.reserve_usd = pool.reserve_usd.clone();
    bucket.daily_txns += 1;
    store.save(&bucket);

    bucket
}

pub fn update_pool_hour_data<S: EntityStore>(
    store: &mut S,
    pool: &Pool,
    timestamp: u64,
) -> PoolHourData {
    let hour = bucket_index(timestamp, HOUR_SECONDS);
    let id = bucket_id(&pool.id, hour);

    let mut bucket = store.load::<PoolHourData>(&id).unwrap_or_else(|| PoolHourData {
        id,
        hour_start_unix: hour * HOUR_SECONDS,
        pool: pool.id.clone(),
        reserve0: BigDecimal::zero(),
        reserve1: BigDecimal::zero(),
        total_supply: BigDecimal::zero(),
        reserve_usd: BigDecimal::zero(),
        hourly_volume_token0: BigDecimal::zero(),
        hourly_volume_token1: BigDecimal::zero(),
        hourly_volume_usd: BigDecimal::zero(),
        hourly_txns: 0,
    });

    bucket.reserve0 = pool.reserve0.clone();
    bucket.reserve1 = pool.reserve1.clone();
    bucket.total_supply = pool.total_supply.clone();
    bucket.reserve_usd = pool.reserve_usd.clone();
    bucket.hourly_txns += 1;
    store.save(&bucket);

    bucket
}

pub fn update_token_day_data<S: EntityStore>(
    store: &mut S,
    token: &Token,
    eth_price: &BigDecimal,
    timestamp: u64,
) -> TokenDayData {
    let day = bucket_index(timestamp, DAY_SECONDS);
    let id = bucket_id(&token.id, day);

    let mut bucket = store.load::<TokenDayData>(&id).unwrap_or_else(|| TokenDayData {
        id,
        date: day * DAY_SECONDS,
        token: token.id.clone(),
        price_usd: BigDecimal::zero(),
        total_liquidity_token: BigDecimal::zero(),
        total_liquidity_eth: BigDecimal::zero(),
        total_liquidity_usd: BigDecimal::zero(),
        daily_volume_token: BigDecimal::zero(),
        daily_volume_eth: BigDecimal::zero(),
        daily_volume_usd: BigDecimal::zero(),
        daily_txns: 0,
    });

    bucket.price_usd = token.derived_eth.clone() * eth_price.clone();
    bucket.total_liquidity_token = token.total_liquidity.clone();
    bucket.total_liquidity_eth = token.total_liquidity.clone() * token.derived_eth.clone();
    bucket.total_liquidity_usd = bucket.total_liquidity_eth.clone() * eth_price.clone();
    bucket.daily_txns += 1;
    store.save(&bucket);

    bucket
}

/// Protocol-wide day bucket, keyed by the factory address. Without a factory
/// record the snapshot fields stay at their previous values.
pub fn update_global_day_data<S: EntityStore>(
    store: &mut S,
    factory_id: &str,
    factory: Option<&Factory>,
    timestamp: u64,
) -> GlobalDayData {
    let day = bucket_index(timestamp, DAY_SECONDS);
    let id = bucket_id(factory_id, day);

    let mut bucket = store.load::<GlobalDayData>(&id).unwrap_or_else(|| GlobalDayData {
        id,
        date: day * DAY_SECONDS,
        daily_volume_usd: BigDecimal::zero(),
        daily_volume_eth: BigDecimal::zero(),
        daily_volume_untracked: BigDecimal::zero(),
        total_volume_usd: BigDecimal::zero(),
        total_volume_eth: BigDecimal::zero(),
        total_liquidity_usd: BigDecimal::zero(),
        total_liquidity_eth: BigDecimal::zero(),
        tx_count: 0,
        daily_txns: 0,
    });

    if let Some(factory) = factory {
        bucket.total_volume_usd = factory.total_volume_usd.clone();
        bucket.total_volume_eth = factory.total_volume_eth.clone();
        bucket.total_liquidity_usd = factory.total_liquidity_usd.clone();
        bucket.total_liquidity_eth = factory.total_liquidity_eth.clone();
        bucket.tx_count = factory.tx_count;
    }
    bucket.daily_txns += 1;
    store.save(&bucket);

    bucket
}

/// Every bucket touched by one pool event
#[derive(Debug, Clone)]
pub struct Buckets {
    pub pool_day: PoolDayData,
    pub pool_hour: PoolHourData,
    pub token0_day: TokenDayData,
    pub token1_day: TokenDayData,
    pub global_day: GlobalDayData,
}

/// Per-swap deltas accumulated onto the period buckets
#[derive(Debug, Clone)]
pub struct SwapVolume {
    pub amount0: BigDecimal,
    pub amount1: BigDecimal,
    pub tracked_usd: BigDecimal,
    pub tracked_eth: BigDecimal,
    pub untracked_usd: BigDecimal,
}

/// Refresh the pool, token and global buckets for an event at `timestamp`
pub fn update_buckets<S: EntityStore>(
    store: &mut S,
    pool: &Pool,
    token0: &Token,
    token1: &Token,
    factory_id: &str,
    factory: Option<&Factory>,
    eth_price: &BigDecimal,
    timestamp: u64,
) -> Buckets {
    Buckets {
        pool_day: update_pool_day_data(store, pool, timestamp),
        pool_hour: update_pool_hour_data(store, pool, timestamp),
        global_day: update_global_day_data(store, factory_id, factory, timestamp),
        token0_day: update_token_day_data(store, token0, eth_price, timestamp),
        token1_day: update_token_day_data(store, token1, eth_price, timestamp),
    }
}

impl Buckets {
    /// Add a swap's volume to the period deltas and persist the buckets
    pub fn record_swap<S: EntityStore>(
        mut self,
        store: &mut S,
        volume: &SwapVolume,
        token0: &Token,
        token1: &Token,
        eth_price: &BigDecimal,
    ) -> Self {
        let global = &mut self.global_day;
        global.daily_volume_usd = global.daily_volume_usd.clone() + volume.tracked_usd.clone();
        global.daily_volume_eth = global.daily_volume_eth.clone() + volume.tracked_eth.clone();
        global.daily_volume_untracked =
            global.daily_volume_untracked.clone() + volume.untracked_usd.clone();
        store.save(&*global);

        let day = &mut self.pool_day;
        day.daily_volume_token0 = day.daily_volume_token0.clone() + volume.amount0.clone();
        day.daily_volume_token1 = day.daily_volume_token1.clone() + volume.amount1.clone();
        day.daily_volume_usd = day.daily_volume_usd.clone() + volume.tracked_usd.clone();
        store.save(&*day);

        let hour = &mut self.pool_hour;
        hour.hourly_volume_token0 = hour.hourly_volume_token0.clone() + volume.amount0.clone();
        hour.hourly_volume_token1 = hour.hourly_volume_token1.clone() + volume.amount1.clone();
        hour.hourly_volume_usd = hour.hourly_volume_usd.clone() + volume.tracked_usd.clone();
        store.save(&*hour);

        for (bucket, amount, token) in [
            (&mut self.token0_day, &volume.amount0, token0),
            (&mut self.token1_day, &volume.amount1, token1),
        ] {
            let amount_eth = amount.clone() * token.derived_eth.clone();
            bucket.daily_volume_token = bucket.daily_volume_token.clone() + amount.clone();
            bucket.daily_volume_eth = bucket.daily_volume_eth.clone() + amount_eth.clone();
            bucket.daily_volume_usd =
                bucket.daily_volume_usd.clone() + amount_eth * eth_price.clone();
            store.save(&*bucket);
        }

        self
    }
}
