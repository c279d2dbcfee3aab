// ─────────────────────────────────────────────────────────────────────────────
// Price discovery: token prices in the reference asset, reference asset in USD
// ─────────────────────────────────────────────────────────────────────────────

use crate::config::IndexerConfig;
use crate::entities::{Pool, Token};
use crate::oracle::PoolRegistry;
use crate::store::EntityStore;
use dex_common::safe_div;
use substreams::log;
use substreams::scalar::BigDecimal;

/// Derived price of `token` in units of the reference asset.
///
/// Walks the whitelist in order and prices the token off the first direct pool
/// whose reference-denominated reserve exceeds the liquidity threshold. Only a
/// single hop is taken; later whitelist entries are never consulted once one
/// qualifies. Returns zero when no whitelist pool qualifies.
pub fn eth_per_token<S: EntityStore, R: PoolRegistry>(
    store: &S,
    registry: &R,
    config: &IndexerConfig,
    token: &Token,
) -> BigDecimal {
    if token.id == config.reference_token {
        return BigDecimal::one();
    }

    for anchor in &config.whitelist {
        let Some(pool_address) = registry.pool_for(&token.id, anchor) else {
            continue;
        };
        let Some(pool) = store.load::<Pool>(&pool_address) else {
            continue;
        };

        if pool.reserve_eth <= config.minimum_liquidity_threshold_eth {
            log::debug!("pool {} is below the liquidity threshold", pool.id);
            continue;
        }

        if pool.token0 == token.id {
            let Some(counterparty) = store.load::<Token>(&pool.token1) else {
                continue;
            };
            log::debug!("pricing {} through {} against {}", token.id, pool.id, counterparty.id);
            // token1 per token * ETH per token1
            return pool.token1_price * counterparty.derived_eth;
        }

        if pool.token1 == token.id {
            let Some(counterparty) = store.load::<Token>(&pool.token0) else {
                continue;
            };
            log::debug!("pricing {} through {} against {}", token.id, pool.id, counterparty.id);
            // token0 per token * ETH per token0
            return pool.token0_price * counterparty.derived_eth;
        }
    }

    BigDecimal::zero()
}

/// Price of the reference asset and its reserve in a stablecoin pool, or
/// `None` when the pool does not hold the reference asset
fn reference_quote(pool: &Pool, reference_token: &str) -> Option<(BigDecimal, BigDecimal)> {
    if pool.token1 == reference_token {
        Some((pool.token0_price.clone(), pool.reserve1.clone()))
    } else if pool.token0 == reference_token {
        Some((pool.token1_price.clone(), pool.reserve0.clone()))
    } else {
        log::info!("stablecoin pool {} does not hold {}", pool.id, reference_token);
        None
    }
}

/// USD price of the reference asset.
///
/// With several stablecoin pools present the spot prices are averaged,
/// weighted by each pool's reference-asset reserve. A single pool's spot price
/// is used as is; without any pool the price is zero.
pub fn reference_price_usd<S: EntityStore>(store: &S, config: &IndexerConfig) -> BigDecimal {
    let quotes: Vec<(BigDecimal, BigDecimal)> = config
        .stablecoin_pools
        .iter()
        .filter_map(|address| store.load::<Pool>(address))
        .filter_map(|pool| reference_quote(&pool, &config.reference_token))
        .collect();

    match quotes.as_slice() {
        [] => BigDecimal::zero(),
        [(price, _)] => price.clone(),
        _ => {
            let total_reserve = quotes
                .iter()
                .fold(BigDecimal::zero(), |total, (_, reserve)| total + reserve.clone());

            quotes.iter().fold(BigDecimal::zero(), |weighted, (price, reserve)| {
                weighted + price.clone() * safe_div(reserve, &total_reserve)
            })
        }
    }
}
