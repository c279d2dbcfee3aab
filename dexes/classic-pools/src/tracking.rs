// ─────────────────────────────────────────────────────────────────────────────
// Tracked volume and liquidity: how much of a trade or pool counts globally
// ─────────────────────────────────────────────────────────────────────────────

use crate::config::IndexerConfig;
use crate::entities::{Pool, Token};
use substreams::scalar::BigDecimal;

/// Which side(s) of a pool are whitelisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coverage {
    Both,
    Token0,
    Token1,
    Neither,
}

impl Coverage {
    fn of(config: &IndexerConfig, token0: &Token, token1: &Token) -> Self {
        match (config.is_whitelisted(&token0.id), config.is_whitelisted(&token1.id)) {
            (true, true) => Coverage::Both,
            (true, false) => Coverage::Token0,
            (false, true) => Coverage::Token1,
            (false, false) => Coverage::Neither,
        }
    }
}

/// USD value of a trade that counts towards tracked volume.
///
/// Rebasing pools never count. Pools with few liquidity providers must first
/// hold enough whitelisted reserve value; below that floor nothing counts.
/// Otherwise both-whitelisted trades count the average of both sides, a single
/// whitelisted side counts alone, and unlisted pairs count nothing.
pub fn tracked_volume_usd(
    config: &IndexerConfig,
    amount0: &BigDecimal,
    token0: &Token,
    amount1: &BigDecimal,
    token1: &Token,
    pool: &Pool,
    eth_price: &BigDecimal,
) -> BigDecimal {
    if config.is_untracked_pool(&pool.id) {
        return BigDecimal::zero();
    }

    let price0 = token0.derived_eth.clone() * eth_price.clone();
    let price1 = token1.derived_eth.clone() * eth_price.clone();
    let coverage = Coverage::of(config, token0, token1);

    if pool.liquidity_provider_count < config.lp_count_threshold {
        let reserve0_usd = pool.reserve0.clone() * price0.clone();
        let reserve1_usd = pool.reserve1.clone() * price1.clone();
        let floor = &config.minimum_usd_threshold_new_pools;

        let below_floor = match coverage {
            Coverage::Both => &(reserve0_usd + reserve1_usd) < floor,
            Coverage::Token0 => &(reserve0_usd * BigDecimal::from(2)) < floor,
            Coverage::Token1 => &(reserve1_usd * BigDecimal::from(2)) < floor,
            Coverage::Neither => false,
        };
        if below_floor {
            return BigDecimal::zero();
        }
    }

    match coverage {
        Coverage::Both => {
            (amount0.clone() * price0 + amount1.clone() * price1) / BigDecimal::from(2)
        }
        Coverage::Token0 => amount0.clone() * price0,
        Coverage::Token1 => amount1.clone() * price1,
        Coverage::Neither => BigDecimal::zero(),
    }
}

/// USD value of pool reserves that counts towards tracked liquidity.
///
/// Both whitelisted sides are summed; a single whitelisted side is doubled.
pub fn tracked_liquidity_usd(
    config: &IndexerConfig,
    amount0: &BigDecimal,
    token0: &Token,
    amount1: &BigDecimal,
    token1: &Token,
    eth_price: &BigDecimal,
) -> BigDecimal {
    let price0 = token0.derived_eth.clone() * eth_price.clone();
    let price1 = token1.derived_eth.clone() * eth_price.clone();

    match Coverage::of(config, token0, token1) {
        Coverage::Both => amount0.clone() * price0 + amount1.clone() * price1,
        Coverage::Token0 => amount0.clone() * price0 * BigDecimal::from(2),
        Coverage::Token1 => amount1.clone() * price1 * BigDecimal::from(2),
        Coverage::Neither => BigDecimal::zero(),
    }
}
