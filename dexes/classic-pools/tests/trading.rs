mod common;

use common::*;
use coinranking_classic_pools::buckets::{bucket_id, bucket_index, DAY_SECONDS, HOUR_SECONDS};
use coinranking_classic_pools::entities::{
    GlobalDayData, Pool, PoolDayData, PoolHourData, SwapEvent, Token, TokenDayData, Transaction,
    User,
};
use coinranking_classic_pools::events::PoolEvent;
use coinranking_classic_pools::EntityStore;
use substreams::scalar::BigDecimal;

const TIMESTAMP: u64 = 1_700_000_000;

/// 200 USDC in, 0.1 WETH out
fn buy_weth(tape: &mut Tape, transaction: &str) -> PoolEvent {
    tape.swap(transaction, STABLE_POOL, ("200000000", "0"), ("0", "100000000000000000"))
}

/// 200 USDC for 0.1 WETH, then back again, in one transaction
fn round_trip(indexer: &mut TestIndexer, tape: &mut Tape) {
    let events = [
        buy_weth(tape, "0xtrade"),
        tape.swap("0xtrade", STABLE_POOL, ("0", "100000000000000000"), ("200000000", "0")),
    ];
    let summary = indexer.process(&events);
    assert_eq!(summary.applied, 2);
    assert!(summary.dropped.is_empty(), "{:?}", summary.dropped);
}

#[test]
fn whitelisted_swap_counts_average_of_both_sides() {
    let mut indexer = indexer();
    let mut tape = Tape::new(200, TIMESTAMP);
    priced_stable_pool(&mut indexer, &mut tape);

    indexer.process(&[buy_weth(&mut tape, "0xtrade")]);

    // 200 USDC and 0.1 WETH are both worth 200 USD at 2000 USD per WETH
    let swap = indexer.store().load::<SwapEvent>("0xtrade-0").unwrap();
    assert_eq!(swap.amount_usd, dec("200"));
    assert_eq!(swap.amount0_in, dec("200"));
    assert_eq!(swap.amount1_out, dec("0.1"));
    assert_eq!(swap.from, TRADER);
    assert_eq!(swap.sender, ROUTER);

    let totals = factory(&indexer);
    assert_eq!(totals.total_volume_usd, dec("200"));
    assert_eq!(totals.total_volume_eth, dec("0.1"));
    assert_eq!(totals.untracked_volume_usd, dec("200"));
    assert_eq!(totals.tx_count, 1);

    let pool = indexer.store().load::<Pool>(STABLE_POOL).unwrap();
    assert_eq!(pool.volume_usd, dec("200"));
    assert_eq!(pool.volume_token0, dec("200"));
    assert_eq!(pool.volume_token1, dec("0.1"));
    assert_eq!(pool.tx_count, 1);

    let usdc = indexer.store().load::<Token>(USDC).unwrap();
    assert_eq!(usdc.trade_volume, dec("200"));
    assert_eq!(usdc.trade_volume_usd, dec("200"));
    assert_eq!(usdc.tx_count, 1);
}

#[test]
fn swaps_append_to_transaction_and_credit_trader() {
    let mut indexer = indexer();
    let mut tape = Tape::new(200, TIMESTAMP);
    priced_stable_pool(&mut indexer, &mut tape);

    round_trip(&mut indexer, &mut tape);

    let transaction = indexer.store().load::<Transaction>("0xtrade").unwrap();
    assert_eq!(transaction.swaps.iter().collect::<Vec<_>>(), vec!["0xtrade-0", "0xtrade-1"]);
    assert_eq!(transaction.block_number, 200);

    let trader = indexer.store().load::<User>(TRADER).unwrap();
    assert_eq!(trader.usd_swapped, dec("400"));
}

#[test]
fn swaps_in_same_bucket_accumulate() {
    let mut indexer = indexer();
    let mut tape = Tape::new(200, TIMESTAMP);
    priced_stable_pool(&mut indexer, &mut tape);

    round_trip(&mut indexer, &mut tape);

    let hour = bucket_index(TIMESTAMP, HOUR_SECONDS);
    let day = bucket_index(TIMESTAMP, DAY_SECONDS);

    let pool_hour = indexer
        .store()
        .load::<PoolHourData>(&bucket_id(STABLE_POOL, hour))
        .unwrap();
    assert_eq!(pool_hour.hour_start_unix, hour * HOUR_SECONDS);
    assert_eq!(pool_hour.hourly_txns, 2);
    assert_eq!(pool_hour.hourly_volume_usd, dec("400"));
    assert_eq!(pool_hour.hourly_volume_token1, dec("0.2"));

    let pool_day = indexer
        .store()
        .load::<PoolDayData>(&bucket_id(STABLE_POOL, day))
        .unwrap();
    assert_eq!(pool_day.date, day * DAY_SECONDS);
    assert_eq!(pool_day.daily_txns, 2);
    assert_eq!(pool_day.daily_volume_token0, dec("400"));
    assert_eq!(pool_day.reserve0, dec("2000"));

    let usdc_day = indexer
        .store()
        .load::<TokenDayData>(&bucket_id(USDC, day))
        .unwrap();
    assert_eq!(usdc_day.daily_txns, 2);
    assert_eq!(usdc_day.price_usd, dec("1"));
    assert_eq!(usdc_day.daily_volume_token, dec("400"));
    assert_eq!(usdc_day.daily_volume_usd, dec("400"));

    let global = indexer
        .store()
        .load::<GlobalDayData>(&bucket_id(&indexer.config().factory_address, day))
        .unwrap();
    assert_eq!(global.daily_txns, 2);
    assert_eq!(global.daily_volume_usd, dec("400"));
    assert_eq!(global.daily_volume_eth, dec("0.2"));
    assert_eq!(global.tx_count, 2);
    assert_eq!(global.total_volume_usd, dec("400"));
}

#[test]
fn next_hour_starts_a_fresh_bucket() {
    let mut indexer = indexer();
    let mut tape = Tape::new(200, TIMESTAMP);
    priced_stable_pool(&mut indexer, &mut tape);
    round_trip(&mut indexer, &mut tape);

    let mut later = Tape::new(201, TIMESTAMP + HOUR_SECONDS);
    indexer.process(&[buy_weth(&mut later, "0xlater")]);

    let next_hour = bucket_index(TIMESTAMP + HOUR_SECONDS, HOUR_SECONDS);
    let pool_hour = indexer
        .store()
        .load::<PoolHourData>(&bucket_id(STABLE_POOL, next_hour))
        .unwrap();
    assert_eq!(pool_hour.hourly_txns, 1);
    assert_eq!(pool_hour.hourly_volume_usd, dec("200"));
}

#[test]
fn rebasing_pool_falls_back_to_derived_value() {
    let mut indexer = indexer();
    let mut tape = Tape::new(200, TIMESTAMP);
    priced_stable_pool(&mut indexer, &mut tape);

    let rebasing = indexer.config().untracked_pools[0].clone();
    let events = [
        tape.pool_created(TOKEN, WETH, &rebasing),
        tape.sync("0xr", &rebasing, "10000000000000000000", "20000000000000000000"),
        tape.sync("0xr", &rebasing, "10000000000000000000", "20000000000000000000"),
        tape.swap("0xr", &rebasing, ("1000000000000000000", "0"), ("0", "2000000000000000000")),
    ];
    let summary = indexer.process(&events);
    assert!(summary.dropped.is_empty(), "{:?}", summary.dropped);

    // (1 TKN * 2 + 2 WETH * 1) / 2 = 2 ETH
    let swap = indexer.store().load::<SwapEvent>("0xr-0").unwrap();
    assert_eq!(swap.amount_usd, dec("4000"));

    let pool = indexer.store().load::<Pool>(&rebasing).unwrap();
    assert_eq!(pool.volume_usd, BigDecimal::zero());
    assert_eq!(pool.untracked_volume_usd, dec("4000"));

    let totals = factory(&indexer);
    assert_eq!(totals.total_volume_usd, BigDecimal::zero());
    assert_eq!(totals.untracked_volume_usd, dec("4000"));
}

#[test]
fn swap_before_factory_exists_is_dropped() {
    use coinranking_classic_pools::entities::{EntityKind, Factory};

    let mut indexer = indexer();
    let mut tape = Tape::new(200, TIMESTAMP);
    priced_stable_pool(&mut indexer, &mut tape);
    let factory_id = indexer.config().factory_address.clone();
    indexer.store_mut().remove(EntityKind::Factory, &factory_id);

    let summary = indexer.process(&[buy_weth(&mut tape, "0xtrade")]);

    assert_eq!(summary.dropped.len(), 1);
    assert!(indexer.store().load::<Factory>(&factory_id).is_none());
    // pool volume was committed before the abort
    let pool = indexer.store().load::<Pool>(STABLE_POOL).unwrap();
    assert_eq!(pool.volume_usd, dec("200"));
    assert!(indexer.store().load::<SwapEvent>("0xtrade-0").is_none());
}
