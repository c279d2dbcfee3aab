// Classic Pool Substreams Implementation
//
// Indexes constant-product pools (Uniswap V2 style pairs) deployed by a single
// factory, in two stages:
//
// 1. `map_pool_events` extracts the factory's PairCreated logs and every pool's
//    Transfer / Sync / Mint / Burn / Swap logs, in block log order.
// 2. `Indexer` replays those events against an entity store, rebuilding pools,
//    tokens, provider positions, protocol totals and hourly/daily rollups.
//
// IMPORTANT: Amounts
// ------------------
// Event amounts are emitted in RAW TOKEN UNITS as decimal strings. The indexer
// scales them by each token's decimals; liquidity tokens always use 18.
// Prices are derived in units of the reference asset (WETH) and converted to
// USD through the stablecoin reference pools.

pub mod buckets;
pub mod config;
mod decode;
pub mod entities;
pub mod error;
pub mod events;
mod factory;
pub mod indexer;
pub mod oracle;
pub mod pb;
pub mod pricing;
mod reconcile;
pub mod store;
pub mod tracking;

pub use crate::config::IndexerConfig;
pub use crate::error::{CallReverted, ConfigError, DecodeError, Dropped};
pub use crate::indexer::{BlockSummary, Handled, Indexer};
pub use crate::oracle::{MemoryPoolRegistry, PoolRegistry, StaticTokenOracle, TokenMetadataOracle};
pub use crate::store::{EntityStore, MemoryStore};

use crate::pb::classic::types::v1::{PoolEvent, PoolEvents};
use dex_common::ensure_0x_prefix;
use prost_types::Timestamp;
use substreams::Hex;
use substreams_ethereum::pb::eth::v2 as eth;

// Event signatures (keccak256 hashes)

// Transfer(address indexed from, address indexed to, uint256 value)
const TRANSFER_EVENT_SIG: [u8; 32] =
    hex_literal::hex!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef");

// Sync(uint112 reserve0, uint112 reserve1)
const SYNC_EVENT_SIG: [u8; 32] =
    hex_literal::hex!("1c411e9a96e071241c2f21f7726b17ae89e3cab4c78be50e062b03a9fffbbad1");

// Mint(address indexed sender, uint amount0, uint amount1)
const MINT_EVENT_SIG: [u8; 32] =
    hex_literal::hex!("4c209b5fc8ad50758f13e2e1088ba56a560dff690a1c6fef26394f4c03821c4f");

// Burn(address indexed sender, uint amount0, uint amount1, address indexed to)
const BURN_EVENT_SIG: [u8; 32] =
    hex_literal::hex!("dccd412f0b1252819cb1fd330b93224ca42612892bb3f4f789976e6d81936496");

// Swap(address indexed sender, uint amount0In, uint amount1In, uint amount0Out,
//      uint amount1Out, address indexed to)
const SWAP_EVENT_SIG: [u8; 32] =
    hex_literal::hex!("d78ad95fa46c994b6551d0da85fc275fe613ce37657fb8d5e3d130840159d822");

// PairCreated(address indexed token0, address indexed token1, address pair, uint)
const PAIR_CREATED_EVENT_SIG: [u8; 32] =
    hex_literal::hex!("0d3648bd0f6ba80134a33ba9275ac585d9d315f0ad8355cddefde31afa28d0e9");

#[substreams::handlers::map]
pub fn map_pool_events(block: eth::Block) -> Result<PoolEvents, substreams::errors::Error> {
    let timestamp_seconds = block
        .header
        .as_ref()
        .and_then(|header| header.timestamp.as_ref())
        .map(|timestamp| timestamp.seconds)
        .ok_or_else(|| {
            substreams::errors::Error::msg(format!(
                "Block {} missing header or timestamp",
                block.number
            ))
        })?;

    let mut events = vec![];

    for log in block.logs() {
        // Early exit if no topics
        if log.topics().is_empty() {
            continue;
        }

        // Malformed logs decode to None and are skipped
        let payload = match log.topics()[0].as_slice() {
            topic if topic == TRANSFER_EVENT_SIG => decode::decode_transfer(&log),
            topic if topic == SYNC_EVENT_SIG => decode::decode_sync(&log),
            topic if topic == MINT_EVENT_SIG => decode::decode_mint(&log),
            topic if topic == BURN_EVENT_SIG => decode::decode_burn(&log),
            topic if topic == SWAP_EVENT_SIG => decode::decode_swap(&log),
            topic if topic == PAIR_CREATED_EVENT_SIG => decode::decode_pool_created(&log),
            _ => None,
        };

        let Some(payload) = payload else {
            continue;
        };

        events.push(PoolEvent {
            block_number: block.number,
            timestamp: Some(Timestamp {
                seconds: timestamp_seconds,
                nanos: 0,
            }),
            transaction_hash: ensure_0x_prefix(&Hex(&log.receipt.transaction.hash).to_string()),
            transaction_from: ensure_0x_prefix(&Hex(&log.receipt.transaction.from).to_string()),
            log_index: log.log.index as u64,
            address: ensure_0x_prefix(&Hex(&log.log.address).to_string()),
            r#type: Some(payload),
        });
    }

    Ok(PoolEvents { events })
}
