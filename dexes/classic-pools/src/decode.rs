use crate::pb::classic::types::v1::pool_event::{
    Burn, Mint, PoolCreated, Swap, Sync, Transfer, Type,
};
use dex_common::{format_bigint, uint112_to_bigint, uint256_to_bigint, word_to_address};
use substreams_ethereum::block_view::LogView;

/// 32-byte ABI word `index` of the log data
fn data_word<'a>(log: &'a LogView, index: usize) -> &'a [u8] {
    &log.data()[index * 32..(index + 1) * 32]
}

fn uint_word(log: &LogView, index: usize) -> String {
    format_bigint(&uint256_to_bigint(data_word(log, index)))
}

/// Transfer(address indexed from, address indexed to, uint256 value)
pub fn decode_transfer(log: &LogView) -> Option<Type> {
    if log.data().len() < 32 || log.topics().len() < 3 {
        return None;
    }

    Some(Type::Transfer(Transfer {
        from: word_to_address(&log.topics()[1])?,
        to: word_to_address(&log.topics()[2])?,
        value: uint_word(log, 0),
    }))
}

/// Sync(uint112 reserve0, uint112 reserve1)
pub fn decode_sync(log: &LogView) -> Option<Type> {
    // uint112 values are stored in 32-byte words
    if log.data().len() < 64 {
        return None;
    }

    Some(Type::Sync(Sync {
        reserve0: format_bigint(&uint112_to_bigint(data_word(log, 0))),
        reserve1: format_bigint(&uint112_to_bigint(data_word(log, 1))),
    }))
}

/// Mint(address indexed sender, uint amount0, uint amount1)
pub fn decode_mint(log: &LogView) -> Option<Type> {
    if log.data().len() < 64 || log.topics().len() < 2 {
        return None;
    }

    Some(Type::Mint(Mint {
        sender: word_to_address(&log.topics()[1])?,
        amount0: uint_word(log, 0),
        amount1: uint_word(log, 1),
    }))
}

/// Burn(address indexed sender, uint amount0, uint amount1, address indexed to)
pub fn decode_burn(log: &LogView) -> Option<Type> {
    if log.data().len() < 64 || log.topics().len() < 3 {
        return None;
    }

    Some(Type::Burn(Burn {
        sender: word_to_address(&log.topics()[1])?,
        amount0: uint_word(log, 0),
        amount1: uint_word(log, 1),
        to: word_to_address(&log.topics()[2])?,
    }))
}

/// Swap(address indexed sender, uint amount0In, uint amount1In,
///      uint amount0Out, uint amount1Out, address indexed to)
pub fn decode_swap(log: &LogView) -> Option<Type> {
    // 32 + 32 + 32 + 32 = 128 bytes
    if log.data().len() < 128 || log.topics().len() < 3 {
        return None;
    }

    Some(Type::Swap(Swap {
        sender: word_to_address(&log.topics()[1])?,
        amount0_in: uint_word(log, 0),
        amount1_in: uint_word(log, 1),
        amount0_out: uint_word(log, 2),
        amount1_out: uint_word(log, 3),
        to: word_to_address(&log.topics()[2])?,
    }))
}

/// PairCreated(address indexed token0, address indexed token1, address pair, uint)
pub fn decode_pool_created(log: &LogView) -> Option<Type> {
    if log.data().len() < 32 || log.topics().len() < 3 {
        return None;
    }

    Some(Type::PoolCreated(PoolCreated {
        token0: word_to_address(&log.topics()[1])?,
        token1: word_to_address(&log.topics()[2])?,
        pool: word_to_address(data_word(log, 0))?,
    }))
}
