// ─────────────────────────────────────────────────────────────────────────────
// Domain form of the pool and factory events consumed by the indexer
// ─────────────────────────────────────────────────────────────────────────────

use crate::error::DecodeError;
use crate::pb::classic::types::v1::{pool_event, PoolEvent as PoolEventMessage};
use dex_common::normalize_address;
use std::str::FromStr;
use substreams::scalar::BigInt;

/// Where and when an event was emitted
#[derive(Debug, Clone, PartialEq)]
pub struct EventContext {
    pub block_number: u64,
    pub timestamp: u64,
    pub transaction_hash: String,
    pub transaction_from: String,
    pub log_index: u64,
    /// Emitting contract
    pub address: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub value: BigInt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sync {
    pub reserve0: BigInt,
    pub reserve1: BigInt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mint {
    pub sender: String,
    pub amount0: BigInt,
    pub amount1: BigInt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Burn {
    pub sender: String,
    pub amount0: BigInt,
    pub amount1: BigInt,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Swap {
    pub sender: String,
    pub amount0_in: BigInt,
    pub amount1_in: BigInt,
    pub amount0_out: BigInt,
    pub amount1_out: BigInt,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolCreated {
    pub token0: String,
    pub token1: String,
    pub pool: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Transfer(Transfer),
    Sync(Sync),
    Mint(Mint),
    Burn(Burn),
    Swap(Swap),
    PoolCreated(PoolCreated),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolEvent {
    pub context: EventContext,
    pub kind: EventKind,
}

impl PoolEvent {
    /// `<txHash>-<logIndex>`, unique per event
    pub fn id(&self) -> String {
        format!("{}-{}", self.context.transaction_hash, self.context.log_index)
    }
}

fn parse_uint(field: &'static str, value: &str) -> Result<BigInt, DecodeError> {
    let invalid = || DecodeError::InvalidInteger {
        field,
        value: value.to_string(),
    };

    if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(invalid());
    }

    BigInt::from_str(value).map_err(|_| invalid())
}

impl TryFrom<&PoolEventMessage> for PoolEvent {
    type Error = DecodeError;

    fn try_from(message: &PoolEventMessage) -> Result<Self, Self::Error> {
        let id = format!("{}-{}", message.transaction_hash, message.log_index);
        let seconds = message
            .timestamp
            .as_ref()
            .map(|timestamp| timestamp.seconds)
            .ok_or_else(|| DecodeError::MissingTimestamp { id: id.clone() })?;
        let timestamp = u64::try_from(seconds)
            .map_err(|_| DecodeError::NegativeTimestamp { id: id.clone(), seconds })?;

        let kind = match &message.r#type {
            Some(pool_event::Type::Transfer(transfer)) => EventKind::Transfer(Transfer {
                from: normalize_address(&transfer.from),
                to: normalize_address(&transfer.to),
                value: parse_uint("value", &transfer.value)?,
            }),
            Some(pool_event::Type::Sync(sync)) => EventKind::Sync(Sync {
                reserve0: parse_uint("reserve0", &sync.reserve0)?,
                reserve1: parse_uint("reserve1", &sync.reserve1)?,
            }),
            Some(pool_event::Type::Mint(mint)) => EventKind::Mint(Mint {
                sender: normalize_address(&mint.sender),
                amount0: parse_uint("amount0", &mint.amount0)?,
                amount1: parse_uint("amount1", &mint.amount1)?,
            }),
            Some(pool_event::Type::Burn(burn)) => EventKind::Burn(Burn {
                sender: normalize_address(&burn.sender),
                amount0: parse_uint("amount0", &burn.amount0)?,
                amount1: parse_uint("amount1", &burn.amount1)?,
                to: normalize_address(&burn.to),
            }),
            Some(pool_event::Type::Swap(swap)) => EventKind::Swap(Swap {
                sender: normalize_address(&swap.sender),
                amount0_in: parse_uint("amount0_in", &swap.amount0_in)?,
                amount1_in: parse_uint("amount1_in", &swap.amount1_in)?,
                amount0_out: parse_uint("amount0_out", &swap.amount0_out)?,
                amount1_out: parse_uint("amount1_out", &swap.amount1_out)?,
                to: normalize_address(&swap.to),
            }),
            Some(pool_event::Type::PoolCreated(created)) => EventKind::PoolCreated(PoolCreated {
                token0: normalize_address(&created.token0),
                token1: normalize_address(&created.token1),
                pool: normalize_address(&created.pool),
            }),
            None => return Err(DecodeError::MissingPayload(id)),
        };

        Ok(PoolEvent {
            context: EventContext {
                block_number: message.block_number,
                timestamp,
                transaction_hash: normalize_address(&message.transaction_hash),
                transaction_from: normalize_address(&message.transaction_from),
                log_index: message.log_index,
                address: normalize_address(&message.address),
            },
            kind,
        })
    }
}
