use thiserror::Error;

/// Why an event was dropped before its handler ran to completion.
///
/// Writes issued before the abort stay committed; upstream delivery is
/// exactly-once and ordered, so a drop means a pairing assumption was broken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Dropped {
    #[error("pool {0} is not indexed")]
    MissingPool(String),
    #[error("token {0} is not indexed")]
    MissingToken(String),
    #[error("bundle has not been created yet")]
    MissingBundle,
    #[error("factory has not been created yet")]
    MissingFactory,
    #[error("transaction {0} has no prior transfer")]
    MissingTransaction(String),
    #[error("transaction {0} has no pending mint")]
    MissingMint(String),
    #[error("transaction {0} has no pending burn")]
    MissingBurn(String),
    #[error("could not determine decimals of token {0}")]
    UndeterminableDecimals(String),
}

/// Failure to turn a protobuf pool event into a domain event
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("event {0} carries no payload")]
    MissingPayload(String),
    #[error("event {id} has no block timestamp")]
    MissingTimestamp { id: String },
    #[error("event {id} has a timestamp before the unix epoch: {seconds}")]
    NegativeTimestamp { id: String, seconds: i64 },
    #[error("field {field} is not an unsigned integer: {value:?}")]
    InvalidInteger { field: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("field {field} is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("invalid address {0:?}")]
    InvalidAddress(String),
    #[error("whitelist must not be empty")]
    EmptyWhitelist,
    #[error("reference token {0} must be whitelisted")]
    ReferenceNotWhitelisted(String),
}

/// A reverted on-chain call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("call reverted")]
pub struct CallReverted;
