// @generated
/// Raw pool and factory events of one block, in canonical log order.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PoolEvents {
    #[prost(message, repeated, tag="1")]
    pub events: ::prost::alloc::vec::Vec<PoolEvent>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PoolEvent {
    #[prost(uint64, tag="1")]
    pub block_number: u64,
    #[prost(message, optional, tag="2")]
    pub timestamp: ::core::option::Option<::prost_types::Timestamp>,
    #[prost(string, tag="3")]
    pub transaction_hash: ::prost::alloc::string::String,
    #[prost(string, tag="4")]
    pub transaction_from: ::prost::alloc::string::String,
    #[prost(uint64, tag="5")]
    pub log_index: u64,
    /// Address of the emitting contract (pool or factory).
    #[prost(string, tag="6")]
    pub address: ::prost::alloc::string::String,
    #[prost(oneof="pool_event::Type", tags="10, 11, 12, 13, 14, 15")]
    pub r#type: ::core::option::Option<pool_event::Type>,
}
/// Nested message and enum types in `PoolEvent`.
pub mod pool_event {
    /// Integer amounts are decimal strings of the raw on-chain values.
    #[allow(clippy::derive_partial_eq_without_eq)]
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Transfer {
        #[prost(string, tag="1")]
        pub from: ::prost::alloc::string::String,
        #[prost(string, tag="2")]
        pub to: ::prost::alloc::string::String,
        #[prost(string, tag="3")]
        pub value: ::prost::alloc::string::String,
    }
    #[allow(clippy::derive_partial_eq_without_eq)]
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Sync {
        #[prost(string, tag="1")]
        pub reserve0: ::prost::alloc::string::String,
        #[prost(string, tag="2")]
        pub reserve1: ::prost::alloc::string::String,
    }
    #[allow(clippy::derive_partial_eq_without_eq)]
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Mint {
        #[prost(string, tag="1")]
        pub sender: ::prost::alloc::string::String,
        #[prost(string, tag="2")]
        pub amount0: ::prost::alloc::string::String,
        #[prost(string, tag="3")]
        pub amount1: ::prost::alloc::string::String,
    }
    #[allow(clippy::derive_partial_eq_without_eq)]
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Burn {
        #[prost(string, tag="1")]
        pub sender: ::prost::alloc::string::String,
        #[prost(string, tag="2")]
        pub amount0: ::prost::alloc::string::String,
        #[prost(string, tag="3")]
        pub amount1: ::prost::alloc::string::String,
        #[prost(string, tag="4")]
        pub to: ::prost::alloc::string::String,
    }
    #[allow(clippy::derive_partial_eq_without_eq)]
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Swap {
        #[prost(string, tag="1")]
        pub sender: ::prost::alloc::string::String,
        #[prost(string, tag="2")]
        pub amount0_in: ::prost::alloc::string::String,
        #[prost(string, tag="3")]
        pub amount1_in: ::prost::alloc::string::String,
        #[prost(string, tag="4")]
        pub amount0_out: ::prost::alloc::string::String,
        #[prost(string, tag="5")]
        pub amount1_out: ::prost::alloc::string::String,
        #[prost(string, tag="6")]
        pub to: ::prost::alloc::string::String,
    }
    #[allow(clippy::derive_partial_eq_without_eq)]
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct PoolCreated {
        #[prost(string, tag="1")]
        pub token0: ::prost::alloc::string::String,
        #[prost(string, tag="2")]
        pub token1: ::prost::alloc::string::String,
        #[prost(string, tag="3")]
        pub pool: ::prost::alloc::string::String,
    }
    #[allow(clippy::derive_partial_eq_without_eq)]
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Type {
        #[prost(message, tag="10")]
        Transfer(Transfer),
        #[prost(message, tag="11")]
        Sync(Sync),
        #[prost(message, tag="12")]
        Mint(Mint),
        #[prost(message, tag="13")]
        Burn(Burn),
        #[prost(message, tag="14")]
        Swap(Swap),
        #[prost(message, tag="15")]
        PoolCreated(PoolCreated),
    }
}
// @@protoc_insertion_point(module)
