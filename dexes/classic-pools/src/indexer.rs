// ─────────────────────────────────────────────────────────────────────────────
// Sequential event driver
// ─────────────────────────────────────────────────────────────────────────────

use crate::config::IndexerConfig;
use crate::entities::{Bundle, EntityKind, Factory, User, BUNDLE_ID};
use crate::error::{ConfigError, DecodeError, Dropped};
use crate::events::{EventKind, PoolEvent};
use crate::oracle::{PoolRegistry, TokenMetadataOracle};
use crate::pb::classic::types::v1::PoolEvents;
use crate::store::EntityStore;
use std::collections::HashSet;
use substreams::log;
use substreams::scalar::BigDecimal;

/// What happened to an event that was not dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Applied,
    /// Not emitted by a subscribed contract, or a protocol bootstrap artifact
    Ignored,
}

/// Per-block tally of handler results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockSummary {
    pub applied: usize,
    pub ignored: usize,
    /// Event id and reason of every dropped event
    pub dropped: Vec<(String, Dropped)>,
}

/// Rebuilds pool, token and protocol entities from pool events.
///
/// Events must arrive one at a time in canonical chain order; each handler
/// runs to completion against the store before the next event is handled.
pub struct Indexer<S, M, R> {
    pub(crate) config: IndexerConfig,
    pub(crate) store: S,
    pub(crate) metadata: M,
    pub(crate) registry: R,
    data_sources: HashSet<String>,
}

impl<S, M, R> Indexer<S, M, R>
where
    S: EntityStore,
    M: TokenMetadataOracle,
    R: PoolRegistry,
{
    /// Fails when the configuration cannot drive price discovery
    pub fn new(
        config: IndexerConfig,
        store: S,
        metadata: M,
        registry: R,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            config: config.normalized().validate()?,
            store,
            metadata,
            registry,
            data_sources: HashSet::new(),
        })
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Subscribe to the events of a pool
    pub fn watch_pool(&mut self, pool: &str) {
        self.data_sources.insert(pool.to_string());
    }

    /// Whether events emitted by `address` are delivered to the pool handlers.
    /// Pools already in the store count as subscribed so a restarted indexer
    /// picks up where it left off.
    pub fn is_watched(&self, address: &str) -> bool {
        self.data_sources.contains(address) || self.store.contains(EntityKind::Pool, address)
    }

    /// Handle one event
    pub fn handle(&mut self, event: &PoolEvent) -> Result<Handled, Dropped> {
        let context = &event.context;

        if let EventKind::PoolCreated(created) = &event.kind {
            if context.address != self.config.factory_address {
                return Ok(Handled::Ignored);
            }
            return self.handle_pool_created(context, created);
        }

        if !self.is_watched(&context.address) {
            return Ok(Handled::Ignored);
        }

        match &event.kind {
            EventKind::Transfer(transfer) => self.handle_transfer(context, transfer),
            EventKind::Sync(sync) => self.handle_sync(context, sync),
            EventKind::Mint(mint) => self.handle_mint(context, mint),
            EventKind::Burn(burn) => self.handle_burn(context, burn),
            EventKind::Swap(swap) => self.handle_swap(context, swap),
            EventKind::PoolCreated(_) => Ok(Handled::Ignored),
        }
    }

    /// Handle a block's events in order, logging and tallying drops
    pub fn process<'a>(&mut self, events: impl IntoIterator<Item = &'a PoolEvent>) -> BlockSummary {
        let mut summary = BlockSummary::default();

        for event in events {
            match self.handle(event) {
                Ok(Handled::Applied) => summary.applied += 1,
                Ok(Handled::Ignored) => summary.ignored += 1,
                Err(reason) => {
                    log::info!("dropping event {}: {}", event.id(), reason);
                    summary.dropped.push((event.id(), reason));
                }
            }
        }

        summary
    }

    /// Decode the output of `map_pool_events` and handle it. Nothing is
    /// applied when any event fails to decode.
    pub fn process_block(&mut self, events: &PoolEvents) -> Result<BlockSummary, DecodeError> {
        let decoded = events
            .events
            .iter()
            .map(PoolEvent::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.process(&decoded))
    }

    /// Current USD price of the reference asset, zero before the bundle exists
    pub(crate) fn eth_price(&self) -> BigDecimal {
        match self.store.load::<Bundle>(BUNDLE_ID) {
            Some(bundle) => bundle.eth_price,
            None => BigDecimal::zero(),
        }
    }

    pub(crate) fn load_factory(&self) -> Option<Factory> {
        self.store.load::<Factory>(&self.config.factory_address)
    }

    /// Create the user record on first sight
    pub(crate) fn ensure_user(&mut self, address: &str) -> User {
        if let Some(user) = self.store.load::<User>(address) {
            return user;
        }

        let user = User {
            id: address.to_string(),
            usd_swapped: BigDecimal::zero(),
        };
        self.store.save(&user);

        if let Some(mut factory) = self.load_factory() {
            factory.user_count += 1;
            self.store.save(&factory);
        }

        user
    }
}
