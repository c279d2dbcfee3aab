// ─────────────────────────────────────────────────────────────────────────────
// Pool factory registrar
// ─────────────────────────────────────────────────────────────────────────────

use crate::entities::{Bundle, Factory, Pool, Token};
use crate::error::Dropped;
use crate::events::{EventContext, PoolCreated};
use crate::indexer::{Handled, Indexer};
use crate::oracle::{
    fetch_token_decimals, fetch_token_name, fetch_token_symbol, fetch_token_total_supply,
    PoolRegistry, TokenMetadataOracle,
};
use crate::store::EntityStore;
use substreams::log;

impl<S, M, R> Indexer<S, M, R>
where
    S: EntityStore,
    M: TokenMetadataOracle,
    R: PoolRegistry,
{
    /// Existing token record, or a fresh one built from on-chain metadata
    fn load_or_fetch_token(&self, address: &str) -> Result<Token, Dropped> {
        if let Some(token) = self.store.load::<Token>(address) {
            return Ok(token);
        }

        let Some(decimals) = fetch_token_decimals(&self.metadata, address) else {
            log::info!("abandoning token {}: decimals could not be determined", address);
            return Err(Dropped::UndeterminableDecimals(address.to_string()));
        };

        Ok(Token::new(
            address,
            fetch_token_symbol(&self.metadata, address),
            fetch_token_name(&self.metadata, address),
            decimals,
            fetch_token_total_supply(&self.metadata, &self.config, address),
        ))
    }

    pub(crate) fn handle_pool_created(
        &mut self,
        context: &EventContext,
        created: &PoolCreated,
    ) -> Result<Handled, Dropped> {
        let mut factory = match self.load_factory() {
            Some(factory) => factory,
            None => {
                self.store.save(&Bundle::new());
                Factory::new(&self.config.factory_address)
            }
        };
        factory.pool_count += 1;
        self.store.save(&factory);

        // neither token nor pool is persisted unless both tokens resolve
        let token0 = self.load_or_fetch_token(&created.token0)?;
        let token1 = self.load_or_fetch_token(&created.token1)?;

        let pool = Pool::new(
            &created.pool,
            &token0.id,
            &token1.id,
            context.timestamp,
            context.block_number,
        );

        self.registry.record_pool(&token0.id, &token1.id, &pool.id);
        self.watch_pool(&pool.id);
        log::info!(
            "registered pool {} ({} / {}) at block {}",
            pool.id,
            token0.symbol,
            token1.symbol,
            context.block_number
        );

        self.store.save(&token0);
        self.store.save(&token1);
        self.store.save(&pool);
        Ok(Handled::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexerConfig;
    use crate::entities::BUNDLE_ID;
    use crate::oracle::{MemoryPoolRegistry, StaticTokenOracle, TokenMetadata};
    use crate::store::MemoryStore;
    use substreams::scalar::BigInt;

    const TOKEN_A: &str = "0x000000000000000000000000000000000000000a";
    const TOKEN_B: &str = "0x000000000000000000000000000000000000000b";
    const POOL: &str = "0x00000000000000000000000000000000000000ab";

    fn context() -> EventContext {
        EventContext {
            block_number: 12,
            timestamp: 5_000,
            transaction_hash: "0xcreate".to_string(),
            transaction_from: "0xdeployer".to_string(),
            log_index: 0,
            address: IndexerConfig::default().factory_address,
        }
    }

    fn created() -> PoolCreated {
        PoolCreated {
            token0: TOKEN_A.to_string(),
            token1: TOKEN_B.to_string(),
            pool: POOL.to_string(),
        }
    }

    #[test]
    fn first_pool_creates_factory_and_bundle() {
        let oracle = StaticTokenOracle::new()
            .with_token(TOKEN_A, TokenMetadata::erc20("A", "Token A", 18, BigInt::from(100)))
            .with_token(TOKEN_B, TokenMetadata::erc20("B", "Token B", 6, BigInt::from(200)));
        let mut indexer = Indexer::new(
            IndexerConfig::default(),
            MemoryStore::new(),
            oracle,
            MemoryPoolRegistry::new(),
        )
        .unwrap();

        indexer.handle_pool_created(&context(), &created()).unwrap();

        assert_eq!(indexer.load_factory().unwrap().pool_count, 1);
        assert!(indexer.store().load::<Bundle>(BUNDLE_ID).is_some());
        assert_eq!(indexer.registry().pool_for(TOKEN_B, TOKEN_A).as_deref(), Some(POOL));
        assert!(indexer.is_watched(POOL));

        let pool = indexer.store().load::<Pool>(POOL).unwrap();
        assert_eq!(pool.created_at_block_number, 12);
        assert_eq!(pool.created_at_timestamp, 5_000);
    }

    #[test]
    fn unresolvable_decimals_abandon_the_pool() {
        let oracle = StaticTokenOracle::new()
            .with_token(TOKEN_A, TokenMetadata::erc20("A", "Token A", 18, BigInt::from(100)));
        let mut indexer = Indexer::new(
            IndexerConfig::default(),
            MemoryStore::new(),
            oracle,
            MemoryPoolRegistry::new(),
        )
        .unwrap();

        let result = indexer.handle_pool_created(&context(), &created());

        assert_eq!(result, Err(Dropped::UndeterminableDecimals(TOKEN_B.to_string())));
        assert!(indexer.store().load::<Token>(TOKEN_A).is_none());
        assert!(indexer.store().load::<Pool>(POOL).is_none());
        assert!(!indexer.is_watched(POOL));
        // the factory counter was already committed
        assert_eq!(indexer.load_factory().unwrap().pool_count, 1);
    }
}
