// ─────────────────────────────────────────────────────────────────────────────
// Event reconciliation: Transfer / Sync / Mint / Burn / Swap handlers
// ─────────────────────────────────────────────────────────────────────────────

use crate::buckets::{update_buckets, SwapVolume};
use crate::config::{ADDRESS_ZERO, LIQUIDITY_TOKEN_DECIMALS};
use crate::entities::{
    Bundle, BurnEvent, BurnState, EntityKind, MintEvent, Pool, SwapEvent, Token, Transaction,
    UserPosition, BUNDLE_ID,
};
use crate::error::Dropped;
use crate::events::{Burn, EventContext, Mint, Swap, Sync, Transfer};
use crate::indexer::{Handled, Indexer};
use crate::oracle::{PoolRegistry, TokenMetadataOracle};
use crate::pricing::{eth_per_token, reference_price_usd};
use crate::store::EntityStore;
use crate::tracking::{tracked_liquidity_usd, tracked_volume_usd};
use dex_common::{convert_token_to_decimal, format_bigdecimal, is_zero, safe_div};
use substreams::log;
use substreams::scalar::BigDecimal;

impl<S, M, R> Indexer<S, M, R>
where
    S: EntityStore,
    M: TokenMetadataOracle,
    R: PoolRegistry,
{
    fn load_pool(&self, address: &str) -> Result<Pool, Dropped> {
        self.store
            .load::<Pool>(address)
            .ok_or_else(|| Dropped::MissingPool(address.to_string()))
    }

    fn load_pool_tokens(&self, pool: &Pool) -> Result<(Token, Token), Dropped> {
        let token0 = self
            .store
            .load::<Token>(&pool.token0)
            .ok_or_else(|| Dropped::MissingToken(pool.token0.clone()))?;
        let token1 = self
            .store
            .load::<Token>(&pool.token1)
            .ok_or_else(|| Dropped::MissingToken(pool.token1.clone()))?;
        Ok((token0, token1))
    }

    fn load_or_create_transaction(&self, context: &EventContext) -> Transaction {
        self.store
            .load::<Transaction>(&context.transaction_hash)
            .unwrap_or_else(|| {
                Transaction::new(&context.transaction_hash, context.block_number, context.timestamp)
            })
    }

    /// Whether the trailing mint of `transaction` still waits for its Mint
    /// event. A trailing id without a record counts as open.
    fn has_open_mint(&self, transaction: &Transaction) -> bool {
        match transaction.mints.last() {
            Some(id) => self
                .store
                .load::<MintEvent>(id)
                .map_or(true, |mint| !mint.is_complete()),
            None => false,
        }
    }

    /// Liquidity-token transfers delimit logical mints and burns
    pub(crate) fn handle_transfer(
        &mut self,
        context: &EventContext,
        transfer: &Transfer,
    ) -> Result<Handled, Dropped> {
        // first deposit locks the minimum liquidity at the zero address
        if transfer.to == ADDRESS_ZERO && transfer.value == self.config.bootstrap_liquidity {
            return Ok(Handled::Ignored);
        }

        self.ensure_user(&transfer.from);
        self.ensure_user(&transfer.to);

        let mut pool = self.load_pool(&context.address)?;
        let value = convert_token_to_decimal(&transfer.value, LIQUIDITY_TOKEN_DECIMALS);
        let mut transaction = self.load_or_create_transaction(context);

        if transfer.from == ADDRESS_ZERO {
            pool.total_supply = pool.total_supply.clone() + value.clone();
            self.store.save(&pool);

            // consecutive mints fold into the open one until its Mint event lands
            if !self.has_open_mint(&transaction) {
                let mint = MintEvent {
                    id: transaction.next_event_id(&transaction.mints),
                    transaction: transaction.id.clone(),
                    timestamp: transaction.timestamp,
                    pool: pool.id.clone(),
                    to: transfer.to.clone(),
                    liquidity: value.clone(),
                    sender: None,
                    amount0: None,
                    amount1: None,
                    log_index: None,
                    amount_usd: None,
                };
                self.store.save(&mint);

                transaction.mints = transaction.mints.appended(mint.id);
                self.store.save(&transaction);
            }
        }

        // first leg of a burn: the provider returns liquidity tokens to the pool
        if transfer.to == pool.id {
            let mut burn = BurnEvent::new(
                transaction.next_event_id(&transaction.burns),
                &transaction,
                &pool.id,
                value.clone(),
            );
            burn.sender = Some(transfer.from.clone());
            burn.to = Some(transfer.to.clone());
            burn.state = BurnState::AwaitingSecondLeg;
            self.store.save(&burn);

            transaction.burns = transaction.burns.appended(burn.id);
            self.store.save(&transaction);
        }

        // second leg: the pool destroys the returned tokens
        if transfer.to == ADDRESS_ZERO && transfer.from == pool.id {
            pool.total_supply = pool.total_supply.clone() - value.clone();
            self.store.save(&pool);

            let trailing = match transaction.burns.last() {
                Some(id) => Some(
                    self.store
                        .load::<BurnEvent>(id)
                        .ok_or_else(|| Dropped::MissingBurn(id.to_string()))?,
                ),
                None => None,
            };

            let (mut burn, reused) = match trailing {
                Some(pending) if pending.needs_complete() => (pending, true),
                _ => (
                    BurnEvent::new(
                        transaction.next_event_id(&transaction.burns),
                        &transaction,
                        &pool.id,
                        value.clone(),
                    ),
                    false,
                ),
            };

            // an open mint here is the protocol fee paid out alongside the burn
            if let Some(mint_id) = transaction.mints.last().map(str::to_string) {
                if self.has_open_mint(&transaction) {
                    let fee_mint = self
                        .store
                        .load::<MintEvent>(&mint_id)
                        .ok_or_else(|| Dropped::MissingMint(mint_id.clone()))?;

                    burn.fee_to = Some(fee_mint.to);
                    burn.fee_liquidity = Some(fee_mint.liquidity);

                    self.store.remove(EntityKind::Mint, &mint_id);
                    transaction.mints = transaction.mints.without_last();
                    self.store.save(&transaction);
                }
            }

            burn.state = BurnState::Closed;
            self.store.save(&burn);

            transaction.burns = if reused {
                transaction.burns.with_last_replaced(burn.id)
            } else {
                transaction.burns.appended(burn.id)
            };
            self.store.save(&transaction);
        }

        self.store.save(&transaction);
        Ok(Handled::Applied)
    }

    /// Authoritative reserve update. The pool's previous contribution to token
    /// and factory liquidity is retracted before anything is repriced.
    pub(crate) fn handle_sync(
        &mut self,
        context: &EventContext,
        sync: &Sync,
    ) -> Result<Handled, Dropped> {
        let mut pool = self.load_pool(&context.address)?;
        let (mut token0, mut token1) = self.load_pool_tokens(&pool)?;
        let mut factory = self.load_factory();

        if let Some(factory) = factory.as_mut() {
            factory.total_liquidity_eth =
                factory.total_liquidity_eth.clone() - pool.tracked_reserve_eth.clone();
        }
        token0.total_liquidity = token0.total_liquidity.clone() - pool.reserve0.clone();
        token1.total_liquidity = token1.total_liquidity.clone() - pool.reserve1.clone();

        pool.reserve0 = convert_token_to_decimal(&sync.reserve0, token0.decimals);
        pool.reserve1 = convert_token_to_decimal(&sync.reserve1, token1.decimals);
        pool.token0_price = safe_div(&pool.reserve0, &pool.reserve1);
        pool.token1_price = safe_div(&pool.reserve1, &pool.reserve0);
        self.store.save(&pool);

        let mut bundle = self
            .store
            .load::<Bundle>(BUNDLE_ID)
            .ok_or(Dropped::MissingBundle)?;
        bundle.eth_price = reference_price_usd(&self.store, &self.config);
        self.store.save(&bundle);
        log::debug!("reference asset at {} USD", format_bigdecimal(&bundle.eth_price));
        let eth_price = bundle.eth_price;

        // both tokens are priced against the store as it was before this sync
        let derived0 = eth_per_token(&self.store, &self.registry, &self.config, &token0);
        let derived1 = eth_per_token(&self.store, &self.registry, &self.config, &token1);
        token0.derived_eth = derived0;
        token1.derived_eth = derived1;
        self.store.save(&token0);
        self.store.save(&token1);

        let tracked_reserve_eth = if is_zero(&eth_price) {
            BigDecimal::zero()
        } else {
            tracked_liquidity_usd(
                &self.config,
                &pool.reserve0,
                &token0,
                &pool.reserve1,
                &token1,
                &eth_price,
            ) / eth_price.clone()
        };

        pool.tracked_reserve_eth = tracked_reserve_eth.clone();
        pool.reserve_eth = pool.reserve0.clone() * token0.derived_eth.clone()
            + pool.reserve1.clone() * token1.derived_eth.clone();
        pool.reserve_usd = pool.reserve_eth.clone() * eth_price.clone();

        if let Some(mut factory) = factory {
            factory.total_liquidity_eth = factory.total_liquidity_eth.clone() + tracked_reserve_eth;
            factory.total_liquidity_usd = factory.total_liquidity_eth.clone() * eth_price;
            self.store.save(&factory);
        }

        token0.total_liquidity = token0.total_liquidity.clone() + pool.reserve0.clone();
        token1.total_liquidity = token1.total_liquidity.clone() + pool.reserve1.clone();

        self.store.save(&pool);
        self.store.save(&token0);
        self.store.save(&token1);
        Ok(Handled::Applied)
    }

    /// Completes the open mint created by the preceding zero-address transfer
    pub(crate) fn handle_mint(
        &mut self,
        context: &EventContext,
        mint: &Mint,
    ) -> Result<Handled, Dropped> {
        let transaction = self
            .store
            .load::<Transaction>(&context.transaction_hash)
            .ok_or_else(|| Dropped::MissingTransaction(context.transaction_hash.clone()))?;
        let mint_id = transaction
            .mints
            .last()
            .ok_or_else(|| Dropped::MissingMint(transaction.id.clone()))?;
        let mut mint_event = self
            .store
            .load::<MintEvent>(mint_id)
            .ok_or_else(|| Dropped::MissingMint(transaction.id.clone()))?;

        let mut pool = self.load_pool(&context.address)?;
        let mut factory = self.load_factory();
        let (mut token0, mut token1) = self.load_pool_tokens(&pool)?;

        let amount0 = convert_token_to_decimal(&mint.amount0, token0.decimals);
        let amount1 = convert_token_to_decimal(&mint.amount1, token1.decimals);

        token0.tx_count += 1;
        token1.tx_count += 1;

        let eth_price = self.eth_price();
        let amount_usd = (token1.derived_eth.clone() * amount1.clone()
            + token0.derived_eth.clone() * amount0.clone())
            * eth_price.clone();

        pool.tx_count += 1;
        if let Some(factory) = factory.as_mut() {
            factory.tx_count += 1;
            self.store.save(&*factory);
        }

        self.store.save(&token0);
        self.store.save(&token1);
        self.store.save(&pool);

        mint_event.sender = Some(mint.sender.clone());
        mint_event.amount0 = Some(amount0.clone());
        mint_event.amount1 = Some(amount1.clone());
        mint_event.log_index = Some(context.log_index);
        mint_event.amount_usd = Some(amount_usd);
        self.store.save(&mint_event);

        let opened = self.update_user_position(
            &mint_event.to,
            &pool.id,
            &amount0,
            &amount1,
            &mint_event.liquidity,
            true,
        );
        if opened {
            pool.liquidity_provider_count += 1;
            self.store.save(&pool);
        }

        update_buckets(
            &mut self.store,
            &pool,
            &token0,
            &token1,
            &self.config.factory_address,
            factory.as_ref(),
            &eth_price,
            context.timestamp,
        );

        Ok(Handled::Applied)
    }

    /// Completes the trailing burn of the transaction
    pub(crate) fn handle_burn(
        &mut self,
        context: &EventContext,
        burn: &Burn,
    ) -> Result<Handled, Dropped> {
        let transaction = self
            .store
            .load::<Transaction>(&context.transaction_hash)
            .ok_or_else(|| Dropped::MissingTransaction(context.transaction_hash.clone()))?;
        let burn_id = transaction
            .burns
            .last()
            .ok_or_else(|| Dropped::MissingBurn(transaction.id.clone()))?;
        let mut burn_event = self
            .store
            .load::<BurnEvent>(burn_id)
            .ok_or_else(|| Dropped::MissingBurn(transaction.id.clone()))?;

        let mut pool = self.load_pool(&context.address)?;
        let mut factory = self.load_factory().ok_or(Dropped::MissingFactory)?;
        let (mut token0, mut token1) = self.load_pool_tokens(&pool)?;

        let amount0 = convert_token_to_decimal(&burn.amount0, token0.decimals);
        let amount1 = convert_token_to_decimal(&burn.amount1, token1.decimals);

        token0.tx_count += 1;
        token1.tx_count += 1;

        let eth_price = self.eth_price();
        let amount_usd = (token1.derived_eth.clone() * amount1.clone()
            + token0.derived_eth.clone() * amount0.clone())
            * eth_price.clone();

        factory.tx_count += 1;
        pool.tx_count += 1;

        self.store.save(&token0);
        self.store.save(&token1);
        self.store.save(&pool);
        self.store.save(&factory);

        burn_event.amount0 = Some(amount0.clone());
        burn_event.amount1 = Some(amount1.clone());
        burn_event.log_index = Some(context.log_index);
        burn_event.amount_usd = Some(amount_usd);
        self.store.save(&burn_event);

        // the provider is whoever returned the liquidity tokens to the pool
        let provider = burn_event.sender.clone().unwrap_or_else(|| burn.to.clone());
        self.update_user_position(
            &provider,
            &pool.id,
            &amount0,
            &amount1,
            &burn_event.liquidity,
            false,
        );

        update_buckets(
            &mut self.store,
            &pool,
            &token0,
            &token1,
            &self.config.factory_address,
            Some(&factory),
            &eth_price,
            context.timestamp,
        );

        Ok(Handled::Applied)
    }

    pub(crate) fn handle_swap(
        &mut self,
        context: &EventContext,
        swap: &Swap,
    ) -> Result<Handled, Dropped> {
        let mut pool = self.load_pool(&context.address)?;
        let (mut token0, mut token1) = self.load_pool_tokens(&pool)?;

        let amount0_in = convert_token_to_decimal(&swap.amount0_in, token0.decimals);
        let amount1_in = convert_token_to_decimal(&swap.amount1_in, token1.decimals);
        let amount0_out = convert_token_to_decimal(&swap.amount0_out, token0.decimals);
        let amount1_out = convert_token_to_decimal(&swap.amount1_out, token1.decimals);

        let amount0_total = amount0_in.clone() + amount0_out.clone();
        let amount1_total = amount1_in.clone() + amount1_out.clone();

        let eth_price = self.eth_price();

        // always defined, even when neither side is whitelisted
        let derived_amount_eth = (token1.derived_eth.clone() * amount1_total.clone()
            + token0.derived_eth.clone() * amount0_total.clone())
            / BigDecimal::from(2);
        let derived_amount_usd = derived_amount_eth * eth_price.clone();

        let tracked_amount_usd = tracked_volume_usd(
            &self.config,
            &amount0_total,
            &token0,
            &amount1_total,
            &token1,
            &pool,
            &eth_price,
        );
        let tracked_amount_eth = safe_div(&tracked_amount_usd, &eth_price);

        token0.trade_volume = token0.trade_volume.clone() + amount0_total.clone();
        token0.trade_volume_usd = token0.trade_volume_usd.clone() + tracked_amount_usd.clone();
        token0.untracked_volume_usd =
            token0.untracked_volume_usd.clone() + derived_amount_usd.clone();

        token1.trade_volume = token1.trade_volume.clone() + amount1_total.clone();
        token1.trade_volume_usd = token1.trade_volume_usd.clone() + tracked_amount_usd.clone();
        token1.untracked_volume_usd =
            token1.untracked_volume_usd.clone() + derived_amount_usd.clone();

        token0.tx_count += 1;
        token1.tx_count += 1;

        pool.volume_usd = pool.volume_usd.clone() + tracked_amount_usd.clone();
        pool.volume_token0 = pool.volume_token0.clone() + amount0_total.clone();
        pool.volume_token1 = pool.volume_token1.clone() + amount1_total.clone();
        pool.untracked_volume_usd = pool.untracked_volume_usd.clone() + derived_amount_usd.clone();
        pool.tx_count += 1;
        self.store.save(&pool);

        let mut factory = self.load_factory().ok_or(Dropped::MissingFactory)?;
        factory.total_volume_usd = factory.total_volume_usd.clone() + tracked_amount_usd.clone();
        factory.total_volume_eth = factory.total_volume_eth.clone() + tracked_amount_eth.clone();
        factory.untracked_volume_usd =
            factory.untracked_volume_usd.clone() + derived_amount_usd.clone();
        factory.tx_count += 1;

        self.store.save(&pool);
        self.store.save(&token0);
        self.store.save(&token1);
        self.store.save(&factory);

        let mut transaction = self.load_or_create_transaction(context);
        let amount_usd = if is_zero(&tracked_amount_usd) {
            derived_amount_usd.clone()
        } else {
            tracked_amount_usd.clone()
        };

        let swap_event = SwapEvent {
            id: transaction.next_event_id(&transaction.swaps),
            transaction: transaction.id.clone(),
            timestamp: transaction.timestamp,
            pool: pool.id.clone(),
            sender: swap.sender.clone(),
            from: context.transaction_from.clone(),
            to: swap.to.clone(),
            amount0_in,
            amount1_in,
            amount0_out,
            amount1_out,
            log_index: context.log_index,
            amount_usd: amount_usd.clone(),
        };
        self.store.save(&swap_event);

        transaction.swaps = transaction.swaps.appended(swap_event.id);
        self.store.save(&transaction);

        let mut trader = self.ensure_user(&context.transaction_from);
        trader.usd_swapped = trader.usd_swapped.clone() + amount_usd;
        self.store.save(&trader);

        // reload: a new trader bumps the factory's user count
        let factory = self.load_factory();
        let volume = SwapVolume {
            amount0: amount0_total,
            amount1: amount1_total,
            tracked_usd: tracked_amount_usd,
            tracked_eth: tracked_amount_eth,
            untracked_usd: derived_amount_usd,
        };
        update_buckets(
            &mut self.store,
            &pool,
            &token0,
            &token1,
            &self.config.factory_address,
            factory.as_ref(),
            &eth_price,
            context.timestamp,
        )
        .record_swap(&mut self.store, &volume, &token0, &token1, &eth_price);

        Ok(Handled::Applied)
    }

    /// Add or remove liquidity from a provider's position; returns whether
    /// the position was opened by this call
    fn update_user_position(
        &mut self,
        user: &str,
        pool: &str,
        amount0: &BigDecimal,
        amount1: &BigDecimal,
        liquidity: &BigDecimal,
        is_mint: bool,
    ) -> bool {
        let id = UserPosition::key(user, pool);
        let existing = self.store.load::<UserPosition>(&id);
        let opened = existing.is_none();

        let mut position = existing.unwrap_or_else(|| UserPosition {
            id,
            user: user.to_string(),
            pool: pool.to_string(),
            liquidity: BigDecimal::zero(),
            amount0: BigDecimal::zero(),
            amount1: BigDecimal::zero(),
        });

        if is_mint {
            position.liquidity = position.liquidity.clone() + liquidity.clone();
            position.amount0 = position.amount0.clone() + amount0.clone();
            position.amount1 = position.amount1.clone() + amount1.clone();
        } else {
            position.liquidity = position.liquidity.clone() - liquidity.clone();
            position.amount0 = position.amount0.clone() - amount0.clone();
            position.amount1 = position.amount1.clone() - amount1.clone();
        }
        self.store.save(&position);

        // only deposits count as new providers
        opened && is_mint
    }
}
