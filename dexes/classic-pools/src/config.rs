// ─────────────────────────────────────────────────────────────────────────────
// Deployment configuration for the classic pool indexer
// ─────────────────────────────────────────────────────────────────────────────

use crate::error::ConfigError;
use dex_common::normalize_address;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use substreams::scalar::{BigDecimal, BigInt};

/// Classic pool factory contract address
pub const FACTORY_ADDRESS: &str = "0x16d6d5627a6d4da55ce81b624ad31e42e163b9c4";

/// Wrapped native asset every price is denominated in
pub const WETH_ADDRESS: &str = "0x968b9a5603ddeb2a78aa08182bc44ece1d9e5bf0";

/// Stablecoin/WETH pools used to price WETH in USD (USDC first, then USDT)
pub const USDC_WETH_POOL: &str = "0xe2e8a2b05f050498a951b006bd2863ebbbc5b587";
pub const USDT_WETH_POOL: &str = "0x69dbefd8e8552520ff196650ffb10119d0d183f6";

/// Tokens whose amounts count towards tracked volume and liquidity, in
/// price-discovery priority order
pub const WHITELIST: [&str; 5] = [
    "0x968b9a5603ddeb2a78aa08182bc44ece1d9e5bf0", // WETH
    "0x700722d24f9256be288f56449e8ab1d27c4a70ca", // USDC
    "0x8812d810ea7cc4e1c3fb45cef19d6a7ecbf2d85d", // USDT
    "0x153b112138c6de2cad16d66b4b6448b7b88caef3", // WBTC
    "0x6e990040fd9b06f98efb62a147201696941680b5", // WIP
];

/// Rebasing token pools, never counted in tracked volume
pub const UNTRACKED_POOLS: [&str; 1] = ["0x9ea3b5b4ec044b70375236a281986106457b20ef"];

/// Tokens whose totalSupply call overflows
pub const SKIP_TOTAL_SUPPLY: [&str; 1] = ["0x0000000000bf2686748e1c0255036e7617e7e8a5"];

/// The zero address: source of mints, sink of burns
pub const ADDRESS_ZERO: &str = "0x0000000000000000000000000000000000000000";

/// Decimals of every pool's liquidity token
pub const LIQUIDITY_TOKEN_DECIMALS: u64 = 18;

/// Liquidity minted to the zero address by the first deposit of every pool
pub const BOOTSTRAP_LIQUIDITY: u64 = 1000;

/// Pools with fewer providers than this must clear the USD reserve floor
pub const LP_COUNT_THRESHOLD: u64 = 5;

/// Runtime configuration of the indexer.
///
/// Addresses are normalised to lowercase `0x` hex on construction so they can
/// be compared directly against entity ids.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    pub factory_address: String,
    pub reference_token: String,
    pub whitelist: Vec<String>,
    pub stablecoin_pools: Vec<String>,
    pub untracked_pools: Vec<String>,
    pub skip_total_supply: Vec<String>,
    pub minimum_liquidity_threshold_eth: BigDecimal,
    pub minimum_usd_threshold_new_pools: BigDecimal,
    pub lp_count_threshold: u64,
    pub bootstrap_liquidity: BigInt,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            factory_address: FACTORY_ADDRESS.to_string(),
            reference_token: WETH_ADDRESS.to_string(),
            whitelist: WHITELIST.iter().map(|token| token.to_string()).collect(),
            stablecoin_pools: vec![USDC_WETH_POOL.to_string(), USDT_WETH_POOL.to_string()],
            untracked_pools: UNTRACKED_POOLS.iter().map(|pool| pool.to_string()).collect(),
            skip_total_supply: SKIP_TOTAL_SUPPLY.iter().map(|token| token.to_string()).collect(),
            minimum_liquidity_threshold_eth: BigDecimal::zero(),
            minimum_usd_threshold_new_pools: BigDecimal::zero(),
            lp_count_threshold: LP_COUNT_THRESHOLD,
            bootstrap_liquidity: BigInt::from(BOOTSTRAP_LIQUIDITY),
        }
    }
}

/// On-disk shape of the configuration. Every field is optional and falls back
/// to the compiled-in deployment constants.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    factory_address: Option<String>,
    reference_token: Option<String>,
    whitelist: Option<Vec<String>>,
    stablecoin_pools: Option<Vec<String>>,
    untracked_pools: Option<Vec<String>>,
    skip_total_supply: Option<Vec<String>>,
    minimum_liquidity_threshold_eth: Option<String>,
    minimum_usd_threshold_new_pools: Option<String>,
    lp_count_threshold: Option<u64>,
    bootstrap_liquidity: Option<String>,
}

impl IndexerConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML, overlaying the defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        let defaults = Self::default();

        let config = Self {
            factory_address: file.factory_address.unwrap_or(defaults.factory_address),
            reference_token: file.reference_token.unwrap_or(defaults.reference_token),
            whitelist: file.whitelist.unwrap_or(defaults.whitelist),
            stablecoin_pools: file.stablecoin_pools.unwrap_or(defaults.stablecoin_pools),
            untracked_pools: file.untracked_pools.unwrap_or(defaults.untracked_pools),
            skip_total_supply: file.skip_total_supply.unwrap_or(defaults.skip_total_supply),
            minimum_liquidity_threshold_eth: parse_decimal(
                "minimum_liquidity_threshold_eth",
                file.minimum_liquidity_threshold_eth,
                defaults.minimum_liquidity_threshold_eth,
            )?,
            minimum_usd_threshold_new_pools: parse_decimal(
                "minimum_usd_threshold_new_pools",
                file.minimum_usd_threshold_new_pools,
                defaults.minimum_usd_threshold_new_pools,
            )?,
            lp_count_threshold: file.lp_count_threshold.unwrap_or(defaults.lp_count_threshold),
            bootstrap_liquidity: match file.bootstrap_liquidity {
                Some(raw) => BigInt::from_str(raw.trim()).map_err(|_| ConfigError::InvalidNumber {
                    field: "bootstrap_liquidity",
                    value: raw,
                })?,
                None => defaults.bootstrap_liquidity,
            },
        };

        config.normalized().validate()
    }

    /// Lowercase every configured address
    pub fn normalized(mut self) -> Self {
        self.factory_address = normalize_address(&self.factory_address);
        self.reference_token = normalize_address(&self.reference_token);
        for list in [
            &mut self.whitelist,
            &mut self.stablecoin_pools,
            &mut self.untracked_pools,
            &mut self.skip_total_supply,
        ] {
            for address in list.iter_mut() {
                *address = normalize_address(address);
            }
        }
        self
    }

    /// Reject configurations the engine cannot price with
    pub fn validate(self) -> Result<Self, ConfigError> {
        let addresses = [&self.factory_address, &self.reference_token]
            .into_iter()
            .chain(self.whitelist.iter())
            .chain(self.stablecoin_pools.iter())
            .chain(self.untracked_pools.iter())
            .chain(self.skip_total_supply.iter());

        for address in addresses {
            let digits = address.trim_start_matches("0x");
            if digits.len() != 40 || hex::decode(digits).is_err() {
                return Err(ConfigError::InvalidAddress(address.clone()));
            }
        }

        if self.whitelist.is_empty() {
            return Err(ConfigError::EmptyWhitelist);
        }

        if !self.whitelist.contains(&self.reference_token) {
            return Err(ConfigError::ReferenceNotWhitelisted(self.reference_token));
        }

        Ok(self)
    }

    #[inline]
    pub fn is_whitelisted(&self, token: &str) -> bool {
        self.whitelist.iter().any(|entry| entry == token)
    }

    #[inline]
    pub fn is_untracked_pool(&self, pool: &str) -> bool {
        self.untracked_pools.iter().any(|entry| entry == pool)
    }

    #[inline]
    pub fn skips_total_supply(&self, token: &str) -> bool {
        self.skip_total_supply.iter().any(|entry| entry == token)
    }
}

fn parse_decimal(
    field: &'static str,
    raw: Option<String>,
    default: BigDecimal,
) -> Result<BigDecimal, ConfigError> {
    match raw {
        Some(value) => BigDecimal::from_str(value.trim())
            .map_err(|_| ConfigError::InvalidNumber { field, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = IndexerConfig::default().normalized().validate().unwrap();

        assert_eq!(config.whitelist.len(), 5);
        assert!(config.is_whitelisted(WETH_ADDRESS));
        assert!(config.is_untracked_pool(UNTRACKED_POOLS[0]));
        assert_eq!(config.lp_count_threshold, 5);
        assert_eq!(config.bootstrap_liquidity, BigInt::from(1000));
    }

    #[test]
    fn overlays_toml_on_defaults() {
        let config = IndexerConfig::from_toml_str(
            r#"
            reference_token = "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"
            whitelist = ["0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"]
            minimum_liquidity_threshold_eth = "2.5"
            lp_count_threshold = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.reference_token, format!("0x{}", "a".repeat(40)));
        assert_eq!(
            config.minimum_liquidity_threshold_eth,
            BigDecimal::from_str("2.5").unwrap()
        );
        assert_eq!(config.lp_count_threshold, 3);
        assert_eq!(config.factory_address, FACTORY_ADDRESS);
    }

    #[test]
    fn rejects_reference_outside_whitelist() {
        let result = IndexerConfig::from_toml_str(
            r#"whitelist = ["0x700722d24f9256be288f56449e8ab1d27c4a70ca"]"#,
        );

        assert!(matches!(result, Err(ConfigError::ReferenceNotWhitelisted(_))));
    }

    #[test]
    fn rejects_bad_numbers_and_addresses() {
        assert!(matches!(
            IndexerConfig::from_toml_str(r#"minimum_usd_threshold_new_pools = "lots""#),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            IndexerConfig::from_toml_str(r#"untracked_pools = ["0x1234"]"#),
            Err(ConfigError::InvalidAddress(_))
        ));
    }
}
