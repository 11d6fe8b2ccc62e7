//! Request and response types for the converter keeper
//!
//! Pubkeys are base58 strings; token amounts are decimal strings so u64
//! values survive JSON clients that parse numbers as doubles.

use fee_converter::constants::MAX_BATCH_SIZE;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct BridgeInput {
    pub token: String,
    pub bridge: String,
}

/// Snapshot of one exchange pair as read from chain
#[derive(Debug, Clone, Deserialize)]
pub struct PairInput {
    pub token_a: String,
    pub token_b: String,
    pub reserve_a: String,
    pub reserve_b: String,
    /// Total supply of the pair's claim token
    pub claim_supply: String,
    /// Claims held by the converter authority
    pub claims_held: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertTarget {
    pub token_a: String,
    pub token_b: String,
}

/// Quote a `convert_multiple` over `targets`
#[derive(Debug, Deserialize)]
pub struct ConvertQuoteRequest {
    pub base_mint: String,
    pub wrapped_native_mint: String,
    #[serde(default)]
    pub bridges: Vec<BridgeInput>,
    pub pairs: Vec<PairInput>,
    pub targets: Vec<ConvertTarget>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HopQuote {
    pub from: String,
    pub to: String,
    pub amount_in: String,
    pub amount_out: String,
    /// Final hop pays the vault directly
    pub to_vault: bool,
}

#[derive(Debug, Serialize)]
pub struct ConversionQuote {
    pub token_a: String,
    pub token_b: String,
    pub amount_a: String,
    pub amount_b: String,
    pub amount_out: String,
    pub hops: Vec<HopQuote>,
}

#[derive(Debug, Serialize)]
pub struct ConvertQuoteResponse {
    pub conversions: Vec<ConversionQuote>,
    /// Base asset the vault receives from the whole batch
    pub total_out: String,
}

#[derive(Debug, Deserialize)]
pub struct EnterQuoteRequest {
    pub amount: String,
    pub pool_balance: String,
    pub total_shares: String,
}

#[derive(Debug, Serialize)]
pub struct EnterQuoteResponse {
    pub shares: String,
}

#[derive(Debug, Deserialize)]
pub struct LeaveQuoteRequest {
    pub shares: String,
    pub pool_balance: String,
    pub total_shares: String,
}

#[derive(Debug, Serialize)]
pub struct LeaveQuoteResponse {
    pub assets: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// CORS allowed origins
    pub cors_origins: Vec<String>,

    /// API keys for authentication
    pub api_keys: Vec<String>,

    /// Upper bound on targets in one conversion quote, never above the
    /// program's batch limit
    pub max_targets: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3002,
            cors_origins: vec!["http://localhost:3000".to_string()],
            api_keys: vec![],
            max_targets: MAX_BATCH_SIZE,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let cors_origins = std::env::var("CORS_ORIGINS")
            .ok()
            .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or(defaults.cors_origins);

        let api_keys = std::env::var("API_KEYS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let max_targets = std::env::var("MAX_TARGETS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_targets)
            .min(MAX_BATCH_SIZE);

        Self {
            port,
            cors_origins,
            api_keys,
            max_targets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_target_limit_matches_batch_limit() {
        assert_eq!(Config::default().max_targets, MAX_BATCH_SIZE);
    }
}
