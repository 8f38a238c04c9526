// ============================================================================
// Configuration
// ============================================================================
// Valeurs par défaut, surchargées par l'environnement (.env compris) puis par
// la ligne de commande dans main.rs.
//
// Variables reconnues :
// - COINMARKETS_API_BASE   : endpoint de listing des marchés
// - COINMARKETS_TOTAL_ROWS : total annoncé par le tableau (10000 par défaut)
// - RUST_LOG               : filtre de logs (lu par EnvFilter)
// ============================================================================

use anyhow::{Context, Result};

use crate::api::DEFAULT_MARKETS_URL;
use crate::models::DEFAULT_TOTAL_ROWS;

pub const ENV_API_BASE: &str = "COINMARKETS_API_BASE";
pub const ENV_TOTAL_ROWS: &str = "COINMARKETS_TOTAL_ROWS";

/// Filtre utilisé si RUST_LOG est absent
pub const DEFAULT_LOG_FILTER: &str = "coinmarkets=debug,info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Endpoint /coins/markets
    pub api_base: String,

    /// Total de lignes annoncé par le tableau (l'API ne le fournit pas)
    pub total_rows: u64,

    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_MARKETS_URL.to_string(),
            total_rows: DEFAULT_TOTAL_ROWS,
            user_agent: format!("coinmarkets/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Charge .env (sans écraser l'environnement existant) puis lit les variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// CONCEPT RUST : Closure en paramètre
    /// - `lookup` abstrait la source des variables (env réel ou HashMap de test)
    /// - impl Fn : dispatch statique, pas de Box
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base) = lookup(ENV_API_BASE).filter(|v| !v.trim().is_empty()) {
            config.api_base = base.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_TOTAL_ROWS) {
            config.total_rows = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{} invalide : '{}'", ENV_TOTAL_ROWS, raw))?;
        }

        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================
