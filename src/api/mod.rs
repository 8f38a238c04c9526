// ============================================================================
// Module : api
// ============================================================================
// Ce module contient les clients API qui récupèrent les données de marché
// (CoinGecko) et le trait MarketSource qui les abstrait.
// ============================================================================

pub mod coingecko; // Client API CoinGecko
pub mod error;     // FetchError

use async_trait::async_trait;

use crate::models::{DisplaySettings, MarketRow};

// Re-export des types principaux
pub use coingecko::{build_markets_url, CoinGeckoClient, DEFAULT_MARKETS_URL};
pub use error::FetchError;

// ============================================================================
// Trait : MarketSource
// ============================================================================
// CONCEPT RUST : Trait objet + async_trait
// - Le worker manipule un Arc<dyn MarketSource>
// - En prod : CoinGeckoClient ; en test : une source en mémoire
// - async_trait transforme la méthode async en Future boxée (dyn-compatible)
// ============================================================================

/// Toute source capable de produire une page de lignes pour des settings
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Récupère une page de marchés ; une erreur est loggée puis propagée
    async fn fetch_rows(&self, settings: &DisplaySettings) -> Result<Vec<MarketRow>, FetchError>;
}
