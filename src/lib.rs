// ============================================================================
// CoinMarkets - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;        // Client API CoinGecko + trait MarketSource
pub mod app;        // État de l'application TUI
pub mod config;     // Configuration (env, défauts)
pub mod controller; // MarketDataController : settings -> fetch -> lignes
pub mod models;     // Structures de données
pub mod ui;         // Interface utilisateur
pub mod worker;     // Worker thread des fetchs
