// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod settings;   // Paramètres d'affichage (devise, ordre, pagination)
pub mod market_row; // Ligne de marché normalisée
pub mod pagination; // Calculs de pagination (total fixe, tailles de page)

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use coinmarkets::models::settings::DisplaySettings;
// On peut faire : use coinmarkets::models::DisplaySettings;
pub use settings::{Currency, DisplaySettings, SortOrder, UnknownVariant, DEFAULT_PAGE, DEFAULT_PER_PAGE};
pub use market_row::MarketRow;
pub use pagination::{PageChange, Pagination, DEFAULT_TOTAL_ROWS, PAGE_SIZE_OPTIONS};
