// ============================================================================
// Structure : DisplaySettings
// ============================================================================
// Paramètres d'affichage contrôlés par l'utilisateur : devise, ordre de tri,
// page courante et taille de page.
//
// CONCEPTS RUST :
// 1. Value type : DisplaySettings est Copy, on le remplace en entier
// 2. Fonctions pures : chaque mise à jour retourne un NOUVEAU settings
// 3. PartialEq : le cycle de fetch se déclenche sur inégalité de valeur
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page affichée au démarrage
pub const DEFAULT_PAGE: u32 = 1;

/// Nombre de lignes par page au démarrage, et repli quand la pagination
/// ne précise pas de taille
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Erreur de parsing d'une valeur d'enum (CLI, config)
#[derive(Debug, Error, PartialEq, Eq)]
#[error("valeur inconnue pour {kind} : '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

// ============================================================================
// Enum : Currency
// ============================================================================

/// Devise cible des prix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
}

impl Currency {
    /// Valeur du paramètre `vs_currency`
    pub fn as_query(&self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Eur => "eur",
        }
    }

    /// Label pour le sélecteur
    pub fn label(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
        }
    }

    /// Bascule USD <-> EUR (touche 'c')
    pub fn toggled(&self) -> Self {
        match self {
            Currency::Usd => Currency::Eur,
            Currency::Eur => Currency::Usd,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for Currency {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usd" => Ok(Currency::Usd),
            "eur" => Ok(Currency::Eur),
            _ => Err(UnknownVariant {
                kind: "currency",
                value: s.to_string(),
            }),
        }
    }
}

// ============================================================================
// Enum : SortOrder
// ============================================================================

/// Ordre de tri par capitalisation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    MarketCapDesc,
    MarketCapAsc,
}

impl SortOrder {
    /// Valeur du paramètre `order`
    pub fn as_query(&self) -> &'static str {
        match self {
            SortOrder::MarketCapDesc => "market_cap_desc",
            SortOrder::MarketCapAsc => "market_cap_asc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::MarketCapDesc => "Market cap descending",
            SortOrder::MarketCapAsc => "Market cap ascending",
        }
    }

    /// Bascule desc <-> asc (touche 'o')
    pub fn toggled(&self) -> Self {
        match self {
            SortOrder::MarketCapDesc => SortOrder::MarketCapAsc,
            SortOrder::MarketCapAsc => SortOrder::MarketCapDesc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for SortOrder {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "market_cap_desc" | "desc" => Ok(SortOrder::MarketCapDesc),
            "market_cap_asc" | "asc" => Ok(SortOrder::MarketCapAsc),
            _ => Err(UnknownVariant {
                kind: "order",
                value: s.to_string(),
            }),
        }
    }
}

// ============================================================================
// DisplaySettings
// ============================================================================
// CONCEPT RUST : Champs privés + constructeur qui garantit l'invariant
// - current_page >= 1 et per_page >= 1 en permanence
// - Impossible de construire un settings invalide depuis l'extérieur
// ============================================================================

/// Snapshot complet des paramètres d'affichage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplaySettings {
    order: SortOrder,
    currency: Currency,
    current_page: u32,
    per_page: u32,
}

impl DisplaySettings {
    /// Construit un settings ; page et taille de page sont ramenées à 1 minimum
    pub fn new(order: SortOrder, currency: Currency, current_page: u32, per_page: u32) -> Self {
        Self {
            order,
            currency,
            current_page: current_page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Nouveau settings avec une autre devise, le reste inchangé
    ///
    /// CONCEPT RUST : `self` par valeur + struct update syntax
    /// - DisplaySettings est Copy, donc pas de move coûteux
    /// - `..self` recopie les champs non mentionnés
    pub fn with_currency(self, currency: Currency) -> Self {
        Self { currency, ..self }
    }

    /// Nouveau settings avec un autre ordre de tri
    pub fn with_order(self, order: SortOrder) -> Self {
        Self { order, ..self }
    }

    /// Nouveau settings avec une autre pagination
    ///
    /// Une page absente retombe sur 1, une taille absente sur
    /// DEFAULT_PER_PAGE (même valeur qu'au démarrage).
    pub fn with_pagination(self, page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            current_page: page.unwrap_or(DEFAULT_PAGE).max(1),
            per_page: page_size.unwrap_or(DEFAULT_PER_PAGE).max(1),
            ..self
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self::new(
            SortOrder::default(),
            Currency::default(),
            DEFAULT_PAGE,
            DEFAULT_PER_PAGE,
        )
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
