// ============================================================================
// MarketDataController
// ============================================================================
// Traduit les DisplaySettings en requête distante et publie le résultat.
//
// Cycle par fetch :
//   Idle -> Loading (settings modifiés) -> Populated | Empty -> Idle
//
// CONCEPTS RUST :
// 1. Value type : les settings sont remplacés en entier, jamais patchés
// 2. Déclenchement par inégalité de valeur (PartialEq), pas par identité
// 3. Numéro de séquence : seule la dernière requête émise peut s'appliquer
// ============================================================================

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::api::{FetchError, MarketSource};
use crate::models::{Currency, DisplaySettings, MarketRow, SortOrder};

/// Requête de fetch étiquetée par un numéro de séquence croissant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub settings: DisplaySettings,
}

/// Résultat d'une requête, renvoyé au contrôleur
#[derive(Debug)]
pub struct FetchOutcome {
    pub seq: u64,
    pub result: Result<Vec<MarketRow>, FetchError>,
}

/// Exécute une requête sur une source et emballe le résultat
///
/// Ne propage jamais l'erreur : elle voyage dans le FetchOutcome.
pub async fn run_cycle(source: &dyn MarketSource, request: FetchRequest) -> FetchOutcome {
    let result = source.fetch_rows(&request.settings).await;
    FetchOutcome {
        seq: request.seq,
        result,
    }
}

/// État possédé par le contrôleur : settings, lignes, chargement
#[derive(Debug)]
pub struct MarketDataController {
    settings: DisplaySettings,
    rows: Vec<MarketRow>,
    loading: bool,
    latest_seq: u64,
    last_error: Option<String>,
    last_fetched_at: Option<DateTime<Utc>>,
}

impl MarketDataController {
    pub fn new(settings: DisplaySettings) -> Self {
        Self {
            settings,
            rows: Vec::new(),
            loading: false,
            latest_seq: 0,
            last_error: None,
            last_fetched_at: None,
        }
    }

    // ========================================================================
    // Lecture
    // ========================================================================

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    pub fn rows(&self) -> &[MarketRow] {
        &self.rows
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message de la dernière erreur, effacé au prochain succès
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_fetched_at(&self) -> Option<DateTime<Utc>> {
        self.last_fetched_at
    }

    // ========================================================================
    // Opérations
    // ========================================================================

    /// Premier fetch, avec les settings courants
    pub fn activate(&mut self) -> FetchRequest {
        info!(settings = ?self.settings, "Initial market fetch");
        self.issue()
    }

    pub fn update_currency(&mut self, currency: Currency) -> Option<FetchRequest> {
        self.apply(self.settings.with_currency(currency))
    }

    pub fn update_order(&mut self, order: SortOrder) -> Option<FetchRequest> {
        self.apply(self.settings.with_order(order))
    }

    /// Pagination rapportée par le tableau ; valeurs absentes -> défauts
    pub fn update_pagination(&mut self, page: Option<u32>, page_size: Option<u32>) -> Option<FetchRequest> {
        self.apply(self.settings.with_pagination(page, page_size))
    }

    /// Remplace les settings ; émet une requête seulement s'ils ont changé
    pub fn apply(&mut self, next: DisplaySettings) -> Option<FetchRequest> {
        if next == self.settings {
            debug!("Settings unchanged, no fetch");
            return None;
        }

        info!(from = ?self.settings, to = ?next, "Display settings changed");
        self.settings = next;
        Some(self.issue())
    }

    /// Applique le résultat d'une requête s'il correspond à la dernière émise
    ///
    /// Retourne false si le résultat était périmé (ignoré).
    pub fn settle(&mut self, outcome: FetchOutcome) -> bool {
        if outcome.seq != self.latest_seq {
            debug!(
                seq = outcome.seq,
                latest = self.latest_seq,
                "Discarding stale fetch outcome"
            );
            return false;
        }

        match outcome.result {
            Ok(rows) => {
                debug!(seq = outcome.seq, rows = rows.len(), "Applying fetched rows");
                self.rows = rows;
                self.last_error = None;
                self.last_fetched_at = Some(Utc::now());
            }
            Err(e) => {
                warn!(seq = outcome.seq, error = %e, "Failed to load data, clearing rows");
                self.rows = Vec::new();
                self.last_error = Some(e.to_string());
            }
        }

        self.loading = false;
        true
    }

    fn issue(&mut self) -> FetchRequest {
        self.latest_seq += 1;
        self.loading = true;
        FetchRequest {
            seq: self.latest_seq,
            settings: self.settings,
        }
    }
}

impl Default for MarketDataController {
    fn default() -> Self {
        Self::new(DisplaySettings::default())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
