// ============================================================================
// Pagination du tableau
// ============================================================================
// L'API /coins/markets ne renvoie pas le nombre total de lignes : le tableau
// annonce un total fixe (configurable, 10000 par défaut) et en déduit le
// nombre de pages.
//
// Chaque action renvoie un couple (page, taille) destiné à
// MarketDataController::update_pagination, comme le ferait un composant
// de pagination qui "rapporte" son nouvel état.
// ============================================================================

use crate::models::DisplaySettings;

/// Total annoncé par le tableau quand la configuration ne dit rien
pub const DEFAULT_TOTAL_ROWS: u64 = 10_000;

/// Tailles de page proposées, dans l'ordre du sélecteur
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 20, 50, 100];

/// État rapporté par le composant de pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageChange {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Vue de pagination calculée à partir des settings et du total annoncé
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub per_page: u32,
    pub total_rows: u64,
}

impl Pagination {
    pub fn new(settings: &DisplaySettings, total_rows: u64) -> Self {
        Self {
            current_page: settings.current_page(),
            per_page: settings.per_page(),
            total_rows,
        }
    }

    /// Nombre de pages : ceil(total / taille), au moins 1
    pub fn page_count(&self) -> u32 {
        page_count(self.total_rows, self.per_page)
    }

    /// Page suivante, bloquée sur la dernière
    pub fn next_page(&self) -> PageChange {
        self.goto(self.current_page.saturating_add(1).min(self.page_count()))
    }

    /// Page précédente, bloquée sur la première
    pub fn previous_page(&self) -> PageChange {
        self.goto(self.current_page.saturating_sub(1).max(1))
    }

    pub fn first_page(&self) -> PageChange {
        self.goto(1)
    }

    /// Settings dont la page est ramenée dans [1, page_count]
    ///
    /// Sert au démarrage : une page venue de la ligne de commande peut
    /// dépasser le nombre de pages annoncé par le tableau.
    pub fn clamp_settings(settings: DisplaySettings, total_rows: u64) -> DisplaySettings {
        let max_page = page_count(total_rows, settings.per_page());
        if settings.current_page() <= max_page {
            return settings;
        }
        DisplaySettings::new(settings.order(), settings.currency(), max_page, settings.per_page())
    }

    /// Taille de page suivante dans PAGE_SIZE_OPTIONS
    ///
    /// La page courante est ramenée dans les bornes du nouveau nombre de pages.
    pub fn larger_page_size(&self) -> PageChange {
        let size = PAGE_SIZE_OPTIONS
            .iter()
            .copied()
            .find(|&s| s > self.per_page)
            .unwrap_or(self.per_page);
        self.resize(size)
    }

    /// Taille de page précédente dans PAGE_SIZE_OPTIONS
    pub fn smaller_page_size(&self) -> PageChange {
        let size = PAGE_SIZE_OPTIONS
            .iter()
            .rev()
            .copied()
            .find(|&s| s < self.per_page)
            .unwrap_or(self.per_page);
        self.resize(size)
    }

    /// Index (base 1) de la première ligne de la page courante
    pub fn first_row_index(&self) -> u64 {
        u64::from(self.current_page - 1) * u64::from(self.per_page) + 1
    }

    fn goto(&self, page: u32) -> PageChange {
        PageChange {
            page: Some(page),
            page_size: Some(self.per_page),
        }
    }

    fn resize(&self, size: u32) -> PageChange {
        let max_page = page_count(self.total_rows, size);
        PageChange {
            page: Some(self.current_page.min(max_page)),
            page_size: Some(size),
        }
    }
}

/// ceil(total / per_page), jamais 0
pub fn page_count(total_rows: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page.max(1));
    let pages = total_rows.div_ceil(per_page).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Currency, SortOrder};

    fn pagination(page: u32, per_page: u32) -> Pagination {
        let settings = DisplaySettings::new(SortOrder::MarketCapDesc, Currency::Usd, page, per_page);
        Pagination::new(&settings, DEFAULT_TOTAL_ROWS)
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(10_000, 10), 1000);
        assert_eq!(page_count(10_000, 30), 334);
        assert_eq!(page_count(0, 10), 1);
    }

    #[test]
    fn test_next_and_previous_are_clamped() {
        assert_eq!(pagination(1, 10).previous_page().page, Some(1));
        assert_eq!(pagination(1, 10).next_page().page, Some(2));
        assert_eq!(pagination(1000, 10).next_page().page, Some(1000));
        assert_eq!(pagination(5, 10).previous_page().page, Some(4));
    }

    #[test]
    fn test_next_page_from_u32_max_stays_on_last_page() {
        assert_eq!(pagination(u32::MAX, 10).next_page().page, Some(1000));
    }

    #[test]
    fn test_clamp_settings_limits_start_page() {
        let settings = DisplaySettings::new(SortOrder::MarketCapAsc, Currency::Eur, 5000, 10);
        let clamped = Pagination::clamp_settings(settings, DEFAULT_TOTAL_ROWS);
        assert_eq!(clamped.current_page(), 1000);
        assert_eq!(clamped.per_page(), 10);
        assert_eq!(clamped.currency(), Currency::Eur);
        assert_eq!(clamped.order(), SortOrder::MarketCapAsc);

        // Une page valide n'est pas touchée
        let settings = DisplaySettings::new(SortOrder::MarketCapDesc, Currency::Usd, 42, 10);
        assert_eq!(Pagination::clamp_settings(settings, DEFAULT_TOTAL_ROWS), settings);

        assert_eq!(Pagination::new(&clamped, DEFAULT_TOTAL_ROWS).next_page().page, Some(1000));
    }

    #[test]
    fn test_page_change_keeps_page_size() {
        let change = pagination(3, 20).next_page();
        assert_eq!(change.page_size, Some(20));
    }

    #[test]
    fn test_page_size_cycle() {
        assert_eq!(pagination(1, 10).larger_page_size().page_size, Some(20));
        assert_eq!(pagination(1, 100).larger_page_size().page_size, Some(100));
        assert_eq!(pagination(1, 50).smaller_page_size().page_size, Some(20));
        assert_eq!(pagination(1, 10).smaller_page_size().page_size, Some(10));
    }

    #[test]
    fn test_resize_clamps_current_page() {
        // page 800 en 10/page existe, mais pas en 20/page (500 pages)
        let change = pagination(800, 10).larger_page_size();
        assert_eq!(change.page, Some(500));
        assert_eq!(change.page_size, Some(20));
    }

    #[test]
    fn test_first_row_index() {
        assert_eq!(pagination(1, 10).first_row_index(), 1);
        assert_eq!(pagination(3, 20).first_row_index(), 41);
    }
}
