// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état de l'application TUI autour du MarketDataController
//
// PATTERN : "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les intentions utilisateur passent par App::handle_event
// - App ne possède aucune donnée de marché : elle délègue au contrôleur
// ============================================================================

use tracing::{debug, info};

use crate::controller::{FetchOutcome, FetchRequest, MarketDataController};
use crate::models::{MarketRow, PageChange, Pagination};
use crate::ui::events::{
    is_currency_event, is_down_event, is_escape_event, is_first_page_event,
    is_larger_page_size_event, is_next_page_event, is_order_event, is_page_down_event,
    is_page_up_event, is_previous_page_event, is_quit_event, is_smaller_page_size_event,
    is_source_event, is_up_event, Event,
};
use crate::ui::source_view;

/// Nombre de lignes sautées par PageUp/PageDown dans la vue source
const SOURCE_SCROLL_STEP: u16 = 20;

// ============================================================================
// Enum : Screen
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Un seul écran actif à la fois
// - Le compilateur force à gérer tous les cas (exhaustivité)
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : sélecteurs + tableau des marchés
    Markets,

    /// Vue du code source (lecture seule)
    Source,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Propriétaire des settings, des lignes et du flag de chargement
    pub controller: MarketDataController,

    /// Total annoncé par le tableau (constante de configuration)
    pub total_rows: u64,

    /// Index de la ligne sélectionnée dans la page
    pub selected_index: usize,

    pub current_screen: Screen,

    /// Two-step quit : première pression de 'q' -> confirmation
    pub confirm_quit: bool,

    /// Première ligne visible dans la vue source
    pub source_scroll: u16,
}

impl App {
    pub fn new(controller: MarketDataController, total_rows: u64) -> Self {
        Self {
            running: true,
            controller,
            total_rows,
            selected_index: 0,
            current_screen: Screen::Markets,
            confirm_quit: false,
            source_scroll: 0,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // ========================================================================
    // Lecture
    // ========================================================================

    /// Pagination courante, dérivée des settings
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.controller.settings(), self.total_rows)
    }

    pub fn selected_row(&self) -> Option<&MarketRow> {
        self.controller.rows().get(self.selected_index)
    }

    pub fn is_on_markets(&self) -> bool {
        self.current_screen == Screen::Markets
    }

    pub fn is_on_source(&self) -> bool {
        self.current_screen == Screen::Source
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn navigate_down(&mut self) {
        let max_index = self.controller.rows().len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    pub fn show_source(&mut self) {
        self.current_screen = Screen::Source;
    }

    pub fn show_markets(&mut self) {
        self.current_screen = Screen::Markets;
    }

    pub fn scroll_source_down(&mut self, lines: u16) {
        let max_scroll = source_view::line_count().saturating_sub(1);
        self.source_scroll = self.source_scroll.saturating_add(lines).min(max_scroll);
    }

    pub fn scroll_source_up(&mut self, lines: u16) {
        self.source_scroll = self.source_scroll.saturating_sub(lines);
    }

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    // ========================================================================
    // Intentions -> contrôleur
    // ========================================================================

    /// Transmet un changement de pagination rapporté par le tableau
    fn report_page_change(&mut self, change: PageChange) -> Option<FetchRequest> {
        self.controller.update_pagination(change.page, change.page_size)
    }

    /// Applique un résultat du worker ; la sélection revient en haut
    pub fn settle(&mut self, outcome: FetchOutcome) -> bool {
        let applied = self.controller.settle(outcome);
        if applied {
            self.selected_index = 0;
        }
        applied
    }

    /// Traite un événement et retourne la requête de fetch à envoyer, s'il y en a une
    ///
    /// CONCEPT RUST : Pattern matching avec guards
    /// - Chaque bras teste une intention ET l'écran courant
    /// - L'ordre des bras compte : le premier qui matche gagne
    pub fn handle_event(&mut self, event: Event) -> Option<FetchRequest> {
        if let Event::Tick = event {
            return None;
        }

        if is_quit_event(&event) {
            if self.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                self.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                self.request_quit();
            }
            return None;
        }

        // Toute autre touche annule la confirmation de quit
        self.cancel_quit();

        match self.current_screen {
            Screen::Markets => self.handle_markets_event(&event),
            Screen::Source => {
                self.handle_source_event(&event);
                None
            }
        }
    }

    fn handle_markets_event(&mut self, event: &Event) -> Option<FetchRequest> {
        let settings = *self.controller.settings();
        let pagination = self.pagination();

        match event {
            e if is_currency_event(e) => {
                let currency = settings.currency().toggled();
                info!(currency = %currency, "User changed currency");
                self.controller.update_currency(currency)
            }
            e if is_order_event(e) => {
                let order = settings.order().toggled();
                info!(order = %order, "User changed order");
                self.controller.update_order(order)
            }
            e if is_next_page_event(e) => self.report_page_change(pagination.next_page()),
            e if is_previous_page_event(e) => self.report_page_change(pagination.previous_page()),
            e if is_first_page_event(e) => self.report_page_change(pagination.first_page()),
            e if is_larger_page_size_event(e) => self.report_page_change(pagination.larger_page_size()),
            e if is_smaller_page_size_event(e) => self.report_page_change(pagination.smaller_page_size()),
            e if is_up_event(e) => {
                self.navigate_up();
                None
            }
            e if is_down_event(e) => {
                self.navigate_down();
                None
            }
            e if is_source_event(e) => {
                debug!("User opened source view");
                self.show_source();
                None
            }
            _ => None,
        }
    }

    fn handle_source_event(&mut self, event: &Event) {
        match event {
            e if is_escape_event(e) || is_source_event(e) => {
                debug!("User returned to markets");
                self.show_markets();
            }
            e if is_down_event(e) => self.scroll_source_down(1),
            e if is_up_event(e) => self.scroll_source_up(1),
            e if is_page_down_event(e) => self.scroll_source_down(SOURCE_SCROLL_STEP),
            e if is_page_up_event(e) => self.scroll_source_up(SOURCE_SCROLL_STEP),
            _ => {}
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(MarketDataController::default(), crate::models::DEFAULT_TOTAL_ROWS)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
