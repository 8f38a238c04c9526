// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events;      // Gestion des événements clavier
pub mod markets;     // Rendu de l'écran des marchés
pub mod source_view; // Rendu de la vue source

use ratatui::Frame;

use crate::app::{App, Screen};

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - Le compilateur garantit l'exhaustivité (tous les écrans gérés)
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.size();
    match app.current_screen {
        Screen::Markets => markets::render_markets(frame, app, area),
        Screen::Source => source_view::render_source_view(frame, app, area),
    }
}
