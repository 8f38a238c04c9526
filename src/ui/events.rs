// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier et les ticks de l'application
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Pattern matching : associer une touche à une intention
// 3. Error handling avec Result
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Tick régulier (rafraîchissement, résultats du worker)
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Crée un gestionnaire qui produit un Tick toutes les `tick_rate`
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT : Non-blocking I/O avec timeout
    /// - poll(timeout) attend au plus tick_rate
    /// - Si pas d'événement, retourne Ok(Event::Tick)
    /// - Le Tick laisse la boucle principale relever les résultats du worker
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                // Sur certains OS, on reçoit Press ET Release : on ne garde que Press
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

// ============================================================================
// Helpers : Convertir KeyEvent en intention
// ============================================================================

fn key_code(event: &Event) -> Option<KeyCode> {
    match event {
        Event::Key(key) => Some(key.code),
        Event::Tick => None,
    }
}

/// 'q' : quitter (avec confirmation)
pub fn is_quit_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('q') | KeyCode::Char('Q')))
}

pub fn is_escape_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Esc))
}

/// Flèche haut ou 'k' (vim)
pub fn is_up_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K')))
}

/// Flèche bas ou 'j' (vim)
pub fn is_down_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J')))
}

/// Flèche droite ou 'l' : page suivante
pub fn is_next_page_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Right | KeyCode::Char('l')))
}

/// Flèche gauche ou 'h' : page précédente
pub fn is_previous_page_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Left | KeyCode::Char('h')))
}

/// 'g' ou Home : première page
pub fn is_first_page_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('g') | KeyCode::Home))
}

/// '+' : taille de page suivante ('=' pour éviter Shift)
pub fn is_larger_page_size_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('+') | KeyCode::Char('=')))
}

/// '-' : taille de page précédente
pub fn is_smaller_page_size_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('-')))
}

/// 'c' : bascule de devise
pub fn is_currency_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('c') | KeyCode::Char('C')))
}

/// 'o' : bascule de l'ordre de tri
pub fn is_order_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('o') | KeyCode::Char('O')))
}

/// 's' : vue du code source
pub fn is_source_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('s') | KeyCode::Char('S')))
}

pub fn is_page_down_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::PageDown | KeyCode::Char(' ')))
}

pub fn is_page_up_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::PageUp))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, event::KeyModifiers::empty()))
    }

    #[test]
    fn test_is_quit_event() {
        assert!(is_quit_event(&key(KeyCode::Char('q'))));
        assert!(!is_quit_event(&key(KeyCode::Char('a'))));
        assert!(!is_quit_event(&Event::Tick));
    }

    #[test]
    fn test_page_events() {
        assert!(is_next_page_event(&key(KeyCode::Right)));
        assert!(is_next_page_event(&key(KeyCode::Char('l'))));
        assert!(is_previous_page_event(&key(KeyCode::Left)));
        assert!(is_larger_page_size_event(&key(KeyCode::Char('+'))));
        assert!(is_smaller_page_size_event(&key(KeyCode::Char('-'))));
        assert!(!is_next_page_event(&Event::Tick));
    }
}
