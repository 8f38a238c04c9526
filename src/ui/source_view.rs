// ============================================================================
// Vue Source : code du contrôleur en lecture seule
// ============================================================================
// CONCEPT RUST : include_str!
// - Le fichier est embarqué dans le binaire à la compilation
// - Aucune lecture disque à l'exécution
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

/// Code source affiché dans la vue
pub const SOURCE_CODE: &str = include_str!("../controller.rs");

/// Nombre de lignes du source embarqué
pub fn line_count() -> u16 {
    u16::try_from(SOURCE_CODE.lines().count()).unwrap_or(u16::MAX)
}

/// Lignes numérotées, prêtes pour un Paragraph
fn numbered_lines() -> Vec<Line<'static>> {
    SOURCE_CODE
        .lines()
        .enumerate()
        .map(|(i, code)| {
            Line::from(vec![
                Span::styled(format!("{:>4} │ ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(code),
            ])
        })
        .collect()
}

/// Dessine la vue source plein écran avec une ligne d'aide en bas
pub fn render_source_view(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" App Source Code (src/controller.rs) ");

    let paragraph = Paragraph::new(numbered_lines())
        .block(block)
        .scroll((app.source_scroll, 0));

    frame.render_widget(paragraph, chunks[0]);

    let help = Line::from(vec![
        Span::styled("[↑↓ / j k]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw(" Scroll  "),
        Span::styled("[PgUp/PgDn]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw(" Page  "),
        Span::styled("[Esc / s]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw(" Retour  "),
        Span::styled(
            format!("ligne {}/{}", app.source_scroll + 1, line_count()),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let footer = Paragraph::new(help)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)))
        .alignment(Alignment::Center);

    frame.render_widget(footer, chunks[1]);
}
