// ============================================================================
// Markets - Rendu de l'écran principal
// ============================================================================
// Header, barre de sélecteurs, tableau paginé, footer
//
// CONCEPTS RATATUI :
// 1. Layout : découpage de l'espace en zones
// 2. Table + TableState : tableau avec ligne sélectionnée
// 3. Style : couleurs et attributs de texte
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        block::{Position, Title},
        Block, Borders, Cell, Paragraph, Row, Table, TableState,
    },
    Frame,
};

use crate::app::App;

/// Largeur max du nom dans la colonne Name
const NAME_WIDTH: usize = 28;

/// Dessine l'écran des marchés
pub fn render_markets(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = create_layout(area);

    render_header(frame, chunks[0]);
    render_selectors(frame, app, chunks[1]);
    render_table(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

/// Crée le layout principal (header, sélecteurs, tableau, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Sélecteurs
            Constraint::Min(0),    // Tableau : tout le reste
            Constraint::Length(3), // Footer
        ])
        .split(area)
        .to_vec()
}

fn render_header(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" CoinMarkets ")
        .title_alignment(Alignment::Center);

    let paragraph = Paragraph::new(Line::from(Span::styled(
        "Coins & Market",
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )))
    .block(block)
    .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Les deux "selects" : devise et ordre de tri
fn render_selectors(frame: &mut Frame, app: &App, area: Rect) {
    let settings = app.controller.settings();
    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let value_style = Style::default().fg(Color::White).add_modifier(Modifier::REVERSED);

    let line = Line::from(vec![
        Span::styled("[c]", key_style),
        Span::raw(" Currency "),
        Span::styled(format!(" {} ", settings.currency().label()), value_style),
        Span::raw("    "),
        Span::styled("[o]", key_style),
        Span::raw(" Order "),
        Span::styled(format!(" {} ", settings.order().label()), value_style),
    ]);

    let paragraph = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)))
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}

/// Tableau des marchés, ou message si la page est vide
fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let controller = &app.controller;
    let currency = controller.settings().currency();

    let title = if controller.is_loading() {
        " Markets ⏳ Loading... ".to_string()
    } else {
        match controller.last_fetched_at() {
            Some(at) => format!(" Markets (updated {}) ", at.format("%H:%M:%S UTC")),
            None => " Markets ".to_string(),
        }
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);

    // Horodatage API de la ligne sélectionnée, en bas à droite du cadre
    if let Some(row) = app.selected_row() {
        block = block.title(
            Title::from(format!(" {} · last update {} ", row.name, row.display_last_updated()))
                .position(Position::Bottom)
                .alignment(Alignment::Right),
        );
    }

    if controller.rows().is_empty() {
        let mut text = vec![Line::from("")];
        if controller.is_loading() {
            text.push(Line::from(Span::styled("Loading...", Style::default().fg(Color::Gray))));
        } else {
            text.push(Line::from(Span::styled("No data", Style::default().fg(Color::Gray))));
            if let Some(error) = controller.last_error() {
                text.push(Line::from(Span::styled(
                    format!("⚠ {}", error),
                    Style::default().fg(Color::Red),
                )));
            }
        }

        let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Name"),
        Cell::from("Current Price"),
        Cell::from("Circulating Supply"),
    ])
    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    .bottom_margin(1);

    // Numérotation globale : la page 3 en 20/page commence à 41
    let first_index = app.pagination().first_row_index();

    let rows: Vec<Row> = controller
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Row::new(vec![
                Cell::from(format!("{}", first_index + i as u64)),
                Cell::from(row.display_name(NAME_WIDTH)),
                Cell::from(row.display_price(currency)),
                Cell::from(row.display_supply()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(7),
        Constraint::Length(NAME_WIDTH as u16 + 2),
        Constraint::Length(20),
        Constraint::Min(20),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
        .highlight_symbol("▶ ");

    let mut state = TableState::default().with_selected(Some(app.selected_index));
    frame.render_stateful_widget(table, area, &mut state);
}

/// Footer : pagination + raccourcis, ou confirmation de quit
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let line = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled("⚠  Appuyez sur ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        let pagination = app.pagination();
        let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

        Line::from(vec![
            Span::styled(
                format!(
                    "Page {} / {} · {} / page · {} rows  ",
                    pagination.current_page,
                    pagination.page_count(),
                    pagination.per_page,
                    pagination.total_rows
                ),
                Style::default().fg(Color::Green),
            ),
            Span::styled("[← →]", key_style),
            Span::raw(" Page  "),
            Span::styled("[+ -]", key_style),
            Span::raw(" Size  "),
            Span::styled("[s]", key_style),
            Span::raw(" Source  "),
            Span::styled("[q]", key_style),
            Span::raw(" Quit"),
        ])
    };

    let paragraph = Paragraph::new(line).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FetchError;
    use crate::controller::FetchOutcome;
    use crate::models::MarketRow;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal
            .draw(|frame| render_markets(frame, app, frame.size()))
            .unwrap();

        let buffer = terminal.backend().buffer().clone();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|line| line.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_render_rows_and_pagination() {
        let mut app = App::default();
        let request = app.controller.activate();
        app.settle(FetchOutcome {
            seq: request.seq,
            result: Ok(vec![MarketRow {
                id: "bitcoin".to_string(),
                name: "Bitcoin".to_string(),
                image_url: String::new(),
                current_price: Some(67012.5),
                circulating_supply: Some(19_687_500.0),
                last_updated: None,
            }]),
        });

        let screen = draw(&app);
        assert!(screen.contains("Bitcoin"));
        assert!(screen.contains("$67,012.50"));
        assert!(screen.contains("19,687,500"));
        assert!(screen.contains("Page 1 / 1000"));
        assert!(screen.contains("USD"));
    }

    #[test]
    fn test_render_selected_row_last_update() {
        let mut app = App::default();
        let request = app.controller.activate();
        app.settle(FetchOutcome {
            seq: request.seq,
            result: Ok(vec![MarketRow {
                id: "ethereum".to_string(),
                name: "Ethereum".to_string(),
                image_url: String::new(),
                current_price: Some(3100.0),
                circulating_supply: None,
                last_updated: "2024-05-01T12:00:00.000Z".parse().ok(),
            }]),
        });

        let screen = draw(&app);
        assert!(screen.contains("Ethereum · last update 2024-05-01 12:00:00 UTC"));
    }

    #[test]
    fn test_render_loading() {
        let mut app = App::default();
        app.controller.activate();

        let screen = draw(&app);
        assert!(screen.contains("Loading..."));
    }

    #[test]
    fn test_render_error_message() {
        let mut app = App::default();
        let request = app.controller.activate();
        let err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        app.settle(FetchOutcome {
            seq: request.seq,
            result: Err(FetchError::Decode(err)),
        });

        let screen = draw(&app);
        assert!(screen.contains("No data"));
        assert!(screen.contains("réponse JSON invalide"));
    }
}
