// ============================================================================
// CoinMarkets - Liste des marchés crypto dans le terminal
// ============================================================================
// Programme TUI : tableau paginé des marchés CoinGecko, sélecteurs de devise
// et d'ordre, vue du code source du contrôleur.
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère résultats, rendering et événements
// 3. Worker thread : les fetchs async tournent hors du thread UI
// 4. Restauration du terminal même en cas d'erreur
// ============================================================================

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use coinmarkets::api::CoinGeckoClient;
use coinmarkets::app::App;
use coinmarkets::config::{Config, DEFAULT_LOG_FILTER};
use coinmarkets::controller::MarketDataController;
use coinmarkets::models::{
    Currency, DisplaySettings, Pagination, SortOrder, DEFAULT_PAGE, DEFAULT_PER_PAGE,
};
use coinmarkets::ui::{render, EventHandler};
use coinmarkets::worker::FetchWorker;

// ============================================================================
// Arguments de ligne de commande
// ============================================================================
// CONCEPT RUST : clap derive
// - Chaque champ devient une option --nom-du-champ
// - Les enums sont parsés via leur impl FromStr
// ============================================================================

/// Liste des marchés crypto (CoinGecko) dans le terminal
#[derive(Debug, Parser)]
#[command(name = "coinmarkets", version, about)]
struct Args {
    /// Devise initiale (usd, eur)
    #[arg(long, default_value_t = Currency::Usd)]
    currency: Currency,

    /// Ordre initial (market_cap_desc, market_cap_asc, desc, asc)
    #[arg(long, default_value_t = SortOrder::MarketCapDesc)]
    order: SortOrder,

    /// Page initiale
    #[arg(long, default_value_t = DEFAULT_PAGE)]
    page: u32,

    /// Lignes par page
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    per_page: u32,

    /// Endpoint /coins/markets (remplace COINMARKETS_API_BASE)
    #[arg(long)]
    api_base: Option<String>,

    /// Total de lignes annoncé par le tableau (remplace COINMARKETS_TOTAL_ROWS)
    #[arg(long)]
    total_rows: Option<u64>,
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place, avec rotation quotidienne
// ============================================================================

/// Répertoire des logs : ~/.local/share/coinmarkets/logs sur Linux, ./logs à défaut
fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("coinmarkets").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f ~/.local/share/coinmarkets/logs/coinmarkets.log.*
///
/// # Contrôler le niveau de log
/// RUST_LOG=trace coinmarkets
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "coinmarkets.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_thread_names(true) // fetch-worker vs main
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    // Si le logging échoue, on prévient et on continue sans
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!("CoinMarkets starting up");

    // Configuration : défauts < environnement < ligne de commande
    let mut config = Config::from_env()?;
    if let Some(api_base) = args.api_base {
        config.api_base = api_base;
    }
    if let Some(total_rows) = args.total_rows {
        config.total_rows = total_rows;
    }
    debug!(?config, "Configuration loaded");

    let client = CoinGeckoClient::new(config.api_base.clone(), &config.user_agent)
        .context("Échec de la création du client HTTP")?;
    info!(api_base = %client.base_url(), "HTTP client ready");

    info!("Spawning fetch worker thread");
    let worker = FetchWorker::spawn(Arc::new(client))?;

    // --page 5000 en 10/page n'existe pas : on démarre sur la dernière page
    let requested = DisplaySettings::new(args.order, args.currency, args.page, args.per_page);
    let settings = Pagination::clamp_settings(requested, config.total_rows);
    if settings != requested {
        info!(
            requested = requested.current_page(),
            page = settings.current_page(),
            "Start page clamped to page count"
        );
    }
    let mut app = App::new(MarketDataController::new(settings), config.total_rows);

    // Premier fetch automatique : l'écran démarre en état Loading
    worker.submit(app.controller.activate())?;

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::default();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &worker);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    // Le worker s'arrête même si la restauration échoue
    let restored = restore_terminal(&mut terminal);
    worker.shutdown();
    restored?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   1. Appliquer les résultats du worker
//   2. Dessiner l'interface
//   3. Lire un événement et envoyer la requête éventuelle au worker
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    worker: &FetchWorker,
) -> Result<()> {
    while app.is_running() {
        for outcome in worker.drain() {
            app.settle(outcome);
        }

        terminal.draw(|frame| render(frame, app))?;

        let event = events.next()?;
        if let Some(request) = app.handle_event(event) {
            debug!(seq = request.seq, "Submitting fetch request");
            worker.submit(request)?;
        }
    }

    Ok(())
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI (raw mode + alternate screen)
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
