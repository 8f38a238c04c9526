// ============================================================================
// Background Fetch Worker
// ============================================================================
// CONCEPT RUST : Background async worker avec channels
// - Thread séparé qui possède un runtime tokio
// - Reçoit des FetchRequest via un channel
// - Envoie des FetchOutcome via un autre channel
// - Permet de faire des appels API sans bloquer l'UI
//
// Une nouvelle requête annule (abort) la précédente si elle est encore en
// vol. Un résultat qui arriverait quand même en retard est écarté par le
// numéro de séquence dans MarketDataController::settle.
// ============================================================================

use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::MarketSource;
use crate::controller::{run_cycle, FetchOutcome, FetchRequest};

/// Poignée côté UI : envoie les requêtes, récupère les résultats
pub struct FetchWorker {
    command_tx: mpsc::Sender<FetchRequest>,
    result_rx: mpsc::Receiver<FetchOutcome>,
    handle: JoinHandle<()>,
}

impl FetchWorker {
    /// Lance le worker thread
    ///
    /// CONCEPT : Runtime créé AVANT le thread
    /// - Une erreur de création remonte à l'appelant via ?
    /// - Le runtime est ensuite "moved" dans le thread
    pub fn spawn(source: Arc<dyn MarketSource>) -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;

        let (command_tx, command_rx) = mpsc::channel::<FetchRequest>();
        let (result_tx, result_rx) = mpsc::channel::<FetchOutcome>();

        let handle = std::thread::Builder::new()
            .name("fetch-worker".to_string())
            .spawn(move || {
                let mut in_flight: Option<tokio::task::JoinHandle<()>> = None;

                // Boucle de traitement : se termine quand l'UI lâche le Sender
                while let Ok(request) = command_rx.recv() {
                    debug!(seq = request.seq, settings = ?request.settings, "Worker received fetch request");

                    if let Some(previous) = in_flight.take() {
                        if !previous.is_finished() {
                            debug!(seq = request.seq, "Aborting previous in-flight fetch");
                            previous.abort();
                        }
                    }

                    let source = Arc::clone(&source);
                    let result_tx = result_tx.clone();
                    in_flight = Some(runtime.spawn(async move {
                        let outcome = run_cycle(source.as_ref(), request).await;
                        if result_tx.send(outcome).is_err() {
                            debug!("Result channel closed, dropping outcome");
                        }
                    }));
                }

                info!("Fetch worker exiting (channel closed)");
            })
            .context("Échec du lancement du worker thread")?;

        Ok(Self {
            command_tx,
            result_rx,
            handle,
        })
    }

    /// Envoie une requête au worker
    pub fn submit(&self, request: FetchRequest) -> Result<()> {
        self.command_tx
            .send(request)
            .context("Le worker de fetch ne répond plus")
    }

    /// Récupère tous les résultats disponibles sans bloquer
    ///
    /// CONCEPT : Non-blocking receive avec try_iter
    /// - S'arrête dès que le channel est vide
    pub fn drain(&self) -> Vec<FetchOutcome> {
        self.result_rx.try_iter().collect()
    }

    /// Attend un résultat au plus `timeout`
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FetchOutcome> {
        self.result_rx.recv_timeout(timeout).ok()
    }

    /// Ferme le channel de commandes et attend la fin du thread
    pub fn shutdown(self) {
        drop(self.command_tx);
        if self.handle.join().is_err() {
            tracing::error!("Fetch worker thread panicked");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
