// ============================================================================
// Erreur : FetchError
// ============================================================================
// Une seule famille d'erreur à la frontière du fetch : transport, statut HTTP
// non-succès ou réponse malformée. Aucune distinction transitoire/permanente,
// aucun retry.
//
// CONCEPT RUST : thiserror
// - #[derive(Error)] génère l'implémentation de std::error::Error
// - #[from] génère From<reqwest::Error> pour que ? convertisse tout seul
// ============================================================================

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Échec réseau (DNS, connexion, lecture du corps...)
    #[error("requête HTTP échouée : {0}")]
    Http(#[from] reqwest::Error),

    /// L'API a répondu avec un statut non-succès
    #[error("l'API a retourné HTTP {status}")]
    Status { status: StatusCode },

    /// Le corps n'est pas le tableau JSON attendu
    #[error("réponse JSON invalide : {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Statut HTTP associé, s'il y en a un
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status { status } => Some(*status),
            FetchError::Http(e) => e.status(),
            FetchError::Decode(_) => None,
        }
    }
}
