// ============================================================================
// API Client : CoinGecko
// ============================================================================
// Récupère la liste des marchés depuis GET /api/v3/coins/markets
//
// CONCEPTS RUST AVANCÉS :
// 1. async/await : programmation asynchrone (non-bloquante)
// 2. Erreurs typées : FetchError avec conversions automatiques via ?
// 3. Serde : désérialisation JSON automatique, champs en trop ignorés
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use crate::api::{FetchError, MarketSource};
use crate::models::{DisplaySettings, MarketRow};

/// Endpoint de listing des marchés
pub const DEFAULT_MARKETS_URL: &str = "https://api.coingecko.com/api/v3/coins/markets";

// ============================================================================
// Structure pour parser un élément de la réponse JSON
// ============================================================================
// CoinGecko renvoie un tableau d'objets avec une trentaine de champs ; serde
// ignore par défaut ceux qu'on ne déclare pas.
// ============================================================================

#[derive(Debug, Deserialize)]
struct CoinMarketItem {
    id: String,
    name: String,
    #[serde(default)]
    image: String,
    current_price: Option<f64>,
    circulating_supply: Option<f64>,
    #[serde(default)]
    last_updated: Option<DateTime<Utc>>,
}

/// CONCEPT RUST : From trait
/// - Conversion explicite du format "wire" vers notre modèle
/// - Permet d'écrire `.map(MarketRow::from)`
impl From<CoinMarketItem> for MarketRow {
    fn from(item: CoinMarketItem) -> Self {
        MarketRow {
            id: item.id,
            name: item.name,
            image_url: item.image,
            current_price: item.current_price,
            circulating_supply: item.circulating_supply,
            last_updated: item.last_updated,
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// Client HTTP CoinGecko
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    /// Crée un client avec un User-Agent dédié
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self::with_http(http, base_url))
    }

    /// Crée un client à partir d'un reqwest::Client déjà configuré
    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MarketSource for CoinGeckoClient {
    /// CONCEPT RUST : #[instrument]
    /// - Ajoute un span avec les paramètres de la requête
    /// - Tous les logs à l'intérieur héritent de ce contexte
    #[instrument(
        skip(self, settings),
        fields(
            currency = %settings.currency(),
            order = %settings.order(),
            page = settings.current_page(),
            per_page = settings.per_page(),
        )
    )]
    async fn fetch_rows(&self, settings: &DisplaySettings) -> Result<Vec<MarketRow>, FetchError> {
        let url = build_markets_url(&self.base_url, settings);
        debug!(url = %url, "Built CoinGecko markets URL");

        match fetch_markets(&self.http, &url).await {
            Ok(rows) => {
                info!(rows = rows.len(), "Successfully fetched market rows");
                Ok(rows)
            }
            Err(e) => {
                // Loggé ici, propagé à l'appelant qui vide le tableau
                error!(error = %e, status = ?e.status(), "Error fetching market data");
                Err(e)
            }
        }
    }
}

/// Construit l'URL de listing : base + sparkline=false + 4 paramètres
///
/// CONCEPT RUST : &str vs String
/// - Prend des références (pas d'allocation pour les entrées)
/// - Retourne une String owned
pub fn build_markets_url(base_url: &str, settings: &DisplaySettings) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}sparkline=false&vs_currency={}&order={}&per_page={}&page={}",
        base_url,
        separator,
        settings.currency().as_query(),
        settings.order().as_query(),
        settings.per_page(),
        settings.current_page()
    )
}

/// Exécute la requête GET et convertit le tableau JSON en lignes
async fn fetch_markets(http: &reqwest::Client, url: &str) -> Result<Vec<MarketRow>, FetchError> {
    debug!("Sending HTTP request to CoinGecko");
    let response = http.get(url).send().await?;

    let status = response.status();
    debug!(status = %status, "Received HTTP response");

    // Vérifie que la réponse est un succès HTTP (200-299)
    if !status.is_success() {
        return Err(FetchError::Status { status });
    }

    let body = response.text().await?;
    parse_markets(&body)
}

/// Parse le corps JSON ; chaque item devient une MarketRow clé = id
fn parse_markets(body: &str) -> Result<Vec<MarketRow>, FetchError> {
    let items: Vec<CoinMarketItem> = serde_json::from_str(body)?;
    debug!(items = items.len(), "Parsed CoinGecko response");
    Ok(items.into_iter().map(MarketRow::from).collect())
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Currency, SortOrder};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const SAMPLE: &str = r#"[
        {
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
            "current_price": 67012.5,
            "market_cap": 1320000000000,
            "circulating_supply": 19687500.0,
            "last_updated": "2024-05-01T12:00:00.000Z"
        },
        {
            "id": "ethereum",
            "symbol": "eth",
            "name": "Ethereum",
            "image": "https://assets.coingecko.com/coins/images/279/large/ethereum.png",
            "current_price": 3120.1,
            "circulating_supply": 120100000.5
        }
    ]"#;

    /// Petit serveur HTTP une-requête : renvoie la tête de requête reçue
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }

            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;

            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{}/api/v3/coins/markets", addr), handle)
    }

    fn local_client(base_url: String) -> CoinGeckoClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        CoinGeckoClient::with_http(http, base_url)
    }

    #[test]
    fn test_build_markets_url_defaults() {
        let url = build_markets_url(DEFAULT_MARKETS_URL, &DisplaySettings::default());
        assert_eq!(
            url,
            "https://api.coingecko.com/api/v3/coins/markets?sparkline=false&vs_currency=usd&order=market_cap_desc&per_page=10&page=1"
        );
    }

    #[test]
    fn test_build_markets_url_contains_each_parameter_once() {
        let settings = DisplaySettings::new(SortOrder::MarketCapAsc, Currency::Eur, 3, 20);
        let url = build_markets_url(DEFAULT_MARKETS_URL, &settings);
        let query = url.split_once('?').unwrap().1;
        let params: Vec<&str> = query.split('&').collect();

        assert_eq!(
            params,
            vec![
                "sparkline=false",
                "vs_currency=eur",
                "order=market_cap_asc",
                "per_page=20",
                "page=3",
            ]
        );
    }

    #[test]
    fn test_build_markets_url_with_existing_query() {
        let url = build_markets_url("http://proxy/markets?x_cg_demo=1", &DisplaySettings::default());
        assert!(url.starts_with("http://proxy/markets?x_cg_demo=1&sparkline=false&"));
    }

    #[test]
    fn test_parse_markets_maps_ids_and_ignores_extra_fields() {
        let rows = parse_markets(SAMPLE).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "bitcoin");
        assert_eq!(rows[0].key(), "bitcoin");
        assert_eq!(rows[0].current_price, Some(67012.5));
        assert!(rows[0].last_updated.is_some());
        assert_eq!(rows[1].id, "ethereum");
        assert!(rows[1].last_updated.is_none());
    }

    #[test]
    fn test_parse_markets_accepts_null_numbers() {
        let body = r#"[{"id":"x","name":"X","image":"","current_price":null,"circulating_supply":null}]"#;
        let rows = parse_markets(body).unwrap();
        assert_eq!(rows[0].current_price, None);
        assert_eq!(rows[0].circulating_supply, None);
    }

    #[test]
    fn test_parse_markets_rejects_non_array() {
        let err = parse_markets(r#"{"status":{"error_code":429}}"#).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_rows_sends_expected_query() {
        let (base_url, server) = serve_once("HTTP/1.1 200 OK", SAMPLE).await;
        let client = local_client(base_url);

        let rows = client.fetch_rows(&DisplaySettings::default()).await.unwrap();
        assert_eq!(rows.len(), 2);

        let request = server.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert_eq!(
            request_line,
            "GET /api/v3/coins/markets?sparkline=false&vs_currency=usd&order=market_cap_desc&per_page=10&page=1 HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_fetch_rows_twice_is_idempotent() {
        let settings = DisplaySettings::default();

        let (base_url, server) = serve_once("HTTP/1.1 200 OK", SAMPLE).await;
        let first = local_client(base_url).fetch_rows(&settings).await.unwrap();
        server.await.unwrap();

        let (base_url, server) = serve_once("HTTP/1.1 200 OK", SAMPLE).await;
        let second = local_client(base_url).fetch_rows(&settings).await.unwrap();
        server.await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fetch_rows_non_success_status() {
        let (base_url, server) =
            serve_once("HTTP/1.1 429 Too Many Requests", r#"{"error":"rate limited"}"#).await;
        let client = local_client(base_url);

        let err = client.fetch_rows(&DisplaySettings::default()).await.unwrap_err();
        assert_eq!(err.status(), Some(reqwest::StatusCode::TOO_MANY_REQUESTS));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_rows_connection_refused() {
        // Port libéré juste après le bind : plus personne n'écoute
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = local_client(format!("http://{}/api/v3/coins/markets", addr));
        let err = client.fetch_rows(&DisplaySettings::default()).await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
    }
}
