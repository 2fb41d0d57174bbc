//! Olho Vivo HTTP client.
//!
//! Provides async methods for the SPTrans Olho Vivo real-time API. The API
//! authenticates a session via `POST /Login/Autenticar` and tracks it with
//! a cookie, so the client enables reqwest's cookie store and memoizes the
//! authenticated state for the lifetime of the client.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use super::error::OlhoVivoError;
use super::types::{ArrivalPredictionDto, LineDto, PositionsDto, VehicleDto};

/// Default base URL for the Olho Vivo API.
const DEFAULT_BASE_URL: &str = "http://api.olhovivo.sptrans.com.br/v2.1";

/// Configuration for the Olho Vivo client.
#[derive(Debug, Clone)]
pub struct OlhoVivoConfig {
    /// API token for authentication
    pub token: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OlhoVivoConfig {
    /// Create a new config with the given API token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Olho Vivo API client.
///
/// Cheap to clone; clones share the HTTP connection pool, the session
/// cookie jar, and the authenticated flag.
#[derive(Debug, Clone)]
pub struct OlhoVivoClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    authenticated: Arc<AtomicBool>,
}

impl OlhoVivoClient {
    /// Create a new client with the given configuration.
    pub fn new(config: OlhoVivoConfig) -> Result<Self, OlhoVivoError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            token: config.token,
            authenticated: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Establish an authenticated session with the API.
    ///
    /// Returns `true` immediately without a network call once a previous
    /// call has succeeded (the session is memoized for the client's
    /// lifetime, not time-limited). On any failure returns `false` and
    /// leaves the flag unset, so a later call retries. Failures are not
    /// retried here; the polling engine re-invokes this before each cycle.
    pub async fn authenticate(&self) -> bool {
        if self.authenticated.load(Ordering::Acquire) {
            return true;
        }

        let url = format!("{}/Login/Autenticar?token={}", self.base_url, self.token);

        let response = match self.http.post(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Olho Vivo authentication request failed");
                return false;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "Olho Vivo authentication rejected");
            return false;
        }

        // The endpoint answers a bare JSON boolean.
        let success = match response.json::<bool>().await {
            Ok(b) => b,
            Err(e) => {
                warn!(error = %e, "Olho Vivo authentication response unreadable");
                false
            }
        };

        if success {
            info!("authenticated with the Olho Vivo API");
            self.authenticated.store(true, Ordering::Release);
        }

        success
    }

    /// Whether a session has been established.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Acquire)
    }

    /// Search line records by public code.
    ///
    /// An empty search term asks the API for its broad line list; the
    /// prefix resolver uses that as its discovery path.
    pub async fn search_lines(&self, term: &str) -> Result<Vec<LineDto>, OlhoVivoError> {
        if !self.is_authenticated() {
            return Err(OlhoVivoError::NotAuthenticated);
        }

        let url = format!("{}/Linha/Buscar", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("termosBusca", term)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OlhoVivoError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let lines: Vec<LineDto> =
            serde_json::from_str(&body).map_err(|e| OlhoVivoError::Json {
                message: e.to_string(),
            })?;

        debug!(term, count = lines.len(), "line search complete");
        Ok(lines)
    }

    /// Fetch current vehicle positions for an internal line id.
    pub async fn line_positions(&self, internal_id: u32) -> Result<Vec<VehicleDto>, OlhoVivoError> {
        if !self.is_authenticated() {
            return Err(OlhoVivoError::NotAuthenticated);
        }

        let url = format!("{}/Posicao/Linha", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("codigoLinha", internal_id.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OlhoVivoError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let positions: PositionsDto =
            serde_json::from_str(&body).map_err(|e| OlhoVivoError::Json {
                message: e.to_string(),
            })?;

        Ok(positions.vs)
    }

    /// Fetch per-stop arrival predictions for an internal line id.
    pub async fn arrival_predictions(
        &self,
        internal_id: u32,
    ) -> Result<ArrivalPredictionDto, OlhoVivoError> {
        if !self.is_authenticated() {
            return Err(OlhoVivoError::NotAuthenticated);
        }

        let url = format!("{}/Previsao/Linha", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("codigoLinha", internal_id.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OlhoVivoError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let prediction: ArrivalPredictionDto =
            serde_json::from_str(&body).map_err(|e| OlhoVivoError::Json {
                message: e.to_string(),
            })?;

        debug!(internal_id, stops = prediction.ps.len(), "arrival prediction fetched");
        Ok(prediction)
    }
}
