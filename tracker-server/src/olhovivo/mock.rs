//! Mock Olho Vivo client for testing without API access.
//!
//! Scriptable in-memory stand-in for [`OlhoVivoClient`]: tests register
//! line records and vehicle positions, choose which calls fail, and can
//! assert on how many network calls the engine would have issued.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::OlhoVivoError;
use super::types::{ArrivalPredictionDto, ArrivingVehicleDto, LineDto, StopArrivalsDto, VehicleDto};

/// In-memory mock of the Olho Vivo API.
#[derive(Default)]
pub struct MockOlhoVivo {
    /// Line search results keyed by search term. The empty-string key
    /// holds the discovery (broad list) response.
    lines: HashMap<String, Vec<LineDto>>,

    /// Vehicle positions keyed by internal line id.
    positions: HashMap<u32, Vec<VehicleDto>>,

    /// Arrival predictions keyed by internal line id.
    predictions: HashMap<u32, ArrivalPredictionDto>,

    /// Search terms whose lookup should fail.
    failing_searches: HashSet<String>,

    /// Internal line ids whose position fetch should fail.
    failing_positions: HashSet<u32>,

    /// Internal line ids whose prediction fetch should fail.
    failing_predictions: HashSet<u32>,

    /// Whether authentication succeeds.
    auth_ok: bool,

    /// Artificial delay before answering position fetches, for tests that
    /// race cycles against each other.
    position_latency: Option<std::time::Duration>,

    auth_calls: AtomicUsize,
    search_calls: AtomicUsize,
    position_calls: AtomicUsize,
    prediction_calls: AtomicUsize,
}

impl MockOlhoVivo {
    /// A mock that authenticates successfully and knows no lines.
    pub fn new() -> Self {
        Self {
            auth_ok: true,
            ..Default::default()
        }
    }

    /// A mock whose authentication always fails.
    pub fn failing_auth() -> Self {
        Self {
            auth_ok: false,
            ..Default::default()
        }
    }

    /// Register a directional line record under a search term.
    pub fn add_line(&mut self, term: &str, line: LineDto) -> &mut Self {
        self.lines.entry(term.to_string()).or_default().push(line);
        self
    }

    /// Register the discovery (empty search) line list.
    pub fn add_discovery_line(&mut self, line: LineDto) -> &mut Self {
        self.add_line("", line)
    }

    /// Register vehicle positions for an internal line id.
    pub fn add_positions(&mut self, internal_id: u32, vehicles: Vec<VehicleDto>) -> &mut Self {
        self.positions.insert(internal_id, vehicles);
        self
    }

    /// Make line search fail for a term.
    pub fn fail_search(&mut self, term: &str) -> &mut Self {
        self.failing_searches.insert(term.to_string());
        self
    }

    /// Register an arrival prediction for an internal line id.
    pub fn add_prediction(&mut self, internal_id: u32, prediction: ArrivalPredictionDto) -> &mut Self {
        self.predictions.insert(internal_id, prediction);
        self
    }

    /// Make position fetch fail for an internal line id.
    pub fn fail_positions(&mut self, internal_id: u32) -> &mut Self {
        self.failing_positions.insert(internal_id);
        self
    }

    /// Make prediction fetch fail for an internal line id.
    pub fn fail_predictions(&mut self, internal_id: u32) -> &mut Self {
        self.failing_predictions.insert(internal_id);
        self
    }

    /// Delay every position fetch by the given duration.
    pub fn with_position_latency(&mut self, latency: std::time::Duration) -> &mut Self {
        self.position_latency = Some(latency);
        self
    }

    /// Number of authentication calls issued.
    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::Relaxed)
    }

    /// Number of line search calls issued.
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::Relaxed)
    }

    /// Number of position fetch calls issued.
    pub fn position_calls(&self) -> usize {
        self.position_calls.load(Ordering::Relaxed)
    }

    /// Number of prediction fetch calls issued.
    pub fn prediction_calls(&self) -> usize {
        self.prediction_calls.load(Ordering::Relaxed)
    }

    pub(crate) async fn mock_authenticate(&self) -> bool {
        self.auth_calls.fetch_add(1, Ordering::Relaxed);
        self.auth_ok
    }

    pub(crate) async fn mock_search_lines(
        &self,
        term: &str,
    ) -> Result<Vec<LineDto>, OlhoVivoError> {
        self.search_calls.fetch_add(1, Ordering::Relaxed);

        if self.failing_searches.contains(term) {
            return Err(OlhoVivoError::Api {
                status: 500,
                message: format!("mock failure for search term {term:?}"),
            });
        }

        Ok(self.lines.get(term).cloned().unwrap_or_default())
    }

    pub(crate) async fn mock_line_positions(
        &self,
        internal_id: u32,
    ) -> Result<Vec<VehicleDto>, OlhoVivoError> {
        self.position_calls.fetch_add(1, Ordering::Relaxed);

        if let Some(latency) = self.position_latency {
            tokio::time::sleep(latency).await;
        }

        if self.failing_positions.contains(&internal_id) {
            return Err(OlhoVivoError::Api {
                status: 500,
                message: format!("mock failure for line {internal_id}"),
            });
        }

        Ok(self.positions.get(&internal_id).cloned().unwrap_or_default())
    }

    pub(crate) async fn mock_arrival_predictions(
        &self,
        internal_id: u32,
    ) -> Result<ArrivalPredictionDto, OlhoVivoError> {
        self.prediction_calls.fetch_add(1, Ordering::Relaxed);

        if self.failing_predictions.contains(&internal_id) {
            return Err(OlhoVivoError::Api {
                status: 500,
                message: format!("mock failure for prediction on line {internal_id}"),
            });
        }

        Ok(self
            .predictions
            .get(&internal_id)
            .cloned()
            .unwrap_or_else(|| ArrivalPredictionDto {
                hr: None,
                ps: Vec::new(),
            }))
    }
}

/// Build a [`LineDto`] for tests.
pub fn mock_line(internal_id: u32, lt: &str, tl: u32, sl: u8) -> LineDto {
    LineDto {
        cl: internal_id,
        lc: Some(false),
        lt: lt.to_string(),
        sl,
        tl: Some(tl),
        tp: Some("TERM. MOCK PRINCIPAL".to_string()),
        ts: Some("TERM. MOCK SECUNDARIO".to_string()),
    }
}

/// Build a [`VehicleDto`] for tests.
pub fn mock_vehicle(prefix: &str, ta: &str) -> VehicleDto {
    VehicleDto {
        p: prefix.to_string(),
        a: true,
        ta: ta.to_string(),
        py: -23.5505,
        px: -46.6333,
    }
}

/// Build an [`ArrivalPredictionDto`] with one stop for tests.
pub fn mock_prediction(stop_name: &str, arrivals: Vec<ArrivingVehicleDto>) -> ArrivalPredictionDto {
    ArrivalPredictionDto {
        hr: Some("23:30".to_string()),
        ps: vec![StopArrivalsDto {
            cp: 340015329,
            np: stop_name.to_string(),
            py: -23.5505,
            px: -46.6333,
            vs: arrivals,
        }],
    }
}

/// Build an [`ArrivingVehicleDto`] for tests.
pub fn mock_arrival(prefix: &str, eta: &str) -> ArrivingVehicleDto {
    ArrivingVehicleDto {
        p: prefix.to_string(),
        t: eta.to_string(),
        a: true,
        ta: "2024-03-15T23:30:00Z".to_string(),
        py: -23.5505,
        px: -46.6333,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_lines_and_positions() {
        let mut mock = MockOlhoVivo::new();
        mock.add_line("1017-10", mock_line(1273, "1017", 10, 1));
        mock.add_positions(1273, vec![mock_vehicle("11433", "2024-03-15T10:00:00Z")]);

        assert!(mock.mock_authenticate().await);

        let lines = mock.mock_search_lines("1017-10").await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].public_code(), "1017-10");

        let vehicles = mock.mock_line_positions(1273).await.unwrap();
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].p, "11433");
    }

    #[tokio::test]
    async fn unknown_line_is_empty_not_error() {
        let mock = MockOlhoVivo::new();
        let lines = mock.mock_search_lines("9999-99").await.unwrap();
        assert!(lines.is_empty());
    }

    #[tokio::test]
    async fn scripted_failures() {
        let mut mock = MockOlhoVivo::new();
        mock.fail_search("1017-10");
        mock.fail_positions(42);

        assert!(mock.mock_search_lines("1017-10").await.is_err());
        assert!(mock.mock_line_positions(42).await.is_err());
    }

    #[tokio::test]
    async fn scripted_predictions() {
        let mut mock = MockOlhoVivo::new();
        mock.add_prediction(
            1273,
            mock_prediction("PARADA UM", vec![mock_arrival("11433", "23:40")]),
        );
        mock.fail_predictions(1274);

        let prediction = mock.mock_arrival_predictions(1273).await.unwrap();
        assert_eq!(prediction.ps.len(), 1);
        assert_eq!(prediction.ps[0].vs[0].t, "23:40");

        assert!(mock.mock_arrival_predictions(1274).await.is_err());

        // Unknown lines answer an empty board, not an error.
        let empty = mock.mock_arrival_predictions(9999).await.unwrap();
        assert!(empty.ps.is_empty());

        assert_eq!(mock.prediction_calls(), 3);
    }

    #[tokio::test]
    async fn call_counting() {
        let mock = MockOlhoVivo::new();
        let _ = mock.mock_authenticate().await;
        let _ = mock.mock_search_lines("x").await;
        let _ = mock.mock_search_lines("y").await;
        let _ = mock.mock_line_positions(1).await;

        assert_eq!(mock.auth_calls(), 1);
        assert_eq!(mock.search_calls(), 2);
        assert_eq!(mock.position_calls(), 1);
    }
}
