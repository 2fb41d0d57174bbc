//! The upstream API seam for the aggregation engine.

use std::future::Future;
use std::sync::Arc;

use crate::olhovivo::{
    ArrivalPredictionDto, LineDto, MockOlhoVivo, OlhoVivoClient, OlhoVivoError, VehicleDto,
};

/// Abstraction over the upstream transit API.
///
/// The engine is generic over this trait so tests can run cycles against
/// a scripted [`MockOlhoVivo`] and production code against the real
/// [`OlhoVivoClient`] (optionally wrapped in the caching layer).
///
/// Futures are required to be `Send` because the poller spawns cycles
/// onto the runtime.
pub trait TransitApi: Send + Sync {
    /// Ensure an authenticated session. Memoized by implementations;
    /// returns `false` on failure without retrying.
    fn authenticate(&self) -> impl Future<Output = bool> + Send;

    /// Search line records by public code. Empty term requests the broad
    /// discovery list.
    fn search_lines(
        &self,
        term: &str,
    ) -> impl Future<Output = Result<Vec<LineDto>, OlhoVivoError>> + Send;

    /// Fetch current vehicle positions for an internal line id.
    fn line_positions(
        &self,
        internal_id: u32,
    ) -> impl Future<Output = Result<Vec<VehicleDto>, OlhoVivoError>> + Send;

    /// Fetch per-stop arrival predictions for an internal line id.
    fn arrival_predictions(
        &self,
        internal_id: u32,
    ) -> impl Future<Output = Result<ArrivalPredictionDto, OlhoVivoError>> + Send;
}

impl TransitApi for OlhoVivoClient {
    async fn authenticate(&self) -> bool {
        OlhoVivoClient::authenticate(self).await
    }

    async fn search_lines(&self, term: &str) -> Result<Vec<LineDto>, OlhoVivoError> {
        OlhoVivoClient::search_lines(self, term).await
    }

    async fn line_positions(&self, internal_id: u32) -> Result<Vec<VehicleDto>, OlhoVivoError> {
        OlhoVivoClient::line_positions(self, internal_id).await
    }

    async fn arrival_predictions(
        &self,
        internal_id: u32,
    ) -> Result<ArrivalPredictionDto, OlhoVivoError> {
        OlhoVivoClient::arrival_predictions(self, internal_id).await
    }
}

impl TransitApi for MockOlhoVivo {
    async fn authenticate(&self) -> bool {
        self.mock_authenticate().await
    }

    async fn search_lines(&self, term: &str) -> Result<Vec<LineDto>, OlhoVivoError> {
        self.mock_search_lines(term).await
    }

    async fn line_positions(&self, internal_id: u32) -> Result<Vec<VehicleDto>, OlhoVivoError> {
        self.mock_line_positions(internal_id).await
    }

    async fn arrival_predictions(
        &self,
        internal_id: u32,
    ) -> Result<ArrivalPredictionDto, OlhoVivoError> {
        self.mock_arrival_predictions(internal_id).await
    }
}

impl<A: TransitApi> TransitApi for Arc<A> {
    async fn authenticate(&self) -> bool {
        (**self).authenticate().await
    }

    async fn search_lines(&self, term: &str) -> Result<Vec<LineDto>, OlhoVivoError> {
        (**self).search_lines(term).await
    }

    async fn line_positions(&self, internal_id: u32) -> Result<Vec<VehicleDto>, OlhoVivoError> {
        (**self).line_positions(internal_id).await
    }

    async fn arrival_predictions(
        &self,
        internal_id: u32,
    ) -> Result<ArrivalPredictionDto, OlhoVivoError> {
        (**self).arrival_predictions(internal_id).await
    }
}
