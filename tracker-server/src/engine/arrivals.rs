//! Arrival prediction boards.
//!
//! The upstream `Previsao/Linha` endpoint estimates, per stop, when each
//! vehicle on one directional line will arrive. A board for a public
//! line code needs both directions, so they are fetched as a pair.

use futures::future::join;
use tracing::debug;

use crate::domain::{Direction, LineRecord};
use crate::olhovivo::{ArrivalPredictionDto, OlhoVivoError};

use super::lines::resolve_line;
use super::source::TransitApi;

/// Arrival estimates for one direction of a line.
#[derive(Debug, Clone)]
pub struct DirectionBoard {
    /// The directional record the estimates belong to.
    pub line: LineRecord,

    /// Raw per-stop predictions for this direction.
    pub prediction: ArrivalPredictionDto,
}

/// Arrival estimates for both directions of a public line code.
#[derive(Debug, Clone)]
pub struct LineArrivals {
    pub main: DirectionBoard,
    pub secondary: DirectionBoard,
}

/// Fetch arrival predictions for both directions of a line.
///
/// Returns `Ok(None)` when the code does not resolve to a record per
/// direction; a board is only meaningful with both. Unlike the poll
/// cycle, prediction failures propagate: this backs a direct request, so
/// the caller reports the error instead of absorbing it.
pub async fn arrivals_for_line<A: TransitApi>(
    api: &A,
    line_code: &str,
) -> Result<Option<LineArrivals>, OlhoVivoError> {
    let records = resolve_line(api, line_code).await;

    let main = records.iter().find(|r| r.direction == Direction::MainTerminal);
    let secondary = records
        .iter()
        .find(|r| r.direction == Direction::SecondaryTerminal);

    let (Some(main), Some(secondary)) = (main, secondary) else {
        debug!(
            line = line_code,
            records = records.len(),
            "line lacks a record per direction, no board"
        );
        return Ok(None);
    };

    let (main_prediction, secondary_prediction) = join(
        api.arrival_predictions(main.internal_id),
        api.arrival_predictions(secondary.internal_id),
    )
    .await;

    Ok(Some(LineArrivals {
        main: DirectionBoard {
            line: main.clone(),
            prediction: main_prediction?,
        },
        secondary: DirectionBoard {
            line: secondary.clone(),
            prediction: secondary_prediction?,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::olhovivo::{MockOlhoVivo, mock_arrival, mock_line, mock_prediction};

    #[tokio::test]
    async fn both_directions_build_a_board() {
        let mut mock = MockOlhoVivo::new();
        mock.add_line("1017-10", mock_line(1273, "1017", 10, 1));
        mock.add_line("1017-10", mock_line(1274, "1017", 10, 2));
        mock.add_prediction(
            1273,
            mock_prediction("PARADA UM", vec![mock_arrival("11433", "23:40")]),
        );
        mock.add_prediction(
            1274,
            mock_prediction("PARADA DOIS", vec![mock_arrival("11440", "23:45")]),
        );

        let arrivals = arrivals_for_line(&mock, "1017-10")
            .await
            .unwrap()
            .expect("expected a board");

        assert_eq!(arrivals.main.line.direction, Direction::MainTerminal);
        assert_eq!(arrivals.main.prediction.ps[0].vs[0].t, "23:40");
        assert_eq!(arrivals.secondary.line.direction, Direction::SecondaryTerminal);
        assert_eq!(arrivals.secondary.prediction.ps[0].vs[0].t, "23:45");
        assert_eq!(mock.prediction_calls(), 2);
    }

    #[tokio::test]
    async fn single_direction_yields_no_board() {
        let mut mock = MockOlhoVivo::new();
        mock.add_line("1017-10", mock_line(1273, "1017", 10, 1));

        let arrivals = arrivals_for_line(&mock, "1017-10").await.unwrap();
        assert!(arrivals.is_none());
        assert_eq!(mock.prediction_calls(), 0);
    }

    #[tokio::test]
    async fn unknown_line_yields_no_board() {
        let mock = MockOlhoVivo::new();
        let arrivals = arrivals_for_line(&mock, "9999-99").await.unwrap();
        assert!(arrivals.is_none());
    }

    #[tokio::test]
    async fn prediction_failure_propagates() {
        let mut mock = MockOlhoVivo::new();
        mock.add_line("1017-10", mock_line(1273, "1017", 10, 1));
        mock.add_line("1017-10", mock_line(1274, "1017", 10, 2));
        mock.fail_predictions(1274);

        assert!(arrivals_for_line(&mock, "1017-10").await.is_err());
    }
}
