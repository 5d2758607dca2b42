//! End-to-end calibration from a fine-resolution series.

use chrono::TimeDelta;
use pluvio_events::{extract_events, summarize_events};
use pluvio_moments::estimate_event_moments;
use pluvio_series::TimeSeries;
use tracing::{info, warn};

use crate::calibrate::{CalibrationResult, calibrate};
use crate::config::CalibrationConfig;
use crate::error::CalibrationError;
use crate::guess::{guess_from_events, guess_from_moments};

/// Calibrates parameters directly from a fine-resolution rainfall series.
///
/// Extracts events separated by `inter_event_gap`, estimates moments at the
/// configured scales from the event rainfall only, derives an initial guess
/// from event statistics (unless one is configured) and runs [`calibrate`].
///
/// # Errors
///
/// Propagates event, moment and calibration errors; a series without any
/// qualifying event fails with [`CalibrationError::Events`].
#[tracing::instrument(skip(series, config), fields(n = series.len()))]
pub fn calibrate_series(
    series: &TimeSeries,
    inter_event_gap: TimeDelta,
    config: &CalibrationConfig,
) -> Result<CalibrationResult, CalibrationError> {
    config.validate()?;
    let events = extract_events(series, inter_event_gap, config.events())?;
    let summary = summarize_events(
        series,
        &events,
        config.intra_event_gap(),
        config.events().wet_threshold(),
    )?;
    info!(
        n_events = summary.n_events(),
        mean_duration_h = summary.mean_duration_hours(),
        mean_volume = summary.mean_volume(),
        "events summarised"
    );

    let moments = estimate_event_moments(series, &events, config.scales())?;

    let initial = match config.initial() {
        Some(p) => *p,
        None => match guess_from_events(&summary) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "event-based guess failed, using moment heuristic");
                guess_from_moments(&moments)?
            }
        },
    };
    calibrate(&moments, &config.clone().with_initial(initial))
}
