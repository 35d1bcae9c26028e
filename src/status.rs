//! Builds the status block from the two APIs.
//!
//! Only the tracker is required. A tracker that cannot be reached turns into
//! a red error block; journey details are enrichment and any failure there
//! just drops the "next" segment.

use tracing::{debug, info, warn};

use crate::fetch::FetchError;
use crate::format::{ArrivalInstant, format_stop};
use crate::output::Block;
use crate::services::details_api::DetailsApi;
use crate::services::status_api::{Journey, JourneyStatus, StatusApi};

pub const UNREACHABLE_TEXT: &str = "Could not connect to travelynx";

/// Returns the block to print, or `None` when there is nothing to show.
///
/// # Errors
///
/// Propagates tracker failures other than unreachability (HTTP errors,
/// malformed payloads).
pub async fn collect<S, D>(
    status_api: &S,
    details_api: Option<&D>,
) -> Result<Option<Block>, FetchError>
where
    S: StatusApi + ?Sized,
    D: DetailsApi + ?Sized,
{
    let journey = match status_api.status().await {
        Ok(JourneyStatus::CheckedIn(journey)) => journey,
        Ok(JourneyStatus::NotCheckedIn) => return Ok(None),
        Err(e) if e.is_unreachable() => {
            warn!(error = %e, "Status API unreachable");
            return Ok(Some(Block::error(UNREACHABLE_TEXT)));
        }
        Err(e) => return Err(e),
    };

    let mut segments = vec![journey.train.to_string()];

    if let Some(details_api) = details_api {
        if let Some(next) = next_segment(details_api, &journey).await {
            segments.push(next);
        }
    }

    let dest = &journey.destination;
    segments.push(format!(
        "dest: {}",
        format_stop(
            &dest.name,
            ArrivalInstant::Epoch(dest.real_arrival),
            dest.delay()
        )
    ));

    info!(train = %journey.train, segments = segments.len(), "Status assembled");
    Ok(Some(Block::pango(segments.join(", "))))
}

async fn next_segment<D>(details_api: &D, journey: &Journey) -> Option<String>
where
    D: DetailsApi + ?Sized,
{
    let stop = match details_api.current_stop(&journey.train).await {
        Ok(Some(stop)) => stop,
        Ok(None) => {
            debug!(train = %journey.train, "No current stop reported");
            return None;
        }
        Err(e) => {
            warn!(train = %journey.train, error = %e, "Journey details unavailable");
            return None;
        }
    };

    if stop.name == journey.destination.name {
        return Some("next".to_string());
    }

    match stop.arrival {
        Some(arrival) => Some(format!(
            "next: {}",
            format_stop(&stop.name, arrival, stop.delay)
        )),
        None => {
            debug!(stop = %stop.name, "Current stop has no arrival time");
            None
        }
    }
}
