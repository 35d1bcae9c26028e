//! Trait and types for live journey details.

use chrono::{DateTime, FixedOffset};

use super::status_api::TrainId;
use crate::fetch::FetchError;
use crate::format::DelayMinutes;

/// The stop a train is currently heading to.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentStop {
    pub name: String,
    /// Predicted arrival, or the scheduled one when no prediction exists.
    pub arrival: Option<DateTime<FixedOffset>>,
    pub delay: DelayMinutes,
}

/// Abstraction over a journey-details provider (e.g., marudor.de).
#[async_trait::async_trait]
pub trait DetailsApi: Send + Sync {
    /// Returns `None` when the provider knows the train but reports no
    /// current stop.
    async fn current_stop(&self, train: &TrainId) -> Result<Option<CurrentStop>, FetchError>;
}
