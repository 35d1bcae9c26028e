use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use tracing::debug;

use crate::fetch::{FetchError, HttpClient, endpoint, fetch_json};
use crate::format::DelayMinutes;
use crate::services::details_api::{CurrentStop, DetailsApi};
use crate::services::status_api::TrainId;

pub const DEFAULT_BASE_URL: &str = "https://marudor.de";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailsResponse {
    current_stop: Option<Stop>,
}

#[derive(Deserialize)]
struct Stop {
    station: Station,
    arrival: Option<Arrival>,
}

#[derive(Deserialize)]
struct Station {
    title: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Arrival {
    time: Option<DateTime<FixedOffset>>,
    scheduled_time: Option<DateTime<FixedOffset>>,
    delay: Option<f64>,
}

impl From<Stop> for CurrentStop {
    fn from(stop: Stop) -> Self {
        let (arrival, delay) = match stop.arrival {
            Some(a) => (a.time.or(a.scheduled_time), a.delay.unwrap_or_default()),
            None => (None, 0.0),
        };
        CurrentStop {
            name: stop.station.title,
            arrival,
            delay: DelayMinutes(delay),
        }
    }
}

/// Client for the HAFAS journey-details endpoint on marudor.de.
pub struct DetailsClient<C> {
    http: C,
    base_url: String,
}

impl<C: HttpClient> DetailsClient<C> {
    pub fn new(http: C, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl<C: HttpClient> DetailsApi for DetailsClient<C> {
    #[tracing::instrument(name = "journey_details", skip_all, fields(train = %train))]
    async fn current_stop(&self, train: &TrainId) -> Result<Option<CurrentStop>, FetchError> {
        let url = endpoint(
            &self.base_url,
            ["api", "hafas", "v2", "details", train.to_string().as_str()],
        )?;

        let response: DetailsResponse = fetch_json(&self.http, url).await?;
        let stop = response.current_stop.map(CurrentStop::from);

        if let Some(stop) = &stop {
            debug!(stop = %stop.name, delay = stop.delay.0, "Current stop");
        }
        Ok(stop)
    }
}
