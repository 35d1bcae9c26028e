use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::fetch::{FetchError, HttpClient, endpoint, fetch_json};
use crate::infra::keys::ApiKey;
use crate::services::status_api::{Destination, Journey, JourneyStatus, StatusApi, TrainId};

pub const DEFAULT_BASE_URL: &str = "https://travelynx.de";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    checked_in: bool,
    train: Option<Train>,
    to_station: Option<Station>,
}

#[derive(Deserialize)]
struct Train {
    #[serde(rename = "type")]
    kind: Option<String>,
    no: Option<TrainNumber>,
}

/// Train numbers show up both quoted and bare.
#[derive(Deserialize)]
#[serde(untagged)]
enum TrainNumber {
    Text(String),
    Number(i64),
}

impl TrainNumber {
    fn into_string(self) -> String {
        match self {
            TrainNumber::Text(s) => s,
            TrainNumber::Number(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Station {
    name: Option<String>,
    scheduled_time: Option<i64>,
    real_time: Option<i64>,
}

impl StatusResponse {
    fn into_status(self, host: &str) -> Result<JourneyStatus, FetchError> {
        if !self.checked_in {
            return Ok(JourneyStatus::NotCheckedIn);
        }

        let missing = |field| FetchError::MissingField {
            host: host.to_string(),
            field,
        };

        let train = self.train.ok_or_else(|| missing("train"))?;
        let station = self.to_station.ok_or_else(|| missing("toStation"))?;
        let scheduled_arrival = station
            .scheduled_time
            .ok_or_else(|| missing("toStation.scheduledTime"))?;

        Ok(JourneyStatus::CheckedIn(Journey {
            train: TrainId {
                kind: train.kind.ok_or_else(|| missing("train.type"))?,
                number: train
                    .no
                    .ok_or_else(|| missing("train.no"))?
                    .into_string(),
            },
            destination: Destination {
                name: station.name.ok_or_else(|| missing("toStation.name"))?,
                scheduled_arrival,
                real_arrival: station.real_time.unwrap_or(scheduled_arrival),
            },
        }))
    }
}

/// Client for the travelynx status API. The key is part of the request path.
pub struct TravelynxClient<C> {
    http: C,
    base_url: String,
    api_key: ApiKey,
}

impl<C: HttpClient> TravelynxClient<C> {
    pub fn new(http: C, base_url: impl Into<String>, api_key: ApiKey) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl<C: HttpClient> StatusApi for TravelynxClient<C> {
    #[tracing::instrument(name = "travelynx_status", skip_all)]
    async fn status(&self) -> Result<JourneyStatus, FetchError> {
        let url = endpoint(
            &self.base_url,
            ["api", "v1", "status", self.api_key.expose()],
        )?;
        let host = url.host_str().unwrap_or_default().to_string();

        let response: StatusResponse = fetch_json(&self.http, url).await?;
        let status = response.into_status(&host)?;

        match &status {
            JourneyStatus::NotCheckedIn => debug!("Not checked in"),
            JourneyStatus::CheckedIn(journey) => debug!(
                train = %journey.train,
                destination = %journey.destination.name,
                "Checked in"
            ),
        }
        Ok(status)
    }
}
