//! Trait and types for querying the user's check-in state.

use std::fmt;

use crate::fetch::FetchError;
use crate::format::DelayMinutes;

/// Train category plus number, e.g. `RE` + `26824`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainId {
    pub kind: String,
    pub number: String,
}

impl fmt::Display for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.number)
    }
}

/// Where the current journey ends. Times are Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub name: String,
    pub scheduled_arrival: i64,
    pub real_arrival: i64,
}

impl Destination {
    pub fn delay(&self) -> DelayMinutes {
        DelayMinutes::between(self.scheduled_arrival, self.real_arrival)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journey {
    pub train: TrainId,
    pub destination: Destination,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JourneyStatus {
    NotCheckedIn,
    CheckedIn(Journey),
}

/// Abstraction over a check-in tracker (e.g., travelynx).
#[async_trait::async_trait]
pub trait StatusApi: Send + Sync {
    async fn status(&self) -> Result<JourneyStatus, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_id_concatenates() {
        let id = TrainId {
            kind: "RE".into(),
            number: "26824".into(),
        };
        assert_eq!(id.to_string(), "RE26824");
    }

    #[test]
    fn test_destination_delay() {
        let dest = Destination {
            name: "Aachen Hbf".into(),
            scheduled_arrival: 1_576_339_320,
            real_arrival: 1_576_339_620,
        };
        assert_eq!(dest.delay(), DelayMinutes(5.0));
    }
}
