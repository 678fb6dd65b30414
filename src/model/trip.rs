use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::field::TRIP_ID_KEY;

/// A trip as returned by the list endpoint.
///
/// Only the identifier is interpreted; the rest is shown as-is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripRecord(Map<String, Value>);

impl TripRecord {
    /// Returns the trip identifier as display text, or `"-"` if absent.
    pub fn id(&self) -> String {
        self.column(TRIP_ID_KEY)
    }

    /// Renders one property for a table cell. Missing and null render as `-`.
    pub fn column(&self, key: &str) -> String {
        match self.0.get(key) {
            None | Some(Value::Null) => "-".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

impl From<Map<String, Value>> for TripRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
