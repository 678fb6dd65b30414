use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::field::TRIP_ID_KEY;

/// A single value held in the trip draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    /// Free text, and dates formatted as `YYYY-MM-DDTHH:mm:ssZ`.
    Text(String),
}

impl FieldValue {
    /// Returns the boolean, or `None` for non-boolean values.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text, or `None` for non-text values.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// The in-memory draft of a trip: field key → current value.
///
/// Serializes to a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, FieldValue>);

impl FormData {
    /// Creates an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    /// Stores `value` under `key`, leaving every other key untouched.
    pub fn set(&mut self, key: impl Into<String>, value: FieldValue) {
        self.0.insert(key.into(), value);
    }

    /// Returns the text stored for `key`, or `""` if unset or not text.
    pub fn text(&self, key: &str) -> &str {
        self.get(key).and_then(FieldValue::as_text).unwrap_or("")
    }

    /// Returns the boolean stored for `key`; unset counts as `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(FieldValue::as_bool).unwrap_or(false)
    }

    /// Flips the boolean under `key` and returns the new value.
    pub fn toggle(&mut self, key: &str) -> bool {
        let next = !self.flag(key);
        self.set(key, FieldValue::Bool(next));
        next
    }

    /// Number of keys set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing has been entered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The body sent to the server: everything except the trip identifier.
    pub fn submission_payload(&self) -> FormData {
        let mut payload = self.clone();
        payload.0.remove(TRIP_ID_KEY);
        payload
    }
}
