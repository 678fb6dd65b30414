use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::form_data::FieldValue;

/// Server identifier of a route. The backend may send it as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteId {
    Number(i64),
    Text(String),
}

impl RouteId {
    /// Returns `true` if a stored form value refers to this route.
    pub fn matches(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Self::Number(id), FieldValue::Integer(v)) => id == v,
            (Self::Text(id), FieldValue::Text(v)) => id == v,
            _ => false,
        }
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&RouteId> for FieldValue {
    fn from(id: &RouteId) -> Self {
        match id {
            RouteId::Number(n) => Self::Integer(*n),
            RouteId::Text(s) => Self::Text(s.clone()),
        }
    }
}

/// A route a trip can run on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    #[serde(rename = "RouteId")]
    pub id: RouteId,
    /// Blank when the backend omits the name or sends `null`.
    #[serde(rename = "RouteName", default, deserialize_with = "null_as_empty")]
    pub name: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Resolves the route a stored form value points at.
pub fn find_route<'a>(routes: &'a [Route], value: &FieldValue) -> Option<&'a Route> {
    routes.iter().find(|r| r.id.matches(value))
}

/// Routes whose name contains `query`, case-insensitively. An empty query keeps all.
pub fn filter_routes<'a>(routes: &'a [Route], query: &str) -> Vec<&'a Route> {
    let needle = query.to_lowercase();
    routes
        .iter()
        .filter(|r| r.name.to_lowercase().contains(&needle))
        .collect()
}
