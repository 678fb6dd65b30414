use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::error::ApiError;
use crate::config::ApiConfig;
use crate::model::{FormData, Route, TripRecord};

/// Collection envelope used by the backend's list endpoints.
#[derive(Debug, Deserialize)]
struct Collection<T> {
    value: Vec<T>,
}

/// Body of a non-success response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the trip and route endpoints.
#[derive(Debug, Clone)]
pub struct TripApi {
    client: Client,
    base_url: String,
    routes_path: String,
    trips_path: String,
}

impl TripApi {
    /// Creates a client for the endpoints named in `config`.
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            routes_path: config.routes_path.clone(),
            trips_path: config.trips_path.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetches the selectable routes.
    pub async fn fetch_routes(&self) -> Result<Vec<Route>, ApiError> {
        let routes: Vec<Route> = self.get_collection(&self.routes_path).await?;
        debug!(count = routes.len(), "routes loaded");
        Ok(routes)
    }

    /// Fetches existing trips.
    pub async fn fetch_trips(&self) -> Result<Vec<TripRecord>, ApiError> {
        let trips: Vec<TripRecord> = self.get_collection(&self.trips_path).await?;
        debug!(count = trips.len(), "trips loaded");
        Ok(trips)
    }

    /// Posts a new trip. `payload` is sent verbatim as the JSON body.
    pub async fn create_trip(&self, payload: &FormData) -> Result<(), ApiError> {
        let url = self.url(&self.trips_path);
        debug!(%url, fields = payload.len(), "POST");
        let response = self.client.post(&url).json(payload).send().await?;
        check_status(response).await?;
        info!("trip created");
        Ok(())
    }

    async fn get_collection<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        let response = check_status(response).await?;
        let body = response.bytes().await?;
        let collection: Collection<T> = serde_json::from_slice(&body)?;
        Ok(collection.value)
    }
}

/// Passes success responses through; turns anything else into [`ApiError::Rejected`].
///
/// A rejection body without `message` falls back to the status reason phrase.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await?;
    let error: ErrorBody = serde_json::from_slice(&body)?;
    let message = error
        .message
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    warn!(status = status.as_u16(), %message, "request rejected");
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::model::{FieldValue, RouteId};

    fn api_for(base_url: &str) -> TripApi {
        TripApi::new(&ApiConfig {
            base_url: base_url.to_string(),
            routes_path: "/Routes".into(),
            trips_path: "/Trips".into(),
        })
    }

    mod urls {
        use super::*;

        #[test]
        fn trailing_slash_on_base_is_dropped() {
            let api = api_for("http://fleet.example/api/");
            assert_eq!(api.url("/Trips"), "http://fleet.example/api/Trips");
        }
    }

    mod routes {
        use super::*;

        #[tokio::test]
        async fn returns_value_array() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/Routes"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "value": [{ "RouteId": 1, "RouteName": "A" }]
                })))
                .expect(1)
                .mount(&server)
                .await;

            let routes = api_for(&server.uri()).fetch_routes().await.unwrap();
            assert_eq!(
                routes,
                vec![Route {
                    id: RouteId::Number(1),
                    name: "A".into()
                }]
            );
        }

        #[tokio::test]
        async fn null_route_name_keeps_other_routes() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/Routes"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "value": [
                        { "RouteId": 1, "RouteName": "A" },
                        { "RouteId": 2, "RouteName": null }
                    ]
                })))
                .mount(&server)
                .await;

            let routes = api_for(&server.uri()).fetch_routes().await.unwrap();
            let names: Vec<&str> = routes.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names, vec!["A", ""]);
        }

        #[tokio::test]
        async fn body_without_value_is_decode_error() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/Routes"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
                .mount(&server)
                .await;

            let err = api_for(&server.uri()).fetch_routes().await.unwrap_err();
            assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
        }

        #[tokio::test]
        async fn unreachable_server_is_transport_error() {
            let err = api_for("http://127.0.0.1:1").fetch_routes().await.unwrap_err();
            assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
        }
    }

    mod trips {
        use super::*;

        #[tokio::test]
        async fn lists_records() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/Trips"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "value": [{ "TripId": 7, "TripName": "Morning" }]
                })))
                .mount(&server)
                .await;

            let trips = api_for(&server.uri()).fetch_trips().await.unwrap();
            assert_eq!(trips.len(), 1);
            assert_eq!(trips[0].id(), "7");
        }
    }

    mod create {
        use super::*;

        fn payload() -> FormData {
            let mut data = FormData::new();
            data.set("Name", FieldValue::Text("X".into()));
            data
        }

        #[tokio::test]
        async fn posts_payload_as_json() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/Trips"))
                .and(body_json(json!({ "Name": "X" })))
                .respond_with(ResponseTemplate::new(201))
                .expect(1)
                .mount(&server)
                .await;

            api_for(&server.uri()).create_trip(&payload()).await.unwrap();
        }

        #[tokio::test]
        async fn rejection_carries_server_message() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/Trips"))
                .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "message": "bad" })))
                .mount(&server)
                .await;

            let err = api_for(&server.uri()).create_trip(&payload()).await.unwrap_err();
            match err {
                ApiError::Rejected { status, message } => {
                    assert_eq!(status, 400);
                    assert_eq!(message, "bad");
                }
                other => panic!("expected Rejected, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn rejection_without_message_uses_reason() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/Trips"))
                .respond_with(ResponseTemplate::new(409).set_body_json(json!({})))
                .mount(&server)
                .await;

            let err = api_for(&server.uri()).create_trip(&payload()).await.unwrap_err();
            assert_eq!(err.to_string(), "Conflict");
        }

        #[tokio::test]
        async fn rejection_with_non_json_body_is_decode_error() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/Trips"))
                .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
                .mount(&server)
                .await;

            let err = api_for(&server.uri()).create_trip(&payload()).await.unwrap_err();
            assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
        }

        #[tokio::test]
        async fn success_ignores_response_body() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/Trips"))
                .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
                .mount(&server)
                .await;

            assert!(api_for(&server.uri()).create_trip(&payload()).await.is_ok());
        }
    }
}
