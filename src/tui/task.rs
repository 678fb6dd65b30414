//! Backend requests run on the tokio runtime and report back over a channel.
//!
//! The UI loop never awaits: it spawns a request here and later drains the
//! resulting [`ApiEvent`]s between key events.

use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::warn;

use super::widgets::Notification;
use crate::api::{ApiError, TripApi};
use crate::model::{FormData, Route, TripRecord};

/// How a trip submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The server accepted the trip.
    Created,
    /// The server refused it with a message.
    Rejected(String),
    /// The request failed or its response could not be read.
    Failed(String),
}

impl From<Result<(), ApiError>> for SubmitOutcome {
    fn from(result: Result<(), ApiError>) -> Self {
        match result {
            Ok(()) => Self::Created,
            Err(ApiError::Rejected { message, .. }) => Self::Rejected(message),
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

impl SubmitOutcome {
    /// The notification shown for this outcome.
    pub fn notification(&self) -> Notification {
        match self {
            Self::Created => Notification::success("Successfully created Trip"),
            Self::Rejected(message) => Notification::error(format!("Failed! - {message}")),
            Self::Failed(message) => Notification::error(format!("Error: {message}")),
        }
    }
}

/// A completed backend request.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiEvent {
    /// Routes for the create-screen visit numbered `visit`.
    RoutesLoaded {
        visit: u64,
        result: Result<Vec<Route>, String>,
    },
    /// The trip list.
    TripsLoaded(Result<Vec<TripRecord>, String>),
    /// A trip submission finished.
    TripSubmitted(SubmitOutcome),
}

/// Spawns backend requests on a runtime.
#[derive(Debug)]
pub struct Tasks {
    api: Arc<TripApi>,
    runtime: Handle,
    tx: UnboundedSender<ApiEvent>,
}

impl Tasks {
    /// Creates a spawner and the receiver its results arrive on.
    pub fn new(api: TripApi, runtime: Handle) -> (Self, UnboundedReceiver<ApiEvent>) {
        let (tx, rx) = unbounded_channel();
        let tasks = Self {
            api: Arc::new(api),
            runtime,
            tx,
        };
        (tasks, rx)
    }

    /// Fetches routes for the given create-screen visit.
    pub fn load_routes(&self, visit: u64) {
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            let result = api.fetch_routes().await.map_err(|e| {
                warn!(error = %e, "route fetch failed");
                e.to_string()
            });
            ApiEvent::RoutesLoaded { visit, result }
        });
    }

    /// Fetches the trip list.
    pub fn load_trips(&self) {
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            let result = api.fetch_trips().await.map_err(|e| {
                warn!(error = %e, "trip list fetch failed");
                e.to_string()
            });
            ApiEvent::TripsLoaded(result)
        });
    }

    /// Posts a new trip.
    pub fn submit_trip(&self, payload: FormData) {
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            let result = api.create_trip(&payload).await;
            if let Err(e) = &result {
                warn!(error = %e, "trip submission failed");
            }
            ApiEvent::TripSubmitted(result.into())
        });
    }

    fn spawn<F>(&self, request: F)
    where
        F: Future<Output = ApiEvent> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            // The receiver is gone only when the app is shutting down.
            let _ = tx.send(request.await);
        });
    }
}
