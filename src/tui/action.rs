//! Actions returned by screen event handlers.

use super::app::Screen;
use crate::model::FormData;

/// An action that a screen handler returns to the [`App`](super::App).
///
/// The `App` interprets these to start backend requests and navigate between
/// screens.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// No state change needed.
    None,
    /// Navigate to the given screen.
    Navigate(Screen),
    /// POST the given payload as a new trip.
    SubmitTrip(FormData),
    /// Fetch the trip list again.
    ReloadTrips,
    /// Quit the application.
    Quit,
}
