//! TUI screen implementations.

pub mod help;
pub mod trip_create;
pub mod trip_list;

pub use help::{HelpState, draw_help};
pub use trip_create::{TripCreateState, draw_trip_create};
pub use trip_list::{TripListState, draw_trip_list};
