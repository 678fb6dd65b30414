//! HTTP client for the fleet backend: route lookup, trip listing and trip creation.

mod client;
mod error;

pub use client::TripApi;
pub use error::ApiError;
