//! HTTP boundary for the Pinhole URL shortener.
//!
//! Exposes `POST /shorten` and `GET /{short_key}` on top of any
//! [`Shortener`][pinhole_core::Shortener] implementation.

pub mod app;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;
pub mod telemetry;

pub use app::App;
pub use error::AppError;
pub use state::AppState;
