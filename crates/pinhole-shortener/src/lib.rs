//! Mapping service for Pinhole.
//!
//! [`MappingService`] allocates short keys, creates mapping records and
//! serves redirects on top of any [`RecordStore`][pinhole_core::RecordStore].

pub mod service;
pub mod settings;

pub use service::MappingService;
pub use settings::ServiceSettings;
