//! # overflow-server
//!
//! HTTP service that runs overflow detection over a sensor dataset.
//!
//! The dataset is a JSON file of `[unix_ms, value]` pairs, loaded once by a
//! [`SampleStore`] and shared by every request. `GET /events` runs
//! [`overflow_detector::detect`] with parameters taken from the query string
//! and returns the events as JSON.
//!
//! ## Modules
//!
//! - [`settings`]: layered [`ServerConfig`] (file, environment)
//! - [`dataset`]: dataset parsing and the [`SampleStore`] cache
//! - [`query`]: `/events` query parsing into detection parameters
//! - [`response`]: JSON bodies for events and problem documents
//! - [`http`]: request routing and the hyper accept loop
//! - [`logging`]: tracing subscriber setup

pub mod dataset;
pub mod http;
pub mod logging;
pub mod query;
pub mod response;
pub mod settings;

pub use dataset::{load_samples, parse_samples, DatasetError, SampleStore};
pub use http::{serve, EventsApi, Server};
pub use logging::LogFormat;
pub use query::{EventsQuery, QueryError};
pub use response::{EventBody, Problem};
pub use settings::ServerConfig;
