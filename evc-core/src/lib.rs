//! Core types and API client for the vote-count backend.
//!
//! - `poll`: survey records served by `GET /pesquisas`
//! - `tally`: the aggregated result returned by `POST /processar-votos`
//! - `api`: the `VoteApi` trait shared by the native and browser clients
//! - `client`: the native `reqwest` client (feature `api`)

pub mod api;
#[cfg(feature = "api")]
pub mod client;
pub mod config;
pub mod error;
pub mod poll;
pub mod tally;

pub use api::{CsvUpload, VoteApi};
pub use config::ApiConfig;
pub use error::ApiError;
pub use poll::PollRecord;
pub use tally::{AggregatedResult, OrderedTallies, VoteTally};
