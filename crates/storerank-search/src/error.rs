//! Error type for `storerank-search`.
//!
//! Every variant means the search could not be completed. An application
//! missing from the results is not an error; see
//! [`SearchClient::rank`](crate::SearchClient::rank).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("search request failed: {0}")]
  Transport(#[source] reqwest::Error),

  #[error("search endpoint returned {0}")]
  Status(reqwest::StatusCode),

  #[error("malformed search response: {0}")]
  Decode(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
