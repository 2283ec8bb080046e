//! Error types for `storerank-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("rank must be a positive 1-based position, got {0}")]
  ZeroRank(i64),

  #[error("rank {0} is out of range")]
  RankOutOfRange(i64),

  #[error("{field} must not be empty")]
  EmptyField { field: &'static str },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
