//! Error type for `storerank-store-sqlite`.

use storerank_core::ids::{ApplicationId, KeywordId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] storerank_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("application not found: {0}")]
  ApplicationNotFound(ApplicationId),

  #[error("keyword not found: {0}")]
  KeywordNotFound(KeywordId),

  /// A scan must belong to the same application as its keyword.
  #[error("keyword {keyword} belongs to application {owner}, not {requested}")]
  KeywordOwnerMismatch {
    keyword:   KeywordId,
    owner:     ApplicationId,
    requested: ApplicationId,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
