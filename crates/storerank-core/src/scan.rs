//! Scans: timestamped rank observations.
//!
//! Scans are immutable. The store only appends, and only when the rank
//! differs from the most recent scan of the same keyword.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  ids::{ApplicationId, KeywordId, ScanId},
  rank::Rank,
};

/// One stored rank observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scan {
  pub id:             ScanId,
  pub keyword_id:     KeywordId,
  /// Always equal to the owning keyword's application.
  pub application_id: ApplicationId,
  /// `None` means the application was not in the returned results.
  pub rank:           Option<Rank>,
  /// Store-assigned; never changes after creation.
  pub scanned_at:     DateTime<Utc>,
}

/// Result of [`crate::store::RankStore::record_scan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanOutcome {
  /// The rank changed (or this was the first scan) and a row was appended.
  Inserted(Scan),
  /// The most recent scan already holds this rank; nothing was written.
  Skipped { rank: Option<Rank> },
}

impl ScanOutcome {
  /// Decide whether a new observation should be stored, given the rank of
  /// the most recent scan (`None` if the keyword has never been scanned).
  ///
  /// "Not found" is a value of its own: two consecutive not-found results
  /// are deduplicated just like two equal numeric ranks.
  pub fn should_insert(latest: Option<Option<Rank>>, new: Option<Rank>) -> bool {
    latest != Some(new)
  }

  pub fn is_skipped(&self) -> bool { matches!(self, Self::Skipped { .. }) }

  pub fn rank(&self) -> Option<Rank> {
    match self {
      Self::Inserted(scan) => scan.rank,
      Self::Skipped { rank } => *rank,
    }
  }
}

/// One row of an application's rank history, joined with its keyword text.
///
/// The store returns these ordered by keyword ascending, then most recent
/// first within each keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRow {
  pub keyword:    String,
  pub scanned_at: DateTime<Utc>,
  pub rank:       Option<Rank>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn r(n: u32) -> Option<Rank> { Rank::new(n) }

  #[test]
  fn first_scan_is_always_inserted() {
    assert!(ScanOutcome::should_insert(None, r(3)));
    assert!(ScanOutcome::should_insert(None, None));
  }

  #[test]
  fn equal_rank_is_skipped() {
    assert!(!ScanOutcome::should_insert(Some(r(3)), r(3)));
  }

  #[test]
  fn consecutive_not_found_is_skipped() {
    assert!(!ScanOutcome::should_insert(Some(None), None));
  }

  #[test]
  fn changed_rank_is_inserted() {
    assert!(ScanOutcome::should_insert(Some(r(3)), r(4)));
    assert!(ScanOutcome::should_insert(Some(r(3)), None));
    assert!(ScanOutcome::should_insert(Some(None), r(1)));
  }
}
