//! The rank check: rank every keyword of an application and record the result.
//!
//! Keywords are checked strictly one after another: each search and its
//! store write complete before the next keyword starts. A failure on one
//! keyword is reported in its [`KeywordCheck`] and the loop moves on.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
  app::Application,
  ids::ApplicationId,
  rank::Rank,
  scan::ScanOutcome,
  source::RankSource,
  store::RankStore,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a single keyword could not be checked.
#[derive(Debug, Error)]
pub enum CheckError {
  /// The search endpoint could not be reached or answered with an error.
  #[error("fetch failed: {0}")]
  Fetch(#[source] BoxError),

  /// The rank was obtained but could not be recorded.
  #[error("store error: {0}")]
  Store(#[source] BoxError),
}

/// The result of checking one keyword.
#[derive(Debug)]
pub struct KeywordCheck {
  pub keyword: String,
  pub result:  Result<ScanOutcome, CheckError>,
}

impl KeywordCheck {
  /// The observed rank, if the keyword was checked successfully.
  /// `Some(None)` means the search succeeded but the app was not found.
  pub fn rank(&self) -> Option<Option<Rank>> {
    self.result.as_ref().ok().map(ScanOutcome::rank)
  }
}

/// Everything a rank check produced, in keyword order.
#[derive(Debug)]
pub struct RankCheckReport {
  pub application_id: ApplicationId,
  pub checks:         Vec<KeywordCheck>,
}

impl RankCheckReport {
  /// Keywords for which the application appeared in the results.
  pub fn ranked(&self) -> usize {
    self.checks.iter().filter(|c| matches!(c.rank(), Some(Some(_)))).count()
  }

  /// Keywords for which the search succeeded but the app was absent.
  pub fn not_found(&self) -> usize {
    self.checks.iter().filter(|c| matches!(c.rank(), Some(None))).count()
  }

  /// Keywords whose rank changed and was appended to the history.
  pub fn inserted(&self) -> usize {
    self
      .checks
      .iter()
      .filter(|c| matches!(c.result, Ok(ScanOutcome::Inserted(_))))
      .count()
  }

  /// Keywords whose rank matched the previous scan.
  pub fn skipped(&self) -> usize {
    self
      .checks
      .iter()
      .filter(|c| matches!(&c.result, Ok(o) if o.is_skipped()))
      .count()
  }

  pub fn failed(&self) -> usize { self.checks.iter().filter(|c| c.result.is_err()).count() }
}

/// Check every keyword of `application` against `source` and record the
/// results in `store`.
pub async fn run_rank_check<S, R>(
  store: &S,
  source: &R,
  application: &Application,
) -> RankCheckReport
where
  S: RankStore,
  R: RankSource,
{
  run_rank_check_with(store, source, application, |_| {}).await
}

/// Like [`run_rank_check`], but calls `on_check` as soon as each keyword
/// finishes so a frontend can report progress.
pub async fn run_rank_check_with<S, R, F>(
  store: &S,
  source: &R,
  application: &Application,
  mut on_check: F,
) -> RankCheckReport
where
  S: RankStore,
  R: RankSource,
  F: FnMut(&KeywordCheck),
{
  info!(
    app = %application.id,
    name = %application.name,
    country = %application.country,
    keywords = application.keywords.len(),
    "starting rank check"
  );

  let mut checks = Vec::with_capacity(application.keywords.len());
  for keyword in application.keywords.iter() {
    let result = check_keyword(store, source, application, keyword).await;
    let check = KeywordCheck { keyword: keyword.to_owned(), result };
    on_check(&check);
    checks.push(check);
  }

  let report = RankCheckReport { application_id: application.id, checks };
  info!(
    app = %application.id,
    ranked = report.ranked(),
    not_found = report.not_found(),
    inserted = report.inserted(),
    failed = report.failed(),
    "rank check finished"
  );
  report
}

async fn check_keyword<S, R>(
  store: &S,
  source: &R,
  application: &Application,
  keyword: &str,
) -> Result<ScanOutcome, CheckError>
where
  S: RankStore,
  R: RankSource,
{
  let rank = source
    .rank(keyword, &application.country, &application.external_id)
    .await
    .map_err(|e| {
      warn!(keyword, error = %e, "search failed");
      CheckError::Fetch(Box::new(e))
    })?;

  debug!(keyword, rank = ?rank.map(Rank::get), "search finished");

  store
    .record_keyword_scan(
      application.id,
      keyword.to_owned(),
      application.country.clone(),
      rank,
    )
    .await
    .map_err(|e| {
      warn!(keyword, error = %e, "recording scan failed");
      CheckError::Store(Box::new(e))
    })
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::{
    ids::{KeywordId, ScanId},
    scan::Scan,
  };

  fn inserted(rank: Option<Rank>) -> ScanOutcome {
    ScanOutcome::Inserted(Scan {
      id: ScanId(1),
      keyword_id: KeywordId(1),
      application_id: ApplicationId(1),
      rank,
      scanned_at: Utc::now(),
    })
  }

  fn check(keyword: &str, result: Result<ScanOutcome, CheckError>) -> KeywordCheck {
    KeywordCheck { keyword: keyword.into(), result }
  }

  #[test]
  fn report_counts_each_outcome() {
    let io = std::io::Error::other("connection reset");
    let report = RankCheckReport {
      application_id: ApplicationId(1),
      checks:         vec![
        check("coffee", Ok(inserted(Rank::new(3)))),
        check("tea", Ok(ScanOutcome::Skipped { rank: None })),
        check("latte", Ok(inserted(None))),
        check("mocha", Err(CheckError::Fetch(Box::new(io)))),
      ],
    };

    assert_eq!(report.ranked(), 1);
    assert_eq!(report.not_found(), 2);
    assert_eq!(report.inserted(), 2);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.failed(), 1);
  }

  #[test]
  fn failed_check_has_no_rank() {
    let io = std::io::Error::other("boom");
    let c = check("tea", Err(CheckError::Store(Box::new(io))));
    assert_eq!(c.rank(), None);
    assert!(c.result.unwrap_err().to_string().starts_with("store error"));
  }
}
