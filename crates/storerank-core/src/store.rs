//! The `RankStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `storerank-store-sqlite`). The rank-check loop and the CLI depend on this
//! abstraction, not on any concrete backend.
//!
//! It covers three registries over one store: applications, keywords, and the
//! append-only scan log.

use std::future::Future;

use crate::{
  app::{Application, NewApplication},
  ids::{ApplicationId, KeywordId},
  keyword::{Keyword, KeywordList},
  rank::Rank,
  scan::{HistoryRow, ScanOutcome},
};

/// Abstraction over a storerank persistence backend.
pub trait RankStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Applications ──────────────────────────────────────────────────────

  /// Persist a new tracked application.
  fn add_application(
    &self,
    input: NewApplication,
  ) -> impl Future<Output = Result<Application, Self::Error>> + Send + '_;

  /// Retrieve an application by id. Returns `None` if not found.
  fn get_application(
    &self,
    id: ApplicationId,
  ) -> impl Future<Output = Result<Option<Application>, Self::Error>> + Send + '_;

  /// List all applications in insertion order.
  fn list_applications(
    &self,
  ) -> impl Future<Output = Result<Vec<Application>, Self::Error>> + Send + '_;

  /// Replace the keyword list of an application. Existing keyword rows and
  /// their scans are left untouched.
  fn update_keywords(
    &self,
    id: ApplicationId,
    keywords: KeywordList,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Keywords ──────────────────────────────────────────────────────────

  /// Return the keyword row for `(application, text, country)`, creating it
  /// on first use. Never creates a second row for a triple.
  fn resolve_keyword(
    &self,
    application_id: ApplicationId,
    text: String,
    country: String,
  ) -> impl Future<Output = Result<Keyword, Self::Error>> + Send + '_;

  /// Which of `expected` have no keyword row for this application yet.
  fn list_unscanned_keywords<'a>(
    &'a self,
    application_id: ApplicationId,
    expected: &'a [String],
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + 'a;

  // ── Scans ─────────────────────────────────────────────────────────────

  /// Append a scan unless the most recent scan of this keyword already holds
  /// `rank`. The read and the conditional write form one atomic operation.
  ///
  /// Fails if the keyword does not belong to `application_id`.
  fn record_scan(
    &self,
    application_id: ApplicationId,
    keyword_id: KeywordId,
    rank: Option<Rank>,
  ) -> impl Future<Output = Result<ScanOutcome, Self::Error>> + Send + '_;

  /// [`resolve_keyword`](Self::resolve_keyword) followed by
  /// [`record_scan`](Self::record_scan), as one atomic operation.
  fn record_keyword_scan(
    &self,
    application_id: ApplicationId,
    text: String,
    country: String,
    rank: Option<Rank>,
  ) -> impl Future<Output = Result<ScanOutcome, Self::Error>> + Send + '_;

  /// All scans of an application joined with their keyword text, ordered by
  /// keyword ascending, then most recent first.
  fn list_history(
    &self,
    application_id: ApplicationId,
  ) -> impl Future<Output = Result<Vec<HistoryRow>, Self::Error>> + Send + '_;

  // ── Maintenance ───────────────────────────────────────────────────────

  /// Delete every keyword and scan and restart their id counters at 1.
  /// Applications are left as they are.
  fn clear(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
