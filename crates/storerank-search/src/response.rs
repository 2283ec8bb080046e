//! Wire types for the iTunes Search API response.
//!
//! Only the fields needed for ranking are decoded; everything else in a
//! result object is ignored.

use serde::Deserialize;
use storerank_core::rank::Rank;

/// Top-level response body: `{"resultCount": n, "results": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
  #[serde(default)]
  pub result_count: Option<u64>,
  #[serde(default)]
  pub results:      Vec<SearchResult>,
}

/// One entry in the result list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
  pub track_id: Option<TrackId>,
}

/// `trackId` is normally a JSON number. It is compared by its decimal text
/// against the stored external id. Any other JSON shape is kept as `Other`
/// and never matches, so one odd entry cannot fail the whole response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TrackId {
  Number(u64),
  Text(String),
  Other(serde_json::Value),
}

impl TrackId {
  pub fn matches(&self, external_id: &str) -> bool {
    match self {
      Self::Number(n) => n.to_string() == external_id,
      Self::Text(s) => s == external_id,
      Self::Other(_) => false,
    }
  }
}

impl SearchResponse {
  /// 1-based position of the first result whose `trackId` equals
  /// `external_id`, in upstream order.
  pub fn rank_of(&self, external_id: &str) -> Option<Rank> {
    self
      .results
      .iter()
      .position(|r| r.track_id.as_ref().is_some_and(|id| id.matches(external_id)))
      .and_then(Rank::from_index)
  }
}
