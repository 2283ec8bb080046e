//! The `RankSource` trait: where ranks come from.
//!
//! Implemented by `storerank-search` against the live search endpoint, and by
//! canned sources in tests.

use std::future::Future;

use crate::rank::Rank;

/// Looks up the rank of an application for one keyword.
pub trait RankSource: Send + Sync {
  /// A failure to obtain results at all. Never used for "not found".
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return the 1-based position of `external_id` in the results for
  /// `keyword` in the `country` storefront, or `None` if it is absent.
  fn rank<'a>(
    &'a self,
    keyword: &'a str,
    country: &'a str,
    external_id: &'a str,
  ) -> impl Future<Output = Result<Option<Rank>, Self::Error>> + Send + 'a;
}
