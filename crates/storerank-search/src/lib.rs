//! Async client for the public iTunes Search API.
//!
//! One call issues exactly one `GET` and computes the rank of a target app
//! from the returned list. Responses are never cached: each request carries a
//! `nocache` query parameter and a `Cache-Control: no-cache` header.
//!
//! <https://developer.apple.com/library/archive/documentation/AudioVideo/Conceptual/iTuneSearchAPI/Searching.html>

pub mod error;
pub mod response;

use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, header};
use storerank_core::{rank::Rank, source::RankSource};
use tracing::debug;

pub use error::{Error, Result};
use response::SearchResponse;

/// The public search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://itunes.apple.com/search";

/// The largest result set the endpoint returns.
pub const DEFAULT_LIMIT: u32 = 200;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Connection settings for the search endpoint.
#[derive(Debug, Clone)]
pub struct SearchConfig {
  pub endpoint: String,
  /// Maximum number of results requested per keyword.
  pub limit:    u32,
  pub timeout:  Duration,
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self {
      endpoint: DEFAULT_ENDPOINT.to_string(),
      limit:    DEFAULT_LIMIT,
      timeout:  Duration::from_secs(30),
    }
  }
}

// ─── Client ───────────────────────────────────────────────────────────────────

/// Async HTTP client for the search endpoint.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct SearchClient {
  client: Client,
  config: SearchConfig,
}

impl SearchClient {
  pub fn new(config: SearchConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .user_agent(concat!("storerank/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(Error::Client)?;
    Ok(Self { client, config })
  }

  /// `GET <endpoint>?term=..&country=..&entity=software&limit=..&nocache=..`
  pub async fn search(&self, keyword: &str, country: &str) -> Result<SearchResponse> {
    let limit = self.config.limit.to_string();
    let nocache = Utc::now().timestamp_millis().to_string();

    let resp = self
      .client
      .get(self.config.endpoint.as_str())
      .header(header::CACHE_CONTROL, "no-cache")
      .query(&[
        ("term", keyword),
        ("country", country),
        ("entity", "software"),
        ("limit", limit.as_str()),
        ("nocache", nocache.as_str()),
      ])
      .send()
      .await
      .map_err(Error::Transport)?;

    let status = resp.status();
    if !status.is_success() {
      return Err(Error::Status(status));
    }

    let body = resp.bytes().await.map_err(Error::Transport)?;
    let parsed: SearchResponse = serde_json::from_slice(&body)?;

    debug!(
      keyword,
      country,
      results = parsed.results.len(),
      result_count = ?parsed.result_count,
      "search response"
    );
    Ok(parsed)
  }

  /// Rank of `external_id` for `keyword` in the `country` storefront.
  /// `Ok(None)` means the search worked but the app was not in the results.
  pub async fn rank(
    &self,
    keyword: &str,
    country: &str,
    external_id: &str,
  ) -> Result<Option<Rank>> {
    Ok(self.search(keyword, country).await?.rank_of(external_id))
  }
}

impl RankSource for SearchClient {
  type Error = Error;

  async fn rank(
    &self,
    keyword: &str,
    country: &str,
    external_id: &str,
  ) -> Result<Option<Rank>> {
    SearchClient::rank(self, keyword, country, external_id).await
  }
}
