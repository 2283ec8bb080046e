//! Keywords: the search terms tracked for an application.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{ApplicationId, KeywordId};

// ─── Keyword row ─────────────────────────────────────────────────────────────

/// A search term tracked for one application in one storefront country.
///
/// At most one keyword row exists per `(application_id, text, country)`.
/// Rows are created lazily by the store the first time that triple is
/// scanned; callers never choose the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
  pub id:             KeywordId,
  pub application_id: ApplicationId,
  pub text:           String,
  pub country:        String,
}

// ─── KeywordList ─────────────────────────────────────────────────────────────

/// The ordered keyword list of an application.
///
/// Persisted as a single comma-delimited column. Entries are trimmed and
/// never empty, so `parse(list.to_csv()) == list` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordList(Vec<String>);

impl KeywordList {
  pub const SEPARATOR: char = ',';

  /// Split comma-separated operator input into trimmed, non-empty entries.
  pub fn parse(csv: &str) -> Self {
    Self(
      csv
        .split(Self::SEPARATOR)
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_owned)
        .collect(),
    )
  }

  pub fn to_csv(&self) -> String { self.0.join(", ") }

  pub fn as_slice(&self) -> &[String] { &self.0 }

  pub fn iter(&self) -> impl Iterator<Item = &str> { self.0.iter().map(String::as_str) }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl fmt::Display for KeywordList {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.to_csv())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_trims_and_drops_empty_entries() {
    let list = KeywordList::parse(" coffee, tea ,,  ,green tea,");
    assert_eq!(list.as_slice(), &["coffee", "tea", "green tea"]);
  }

  #[test]
  fn csv_roundtrip_is_lossless() {
    let list = KeywordList::parse("coffee,tea, espresso machine");
    let again = KeywordList::parse(&list.to_csv());
    assert_eq!(list, again);
    assert_eq!(list.to_csv(), "coffee, tea, espresso machine");
  }

  #[test]
  fn duplicates_keep_operator_order() {
    let list = KeywordList::parse("tea, coffee, tea");
    assert_eq!(list.as_slice(), &["tea", "coffee", "tea"]);
  }

  #[test]
  fn empty_input_yields_empty_list() {
    assert!(KeywordList::parse("").is_empty());
    assert!(KeywordList::parse(" , ,").is_empty());
  }
}
