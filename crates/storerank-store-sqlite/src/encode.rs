//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`)
//! so that lexical order in SQL equals chronological order. Ranks are stored
//! as nullable integers.

use chrono::{DateTime, SecondsFormat, Utc};
use storerank_core::{
  app::Application,
  ids::ApplicationId,
  keyword::KeywordList,
  rank::Rank,
  scan::HistoryRow,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Micros, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Rank ────────────────────────────────────────────────────────────────────

pub fn encode_rank(rank: Option<Rank>) -> Option<i64> { rank.map(i64::from) }

pub fn decode_rank(v: Option<i64>) -> Result<Option<Rank>> {
  Ok(v.map(Rank::try_from).transpose()?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `apps` row.
pub struct RawApplication {
  pub id:       i64,
  pub app_id:   String,
  pub name:     String,
  pub country:  String,
  pub keywords: String,
}

impl RawApplication {
  pub const COLUMNS: &'static str = "id, app_id, app_name, app_country, app_keywords";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:       row.get(0)?,
      app_id:   row.get(1)?,
      name:     row.get(2)?,
      country:  row.get(3)?,
      keywords: row.get(4)?,
    })
  }

  pub fn into_application(self) -> Application {
    Application {
      id:          ApplicationId(self.id),
      external_id: self.app_id,
      name:        self.name,
      country:     self.country,
      keywords:    KeywordList::parse(&self.keywords),
    }
  }
}

/// Raw values from a `scans` row joined with its keyword text.
pub struct RawHistoryRow {
  pub keyword:      String,
  pub date_of_scan: String,
  pub ranking:      Option<i64>,
}

impl RawHistoryRow {
  pub fn into_row(self) -> Result<HistoryRow> {
    Ok(HistoryRow {
      keyword:    self.keyword,
      scanned_at: decode_dt(&self.date_of_scan)?,
      rank:       decode_rank(self.ranking)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_are_fixed_width_and_sort_lexically() {
    let a = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let b = Utc.timestamp_opt(1_700_000_000, 500_000_000).unwrap();
    let (ea, eb) = (encode_dt(a), encode_dt(b));
    assert_eq!(ea.len(), eb.len());
    assert!(ea < eb);
    assert_eq!(decode_dt(&eb).unwrap(), b);
  }

  #[test]
  fn null_rank_decodes_to_not_found() {
    assert_eq!(decode_rank(None).unwrap(), None);
    assert_eq!(decode_rank(Some(7)).unwrap(), Rank::new(7));
    assert!(decode_rank(Some(0)).is_err());
  }
}
