//! Display model for rank history.
//!
//! The store hands back rows grouped by keyword with the newest scan first.
//! For display each keyword's scans are re-sorted oldest first and every
//! point is compared with the one before it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{rank::Rank, scan::HistoryRow};

/// How a rank moved relative to the previous scan of the same keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
  /// The oldest scan of the keyword; nothing to compare against.
  First,
  /// A smaller position, or found after being absent.
  Improved,
  /// A larger position, or dropped out of the results.
  Declined,
  Unchanged,
}

impl Movement {
  pub fn between(previous: Option<Rank>, current: Option<Rank>) -> Self {
    match (previous, current) {
      (Some(p), Some(c)) if c < p => Self::Improved,
      (Some(p), Some(c)) if c > p => Self::Declined,
      (None, Some(_)) => Self::Improved,
      (Some(_), None) => Self::Declined,
      _ => Self::Unchanged,
    }
  }
}

/// One scan, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
  pub scanned_at: DateTime<Utc>,
  pub rank:       Option<Rank>,
  pub movement:   Movement,
}

/// All scans of one keyword, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordHistory {
  pub keyword: String,
  pub points:  Vec<TrendPoint>,
}

/// Group storage-ordered rows by keyword, keeping the keyword order of the
/// input, and sort each group ascending by scan time.
pub fn group_history(rows: Vec<HistoryRow>) -> Vec<KeywordHistory> {
  let mut groups: Vec<(String, Vec<(DateTime<Utc>, Option<Rank>)>)> = Vec::new();

  for row in rows {
    match groups.iter_mut().find(|(k, _)| *k == row.keyword) {
      Some((_, scans)) => scans.push((row.scanned_at, row.rank)),
      None => groups.push((row.keyword, vec![(row.scanned_at, row.rank)])),
    }
  }

  groups
    .into_iter()
    .map(|(keyword, mut scans)| {
      // Stable: same-instant scans keep their storage order reversed back
      // to insertion order.
      scans.reverse();
      scans.sort_by_key(|(at, _)| *at);

      let mut previous: Option<Option<Rank>> = None;
      let points = scans
        .into_iter()
        .map(|(scanned_at, rank)| {
          let movement = match previous {
            None => Movement::First,
            Some(p) => Movement::between(p, rank),
          };
          previous = Some(rank);
          TrendPoint { scanned_at, rank, movement }
        })
        .collect();

      KeywordHistory { keyword, points }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;

  fn row(keyword: &str, secs: i64, rank: Option<u32>) -> HistoryRow {
    HistoryRow {
      keyword:    keyword.into(),
      scanned_at: Utc.timestamp_opt(secs, 0).unwrap(),
      rank:       rank.and_then(Rank::new),
    }
  }

  #[test]
  fn groups_keep_input_keyword_order_and_sort_ascending() {
    let rows = vec![
      row("coffee", 300, Some(2)),
      row("coffee", 200, Some(5)),
      row("coffee", 100, Some(3)),
      row("tea", 250, None),
      row("tea", 150, Some(9)),
    ];

    let groups = group_history(rows);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].keyword, "coffee");
    assert_eq!(groups[1].keyword, "tea");

    let secs: Vec<i64> = groups[0].points.iter().map(|p| p.scanned_at.timestamp()).collect();
    assert_eq!(secs, vec![100, 200, 300]);
  }

  #[test]
  fn movement_compares_with_previous_point() {
    let groups = group_history(vec![
      row("coffee", 300, Some(2)),
      row("coffee", 200, Some(5)),
      row("coffee", 100, Some(3)),
    ]);
    let moves: Vec<Movement> = groups[0].points.iter().map(|p| p.movement).collect();
    assert_eq!(moves, vec![Movement::First, Movement::Declined, Movement::Improved]);
    assert_eq!(groups[0].points.last().and_then(|p| p.rank), Rank::new(2));
  }

  #[test]
  fn not_found_counts_as_worse_than_any_rank() {
    assert_eq!(Movement::between(Rank::new(200), None), Movement::Declined);
    assert_eq!(Movement::between(None, Rank::new(200)), Movement::Improved);
    assert_eq!(Movement::between(None, None), Movement::Unchanged);
    assert_eq!(Movement::between(Rank::new(4), Rank::new(4)), Movement::Unchanged);
  }

  #[test]
  fn empty_history_has_no_groups() {
    assert!(group_history(Vec::new()).is_empty());
  }
}
