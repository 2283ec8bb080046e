//! Console rendering.
//!
//! Everything is first built as a list of [`Line`]s tagged with a [`Tone`],
//! then printed with crossterm colours. Tests inspect the lines directly.

use chrono::Local;
use crossterm::style::Stylize as _;
use storerank_core::{
  app::Application,
  check::{KeywordCheck, RankCheckReport},
  history::{KeywordHistory, Movement},
  rank::Rank,
  scan::ScanOutcome,
};

const RULE: &str = "------------------------------------------------------------------";

// ─── Lines ────────────────────────────────────────────────────────────────────

/// How a line should be coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
  Plain,
  Heading,
  Good,
  Bad,
  Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
  pub text: String,
  pub tone: Tone,
}

impl Line {
  fn new(text: impl Into<String>, tone: Tone) -> Self { Self { text: text.into(), tone } }

  fn plain(text: impl Into<String>) -> Self { Self::new(text, Tone::Plain) }
}

/// Write lines to stdout with their colours applied.
pub fn print(lines: &[Line]) {
  for line in lines {
    let text = line.text.as_str();
    match line.tone {
      Tone::Plain => println!("{text}"),
      Tone::Heading => println!("{}", text.yellow().bold()),
      Tone::Good => println!("{}", text.green()),
      Tone::Bad => println!("{}", text.red()),
      Tone::Info => println!("{}", text.blue()),
    }
  }
}

pub fn format_rank(rank: Option<Rank>) -> String {
  rank.map_or_else(|| "-".to_string(), |r| r.to_string())
}

// ─── Applications ─────────────────────────────────────────────────────────────

/// The numbered application list used for every selection prompt.
pub fn app_list(apps: &[Application]) -> Vec<Line> {
  if apps.is_empty() {
    return vec![Line::new("No apps found. Please add an app first.", Tone::Bad)];
  }

  let mut lines = vec![Line::plain("Available apps:")];
  lines.extend(apps.iter().enumerate().map(|(i, app)| {
    Line::plain(format!(
      "{}) {} (ID: {} Country: {})",
      i + 1,
      app.name,
      app.external_id,
      app.country
    ))
  }));
  lines
}

// ─── Rank check ───────────────────────────────────────────────────────────────

/// One progress line per checked keyword.
pub fn keyword_check(check: &KeywordCheck) -> Line {
  let keyword = &check.keyword;
  match &check.result {
    Ok(ScanOutcome::Inserted(scan)) => match scan.rank {
      Some(rank) => Line::new(format!("\"{keyword}\" at rank {rank} => new rank!"), Tone::Heading),
      None => Line::new(format!("\"{keyword}\" not found => dropped out"), Tone::Heading),
    },
    Ok(ScanOutcome::Skipped { rank }) => Line::new(
      format!("\"{keyword}\" at rank {} => unchanged, skipped", format_rank(*rank)),
      Tone::Info,
    ),
    Err(e) => Line::new(format!("\"{keyword}\" failed: {e}"), Tone::Bad),
  }
}

/// Totals printed once a rank check completes.
pub fn check_summary(report: &RankCheckReport) -> Vec<Line> {
  let summary = format!(
    "Rank check completed: {} ranked, {} not found, {} new, {} unchanged, {} failed.",
    report.ranked(),
    report.not_found(),
    report.inserted(),
    report.skipped(),
    report.failed(),
  );
  let tone = if report.failed() == 0 { Tone::Good } else { Tone::Bad };
  vec![Line::plain(RULE), Line::new(summary, tone)]
}

// ─── History ──────────────────────────────────────────────────────────────────

/// Keyword ranking history, oldest scan first within each keyword.
/// Improvements are green and declines red.
pub fn history(app: &Application, groups: &[KeywordHistory]) -> Vec<Line> {
  if groups.is_empty() {
    return vec![Line::plain(format!("No keywords or scans found for \"{}\".", app.name))];
  }

  let mut lines = vec![
    Line::plain(format!("Keyword Ranking Data : {} ({})", app.name, app.country)),
    Line::plain(RULE),
  ];

  for group in groups {
    lines.push(Line::plain(format!("\"{}\"", group.keyword)));
    for point in &group.points {
      let tone = match point.movement {
        Movement::Improved => Tone::Good,
        Movement::Declined => Tone::Bad,
        Movement::First | Movement::Unchanged => Tone::Plain,
      };
      let at = point.scanned_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S");
      lines.push(Line::new(
        format!("\tScan: {at}, Rank: {}", format_rank(point.rank)),
        tone,
      ));
    }
    lines.push(Line::plain(RULE));
  }
  lines
}

/// Keywords of the app's list that have never been scanned.
pub fn unscanned(app: &Application, missing: &[String]) -> Vec<Line> {
  if missing.is_empty() {
    return vec![Line::new(
      format!("Every keyword of \"{}\" has been scanned.", app.name),
      Tone::Good,
    )];
  }
  let mut lines = vec![Line::plain(format!("Keywords with no rankings for \"{}\":", app.name))];
  lines.extend(missing.iter().map(|k| Line::plain(format!("\t{k}"))));
  lines
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use storerank_core::{
    check::CheckError,
    history::group_history,
    ids::{ApplicationId, KeywordId, ScanId},
    keyword::KeywordList,
    scan::{HistoryRow, Scan},
  };

  use super::*;

  fn app() -> Application {
    Application {
      id:          ApplicationId(1),
      external_id: "999".into(),
      name:        "Brew".into(),
      country:     "us".into(),
      keywords:    KeywordList::parse("coffee, tea"),
    }
  }

  fn row(keyword: &str, secs: i64, rank: Option<u32>) -> HistoryRow {
    HistoryRow {
      keyword:    keyword.into(),
      scanned_at: Utc.timestamp_opt(secs, 0).unwrap(),
      rank:       rank.and_then(Rank::new),
    }
  }

  #[test]
  fn history_colours_follow_movement() {
    let groups = group_history(vec![
      row("coffee", 300, None),
      row("coffee", 200, Some(2)),
      row("coffee", 100, Some(5)),
    ]);
    let lines = history(&app(), &groups);

    let scans: Vec<&Line> = lines.iter().filter(|l| l.text.starts_with("\tScan")).collect();
    assert_eq!(scans.len(), 3);
    assert_eq!(scans[0].tone, Tone::Plain);
    assert!(scans[0].text.ends_with("Rank: 5"));
    assert_eq!(scans[1].tone, Tone::Good);
    assert_eq!(scans[2].tone, Tone::Bad);
    assert!(scans[2].text.ends_with("Rank: -"));
  }

  #[test]
  fn history_groups_are_headed_by_keyword() {
    let groups = group_history(vec![row("coffee", 100, Some(1)), row("tea", 100, Some(2))]);
    let lines = history(&app(), &groups);
    let headings: Vec<&str> = lines
      .iter()
      .filter(|l| l.text.starts_with('"'))
      .map(|l| l.text.as_str())
      .collect();
    assert_eq!(headings, vec!["\"coffee\"", "\"tea\""]);
  }

  #[test]
  fn empty_history_has_one_line() {
    let lines = history(&app(), &[]);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].text.contains("No keywords or scans"));
  }

  #[test]
  fn app_list_is_numbered_from_one() {
    let lines = app_list(&[app()]);
    assert_eq!(lines[1].text, "1) Brew (ID: 999 Country: us)");
    assert_eq!(app_list(&[])[0].tone, Tone::Bad);
  }

  #[test]
  fn keyword_check_lines_distinguish_outcomes() {
    let inserted = KeywordCheck {
      keyword: "coffee".into(),
      result:  Ok(ScanOutcome::Inserted(Scan {
        id:             ScanId(1),
        keyword_id:     KeywordId(1),
        application_id: ApplicationId(1),
        rank:           Rank::new(3),
        scanned_at:     Utc::now(),
      })),
    };
    let skipped = KeywordCheck {
      keyword: "tea".into(),
      result:  Ok(ScanOutcome::Skipped { rank: None }),
    };
    let failed = KeywordCheck {
      keyword: "latte".into(),
      result:  Err(CheckError::Fetch(Box::new(std::io::Error::other("offline")))),
    };

    assert_eq!(keyword_check(&inserted).text, "\"coffee\" at rank 3 => new rank!");
    assert_eq!(keyword_check(&skipped).tone, Tone::Info);
    assert!(keyword_check(&skipped).text.contains("rank -"));
    assert_eq!(keyword_check(&failed).tone, Tone::Bad);
    assert!(keyword_check(&failed).text.contains("fetch failed: offline"));
  }

  #[test]
  fn unscanned_lists_each_keyword() {
    let lines = unscanned(&app(), &["tea".to_string()]);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].text, "\ttea");
    assert_eq!(unscanned(&app(), &[])[0].tone, Tone::Good);
  }
}
