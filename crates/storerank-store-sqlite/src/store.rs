//! [`SqliteStore`]: the SQLite implementation of [`RankStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, TransactionBehavior, types::Type};
use tracing::{debug, info};

use storerank_core::{
  app::{Application, NewApplication},
  ids::{ApplicationId, KeywordId, ScanId},
  keyword::{Keyword, KeywordList},
  rank::Rank,
  scan::{HistoryRow, Scan, ScanOutcome},
  store::RankStore,
};

use crate::{
  encode::{RawApplication, RawHistoryRow, encode_dt, encode_rank},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A storerank store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. The store
/// assumes it is the only process writing to the file.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    info!(path = %path.display(), "opened store");
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Synchronous helpers (run on the connection thread) ──────────────────────

/// What happened inside a scan transaction, decoded outside the closure.
enum RawRecord {
  Inserted { scan_id: i64, keyword_id: i64 },
  Skipped,
  ApplicationMissing,
  KeywordMissing { keyword_id: i64 },
  OwnerMismatch { keyword_id: i64, owner: i64 },
}

fn application_exists(conn: &rusqlite::Connection, app_id: i64) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row("SELECT 1 FROM apps WHERE id = ?1", rusqlite::params![app_id], |_| {
        Ok(true)
      })
      .optional()?
      .unwrap_or(false),
  )
}

/// Look up the keyword row for a triple, inserting it if absent.
fn resolve_keyword_row(
  conn: &rusqlite::Connection,
  app_id: i64,
  text: &str,
  country: &str,
) -> rusqlite::Result<i64> {
  let existing: Option<i64> = conn
    .query_row(
      "SELECT id FROM keywords WHERE app_id = ?1 AND keyword = ?2 AND country_code = ?3",
      rusqlite::params![app_id, text, country],
      |r| r.get(0),
    )
    .optional()?;

  if let Some(id) = existing {
    return Ok(id);
  }

  conn.execute(
    "INSERT INTO keywords (app_id, keyword, country_code) VALUES (?1, ?2, ?3)",
    rusqlite::params![app_id, text, country],
  )?;
  Ok(conn.last_insert_rowid())
}

/// Rank of the keyword's most recent scan. The outer `None` means the
/// keyword has never been scanned.
fn latest_rank(
  conn: &rusqlite::Connection,
  app_id: i64,
  keyword_id: i64,
) -> rusqlite::Result<Option<Option<Rank>>> {
  let raw: Option<Option<i64>> = conn
    .query_row(
      "SELECT ranking_position FROM scans
       WHERE app_id = ?1 AND keyword_id = ?2
       ORDER BY date_of_scan DESC, id DESC
       LIMIT 1",
      rusqlite::params![app_id, keyword_id],
      |r| r.get(0),
    )
    .optional()?;

  raw
    .map(|ranking| ranking.map(Rank::try_from).transpose())
    .transpose()
    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(e)))
}

/// Compare against the keyword's most recent scan and append if it differs.
/// The caller must have checked that the keyword belongs to `app_id`.
fn append_if_changed(
  conn: &rusqlite::Connection,
  app_id: i64,
  keyword_id: i64,
  rank: Option<Rank>,
  scanned_at: &str,
) -> rusqlite::Result<RawRecord> {
  let latest = latest_rank(conn, app_id, keyword_id)?;
  if !ScanOutcome::should_insert(latest, rank) {
    return Ok(RawRecord::Skipped);
  }

  conn.execute(
    "INSERT INTO scans (keyword_id, app_id, ranking_position, date_of_scan)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![keyword_id, app_id, encode_rank(rank), scanned_at],
  )?;
  Ok(RawRecord::Inserted { scan_id: conn.last_insert_rowid(), keyword_id })
}

impl SqliteStore {
  /// Turn the raw transaction result into a [`ScanOutcome`] or a domain error.
  fn finish_record(
    raw: RawRecord,
    app_id: ApplicationId,
    rank: Option<Rank>,
    scanned_at: chrono::DateTime<Utc>,
  ) -> Result<ScanOutcome> {
    match raw {
      RawRecord::Inserted { scan_id, keyword_id } => {
        debug!(app = %app_id, keyword = keyword_id, rank = ?rank.map(Rank::get), "scan inserted");
        Ok(ScanOutcome::Inserted(Scan {
          id: ScanId(scan_id),
          keyword_id: KeywordId(keyword_id),
          application_id: app_id,
          rank,
          scanned_at,
        }))
      }
      RawRecord::Skipped => {
        debug!(app = %app_id, rank = ?rank.map(Rank::get), "scan skipped, rank unchanged");
        Ok(ScanOutcome::Skipped { rank })
      }
      RawRecord::ApplicationMissing => Err(Error::ApplicationNotFound(app_id)),
      RawRecord::KeywordMissing { keyword_id } => {
        Err(Error::KeywordNotFound(KeywordId(keyword_id)))
      }
      RawRecord::OwnerMismatch { keyword_id, owner } => Err(Error::KeywordOwnerMismatch {
        keyword:   KeywordId(keyword_id),
        owner:     ApplicationId(owner),
        requested: app_id,
      }),
    }
  }
}

// ─── RankStore impl ──────────────────────────────────────────────────────────

impl RankStore for SqliteStore {
  type Error = Error;

  // ── Applications ──────────────────────────────────────────────────────────

  async fn add_application(&self, input: NewApplication) -> Result<Application> {
    input.validate()?;

    let external_id = input.external_id.clone();
    let name        = input.name.clone();
    let country     = input.country.clone();
    let keywords    = input.keywords.to_csv();

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO apps (app_id, app_name, app_country, app_keywords)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![external_id, name, country, keywords],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    info!(app = id, name = %input.name, "application added");

    Ok(Application {
      id:          ApplicationId(id),
      external_id: input.external_id,
      name:        input.name,
      country:     input.country,
      keywords:    input.keywords,
    })
  }

  async fn get_application(&self, id: ApplicationId) -> Result<Option<Application>> {
    let raw: Option<RawApplication> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {} FROM apps WHERE id = ?1", RawApplication::COLUMNS),
              rusqlite::params![id.get()],
              RawApplication::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawApplication::into_application))
  }

  async fn list_applications(&self) -> Result<Vec<Application>> {
    let raws: Vec<RawApplication> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {} FROM apps ORDER BY id", RawApplication::COLUMNS))?;
        let rows = stmt
          .query_map([], RawApplication::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawApplication::into_application).collect())
  }

  async fn update_keywords(&self, id: ApplicationId, keywords: KeywordList) -> Result<()> {
    let csv = keywords.to_csv();

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE apps SET app_keywords = ?1 WHERE id = ?2",
          rusqlite::params![csv, id.get()],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::ApplicationNotFound(id));
    }
    info!(app = %id, keywords = keywords.len(), "keywords updated");
    Ok(())
  }

  // ── Keywords ──────────────────────────────────────────────────────────────

  async fn resolve_keyword(
    &self,
    application_id: ApplicationId,
    text:           String,
    country:        String,
  ) -> Result<Keyword> {
    let app_id = application_id.get();
    let lookup = (text.clone(), country.clone());

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        let (text, country) = lookup;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !application_exists(&tx, app_id)? {
          return Ok(None);
        }
        let id = resolve_keyword_row(&tx, app_id, &text, &country)?;
        tx.commit()?;
        Ok(Some(id))
      })
      .await?;

    let id = id.ok_or(Error::ApplicationNotFound(application_id))?;
    Ok(Keyword { id: KeywordId(id), application_id, text, country })
  }

  async fn list_unscanned_keywords<'a>(
    &'a self,
    application_id: ApplicationId,
    expected:       &'a [String],
  ) -> Result<Vec<String>> {
    let known: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare("SELECT keyword FROM keywords WHERE app_id = ?1")?;
        let rows = stmt
          .query_map(rusqlite::params![application_id.get()], |r| r.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      expected
        .iter()
        .filter(|e| !known.iter().any(|k| k.trim() == e.trim()))
        .cloned()
        .collect(),
    )
  }

  // ── Scans ─────────────────────────────────────────────────────────────────

  async fn record_scan(
    &self,
    application_id: ApplicationId,
    keyword_id:     KeywordId,
    rank:           Option<Rank>,
  ) -> Result<ScanOutcome> {
    let scanned_at = Utc::now();
    let at_str     = encode_dt(scanned_at);
    let app_id     = application_id.get();
    let kw_id      = keyword_id.get();

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let owner: Option<i64> = tx
          .query_row(
            "SELECT app_id FROM keywords WHERE id = ?1",
            rusqlite::params![kw_id],
            |r| r.get(0),
          )
          .optional()?;

        let raw = match owner {
          None => RawRecord::KeywordMissing { keyword_id: kw_id },
          Some(owner) if owner != app_id => {
            RawRecord::OwnerMismatch { keyword_id: kw_id, owner }
          }
          Some(_) => append_if_changed(&tx, app_id, kw_id, rank, &at_str)?,
        };

        tx.commit()?;
        Ok(raw)
      })
      .await?;

    Self::finish_record(raw, application_id, rank, scanned_at)
  }

  async fn record_keyword_scan(
    &self,
    application_id: ApplicationId,
    text:           String,
    country:        String,
    rank:           Option<Rank>,
  ) -> Result<ScanOutcome> {
    let scanned_at = Utc::now();
    let at_str     = encode_dt(scanned_at);
    let app_id     = application_id.get();

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let raw = if application_exists(&tx, app_id)? {
          let kw_id = resolve_keyword_row(&tx, app_id, &text, &country)?;
          append_if_changed(&tx, app_id, kw_id, rank, &at_str)?
        } else {
          RawRecord::ApplicationMissing
        };

        tx.commit()?;
        Ok(raw)
      })
      .await?;

    Self::finish_record(raw, application_id, rank, scanned_at)
  }

  async fn list_history(&self, application_id: ApplicationId) -> Result<Vec<HistoryRow>> {
    let app_id = application_id.get();

    let raws: Vec<RawHistoryRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT k.keyword, s.date_of_scan, s.ranking_position
           FROM keywords AS k
           INNER JOIN scans AS s ON k.id = s.keyword_id
           WHERE k.app_id = ?1 AND s.app_id = ?1
           ORDER BY k.keyword ASC, s.date_of_scan DESC, s.id DESC",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![app_id], |row| {
            Ok(RawHistoryRow {
              keyword:      row.get(0)?,
              date_of_scan: row.get(1)?,
              ranking:      row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHistoryRow::into_row).collect()
  }

  // ── Maintenance ───────────────────────────────────────────────────────────

  async fn clear(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        // Scans reference keywords, so they go first.
        tx.execute_batch(
          "DELETE FROM scans;
           DELETE FROM keywords;
           DELETE FROM sqlite_sequence WHERE name IN ('keywords', 'scans');",
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    info!("cleared keywords and scans");
    Ok(())
  }
}
