//! SQL schema for the storerank SQLite store.
//!
//! Executed once at connection startup. There are no migrations; the
//! `PRAGMA user_version` marks the layout for tooling that inspects the file.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS apps (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    app_id       TEXT NOT NULL,   -- store-assigned trackId
    app_name     TEXT NOT NULL,
    app_country  TEXT NOT NULL,
    app_keywords TEXT NOT NULL    -- comma-separated, see KeywordList
);

-- One row per (app, keyword, country); created on first scan.
CREATE TABLE IF NOT EXISTS keywords (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    app_id       INTEGER NOT NULL REFERENCES apps(id),
    keyword      TEXT NOT NULL,
    country_code TEXT NOT NULL,
    UNIQUE (app_id, keyword, country_code)
);

-- Scans are strictly append-only. A row is only written when the rank
-- differs from the keyword's most recent scan.
CREATE TABLE IF NOT EXISTS scans (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    keyword_id       INTEGER NOT NULL REFERENCES keywords(id),
    app_id           INTEGER NOT NULL REFERENCES apps(id),
    ranking_position INTEGER,         -- NULL means not found
    date_of_scan     TEXT NOT NULL,   -- RFC 3339 UTC, fixed width
    CHECK (ranking_position IS NULL OR ranking_position > 0)
);

CREATE INDEX IF NOT EXISTS scans_latest_idx ON scans(app_id, keyword_id, date_of_scan);
CREATE INDEX IF NOT EXISTS keywords_app_idx ON keywords(app_id);

PRAGMA user_version = 1;
";
