//! Runtime configuration.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, `STORERANK_*` environment variables. CLI flags are applied on top by
//! `main`.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use serde::Deserialize;
use storerank_search::{DEFAULT_ENDPOINT, DEFAULT_LIMIT, SearchConfig};

/// Settings deserialised from `storerank.toml` and the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  #[serde(default = "default_store_path")]
  pub store_path:          PathBuf,
  #[serde(default = "default_endpoint")]
  pub search_endpoint:     String,
  #[serde(default = "default_limit")]
  pub search_limit:        u32,
  #[serde(default = "default_timeout_secs")]
  pub search_timeout_secs: u64,
}

fn default_store_path() -> PathBuf { PathBuf::from("storerank.sqlite3") }

fn default_endpoint() -> String { DEFAULT_ENDPOINT.to_string() }

fn default_limit() -> u32 { DEFAULT_LIMIT }

fn default_timeout_secs() -> u64 { 30 }

impl Settings {
  /// Read `path` (if it exists) and the `STORERANK_*` environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("STORERANK").try_parsing(true))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    settings
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  pub fn search_config(&self) -> SearchConfig {
    SearchConfig {
      endpoint: self.search_endpoint.clone(),
      limit:    self.search_limit,
      timeout:  Duration::from_secs(self.search_timeout_secs),
    }
  }

  /// The store path with a leading `~` expanded.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(settings.search_endpoint, DEFAULT_ENDPOINT);
    assert_eq!(settings.search_limit, 200);
    assert_eq!(settings.search_config().timeout, Duration::from_secs(30));
  }

  #[test]
  fn file_values_override_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "store_path = \"ranks.db\"\nsearch_limit = 50").unwrap();

    let settings = Settings::load(file.path()).unwrap();
    assert_eq!(settings.store_path, PathBuf::from("ranks.db"));
    assert_eq!(settings.search_limit, 50);
    assert_eq!(settings.search_timeout_secs, 30);
  }

  #[test]
  fn tilde_is_expanded_against_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    let expanded = expand_tilde(Path::new("~/ranks/db.sqlite3"));
    assert_eq!(expanded, PathBuf::from(home).join("ranks/db.sqlite3"));
    assert_eq!(expand_tilde(Path::new("/abs")), PathBuf::from("/abs"));
  }
}
