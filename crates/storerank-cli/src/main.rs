//! `storerank`: track where an app ranks in App Store search.
//!
//! # Usage
//!
//! ```text
//! storerank                      # interactive menu
//! storerank add 999 "Brew" us "coffee, tea"
//! storerank check 1
//! storerank history 1
//! storerank --config ~/.config/storerank/storerank.toml list
//! ```

mod app;
mod menu;
mod settings;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use settings::Settings;
use storerank_core::app::NewApplication;
use storerank_search::SearchClient;
use storerank_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "storerank", version, about = "Track App Store keyword rankings")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "storerank.toml")]
  config: PathBuf,

  /// SQLite database file (overrides `store_path`).
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Interactive menu (the default).
  Menu,
  /// Track a new app.
  Add {
    /// The App Store id (`trackId`).
    external_id: String,
    name:        String,
    /// Storefront country code, e.g. `us`.
    country:     String,
    /// Comma-separated keywords.
    keywords:    String,
  },
  /// List tracked apps.
  List,
  /// Rank every keyword of an app now.
  Check {
    /// Position in `list`, starting at 1.
    app: usize,
  },
  /// Replace an app's keyword list.
  Keywords {
    app:      usize,
    /// Comma-separated keywords.
    keywords: String,
  },
  /// Show the stored ranking history of an app.
  History { app: usize },
  /// List keywords of an app that have never been scanned.
  Unscanned { app: usize },
  /// Delete all keywords and scans. Apps are kept.
  Clear {
    /// Do not ask for confirmation.
    #[arg(long)]
    yes: bool,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  // Logs go to stderr so they never interleave with menu output on stdout.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let mut settings = Settings::load(&args.config)?;
  if let Some(store) = args.store {
    settings.store_path = store;
  }

  let store_path = settings.resolved_store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to initialize database at {}", store_path.display()))?;
  let search = SearchClient::new(settings.search_config())?;
  let app = App::new(store, search);

  match args.command.unwrap_or(Command::Menu) {
    Command::Menu => menu::run(&app, &mut menu::Prompt::stdin()).await?,
    Command::Add { external_id, name, country, keywords } => {
      app.add(NewApplication::new(external_id, name, country, &keywords)?).await?;
    }
    Command::List => {
      app.show_applications().await?;
    }
    Command::Check { app: n } => {
      let selected = app.select(n).await?;
      let report = app.check(&selected).await?;
      if report.failed() > 0 {
        anyhow::bail!("{} keyword(s) could not be checked", report.failed());
      }
    }
    Command::Keywords { app: n, keywords } => {
      let selected = app.select(n).await?;
      app.update_keywords(&selected, &keywords).await?;
    }
    Command::History { app: n } => {
      let selected = app.select(n).await?;
      app.history(&selected).await?;
    }
    Command::Unscanned { app: n } => {
      let selected = app.select(n).await?;
      app.unscanned(&selected).await?;
    }
    Command::Clear { yes } => {
      if yes || confirm_clear().await? {
        app.clear().await?;
      } else {
        println!("Aborted.");
      }
    }
  }

  Ok(())
}

async fn confirm_clear() -> Result<bool> {
  let mut prompt = menu::Prompt::stdin();
  let answer = prompt
    .ask("Delete all keywords and scans? Apps are kept. [y/N] ")
    .await?
    .unwrap_or_default();
  Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory as _;

  use super::*;

  #[test]
  fn cli_definition_is_consistent() { Args::command().debug_assert(); }

  #[test]
  fn no_subcommand_means_menu() {
    let args = Args::try_parse_from(["storerank"]).unwrap();
    assert!(args.command.is_none());
    assert_eq!(args.config, PathBuf::from("storerank.toml"));
  }

  #[test]
  fn check_takes_a_position() {
    let args = Args::try_parse_from(["storerank", "--store", "x.db", "check", "2"]).unwrap();
    assert!(matches!(args.command, Some(Command::Check { app: 2 })));
    assert_eq!(args.store, Some(PathBuf::from("x.db")));
  }
}
