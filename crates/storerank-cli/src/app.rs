//! Frontend operations shared by the interactive menu and the subcommands.

use anyhow::{Context as _, Result, bail};
use storerank_core::{
  app::{Application, NewApplication},
  check::{RankCheckReport, run_rank_check_with},
  history::group_history,
  keyword::KeywordList,
  store::RankStore,
};
use storerank_search::SearchClient;
use storerank_store_sqlite::SqliteStore;

use crate::ui;

/// The opened store plus the search client.
pub struct App {
  pub store:  SqliteStore,
  pub search: SearchClient,
}

impl App {
  pub fn new(store: SqliteStore, search: SearchClient) -> Self { Self { store, search } }

  // ── Applications ──────────────────────────────────────────────────────────

  pub async fn add(&self, input: NewApplication) -> Result<Application> {
    let app = self
      .store
      .add_application(input)
      .await
      .context("error inserting app")?;
    println!("App added successfully with ID {}", app.id);
    Ok(app)
  }

  pub async fn applications(&self) -> Result<Vec<Application>> {
    self.store.list_applications().await.context("error fetching apps")
  }

  /// Print the numbered application list and return it.
  pub async fn show_applications(&self) -> Result<Vec<Application>> {
    let apps = self.applications().await?;
    ui::print(&ui::app_list(&apps));
    Ok(apps)
  }

  /// Resolve a 1-based position in the displayed list.
  pub async fn select(&self, position: usize) -> Result<Application> {
    let apps = self.applications().await?;
    pick(apps, position)
  }

  pub async fn update_keywords(&self, app: &Application, csv: &str) -> Result<KeywordList> {
    let keywords = KeywordList::parse(csv);
    self
      .store
      .update_keywords(app.id, keywords.clone())
      .await
      .context("error updating app keywords")?;
    println!("Keywords updated for \"{}\": {keywords}", app.name);
    Ok(keywords)
  }

  // ── Ranking ───────────────────────────────────────────────────────────────

  /// Rank every keyword, printing each result as it arrives, then print the
  /// stored history.
  pub async fn check(&self, app: &Application) -> Result<RankCheckReport> {
    println!(
      "Checking ranks for \"{}\" ({})\nKeywords: {}\n",
      app.name, app.country, app.keywords
    );

    let report = run_rank_check_with(&self.store, &self.search, app, |check| {
      ui::print(&[ui::keyword_check(check)]);
    })
    .await;

    ui::print(&ui::check_summary(&report));
    self.history(app).await?;
    Ok(report)
  }

  pub async fn history(&self, app: &Application) -> Result<()> {
    let rows = self
      .store
      .list_history(app.id)
      .await
      .context("error fetching ranking history")?;
    ui::print(&ui::history(app, &group_history(rows)));
    Ok(())
  }

  pub async fn unscanned(&self, app: &Application) -> Result<Vec<String>> {
    let missing = self
      .store
      .list_unscanned_keywords(app.id, app.keywords.as_slice())
      .await
      .context("error fetching keywords")?;
    ui::print(&ui::unscanned(app, &missing));
    Ok(missing)
  }

  // ── Maintenance ───────────────────────────────────────────────────────────

  pub async fn clear(&self) -> Result<()> {
    self.store.clear().await.context("error clearing database")?;
    println!("Database cleared successfully.");
    Ok(())
  }
}

/// Take the application at 1-based `position`.
pub fn pick(apps: Vec<Application>, position: usize) -> Result<Application> {
  if apps.is_empty() {
    bail!("no apps found, please add an app first");
  }
  let len = apps.len();
  position
    .checked_sub(1)
    .and_then(|i| apps.into_iter().nth(i))
    .with_context(|| format!("invalid selection {position}, expected 1..={len}"))
}
