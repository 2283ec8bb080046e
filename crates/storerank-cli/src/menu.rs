//! The interactive text menu.
//!
//! Store and search errors are reported and the menu continues; only a
//! closed stdin ends the loop early.

use std::{future::Future, io::Write as _};

use anyhow::Result;
use storerank_core::app::{Application, NewApplication};
use tokio::io::{AsyncBufReadExt as _, BufReader, Lines, Stdin};

use crate::{app::App, ui};

// ─── Choices ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
  AddApp,
  RunCheck,
  EditKeywords,
  ShowRanking,
  Unscanned,
  Exit,
}

impl Choice {
  pub fn parse(input: &str) -> Option<Self> {
    match input.trim() {
      "1" => Some(Self::AddApp),
      "2" => Some(Self::RunCheck),
      "3" => Some(Self::EditKeywords),
      "4" => Some(Self::ShowRanking),
      "5" => Some(Self::Unscanned),
      "6" | "q" | "quit" | "exit" => Some(Self::Exit),
      _ => None,
    }
  }
}

const MENU: &str = "\nMenu:
1) Add an App
2) Select App to run Ranking Check
3) Edit App Keywords
4) Show App Ranking
5) Show Keywords Never Scanned
6) Exit";

/// Parse a 1-based selection into a 0-based index below `len`.
pub fn parse_selection(input: &str, len: usize) -> Option<usize> {
  input
    .trim()
    .parse::<usize>()
    .ok()
    .and_then(|n| n.checked_sub(1))
    .filter(|&i| i < len)
}

// ─── Prompt ───────────────────────────────────────────────────────────────────

/// Line-oriented stdin reader.
pub struct Prompt {
  lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
  pub fn stdin() -> Self { Self { lines: BufReader::new(tokio::io::stdin()).lines() } }

  /// Print `label` and read one line. `None` once stdin is closed.
  pub async fn ask(&mut self, label: &str) -> Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;
    Ok(self.lines.next_line().await?)
  }
}

// ─── Loop ─────────────────────────────────────────────────────────────────────

/// Run the menu until the operator exits or stdin closes.
pub async fn run(app: &App, prompt: &mut Prompt) -> Result<()> {
  ui::print(&[ui::Line {
    text: "** Welcome to AppStore Rank Checker! **".into(),
    tone: ui::Tone::Heading,
  }]);

  loop {
    println!("{MENU}");
    let Some(input) = prompt.ask("Enter your choice: ").await? else { break };

    let Some(choice) = Choice::parse(&input) else {
      println!("Invalid choice. Please enter a valid option.");
      continue;
    };

    let outcome = match choice {
      Choice::AddApp => add_app(app, prompt).await,
      Choice::RunCheck => with_selected(app, prompt, "run the rank check", |a| async move {
        app.check(&a).await.map(drop)
      })
      .await,
      Choice::EditKeywords => edit_keywords(app, prompt).await,
      Choice::ShowRanking => with_selected(app, prompt, "see ranking data", |a| async move {
        app.history(&a).await
      })
      .await,
      Choice::Unscanned => with_selected(app, prompt, "list unscanned keywords", |a| async move {
        app.unscanned(&a).await.map(drop)
      })
      .await,
      Choice::Exit => break,
    };

    match outcome {
      Ok(true) => {}
      Ok(false) => break,
      Err(e) => {
        tracing::error!(error = %e, "menu action failed");
        ui::print(&[ui::Line { text: format!("Error: {e:#}"), tone: ui::Tone::Bad }]);
      }
    }
  }

  println!("Goodbye!");
  Ok(())
}

/// `Ok(false)` means stdin closed mid-action.
type Step = Result<bool>;

async fn add_app(app: &App, prompt: &mut Prompt) -> Step {
  let Some(external_id) = prompt.ask("Enter app ID: ").await? else { return Ok(false) };
  let Some(name) = prompt.ask("Enter app name: ").await? else { return Ok(false) };
  let Some(country) = prompt.ask("Enter app country: ").await? else { return Ok(false) };
  let Some(keywords) = prompt.ask("Enter app keywords (comma-separated): ").await? else {
    return Ok(false);
  };

  app.add(NewApplication::new(external_id, name, country, &keywords)?).await?;
  Ok(true)
}

async fn edit_keywords(app: &App, prompt: &mut Prompt) -> Step {
  let Some(selected) = select_app(app, prompt, "edit").await? else { return Ok(true) };

  println!("Current keywords for \"{}\": {}", selected.name, selected.keywords);
  println!("Enter new keywords (or press enter to keep current):");
  let Some(input) = prompt.ask("> ").await? else { return Ok(false) };

  if input.trim().is_empty() {
    println!("Keywords unchanged.");
  } else {
    app.update_keywords(&selected, &input).await?;
  }
  Ok(true)
}

/// Ask for an application and run `action` on it.
async fn with_selected<F, Fut>(app: &App, prompt: &mut Prompt, purpose: &str, action: F) -> Step
where
  F: FnOnce(Application) -> Fut,
  Fut: Future<Output = Result<()>>,
{
  match select_app(app, prompt, purpose).await? {
    Some(selected) => {
      println!("\nYou selected \"{}\" ({})\n", selected.name, selected.country);
      action(selected).await?;
      Ok(true)
    }
    None => Ok(true),
  }
}

/// List the applications and re-prompt until a valid number is entered.
/// `None` if there are no applications or stdin closed.
async fn select_app(
  app: &App,
  prompt: &mut Prompt,
  purpose: &str,
) -> Result<Option<Application>> {
  let mut apps = app.show_applications().await?;
  if apps.is_empty() {
    return Ok(None);
  }

  loop {
    let label = format!("\nSelect an app number to {purpose}: ");
    let Some(input) = prompt.ask(&label).await? else { return Ok(None) };
    match parse_selection(&input, apps.len()) {
      Some(i) => return Ok(Some(apps.swap_remove(i))),
      None => ui::print(&[ui::Line {
        text: "Invalid selection. Please try again.".into(),
        tone: ui::Tone::Bad,
      }]),
    }
  }
}
