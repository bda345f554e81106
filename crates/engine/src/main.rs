//! SheetBldr Engine - Main entry point.
//!
//! Loads a character snapshot, migrates and imports it, and prints the sheet
//! view as JSON on stdout. Logs go to stderr.

use std::sync::Arc;

use sheetbldr_domain::RulesConfig;
use sheetbldr_engine::infrastructure::config::{load_dotenv_from_repo_root, EngineConfig};
use sheetbldr_engine::infrastructure::headless::HeadlessWorkflow;
use sheetbldr_engine::infrastructure::memory::InMemoryCharacterRepo;
use sheetbldr_engine::infrastructure::snapshot_file::{load_rules, load_snapshot};
use sheetbldr_engine::use_cases::Ruleset;
use sheetbldr_engine::App;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheetbldr_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = EngineConfig::from_env(std::env::args().nth(1))?;
    let rules = match &config.rules_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading rule overrides");
            load_rules(path).await?
        }
        None => RulesConfig::default(),
    };
    let ruleset = Ruleset::new(rules)?;

    let app = App::new(
        ruleset,
        Arc::new(InMemoryCharacterRepo::new()),
        Arc::new(HeadlessWorkflow),
        Arc::new(HeadlessWorkflow),
    );

    tracing::info!(path = %config.snapshot_path.display(), "Loading snapshot");
    let snapshot = load_snapshot(&config.snapshot_path).await?;
    let imported = app.use_cases.sheet.import.execute(snapshot).await?;
    let mut view = app
        .use_cases
        .sheet
        .prepare
        .execute(imported.character_id, &config.filters)
        .await?;
    view.warnings.splice(0..0, imported.warnings);
    view.diagnostics = imported.diagnostics;

    let json = if config.pretty {
        serde_json::to_string_pretty(&view)?
    } else {
        serde_json::to_string(&view)?
    };
    println!("{}", json);
    Ok(())
}
