pub mod config;
pub mod error;
pub mod services;
pub mod speech;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::{Collaborators, JsonStore, Session};
use crate::speech::{ConsoleEars, ConsoleVoice};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // stdout carries the spoken lines
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    tracing::info!("Using card database {}", config.database_path.display());

    let collaborators = Collaborators {
        voice: Box::new(ConsoleVoice::stdout()),
        ears: Box::new(ConsoleEars::stdin()),
        store: Box::new(JsonStore::new(&config.database_path, &config.status_path)),
    };

    let mut session = Session::load(collaborators, config.settings.clone())
        .await?
        .with_scheduler(Box::new(config.scheduler()));
    let summary = session.run().await?;

    tracing::info!(
        "Answered {} ({} passed, {} failed, {} confirmed), skipped {}",
        summary.graded,
        summary.passed,
        summary.failed,
        summary.false_negatives,
        summary.skipped
    );
    if summary.save_failures > 0 {
        tracing::warn!("{} card saves failed", summary.save_failures);
    }

    Ok(())
}
