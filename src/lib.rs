pub mod ai;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod journal;
pub mod logging;
pub mod stats;
pub mod store;
pub mod validation;

use std::path::PathBuf;
use std::sync::Arc;

pub use config::{AppConfig, BackendConfig};
pub use error::AppError;
pub use journal::{Journal, RepairReport};

const ENV_CONFIG_PATH: &str = "DATING_JOURNAL_CONFIG";

/// `$DATING_JOURNAL_CONFIG`, else `{config_dir}/dating-journal/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os(ENV_CONFIG_PATH)
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|d| d.join("dating-journal").join("config.toml")))
}

/// Open the configured store, heal every drifted profile and log a summary.
///
/// Entry point of the `journal-doctor` binary.
pub fn run() -> Result<RepairReport, AppError> {
    let _ = dotenvy::dotenv();

    let config = AppConfig::load(default_config_path().as_deref())?;
    let log_dir = config.data_dir.join("logs");
    let _log_guard = logging::init(config.log_to_file.then_some(log_dir.as_path()));

    tracing::info!("Starting journal-doctor v{}", env!("CARGO_PKG_VERSION"));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(repair(config))
}

async fn repair(config: AppConfig) -> Result<RepairReport, AppError> {
    let pool = db::init_db(&config.data_dir)?;
    let backend = config::resolve_backend(&pool, config.backend.as_ref())?;
    let store = store::select_store(pool, backend.as_ref(), config.request_timeout())?;

    let mut journal = Journal::new(store);
    if let Some(backend) = &backend {
        let analyst =
            ai::EdgeFunctionAnalyst::new(backend, &config.ai_function, config.request_timeout())?;
        journal = journal.with_analyst(Arc::new(analyst));
    }

    journal.load().await?;
    let report = journal.repair_all().await?;

    let stats = journal.dashboard();
    tracing::info!(
        backend = journal.backend_name(),
        people = stats.total_people,
        dates = stats.total_dates,
        average_rating = stats.average_rating,
        corrected = report.corrected.len(),
        "Journal check complete"
    );
    for id in &report.corrected {
        tracing::info!(profile_id = %id, "Corrected profile summary");
    }
    Ok(report)
}
