pub mod ai;
pub mod archive;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod ocr;
pub mod pipeline;
pub mod vision;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use pipeline::{BatchReport, DocumentOutcome, OutcomeStatus, Pipeline};

use tracing_subscriber::EnvFilter;

/// Load `.env` from the working directory, falling back to the parent
pub fn load_env() {
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_path("../.env");
    }
}

/// Initialize tracing with RUST_LOG env filter
/// Default: warn for dependencies, info for per-document outcomes
/// `verbose` raises the default to debug (rotation scores, response previews)
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,worksheet_sorter=debug"
    } else {
        "warn,worksheet_sorter=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}
