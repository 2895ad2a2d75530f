use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use worksheet_sorter::config::normalize_subjects;
use worksheet_sorter::{init_tracing, load_env, OutcomeStatus, Pipeline, PipelineConfig};

/// OCR, classify and archive scanned worksheets by subject
#[derive(Parser, Debug)]
#[command(name = "worksheet-sorter", version, about)]
struct Cli {
    /// Directory to read documents from
    #[arg(short, long)]
    inbox: Option<PathBuf>,

    /// Root of the subject-organized archive
    #[arg(short, long)]
    archive: Option<PathBuf>,

    /// Comma-separated subject labels
    #[arg(short, long, value_delimiter = ',')]
    subjects: Option<Vec<String>>,

    /// Generate an answer key next to each archived document
    #[arg(long)]
    answers: bool,

    /// Delete the inbox once every document is archived
    #[arg(long)]
    clear_inbox: bool,

    /// Show where documents would go without moving anything
    #[arg(long)]
    dry_run: bool,

    /// Write a JSON run report to this path
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Generative model name
    #[arg(long)]
    model: Option<String>,

    /// Debug logging (rotation scores, backend responses)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply(self, config: &mut PipelineConfig) -> Option<PathBuf> {
        if let Some(inbox) = self.inbox {
            config.inbox_dir = inbox;
        }
        if let Some(archive) = self.archive {
            config.archive_root = archive;
        }
        if let Some(subjects) = self.subjects {
            config.subjects = normalize_subjects(subjects);
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        config.synthesize_answers |= self.answers;
        config.clear_inbox |= self.clear_inbox;
        config.dry_run |= self.dry_run;
        self.report
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    load_env();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match PipelineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let report_path = cli.apply(&mut config);
    tracing::debug!("Configuration: {:?}", config);

    let mut pipeline = match Pipeline::from_config(config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let report = match pipeline.run().await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    for outcome in &report.outcomes {
        match outcome.status {
            OutcomeStatus::Failed => println!(
                "FAILED   {}: {}",
                outcome.source.display(),
                outcome.error.as_deref().unwrap_or("unknown error")
            ),
            status => println!(
                "{:<8} {} -> {}",
                if status == OutcomeStatus::Planned { "PLANNED" } else { "OK" },
                outcome.source.display(),
                outcome
                    .destination
                    .as_ref()
                    .map(|d| d.display().to_string())
                    .unwrap_or_default()
            ),
        }
    }
    println!(
        "{} processed, {} archived, {} failed",
        report.processed(),
        report.archived(),
        report.failed()
    );

    if let Some(path) = report_path {
        if let Err(e) = report.write_json(&path) {
            eprintln!("Failed to write report {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    }

    if report.failed() > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
