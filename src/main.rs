use anyhow::Context;
use clap::Parser;
use std::path::Path;
use submission_cache::config::cli::{Cli, Command};
use submission_cache::domain::ports::SubmissionStore;
use submission_cache::utils::logger;
use submission_cache::{
    AirtableConfig, AppError, InMemorySubmissionStore, UserSubmission, UserSubmissionCreate,
    UserSubmissionResponse, UserSubmissionUpdate, ValidationError,
};

fn main() {
    let cli = Cli::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI args: {:?}", cli);

    if let Err(e) = run(&cli) {
        match validation_error(&e) {
            Some(err) => {
                tracing::error!("❌ Validation failed with {} violation(s)", err.len());
                eprintln!("❌ Validation failed:");
                for violation in err.violations() {
                    eprintln!("  - {}", violation);
                }
            }
            None => {
                tracing::error!("❌ {:#}", e);
                eprintln!("❌ {:#}", e);
            }
        }
        std::process::exit(exit_code(&e));
    }
}

/// 1 for rejected input, 2 for I/O, parse and other failures.
fn exit_code(err: &anyhow::Error) -> i32 {
    if validation_error(err).is_some() {
        1
    } else {
        2
    }
}

fn validation_error(err: &anyhow::Error) -> Option<&ValidationError> {
    match err.downcast_ref::<AppError>() {
        Some(AppError::Validation(inner)) => Some(inner),
        _ => err.downcast_ref::<ValidationError>(),
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Create { file } => {
            let create = UserSubmissionCreate::from_json(&read(file)?)?;

            let mut store = InMemorySubmissionStore::new();
            let record = store.insert(create)?;
            print_record(&record)
        }
        Command::Update { file, record } => {
            let update = UserSubmissionUpdate::from_json(&read(file)?)?;

            let current: UserSubmissionResponse = serde_json::from_str(&read(record)?)
                .with_context(|| format!("parsing record {}", record.display()))?;
            let mut current = UserSubmission::try_from(current)?;

            if !current.apply_update(&update) {
                tracing::info!("Update body is empty, record unchanged");
            }
            if !current.is_sync_consistent() {
                tracing::warn!("Record is marked as synced but has no airtable_record_id");
            }
            print_record(&current)
        }
        Command::CheckConfig { config } => {
            let settings = match config {
                Some(path) => AirtableConfig::from_file(path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => AirtableConfig::from_env()?,
            };

            tracing::info!("✅ Airtable configuration is valid");
            println!("base_id: {}", settings.base_id());
            println!("table_name: {}", settings.table_name());
            Ok(())
        }
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn print_record(record: &UserSubmission) -> anyhow::Result<()> {
    let response = UserSubmissionResponse::try_from(record)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
