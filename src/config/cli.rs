use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "submission-cache")]
#[command(about = "Validate form submissions and Airtable settings")]
pub struct Cli {
    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Validate a creation body and print the stored record
    Create {
        /// JSON file with name, email and business_details
        file: PathBuf,
    },
    /// Apply an update body to a record and print the result
    Update {
        /// JSON file with the fields to change
        file: PathBuf,

        /// JSON file holding the current record in response form
        #[arg(long)]
        record: PathBuf,
    },
    /// Load Airtable settings from a TOML file or the environment
    CheckConfig {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_update_command() {
        let cli = Cli::parse_from([
            "submission-cache",
            "--verbose",
            "update",
            "patch.json",
            "--record",
            "current.json",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Command::Update { file, record } => {
                assert_eq!(file, PathBuf::from("patch.json"));
                assert_eq!(record, PathBuf::from("current.json"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_check_config_file_is_optional() {
        let cli = Cli::parse_from(["submission-cache", "check-config"]);
        assert!(matches!(cli.command, Command::CheckConfig { config: None }));
    }
}
