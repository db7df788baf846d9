mod cache;
mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod logging;
mod services;
mod workflow;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::generate::{self, GenerateCommandArgs};
use crate::cmd::stories::{self, StoriesCommandArgs};
use crate::config::AppConfig;
use crate::domain::environment::Environment;
use crate::error::AppResult;
use crate::workflow::report::{Outcome, RunReport};

#[derive(Parser)]
#[command(
    name = "backlog",
    author,
    version,
    about = "Create Jira tickets from spreadsheet rows"
)]
struct Cli {
    /// Key-value configuration file (defaults to env.txt, then .env).
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Show debug output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create tickets from the authored STORY columns of each row.
    Stories(UploadArgs),
    /// Draft tickets with the language model from Feature/Detail/Urgency rows.
    Generate(GenerateArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct UploadArgs {
    /// Input CSV file; overrides CSV_FILE_PATH.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Target environment; prompts when omitted.
    #[arg(short, long = "env", value_enum, ignore_case = true)]
    environment: Option<Environment>,
}

#[derive(Args)]
struct GenerateArgs {
    #[command(flatten)]
    upload: UploadArgs,

    /// Always ask the language model, ignoring cached drafts.
    #[arg(long)]
    no_cache: bool,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let env_file = cli.env_file.as_deref();
    let report = match cli.command {
        Commands::Config(args) => return config_cmd::run(args.command, env_file),
        Commands::Stories(args) => {
            let config = load_config(env_file)?;
            stories::run(
                config,
                StoriesCommandArgs {
                    csv: args.csv,
                    environment: args.environment,
                },
            )
            .await?
        }
        Commands::Generate(args) => {
            let config = load_config(env_file)?;
            generate::run(
                config,
                GenerateCommandArgs {
                    csv: args.upload.csv,
                    environment: args.upload.environment,
                    use_cache: !args.no_cache,
                },
            )
            .await?
        }
    };

    print!("{}", format_summary(&report));
    Ok(())
}

fn load_config(env_file: Option<&Path>) -> AppResult<AppConfig> {
    let cwd = std::env::current_dir()?;
    AppConfig::load(env_file, &cwd)
}

fn format_summary(report: &RunReport) -> String {
    let mut summary = format!(
        "Done: {} created, {} skipped, {} failed.\n",
        report.created(),
        report.skipped(),
        report.failed()
    );
    let keys = report.created_keys();
    if !keys.is_empty() {
        summary.push_str(&format!("Created issues: {}\n", keys.join(", ")));
    }
    for entry in &report.outcomes {
        if let Outcome::Failed { reason } = &entry.outcome {
            summary.push_str(&format!(
                "  row {}: {}: {reason}\n",
                entry.row, entry.subject
            ));
        }
    }
    summary
}
