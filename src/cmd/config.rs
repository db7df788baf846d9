use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};

use crate::config::{
    self, AppConfig, CSV_FILE_PATH, DEFAULT_ENV_FILES, JIRA_API_TOKEN, JIRA_EMAIL,
    JIRA_EPIC_PARENTS, JIRA_ISSUE_TYPE, JIRA_LABELS, JIRA_PROJECT_KEY, JIRA_REPORTER_ACCOUNT_ID,
    JIRA_URL, OPENAI_API_KEY, OPENAI_BASE_URL, OPENAI_MODEL, StoredConfig,
};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the effective configuration (secrets masked).
    Show,
}

const SECRET_KEYS: [&str; 2] = [JIRA_API_TOKEN, OPENAI_API_KEY];

const WIZARD_FIELDS: [(&str, &str); 12] = [
    (JIRA_URL, "Jira base URL (e.g., https://company.atlassian.net)"),
    (JIRA_EMAIL, "Jira email"),
    (JIRA_API_TOKEN, "Jira API token"),
    (JIRA_PROJECT_KEY, "Jira project key"),
    (JIRA_REPORTER_ACCOUNT_ID, "Jira reporter account id"),
    (JIRA_ISSUE_TYPE, "Jira issue type (default Task)"),
    (JIRA_LABELS, "Jira labels, comma separated (default TechTeam,DevOps)"),
    (JIRA_EPIC_PARENTS, "Epic parents as 'Epic name:KEY;...'"),
    (CSV_FILE_PATH, "CSV file path"),
    (OPENAI_API_KEY, "OpenAI API key"),
    (OPENAI_BASE_URL, "OpenAI base URL"),
    (OPENAI_MODEL, "OpenAI model"),
];

pub fn run(command: ConfigCommand, env_file: Option<&Path>) -> AppResult<()> {
    let workspace = std::env::current_dir()?;
    match command {
        ConfigCommand::Init => run_init(&config_file_path(env_file, &workspace)?),
        ConfigCommand::Show => run_show(env_file, &workspace),
    }
}

/// The file the wizard writes: the one in use, or `env.txt` for a new setup.
fn config_file_path(env_file: Option<&Path>, workspace: &Path) -> AppResult<PathBuf> {
    if let Some(path) = env_file {
        return Ok(path.to_path_buf());
    }
    Ok(config::resolve_env_file(None, workspace)?
        .unwrap_or_else(|| workspace.join(DEFAULT_ENV_FILES[0])))
}

fn run_init(path: &Path) -> AppResult<()> {
    let mut stored = StoredConfig::load_or_empty(path)?;

    println!("Configuring backlog loader.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("Secrets are stored in the local config file; protect your filesystem accordingly.");
    println!();

    for (key, label) in WIZARD_FIELDS {
        let current = stored.get(key).map(str::to_string);
        match prompt(label, current.as_deref(), SECRET_KEYS.contains(&key))? {
            PromptAction::Keep => {}
            PromptAction::Clear => stored.set(key, None),
            PromptAction::Set(value) => stored.set(key, Some(value)),
        }
    }

    stored.save()?;
    println!("\nConfiguration saved to {}", stored.path().display());
    Ok(())
}

fn run_show(env_file: Option<&Path>, workspace: &Path) -> AppResult<()> {
    match config::resolve_env_file(env_file, workspace)? {
        Some(path) => println!("Configuration file: {}", path.display()),
        None => println!("Configuration file: <none, using process environment>"),
    }

    let cfg = AppConfig::load(env_file, workspace)?;
    println!("Jira base URL: {}", display_value(&cfg.jira_base_url));
    println!("Jira email: {}", display_value(&cfg.jira_email));
    println!("Jira API token: {}", mask_secret(&cfg.jira_token));
    println!("Jira project key: {}", display_value(&cfg.jira_project_key));
    println!(
        "Jira reporter account id: {}",
        display_value(&cfg.jira_reporter_account_id)
    );
    println!("Jira issue type: {}", cfg.jira_issue_type);
    println!("Jira labels: {}", cfg.jira_labels.join(", "));
    println!("Epic parents:");
    for (epic, key) in cfg.epics.iter() {
        println!("  {epic} -> {key}");
    }
    println!(
        "CSV file path: {}",
        display_value(&cfg.csv_file_path.map(|path| path.display().to_string()))
    );
    println!("OpenAI API key: {}", mask_secret(&cfg.openai_api_key));
    println!("OpenAI base URL: {}", cfg.openai_base_url);
    println!("OpenAI model: {}", cfg.openai_model);

    Ok(())
}

fn prompt(field: &str, current: Option<&str>, secret: bool) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match (current, secret) {
        (Some(_), true) => write!(stdout, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (Some(value), false) => {
            write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?
        }
        (None, _) => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(PromptAction::parse(&input))
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let chars: Vec<char> = token.chars().collect();
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[chars.len() - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            PromptAction::Keep
        } else if trimmed == "-" {
            PromptAction::Clear
        } else {
            PromptAction::Set(trimmed.to_string())
        }
    }
}
