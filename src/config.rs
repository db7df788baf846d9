use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::epic::EpicMap;
use crate::error::{AppError, AppResult};

/// Key-value files looked up in the working directory when no file is given.
pub const DEFAULT_ENV_FILES: [&str; 2] = ["env.txt", ".env"];

pub const JIRA_URL: &str = "JIRA_URL";
pub const JIRA_EMAIL: &str = "JIRA_EMAIL";
pub const JIRA_API_TOKEN: &str = "JIRA_API_TOKEN";
pub const JIRA_PROJECT_KEY: &str = "JIRA_PROJECT_KEY";
pub const JIRA_REPORTER_ACCOUNT_ID: &str = "JIRA_REPORTER_ACCOUNT_ID";
pub const JIRA_ISSUE_TYPE: &str = "JIRA_ISSUE_TYPE";
pub const JIRA_LABELS: &str = "JIRA_LABELS";
pub const JIRA_EPIC_PARENTS: &str = "JIRA_EPIC_PARENTS";
pub const CSV_FILE_PATH: &str = "CSV_FILE_PATH";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const OPENAI_MODEL: &str = "OPENAI_MODEL";

const DEFAULT_ISSUE_TYPE: &str = "Task";
const DEFAULT_LABELS: [&str; 2] = ["TechTeam", "DevOps"];
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jira_base_url: Option<String>,
    pub jira_email: Option<String>,
    pub jira_token: Option<String>,
    pub jira_project_key: Option<String>,
    pub jira_reporter_account_id: Option<String>,
    pub jira_issue_type: String,
    pub jira_labels: Vec<String>,
    pub epics: EpicMap,
    pub csv_file_path: Option<PathBuf>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
}

/// Connection details for the issue tracker, all present.
#[derive(Debug, Clone)]
pub struct JiraSettings {
    pub base_url: String,
    pub email: String,
    pub token: String,
    pub project_key: String,
    pub reporter_account_id: Option<String>,
    pub issue_type: String,
}

#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl AppConfig {
    /// Loads the key-value file (explicit, or the first default found in
    /// `workspace`) and lets process environment variables override it.
    pub fn load(env_file: Option<&Path>, workspace: &Path) -> AppResult<Self> {
        let stored = match resolve_env_file(env_file, workspace)? {
            Some(path) => {
                debug!(path = %path.display(), "loading configuration file");
                StoredConfig::load(&path)?
            }
            None => {
                debug!("no configuration file found, using process environment only");
                StoredConfig::empty(workspace.join(DEFAULT_ENV_FILES[0]))
            }
        };

        Self::from_lookup(|key| {
            env::var(key)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .or_else(|| stored.get(key).map(str::to_string))
        })
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let jira_labels: Vec<String> = match value(JIRA_LABELS) {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|label| !label.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_LABELS.iter().map(|label| label.to_string()).collect(),
        };
        if let Some(label) = jira_labels.iter().find(|label| label.contains(' ')) {
            return Err(AppError::Configuration(format!(
                "Jira labels cannot contain spaces: '{label}'"
            )));
        }

        let epics = match value(JIRA_EPIC_PARENTS) {
            Some(raw) => EpicMap::parse(&raw)?,
            None => EpicMap::default(),
        };

        Ok(Self {
            jira_base_url: value(JIRA_URL),
            jira_email: value(JIRA_EMAIL),
            jira_token: value(JIRA_API_TOKEN),
            jira_project_key: value(JIRA_PROJECT_KEY),
            jira_reporter_account_id: value(JIRA_REPORTER_ACCOUNT_ID),
            jira_issue_type: value(JIRA_ISSUE_TYPE)
                .unwrap_or_else(|| DEFAULT_ISSUE_TYPE.to_string()),
            jira_labels,
            epics,
            csv_file_path: value(CSV_FILE_PATH).map(PathBuf::from),
            openai_api_key: value(OPENAI_API_KEY),
            openai_base_url: value(OPENAI_BASE_URL)
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: value(OPENAI_MODEL).unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
        })
    }

    pub fn jira_settings(&self) -> AppResult<JiraSettings> {
        let missing: Vec<&str> = [
            (JIRA_URL, &self.jira_base_url),
            (JIRA_EMAIL, &self.jira_email),
            (JIRA_API_TOKEN, &self.jira_token),
            (JIRA_PROJECT_KEY, &self.jira_project_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(key, _)| key)
        .collect();

        match (
            &self.jira_base_url,
            &self.jira_email,
            &self.jira_token,
            &self.jira_project_key,
        ) {
            (Some(base_url), Some(email), Some(token), Some(project_key)) => Ok(JiraSettings {
                base_url: base_url.clone(),
                email: email.clone(),
                token: token.clone(),
                project_key: project_key.clone(),
                reporter_account_id: self.jira_reporter_account_id.clone(),
                issue_type: self.jira_issue_type.clone(),
            }),
            _ => Err(AppError::Configuration(format!(
                "missing Jira settings: {}",
                missing.join(", ")
            ))),
        }
    }

    pub fn openai_settings(&self) -> AppResult<OpenAiSettings> {
        let api_key = self.openai_api_key.clone().ok_or_else(|| {
            AppError::Configuration(format!("missing language model setting: {OPENAI_API_KEY}"))
        })?;
        Ok(OpenAiSettings {
            api_key,
            base_url: self.openai_base_url.clone(),
            model: self.openai_model.clone(),
        })
    }

    /// Input file from the command line, falling back to `CSV_FILE_PATH`.
    pub fn csv_path(&self, override_path: Option<PathBuf>) -> AppResult<PathBuf> {
        override_path
            .or_else(|| self.csv_file_path.clone())
            .ok_or_else(|| {
                AppError::Configuration(format!(
                    "no input file given; pass --csv or set {CSV_FILE_PATH}"
                ))
            })
    }
}

/// Picks the key-value file to read. An explicit path must exist.
pub fn resolve_env_file(explicit: Option<&Path>, workspace: &Path) -> AppResult<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(AppError::Configuration(format!(
                "configuration file not found at {}",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }

    Ok(DEFAULT_ENV_FILES
        .iter()
        .map(|name| workspace.join(name))
        .find(|path| path.is_file()))
}

/// Ordered `KEY=VALUE` file as kept on disk.
#[derive(Debug, Clone)]
pub struct StoredConfig {
    path: PathBuf,
    entries: Vec<(String, String)>,
}

impl StoredConfig {
    pub fn empty(path: PathBuf) -> Self {
        Self {
            path,
            entries: Vec::new(),
        }
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            entries: parse_key_values(&contents),
        })
    }

    /// Loads the file if it exists, otherwise starts empty at `path`.
    pub fn load_or_empty(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Self {
                path: path.to_path_buf(),
                entries: parse_key_values(&contents),
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::empty(path.to_path_buf()))
            }
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn set(&mut self, key: &str, value: Option<String>) {
        match value {
            Some(value) => match self.entries.iter_mut().find(|(existing, _)| existing == key) {
                Some(entry) => entry.1 = value,
                None => self.entries.push((key.to_string(), value)),
            },
            None => self.entries.retain(|(existing, _)| existing != key),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut data = String::new();
        for (key, value) in &self.entries {
            data.push_str(key);
            data.push('=');
            data.push_str(value);
            data.push('\n');
        }
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// Parses `KEY=VALUE` lines. Blank lines and `#` comments are skipped,
/// surrounding quotes are stripped, and a repeated key keeps its last value.
pub fn parse_key_values(contents: &str) -> Vec<(String, String)> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<(String, String)> = Vec::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim().to_string();
        if key.is_empty() {
            continue;
        }
        let value = unquote(value.trim()).to_string();

        match seen.get(&key) {
            Some(&index) => {
                warn!("duplicate configuration key '{key}' found, using the latest value");
                entries[index].1 = value;
            }
            None => {
                seen.insert(key.clone(), entries.len());
                entries.push((key, value));
            }
        }
    }

    entries
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
