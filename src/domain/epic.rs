use crate::error::{AppError, AppResult};

const DEFAULT_EPICS: [(&str, &str); 3] = [
    ("Infrastructure for pipelines", "AI-425"),
    ("AWS Native Secret Manager solution", "AI-367"),
    ("CICD Pipelines", "AI-331"),
];

/// Lookup from epic display name to the key of its parent issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpicMap {
    entries: Vec<(String, String)>,
}

impl Default for EpicMap {
    fn default() -> Self {
        Self {
            entries: DEFAULT_EPICS
                .iter()
                .map(|(name, key)| (name.to_string(), key.to_string()))
                .collect(),
        }
    }
}

impl EpicMap {
    /// Parses `name:KEY;name:KEY`. The key is taken after the last colon so
    /// epic names may contain colons themselves.
    pub fn parse(value: &str) -> AppResult<Self> {
        let mut entries = Vec::new();
        for entry in value.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, key) = entry.rsplit_once(':').ok_or_else(|| {
                AppError::Configuration(format!(
                    "invalid epic mapping '{entry}', expected 'Epic name:KEY'"
                ))
            })?;
            let (name, key) = (name.trim(), key.trim());
            if name.is_empty() || key.is_empty() {
                return Err(AppError::Configuration(format!(
                    "invalid epic mapping '{entry}', expected 'Epic name:KEY'"
                )));
            }
            entries.push((name.to_string(), key.to_string()));
        }

        if entries.is_empty() {
            return Err(AppError::Configuration(
                "epic mapping must contain at least one entry".to_string(),
            ));
        }
        Ok(Self { entries })
    }

    pub fn parent_key(&self, epic: &str) -> Option<&str> {
        let epic = epic.trim();
        self.entries
            .iter()
            .find(|(name, _)| name == epic)
            .map(|(_, key)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, key)| (name.as_str(), key.as_str()))
    }
}
