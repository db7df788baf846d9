use tracing::{error, info, warn};

/// What happened to one ticket candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created {
        key: String,
        url: Option<String>,
        parent_key: Option<String>,
    },
    Skipped {
        reason: String,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOutcome {
    pub row: usize,
    /// Human-readable source of the ticket, e.g. `'Billing' STORY 2`.
    pub subject: String,
    pub outcome: Outcome,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<RowOutcome>,
}

impl RunReport {
    /// Stores the outcome and emits the matching progress line.
    pub fn record(&mut self, row: usize, subject: impl Into<String>, outcome: Outcome) {
        let subject = subject.into();
        match &outcome {
            Outcome::Created {
                key,
                url,
                parent_key,
            } => {
                let parent = parent_key
                    .as_deref()
                    .map(|parent| format!(", linked to parent '{parent}'"))
                    .unwrap_or_default();
                info!(
                    row,
                    url = url.as_deref().unwrap_or(""),
                    "created issue {key} for {subject}{parent}"
                );
            }
            Outcome::Skipped { reason } => warn!(row, "skipping {subject}: {reason}"),
            Outcome::Failed { reason } => {
                error!(row, "failed to create issue for {subject}: {reason}")
            }
        }
        self.outcomes.push(RowOutcome {
            row,
            subject,
            outcome,
        });
    }

    pub fn created(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Created { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Failed { .. }))
    }

    pub fn created_keys(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|entry| match &entry.outcome {
                Outcome::Created { key, .. } => Some(key.as_str()),
                _ => None,
            })
            .collect()
    }

    fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|entry| predicate(&entry.outcome))
            .count()
    }
}
