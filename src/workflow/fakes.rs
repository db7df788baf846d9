//! In-memory service doubles for workflow tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::environment::Environment;
use crate::domain::ticket::{Ticket, TicketDraft};
use crate::error::{AppError, AppResult};
use crate::services::{IssueTrackerService, LanguageModelService};

/// Records every create call and hands out sequential `AI-n` keys.
#[derive(Default)]
pub struct FakeIssueTracker {
    calls: Mutex<Vec<TicketDraft>>,
    fail_when_summary_contains: Vec<String>,
}

impl FakeIssueTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_on(needles: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_when_summary_contains: needles.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn drafts(&self) -> Vec<TicketDraft> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueTrackerService for FakeIssueTracker {
    async fn create_ticket(&self, draft: &TicketDraft) -> AppResult<Ticket> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(draft.clone());
        if self
            .fail_when_summary_contains
            .iter()
            .any(|needle| draft.summary.contains(needle))
        {
            return Err(AppError::IssueTracker("rejected".to_string()));
        }
        let created = calls
            .iter()
            .filter(|call| {
                !self
                    .fail_when_summary_contains
                    .iter()
                    .any(|needle| call.summary.contains(needle))
            })
            .count();
        Ok(Ticket {
            key: format!("AI-{created}"),
            url: None,
        })
    }
}

/// Answers prompts containing a known needle; anything else is an error.
pub struct FakeLanguageModel {
    responses: Vec<(String, String)>,
    prompts: Mutex<Vec<String>>,
}

impl FakeLanguageModel {
    pub fn with_responses(responses: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            responses: responses
                .iter()
                .map(|(needle, text)| (needle.to_string(), text.to_string()))
                .collect(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModelService for FakeLanguageModel {
    fn model(&self) -> &str {
        "fake-model"
    }

    async fn complete(&self, prompt: &str) -> AppResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, text)| text.clone())
            .ok_or_else(|| AppError::LanguageModel("no completion available".to_string()))
    }
}

pub fn context(
    environment: Environment,
    tracker: Arc<FakeIssueTracker>,
    language_model: Option<Arc<FakeLanguageModel>>,
) -> AppContext {
    let config = AppConfig::from_lookup(|_| None).unwrap();
    AppContext::new(
        config,
        environment,
        tracker,
        language_model.map(|model| model as Arc<dyn LanguageModelService>),
    )
}
