use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::environment::Environment;
use crate::services::{IssueTrackerService, LanguageModelService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub environment: Environment,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
    pub language_model: Option<Arc<dyn LanguageModelService>>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        environment: Environment,
        issue_tracker: Arc<dyn IssueTrackerService>,
        language_model: Option<Arc<dyn LanguageModelService>>,
    ) -> Self {
        Self {
            config,
            environment,
            issue_tracker,
            language_model,
        }
    }
}
