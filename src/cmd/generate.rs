use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;

use crate::cache::DraftCache;
use crate::cmd::environment;
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::environment::Environment;
use crate::error::AppResult;
use crate::infra::jira::JiraClient;
use crate::infra::llm::OpenAiClient;
use crate::infra::sheet;
use crate::services::LanguageModelService;
use crate::workflow::generate::{REQUIRED_COLUMNS, generate_tickets};
use crate::workflow::report::RunReport;

#[derive(Debug, Clone)]
pub struct GenerateCommandArgs {
    pub csv: Option<PathBuf>,
    pub environment: Option<Environment>,
    pub use_cache: bool,
}

pub async fn run(config: AppConfig, args: GenerateCommandArgs) -> AppResult<RunReport> {
    let jira = config.jira_settings()?;
    let openai = config.openai_settings()?;
    let path = config.csv_path(args.csv)?;
    let rows = sheet::load_rows(&path, &REQUIRED_COLUMNS)?;
    let mut cache = if args.use_cache {
        Some(DraftCache::load()?)
    } else {
        None
    };
    let environment = environment::resolve(args.environment)?;

    let language_model: Arc<dyn LanguageModelService> = Arc::new(OpenAiClient::new(openai));
    let context = AppContext::new(
        config,
        environment,
        Arc::new(JiraClient::new(jira)),
        Some(language_model),
    );
    let report = generate_tickets(&context, &rows, cache.as_mut()).await?;

    if let Some(cache) = &cache {
        if let Err(err) = cache.save() {
            warn!("failed to save draft cache: {err}");
        }
    }

    Ok(report)
}
