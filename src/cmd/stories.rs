use std::path::PathBuf;
use std::sync::Arc;

use crate::cmd::environment;
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::environment::Environment;
use crate::error::AppResult;
use crate::infra::jira::JiraClient;
use crate::infra::sheet;
use crate::workflow::report::RunReport;
use crate::workflow::stories::{required_columns, upload_stories};

#[derive(Debug, Clone)]
pub struct StoriesCommandArgs {
    pub csv: Option<PathBuf>,
    pub environment: Option<Environment>,
}

pub async fn run(config: AppConfig, args: StoriesCommandArgs) -> AppResult<RunReport> {
    let jira = config.jira_settings()?;
    let path = config.csv_path(args.csv)?;
    let rows = sheet::load_rows(&path, &required_columns())?;
    let environment = environment::resolve(args.environment)?;

    let context = AppContext::new(config, environment, Arc::new(JiraClient::new(jira)), None);
    Ok(upload_stories(&context, &rows).await)
}
