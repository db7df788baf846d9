pub mod jira;
pub mod llm;
pub mod sheet;
