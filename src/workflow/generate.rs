use tracing::debug;

use crate::cache::DraftCache;
use crate::context::AppContext;
use crate::domain::row::RowRecord;
use crate::domain::sections::extract_sections;
use crate::error::{AppError, AppResult};
use crate::workflow::report::{Outcome, RunReport};
use crate::workflow::stories::UPLOADED_TO_JIRA;
use crate::workflow::submit::{EpicPolicy, submit_ticket};

pub const FEATURE: &str = "Feature";
pub const DETAIL: &str = "Detail";
pub const URGENCY: &str = "Urgency";
pub const ADDITIONAL_INFO: &str = "Additional Info";

pub const REQUIRED_COLUMNS: [&str; 3] = [FEATURE, DETAIL, URGENCY];

pub fn build_prompt(row: &RowRecord) -> String {
    format!(
        "Given the data below, generate a concise Jira ticket that includes a Title, a \
         Description, Blockers, and Acceptance Criteria. Format your response with headings \
         for each section.\n\
         \n\
         Data:\n\
         - Feature: {feature}\n\
         - Detail: {detail}\n\
         - Urgency: {urgency}\n\
         - Additional Info: {additional}\n\
         \n\
         Please format your response as follows:\n\
         Title: [Generated Title]\n\
         Description: [Generated Description]\n\
         Blockers: [Generated Blockers]\n\
         Acceptance Criteria: [Generated Acceptance Criteria]\n",
        feature = row.get_or_na(FEATURE),
        detail = row.get_or_na(DETAIL),
        urgency = row.get_or_na(URGENCY),
        additional = row.get_or_na(ADDITIONAL_INFO),
    )
}

/// Drafts a ticket per row with the language model and submits it.
///
/// Completions found in `cache` are reused; new ones are added to it.
pub async fn generate_tickets(
    ctx: &AppContext,
    rows: &[RowRecord],
    mut cache: Option<&mut DraftCache>,
) -> AppResult<RunReport> {
    let language_model = ctx.language_model.as_ref().ok_or_else(|| {
        AppError::Configuration("no language model configured for ticket drafting".to_string())
    })?;
    let environment = ctx.environment;
    let mut report = RunReport::default();

    for row in rows {
        let subject = format!(
            "row {} ('{}') in '{environment}'",
            row.number,
            row.get_or_na(FEATURE)
        );

        if environment.is_marked_uploaded(row.get(UPLOADED_TO_JIRA)) {
            report.record(
                row.number,
                subject,
                Outcome::Skipped {
                    reason: format!("already uploaded to Jira for the '{environment}' environment"),
                },
            );
            continue;
        }

        let prompt = build_prompt(row);
        let key = DraftCache::compute_key(language_model.model(), &prompt);

        let cached = cache
            .as_deref()
            .and_then(|cache| cache.get(&key))
            .map(str::to_string);
        let completion = match cached {
            Some(text) => {
                debug!(row = row.number, "reusing cached draft");
                text
            }
            None => match language_model.complete(&prompt).await {
                Ok(text) => {
                    if let Some(cache) = cache.as_deref_mut() {
                        cache.insert(key, &text);
                    }
                    text
                }
                Err(err) => {
                    report.record(
                        row.number,
                        subject,
                        Outcome::Failed {
                            reason: err.to_string(),
                        },
                    );
                    continue;
                }
            },
        };

        let fields = extract_sections(&completion);
        debug!(row = row.number, title = %fields.title, "parsed generated draft");
        let outcome = submit_ticket(ctx, &fields, EpicPolicy::Optional).await;
        report.record(row.number, subject, outcome);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::environment::Environment;
    use crate::workflow::fakes::{FakeIssueTracker, FakeLanguageModel, context};

    const DRAFT: &str = "Title: Single sign-on\n\
                         Description: Let staff log in with the company IdP.\n\
                         Blockers: IdP metadata\n\
                         Acceptance Criteria: Staff can log in with SSO.";

    fn row(number: usize, feature: &str) -> RowRecord {
        RowRecord::from_pairs(
            number,
            [
                (FEATURE, feature),
                (DETAIL, "Add SSO"),
                (URGENCY, "High"),
            ],
        )
    }

    #[test]
    fn prompt_carries_row_data_and_sentinel() {
        let prompt = build_prompt(&row(1, "Login"));
        assert!(prompt.contains("- Feature: Login\n"));
        assert!(prompt.contains("- Urgency: High\n"));
        assert!(prompt.contains("- Additional Info: N/A\n"));
        assert!(prompt.contains("\nAcceptance Criteria: [Generated Acceptance Criteria]"));
    }

    #[tokio::test]
    async fn drafts_and_submits_each_row() {
        let tracker = FakeIssueTracker::new();
        let model = FakeLanguageModel::with_responses(&[("Login", DRAFT)]);
        let ctx = context(Environment::Dev, tracker.clone(), Some(model.clone()));

        let report = generate_tickets(&ctx, &[row(1, "Login")], None).await.unwrap();

        assert_eq!(report.created(), 1);
        assert_eq!(model.prompts().len(), 1);
        let drafts = tracker.drafts();
        assert_eq!(drafts[0].summary, "[DEV] Single sign-on");
        assert_eq!(drafts[0].parent_key, None);
        assert_eq!(
            drafts[0].description,
            "Description: Let staff log in with the company IdP.\n\n\
             Blockers: IdP metadata\n\n\
             Acceptance Criteria: Staff can log in with SSO."
        );
    }

    #[tokio::test]
    async fn generation_failure_is_reported_and_run_continues() {
        let tracker = FakeIssueTracker::new();
        let model = FakeLanguageModel::with_responses(&[("Login", DRAFT)]);
        let ctx = context(Environment::Dev, tracker.clone(), Some(model));

        let rows = [row(1, "Unknown feature"), row(2, "Login")];
        let report = generate_tickets(&ctx, &rows, None).await.unwrap();

        assert_eq!(report.failed(), 1);
        assert_eq!(report.created(), 1);
        assert_eq!(tracker.drafts().len(), 1);
    }

    #[tokio::test]
    async fn skips_uploaded_rows_without_calling_model() {
        let tracker = FakeIssueTracker::new();
        let model = FakeLanguageModel::with_responses(&[("Login", DRAFT)]);
        let ctx = context(Environment::Prod, tracker.clone(), Some(model.clone()));
        let uploaded = RowRecord::from_pairs(
            1,
            [
                (FEATURE, "Login"),
                (DETAIL, "Add SSO"),
                (URGENCY, "High"),
                (UPLOADED_TO_JIRA, "Yes: PROD"),
            ],
        );

        let report = generate_tickets(&ctx, &[uploaded], None).await.unwrap();

        assert_eq!(report.skipped(), 1);
        assert!(model.prompts().is_empty());
        assert!(tracker.drafts().is_empty());
    }

    #[tokio::test]
    async fn unknown_generated_epic_skips_row() {
        let tracker = FakeIssueTracker::new();
        let draft = format!("{DRAFT}\nEpic: Mobile");
        let model = FakeLanguageModel::with_responses(&[("Login", draft.as_str())]);
        let ctx = context(Environment::Dev, tracker.clone(), Some(model));

        let report = generate_tickets(&ctx, &[row(1, "Login")], None).await.unwrap();

        assert_eq!(report.skipped(), 1);
        assert!(tracker.drafts().is_empty());
    }

    #[tokio::test]
    async fn reuses_cached_completions() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DraftCache::load_from(&dir.path().join("cache.json")).unwrap();
        let tracker = FakeIssueTracker::new();
        let model = FakeLanguageModel::with_responses(&[("Login", DRAFT)]);
        let ctx = context(Environment::Dev, tracker.clone(), Some(model.clone()));

        let rows = [row(1, "Login")];
        generate_tickets(&ctx, &rows, Some(&mut cache)).await.unwrap();
        generate_tickets(&ctx, &rows, Some(&mut cache)).await.unwrap();

        assert_eq!(model.prompts().len(), 1);
        assert_eq!(tracker.drafts().len(), 2);
    }

    #[tokio::test]
    async fn requires_language_model() {
        let ctx = context(Environment::Dev, FakeIssueTracker::new(), None);
        let err = generate_tickets(&ctx, &[], None).await.unwrap_err();
        assert!(err.to_string().contains("no language model configured"));
    }
}
