use tracing::debug;

use crate::context::AppContext;
use crate::domain::row::RowRecord;
use crate::domain::sections::extract_sections;
use crate::workflow::report::{Outcome, RunReport};
use crate::workflow::submit::{EpicPolicy, submit_ticket};

pub const APPLICATION_NAME: &str = "APPLICATION NAME";
pub const UPLOADED_TO_JIRA: &str = "Uploaded to Jira";
pub const STORY_COLUMNS: [&str; 5] = ["STORY 1", "STORY 2", "STORY 3", "STORY 4", "STORY 5"];

pub fn required_columns() -> Vec<&'static str> {
    let mut columns = vec![APPLICATION_NAME, UPLOADED_TO_JIRA];
    columns.extend(STORY_COLUMNS);
    columns
}

/// Creates one ticket per authored story, in row order.
pub async fn upload_stories(ctx: &AppContext, rows: &[RowRecord]) -> RunReport {
    let environment = ctx.environment;
    let mut report = RunReport::default();

    for row in rows {
        if environment.is_marked_uploaded(row.get(UPLOADED_TO_JIRA)) {
            report.record(
                row.number,
                format!("row {}", row.number),
                Outcome::Skipped {
                    reason: format!("already uploaded to Jira for the '{environment}' environment"),
                },
            );
            continue;
        }

        let Some(application) = row.get(APPLICATION_NAME) else {
            report.record(
                row.number,
                format!("row {}", row.number),
                Outcome::Skipped {
                    reason: format!("missing '{APPLICATION_NAME}'"),
                },
            );
            continue;
        };

        for column in STORY_COLUMNS {
            let Some(story) = row.get(column) else {
                continue;
            };
            let subject = format!("'{application}' {column} in '{environment}'");

            // A column named after the environment gates which rows apply there.
            if row.has_column(environment.as_str())
                && !row
                    .get(environment.as_str())
                    .is_some_and(|cell| cell.contains(environment.as_str()))
            {
                report.record(
                    row.number,
                    subject,
                    Outcome::Skipped {
                        reason: format!("not scheduled for the '{environment}' environment"),
                    },
                );
                continue;
            }

            let fields = extract_sections(story);
            debug!(row = row.number, column, title = %fields.title, "parsed story");
            let outcome = submit_ticket(ctx, &fields, EpicPolicy::Required).await;
            report.record(row.number, subject, outcome);
        }
    }

    report
}
