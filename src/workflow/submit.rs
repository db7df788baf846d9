use crate::context::AppContext;
use crate::domain::ticket::{TicketDraft, TicketFields};
use crate::workflow::report::Outcome;

/// Whether a ticket must belong to a known epic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpicPolicy {
    /// The epic must be present and known; anything else skips the ticket.
    Required,
    /// No epic means no parent; an unknown epic still skips the ticket.
    Optional,
}

/// Resolves the parent issue and creates the ticket. Tracker failures are
/// turned into a failed outcome so the caller can move on.
pub async fn submit_ticket(ctx: &AppContext, fields: &TicketFields, policy: EpicPolicy) -> Outcome {
    if fields.title.trim().is_empty() {
        return Outcome::Skipped {
            reason: "no title found in the ticket text".to_string(),
        };
    }

    let parent_key = match (fields.epic(), policy) {
        (Some(epic), _) => match ctx.config.epics.parent_key(epic) {
            Some(key) => Some(key.to_string()),
            None => {
                return Outcome::Skipped {
                    reason: format!("no parent key found for epic '{epic}'"),
                };
            }
        },
        (None, EpicPolicy::Required) => {
            return Outcome::Skipped {
                reason: "no epic given, unable to find a parent key".to_string(),
            };
        }
        (None, EpicPolicy::Optional) => None,
    };

    let draft = TicketDraft::compose(
        fields,
        ctx.environment,
        &ctx.config.jira_labels,
        parent_key.as_deref(),
    );

    match ctx.issue_tracker.create_ticket(&draft).await {
        Ok(ticket) => Outcome::Created {
            key: ticket.key,
            url: ticket.url,
            parent_key,
        },
        Err(err) => Outcome::Failed {
            reason: err.to_string(),
        },
    }
}
