use crate::domain::environment::Environment;

/// Fields pulled out of a labelled story or a generated draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFields {
    pub title: String,
    pub epic: String,
    pub description: String,
    pub blockers: String,
    pub acceptance_criteria: String,
}

impl TicketFields {
    pub fn epic(&self) -> Option<&str> {
        let epic = self.epic.trim();
        (!epic.is_empty()).then_some(epic)
    }
}

/// Everything the issue tracker needs to create one ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    pub summary: String,
    pub description: String,
    pub labels: Vec<String>,
    pub parent_key: Option<String>,
}

impl TicketDraft {
    pub fn compose(
        fields: &TicketFields,
        environment: Environment,
        base_labels: &[String],
        parent_key: Option<&str>,
    ) -> Self {
        let mut sections = Vec::with_capacity(4);
        if let Some(epic) = fields.epic() {
            sections.push(format!("Epic: {epic}"));
        }
        sections.push(format!("Description: {}", fields.description));
        sections.push(format!("Blockers: {}", fields.blockers));
        sections.push(format!(
            "Acceptance Criteria: {}",
            fields.acceptance_criteria
        ));

        let mut labels = base_labels.to_vec();
        let env_label = environment.as_str().to_string();
        if !labels.contains(&env_label) {
            labels.push(env_label);
        }

        Self {
            summary: format!("[{environment}] {}", fields.title.trim()),
            description: sections.join("\n\n"),
            labels,
            parent_key: parent_key.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ticket {
    pub key: String,
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> TicketFields {
        TicketFields {
            title: "Rotate credentials".to_string(),
            epic: "AWS Native Secret Manager solution".to_string(),
            description: "Move secrets.".to_string(),
            blockers: "None".to_string(),
            acceptance_criteria: "Secrets load at startup.".to_string(),
        }
    }

    #[test]
    fn composes_summary_description_and_labels() {
        let labels = vec!["TechTeam".to_string(), "DevOps".to_string()];
        let draft = TicketDraft::compose(&fields(), Environment::Qa, &labels, Some("AI-367"));

        assert_eq!(draft.summary, "[QA] Rotate credentials");
        assert_eq!(
            draft.description,
            "Epic: AWS Native Secret Manager solution\n\n\
             Description: Move secrets.\n\n\
             Blockers: None\n\n\
             Acceptance Criteria: Secrets load at startup."
        );
        assert_eq!(draft.labels, vec!["TechTeam", "DevOps", "QA"]);
        assert_eq!(draft.parent_key.as_deref(), Some("AI-367"));
    }

    #[test]
    fn omits_epic_paragraph_without_epic() {
        let mut fields = fields();
        fields.epic.clear();
        let draft = TicketDraft::compose(&fields, Environment::Dev, &["DEV".to_string()], None);

        assert!(draft.description.starts_with("Description: Move secrets."));
        assert_eq!(draft.labels, vec!["DEV"]);
        assert_eq!(draft.parent_key, None);
    }
}
