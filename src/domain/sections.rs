//! Splits labelled free text ("Title: ...", "Description: ...") into ticket
//! fields.

use crate::domain::ticket::TicketFields;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Title,
    Epic,
    Description,
    Blockers,
    AcceptanceCriteria,
}

const MARKERS: [(&str, Section); 6] = [
    ("Title:", Section::Title),
    ("Epic:", Section::Epic),
    ("Description:", Section::Description),
    ("Blockers:", Section::Blockers),
    ("Blocker:", Section::Blockers),
    ("Acceptance Criteria:", Section::AcceptanceCriteria),
];

/// Returns the section a line opens, plus the text after the marker.
fn match_marker(line: &str) -> Option<(Section, &str)> {
    MARKERS.iter().find_map(|(marker, section)| {
        let prefix = line.get(..marker.len())?;
        prefix
            .eq_ignore_ascii_case(marker)
            .then(|| (*section, &line[marker.len()..]))
    })
}

/// Extracts ticket fields from a labelled text block.
///
/// A marker line sets the section value to the text after the marker;
/// following lines without a marker are appended to it. Sections that never
/// appear stay empty.
pub fn extract_sections(text: &str) -> TicketFields {
    let mut fields = TicketFields::default();
    let mut current: Option<Section> = None;

    for line in text.lines() {
        if let Some((section, rest)) = match_marker(line) {
            current = Some(section);
            *slot(&mut fields, section) = rest.trim().to_string();
            continue;
        }

        let Some(section) = current else {
            continue;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value = slot(&mut fields, section);
        if !value.is_empty() {
            value.push('\n');
        }
        value.push_str(line);
    }

    fields
}

fn slot(fields: &mut TicketFields, section: Section) -> &mut String {
    match section {
        Section::Title => &mut fields.title,
        Section::Epic => &mut fields.epic,
        Section::Description => &mut fields.description,
        Section::Blockers => &mut fields.blockers,
        Section::AcceptanceCriteria => &mut fields.acceptance_criteria,
    }
}
