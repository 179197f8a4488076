//! Read-only summary of everything entered, shown on the final step.

use serde::Serialize;

use super::draft::{Draft, Value};
use super::registry::WizardDefinition;

const MASK: &str = "********";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewEntry {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSection {
    pub title: String,
    pub entries: Vec<ReviewEntry>,
}

/// One section per step before the last, listing its non-empty answers.
/// Sections with nothing filled in are left out.
pub fn summarize(definition: &WizardDefinition, draft: &Draft) -> Vec<ReviewSection> {
    let last = definition.last_index();
    definition
        .steps
        .iter()
        .filter(|step| step.index < last)
        .filter_map(|step| {
            let entries: Vec<ReviewEntry> = step
                .fields
                .iter()
                .filter_map(|field| {
                    let value = draft.get(&field.name)?;
                    if value.is_blank() {
                        return None;
                    }
                    let shown = if field.masked {
                        MASK.to_string()
                    } else {
                        display(value)
                    };
                    Some(ReviewEntry {
                        label: field.label.clone(),
                        value: shown,
                    })
                })
                .collect();
            (!entries.is_empty()).then(|| ReviewSection {
                title: step.label.clone(),
                entries,
            })
        })
        .collect()
}

fn display(value: &Value) -> String {
    match value {
        Value::Text(s) => s.clone(),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::List(items) => items.join(", "),
        Value::File(f) => f.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::draft::FileHandle;
    use crate::onboarding::registry::{Role, definition};

    #[test]
    fn empty_draft_has_no_sections() {
        let def = definition(Role::Patient).unwrap();
        assert!(summarize(&def, &Draft::seeded(&def)).is_empty());
    }

    #[test]
    fn masks_secrets_and_formats_values() {
        let def = definition(Role::Patient).unwrap();
        let mut draft = Draft::seeded(&def);
        draft.set("firstName", "Ada");
        draft.set("password", "abcdefgh");
        draft.set("terms", true);
        draft.set_file("govId", FileHandle::new("/tmp/id.pdf", "id.pdf", 3, "application/pdf"));
        draft.set("reviewConfirm", true);

        let sections = summarize(&def, &draft);
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Personal Info", "Account Credentials", "Consent & Agreements", "Documents Upload"]
        );

        assert_eq!(sections[0].entries[0].value, "Ada");
        assert_eq!(sections[1].entries[0].label, "Password");
        assert_eq!(sections[1].entries[0].value, "********");
        assert_eq!(sections[2].entries[0].value, "Yes");
        assert_eq!(sections[3].entries[0].value, "id.pdf");
    }

    #[test]
    fn lists_are_comma_joined() {
        let def = definition(Role::Doctor).unwrap();
        let mut draft = Draft::new();
        draft.set("employer", "General Hospital");
        let sections = summarize(&def, &draft);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Schedule Availability");
        assert_eq!(display(&Value::List(vec!["SMS".into(), "App".into()])), "SMS, App");
    }
}
