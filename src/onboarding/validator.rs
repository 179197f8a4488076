//! Step validator: runs a step's declarative rules against the draft.
//!
//! Rules are evaluated in a fixed order (required, equality, all-checked)
//! regardless of declaration order, and the first violation wins.

use serde::Serialize;

use super::draft::{Draft, Value};
use super::registry::{Rule, Step};

/// Which kind of rule rejected the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    Missing,
    Mismatch,
    Unchecked,
}

/// Outcome of validating a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Validation {
    Ok,
    Failed { violation: Violation, reason: String },
}

impl Validation {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Ok => None,
            Self::Failed { reason, .. } => Some(reason),
        }
    }

    fn failed(violation: Violation, reason: &str) -> Self {
        Self::Failed {
            violation,
            reason: reason.to_string(),
        }
    }
}

/// Validate one step against the current draft.
pub fn validate(step: &Step, draft: &Draft) -> Validation {
    let mut rules: Vec<&Rule> = step.rules.iter().collect();
    rules.sort_by_key(|r| r.rank());

    for rule in rules {
        if let Some(failure) = check_rule(step, rule, draft) {
            tracing::debug!(
                step = step.index,
                label = %step.label,
                reason = failure.reason().unwrap_or_default(),
                "Step validation failed"
            );
            return failure;
        }
    }
    Validation::Ok
}

fn check_rule(step: &Step, rule: &Rule, draft: &Draft) -> Option<Validation> {
    match rule {
        Rule::Required { message } => {
            let missing = step
                .required_fields()
                .any(|f| draft.get(&f.name).is_none_or(Value::is_blank));
            missing.then(|| Validation::failed(Violation::Missing, message))
        }
        Rule::Equal {
            left,
            right,
            message,
        } => {
            let l = draft.get(left).and_then(Value::as_text);
            let r = draft.get(right).and_then(Value::as_text);
            (l != r).then(|| Validation::failed(Violation::Mismatch, message))
        }
        Rule::AllChecked { fields, message } => {
            let all = fields
                .iter()
                .all(|f| draft.get(f).and_then(Value::as_bool) == Some(true));
            (!all).then(|| Validation::failed(Violation::Unchecked, message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::draft::FileHandle;
    use crate::onboarding::registry::{FieldSpec, Role, definition};

    fn patient_step(index: usize) -> Step {
        definition(Role::Patient).unwrap().steps[index].clone()
    }

    fn doctor_step(index: usize) -> Step {
        definition(Role::Doctor).unwrap().steps[index].clone()
    }

    fn fill_personal(draft: &mut Draft) {
        for (name, value) in [
            ("firstName", "Ada"),
            ("lastName", "Obi"),
            ("gender", "Female"),
            ("dob", "1990-04-01"),
            ("phone", "+2348000000000"),
            ("email", "ada@example.com"),
            ("address", "1 Marina Rd"),
            ("nationality", "Nigerian"),
            ("stateOfOrigin", "Lagos"),
            ("maritalStatus", "Single"),
        ] {
            draft.set(name, value);
        }
    }

    #[test]
    fn empty_personal_step_fails_with_missing() {
        let result = validate(&patient_step(0), &Draft::new());
        assert_eq!(
            result,
            Validation::Failed {
                violation: Violation::Missing,
                reason: "Please fill all required personal info fields.".into()
            }
        );
    }

    #[test]
    fn required_rule_ignores_optional_fields() {
        let step = patient_step(0);
        let mut draft = Draft::new();
        fill_personal(&mut draft);
        assert!(validate(&step, &draft).is_ok());

        draft.set("middleName", "");
        assert!(validate(&step, &draft).is_ok());
        draft.set("middleName", "Chioma");
        assert!(validate(&step, &draft).is_ok());
    }

    #[test]
    fn any_single_missing_required_field_fails() {
        let step = patient_step(0);
        for field in step.required_fields() {
            let mut draft = Draft::new();
            fill_personal(&mut draft);
            draft.set(&field.name, "");
            let result = validate(&step, &draft);
            assert!(
                matches!(result, Validation::Failed { violation: Violation::Missing, .. }),
                "blank {} should fail",
                field.name
            );

            draft.remove(&field.name);
            assert!(!validate(&step, &draft).is_ok(), "absent {} should fail", field.name);
        }
    }

    #[test]
    fn password_mismatch_is_distinct() {
        let step = patient_step(1);
        let mut draft = Draft::new();
        draft.set("username", "ada");
        draft.set("password", "abcdefgh");
        draft.set("confirmPassword", "abcdefgi");

        let result = validate(&step, &draft);
        assert_eq!(
            result,
            Validation::Failed {
                violation: Violation::Mismatch,
                reason: "Passwords do not match.".into()
            }
        );

        draft.set("confirmPassword", "abcdefgh");
        assert!(validate(&step, &draft).is_ok());
    }

    #[test]
    fn missing_wins_over_mismatch() {
        let step = patient_step(1);
        let mut draft = Draft::new();
        draft.set("password", "abcdefgh");
        draft.set("confirmPassword", "other");
        let result = validate(&step, &draft);
        assert_eq!(result.reason(), Some("Please fill all required account fields."));
    }

    #[test]
    fn declaration_order_does_not_change_evaluation_order() {
        let step = Step::new("Creds", "Creds")
            .field(FieldSpec::text("a", "A").required())
            .field(FieldSpec::text("b", "B"))
            .rule(Rule::equal("a", "b", "mismatch"))
            .rule(Rule::required("missing"));
        let result = validate(&step, &Draft::new());
        assert_eq!(result.reason(), Some("missing"));
    }

    #[test]
    fn consent_requires_every_box() {
        let step = patient_step(7);
        let consents = ["terms", "privacy", "dataConsent", "emergencyConsent"];
        let mut draft = Draft::new();
        for c in consents {
            draft.set(c, true);
        }
        assert!(validate(&step, &draft).is_ok());

        for c in consents {
            let mut flipped = draft.clone();
            flipped.set(c, false);
            assert_eq!(
                validate(&step, &flipped).reason(),
                Some("Please accept all consents and agreements.")
            );
        }
    }

    #[test]
    fn consent_rejects_non_boolean_truthy_values() {
        let step = patient_step(7);
        let mut draft = Draft::new();
        for c in ["terms", "privacy", "dataConsent"] {
            draft.set(c, true);
        }
        draft.set("emergencyConsent", "true");
        assert!(!validate(&step, &draft).is_ok());
    }

    #[test]
    fn steps_without_rules_always_pass() {
        let step = patient_step(3);
        assert!(step.rules.is_empty());
        assert!(validate(&step, &Draft::new()).is_ok());
    }

    #[test]
    fn required_file_fields() {
        let step = doctor_step(2);
        let mut draft = Draft::new();
        draft.set_file("govId", FileHandle::new("/a", "a.pdf", 1, "application/pdf"));
        draft.set_file("licenseUpload", FileHandle::new("/b", "b.pdf", 1, "application/pdf"));
        assert_eq!(
            validate(&step, &draft).reason(),
            Some("Please upload all required documents.")
        );

        draft.set_file("passportPhoto", FileHandle::new("/c", "c.png", 1, "image/png"));
        assert!(validate(&step, &draft).is_ok());
    }

    #[test]
    fn required_checkbox_false_counts_as_missing() {
        let step = doctor_step(5);
        let mut draft = Draft::new();
        for (name, value) in [
            ("preferredLanguage", "English"),
            ("timeZone", "Africa/Lagos"),
            ("username", "drobi"),
            ("password", "s3cretpass"),
        ] {
            draft.set(name, value);
        }
        draft.set("consent", false);
        assert_eq!(
            validate(&step, &draft).reason(),
            Some("Please complete all required fields and accept terms.")
        );

        draft.set("consent", true);
        assert!(validate(&step, &draft).is_ok());
    }
}
