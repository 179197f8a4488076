//! Render selector: turns (step index, registry, draft) into the view model
//! a front end paints. Pure; recomputed after every edit or transition.

use serde::Serialize;

use super::draft::{Draft, Value};
use super::registry::{FieldSpec, WizardDefinition};
use super::review::{ReviewSection, summarize};
use super::state::WizardState;

/// A field together with what it currently holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    #[serde(flatten)]
    pub spec: FieldSpec,
    /// Current value, or the kind's empty value. `None` only for files with
    /// nothing attached.
    pub value: Option<Value>,
}

/// Entry of the step list shown beside the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepLink {
    pub index: usize,
    pub label: String,
    pub active: bool,
    pub reachable: bool,
}

/// Everything needed to paint the current step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    pub title: String,
    pub index: usize,
    pub label: String,
    pub heading: String,
    pub fields: Vec<FieldView>,
    pub steps: Vec<StepLink>,
    pub can_go_back: bool,
    /// Label of the forward button: "Next", "Finish", or "Saving...".
    pub next_label: &'static str,
    /// Shows the indeterminate progress bar; all controls are disabled.
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<Vec<ReviewSection>>,
}

/// Fields of one step with their current values. Out-of-range indices
/// yield `None`.
pub fn select_view(
    step_index: usize,
    definition: &WizardDefinition,
    draft: &Draft,
) -> Option<Vec<FieldView>> {
    let step = definition.step(step_index)?;
    Some(
        step.fields
            .iter()
            .map(|spec| FieldView {
                value: draft
                    .get(&spec.name)
                    .cloned()
                    .or_else(|| Value::empty_for(spec.kind)),
                spec: spec.clone(),
            })
            .collect(),
    )
}

/// Full view model for the state's current step.
pub fn render(definition: &WizardDefinition, draft: &Draft, state: &WizardState) -> StepView {
    let index = state.step.min(definition.last_index());
    let fields = select_view(index, definition, draft).unwrap_or_default();
    let (label, heading) = definition
        .step(index)
        .map(|s| (s.label.clone(), s.title.clone()))
        .unwrap_or_default();

    let steps = definition
        .steps
        .iter()
        .map(|s| StepLink {
            index: s.index,
            label: s.label.clone(),
            active: s.index == index,
            reachable: state.can_jump_to(s.index) || (state.is_editing() && s.index == index),
        })
        .collect();

    let is_last = index == definition.last_index();
    let next_label = if state.is_submitting() {
        "Saving..."
    } else if is_last {
        "Finish"
    } else {
        "Next"
    };

    StepView {
        title: definition.title.clone(),
        index,
        label,
        heading,
        fields,
        steps,
        can_go_back: state.is_editing() && index > 0,
        next_label,
        busy: state.is_submitting(),
        error: state.error.clone(),
        review: is_last.then(|| summarize(definition, draft)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::draft::FileHandle;
    use crate::onboarding::registry::{FieldKind, Role, definition};

    #[test]
    fn absent_values_render_as_empty() {
        let def = definition(Role::Patient).unwrap();
        let fields = select_view(0, &def, &Draft::new()).unwrap();
        assert_eq!(fields.len(), 11);
        assert_eq!(fields[0].spec.name, "firstName");
        assert_eq!(fields[0].value, Some(Value::text("")));

        let consent = select_view(7, &def, &Draft::new()).unwrap();
        assert!(consent.iter().all(|f| f.value == Some(Value::Bool(false))));

        let docs = select_view(8, &def, &Draft::new()).unwrap();
        assert!(docs.iter().all(|f| f.spec.kind == FieldKind::File && f.value.is_none()));
    }

    #[test]
    fn current_values_are_shown() {
        let def = definition(Role::Doctor).unwrap();
        let mut draft = Draft::new();
        draft.set("fullName", "Dr. Obi");
        let photo = FileHandle::new("/tmp/me.png", "me.png", 10, "image/png");
        draft.set_file("profilePicture", photo.clone());

        let fields = select_view(0, &def, &draft).unwrap();
        assert!(fields[0].value.as_ref().unwrap().as_file().unwrap().ptr_eq(&photo));
        assert_eq!(fields[1].value, Some(Value::text("Dr. Obi")));
    }

    #[test]
    fn out_of_range_step() {
        let def = definition(Role::Doctor).unwrap();
        assert!(select_view(6, &def, &Draft::new()).is_none());
    }

    #[test]
    fn render_marks_active_and_reachable_steps() {
        let def = definition(Role::Doctor).unwrap();
        let state = WizardState::new(def.len());
        let view = render(&def, &Draft::new(), &state);

        assert_eq!(view.label, "Personal Info");
        assert_eq!(view.next_label, "Next");
        assert!(!view.can_go_back);
        assert!(view.review.is_none());
        let reachable: Vec<usize> = view
            .steps
            .iter()
            .filter(|s| s.reachable)
            .map(|s| s.index)
            .collect();
        assert_eq!(reachable, [0, 1]);
        assert!(view.steps[0].active);
    }

    #[test]
    fn render_final_step_and_busy() {
        let def = definition(Role::Doctor).unwrap();
        let mut state = WizardState::new(def.len());
        for _ in 0..def.last_index() {
            state = state.advance().unwrap();
        }
        let view = render(&def, &Draft::new(), &state);
        assert_eq!(view.next_label, "Finish");
        assert!(view.review.is_some());

        let submitting = state.begin_submission().unwrap();
        let view = render(&def, &Draft::new(), &submitting);
        assert!(view.busy);
        assert_eq!(view.next_label, "Saving...");
        assert!(!view.can_go_back);
        assert!(view.steps.iter().all(|s| !s.reachable));
    }
}
