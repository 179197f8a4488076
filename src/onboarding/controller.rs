//! WizardController: coordinates the draft, the validator, the state machine,
//! and the submission gateway for one wizard instance.

use std::ops::Range;
use std::sync::Arc;

use serde::Serialize;

use super::draft::{Draft, FileHandle, Value};
use super::registry::{FieldKind, Role, WizardDefinition, definition};
use super::render::{StepView, render};
use super::state::WizardState;
use super::validator::{Validation, validate};
use crate::error::{ConfigError, WizardError};
use crate::submission::{SubmissionGateway, SubmissionRequest, SubmissionResult};

/// Called once a wizard has been submitted successfully. In the app this
/// sends the user to the dashboard.
pub trait CompletionHook: Send + Sync {
    fn onboarding_complete(&self, role: Role, result: &SubmissionResult);
}

/// Whether an edit reached the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditOutcome {
    Applied,
    /// The wizard is submitting or finished; edits are dropped silently.
    Ignored,
}

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Moved { step: usize },
    /// The step being left failed validation.
    Rejected { reason: String },
    Submitted { result: SubmissionResult },
    SubmissionFailed { reason: String },
    /// Not applicable in the current phase (e.g. a second Next while
    /// submitting, Back on the first step).
    Ignored,
}

/// First half of a Next request. `Submit` means the state is now
/// `Submitting` and the caller must run the request through the gateway and
/// hand the result to `finish_submission`.
#[derive(Debug)]
pub enum NextAction {
    Done(Outcome),
    Submit(SubmissionRequest),
}

/// Drives one wizard instance.
pub struct WizardController {
    definition: Arc<WizardDefinition>,
    draft: Draft,
    state: WizardState,
    gateway: Arc<dyn SubmissionGateway>,
    hook: Arc<dyn CompletionHook>,
}

impl WizardController {
    /// Start a wizard for `role` with a freshly seeded draft.
    pub fn new(
        role: Role,
        gateway: Arc<dyn SubmissionGateway>,
        hook: Arc<dyn CompletionHook>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::with_definition(definition(role)?, gateway, hook))
    }

    pub fn with_definition(
        definition: Arc<WizardDefinition>,
        gateway: Arc<dyn SubmissionGateway>,
        hook: Arc<dyn CompletionHook>,
    ) -> Self {
        tracing::info!(role = %definition.role, steps = definition.len(), "Starting onboarding wizard");
        Self {
            draft: Draft::seeded(&definition),
            state: WizardState::new(definition.len()),
            definition,
            gateway,
            hook,
        }
    }

    pub fn role(&self) -> Role {
        self.definition.role
    }

    pub fn definition(&self) -> &WizardDefinition {
        &self.definition
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn gateway(&self) -> Arc<dyn SubmissionGateway> {
        Arc::clone(&self.gateway)
    }

    /// View model for the current step.
    pub fn view(&self) -> StepView {
        render(&self.definition, &self.draft, &self.state)
    }

    /// Set a field value. The value must fit the field's kind and, for
    /// select kinds, be one of its options (an empty selection clears it).
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<EditOutcome, WizardError> {
        if !self.state.is_editing() {
            tracing::debug!(field = name, phase = %self.state.phase, "Ignoring edit");
            return Ok(EditOutcome::Ignored);
        }
        let value = value.into();
        self.check_value(name, &value)?;
        self.draft.set(name, value);
        Ok(EditOutcome::Applied)
    }

    /// Attach a file, replacing any earlier one for the field.
    pub fn set_file(&mut self, name: &str, handle: FileHandle) -> Result<EditOutcome, WizardError> {
        self.set(name, Value::File(handle))
    }

    /// Only fields of the step being shown can be edited.
    fn check_value(&self, name: &str, value: &Value) -> Result<(), WizardError> {
        if self.definition.field(name).is_none() {
            return Err(WizardError::UnknownField(name.to_string()));
        }
        let spec = self
            .definition
            .step(self.state.step)
            .and_then(|step| step.field_spec(name))
            .ok_or_else(|| WizardError::NotOnStep {
                field: name.to_string(),
                step: self.state.step,
            })?;

        if !value.fits(spec.kind) {
            return Err(WizardError::KindMismatch {
                field: name.to_string(),
                expected: expected_shape(spec.kind),
            });
        }

        let invalid = |v: &str| WizardError::InvalidOption {
            field: name.to_string(),
            value: v.to_string(),
        };
        match value {
            Value::Text(s) if spec.kind == FieldKind::Select => {
                if !s.is_empty() && !spec.options.contains(s) {
                    return Err(invalid(s));
                }
            }
            Value::List(items) => {
                if let Some(bad) = items.iter().find(|i| !spec.options.contains(i)) {
                    return Err(invalid(bad));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// `Editing(i) → Editing(i-1)`. Never validates and never touches the draft.
    pub fn back(&mut self) -> Outcome {
        if !self.state.is_editing() {
            return Outcome::Ignored;
        }
        self.state = self.state.cleared();
        match self.state.back() {
            Ok(next) => {
                self.state = next;
                tracing::debug!(role = %self.role(), step = self.state.step, "Moved back");
                Outcome::Moved {
                    step: self.state.step,
                }
            }
            Err(_) => Outcome::Ignored,
        }
    }

    /// Pick a step from the step list. Forward moves validate every step from
    /// the current one up to the target and stop on the first that fails;
    /// backward moves do not validate.
    pub fn jump(&mut self, target: usize) -> Result<Outcome, WizardError> {
        if !self.state.is_editing() {
            return Ok(Outcome::Ignored);
        }
        self.state = self.state.cleared();
        if target == self.state.step {
            return Ok(Outcome::Moved { step: target });
        }
        if !self.state.can_jump_to(target) {
            return Err(WizardError::Unreachable {
                index: target,
                current: self.state.step,
            });
        }
        if target > self.state.step
            && let Some(outcome) = self.reject_steps(self.state.step..target)
        {
            return Ok(outcome);
        }
        self.state = self.state.jump(target)?;
        tracing::debug!(role = %self.role(), step = target, "Jumped to step");
        Ok(Outcome::Moved { step: target })
    }

    /// Validate the current step and either advance or, on the last step,
    /// re-validate the whole draft, enter `Submitting`, and hand back the
    /// request to send.
    pub fn begin_next(&mut self) -> NextAction {
        if !self.state.is_editing() {
            tracing::debug!(phase = %self.state.phase, "Ignoring Next");
            return NextAction::Done(Outcome::Ignored);
        }
        self.state = self.state.cleared();

        if let Some(outcome) = self.reject_current_step() {
            return NextAction::Done(outcome);
        }

        if !self.state.is_last_step() {
            return match self.state.advance() {
                Ok(next) => {
                    self.state = next;
                    tracing::info!(role = %self.role(), step = self.state.step, "Advanced to step");
                    NextAction::Done(Outcome::Moved {
                        step: self.state.step,
                    })
                }
                Err(e) => {
                    tracing::warn!("Failed to advance onboarding step: {}", e);
                    NextAction::Done(Outcome::Ignored)
                }
            };
        }

        if let Some(outcome) = self.reject_steps(0..self.state.step) {
            return NextAction::Done(outcome);
        }

        match self.state.begin_submission() {
            Ok(next) => {
                self.state = next;
                tracing::info!(role = %self.role(), "Final step validated, submitting");
                NextAction::Submit(SubmissionRequest {
                    role: self.role(),
                    endpoint: self.definition.endpoint.clone(),
                    fields: self.draft.snapshot(),
                })
            }
            Err(e) => {
                tracing::warn!("Failed to begin submission: {}", e);
                NextAction::Done(Outcome::Ignored)
            }
        }
    }

    /// Apply the gateway's answer to a submission started by `begin_next`.
    pub fn finish_submission(&mut self, result: SubmissionResult) -> Outcome {
        if !self.state.is_submitting() {
            tracing::warn!(phase = %self.state.phase, "Dropping submission result outside Submitting");
            return Outcome::Ignored;
        }

        if result.success {
            match self.state.complete() {
                Ok(next) => self.state = next,
                Err(e) => {
                    tracing::warn!("Failed to complete onboarding: {}", e);
                    return Outcome::Ignored;
                }
            }
            tracing::info!(role = %self.role(), id = ?result.id, "Onboarding submitted");
            self.draft = Draft::new();
            self.hook.onboarding_complete(self.role(), &result);
            return Outcome::Submitted { result };
        }

        let reason = result.error_message().to_string();
        match self.state.fail(&reason) {
            Ok(next) => self.state = next,
            Err(e) => {
                tracing::warn!("Failed to record submission failure: {}", e);
                return Outcome::Ignored;
            }
        }
        tracing::warn!(role = %self.role(), reason = %reason, "Onboarding submission failed");
        Outcome::SubmissionFailed { reason }
    }

    /// Next, including the submission round trip on the final step.
    pub async fn next(&mut self) -> Outcome {
        match self.begin_next() {
            NextAction::Done(outcome) => outcome,
            NextAction::Submit(request) => {
                let result = self.gateway.submit(request).await;
                self.finish_submission(result)
            }
        }
    }

    /// Validate the current step; on failure record the reason and return
    /// the rejection.
    fn reject_current_step(&mut self) -> Option<Outcome> {
        self.reject_steps(self.state.step..self.state.step + 1)
    }

    /// Validate `steps` in order. The first step that fails becomes the
    /// current step and carries the reason.
    fn reject_steps(&mut self, steps: Range<usize>) -> Option<Outcome> {
        let (index, reason) = steps.into_iter().find_map(|index| {
            let step = self.definition.step(index)?;
            match validate(step, &self.draft) {
                Validation::Ok => None,
                Validation::Failed { reason, .. } => Some((index, reason)),
            }
        })?;

        if index != self.state.step {
            match self.state.jump(index) {
                Ok(back) => self.state = back,
                Err(e) => tracing::warn!("Failed to return to step {}: {}", index, e),
            }
            tracing::info!(role = %self.role(), step = index, reason = %reason, "Returned to invalid step");
        }
        self.state = self.state.rejected(&reason);
        Some(Outcome::Rejected { reason })
    }
}

fn expected_shape(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text | FieldKind::Date | FieldKind::Numeric | FieldKind::Select => "text",
        FieldKind::MultiSelect => "list",
        FieldKind::Checkbox => "boolean",
        FieldKind::File => "file",
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::onboarding::draft::DraftSnapshot;

    /// Gateway that records calls and answers with a fixed result.
    struct StubGateway {
        calls: AtomicUsize,
        result: SubmissionResult,
        last: Mutex<Option<DraftSnapshot>>,
    }

    impl StubGateway {
        fn new(result: SubmissionResult) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                result,
                last: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl SubmissionGateway for StubGateway {
        async fn submit(&self, request: SubmissionRequest) -> SubmissionResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request.fields);
            self.result.clone()
        }
    }

    #[derive(Default)]
    struct CountingHook {
        calls: AtomicUsize,
    }

    impl CompletionHook for CountingHook {
        fn onboarding_complete(&self, _role: Role, _result: &SubmissionResult) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn controller(
        role: Role,
        result: SubmissionResult,
    ) -> (WizardController, Arc<StubGateway>, Arc<CountingHook>) {
        let gateway = StubGateway::new(result);
        let hook = Arc::new(CountingHook::default());
        let c = WizardController::new(role, gateway.clone(), hook.clone()).unwrap();
        (c, gateway, hook)
    }

    fn fill_doctor_through_bank(c: &mut WizardController) {
        for (name, value) in [
            ("fullName", "Dr. Ngozi Obi"),
            ("gender", "Female"),
            ("dob", "1980-02-02"),
            ("phone", "+2348011111111"),
            ("email", "ngozi@example.com"),
        ] {
            c.set(name, value).unwrap();
        }
        assert_eq!(c.begin_next_done(), Outcome::Moved { step: 1 });

        for (name, value) in [
            ("specialty", "Cardiology"),
            ("yearsOfExperience", "12"),
            ("qualifications", "MBBS"),
            ("licenseNumber", "MDCN-123"),
            ("issuingCouncil", "MDCN"),
            ("licenseCountry", "Nigeria"),
        ] {
            c.set(name, value).unwrap();
        }
        assert_eq!(c.begin_next_done(), Outcome::Moved { step: 2 });

        for name in ["govId", "licenseUpload", "passportPhoto"] {
            c.set_file(name, FileHandle::new(format!("/tmp/{name}"), name, 1, "application/pdf"))
                .unwrap();
        }
        assert_eq!(c.begin_next_done(), Outcome::Moved { step: 3 });
        assert_eq!(c.begin_next_done(), Outcome::Moved { step: 4 });

        for (name, value) in [
            ("bankAccountName", "Ngozi Obi"),
            ("bankAccountNumber", "0123456789"),
            ("bankName", "First Bank"),
            ("payoutFrequency", "Monthly"),
        ] {
            c.set(name, value).unwrap();
        }
        assert_eq!(c.begin_next_done(), Outcome::Moved { step: 5 });

        for (name, value) in [
            ("preferredLanguage", "English"),
            ("timeZone", "Africa/Lagos"),
            ("username", "drobi"),
            ("password", "s3cretpass"),
        ] {
            c.set(name, value).unwrap();
        }
        c.set("consent", true).unwrap();
    }

    impl WizardController {
        fn begin_next_done(&mut self) -> Outcome {
            match self.begin_next() {
                NextAction::Done(o) => o,
                NextAction::Submit(_) => panic!("unexpected submission"),
            }
        }
    }

    #[test]
    fn empty_patient_personal_step_is_rejected() {
        let (mut c, gateway, _) = controller(Role::Patient, SubmissionResult::succeeded(None, None));
        let outcome = c.begin_next_done();
        assert_eq!(
            outcome,
            Outcome::Rejected {
                reason: "Please fill all required personal info fields.".into()
            }
        );
        assert_eq!(c.state().step, 0);
        assert_eq!(
            c.state().error.as_deref(),
            Some("Please fill all required personal info fields.")
        );
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn back_skips_validation_and_keeps_draft() {
        let (mut c, _, _) = controller(Role::Doctor, SubmissionResult::succeeded(None, None));
        fill_doctor_through_bank(&mut c);
        assert_eq!(c.state().step, 5);

        // Make the current step invalid; Back must still work.
        c.set("consent", false).unwrap();
        let before = c.draft().snapshot();
        assert_eq!(c.back(), Outcome::Moved { step: 4 });
        assert_eq!(c.draft().snapshot(), before);
        assert!(c.state().error.is_none());
    }

    #[test]
    fn back_on_first_step_is_ignored() {
        let (mut c, _, _) = controller(Role::Patient, SubmissionResult::succeeded(None, None));
        assert_eq!(c.back(), Outcome::Ignored);
        assert_eq!(c.state().step, 0);
    }

    #[test]
    fn transition_attempt_clears_previous_error() {
        let (mut c, _, _) = controller(Role::Doctor, SubmissionResult::succeeded(None, None));
        c.begin_next_done();
        assert!(c.state().error.is_some());
        assert_eq!(c.back(), Outcome::Ignored);
        assert!(c.state().error.is_none());
    }

    #[test]
    fn set_checks_registry() {
        let (mut c, _, _) = controller(Role::Doctor, SubmissionResult::succeeded(None, None));
        assert_eq!(
            c.set("nope", "x").unwrap_err(),
            WizardError::UnknownField("nope".into())
        );
        assert!(matches!(
            c.set("profilePicture", "me.png").unwrap_err(),
            WizardError::KindMismatch { expected: "file", .. }
        ));
        assert!(matches!(
            c.set("gender", "Unknown").unwrap_err(),
            WizardError::InvalidOption { .. }
        ));
        assert_eq!(c.set("gender", "").unwrap(), EditOutcome::Applied);

        fill_doctor_through_bank(&mut c);
        assert!(matches!(
            c.set("consent", "yes").unwrap_err(),
            WizardError::KindMismatch { expected: "boolean", .. }
        ));
        assert!(matches!(
            c.set("notificationPreferences", vec!["Pager".to_string()]).unwrap_err(),
            WizardError::InvalidOption { value, .. } if value == "Pager"
        ));
        assert_eq!(
            c.set("notificationPreferences", vec!["SMS".to_string(), "App".to_string()])
                .unwrap(),
            EditOutcome::Applied
        );
    }

    #[tokio::test]
    async fn fields_of_other_steps_cannot_be_edited() {
        let (mut c, gateway, _) = controller(Role::Doctor, SubmissionResult::succeeded(None, None));
        assert_eq!(
            c.set("consent", true).unwrap_err(),
            WizardError::NotOnStep {
                field: "consent".into(),
                step: 0
            }
        );

        fill_doctor_through_bank(&mut c);
        assert_eq!(
            c.set("specialty", "").unwrap_err(),
            WizardError::NotOnStep {
                field: "specialty".into(),
                step: 5
            }
        );
        assert!(matches!(
            c.set_file("govId", FileHandle::new("/tmp/other", "other", 1, "application/pdf"))
                .unwrap_err(),
            WizardError::NotOnStep { step: 5, .. }
        ));
        assert_eq!(c.draft().get("specialty"), Some(&Value::text("Cardiology")));

        assert!(matches!(c.next().await, Outcome::Submitted { .. }));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn jumping_forward_stops_at_first_invalid_step() {
        let (mut c, gateway, _) = controller(Role::Doctor, SubmissionResult::succeeded(None, None));
        fill_doctor_through_bank(&mut c);

        assert_eq!(c.back(), Outcome::Moved { step: 4 });
        c.set("bankName", "").unwrap();
        assert_eq!(c.jump(0).unwrap(), Outcome::Moved { step: 0 });

        assert_eq!(
            c.jump(5).unwrap(),
            Outcome::Rejected {
                reason: "Please fill all required bank info fields.".into()
            }
        );
        assert_eq!(c.state().step, 4);
        assert_eq!(
            c.state().error.as_deref(),
            Some("Please fill all required bank info fields.")
        );

        // Next stays on the invalid step.
        assert!(matches!(c.next().await, Outcome::Rejected { .. }));
        assert_eq!(c.state().step, 4);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);

        c.set("bankName", "First Bank").unwrap();
        assert_eq!(c.jump(5).unwrap(), Outcome::Moved { step: 5 });
    }

    #[tokio::test]
    async fn finish_revalidates_earlier_steps() {
        let (mut c, gateway, hook) =
            controller(Role::Doctor, SubmissionResult::succeeded(None, None));
        fill_doctor_through_bank(&mut c);
        // Bypass the edit guard to corrupt an already-approved step.
        c.draft.set("specialty", "");

        assert_eq!(
            c.next().await,
            Outcome::Rejected {
                reason: "Please fill all required professional fields.".into()
            }
        );
        assert!(c.state().is_editing());
        assert_eq!(c.state().step, 1);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
        assert_eq!(hook.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn jump_rules() {
        let (mut c, _, _) = controller(Role::Doctor, SubmissionResult::succeeded(None, None));
        // Forward jump validates every step it passes over.
        assert!(matches!(c.jump(1).unwrap(), Outcome::Rejected { .. }));
        assert_eq!(c.state().step, 0);
        // Unvisited steps beyond the next one are unreachable.
        assert!(matches!(
            c.jump(3).unwrap_err(),
            WizardError::Unreachable { index: 3, current: 0 }
        ));

        fill_doctor_through_bank(&mut c);
        // Backward jumps skip validation.
        c.set("consent", false).unwrap();
        assert_eq!(c.jump(1).unwrap(), Outcome::Moved { step: 1 });

        // Leaving a now-invalid step forward is rejected even to a visited step.
        c.set("specialty", "").unwrap();
        assert!(matches!(c.jump(4).unwrap(), Outcome::Rejected { .. }));
        c.set("specialty", "Cardiology").unwrap();
        assert_eq!(c.jump(4).unwrap(), Outcome::Moved { step: 4 });
    }

    #[tokio::test]
    async fn successful_submission_notifies_once() {
        let (mut c, gateway, hook) = controller(
            Role::Doctor,
            SubmissionResult::succeeded(Some("doc-1".into()), None),
        );
        fill_doctor_through_bank(&mut c);

        let outcome = c.next().await;
        assert!(matches!(outcome, Outcome::Submitted { ref result } if result.id.as_deref() == Some("doc-1")));
        assert!(c.state().is_submitted());
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        assert_eq!(hook.calls.load(Ordering::SeqCst), 1);

        let sent = gateway.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent["licenseNumber"], Value::text("MDCN-123"));

        // Terminal: nothing else happens.
        assert_eq!(c.next().await, Outcome::Ignored);
        assert_eq!(c.back(), Outcome::Ignored);
        assert_eq!(c.set("fullName", "x").unwrap(), EditOutcome::Ignored);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        assert_eq!(hook.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_submission_returns_to_last_step_with_draft() {
        let (mut c, gateway, hook) =
            controller(Role::Doctor, SubmissionResult::failed("DB unavailable"));
        fill_doctor_through_bank(&mut c);
        let before = c.draft().snapshot();

        let outcome = c.next().await;
        assert_eq!(
            outcome,
            Outcome::SubmissionFailed {
                reason: "DB unavailable".into()
            }
        );
        assert!(c.state().is_editing());
        assert_eq!(c.state().step, 5);
        assert_eq!(c.state().error.as_deref(), Some("DB unavailable"));
        assert_eq!(c.draft().snapshot(), before);
        assert_eq!(hook.calls.load(Ordering::SeqCst), 0);

        // Manual retry is allowed.
        c.next().await;
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn second_next_while_submitting_is_ignored() {
        let (mut c, gateway, _) = controller(Role::Doctor, SubmissionResult::succeeded(None, None));
        fill_doctor_through_bank(&mut c);

        let request = match c.begin_next() {
            NextAction::Submit(r) => r,
            NextAction::Done(o) => panic!("expected submission, got {o:?}"),
        };
        assert!(c.state().is_submitting());

        assert!(matches!(c.begin_next(), NextAction::Done(Outcome::Ignored)));
        assert_eq!(c.back(), Outcome::Ignored);
        assert_eq!(c.jump(0).unwrap(), Outcome::Ignored);
        assert_eq!(c.set("fullName", "changed").unwrap(), EditOutcome::Ignored);
        assert_eq!(c.draft().get("fullName"), Some(&Value::text("Dr. Ngozi Obi")));

        assert_eq!(request.endpoint, "/api/doctors/onboarding");
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
        let outcome = c.finish_submission(SubmissionResult::succeeded(None, None));
        assert!(matches!(outcome, Outcome::Submitted { .. }));
    }

    #[test]
    fn stray_submission_result_is_dropped() {
        let (mut c, _, hook) = controller(Role::Patient, SubmissionResult::succeeded(None, None));
        assert_eq!(
            c.finish_submission(SubmissionResult::succeeded(None, None)),
            Outcome::Ignored
        );
        assert!(c.state().is_editing());
        assert_eq!(hook.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn view_reflects_state() {
        let (mut c, _, _) = controller(Role::Patient, SubmissionResult::succeeded(None, None));
        c.begin_next_done();
        let view = c.view();
        assert_eq!(view.label, "Personal Info");
        assert_eq!(
            view.error.as_deref(),
            Some("Please fill all required personal info fields.")
        );
    }
}
