//! Wizard state machine: which step is shown and whether a submission is
//! outstanding.
//!
//! `WizardState` is a value: every transition takes the current state and
//! returns the next one, leaving the caller to swap it in. Validation happens
//! before a transition is requested; the state only enforces which moves are
//! legal.

use serde::{Deserialize, Serialize};

use crate::error::WizardError;

/// The phases of a wizard instance.
///
/// `Editing` → `Submitting` → `Submitted`, with `Submitting` falling back to
/// `Editing` on a failed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardPhase {
    Editing,
    Submitting,
    Submitted,
}

impl WizardPhase {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: WizardPhase) -> bool {
        use WizardPhase::*;
        matches!(
            (self, target),
            (Editing, Editing)
                | (Editing, Submitting)
                | (Submitting, Editing)
                | (Submitting, Submitted)
        )
    }

    /// Whether this phase is terminal (onboarding is done).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Submitted)
    }
}

impl Default for WizardPhase {
    fn default() -> Self {
        Self::Editing
    }
}

impl std::fmt::Display for WizardPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Editing => "editing",
            Self::Submitting => "submitting",
            Self::Submitted => "submitted",
        };
        write!(f, "{s}")
    }
}

/// Snapshot of where a wizard instance stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    pub phase: WizardPhase,
    /// Current step index, always `< step_count`.
    pub step: usize,
    pub step_count: usize,
    /// Highest step index reached so far.
    pub furthest: usize,
    /// Message from the last rejected transition or failed submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WizardState {
    /// Initial state: editing the first step.
    pub fn new(step_count: usize) -> Self {
        Self {
            phase: WizardPhase::Editing,
            step: 0,
            step_count: step_count.max(1),
            furthest: 0,
            error: None,
        }
    }

    pub fn last_index(&self) -> usize {
        self.step_count - 1
    }

    pub fn is_last_step(&self) -> bool {
        self.step == self.last_index()
    }

    pub fn is_editing(&self) -> bool {
        self.phase == WizardPhase::Editing
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == WizardPhase::Submitting
    }

    pub fn is_submitted(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Whether `target` can be picked from the step list: an index already
    /// visited, or the one right after the current step.
    pub fn can_jump_to(&self, target: usize) -> bool {
        self.is_editing() && target < self.step_count && (target <= self.furthest || target == self.step + 1)
    }

    /// Same state with the transient error cleared.
    pub fn cleared(&self) -> Self {
        Self {
            error: None,
            ..self.clone()
        }
    }

    /// Same state carrying a rejection message.
    pub fn rejected(&self, reason: &str) -> Self {
        Self {
            error: Some(reason.to_string()),
            ..self.clone()
        }
    }

    /// `Editing(i) → Editing(i-1)`.
    pub fn back(&self) -> Result<Self, WizardError> {
        self.require(WizardPhase::Editing, WizardPhase::Editing, "go back")?;
        if self.step == 0 {
            return Err(WizardError::Unreachable {
                index: 0,
                current: 0,
            });
        }
        Ok(self.moved_to(self.step - 1))
    }

    /// `Editing(i) → Editing(i+1)` for a non-final step.
    pub fn advance(&self) -> Result<Self, WizardError> {
        self.require(WizardPhase::Editing, WizardPhase::Editing, "advance")?;
        if self.is_last_step() {
            return Err(WizardError::Unreachable {
                index: self.step + 1,
                current: self.step,
            });
        }
        Ok(self.moved_to(self.step + 1))
    }

    /// Move to an arbitrary reachable step.
    pub fn jump(&self, target: usize) -> Result<Self, WizardError> {
        self.require(WizardPhase::Editing, WizardPhase::Editing, "jump")?;
        if !self.can_jump_to(target) {
            return Err(WizardError::Unreachable {
                index: target,
                current: self.step,
            });
        }
        Ok(self.moved_to(target))
    }

    /// `Editing(last) → Submitting`.
    pub fn begin_submission(&self) -> Result<Self, WizardError> {
        self.require(WizardPhase::Editing, WizardPhase::Submitting, "submit")?;
        if !self.is_last_step() {
            return Err(WizardError::InvalidTransition {
                action: format!("submit from step {}", self.step),
                phase: self.phase.to_string(),
            });
        }
        Ok(Self {
            phase: WizardPhase::Submitting,
            error: None,
            ..self.clone()
        })
    }

    /// `Submitting → Submitted`.
    pub fn complete(&self) -> Result<Self, WizardError> {
        self.require(WizardPhase::Submitting, WizardPhase::Submitted, "complete")?;
        Ok(Self {
            phase: WizardPhase::Submitted,
            error: None,
            ..self.clone()
        })
    }

    /// `Submitting → Editing(last)` with the failure reason.
    pub fn fail(&self, reason: &str) -> Result<Self, WizardError> {
        self.require(WizardPhase::Submitting, WizardPhase::Editing, "fail")?;
        Ok(Self {
            phase: WizardPhase::Editing,
            step: self.last_index(),
            error: Some(reason.to_string()),
            ..self.clone()
        })
    }

    fn moved_to(&self, step: usize) -> Self {
        Self {
            step,
            furthest: self.furthest.max(step),
            error: None,
            ..self.clone()
        }
    }

    /// The move must start in `from` and the phase table must allow
    /// `from → to`.
    fn require(&self, from: WizardPhase, to: WizardPhase, action: &str) -> Result<(), WizardError> {
        if self.phase != from || !from.can_transition_to(to) {
            return Err(WizardError::InvalidTransition {
                action: action.to_string(),
                phase: self.phase.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_phase_transitions() {
        use WizardPhase::*;
        let transitions = [
            (Editing, Editing),
            (Editing, Submitting),
            (Submitting, Editing),
            (Submitting, Submitted),
        ];
        for (from, to) in transitions {
            assert!(from.can_transition_to(to), "{from} should transition to {to}");
        }
    }

    #[test]
    fn invalid_phase_transitions() {
        use WizardPhase::*;
        assert!(!Editing.can_transition_to(Submitted));
        assert!(!Submitting.can_transition_to(Submitting));
        assert!(!Submitted.can_transition_to(Editing));
        assert!(!Submitted.can_transition_to(Submitting));
    }

    #[test]
    fn display_matches_serde() {
        use WizardPhase::*;
        for phase in [Editing, Submitting, Submitted] {
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(format!("\"{phase}\""), json);
        }
    }

    #[test]
    fn advance_walks_to_last_step() {
        let mut state = WizardState::new(4);
        for expected in 1..4 {
            state = state.advance().unwrap();
            assert_eq!(state.step, expected);
            assert_eq!(state.furthest, expected);
        }
        assert!(state.is_last_step());
        assert!(state.advance().is_err());
    }

    #[test]
    fn back_is_bounded_at_zero() {
        let state = WizardState::new(3);
        assert!(state.back().is_err());

        let state = state.advance().unwrap().back().unwrap();
        assert_eq!(state.step, 0);
        assert_eq!(state.furthest, 1);
    }

    #[test]
    fn transitions_clear_error() {
        let state = WizardState::new(3).rejected("nope");
        assert_eq!(state.error.as_deref(), Some("nope"));
        assert!(state.advance().unwrap().error.is_none());
        assert!(state.cleared().error.is_none());
    }

    #[test]
    fn jump_targets() {
        let state = WizardState::new(5).advance().unwrap().advance().unwrap();
        let state = state.back().unwrap().back().unwrap();
        assert_eq!(state.step, 0);
        assert_eq!(state.furthest, 2);

        assert!(state.can_jump_to(1));
        assert!(state.can_jump_to(2));
        assert!(!state.can_jump_to(3));
        assert!(!state.can_jump_to(9));

        let state = state.jump(2).unwrap();
        assert_eq!(state.step, 2);
        assert!(state.can_jump_to(3));
        assert!(state.jump(4).is_err());
    }

    #[test]
    fn submission_round_trip() {
        let mut state = WizardState::new(2);
        assert!(state.begin_submission().is_err(), "only from the last step");

        state = state.advance().unwrap().begin_submission().unwrap();
        assert!(state.is_submitting());
        assert!(state.back().is_err());
        assert!(state.advance().is_err());
        assert!(state.jump(0).is_err());
        assert!(!state.can_jump_to(0));

        let failed = state.fail("DB unavailable").unwrap();
        assert!(failed.is_editing());
        assert_eq!(failed.step, 1);
        assert_eq!(failed.error.as_deref(), Some("DB unavailable"));

        let done = failed.begin_submission().unwrap().complete().unwrap();
        assert!(done.is_submitted());
        assert!(done.begin_submission().is_err());
        assert!(done.fail("late").is_err());
    }

    #[test]
    fn transitions_outside_their_phase_are_rejected() {
        let editing = WizardState::new(2).advance().unwrap();
        assert!(matches!(
            editing.complete().unwrap_err(),
            WizardError::InvalidTransition { ref action, ref phase } if action == "complete" && phase == "editing"
        ));
        assert!(editing.fail("nope").is_err());

        let submitting = editing.begin_submission().unwrap();
        assert!(submitting.begin_submission().is_err());
        assert!(matches!(
            submitting.back().unwrap_err(),
            WizardError::InvalidTransition { ref phase, .. } if phase == "submitting"
        ));
    }

    #[test]
    fn state_serde_roundtrip() {
        let state = WizardState::new(6).advance().unwrap().rejected("bad");
        let json = serde_json::to_string(&state).unwrap();
        let parsed: WizardState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }
}
