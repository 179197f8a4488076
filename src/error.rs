//! Error types for the CallMed onboarding client.

use std::time::Duration;

/// Programmer/configuration errors. These surface when a wizard is being
/// constructed, never in the middle of a flow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Duplicate field {field} in step {step} of the {role} wizard")]
    DuplicateField {
        role: String,
        step: String,
        field: String,
    },

    #[error("Field {field} in the {role} wizard is declared twice with different shapes")]
    ConflictingField { role: String, field: String },

    #[error("Rule in step {step} references unknown field {field}")]
    UnknownRuleField { step: String, field: String },

    #[error("Wizard {role} has no steps")]
    EmptyWizard { role: String },
}

/// Errors raised at the wizard boundary when a caller hands in something the
/// field registry does not allow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field {field} expects a {expected} value")]
    KindMismatch {
        field: String,
        expected: &'static str,
    },

    #[error("Field {field} is not on step {step}")]
    NotOnStep { field: String, step: usize },

    #[error("Value {value:?} is not an option of field {field}")]
    InvalidOption { field: String, value: String },

    #[error("Cannot {action} while the wizard is {phase}")]
    InvalidTransition { action: String, phase: String },

    #[error("Step {index} is not reachable from step {current}")]
    Unreachable { index: usize, current: usize },
}

/// Errors from the onboarding submission endpoint.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Server rejected submission with status {status}")]
    Rejected { status: u16, message: Option<String> },

    #[error("Could not read attachment {field}: {source}")]
    Attachment {
        field: String,
        #[source]
        source: std::io::Error,
    },
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Client-side check failed before any request was made.
    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Rejected(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected auth response: {0}")]
    InvalidResponse(String),

    #[error("Unknown role in auth response: {0}")]
    Role(#[from] ConfigError),
}

/// Token persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored token is empty")]
    Empty,
}
