//! Onboarding wizard engine: one engine driving both the patient and the
//! doctor wizard.
//!
//! The field registry declares each role's steps, fields, and rules. A
//! `WizardController` owns the draft and the current `WizardState`, asks the
//! validator before moving forward, and hands the finished draft to a
//! submission gateway. The render selector turns all of that into the view
//! model a front end paints.

pub mod controller;
pub mod definitions;
pub mod draft;
pub mod registry;
pub mod render;
pub mod review;
pub mod routes;
pub mod sessions;
pub mod state;
pub mod validator;

pub use controller::{CompletionHook, EditOutcome, NextAction, Outcome, WizardController};
pub use draft::{Draft, DraftSnapshot, FieldInput, FileHandle, Value};
pub use registry::{FieldKind, FieldSpec, Role, Rule, Step, WizardDefinition, definition, get_steps};
pub use render::{FieldView, StepView, select_view};
pub use routes::{WizardRouteState, wizard_routes};
pub use sessions::{DASHBOARD_ROUTE, DashboardRedirect, WizardSession, WizardSessions};
pub use state::{WizardPhase, WizardState};
pub use validator::{Validation, Violation, validate};
