//! CallMed onboarding: the patient and doctor sign-up wizards plus the auth
//! and submission plumbing around them.

pub mod auth;
pub mod config;
pub mod error;
pub mod onboarding;
pub mod submission;
