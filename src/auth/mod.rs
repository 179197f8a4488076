//! Sign-in against the CallMed API and local token persistence.

pub mod client;
pub mod routes;
pub mod token_store;

pub use client::{AuthClient, AuthSession, AuthUser};
pub use routes::{AuthRouteState, auth_routes};
pub use token_store::TokenStore;
