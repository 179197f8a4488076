//! In-memory registry of live wizard instances, keyed by session id.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::controller::{CompletionHook, NextAction, Outcome, WizardController};
use super::registry::Role;
use crate::error::ConfigError;
use crate::submission::{SubmissionGateway, SubmissionResult};

/// Path the front end is sent to once onboarding is complete.
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// Completion hook that logs the hand-off to the dashboard.
pub struct DashboardRedirect;

impl CompletionHook for DashboardRedirect {
    fn onboarding_complete(&self, role: Role, result: &SubmissionResult) {
        tracing::info!(
            role = %role,
            id = ?result.id,
            route = DASHBOARD_ROUTE,
            "Onboarding complete, redirecting to dashboard"
        );
    }
}

/// One hosted wizard instance.
pub struct WizardSession {
    pub id: Uuid,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    /// Milliseconds since the epoch of the last lookup.
    touched_ms: AtomicI64,
    controller: Mutex<WizardController>,
}

impl WizardSession {
    pub fn controller(&self) -> &Mutex<WizardController> {
        &self.controller
    }

    pub fn last_touched(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.touched_ms.load(Ordering::Relaxed))
            .unwrap_or(self.created_at)
    }

    fn touch(&self) {
        self.touched_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    fn is_idle(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.last_touched())
            .to_std()
            .is_ok_and(|idle| idle > ttl)
    }

    /// Run Next without holding the lock across the submission, so requests
    /// arriving meanwhile see `Submitting` and are ignored.
    pub async fn next(&self) -> Outcome {
        let (action, gateway) = {
            let mut controller = self.controller.lock().await;
            (controller.begin_next(), controller.gateway())
        };
        match action {
            NextAction::Done(outcome) => outcome,
            NextAction::Submit(request) => {
                let result = gateway.submit(request).await;
                self.controller.lock().await.finish_submission(result)
            }
        }
    }
}

/// All live sessions plus the collaborators new wizards are built with.
pub struct WizardSessions {
    sessions: RwLock<HashMap<Uuid, Arc<WizardSession>>>,
    gateway: Arc<dyn SubmissionGateway>,
    hook: Arc<dyn CompletionHook>,
}

impl WizardSessions {
    pub fn new(gateway: Arc<dyn SubmissionGateway>, hook: Arc<dyn CompletionHook>) -> Arc<Self> {
        Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
            gateway,
            hook,
        })
    }

    /// Start a wizard for `role`.
    pub async fn create(&self, role: Role) -> Result<Arc<WizardSession>, ConfigError> {
        let controller =
            WizardController::new(role, Arc::clone(&self.gateway), Arc::clone(&self.hook))?;
        let now = Utc::now();
        let session = Arc::new(WizardSession {
            id: Uuid::new_v4(),
            role,
            created_at: now,
            touched_ms: AtomicI64::new(now.timestamp_millis()),
            controller: Mutex::new(controller),
        });
        self.sessions
            .write()
            .await
            .insert(session.id, Arc::clone(&session));
        tracing::info!(session = %session.id, role = %role, "Wizard session created");
        Ok(session)
    }

    /// Look a session up and mark it as in use.
    pub async fn get(&self, id: Uuid) -> Option<Arc<WizardSession>> {
        let session = self.sessions.read().await.get(&id).cloned()?;
        session.touch();
        Some(session)
    }

    /// Next on a hosted session. A session that reaches `Submitted` is done
    /// and is dropped from the registry.
    pub async fn next(&self, session: &WizardSession) -> Outcome {
        let outcome = session.next().await;
        if matches!(outcome, Outcome::Submitted { .. })
            && self.sessions.write().await.remove(&session.id).is_some()
        {
            tracing::info!(session = %session.id, "Wizard session finished");
        }
        outcome
    }

    /// Abandon a session; its draft is dropped with it.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(session = %id, "Wizard session abandoned");
        }
        removed
    }

    /// Drop sessions not looked up within `ttl`. Returns how many went.
    pub async fn expire_idle(&self, ttl: Duration) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, session| {
            let idle = session.is_idle(ttl, now);
            if idle {
                tracing::debug!(session = %id, "Wizard session expired");
            }
            !idle
        });
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::info!(count = expired, "Expired idle wizard sessions");
        }
        expired
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Spawn a background task that periodically drops idle sessions.
pub fn spawn_expiry_task(
    sessions: Arc<WizardSessions>,
    ttl: Duration,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            sessions.expire_idle(ttl).await;
        }
    })
}
