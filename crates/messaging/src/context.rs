//! Per-dispatch context.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Explicit handle threaded through one dispatch.
///
/// Callers build a context per incoming request and pass it to the
/// dispatcher, which hands it to the handler factory and to the handler.
/// Nothing is resolved from ambient or global state.
#[derive(Debug, Clone)]
pub struct DispatchContext {
    correlation_id: Uuid,
    user_id: Option<String>,
    issued_at: DateTime<Utc>,
}

impl DispatchContext {
    /// Creates a context with a fresh correlation ID.
    pub fn new() -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            user_id: None,
            issued_at: Utc::now(),
        }
    }

    /// Reuses an upstream correlation ID.
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = correlation_id;
        self
    }

    /// Attaches the identity of the caller.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self::new()
    }
}
