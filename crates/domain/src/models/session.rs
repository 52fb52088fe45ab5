//! Route guard for the admin area.
//!
//! The guard never authenticates anybody. It only tracks the session
//! signal reported by whoever does, and decides where navigation goes.

use serde::Serialize;

/// Externally observed change in the admin session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSignal {
    SignedIn { subject: String },
    SignedOut,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Unauthenticated,
    Authenticated { subject: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect(String),
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    state: SessionState,
    login_path: String,
    protected: Vec<String>,
}

impl RouteGuard {
    /// Creates an unauthenticated guard that redirects to `login_path`.
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            state: SessionState::Unauthenticated,
            login_path: login_path.into(),
            protected: Vec::new(),
        }
    }

    /// Adds a protected path prefix, e.g. `/admin`.
    pub fn protect(mut self, prefix: impl Into<String>) -> Self {
        self.protected.push(prefix.into());
        self
    }

    pub fn observe(&mut self, signal: SessionSignal) -> &SessionState {
        self.state = match signal {
            SessionSignal::SignedIn { subject } => SessionState::Authenticated { subject },
            SessionSignal::SignedOut | SessionSignal::Expired => SessionState::Unauthenticated,
        };
        &self.state
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.protected.iter().any(|prefix| {
            path == prefix
                || path
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    pub fn navigate(&self, path: &str) -> Navigation {
        if self.is_protected(path) && !self.is_authenticated() {
            Navigation::Redirect(self.login_path.clone())
        } else {
            Navigation::Allow
        }
    }
}
