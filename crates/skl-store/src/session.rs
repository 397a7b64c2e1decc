//! # Session Accessor
//!
//! A bounded-retry wrapper around an external identity provider. The
//! provider hands out the acting user's session — organization context and
//! access token — and occasionally fails transiently (token refresh races,
//! brief network drops).
//!
//! The retry policy is deliberately simple: a fixed attempt cap and a
//! transient/permanent split decided by substring matching on the provider's
//! error message. The providers in play expose no structured failure
//! taxonomy, so the message is all there is to go on. No backoff — the
//! failures this absorbs clear within a retry or not at all.

use thiserror::Error;

use skl_core::OrganizationId;

/// Message fragments that mark a provider error as transient.
const TRANSIENT_MARKERS: &[&str] = &[
    "timeout",
    "timed out",
    "network",
    "connection",
    "temporarily unavailable",
    "refresh",
];

/// The acting user's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Identity-provider subject of the acting user.
    pub user_id: String,
    /// The organization scoping every subsequent store read.
    pub organization_id: OrganizationId,
    /// Opaque access token for the record store.
    pub access_token: String,
}

/// Errors surfaced by session acquisition.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The provider failed; message as reported by the provider.
    #[error("identity provider error: {0}")]
    Provider(String),

    /// All retry attempts were exhausted.
    #[error("session unavailable after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Attempts made, including the first.
        attempts: u32,
        /// The final provider error message.
        last_error: String,
    },
}

/// An external identity provider handing out the current session.
pub trait SessionProvider {
    /// Fetch the current session, refreshing tokens if needed.
    fn fetch_session(&self) -> Result<Session, SessionError>;
}

/// Bounded-retry wrapper around a [`SessionProvider`].
#[derive(Debug)]
pub struct RetryingSession<P> {
    provider: P,
    max_attempts: u32,
}

impl<P: SessionProvider> RetryingSession<P> {
    /// Wrap a provider with the default cap of 3 attempts.
    pub fn new(provider: P) -> Self {
        Self::with_max_attempts(provider, 3)
    }

    /// Wrap a provider with an explicit attempt cap (minimum 1).
    pub fn with_max_attempts(provider: P, max_attempts: u32) -> Self {
        Self {
            provider,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Fetch the session, retrying transient provider failures up to the
    /// attempt cap. Permanent failures (anything not matching a transient
    /// marker) propagate immediately.
    pub fn session(&self) -> Result<Session, SessionError> {
        let mut last_error = String::new();
        for attempt in 1..=self.max_attempts {
            match self.provider.fetch_session() {
                Ok(session) => return Ok(session),
                Err(SessionError::Provider(msg)) if is_transient(&msg) => {
                    tracing::warn!(attempt, error = %msg, "transient session failure, retrying");
                    last_error = msg;
                }
                Err(other) => return Err(other),
            }
        }
        Err(SessionError::RetriesExhausted {
            attempts: self.max_attempts,
            last_error,
        })
    }
}

/// Whether a provider error message marks a transient failure.
fn is_transient(message: &str) -> bool {
    let lower = message.to_lowercase();
    TRANSIENT_MARKERS.iter().any(|m| lower.contains(m))
}
