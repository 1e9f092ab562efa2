//! Adapter over the hosted authentication service.
//!
//! [`AuthService`] is the remote contract, [`client::SupabaseAuth`] speaks it
//! over HTTP and [`gateway::AuthGateway`] is what the profile screen talks to:
//! form state, local validation, notices and the session mirror.

pub mod client;
pub mod gateway;
pub mod session;

use thiserror::Error;

use crate::backend::RemoteError;
pub use session::{Session, SessionChange, SessionHub, Subscription, User};

pub const NOT_CONFIGURED: &str = "authentication backend is not configured";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Local validation; nothing was sent
    #[error("Please fill in both email and password")]
    InvalidCredentialsFormat,

    /// Verbatim message from the service
    #[error("{0}")]
    Remote(String),
}

impl AuthError {
    pub fn is_validation(&self) -> bool {
        matches!(self, AuthError::InvalidCredentialsFormat)
    }
}

impl From<RemoteError> for AuthError {
    fn from(err: RemoteError) -> Self {
        AuthError::Remote(err.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The backend confirms accounts automatically and returned a session
    SessionEstablished(Session),
    /// The account exists but must be verified by email before signing in
    ConfirmationRequired { email: String },
}

/// Operations consumed from the remote service. All calls block; the
/// gateway keeps them off the event loop.
pub trait AuthService: Send + Sync {
    fn get_session(&self) -> Result<Option<Session>, AuthError>;
    fn subscribe(&self) -> Subscription;
    fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError>;
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;
    fn sign_out(&self, session: &Session) -> Result<(), AuthError>;
    fn refresh(&self, session: &Session) -> Result<Session, AuthError>;
}

/// Stand-in used when no backend is configured: never signed in, every
/// remote action fails with a readable message.
#[derive(Debug, Default)]
pub struct DisabledAuth {
    hub: SessionHub,
}

impl DisabledAuth {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuthService for DisabledAuth {
    fn get_session(&self) -> Result<Option<Session>, AuthError> {
        Ok(None)
    }

    fn subscribe(&self) -> Subscription {
        self.hub.subscribe()
    }

    fn sign_up(&self, _email: &str, _password: &str) -> Result<SignUpOutcome, AuthError> {
        Err(AuthError::Remote(NOT_CONFIGURED.to_string()))
    }

    fn sign_in(&self, _email: &str, _password: &str) -> Result<Session, AuthError> {
        Err(AuthError::Remote(NOT_CONFIGURED.to_string()))
    }

    fn sign_out(&self, _session: &Session) -> Result<(), AuthError> {
        Err(AuthError::Remote(NOT_CONFIGURED.to_string()))
    }

    fn refresh(&self, _session: &Session) -> Result<Session, AuthError> {
        Err(AuthError::Remote(NOT_CONFIGURED.to_string()))
    }
}

/// Both fields must be non-empty before anything is sent
pub fn validate_credentials(email: &str, password: &str) -> Result<(), AuthError> {
    if email.is_empty() || password.is_empty() {
        Err(AuthError::InvalidCredentialsFormat)
    } else {
        Ok(())
    }
}
