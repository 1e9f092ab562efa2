use chrono::{DateTime, Duration, Utc};
use reqwest::blocking::RequestBuilder;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use super::{AuthError, AuthService, Session, SessionChange, SessionHub, SignUpOutcome, Subscription, User};
use crate::backend::{Backend, RemoteError};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: User,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .or_else(|| self.expires_in.map(|secs| now + Duration::seconds(secs)));

        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

/// Sign-up answers with a full token set when accounts are confirmed
/// automatically, and with the bare user otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    User(User),
}

fn parse_session(body: &str, now: DateTime<Utc>) -> Result<Session, AuthError> {
    serde_json::from_str::<TokenResponse>(body)
        .map(|t| t.into_session(now))
        .map_err(|e| AuthError::Remote(format!("unexpected response from auth service: {e}")))
}

fn parse_sign_up(body: &str, email: &str, now: DateTime<Utc>) -> Result<SignUpOutcome, AuthError> {
    match serde_json::from_str::<SignUpResponse>(body) {
        Ok(SignUpResponse::Session(t)) => Ok(SignUpOutcome::SessionEstablished(t.into_session(now))),
        Ok(SignUpResponse::User(user)) => Ok(SignUpOutcome::ConfirmationRequired {
            email: user.email.unwrap_or_else(|| email.to_string()),
        }),
        Err(e) => Err(AuthError::Remote(format!(
            "unexpected response from auth service: {e}"
        ))),
    }
}

/// Email/password auth against a Supabase (GoTrue) endpoint.
///
/// Sessions live in memory only; a restart starts signed out.
#[derive(Debug, Clone)]
pub struct SupabaseAuth {
    backend: Backend,
    hub: SessionHub,
}

impl SupabaseAuth {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            hub: SessionHub::new(),
        }
    }

    pub fn hub(&self) -> &SessionHub {
        &self.hub
    }

    pub fn sign_up_request(&self, email: &str, password: &str) -> RequestBuilder {
        self.backend
            .request(Method::POST, &self.backend.auth_url("signup"))
            .json(&json!({ "email": email, "password": password }))
    }

    pub fn sign_in_request(&self, email: &str, password: &str) -> RequestBuilder {
        self.backend
            .request(Method::POST, &self.backend.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }))
    }

    pub fn refresh_request(&self, refresh_token: &str) -> RequestBuilder {
        self.backend
            .request(Method::POST, &self.backend.auth_url("token"))
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": refresh_token }))
    }

    pub fn sign_out_request(&self, access_token: &str) -> RequestBuilder {
        self.backend
            .request_as(Method::POST, &self.backend.auth_url("logout"), access_token)
    }

    fn send(&self, request: RequestBuilder) -> Result<String, AuthError> {
        self.backend.send(request).map_err(|RemoteError(msg)| AuthError::Remote(msg))
    }
}

impl AuthService for SupabaseAuth {
    fn get_session(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.hub.current())
    }

    fn subscribe(&self) -> Subscription {
        self.hub.subscribe()
    }

    fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        tracing::info!(email, "signing up");
        let body = self.send(self.sign_up_request(email, password))?;
        let outcome = parse_sign_up(&body, email, Utc::now())?;

        if let SignUpOutcome::SessionEstablished(session) = &outcome {
            self.hub.publish(SessionChange::SignedIn(session.clone()));
        }
        Ok(outcome)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        tracing::info!(email, "signing in");
        let body = self.send(self.sign_in_request(email, password))?;
        let session = parse_session(&body, Utc::now())?;
        self.hub.publish(SessionChange::SignedIn(session.clone()));
        Ok(session)
    }

    fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        tracing::info!("signing out");
        let result = self.send(self.sign_out_request(&session.access_token));
        // the local session ends whatever the service answered
        self.hub.publish(SessionChange::SignedOut);
        result.map(|_| ())
    }

    fn refresh(&self, session: &Session) -> Result<Session, AuthError> {
        tracing::debug!("refreshing session");
        let refreshed = self
            .send(self.refresh_request(&session.refresh_token))
            .and_then(|body| parse_session(&body, Utc::now()));

        match refreshed {
            Ok(session) => {
                self.hub.publish(SessionChange::Refreshed(session.clone()));
                Ok(session)
            }
            Err(err) => {
                self.hub.publish(SessionChange::Expired);
                Err(err)
            }
        }
    }
}
