use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Evidence of an authenticated identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub user: User,
}

impl Session {
    pub fn email(&self) -> &str {
        self.user.email.as_deref().unwrap_or("")
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Notification pushed to every subscriber when the session changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChange {
    SignedIn(Session),
    Refreshed(Session),
    SignedOut,
    Expired,
}

impl SessionChange {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionChange::SignedIn(s) | SessionChange::Refreshed(s) => Some(s),
            SessionChange::SignedOut | SessionChange::Expired => None,
        }
    }
}

#[derive(Debug, Default)]
struct HubInner {
    current: Option<Session>,
    subscribers: Vec<(u64, Sender<SessionChange>)>,
    next_id: u64,
}

/// The service-side session holder with its change stream
#[derive(Debug, Clone, Default)]
pub struct SessionHub {
    inner: Arc<Mutex<HubInner>>,
}

impl SessionHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HubInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> Option<Session> {
        self.lock().current.clone()
    }

    /// Apply a change and broadcast it. Subscribers whose receiver is gone
    /// are dropped along the way.
    pub fn publish(&self, change: SessionChange) {
        let mut inner = self.lock();
        inner.current = change.session().cloned();
        inner
            .subscribers
            .retain(|(_, tx)| tx.send(change.clone()).is_ok());
    }

    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, tx));

        Subscription {
            id,
            hub: self.clone(),
            rx,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn unsubscribe(&self, id: u64) {
        self.lock().subscribers.retain(|(sid, _)| *sid != id);
    }
}

/// Live registration on a [`SessionHub`]. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    hub: SessionHub,
    rx: Receiver<SessionChange>,
}

impl Subscription {
    /// Everything published since the last call
    pub fn drain(&self) -> Vec<SessionChange> {
        self.rx.try_iter().collect()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}
