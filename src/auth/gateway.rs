use chrono::{DateTime, Utc};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use super::{
    validate_credentials, AuthError, AuthService, Session, SessionChange, SignUpOutcome,
    Subscription,
};

pub const VERIFY_EMAIL_NOTICE: &str = "Check your email to verify your account";
pub const SESSION_EXPIRED_NOTICE: &str = "Your session has expired, please sign in again";

pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Where blocking remote calls run
pub trait Spawn {
    fn spawn(&self, job: Job) -> io::Result<()>;
}

/// One short-lived named thread per call
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSpawner;

impl Spawn for ThreadSpawner {
    fn spawn(&self, job: Job) -> io::Result<()> {
        thread::Builder::new()
            .name("sabio-auth".into())
            .spawn(job)
            .map(|_| ())
    }
}

/// Runs the job on the caller's thread; replies are still picked up by `poll`
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineSpawner;

impl Spawn for InlineSpawner {
    fn spawn(&self, job: Job) -> io::Result<()> {
        job();
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Email,
    Password,
    SignInButton,
    SignUpButton,
}

impl FormField {
    const ORDER: [FormField; 4] = [
        FormField::Email,
        FormField::Password,
        FormField::SignInButton,
        FormField::SignUpButton,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn is_text(self) -> bool {
        matches!(self, FormField::Email | FormField::Password)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Info(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Error(s) | Notice::Info(s) => s,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SignIn,
    SignUp,
}

#[derive(Debug)]
enum Reply {
    SignIn(Result<Session, AuthError>),
    SignUp(Result<SignUpOutcome, AuthError>),
    SignOut(Result<(), AuthError>),
    /// Tagged with the generation of the session it was started for
    Refresh(u64, Result<Session, AuthError>),
}

/// What the profile screen holds: the credential form, the local mirror of
/// the session and the notices produced by remote calls.
pub struct AuthGateway {
    service: Arc<dyn AuthService>,
    spawner: Box<dyn Spawn>,
    session: Option<Session>,
    subscription: Option<Subscription>,
    email: String,
    password: String,
    focus: FormField,
    pending: Option<Operation>,
    refreshing: bool,
    /// Bumped on every sign-out; replies for an older session are dropped
    generation: u64,
    notice: Option<Notice>,
    tx: Sender<Reply>,
    rx: Receiver<Reply>,
}

impl AuthGateway {
    pub fn new(service: Arc<dyn AuthService>) -> Self {
        Self::with_spawner(service, Box::new(ThreadSpawner))
    }

    pub fn with_spawner(service: Arc<dyn AuthService>, spawner: Box<dyn Spawn>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            service,
            spawner,
            session: None,
            subscription: None,
            email: String::new(),
            password: String::new(),
            focus: FormField::default(),
            pending: None,
            refreshing: false,
            generation: 0,
            notice: None,
            tx,
            rx,
        }
    }

    /// Fetch the current session once, then follow the change stream.
    /// Mounting twice keeps the first subscription.
    pub fn mount(&mut self) {
        if self.subscription.is_some() {
            return;
        }

        match self.service.get_session() {
            Ok(session) => self.session = session,
            Err(err) => {
                tracing::warn!(%err, "could not fetch session");
                self.notice = Some(Notice::Error(err.to_string()));
            }
        }
        self.subscription = Some(self.service.subscribe());
    }

    /// Release the change-stream subscription; later calls do nothing
    pub fn unmount(&mut self) {
        if self.subscription.take().is_some() {
            tracing::debug!("session subscription released");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    pub fn pending(&self) -> Option<Operation> {
        self.pending
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn set_email(&mut self, email: &str) {
        self.email = email.to_string();
    }

    pub fn set_password(&mut self, password: &str) {
        self.password = password.to_string();
    }

    /// Type into the focused field; buttons ignore text
    pub fn input_char(&mut self, c: char) {
        match self.focus {
            FormField::Email => self.email.push(c),
            FormField::Password => self.password.push(c),
            FormField::SignInButton | FormField::SignUpButton => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FormField::Email => {
                self.email.pop();
            }
            FormField::Password => {
                self.password.pop();
            }
            FormField::SignInButton | FormField::SignUpButton => {}
        }
    }

    /// Enter: a button submits, a text field hands focus on
    pub fn submit(&mut self) -> Result<(), AuthError> {
        match self.focus {
            FormField::SignInButton => self.sign_in(),
            FormField::SignUpButton => self.sign_up(),
            FormField::Email | FormField::Password => {
                self.focus_next();
                Ok(())
            }
        }
    }

    pub fn sign_in(&mut self) -> Result<(), AuthError> {
        if self.pending.is_some() {
            return Ok(());
        }
        self.check_fields()?;

        let (email, password) = (self.email.clone(), self.password.clone());
        self.dispatch(Operation::SignIn, move |service, tx| {
            let _ = tx.send(Reply::SignIn(service.sign_in(&email, &password)));
        });
        Ok(())
    }

    pub fn sign_up(&mut self) -> Result<(), AuthError> {
        if self.pending.is_some() {
            return Ok(());
        }
        self.check_fields()?;

        let (email, password) = (self.email.clone(), self.password.clone());
        self.dispatch(Operation::SignUp, move |service, tx| {
            let _ = tx.send(Reply::SignUp(service.sign_up(&email, &password)));
        });
        Ok(())
    }

    /// The local session is gone as soon as this returns; the remote call
    /// only affects the logs.
    pub fn sign_out(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        self.generation += 1;
        self.refreshing = false;
        self.notice = None;
        self.focus = FormField::default();

        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        let job: Job = Box::new(move || {
            let _ = tx.send(Reply::SignOut(service.sign_out(&session)));
        });
        if let Err(err) = self.spawner.spawn(job) {
            tracing::warn!(%err, "could not start sign-out");
        }
    }

    /// Refresh a session whose expiry has passed
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if self.refreshing {
            return;
        }
        let Some(session) = self.session.clone() else {
            return;
        };
        if !session.is_expired(now) {
            return;
        }

        tracing::info!("session expired, refreshing");
        self.refreshing = true;
        let generation = self.generation;
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        let job: Job = Box::new(move || {
            let _ = tx.send(Reply::Refresh(generation, service.refresh(&session)));
        });
        if let Err(err) = self.spawner.spawn(job) {
            tracing::warn!(%err, "could not start refresh");
            self.refreshing = false;
        }
    }

    /// Apply finished remote calls and session changes. Returns whether
    /// anything visible changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;

        while let Ok(reply) = self.rx.try_recv() {
            self.apply(reply);
            changed = true;
        }

        let changes = self
            .subscription
            .as_ref()
            .map(Subscription::drain)
            .unwrap_or_default();
        for change in changes {
            self.follow(change);
            changed = true;
        }

        changed
    }

    fn check_fields(&mut self) -> Result<(), AuthError> {
        validate_credentials(&self.email, &self.password).inspect_err(|err| {
            self.notice = Some(Notice::Error(err.to_string()));
        })
    }

    fn dispatch<F>(&mut self, op: Operation, call: F)
    where
        F: FnOnce(&dyn AuthService, &Sender<Reply>) + Send + 'static,
    {
        self.pending = Some(op);
        self.notice = None;

        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        let job: Job = Box::new(move || call(service.as_ref(), &tx));

        if let Err(err) = self.spawner.spawn(job) {
            tracing::warn!(%err, ?op, "could not start remote call");
            self.pending = None;
            self.notice = Some(Notice::Error(err.to_string()));
        }
    }

    fn apply(&mut self, reply: Reply) {
        match reply {
            Reply::SignIn(result) => {
                self.pending = None;
                match result {
                    Ok(session) => self.establish(session),
                    Err(err) => self.notice = Some(Notice::Error(err.to_string())),
                }
            }
            Reply::SignUp(result) => {
                self.pending = None;
                match result {
                    Ok(SignUpOutcome::SessionEstablished(session)) => self.establish(session),
                    Ok(SignUpOutcome::ConfirmationRequired { email }) => {
                        tracing::info!(email, "sign-up awaits email confirmation");
                        self.notice = Some(Notice::Info(VERIFY_EMAIL_NOTICE.to_string()));
                    }
                    Err(err) => self.notice = Some(Notice::Error(err.to_string())),
                }
            }
            Reply::SignOut(result) => {
                if let Err(err) = result {
                    tracing::warn!(%err, "remote sign-out failed");
                }
            }
            Reply::Refresh(generation, _) if generation != self.generation => {
                tracing::debug!("dropping refresh reply for a signed-out session");
            }
            Reply::Refresh(_, result) => {
                self.refreshing = false;
                match result {
                    Ok(session) => self.session = Some(session),
                    Err(err) => {
                        tracing::warn!(%err, "session refresh failed");
                        self.session = None;
                        self.notice = Some(Notice::Info(SESSION_EXPIRED_NOTICE.to_string()));
                    }
                }
            }
        }
    }

    fn follow(&mut self, change: SessionChange) {
        tracing::debug!(?change, "session changed");
        if matches!(change, SessionChange::Refreshed(_)) && self.session.is_none() {
            // a refresh only renews a session this gateway still holds
            return;
        }
        self.session = change.session().cloned();
    }

    fn establish(&mut self, session: Session) {
        tracing::info!(email = session.email(), "signed in");
        self.session = Some(session);
        self.email.clear();
        self.password.clear();
        self.focus = FormField::default();
        self.notice = None;
    }
}
