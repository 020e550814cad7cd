use tokio::sync::watch;

use crate::{error::SessionError, models::Profile};

/// Session
///
/// A snapshot of the session state: the resolved profile (if any) and whether resolution is
/// still in flight. Guards, the dashboard router and the navigation composer only read this.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub profile: Option<Profile>,
    pub loading: bool,
}

impl Session {
    /// Resolution in flight; no access decision may be finalized yet.
    pub fn resolving() -> Self {
        Self {
            profile: None,
            loading: true,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            profile: None,
            loading: false,
        }
    }

    pub fn authenticated(profile: Profile) -> Self {
        Self {
            profile: Some(profile),
            loading: false,
        }
    }

    /// Settles a resolution attempt. Any failure is an anonymous session.
    pub fn from_result(result: Result<Profile, SessionError>) -> Self {
        match result {
            Ok(profile) => Self::authenticated(profile),
            Err(e) => {
                tracing::debug!("session resolved without profile: {}", e);
                Self::anonymous()
            }
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn role(&self) -> Option<&str> {
        self.profile.as_ref().map(|profile| profile.role.as_str())
    }
}

/// SessionContext
///
/// The long-lived session object of a view tree. Exactly one writer (whoever owns the context
/// and feeds it resolution results) and any number of readers subscribed through `subscribe`.
/// Passed explicitly to the components that need it.
#[derive(Debug)]
pub struct SessionContext {
    tx: watch::Sender<Session>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    /// A context that starts out resolving.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::resolving());
        Self { tx }
    }

    pub fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    /// Marks a new resolution as in flight, keeping the current profile visible meanwhile.
    pub fn begin_resolution(&self) {
        self.tx.send_if_modified(|session| {
            let changed = !session.loading;
            session.loading = true;
            changed
        });
    }

    /// Publishes the outcome of a resolution attempt.
    pub fn complete(&self, result: Result<Profile, SessionError>) {
        self.publish(Session::from_result(result));
    }

    pub fn sign_out(&self) {
        self.publish(Session::anonymous());
    }

    fn publish(&self, next: Session) {
        self.tx.send_if_modified(|session| {
            if *session == next {
                return false;
            }
            *session = next;
            true
        });
    }
}
