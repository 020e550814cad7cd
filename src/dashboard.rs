use tokio::sync::watch;

use crate::{
    redirect::{Navigation, Navigator},
    registry::{LOGIN_PATH, RoleRegistry},
    session::Session,
};

/// RootState
///
/// Where the root-path redirect stands. Both settled states end in a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootState {
    Resolving,
    AuthenticatedWithProfile,
    Unauthenticated,
}

/// landing_path
///
/// Where a settled session belongs: the role's dashboard, or the login page for anonymous
/// sessions. A profile whose role is unknown also lands on login, since every dashboard
/// would bounce it straight back to the root.
pub fn landing_path<'r>(registry: &'r RoleRegistry, session: &Session) -> &'r str {
    match session.profile() {
        Some(profile) => registry.home_path(&profile.role).unwrap_or_else(|| {
            tracing::warn!(
                user_id = %profile.id,
                role = %profile.role,
                "profile has unknown role, sending to login"
            );
            LOGIN_PATH
        }),
        None => LOGIN_PATH,
    }
}

/// DashboardRouter
///
/// The one-shot redirect performed on entry at the root path. Stays silent while the session
/// resolves, then issues exactly one full navigation. After `unmount`, late results are
/// discarded.
#[derive(Debug)]
pub struct DashboardRouter<'r> {
    registry: &'r RoleRegistry,
    state: RootState,
    navigated: bool,
    mounted: bool,
}

impl<'r> DashboardRouter<'r> {
    pub fn new(registry: &'r RoleRegistry) -> Self {
        Self {
            registry,
            state: RootState::Resolving,
            navigated: false,
            mounted: true,
        }
    }

    pub fn state(&self) -> RootState {
        self.state
    }

    /// Feeds the current session snapshot. Returns the navigation to perform, at most once
    /// over the lifetime of the router.
    pub fn on_session(&mut self, session: &Session) -> Option<Navigation> {
        if !self.mounted || self.navigated {
            return None;
        }

        if session.loading {
            self.state = RootState::Resolving;
            return None;
        }

        self.state = if session.profile.is_some() {
            RootState::AuthenticatedWithProfile
        } else {
            RootState::Unauthenticated
        };
        self.navigated = true;

        // Full navigation so the next request carries the session cookie to the server.
        Some(Navigation::full(landing_path(self.registry, session)))
    }

    /// The view went away; any result still in flight must not navigate.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    /// run
    ///
    /// Drives the router from a session subscription until it navigates. Returns `None` when
    /// the session context is dropped before resolution settles.
    pub async fn run<N: Navigator + ?Sized>(
        mut self,
        mut session: watch::Receiver<Session>,
        navigator: &N,
    ) -> Option<Navigation> {
        loop {
            let snapshot = session.borrow_and_update().clone();

            if let Some(navigation) = self.on_session(&snapshot) {
                tracing::debug!(to = %navigation.target, state = ?self.state, "dashboard redirect");
                navigator.navigate(navigation.clone());
                return Some(navigation);
            }

            if session.changed().await.is_err() {
                return None;
            }
        }
    }
}
