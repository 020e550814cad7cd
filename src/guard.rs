use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::watch;

use crate::{
    AppState,
    models::Profile,
    redirect::{Navigation, Navigator},
    registry::{AllowedRoles, ROOT_PATH},
    session::Session,
};

/// Decision
///
/// The outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Render the protected content.
    Allow,
    /// Leave for the root path, which forwards by role or to login.
    RedirectToHome,
    /// Session resolution is still in flight; render a loading state and decide later.
    Pending,
}

/// authorize
///
/// The access policy, as a pure function:
/// 1. while `loading`, always `Pending`;
/// 2. no profile, `RedirectToHome`;
/// 3. a non-empty `allowed` set that does not contain the profile's role, `RedirectToHome`
///    (unknown role names are never members);
/// 4. otherwise `Allow`. An empty `allowed` set admits any authenticated profile.
pub fn authorize(profile: Option<&Profile>, allowed: &AllowedRoles, loading: bool) -> Decision {
    if loading {
        return Decision::Pending;
    }

    let Some(profile) = profile else {
        return Decision::RedirectToHome;
    };

    if allowed.is_empty() {
        return Decision::Allow;
    }

    match profile.known_role() {
        Some(role) if allowed.contains(&role) => Decision::Allow,
        _ => Decision::RedirectToHome,
    }
}

/// GuardOutcome
///
/// The decision for the current inputs plus the navigation to perform, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardOutcome {
    pub decision: Decision,
    pub navigation: Option<Navigation>,
}

/// AccessGuard
///
/// Wraps `authorize` for a long-lived view. The redirect is issued once per transition into
/// `RedirectToHome`: evaluating again with the same inputs, or with inputs that still redirect,
/// yields no further navigation. Leaving `RedirectToHome` re-arms it.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    allowed: AllowedRoles,
    last: Option<Decision>,
}

impl AccessGuard {
    pub fn new(allowed: AllowedRoles) -> Self {
        Self {
            allowed,
            last: None,
        }
    }

    pub fn allowed(&self) -> &AllowedRoles {
        &self.allowed
    }

    /// Replaces the admitted roles. The next `evaluate` uses the new set.
    pub fn set_allowed(&mut self, allowed: AllowedRoles) {
        self.allowed = allowed;
    }

    pub fn evaluate(&mut self, session: &Session) -> GuardOutcome {
        let decision = authorize(session.profile(), &self.allowed, session.loading);

        let entering_redirect =
            decision == Decision::RedirectToHome && self.last != Some(Decision::RedirectToHome);
        self.last = Some(decision);

        GuardOutcome {
            decision,
            navigation: entering_redirect.then(|| Navigation::full(ROOT_PATH)),
        }
    }
}

/// watch_access
///
/// Drives `guard` from a session subscription: evaluates the current snapshot, then again
/// after every change, handing redirects to `navigator`. Returns the last decision once the
/// session context is dropped. Dropping the future cancels it without further navigation.
pub async fn watch_access<N: Navigator + ?Sized>(
    mut guard: AccessGuard,
    mut session: watch::Receiver<Session>,
    navigator: &N,
) -> Decision {
    loop {
        let snapshot = session.borrow_and_update().clone();
        let outcome = guard.evaluate(&snapshot);

        if let Some(navigation) = outcome.navigation {
            tracing::info!(to = %navigation.target, "access guard redirecting");
            navigator.navigate(navigation);
        }

        if session.changed().await.is_err() {
            return outcome.decision;
        }
    }
}

/// enforce_route_policy
///
/// Middleware for the protected router. Looks up the route group of the request path,
/// resolves the session through the `Session` extractor and applies `authorize`.
/// Admitted requests carry the `Session` as a request extension.
///
/// Unauthorized requests are bounced to the root path silently; there is no error page.
pub async fn enforce_route_policy(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let Some(policy) = state.registry.policies().policy_for(&path) else {
        return next.run(request).await;
    };

    match authorize(session.profile(), &policy.allowed, session.loading) {
        Decision::Allow => {
            // Handlers behind the guard read the resolved session from here.
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Decision::RedirectToHome => {
            tracing::info!(
                path = %path,
                group = %policy.prefix,
                role = session.role().unwrap_or("anonymous"),
                "access denied, redirecting to root"
            );
            Navigation::full(ROOT_PATH).into_response()
        }
        Decision::Pending => (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({ "status": "loading" })),
        )
            .into_response(),
    }
}
