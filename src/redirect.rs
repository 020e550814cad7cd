use axum::response::{IntoResponse, Redirect, Response};

/// NavigationKind
///
/// `Full` reloads the target page, so the server sees the session cookie on the next request.
/// `Client` is an in-app transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    Full,
    Client,
}

/// Navigation
///
/// A navigation side effect, described as a value. Policy code returns these; a thin caller
/// (a `Navigator`, or the HTTP layer) performs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub target: String,
    pub kind: NavigationKind,
}

impl Navigation {
    pub fn full(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            kind: NavigationKind::Full,
        }
    }

    pub fn client(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            kind: NavigationKind::Client,
        }
    }
}

/// Over HTTP every navigation is a `303 See Other`, which the browser follows with a full load.
impl IntoResponse for Navigation {
    fn into_response(self) -> Response {
        Redirect::to(&self.target).into_response()
    }
}

/// Navigator
///
/// The navigation collaborator. Implementations perform the side effect.
pub trait Navigator: Send + Sync {
    fn navigate(&self, navigation: Navigation);
}
