use thiserror::Error;
use uuid::Uuid;

use crate::models::Role;

/// RepositoryError
///
/// Failures talking to the profile store. These never reach a client: the session
/// layer turns them into an anonymous session.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("profile service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("profile service answered with status {0}")]
    UnexpectedStatus(u16),

    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}

/// SessionError
///
/// Every way session resolution can fail. All variants are treated as "no profile".
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no access token presented")]
    MissingToken,

    #[error("access token rejected: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("no profile for user {0}")]
    ProfileNotFound(Uuid),

    #[error("profile {0} is deactivated")]
    InactiveProfile(Uuid),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("session resolution timed out")]
    Timeout,
}

/// RegistryError
///
/// Raised while validating the role registry at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("route group `{group}` names unknown role `{role}`")]
    UnknownRole { group: String, role: String },

    #[error("role `{0}` has no registry entry")]
    MissingRole(Role),

    #[error("navigation entry `{href}` is not reachable by role `{role}`")]
    UnreachableEntry { role: Role, href: String },
}
