use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    error::SessionError,
    models::Profile,
    repository::RepositoryState,
    session::Session,
};

/// Cookie in which the browser client keeps the Supabase access token.
pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";
/// Development-only header naming the profile to act as.
pub const LOCAL_BYPASS_HEADER: &str = "x-user-id";

/// Claims
///
/// The subset of a Supabase access token this service reads.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the auth user id, which is also the primary key of `public.profiles`.
    pub sub: Uuid,
    /// Expiration Time (exp).
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// extract_token
///
/// Finds the access token: an `Authorization: Bearer` header wins over the session cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    bearer.or_else(|| cookie_value(headers, ACCESS_TOKEN_COOKIE))
}

fn cookie_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// decode_token
///
/// Validates signature and expiry of an access token and returns its subject.
pub fn decode_token(token: &str, secret: &str) -> Result<Uuid, SessionError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::default();
    validation.validate_exp = true;
    // Supabase stamps `aud: authenticated`; the signature already binds the token to this project.
    validation.validate_aud = false;

    let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
    Ok(token_data.claims.sub)
}

/// resolve_profile
///
/// The full resolution path for one request:
/// 1. in `Env::Local`, a valid `x-user-id` naming an existing profile short-circuits;
/// 2. otherwise the access token is decoded and its subject looked up.
///
/// Missing and deactivated profiles are failures, same as a bad token.
pub async fn resolve_profile(
    headers: &HeaderMap,
    repo: &RepositoryState,
    config: &AppConfig,
) -> Result<Profile, SessionError> {
    if config.env == Env::Local {
        let bypass_id = headers
            .get(LOCAL_BYPASS_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok());

        if let Some(user_id) = bypass_id {
            if let Ok(Some(profile)) = repo.get_profile(user_id).await {
                return ensure_active(profile);
            }
        }
    }

    let token = extract_token(headers).ok_or(SessionError::MissingToken)?;
    let user_id = decode_token(token, &config.jwt_secret)?;

    let profile = repo
        .get_profile(user_id)
        .await?
        .ok_or(SessionError::ProfileNotFound(user_id))?;

    ensure_active(profile)
}

fn ensure_active(profile: Profile) -> Result<Profile, SessionError> {
    if profile.is_active {
        Ok(profile)
    } else {
        Err(SessionError::InactiveProfile(profile.id))
    }
}

/// resolve_session
///
/// Bounds `resolve_profile` by the configured timeout and settles the outcome into a
/// `Session`. Never fails: every error yields an anonymous session.
pub async fn resolve_session(
    headers: &HeaderMap,
    repo: &RepositoryState,
    config: &AppConfig,
) -> Session {
    let result = tokio::time::timeout(config.session_timeout, resolve_profile(headers, repo, config))
        .await
        .unwrap_or(Err(SessionError::Timeout));

    if let Err(e @ (SessionError::Repository(_) | SessionError::Timeout)) = &result {
        tracing::warn!("session resolution failed, continuing anonymously: {}", e);
    }

    Session::from_result(result)
}

/// Session Extractor Implementation
///
/// Makes `Session` usable as a handler or middleware argument. Unlike a rejecting auth
/// extractor, it always succeeds: deciding what an anonymous session may see is the
/// access guard's job.
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        Ok(resolve_session(&parts.headers, &repo, &config).await)
    }
}
