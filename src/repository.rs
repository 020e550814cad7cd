use async_trait::async_trait;
use reqwest::StatusCode;
use sqlx::PgPool;
use std::{collections::HashMap, sync::Arc};
use uuid::Uuid;

use crate::{error::RepositoryError, models::Profile};

/// ProfileRepository Trait
///
/// The only slice of the data collaborator this service touches: looking up the profile
/// behind an authenticated user id. `Ok(None)` means the store answered and has no such row.
///
/// **Send + Sync + async_trait** keep `Arc<dyn ProfileRepository>` usable across Axum's
/// task boundaries.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, RepositoryError>;
}

/// RepositoryState
///
/// The shared handle to the profile store held in the application state.
pub type RepositoryState = Arc<dyn ProfileRepository>;

// --- Postgres ---

/// PostgresRepository
///
/// Reads `public.profiles` directly over the database connection pool.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PostgresRepository {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, RepositoryError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, email, full_name, role, is_active, created_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("get_profile error: {:?}", e);
            e
        })?;

        Ok(profile)
    }
}

// --- Supabase REST ---

/// SupabaseRepository
///
/// Reads profiles through the project's PostgREST endpoint (`/rest/v1/profiles`), the same
/// path the hosted client SDK uses. Authenticates with the service-role key.
pub struct SupabaseRepository {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseRepository {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl ProfileRepository for SupabaseRepository {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, RepositoryError> {
        let url = format!("{}/rest/v1/profiles", self.base_url);

        let response = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[
                ("id", format!("eq.{}", id)),
                (
                    "select",
                    "id,email,full_name,role,is_active,created_at".to_string(),
                ),
            ])
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let mut rows = response.json::<Vec<Profile>>().await?;
                Ok(if rows.is_empty() {
                    None
                } else {
                    Some(rows.swap_remove(0))
                })
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => {
                tracing::error!(status = status.as_u16(), "profile lookup rejected by Supabase");
                Err(RepositoryError::UnexpectedStatus(status.as_u16()))
            }
        }
    }
}

// --- Mock (For Tests and Local Runs) ---

/// MockProfileRepository
///
/// An in-memory profile store. Used by the tests to isolate the session and routing logic
/// from any database, and by `PROFILE_BACKEND=memory` for offline local runs.
#[derive(Clone, Default)]
pub struct MockProfileRepository {
    profiles: HashMap<Uuid, Profile>,
    /// When true, every lookup fails as if the store were unreachable.
    pub should_fail: bool,
}

impl MockProfileRepository {
    pub fn new(profiles: impl IntoIterator<Item = Profile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|profile| (profile.id, profile))
                .collect(),
            should_fail: false,
        }
    }

    pub fn new_failing() -> Self {
        Self {
            profiles: HashMap::new(),
            should_fail: true,
        }
    }
}

#[async_trait]
impl ProfileRepository for MockProfileRepository {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, RepositoryError> {
        if self.should_fail {
            return Err(RepositoryError::Unavailable(
                "Mock profile store: simulated outage".to_string(),
            ));
        }
        Ok(self.profiles.get(&id).cloned())
    }
}
