use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Roles ---

/// Role
///
/// The closed set of dashboard roles. An unauthenticated visitor has no role at all,
/// which is modelled as the absence of a `Profile` rather than a fourth variant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    Owner,
    Controller,
}

impl Role {
    /// Every known role, in registry order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Owner, Role::Controller];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Owner => "owner",
            Role::Controller => "controller",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "owner" => Ok(Role::Owner),
            "controller" => Ok(Role::Controller),
            other => Err(other.to_string()),
        }
    }
}

// --- Profiles ---

/// Profile
///
/// The identity record stored in the `public.profiles` table, keyed by the auth user id.
/// The role is kept as the raw stored string: rows may carry a role this build does not know,
/// and callers decide how to treat that through `Profile::known_role`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Profile {
    // Primary Key, also the Foreign Key to auth.users.
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    // The RBAC field: 'admin', 'owner' or 'controller'.
    pub role: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl Profile {
    /// Returns the parsed role, or `None` when the stored string is outside the known set.
    pub fn known_role(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    /// Full name when present, otherwise the email address.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

// --- Navigation ---

/// NavigationEntry
///
/// One sidebar link. Entries are built once when the registry is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct NavigationEntry {
    pub title: String,
    pub href: String,
    pub icon: String,
}

impl NavigationEntry {
    pub fn new(title: &str, href: &str, icon: &str) -> Self {
        Self {
            title: title.to_string(),
            href: href.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// NavItem
///
/// A `NavigationEntry` as rendered for a particular location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct NavItem {
    pub title: String,
    pub href: String,
    pub icon: String,
    /// True only for the entry whose href equals the current path exactly.
    pub active: bool,
}

/// AccountMenu
///
/// The account affordance shown at the bottom of the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum AccountMenu {
    /// No profile in the session: offer a link to the login page.
    Login { href: String },
    /// Authenticated: show who is signed in.
    User {
        display_name: String,
        email: String,
        role: String,
    },
}

/// NavigationView
///
/// Output schema of the navigation composer (GET /api/navigation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct NavigationView {
    pub entries: Vec<NavItem>,
    pub account: AccountMenu,
}

// --- Page & Session Schemas (Output) ---

/// PageView
///
/// The body served for every protected dashboard page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PageView {
    pub title: String,
    pub path: String,
    pub navigation: NavigationView,
}

/// SessionView
///
/// Output schema for GET /api/session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SessionView {
    pub profile: Option<Profile>,
    /// Where the dashboard router would send this session.
    pub home: String,
    pub account: AccountMenu,
}
