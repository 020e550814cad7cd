use std::collections::{BTreeSet, HashMap};

use crate::{
    error::RegistryError,
    models::{NavigationEntry, Role},
};

/// Entry point of the dashboard router.
pub const ROOT_PATH: &str = "/";
/// Where unauthenticated sessions end up.
pub const LOGIN_PATH: &str = "/login";
/// Role whose navigation is served for unknown or absent roles.
pub const DEFAULT_ROLE: Role = Role::Admin;

/// AllowedRoles
///
/// The role set a route group admits. An empty set admits any authenticated profile.
pub type AllowedRoles = BTreeSet<Role>;

/// Route groups and the role names admitted to each.
///
/// This table is part of the external contract of the dashboard and is reproduced verbatim.
/// The more specific `/admin/users` group overrides `/admin`.
pub const ROUTE_GROUPS: &[(&str, &[&str])] = &[
    ("/admin", &["admin"]),
    ("/admin/users", &[]),
    ("/controller", &["admin", "owner", "controller"]),
    ("/help", &["admin", "owner", "controller"]),
    ("/owner", &["admin", "owner"]),
];

// --- Route Access Policies ---

/// RouteAccessPolicy
///
/// A (route group, allowed roles) pair. The group covers its prefix and every path below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAccessPolicy {
    pub prefix: String,
    pub allowed: AllowedRoles,
}

impl RouteAccessPolicy {
    /// Segment-aware prefix match: `/admin` covers `/admin` and `/admin/x`, not `/administrator`.
    pub fn matches(&self, path: &str) -> bool {
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.allowed.is_empty()
    }
}

/// RoutePolicyTable
///
/// Immutable lookup from request path to the policy of its most specific route group.
#[derive(Debug, Clone)]
pub struct RoutePolicyTable {
    policies: Vec<RouteAccessPolicy>,
}

impl RoutePolicyTable {
    /// Parses a group table, rejecting any role name outside the known set.
    pub fn from_groups(groups: &[(&str, &[&str])]) -> Result<Self, RegistryError> {
        let mut policies = Vec::with_capacity(groups.len());

        for (prefix, roles) in groups {
            let allowed = roles
                .iter()
                .map(|name| {
                    name.parse::<Role>().map_err(|role| RegistryError::UnknownRole {
                        group: prefix.to_string(),
                        role,
                    })
                })
                .collect::<Result<AllowedRoles, _>>()?;

            policies.push(RouteAccessPolicy {
                prefix: prefix.to_string(),
                allowed,
            });
        }

        Ok(Self { policies })
    }

    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_groups(ROUTE_GROUPS)
    }

    /// Returns the policy of the longest matching group, or `None` for ungated paths.
    pub fn policy_for(&self, path: &str) -> Option<&RouteAccessPolicy> {
        self.policies
            .iter()
            .filter(|policy| policy.matches(path))
            .max_by_key(|policy| policy.prefix.len())
    }

    /// Whether an authenticated profile with `role` may view `path`.
    pub fn permits(&self, role: Role, path: &str) -> bool {
        match self.policy_for(path) {
            Some(policy) => policy.is_open() || policy.allowed.contains(&role),
            None => true,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteAccessPolicy> {
        self.policies.iter()
    }
}

// --- Role Registry ---

/// RoleConfig
///
/// What the dashboard knows about one role: where it lands and what its sidebar shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleConfig {
    pub home: String,
    pub entries: Vec<NavigationEntry>,
}

/// RoleRegistry
///
/// The static role → {dashboard path, navigation entries} mapping, together with the route
/// policy table it is validated against. Built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    roles: HashMap<Role, RoleConfig>,
    default_role: Role,
    policies: RoutePolicyTable,
}

impl RoleRegistry {
    /// new
    ///
    /// Assembles a registry and validates it. Fails when a known role has no configuration,
    /// or when a role's home path or one of its navigation entries would be refused to that
    /// same role by the policy table.
    pub fn new(
        roles: HashMap<Role, RoleConfig>,
        default_role: Role,
        policies: RoutePolicyTable,
    ) -> Result<Self, RegistryError> {
        for role in Role::ALL {
            let config = roles.get(&role).ok_or(RegistryError::MissingRole(role))?;

            let hrefs = std::iter::once(config.home.as_str())
                .chain(config.entries.iter().map(|entry| entry.href.as_str()));

            for href in hrefs {
                if !policies.permits(role, href) {
                    return Err(RegistryError::UnreachableEntry {
                        role,
                        href: href.to_string(),
                    });
                }
            }
        }

        Ok(Self {
            roles,
            default_role,
            policies,
        })
    }

    /// builtin
    ///
    /// The dashboard's own role table.
    pub fn builtin() -> Result<Self, RegistryError> {
        let help = NavigationEntry::new("Help", "/help", "life-buoy");
        let worksheets =
            NavigationEntry::new("Worksheets", "/controller/worksheets", "clipboard-list");
        let projects = NavigationEntry::new("Projects", "/owner/projects", "folder-kanban");

        let roles = HashMap::from([
            (
                Role::Admin,
                RoleConfig {
                    home: "/admin".to_string(),
                    entries: vec![
                        NavigationEntry::new("Dashboard", "/admin", "layout-dashboard"),
                        NavigationEntry::new("Users", "/admin/users", "users"),
                        projects.clone(),
                        worksheets.clone(),
                        help.clone(),
                    ],
                },
            ),
            (
                Role::Owner,
                RoleConfig {
                    home: "/owner".to_string(),
                    entries: vec![
                        NavigationEntry::new("Dashboard", "/owner", "layout-dashboard"),
                        projects,
                        worksheets.clone(),
                        help.clone(),
                    ],
                },
            ),
            (
                Role::Controller,
                RoleConfig {
                    home: "/controller".to_string(),
                    entries: vec![
                        NavigationEntry::new("Dashboard", "/controller", "layout-dashboard"),
                        worksheets,
                        help,
                    ],
                },
            ),
        ]);

        Self::new(roles, DEFAULT_ROLE, RoutePolicyTable::builtin()?)
    }

    /// entries_for
    ///
    /// Navigation entries for a raw role name. Unknown or absent roles get the default
    /// role's entries.
    pub fn entries_for(&self, role: Option<&str>) -> &[NavigationEntry] {
        let role = role
            .and_then(|name| name.parse::<Role>().ok())
            .unwrap_or(self.default_role);

        self.roles
            .get(&role)
            .or_else(|| self.roles.get(&self.default_role))
            .map(|config| config.entries.as_slice())
            .unwrap_or(&[])
    }

    /// Dashboard path of a known role; `None` for role names outside the set.
    pub fn home_path(&self, role: &str) -> Option<&str> {
        let role = role.parse::<Role>().ok()?;
        self.roles.get(&role).map(|config| config.home.as_str())
    }

    pub fn config_for(&self, role: Role) -> Option<&RoleConfig> {
        self.roles.get(&role)
    }

    pub fn default_role(&self) -> Role {
        self.default_role
    }

    pub fn policies(&self) -> &RoutePolicyTable {
        &self.policies
    }
}
