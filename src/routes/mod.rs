/// Router Module Index
///
/// Splits routing into what anyone may reach and what sits behind the route policy
/// middleware. Access rules live in the registry's route group table, not in the routers.

/// Routes reachable without a session: entry redirect, login, session and navigation APIs.
pub mod public;

/// Dashboard pages. Every route here is gated by `guard::enforce_route_policy`.
pub mod protected;
