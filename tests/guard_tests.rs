use dashboard_portal::{
    guard::{AccessGuard, Decision, authorize, watch_access},
    models::{Profile, Role},
    redirect::{Navigation, NavigationKind, Navigator},
    registry::AllowedRoles,
    session::{Session, SessionContext},
};
use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex},
    time::Duration,
};
use uuid::Uuid;

// --- Helpers ---

fn profile(role: &str) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        email: format!("{}@example.com", role),
        role: role.to_string(),
        is_active: true,
        ..Profile::default()
    }
}

fn roles(list: &[Role]) -> AllowedRoles {
    list.iter().copied().collect()
}

/// Every subset of the known roles, the empty set included.
fn all_role_sets() -> Vec<AllowedRoles> {
    (0..8u8)
        .map(|mask| {
            Role::ALL
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, role)| *role)
                .collect()
        })
        .collect()
}

#[derive(Default)]
struct RecordingNavigator {
    calls: Mutex<Vec<Navigation>>,
}

impl RecordingNavigator {
    fn calls(&self) -> Vec<Navigation> {
        self.calls.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, navigation: Navigation) {
        self.calls.lock().unwrap().push(navigation);
    }
}

// --- authorize ---

#[test]
fn test_owner_allowed_into_admin_owner_group() {
    let decision = authorize(
        Some(&profile("owner")),
        &roles(&[Role::Admin, Role::Owner]),
        false,
    );
    assert_eq!(decision, Decision::Allow);
}

#[test]
fn test_controller_redirected_from_admin_group() {
    let decision = authorize(Some(&profile("controller")), &roles(&[Role::Admin]), false);
    assert_eq!(decision, Decision::RedirectToHome);
}

#[test]
fn test_absent_profile_always_redirects() {
    for allowed in all_role_sets() {
        assert_eq!(authorize(None, &allowed, false), Decision::RedirectToHome);
    }
}

#[test]
fn test_empty_role_set_admits_any_authenticated_profile() {
    for role in ["admin", "owner", "controller", "auditor"] {
        assert_eq!(
            authorize(Some(&profile(role)), &BTreeSet::new(), false),
            Decision::Allow,
            "{} should pass an open route group",
            role
        );
    }
}

#[test]
fn test_membership_decides_for_non_empty_sets() {
    for allowed in all_role_sets().into_iter().filter(|set| !set.is_empty()) {
        for role in Role::ALL {
            let expected = if allowed.contains(&role) {
                Decision::Allow
            } else {
                Decision::RedirectToHome
            };
            assert_eq!(
                authorize(Some(&profile(role.as_str())), &allowed, false),
                expected
            );
        }
    }
}

#[test]
fn test_unknown_role_is_never_a_member() {
    let everyone = roles(&Role::ALL);
    assert_eq!(
        authorize(Some(&profile("auditor")), &everyone, false),
        Decision::RedirectToHome
    );
}

#[test]
fn test_loading_is_always_pending() {
    let owner = profile("owner");
    for allowed in all_role_sets() {
        assert_eq!(authorize(None, &allowed, true), Decision::Pending);
        assert_eq!(authorize(Some(&owner), &allowed, true), Decision::Pending);
    }
}

#[test]
fn test_authorize_is_idempotent() {
    let controller = profile("controller");
    let allowed = roles(&[Role::Admin]);

    let first = authorize(Some(&controller), &allowed, false);
    for _ in 0..5 {
        assert_eq!(authorize(Some(&controller), &allowed, false), first);
    }
}

// --- AccessGuard ---

#[test]
fn test_guard_issues_single_redirect_for_unchanged_inputs() {
    let mut guard = AccessGuard::new(roles(&[Role::Admin]));
    let session = Session::authenticated(profile("controller"));

    let first = guard.evaluate(&session);
    assert_eq!(first.decision, Decision::RedirectToHome);
    let navigation = first.navigation.expect("first redirect navigates");
    assert_eq!(navigation.target, "/");
    assert_eq!(navigation.kind, NavigationKind::Full);

    for _ in 0..3 {
        let again = guard.evaluate(&session);
        assert_eq!(again.decision, Decision::RedirectToHome);
        assert!(again.navigation.is_none());
    }
}

#[test]
fn test_guard_waits_while_resolving() {
    let mut guard = AccessGuard::new(roles(&[Role::Owner]));

    let outcome = guard.evaluate(&Session::resolving());
    assert_eq!(outcome.decision, Decision::Pending);
    assert!(outcome.navigation.is_none());

    let outcome = guard.evaluate(&Session::authenticated(profile("owner")));
    assert_eq!(outcome.decision, Decision::Allow);
    assert!(outcome.navigation.is_none());
}

#[test]
fn test_guard_rearms_after_leaving_redirect() {
    let mut guard = AccessGuard::new(roles(&[Role::Admin]));

    assert!(guard.evaluate(&Session::anonymous()).navigation.is_some());
    assert_eq!(
        guard.evaluate(&Session::authenticated(profile("admin"))).decision,
        Decision::Allow
    );
    // Signing out again is a new transition into RedirectToHome.
    assert!(guard.evaluate(&Session::anonymous()).navigation.is_some());
}

#[test]
fn test_guard_reevaluates_when_allowed_roles_change() {
    let mut guard = AccessGuard::new(roles(&[Role::Admin, Role::Owner]));
    let session = Session::authenticated(profile("owner"));

    assert_eq!(guard.evaluate(&session).decision, Decision::Allow);

    guard.set_allowed(roles(&[Role::Admin]));
    let outcome = guard.evaluate(&session);
    assert_eq!(outcome.decision, Decision::RedirectToHome);
    assert!(outcome.navigation.is_some());

    guard.set_allowed(BTreeSet::new());
    assert_eq!(guard.evaluate(&session).decision, Decision::Allow);
}

// --- watch_access ---

#[tokio::test]
async fn test_watch_access_follows_session_changes() {
    let ctx = SessionContext::new();
    let navigator = Arc::new(RecordingNavigator::default());

    let task = {
        let navigator = navigator.clone();
        let rx = ctx.subscribe();
        tokio::spawn(async move {
            watch_access(AccessGuard::new(roles(&[Role::Admin])), rx, navigator.as_ref()).await
        })
    };

    // Resolving: nothing happens.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(navigator.calls().is_empty());

    ctx.complete(Ok(profile("admin")));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(navigator.calls().is_empty());

    ctx.sign_out();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(navigator.calls(), vec![Navigation::full("/")]);

    drop(ctx);
    let last = task.await.unwrap();
    assert_eq!(last, Decision::RedirectToHome);
    assert_eq!(navigator.calls().len(), 1);
}

#[tokio::test]
async fn test_watch_access_failed_resolution_redirects() {
    let ctx = SessionContext::new();
    let navigator = RecordingNavigator::default();
    let rx = ctx.subscribe();

    ctx.complete(Err(dashboard_portal::error::SessionError::MissingToken));
    drop(ctx);

    let last = watch_access(AccessGuard::new(BTreeSet::new()), rx, &navigator).await;

    assert_eq!(last, Decision::RedirectToHome);
    assert_eq!(navigator.calls(), vec![Navigation::full("/")]);
}
