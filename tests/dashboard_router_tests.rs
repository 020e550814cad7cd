use dashboard_portal::{
    RoleRegistry,
    dashboard::{DashboardRouter, RootState, landing_path},
    error::SessionError,
    models::Profile,
    redirect::{Navigation, NavigationKind, Navigator},
    session::{Session, SessionContext},
};
use std::{sync::Mutex, time::Duration};
use uuid::Uuid;

fn registry() -> RoleRegistry {
    RoleRegistry::builtin().unwrap()
}

fn profile(role: &str) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        email: "someone@example.com".to_string(),
        role: role.to_string(),
        is_active: true,
        ..Profile::default()
    }
}

#[derive(Default)]
struct RecordingNavigator {
    calls: Mutex<Vec<Navigation>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, navigation: Navigation) {
        self.calls.lock().unwrap().push(navigation);
    }
}

#[test]
fn test_admin_at_root_goes_to_admin_dashboard() {
    let registry = registry();
    let mut router = DashboardRouter::new(&registry);

    let navigation = router
        .on_session(&Session::authenticated(profile("admin")))
        .expect("settled session navigates");

    assert_eq!(navigation.target, "/admin");
    assert_eq!(navigation.kind, NavigationKind::Full);
    assert_eq!(router.state(), RootState::AuthenticatedWithProfile);
}

#[test]
fn test_each_role_lands_on_its_home() {
    let registry = registry();

    for (role, home) in [("admin", "/admin"), ("owner", "/owner"), ("controller", "/controller")] {
        let mut router = DashboardRouter::new(&registry);
        let navigation = router.on_session(&Session::authenticated(profile(role))).unwrap();
        assert_eq!(navigation.target, home);
    }
}

#[test]
fn test_anonymous_goes_to_login() {
    let registry = registry();
    let mut router = DashboardRouter::new(&registry);

    let navigation = router.on_session(&Session::anonymous()).unwrap();

    assert_eq!(navigation, Navigation::full("/login"));
    assert_eq!(router.state(), RootState::Unauthenticated);
}

#[test]
fn test_unknown_role_goes_to_login() {
    let registry = registry();
    let session = Session::authenticated(profile("auditor"));

    assert_eq!(landing_path(&registry, &session), "/login");

    let mut router = DashboardRouter::new(&registry);
    assert_eq!(router.on_session(&session).unwrap().target, "/login");
}

#[test]
fn test_resolving_does_not_navigate() {
    let registry = registry();
    let mut router = DashboardRouter::new(&registry);

    assert!(router.on_session(&Session::resolving()).is_none());
    assert_eq!(router.state(), RootState::Resolving);
}

#[test]
fn test_navigation_is_one_shot() {
    let registry = registry();
    let mut router = DashboardRouter::new(&registry);

    assert!(router.on_session(&Session::anonymous()).is_some());
    assert!(router.on_session(&Session::anonymous()).is_none());
    assert!(
        router
            .on_session(&Session::authenticated(profile("owner")))
            .is_none()
    );
    assert_eq!(router.state(), RootState::Unauthenticated);
}

#[test]
fn test_unmounted_router_discards_late_result() {
    let registry = registry();
    let mut router = DashboardRouter::new(&registry);

    assert!(router.on_session(&Session::resolving()).is_none());
    router.unmount();

    assert!(
        router
            .on_session(&Session::authenticated(profile("admin")))
            .is_none()
    );
    assert_eq!(router.state(), RootState::Resolving);
}

#[tokio::test]
async fn test_run_waits_for_resolution() {
    let registry = registry();
    let ctx = SessionContext::new();
    let navigator = RecordingNavigator::default();
    let rx = ctx.subscribe();

    let router = DashboardRouter::new(&registry);
    let run = router.run(rx, &navigator);

    let resolve = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        ctx.complete(Ok(profile("owner")));
    };

    let (navigation, ()) = tokio::join!(run, resolve);

    assert_eq!(navigation, Some(Navigation::full("/owner")));
    assert_eq!(
        *navigator.calls.lock().unwrap(),
        vec![Navigation::full("/owner")]
    );
}

#[tokio::test]
async fn test_run_treats_failed_resolution_as_unauthenticated() {
    let registry = registry();
    let ctx = SessionContext::new();
    let navigator = RecordingNavigator::default();

    ctx.complete(Err(SessionError::Timeout));

    let navigation = DashboardRouter::new(&registry)
        .run(ctx.subscribe(), &navigator)
        .await;

    assert_eq!(navigation, Some(Navigation::full("/login")));
}

#[tokio::test]
async fn test_run_cancelled_before_resolution_never_navigates() {
    let registry = registry();
    let ctx = SessionContext::new();
    let navigator = RecordingNavigator::default();

    // The view unmounts while the session is still resolving.
    let outcome = tokio::time::timeout(
        Duration::from_millis(20),
        DashboardRouter::new(&registry).run(ctx.subscribe(), &navigator),
    )
    .await;
    assert!(outcome.is_err());

    ctx.complete(Ok(profile("admin")));
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(navigator.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_run_returns_none_when_context_dropped_while_resolving() {
    let registry = registry();
    let ctx = SessionContext::new();
    let navigator = RecordingNavigator::default();
    let rx = ctx.subscribe();
    drop(ctx);

    let navigation = DashboardRouter::new(&registry).run(rx, &navigator).await;

    assert!(navigation.is_none());
    assert!(navigator.calls.lock().unwrap().is_empty());
}
