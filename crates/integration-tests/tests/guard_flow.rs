//! Navigation outcomes before and after sign-in.

#![allow(clippy::unwrap_used)]

use pos_console::{Decision, Navigator, RouteTable, Screen, decide};
use pos_console_integration_tests::{StubAuthenticator, credentials, file_store, token_for};

#[tokio::test]
async fn test_cashier_journey() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(
        StubAuthenticator::issuing(token_for("cajero@tienda.ec", &["Usuario"])),
        &dir.path().join("session.json"),
    );
    let routes = RouteTable::builtin();
    let navigator = Navigator::new(&routes);

    let before = navigator.navigate("/app/pos", &store.session());
    assert_eq!(before.destination.screen, Some(Screen::Login));

    store
        .login(&credentials("cajero@tienda.ec", "Abc123"))
        .await
        .unwrap();
    let session = store.session();

    assert_eq!(
        navigator.navigate("/login", &session).destination.screen,
        Some(Screen::Pos)
    );
    assert_eq!(
        decide(&routes.resolve("/app/admin"), &session),
        Decision::RedirectToRoleHome(Screen::Pos)
    );
    assert_eq!(
        navigator.navigate("/app", &session).destination.path,
        "/app/pos"
    );

    store.logout();
    assert_eq!(
        navigator.navigate("/app/pos", &store.session()).destination.screen,
        Some(Screen::Login)
    );
}

#[tokio::test]
async fn test_admin_journey() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(
        StubAuthenticator::issuing(token_for("admin@tienda.ec", &["Admin"])),
        &dir.path().join("session.json"),
    );
    store
        .login(&credentials("admin@tienda.ec", "Abc123"))
        .await
        .unwrap();
    let session = store.session();
    let routes = RouteTable::builtin();
    let navigator = Navigator::new(&routes);

    for path in ["/", "/login", "/login/"] {
        let navigation = navigator.navigate(path, &session);
        assert_eq!(navigation.destination.screen, Some(Screen::Admin), "{path}");
    }
    assert!(navigator.navigate("/app/admin", &session).is_direct());
    assert!(navigator.navigate("/app/pos", &session).is_direct());
}

#[tokio::test]
async fn test_token_without_roles_gets_default_role() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(
        StubAuthenticator::issuing("not.a-jwt.at-all"),
        &dir.path().join("session.json"),
    );
    let session = store
        .login(&credentials("cajero@tienda.ec", "Abc123"))
        .await
        .unwrap();

    assert!(session.roles().contains(pos_console_core::DEFAULT_ROLE));
    assert_eq!(session.user_email(), Some("cajero@tienda.ec"));
    assert_eq!(
        decide(&RouteTable::builtin().resolve("/app/admin"), &session),
        Decision::RedirectToRoleHome(Screen::Pos)
    );
}

#[test]
fn test_custom_route_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routes.yaml");
    std::fs::write(
        &path,
        r"
- path: /
  name: home
- path: /login
  name: login
- path: /caja
  name: pos
  requires_auth: true
- path: /gestion
  requires_admin: true
  children:
    - path: reportes
      name: admin
",
    )
    .unwrap();

    let routes = RouteTable::from_file(&path).unwrap();
    let reports = routes.resolve("/gestion/reportes");
    assert!(reports.requires_admin);
    assert!(reports.requires_auth);

    let navigation = Navigator::new(&routes).navigate("/gestion/reportes", &pos_console::Session::empty());
    let paths: Vec<_> = navigation.trail.iter().map(|s| s.path.as_str()).collect();
    assert_eq!(paths, ["/gestion/reportes", "/caja", "/login"]);
}
