//! Users section and role editing end to end.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use storeroom_admin::sections::users::EMPTY_MESSAGE;
use storeroom_core::Role;
use storeroom_integration_tests::{
    Dashboard, MockBackend, fragment, spawn_dashboard, users,
};

const DISABLED_SELECT: &str = r#"aria-label="Role" disabled"#;

async fn setup() -> (MockBackend, Dashboard) {
    let backend = MockBackend::start().await;
    backend.set_users(users());
    let dashboard = spawn_dashboard(&backend).await;
    (backend, dashboard)
}

fn role_cell<'a>(body: &'a str, user_id: i64) -> &'a str {
    fragment(body, &format!(r#"id="role-cell-{user_id}""#), "</form>")
}

#[tokio::test]
async fn test_section_lists_users() {
    let (backend, dashboard) = setup().await;

    let body = dashboard.get_text("/users/section").await;

    assert!(body.contains("owner@store.test"));
    assert!(body.contains("viewer@store.test"));
    assert!(body.contains("2023-11-14 22:13:20 UTC"));
    let first = &backend.user_requests()[0];
    assert_eq!((first.page, first.limit), (1, 10));
}

#[tokio::test]
async fn test_search_is_forwarded() {
    let (backend, dashboard) = setup().await;

    let body = dashboard.get_text("/users/section?search=admin").await;

    assert!(body.contains("admin@store.test"));
    assert!(!body.contains("viewer@store.test"));
    assert_eq!(backend.user_requests()[0].search, "admin");
}

#[tokio::test]
async fn test_empty_unfiltered_list_is_an_error() {
    let (backend, dashboard) = setup().await;
    backend.set_users(Vec::new());

    let body = dashboard.get_text("/users/section").await;

    assert!(body.contains(EMPTY_MESSAGE));
}

#[tokio::test]
async fn test_owner_cell_is_locked() {
    let (_backend, dashboard) = setup().await;

    let body = dashboard.get_text("/users/section").await;

    let owner = role_cell(&body, 1);
    assert!(owner.contains(DISABLED_SELECT));
    assert!(owner.contains("Owner"));
    assert!(!role_cell(&body, 5).contains(DISABLED_SELECT));
}

#[tokio::test]
async fn test_viewer_actor_cannot_change_roles() {
    let (backend, dashboard) = setup().await;
    backend.set_role(Role::Viewer);

    let body = dashboard.get_text("/users/section").await;

    assert!(role_cell(&body, 2).contains(DISABLED_SELECT));
    assert!(role_cell(&body, 5).contains(DISABLED_SELECT));
}

#[tokio::test]
async fn test_role_change_applies() {
    let (backend, dashboard) = setup().await;

    let response = dashboard
        .post_form("/users/5/role", &[("role", "admin"), ("original", "viewer")])
        .await;

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains(r#"id="role-cell-5""#));
    assert!(body.contains(r#"<option value="admin" selected>"#));
    assert_eq!(backend.user_puts(), [json!({"userId": 5, "role": "admin"})]);
}

#[tokio::test]
async fn test_failed_role_change_reverts() {
    let (backend, dashboard) = setup().await;
    backend.fail_writes(true);

    let response = dashboard
        .post_form("/users/5/role", &[("role", "admin"), ("original", "viewer")])
        .await;

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains(r#"<option value="viewer" selected>"#));
    assert!(!body.contains(r#"<option value="admin" selected>"#));
    assert_eq!(backend.user_puts().len(), 1);
}

#[tokio::test]
async fn test_owner_cannot_be_assigned() {
    let (backend, dashboard) = setup().await;

    let response = dashboard
        .post_form("/users/5/role", &[("role", "owner"), ("original", "viewer")])
        .await;

    assert_eq!(response.status(), 400);
    assert!(backend.user_puts().is_empty());
}

#[tokio::test]
async fn test_role_change_refreshes_list() {
    let (backend, dashboard) = setup().await;

    dashboard.get_text("/users/section").await;
    dashboard
        .post_form("/users/5/role", &[("role", "admin"), ("original", "viewer")])
        .await;
    dashboard.get_text("/users/section").await;

    assert_eq!(backend.user_requests().len(), 2);
}

#[tokio::test]
async fn test_role_change_without_session_writes_nothing() {
    let (backend, dashboard) = setup().await;

    let response = dashboard
        .client
        .post(format!("{}/users/5/role", dashboard.url))
        .form(&[("role", "admin"), ("original", "viewer")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains(r#"<option value="viewer" selected>"#));
    assert!(body.contains(DISABLED_SELECT));
    assert!(backend.user_puts().is_empty());
    assert_eq!(backend.permission_hits(), 0);
}
