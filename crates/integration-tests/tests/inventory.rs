//! Inventory section end to end: dashboard -> cache -> mock backend.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use serde_json::json;
use storeroom_admin::edit::SAVE_FAILED_MESSAGE;
use storeroom_admin::sections::UNAUTHENTICATED_MESSAGE;
use storeroom_admin::sections::inventory::{EMPTY_MESSAGE, FAILED_MESSAGE, UPDATED_EVENT};
use storeroom_core::Role;
use storeroom_integration_tests::{
    Dashboard, MockBackend, eventually, spawn_dashboard, variants,
};

async fn setup(count: u32) -> (MockBackend, Dashboard) {
    let backend = MockBackend::start().await;
    backend.set_variants(variants(count));
    let dashboard = spawn_dashboard(&backend).await;
    (backend, dashboard)
}

/// Unchanged form fields for the first fixture variant.
fn save_form<'a>(tracking: &'a str, inventory: &'a str) -> [(&'static str, &'a str); 6] {
    [
        ("product_id", "101"),
        ("sku", "SKU-001"),
        ("original_tracking", "product"),
        ("original_inventory", "10"),
        ("tracking", tracking),
        ("inventory", inventory),
    ]
}

#[tokio::test]
async fn test_section_lists_first_page() {
    let (backend, dashboard) = setup(60).await;

    let body = dashboard.get_text("/inventory/section").await;

    assert!(body.contains("SKU-001"));
    assert!(body.contains("SKU-050"));
    assert!(!body.contains("SKU-051"));
    assert!(body.contains("1-50 of 60"));
    let first = &backend.variant_requests()[0];
    assert_eq!((first.page, first.limit), (1, 50));
}

#[tokio::test]
async fn test_section_without_token_makes_no_requests() {
    let (backend, dashboard) = setup(3).await;

    let body = dashboard
        .client
        .get(format!("{}/inventory/section", dashboard.url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains(UNAUTHENTICATED_MESSAGE));
    assert_eq!(backend.permission_hits(), 0);
    assert!(backend.variant_requests().is_empty());
}

#[tokio::test]
async fn test_empty_unfiltered_list_is_an_error() {
    let (_backend, dashboard) = setup(0).await;

    let body = dashboard.get_text("/inventory/section").await;

    assert!(body.contains(EMPTY_MESSAGE));
    assert!(!body.contains("variants-table"));
}

#[tokio::test]
async fn test_empty_search_result_renders_table() {
    let (backend, dashboard) = setup(3).await;

    let body = dashboard.get_text("/inventory/section?like=nothing").await;

    assert!(!body.contains(EMPTY_MESSAGE));
    assert!(body.contains("variants-table"));
    assert!(body.contains("No results!"));
    assert_eq!(backend.variant_requests()[0].search, "nothing");
}

#[tokio::test]
async fn test_backend_failure_shows_inline_error() {
    let (backend, dashboard) = setup(3).await;
    backend.fail_reads(true);

    let body = dashboard.get_text("/inventory/section").await;

    assert!(body.contains(FAILED_MESSAGE));
}

#[tokio::test]
async fn test_page_renders_cached_section_inline() {
    let (_backend, dashboard) = setup(3).await;

    let cold = dashboard.get_text("/inventory").await;
    assert!(cold.contains(r#"hx-trigger="load""#));
    assert!(cold.contains(r#"id="bc-sdk-js""#));

    dashboard.get_text("/inventory/section").await;
    let warm = dashboard.get_text("/inventory").await;
    assert!(warm.contains("SKU-001"));
    assert!(!warm.contains(r#"hx-trigger="load""#));
}

#[tokio::test]
async fn test_next_page_is_prefetched() {
    let (backend, dashboard) = setup(120).await;

    dashboard.get_text("/inventory/section").await;
    let prefetched = eventually(Duration::from_secs(2), || {
        backend.variant_requests().iter().any(|r| r.page == 2)
    })
    .await;
    assert!(prefetched);

    let body = dashboard.get_text("/inventory/section?page=2").await;
    assert!(body.contains("SKU-051"));
    let page_two = backend
        .variant_requests()
        .iter()
        .filter(|r| r.page == 2)
        .count();
    assert_eq!(page_two, 1);
}

#[tokio::test]
async fn test_last_page_is_not_prefetched_past() {
    let (backend, dashboard) = setup(120).await;

    dashboard.get_text("/inventory/section?page=3").await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(backend.variant_requests().iter().all(|r| r.page == 3));
}

#[tokio::test]
async fn test_sort_by_sku_descending() {
    let (_backend, dashboard) = setup(3).await;

    let body = dashboard
        .get_text("/inventory/section?sort=sku&dir=desc")
        .await;

    let third = body.find("SKU-003").unwrap();
    let first = body.find("SKU-001").unwrap();
    assert!(third < first);
}

#[tokio::test]
async fn test_viewer_cannot_open_editor() {
    let (backend, dashboard) = setup(3).await;
    backend.set_role(Role::Viewer);

    let body = dashboard.get_text("/inventory/section").await;

    assert!(body.contains("SKU-001"));
    assert!(body.contains(r#"disabled title="Viewers cannot edit variants""#));
    assert!(!body.contains("/inventory/variants/1/edit"));
}

#[tokio::test]
async fn test_admin_row_links_editor() {
    let (_backend, dashboard) = setup(3).await;

    let body = dashboard.get_text("/inventory/section").await;

    assert!(body.contains("/inventory/variants/1/edit?"));
}

#[tokio::test]
async fn test_unchanged_save_makes_no_request() {
    let (backend, dashboard) = setup(3).await;

    let response = dashboard
        .post_form("/inventory/variants/1", &save_form("product", "10"))
        .await;

    assert_eq!(response.status(), 200);
    assert!(response.headers().get("HX-Trigger").is_none());
    assert!(response.text().await.unwrap().is_empty());
    assert!(backend.variant_puts().is_empty());
}

#[tokio::test]
async fn test_count_change_sends_null_tracking() {
    let (backend, dashboard) = setup(3).await;

    let response = dashboard
        .post_form("/inventory/variants/1", &save_form("product", "150"))
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["HX-Trigger"], UPDATED_EVENT);
    assert_eq!(
        backend.variant_puts(),
        [json!({"variantId": 1, "productId": 101, "trackingType": null, "inventoryCount": 150})]
    );
}

#[tokio::test]
async fn test_tracking_change_is_sent() {
    let (backend, dashboard) = setup(3).await;

    dashboard
        .post_form("/inventory/variants/1", &save_form("variant", "10"))
        .await;

    assert_eq!(
        backend.variant_puts(),
        [json!({"variantId": 1, "productId": 101, "trackingType": "variant", "inventoryCount": 10})]
    );
}

#[tokio::test]
async fn test_invalid_count_is_rejected_locally() {
    let (backend, dashboard) = setup(3).await;

    let body = dashboard
        .post_form("/inventory/variants/1", &save_form("product", "12a"))
        .await
        .text()
        .await
        .unwrap();

    assert!(body.contains("inline-error"));
    assert!(body.contains(r#"value="12a""#));
    assert!(backend.variant_puts().is_empty());
}

#[tokio::test]
async fn test_failed_save_keeps_draft() {
    let (backend, dashboard) = setup(3).await;
    backend.fail_writes(true);

    let response = dashboard
        .post_form("/inventory/variants/1", &save_form("product", "150"))
        .await;

    assert!(response.headers().get("HX-Trigger").is_none());
    let body = response.text().await.unwrap();
    assert!(body.contains(SAVE_FAILED_MESSAGE));
    assert!(body.contains(r#"value="150""#));
    assert!(body.contains(r#"id="variant-modal-1""#));
}

#[tokio::test]
async fn test_successful_save_refreshes_list() {
    let (backend, dashboard) = setup(3).await;

    dashboard.get_text("/inventory/section").await;
    dashboard
        .post_form("/inventory/variants/1", &save_form("product", "150"))
        .await;
    dashboard.get_text("/inventory/section").await;

    assert_eq!(backend.variant_requests().len(), 2);
}

#[tokio::test]
async fn test_save_without_session_writes_nothing() {
    let (backend, dashboard) = setup(3).await;

    let response = dashboard
        .client
        .post(format!("{}/inventory/variants/1", dashboard.url))
        .form(&save_form("product", "150"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert!(response.headers().get("HX-Trigger").is_none());
    let body = response.text().await.unwrap();
    assert!(body.contains(UNAUTHENTICATED_MESSAGE));
    assert!(backend.variant_puts().is_empty());
}
