//! Live tests against a running Gancio instance.
//!
//! Run with:
//!
//! ```bash
//! GANCIO_URL=http://localhost:13120 cargo test --test integration_tests -- --ignored --test-threads=1
//! ```

mod common;

use common::*;
use gancio_rs::{EventFilter, EventUpdate, Gancio, GancioError, WithEventFields};
use std::time::Duration;

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
#[ignore = "Requires a running Gancio instance"]
async fn test_login() {
    let (email, password) = admin_credentials().await;
    let mut client = Gancio::new(gancio_url());

    let login = client.login(&email, &password).await.expect("login failed");

    assert!(!login.access_token.is_empty());
    assert_eq!(login.username, "admin");
    assert_eq!(client.access_token(), Some(login.access_token.as_str()));
    assert!(client.refresh_token().is_some());
}

#[tokio::test]
#[ignore = "Requires a running Gancio instance"]
async fn test_login_invalid_credentials() {
    let mut client = Gancio::new(gancio_url());

    let err = client
        .login("bad@example.com", "wrong")
        .await
        .expect_err("login should fail");

    assert!(err.status_code().is_some(), "expected Api error: {err:?}");
    assert!(!client.is_authenticated());
}

// =============================================================================
// User
// =============================================================================

#[tokio::test]
#[ignore = "Requires a running Gancio instance"]
async fn test_get_user() {
    let client = admin_client().await;
    let user = client.get_user().await.expect("get_user failed");
    assert!(user.email.is_some());
    assert!(!user.settings.is_null());
}

// =============================================================================
// Events
// =============================================================================

#[tokio::test]
#[ignore = "Requires a running Gancio instance"]
async fn test_create_and_get_event() {
    let client = admin_client().await;

    with_timeout(TEST_TIMEOUT, async {
        let created = client
            .create_event(
                test_event("")
                    .with_description("<p>integration</p>")
                    .with_tags(["x", "y"])
                    .with_online_locations(["https://stream.example.org"]),
            )
            .await
            .expect("create failed");
        assert_eq!(created.title, "Test: Event");
        assert!(!created.slug.is_empty());

        let fetched = client.get_event(&created.slug).await.expect("get failed");
        assert_eq!(fetched.title, "Test: Event");
        assert_eq!(
            fetched.place.as_ref().map(|p| p.name.as_str()),
            Some(TEST_PLACE)
        );
        assert_eq!(fetched.tags.len(), 2);
        assert_eq!(fetched.online_locations, vec!["https://stream.example.org"]);
        assert!(
            fetched
                .description
                .as_deref()
                .is_some_and(|d| d.contains("integration"))
        );
    })
    .await;

    cleanup_events(&client).await;
}

#[tokio::test]
#[ignore = "Requires a running Gancio instance"]
async fn test_update_event_keeps_unset_fields() {
    let client = admin_client().await;

    with_timeout(TEST_TIMEOUT, async {
        let created = client.create_event(test_event("")).await.expect("create failed");

        let updated = client
            .update_event(EventUpdate::new(created.id).with_title("Test: Updated Event"))
            .await
            .expect("update failed");
        assert_eq!(updated.title, "Test: Updated Event");

        let fetched = client.get_event(&created.slug).await.expect("get failed");
        assert_eq!(fetched.title, "Test: Updated Event");
        assert_eq!(
            fetched.place.as_ref().map(|p| p.name.as_str()),
            Some(TEST_PLACE)
        );
    })
    .await;

    cleanup_events(&client).await;
}

#[tokio::test]
#[ignore = "Requires a running Gancio instance"]
async fn test_delete_event() {
    let client = admin_client().await;

    let created = client.create_event(test_event("")).await.expect("create failed");
    client.delete_event(created.id).await.expect("delete failed");
    tokio::time::sleep(Duration::from_secs(1)).await;

    let err = client
        .get_event(&created.slug)
        .await
        .expect_err("event should be gone");
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
#[ignore = "Requires a running Gancio instance"]
async fn test_confirm_event() {
    let client = admin_client().await;

    let created = client.create_event(test_event(" Pending")).await.expect("create failed");
    client.confirm_event(created.id).await.expect("confirm failed");

    cleanup_events(&client).await;
}

#[tokio::test]
#[ignore = "Requires a running Gancio instance"]
async fn test_get_events_with_filters() {
    let client = admin_client().await;

    client
        .create_event(test_event(" Filtered"))
        .await
        .expect("create failed");
    let events = client
        .get_events(&EventFilter::new().with_tags(["test"]))
        .await
        .expect("list failed");
    assert!(events.iter().any(|e| e.title.contains("Filtered")));

    cleanup_events(&client).await;
}

#[tokio::test]
#[ignore = "Requires a running Gancio instance"]
async fn test_create_event_with_image() {
    let client = admin_client().await;

    let created = client
        .create_event(test_event(" With Image").with_image(tiny_png()))
        .await
        .expect("create failed");
    let fetched = client.get_event(&created.slug).await.expect("get failed");
    assert!(fetched.has_media());

    cleanup_events(&client).await;
}

#[tokio::test]
#[ignore = "Requires a running Gancio instance"]
async fn test_update_event_with_image() {
    let client = admin_client().await;

    let created = client.create_event(test_event("")).await.expect("create failed");
    client
        .update_event(
            EventUpdate::new(created.id)
                .with_place_name(TEST_PLACE)
                .with_place_address(TEST_ADDRESS)
                .with_image(tiny_png()),
        )
        .await
        .expect("update failed");
    let fetched = client.get_event(&created.slug).await.expect("get failed");
    assert!(fetched.has_media());

    cleanup_events(&client).await;
}

// =============================================================================
// Places
// =============================================================================

#[tokio::test]
#[ignore = "Requires a running Gancio instance"]
async fn test_search_and_get_place() {
    let client = admin_client().await;
    client.create_event(test_event("")).await.expect("create failed");

    let results = client.search_place(TEST_PLACE).await.expect("search failed");
    assert!(!results.is_empty());
    assert_eq!(results[0].name, TEST_PLACE);

    let place = client
        .get_place(TEST_PLACE)
        .await
        .expect("get_place failed")
        .expect("place should exist");
    assert_eq!(place.name, TEST_PLACE);

    let place_events = client
        .get_place_events(TEST_PLACE)
        .await
        .expect("get_place_events failed")
        .expect("place should exist");
    assert_eq!(place_events.place.name, TEST_PLACE);

    assert!(
        client
            .get_place_events("No Such Place Anywhere")
            .await
            .expect("404 should map to None")
            .is_none()
    );

    cleanup_events(&client).await;
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
#[ignore = "Requires a running Gancio instance"]
async fn test_error_on_missing_event() {
    let client = admin_client().await;
    let err = client
        .get_event("nonexistent-slug-that-does-not-exist")
        .await
        .expect_err("should fail");

    match err {
        GancioError::Api { status_code, .. } => assert_eq!(status_code, 404),
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
#[ignore = "Requires a running Gancio instance"]
async fn test_access_token_constructor() {
    let client = Gancio::with_access_token(gancio_url(), "fake-token");
    let err = client.get_user().await.expect_err("fake token should be rejected");
    assert!(err.status_code().is_some());
}

#[test]
#[ignore = "Requires a running Gancio instance"]
fn test_blocking_client_lists_events() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (email, password) = runtime.block_on(admin_credentials());
    drop(runtime);

    let mut client = gancio_rs::blocking::Gancio::new(gancio_url()).unwrap();
    client.login(&email, &password).expect("login failed");
    client
        .get_events(&EventFilter::new().with_max(5))
        .expect("list failed");
}
