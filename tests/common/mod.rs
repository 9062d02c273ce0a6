//! Common test utilities shared by the live integration tests.
//!
//! Usage in test files:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Environment
//!
//! - `GANCIO_URL`: instance under test (default `http://localhost:13120`)
//! - `GANCIO_ADMIN_EMAIL` / `GANCIO_ADMIN_PASSWORD`: admin login. When unset,
//!   the instance is assumed fresh and first-run setup is performed.

use base64::Engine;
use gancio_rs::{DatabaseConfig, Event, EventFilter, Gancio, Image, NewEvent, WithEventFields};
use std::env;
use std::future::Future;
use std::time::Duration;
use tokio::sync::OnceCell;

pub const DEFAULT_GANCIO_URL: &str = "http://localhost:13120";

/// Every event created by the tests starts with this prefix so cleanup can find it.
pub const TEST_PREFIX: &str = "Test:";

pub const TEST_PLACE: &str = "Test Place";
pub const TEST_ADDRESS: &str = "123 Test Street";

/// Default timeout for a single integration test.
#[allow(dead_code)]
pub const TEST_TIMEOUT: Duration = Duration::from_secs(60);

/// How long to wait for the instance to come up (it restarts after setup).
const READY_TIMEOUT: Duration = Duration::from_secs(120);

/// Small 1x1 red PNG image encoded as base64
#[allow(dead_code)]
pub const TINY_RED_PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

pub fn gancio_url() -> String {
    env::var("GANCIO_URL").unwrap_or_else(|_| DEFAULT_GANCIO_URL.to_string())
}

/// Admin credentials, resolved once per test binary.
static ADMIN: OnceCell<(String, String)> = OnceCell::const_new();

/// Returns admin credentials, running first-time setup if none are configured.
pub async fn admin_credentials() -> (String, String) {
    ADMIN
        .get_or_init(|| async {
            if let (Ok(email), Ok(password)) = (
                env::var("GANCIO_ADMIN_EMAIL"),
                env::var("GANCIO_ADMIN_PASSWORD"),
            ) {
                return (email, password);
            }

            wait_for_gancio("/").await;
            let client = Gancio::new(gancio_url());
            client
                .setup_db(&DatabaseConfig::default())
                .await
                .expect("setup_db failed");
            let creds = client.setup_restart().await.expect("setup_restart failed");

            // The instance restarts after setup
            tokio::time::sleep(Duration::from_secs(5)).await;
            wait_for_gancio("/api/events").await;

            (creds.email, creds.password)
        })
        .await
        .clone()
}

/// Waits until the instance answers `path` with a status below 500.
pub async fn wait_for_gancio(path: &str) {
    let url = format!("{}{}", gancio_url(), path);
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .expect("readiness client");
    let deadline = tokio::time::Instant::now() + READY_TIMEOUT;

    while tokio::time::Instant::now() < deadline {
        if let Ok(response) = http.get(&url).send().await
            && response.status().as_u16() < 500
        {
            return;
        }
        tokio::time::sleep(Duration::from_secs(2)).await;
    }
    panic!("Gancio not reachable at {url} after {READY_TIMEOUT:?}");
}

/// Creates a client logged in as the admin.
pub async fn admin_client() -> Gancio {
    let (email, password) = admin_credentials().await;
    let mut client = Gancio::new(gancio_url());
    client
        .login(&email, &password)
        .await
        .expect("admin login failed");
    client
}

/// A minimal event at the shared test place, tagged `test`.
#[allow(dead_code)]
pub fn test_event(suffix: &str) -> NewEvent {
    let start = chrono::Utc::now().timestamp() + 86_400;
    NewEvent::new(
        format!("{TEST_PREFIX} Event{suffix}"),
        start,
        TEST_PLACE,
        TEST_ADDRESS,
    )
    .with_tags(["test"])
}

#[allow(dead_code)]
pub fn tiny_png() -> Image {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(TINY_RED_PNG_BASE64)
        .expect("valid base64");
    Image::new(bytes)
        .with_file_name("red.png")
        .with_mime("image/png")
}

/// Deletes every upcoming event whose title starts with [`TEST_PREFIX`].
pub async fn cleanup_events(client: &Gancio) {
    let events: Vec<Event> = client
        .get_events(&EventFilter::new())
        .await
        .unwrap_or_default();
    for event in events.iter().filter(|e| e.title.starts_with(TEST_PREFIX)) {
        let _ = client.delete_event(event.id).await;
    }
}

/// Wraps a future with a timeout, panicking if the timeout is exceeded.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(duration, future)
        .await
        .unwrap_or_else(|_| panic!("Test timed out after {:?}", duration))
}
