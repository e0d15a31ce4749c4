//! Integration tests for the full client flow: login, feed paging, like
//! toggling, profile lookup, and logout teardown, all against the mock
//! transport.

use std::sync::{Arc, Mutex};

use imageline::client::http::MockTransport;
use imageline::config::ClientConfig;
use imageline::{AppController, MemoryTokenStore, Presentation};

fn page_json(prefix: &str, count: usize) -> serde_json::Value {
    let photos: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "id": format!("{prefix}-{i}"),
                "created_at": "2024-01-01T00:00:00Z",
                "width": 100,
                "height": 50,
                "description": null,
                "liked_by_user": false,
                "urls": {"thumb": "t", "full": "f"}
            })
        })
        .collect();
    serde_json::Value::Array(photos)
}

fn token_json() -> serde_json::Value {
    serde_json::json!({
        "access_token": "tok-123",
        "token_type": "Bearer",
        "scope": "public",
        "created_at": 1700000000
    })
}

struct Harness {
    app: AppController,
    transport: Arc<MockTransport>,
    presented: Arc<Mutex<Vec<Presentation>>>,
}

fn harness() -> Harness {
    let transport = Arc::new(MockTransport::new());
    let presented = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&presented);

    let app = AppController::new(
        ClientConfig::new("access", "secret"),
        transport.clone(),
        Box::new(MemoryTokenStore::new()),
        Box::new(move |view| {
            sink.lock().unwrap().push(view);
        }),
    )
    .unwrap();

    Harness {
        app,
        transport,
        presented,
    }
}

#[tokio::test]
async fn login_should_store_the_exchanged_token() {
    let mut h = harness();

    h.transport.push_json(token_json());
    h.app.login("code-1", Box::new(|_| {}));
    h.app.run_until_idle().await;

    assert_eq!(h.app.token().as_deref(), Some("tok-123"));
}

#[tokio::test]
async fn two_pages_should_present_nineteen_feed_lines() {
    let mut h = harness();

    h.transport.push_json(token_json());
    h.app.login("code-1", Box::new(|_| {}));
    h.app.run_until_idle().await;

    h.transport.push_json(page_json("p1", 10));
    h.app.load_next_page(Box::new(|_| {}));
    h.app.run_until_idle().await;

    h.transport.push_json(page_json("p2", 10));
    h.app.load_next_page(Box::new(|_| {}));
    h.app.run_until_idle().await;

    assert_eq!(h.app.photos().len(), 19);

    // Each page completion re-presented the feed through the event bus
    let presented = h.presented.lock().unwrap();
    let feed_renders: Vec<usize> = presented
        .iter()
        .filter_map(|view| match view {
            Presentation::Feed(lines) => Some(lines.len()),
            _ => None,
        })
        .collect();
    assert_eq!(feed_renders, vec![9, 19]);
}

#[tokio::test]
async fn like_toggle_should_flip_the_first_photo() {
    let mut h = harness();

    h.transport.push_json(token_json());
    h.app.login("code-1", Box::new(|_| {}));
    h.app.run_until_idle().await;

    h.transport.push_json(page_json("p1", 10));
    h.app.load_next_page(Box::new(|_| {}));
    h.app.run_until_idle().await;
    assert!(!h.app.photos()[0].is_liked);

    h.transport.push_json(serde_json::json!({
        "photo": {
            "id": "p1-1",
            "created_at": null,
            "width": 100,
            "height": 50,
            "description": null,
            "liked_by_user": true,
            "urls": {}
        }
    }));
    h.app.toggle_like(0, Box::new(|_| {}));
    h.app.run_until_idle().await;

    assert!(h.app.photos()[0].is_liked);
    let requests = h.transport.requests();
    let like_request = requests.last().unwrap();
    assert_eq!(like_request.method.as_str(), "POST");
    assert!(like_request.url.ends_with("/photos/p1-1/like"));
}

#[tokio::test]
async fn like_toggle_without_a_token_should_present_an_alert() {
    let mut h = harness();

    h.app.toggle_like(0, Box::new(|_| {}));

    let presented = h.presented.lock().unwrap();
    assert!(matches!(presented[0], Presentation::Alert(_)));
    assert_eq!(h.transport.request_count(), 0);
}

#[tokio::test]
async fn profile_and_avatar_should_present_together() {
    let mut h = harness();

    h.transport.push_json(token_json());
    h.app.login("code-1", Box::new(|_| {}));
    h.app.run_until_idle().await;

    h.transport.push_json(serde_json::json!({
        "username": "jdoe",
        "first_name": "Jane",
        "last_name": "Doe",
        "bio": "photographer"
    }));
    h.app.load_profile(Box::new(|_| {}));
    h.app.run_until_idle().await;

    h.transport.push_json(serde_json::json!({
        "profile_image": {"large": "https://img.example/l.png"}
    }));
    let username = h.app.profile().unwrap().username.clone();
    h.app.load_avatar(&username, Box::new(|_| {}));
    h.app.run_until_idle().await;

    let presented = h.presented.lock().unwrap();
    let profile_renders: Vec<&Vec<String>> = presented
        .iter()
        .filter_map(|view| match view {
            Presentation::Profile(lines) => Some(lines),
            _ => None,
        })
        .collect();

    // First render has no avatar yet; the second includes it
    assert_eq!(profile_renders.len(), 2);
    assert_eq!(profile_renders[0].len(), 3);
    assert!(profile_renders[1]
        .iter()
        .any(|line| line.contains("img.example")));
}

#[tokio::test]
async fn logout_should_leave_only_the_root_subscription() {
    let mut h = harness();

    h.transport.push_json(token_json());
    h.app.login("code-1", Box::new(|_| {}));
    h.app.run_until_idle().await;

    h.transport.push_json(page_json("p1", 10));
    h.app.load_next_page(Box::new(|_| {}));
    h.app.run_until_idle().await;

    h.app.logout();

    assert!(h.app.is_logged_out());
    assert!(h.app.token().is_none());
    assert!(h.app.photos().is_empty());
    assert_eq!(h.app.event_bus().registration_count(), 1);
    assert_eq!(h.app.event_bus().pending_count(), 0);
}

#[tokio::test]
async fn duplicate_login_code_should_not_issue_a_second_exchange() {
    let mut h = harness();

    h.transport.push_json(token_json());
    let outcomes = Arc::new(Mutex::new(Vec::new()));

    let slot = Arc::clone(&outcomes);
    h.app.login(
        "code-1",
        Box::new(move |result| {
            slot.lock().unwrap().push(result.is_ok());
        }),
    );
    let slot = Arc::clone(&outcomes);
    h.app.login(
        "code-1",
        Box::new(move |result| {
            slot.lock().unwrap().push(result.is_ok());
        }),
    );
    h.app.run_until_idle().await;

    // The duplicate fails immediately, the original succeeds
    assert_eq!(*outcomes.lock().unwrap(), vec![false, true]);
    assert_eq!(h.transport.request_count(), 1);
    assert_eq!(h.app.token().as_deref(), Some("tok-123"));
}
