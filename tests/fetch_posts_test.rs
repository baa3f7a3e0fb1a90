//! Integration tests for fetching and extracting posts.

use std::fmt;
use std::sync::{Arc, Mutex};

use fetch_reddit::{ClientConfig, Error, Query, RedditClient};
use serde_json::{json, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Collects the messages of WARN events.
#[derive(Clone, Default)]
struct WarningCollector(Arc<Mutex<Vec<String>>>);

impl WarningCollector {
    fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for WarningCollector {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            self.0.lock().unwrap().push(visitor.0);
        }
    }
}

fn create_test_client(server: &MockServer) -> RedditClient {
    RedditClient::with_config(ClientConfig::for_testing(&server.uri()))
        .expect("Failed to create client")
}

/// Subreddit listing with a link post, a self post and a stickied text post.
fn sample_listing() -> Value {
    json!({
        "kind": "Listing",
        "data": {
            "after": null,
            "children": [
                {
                    "kind": "t3",
                    "data": {
                        "id": "abc123",
                        "title": "Never **gonna** give you up",
                        "url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
                        "created_utc": 1_500_000_000.0,
                        "author": "rick",
                        "score": 42,
                        "subreddit": "videos",
                        "thumbnail": "default",
                        "permalink": "/r/videos/comments/abc123/never_gonna/",
                        "num_comments": 7,
                        "is_self": false
                    }
                },
                {
                    "kind": "t3",
                    "data": {
                        "id": "def456",
                        "title": "Reading list",
                        "url": "https://www.reddit.com/r/videos/comments/def456/reading_list/",
                        "created_utc": 1_500_000_100.0,
                        "author": "reader",
                        "score": 5,
                        "subreddit": "videos",
                        "thumbnail": "self",
                        "permalink": "/r/videos/comments/def456/reading_list/",
                        "is_self": true,
                        "over_18": false,
                        "selftext": "check this [cool](http://example.com/a) and http://example.com/b"
                    }
                },
                {
                    "kind": "t3",
                    "data": {
                        "id": "ghi789",
                        "title": "Rules",
                        "is_self": true,
                        "selftext": "No links here"
                    }
                }
            ]
        }
    })
}

#[tokio::test]
async fn test_fetch_listing_extracts_submissions_and_self_post_links() {
    init_tracing();
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/videos.json"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_listing()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let query = Query::from([("limit".to_string(), "3".to_string())]);
    let page = client
        .fetch_posts("r/videos", &query)
        .await
        .expect("fetch_posts failed");

    assert_eq!(page.posts.len(), 3);
    assert!(!page.has_more());

    let video = &page.posts[0];
    assert_eq!(video.id, "abc123");
    assert_eq!(video.title.as_deref(), Some("Never **gonna** give you up"));
    assert_eq!(video.num_comments(), Some(7));
    assert_eq!(
        video.thumbnail.as_deref(),
        Some("http://img.youtube.com/vi/dQw4w9WgXcQ/default.jpg")
    );
    assert_eq!(
        video.permalink,
        format!("{}/r/videos/comments/abc123/never_gonna/", mock_server.uri())
    );
    assert_eq!(video.created.timestamp(), 1_500_000_000);

    let first = &page.posts[1];
    assert_eq!(first.id, "def456:11");
    assert_eq!(first.title.as_deref(), Some("cool"));
    assert_eq!(first.url, "http://example.com/a");
    assert_eq!(first.comment_id(), Some("def456"));
    assert_eq!(first.thumbnail, None);

    let second = &page.posts[2];
    assert_eq!(second.id, "def456:44");
    assert_eq!(second.url, "http://example.com/b");
    // The rest of the text still contains a link, so no title is inferred
    assert_eq!(second.title, None);
}

#[tokio::test]
async fn test_fetch_thread_walks_comment_replies() {
    init_tracing();
    let thread = json!([
        {
            "kind": "Listing",
            "data": { "children": [ {
                "kind": "t3",
                "data": {
                    "id": "p1",
                    "title": "Share your favourite crates",
                    "url": "https://www.reddit.com/r/rust/comments/p1/",
                    "is_self": true,
                    "selftext": ""
                }
            } ] }
        },
        {
            "kind": "Listing",
            "data": { "children": [
                {
                    "kind": "t1",
                    "data": {
                        "id": "c1",
                        "body": "[serde\\]s](https://serde.rs)",
                        "permalink": "/r/rust/comments/p1/_/c1/",
                        "replies": {
                            "kind": "Listing",
                            "data": { "children": [ {
                                "kind": "t1",
                                "data": {
                                    "id": "c2",
                                    "body": "Async runtime https://tokio.rs",
                                    "replies": ""
                                }
                            } ] }
                        }
                    }
                },
                {
                    "kind": "t1",
                    "data": { "id": "c3", "body": "no links", "replies": "" }
                }
            ] }
        }
    ]);

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/rust/comments/p1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(thread))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let page = client
        .fetch_posts("/r/rust/comments/p1", &Query::new())
        .await
        .expect("fetch_posts failed");

    assert_eq!(page.posts.len(), 2);
    assert!(!page.has_more());

    assert_eq!(page.posts[0].id, "c1:0");
    assert_eq!(page.posts[0].title.as_deref(), Some("serde]s"));
    assert_eq!(
        page.posts[0].permalink,
        format!("{}/r/rust/comments/p1/_/c1/", mock_server.uri())
    );

    assert_eq!(page.posts[1].id, "c2:14");
    assert_eq!(page.posts[1].title.as_deref(), Some("Async runtime"));
    assert_eq!(
        page.posts[1].permalink,
        format!("{}/r/rust/comments/p1/c2", mock_server.uri())
    );
}

#[tokio::test]
async fn test_unrecognized_payload_yields_no_posts() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/rust/about.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "kind": "t5", "data": { "id": "x" } })),
        )
        .mount(&mock_server)
        .await;

    let page = create_test_client(&mock_server)
        .fetch_posts("/r/rust/about", &Query::new())
        .await
        .expect("fetch_posts failed");
    assert!(page.posts.is_empty());
    assert!(!page.has_more());
}

#[tokio::test]
async fn test_invalid_json_is_parse_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/rust.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>down for maintenance</html>"))
        .mount(&mock_server)
        .await;

    let result = create_test_client(&mock_server)
        .fetch_posts("/r/rust", &Query::new())
        .await;
    assert!(matches!(result, Err(Error::Parse { .. })), "got {result:?}");
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/private.json"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "reason": "private", "error": 403 })),
        )
        .mount(&mock_server)
        .await;

    let result = create_test_client(&mock_server)
        .fetch_posts("/r/private", &Query::new())
        .await;
    match result {
        Err(Error::Status { status, url }) => {
            assert_eq!(status.as_u16(), 403);
            assert!(url.ends_with("/r/private.json"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_failure_is_network_error() {
    // Reserve a free port, then close it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = RedditClient::with_config(ClientConfig::for_testing(&uri)).unwrap();
    let result = client.fetch_posts("/r/rust", &Query::new()).await;
    assert!(matches!(result, Err(Error::Network { .. })), "got {result:?}");
}

#[tokio::test]
#[allow(deprecated)]
async fn test_get_posts_forwards_to_fetch_posts() {
    let warnings = WarningCollector::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(warnings.clone()));
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/videos.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_listing()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let page = create_test_client(&mock_server)
        .get_posts("/r/videos", &Query::new())
        .await
        .expect("get_posts failed");
    assert_eq!(page.posts.len(), 3);

    let warnings = warnings.messages();
    let deprecations: Vec<_> = warnings
        .iter()
        .filter(|m| m.contains("get_posts is deprecated"))
        .collect();
    assert_eq!(deprecations.len(), 1, "got {warnings:?}");
    assert!(deprecations[0].contains("fetch_posts"));
}
