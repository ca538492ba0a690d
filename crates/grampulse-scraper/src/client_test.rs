use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

const ENDPOINT: &str = "/api/v1/users/web_profile_info";

/// Client tuned for tests: no backoff sleeps, no inter-page jitter.
fn test_client(server: &MockServer, max_retries: u32) -> InstagramClient {
    InstagramClient::new(5, max_retries, 0, 0, 0)
        .expect("client build")
        .with_base_url(format!("{}{ENDPOINT}", server.uri()))
}

fn page_body(
    post_ids: &[&str],
    has_next_page: bool,
    end_cursor: Option<&str>,
) -> serde_json::Value {
    let edges: Vec<_> = post_ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            json!({
                "node": {
                    "id": id,
                    "shortcode": format!("sc-{id}"),
                    "taken_at_timestamp": 1_700_000_000 + i as i64 * 3600,
                    "edge_media_to_caption": { "edges": [
                        { "node": { "text": format!("post {id} #daily") } }
                    ]},
                    "edge_media_to_comment": { "count": 3 },
                    "edge_liked_by": { "count": 100 + i }
                }
            })
        })
        .collect();

    json!({
        "data": {
            "user": {
                "username": "acme",
                "full_name": "Acme Co",
                "edge_owner_to_timeline_media": {
                    "edges": edges,
                    "page_info": {
                        "has_next_page": has_next_page,
                        "end_cursor": end_cursor
                    }
                }
            }
        }
    })
}

#[tokio::test]
async fn fetches_a_single_page_and_normalizes_posts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(query_param("username", "acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            &["p1", "p2"],
            false,
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_client(&server, 3)
        .fetch_all_posts("acme", None)
        .await
        .expect("scrape");

    assert_eq!(outcome.posts.len(), 2);
    assert_eq!(outcome.posts[0].id, "p1");
    assert_eq!(outcome.posts[0].likes_count, 100);
    assert_eq!(outcome.posts[0].hashtags, vec!["#daily"]);
    assert!(!outcome.cursor.has_next_page);
    // Profile snapshot captured, timeline stripped.
    assert_eq!(outcome.profile["username"], "acme");
    assert!(outcome.profile.get("edge_owner_to_timeline_media").is_none());
}

#[tokio::test]
async fn follows_end_cursor_across_pages() {
    let server = MockServer::start().await;
    // Mount the cursor-specific page first so the generic first-page
    // mock does not swallow it.
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(query_param("username", "acme"))
        .and(query_param("after", "CUR1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            &["p3"],
            false,
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(query_param("username", "acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            &["p1", "p2"],
            true,
            Some("CUR1"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_client(&server, 0)
        .fetch_all_posts("acme", None)
        .await
        .expect("scrape");

    let ids: Vec<&str> = outcome.posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2", "p3"]);
}

#[tokio::test]
async fn resumes_from_a_persisted_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(query_param("after", "SAVED"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            &["p9"],
            false,
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let resume = PageCursor {
        end_cursor: Some("SAVED".to_owned()),
        has_next_page: true,
    };
    let outcome = test_client(&server, 0)
        .fetch_all_posts("acme", Some(resume))
        .await
        .expect("scrape");
    assert_eq!(outcome.posts.len(), 1);
}

#[tokio::test]
async fn exhausted_cursor_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = test_client(&server, 0)
        .fetch_all_posts("acme", Some(PageCursor::exhausted()))
        .await
        .expect("scrape");
    assert!(outcome.posts.is_empty());
    assert!(outcome.profile.is_null());
}

#[tokio::test]
async fn auth_failure_retries_then_gives_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(401))
        .expect(4) // initial attempt + 3 retries
        .mount(&server)
        .await;

    let err = test_client(&server, 3)
        .fetch_all_posts("acme", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::AuthFailed { .. }));
}

#[tokio::test]
async fn not_found_aborts_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server, 3)
        .fetch_all_posts("ghost", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::ProfileNotFound { .. }));
}

#[tokio::test]
async fn server_errors_abort_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server, 3)
        .fetch_all_posts("acme", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ScraperError::UnexpectedStatus { status: 500, .. }
    ));
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server, 3)
        .fetch_all_posts("acme", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::Deserialize { .. }));
}
