//! Integration tests for the paginated transport.
//!
//! These tests run the transport against a mock server and verify
//! not-found handling, page chaining, provider and network failures,
//! and the headers and query parameters sent on the wire.

use std::time::Duration;

use digitalocean_api::clients::{Transport, LAST_PAGE_HEADER, PAGINATION_ID_HEADER};
use digitalocean_api::rest::registry::{Decoded, ResourceKind};
use digitalocean_api::rest::resources::Droplet;
use digitalocean_api::{
    AccessKeyId, ApiToken, BaseEndpoint, ClientLabel, Credentials, DigitalOceanConfig,
    ResourceError, SecretKey,
};
use serde_json::json;
use wiremock::matchers::{bearer_token, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a bearer-token configuration pointing at `base`.
fn test_config(base: &str) -> DigitalOceanConfig {
    DigitalOceanConfig::builder()
        .base_endpoint(BaseEndpoint::new(base).unwrap())
        .credentials(Credentials::bearer(ApiToken::new("dop_v1_test").unwrap()))
        .build()
        .unwrap()
}

fn droplet_json(id: u64, name: &str) -> serde_json::Value {
    json!({"id": id, "name": name, "status": "active"})
}

fn droplet_names(decoded: Decoded) -> Vec<String> {
    decoded
        .into_vec()
        .into_iter()
        .map(|e| Droplet::try_from(e).unwrap().name)
        .collect()
}

// ============================================================================
// Not Found
// ============================================================================

#[tokio::test]
async fn test_not_found_for_every_kind() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "id": "not_found",
            "message": "The resource you were accessing could not be found."
        })))
        .mount(&server)
        .await;

    let transport = Transport::new(&test_config(&server.uri())).unwrap();

    for kind in ResourceKind::ALL {
        let id = (!kind.is_collection() || kind == ResourceKind::DropletActions).then_some("missing");
        let handle = transport.fetch(kind, id, &[]).unwrap();

        assert!(handle.is_not_found().await, "{kind} should report not found");
        assert_eq!(handle.status().await.unwrap(), 404);
        assert!(handle.decode().await.unwrap().is_none());
        assert!(handle.next_page().await.is_none());
    }
}

#[tokio::test]
async fn test_list_not_found_is_an_error_and_get_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let transport = Transport::new(&test_config(&server.uri())).unwrap();

    let listed = transport
        .list(ResourceKind::DropletActions, Some("42"), &[])
        .await;
    match listed {
        Err(ResourceError::NotFound { kind, id }) => {
            assert_eq!(kind, ResourceKind::DropletActions);
            assert_eq!(id.as_deref(), Some("42"));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }

    let fetched = transport.get(ResourceKind::Droplet, "42").await.unwrap();
    assert!(fetched.is_none());
}

#[tokio::test]
async fn test_singular_kind_without_identifier_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let transport = Transport::new(&test_config(&server.uri())).unwrap();
    let result = transport.fetch(ResourceKind::Droplet, None, &[]);

    assert!(matches!(result, Err(ResourceError::InvalidRequest(_))));
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_three_page_chain_follows_continuation_headers() {
    let server = MockServer::start().await;

    // Mounted most-specific first: the first matching mock answers.
    Mock::given(method("GET"))
        .and(path("/droplets"))
        .and(query_param("paginationId", "T2"))
        .and(query_param("page", "3"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(LAST_PAGE_HEADER, "true")
                .set_body_json(json!({"droplets": [droplet_json(5, "e")]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/droplets"))
        .and(query_param("paginationId", "T1"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(PAGINATION_ID_HEADER, "T2")
                .insert_header(LAST_PAGE_HEADER, "false")
                .set_body_json(json!({"droplets": [droplet_json(3, "c"), droplet_json(4, "d")]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/droplets"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(PAGINATION_ID_HEADER, "T1")
                .insert_header(LAST_PAGE_HEADER, "false")
                .set_body_json(json!({"droplets": [droplet_json(1, "a"), droplet_json(2, "b")]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = Transport::new(&test_config(&server.uri())).unwrap();
    let first = transport.fetch(ResourceKind::Droplets, None, &[]).unwrap();

    let page_one = first.decode().await.unwrap().unwrap();
    assert_eq!(droplet_names(page_one), vec!["a", "b"]);

    let second = first.next_page().await.expect("second page");
    let page_two = second.decode().await.unwrap().unwrap();
    assert_eq!(droplet_names(page_two), vec!["c", "d"]);

    let third = second.next_page().await.expect("third page");
    let page_three = third.decode().await.unwrap().unwrap();
    assert_eq!(droplet_names(page_three), vec!["e"]);
    assert!(third.next_page().await.is_none());
    assert!(third.is_complete().await);

    let requests = server.received_requests().await.unwrap();
    let pages: Vec<Option<String>> = requests
        .iter()
        .map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "page")
                .map(|(_, v)| v.into_owned())
        })
        .collect();
    assert_eq!(pages, vec![None, Some("2".to_string()), Some("3".to_string())]);
}

#[tokio::test]
async fn test_collect_follows_body_links() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/regions"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "regions": [{"slug": "sfo3"}],
            "links": {}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/regions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "regions": [{"slug": "nyc3"}, {"slug": "ams3"}],
            "links": {"pages": {"next": "https://api.digitalocean.com/v2/regions?page=2&per_page=2"}}
        })))
        .mount(&server)
        .await;

    let transport = Transport::new(&test_config(&server.uri())).unwrap();
    let regions = transport.list(ResourceKind::Regions, None, &[]).await.unwrap();

    let slugs: Vec<String> = regions
        .into_iter()
        .map(|e| digitalocean_api::Region::try_from(e).unwrap().slug)
        .collect();
    assert_eq!(slugs, vec!["nyc3", "ams3", "sfo3"]);
}

#[tokio::test]
async fn test_collection_requests_carry_page_size_and_caller_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/droplets"))
        .and(query_param("per_page", "25"))
        .and(query_param("tag_name", "web"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"droplets": []})))
        .expect(1)
        .mount(&server)
        .await;

    let config = DigitalOceanConfig::builder()
        .base_endpoint(BaseEndpoint::new(server.uri()).unwrap())
        .credentials(Credentials::bearer(ApiToken::new("dop_v1_test").unwrap()))
        .page_size(25)
        .build()
        .unwrap();
    let transport = Transport::new(&config).unwrap();

    let droplets = transport
        .list(ResourceKind::Droplets, None, &[("tag_name", "web")])
        .await
        .unwrap();
    assert!(droplets.is_empty());
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_provider_error_keeps_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sizes"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "id": "unprocessable_entity",
            "message": "per_page is out of range"
        })))
        .mount(&server)
        .await;

    let transport = Transport::new(&test_config(&server.uri())).unwrap();
    let handle = transport.fetch(ResourceKind::Sizes, None, &[]).unwrap();

    match handle.decode().await {
        Err(ResourceError::Provider(error)) => {
            assert_eq!(error.status, Some(422));
            assert_eq!(error.message, "per_page is out of range");
            assert!(error.body.contains("unprocessable_entity"));
        }
        other => panic!("expected provider error, got {other:?}"),
    }
    assert!(handle.is_complete().await);
}

#[tokio::test]
async fn test_embedded_error_on_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images/99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "forbidden",
            "message": "You do not have access to this image."
        })))
        .mount(&server)
        .await;

    let transport = Transport::new(&test_config(&server.uri())).unwrap();
    let result = transport.get(ResourceKind::Image, "99").await;

    match result {
        Err(ResourceError::Provider(error)) => {
            assert_eq!(error.status, Some(200));
            assert_eq!(error.message, "You do not have access to this image.");
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_network_error_resolves_handle() {
    let transport = Transport::new(&test_config("http://127.0.0.1:1")).unwrap();
    let handle = transport.fetch(ResourceKind::Regions, None, &[]).unwrap();

    let result = handle.decode().await;
    assert!(matches!(result, Err(ResourceError::Http(_))));
    assert!(handle.is_complete().await);
    assert!(handle.next_page().await.is_none());
}

#[tokio::test]
async fn test_wait_timeout_before_and_after_arrival() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account/keys"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_json(json!({"ssh_keys": []})),
        )
        .mount(&server)
        .await;

    let transport = Transport::new(&test_config(&server.uri())).unwrap();
    let handle = transport.fetch(ResourceKind::Keys, None, &[]).unwrap();

    assert!(!handle.wait_timeout(Duration::from_millis(10)).await);
    assert!(handle.wait_timeout(Duration::from_secs(5)).await);
    assert!(handle.is_resolved());
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/regions"))
        .and(bearer_token("dop_v1_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"regions": []})))
        .expect(1)
        .mount(&server)
        .await;

    let transport = Transport::new(&test_config(&server.uri())).unwrap();
    transport.list(ResourceKind::Regions, None, &[]).await.unwrap();
}

#[tokio::test]
async fn test_signed_requests_carry_signature_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/droplets/7"))
        .and(header("x-access-key", "AK123"))
        .and(header_exists("x-signature"))
        .and(header_exists("x-timestamp"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"droplet": droplet_json(7, "signed")})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = DigitalOceanConfig::builder()
        .base_endpoint(BaseEndpoint::new(server.uri()).unwrap())
        .credentials(Credentials::signed(
            AccessKeyId::new("AK123").unwrap(),
            SecretKey::new("s3cr3t").unwrap(),
            ClientLabel::new("fleet").unwrap(),
        ))
        .build()
        .unwrap();
    let transport = Transport::new(&config).unwrap();

    let droplet = transport.get(ResourceKind::Droplet, "7").await.unwrap().unwrap();
    assert_eq!(Droplet::try_from(droplet).unwrap().name, "signed");
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_many_handles_resolve_under_a_small_permit_pool() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(20))
                .set_body_json(json!({"size": {"slug": "s-1vcpu-1gb"}})),
        )
        .mount(&server)
        .await;

    let config = DigitalOceanConfig::builder()
        .base_endpoint(BaseEndpoint::new(server.uri()).unwrap())
        .credentials(Credentials::bearer(ApiToken::new("dop_v1_test").unwrap()))
        .max_concurrent_requests(2)
        .build()
        .unwrap();
    let transport = Transport::new(&config).unwrap();

    let handles: Vec<_> = (0..10)
        .map(|i| {
            transport
                .fetch(ResourceKind::Size, Some(&format!("size-{i}")), &[])
                .unwrap()
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.status().await.unwrap(), 200);
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 10);
}
