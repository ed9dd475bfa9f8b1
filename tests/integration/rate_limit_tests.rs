//! Rate limiting behavior of the service against a mocked server

use std::time::Instant;

use pubmed_search::{RateLimiter, SearchService, ServiceConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn empty_esearch_body() -> serde_json::Value {
    serde_json::json!({
        "esearchresult": {
            "count": "0",
            "retmax": "10",
            "retstart": "0",
            "idlist": [],
        }
    })
}

#[test]
fn test_default_rates_follow_api_key_presence() {
    let limiter = RateLimiter::ncbi_default();
    assert!((limiter.rate() - 3.0).abs() < f64::EPSILON);

    let keyed = RateLimiter::ncbi_with_key();
    assert!((keyed.rate() - 10.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_requests_beyond_burst_are_paced_not_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_esearch_body()))
        .expect(8)
        .mount(&mock_server)
        .await;

    // Burst capacity of 5, then one token every 200ms. Eight distinct
    // searches (each a single ESearch call) need 3 paced tokens.
    let service = SearchService::with_config(
        ServiceConfig::new()
            .with_base_url(mock_server.uri())
            .with_rate_limit(5.0),
    );

    let start = Instant::now();
    for i in 0..8 {
        let summaries = service
            .search(&format!("term {i}"), None, 0)
            .await
            .unwrap();
        assert!(summaries.is_empty());
    }
    let elapsed = start.elapsed();

    assert!(
        elapsed.as_millis() >= 500,
        "expected pacing beyond burst, elapsed {elapsed:?}"
    );
}

#[tokio::test]
async fn test_clones_share_one_bucket() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_esearch_body()))
        .expect(6)
        .mount(&mock_server)
        .await;

    let service = SearchService::with_config(
        ServiceConfig::new()
            .with_base_url(mock_server.uri())
            .with_rate_limit(4.0),
    );

    let start = Instant::now();
    let mut handles = Vec::new();
    for i in 0..6 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.search(&format!("concurrent {i}"), None, 0).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    let elapsed = start.elapsed();

    // 6 calls at 4/s with burst 4: the last two wait on refill
    assert!(
        elapsed.as_millis() >= 400,
        "expected shared pacing across clones, elapsed {elapsed:?}"
    );
}

#[tokio::test]
async fn test_cache_hits_bypass_the_limiter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_esearch_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    // One token per second: repeated identical searches would stall for
    // seconds if cache hits consumed tokens.
    let service = SearchService::with_config(
        ServiceConfig::new()
            .with_base_url(mock_server.uri())
            .with_rate_limit(1.0),
    );

    let start = Instant::now();
    for _ in 0..5 {
        service.search("same term", None, 0).await.unwrap();
    }

    assert!(start.elapsed().as_millis() < 900);
}
