//! Cache behavior of the service: hits, expiry, and reuse across
//! operations

use std::time::Duration;

use pubmed_search::{ArticleSummary, ResponseCache, SearchService, ServiceConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn esearch_body(ids: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "esearchresult": {
            "count": ids.len().to_string(),
            "retmax": "10",
            "retstart": "0",
            "idlist": ids,
        }
    })
}

fn esummary_body() -> serde_json::Value {
    serde_json::json!({
        "result": {
            "uids": ["12345678"],
            "12345678": {
                "uid": "12345678",
                "pubdate": "2021 Mar",
                "source": "BMJ",
                "authors": [{"name": "Smith J", "authtype": "Author"}],
                "title": "A Cached Article",
                "volume": "372",
                "issue": "",
                "pages": "n123"
            }
        }
    })
}

fn service_with_ttl(mock_server: &MockServer, ttl: Duration) -> SearchService {
    SearchService::with_config(
        ServiceConfig::new()
            .with_base_url(mock_server.uri())
            .with_rate_limit(1000.0)
            .with_cache_ttl(ttl),
    )
}

#[tokio::test]
async fn test_repeat_search_within_ttl_is_served_from_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(&["12345678"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esummary_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_with_ttl(&mock_server, Duration::from_secs(3600));
    let first = service.search("diabetes", None, 0).await.unwrap();
    let second = service.search("diabetes", None, 0).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].pmid, "12345678");
}

#[tokio::test]
async fn test_expired_entry_forces_refetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(&["12345678"])))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esummary_body()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let service = service_with_ttl(&mock_server, Duration::from_millis(100));

    service.search("diabetes", None, 0).await.unwrap();
    tokio::time::sleep(Duration::from_millis(250)).await;
    service.search("diabetes", None, 0).await.unwrap();
}

#[tokio::test]
async fn test_different_pages_are_distinct_entries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(&[])))
        .expect(2)
        .mount(&mock_server)
        .await;

    let service = service_with_ttl(&mock_server, Duration::from_secs(3600));
    service.search("diabetes", None, 0).await.unwrap();
    service.search("diabetes", None, 1).await.unwrap();
}

#[tokio::test]
async fn test_citations_reuse_cached_summary_search() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(&["12345678"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esummary_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_with_ttl(&mock_server, Duration::from_secs(3600));
    service.search("diabetes", None, 0).await.unwrap();

    let citations = service.search_citations("diabetes", None).await.unwrap();
    assert_eq!(citations.len(), 1);
    assert_eq!(
        citations[0].link,
        "https://pubmed.ncbi.nlm.nih.gov/12345678/"
    );
}

#[tokio::test]
async fn test_guideline_and_summary_caches_do_not_collide() {
    // The guideline term differs from the plain term, but even with
    // identical terms the endpoint prefix keeps the entries apart.
    let cache = pubmed_search::cache::create_cache(&pubmed_search::CacheConfig::default());
    let summary = vec![ArticleSummary {
        pmid: "1".to_string(),
        title: "Summary".to_string(),
        authors: vec![],
        journal: String::new(),
        year: None,
        volume: None,
        issue: None,
        pages: None,
    }];

    cache
        .insert("pubmed:summary:retmax=10:page=0:term=(x)".to_string(), summary)
        .await;
    cache.sync().await;

    assert!(cache
        .get("pubmed:guidelines:retmax=10:page=0:term=(x)")
        .await
        .is_none());
    assert!(cache
        .get("pubmed:summary:retmax=10:page=0:term=(x)")
        .await
        .is_some());
}

#[tokio::test]
async fn test_service_cache_accessor_reflects_inserts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(&["12345678"])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esummary_body()))
        .mount(&mock_server)
        .await;

    let service = service_with_ttl(&mock_server, Duration::from_secs(3600));
    assert_eq!(service.cache().entry_count(), 0);

    service.search("diabetes", None, 0).await.unwrap();
    service.cache().sync().await;
    assert_eq!(service.cache().entry_count(), 1);

    service.cache().clear().await;
    service.cache().sync().await;
    assert_eq!(service.cache().entry_count(), 0);
}

#[tokio::test]
async fn test_memory_cache_round_trip() {
    let cache: ResponseCache =
        pubmed_search::cache::create_cache(&pubmed_search::CacheConfig::default());

    assert!(cache.get("missing").await.is_none());

    let value = vec![ArticleSummary {
        pmid: "42".to_string(),
        title: "Round Trip".to_string(),
        authors: vec!["Doe J".to_string()],
        journal: "J Test".to_string(),
        year: Some(2024),
        volume: None,
        issue: None,
        pages: None,
    }];
    cache.insert("key".to_string(), value.clone()).await;
    cache.sync().await;

    assert_eq!(cache.get("key").await, Some(value));
}
