//! Provider contract tests against mock upstreams.
//!
//! These tests verify the HTTP request shape each provider sends, how
//! responses are normalized, and that every upstream failure (error status,
//! malformed body, timeout) degrades to an empty result instead of an error.

use std::sync::Arc;
use std::time::Duration;

use scout_search::config::DEFAULT_USER_AGENT;
use scout_search::geo::{DisabledResolver, GeoResolver, NominatimResolver};
use scout_search::providers::{ArxivProvider, GithubProvider, WebProvider};
use scout_search::{AttrValue, Coordinates, FetchParams, Provider, SearchConfig};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> SearchConfig {
    let mut config = SearchConfig::default();
    config.github.base_url = server.uri();
    config.arxiv.base_url = server.uri();
    config.web.base_url = server.uri();
    config.geocoder.base_url = server.uri();
    config.request_timeout_seconds = 1;
    config.geocoder.timeout_seconds = 1;
    config
}

fn search_items(count: usize) -> serde_json::Value {
    let items: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "login": format!("dev{i}"),
                "id": 1000 + i,
                "avatar_url": format!("https://avatars.example.com/u/{i}"),
                "html_url": format!("https://github.com/dev{i}"),
                "type": "User"
            })
        })
        .collect();
    json!({ "total_count": count, "incomplete_results": false, "items": items })
}

fn user_detail(location: &str) -> serde_json::Value {
    json!({
        "login": "dev",
        "name": "Dev Eloper",
        "company": "@acme",
        "location": location,
        "bio": "Writes Rust.",
        "hireable": true,
        "public_repos": 12,
        "followers": 34,
        "following": 5
    })
}

// ────────────────────────────────────────────────────────────────────────────
// GitHub
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn github_enriches_only_the_first_ten_hits() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(query_param("q", "rust"))
        .and(query_param("per_page", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_items(15)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/users/[^/]+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_detail("")))
        .expect(10)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let provider = GithubProvider::new(&config, Arc::new(DisabledResolver)).expect("provider");
    let entities = provider
        .try_fetch(&FetchParams::new("rust").with_limit(15))
        .await
        .expect("fetch succeeds");

    assert_eq!(entities.len(), 15);
    for (i, entity) in entities.iter().enumerate() {
        assert_eq!(entity.id, format!("github:{}", 1000 + i));
        let enriched = entity.attr("enriched") == Some(&AttrValue::Bool(true));
        assert_eq!(enriched, i < 10, "item {i}");
    }
    assert_eq!(entities[0].name, "Dev Eloper");
    assert_eq!(entities[0].headline, "acme");
    assert_eq!(entities[12].name, "dev12");
    assert_eq!(entities[12].headline, "@dev12");
    assert_eq!(entities[12].metrics.get("followers"), Some(&0.0));
}

#[tokio::test]
async fn github_failed_detail_degrades_single_item() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_items(3)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/dev1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/users/dev[02]$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_detail("")))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let provider = GithubProvider::new(&config, Arc::new(DisabledResolver)).expect("provider");
    let entities = provider.fetch(&FetchParams::new("rust")).await;

    assert_eq!(entities.len(), 3);
    assert_eq!(entities[0].name, "Dev Eloper");
    assert_eq!(entities[1].name, "dev1");
    assert_eq!(entities[1].attr("enriched"), Some(&AttrValue::Bool(false)));
    assert_eq!(entities[2].name, "Dev Eloper");
}

#[tokio::test]
async fn github_sends_bearer_token_when_configured() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(header("authorization", "Bearer s3cret"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_items(0)))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.github.token = Some("s3cret".into());
    let provider = GithubProvider::new(&config, Arc::new(DisabledResolver)).expect("provider");
    let entities = provider.try_fetch(&FetchParams::new("rust")).await.expect("fetch");
    assert!(entities.is_empty());
}

#[tokio::test]
async fn github_geocodes_location_and_computes_distance() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_items(1)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/dev0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_detail("London")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "London"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "1"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "lat": "51.5074", "lon": "-0.1278", "display_name": "London, Greater London, England" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let geocoder: Arc<dyn GeoResolver> =
        Arc::new(NominatimResolver::new(&config.geocoder, &config.user_agent).expect("resolver"));
    let provider = GithubProvider::new(&config, geocoder).expect("provider");

    let new_york = Coordinates::new(40.7128, -74.0060);
    let entities = provider
        .try_fetch(&FetchParams::new("rust").with_location(new_york))
        .await
        .expect("fetch");

    let entity = &entities[0];
    assert_eq!(entity.location.as_deref(), Some("London"));
    assert_eq!(
        entity.attr("geo_label").and_then(AttrValue::as_str),
        Some("London, Greater London, England")
    );
    let km = entity
        .attr("distance_km")
        .and_then(AttrValue::as_f64)
        .expect("distance present");
    assert!((km - 5570.0).abs() < 55.7, "got {km}");
}

#[tokio::test]
async fn github_geocode_miss_leaves_distance_null() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_items(1)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/dev0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_detail("Atlantis")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let geocoder: Arc<dyn GeoResolver> =
        Arc::new(NominatimResolver::new(&config.geocoder, &config.user_agent).expect("resolver"));
    let provider = GithubProvider::new(&config, geocoder).expect("provider");

    let entities = provider
        .try_fetch(&FetchParams::new("rust").with_location(Coordinates::new(0.0, 0.0)))
        .await
        .expect("fetch");

    let entity = &entities[0];
    assert_eq!(entity.location.as_deref(), Some("Atlantis"));
    assert_eq!(entity.attr("distance_km"), Some(&AttrValue::Null));
    assert_eq!(entity.attr("lat"), Some(&AttrValue::Null));
}

#[tokio::test]
async fn github_blank_location_is_not_geocoded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_items(1)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/dev0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_detail("   ")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let geocoder: Arc<dyn GeoResolver> =
        Arc::new(NominatimResolver::new(&config.geocoder, &config.user_agent).expect("resolver"));
    let provider = GithubProvider::new(&config, geocoder).expect("provider");
    let entities = provider.fetch(&FetchParams::new("rust")).await;

    assert_eq!(entities.len(), 1);
    assert!(entities[0].location.is_none());
}

#[tokio::test]
async fn github_failures_yield_empty_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(query_param("q", "status"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(query_param("q", "malformed"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(query_param("q", "slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(search_items(1))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = config_for(&server);
    let provider = GithubProvider::new(&config, Arc::new(DisabledResolver)).expect("provider");
    for query in ["status", "malformed", "slow"] {
        let params = FetchParams::new(query);
        assert!(provider.try_fetch(&params).await.is_err(), "{query} should fail");
        assert!(provider.fetch(&params).await.is_empty(), "{query} should degrade");
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Geocoder
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn geocoder_caches_repeated_lookups() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Berlin"))
        .and(query_param("email", "ops@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "lat": 52.52, "lon": 13.405, "display_name": "Berlin, Deutschland" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.geocoder.email = Some("ops@example.com".into());
    let resolver = NominatimResolver::new(&config.geocoder, &config.user_agent).expect("resolver");

    let first = resolver.resolve("Berlin").await.expect("hit");
    let second = resolver.resolve("  berlin ").await.expect("cached hit");
    assert_eq!(first, second);
    assert_eq!(first.label, "Berlin, Deutschland");
}

#[tokio::test]
async fn geocoder_error_status_resolves_to_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let resolver = NominatimResolver::new(&config.geocoder, &config.user_agent).expect("resolver");
    assert!(resolver.resolve("Paris").await.is_none());
}

// ────────────────────────────────────────────────────────────────────────────
// arXiv
// ────────────────────────────────────────────────────────────────────────────

const ATOM_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <title type="html">ArXiv Query</title>
  <entry>
    <id>http://arxiv.org/abs/1234</id>
    <title>Foo Bar Paper</title>
    <summary>An abstract.</summary>
    <author><name>Jane Doe</name></author>
    <arxiv:primary_category term="cs.AI" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.AI" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/5678</id>
    <title>Second Paper</title>
    <author><name>John Roe</name></author>
  </entry>
</feed>"#;

#[tokio::test]
async fn arxiv_queries_all_fields_and_maps_first_author() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/query"))
        .and(query_param("search_query", "all:foo bar"))
        .and(query_param("start", "0"))
        .and(query_param("max_results", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ATOM_FEED))
        .expect(1)
        .mount(&server)
        .await;

    let provider = ArxivProvider::new(&config_for(&server)).expect("provider");
    let entities = provider
        .try_fetch(&FetchParams::new("foo bar").with_limit(5))
        .await
        .expect("fetch");

    assert_eq!(entities.len(), 2);
    assert_eq!(entities[0].id, "arxiv:http://arxiv.org/abs/1234");
    assert_eq!(entities[0].name, "Jane Doe");
    assert_eq!(entities[0].headline, "Foo Bar Paper");
    assert_eq!(
        entities[0].attr("primary_category").and_then(AttrValue::as_str),
        Some("cs.AI")
    );
    assert_eq!(entities[1].name, "John Roe");
}

#[tokio::test]
async fn arxiv_limit_is_clamped_to_ceiling() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/query"))
        .and(query_param("max_results", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ATOM_FEED))
        .expect(1)
        .mount(&server)
        .await;

    let provider = ArxivProvider::new(&config_for(&server)).expect("provider");
    let entities = provider.fetch(&FetchParams::new("graphs").with_limit(500)).await;
    assert_eq!(entities.len(), 2);
}

#[tokio::test]
async fn arxiv_failures_yield_empty_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/query"))
        .and(query_param("search_query", "all:status"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .and(query_param("search_query", "all:malformed"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<feed><entry></feed>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .and(query_param("search_query", "all:slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(ATOM_FEED)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let provider = ArxivProvider::new(&config_for(&server)).expect("provider");
    for query in ["status", "malformed", "slow"] {
        let params = FetchParams::new(query);
        assert!(provider.try_fetch(&params).await.is_err(), "{query} should fail");
        assert!(provider.fetch(&params).await.is_empty(), "{query} should degrade");
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Web
// ────────────────────────────────────────────────────────────────────────────

const RESULTS_HTML: &str = r#"<!DOCTYPE html>
<html><body>
<div class="result results_links results_links_deep web-result">
  <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.example.com%2Fjane&amp;rut=x">Jane Doe - Staff Engineer | Example</a>
  <div class="result__snippet">Jane builds compilers.</div>
</div>
</body></html>"#;

#[tokio::test]
async fn web_posts_profile_query_and_parses_hits() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/html/"))
        .and(body_string_contains("q=jane+doe+profile"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_HTML))
        .expect(1)
        .mount(&server)
        .await;

    let provider = WebProvider::new(&config_for(&server));
    let entities = provider
        .try_fetch(&FetchParams::new("jane doe"))
        .await
        .expect("fetch");

    assert_eq!(entities.len(), 1);
    let entity = &entities[0];
    assert!(entity.id.starts_with("web:"));
    assert_eq!(entity.name, "Jane Doe");
    assert_eq!(entity.headline, "Staff Engineer · Example");
    assert_eq!(entity.url.as_deref(), Some("https://www.example.com/jane"));
    assert_eq!(entity.attr("domain").and_then(AttrValue::as_str), Some("example.com"));
}

#[tokio::test]
async fn web_failures_yield_empty_results() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/html/"))
        .and(body_string_contains("status"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/html/"))
        .and(body_string_contains("slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(RESULTS_HTML)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let provider = WebProvider::new(&config_for(&server));
    for query in ["status", "slow"] {
        let params = FetchParams::new(query);
        assert!(provider.try_fetch(&params).await.is_err(), "{query} should fail");
        assert!(provider.fetch(&params).await.is_empty(), "{query} should degrade");
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Connection refused
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn refused_connections_yield_empty_results() {
    let mut config = SearchConfig::default();
    config.github.base_url = "http://127.0.0.1:9".into();
    config.arxiv.base_url = "http://127.0.0.1:9".into();
    config.web.base_url = "http://127.0.0.1:9".into();
    config.request_timeout_seconds = 1;

    let providers: Vec<Box<dyn Provider>> = vec![
        Box::new(GithubProvider::new(&config, Arc::new(DisabledResolver)).expect("github")),
        Box::new(ArxivProvider::new(&config).expect("arxiv")),
        Box::new(WebProvider::new(&config)),
    ];
    let params = FetchParams::new("rust");
    for provider in providers {
        assert!(provider.fetch(&params).await.is_empty(), "{}", provider.name());
    }
}
