//! Integration tests for standalone markup resolution.

use std::sync::Arc;
use std::time::Duration;

use horizon_icons::{
    FieldSettings, FileCache, HttpClient, IconsConfig, MarkupCache, MarkupOptions, MarkupResolver,
    MemoryCache, ReturnFormat,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROCKET: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><path d="M4.5 16.5c-1.5 1.26-2 5-2 5"/></svg>"#;

fn resolver_for(server: &MockServer, cache: Arc<dyn MarkupCache>) -> MarkupResolver {
    MarkupResolver::new(
        Arc::new(HttpClient::new()),
        cache,
        format!("{}/icons/{{name}}.svg", server.uri()),
    )
    .expect("valid template")
}

#[tokio::test]
async fn test_second_resolution_hits_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/icons/rocket.svg"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ROCKET))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = resolver_for(&server, Arc::new(MemoryCache::new()));

    let first = resolver.resolve("rocket", None).await;
    let second = resolver.resolve("rocket", None).await;

    assert!(first.starts_with(r#"<svg class="icon icon-rocket" width="24" height="24" stroke="currentColor""#));
    assert_eq!(first, second);
    // `expect(1)` is verified when the server drops.
}

#[tokio::test]
async fn test_cached_base_is_decorated_per_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/icons/rocket.svg"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ROCKET))
        .expect(1)
        .mount(&server)
        .await;

    let cache = Arc::new(MemoryCache::new());
    let resolver = resolver_for(&server, cache.clone());

    let small = resolver
        .resolve("rocket", Some(&MarkupOptions::new().width(16).height(16)))
        .await;
    let red = resolver
        .resolve(
            "rocket",
            Some(&MarkupOptions::new().class_name("danger").stroke_color("red")),
        )
        .await;

    assert!(small.contains(r#"width="16" height="16""#));
    assert!(red.contains(r#"class="danger""#));
    assert!(red.contains(r#"stroke="red""#));
    assert!(red.contains(r#"width="24""#));

    // The cache holds the undecorated document.
    assert_eq!(cache.get("rocket").as_deref(), Some(ROCKET));
}

#[tokio::test]
async fn test_unsafe_name_never_fetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ROCKET))
        .expect(0)
        .mount(&server)
        .await;

    let resolver = resolver_for(&server, Arc::new(MemoryCache::new()));

    assert_eq!(resolver.resolve("../etc/passwd", None).await, "");
    assert_eq!(resolver.resolve("", None).await, "");
    assert_eq!(resolver.resolve("rocket.svg", None).await, "");
}

#[tokio::test]
async fn test_failures_return_empty_and_are_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/icons/missing.svg"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/icons/blank.svg"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    let cache = Arc::new(MemoryCache::new());
    let resolver = resolver_for(&server, cache.clone());

    assert_eq!(resolver.resolve("missing", None).await, "");
    assert_eq!(resolver.resolve("missing", None).await, "");
    assert_eq!(resolver.resolve("blank", None).await, "");
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_slow_source_times_out_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/icons/slow.svg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(ROCKET)
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = HttpClient::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .expect("client");
    let resolver = MarkupResolver::new(
        Arc::new(client),
        Arc::new(MemoryCache::new()),
        format!("{}/icons/{{name}}.svg", server.uri()),
    )
    .expect("valid template");

    assert_eq!(resolver.resolve("slow", None).await, "");
}

#[tokio::test]
async fn test_file_cache_survives_resolver_restart() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/icons/rocket.svg"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ROCKET))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let first = resolver_for(&server, Arc::new(FileCache::open(dir.path()).unwrap()));
    let markup = first.resolve("rocket", None).await;
    assert!(!markup.is_empty());
    drop(first);

    let second = resolver_for(&server, Arc::new(FileCache::open(dir.path()).unwrap()));
    assert_eq!(second.resolve("rocket", None).await, markup);
}

#[tokio::test]
async fn test_from_config_uses_configured_cache_dir() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lucide/zap.svg"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<svg><path/></svg>"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = IconsConfig {
        markup_url_template: format!("{}/lucide/{{name}}.svg", server.uri()),
        cache_dir: Some(dir.path().join("markup")),
        cache_ttl_secs: 3600,
        ..Default::default()
    };
    let resolver = MarkupResolver::from_config(&config).unwrap();

    assert!(!resolver.resolve("zap", None).await.is_empty());
    assert!(dir.path().join("markup/zap.json").exists());
    assert_eq!(resolver.ttl(), Duration::from_secs(3600));
}

#[tokio::test]
async fn test_svg_return_format() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/icons/rocket.svg"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ROCKET))
        .mount(&server)
        .await;

    let resolver = resolver_for(&server, Arc::new(MemoryCache::new()));
    let settings = FieldSettings {
        return_format: ReturnFormat::Svg,
        ..Default::default()
    };

    let formatted = settings.format_value("rocket", Some(&resolver)).await;
    assert!(formatted.contains("icon icon-rocket"));
    assert_eq!(settings.format_value("", Some(&resolver)).await, "");

    let by_name = FieldSettings::default();
    assert_eq!(by_name.format_value("rocket", Some(&resolver)).await, "rocket");
}
