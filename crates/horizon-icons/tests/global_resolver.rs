//! The template-facing `resolve_icon_markup` entry point.
//!
//! Kept in its own test binary because it installs a process-wide resolver.

use std::sync::Arc;

use horizon_icons::{
    HttpClient, MarkupOptions, MarkupResolver, MemoryCache, resolve_icon_markup,
};
use horizon_icons_net::runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_resolve_icon_markup_through_installed_resolver() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("horizon_icons=debug,horizon_icons_net=debug")
        .with_test_writer()
        .try_init();

    assert!(MarkupResolver::global().is_none());
    assert_eq!(resolve_icon_markup("rocket", None), "");

    let server = runtime::block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/icons/rocket.svg"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<svg><path/></svg>"))
            .expect(1)
            .mount(&server)
            .await;
        server
    });

    let resolver = MarkupResolver::new(
        Arc::new(HttpClient::new()),
        Arc::new(MemoryCache::new()),
        format!("{}/icons/{{name}}.svg", server.uri()),
    )
    .expect("valid template");
    MarkupResolver::install_global(Arc::new(resolver));

    assert_eq!(
        resolve_icon_markup("rocket", None),
        r#"<svg class="icon icon-rocket" width="24" height="24" stroke="currentColor"><path/></svg>"#
    );
    assert_eq!(
        resolve_icon_markup("Rocket", Some(&MarkupOptions::new().width(48).height(48))),
        r#"<svg class="icon icon-rocket" width="48" height="48" stroke="currentColor"><path/></svg>"#
    );
    assert_eq!(resolve_icon_markup("../etc/passwd", None), "");

    assert!(MarkupResolver::reset_global().is_some());
    assert_eq!(resolve_icon_markup("rocket", None), "");

    runtime::block_on(async move { drop(server) });
}
