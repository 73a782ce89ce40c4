mod harness;

use harness::config::ConfigBuilder;
use harness::mock_engine::MockEngine;
use harness::server::TestServer;

#[tokio::test]
async fn health_endpoint_returns_ok_without_auth() {
    let engine = MockEngine::start().await.unwrap();
    let storage = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::new(&engine.base_url(), storage.path().to_path_buf()).build();

    let server = TestServer::start(config).await.unwrap();

    let resp = server.client().get(server.url("/health")).send().await.unwrap();

    assert_eq!(resp.status(), 200);

    let body = resp.text().await.unwrap();
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn health_endpoint_disabled() {
    let engine = MockEngine::start().await.unwrap();
    let storage = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::new(&engine.base_url(), storage.path().to_path_buf())
        .without_health()
        .build();

    let server = TestServer::start(config).await.unwrap();

    let resp = server.client().get(server.url("/health")).send().await.unwrap();

    assert_eq!(resp.status(), 404);
}
