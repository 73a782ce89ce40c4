mod harness;

use harness::config::{ACTIVE_KEY, ConfigBuilder, INACTIVE_KEY};
use harness::mock_engine::{MockEngine, WAV_BYTES};
use harness::server::TestServer;

async fn start() -> (MockEngine, TestServer, tempfile::TempDir) {
    let engine = MockEngine::start().await.unwrap();
    let storage = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::new(&engine.base_url(), storage.path().to_path_buf()).build();
    let server = TestServer::start(config).await.unwrap();
    (engine, server, storage)
}

#[tokio::test]
async fn batch_synthesis_returns_wav_audio() {
    let (_engine, server, _storage) = start().await;

    let resp = server
        .client()
        .post(server.url("/v1/synthesize"))
        .bearer_auth(ACTIVE_KEY)
        .json(&serde_json::json!({
            "text": "Hello from CallWaiting.ai",
            "voice_id": "naija_female",
            "streaming": false,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "audio/wav");
    assert_eq!(resp.headers()["x-tenant-id"], "tenant_t1");
    assert_eq!(resp.headers()["x-voice-id"], "naija_female");
    assert_eq!(resp.headers()["x-streaming"], "false");

    let audio = resp.bytes().await.unwrap();
    assert_eq!(&audio[..], WAV_BYTES);
}

#[tokio::test]
async fn streaming_synthesis_delivers_all_chunks_in_order() {
    let (_engine, server, _storage) = start().await;

    let resp = server
        .client()
        .post(server.url("/v1/synthesize"))
        .bearer_auth(ACTIVE_KEY)
        .json(&serde_json::json!({ "text": "Hello" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "audio/wav");
    assert_eq!(resp.headers()["x-streaming"], "true");

    // Collected in arrival order the payload must match exactly
    let audio = resp.bytes().await.unwrap();
    assert_eq!(&audio[..], WAV_BYTES);
}

#[tokio::test]
async fn empty_text_fails_before_auth() {
    let (engine, server, _storage) = start().await;

    // Even with a bogus credential the client error comes first
    let resp = server
        .client()
        .post(server.url("/v1/synthesize"))
        .bearer_auth("vg_nobody")
        .json(&serde_json::json!({ "text": "" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);

    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["error"]["type"], "invalid_request_error");
    assert_eq!(engine.synthesize_count(), 0);
}

#[tokio::test]
async fn oversized_text_is_rejected() {
    let (engine, server, _storage) = start().await;

    let resp = server
        .client()
        .post(server.url("/v1/synthesize"))
        .bearer_auth(ACTIVE_KEY)
        .json(&serde_json::json!({ "text": "a".repeat(501) }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    assert_eq!(engine.synthesize_count(), 0);
}

#[tokio::test]
async fn unknown_voice_is_a_client_error() {
    let (engine, server, _storage) = start().await;

    let resp = server
        .client()
        .post(server.url("/v1/synthesize"))
        .bearer_auth(ACTIVE_KEY)
        .json(&serde_json::json!({ "text": "Hello", "voice_id": "ghost_voice" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);

    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["error"]["type"], "not_found_error");
    assert_eq!(engine.synthesize_count(), 0);
}

#[tokio::test]
async fn inactive_tenant_makes_no_engine_call() {
    let (engine, server, _storage) = start().await;

    let resp = server
        .client()
        .post(server.url("/v1/synthesize"))
        .bearer_auth(INACTIVE_KEY)
        .json(&serde_json::json!({ "text": "Hello from CallWaiting.ai" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 403);
    assert_eq!(engine.synthesize_count(), 0);
}

#[tokio::test]
async fn non_json_content_type_is_rejected() {
    let (_engine, server, _storage) = start().await;

    let resp = server
        .client()
        .post(server.url("/v1/synthesize"))
        .bearer_auth(ACTIVE_KEY)
        .header("content-type", "text/plain")
        .body("text=Hello")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 415);
}

#[tokio::test]
async fn engine_failure_surfaces_as_upstream_error() {
    let engine = MockEngine::start_failing(1).await.unwrap();
    let storage = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::new(&engine.base_url(), storage.path().to_path_buf()).build();
    let server = TestServer::start(config).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/v1/synthesize"))
        .bearer_auth(ACTIVE_KEY)
        .json(&serde_json::json!({ "text": "Hello", "streaming": false }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 502);

    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["error"]["type"], "upstream_error");
}
