mod harness;

use harness::config::ConfigBuilder;
use harness::mock_llm::MockLlm;
use harness::server::{TestServer, event_types, parse_sse_data};

fn hello() -> serde_json::Value {
    serde_json::json!([{"role": "user", "content": "Hello"}])
}

#[tokio::test]
async fn openrouter_key_wins_over_custom_base() {
    let openrouter = MockLlm::start().await.unwrap();
    let custom = MockLlm::start().await.unwrap();
    let config = ConfigBuilder::new()
        .with_openrouter(&openrouter)
        .with_custom(&custom)
        .build();

    let server = TestServer::start(config).await.unwrap();
    server.post_chat("step", hello()).await.text().await.unwrap();

    assert_eq!(openrouter.openai_requests().len(), 1);
    assert!(custom.openai_requests().is_empty());
}

#[tokio::test]
async fn custom_base_wins_over_local() {
    let custom = MockLlm::start().await.unwrap();
    let local = MockLlm::start().await.unwrap();
    let config = ConfigBuilder::new()
        .with_custom(&custom)
        .with_ollama(&local)
        .with_var("CUSTOM_MODEL", "pinned-vl")
        .build();

    let server = TestServer::start(config).await.unwrap();
    let text = server.post_chat("help", hello()).await.text().await.unwrap();

    assert_eq!(event_types(&parse_sse_data(&text)).len(), 7);
    assert!(local.ollama_requests().is_empty());

    let sent = custom.openai_requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["model"], "pinned-vl");
}

#[tokio::test]
async fn local_is_used_without_remote_settings() {
    let local = MockLlm::start_with_chunks(&["Click", " Save"]).await.unwrap();
    let config = ConfigBuilder::new()
        .with_ollama(&local)
        .with_var("OLLAMA_MODEL", "llava")
        .build();

    let server = TestServer::start(config).await.unwrap();
    let data = parse_sse_data(&server.post_chat("step", hello()).await.text().await.unwrap());

    assert_eq!(data[2], r#"{"type":"text-delta","id":"text-1","delta":"Click"}"#);
    assert_eq!(data[3], r#"{"type":"text-delta","id":"text-1","delta":" Save"}"#);

    // The call hint takes precedence over OLLAMA_MODEL
    assert_eq!(local.ollama_requests()[0]["model"], "qwen3-vl");
}
