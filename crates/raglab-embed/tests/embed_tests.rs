use raglab_core::error::Error;
use raglab_core::traits::Embedder;
use raglab_embed::{FakeEmbedder, OpenAiEmbedder};

#[tokio::test]
async fn fake_embedder_shapes_and_determinism() {
    let embedder = FakeEmbedder::new(256);
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).await.expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), 256, "embedding dim is 256");

    // Norm approximately 1.0
    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // Deterministic for same input
    for (a, b) in v1.iter().zip(v2.iter()) {
        assert!((a - b).abs() <= 1e-6);
    }
}

#[tokio::test]
async fn fake_embedder_distinguishes_texts() {
    let embedder = FakeEmbedder::new(256);
    let a = embedder.embed("vector databases").await.expect("embed");
    let b = embedder.embed("pancake recipes").await.expect("embed");
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    assert!(dot < 0.99, "different texts should not be identical (dot={dot})");
}

#[tokio::test]
async fn remote_embedder_parses_response() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/embeddings")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"data":[{"embedding":[0.1,0.2,0.3]},{"embedding":[0.4,0.5,0.6]}]}"#,
        )
        .create_async()
        .await;

    let embedder = OpenAiEmbedder::with_base_url("test-key", "text-embedding-3-small", server.url())
        .expect("embedder");
    let texts = vec!["first".to_string(), "second".to_string()];
    let embs = embedder.embed_batch(&texts).await.expect("embed_batch");

    assert_eq!(embs.len(), 2);
    assert_eq!(embs[0], vec![0.1, 0.2, 0.3]);
    assert_eq!(embs[1], vec![0.4, 0.5, 0.6]);
    mock.assert_async().await;
}

#[tokio::test]
async fn remote_embedder_maps_http_failure_to_service_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/embeddings")
        .with_status(429)
        .with_body(r#"{"error":"rate limited"}"#)
        .create_async()
        .await;

    let embedder = OpenAiEmbedder::with_base_url("test-key", "text-embedding-3-small", server.url())
        .expect("embedder");
    let err = embedder.embed("anything").await.expect_err("must fail");
    assert!(matches!(err, Error::Service(_)), "got {err}");
}

#[tokio::test]
async fn remote_embedder_rejects_count_mismatch() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/embeddings")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":[{"embedding":[0.1]}]}"#)
        .create_async()
        .await;

    let embedder = OpenAiEmbedder::with_base_url("test-key", "text-embedding-3-small", server.url())
        .expect("embedder");
    let texts = vec!["one".to_string(), "two".to_string()];
    let err = embedder.embed_batch(&texts).await.expect_err("must fail");
    assert!(matches!(err, Error::Service(_)), "got {err}");
}

#[tokio::test]
async fn empty_batch_short_circuits() {
    // No server: an empty batch must not touch the network.
    let embedder = OpenAiEmbedder::with_base_url("test-key", "text-embedding-3-small", "http://127.0.0.1:1")
        .expect("embedder");
    let embs = embedder.embed_batch(&[]).await.expect("embed_batch");
    assert!(embs.is_empty());
}
