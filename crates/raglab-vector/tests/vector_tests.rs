use std::collections::HashMap;

use raglab_core::traits::VectorIndex;
use raglab_core::types::IndexEntry;
use raglab_vector::{MemoryVectorIndex, RemoteVectorIndex};

fn entry(id: &str, vector: Vec<f32>, text: &str) -> IndexEntry {
    IndexEntry { id: id.to_string(), vector, text: text.to_string(), metadata: HashMap::new() }
}

#[tokio::test]
async fn memory_index_ranks_by_cosine_similarity() {
    let index = MemoryVectorIndex::new();
    index
        .upsert(vec![
            entry("a", vec![1.0, 0.0], "east"),
            entry("b", vec![0.0, 1.0], "north"),
            entry("c", vec![0.9, 0.1], "mostly east"),
        ])
        .await
        .expect("upsert");

    let hits = index.query(&[1.0, 0.0], 2).await.expect("query");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, "a");
    assert_eq!(hits[1].id, "c");
    assert!(hits[0].score >= hits[1].score);
}

#[tokio::test]
async fn memory_index_truncates_to_k() {
    let index = MemoryVectorIndex::new();
    index
        .upsert((0..10).map(|i| entry(&format!("e{i}"), vec![1.0, i as f32], "x")).collect())
        .await
        .expect("upsert");
    let hits = index.query(&[1.0, 0.0], 3).await.expect("query");
    assert_eq!(hits.len(), 3);
}

#[tokio::test]
async fn memory_index_breaks_ties_by_insertion_order() {
    let index = MemoryVectorIndex::new();
    // Identical vectors -> identical scores for any query.
    index
        .upsert(vec![
            entry("first", vec![1.0, 1.0], "first in"),
            entry("second", vec![1.0, 1.0], "second in"),
            entry("third", vec![1.0, 1.0], "third in"),
        ])
        .await
        .expect("upsert");
    let hits = index.query(&[1.0, 1.0], 3).await.expect("query");
    let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn memory_index_upsert_replaces_existing_id() {
    let index = MemoryVectorIndex::new();
    index.upsert(vec![entry("a", vec![1.0, 0.0], "old")]).await.expect("upsert");
    index.upsert(vec![entry("a", vec![1.0, 0.0], "new")]).await.expect("upsert");
    assert_eq!(index.len(), 1);
    let hits = index.query(&[1.0, 0.0], 1).await.expect("query");
    assert_eq!(hits[0].text, "new");
}

#[tokio::test]
async fn memory_index_rejects_dimension_mismatch() {
    let index = MemoryVectorIndex::new();
    index.upsert(vec![entry("a", vec![1.0, 0.0], "x")]).await.expect("upsert");
    assert!(index.query(&[1.0, 0.0, 0.0], 1).await.is_err());
}

#[tokio::test]
async fn remote_index_connects_and_queries() {
    let mut server = mockito::Server::new_async().await;
    let _create = server
        .mock("POST", "/api/v1/collections")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"col-123","name":"documents"}"#)
        .create_async()
        .await;
    let _query = server
        .mock("POST", "/api/v1/collections/col-123/query")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"ids":[["c1","c2"]],"documents":[["first text","second text"]],"distances":[[0.1,0.4]]}"#,
        )
        .create_async()
        .await;

    let index = RemoteVectorIndex::connect(&server.url(), "documents").await.expect("connect");
    assert_eq!(index.collection_id(), "col-123");

    let hits = index.query(&[0.5, 0.5], 2).await.expect("query");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, "c1");
    assert_eq!(hits[0].text, "first text");
    assert!((hits[0].score - 0.9).abs() < 1e-6, "score is 1 - distance");
    assert!(hits[0].score > hits[1].score);
}

#[tokio::test]
async fn remote_index_upserts_entries() {
    let mut server = mockito::Server::new_async().await;
    let _create = server
        .mock("POST", "/api/v1/collections")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"col-9","name":"documents"}"#)
        .create_async()
        .await;
    let upsert = server
        .mock("POST", "/api/v1/collections/col-9/upsert")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"ids":["d:0"],"documents":["hello"]}"#.to_string(),
        ))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let index = RemoteVectorIndex::connect(&server.url(), "documents").await.expect("connect");
    index
        .upsert(vec![entry("d:0", vec![0.1, 0.2], "hello")])
        .await
        .expect("upsert");
    upsert.assert_async().await;
}

#[tokio::test]
async fn remote_index_surfaces_service_failure() {
    let mut server = mockito::Server::new_async().await;
    let _create = server
        .mock("POST", "/api/v1/collections")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;
    let err = RemoteVectorIndex::connect(&server.url(), "documents").await.expect_err("must fail");
    assert!(matches!(err, raglab_core::error::Error::Service(_)), "got {err}");
}
