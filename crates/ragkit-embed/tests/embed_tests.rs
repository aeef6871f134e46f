use ragkit_core::config::EmbeddingSettings;
use ragkit_core::embedding::align_embeddings;
use ragkit_core::{DistanceMetric, EmbeddingProvider, Error, IndexedEmbeddings};
use ragkit_embed::http::{merge_response, EmbeddingResponse};
use ragkit_embed::{get_default_provider, FakeEmbedder, HttpEmbeddingProvider};

#[tokio::test]
async fn fake_embedder_shapes_and_determinism() {
    let embedder = FakeEmbedder::new();
    let texts = vec!["hello world".to_string(), "hello world".to_string(), "microwave door".to_string()];
    let embs = embedder.embed(&texts, 64).await.expect("embed");
    let aligned = align_embeddings(embs, texts.len(), 64).expect("aligned");
    let (v1, v2) = (&aligned[0], &aligned[1]);

    assert_eq!(v1.len(), 64, "requested dimensions");
    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");
    for (a, b) in v1.iter().zip(v2.iter()) {
        assert!((a - b).abs() <= 1e-6);
    }
}

#[tokio::test]
async fn fake_embedder_puts_shared_words_closer() {
    let embedder = FakeEmbedder::new();
    let q = embedder.embed_text("How do I clean the microwave?", 256);
    let related = embedder.embed_text("Clean the microwave with a damp cloth.", 256);
    let unrelated = embedder.embed_text("Quarterly revenue grew by four percent", 256);
    let c = DistanceMetric::Cosine;
    assert!(c.distance(&q, &related) < c.distance(&q, &unrelated));
}

#[tokio::test]
async fn fake_embedder_rejects_zero_dimensions() {
    let err = FakeEmbedder::new().embed(&["x".to_string()], 0).await.unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));
}

#[test]
fn response_indices_are_shifted_by_batch_offset() {
    let body = r#"{"data": [
        {"index": 1, "embedding": [1.0, 1.0], "object": "embedding"},
        {"index": 0, "embedding": [0.0, 0.0], "object": "embedding"}
    ], "model": "m"}"#;
    let response: EmbeddingResponse = serde_json::from_str(body).unwrap();
    let mut out = IndexedEmbeddings::new();
    merge_response(response.clone(), 0, 2, &mut out).unwrap();
    merge_response(response, 2, 2, &mut out).unwrap();
    assert_eq!(out.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    assert_eq!(out[&3], vec![1.0, 1.0]);
    assert_eq!(out[&2], vec![0.0, 0.0]);
}

#[test]
fn malformed_responses_are_provider_errors() {
    let out_of_range: EmbeddingResponse =
        serde_json::from_str(r#"{"data": [{"index": 2, "embedding": [0.0]}]}"#).unwrap();
    let mut out = IndexedEmbeddings::new();
    assert!(matches!(merge_response(out_of_range, 0, 2, &mut out), Err(Error::Provider(_))));

    let duplicate: EmbeddingResponse = serde_json::from_str(
        r#"{"data": [{"index": 0, "embedding": [0.0]}, {"index": 0, "embedding": [1.0]}]}"#,
    )
    .unwrap();
    let mut out = IndexedEmbeddings::new();
    assert!(matches!(merge_response(duplicate, 0, 2, &mut out), Err(Error::Provider(_))));

    // a response without `data` parses, and alignment then reports the gap
    let empty: EmbeddingResponse = serde_json::from_str("{}").unwrap();
    let mut out = IndexedEmbeddings::new();
    merge_response(empty, 0, 1, &mut out).unwrap();
    assert!(matches!(align_embeddings(out, 1, 1), Err(Error::Provider(_))));
}

#[test]
fn http_provider_requires_an_api_key() {
    let settings = EmbeddingSettings::default();
    assert!(matches!(HttpEmbeddingProvider::new(&settings), Err(Error::Configuration(_))));
    let blank = EmbeddingSettings { api_key: Some("   ".to_string()), ..EmbeddingSettings::default() };
    assert!(matches!(HttpEmbeddingProvider::new(&blank), Err(Error::Configuration(_))));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_provider_error() {
    let settings = EmbeddingSettings {
        endpoint: "http://127.0.0.1:9/{deployment}/embeddings".to_string(),
        api_key: Some("key".to_string()),
        timeout_secs: 2,
        ..EmbeddingSettings::default()
    };
    let provider = HttpEmbeddingProvider::new(&settings).expect("provider");
    assert_eq!(provider.provider_id(), "http:text-embedding-3-small-1");
    let err = provider.embed(&["hi".to_string()], 8).await.unwrap_err();
    assert!(matches!(err, Error::Provider(_)), "{err}");
    // nothing to send means no request at all
    assert!(provider.embed(&[], 8).await.unwrap().is_empty());
}

#[test]
fn default_provider_honours_use_fake() {
    let settings = EmbeddingSettings { use_fake: true, ..EmbeddingSettings::default() };
    let provider = get_default_provider(&settings).expect("provider");
    assert_eq!(provider.provider_id(), "fake:xxhash64");
}
