extern crate hashvp;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use hashvp::server::router;
use hashvp::{Sample, SampleRecord, SampleTree};
use serde_json::Value;
use tower::ServiceExt;

const HASH_A: &str = "T1A6144B2D62EA2CD4E97A817CC8868251D5B370362712B1EF02E0C57C9F17AE97A7DF41";
const HASH_B: &str = "T1DB52C083FA3DF4C75D587A74009B8EA3065B9E4E266D8F9C4FB974091736CE2E401A4A";
const HASH_A2: &str = "T1A6144B2D62EA2CD4E97A817CC8868251D5B370362712B1EF02E0C57C9F17AE97A7DF40";

fn sample(sha: &str, tlsh: &str) -> Sample {
    Sample::new(SampleRecord {
        sha256: sha.to_string(),
        signature: "TestFamily".to_string(),
        tlsh: tlsh.to_string(),
        ..SampleRecord::default()
    }).unwrap()
}

fn app(base_path: &str) -> Router {
    let tree = SampleTree::with_seed(vec![
        sample("aaa", HASH_A),
        sample("bbb", HASH_B),
        sample("ccc", HASH_A2),
    ], 1);
    router(Arc::new(tree), base_path)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn nearest_first() {
    let (status, body) = get(app("/"), &format!("/?hash={}&radius=2", HASH_A)).await;
    assert_eq!(status, StatusCode::OK);
    let arr = body.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["sha256_hash"], "aaa");
    assert_eq!(arr[0]["distance"], 0.0);
    assert_eq!(arr[0]["signature"], "TestFamily");
    assert_eq!(arr[1]["sha256_hash"], "ccc");
    assert_eq!(arr[1]["distance"], 1.0);
}

#[tokio::test]
async fn default_count_returns_everything_small() {
    let (status, body) = get(app("/"), &format!("/?hash={}", HASH_B)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[0]["sha256_hash"], "bbb");
}

#[tokio::test]
async fn count_alias_and_unprefixed_hash() {
    let (status, body) = get(app("/"), &format!("/?hash={}&count=1", &HASH_A2[2..])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["sha256_hash"], "ccc");
}

#[tokio::test]
async fn zero_radius_is_empty() {
    let (status, body) = get(app("/"), &format!("/?hash={}&radius=0", HASH_A)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_hash_is_bad_request() {
    let (status, body) = get(app("/"), "/?radius=3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing hash");
}

#[tokio::test]
async fn bad_radius_is_bad_request() {
    for radius in ["abc", "-1", "70000"] {
        let (status, body) = get(app("/"), &format!("/?hash={}&radius={}", HASH_A, radius)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("invalid radius"));
    }
}

#[tokio::test]
async fn bad_hash_is_bad_request() {
    let (status, body) = get(app("/"), "/?hash=T1XYZ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn mounted_under_base_path() {
    let (status, body) = get(app("lookup"), &format!("/lookup?hash={}&radius=1", HASH_A)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["sha256_hash"], "aaa");

    let resp = app("lookup")
        .oneshot(Request::builder().uri("/?hash=x").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
