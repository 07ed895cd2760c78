// tests/http_sources.rs
//
// End-to-end: real vendor mocks on 127.0.0.1, aggregator built from Settings,
// requests sent through the full app router.

use axum::{
    body::{self, Body},
    http::{HeaderMap, Request, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt as _;

use catalog_aggregator::sources::{HttpSource, SourceProvider};
use catalog_aggregator::{app, SourceBatch, SourceKind, Settings};

const SECRET: &str = "kunci-rahasia";

/// Serve `router` on an ephemeral port and return its base URL.
async fn spawn_vendor(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind vendor");
    let addr = listener.local_addr().expect("vendor addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

/// A base URL nothing is listening on.
async fn dead_vendor() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Vendor route that checks `x-api-key` like the real services do.
fn guarded(path: &'static str, payload: Value) -> Router {
    Router::new().route(
        path,
        get(move |headers: HeaderMap| {
            let payload = payload.clone();
            async move {
                match headers.get("x-api-key").and_then(|h| h.to_str().ok()) {
                    Some(SECRET) => Json(payload).into_response(),
                    _ => (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"error": "Unauthorized"})),
                    )
                        .into_response(),
                }
            }
        }),
    )
}

fn slow(path: &'static str, delay: Duration) -> Router {
    Router::new().route(
        path,
        get(move || async move {
            tokio::time::sleep(delay).await;
            Json(json!([]))
        }),
    )
}

fn warung_payload() -> Value {
    json!([
        {"kd_produk": "P1", "nm_brg": "Beras", "hrg": "10000", "ket_stok": "Ada"},
        {"kd_produk": "P2", "nm_brg": "Gula", "hrg": "15000"}
    ])
}

fn distro_payload() -> Value {
    json!([
        {"sku": "TS-01", "productName": "Kaos", "price": 75000, "isAvailable": true}
    ])
}

fn resto_payload() -> Value {
    json!([
        {"id": 501, "details": {"name": "Nasi Goreng", "category": "Food"},
         "pricing": {"base_price": 20000, "tax": 2000}, "stock": 5},
        {"id": 502, "details": {"name": "Es Teh", "category": "Drink"},
         "pricing": {"base_price": 5000, "tax": 500}, "stock": 0}
    ])
}

fn settings(a: String, b: String, c: String, secret: Option<&str>) -> Settings {
    Settings {
        vendor_a_url: a,
        vendor_b_url: b,
        vendor_c_url: c,
        api_secret: secret.map(str::to_string),
        source_timeout_ms: 300,
        ..Settings::default()
    }
}

async fn get_catalog(settings: &Settings) -> (StatusCode, HeaderMap, Value) {
    let app = app(settings).expect("build app");
    let resp = app
        .oneshot(Request::get("/api/catalog").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap();
    (status, headers, serde_json::from_slice(&bytes).expect("json body"))
}

#[tokio::test]
async fn healthy_vendors_produce_full_catalog() {
    let a = spawn_vendor(guarded("/api/produk", warung_payload())).await;
    let b = spawn_vendor(guarded("/api/products", distro_payload())).await;
    let c = spawn_vendor(guarded("/api/menu", resto_payload())).await;

    let (status, headers, v) = get_catalog(&settings(a, b, c, Some(SECRET))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("x-catalog-degraded").unwrap(), "0");
    assert_eq!(v["total"], json!(5));

    let data = v["data"].as_array().unwrap();
    assert_eq!(data.len(), 5);
    assert_eq!(data[0]["final_price"], json!(9000.0));
    assert_eq!(data[1]["status"], "habis");
    assert_eq!(data[1]["final_price"], json!(13500.0));
    assert_eq!(data[2]["source"], "Distro Fashion");
    assert_eq!(data[3]["name"], "Nasi Goreng (Recommended)");
    assert_eq!(data[3]["key_id"], "RESTO-501");
    assert_eq!(data[4]["name"], "Es Teh");
    assert_eq!(data[4]["status"], "Habis");
    assert_eq!(data[4]["final_price"], json!(5500.0));
}

#[tokio::test]
async fn wrong_secret_degrades_every_source_to_empty() {
    let a = spawn_vendor(guarded("/api/produk", warung_payload())).await;
    let b = spawn_vendor(guarded("/api/products", distro_payload())).await;
    let c = spawn_vendor(guarded("/api/menu", resto_payload())).await;

    let (status, headers, v) = get_catalog(&settings(a, b, c, Some("salah"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v, json!({"total": 0, "data": []}));
    assert_eq!(headers.get("x-catalog-degraded").unwrap(), "1");
}

#[tokio::test]
async fn unreachable_vendor_only_drops_its_records() {
    let a = dead_vendor().await;
    let b = spawn_vendor(guarded("/api/products", distro_payload())).await;
    let c = spawn_vendor(guarded("/api/menu", resto_payload())).await;

    let (status, headers, v) = get_catalog(&settings(a, b, c, Some(SECRET))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["total"], json!(3));
    let data = v["data"].as_array().unwrap();
    assert!(data.iter().all(|e| e["source"] != "Warung Klontong"));
    assert_eq!(
        headers.get("x-catalog-failed-sources").unwrap(),
        "Warung Klontong"
    );
}

#[tokio::test]
async fn all_vendors_timing_out_gives_empty_catalog() {
    let delay = Duration::from_secs(3);
    let a = spawn_vendor(slow("/api/produk", delay)).await;
    let b = spawn_vendor(slow("/api/products", delay)).await;
    let c = spawn_vendor(slow("/api/menu", delay)).await;

    let started = std::time::Instant::now();
    let (status, _, v) = get_catalog(&settings(a, b, c, Some(SECRET))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v, json!({"total": 0, "data": []}));
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "timeouts should be concurrent, took {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn malformed_body_and_server_error_are_source_failures() {
    let a = spawn_vendor(Router::new().route("/api/produk", get(|| async { "bukan json" }))).await;
    let b = spawn_vendor(Router::new().route(
        "/api/products",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "db down") }),
    ))
    .await;
    let c = spawn_vendor(guarded("/api/menu", resto_payload())).await;

    let (status, headers, v) = get_catalog(&settings(a, b, c, Some(SECRET))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["total"], json!(2));
    assert_eq!(
        headers.get("x-catalog-failed-sources").unwrap(),
        "Warung Klontong,Distro Fashion"
    );
}

#[tokio::test]
async fn null_fields_keep_every_record() {
    let a = spawn_vendor(guarded(
        "/api/produk",
        json!([
            {"kd_produk": "P1", "nm_brg": "Beras", "hrg": "10000", "ket_stok": "Ada"},
            {"kd_produk": "P2", "nm_brg": null, "hrg": null, "ket_stok": null}
        ]),
    ))
    .await;
    let b = spawn_vendor(guarded(
        "/api/products",
        json!([
            {"sku": "TS-01", "productName": "Kaos", "price": 75000, "isAvailable": true},
            {"sku": "TS-02", "productName": null, "price": 80000, "isAvailable": null}
        ]),
    ))
    .await;
    let c = spawn_vendor(guarded(
        "/api/menu",
        json!([
            {"id": 501, "details": {"name": null, "category": "Food"},
             "pricing": {"base_price": 20000, "tax": 2000}, "stock": null}
        ]),
    ))
    .await;

    let (status, headers, v) = get_catalog(&settings(a, b, c, Some(SECRET))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("x-catalog-degraded").unwrap(), "0");
    assert_eq!(v["total"], json!(5));

    let data = v["data"].as_array().unwrap();
    assert_eq!(data[1]["key_id"], "P2");
    assert_eq!(data[1]["name"], "");
    assert_eq!(data[1]["status"], "habis");
    assert!(data[1]["final_price"].is_null());
    assert_eq!(data[3]["key_id"], "TS-02");
    assert_eq!(data[3]["status"], "Habis");
    assert_eq!(data[4]["name"], " (Recommended)");
    assert_eq!(data[4]["status"], "Habis");
}

#[tokio::test]
async fn http_source_sends_secret_and_decodes_batch() {
    let base = spawn_vendor(guarded("/api/products", distro_payload())).await;
    let src = HttpSource::new(
        SourceKind::DistroFashion,
        &base,
        Some(SECRET.to_string()),
        reqwest::Client::new(),
    );
    let batch = src.fetch_batch().await.expect("fetch ok");
    match batch {
        SourceBatch::Distro(items) => {
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].sku, "TS-01");
        }
        other => panic!("unexpected batch {other:?}"),
    }

    let anon = HttpSource::new(SourceKind::DistroFashion, &base, None, reqwest::Client::new());
    assert!(anon.fetch_batch().await.is_err(), "missing key must be rejected");
}
