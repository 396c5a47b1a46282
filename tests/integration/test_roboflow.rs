use super::helpers::{
    TEST_API_KEY, assert_status, expect_status, image_bytes, json_request, multipart_request,
    read_json, send, spawn_fake_roboflow, spawn_relay_for,
};
use axum::http::StatusCode;
use base64::{Engine, engine::general_purpose::STANDARD};
use image::ImageFormat;
use serde_json::{Value, json};
use std::time::Duration;

const CAT_PREDICTIONS: &str = r#"{"predictions":[{"class":"cat","confidence":0.91}]}"#;

#[tokio::test]
async fn relays_upload_to_versioned_model_endpoint() {
    let fake = spawn_fake_roboflow(StatusCode::OK, CAT_PREDICTIONS, Duration::ZERO).await;
    let relay = spawn_relay_for(&fake.base_url, Duration::from_secs(5));
    let jpg = image_bytes(ImageFormat::Jpeg);

    let req = multipart_request(
        "/detect",
        &[("model_id", "coco/3"), ("confidence", "50")],
        Some(("cat.jpg", jpg.as_slice())),
    );
    let res = expect_status(send(&relay, req).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;

    assert_eq!(
        body,
        json!({
            "provider": "roboflow",
            "model": "coco/3",
            "predictions": [{"class": "cat", "confidence": 0.91}],
            "count": 1
        })
    );

    let requests = fake.requests();
    assert_eq!(requests.len(), 1);
    let sent = &requests[0];
    assert_eq!(sent.method, "POST");
    assert_eq!(sent.path, "/coco/3");
    assert_eq!(
        sent.query.as_deref(),
        Some(format!("api_key={}&confidence=50", TEST_API_KEY).as_str())
    );
    assert_eq!(
        sent.content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );

    let png = STANDARD.decode(&sent.body).expect("relayed body is not base64");
    assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);
}

#[tokio::test]
async fn bare_model_uses_single_segment_path() {
    let fake = spawn_fake_roboflow(StatusCode::OK, r#"{"predictions":[]}"#, Duration::ZERO).await;
    let relay = spawn_relay_for(&fake.base_url, Duration::from_secs(5));
    let encoded = STANDARD.encode(image_bytes(ImageFormat::Png));

    let req = json_request("/detect", &json!({ "image": encoded, "model_id": "coco" }));
    let res = expect_status(send(&relay, req).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;

    assert_eq!(body["count"], 0);
    let sent = &fake.requests()[0];
    assert_eq!(sent.path, "/coco");
    assert_eq!(
        sent.query.as_deref(),
        Some(format!("api_key={}&confidence=40", TEST_API_KEY).as_str())
    );
}

#[tokio::test]
async fn missing_predictions_field_yields_empty_result() {
    let fake = spawn_fake_roboflow(StatusCode::OK, r#"{"time":0.02}"#, Duration::ZERO).await;
    let relay = spawn_relay_for(&fake.base_url, Duration::from_secs(5));
    let png = image_bytes(ImageFormat::Png);

    let req = multipart_request("/detect", &[], Some(("photo.png", png.as_slice())));
    let res = expect_status(send(&relay, req).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;

    assert_eq!(body["predictions"], json!([]));
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn provider_error_status_and_body_pass_through() {
    let fake = spawn_fake_roboflow(StatusCode::FORBIDDEN, "invalid api key", Duration::ZERO).await;
    let relay = spawn_relay_for(&fake.base_url, Duration::from_secs(5));
    let png = image_bytes(ImageFormat::Png);

    let req = multipart_request("/detect", &[], Some(("photo.png", png.as_slice())));
    let res = send(&relay, req).await;
    assert_status(res.status(), StatusCode::FORBIDDEN);
    let body: Value = read_json(res).await;

    assert_eq!(
        body,
        json!({"error": "Roboflow API error", "details": "invalid api key"})
    );
}

#[tokio::test]
async fn non_json_success_body_is_a_bad_gateway() {
    let fake = spawn_fake_roboflow(StatusCode::OK, "<html>maintenance</html>", Duration::ZERO).await;
    let relay = spawn_relay_for(&fake.base_url, Duration::from_secs(5));
    let png = image_bytes(ImageFormat::Png);

    let req = multipart_request("/detect", &[], Some(("photo.png", png.as_slice())));
    let res = send(&relay, req).await;
    assert_status(res.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn slow_provider_times_out() {
    let fake = spawn_fake_roboflow(StatusCode::OK, CAT_PREDICTIONS, Duration::from_secs(3)).await;
    let relay = spawn_relay_for(&fake.base_url, Duration::from_millis(200));
    let png = image_bytes(ImageFormat::Png);

    let req = multipart_request("/detect", &[], Some(("photo.png", png.as_slice())));
    let res = send(&relay, req).await;
    assert_status(res.status(), StatusCode::GATEWAY_TIMEOUT);
}

#[tokio::test]
async fn unreachable_provider_is_a_bad_gateway_without_leaking_key() {
    // bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let relay = spawn_relay_for(&format!("http://{}", addr), Duration::from_secs(2));
    let png = image_bytes(ImageFormat::Png);

    let req = multipart_request("/detect", &[], Some(("photo.png", png.as_slice())));
    let res = send(&relay, req).await;
    assert_status(res.status(), StatusCode::BAD_GATEWAY);
    let body: Value = read_json(res).await;
    assert!(
        !body["error"].as_str().unwrap_or_default().contains(TEST_API_KEY),
        "error leaked the api key: {body}"
    );
}
