//! Encrypted link API tests

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};

use common::{TestOptions, auth_header, default_state, memory_state};

macro_rules! encrypt_url {
    ($app:expr, $url:expr) => {{
        let req = TestRequest::post()
            .uri("/encrypt")
            .insert_header(auth_header())
            .set_json(json!({ "url": $url }))
            .to_request();
        let body: Value = test::call_and_read_body_json($app, req).await;
        body
    }};
}

// =============================================================================
// Round trip
// =============================================================================

#[actix_rt::test]
async fn test_encrypt_redirect_decrypt_scenario() {
    let app = test_app!(default_state());
    let target = "https://example.com/secret?x=1";

    let body = encrypt_url!(&app, target);
    let code = body["code"].as_str().unwrap().to_string();
    assert!(!code.contains('='));
    assert!(
        body["encryptedUrl"]
            .as_str()
            .unwrap()
            .ends_with(&format!("/e/{}", code))
    );

    let req = TestRequest::get().uri(&format!("/e/{}", code)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get("Location").unwrap(), target);

    let req = TestRequest::post()
        .uri("/decrypt")
        .set_json(json!({ "code": code }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "url": target }));
}

#[actix_rt::test]
async fn test_same_url_encrypts_differently() {
    let app = test_app!(default_state());
    let a = encrypt_url!(&app, "https://example.com");
    let b = encrypt_url!(&app, "https://example.com");
    assert_ne!(a["code"], b["code"]);
}

#[actix_rt::test]
async fn test_decrypt_sources() {
    let app = test_app!(default_state());
    let target = "https://example.com/sources";
    let body = encrypt_url!(&app, target);
    let code = body["code"].as_str().unwrap().to_string();
    let encrypted_url = body["encryptedUrl"].as_str().unwrap().to_string();

    // body.encryptedUrl
    let req = TestRequest::post()
        .uri("/decrypt")
        .set_json(json!({ "encryptedUrl": encrypted_url }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["url"], target);

    // query code
    let req = TestRequest::post()
        .uri(&format!("/decrypt?code={}", code))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["url"], target);

    // GET /decrypt/{code}
    let req = TestRequest::get()
        .uri(&format!("/decrypt/{}", code))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["url"], target);

    // body.code 优先于 query
    let req = TestRequest::post()
        .uri("/decrypt?code=garbage")
        .set_json(json!({ "code": code }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

// =============================================================================
// Failures
// =============================================================================

#[actix_rt::test]
async fn test_decrypt_invalid_code() {
    let app = test_app!(default_state());

    for payload in [json!({"code": "not-a-valid-code"}), json!({}), json!({"code": ""})] {
        let req = TestRequest::post()
            .uri("/decrypt")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", payload);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Invalid code"}));
    }
}

#[actix_rt::test]
async fn test_tampered_code_rejected() {
    let app = test_app!(default_state());
    let body = encrypt_url!(&app, "https://example.com/t");
    let code = body["code"].as_str().unwrap();

    // 改动密文中间的一个字符
    let mut tampered: Vec<char> = code.chars().collect();
    let mid = tampered.len() / 2;
    tampered[mid] = if tampered[mid] == 'A' { 'B' } else { 'A' };
    let tampered: String = tampered.into_iter().collect();

    let req = TestRequest::get().uri(&format!("/e/{}", tampered)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Invalid or expired link"}));
}

#[actix_rt::test]
async fn test_code_from_other_key_rejected() {
    let app = test_app!(default_state());
    let body = encrypt_url!(&app, "https://example.com");
    let code = body["code"].as_str().unwrap().to_string();

    let (_, other) = memory_state(TestOptions {
        encryption_key: Some(base64_key(9)),
        ..TestOptions::default()
    });
    let other_app = test_app!(other);
    let req = TestRequest::get()
        .uri(&format!("/decrypt/{}", code))
        .to_request();
    let resp = test::call_service(&other_app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

fn base64_key(byte: u8) -> String {
    use base64::Engine as _;
    base64::engine::general_purpose::STANDARD.encode([byte; 16])
}

#[actix_rt::test]
async fn test_encrypt_invalid_url() {
    let app = test_app!(default_state());

    let req = TestRequest::post()
        .uri("/encrypt")
        .insert_header(auth_header())
        .set_json(json!({"url": "javascript:alert(1)"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Invalid URL"}));
}

#[actix_rt::test]
async fn test_missing_key_is_server_error_on_encrypt_only() {
    let (_, state) = memory_state(TestOptions {
        encryption_key: None,
        ..TestOptions::default()
    });
    let app = test_app!(state);

    let req = TestRequest::post()
        .uri("/encrypt")
        .insert_header(auth_header())
        .set_json(json!({"url": "https://example.com"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Encryption key not configured"}));

    let req = TestRequest::get().uri("/e/anything-here").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_bad_key_length_is_server_error() {
    let (_, state) = memory_state(TestOptions {
        encryption_key: Some("c2hvcnQ".to_string()),
        ..TestOptions::default()
    });
    let app = test_app!(state);

    let req = TestRequest::post()
        .uri("/encrypt")
        .insert_header(auth_header())
        .set_json(json!({"url": "https://example.com"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_rt::test]
async fn test_encrypted_redirect_percent_encodes_non_ascii_target() {
    let app = test_app!(default_state());

    let body = encrypt_url!(&app, "https://example.com/café");
    let code = body["code"].as_str().unwrap().to_string();

    let req = TestRequest::get().uri(&format!("/e/{}", code)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get("Location").unwrap(),
        "https://example.com/caf%C3%A9"
    );
}
