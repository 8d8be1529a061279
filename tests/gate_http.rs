use std::sync::Arc;

use axum::http::{HeaderName, StatusCode};
use axum_test::TestServer;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};

use jwt_gate::{
    GateOptions, TokenGate, app,
    gate::messages,
    logger::{LogLevel, MemoryLogger},
    middleware::http::{HttpLimits, REQUEST_ID_HEADER},
    state::AppState,
};

const SECRET: &str = "123456";

// ============= Fixtures =============

struct Tokens {
    valid: String,
    expired: String,
    expiring_now: String,
    not_yet_valid: String,
    foreign: String,
}

fn sign(claims: &Value, secret: &str) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("should sign token")
}

fn tokens() -> Tokens {
    let now = chrono::Utc::now().timestamp();
    let payload = json!({"user": "TestUser123", "info": "test test"});

    let mut expired = payload.clone();
    expired["exp"] = json!(now - 60);

    // Same shape as a token signed with a zero lifetime.
    let mut expiring_now = payload.clone();
    expiring_now["iat"] = json!(now);
    expiring_now["exp"] = json!(now);

    let mut not_yet_valid = payload.clone();
    not_yet_valid["nbf"] = json!(now + 3600);

    Tokens {
        valid: sign(&payload, SECRET),
        expired: sign(&expired, SECRET),
        expiring_now: sign(&expiring_now, SECRET),
        not_yet_valid: sign(&not_yet_valid, SECRET),
        foreign: sign(&payload, "not-the-secret"),
    }
}

fn server_with_logger(options: GateOptions) -> (TestServer, Arc<MemoryLogger>) {
    let logger = Arc::new(MemoryLogger::new());
    let gate = TokenGate::new(options.with_secret(SECRET).with_logger(logger.clone()))
        .expect("gate should build");

    let server = TestServer::new(app::router(AppState::new(gate)))
        .expect("Failed to create test server");

    (server, logger)
}

fn server(options: GateOptions) -> TestServer {
    server_with_logger(options).0
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

// ============= Construction =============

#[test]
fn construction_fails_without_secret() {
    let err = TokenGate::new(GateOptions::new()).unwrap_err();
    assert_eq!(err.to_string(), "No secret value provided!");

    let err = TokenGate::new(GateOptions::new().with_request_auth_prop("x")).unwrap_err();
    assert_eq!(err.to_string(), "No secret value provided!");
}

// ============= Open routes =============

#[tokio::test]
async fn public_route_needs_no_token() {
    let (server, logger) = server_with_logger(GateOptions::new());

    let response = server.get("/api/v1/public").await;

    response.assert_status_ok();
    response.assert_json(&json!({"path": "public"}));
    assert!(logger.entries().is_empty());
}

#[tokio::test]
async fn health_route_needs_no_token() {
    let server = server(GateOptions::new());

    server.get("/api/v1/health").await.assert_status_ok();
}

// ============= Rejections =============

#[tokio::test]
async fn missing_header_is_rejected() {
    let (server, logger) = server_with_logger(GateOptions::new());

    let response = server.get("/api/v1/secret").await;

    response.assert_status_unauthorized();
    assert!(response.text().is_empty());
    assert_eq!(
        logger.entries(),
        vec![(LogLevel::Warn, messages::MISSING_HEADER.to_string())]
    );
}

#[tokio::test]
async fn header_without_bearer_segment_is_rejected() {
    let t = tokens();

    for strict in [false, true] {
        let (server, logger) =
            server_with_logger(GateOptions::new().with_strict_bearer_validation(strict));

        let response = server
            .get("/api/v1/secret")
            .add_header("Authorization", t.valid.clone())
            .await;

        response.assert_status_unauthorized();
        assert!(response.text().is_empty());
        assert_eq!(
            logger.entries(),
            vec![(LogLevel::Warn, messages::MISSING_BEARER.to_string())]
        );
    }
}

#[tokio::test]
async fn strict_mode_rejects_wrong_prefix() {
    let t = tokens();
    let (server, logger) = server_with_logger(GateOptions::new().with_strict_bearer_validation(true));

    let response = server
        .get("/api/v1/secret")
        .add_header("Authorization", format!("BearerX {}", t.valid))
        .await;

    response.assert_status_unauthorized();
    assert!(response.text().is_empty());
    assert_eq!(
        logger.entries(),
        vec![(LogLevel::Warn, messages::STRICT_BEARER.to_string())]
    );
}

#[tokio::test]
async fn strict_mode_rejects_extra_segments() {
    let t = tokens();
    let (server, logger) = server_with_logger(GateOptions::new().with_strict_bearer_validation(true));

    let response = server
        .get("/api/v1/secret")
        .add_header("Authorization", format!("Bearer {} xxxxxx", t.valid))
        .await;

    response.assert_status_unauthorized();
    assert!(response.text().is_empty());
    assert_eq!(
        logger.entries(),
        vec![(LogLevel::Warn, messages::STRICT_BEARER.to_string())]
    );
}

#[tokio::test]
async fn garbage_token_is_rejected_with_error_log() {
    let (server, logger) = server_with_logger(GateOptions::new());

    let response = server
        .get("/api/v1/secret")
        .add_header("Authorization", "Bearer xyz")
        .await;

    response.assert_status_unauthorized();
    assert_eq!(
        logger.entries(),
        vec![(LogLevel::Error, messages::INVALID.to_string())]
    );
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected_with_error_log() {
    let t = tokens();
    let (server, logger) = server_with_logger(GateOptions::new());

    let response = server
        .get("/api/v1/secret")
        .add_header("Authorization", bearer(&t.foreign))
        .await;

    response.assert_status_unauthorized();
    assert!(response.text().is_empty());
    assert_eq!(
        logger.entries(),
        vec![(LogLevel::Error, messages::INVALID.to_string())]
    );
}

#[tokio::test]
async fn expired_token_gets_error_body() {
    let t = tokens();
    let (server, logger) = server_with_logger(GateOptions::new());

    let response = server
        .get("/api/v1/secret")
        .add_header("Authorization", bearer(&t.expired))
        .await;

    response.assert_status_unauthorized();
    response.assert_json(&json!({"error": "TokenExpiredError"}));
    assert_eq!(
        logger.entries(),
        vec![(LogLevel::Warn, messages::EXPIRED.to_string())]
    );
}

#[tokio::test]
async fn token_with_zero_lifetime_is_expired() {
    let t = tokens();
    let (server, logger) = server_with_logger(GateOptions::new());

    let response = server
        .get("/api/v1/secret")
        .add_header("Authorization", bearer(&t.expiring_now))
        .await;

    response.assert_status_unauthorized();
    response.assert_json(&json!({"error": "TokenExpiredError"}));
    assert_eq!(
        logger.entries(),
        vec![(LogLevel::Warn, messages::EXPIRED.to_string())]
    );
}

#[tokio::test]
async fn token_before_nbf_is_rejected_with_error_log() {
    let t = tokens();
    let (server, logger) = server_with_logger(GateOptions::new());

    let response = server
        .get("/api/v1/secret")
        .add_header("Authorization", bearer(&t.not_yet_valid))
        .await;

    response.assert_status_unauthorized();
    assert!(response.text().is_empty());
    assert_eq!(
        logger.entries(),
        vec![(LogLevel::Error, messages::INVALID.to_string())]
    );
}

#[tokio::test]
async fn expired_token_without_error_body() {
    let t = tokens();
    let (server, logger) = server_with_logger(GateOptions::new().with_send_expired_message(false));

    let response = server
        .get("/api/v1/secret")
        .add_header("Authorization", bearer(&t.expired))
        .await;

    response.assert_status_unauthorized();
    assert!(response.text().is_empty());
    assert_eq!(
        logger.entries(),
        vec![(LogLevel::Warn, messages::EXPIRED.to_string())]
    );
}

#[tokio::test]
async fn custom_status_applies_to_every_rejection() {
    let t = tokens();
    let server = server(
        GateOptions::new()
            .with_reject_http_status(StatusCode::FORBIDDEN)
            .with_strict_bearer_validation(true),
    );

    server
        .get("/api/v1/secret")
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let headers = [
        t.valid.clone(),
        format!("BearerX {}", t.valid),
        format!("Bearer {} extra", t.valid),
        "Bearer xyz".to_string(),
        bearer(&t.foreign),
    ];
    for value in headers {
        let response = server
            .get("/api/v1/secret")
            .add_header("Authorization", value.clone())
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        assert!(response.text().is_empty(), "{value}");
    }

    let response = server
        .get("/api/v1/secret")
        .add_header("Authorization", bearer(&t.expired))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    response.assert_json(&json!({"error": "TokenExpiredError"}));
}

// ============= Admission =============

#[tokio::test]
async fn valid_token_is_admitted_with_claims() {
    let t = tokens();
    let (server, logger) = server_with_logger(GateOptions::new());

    let response = server
        .get("/api/v1/secret")
        .add_header("Authorization", bearer(&t.valid))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["path"], "secret");
    assert_eq!(body["authData"]["user"], "TestUser123");
    assert_eq!(body["authData"]["info"], "test test");
    assert_eq!(
        logger.entries(),
        vec![(LogLevel::Info, messages::VERIFIED.to_string())]
    );
}

#[tokio::test]
async fn header_lookup_is_case_insensitive() {
    let t = tokens();
    let server = server(GateOptions::new());

    server
        .get("/api/v1/secret")
        .add_header("AUTHORIZATION", bearer(&t.valid))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn strict_mode_admits_exact_shape() {
    let t = tokens();
    let server = server(GateOptions::new().with_strict_bearer_validation(true));

    let response = server
        .get("/api/v1/secret")
        .add_header("Authorization", bearer(&t.valid))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["authData"]["user"], "TestUser123");
}

#[tokio::test]
async fn lenient_mode_ignores_prefix() {
    let t = tokens();
    let server = server(GateOptions::new());

    let response = server
        .get("/api/v1/secret")
        .add_header("Authorization", format!("Foo {}", t.valid))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["authData"]["user"], "TestUser123");
}

#[tokio::test]
async fn custom_field_and_header_are_respected() {
    let t = tokens();
    let server = server(
        GateOptions::new()
            .with_request_auth_prop("tokenPayload")
            .with_header(HeaderName::from_static("auth")),
    );

    // The default header is not consulted.
    server
        .get("/api/v1/secret")
        .add_header("Authorization", bearer(&t.valid))
        .await
        .assert_status_unauthorized();

    let response = server
        .get("/api/v1/secret")
        .add_header("auth", bearer(&t.valid))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["tokenPayload"]["user"], "TestUser123");
    assert_eq!(body["tokenPayload"]["info"], "test test");
    assert!(body.get("authData").is_none());
}

#[tokio::test]
async fn requests_through_one_gate_are_independent() {
    let t = tokens();
    let (server, logger) = server_with_logger(GateOptions::new());

    let admitted = server
        .get("/api/v1/secret")
        .add_header("Authorization", bearer(&t.valid))
        .await;
    let rejected = server.get("/api/v1/secret").await;
    let admitted_again = server
        .get("/api/v1/secret")
        .add_header("Authorization", bearer(&t.valid))
        .await;

    admitted.assert_status_ok();
    rejected.assert_status_unauthorized();
    admitted_again.assert_status_ok();

    let levels: Vec<LogLevel> = logger.entries().into_iter().map(|(l, _)| l).collect();
    assert_eq!(levels, vec![LogLevel::Info, LogLevel::Warn, LogLevel::Info]);
}

#[tokio::test]
async fn gate_without_logger_still_decides() {
    let t = tokens();
    let gate = TokenGate::new(GateOptions::new().with_secret(SECRET)).unwrap();
    let server = TestServer::new(app::router(AppState::new(gate))).unwrap();

    server.get("/api/v1/secret").await.assert_status_unauthorized();
    server
        .get("/api/v1/secret")
        .add_header("Authorization", bearer(&t.valid))
        .await
        .assert_status_ok();
}

// ============= Transport =============

#[tokio::test]
async fn request_id_is_set_on_admitted_and_rejected_responses() {
    let t = tokens();
    let server = server(GateOptions::new());

    let admitted = server
        .get("/api/v1/secret")
        .add_header("Authorization", bearer(&t.valid))
        .await;
    let rejected = server.get("/api/v1/secret").await;
    let expired = server
        .get("/api/v1/secret")
        .add_header("Authorization", bearer(&t.expired))
        .await;

    admitted.assert_status_ok();
    rejected.assert_status_unauthorized();
    expired.assert_status_unauthorized();

    for response in [&admitted, &rejected, &expired] {
        let id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .expect("response should carry a request id");
        assert!(!id.is_empty());
    }
}

#[tokio::test]
async fn caller_request_id_is_echoed_on_rejection() {
    let server = server(GateOptions::new());

    let response = server
        .get("/api/v1/secret")
        .add_header("x-request-id", "req-1234")
        .await;

    response.assert_status_unauthorized();
    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap(),
        "req-1234"
    );
}

#[tokio::test]
async fn custom_limits_keep_the_gate_in_place() {
    let t = tokens();
    let gate = TokenGate::new(GateOptions::new().with_secret(SECRET)).unwrap();
    let limits = HttpLimits {
        body_limit_bytes: 64,
        timeout: std::time::Duration::from_secs(5),
    };
    let server =
        TestServer::new(app::router_with_limits(AppState::new(gate), limits)).unwrap();

    server.get("/api/v1/secret").await.assert_status_unauthorized();

    let response = server
        .get("/api/v1/secret")
        .add_header("Authorization", bearer(&t.valid))
        .await;
    response.assert_status_ok();
    assert!(response.headers().get(REQUEST_ID_HEADER).is_some());
}
