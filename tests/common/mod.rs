#![allow(dead_code)]

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use tutor_portal::app::{build_router, build_state};
use tutor_portal::config::{AppEnv, Config};

pub const ISSUER: &str = "https://id.example.test";
pub const AUDIENCE: &str = "tutor-portal";
pub const PRIVATE_PEM: &str = include_str!("../fixtures/session_private.pem");
pub const PUBLIC_PEM: &str = include_str!("../fixtures/session_public.pem");
pub const FOREIGN_PRIVATE_PEM: &str = include_str!("../fixtures/foreign_private.pem");

pub fn config() -> Config {
    Config {
        addr: "127.0.0.1:0".parse().expect("addr"),
        app_env: AppEnv::Development,
        cors_allowed_origins: Vec::new(),
        auth_issuer: ISSUER.to_string(),
        auth_audience: AUDIENCE.to_string(),
        session_token_leeway_seconds: 0,
        session_jwt_public_key_pem: PUBLIC_PEM.to_string(),
        session_cookie_name: "__session".to_string(),
        sign_in_path: "/sign-in".to_string(),
        access_policy_path: None,
    }
}

pub fn config_with_policy(path: PathBuf) -> Config {
    Config {
        access_policy_path: Some(path),
        ..config()
    }
}

pub fn app_with(config: &Config) -> Router {
    let state = build_state(config).expect("state");
    build_router(state, config)
}

pub fn app() -> Router {
    app_with(&config())
}

pub fn sign(pem: &str, claims: &Value) -> String {
    let key = EncodingKey::from_ed_pem(pem.as_bytes()).expect("private key");
    jsonwebtoken::encode(&Header::new(Algorithm::EdDSA), claims, &key).expect("sign")
}

/// Session token as the identity provider issues it (`metadata.role`).
pub fn session_for(role: &str) -> String {
    sign(
        PRIVATE_PEM,
        &json!({
            "iss": ISSUER,
            "aud": AUDIENCE,
            "sub": format!("user_{role}"),
            "exp": chrono::Utc::now().timestamp() + 600,
            "metadata": { "role": role },
        }),
    )
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("request")
}

pub fn get_with_bearer(path: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request")
}

pub fn get_with_cookie(path: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request")
}

pub fn location(response: &axum::response::Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}
