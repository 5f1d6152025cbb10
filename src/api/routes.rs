/*
 * Responsibility
 * - ポータルの URL 構造を定義
 * - public: gate を通さない (health, sign-in)
 * - gated: gatekeeper の判定を通過したリクエストだけが届く
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::handlers::{
    health::health,
    pages::{
        admin_home, admin_settings, list, not_found, parent_home, profile, sign_in, student_home,
        tutor_home,
    },
};

/// Fixed paths served by this router. The sign-in path must not collide with any of them.
pub const RESERVED_PATHS: &[&str] = &[
    "/health",
    "/admin",
    "/admin/settings",
    "/tutor",
    "/student",
    "/parent",
    "/profile",
];

const LIST_PREFIX: &str = "/List/";

/// Whether `path` is already routed (or would be captured by `/List/{entity}`).
pub fn is_reserved_path(path: &str) -> bool {
    let path = path.trim_end_matches('/');
    RESERVED_PATHS.contains(&path) || path == "/List" || path.starts_with(LIST_PREFIX)
}

pub fn public(sign_in_path: &str) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route(sign_in_path, get(sign_in))
}

pub fn gated() -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin_home))
        .route("/admin/settings", get(admin_settings))
        .route("/tutor", get(tutor_home))
        .route("/student", get(student_home))
        .route("/parent", get(parent_home))
        .route("/List/{entity}", get(list))
        .route("/profile", get(profile))
        // unknown paths go through the gate too, so they redirect like any other page
        .fallback(not_found)
}
