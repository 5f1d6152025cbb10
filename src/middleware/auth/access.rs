//! セッション検証 → gatekeeper 判定 → AuthCtx を extensions に入れる
//!
//! - 資格情報 (Bearer / session cookie) が無い・検証に失敗した場合は「未認証」として扱う
//! - 判定は `Gatekeeper::decide` に委譲し、ここでは HTTP への変換だけを行う
//!   - Allow: AuthCtx を extensions に載せて handler へ
//!   - RedirectTo: 307 + Location (sign-in またはロールのホーム)
//! - ルーティングと Path extractor はデコード後のセグメントを見るので、判定もデコード後のパスで行う

use std::borrow::Cow;

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
};

use percent_encoding::percent_decode_str;

use crate::api::extractors::AuthCtx;
use crate::services::access::{Decision, IdentityClaim};
use crate::services::identity::credentials;
use crate::state::AppState;

/// 保護対象のルート群に gatekeeper を掛ける。
///
/// 例：
/// ```ignore
/// let pages = api::routes::gated();
/// let pages = middleware::auth::access::apply(pages, state.clone());
/// app = app.merge(pages);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    OriginalUri(original_uri): OriginalUri,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let claim = resolve_claim(&state, &req);
    let path = decoded_path(original_uri.path());

    match state.gate.decide(&path, claim.as_ref()) {
        Decision::Allow => {
            if let Some(claim) = claim {
                // middleware → extractor への受け渡し
                req.extensions_mut().insert(AuthCtx::from(claim));
            }
            next.run(req).await
        }
        Decision::RedirectTo(location) => {
            match &claim {
                Some(claim) => tracing::info!(
                    path = %path,
                    role = %claim.role,
                    location = %location,
                    "access denied; redirecting to role home"
                ),
                None => tracing::debug!(path = %path, "no verified session; redirecting to sign-in"),
            }
            Redirect::temporary(&location).into_response()
        }
    }
}

// 不正な UTF-8 は空パスにする (decide 側で未認証なら sign-in、認証済みならホームへ)
fn decoded_path(raw: &str) -> Cow<'_, str> {
    match percent_decode_str(raw).decode_utf8() {
        Ok(path) => path,
        Err(err) => {
            tracing::warn!(path = %raw, error = %err, "request path is not valid UTF-8 after decoding");
            Cow::Borrowed("")
        }
    }
}

// 検証失敗は「未認証」と同じ扱い (理由だけログに残す)
fn resolve_claim(state: &AppState, req: &Request<Body>) -> Option<IdentityClaim> {
    let token = credentials::session_token(req.headers(), &state.session_cookie_name)?;

    match state.sessions.verify(token) {
        Ok(claim) => Some(claim),
        Err(err) => {
            tracing::warn!(error = %err, "session token verification failed");
            None
        }
    }
}
