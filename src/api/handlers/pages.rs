/*
 * Responsibility
 * - ダッシュボードのページ handler (gate を通過したリクエストだけが来る)
 * - 描画とデータ取得は別サービスの責務。ここは誰が何を見ているかだけ返す
 */
use axum::{Json, extract::Path};

use crate::{
    api::dto::pages::{DashboardPage, ListEntity, ListPage, ProfilePage, SignInPage, Viewer},
    api::extractors::{AuthCtx, AuthCtxExtractor},
    error::AppError,
    services::access::Role,
};

fn viewer(ctx: &AuthCtx) -> Viewer {
    Viewer {
        subject: ctx.subject.clone(),
        role: ctx.role,
    }
}

fn dashboard(dashboard: Role, ctx: &AuthCtx) -> Json<DashboardPage> {
    Json(DashboardPage {
        page: "dashboard",
        dashboard,
        viewer: viewer(ctx),
    })
}

pub async fn admin_home(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<DashboardPage> {
    dashboard(Role::Admin, &ctx)
}

pub async fn tutor_home(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<DashboardPage> {
    dashboard(Role::Tutor, &ctx)
}

pub async fn student_home(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<DashboardPage> {
    dashboard(Role::Student, &ctx)
}

pub async fn parent_home(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<DashboardPage> {
    dashboard(Role::Parent, &ctx)
}

pub async fn admin_settings(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<DashboardPage> {
    Json(DashboardPage {
        page: "settings",
        dashboard: Role::Admin,
        viewer: viewer(&ctx),
    })
}

pub async fn list(
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(entity): Path<String>,
) -> Result<Json<ListPage>, AppError> {
    let entity: ListEntity = entity.parse().map_err(|_| AppError::not_found("list"))?;

    Ok(Json(ListPage {
        page: "list",
        entity,
        viewer: viewer(&ctx),
        items: Vec::new(),
    }))
}

pub async fn profile(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<ProfilePage> {
    Json(ProfilePage {
        page: "profile",
        home: ctx.role.home_path(),
        session_expires_at: ctx.session_expires_at,
        viewer: viewer(&ctx),
    })
}

pub async fn sign_in() -> Json<SignInPage> {
    Json(SignInPage { page: "sign-in" })
}

pub async fn not_found() -> AppError {
    AppError::not_found("page")
}
