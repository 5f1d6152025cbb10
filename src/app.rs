/*
 * Responsibility
 * - Config読み込み → policy / session verifier 生成 → Router 組み立て
 * - Middleware の適用 (gate / security headers / CORS / request-id・trace)
 * - axum::serve() で起動、SIGHUP で policy ファイルを再読み込み
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware,
    services::{
        access::{Gatekeeper, PolicyTable},
        identity::build_session_verifier,
    },
    state::AppState,
};

fn init_tracing() {
    // RUST_LOG があればそれを優先
    // ex: RUST_LOG=info,tutor_portal=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: crash the whole process so it gets noticed
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting portal in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;

    #[cfg(unix)]
    if let Some(path) = config.access_policy_path.clone() {
        spawn_policy_reload(state.gate.clone(), path);
    }

    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Policy table from `ACCESS_POLICY_PATH`, or the built-in route access map.
/// Any validation error aborts startup.
pub fn load_policy(config: &Config) -> Result<PolicyTable> {
    let table = match &config.access_policy_path {
        Some(path) => PolicyTable::from_json_file(path)
            .with_context(|| format!("loading access policy from {}", path.display()))?,
        None => PolicyTable::builtin().context("building built-in access policy")?,
    };

    tracing::info!(rules = table.rules().len(), "access policy loaded");
    Ok(table)
}

pub fn build_state(config: &Config) -> Result<AppState> {
    let policy = load_policy(config)?;
    let gate = Arc::new(Gatekeeper::new(policy, config.sign_in_path.clone()));

    let sessions =
        build_session_verifier(config).context("building session token verifier")?;

    Ok(AppState::new(
        gate,
        sessions,
        config.session_cookie_name.as_str(),
    ))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let gated = middleware::auth::access::apply(api::gated(), state.clone());

    let router = api::public(&config.sign_in_path)
        .merge(gated)
        .with_state(state);

    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}

#[cfg(unix)]
fn spawn_policy_reload(gate: Arc<Gatekeeper>, path: std::path::PathBuf) {
    use tokio::signal::unix::{SignalKind, signal};

    tokio::spawn(async move {
        let mut hangups = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(err) => {
                tracing::warn!(error = %err, "SIGHUP handler unavailable; policy reload disabled");
                return;
            }
        };

        while hangups.recv().await.is_some() {
            match gate.policy().reload_from_file(&path) {
                Ok(rules) => tracing::info!(rules, path = %path.display(), "access policy reloaded"),
                Err(err) => tracing::error!(
                    error = %err,
                    path = %path.display(),
                    "access policy reload failed; keeping previous table"
                ),
            }
        }
    });
}
