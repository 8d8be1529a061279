/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → TokenGate 生成 → Router 組み立て
 * - axum::serve() で起動
 */
use std::{panic, process};

use axum::Router;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::{AppEnv, Config};
use crate::error::AppError;
use crate::gate::TokenGate;
use crate::middleware::http::{self, HttpLimits};
use crate::state::AppState;

const DEFAULT_LOG_FILTER: &str = "info,jwt_gate=info,tower_http=info";

/// `RUST_LOG` wins when it parses; an empty or broken value falls back to
/// the default so a typo never silences the gate's log lines.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn init_tracing() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(log_filter(directives.as_deref()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Report panics through tracing. Development aborts the process; production
/// keeps serving and hands the panic to the previous hook.
fn install_panic_hook(app_env: AppEnv) {
    let previous = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown".into());

        tracing::error!(
            %location,
            payload = info.payload_as_str().unwrap_or("<non-string payload>"),
            "panic"
        );

        if app_env.is_production() {
            previous(info);
        } else {
            process::abort();
        }
    }))
}

pub async fn run() -> Result<(), AppError> {
    init_tracing();

    let config = Config::from_env().inspect_err(|err| tracing::error!(%err, "bad configuration"))?;
    install_panic_hook(config.app_env);

    // Fail fast: the gate is validated before the listener is bound.
    let gate = TokenGate::new(config.gate_options())?;

    tracing::info!(
        "starting gate in {:?} mode on {} (header={}, reject_status={}, strict_bearer={})",
        config.app_env,
        config.addr,
        gate.config().header(),
        gate.config().reject_status(),
        gate.config().strict_bearer(),
    );

    let app = router_with_limits(AppState::new(gate), config.http_limits);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|err| {
            tracing::error!(%err, addr = %config.addr, "failed to bind");
            AppError::Internal
        })?;
    axum::serve(listener, app).await.map_err(|err| {
        tracing::error!(%err, "server error");
        AppError::Internal
    })?;

    Ok(())
}

/// Full host router: `/api/v1/{health,public,secret}` plus transport layers.
pub fn router(state: AppState) -> Router {
    router_with_limits(state, HttpLimits::default())
}

pub fn router_with_limits(state: AppState, limits: HttpLimits) -> Router {
    let v1 = api::v1::routes(&state);

    let router = Router::new().nest("/api/v1", v1).with_state(state);

    http::apply(router, limits)
}
