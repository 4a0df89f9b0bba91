//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and domain service wiring
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Extension, Router,
    error_handling::HandleErrorLayer,
    extract::FromRequest,
    http::StatusCode,
    response::Response,
};
use tower::{BoxError, ServiceBuilder};

use realty_auth::{AuthOnly, ModerationOnly, RoleChecker};
use realty_infra::WorkerHandle;

use crate::config::Config;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use errors::ApiError;
use services::AppServices;

/// JSON body extractor whose rejections use the API error shape (always 400).
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// The returned handle joins the notification worker once the router is dropped.
pub async fn build_app(config: &Config) -> anyhow::Result<(Router, WorkerHandle)> {
    let (services, worker) = services::build_services(config).await?;
    Ok((router(Arc::new(services), config.request_timeout), worker))
}

pub fn router(services: Arc<AppServices>, request_timeout: Duration) -> Router {
    let auth_state = middleware::AuthState {
        verifier: services.verifier(),
    };
    let auth_only: Arc<dyn RoleChecker> = Arc::new(AuthOnly);
    let moderation_only: Arc<dyn RoleChecker> = Arc::new(ModerationOnly);

    let authenticated = routes::authenticated().route_layer(axum::middleware::from_fn_with_state(
        auth_only,
        middleware::require_role,
    ));
    let moderation = routes::moderation().route_layer(axum::middleware::from_fn_with_state(
        moderation_only,
        middleware::require_role,
    ));

    // Protected routes: verify the token first, then the per-route role gate.
    let protected = authenticated
        .merge(moderation)
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .merge(routes::public())
        .merge(protected)
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(request_timeout),
        )
}

async fn handle_middleware_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("request timed out");
        errors::json_error(StatusCode::REQUEST_TIMEOUT, "timeout", "request timed out")
    } else {
        tracing::error!(error = %err, "unhandled middleware error");
        errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            "internal error",
        )
    }
}
