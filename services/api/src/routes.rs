use crate::infra::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use certificados::config::AppEnvironment;
use certificados::documents::{DocumentListingService, ListingError, StorageGateway};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

/// Per-request context for the listing endpoint: the shared service plus
/// the deployment environment, which decides whether failure detail is
/// exposed on 500 responses.
pub(crate) struct PortalState<S> {
    pub(crate) service: Arc<DocumentListingService<S>>,
    pub(crate) environment: AppEnvironment,
}

impl<S> Clone for PortalState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            environment: self.environment,
        }
    }
}

pub(crate) fn portal_router<S>(state: PortalState<S>) -> Router
where
    S: StorageGateway + 'static,
{
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/companies/:identifier",
            get(list_documents_endpoint::<S>),
        )
        .with_state(state)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn list_documents_endpoint<S>(
    State(state): State<PortalState<S>>,
    Path(identifier): Path<String>,
) -> Response
where
    S: StorageGateway + 'static,
{
    match state.service.list_documents(&identifier).await {
        Ok(listing) => (StatusCode::OK, Json(listing.view())).into_response(),
        Err(err) => listing_error_response(err, state.environment),
    }
}

fn listing_error_response(error: ListingError, environment: AppEnvironment) -> Response {
    match error {
        ListingError::InvalidNit(source) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": source.to_string() })),
        )
            .into_response(),
        ListingError::NotFound { nit } => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "message": format!("No documents found for NIT {nit}"),
                "identifier": nit.as_str(),
                "documents": [],
            })),
        )
            .into_response(),
        ListingError::MissingCredentials => {
            error!("listing rejected: storage credentials are not configured");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "server storage configuration is missing" })),
            )
                .into_response()
        }
        ListingError::AccessDenied { status } => {
            error!(status, "document storage denied access");
            (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "no permission to access document storage" })),
            )
                .into_response()
        }
        ListingError::Unreachable { detail } => {
            error!(%detail, "document storage unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "could not reach document storage" })),
            )
                .into_response()
        }
        ListingError::Internal { detail } => {
            error!(%detail, "unclassified failure while listing documents");
            let mut payload = json!({ "error": "internal error while listing documents" });
            if environment.exposes_error_detail() {
                payload["details"] = json!(detail);
            }
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
