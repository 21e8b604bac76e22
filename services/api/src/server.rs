use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::{portal_router, PortalState};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use certificados::config::AppConfig;
use certificados::documents::{AzureBlobStore, DocumentListingService};
use certificados::error::AppError;
use certificados::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let storage = AzureBlobStore::from_config(&config.storage)?.map(Arc::new);
    if storage.is_none() {
        warn!("storage credentials missing; listing requests will report a configuration error");
    }
    let service = Arc::new(DocumentListingService::new(storage));

    let app = portal_router(PortalState {
        service,
        environment: config.environment,
    })
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "certificate portal service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
