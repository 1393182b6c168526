use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryChangeBroadcast, InMemoryHireRepository, InMemoryProfileRepository,
};
use crate::routes::with_platform_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use jtutors::config::AppConfig;
use jtutors::error::AppError;
use jtutors::marketplace::hires::HireLedgerService;
use jtutors::marketplace::profile::TutorProfileService;
use jtutors::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

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

    let profiles = Arc::new(TutorProfileService::new(
        Arc::new(InMemoryProfileRepository::default()),
        Arc::new(InMemoryChangeBroadcast::default()),
    ));
    let ledger = Arc::new(HireLedgerService::new(Arc::new(
        InMemoryHireRepository::default(),
    )));

    let app = with_platform_routes(profiles, ledger)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "tutor marketplace api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
