use crate::cli::ServeArgs;
use crate::infra::{load_directory, AppState};
use crate::routes::with_match_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use voter_match::config::AppConfig;
use voter_match::error::AppError;
use voter_match::matching::MatchService;
use voter_match::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(directory) = args.directory.take() {
        config.matching.directory_dir = Some(directory);
    }
    if let Some(policy) = args.range_policy.take() {
        config.matching.range_policy = policy;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let directory = Arc::new(load_directory(config.matching.directory_dir.as_deref())?);
    let match_service = Arc::new(MatchService::new(
        directory.clone(),
        directory,
        config.matching.range_policy,
    ));

    let app = with_match_routes(match_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        range_policy = config.matching.range_policy.label(),
        "voter match service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
