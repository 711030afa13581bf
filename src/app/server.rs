use super::cli::ServeArgs;
use super::infra::{demo_offers, AppState, InMemoryOfferRepository};
use super::routes::with_offer_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use offer_pulse::config::AppConfig;
use offer_pulse::error::AppError;
use offer_pulse::offers::OfferService;
use offer_pulse::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = if config.storage.seed_demo_offers {
        let now = Utc::now();
        let offers = demo_offers(now.date_naive(), now);
        info!(count = offers.len(), "seeding demo offers");
        InMemoryOfferRepository::with_offers(offers)
    } else {
        InMemoryOfferRepository::default()
    };
    let offer_service = Arc::new(OfferService::new(Arc::new(repository)));

    let app = with_offer_routes(offer_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "offer tracker ready");

    axum::serve(listener, app).await?;
    Ok(())
}
