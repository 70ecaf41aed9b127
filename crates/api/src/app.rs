use axum::{middleware, routing::{get, post}, Router};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer, cors::{Any, CorsLayer}, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{drivers, health, payments, rides, trips};
use domain::services::{
    AssignmentManager, GeoIndex, InMemoryGeoIndex, Matcher, PaymentSettler, RideOrchestrator,
    RideStore, SimulatedPaymentProvider, TripManager,
};
use persistence::PgStore;

/// Shared application state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub store: Arc<dyn RideStore>,
    pub geo_index: Arc<dyn GeoIndex>,
    pub orchestrator: Arc<RideOrchestrator>,
    pub assignment_manager: Arc<AssignmentManager>,
    pub trip_manager: Arc<TripManager>,
    pub payment_settler: Arc<PaymentSettler>,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Self {
        let config = Arc::new(config);
        let store: Arc<dyn RideStore> = Arc::new(PgStore::new(pool.clone()));

        let geo_index: Arc<dyn GeoIndex> = Arc::new(InMemoryGeoIndex::new(
            config.matching.geo_bucket_size_km,
            chrono::Duration::seconds(config.matching.max_position_age_secs as i64),
        ));

        let matcher = Arc::new(Matcher::new(geo_index.clone()));

        let payment_settler = Arc::new(PaymentSettler::new(
            store.clone(),
            Arc::new(SimulatedPaymentProvider),
            Duration::from_secs(config.matching.settlement_delay_secs),
        ));

        let trip_manager = Arc::new(TripManager::new(
            store.clone(),
            geo_index.clone(),
            payment_settler.clone(),
        ));

        let assignment_manager = Arc::new(AssignmentManager::new(
            store.clone(),
            Duration::from_secs(config.matching.assignment_ttl_secs),
        ));

        let orchestrator = Arc::new(RideOrchestrator::new(
            store.clone(),
            matcher,
            assignment_manager.clone(),
            config.matching.match_radius_km,
        ));

        Self {
            pool,
            config,
            store,
            geo_index,
            orchestrator,
            assignment_manager,
            trip_manager,
            payment_settler,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler));

    let ride_routes = Router::new()
        .route("/v1/rides", post(rides::create_ride))
        .route("/v1/rides/:id", get(rides::get_ride));

    let driver_routes = Router::new()
        .route("/v1/drivers/:id/location", post(drivers::update_location))
        .route("/v1/drivers/:id/accept", post(drivers::accept))
        .route("/v1/drivers/:id/decline", post(drivers::decline));

    let trip_routes = Router::new().route("/v1/trips/:id/end", post(trips::end_trip));

    let payment_routes = Router::new().route("/v1/payments", post(payments::trigger_payment));

    let request_timeout_secs = state.config.server.request_timeout_secs;

    let app = Router::new()
        .merge(public_routes)
        .merge(ride_routes)
        .merge(driver_routes)
        .merge(trip_routes)
        .merge(payment_routes)
        .with_state(state);

    app.layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(request_timeout_secs)))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
}
