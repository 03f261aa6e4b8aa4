//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::services::{
    DailyStatsService, PaymentReconciler, SessionLedger, StationRegistry,
};
use crate::domain::RepositoryProvider;
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::interfaces::http::modules::{
    analytics, customers, games, health, monitoring, payments, sessions, stations,
};
use crate::interfaces::ws::{create_notification_state, ws_notifications_handler};
use crate::notifications::SharedEventBus;
use crate::shared::ActivityLog;

/// Everything the routers need, built once in main.
pub struct ApiContext {
    pub repos: Arc<dyn RepositoryProvider>,
    pub registry: Arc<StationRegistry>,
    pub ledger: Arc<SessionLedger>,
    pub reconciler: Arc<PaymentReconciler>,
    pub stats: Arc<DailyStatsService>,
    pub event_bus: SharedEventBus,
    pub activity: Arc<ActivityLog>,
    pub prometheus: PrometheusHandle,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Stations
        stations::handlers::list_stations,
        stations::handlers::get_station,
        stations::handlers::create_station,
        stations::handlers::update_station,
        stations::handlers::set_maintenance,
        stations::handlers::clear_maintenance,
        stations::handlers::get_active_session,
        // Sessions
        sessions::handlers::start_session,
        sessions::handlers::end_session,
        sessions::handlers::cancel_session,
        sessions::handlers::get_session,
        sessions::handlers::list_sessions,
        sessions::handlers::get_active_sessions,
        // Payments
        payments::handlers::list_payments,
        payments::handlers::get_payment,
        payments::handlers::settle_payment,
        payments::handlers::settle_session,
        payments::handlers::create_split,
        payments::handlers::get_split,
        payments::handlers::set_part_count,
        payments::handlers::remove_part,
        payments::handlers::set_part_amount,
        payments::handlers::pay_part,
        payments::handlers::initiate_mpesa,
        payments::handlers::generate_qr,
        payments::handlers::check_mpesa_status,
        payments::handlers::confirm_mpesa,
        // Customers
        customers::handlers::list_customers,
        customers::handlers::get_customer,
        customers::handlers::create_customer,
        customers::handlers::update_customer,
        customers::handlers::delete_customer,
        // Games
        games::handlers::list_games,
        games::handlers::get_game,
        games::handlers::create_game,
        games::handlers::update_game,
        games::handlers::delete_game,
        // Analytics
        analytics::handlers::get_daily_stats,
        analytics::handlers::recompute_daily_stats,
        analytics::handlers::get_payment_method_breakdown,
        analytics::handlers::get_game_performance,
        analytics::handlers::get_loyalty_segments,
        // Monitoring
        monitoring::get_activity,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<sessions::SessionDto>,
            PaginatedResponse<payments::PaymentDto>,
            PaginationParams,
            // Health
            health::HealthStatus,
            // Stations
            stations::StationDto,
            stations::CreateStationRequest,
            stations::UpdateStationRequest,
            stations::MaintenanceRequest,
            // Sessions
            sessions::SessionDto,
            sessions::StartSessionRequest,
            sessions::handlers::SessionEndDto,
            // Payments
            payments::PaymentDto,
            payments::SplitPlanDto,
            payments::dto::SplitPartDto,
            payments::dto::SettlePaymentRequest,
            payments::dto::SettleSessionRequest,
            payments::dto::CreateSplitRequest,
            payments::dto::SetPartCountRequest,
            payments::dto::SetPartAmountRequest,
            payments::dto::PayPartRequest,
            payments::dto::InitiateMpesaRequest,
            payments::dto::QrMpesaRequest,
            payments::dto::CheckoutDto,
            payments::dto::CheckoutStatusDto,
            payments::dto::ConfirmOutcomeDto,
            payments::handlers::PayPartDto,
            // Customers
            customers::CustomerDto,
            customers::CreateCustomerRequest,
            customers::UpdateCustomerRequest,
            // Games
            games::GameDto,
            games::CreateGameRequest,
            games::UpdateGameRequest,
            // Analytics
            analytics::handlers::DailyStatDto,
            analytics::handlers::MethodBreakdownDto,
            analytics::handlers::GamePerformanceDto,
            analytics::handlers::LoyaltySegmentDto,
            // Monitoring
            monitoring::ActivityEntryDto,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Stations", description = "Gaming station registry: rate cards, maintenance, occupancy"),
        (name = "Sessions", description = "Play session lifecycle: start, end, cancel"),
        (name = "Payments", description = "Settlement: cash, M-PESA, split payments, loyalty accrual"),
        (name = "Customers", description = "Customer records and loyalty balances"),
        (name = "Games", description = "Game catalog for fixed-price sessions"),
        (name = "Analytics", description = "Read-only aggregates for reports and dashboards"),
        (name = "Monitoring", description = "Recent activity and metrics"),
        (name = "WebSocket Notifications", description = "Real-time event notifications via WebSocket"),
    ),
    info(
        title = "Gamelounge POS API",
        version = "1.0.0",
        description = "REST API for the gaming-lounge point-of-sale core",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(ctx: ApiContext) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let station_routes = Router::new()
        .route(
            "/",
            get(stations::handlers::list_stations).post(stations::handlers::create_station),
        )
        .route(
            "/{id}",
            get(stations::handlers::get_station).put(stations::handlers::update_station),
        )
        .route(
            "/{id}/maintenance",
            post(stations::handlers::set_maintenance)
                .delete(stations::handlers::clear_maintenance),
        )
        .route(
            "/{id}/active-session",
            get(stations::handlers::get_active_session),
        )
        .with_state(stations::handlers::StationAppState {
            registry: ctx.registry.clone(),
        });

    let session_routes = Router::new()
        .route(
            "/",
            get(sessions::handlers::list_sessions).post(sessions::handlers::start_session),
        )
        .route("/active", get(sessions::handlers::get_active_sessions))
        .route("/{id}", get(sessions::handlers::get_session))
        .route("/{id}/end", post(sessions::handlers::end_session))
        .route("/{id}/cancel", post(sessions::handlers::cancel_session))
        .with_state(sessions::handlers::SessionAppState {
            ledger: ctx.ledger.clone(),
        });

    let payment_routes = Router::new()
        .route("/", get(payments::handlers::list_payments))
        .route("/{id}", get(payments::handlers::get_payment))
        .route("/{id}/settle", post(payments::handlers::settle_payment))
        .route(
            "/sessions/{session_id}/settle",
            post(payments::handlers::settle_session),
        )
        .route("/splits", post(payments::handlers::create_split))
        .route("/splits/{plan_id}", get(payments::handlers::get_split))
        .route(
            "/splits/{plan_id}/parts",
            put(payments::handlers::set_part_count),
        )
        .route(
            "/splits/{plan_id}/parts/{index}",
            put(payments::handlers::set_part_amount).delete(payments::handlers::remove_part),
        )
        .route(
            "/splits/{plan_id}/parts/{index}/pay",
            post(payments::handlers::pay_part),
        )
        .route("/mpesa/initiate", post(payments::handlers::initiate_mpesa))
        .route("/mpesa/qr", post(payments::handlers::generate_qr))
        .route(
            "/mpesa/{checkout_id}/status",
            get(payments::handlers::check_mpesa_status),
        )
        .route(
            "/mpesa/{checkout_id}/confirm",
            post(payments::handlers::confirm_mpesa),
        )
        .with_state(payments::handlers::PaymentAppState {
            reconciler: ctx.reconciler.clone(),
        });

    let customer_routes = Router::new()
        .route(
            "/",
            get(customers::handlers::list_customers).post(customers::handlers::create_customer),
        )
        .route(
            "/{id}",
            get(customers::handlers::get_customer)
                .put(customers::handlers::update_customer)
                .delete(customers::handlers::delete_customer),
        )
        .with_state(customers::handlers::CustomerAppState {
            repos: ctx.repos.clone(),
            event_bus: ctx.event_bus.clone(),
        });

    let game_routes = Router::new()
        .route(
            "/",
            get(games::handlers::list_games).post(games::handlers::create_game),
        )
        .route(
            "/{id}",
            get(games::handlers::get_game)
                .put(games::handlers::update_game)
                .delete(games::handlers::delete_game),
        )
        .with_state(games::handlers::GameAppState {
            repos: ctx.repos.clone(),
            event_bus: ctx.event_bus.clone(),
        });

    let analytics_routes = Router::new()
        .route("/daily", get(analytics::handlers::get_daily_stats))
        .route(
            "/daily/{date}/recompute",
            post(analytics::handlers::recompute_daily_stats),
        )
        .route(
            "/payment-methods",
            get(analytics::handlers::get_payment_method_breakdown),
        )
        .route("/games", get(analytics::handlers::get_game_performance))
        .route(
            "/loyalty-segments",
            get(analytics::handlers::get_loyalty_segments),
        )
        .with_state(analytics::handlers::AnalyticsAppState {
            repos: ctx.repos.clone(),
            stats: ctx.stats.clone(),
        });

    let monitoring_routes = Router::new()
        .route("/activity", get(monitoring::get_activity))
        .with_state(monitoring::MonitoringState {
            activity: ctx.activity.clone(),
        });

    // Notification WebSocket routes
    let notification_routes = Router::new()
        .route("/ws", get(ws_notifications_handler))
        .with_state(create_notification_state(ctx.event_bus.clone()));

    let metrics_routes = Router::new()
        .route("/", get(monitoring::render_metrics))
        .with_state(monitoring::MetricsState {
            handle: ctx.prometheus,
        });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        .merge(swagger_routes)
        .route("/health", get(health::health_check))
        .nest("/metrics", metrics_routes)
        .nest("/api/v1/stations", station_routes)
        .nest("/api/v1/sessions", session_routes)
        .nest("/api/v1/payments", payment_routes)
        .nest("/api/v1/customers", customer_routes)
        .nest("/api/v1/games", game_routes)
        .nest("/api/v1/analytics", analytics_routes)
        .nest("/api/v1/monitoring", monitoring_routes)
        .nest("/api/v1/notifications", notification_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
