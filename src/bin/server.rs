use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use plank_planner::assemble::{OrderResponse, ProductBreakdown};
use plank_planner::catalog::MemoryCatalog;
use plank_planner::config::ServerConfig;
use plank_planner::engine::{OrderRequest, calculate_order_by_product, calculate_order_by_size};
use plank_planner::error::{EngineError, ErrorKind};
use serde::Serialize;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

type AppState = Arc<MemoryCatalog>;

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::UnknownProduct | ErrorKind::UnknownPiece => StatusCode::NOT_FOUND,
        ErrorKind::PieceExceedsStock => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::InternalInvariantViolation => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(err: EngineError) -> ApiError {
    let status = status_for(err.kind());
    if status.is_server_error() {
        tracing::error!(error = %err, "calculation failed");
    } else {
        tracing::warn!(error = %err, "calculation rejected");
    }
    (
        status,
        Json(ErrorResponse {
            message: err.to_string(),
        }),
    )
}

/// A body that does not decode into an `OrderRequest` is a 400 with the same
/// `{"message": ...}` shape as engine errors.
fn bad_request(rejection: JsonRejection) -> ApiError {
    let detail = rejection.body_text();
    tracing::warn!(error = %detail, "request rejected");
    let message = if detail.contains("missing field `products`") {
        "Invalid request, products field is required".to_string()
    } else {
        format!("Invalid request: {detail}")
    };
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { message }))
}

async fn order_by_size(
    State(catalog): State<AppState>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Json<OrderResponse>, ApiError> {
    let Json(req) = payload.map_err(bad_request)?;
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /orders/calculate_order_by_size"
    );
    calculate_order_by_size(&req, catalog.as_ref())
        .map(Json)
        .map_err(api_error)
}

async fn order_by_product(
    State(catalog): State<AppState>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Json<Vec<ProductBreakdown>>, ApiError> {
    let Json(req) = payload.map_err(bad_request)?;
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /orders/calculate_order_by_product"
    );
    calculate_order_by_product(&req, catalog.as_ref())
        .map(Json)
        .map_err(api_error)
}

fn app(catalog: AppState) -> Router {
    Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/orders/calculate_order_by_size", post(order_by_size))
        .route("/orders/calculate_order_by_product", post(order_by_product))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(catalog)
}

fn main() {
    let config = ServerConfig::from_env();

    let _sentry = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .unwrap_or_else(|e| {
            eprintln!("Error: failed to open {}: {}", config.log_file.display(), e);
            std::process::exit(1);
        });

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let catalog = MemoryCatalog::load(&config.catalog_path).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    // The sentry guard must outlive the runtime, so the runtime is built by hand.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error: failed to start runtime: {}", e);
            std::process::exit(1);
        });

    runtime.block_on(serve(config.addr(), Arc::new(catalog)));
}

async fn serve(addr: String, catalog: AppState) {
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap_or_else(|e| {
        eprintln!("Error: failed to bind {addr}: {e}");
        std::process::exit(1);
    });
    eprintln!("Listening on {addr}");
    if let Err(e) = axum::serve(listener, app(catalog)).await {
        tracing::error!(error = %e, "server stopped");
    }
}
