mod aggregation;
mod api_types;
mod config;
mod dashboard;
mod http_utils;
mod storage;
mod types;

use api_types::{AppState, PaginationParams};
use axum::extract::Query;
use config::Config;
use dashboard::{Dashboard, DashboardCharts};
use http_utils::{to_http400, to_http500};
use tower_http::trace;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use storage::{InmemoryStorage, SharedInmemoryStorage, Storage};
use types::filter::{FilterChange, FilterCriteria};
use types::transaction::Transaction;

fn make_router(state: AppState) -> Router<()> {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .route("/dashboard", get(get_dashboard))
                .route(
                    "/dashboard/filter",
                    patch(change_filter).put(replace_filter),
                )
                .route("/dashboard/refresh", post(refresh_dashboard))
                .route(
                    "/transactions",
                    get(get_transactions).post(add_transaction),
                ),
        )
        .with_state(state)
        .layer(
            trace::TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
}

async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardCharts> {
    let mut dashboard = state.dashboard.write().await;
    // "this month" moves with the clock
    dashboard.recompute();
    Json(dashboard.charts())
}

async fn change_filter(
    State(state): State<AppState>,
    Json(change): Json<FilterChange>,
) -> Json<DashboardCharts> {
    let mut dashboard = state.dashboard.write().await;
    dashboard.apply_change(change);
    Json(dashboard.charts())
}

async fn replace_filter(
    State(state): State<AppState>,
    Json(criteria): Json<FilterCriteria>,
) -> Json<DashboardCharts> {
    let mut dashboard = state.dashboard.write().await;
    dashboard.set_criteria(criteria);
    Json(dashboard.charts())
}

async fn refresh_dashboard(State(state): State<AppState>) -> Json<DashboardCharts> {
    let mut dashboard = state.dashboard.write().await;
    dashboard.refresh(&state.storage, state.fetch_limit).await;
    Json(dashboard.charts())
}

#[axum_macros::debug_handler]
async fn get_transactions(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<Vec<Transaction>>, (StatusCode, String)> {
    Ok(Json(
        state
            .storage
            .load_transactions(pagination.offset, pagination.count)
            .await
            .map_err(to_http500)?,
    ))
}

async fn add_transaction(
    State(mut state): State<AppState>,
    Json(transaction): Json<Transaction>,
) -> Result<(StatusCode, Json<Transaction>), (StatusCode, String)> {
    transaction.validate().map_err(to_http400)?;
    state
        .storage
        .add_transaction(transaction.clone())
        .await
        .map_err(to_http500)?;
    tracing::info!("stored transaction {}", transaction.id);
    Ok((StatusCode::CREATED, Json(transaction)))
}

async fn build_state(config: &Config) -> Result<AppState, storage::StorageError> {
    let storage = match &config.seed_file {
        Some(path) => {
            tracing::info!("seeding transactions from {}", path.display());
            InmemoryStorage::from_json_file(path)?
        }
        None => InmemoryStorage::new(),
    };
    let storage = SharedInmemoryStorage::new(storage);

    let mut dashboard = Dashboard::new(config.utc_offset);
    dashboard.refresh(&storage, config.fetch_limit).await;

    Ok(AppState::new(storage, dashboard, config.fetch_limit))
}

#[tokio::main]
async fn main() {
    let format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .compact();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .event_format(format)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("invalid configuration: {}", err);
            std::process::exit(1);
        }
    };
    let state = match build_state(&config).await {
        Ok(state) => state,
        Err(err) => {
            tracing::error!("could not start: {}", err);
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(config.address()).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("could not bind {}: {}", config.address(), err);
            std::process::exit(1);
        }
    };
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("listening on {}", addr);
    }
    if let Err(err) = axum::serve(listener, make_router(state)).await {
        tracing::error!("server error: {}", err);
    }
}
