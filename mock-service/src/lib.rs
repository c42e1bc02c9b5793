//! In-memory stand-in for the car/user HTTP API the fleet load script exercises.
use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
    Router,
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use metrics::counter;
use std::{
    net::SocketAddr,
    num::NonZeroU32,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, RwLock,
    },
    time::Duration,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

mod auth;
pub mod error;
mod routes;
pub mod store;

pub use error::ApiError;
pub use store::{ADMIN_EMAIL, ADMIN_PASSWORD};

use store::Store;

#[derive(Clone, Debug, Default)]
pub struct MockConfig {
    /// Requests above this rate are answered with a 500.
    pub max_tps: Option<NonZeroU32>,
}

#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<Store>>,
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl AppState {
    fn new(config: &MockConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::new())),
            limiter: config.max_tps.map(|tps| Arc::new(rate_limiter(tps))),
        }
    }
}

pub fn app(config: &MockConfig) -> Router {
    let state = AppState::new(config);

    Router::new()
        .route("/login", post(routes::login))
        .route("/logout", post(routes::logout))
        .route("/car", get(routes::list_cars).post(routes::add_car))
        .route("/car/:id", delete(routes::delete_car))
        .route(
            "/user",
            get(routes::list_users)
                .post(routes::add_user)
                .delete(routes::delete_user),
        )
        .layer(middleware::from_fn_with_state(state.clone(), throttle))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn throttle(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    counter!("mock-server.requests").increment(1);
    TPS_MEASURE.fetch_add(1, Ordering::Relaxed);

    if let Some(limiter) = &state.limiter {
        if limiter.check().is_err() {
            debug!(path = %request.uri().path(), "Rate limited");
            counter!("mock-server.limited").increment(1);
            return Err(ApiError::Overloaded);
        }
    }

    Ok(next.run(request).await)
}

pub async fn run(addr: SocketAddr, config: MockConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    serve(listener, config).await
}

pub async fn serve(listener: TcpListener, config: MockConfig) -> std::io::Result<()> {
    info!("Mock service listening on {}", listener.local_addr()?);
    axum::serve(listener, app(&config)).await
}

/// Bind and serve in the background, returning the bound address. Pass port 0 for an
/// ephemeral port.
pub async fn spawn(addr: SocketAddr, config: MockConfig) -> std::io::Result<SocketAddr> {
    let listener = TcpListener::bind(&addr).await?;
    let local = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(err) = serve(listener, config).await {
            tracing::error!("Mock service stopped: {err}");
        }
    });
    Ok(local)
}

fn rate_limiter(tps: NonZeroU32) -> DefaultDirectRateLimiter {
    RateLimiter::direct(Quota::per_second(tps))
}

/** TPS Printer **/

static TPS_MEASURE: AtomicU64 = AtomicU64::new(0);

pub async fn tps_measure_task() {
    loop {
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let transactions = TPS_MEASURE.swap(0, Ordering::Relaxed);
        if transactions > 0 {
            info!("{transactions} TPS");
        }
    }
}
