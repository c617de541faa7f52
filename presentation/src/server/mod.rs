//! Orchestrator HTTP surface
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /health` | probe every enabled agent |
//! | `GET /agents` | registered agents |
//! | `POST /query` | fan out, aggregate, learn |
//! | `GET /weights` | Weight Store snapshot |
//! | `POST /reload-agents` | re-read the agent list |
//! | `POST /feedback` | apply a late ground truth |

pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use quorum_application::AgentGateway;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

pub use error::{ApiError, ApiResult};
pub use state::AppState;

const CORS_MAX_AGE: Duration = Duration::from_secs(600);

/// Build the router over `state`
pub fn router<G: AgentGateway + 'static>(state: AppState<G>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health::<G>))
        .route("/agents", get(handlers::agents::<G>))
        .route("/query", post(handlers::query::<G>))
        .route("/weights", get(handlers::weights::<G>))
        .route("/reload-agents", post(handlers::reload_agents::<G>))
        .route("/feedback", post(handlers::feedback::<G>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for browser dashboards; an empty list allows any origin
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(CORS_MAX_AGE);

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(parsed))
    }
}

/// Serve until `shutdown` is cancelled
pub async fn serve<G: AgentGateway + 'static>(
    state: AppState<G>,
    bind: &str,
    cors_origins: &[String],
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!("Orchestrator listening on http://{}", listener.local_addr()?);

    let app = router(state).layer(cors_layer(cors_origins));
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Orchestrator stopped");
    Ok(())
}
