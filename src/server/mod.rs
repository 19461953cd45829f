//! HTTP decision service
//!
//! Serves navigation, feature-gate and route decisions to the frontend and
//! to other backend services.
//!
//! | method | path                                    | body / result                   |
//! |--------|-----------------------------------------|---------------------------------|
//! | GET    | `/health`                               | service status                  |
//! | POST   | `/api/access/navigation`                | `{user?, accountId?, workspaceId?}` |
//! | POST   | `/api/access/gate`                      | `{accountId?, requiredPlan?, ...}`  |
//! | POST   | `/api/access/route`                     | `{user?, accountId?, path}`     |
//! | DELETE | `/api/access/subscriptions/{accountId}` | drop the cached subscription    |

pub mod handlers;

use crate::access::RouteGuard;
use crate::billing::{HttpSubscriptionSource, SubscriptionService, SubscriptionSource};
use crate::config::AppConfig;
use crate::error::{AppError, ServerError};
use crate::navigation::{NavigationResolver, NavigationTable};
use axum::{
    Router,
    routing::{delete, get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Default port for the decision service
pub const DEFAULT_PORT: u16 = 20480;

/// Shared state for handlers
#[derive(Clone)]
pub struct AppState {
    pub navigation: Arc<NavigationResolver>,
    pub routes: Arc<RouteGuard>,
    pub subscriptions: Arc<SubscriptionService>,
    pub service_name: Arc<str>,
}

impl AppState {
    /// Build state from configuration, talking to the configured billing service
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let source = HttpSubscriptionSource::new(&config.billing)?;
        Self::with_source(config, Arc::new(source))
    }

    /// Build state from configuration with an explicit subscription source
    pub fn with_source(
        config: &AppConfig,
        source: Arc<dyn SubscriptionSource>,
    ) -> Result<Self, AppError> {
        let table = NavigationTable::load_or_default(config.navigation.table_path.as_deref())?;
        let navigation = NavigationResolver::new(table, &config.navigation);
        let routes = RouteGuard::new(&config.routes.rules)?;
        let subscriptions = SubscriptionService::new(
            source,
            Duration::from_secs(config.cache.ttl_secs),
            config.cache.max_entries,
        );

        Ok(Self {
            navigation: Arc::new(navigation),
            routes: Arc::new(routes),
            subscriptions: Arc::new(subscriptions),
            service_name: config.server.name.as_str().into(),
        })
    }
}

/// Build the router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/access/navigation", post(handlers::navigation))
        .route("/api/access/gate", post(handlers::gate))
        .route("/api/access/route", post(handlers::route))
        .route(
            "/api/access/subscriptions/{account_id}",
            delete(handlers::invalidate_subscription),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Run the server until Ctrl+C
pub async fn run_server(host: &str, port: u16, state: AppState) -> Result<(), ServerError> {
    let bind: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e: std::net::AddrParseError| ServerError::InvalidAddress(e.to_string()))?;

    let listener = TcpListener::bind(bind).await?;
    info!("Access decision service listening on http://{}", bind);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received shutdown signal");
            }
        })
        .await?;

    info!("Access decision service stopped");
    Ok(())
}
