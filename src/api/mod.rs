use crate::api::handlers::{
    admin,
    auth::{self, token::TokenConfig, AdminSeed},
    blog, contact, favorites, health, payments::{self, PaymentGateway}, projects, resources,
};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    routing::{get, post, put},
    Extension, Json, Router,
};
use std::{future::Future, net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, warn, Span};
use ulid::Ulid;

pub mod error;
pub mod handlers;
mod openapi;
pub mod storage;

pub use openapi::openapi;

use self::{
    error::ApiError,
    storage::{MemoryStore, PgStore, SharedStore},
};

/// Everything the handlers need, shared through `Extension` layers.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub tokens: Arc<TokenConfig>,
    pub gateway: Arc<PaymentGateway>,
}

impl AppState {
    #[must_use]
    pub fn new(store: SharedStore, tokens: TokenConfig, gateway: PaymentGateway) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
            gateway: Arc::new(gateway),
        }
    }
}

/// Server settings resolved by the CLI.
#[derive(Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub dsn: Option<String>,
    pub tokens: TokenConfig,
    pub cors_origins: Vec<String>,
    pub admin: Option<AdminSeed>,
    pub gateway: PaymentGateway,
}

/// Build the full router: `/health`, `/api/openapi.json` and every `/api` route.
#[must_use]
pub fn router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/openapi.json", get(|| async { Json(openapi()) }))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route(
            "/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        // GET addresses a project by slug, PUT/DELETE by id.
        .route(
            "/projects/:project",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/blog", get(blog::list_posts).post(blog::create_post))
        .route("/blog/:slug", get(blog::get_post))
        .route(
            "/contact",
            post(contact::submit_inquiry).get(contact::list_inquiries),
        )
        .route("/contact/:id/status", put(contact::update_inquiry_status))
        .route(
            "/resources",
            get(resources::list_resources).post(resources::create_resource),
        )
        .route("/payments/create-order", post(payments::create_order))
        .route("/payments/verify", post(payments::verify_payment))
        .route("/users/favorites", get(favorites::list_favorites))
        .route(
            "/users/favorites/:project_id",
            post(favorites::add_favorite).delete(favorites::remove_favorite),
        )
        .route("/admin/analytics", get(admin::analytics))
        .fallback(|| async { ApiError::NotFound("Not Found") });

    Router::new()
        .route("/health", get(health::health).head(health::health))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(state.store))
                .layer(Extension(state.tokens))
                .layer(Extension(state.gateway)),
        )
}

/// Builds the CORS layer. A `*` entry allows any origin; credentials are never allowed.
///
/// # Errors
/// Returns an error if an origin is not a valid header value.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let allow_origin = if origins.is_empty() || origins.iter().any(|origin| origin.trim() == "*")
    {
        AllowOrigin::any()
    } else {
        let values = origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin.trim().trim_end_matches('/'))
                    .with_context(|| format!("Invalid CORS origin: {origin}"))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(allow_origin))
}

/// Opens the configured store. Without a DSN the data lives in memory only.
///
/// # Errors
/// Returns an error if the database is unreachable or the schema cannot be applied.
pub async fn open_store(dsn: Option<&str>) -> Result<SharedStore> {
    match dsn {
        Some(dsn) => {
            let store = PgStore::connect(dsn)
                .await
                .context("Failed to connect to database")?;
            store.migrate().await.context("Failed to apply schema")?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("No DSN configured, using the in-memory store; data is lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(config: ServerConfig) -> Result<()> {
    let store = open_store(config.dsn.as_deref()).await?;

    if let Some(seed) = &config.admin {
        auth::bootstrap_admin(store.as_ref(), seed)
            .await
            .context("Failed to bootstrap admin account")?;
    }

    if !config.gateway.is_configured() {
        info!("Payment gateway keys not set, payment routes answer 503");
    }

    let cors = cors_layer(&config.cors_origins)?;
    let app = router(AppState::new(store, config.tokens, config.gateway), cors);

    let listener = TcpListener::bind(format!("::0:{}", config.port)).await?;

    info!("Listening on [::]:{}", config.port);

    serve(listener, app, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for shutdown signal: {err}");
        }
        info!("Gracefully shutdown");
    })
    .await
}

/// Serves `app` on an already bound listener until `shutdown` resolves.
///
/// # Errors
/// Returns an error if the server fails.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
