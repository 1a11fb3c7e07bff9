/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskmate_api::{app::{build_mailer, build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let mailer = build_mailer(&config.mail);
/// let state = AppState::new(pool, config, mailer);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, config::MailConfig, middleware::security::SecurityHeadersLayer};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskmate_shared::{
    auth::middleware::create_bearer_middleware,
    mail::{HttpMailer, Mailer, NullMailer},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Outbound mail dispatcher
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            mailer,
        }
    }

    /// Bearer-token lifetime, if one is configured
    pub fn token_ttl(&self) -> Option<i64> {
        self.config.auth.token_ttl_seconds
    }
}

/// Builds the mailer matching the configuration
///
/// A configured relay URL selects the HTTP mailer; otherwise messages are
/// logged, which keeps the OTP flows usable in development.
pub fn build_mailer(config: &MailConfig) -> Arc<dyn Mailer> {
    match &config.relay_url {
        Some(relay_url) => Arc::new(HttpMailer::new(
            relay_url.clone(),
            config.from_address.clone(),
        )),
        None => Arc::new(NullMailer),
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                    # Health check (public)
/// ├── /auth/
/// │   ├── POST /register         # public
/// │   ├── POST /resend-code      # public
/// │   ├── POST /verify-email     # public
/// │   ├── POST /login            # public
/// │   ├── POST /forgot-password  # public
/// │   ├── POST /reset-password   # public
/// │   ├── GET  /profile          # bearer token
/// │   ├── PUT  /update-profile   # bearer token
/// │   ├── PUT  /change-password  # bearer token
/// │   └── POST /logout           # bearer token
/// └── /tasks/                    # bearer token
///     ├── GET    /               # filtered/paginated list
///     ├── POST   /               # create
///     ├── POST   /share          # grant access
///     ├── GET    /:id            # fetch one
///     ├── PUT    /:id            # update
///     └── DELETE /:id            # delete (owner only)
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public auth endpoints
    let public_auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/resend-code", post(routes::auth::resend_code))
        .route("/verify-email", post(routes::auth::verify_email))
        .route("/login", post(routes::auth::login))
        .route("/forgot-password", post(routes::auth::forgot_password))
        .route("/reset-password", post(routes::auth::reset_password));

    // Account endpoints (require a bearer token)
    let account_routes = Router::new()
        .route("/profile", get(routes::profile::profile))
        .route("/update-profile", put(routes::profile::update_profile))
        .route("/change-password", put(routes::profile::change_password))
        .route("/logout", post(routes::profile::logout))
        .layer(axum::middleware::from_fn(create_bearer_middleware(
            state.db.clone(),
        )));

    // Task endpoints (require a bearer token)
    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route("/share", post(routes::tasks::share_tasks))
        .route(
            "/:id",
            get(routes::tasks::show_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .layer(axum::middleware::from_fn(create_bearer_middleware(
            state.db.clone(),
        )));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/auth", public_auth_routes.merge(account_routes))
        .nest("/tasks", task_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
