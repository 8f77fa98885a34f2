//! # stardate: birthdays, annotated by the sky
//!
//! `stardate` is a small server-rendered web application. A visitor submits a
//! birthday plus a username/password pair; the server fetches the astronomy
//! picture for that date and a piece of date trivia from two external HTTP
//! providers, stores the combined record in PostgreSQL, and renders the result
//! as plain HTML. Saved records can be listed, viewed, renamed and deleted,
//! with mutation gated by the stored name/password pair.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for
//! the HTTP layer and uses PostgreSQL for persistence.
//!
//! ### Request flow
//!
//! Requests pass through a method-override shim (HTML forms can only POST, so
//! `POST /selection/3?_method=PUT` becomes a real PUT before routing), then
//! into the route handlers in [`api::handlers`]. Handlers reach the database
//! only through the [`db::Store`] capability carried in [`AppState`] and
//! reach the external providers through the fetch traits in [`providers`], so
//! the whole request surface runs in tests against an in-memory store and
//! stub HTTP servers.
//!
//! The create flow is the only one with real composition: clamp the year for
//! the astronomy archive, compute the approximate age, fetch the astronomy
//! record then the date fact (strictly in that order), persist the assembled
//! record in the background, and render the details page.
//!
//! ## Quick start
//!
//! ```no_run
//! use clap::Parser;
//! use stardate::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = stardate::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     stardate::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod providers;
pub mod telemetry;
mod views;

#[cfg(test)]
pub mod test_utils;

use std::sync::Arc;

use axum::{
    Router, ServiceExt,
    extract::Request,
    http::Method,
    middleware::{Next, from_fn},
    response::Response,
    routing::{get, post},
};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info};

use crate::{
    db::{PgStore, Store},
    providers::{ApodClient, FetchApod, FetchDateFact, NumbersClient},
};

/// Application state shared across all request handlers.
///
/// Handlers never hold a connection or client of their own; everything they
/// need to talk to the outside world lives here.
#[derive(Clone, Builder)]
pub struct AppState {
    /// Store-access capability (PostgreSQL in production)
    pub store: Arc<dyn Store>,
    /// Astronomy picture provider
    pub apod: Arc<dyn FetchApod>,
    /// Date trivia provider
    pub date_facts: Arc<dyn FetchDateFact>,
    /// Application configuration loaded from file/environment
    pub config: Config,
}

/// Get the stardate database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Rewrite a POST carrying `_method=PUT|DELETE` in its query string into the
/// corresponding method. HTML forms cannot submit PUT or DELETE themselves;
/// this runs before routing so the real method routes are the only ones that
/// exist.
pub(crate) async fn method_override(mut request: Request, next: Next) -> Response {
    if request.method() == Method::POST
        && let Some(query) = request.uri().query()
    {
        let target = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "_method")
            .map(|(_, value)| value.to_ascii_uppercase());

        match target.as_deref() {
            Some("PUT") => *request.method_mut() = Method::PUT,
            Some("DELETE") => *request.method_mut() = Method::DELETE,
            _ => {}
        }
    }

    next.run(request).await
}

/// Build the application router: the five birthday routes, the catch-all 404
/// page, permissive CORS (the pages have always been served cross-origin) and
/// request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::handlers::birthdays::list_birthdays))
        .route("/details", post(api::handlers::birthdays::create_with_details))
        .route("/selection", post(api::handlers::birthdays::stage_selection))
        .route(
            "/selection/{id}",
            get(api::handlers::birthdays::get_birthday)
                .put(api::handlers::birthdays::update_birthday)
                .delete(api::handlers::birthdays::delete_birthday),
        )
        .fallback(api::handlers::birthdays::not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// The running application: router, configuration and the database pool.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] connects to PostgreSQL, runs
///    migrations, and wires up the provider clients
/// 2. **Serve**: [`Application::serve`] binds the TCP port and handles
///    requests until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting stardate with configuration: {:#?}", config);

        let pool = PgPool::connect(&config.database_url).await?;
        migrator().run(&pool).await?;

        let store: Arc<dyn Store> = Arc::new(PgStore::new(pool.clone()));
        let apod: Arc<dyn FetchApod> = Arc::new(ApodClient::from_config(&config.providers));
        let date_facts: Arc<dyn FetchDateFact> = Arc::new(NumbersClient::from_config(&config.providers));

        let state = AppState::builder()
            .store(store)
            .apod(apod)
            .date_facts(date_facts)
            .config(config.clone())
            .build();

        let router = build_router(state);

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "stardate listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        // Apply the method-override shim before path matching
        let middleware = from_fn(method_override);
        let service = middleware.layer(self.router);

        axum::serve(listener, service.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
