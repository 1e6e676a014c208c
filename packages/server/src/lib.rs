#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the crime portal.
//!
//! Serves the REST API for submitting and browsing crime reports, changing
//! report status, the role-scoped dashboard, admin user management, and the
//! missing and found items board. All state lives in memory and is seeded
//! from embedded fixtures unless seeding is turned off.

pub mod error;
mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use crime_portal_identity::{UserDirectory, fixtures::seed_users};
use crime_portal_missing::{MissingItemBoard, fixtures::seed_items};
use crime_portal_store::{ReportStore, fixtures::seed_reports};

pub use error::ServerError;

/// Shared application state.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Every crime report.
    pub reports: Arc<ReportStore>,
    /// Accounts and live sessions.
    pub users: Arc<UserDirectory>,
    /// Missing and found posts.
    pub items: Arc<MissingItemBoard>,
}

impl AppState {
    /// State preloaded with the embedded demo users, reports, and board
    /// posts.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] if an embedded fixture fails to parse.
    pub fn seeded() -> Result<Self, ServerError> {
        let reports = ReportStore::new().with_reports(seed_reports()?);
        let users = UserDirectory::new().with_users(seed_users()?)?;
        let items = MissingItemBoard::new().with_items(seed_items()?);

        log::info!(
            "Seeded {} users, {} reports, {} missing items",
            users.len(),
            reports.len(),
            items.len()
        );

        Ok(Self {
            reports: Arc::new(reports),
            users: Arc::new(users),
            items: Arc::new(items),
        })
    }
}

/// Where to listen and whether to load demo data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub bind_addr: String,
    /// TCP port.
    pub port: u16,
    /// Load the embedded fixtures at startup.
    pub seed_fixtures: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            seed_fixtures: true,
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, `PORT`, and `SEED_FIXTURES`, falling back to the
    /// defaults for anything unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            seed_fixtures: std::env::var("SEED_FIXTURES")
                .ok()
                .map_or(defaults.seed_fixtures, |v| parse_flag(&v)),
        }
    }
}

/// Anything but `0`, `false`, `no`, or `off` turns a flag on.
fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

/// Registers every `/api` route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(error::json_config())
            .app_data(error::path_config())
            .app_data(error::query_config())
            .route("/health", web::get().to(handlers::health))
            .route("/auth/login", web::post().to(handlers::login))
            .route("/auth/register", web::post().to(handlers::register))
            .route("/auth/logout", web::post().to(handlers::logout))
            .route("/auth/me", web::get().to(handlers::me))
            .route("/reports", web::get().to(handlers::list_reports))
            .route("/reports", web::post().to(handlers::create_report))
            .route("/reports/{id}", web::get().to(handlers::get_report))
            .route(
                "/reports/{id}/status",
                web::patch().to(handlers::change_report_status),
            )
            .route("/dashboard", web::get().to(handlers::dashboard))
            .route("/crime-types", web::get().to(handlers::crime_types))
            .route("/users", web::get().to(handlers::list_users))
            .route("/users", web::post().to(handlers::add_user))
            .route("/users/{id}/status", web::patch().to(handlers::set_user_status))
            .route("/users/{id}/role", web::patch().to(handlers::set_user_role))
            .route("/missing-items", web::get().to(handlers::list_items))
            .route("/missing-items", web::post().to(handlers::create_item))
            .route(
                "/missing-items/{id}/status",
                web::patch().to(handlers::set_item_status),
            ),
    );
}

/// Starts the crime portal API server.
///
/// Builds the in-memory state (seeded unless `config.seed_fixtures` is
/// off) and runs the Actix-Web HTTP server. The caller provides the async
/// runtime (e.g. via `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if a fixture fails to load, or the
/// HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let state = if config.seed_fixtures {
        AppState::seeded().map_err(std::io::Error::other)?
    } else {
        log::info!("Starting with empty stores");
        AppState::default()
    };
    let state = web::Data::new(state);

    let ServerConfig {
        bind_addr, port, ..
    } = config;
    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
