//! GlowCare Identity Service Server
//!
//! Binds the full route set against Postgres storage and SMTP (or console)
//! OTP delivery. Configuration comes from the environment; see
//! `AppConfig::from_env`.

use std::sync::Arc;

use dotenv::dotenv;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use glowcare::{
    api::{AppState, RouterBuilder},
    config::AppConfig,
    notify::{ConsoleNotifier, OtpNotifier, SmtpNotifier},
    service::{AuthService, TokenService},
    store::PostgresAccountStore,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv().ok();

    env_logger::init();

    log::info!("Starting GlowCare identity service v{}", glowcare::VERSION);

    let config = AppConfig::from_env()?;
    config.validate()?;

    let pool = config.database.create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Database migrations completed");

    let store = Arc::new(PostgresAccountStore::new(pool));
    let tokens = Arc::new(TokenService::new(config.auth.token_secret.clone()));

    let notifier: Arc<dyn OtpNotifier> = match &config.email {
        Some(settings) => {
            log::info!("OTP delivery via SMTP relay {}", settings.host);
            Arc::new(SmtpNotifier::new(settings.clone())?)
        }
        None => {
            log::warn!("SMTP not configured; OTP codes will be written to the log");
            Arc::new(ConsoleNotifier::new())
        }
    };

    let auth = Arc::new(
        AuthService::new(store, notifier, tokens.clone())
            .with_bcrypt_cost(config.auth.bcrypt_cost)
            .with_default_avatar(config.auth.default_avatar_url.clone()),
    );

    let state = AppState { auth, tokens };

    let app = RouterBuilder::with_all_routes().build(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .into_inner(),
    );

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    log::info!("Server running on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
