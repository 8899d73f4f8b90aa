//! GlowCare Identity Service Library
//!
//! The identity-and-session core of the GlowCare skincare companion backend:
//! OTP-gated account registration, credential verification, session-token
//! issuance, an OTP-gated password-recovery workflow, and a daily streak
//! counter derived from the last-activity timestamp.
//!
//! # Features
//!
//! - **OTP-Gated Registration**: accounts stay unverified until the emailed
//!   one-time passcode is confirmed
//! - **Password Security**: bcrypt hashing with a configurable cost factor
//! - **Session Tokens**: signed JWTs with the account email as subject,
//!   expiring one hour after issuance
//! - **Password Recovery**: forgot/verify/reset flow sharing the OTP
//!   verification transition with initial signup
//! - **Streak Tracking**: consecutive-activity counter with a 48 hour window
//! - **Pluggable Storage**: `AccountStore` trait with Postgres and in-memory
//!   implementations
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use glowcare::api::{AppState, RouterBuilder};
//! use glowcare::notify::ConsoleNotifier;
//! use glowcare::service::{AuthService, TokenService};
//! use glowcare::store::MemoryAccountStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryAccountStore::new());
//!     let tokens = Arc::new(TokenService::new("change-me".to_string()));
//!     let auth = Arc::new(AuthService::new(
//!         store,
//!         Arc::new(ConsoleNotifier::new()),
//!         tokens.clone(),
//!     ));
//!
//!     let app = RouterBuilder::with_all_routes().build(AppState { auth, tokens });
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **API Layer**: axum handlers, bearer-token middleware, and a
//!   configurable route builder
//! - **Service Layer**: account orchestration, token issuance, streak rule
//! - **Store**: keyed document persistence behind the `AccountStore` trait
//! - **Notify**: best-effort OTP delivery behind the `OtpNotifier` trait
//! - **Utils**: hashing, OTP generation, validation, error taxonomy

/// HTTP API layer with handlers, middleware, and configurable routing
pub mod api;

/// Configuration management for all service settings
pub mod config;

/// Data models and request/response structures
pub mod models;

/// OTP delivery channels
pub mod notify;

/// Business logic: authentication, tokens, streaks
pub mod service;

/// Account document persistence
pub mod store;

/// Shared utilities for security, validation, and error handling
pub mod utils;

// Re-export commonly used types for convenient access
pub use api::{create_routes, AppState, RouterBuilder};
pub use models::{
    requests::{
        ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest,
        ResetPasswordRequest, UpdateProfileRequest, VerifyOtpRequest,
    },
    Account,
};
pub use notify::{ConsoleNotifier, OtpNotifier, SmtpNotifier};
pub use service::{AuthError, AuthService, SessionIdentity, TokenService};
pub use store::{AccountStore, MemoryAccountStore, PostgresAccountStore};
pub use utils::error::{AppError, AppResult, ErrorResponse};

// Re-export configuration system
pub use config::{AppConfig, AuthConfig, DatabaseConfig, ServerConfig};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
