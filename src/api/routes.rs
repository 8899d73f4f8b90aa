//! API Route Definitions
//!
//! Routes are assembled through a builder so deployments can expose only the
//! endpoints they need (for example a registration-only instance, or one
//! without the streak feature).

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use super::handlers::{self, AppState};
use super::middleware::auth_middleware;

/// Builder for creating API routes with configurable endpoints
#[derive(Default)]
pub struct RouterBuilder {
    /// Whether to enable the health check endpoint (GET /health)
    health_check: bool,
    /// Whether to enable registration (POST /register)
    register: bool,
    /// Whether to enable login (POST /login)
    login: bool,
    /// Whether to enable OTP verification (POST /otp)
    verify_otp: bool,
    /// Whether to enable the recovery pair (POST /forget-password, POST /reset-password)
    password_recovery: bool,
    /// Whether to enable the profile endpoints (GET /profile, PUT /profile)
    profile: bool,
    /// Whether to enable streak recording (POST /streak)
    streak: bool,
}

impl RouterBuilder {
    /// All routes disabled; enable endpoints explicitly
    pub fn new() -> Self {
        Self::default()
    }

    /// Every endpoint enabled, the standard full deployment
    pub fn with_all_routes() -> Self {
        Self {
            health_check: true,
            register: true,
            login: true,
            verify_otp: true,
            password_recovery: true,
            profile: true,
            streak: true,
        }
    }

    /// Only the unauthenticated account-lifecycle endpoints
    pub fn with_auth_routes() -> Self {
        Self {
            health_check: true,
            register: true,
            login: true,
            verify_otp: true,
            password_recovery: true,
            profile: false,
            streak: false,
        }
    }

    pub fn health_check(mut self, enabled: bool) -> Self {
        self.health_check = enabled;
        self
    }

    pub fn register(mut self, enabled: bool) -> Self {
        self.register = enabled;
        self
    }

    pub fn login(mut self, enabled: bool) -> Self {
        self.login = enabled;
        self
    }

    pub fn verify_otp(mut self, enabled: bool) -> Self {
        self.verify_otp = enabled;
        self
    }

    pub fn password_recovery(mut self, enabled: bool) -> Self {
        self.password_recovery = enabled;
        self
    }

    pub fn profile(mut self, enabled: bool) -> Self {
        self.profile = enabled;
        self
    }

    pub fn streak(mut self, enabled: bool) -> Self {
        self.streak = enabled;
        self
    }

    /// Assemble the router; protected endpoints get the bearer middleware
    pub fn build(self, state: AppState) -> Router {
        let mut public = Router::new();

        if self.health_check {
            public = public.route("/health", get(handlers::health_check));
        }
        if self.register {
            public = public.route("/register", post(handlers::register));
        }
        if self.login {
            public = public.route("/login", post(handlers::login));
        }
        if self.verify_otp {
            public = public.route("/otp", post(handlers::verify_otp));
        }
        if self.password_recovery {
            public = public
                .route("/forget-password", post(handlers::forgot_password))
                .route("/reset-password", post(handlers::reset_password));
        }

        let mut protected = Router::new();
        if self.profile {
            protected = protected.route(
                "/profile",
                get(handlers::profile).put(handlers::update_profile),
            );
        }
        if self.streak {
            protected = protected.route("/streak", post(handlers::record_streak_hit));
        }
        let protected =
            protected.layer(from_fn_with_state(state.tokens.clone(), auth_middleware));

        public.merge(protected).with_state(state)
    }
}

/// Convenience constructor for the full route set
pub fn create_routes(state: AppState) -> Router {
    RouterBuilder::with_all_routes().build(state)
}
