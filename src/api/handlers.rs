//! HTTP Request Handlers
//!
//! Axum handlers mapping the HTTP surface 1:1 onto AuthService operations.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use validator::Validate;

use crate::api::middleware::AuthUser;
use crate::models::requests::*;
use crate::service::{AuthService, TokenService};
use crate::utils::error::{AppError, AppResult};
use crate::VERSION;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub tokens: Arc<TokenService>,
}

/// Flatten validator errors into a single 400 message
fn handle_validation_error(err: validator::ValidationErrors) -> AppError {
    let mut messages = Vec::new();

    for (field, errors) in err.field_errors() {
        for error in errors {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value for field '{}'", field));
            messages.push(message);
        }
    }

    AppError::Validation(messages.join(", "))
}

/// Register a new account (POST /register)
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    request.validate().map_err(handle_validation_error)?;

    state.auth.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "Account registered successfully, please verify OTP",
        )),
    ))
}

/// Log in with email and password (POST /login)
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    request.validate().map_err(handle_validation_error)?;

    let response = state.auth.login(request).await?;
    Ok(Json(response))
}

/// Consume an OTP challenge (POST /otp)
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(request): Json<VerifyOtpRequest>,
) -> AppResult<Json<MessageResponse>> {
    request.validate().map_err(handle_validation_error)?;

    state.auth.verify_otp(request).await?;
    Ok(Json(MessageResponse::new("Account successfully verified")))
}

/// Start the password-recovery flow (POST /forget-password)
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    request.validate().map_err(handle_validation_error)?;

    state.auth.forgot_password(&request.email).await?;
    Ok(Json(MessageResponse::new("OTP sent to your email")))
}

/// Complete the password-recovery flow (POST /reset-password)
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    request.validate().map_err(handle_validation_error)?;

    state.auth.reset_password(request).await?;
    Ok(Json(MessageResponse::new("Password successfully reset")))
}

/// Return the authenticated account's public profile (GET /profile)
pub async fn profile(
    State(state): State<AppState>,
    Extension(AuthUser(identity)): Extension<AuthUser>,
) -> AppResult<Json<ProfileResponse>> {
    let account = state.auth.profile(&identity.email).await?;

    Ok(Json(ProfileResponse {
        name: account.name,
        email: account.email,
    }))
}

/// Update profile fields (PUT /profile)
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(AuthUser(identity)): Extension<AuthUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> AppResult<Json<UpdateProfileResponse>> {
    request.validate().map_err(handle_validation_error)?;

    let avatar_url = state.auth.update_profile(&identity.email, request).await?;

    Ok(Json(UpdateProfileResponse {
        message: "Successfully updated profile".to_string(),
        avatar_url,
    }))
}

/// Record a streak hit for the authenticated account (POST /streak)
pub async fn record_streak_hit(
    State(state): State<AppState>,
    Extension(AuthUser(identity)): Extension<AuthUser>,
) -> AppResult<Json<StreakResponse>> {
    let update = state.auth.record_streak_hit(&identity.email).await?;

    Ok(Json(StreakResponse {
        message: "Streak updated successfully".to_string(),
        streak: update.streak_count,
        last_hit: update.last_activity_at,
    }))
}

/// Health check endpoint (GET /health)
pub async fn health_check(
    State(state): State<AppState>,
) -> AppResult<Json<HealthCheckResponse>> {
    state.auth.health_check().await?;

    Ok(Json(HealthCheckResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: VERSION.to_string(),
    }))
}
