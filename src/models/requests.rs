//! Request and Response Models
//!
//! Data structures for API request and response payloads with validation.
//! Bodies use camelCase on the wire, matching the mobile client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::{email_validator, url_validator};

/// Request payload for registering a new account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name (must be non-empty)
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    /// Email address (must be valid format; uniqueness is checked later)
    #[validate(custom(function = "email_validator"))]
    pub email: String,

    /// Account password
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
}

/// Request payload for logging in
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request payload for verifying an OTP challenge
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "OTP is required"))]
    pub otp: String,
}

/// Request payload for starting the password-recovery flow
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
}

/// Request payload for completing the password-recovery flow
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Request payload for updating profile fields
///
/// Only the provided fields are applied. The avatar blob itself is uploaded
/// out-of-band; this carries the resulting asset URL.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be non-empty"))]
    pub name: Option<String>,

    #[validate(range(min = 1, max = 120, message = "Age is out of range"))]
    pub age: Option<i16>,

    pub gender: Option<String>,

    #[validate(custom(function = "url_validator"))]
    pub avatar_url: Option<String>,
}

/// Plain acknowledgement response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Response for a successful login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub account_id: Uuid,
    pub token: String,
}

/// Response for the profile endpoint
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub name: String,
    pub email: String,
}

/// Response for a profile update
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileResponse {
    pub message: String,
    pub avatar_url: String,
}

/// Response for a recorded streak hit
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakResponse {
    pub message: String,
    pub streak: i32,
    pub last_hit: DateTime<Utc>,
}

/// Response for health check
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret12".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            password: "short".to_string(),
            ..valid.clone()
        };
        assert!(short_password.validate().is_err());

        let no_name = RegisterRequest {
            name: String::new(),
            ..valid
        };
        assert!(no_name.validate().is_err());
    }

    #[test]
    fn test_reset_password_wire_names() {
        let request: ResetPasswordRequest =
            serde_json::from_str(r#"{"email":"a@b.com","newPassword":"newpass"}"#).unwrap();
        assert_eq!(request.new_password, "newpass");
    }

    #[test]
    fn test_update_profile_partial_body() {
        let request: UpdateProfileRequest = serde_json::from_str(r#"{"age":30}"#).unwrap();
        assert!(request.name.is_none());
        assert_eq!(request.age, Some(30));
        assert!(request.validate().is_ok());

        let bad_url: UpdateProfileRequest =
            serde_json::from_str(r#"{"avatarUrl":"ftp://nope"}"#).unwrap();
        assert!(bad_url.validate().is_err());
    }
}
