//! Account Model
//!
//! The per-user account document and its state helpers.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::utils::security::constant_time_compare;

/// One account document, keyed by normalized email
///
/// This struct is the full persisted record, including the password hash,
/// and is never serialized into API responses. Handlers copy out the
/// non-sensitive fields they need.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    /// Normalized email address, the unique document key
    pub email: String,

    /// Opaque unique id, assigned at creation and immutable
    pub account_id: Uuid,

    /// Display name
    pub name: String,

    /// bcrypt hash of the account password
    pub password_hash: String,

    /// False until OTP verification succeeds
    pub is_verified: bool,

    /// The outstanding OTP challenge, if any; at most one at a time
    pub pending_otp: Option<String>,

    /// True only between a forgot-password call and the matching reset
    pub is_reset_pending: bool,

    /// Avatar asset URL, defaults to the configured placeholder
    pub avatar_url: String,

    /// Optional age, set via profile update
    pub age: Option<i16>,

    /// Optional gender, set via profile update
    pub gender: Option<String>,

    /// Consecutive-activity counter, reset after a 48 hour gap
    pub streak_count: i32,

    /// Set at creation and on every accepted streak hit
    pub last_activity_at: Option<DateTime<Utc>>,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Build a freshly registered, unverified account with an outstanding OTP
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        otp: String,
        avatar_url: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            email,
            account_id: Uuid::new_v4(),
            name,
            password_hash,
            is_verified: false,
            pending_otp: Some(otp),
            is_reset_pending: false,
            avatar_url,
            age: None,
            gender: None,
            streak_count: 0,
            last_activity_at: Some(now),
            created_at: now,
        }
    }

    /// Check a candidate code against the outstanding challenge
    ///
    /// No outstanding challenge never matches. Comparison is constant-time.
    pub fn otp_matches(&self, candidate: &str) -> bool {
        match &self.pending_otp {
            Some(stored) => constant_time_compare(candidate, stored),
            None => false,
        }
    }

    /// Whether the reset flow has been unlocked by consuming the reset OTP
    pub fn can_reset_password(&self) -> bool {
        self.is_reset_pending && self.pending_otp.is_none()
    }
}
