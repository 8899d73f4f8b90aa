//! OTP delivery abstractions
//!
//! Delivery is best-effort: the service dispatches codes on a spawned task
//! and never rolls back account state when a send fails.

pub mod console;
pub mod smtp;

pub use console::ConsoleNotifier;
pub use smtp::SmtpNotifier;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while building or sending an OTP message
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Invalid recipient address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("Template rendering failed: {0}")]
    Template(#[from] tera::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Out-of-band delivery channel for one-time passcodes
#[async_trait]
pub trait OtpNotifier: Send + Sync {
    /// Deliver a code to the given address
    async fn send_otp(&self, to: &str, code: &str) -> Result<(), NotifyError>;
}
