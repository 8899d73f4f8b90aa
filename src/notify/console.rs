//! Console OTP delivery
//!
//! Logs the code instead of sending it. Used for local development when no
//! SMTP settings are configured.

use async_trait::async_trait;
use log::info;

use super::{NotifyError, OtpNotifier};

/// OTP "delivery" to the server log
#[derive(Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OtpNotifier for ConsoleNotifier {
    async fn send_otp(&self, to: &str, code: &str) -> Result<(), NotifyError> {
        info!("OTP for {}: {}", to, code);
        Ok(())
    }
}
