//! SMTP OTP delivery
//!
//! Sends the passcode over an async SMTP relay, rendering the message from
//! embedded templates.

use chrono::Datelike;
use lettre::{
    message::{header, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use log::{error, info};
use tera::{Context, Tera};

use super::{NotifyError, OtpNotifier};
use crate::utils::error::{AppError, AppResult};

/// SMTP relay settings
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    /// SMTP server hostname
    pub host: String,
    /// SMTP server port
    pub port: u16,
    /// SMTP username
    pub username: String,
    /// SMTP password
    pub password: String,
    /// From email address
    pub from_email: String,
    /// From display name, also used as the app name in templates
    pub from_name: String,
}

const OTP_HTML: &str = r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Your OTP Code</title>
    <style>
        body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; }
        .code { font-size: 32px; font-weight: bold; color: #e86a92; letter-spacing: 4px; text-align: center; margin: 20px 0; padding: 15px; background: #f8f9fa; border-radius: 4px; }
        .footer { text-align: center; font-size: 12px; color: #666; }
    </style>
</head>
<body>
    <p>Hello,</p>
    <p>Your OTP code is:</p>
    <div class="code">{{ otp_code }}</div>
    <p>Enter it in the app to continue. If you did not request this code, you can safely ignore this email.</p>
    <div class="footer">
        <p>&copy; {{ current_year }} {{ app_name }}</p>
    </div>
</body>
</html>
"#;

const OTP_TEXT: &str = r#"
Hello,

Your OTP code is: {{ otp_code }}

Enter it in the app to continue. If you did not request this code, you can
safely ignore this email.

(c) {{ current_year }} {{ app_name }}
"#;

/// OTP delivery over an async SMTP relay
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    templates: Tera,
    settings: SmtpSettings,
}

impl SmtpNotifier {
    /// Create a new SMTP notifier from relay settings
    pub fn new(settings: SmtpSettings) -> AppResult<Self> {
        let creds = Credentials::new(settings.username.clone(), settings.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
            .map_err(|e| AppError::Configuration(format!("Failed to configure SMTP relay: {}", e)))?
            .port(settings.port)
            .credentials(creds)
            .build();

        let mut templates = Tera::default();
        templates
            .add_raw_template("otp_email.html", OTP_HTML)
            .map_err(|e| AppError::Configuration(format!("Failed to add HTML template: {}", e)))?;
        templates
            .add_raw_template("otp_email.txt", OTP_TEXT)
            .map_err(|e| AppError::Configuration(format!("Failed to add text template: {}", e)))?;

        Ok(Self {
            transport,
            templates,
            settings,
        })
    }
}

#[async_trait::async_trait]
impl OtpNotifier for SmtpNotifier {
    async fn send_otp(&self, to: &str, code: &str) -> Result<(), NotifyError> {
        let mut context = Context::new();
        context.insert("otp_code", code);
        context.insert("app_name", &self.settings.from_name);
        context.insert("current_year", &chrono::Utc::now().year());

        let html_body = self.templates.render("otp_email.html", &context)?;
        let text_body = self.templates.render("otp_email.txt", &context)?;

        let message = Message::builder()
            .from(
                format!("{} <{}>", self.settings.from_name, self.settings.from_email)
                    .parse()?,
            )
            .to(to.parse()?)
            .subject("Your OTP Code")
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            )?;

        match self.transport.send(message).await {
            Ok(_) => {
                info!("OTP email sent to {}", to);
                Ok(())
            }
            Err(e) => {
                error!("Failed to send OTP email to {}: {}", to, e);
                Err(NotifyError::Transport(e))
            }
        }
    }
}
