//! Authentication Service
//!
//! Orchestrates the account lifecycle: OTP-gated registration, credential
//! verification, session issuance, the password-recovery flow, and streak
//! updates. Sole writer of account documents; every operation performs at
//! most one store read and one store write.

use std::sync::Arc;

use chrono::Utc;
use log::warn;
use thiserror::Error;

use crate::models::requests::{
    LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest, UpdateProfileRequest,
    VerifyOtpRequest,
};
use crate::models::Account;
use crate::notify::OtpNotifier;
use crate::service::streak::{self, StreakUpdate};
use crate::service::token::{TokenError, TokenService};
use crate::store::{AccountStore, StoreError};
use crate::utils::error::AppError;
use crate::utils::security::{
    generate_otp_code, hash_password, verify_password, DEFAULT_BCRYPT_COST,
};
use crate::utils::validation::normalize_email;

/// Fallback avatar asset assigned to new accounts
pub const DEFAULT_AVATAR_URL: &str =
    "https://storage.googleapis.com/glowcare-assets/edit-profile/avatar.png";

/// Errors from authentication operations
#[derive(Debug, Error)]
pub enum AuthError {
    /// No account exists for the given email
    #[error("Account not found")]
    AccountNotFound,

    /// Registration hit an existing account
    #[error("Account already exists")]
    AccountExists,

    /// The account has not completed OTP verification
    #[error("Account is not verified yet")]
    NotVerified,

    /// OTP verification on an account that is already active
    #[error("Account has already been verified")]
    AlreadyVerified,

    /// Password did not match the stored hash
    #[error("Invalid password")]
    InvalidPassword,

    /// Supplied code did not match the outstanding challenge
    #[error("Invalid OTP")]
    InvalidOtp,

    /// Reset attempted without completing the forgot-password flow
    #[error("Password reset is not unlocked for this account")]
    ResetLocked,

    /// Store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Password hashing failure
    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// Token issuance failure
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AccountNotFound => AppError::NotFound("Account not found".to_string()),
            AuthError::AccountExists => AppError::Conflict("Account already exists".to_string()),
            AuthError::NotVerified => {
                AppError::Forbidden("Account is not verified yet".to_string())
            }
            AuthError::AlreadyVerified => {
                AppError::Validation("Account has already been verified".to_string())
            }
            AuthError::InvalidPassword => {
                AppError::Authentication("Invalid password".to_string())
            }
            AuthError::InvalidOtp => AppError::Forbidden("Invalid OTP".to_string()),
            AuthError::ResetLocked => AppError::Forbidden(
                "Account does not have access to reset password".to_string(),
            ),
            AuthError::Store(StoreError::AlreadyExists) => {
                AppError::Conflict("Account already exists".to_string())
            }
            AuthError::Store(StoreError::NotFound) => {
                AppError::NotFound("Account not found".to_string())
            }
            AuthError::Store(StoreError::Database(e)) => AppError::Database(e),
            AuthError::Hashing(e) => AppError::Hashing(e),
            AuthError::Token(e) => AppError::Internal(e.to_string()),
        }
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Core authentication and account service
pub struct AuthService {
    store: Arc<dyn AccountStore>,
    notifier: Arc<dyn OtpNotifier>,
    tokens: Arc<TokenService>,
    bcrypt_cost: u32,
    default_avatar_url: String,
}

impl AuthService {
    /// Create a new service with default cost factor and avatar asset
    pub fn new(
        store: Arc<dyn AccountStore>,
        notifier: Arc<dyn OtpNotifier>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            store,
            notifier,
            tokens,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            default_avatar_url: DEFAULT_AVATAR_URL.to_string(),
        }
    }

    /// Override the bcrypt work factor (lowered in tests)
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Override the placeholder avatar URL
    pub fn with_default_avatar(mut self, url: impl Into<String>) -> Self {
        self.default_avatar_url = url.into();
        self
    }

    /// Register a new account and dispatch its verification OTP
    ///
    /// The account starts unverified with the challenge armed. Creation is
    /// atomic against concurrent registrations for the same email.
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<()> {
        let email = normalize_email(&request.email);
        let password_hash = hash_password(&request.password, self.bcrypt_cost)?;
        let otp = generate_otp_code();

        let account = Account::new(
            request.name,
            email.clone(),
            password_hash,
            otp.clone(),
            self.default_avatar_url.clone(),
            Utc::now(),
        );

        match self.store.create(&account).await {
            Ok(()) => {}
            Err(StoreError::AlreadyExists) => return Err(AuthError::AccountExists),
            Err(e) => return Err(e.into()),
        }

        self.dispatch_otp(email, otp);
        Ok(())
    }

    /// Verify credentials and issue a session token
    pub async fn login(&self, request: LoginRequest) -> AuthResult<LoginResponse> {
        let email = normalize_email(&request.email);
        let account = self.fetch(&email).await?;

        if !account.is_verified {
            return Err(AuthError::NotVerified);
        }
        if !verify_password(&request.password, &account.password_hash)? {
            return Err(AuthError::InvalidPassword);
        }

        let token = self.tokens.issue(&account.email)?;
        Ok(LoginResponse {
            account_id: account.account_id,
            token,
        })
    }

    /// Consume an outstanding OTP challenge
    ///
    /// Shared transition for initial verification and the reset flow: an
    /// already-verified account is only allowed through while a reset is
    /// pending. On a match the account becomes verified and the challenge
    /// is cleared.
    pub async fn verify_otp(&self, request: VerifyOtpRequest) -> AuthResult<()> {
        let email = normalize_email(&request.email);
        let mut account = self.fetch(&email).await?;

        if account.is_verified && !account.is_reset_pending {
            return Err(AuthError::AlreadyVerified);
        }
        if !account.otp_matches(&request.otp) {
            return Err(AuthError::InvalidOtp);
        }

        account.is_verified = true;
        account.pending_otp = None;
        self.store.put(&account).await?;
        Ok(())
    }

    /// Arm a password-reset challenge and dispatch the new OTP
    pub async fn forgot_password(&self, email: &str) -> AuthResult<()> {
        let email = normalize_email(email);
        let mut account = self.fetch(&email).await?;

        let otp = generate_otp_code();
        account.pending_otp = Some(otp.clone());
        account.is_reset_pending = true;
        self.store.put(&account).await?;

        self.dispatch_otp(email, otp);
        Ok(())
    }

    /// Rewrite the password after the reset OTP has been consumed
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> AuthResult<()> {
        let email = normalize_email(&request.email);
        let mut account = self.fetch(&email).await?;

        if !account.can_reset_password() {
            return Err(AuthError::ResetLocked);
        }

        account.password_hash = hash_password(&request.new_password, self.bcrypt_cost)?;
        account.is_reset_pending = false;
        self.store.put(&account).await?;
        Ok(())
    }

    /// Record an activity hit for an authenticated account
    ///
    /// Read-modify-write; concurrent hits for the same account are
    /// last-writer-wins (see DESIGN.md).
    pub async fn record_streak_hit(&self, email: &str) -> AuthResult<StreakUpdate> {
        let email = normalize_email(email);
        let mut account = self.fetch(&email).await?;

        let update = streak::next(account.streak_count, account.last_activity_at, Utc::now());
        account.streak_count = update.streak_count;
        account.last_activity_at = Some(update.last_activity_at);
        self.store.put(&account).await?;

        Ok(update)
    }

    /// Fetch the account behind a verified bearer identity
    pub async fn profile(&self, email: &str) -> AuthResult<Account> {
        self.fetch(&normalize_email(email)).await
    }

    /// Apply the provided profile fields and return the effective avatar URL
    pub async fn update_profile(
        &self,
        email: &str,
        request: UpdateProfileRequest,
    ) -> AuthResult<String> {
        let email = normalize_email(email);
        let mut account = self.fetch(&email).await?;

        if let Some(name) = request.name {
            account.name = name;
        }
        if let Some(age) = request.age {
            account.age = Some(age);
        }
        if let Some(gender) = request.gender {
            account.gender = Some(gender);
        }
        if let Some(avatar_url) = request.avatar_url {
            account.avatar_url = avatar_url;
        }

        self.store.put(&account).await?;
        Ok(account.avatar_url)
    }

    /// Store connectivity probe for the health endpoint
    pub async fn health_check(&self) -> AuthResult<()> {
        self.store.ping().await?;
        Ok(())
    }

    async fn fetch(&self, email: &str) -> AuthResult<Account> {
        self.store
            .get(email)
            .await?
            .ok_or(AuthError::AccountNotFound)
    }

    /// Fire-and-forget OTP dispatch; a failed send is logged, never rolled
    /// back into account state.
    fn dispatch_otp(&self, email: String, otp: String) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(e) = notifier.send_otp(&email, &otp).await {
                warn!("Failed to deliver OTP to {}: {}", email, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotifyError;
    use crate::store::MemoryAccountStore;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::Mutex;

    /// Notifier fake that records every dispatched code
    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl OtpNotifier for RecordingNotifier {
        async fn send_otp(&self, to: &str, code: &str) -> Result<(), NotifyError> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), code.to_string()));
            Ok(())
        }
    }

    fn test_service() -> (AuthService, Arc<MemoryAccountStore>) {
        let store = Arc::new(MemoryAccountStore::new());
        let service = AuthService::new(
            store.clone(),
            Arc::new(RecordingNotifier::default()),
            Arc::new(TokenService::new("test_secret".to_string())),
        )
        .with_bcrypt_cost(4);
        (service, store)
    }

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            name: "Alice".to_string(),
            email: "a@b.com".to_string(),
            password: "secret12".to_string(),
        }
    }

    async fn pending_otp(store: &MemoryAccountStore, email: &str) -> String {
        store
            .get(email)
            .await
            .unwrap()
            .unwrap()
            .pending_otp
            .expect("no outstanding challenge")
    }

    async fn register_and_verify(service: &AuthService, store: &MemoryAccountStore) {
        service.register(register_request()).await.unwrap();
        let otp = pending_otp(store, "a@b.com").await;
        service
            .verify_otp(VerifyOtpRequest {
                email: "a@b.com".to_string(),
                otp,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_register_creates_unverified_account() {
        let (service, store) = test_service();
        service.register(register_request()).await.unwrap();

        let account = store.get("a@b.com").await.unwrap().unwrap();
        assert!(!account.is_verified);
        assert!(account.pending_otp.is_some());
        assert_eq!(account.streak_count, 0);
        assert!(account.last_activity_at.is_some());
        assert_eq!(account.avatar_url, DEFAULT_AVATAR_URL);
        // The hash, not the password, is stored.
        assert_ne!(account.password_hash, "secret12");
    }

    #[tokio::test]
    async fn test_register_normalizes_email_key() {
        let (service, store) = test_service();
        service
            .register(RegisterRequest {
                email: "  Alice@B.Com ".to_string(),
                ..register_request()
            })
            .await
            .unwrap();

        assert!(store.get("alice@b.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_register_duplicate_conflicts() {
        let (service, _store) = test_service();
        service.register(register_request()).await.unwrap();

        let err = service.register(register_request()).await.unwrap_err();
        assert!(matches!(err, AuthError::AccountExists));
    }

    #[tokio::test]
    async fn test_login_before_verification_is_forbidden() {
        let (service, _store) = test_service();
        service.register(register_request()).await.unwrap();

        // Even the correct password is rejected until the OTP is consumed.
        let err = service
            .login(LoginRequest {
                email: "a@b.com".to_string(),
                password: "secret12".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotVerified));
    }

    #[tokio::test]
    async fn test_login_unknown_account() {
        let (service, _store) = test_service();
        let err = service
            .login(LoginRequest {
                email: "nobody@b.com".to_string(),
                password: "secret12".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AccountNotFound));
    }

    #[tokio::test]
    async fn test_verify_otp_wrong_code_leaves_state_unchanged() {
        let (service, store) = test_service();
        service.register(register_request()).await.unwrap();
        let otp = pending_otp(&store, "a@b.com").await;
        let wrong = if otp == "1000" { "1001" } else { "1000" };

        let err = service
            .verify_otp(VerifyOtpRequest {
                email: "a@b.com".to_string(),
                otp: wrong.to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidOtp));

        let account = store.get("a@b.com").await.unwrap().unwrap();
        assert!(!account.is_verified);
        assert_eq!(account.pending_otp, Some(otp));
    }

    #[tokio::test]
    async fn test_register_verify_login_flow() {
        let (service, store) = test_service();
        register_and_verify(&service, &store).await;

        let account = store.get("a@b.com").await.unwrap().unwrap();
        assert!(account.is_verified);
        assert!(account.pending_otp.is_none());

        let response = service
            .login(LoginRequest {
                email: "a@b.com".to_string(),
                password: "secret12".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.account_id, account.account_id);
        assert!(!response.token.is_empty());

        let err = service
            .login(LoginRequest {
                email: "a@b.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidPassword));
    }

    #[tokio::test]
    async fn test_reverifying_active_account_rejected() {
        let (service, store) = test_service();
        register_and_verify(&service, &store).await;

        let err = service
            .verify_otp(VerifyOtpRequest {
                email: "a@b.com".to_string(),
                otp: "1234".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AlreadyVerified));
    }

    #[tokio::test]
    async fn test_full_password_reset_flow() {
        let (service, store) = test_service();
        register_and_verify(&service, &store).await;

        service.forgot_password("a@b.com").await.unwrap();
        let account = store.get("a@b.com").await.unwrap().unwrap();
        assert!(account.is_reset_pending);
        assert!(account.pending_otp.is_some());

        // Resetting before the reset OTP is consumed is forbidden.
        let err = service
            .reset_password(ResetPasswordRequest {
                email: "a@b.com".to_string(),
                new_password: "newpass".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::ResetLocked));

        // Consume the reset OTP through the shared verification transition.
        let otp = pending_otp(&store, "a@b.com").await;
        service
            .verify_otp(VerifyOtpRequest {
                email: "a@b.com".to_string(),
                otp,
            })
            .await
            .unwrap();

        service
            .reset_password(ResetPasswordRequest {
                email: "a@b.com".to_string(),
                new_password: "newpass".to_string(),
            })
            .await
            .unwrap();

        let account = store.get("a@b.com").await.unwrap().unwrap();
        assert!(!account.is_reset_pending);
        assert!(account.pending_otp.is_none());

        // The old password no longer logs in; the new one does.
        let err = service
            .login(LoginRequest {
                email: "a@b.com".to_string(),
                password: "secret12".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidPassword));

        service
            .login(LoginRequest {
                email: "a@b.com".to_string(),
                password: "newpass".to_string(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reset_without_forgot_is_forbidden() {
        let (service, store) = test_service();
        register_and_verify(&service, &store).await;

        let err = service
            .reset_password(ResetPasswordRequest {
                email: "a@b.com".to_string(),
                new_password: "newpass".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::ResetLocked));
    }

    #[tokio::test]
    async fn test_streak_hit_increments_and_resets() {
        let (service, store) = test_service();
        register_and_verify(&service, &store).await;

        // Registration set last_activity_at, so the first hit extends from 0.
        let first = service.record_streak_hit("a@b.com").await.unwrap();
        assert_eq!(first.streak_count, 1);

        let second = service.record_streak_hit("a@b.com").await.unwrap();
        assert_eq!(second.streak_count, 2);

        // Age the stored timestamp past the window; the next hit resets.
        let mut account = store.get("a@b.com").await.unwrap().unwrap();
        account.last_activity_at = Some(Utc::now() - Duration::hours(49));
        store.put(&account).await.unwrap();

        let third = service.record_streak_hit("a@b.com").await.unwrap();
        assert_eq!(third.streak_count, 1);
    }

    #[tokio::test]
    async fn test_update_profile_applies_partial_fields() {
        let (service, store) = test_service();
        register_and_verify(&service, &store).await;

        let avatar = service
            .update_profile(
                "a@b.com",
                UpdateProfileRequest {
                    name: Some("Alice Smith".to_string()),
                    age: Some(27),
                    gender: None,
                    avatar_url: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(avatar, DEFAULT_AVATAR_URL);

        let account = store.get("a@b.com").await.unwrap().unwrap();
        assert_eq!(account.name, "Alice Smith");
        assert_eq!(account.age, Some(27));
        assert!(account.gender.is_none());

        let avatar = service
            .update_profile(
                "a@b.com",
                UpdateProfileRequest {
                    name: None,
                    age: None,
                    gender: None,
                    avatar_url: Some("https://cdn.example.com/new.png".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(avatar, "https://cdn.example.com/new.png");
    }
}
