//! Security Utilities
//!
//! Password hashing and one-time passcode primitives.

use bcrypt::{hash, verify, DEFAULT_COST};
use rand::Rng;

/// Default bcrypt cost for password hashing
pub const DEFAULT_BCRYPT_COST: u32 = DEFAULT_COST;

/// Hash a password using bcrypt with the given cost factor
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// Verify a password against its bcrypt hash
///
/// A mismatch yields `Ok(false)`; only a malformed hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

/// Generate a 4-digit numeric OTP code, uniform over 1000..=9999
///
/// `thread_rng` is a CSPRNG, so codes are not guessable from earlier ones.
pub fn generate_otp_code() -> String {
    rand::thread_rng().gen_range(1000..=9999).to_string()
}

/// Timing-safe string comparison to prevent timing attacks
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (byte_a, byte_b) in a.bytes().zip(b.bytes()) {
        result |= byte_a ^ byte_b;
    }
    result == 0
}
