//! Crypto error types.
//!
//! Messages never include key material or plaintext.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors from the low-level crypto primitives.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// AEAD tag verification failed: tampering, wrong key, or corruption.
    /// No partial plaintext is ever returned.
    #[error("authentication failed (wrong key or tampered data)")]
    AuthenticationFailure,

    #[error("failed to wrap data key: {0}")]
    WrapFailure(String),

    /// The key-wrap integrity check rejected the wrapped key.
    #[error("failed to unwrap data key (integrity check failed)")]
    UnwrapFailure,

    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("invalid IV length: expected {expected} bytes, got {actual}")]
    InvalidIvLength { expected: usize, actual: usize },

    #[error("random generation failed: {0}")]
    Rng(String),
}
