//! Error taxonomy for envelope encryption operations.

use envault_crypto::CryptoError;
use thiserror::Error;

/// Result type for envelope operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced to callers of the seal/open engine and the providers.
///
/// Nothing is retried internally; every failure is returned as-is to the
/// immediate caller. Messages never include key material or plaintext.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A mandatory envelope field was absent from stored metadata.
    #[error("required metadata field missing: {0}")]
    MetadataMissing(&'static str),

    /// An envelope field failed to decode (bad base64, JSON, or integer).
    #[error("metadata field {field} is malformed: {reason}")]
    MetadataMalformed {
        field: &'static str,
        reason: String,
    },

    /// The key-protection step could not complete on the encrypt path.
    #[error("failed to wrap data key: {0}")]
    WrapFailure(String),

    /// The key-protection step could not complete on the decrypt path,
    /// including key-service refusal on an encryption-context mismatch.
    #[error("failed to unwrap data key: {0}")]
    UnwrapFailure(String),

    /// Body AEAD tag verification failed. No partial plaintext is returned.
    #[error("authentication failed (tampered data or wrong key)")]
    AuthenticationFailure,

    /// The envelope names a content or wrap algorithm this configuration
    /// does not recognize.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The backing object-store adapter failed.
    #[error("storage operation failed: {0}")]
    Storage(String),

    /// A crypto-layer failure outside the taxonomy above (e.g. RNG or a
    /// key-length mismatch from a misbehaving collaborator).
    #[error("crypto error: {0}")]
    Crypto(String),
}

impl From<CryptoError> for StoreError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::AuthenticationFailure => StoreError::AuthenticationFailure,
            CryptoError::WrapFailure(msg) => StoreError::WrapFailure(msg),
            CryptoError::UnwrapFailure => {
                StoreError::UnwrapFailure("key-wrap integrity check failed".to_string())
            }
            other => StoreError::Crypto(other.to_string()),
        }
    }
}
