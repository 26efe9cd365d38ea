//! Materials-provider contract shared by the KMS and local-wrapping paths.

use std::future::Future;

use envault_crypto::{DataKey, DataKeyAlgorithm};

use crate::context::EncryptionContext;
use crate::envelope::Envelope;
use crate::error::{StoreError, StoreResult};

/// A usable data key together with the envelope describing how it was
/// protected. The two always travel together; a provider never hands out
/// one without the other.
#[derive(Debug)]
pub struct EncryptionMaterials {
    pub data_key: DataKey,
    pub envelope: Envelope,
}

/// Strategy for protecting per-object data keys under a master key.
///
/// Implementations are stateless across calls: each operation is an
/// independent transaction, so one provider instance is safe to share
/// across concurrent seal/open calls.
pub trait MaterialsProvider: Send + Sync {
    /// Generates a fresh data key and IV, protects the key under the
    /// provider's master-key mechanism, and returns both the usable key and
    /// the envelope recording how it was wrapped.
    fn encryption_materials(
        &self,
        ctx: &EncryptionContext,
    ) -> impl Future<Output = StoreResult<EncryptionMaterials>> + Send;

    /// Reverses the wrapping described by `envelope`, recombining the
    /// recovered key with the envelope's IV into a usable data key.
    fn decryption_materials(
        &self,
        ctx: &EncryptionContext,
        envelope: &Envelope,
    ) -> impl Future<Output = StoreResult<DataKey>> + Send;
}

/// Rejects envelopes naming content parameters other than the provider's
/// configured algorithm.
pub(crate) fn check_envelope_algorithm(
    envelope: &Envelope,
    algorithm: DataKeyAlgorithm,
) -> StoreResult<()> {
    if envelope.content_encryption_algorithm != algorithm.content_algorithm_name() {
        return Err(StoreError::UnsupportedAlgorithm(
            envelope.content_encryption_algorithm.clone(),
        ));
    }
    if envelope.tag_length_bits != algorithm.tag_length_bits() {
        return Err(StoreError::UnsupportedAlgorithm(format!(
            "tag length of {} bits",
            envelope.tag_length_bits
        )));
    }
    Ok(())
}
