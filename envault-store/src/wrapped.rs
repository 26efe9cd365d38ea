//! Materials provider using a locally held AES wrapping key.

use envault_crypto::{DataKey, DataKeyAlgorithm, WrappingKey};
use tracing::debug;

use crate::context::EncryptionContext;
use crate::envelope::Envelope;
use crate::error::{StoreError, StoreResult};
use crate::provider::{EncryptionMaterials, MaterialsProvider, check_envelope_algorithm};

/// Materials provider wrapping data keys with a local AES key (AES-KW).
///
/// Wrapping is deterministic: the same data key under the same wrapping key
/// always yields the same wrapped bytes. The KMS path, by contrast,
/// produces fresh ciphertext on every call. Each matches the real guarantee
/// of its underlying primitive; neither is forced onto the other.
pub struct WrappedMaterialsProvider {
    wrapping_key: WrappingKey,
    algorithm: DataKeyAlgorithm,
}

impl WrappedMaterialsProvider {
    /// Provider using the 256-bit content algorithm.
    pub fn new(wrapping_key: WrappingKey) -> Self {
        Self::with_algorithm(wrapping_key, DataKeyAlgorithm::Aes256GcmIv12Tag16)
    }

    pub fn with_algorithm(wrapping_key: WrappingKey, algorithm: DataKeyAlgorithm) -> Self {
        Self {
            wrapping_key,
            algorithm,
        }
    }

    pub fn algorithm(&self) -> DataKeyAlgorithm {
        self.algorithm
    }
}

impl MaterialsProvider for WrappedMaterialsProvider {
    async fn encryption_materials(
        &self,
        ctx: &EncryptionContext,
    ) -> StoreResult<EncryptionMaterials> {
        let data_key = DataKey::generate(self.algorithm)?;
        let wrapped = self.wrapping_key.wrap(data_key.key_bytes())?;

        let envelope = Envelope {
            wrapped_data_key: wrapped,
            iv: data_key.iv().to_vec(),
            material_description: ctx.material_description.clone(),
            key_wrapping_algorithm: Some(self.wrapping_key.algorithm_name().to_string()),
            content_encryption_algorithm: self.algorithm.content_algorithm_name().to_string(),
            tag_length_bits: self.algorithm.tag_length_bits(),
            unencrypted_content_length: ctx.unencrypted_content_length,
        };

        debug!(
            "wrapped data key locally for {}/{}",
            ctx.store_name, ctx.object_key
        );
        Ok(EncryptionMaterials { data_key, envelope })
    }

    async fn decryption_materials(
        &self,
        ctx: &EncryptionContext,
        envelope: &Envelope,
    ) -> StoreResult<DataKey> {
        check_envelope_algorithm(envelope, self.algorithm)?;
        if let Some(wrap_algorithm) = &envelope.key_wrapping_algorithm {
            if wrap_algorithm != self.wrapping_key.algorithm_name() {
                return Err(StoreError::UnsupportedAlgorithm(wrap_algorithm.clone()));
            }
        }

        let key = self.wrapping_key.unwrap(&envelope.wrapped_data_key)?;
        let data_key = DataKey::new(self.algorithm, key, envelope.iv.clone())?;
        debug!(
            "unwrapped locally wrapped data key for {}/{}",
            ctx.store_name, ctx.object_key
        );
        Ok(data_key)
    }
}
