//! Materials provider backed by an external key-management service.
//!
//! The service holds the master key; this provider only ever sees data keys.
//! Every generate/decrypt call carries an encryption context derived from
//! the store/object identity, so the service refuses to unwrap a key under
//! a different identity than the one it was generated for.

use std::collections::BTreeMap;
use std::future::Future;

use envault_crypto::{DataKey, DataKeyAlgorithm};
use tracing::debug;
use zeroize::Zeroizing;

use crate::context::EncryptionContext;
use crate::envelope::Envelope;
use crate::error::{StoreError, StoreResult};
use crate::provider::{EncryptionMaterials, MaterialsProvider, check_envelope_algorithm};

/// Wire name recorded in `wrap-algorithm` for service-wrapped keys.
pub const KMS_WRAP_ALGORITHM: &str = "kms";

/// Material-description key stamping the content algorithm the data key was
/// generated for.
const CEK_ALGORITHM_DESCRIPTION_KEY: &str = "kms:content-algorithm";

/// Data key material returned by the key service: the usable plaintext form
/// and the wrapped form that travels in the envelope.
pub struct GeneratedDataKey {
    pub plaintext: Zeroizing<Vec<u8>>,
    pub wrapped: Vec<u8>,
}

/// Failure reported by a key-service collaborator.
#[derive(Debug, thiserror::Error)]
pub enum KeyServiceError {
    /// The service refused the request (authorization failure or an
    /// encryption-context mismatch).
    #[error("key service rejected the request: {0}")]
    Rejected(String),

    /// The service could not be reached or returned a malformed response.
    #[error("key service unavailable: {0}")]
    Unavailable(String),
}

/// Narrow contract consumed from the external key-management service.
///
/// `decrypt` must refuse when `encryption_context` differs from the one
/// supplied at generation time; that refusal is the authenticity guarantee
/// binding a wrapped key to its original store/object identity. Timeouts
/// and retries, if wanted, belong inside the implementation of this trait,
/// not in the provider.
pub trait KeyService: Send + Sync {
    /// Generates `num_bytes` of random key material under the master key,
    /// returning it in both plaintext and wrapped form.
    fn generate_data_key(
        &self,
        master_key_id: &str,
        num_bytes: usize,
        encryption_context: &BTreeMap<String, String>,
    ) -> impl Future<Output = Result<GeneratedDataKey, KeyServiceError>> + Send;

    /// Unwraps previously generated key material under the same context.
    fn decrypt(
        &self,
        wrapped_key: &[u8],
        encryption_context: &BTreeMap<String, String>,
    ) -> impl Future<Output = Result<Zeroizing<Vec<u8>>, KeyServiceError>> + Send;
}

/// Materials provider that delegates data-key protection to a key service.
pub struct KmsMaterialsProvider<C> {
    master_key_id: String,
    service: C,
    algorithm: DataKeyAlgorithm,
}

impl<C: KeyService> KmsMaterialsProvider<C> {
    /// Provider using the 256-bit content algorithm.
    pub fn new(master_key_id: impl Into<String>, service: C) -> Self {
        Self::with_algorithm(master_key_id, service, DataKeyAlgorithm::Aes256GcmIv12Tag16)
    }

    pub fn with_algorithm(
        master_key_id: impl Into<String>,
        service: C,
        algorithm: DataKeyAlgorithm,
    ) -> Self {
        Self {
            master_key_id: master_key_id.into(),
            service,
            algorithm,
        }
    }

    pub fn algorithm(&self) -> DataKeyAlgorithm {
        self.algorithm
    }
}

/// Key-service encryption context derived from the caller's identities.
/// Only non-empty fields are included.
fn service_context(ctx: &EncryptionContext) -> BTreeMap<String, String> {
    let mut service_ctx = BTreeMap::new();
    if !ctx.store_name.is_empty() {
        service_ctx.insert("store-name".to_string(), ctx.store_name.clone());
    }
    if !ctx.object_key.is_empty() {
        service_ctx.insert("object-key".to_string(), ctx.object_key.clone());
    }
    service_ctx
}

impl<C: KeyService> MaterialsProvider for KmsMaterialsProvider<C> {
    async fn encryption_materials(
        &self,
        ctx: &EncryptionContext,
    ) -> StoreResult<EncryptionMaterials> {
        let generated = self
            .service
            .generate_data_key(
                &self.master_key_id,
                self.algorithm.key_length(),
                &service_context(ctx),
            )
            .await
            .map_err(|e| StoreError::WrapFailure(e.to_string()))?;

        let iv = self.algorithm.generate_iv()?;
        let data_key = DataKey::new(self.algorithm, generated.plaintext, iv.clone())?;

        let mut material_description = ctx.material_description.clone();
        material_description.insert(
            CEK_ALGORITHM_DESCRIPTION_KEY.to_string(),
            self.algorithm.content_algorithm_name().to_string(),
        );

        let envelope = Envelope {
            wrapped_data_key: generated.wrapped,
            iv,
            material_description,
            key_wrapping_algorithm: Some(KMS_WRAP_ALGORITHM.to_string()),
            content_encryption_algorithm: self.algorithm.content_algorithm_name().to_string(),
            tag_length_bits: self.algorithm.tag_length_bits(),
            unencrypted_content_length: ctx.unencrypted_content_length,
        };

        debug!(
            "generated service-wrapped data key for {}/{}",
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
            if wrap_algorithm != KMS_WRAP_ALGORITHM {
                return Err(StoreError::UnsupportedAlgorithm(wrap_algorithm.clone()));
            }
        }

        let key = self
            .service
            .decrypt(&envelope.wrapped_data_key, &service_context(ctx))
            .await
            .map_err(|e| StoreError::UnwrapFailure(e.to_string()))?;

        let data_key = DataKey::new(self.algorithm, key, envelope.iv.clone())?;
        debug!(
            "unwrapped service-protected data key for {}/{}",
            ctx.store_name, ctx.object_key
        );
        Ok(data_key)
    }
}
