//! Seal/open orchestration over a materials provider.

use std::collections::HashMap;

use tracing::debug;

use crate::context::EncryptionContext;
use crate::envelope::Envelope;
use crate::error::StoreResult;
use crate::provider::MaterialsProvider;

/// Orchestrates envelope encryption of object bodies.
///
/// Holds no mutable state: `seal` and `open` are pure functions of their
/// inputs plus the provider's external collaborator, so one engine instance
/// is safe to share across concurrent calls. Nothing is cached; every seal
/// draws fresh key material and every open re-performs the unwrap.
pub struct EncryptionEngine<P> {
    provider: P,
}

impl<P: MaterialsProvider> EncryptionEngine<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Encrypts `plaintext`, returning the ciphertext and the metadata map
    /// to store alongside it.
    pub async fn seal(
        &self,
        plaintext: &[u8],
        ctx: &EncryptionContext,
    ) -> StoreResult<(Vec<u8>, HashMap<String, String>)> {
        let materials = self.provider.encryption_materials(ctx).await?;

        let mut envelope = materials.envelope;
        envelope.unencrypted_content_length = Some(plaintext.len() as u64);

        let ciphertext = materials.data_key.encrypt(plaintext)?;
        debug!(
            "sealed {} bytes for {}/{}",
            plaintext.len(),
            ctx.store_name,
            ctx.object_key
        );
        Ok((ciphertext, envelope.to_map()))
    }

    /// Decrypts `ciphertext` using the envelope parsed from `metadata`.
    pub async fn open(
        &self,
        ciphertext: &[u8],
        metadata: &HashMap<String, String>,
        ctx: &EncryptionContext,
    ) -> StoreResult<Vec<u8>> {
        let envelope = Envelope::from_map(metadata)?;
        let data_key = self.provider.decryption_materials(ctx, &envelope).await?;

        let plaintext = data_key.decrypt(ciphertext)?;
        debug!(
            "opened {} bytes for {}/{}",
            plaintext.len(),
            ctx.store_name,
            ctx.object_key
        );
        Ok(plaintext)
    }
}
