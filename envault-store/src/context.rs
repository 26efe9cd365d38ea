//! Per-operation encryption context.

use std::collections::HashMap;

/// Identity and caller-supplied binding data for one seal or open call.
///
/// Transient; constructed per call and never persisted directly. The
/// material description becomes part of the envelope, and the store/object
/// identities feed the key service's encryption context on the KMS path.
#[derive(Clone, Debug, Default)]
pub struct EncryptionContext {
    /// Identity of the containing store (e.g. bucket name).
    pub store_name: String,
    /// Identity of the object within the store.
    pub object_key: String,
    /// Free-form caller-supplied description, carried into the envelope.
    pub material_description: HashMap<String, String>,
    /// Plaintext length hint; the engine stamps the authoritative value
    /// into the envelope at seal time.
    pub unencrypted_content_length: Option<u64>,
}

impl EncryptionContext {
    pub fn new(store_name: impl Into<String>, object_key: impl Into<String>) -> Self {
        Self {
            store_name: store_name.into(),
            object_key: object_key.into(),
            ..Default::default()
        }
    }

    pub fn with_material_description(mut self, description: HashMap<String, String>) -> Self {
        self.material_description = description;
        self
    }
}
