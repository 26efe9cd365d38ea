//! The metadata envelope stored alongside each encrypted object.
//!
//! A pure value type serialized to a string-keyed map: binary fields are
//! base64, the material description is a JSON object, integers are decimal
//! strings. `from_map(to_map(e)) == e` for every field present in `e`.

use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{StoreError, StoreResult};

/// Metadata key for the wrapped data key (base64).
pub const WRAPPED_DATA_KEY: &str = "wrapped-data-key";
/// Metadata key for the AEAD nonce (base64).
pub const IV: &str = "iv";
/// Metadata key for the caller-supplied description (JSON, optional).
pub const MATERIAL_DESCRIPTION: &str = "material-description";
/// Metadata key naming the key-wrap mechanism (optional).
pub const WRAP_ALGORITHM: &str = "wrap-algorithm";
/// Metadata key naming the body AEAD mechanism.
pub const CONTENT_ALGORITHM: &str = "content-algorithm";
/// Metadata key for the AEAD tag length in bits (decimal).
pub const TAG_LENGTH_BITS: &str = "tag-length-bits";
/// Metadata key for the plaintext length in bytes (decimal, optional).
pub const UNENCRYPTED_CONTENT_LENGTH: &str = "unencrypted-content-length";

/// Record of how an object's data key was protected and how its body was
/// encrypted. Built once by a materials provider at write time, parsed back
/// from stored metadata at read time; immutable in between.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    /// Data key in wrapped form. Always present and non-empty.
    pub wrapped_data_key: Vec<u8>,
    /// Body AEAD nonce. Always present and non-empty.
    pub iv: Vec<u8>,
    /// Caller-supplied context; an empty map is omitted from the wire form.
    pub material_description: HashMap<String, String>,
    /// Name of the key-wrap mechanism (e.g. "kms", "AESWrap").
    pub key_wrapping_algorithm: Option<String>,
    /// Name of the body AEAD mechanism (e.g. "AES/GCM/NoPadding").
    pub content_encryption_algorithm: String,
    /// AEAD tag length in bits.
    pub tag_length_bits: u32,
    /// Plaintext length in bytes, stamped by the engine at seal time.
    pub unencrypted_content_length: Option<u64>,
}

impl Envelope {
    /// Serializes to the string-keyed map stored as object metadata.
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert(WRAPPED_DATA_KEY.to_string(), BASE64.encode(&self.wrapped_data_key));
        map.insert(IV.to_string(), BASE64.encode(&self.iv));
        if !self.material_description.is_empty() {
            // A map of strings always serializes.
            if let Ok(json) = serde_json::to_string(&self.material_description) {
                map.insert(MATERIAL_DESCRIPTION.to_string(), json);
            }
        }
        if let Some(wrap_algorithm) = &self.key_wrapping_algorithm {
            map.insert(WRAP_ALGORITHM.to_string(), wrap_algorithm.clone());
        }
        map.insert(
            CONTENT_ALGORITHM.to_string(),
            self.content_encryption_algorithm.clone(),
        );
        map.insert(TAG_LENGTH_BITS.to_string(), self.tag_length_bits.to_string());
        if let Some(length) = self.unencrypted_content_length {
            map.insert(UNENCRYPTED_CONTENT_LENGTH.to_string(), length.to_string());
        }
        map
    }

    /// Parses an envelope back out of stored metadata.
    ///
    /// Fails with [`StoreError::MetadataMissing`] when a mandatory field is
    /// absent and [`StoreError::MetadataMalformed`] when a field does not
    /// decode.
    pub fn from_map(metadata: &HashMap<String, String>) -> StoreResult<Self> {
        let wrapped_data_key = decode_base64(metadata, WRAPPED_DATA_KEY)?;
        let iv = decode_base64(metadata, IV)?;

        let content_encryption_algorithm = metadata
            .get(CONTENT_ALGORITHM)
            .ok_or(StoreError::MetadataMissing(CONTENT_ALGORITHM))?
            .clone();

        let tag_length_bits = metadata
            .get(TAG_LENGTH_BITS)
            .ok_or(StoreError::MetadataMissing(TAG_LENGTH_BITS))?
            .parse::<u32>()
            .map_err(|e| StoreError::MetadataMalformed {
                field: TAG_LENGTH_BITS,
                reason: e.to_string(),
            })?;

        let material_description = match metadata.get(MATERIAL_DESCRIPTION) {
            Some(json) => {
                serde_json::from_str(json).map_err(|e| StoreError::MetadataMalformed {
                    field: MATERIAL_DESCRIPTION,
                    reason: e.to_string(),
                })?
            }
            None => HashMap::new(),
        };

        let unencrypted_content_length = metadata
            .get(UNENCRYPTED_CONTENT_LENGTH)
            .map(|value| value.parse::<u64>())
            .transpose()
            .map_err(|e| StoreError::MetadataMalformed {
                field: UNENCRYPTED_CONTENT_LENGTH,
                reason: e.to_string(),
            })?;

        Ok(Self {
            wrapped_data_key,
            iv,
            material_description,
            key_wrapping_algorithm: metadata.get(WRAP_ALGORITHM).cloned(),
            content_encryption_algorithm,
            tag_length_bits,
            unencrypted_content_length,
        })
    }
}

/// Decodes a mandatory base64 field, rejecting empty values.
fn decode_base64(metadata: &HashMap<String, String>, field: &'static str) -> StoreResult<Vec<u8>> {
    let encoded = metadata
        .get(field)
        .ok_or(StoreError::MetadataMissing(field))?;
    let decoded = BASE64
        .decode(encoded)
        .map_err(|e| StoreError::MetadataMalformed {
            field,
            reason: e.to_string(),
        })?;
    if decoded.is_empty() {
        return Err(StoreError::MetadataMalformed {
            field,
            reason: "empty value".to_string(),
        });
    }
    Ok(decoded)
}
