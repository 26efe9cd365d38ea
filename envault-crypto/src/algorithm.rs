//! Content-encryption algorithm registry.
//!
//! A plain parameter table: each variant names its key, IV and tag lengths.
//! The AEAD behavior itself lives on [`crate::DataKey`], not on the enum.

use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};

/// Algorithms available for encrypting object bodies.
///
/// All current variants are AES-GCM with a 12-byte IV and a 16-byte tag,
/// differing only in key length. Any future variant must declare all three
/// parameters consistently with its AEAD mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataKeyAlgorithm {
    /// AES-128-GCM, 12-byte IV, 16-byte tag.
    Aes128GcmIv12Tag16,
    /// AES-192-GCM, 12-byte IV, 16-byte tag.
    Aes192GcmIv12Tag16,
    /// AES-256-GCM, 12-byte IV, 16-byte tag.
    Aes256GcmIv12Tag16,
}

impl DataKeyAlgorithm {
    /// Every defined variant, in key-length order.
    pub const ALL: [DataKeyAlgorithm; 3] = [
        DataKeyAlgorithm::Aes128GcmIv12Tag16,
        DataKeyAlgorithm::Aes192GcmIv12Tag16,
        DataKeyAlgorithm::Aes256GcmIv12Tag16,
    ];

    /// Wire name recorded in the `content-algorithm` metadata field.
    pub const fn content_algorithm_name(self) -> &'static str {
        "AES/GCM/NoPadding"
    }

    /// Data key length in bytes.
    pub const fn key_length(self) -> usize {
        match self {
            DataKeyAlgorithm::Aes128GcmIv12Tag16 => 16,
            DataKeyAlgorithm::Aes192GcmIv12Tag16 => 24,
            DataKeyAlgorithm::Aes256GcmIv12Tag16 => 32,
        }
    }

    /// IV length in bytes.
    pub const fn iv_length(self) -> usize {
        12
    }

    /// AEAD tag length in bytes.
    pub const fn tag_length(self) -> usize {
        16
    }

    /// AEAD tag length in bits, as recorded in the `tag-length-bits`
    /// metadata field.
    pub const fn tag_length_bits(self) -> u32 {
        (self.tag_length() * 8) as u32
    }

    /// Draws a fresh random data key from the OS CSPRNG.
    pub fn generate_key(self) -> CryptoResult<Zeroizing<Vec<u8>>> {
        let mut key = Zeroizing::new(vec![0u8; self.key_length()]);
        getrandom::getrandom(key.as_mut_slice()).map_err(|e| CryptoError::Rng(e.to_string()))?;
        Ok(key)
    }

    /// Draws a fresh random IV from the OS CSPRNG.
    ///
    /// An IV must never be reused with the same key; callers draw a new one
    /// for every encryption operation.
    pub fn generate_iv(self) -> CryptoResult<Vec<u8>> {
        let mut iv = vec![0u8; self.iv_length()];
        getrandom::getrandom(&mut iv).map_err(|e| CryptoError::Rng(e.to_string()))?;
        Ok(iv)
    }
}
