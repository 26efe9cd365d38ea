//! Single-use data keys and body AEAD.

use aes::Aes192;
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, AeadCore, KeyInit};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, Nonce};
use zeroize::Zeroizing;

use crate::algorithm::DataKeyAlgorithm;
use crate::error::{CryptoError, CryptoResult};

/// AES-192-GCM is not aliased by the `aes-gcm` crate.
type Aes192Gcm = AesGcm<Aes192, U12>;

/// A single-use symmetric key plus IV, bound to one algorithm variant.
///
/// Created fresh per object write, or reconstructed per object read from an
/// unwrapped key and the IV stored in the envelope. Never persisted; the key
/// bytes are zeroized when the value drops, so callers should keep it in the
/// smallest scope that covers one encrypt or decrypt call.
pub struct DataKey {
    algorithm: DataKeyAlgorithm,
    key: Zeroizing<Vec<u8>>,
    iv: Vec<u8>,
}

impl core::fmt::Debug for DataKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DataKey")
            .field("algorithm", &self.algorithm)
            .field("key", &"<redacted>")
            .field("iv", &self.iv)
            .finish()
    }
}

impl DataKey {
    /// Binds key and IV bytes to an algorithm, validating their lengths.
    pub fn new(
        algorithm: DataKeyAlgorithm,
        key: Zeroizing<Vec<u8>>,
        iv: Vec<u8>,
    ) -> CryptoResult<Self> {
        if key.len() != algorithm.key_length() {
            return Err(CryptoError::InvalidKeyLength {
                expected: algorithm.key_length(),
                actual: key.len(),
            });
        }
        if iv.len() != algorithm.iv_length() {
            return Err(CryptoError::InvalidIvLength {
                expected: algorithm.iv_length(),
                actual: iv.len(),
            });
        }
        Ok(Self { algorithm, key, iv })
    }

    /// Generates a fresh random key and IV for one encryption operation.
    pub fn generate(algorithm: DataKeyAlgorithm) -> CryptoResult<Self> {
        Ok(Self {
            algorithm,
            key: algorithm.generate_key()?,
            iv: algorithm.generate_iv()?,
        })
    }

    pub fn algorithm(&self) -> DataKeyAlgorithm {
        self.algorithm
    }

    /// Raw key bytes, exposed for wrapping under a master key.
    pub fn key_bytes(&self) -> &[u8] {
        &self.key
    }

    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    /// AEAD-encrypts `plaintext` with no associated data, returning
    /// `ciphertext || tag`.
    pub fn encrypt(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        match self.algorithm {
            DataKeyAlgorithm::Aes128GcmIv12Tag16 => self.seal::<Aes128Gcm>(plaintext),
            DataKeyAlgorithm::Aes192GcmIv12Tag16 => self.seal::<Aes192Gcm>(plaintext),
            DataKeyAlgorithm::Aes256GcmIv12Tag16 => self.seal::<Aes256Gcm>(plaintext),
        }
    }

    /// Verifies the trailing tag and decrypts, failing closed with
    /// [`CryptoError::AuthenticationFailure`] if the tag does not verify.
    pub fn decrypt(&self, sealed: &[u8]) -> CryptoResult<Vec<u8>> {
        // Anything shorter than the tag cannot carry a valid one.
        if sealed.len() < self.algorithm.tag_length() {
            return Err(CryptoError::AuthenticationFailure);
        }
        match self.algorithm {
            DataKeyAlgorithm::Aes128GcmIv12Tag16 => self.open::<Aes128Gcm>(sealed),
            DataKeyAlgorithm::Aes192GcmIv12Tag16 => self.open::<Aes192Gcm>(sealed),
            DataKeyAlgorithm::Aes256GcmIv12Tag16 => self.open::<Aes256Gcm>(sealed),
        }
    }

    fn seal<C>(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>>
    where
        C: Aead + KeyInit + AeadCore<NonceSize = U12>,
    {
        let cipher = C::new_from_slice(&self.key).map_err(|_| self.key_length_error())?;
        cipher
            .encrypt(Nonce::from_slice(&self.iv), plaintext)
            .map_err(|_| CryptoError::Encryption("AEAD seal failed".to_string()))
    }

    fn open<C>(&self, sealed: &[u8]) -> CryptoResult<Vec<u8>>
    where
        C: Aead + KeyInit + AeadCore<NonceSize = U12>,
    {
        let cipher = C::new_from_slice(&self.key).map_err(|_| self.key_length_error())?;
        cipher
            .decrypt(Nonce::from_slice(&self.iv), sealed)
            .map_err(|_| CryptoError::AuthenticationFailure)
    }

    // Cipher construction fails only on a key length mismatch, which `new`
    // already rules out.
    fn key_length_error(&self) -> CryptoError {
        CryptoError::InvalidKeyLength {
            expected: self.algorithm.key_length(),
            actual: self.key.len(),
        }
    }
}
