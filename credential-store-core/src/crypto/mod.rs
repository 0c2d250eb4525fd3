//! Encryption gateway
//!
//! The store only ever calls [`TokenCipher::encrypt`] and persists whatever it
//! returns. [`AesGcmCipher`] is the bundled gateway: AES-256-GCM with a key
//! derived from a password via PBKDF2-HMAC-SHA256.
//!
//! Envelope format: `v<version>$<salt_b64>$<nonce_b64>$<ciphertext_b64>`.

mod versions;

pub use versions::{get_current_iterations, get_pbkdf2_iterations, CURRENT_ENVELOPE_VERSION};

use std::fmt;

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use pbkdf2::pbkdf2_hmac_array;
use rand::RngCore;
use sha2::Sha256;

use crate::error::{CoreError, CoreResult};

const SALT_LENGTH: usize = 16;
const NONCE_LENGTH: usize = 12;
const KEY_LENGTH: usize = 32; // AES-256
const ENVELOPE_SEPARATOR: char = '$';

/// Turns a plaintext token into the ciphertext that gets persisted.
///
/// Implementations must be cheap enough to call once per `set_token`.
pub trait TokenCipher: Send + Sync {
    fn encrypt(&self, plaintext: &str) -> CoreResult<String>;
}

/// Derive encryption keys from passwords (supports custom number of iterations)
fn derive_key_with_iterations(password: &str, salt: &[u8], iterations: u32) -> [u8; KEY_LENGTH] {
    pbkdf2_hmac_array::<Sha256, KEY_LENGTH>(password.as_bytes(), salt, iterations)
}

/// Password-based AES-256-GCM gateway.
///
/// The key is derived once per instance against a random salt, so
/// `encrypt` costs one AES-GCM pass. The salt travels inside every envelope,
/// which lets any instance holding the same password decrypt it.
pub struct AesGcmCipher {
    password: String,
    salt: [u8; SALT_LENGTH],
    key: [u8; KEY_LENGTH],
}

impl AesGcmCipher {
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        let password = password.into();
        let mut salt = [0u8; SALT_LENGTH];
        rand::rng().fill_bytes(&mut salt);
        let key = derive_key_with_iterations(&password, &salt, get_current_iterations());
        Self {
            password,
            salt,
            key,
        }
    }

    /// Decrypt an envelope produced by any `AesGcmCipher` sharing this password.
    ///
    /// Never called by the store; token consumers use it right before talking
    /// to the upstream AI platform.
    pub fn decrypt(&self, envelope: &str) -> CoreResult<String> {
        let mut parts = envelope.split(ENVELOPE_SEPARATOR);
        let (Some(version), Some(salt_b64), Some(nonce_b64), Some(ciphertext_b64), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(CoreError::CryptoError("Malformed token envelope".to_string()));
        };

        let version: u32 = version
            .strip_prefix('v')
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| CoreError::CryptoError(format!("Invalid envelope version: {version}")))?;
        let iterations = get_pbkdf2_iterations(version).ok_or_else(|| {
            CoreError::CryptoError(format!("Unsupported envelope version: {version}"))
        })?;

        let salt = BASE64
            .decode(salt_b64)
            .map_err(|e| CoreError::CryptoError(format!("Invalid salt: {e}")))?;
        let nonce_bytes = BASE64
            .decode(nonce_b64)
            .map_err(|e| CoreError::CryptoError(format!("Invalid nonce: {e}")))?;
        let ciphertext = BASE64
            .decode(ciphertext_b64)
            .map_err(|e| CoreError::CryptoError(format!("Invalid ciphertext: {e}")))?;
        if nonce_bytes.len() != NONCE_LENGTH {
            return Err(CoreError::CryptoError("Invalid nonce length".to_string()));
        }

        // Reuse the cached key for envelopes this instance wrote.
        let key = if salt == self.salt && iterations == get_current_iterations() {
            self.key
        } else {
            derive_key_with_iterations(&self.password, &salt, iterations)
        };

        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|e| CoreError::CryptoError(format!("Failed to create cipher: {e}")))?;
        let plaintext = cipher
            .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_ref())
            .map_err(|_| {
                CoreError::CryptoError(
                    "Decryption failed: invalid password or corrupted data".to_string(),
                )
            })?;

        String::from_utf8(plaintext)
            .map_err(|e| CoreError::CryptoError(format!("Invalid UTF-8: {e}")))
    }
}

impl TokenCipher for AesGcmCipher {
    fn encrypt(&self, plaintext: &str) -> CoreResult<String> {
        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        rand::rng().fill_bytes(&mut nonce_bytes);

        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| CoreError::CryptoError(format!("Failed to create cipher: {e}")))?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|e| CoreError::CryptoError(format!("Encryption failed: {e}")))?;

        Ok(format!(
            "v{CURRENT_ENVELOPE_VERSION}{sep}{}{sep}{}{sep}{}",
            BASE64.encode(self.salt),
            BASE64.encode(nonce_bytes),
            BASE64.encode(ciphertext),
            sep = ENVELOPE_SEPARATOR,
        ))
    }
}

impl fmt::Debug for AesGcmCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesGcmCipher")
            .field("salt", &BASE64.encode(self.salt))
            .finish_non_exhaustive()
    }
}
