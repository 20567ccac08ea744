use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, Nonce};

use super::CipherError;
use crate::utils::decode_base64_lenient;

type Aes192Gcm = AesGcm<Aes192, U12>;

/// AES-GCM key; the variant follows the raw key length.
pub enum AesKey {
    Aes128(Box<Aes128Gcm>),
    Aes192(Box<Aes192Gcm>),
    Aes256(Box<Aes256Gcm>),
}

impl AesKey {
    pub fn from_encoded(encoded: &str) -> Result<Self, CipherError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(CipherError::MissingKey);
        }
        let raw = decode_base64_lenient(encoded).ok_or(CipherError::InvalidKeyEncoding)?;
        Self::from_bytes(&raw)
    }

    pub fn from_bytes(raw: &[u8]) -> Result<Self, CipherError> {
        let invalid = |_| CipherError::InvalidKeyLength(raw.len());
        match raw.len() {
            16 => Ok(Self::Aes128(Box::new(
                Aes128Gcm::new_from_slice(raw).map_err(invalid)?,
            ))),
            24 => Ok(Self::Aes192(Box::new(
                Aes192Gcm::new_from_slice(raw).map_err(invalid)?,
            ))),
            32 => Ok(Self::Aes256(Box::new(
                Aes256Gcm::new_from_slice(raw).map_err(invalid)?,
            ))),
            other => Err(CipherError::InvalidKeyLength(other)),
        }
    }

    pub fn bits(&self) -> usize {
        match self {
            Self::Aes128(_) => 128,
            Self::Aes192(_) => 192,
            Self::Aes256(_) => 256,
        }
    }

    pub(super) fn encrypt(&self, nonce: &Nonce<U12>, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        let result = match self {
            Self::Aes128(c) => c.encrypt(nonce, plaintext),
            Self::Aes192(c) => c.encrypt(nonce, plaintext),
            Self::Aes256(c) => c.encrypt(nonce, plaintext),
        };
        result.map_err(|_| CipherError::EncryptionFailed)
    }

    pub(super) fn decrypt(&self, nonce: &Nonce<U12>, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        let result = match self {
            Self::Aes128(c) => c.decrypt(nonce, ciphertext),
            Self::Aes192(c) => c.decrypt(nonce, ciphertext),
            Self::Aes256(c) => c.decrypt(nonce, ciphertext),
        };
        result.map_err(|_| CipherError::DecryptionFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};
    use base64::Engine;

    #[test]
    fn test_key_lengths() {
        assert_eq!(AesKey::from_bytes(&[1u8; 16]).unwrap().bits(), 128);
        assert_eq!(AesKey::from_bytes(&[1u8; 24]).unwrap().bits(), 192);
        assert_eq!(AesKey::from_bytes(&[1u8; 32]).unwrap().bits(), 256);
        assert!(matches!(
            AesKey::from_bytes(&[1u8; 31]),
            Err(CipherError::InvalidKeyLength(31))
        ));
        assert!(matches!(
            AesKey::from_bytes(&[]),
            Err(CipherError::InvalidKeyLength(0))
        ));
    }

    #[test]
    fn test_key_encodings() {
        // 0xfb 0xff 在两种字母表中编码不同
        let raw = [0xfbu8; 32];
        for encoded in [
            URL_SAFE_NO_PAD.encode(raw),
            URL_SAFE.encode(raw),
            STANDARD.encode(raw),
            format!("  {}\n", STANDARD.encode(raw)),
        ] {
            assert_eq!(AesKey::from_encoded(&encoded).unwrap().bits(), 256);
        }
    }

    #[test]
    fn test_empty_and_garbage_keys() {
        assert!(matches!(
            AesKey::from_encoded("  "),
            Err(CipherError::MissingKey)
        ));
        assert!(matches!(
            AesKey::from_encoded("***not base64***"),
            Err(CipherError::InvalidKeyEncoding)
        ));
    }
}
