//! Stateless encrypted links
//!
//! A link code is `base64url_nopad(nonce[12] || ciphertext || tag[16])` under a
//! server-held AES-GCM key. Nothing is stored: a code is valid exactly when it
//! decrypts and authenticates under the current key.

mod key;

use std::sync::OnceLock;

use aes_gcm::aead::consts::U12;
use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use aes_gcm::Nonce;
use base64::Engine as _;
use tracing::{debug, trace};

use crate::utils::{decode_base64_lenient, is_valid_url};

pub use key::AesKey;

pub const NONCE_LEN: usize = 12;
/// Smallest decodable code: a nonce plus at least one byte
const MIN_CODE_BYTES: usize = NONCE_LEN + 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// 未配置密钥
    MissingKey,
    /// 密钥不是合法的 base64 / base64url
    InvalidKeyEncoding,
    /// 解码后的长度不是 16 / 24 / 32
    InvalidKeyLength(usize),
    InvalidUrl,
    MalformedCode,
    DecryptionFailed,
    EncryptionFailed,
}

impl CipherError {
    /// Operator-side problems (HTTP 500) as opposed to bad input
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingKey | Self::InvalidKeyEncoding | Self::InvalidKeyLength(_)
        )
    }
}

impl std::fmt::Display for CipherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingKey => write!(f, "Encryption key not configured"),
            Self::InvalidKeyEncoding | Self::InvalidKeyLength(_) => write!(
                f,
                "Encryption key must be base64/base64url of 16/24/32 bytes"
            ),
            Self::InvalidUrl => write!(f, "Invalid URL"),
            Self::MalformedCode => write!(f, "Malformed code"),
            Self::DecryptionFailed => write!(f, "Decryption failed"),
            Self::EncryptionFailed => write!(f, "Encryption failed"),
        }
    }
}

impl std::error::Error for CipherError {}

/// Encrypts URLs into link codes and back.
pub struct LinkCipher {
    key: AesKey,
}

impl LinkCipher {
    pub fn new(key: AesKey) -> Self {
        Self { key }
    }

    /// Parse the configured key (base64url first, then standard base64)
    pub fn from_encoded_key(encoded: &str) -> Result<Self, CipherError> {
        let key = AesKey::from_encoded(encoded)?;
        debug!("Link cipher ready: AES-{}-GCM", key.bits());
        Ok(Self::new(key))
    }

    pub fn key_bits(&self) -> usize {
        self.key.bits()
    }

    pub fn encrypt(&self, url: &str) -> Result<String, CipherError> {
        if !is_valid_url(url) {
            return Err(CipherError::InvalidUrl);
        }

        // 每次加密都使用新的随机 nonce
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::<U12>::from_slice(&nonce_bytes);

        let ciphertext = self.key.encrypt(nonce, url.as_bytes())?;

        let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);

        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&combined))
    }

    pub fn decrypt(&self, code: &str) -> Result<String, CipherError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(CipherError::MalformedCode);
        }

        let combined = decode_base64_lenient(code).ok_or(CipherError::MalformedCode)?;
        if combined.len() < MIN_CODE_BYTES {
            return Err(CipherError::MalformedCode);
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
        let nonce = Nonce::<U12>::from_slice(nonce_bytes);

        let plaintext = self.key.decrypt(nonce, ciphertext)?;
        trace!("Decrypted link code ({} bytes)", plaintext.len());

        String::from_utf8(plaintext).map_err(|_| CipherError::DecryptionFailed)
    }
}

/// Parses the key on first use and caches it.
///
/// A missing or malformed key is only reported when an encrypted-link
/// endpoint is hit; a failed parse is retried on the next request.
pub struct LazyCipher {
    encoded_key: Option<String>,
    cipher: OnceLock<LinkCipher>,
}

impl LazyCipher {
    pub fn new(encoded_key: Option<String>) -> Self {
        Self {
            encoded_key: encoded_key.filter(|k| !k.trim().is_empty()),
            cipher: OnceLock::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.encoded_key.is_some()
    }

    pub fn get(&self) -> Result<&LinkCipher, CipherError> {
        if let Some(cipher) = self.cipher.get() {
            return Ok(cipher);
        }
        let encoded = self.encoded_key.as_deref().ok_or(CipherError::MissingKey)?;
        let cipher = LinkCipher::from_encoded_key(encoded)?;
        Ok(self.cipher.get_or_init(|| cipher))
    }

    /// URL 校验先于密钥解析：无效 URL 始终是 400
    pub fn encrypt(&self, url: &str) -> Result<String, CipherError> {
        if !is_valid_url(url) {
            return Err(CipherError::InvalidUrl);
        }
        self.get()?.encrypt(url)
    }

    pub fn decrypt(&self, code: &str) -> Result<String, CipherError> {
        self.get()?.decrypt(code)
    }
}
