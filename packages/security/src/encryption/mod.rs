// ABOUTME: API key encryption using ChaCha20-Poly1305 AEAD
// ABOUTME: Keys derived with HKDF from a configured secret or from the machine identity
//
// SECURITY MODEL:
//
// Secret-Based Encryption (recommended for servers):
// - Derives the key from AGENTDESK_ENCRYPTION_SECRET + application salt
// - Every instance sharing the secret can read the stored credentials
//
// Machine-Based Encryption (fallback):
// - Derives the key from machine ID + username + hostname + application salt
// - Credentials cannot be read on a different host

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ring::{
    aead::{self, Nonce, UnboundKey},
    error::Unspecified,
    hkdf,
    rand::{SecureRandom, SystemRandom},
};
use std::sync::Arc;

/// Application salt for key derivation (constant, not secret)
const APP_SALT: &[u8] = b"agentdesk-api-key-encryption-v1";

/// Nonce size for ChaCha20-Poly1305
const NONCE_SIZE: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum EncryptionError {
    #[error("Failed to generate random data: {0}")]
    RandomGeneration(String),

    #[error("Failed to encrypt data: {0}")]
    Encryption(String),

    #[error("Failed to decrypt data: {0}")]
    Decryption(String),

    #[error("Failed to derive encryption key: {0}")]
    KeyDerivation(String),

    #[error("Invalid encrypted data format")]
    InvalidFormat,
}

impl From<Unspecified> for EncryptionError {
    fn from(_: Unspecified) -> Self {
        EncryptionError::Encryption("Cryptographic operation failed".to_string())
    }
}

/// Where the encryption key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Secret,
    Machine,
}

/// API key encryption service
#[derive(Debug)]
pub struct ApiKeyEncryption {
    rng: Arc<SystemRandom>,
    encryption_key: Vec<u8>,
    source: KeySource,
}

impl ApiKeyEncryption {
    /// Use the configured secret when present, the machine identity otherwise
    pub fn from_config(secret: Option<&str>) -> Result<Self, EncryptionError> {
        match secret.filter(|s| !s.trim().is_empty()) {
            Some(secret) => Self::from_secret(secret),
            None => Self::with_machine_key(),
        }
    }

    /// Create encryption service with a key derived from a shared secret
    pub fn from_secret(secret: &str) -> Result<Self, EncryptionError> {
        if secret.is_empty() {
            return Err(EncryptionError::KeyDerivation(
                "Encryption secret must not be empty".to_string(),
            ));
        }

        let mut key_material = Vec::with_capacity(secret.len() + APP_SALT.len());
        key_material.extend_from_slice(secret.as_bytes());
        key_material.extend_from_slice(APP_SALT);

        Ok(Self {
            rng: Arc::new(SystemRandom::new()),
            encryption_key: derive_key(&key_material)?,
            source: KeySource::Secret,
        })
    }

    /// Create encryption service with machine-derived key
    pub fn with_machine_key() -> Result<Self, EncryptionError> {
        let machine_id = machine_uid::get().map_err(|e| {
            EncryptionError::KeyDerivation(format!("Failed to get machine ID: {}", e))
        })?;

        let username = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown-user".to_string());

        let hostname = hostname::get()
            .map_err(|e| EncryptionError::KeyDerivation(format!("Failed to get hostname: {}", e)))?
            .to_string_lossy()
            .to_string();

        // Username and hostname add entropy where container machine IDs are weak
        let mut key_material =
            Vec::with_capacity(machine_id.len() + username.len() + hostname.len() + APP_SALT.len());
        key_material.extend_from_slice(machine_id.as_bytes());
        key_material.extend_from_slice(username.as_bytes());
        key_material.extend_from_slice(hostname.as_bytes());
        key_material.extend_from_slice(APP_SALT);

        Ok(Self {
            rng: Arc::new(SystemRandom::new()),
            encryption_key: derive_key(&key_material)?,
            source: KeySource::Machine,
        })
    }

    pub fn source(&self) -> KeySource {
        self.source
    }

    /// Encrypt an API key
    /// Returns base64-encoded: nonce || ciphertext || tag
    pub fn encrypt(&self, plaintext: &str) -> Result<String, EncryptionError> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        self.rng.fill(&mut nonce_bytes).map_err(|_| {
            EncryptionError::RandomGeneration("Failed to generate nonce".to_string())
        })?;

        let nonce = Nonce::try_assume_unique_for_key(&nonce_bytes)?;

        let unbound_key = UnboundKey::new(&aead::CHACHA20_POLY1305, &self.encryption_key)?;
        let sealing_key = aead::LessSafeKey::new(unbound_key);

        let mut in_out = plaintext.as_bytes().to_vec();
        sealing_key
            .seal_in_place_append_tag(nonce, aead::Aad::empty(), &mut in_out)
            .map_err(|_| EncryptionError::Encryption("Seal operation failed".to_string()))?;

        let mut result = Vec::with_capacity(NONCE_SIZE + in_out.len());
        result.extend_from_slice(&nonce_bytes);
        result.extend_from_slice(&in_out);

        Ok(BASE64.encode(&result))
    }

    /// Decrypt an API key
    /// Expects base64-encoded: nonce || ciphertext || tag
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, EncryptionError> {
        if ciphertext.is_empty() {
            return Ok(String::new());
        }

        let encrypted_data = BASE64
            .decode(ciphertext)
            .map_err(|_| EncryptionError::InvalidFormat)?;

        if encrypted_data.len() < NONCE_SIZE + aead::CHACHA20_POLY1305.tag_len() {
            return Err(EncryptionError::InvalidFormat);
        }

        let (nonce_bytes, ciphertext_and_tag) = encrypted_data.split_at(NONCE_SIZE);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)?;

        let unbound_key = UnboundKey::new(&aead::CHACHA20_POLY1305, &self.encryption_key)?;
        let opening_key = aead::LessSafeKey::new(unbound_key);

        let mut in_out = ciphertext_and_tag.to_vec();
        let plaintext = opening_key
            .open_in_place(nonce, aead::Aad::empty(), &mut in_out)
            .map_err(|_| EncryptionError::Decryption("Open operation failed".to_string()))?;

        String::from_utf8(plaintext.to_vec())
            .map_err(|_| EncryptionError::Decryption("Invalid UTF-8 in decrypted data".to_string()))
    }

    /// Check if a value is encrypted (base64 with sufficient length)
    pub fn is_encrypted(value: &str) -> bool {
        if value.is_empty() {
            return false;
        }

        if let Ok(decoded) = BASE64.decode(value) {
            decoded.len() >= NONCE_SIZE + aead::CHACHA20_POLY1305.tag_len()
        } else {
            false
        }
    }
}

/// Derive a 256-bit key from key material using HKDF-SHA256
fn derive_key(key_material: &[u8]) -> Result<Vec<u8>, EncryptionError> {
    let salt = hkdf::Salt::new(hkdf::HKDF_SHA256, b"agentdesk-encryption-salt");
    let prk = salt.extract(key_material);

    let mut encryption_key = vec![0u8; 32];
    prk.expand(&[b"api-key-encryption"], hkdf::HKDF_SHA256)
        .map_err(|_| EncryptionError::KeyDerivation("HKDF expansion failed".to_string()))?
        .fill(&mut encryption_key)
        .map_err(|_| EncryptionError::KeyDerivation("Key fill failed".to_string()))?;

    Ok(encryption_key)
}
