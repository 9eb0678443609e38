//! PEM-encoded RSA key material, loaded from explicit paths.
//!
//! Private keys are accepted as PKCS#8 (`BEGIN PRIVATE KEY`) or PKCS#1
//! (`BEGIN RSA PRIVATE KEY`); public keys as SPKI (`BEGIN PUBLIC KEY`) or
//! PKCS#1 (`BEGIN RSA PUBLIC KEY`). Password-protected keys are not supported.

use std::path::Path;

use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;

use crate::{errors::PkiError, types::OAEP_HASH_LEN};

/// RSA private key. The underlying key zeroizes itself on drop.
pub struct PrivateKey {
    inner: RsaPrivateKey,
}

impl PrivateKey {
    /// # Errors
    ///
    /// Returns `PkiError::KeyFormat` if `pem` is neither PKCS#8 nor PKCS#1.
    pub fn from_pem(pem: &str) -> Result<Self, PkiError> {
        RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map(Self::from_rsa)
            .map_err(|e| PkiError::KeyFormat(e.to_string()))
    }

    /// # Errors
    ///
    /// Returns `PkiError::Io` if the file cannot be read, `PkiError::KeyFormat` if it
    /// does not hold an RSA private key.
    pub fn load(path: &Path) -> Result<Self, PkiError> {
        let pem = Zeroizing::new(std::fs::read_to_string(path)?);
        let key = Self::from_pem(&pem)?;
        tracing::debug!(path = %path.display(), bits = key.public_key().modulus_bits(), "Private key loaded");
        Ok(key)
    }

    #[must_use]
    pub fn from_rsa(inner: RsaPrivateKey) -> Self {
        Self { inner }
    }

    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_rsa(self.inner.to_public_key())
    }

    pub(crate) const fn as_rsa(&self) -> &RsaPrivateKey {
        &self.inner
    }
}

/// RSA public key of a counterparty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    inner: RsaPublicKey,
}

impl PublicKey {
    /// # Errors
    ///
    /// Returns `PkiError::KeyFormat` if `pem` is neither SPKI nor PKCS#1.
    pub fn from_pem(pem: &str) -> Result<Self, PkiError> {
        RsaPublicKey::from_public_key_pem(pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
            .map(Self::from_rsa)
            .map_err(|e| PkiError::KeyFormat(e.to_string()))
    }

    /// # Errors
    ///
    /// Returns `PkiError::Io` if the file cannot be read, `PkiError::KeyFormat` if it
    /// does not hold an RSA public key.
    pub fn load(path: &Path) -> Result<Self, PkiError> {
        let pem = std::fs::read_to_string(path)?;
        let key = Self::from_pem(&pem)?;
        tracing::debug!(path = %path.display(), bits = key.modulus_bits(), "Public key loaded");
        Ok(key)
    }

    #[must_use]
    pub fn from_rsa(inner: RsaPublicKey) -> Self {
        Self { inner }
    }

    /// Modulus size in bytes; every ciphertext and signature has this length.
    #[must_use]
    pub fn modulus_len(&self) -> usize {
        self.inner.size()
    }

    #[must_use]
    pub fn modulus_bits(&self) -> usize {
        self.inner.n().bits()
    }

    /// Largest plaintext OAEP/SHA-256 can carry: `k - 2*hLen - 2`.
    #[must_use]
    pub fn max_oaep_payload(&self) -> usize {
        self.modulus_len().saturating_sub(2 * OAEP_HASH_LEN + 2)
    }

    /// Largest PSS salt for SHA-256: `ceil((modBits - 1) / 8) - hLen - 2`.
    #[must_use]
    pub fn max_pss_salt_len(&self) -> usize {
        let em_len = (self.modulus_bits() + 6) / 8;
        em_len.saturating_sub(OAEP_HASH_LEN + 2)
    }

    pub(crate) const fn as_rsa(&self) -> &RsaPublicKey {
        &self.inner
    }
}
