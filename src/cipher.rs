//! RSA primitives with the padding schemes fixed: OAEP/SHA-256 (MGF1-SHA-256,
//! empty label) for encryption and PSS/SHA-256 with the maximum salt for
//! signatures.

use rand_core::OsRng;
use rsa::{Oaep, Pss};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::{
    errors::PkiError,
    keys::{PrivateKey, PublicKey},
};

/// Private-key decryption, as consumed by the seed provisioner.
pub trait Decryptor {
    /// Recover the plaintext of an OAEP ciphertext.
    ///
    /// # Errors
    /// Returns `PkiError::Decryption` for every failure, whatever the cause.
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>, PkiError>;
}

/// Private-key signing, as consumed by the proof generator.
pub trait Signer {
    /// Sign `message` (hashed internally).
    ///
    /// # Errors
    /// Returns `PkiError::Signing` if the key cannot produce a signature.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, PkiError>;
}

/// Holder of one RSA keypair.
pub struct AsymmetricCipher {
    key: PrivateKey,
    public: PublicKey,
}

impl AsymmetricCipher {
    #[must_use]
    pub fn new(key: PrivateKey) -> Self {
        let public = key.public_key();
        Self { key, public }
    }

    #[must_use]
    pub const fn public_key(&self) -> &PublicKey {
        &self.public
    }
}

impl Decryptor for AsymmetricCipher {
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>, PkiError> {
        if ciphertext.len() != self.public.modulus_len() {
            return Err(PkiError::Decryption);
        }
        self.key
            .as_rsa()
            .decrypt_blinded(&mut OsRng, Oaep::new::<Sha256>(), ciphertext)
            .map(Zeroizing::new)
            .map_err(|_| PkiError::Decryption)
    }
}

impl Signer for AsymmetricCipher {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, PkiError> {
        let digest = Sha256::digest(message);
        let padding = Pss::new_with_salt::<Sha256>(self.public.max_pss_salt_len());
        self.key
            .as_rsa()
            .sign_with_rng(&mut OsRng, padding, &digest)
            .map_err(|_| PkiError::Signing)
    }
}

/// OAEP/SHA-256 encrypt `plaintext` to `recipient`. Randomized per call.
///
/// # Errors
///
/// Returns `PkiError::Encryption` if `plaintext` exceeds `k - 2*hLen - 2` bytes.
pub fn encrypt(plaintext: &[u8], recipient: &PublicKey) -> Result<Vec<u8>, PkiError> {
    let max = recipient.max_oaep_payload();
    if plaintext.len() > max {
        return Err(PkiError::Encryption { max, got: plaintext.len() });
    }
    recipient
        .as_rsa()
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), plaintext)
        .map_err(|_| PkiError::Encryption { max, got: plaintext.len() })
}

/// Check a PSS/SHA-256 max-salt signature. Never errors: any mismatch,
/// malformed signature or wrong key is `false`.
#[must_use]
pub fn verify_signature(message: &[u8], signature: &[u8], signer: &PublicKey) -> bool {
    if signature.len() != signer.modulus_len() {
        return false;
    }
    let digest = Sha256::digest(message);
    let padding = Pss::new_with_salt::<Sha256>(signer.max_pss_salt_len());
    signer.as_rsa().verify(padding, &digest, signature).is_ok()
}
