use crate::{cipher::Decryptor, codec::decode_text, errors::PkiError, types::Seed};

/// Turns an encrypted-seed payload into a validated `Seed`.
///
/// Pure transformation: nothing is written anywhere. The caller persists the
/// returned seed, and cannot be handed an invalid one.
pub struct SeedProvisioner<'a, D: Decryptor> {
    decryptor: &'a D,
}

impl<'a, D: Decryptor> SeedProvisioner<'a, D> {
    #[must_use]
    pub const fn new(decryptor: &'a D) -> Self {
        Self { decryptor }
    }

    /// base64 decode → OAEP decrypt → UTF-8 → trim → 64-hex check.
    ///
    /// Deterministic: the same ciphertext always yields the same seed.
    ///
    /// # Errors
    /// - `PkiError::MalformedEncoding` if the text is not valid base64.
    /// - `PkiError::Provisioning` if decryption fails, whatever the cause.
    /// - `PkiError::InvalidSeedFormat` if the plaintext is not UTF-8 or not
    ///   exactly 64 hex characters after trimming.
    pub fn provision(&self, encrypted_seed: &str) -> Result<Seed, PkiError> {
        let ciphertext = decode_text(encrypted_seed)?;
        let plaintext = self.decryptor.decrypt(&ciphertext).map_err(|_| PkiError::Provisioning)?;
        let text = core::str::from_utf8(&plaintext).map_err(|_| PkiError::InvalidSeedFormat)?;
        Seed::parse(text.trim())
    }
}

/// Convenience wrapper over [`SeedProvisioner::provision`].
///
/// # Errors
/// See [`SeedProvisioner::provision`].
pub fn provision_seed<D: Decryptor>(decryptor: &D, encrypted_seed: &str) -> Result<Seed, PkiError> {
    SeedProvisioner::new(decryptor).provision(encrypted_seed)
}
