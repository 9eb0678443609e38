use crate::{
    cipher::{encrypt, verify_signature, Decryptor, Signer},
    codec::{decode_text, encode_text},
    errors::PkiError,
    keys::PublicKey,
};

/// Sign-then-encrypt proof of authorship for a commit identifier.
///
/// The signer's PSS signature over the UTF-8 commit id is OAEP-encrypted to
/// the counterparty and base64 encoded. The counterparty key must be large
/// enough to carry a whole signature (4096-bit for a 2048-bit signer).
pub struct ProofGenerator<'a, S: Signer> {
    signer: &'a S,
    counterparty: &'a PublicKey,
}

impl<'a, S: Signer> ProofGenerator<'a, S> {
    #[must_use]
    pub const fn new(signer: &'a S, counterparty: &'a PublicKey) -> Self {
        Self { signer, counterparty }
    }

    /// # Errors
    ///
    /// Returns `PkiError::Signing` if signing fails, `PkiError::Encryption` if
    /// the signature does not fit the counterparty key.
    pub fn produce(&self, commit_id: &str) -> Result<String, PkiError> {
        let signature = self.signer.sign(commit_id.as_bytes())?;
        let ciphertext = encrypt(&signature, self.counterparty)?;
        tracing::debug!(
            signature_len = signature.len(),
            ciphertext_len = ciphertext.len(),
            "Commit proof produced"
        );
        Ok(encode_text(&ciphertext))
    }
}

/// Convenience wrapper over [`ProofGenerator::produce`].
///
/// # Errors
/// See [`ProofGenerator::produce`].
pub fn produce_proof<S: Signer>(commit_id: &str, signer: &S, counterparty: &PublicKey) -> Result<String, PkiError> {
    ProofGenerator::new(signer, counterparty).produce(commit_id)
}

/// Counterparty side: decrypt the artifact with `recipient` and check the
/// signature against `signer` for `commit_id`. Any failure is `false`.
#[must_use]
pub fn open_proof<D: Decryptor>(artifact: &str, commit_id: &str, recipient: &D, signer: &PublicKey) -> bool {
    let Ok(ciphertext) = decode_text(artifact) else {
        return false;
    };
    let Ok(signature) = recipient.decrypt(&ciphertext) else {
        return false;
    };
    verify_signature(commit_id.as_bytes(), &signature, signer)
}
