#![no_main]

use libfuzzer_sys::fuzz_target;
use pki_2fa::{encode_text, provision_seed, Decryptor, PkiError};
use zeroize::Zeroizing;

// Skips RSA so the fuzzer reaches the UTF-8 and seed-format checks.
struct Identity;
impl Decryptor for Identity {
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>, PkiError> {
        Ok(Zeroizing::new(ciphertext.to_vec()))
    }
}

fuzz_target!(|data: &[u8]| {
    if let Ok(seed) = provision_seed(&Identity, &encode_text(data)) {
        assert_eq!(seed.as_str().len(), 64);
        assert!(seed.as_str().bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
    }
});
