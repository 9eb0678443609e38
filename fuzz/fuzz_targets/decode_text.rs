#![no_main]

use libfuzzer_sys::fuzz_target;
use pki_2fa::{decode_text, encode_text};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else { return };
    // Anything that decodes must re-encode to the same canonical text.
    if let Ok(bytes) = decode_text(text) {
        assert_eq!(encode_text(&bytes), text.trim());
    }
});
