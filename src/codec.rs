//! Binary/text transcoding used at every boundary: standard base64 with
//! padding for ciphertexts and artifacts, hex for seeds.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use totp_rs::Secret;

use crate::errors::PkiError;

/// Encode bytes as standard base64 with `=` padding.
#[must_use]
pub fn encode_text(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard padded base64.
///
/// Surrounding whitespace (a trailing newline from a file, say) is ignored;
/// anything else outside the alphabet is rejected.
///
/// # Errors
///
/// Returns `PkiError::MalformedEncoding` on invalid characters or padding.
pub fn decode_text(text: &str) -> Result<Vec<u8>, PkiError> {
    STANDARD.decode(text.trim()).map_err(|_| PkiError::MalformedEncoding)
}

/// Lowercase hex rendering of raw bytes.
#[must_use]
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// RFC 4648 base32 without padding, the form authenticator apps expect in
/// `otpauth://` URIs.
#[must_use]
pub fn encode_base32(bytes: &[u8]) -> String {
    Secret::Raw(bytes.to_vec()).to_encoded().to_string()
}
