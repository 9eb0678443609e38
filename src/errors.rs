use thiserror::Error;

#[derive(Debug, Error)]
pub enum PkiError {
    #[error("malformed base64 encoding")]
    MalformedEncoding,

    // Length mismatch and padding failure share this variant on purpose.
    #[error("decryption failed")]
    Decryption,

    #[error("seed provisioning failed")]
    Provisioning,

    #[error("invalid seed format: expected 64 hexadecimal characters")]
    InvalidSeedFormat,

    #[error("plaintext too large: max {max} bytes, got {got}")]
    Encryption { max: usize, got: usize },

    #[error("signing failed")]
    Signing,

    #[error("malformed candidate code")]
    MalformedCandidateCode,

    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    #[error("key format error: {0}")]
    KeyFormat(String),

    #[error("settings error: {0}")]
    Settings(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
