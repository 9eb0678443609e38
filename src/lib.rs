#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

//! PKI-2FA core
//!
//! Provisions a TOTP seed to this service through RSA-OAEP, generates and
//! verifies RFC 6238 codes from it, and produces sign-then-encrypt proofs of
//! commit authorship with the same key material.

// Fixed cryptographic choices:
// - Seed transport: RSA-OAEP, SHA-256 for both hash and MGF1, empty label
// - Proof signature: RSA-PSS, SHA-256, maximum salt length
// - Proof transport: RSA-OAEP as above, to the counterparty key
// - Text encoding: standard base64 with padding
// - Seed: 64 hex chars (32 bytes) used directly as the HMAC key
// - TOTP: HMAC-SHA-1, 6 digits, 30 s steps, ±1 step window (all configurable)

pub mod api;
pub mod cipher;
pub mod codec;
pub mod config;
pub mod errors;
pub mod keys;
pub mod proof;
pub mod provision;
pub mod store;
pub mod totp;
pub mod types;

pub use api::{
    ApiError, DecryptSeedRequest, ErrorResponse, GenerateResponse, StatusResponse, TwoFactorService,
    VerifyRequest, VerifyResponse,
};
pub use cipher::{encrypt, verify_signature, AsymmetricCipher, Decryptor, Signer};
pub use codec::{decode_text, encode_text};
pub use config::Settings;
pub use errors::PkiError;
pub use keys::{PrivateKey, PublicKey};
pub use proof::{open_proof, produce_proof, ProofGenerator};
pub use provision::{provision_seed, SeedProvisioner};
pub use store::{FileSeedStore, MemorySeedStore, SeedStore};
pub use totp::{hotp, now_unix, HmacAlgorithm, TotpEngine, TotpParams};
pub use types::{Seed, TimeStep, TotpCode};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
