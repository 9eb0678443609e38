//! Typed request/response surface for the three 2FA operations.
//!
//! Transport layers deserialize into these structs and hand them to
//! [`TwoFactorService`]. Failures come back as [`ApiError`], whose messages
//! never say which cryptographic step failed.

use serde::{Deserialize, Serialize};

use crate::{
    cipher::Decryptor,
    errors::PkiError,
    provision::provision_seed,
    store::SeedStore,
    totp::{now_unix, TotpEngine},
    types::Seed,
};

pub const ERR_DECRYPTION: &str = "Decryption failed";
pub const ERR_NO_SEED: &str = "Seed not decrypted yet";
pub const ERR_MISSING_CODE: &str = "Missing code";
pub const ERR_GENERATE: &str = "Failed to generate 2FA code";
pub const ERR_VERIFY: &str = "Failed to verify 2FA code";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptSeedRequest {
    pub encrypted_seed: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub code: String,
    pub valid_for: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// HTTP-style status plus a fixed, generic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    pub body: ErrorResponse,
}

impl ApiError {
    fn new(status: u16, message: &str) -> Self {
        Self { status, body: ErrorResponse { error: message.to_owned() } }
    }

    fn internal(message: &str) -> Self {
        Self::new(500, message)
    }
}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.status, self.body.error)
    }
}

impl std::error::Error for ApiError {}

/// Provisioning, generation and verification over one keypair and one store.
pub struct TwoFactorService<D: Decryptor, S: SeedStore> {
    decryptor: D,
    store: S,
    engine: TotpEngine,
}

impl<D: Decryptor, S: SeedStore> TwoFactorService<D, S> {
    #[must_use]
    pub const fn new(decryptor: D, store: S, engine: TotpEngine) -> Self {
        Self { decryptor, store, engine }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn engine(&self) -> &TotpEngine {
        &self.engine
    }

    /// Decrypt, validate and persist a seed. Nothing is written unless the
    /// seed is valid.
    ///
    /// # Errors
    /// 500 `Decryption failed` for any decode, decrypt, format or write failure.
    pub fn decrypt_seed(&self, request: &DecryptSeedRequest) -> Result<StatusResponse, ApiError> {
        let seed = provision_seed(&self.decryptor, &request.encrypted_seed).map_err(|e| {
            tracing::warn!(reason = rejection_reason(&e), "Seed provisioning rejected");
            ApiError::internal(ERR_DECRYPTION)
        })?;
        self.store.put_seed(&seed).map_err(|e| {
            tracing::error!(error = %e, "Seed write failed");
            ApiError::internal(ERR_DECRYPTION)
        })?;
        tracing::info!("Seed decrypted and stored");
        Ok(StatusResponse { status: "ok".to_owned() })
    }

    /// Current code and the seconds it stays valid. `now` defaults to the
    /// wall clock.
    ///
    /// # Errors
    /// 500 `Seed not decrypted yet` if no seed is stored, 500
    /// `Failed to generate 2FA code` if the store cannot be read.
    pub fn generate_2fa(&self, now: Option<u64>) -> Result<GenerateResponse, ApiError> {
        let now = now.unwrap_or_else(now_unix);
        let seed = self.load_seed(ERR_GENERATE)?;
        let code = self.engine.generate(&seed, now);
        Ok(GenerateResponse {
            code: code.as_str().to_owned(),
            valid_for: self.engine.remaining_secs(now),
        })
    }

    /// Check a code within the configured skew window.
    ///
    /// # Errors
    /// 400 `Missing code` for an empty code, 500 `Seed not decrypted yet` if
    /// no seed is stored, 500 `Failed to verify 2FA code` if the store cannot
    /// be read. A wrong code is `valid: false`, not an error.
    pub fn verify_2fa(&self, request: &VerifyRequest, now: Option<u64>) -> Result<VerifyResponse, ApiError> {
        if request.code.is_empty() {
            return Err(ApiError::new(400, ERR_MISSING_CODE));
        }
        let now = now.unwrap_or_else(now_unix);
        let seed = self.load_seed(ERR_VERIFY)?;
        let matched = self.engine.matching_step(&seed, &request.code, now);
        if let Some(step) = matched {
            let drift = i128::from(step.0) - i128::from(self.engine.time_step(now).0);
            tracing::debug!(drift_steps = drift, "Code accepted");
        }
        Ok(VerifyResponse { valid: matched.is_some() })
    }

    fn load_seed(&self, on_failure: &str) -> Result<Seed, ApiError> {
        match self.store.get_seed() {
            Ok(Some(seed)) => Ok(seed),
            Ok(None) => {
                tracing::error!("Seed file not found");
                Err(ApiError::internal(ERR_NO_SEED))
            }
            Err(e) => {
                tracing::error!(error = %e, "Seed read failed");
                Err(ApiError::internal(on_failure))
            }
        }
    }
}

const fn rejection_reason(e: &PkiError) -> &'static str {
    match e {
        PkiError::MalformedEncoding => "encoding",
        PkiError::InvalidSeedFormat => "format",
        _ => "decryption",
    }
}
