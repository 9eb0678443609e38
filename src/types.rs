use core::fmt;
use core::str::FromStr;

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::PkiError;

pub const SEED_HEX_LEN: usize = 64;              // 256-bit seed, hex encoded
pub const SEED_LEN: usize = SEED_HEX_LEN / 2;    // raw HMAC key bytes
pub const DEFAULT_PERIOD_SECS: u64 = 30;
pub const DEFAULT_DIGITS: u32 = 6;
pub const DEFAULT_WINDOW_STEPS: u64 = 1;
pub const MAX_DIGITS: u32 = 9;                   // 10^9 < 2^31
pub const MAX_WINDOW_STEPS: u64 = 10;
pub const OAEP_HASH_LEN: usize = 32;             // SHA-256

/// Validated TOTP seed: 64 lowercase hex characters.
///
/// Construction is the only place the format is checked, so every `Seed`
/// in the program satisfies it. Both forms are wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seed {
    hex: String,
    bytes: [u8; SEED_LEN],
}

impl Seed {
    /// Parse a seed, accepting either case and normalizing to lowercase.
    /// Surrounding whitespace is not stripped here.
    ///
    /// # Errors
    ///
    /// Returns `PkiError::InvalidSeedFormat` unless `text` is exactly 64 hex characters.
    pub fn parse(text: &str) -> Result<Self, PkiError> {
        if text.len() != SEED_HEX_LEN {
            return Err(PkiError::InvalidSeedFormat);
        }
        let mut bytes = [0u8; SEED_LEN];
        hex::decode_to_slice(text, &mut bytes).map_err(|_| PkiError::InvalidSeedFormat)?;
        Ok(Self { hex: text.to_ascii_lowercase(), bytes })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.hex
    }

    /// Raw key bytes used for the HMAC.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.bytes
    }
}

impl FromStr for Seed {
    type Err = PkiError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(<redacted>)")
    }
}

/// Fixed-length numeric one-time code.
#[derive(Clone, PartialEq, Eq)]
pub struct TotpCode(String);

impl TotpCode {
    /// Validate a candidate code supplied by a user.
    ///
    /// # Errors
    ///
    /// Returns `PkiError::MalformedCandidateCode` if `candidate` is empty,
    /// contains a non-digit, or is not exactly `digits` long.
    pub fn parse(candidate: &str, digits: u32) -> Result<Self, PkiError> {
        let well_formed = !candidate.is_empty()
            && candidate.len() == digits as usize
            && candidate.bytes().all(|b| b.is_ascii_digit());
        if !well_formed {
            return Err(PkiError::MalformedCandidateCode);
        }
        Ok(Self(candidate.to_owned()))
    }

    pub(crate) const fn from_generated(code: String) -> Self {
        Self(code)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Constant-time equality on the code digits.
    #[must_use]
    pub fn ct_matches(&self, other: &Self) -> bool {
        let a = self.0.as_bytes();
        let b = other.0.as_bytes();
        a.len() == b.len() && bool::from(a.ct_eq(b))
    }
}

impl fmt::Display for TotpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TotpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TotpCode({})", self.0)
    }
}

/// `floor(unix_time / period)`, the unit of TOTP validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct TimeStep(pub u64);

impl TimeStep {
    #[must_use]
    pub const fn from_unix(unix_time: u64, period: u64) -> Self {
        Self(unix_time / period)
    }

    /// First second covered by this step.
    #[must_use]
    pub const fn start_time(self, period: u64) -> u64 {
        self.0.saturating_mul(period)
    }

    /// Big-endian counter bytes fed to the HMAC.
    #[must_use]
    pub const fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN: &str = "54db96cc33a6fa25d2763f3add0a392d8e3a4874c95b9eb8786cc160064b0b04";

    #[test]
    fn seed_normalizes_case() {
        let seed = Seed::parse(&KNOWN.to_ascii_uppercase()).unwrap();
        assert_eq!(seed.as_str(), KNOWN);
        assert_eq!(seed.as_bytes()[0], 0x54);
        assert_eq!(seed.as_bytes()[31], 0x04);
    }

    #[test]
    fn seed_rejects_bad_lengths_and_chars() {
        assert!(Seed::parse(&KNOWN[..63]).is_err());
        assert!(Seed::parse(&format!("{KNOWN}0")).is_err());
        assert!(Seed::parse(&format!("{}g", &KNOWN[..63])).is_err());
        assert!(Seed::parse(&format!(" {}", &KNOWN[..63])).is_err());
        assert!(Seed::parse("").is_err());
    }

    #[test]
    fn seed_debug_is_redacted() {
        let seed = Seed::parse(KNOWN).unwrap();
        assert!(!format!("{seed:?}").contains("54db"));
    }

    #[test]
    fn candidate_code_validation() {
        assert!(TotpCode::parse("123456", 6).is_ok());
        assert!(TotpCode::parse("", 6).is_err());
        assert!(TotpCode::parse("12a456", 6).is_err());
        assert!(TotpCode::parse("12345", 6).is_err());
        assert!(TotpCode::parse("1234567", 6).is_err());
        assert!(TotpCode::parse("١٢٣٤٥٦", 6).is_err());
    }

    #[test]
    fn time_step_floor() {
        assert_eq!(TimeStep::from_unix(59, 30), TimeStep(1));
        assert_eq!(TimeStep::from_unix(60, 30), TimeStep(2));
        assert_eq!(TimeStep(2).start_time(30), 60);
        assert_eq!(TimeStep(1).to_be_bytes(), [0, 0, 0, 0, 0, 0, 0, 1]);
    }
}
