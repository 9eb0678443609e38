//! RFC 6238 TOTP generation and verification.
//!
//! Defaults are the authenticator-app profile: HMAC-SHA-1, 6 digits,
//! 30-second steps, ±1 step of clock-skew tolerance. Candidate codes are
//! compared in constant time via `subtle`.

use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use url::form_urlencoded;

use crate::{
    codec::encode_base32,
    errors::PkiError,
    types::{
        Seed, TimeStep, TotpCode, DEFAULT_DIGITS, DEFAULT_PERIOD_SECS, DEFAULT_WINDOW_STEPS, MAX_DIGITS,
        MAX_WINDOW_STEPS,
    },
};

/// HMAC digest behind the one-time password. RFC 6238 permits all three;
/// authenticator apps overwhelmingly expect SHA-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HmacAlgorithm {
    #[default]
    Sha1,
    Sha256,
    Sha512,
}

impl HmacAlgorithm {
    /// Name as written in `otpauth://` URIs.
    #[must_use]
    pub const fn uri_name(self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
        }
    }

    // `new_from_slice` only rejects keys for fixed-key MACs; HMAC hashes or
    // pads a key of any length, so these `expect`s cannot fire.
    fn mac(self, key: &[u8], message: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha1 => {
                let mut mac = Hmac::<Sha1>::new_from_slice(key).expect("HMAC can take key of any size");
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
            Self::Sha256 => {
                let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC can take key of any size");
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
            Self::Sha512 => {
                let mut mac = Hmac::<Sha512>::new_from_slice(key).expect("HMAC can take key of any size");
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
        }
    }
}

/// Time-step policy. `window` is the number of steps accepted on each side
/// of the current one; every extra step widens the brute-force surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TotpParams {
    pub period: u64,
    pub digits: u32,
    pub window: u64,
    pub algorithm: HmacAlgorithm,
}

impl Default for TotpParams {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD_SECS,
            digits: DEFAULT_DIGITS,
            window: DEFAULT_WINDOW_STEPS,
            algorithm: HmacAlgorithm::Sha1,
        }
    }
}

impl TotpParams {
    /// # Errors
    ///
    /// Returns `PkiError::InvalidParameter` if `period` is zero, `digits`
    /// is outside `1..=9` or `window` exceeds 10 steps.
    pub const fn validate(&self) -> Result<(), PkiError> {
        if self.period == 0 {
            return Err(PkiError::InvalidParameter("period must be non-zero"));
        }
        if self.window > MAX_WINDOW_STEPS {
            return Err(PkiError::InvalidParameter("window must be at most 10 steps"));
        }
        check_digits(self.digits)
    }
}

const fn check_digits(digits: u32) -> Result<(), PkiError> {
    if digits == 0 || digits > MAX_DIGITS {
        return Err(PkiError::InvalidParameter("digits must be in 1..=9"));
    }
    Ok(())
}

/// HOTP (RFC 4226) over an arbitrary raw key: HMAC of the big-endian
/// counter, dynamic truncation to 31 bits, reduced mod `10^digits` and
/// left-padded with zeros.
///
/// # Errors
///
/// Returns `PkiError::InvalidParameter` if `digits` is outside `1..=9`.
pub fn hotp(key: &[u8], counter: u64, digits: u32, algorithm: HmacAlgorithm) -> Result<String, PkiError> {
    check_digits(digits)?;
    Ok(truncate(key, counter, digits, algorithm))
}

// `digits` is already checked.
fn truncate(key: &[u8], counter: u64, digits: u32, algorithm: HmacAlgorithm) -> String {
    let digest = algorithm.mac(key, &counter.to_be_bytes());
    let offset = usize::from(digest[digest.len() - 1] & 0x0f);
    let binary = u32::from_be_bytes([
        digest[offset],
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]) & 0x7fff_ffff;
    let code = binary % 10u32.pow(digits);
    format!("{code:0width$}", width = digits as usize)
}

/// Seconds since the Unix epoch from the wall clock.
#[must_use]
pub fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Stateless TOTP engine over a fixed parameter set.
#[derive(Debug, Clone, Copy, Default)]
pub struct TotpEngine {
    params: TotpParams,
}

impl TotpEngine {
    /// # Errors
    ///
    /// Returns `PkiError::InvalidParameter` if `params` fail validation.
    pub fn new(params: TotpParams) -> Result<Self, PkiError> {
        params.validate()?;
        Ok(Self { params })
    }

    #[must_use]
    pub const fn params(&self) -> &TotpParams {
        &self.params
    }

    #[must_use]
    pub const fn time_step(&self, unix_time: u64) -> TimeStep {
        TimeStep::from_unix(unix_time, self.params.period)
    }

    /// Code for the step containing `unix_time`.
    #[must_use]
    pub fn generate(&self, seed: &Seed, unix_time: u64) -> TotpCode {
        self.generate_at_step(seed, self.time_step(unix_time))
    }

    #[must_use]
    pub fn generate_at_step(&self, seed: &Seed, step: TimeStep) -> TotpCode {
        TotpCode::from_generated(truncate(seed.as_bytes(), step.0, self.params.digits, self.params.algorithm))
    }

    /// Step in `[now - window, now + window]` whose code equals `candidate`,
    /// if any. Malformed candidates match nothing.
    #[must_use]
    pub fn matching_step(&self, seed: &Seed, candidate: &str, unix_time: u64) -> Option<TimeStep> {
        let candidate = TotpCode::parse(candidate, self.params.digits).ok()?;
        let current = self.time_step(unix_time).0;
        let first = current.saturating_sub(self.params.window);
        let last = current.saturating_add(self.params.window);
        (first..=last)
            .map(TimeStep)
            .find(|&step| self.generate_at_step(seed, step).ct_matches(&candidate))
    }

    /// `true` iff `candidate` is valid within the skew window. Never errors.
    #[must_use]
    pub fn verify(&self, seed: &Seed, candidate: &str, unix_time: u64) -> bool {
        self.matching_step(seed, candidate, unix_time).is_some()
    }

    /// Seconds until the current code rolls over.
    #[must_use]
    pub const fn remaining_secs(&self, unix_time: u64) -> u64 {
        self.params.period - unix_time % self.params.period
    }

    /// `otpauth://` URI for enrolling `seed` in an authenticator app.
    /// `issuer` and `account` are percent-encoded.
    #[must_use]
    pub fn provisioning_uri(&self, seed: &Seed, issuer: &str, account: &str) -> String {
        let (issuer, account) = (uri_component(issuer), uri_component(account));
        format!(
            "otpauth://totp/{issuer}:{account}?secret={}&issuer={issuer}&algorithm={}&digits={}&period={}",
            encode_base32(seed.as_bytes()),
            self.params.algorithm.uri_name(),
            self.params.digits,
            self.params.period,
        )
    }
}

/// Form-encode, then spell spaces as `%20` so the label decodes the same way
/// in the path and in the query.
fn uri_component(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes()).collect::<String>().replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "54db96cc33a6fa25d2763f3add0a392d8e3a4874c95b9eb8786cc160064b0b04";

    fn seed() -> Seed {
        Seed::parse(SEED).unwrap()
    }

    #[test]
    fn rfc4226_hotp_vectors() {
        let key = b"12345678901234567890";
        let expected = [
            "755224", "287082", "359152", "969429", "338314",
            "254676", "287922", "162583", "399871", "520489",
        ];
        for (counter, code) in expected.iter().enumerate() {
            assert_eq!(hotp(key, counter as u64, 6, HmacAlgorithm::Sha1).unwrap(), *code);
        }
    }

    #[test]
    fn rfc6238_vectors_all_digests() {
        let sha1_key = b"12345678901234567890";
        let sha256_key = b"12345678901234567890123456789012";
        let sha512_key = b"1234567890123456789012345678901234567890123456789012345678901234";
        let cases: [(u64, &str, &str, &str); 6] = [
            (59, "94287082", "46119246", "90693936"),
            (1_111_111_109, "07081804", "68084774", "25091201"),
            (1_111_111_111, "14050471", "67062674", "99943326"),
            (1_234_567_890, "89005924", "91819424", "93441116"),
            (2_000_000_000, "69279037", "90698825", "38618901"),
            (20_000_000_000, "65353130", "77737706", "47863826"),
        ];
        for (t, s1, s256, s512) in cases {
            let step = t / 30;
            assert_eq!(hotp(sha1_key, step, 8, HmacAlgorithm::Sha1).unwrap(), s1);
            assert_eq!(hotp(sha256_key, step, 8, HmacAlgorithm::Sha256).unwrap(), s256);
            assert_eq!(hotp(sha512_key, step, 8, HmacAlgorithm::Sha512).unwrap(), s512);
        }
    }

    #[test]
    fn known_seed_codes() {
        let engine = TotpEngine::default();
        let s = seed();
        assert_eq!(engine.generate(&s, 0).as_str(), "455282");
        assert_eq!(engine.generate(&s, 59).as_str(), "381853");
        assert_eq!(engine.generate(&s, 1_700_000_000).as_str(), "166830");
        assert_eq!(engine.generate(&s, 1_700_000_030).as_str(), "138388");
    }

    #[test]
    fn window_is_symmetric_and_bounded() {
        let engine = TotpEngine::default();
        let s = seed();
        let t = 1_700_000_000;
        let code = engine.generate(&s, t);
        assert!(engine.verify(&s, code.as_str(), t));
        assert!(engine.verify(&s, code.as_str(), t + 30));
        assert!(engine.verify(&s, code.as_str(), t - 30));
        assert!(!engine.verify(&s, code.as_str(), t + 60));
        assert!(!engine.verify(&s, code.as_str(), t - 60));
    }

    #[test]
    fn window_zero_is_exact() {
        let engine = TotpEngine::new(TotpParams { window: 0, ..TotpParams::default() }).unwrap();
        let s = seed();
        let code = engine.generate(&s, 1_700_000_030);
        assert!(engine.verify(&s, code.as_str(), 1_700_000_030));
        assert!(!engine.verify(&s, code.as_str(), 1_700_000_000));
    }

    #[test]
    fn window_saturates_at_epoch() {
        let engine = TotpEngine::default();
        let s = seed();
        assert!(engine.verify(&s, "455282", 0));
        assert_eq!(engine.matching_step(&s, "381853", 0), Some(TimeStep(1)));
    }

    #[test]
    fn malformed_candidates_are_false() {
        let engine = TotpEngine::default();
        let s = seed();
        for bad in ["", "12a456", "16683", "1668300", " 166830", "166830\n"] {
            assert!(!engine.verify(&s, bad, 1_700_000_000), "{bad:?}");
        }
    }

    #[test]
    fn remaining_secs_counts_down() {
        let engine = TotpEngine::default();
        assert_eq!(engine.remaining_secs(1_700_000_000), 10);
        assert_eq!(engine.remaining_secs(1_700_000_010), 30);
        assert_eq!(engine.remaining_secs(1_700_000_039), 1);
    }

    #[test]
    fn params_validation() {
        assert!(TotpEngine::new(TotpParams { period: 0, ..TotpParams::default() }).is_err());
        assert!(TotpEngine::new(TotpParams { digits: 0, ..TotpParams::default() }).is_err());
        assert!(TotpEngine::new(TotpParams { digits: 10, ..TotpParams::default() }).is_err());
        assert!(TotpEngine::new(TotpParams { digits: 8, ..TotpParams::default() }).is_ok());
        assert!(TotpEngine::new(TotpParams { window: 10, ..TotpParams::default() }).is_ok());
        assert!(matches!(
            TotpEngine::new(TotpParams { window: 11, ..TotpParams::default() }),
            Err(PkiError::InvalidParameter(_))
        ));
        assert!(TotpEngine::new(TotpParams { window: u64::MAX, ..TotpParams::default() }).is_err());
    }

    #[test]
    fn hotp_rejects_out_of_range_digits() {
        for digits in [0, 10, u32::MAX] {
            assert!(matches!(
                hotp(b"12345678901234567890", 0, digits, HmacAlgorithm::Sha1),
                Err(PkiError::InvalidParameter(_))
            ));
        }
        assert_eq!(hotp(b"12345678901234567890", 0, 9, HmacAlgorithm::Sha1).unwrap().len(), 9);
    }

    #[test]
    fn provisioning_uri_format() {
        let uri = TotpEngine::default().provisioning_uri(&seed(), "PKI-2FA", "student");
        assert!(uri.starts_with("otpauth://totp/PKI-2FA:student?secret=KTN"));
        assert!(uri.contains("algorithm=SHA1"));
        assert!(uri.contains("digits=6"));
        assert!(uri.contains("period=30"));
    }

    #[test]
    fn provisioning_uri_escapes_label_and_issuer() {
        let uri = TotpEngine::default().provisioning_uri(&seed(), "Acme & Co", "a:b@x");
        assert!(uri.starts_with("otpauth://totp/Acme%20%26%20Co:a%3Ab%40x?secret="));
        assert!(!uri.contains(' '));

        let parsed = url::Url::parse(&uri).unwrap();
        assert_eq!(parsed.scheme(), "otpauth");
        let issuer = parsed.query_pairs().find(|(k, _)| k == "issuer").map(|(_, v)| v.into_owned());
        assert_eq!(issuer.as_deref(), Some("Acme & Co"));
        let secret = parsed.query_pairs().find(|(k, _)| k == "secret").map(|(_, v)| v.into_owned());
        assert_eq!(secret.unwrap(), encode_base32(seed().as_bytes()));
    }
}
