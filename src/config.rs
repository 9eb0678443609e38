use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{errors::PkiError, totp::TotpParams};

pub const DEFAULT_PRIVATE_KEY: &str = "student_private.pem";
pub const DEFAULT_COUNTERPARTY_KEY: &str = "instructor_public.pem";
pub const DEFAULT_SEED_PATH: &str = "/data/seed.txt";

/// Explicit locations and TOTP policy. Every field has a default, so an
/// empty file is a valid configuration.
///
/// ```toml
/// private_key = "keys/student_private.pem"
/// seed_path = "/data/seed.txt"
///
/// [totp]
/// window = 1
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub private_key: PathBuf,
    pub counterparty_public_key: PathBuf,
    pub seed_path: PathBuf,
    pub totp: TotpParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            private_key: PathBuf::from(DEFAULT_PRIVATE_KEY),
            counterparty_public_key: PathBuf::from(DEFAULT_COUNTERPARTY_KEY),
            seed_path: PathBuf::from(DEFAULT_SEED_PATH),
            totp: TotpParams::default(),
        }
    }
}

impl Settings {
    /// # Errors
    ///
    /// Returns `PkiError::Settings` on malformed TOML or unknown keys, and
    /// `PkiError::InvalidParameter` if the TOTP section is out of range.
    pub fn from_toml_str(text: &str) -> Result<Self, PkiError> {
        let settings: Self = toml::from_str(text).map_err(|e| PkiError::Settings(e.to_string()))?;
        settings.totp.validate()?;
        Ok(settings)
    }

    /// # Errors
    ///
    /// Returns `PkiError::Io` if the file cannot be read, otherwise as
    /// [`Settings::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, PkiError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::totp::HmacAlgorithm;

    #[test]
    fn empty_is_default() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn partial_override() {
        let s = Settings::from_toml_str(
            "private_key = \"/app/student_private.pem\"\n[totp]\nwindow = 2\nalgorithm = \"sha256\"\n",
        )
        .unwrap();
        assert_eq!(s.private_key, PathBuf::from("/app/student_private.pem"));
        assert_eq!(s.seed_path, PathBuf::from(DEFAULT_SEED_PATH));
        assert_eq!(s.totp.window, 2);
        assert_eq!(s.totp.period, 30);
        assert_eq!(s.totp.algorithm, HmacAlgorithm::Sha256);
    }

    #[test]
    fn rejects_unknown_keys_and_bad_totp() {
        assert!(matches!(Settings::from_toml_str("seed_file = \"x\""), Err(PkiError::Settings(_))));
        assert!(matches!(
            Settings::from_toml_str("[totp]\ndigits = 12\n"),
            Err(PkiError::InvalidParameter(_))
        ));
    }

    #[test]
    fn rejects_oversized_window() {
        assert!(Settings::from_toml_str("[totp]\nwindow = 10\n").is_ok());
        for window in ["11", "2000000", "9000000000000000000"] {
            let text = format!("[totp]\nwindow = {window}\n");
            assert!(matches!(Settings::from_toml_str(&text), Err(PkiError::InvalidParameter(_))));
        }
    }
}
