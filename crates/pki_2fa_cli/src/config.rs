use clap::{Parser, Subcommand};
use pki_2fa::Settings;
use std::path::PathBuf;

/// Default output file for commit proofs.
pub const DEFAULT_PROOF_FILE: &str = "encrypted_signature.b64";

#[derive(Parser, Debug)]
#[command(name = "pki-2fa", version, about = "RSA-provisioned TOTP and commit proofs")]
pub struct Cli {
    /// Settings file (TOML)
    #[arg(long, env = "PKI2FA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// PEM private key of this service
    #[arg(long, env = "PKI2FA_PRIVATE_KEY", global = true)]
    pub private_key: Option<PathBuf>,

    /// PEM public key of the counterparty
    #[arg(long, env = "PKI2FA_COUNTERPARTY_KEY", global = true)]
    pub counterparty_key: Option<PathBuf>,

    /// Seed store file
    #[arg(long, env = "PKI2FA_SEED_FILE", global = true)]
    pub seed_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "PKI2FA_LOG", default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decrypt an encrypted seed and store it
    DecryptSeed {
        /// Base64 ciphertext; read from --input or stdin when omitted
        encrypted_seed: Option<String>,
        /// File holding the base64 ciphertext
        #[arg(long, conflicts_with = "encrypted_seed")]
        input: Option<PathBuf>,
    },
    /// Print the current code and its remaining validity
    #[command(name = "generate-2fa")]
    Generate,
    /// Check a code against the stored seed
    #[command(name = "verify-2fa")]
    Verify {
        /// Code to check
        code: String,
    },
    /// Print an otpauth:// URI for authenticator apps
    EnrollUri {
        #[arg(long, default_value = "PKI-2FA")]
        issuer: String,
        #[arg(long, default_value = "student")]
        account: String,
    },
    /// Sign a commit id and encrypt the signature to the counterparty
    CommitProof {
        /// Commit id; defaults to `git log -1 --format=%H`
        #[arg(long)]
        commit: Option<String>,
        /// Output file for the base64 artifact
        #[arg(long, default_value = DEFAULT_PROOF_FILE)]
        out: PathBuf,
    },
    /// Decrypt a proof with --private-key and verify it against a signer key
    OpenProof {
        /// File holding the base64 artifact
        #[arg(long, default_value = DEFAULT_PROOF_FILE)]
        artifact: PathBuf,
        /// Commit id the proof should cover
        #[arg(long)]
        commit: String,
        /// PEM public key of the signer
        #[arg(long)]
        signer_key: PathBuf,
    },
}

/// Settings file (if any) overlaid with command-line flags.
pub fn resolve_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)
            .map_err(|e| anyhow::anyhow!("loading settings from {}: {e}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(path) = &cli.private_key {
        settings.private_key.clone_from(path);
    }
    if let Some(path) = &cli.counterparty_key {
        settings.counterparty_public_key.clone_from(path);
    }
    if let Some(path) = &cli.seed_file {
        settings.seed_path.clone_from(path);
    }
    Ok(settings)
}
