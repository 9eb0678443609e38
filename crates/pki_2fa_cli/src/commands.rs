use std::io::Read;
use std::path::Path;
use std::process::Command as Process;

use anyhow::{bail, Context};
use pki_2fa::{
    open_proof, produce_proof, AsymmetricCipher, DecryptSeedRequest, FileSeedStore, PrivateKey, PublicKey,
    SeedStore, Settings, TotpEngine, TwoFactorService, VerifyRequest,
};
use serde::Serialize;

use crate::config::Command;

pub fn run(command: &Command, settings: &Settings) -> anyhow::Result<()> {
    match command {
        Command::DecryptSeed { encrypted_seed, input } => {
            let text = read_payload(encrypted_seed.as_deref(), input.as_deref())?;
            let service = service(settings)?;
            respond(service.decrypt_seed(&DecryptSeedRequest { encrypted_seed: text }))
        }
        Command::Generate => respond(service(settings)?.generate_2fa(None)),
        Command::Verify { code } => {
            respond(service(settings)?.verify_2fa(&VerifyRequest { code: code.clone() }, None))
        }
        Command::EnrollUri { issuer, account } => {
            let engine = TotpEngine::new(settings.totp)?;
            let store = FileSeedStore::new(&settings.seed_path);
            let Some(seed) = store.get_seed()? else {
                bail!("no seed stored at {}", settings.seed_path.display());
            };
            println!("{}", engine.provisioning_uri(&seed, issuer, account));
            Ok(())
        }
        Command::CommitProof { commit, out } => {
            let commit = match commit {
                Some(c) => c.clone(),
                None => latest_commit()?,
            };
            let signer = load_cipher(&settings.private_key)?;
            let counterparty = PublicKey::load(&settings.counterparty_public_key).with_context(|| {
                format!("loading counterparty key {}", settings.counterparty_public_key.display())
            })?;
            let artifact = produce_proof(&commit, &signer, &counterparty)?;
            std::fs::write(out, &artifact).with_context(|| format!("writing {}", out.display()))?;
            tracing::info!(commit = %commit, out = %out.display(), len = artifact.len(), "Commit proof written");
            println!("Commit Hash: {commit}");
            println!("Encrypted Signature: {artifact}");
            Ok(())
        }
        Command::OpenProof { artifact, commit, signer_key } => {
            let text = std::fs::read_to_string(artifact).with_context(|| format!("reading {}", artifact.display()))?;
            let recipient = load_cipher(&settings.private_key)?;
            let signer = PublicKey::load(signer_key)
                .with_context(|| format!("loading signer key {}", signer_key.display()))?;
            let valid = open_proof(&text, commit, &recipient, &signer);
            println!("{}", serde_json::json!({ "valid": valid }));
            if !valid {
                bail!("proof does not verify for commit {commit}");
            }
            Ok(())
        }
    }
}

fn load_cipher(path: &Path) -> anyhow::Result<AsymmetricCipher> {
    let key = PrivateKey::load(path).with_context(|| format!("loading private key {}", path.display()))?;
    Ok(AsymmetricCipher::new(key))
}

fn service(settings: &Settings) -> anyhow::Result<TwoFactorService<AsymmetricCipher, FileSeedStore>> {
    let engine = TotpEngine::new(settings.totp)?;
    let cipher = load_cipher(&settings.private_key)?;
    Ok(TwoFactorService::new(cipher, FileSeedStore::new(&settings.seed_path), engine))
}

fn read_payload(inline: Option<&str>, input: Option<&Path>) -> anyhow::Result<String> {
    if let Some(text) = inline {
        return Ok(text.to_owned());
    }
    if let Some(path) = input {
        return std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()));
    }
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text).context("reading stdin")?;
    Ok(text)
}

/// Print the success body, or the error body and fail.
fn respond<T: Serialize>(result: Result<T, pki_2fa::ApiError>) -> anyhow::Result<()> {
    match result {
        Ok(body) => {
            println!("{}", serde_json::to_string(&body)?);
            Ok(())
        }
        Err(e) => {
            println!("{}", serde_json::to_string(&e.body)?);
            Err(e.into())
        }
    }
}

fn latest_commit() -> anyhow::Result<String> {
    let output = Process::new("git")
        .args(["log", "-1", "--format=%H"])
        .output()
        .context("running git; pass --commit outside a repository")?;
    if !output.status.success() {
        bail!("git log failed: {}", String::from_utf8_lossy(&output.stderr).trim());
    }
    let commit = String::from_utf8(output.stdout)?.trim().to_owned();
    if commit.is_empty() {
        bail!("git log returned no commit");
    }
    Ok(commit)
}
