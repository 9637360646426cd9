use std::{fs, path::PathBuf};

use alloy_primitives::{hex, U256};
use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use sponsored_batch_core::{batch_digest, signed_message_digest, Call};
use sponsored_batch_encoder::{
    abi::encode_execute_with_signature, batch_file::load_batch, recover_batch_signer, BatchSigner,
};
use tracing_subscriber::EnvFilter;

/// Sign and inspect sponsored batches for a delegated account.
///
/// Output is JSON on stdout so it can be piped into whatever submits the transaction.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the batch digest and the signed-message digest for `(nonce, batch)`.
    Digest(BatchArgs),

    /// Sign `(nonce, batch)` as the principal and print the signature and `execute` calldata.
    Sign {
        #[command(flatten)]
        batch: BatchArgs,
        #[command(flatten)]
        key: KeyArgs,
    },

    /// Recover the address that produced `signature` over `(nonce, batch)`.
    Recover {
        #[command(flatten)]
        batch: BatchArgs,

        /// 65-byte signature (hex, r || s || v).
        #[arg(long)]
        signature: String,
    },
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// JSON batch file (array of `{ target, value, data }`).
    #[arg(long)]
    batch: PathBuf,

    /// Principal nonce the batch is bound to (the account's current `nonce()`).
    #[arg(long, default_value = "0")]
    nonce: U256,
}

#[derive(Args, Debug)]
struct KeyArgs {
    /// Path to a file containing the principal private key.
    #[arg(long, env = "PRIV_KEY_PATH", conflicts_with = "private_key")]
    private_key_path: Option<PathBuf>,

    /// Principal private key (hex string, 0x...).
    #[arg(long, env = "PKEY", conflicts_with = "private_key_path")]
    private_key: Option<String>,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = match cli.command {
        Command::Digest(batch) => digest(&batch)?,
        Command::Sign { batch, key } => sign(&batch, &key)?,
        Command::Recover { batch, signature } => recover(&batch, &signature)?,
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("failed serialising output")?
    );
    Ok(())
}

fn read_batch(args: &BatchArgs) -> Result<Vec<Call>> {
    let calls = load_batch(&args.batch)
        .with_context(|| format!("failed loading batch {}", args.batch.display()))?;
    tracing::info!(calls = calls.len(), nonce = %args.nonce, "loaded batch");
    Ok(calls)
}

fn digest(args: &BatchArgs) -> Result<serde_json::Value> {
    let calls = read_batch(args)?;
    let inner = batch_digest(args.nonce, &calls);
    Ok(json!({
        "nonce": args.nonce,
        "batch_digest": inner,
        "signing_digest": signed_message_digest(inner),
    }))
}

fn sign(args: &BatchArgs, key: &KeyArgs) -> Result<serde_json::Value> {
    let calls = read_batch(args)?;
    let signer = load_signer(key)?;
    let signature = signer
        .sign_batch(args.nonce, &calls)
        .context("failed signing batch")?;
    let signature = signature.to_bytes();

    Ok(json!({
        "principal": signer.address(),
        "nonce": args.nonce,
        "signing_digest": sponsored_batch_core::signing_digest(args.nonce, &calls),
        "signature": hex::encode_prefixed(signature),
        "calldata": hex::encode_prefixed(encode_execute_with_signature(&calls, &signature)),
    }))
}

fn recover(args: &BatchArgs, signature: &str) -> Result<serde_json::Value> {
    let calls = read_batch(args)?;
    let signature = hex::decode(signature.trim()).context("signature is not valid hex")?;
    let signer = recover_batch_signer(args.nonce, &calls, &signature)
        .context("could not recover signer")?;
    Ok(json!({
        "nonce": args.nonce,
        "signer": signer,
    }))
}

fn load_signer(key: &KeyArgs) -> Result<BatchSigner> {
    let secret = if let Some(ref path) = key.private_key_path {
        fs::read_to_string(path)
            .with_context(|| format!("failed reading key file {}", path.display()))?
    } else if let Some(ref pk) = key.private_key {
        pk.clone()
    } else {
        return Err(anyhow!(
            "missing principal key: provide --private-key-path or --private-key (or set PRIV_KEY_PATH/PKEY)"
        ));
    };
    BatchSigner::from_hex(&secret).context("invalid principal key")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sponsored_batch_core::SignatureError;

    #[test]
    fn recover_keeps_signature_error_as_source() {
        let path = std::env::temp_dir().join(format!("sponsored-batch-{}.json", std::process::id()));
        fs::write(&path, "[]").unwrap();
        let args = BatchArgs {
            batch: path.clone(),
            nonce: U256::ZERO,
        };

        let err = recover(&args, "0x00").unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.to_string(), "could not recover signer");
        assert_eq!(
            err.downcast_ref::<SignatureError>(),
            Some(&SignatureError::InvalidLength(1))
        );
    }
}
