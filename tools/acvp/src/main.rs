//! ACVP test harness: drives the ML-DSA implementation from hex test
//! vectors.
//!
//! ```text
//! acvp --level 44 keyGen seed=HEX
//! acvp --level 44 sigGen message=HEX rnd=HEX sk=HEX context=HEX
//! acvp --level 44 sigVer message=HEX context=HEX signature=HEX pk=HEX
//! ```
//!
//! `keyGen` prints `pk=HEX` and `sk=HEX`; `sigGen` prints `signature=HEX`;
//! `sigVer` prints `verified=true|false` and exits nonzero on rejection.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pqsign_mldsa::{
    MlDsa, MlDsa44Params, MlDsa65Params, MlDsa87Params, ParameterSet, PublicKey, SecretKey,
    Signature,
};

#[derive(Parser)]
#[command(name = "acvp")]
#[command(about = "ACVP harness for ML-DSA", long_about = None)]
struct Cli {
    /// Parameter set to exercise
    #[arg(long, default_value = "44")]
    level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    #[value(name = "44")]
    MlDsa44,
    #[value(name = "65")]
    MlDsa65,
    #[value(name = "87")]
    MlDsa87,
}

#[derive(Subcommand)]
enum Command {
    /// Deterministic key generation from a 32-byte seed
    #[command(name = "keyGen")]
    KeyGen {
        /// seed=HEX
        args: Vec<String>,
    },
    /// Deterministic signature generation
    #[command(name = "sigGen")]
    SigGen {
        /// message=HEX rnd=HEX sk=HEX [context=HEX]
        args: Vec<String>,
    },
    /// Signature verification
    #[command(name = "sigVer")]
    SigVer {
        /// message=HEX context=HEX signature=HEX pk=HEX
        args: Vec<String>,
    },
}

/// Decodes a `name=HEX` argument.
fn hex_arg(args: &[String], name: &str) -> Result<Vec<u8>> {
    let arg = args
        .iter()
        .find_map(|a| a.strip_prefix(name).and_then(|rest| rest.strip_prefix('=')))
        .ok_or_else(|| anyhow!("missing argument '{name}=HEX'"))?;
    hex::decode(arg).with_context(|| format!("argument '{name}' is not valid hex"))
}

/// Like [`hex_arg`] but tolerates the argument being absent.
fn hex_arg_opt(args: &[String], name: &str) -> Result<Vec<u8>> {
    if args.iter().any(|a| a.starts_with(name)) {
        hex_arg(args, name)
    } else {
        Ok(Vec::new())
    }
}

fn fixed<const W: usize>(bytes: Vec<u8>, name: &str) -> Result<[u8; W]> {
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| anyhow!("argument '{name}' must be {W} bytes, got {len}"))
}

fn key_gen<P: ParameterSet>(args: &[String]) -> Result<()> {
    let seed = fixed::<32>(hex_arg(args, "seed")?, "seed")?;
    let keypair = MlDsa::<P>::keypair_from_seed(&seed);
    println!("pk={}", hex::encode_upper(keypair.public_key().as_bytes()));
    println!("sk={}", hex::encode_upper(keypair.secret_key().as_bytes()));
    Ok(())
}

fn sig_gen<P: ParameterSet>(args: &[String]) -> Result<()> {
    let message = hex_arg(args, "message")?;
    let rnd = fixed::<32>(hex_arg(args, "rnd")?, "rnd")?;
    let sk = SecretKey::<P>::from_bytes(&hex_arg(args, "sk")?)?;
    let context = hex_arg_opt(args, "context")?;

    let sig = MlDsa::<P>::sign_with_randomness(&sk, &message, &context, &rnd)?;
    println!("signature={}", hex::encode_upper(sig.as_bytes()));
    Ok(())
}

fn sig_ver<P: ParameterSet>(args: &[String]) -> Result<()> {
    let message = hex_arg(args, "message")?;
    let context = hex_arg_opt(args, "context")?;
    let sig = Signature::<P>::from_bytes(&hex_arg(args, "signature")?)?;
    let pk = PublicKey::<P>::from_bytes(&hex_arg(args, "pk")?)?;

    match MlDsa::<P>::verify(&pk, &message, &context, &sig) {
        Ok(()) => {
            println!("verified=true");
            Ok(())
        }
        Err(err) => {
            println!("verified=false");
            bail!("signature rejected: {err}")
        }
    }
}

fn run<P: ParameterSet>(command: &Command) -> Result<()> {
    match command {
        Command::KeyGen { args } => key_gen::<P>(args),
        Command::SigGen { args } => sig_gen::<P>(args),
        Command::SigVer { args } => sig_ver::<P>(args),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.level {
        Level::MlDsa44 => run::<MlDsa44Params>(&cli.command),
        Level::MlDsa65 => run::<MlDsa65Params>(&cli.command),
        Level::MlDsa87 => run::<MlDsa87Params>(&cli.command),
    }
}
