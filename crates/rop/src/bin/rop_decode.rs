//! `rop-decode`: decode hex-encoded ROP responses from stdin.
//!
//! Usage:
//!   rop-decode [--framed] [--json]
//!
//! `--framed` strips RPC_HEADER_EXT headers first. A TOML codec config is
//! read from `$ROP_DECODE_CONFIG` when set. Logging follows `RUST_LOG`.

use std::io::{self, Read, Write};

use oxcrops_rop::cli::{decode_hex, DecodeOptions};
use oxcrops_rop::CodecConfig;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let options = DecodeOptions::from_args(std::env::args().skip(1));
    let config = match std::env::var_os("ROP_DECODE_CONFIG") {
        Some(path) => CodecConfig::load(path)?,
        None => CodecConfig::default(),
    };

    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    let out = decode_hex(&text, options, &config)?;
    io::stdout().write_all(out.as_bytes())?;
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run() {
        eprintln!("rop-decode: {e}");
        std::process::exit(1);
    }
}
