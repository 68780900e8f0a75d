//! Support code for the `rop-decode` binary.
//!
//! Kept in the library so the hex parsing and rendering paths are covered
//! by unit tests; `main` only wires up stdin, stdout and logging.

use thiserror::Error;

use crate::rpc_header::parse_response_buffer;
use crate::{CodecConfig, RopDispatchTable, RopError, RopResponse};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid hex digit {digit:?} at position {position}")]
    InvalidHex { digit: char, position: usize },
    #[error("odd number of hex digits")]
    OddLength,
    #[error(transparent)]
    Rop(#[from] RopError),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Options parsed from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Input carries RPC_HEADER_EXT framing.
    pub framed: bool,
    /// Print records as JSON instead of `Debug`.
    pub json: bool,
}

impl DecodeOptions {
    /// Reads `--framed` and `--json`; other arguments are ignored.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        for arg in args {
            match arg.as_ref() {
                "--framed" => options.framed = true,
                "--json" => options.json = true,
                _ => {}
            }
        }
        options
    }
}

/// Parses hex text, ignoring whitespace.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, CliError> {
    let mut bytes = Vec::with_capacity(text.len() / 2);
    let mut high: Option<u8> = None;
    for (position, digit) in text.chars().enumerate() {
        if digit.is_whitespace() {
            continue;
        }
        let nibble = digit
            .to_digit(16)
            .ok_or(CliError::InvalidHex { digit, position })? as u8;
        match high.take() {
            Some(h) => bytes.push((h << 4) | nibble),
            None => high = Some(nibble),
        }
    }
    if high.is_some() {
        return Err(CliError::OddLength);
    }
    Ok(bytes)
}

/// Decodes hex text into records and renders one per line.
pub fn decode_hex(
    text: &str,
    options: DecodeOptions,
    config: &CodecConfig,
) -> Result<String, CliError> {
    let bytes = parse_hex(text)?;
    let mut table = RopDispatchTable::with_config(config.clone());
    table.register_defaults();

    let mut records: Vec<RopResponse> = Vec::new();
    if options.framed {
        for segment in parse_response_buffer(&bytes, config)? {
            records.extend(table.decode_all(&segment.rop_buffer)?);
        }
    } else {
        records = table.decode_all(&bytes)?;
    }

    let mut out = String::new();
    for record in &records {
        if options.json {
            out.push_str(&serde_json::to_string(record)?);
        } else {
            out.push_str(&format!("{record:?}"));
        }
        out.push('\n');
    }
    Ok(out)
}
