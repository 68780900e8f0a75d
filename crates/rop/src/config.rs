//! Codec settings.

use std::path::Path;

use serde::Deserialize;

use crate::RopError;

/// Default `pcbOut`: the largest response buffer the client accepts.
pub const DEFAULT_MAX_RESPONSE_SIZE: u32 = 0x10008;

/// Settings shared by request building, response parsing and dispatch.
///
/// # Example
///
/// ```
/// use oxcrops_rop::CodecConfig;
///
/// let config = CodecConfig::from_toml_str("xor_rpc_request = true").unwrap();
/// assert!(config.xor_rpc_request);
/// assert_eq!(config.max_response_size, 0x10008);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Obfuscate request payloads with XOR 0xA5.
    pub xor_rpc_request: bool,
    pub max_response_size: u32,
    /// Fail single-record decodes that leave bytes behind.
    pub reject_trailing_bytes: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            xor_rpc_request: false,
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
            reject_trailing_bytes: false,
        }
    }
}

impl CodecConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, RopError> {
        toml::from_str(text).map_err(|e| RopError::Config(e.to_string()))
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RopError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| RopError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), ?config, "loaded codec config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(CodecConfig::from_toml_str("").unwrap(), CodecConfig::default());
    }

    #[test]
    fn test_all_fields() {
        let config = CodecConfig::from_toml_str(
            "xor_rpc_request = true\nmax_response_size = 4096\nreject_trailing_bytes = true\n",
        )
        .unwrap();
        assert_eq!(
            config,
            CodecConfig {
                xor_rpc_request: true,
                max_response_size: 4096,
                reject_trailing_bytes: true,
            }
        );
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            CodecConfig::from_toml_str("compress = true"),
            Err(RopError::Config(_))
        ));
        assert!(matches!(
            CodecConfig::from_toml_str("max_response_size = \"big\""),
            Err(RopError::Config(_))
        ));
        assert!(matches!(
            CodecConfig::load("/nonexistent/rop.toml"),
            Err(RopError::Config(_))
        ));
    }
}
