//! Opcode dispatch over a stream of back-to-back ROP responses.

use std::collections::HashMap;

use oxcrops_buffers::{print_octets_default, Reader};

use crate::codec::RopDecode;
use crate::response::RopResponse;
use crate::rops::{
    RopBackoffResponse, RopBufferTooSmallResponse, RopGetPermissionsTableResponse,
    RopLogonResponse, RopModifyPermissionsResponse,
};
use crate::{CodecConfig, RopError, RopId};

/// Decodes one record starting at `start`, returning it with the number of
/// bytes consumed.
///
/// Decoders are plain functions: each call builds a fresh record and no
/// state is kept between calls.
pub type RopDecoder = fn(buffer: &[u8], start: usize) -> Result<(RopResponse, usize), RopError>;

/// Adapts any [`RopDecode`] type that converts into [`RopResponse`].
///
/// ```
/// use oxcrops_rop::dispatch::{decode_as, RopDispatchTable};
/// use oxcrops_rop::RawRopResponse;
///
/// let mut table = RopDispatchTable::new();
/// table.register(0x7C, decode_as::<RawRopResponse>);
/// assert_eq!(table.decode_all(&[0x7C, 0x01]).unwrap().len(), 1);
/// ```
pub fn decode_as<T>(buffer: &[u8], start: usize) -> Result<(RopResponse, usize), RopError>
where
    T: RopDecode + Into<RopResponse>,
{
    let (rop, consumed) = T::deserialize(buffer, start)?;
    Ok((rop.into(), consumed))
}

/// Result of [`RopDispatchTable::decode_partial`].
#[derive(Debug, Clone, PartialEq)]
pub struct PartialDecode {
    /// Records decoded before the failure, in stream order.
    pub records: Vec<RopResponse>,
    /// Bytes covered by `records`.
    pub consumed: usize,
    pub error: Option<RopError>,
}

impl PartialDecode {
    pub fn into_result(self) -> Result<Vec<RopResponse>, RopError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.records),
        }
    }
}

/// Maps the leading RopId byte of a record to its decoder.
///
/// Registration needs `&mut self`, so a table is filled in before it is
/// shared; decoding only needs `&self` and can run from several threads
/// over an `Arc<RopDispatchTable>`.
#[derive(Clone, Default)]
pub struct RopDispatchTable {
    decoders: HashMap<u8, RopDecoder>,
    config: CodecConfig,
}

impl std::fmt::Debug for RopDispatchTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut opcodes: Vec<u8> = self.decoders.keys().copied().collect();
        opcodes.sort_unstable();
        f.debug_struct("RopDispatchTable")
            .field("opcodes", &format_args!("{opcodes:02x?}"))
            .field("config", &self.config)
            .finish()
    }
}

impl RopDispatchTable {
    /// Creates an empty table with the default config.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            decoders: HashMap::new(),
            config,
        }
    }

    /// Creates a table with a decoder for every built-in response type.
    pub fn with_default_decoders() -> Self {
        let mut table = Self::new();
        table.register_defaults();
        table
    }

    /// Registers the built-in response decoders, replacing existing entries.
    pub fn register_defaults(&mut self) {
        self.register(RopId::Backoff as u8, decode_as::<RopBackoffResponse>);
        self.register(
            RopId::BufferTooSmall as u8,
            decode_as::<RopBufferTooSmallResponse>,
        );
        self.register(RopId::Logon as u8, decode_as::<RopLogonResponse>);
        self.register(
            RopId::ModifyPermissions as u8,
            decode_as::<RopModifyPermissionsResponse>,
        );
        self.register(
            RopId::GetPermissionsTable as u8,
            decode_as::<RopGetPermissionsTableResponse>,
        );
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: CodecConfig) {
        self.config = config;
    }

    /// Associates `opcode` with `decoder`. A second registration for the
    /// same opcode replaces the first.
    pub fn register(&mut self, opcode: u8, decoder: RopDecoder) {
        let replaced = self.decoders.insert(opcode, decoder).is_some();
        tracing::trace!(opcode = %format!("{opcode:#04x}"), replaced, "registered ROP decoder");
    }

    pub fn is_registered(&self, opcode: u8) -> bool {
        self.decoders.contains_key(&opcode)
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Decodes the record at `offset`.
    fn decode_at(&self, buffer: &[u8], offset: usize) -> Result<(RopResponse, usize), RopError> {
        let opcode = Reader::at(buffer, offset).peek()?;
        let decoder = self
            .decoders
            .get(&opcode)
            .ok_or(RopError::UnknownOpcode { opcode, offset })?;
        let (rop, consumed) = decoder(buffer, offset)?;
        if consumed == 0 || consumed > buffer.len() - offset {
            return Err(RopError::ParseError(format!(
                "decoder for {opcode:#04x} reported {consumed} byte(s) consumed at offset {offset}"
            )));
        }
        tracing::debug!(
            opcode = %format!("{opcode:#04x}"),
            offset,
            consumed,
            "decoded {}",
            print_octets_default(&buffer[offset..offset + consumed])
        );
        Ok((rop, consumed))
    }

    /// Decodes the first record of `buffer`.
    ///
    /// Trailing bytes are ignored unless the config sets
    /// `reject_trailing_bytes`.
    pub fn decode_one(&self, buffer: &[u8]) -> Result<RopResponse, RopError> {
        let (rop, consumed) = self.decode_at(buffer, 0)?;
        if self.config.reject_trailing_bytes && consumed < buffer.len() {
            return Err(RopError::ParseError(format!(
                "{} trailing byte(s) after {} byte record",
                buffer.len() - consumed,
                consumed
            )));
        }
        Ok(rop)
    }

    /// Decodes records back to back until the buffer is exhausted.
    ///
    /// Any failure discards the whole stream; use
    /// [`decode_partial`](Self::decode_partial) to keep the records decoded
    /// before it.
    pub fn decode_all(&self, buffer: &[u8]) -> Result<Vec<RopResponse>, RopError> {
        self.decode_partial(buffer).into_result()
    }

    /// Like [`decode_all`](Self::decode_all), but returns the records
    /// decoded before a failure together with the error.
    pub fn decode_partial(&self, buffer: &[u8]) -> PartialDecode {
        let mut records = Vec::new();
        let mut offset = 0;
        while offset < buffer.len() {
            match self.decode_at(buffer, offset) {
                Ok((rop, consumed)) => {
                    records.push(rop);
                    offset += consumed;
                }
                Err(err) => {
                    tracing::debug!(offset, error = %err, "ROP stream decode stopped");
                    return PartialDecode {
                        records,
                        consumed: offset,
                        error: Some(err),
                    };
                }
            }
        }
        PartialDecode {
            records,
            consumed: offset,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::RopEncode;
    use crate::response::RawRopResponse;

    fn modify_response(index: u8) -> Vec<u8> {
        vec![0x40, index, 0, 0, 0, 0]
    }

    #[test]
    fn test_empty_buffer() {
        let table = RopDispatchTable::with_default_decoders();
        assert!(table.decode_all(&[]).unwrap().is_empty());
        assert!(matches!(table.decode_one(&[]), Err(RopError::OutOfBounds { .. })));
    }

    #[test]
    fn test_unknown_opcode_reports_offset() {
        let table = RopDispatchTable::with_default_decoders();
        let mut bytes = modify_response(1);
        bytes.push(0x7C);
        assert_eq!(
            table.decode_all(&bytes),
            Err(RopError::UnknownOpcode {
                opcode: 0x7C,
                offset: 6
            })
        );
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_partial_keeps_prefix() {
        let table = RopDispatchTable::with_default_decoders();
        let mut bytes = modify_response(1);
        bytes.extend(modify_response(2));
        bytes.extend([0x40, 0x03]);
        let partial = table.decode_partial(&bytes);
        assert_eq!(partial.records.len(), 2);
        assert_eq!(partial.consumed, 12);
        assert!(matches!(partial.error, Some(RopError::OutOfBounds { .. })));
    }

    #[test]
    fn test_register_replaces() {
        let mut table = RopDispatchTable::with_default_decoders();
        table.register(0x40, decode_as::<RawRopResponse>);
        assert_eq!(table.len(), 5);
        let rop = table.decode_one(&modify_response(1)).unwrap();
        assert!(matches!(rop, RopResponse::Raw(_)));
    }

    #[test]
    fn test_trailing_bytes() {
        let mut table = RopDispatchTable::with_default_decoders();
        let mut bytes = modify_response(1);
        bytes.push(0xAA);
        assert!(table.decode_one(&bytes).is_ok());
        table.set_config(CodecConfig {
            reject_trailing_bytes: true,
            ..Default::default()
        });
        assert!(matches!(table.decode_one(&bytes), Err(RopError::ParseError(_))));
        assert!(table.decode_one(&modify_response(1)).is_ok());
    }

    #[test]
    fn test_zero_length_decoder_rejected() {
        fn empty(_: &[u8], _: usize) -> Result<(RopResponse, usize), RopError> {
            Ok((RopModifyPermissionsResponse::default().into(), 0))
        }
        let mut table = RopDispatchTable::new();
        table.register(0x40, empty);
        assert!(matches!(table.decode_all(&[0x40]), Err(RopError::ParseError(_))));
    }

    #[test]
    fn test_shared_across_threads() {
        let table = std::sync::Arc::new(RopDispatchTable::with_default_decoders());
        let bytes = RopModifyPermissionsResponse::default().serialize().unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let table = table.clone();
                let bytes = bytes.clone();
                std::thread::spawn(move || table.decode_all(&bytes).unwrap().len())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
    }
}
