//! RPC_HEADER_EXT framing of `rgbIn`/`rgbOut` buffers.
//!
//! A request buffer is one header followed by a payload of
//! `RopSize (u16) | ROP requests | server object handle table`. A response
//! buffer is one or more such segments; the last carries the `LAST` flag.

use oxcrops_buffers::{Reader, Writer};
use serde::Serialize;

use crate::codec::{wire_count, RopEncode};
use crate::{CodecConfig, RopError};

/// Value XORed into every obfuscated payload byte.
pub const XOR_MASK: u8 = 0xA5;

/// `Flags` bits of [`RpcHeaderExt`].
pub mod header_flags {
    /// The payload is LZ77 compressed.
    pub const COMPRESSED: u16 = 0x0001;
    /// The payload is XOR obfuscated with [`XOR_MASK`](super::XOR_MASK).
    pub const XOR_MAGIC: u16 = 0x0002;
    /// No further header follows in this buffer.
    pub const LAST: u16 = 0x0004;
}

/// The 8-byte header in front of each payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RpcHeaderExt {
    pub version: u16,
    pub flags: u16,
    /// Payload length as transmitted.
    pub size: u16,
    /// Payload length before compression.
    pub size_actual: u16,
}

impl RpcHeaderExt {
    pub const SIZE: usize = 8;

    pub fn has_flag(&self, flag: u16) -> bool {
        self.flags & flag != 0
    }

    fn write(&self, writer: &mut Writer) {
        writer.u16(self.version);
        writer.u16(self.flags);
        writer.u16(self.size);
        writer.u16(self.size_actual);
    }

    fn read(reader: &mut Reader<'_>) -> Result<Self, RopError> {
        Ok(Self {
            version: reader.u16()?,
            flags: reader.u16()?,
            size: reader.u16()?,
            size_actual: reader.u16()?,
        })
    }
}

/// One header's worth of a parsed response buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseSegment {
    /// The header as received; flags still show `XOR_MAGIC` if it was set.
    pub header: RpcHeaderExt,
    /// ROP response bytes, ready for the dispatch table.
    pub rop_buffer: Vec<u8>,
    /// Server object handle table.
    pub handles: Vec<u32>,
}

/// Builds an `rgbIn` buffer: one header, then the ROPs and handle table.
///
/// The payload is obfuscated when `config.xor_rpc_request` is set.
pub fn build_request_buffer(
    rops: &[&dyn RopEncode],
    handles: &[u32],
    config: &CodecConfig,
) -> Result<Vec<u8>, RopError> {
    let rop_size: u16 = wire_count("RopSize", 2 + rops.iter().map(|r| r.size()).sum::<usize>())?;
    let size: u16 = wire_count("RPC_HEADER_EXT Size", rop_size as usize + 4 * handles.len())?;

    let mut writer = Writer::with_capacity(RpcHeaderExt::SIZE + size as usize);
    RpcHeaderExt {
        version: 0,
        flags: header_flags::LAST,
        size,
        size_actual: size,
    }
    .write(&mut writer);
    writer.u16(rop_size);
    for rop in rops {
        rop.write(&mut writer)?;
    }
    for handle in handles {
        writer.u32(*handle);
    }
    let buffer = writer.flush();
    debug_assert_eq!(buffer.len(), RpcHeaderExt::SIZE + size as usize);

    tracing::debug!(
        rops = rops.len(),
        handles = handles.len(),
        size,
        xor = config.xor_rpc_request,
        "built request buffer"
    );
    if config.xor_rpc_request {
        return xor_obfuscate(&buffer);
    }
    Ok(buffer)
}

/// Splits an `rgbOut` buffer into its segments.
pub fn parse_response_buffer(
    bytes: &[u8],
    config: &CodecConfig,
) -> Result<Vec<ResponseSegment>, RopError> {
    if bytes.len() > config.max_response_size as usize {
        return Err(RopError::ParseError(format!(
            "response buffer of {} bytes exceeds the {} byte limit",
            bytes.len(),
            config.max_response_size
        )));
    }

    let mut segments = Vec::new();
    let mut reader = Reader::new(bytes);
    loop {
        let start = reader.x;
        let header = RpcHeaderExt::read(&mut reader)?;
        let raw = reader.buf(header.size as usize)?;
        if header.has_flag(header_flags::COMPRESSED) {
            return Err(RopError::Unsupported("compressed RPC_HEADER_EXT payload"));
        }
        let payload: Vec<u8> = if header.has_flag(header_flags::XOR_MAGIC) {
            raw.iter().map(|b| b ^ XOR_MASK).collect()
        } else {
            raw.to_vec()
        };

        let mut body = Reader::new(&payload);
        let rop_size = body.u16()? as usize;
        if rop_size < 2 || rop_size > payload.len() {
            return Err(RopError::ParseError(format!(
                "RopSize {rop_size} invalid for a {} byte payload at offset {start}",
                payload.len()
            )));
        }
        let rop_buffer = body.buf(rop_size - 2)?.to_vec();
        if body.size() % 4 != 0 {
            return Err(RopError::ParseError(format!(
                "{} byte handle table at offset {start} is not a whole number of handles",
                body.size()
            )));
        }
        let handles = (0..body.size() / 4)
            .map(|_| body.u32())
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            offset = start,
            flags = %format!("{:#06x}", header.flags),
            rop_bytes = rop_buffer.len(),
            handles = handles.len(),
            "parsed response segment"
        );
        let last = header.has_flag(header_flags::LAST);
        segments.push(ResponseSegment {
            header,
            rop_buffer,
            handles,
        });
        if last {
            break;
        }
    }
    Ok(segments)
}

/// Toggles `XOR_MAGIC` on the leading header and XORs its payload with
/// [`XOR_MASK`].
///
/// Returns the header and payload only; bytes past `8 + size` are dropped.
/// Applying it twice restores the input.
pub fn xor_obfuscate(buffer: &[u8]) -> Result<Vec<u8>, RopError> {
    let mut reader = Reader::new(buffer);
    let mut header = RpcHeaderExt::read(&mut reader)?;
    let payload = reader.buf(header.size as usize)?;
    header.flags ^= header_flags::XOR_MAGIC;

    let mut writer = Writer::with_capacity(RpcHeaderExt::SIZE + payload.len());
    header.write(&mut writer);
    for b in payload {
        writer.u8(b ^ XOR_MASK);
    }
    Ok(writer.flush())
}
