//! RopBufferTooSmall (0xFF): the response did not fit the output buffer.

use oxcrops_buffers::{Reader, Writer};

use crate::codec::{read_rop_id, RopDecode, RopEncode};
use crate::{RopError, RopId};

/// RopBufferTooSmall response.
///
/// `request_buffers` echoes the ROP requests that were not processed and
/// runs to the end of the containing buffer, so this is always the last
/// record of a response stream.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RopBufferTooSmallResponse {
    pub rop_id: u8,
    /// Output buffer size the server needs, in bytes.
    pub size_needed: u16,
    pub request_buffers: Vec<u8>,
}

impl Default for RopBufferTooSmallResponse {
    fn default() -> Self {
        Self {
            rop_id: RopId::BufferTooSmall as u8,
            size_needed: 0,
            request_buffers: Vec::new(),
        }
    }
}

impl RopEncode for RopBufferTooSmallResponse {
    fn size(&self) -> usize {
        1 + 2 + self.request_buffers.len()
    }

    fn write(&self, writer: &mut Writer) -> Result<(), RopError> {
        writer.u8(self.rop_id);
        writer.u16(self.size_needed);
        writer.buf(&self.request_buffers);
        Ok(())
    }
}

impl RopDecode for RopBufferTooSmallResponse {
    fn read(reader: &mut Reader<'_>) -> Result<Self, RopError> {
        let rop_id = read_rop_id(reader, RopId::BufferTooSmall)?;
        let size_needed = reader.u16()?;
        let request_buffers = reader.rest()?.to_vec();
        tracing::warn!(
            size_needed,
            unprocessed = request_buffers.len(),
            "server output buffer too small"
        );
        Ok(Self {
            rop_id,
            size_needed,
            request_buffers,
        })
    }
}
