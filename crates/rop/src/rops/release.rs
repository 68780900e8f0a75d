//! RopRelease (0x01). The server sends no response.

use oxcrops_buffers::Writer;

use crate::codec::RopEncode;
use crate::{RopError, RopId};

/// RopRelease request: frees the server object at `input_handle_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct RopReleaseRequest {
    pub rop_id: u8,
    pub logon_id: u8,
    pub input_handle_index: u8,
}

impl RopReleaseRequest {
    pub fn new(logon_id: u8, input_handle_index: u8) -> Self {
        Self {
            rop_id: RopId::Release as u8,
            logon_id,
            input_handle_index,
        }
    }
}

impl Default for RopReleaseRequest {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl RopEncode for RopReleaseRequest {
    fn size(&self) -> usize {
        3
    }

    fn write(&self, writer: &mut Writer) -> Result<(), RopError> {
        writer.u8(self.rop_id);
        writer.u8(self.logon_id);
        writer.u8(self.input_handle_index);
        Ok(())
    }
}
