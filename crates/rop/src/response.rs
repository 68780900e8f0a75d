//! Decoded response records.

use oxcrops_buffers::{Reader, Writer};

use crate::codec::{RopDecode, RopEncode};
use crate::rops::{
    RopBackoffResponse, RopBufferTooSmallResponse, RopGetPermissionsTableResponse,
    RopLogonResponse, RopModifyPermissionsResponse,
};
use crate::{RopError, RopId};

/// Response bytes for an opcode without a typed structure.
///
/// Produced by decoders registered for opcodes the crate does not model.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RawRopResponse {
    pub rop_id: u8,
    /// Everything after the RopId byte.
    pub data: Vec<u8>,
}

impl RopEncode for RawRopResponse {
    fn size(&self) -> usize {
        1 + self.data.len()
    }

    fn write(&self, writer: &mut Writer) -> Result<(), RopError> {
        writer.u8(self.rop_id);
        writer.buf(&self.data);
        Ok(())
    }
}

impl RopDecode for RawRopResponse {
    /// Takes the rest of the buffer.
    fn read(reader: &mut Reader<'_>) -> Result<Self, RopError> {
        Ok(Self {
            rop_id: reader.u8()?,
            data: reader.rest()?.to_vec(),
        })
    }
}

/// One record of a decoded response stream.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum RopResponse {
    Backoff(RopBackoffResponse),
    BufferTooSmall(RopBufferTooSmallResponse),
    Logon(RopLogonResponse),
    ModifyPermissions(RopModifyPermissionsResponse),
    GetPermissionsTable(RopGetPermissionsTableResponse),
    Raw(RawRopResponse),
}

impl RopResponse {
    /// The RopId byte the record carries.
    pub fn rop_id(&self) -> u8 {
        match self {
            RopResponse::Backoff(r) => r.rop_id,
            RopResponse::BufferTooSmall(r) => r.rop_id,
            RopResponse::Logon(r) => r.rop_id,
            RopResponse::ModifyPermissions(r) => r.rop_id,
            RopResponse::GetPermissionsTable(r) => r.rop_id,
            RopResponse::Raw(r) => r.rop_id,
        }
    }

    /// Protocol name of the record's operation, if the RopId is known.
    pub fn name(&self) -> Option<&'static str> {
        RopId::try_from(self.rop_id()).ok().map(RopId::name)
    }

    fn as_encode(&self) -> &dyn RopEncode {
        match self {
            RopResponse::Backoff(r) => r,
            RopResponse::BufferTooSmall(r) => r,
            RopResponse::Logon(r) => r,
            RopResponse::ModifyPermissions(r) => r,
            RopResponse::GetPermissionsTable(r) => r,
            RopResponse::Raw(r) => r,
        }
    }
}

impl RopEncode for RopResponse {
    fn size(&self) -> usize {
        self.as_encode().size()
    }

    fn write(&self, writer: &mut Writer) -> Result<(), RopError> {
        self.as_encode().write(writer)
    }
}

macro_rules! impl_from_response {
    ($($variant:ident($ty:ty),)*) => {
        $(
            impl From<$ty> for RopResponse {
                fn from(rop: $ty) -> Self {
                    RopResponse::$variant(rop)
                }
            }
        )*
    };
}

impl_from_response! {
    Backoff(RopBackoffResponse),
    BufferTooSmall(RopBufferTooSmallResponse),
    Logon(RopLogonResponse),
    ModifyPermissions(RopModifyPermissionsResponse),
    GetPermissionsTable(RopGetPermissionsTableResponse),
    Raw(RawRopResponse),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delegates_to_record() {
        let rop: RopResponse = RopModifyPermissionsResponse::default().into();
        assert_eq!(rop.rop_id(), 0x40);
        assert_eq!(rop.name(), Some("RopModifyPermissions"));
        assert_eq!(rop.size(), 6);
        assert_eq!(rop.serialize().unwrap(), [0x40, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_raw() {
        let (raw, consumed) = RawRopResponse::deserialize(&[0x7C, 1, 2], 0).unwrap();
        assert_eq!(consumed, 3);
        let rop = RopResponse::from(raw);
        assert_eq!(rop.name(), None);
        assert_eq!(rop.serialize().unwrap(), [0x7C, 1, 2]);
    }
}
