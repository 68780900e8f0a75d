//! RopBackoff (0xF9): the server asks the client to delay operations.

use oxcrops_buffers::{Reader, Writer};

use crate::codec::{check_count, read_rop_id, wire_count, RopDecode, RopEncode};
use crate::{RopError, RopId};

/// Backoff duration for a single ROP identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct BackoffRop {
    /// The ROP the delay applies to.
    pub rop_id_backoff: u8,
    /// Delay in milliseconds.
    pub duration: u32,
}

impl BackoffRop {
    pub const SIZE: usize = 5;
}

impl RopEncode for BackoffRop {
    fn size(&self) -> usize {
        Self::SIZE
    }

    fn write(&self, writer: &mut Writer) -> Result<(), RopError> {
        writer.u8(self.rop_id_backoff);
        writer.u32(self.duration);
        Ok(())
    }
}

impl RopDecode for BackoffRop {
    fn read(reader: &mut Reader<'_>) -> Result<Self, RopError> {
        Ok(Self {
            rop_id_backoff: reader.u8()?,
            duration: reader.u32()?,
        })
    }
}

/// RopBackoff response.
///
/// `duration` applies to every ROP on the logon; `backoff_rop_data` lists
/// per-ROP overrides. Acting on the delay is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RopBackoffResponse {
    pub rop_id: u8,
    pub logon_id: u8,
    pub duration: u32,
    pub backoff_rop_count: u8,
    pub backoff_rop_data: Vec<BackoffRop>,
    pub additional_data_size: u16,
    pub additional_data: Vec<u8>,
}

impl Default for RopBackoffResponse {
    fn default() -> Self {
        Self {
            rop_id: RopId::Backoff as u8,
            logon_id: 0,
            duration: 0,
            backoff_rop_count: 0,
            backoff_rop_data: Vec::new(),
            additional_data_size: 0,
            additional_data: Vec::new(),
        }
    }
}

impl RopBackoffResponse {
    /// Builds a response with the count fields derived from the arrays.
    pub fn new(
        logon_id: u8,
        duration: u32,
        backoff_rop_data: Vec<BackoffRop>,
        additional_data: Vec<u8>,
    ) -> Result<Self, RopError> {
        Ok(Self {
            rop_id: RopId::Backoff as u8,
            logon_id,
            duration,
            backoff_rop_count: wire_count("BackoffRopCount", backoff_rop_data.len())?,
            backoff_rop_data,
            additional_data_size: wire_count("AdditionalDataSize", additional_data.len())?,
            additional_data,
        })
    }
}

impl RopEncode for RopBackoffResponse {
    fn size(&self) -> usize {
        1 + 1 + 4 + 1 + BackoffRop::SIZE * self.backoff_rop_data.len() + 2 + self.additional_data.len()
    }

    fn write(&self, writer: &mut Writer) -> Result<(), RopError> {
        check_count(
            "BackoffRopCount",
            self.backoff_rop_count as usize,
            self.backoff_rop_data.len(),
        )?;
        check_count(
            "AdditionalDataSize",
            self.additional_data_size as usize,
            self.additional_data.len(),
        )?;
        writer.u8(self.rop_id);
        writer.u8(self.logon_id);
        writer.u32(self.duration);
        writer.u8(self.backoff_rop_count);
        for entry in &self.backoff_rop_data {
            entry.write(writer)?;
        }
        writer.u16(self.additional_data_size);
        writer.buf(&self.additional_data);
        Ok(())
    }
}

impl RopDecode for RopBackoffResponse {
    fn read(reader: &mut Reader<'_>) -> Result<Self, RopError> {
        let rop_id = read_rop_id(reader, RopId::Backoff)?;
        let logon_id = reader.u8()?;
        let duration = reader.u32()?;
        let backoff_rop_count = reader.u8()?;
        let backoff_rop_data = (0..backoff_rop_count)
            .map(|_| BackoffRop::read(reader))
            .collect::<Result<Vec<_>, _>>()?;
        let additional_data_size = reader.u16()?;
        let additional_data = reader.buf(additional_data_size as usize)?.to_vec();
        Ok(Self {
            rop_id,
            logon_id,
            duration,
            backoff_rop_count,
            backoff_rop_data,
            additional_data_size,
            additional_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIRE: [u8; 19] = [
        0xF9, 0x00, 0xE8, 0x03, 0x00, 0x00, 0x02, 0x10, 0x10, 0x00, 0x00, 0x00, 0x20, 0x64,
        0x00, 0x00, 0x00, 0x00, 0x00,
    ];

    #[test]
    fn test_decode_known_bytes() {
        let (rop, consumed) = RopBackoffResponse::deserialize(&WIRE, 0).unwrap();
        assert_eq!(consumed, WIRE.len());
        assert_eq!(rop.duration, 1000);
        assert_eq!(
            rop.backoff_rop_data,
            [
                BackoffRop {
                    rop_id_backoff: 0x10,
                    duration: 16
                },
                BackoffRop {
                    rop_id_backoff: 0x20,
                    duration: 100
                },
            ]
        );
        assert_eq!(rop.serialize().unwrap(), WIRE);
    }

    #[test]
    fn test_zero_count_emits_no_array_bytes() {
        let rop = RopBackoffResponse::new(1, 50, Vec::new(), Vec::new()).unwrap();
        let bytes = rop.serialize().unwrap();
        assert_eq!(bytes, [0xF9, 0x01, 0x32, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
        let (decoded, _) = RopBackoffResponse::deserialize(&bytes, 0).unwrap();
        assert!(decoded.backoff_rop_data.is_empty());
    }

    #[test]
    fn test_count_mismatch_on_encode() {
        let rop = RopBackoffResponse {
            backoff_rop_count: 1,
            ..Default::default()
        };
        assert!(matches!(rop.serialize(), Err(RopError::InvalidState(_))));
        let rop = RopBackoffResponse {
            additional_data: vec![1, 2],
            ..Default::default()
        };
        assert!(matches!(rop.serialize(), Err(RopError::InvalidState(_))));
    }

    #[test]
    fn test_truncated_entries() {
        assert!(matches!(
            RopBackoffResponse::deserialize(&WIRE[..10], 0),
            Err(RopError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_wrong_rop_id() {
        let mut bytes = WIRE;
        bytes[0] = 0xFF;
        assert!(matches!(
            RopBackoffResponse::deserialize(&bytes, 0),
            Err(RopError::ParseError(_))
        ));
    }
}
