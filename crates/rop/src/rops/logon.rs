//! RopLogon (0xFE).
//!
//! The response layout depends on the outcome: a successful private mailbox
//! logon, a successful public folder logon, and a wrong-server redirect each
//! carry a different body after the common header.

use oxcrops_buffers::{Reader, Writer};

use crate::codec::{check_count, read_rop_id, wire_count, RopDecode, RopEncode};
use crate::{RopError, RopId};

/// `LogonFlags` bits.
pub mod logon_flags {
    /// The logon is to a private mailbox rather than public folders.
    pub const PRIVATE: u8 = 0x01;
    pub const UNDERCOVER: u8 = 0x02;
    pub const GHOSTED: u8 = 0x04;
}

/// `ReturnValue` of a logon that must be retried on another server.
pub const EC_WRONG_SERVER: u32 = 0x0000_0478;

/// Number of special folder ids in a successful logon response.
pub const FOLDER_ID_COUNT: usize = 13;

/// RopLogon request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RopLogonRequest {
    pub rop_id: u8,
    pub logon_id: u8,
    pub output_handle_index: u8,
    pub logon_flags: u8,
    pub open_flags: u32,
    pub store_state: u32,
    pub essdn_size: u16,
    /// Distinguished name of the mailbox, including its null terminator.
    pub essdn: Vec<u8>,
}

impl Default for RopLogonRequest {
    fn default() -> Self {
        Self {
            rop_id: RopId::Logon as u8,
            logon_id: 0,
            output_handle_index: 0,
            logon_flags: logon_flags::PRIVATE,
            open_flags: 0,
            store_state: 0,
            essdn_size: 0,
            essdn: Vec::new(),
        }
    }
}

impl RopLogonRequest {
    /// Builds a private mailbox logon for `essdn`, appending the terminator.
    pub fn private_mailbox(logon_id: u8, open_flags: u32, essdn: &str) -> Result<Self, RopError> {
        let mut bytes = essdn.as_bytes().to_vec();
        bytes.push(0);
        Ok(Self {
            logon_id,
            open_flags,
            essdn_size: wire_count("EssdnSize", bytes.len())?,
            essdn: bytes,
            ..Default::default()
        })
    }
}

impl RopEncode for RopLogonRequest {
    fn size(&self) -> usize {
        1 + 1 + 1 + 1 + 4 + 4 + 2 + self.essdn.len()
    }

    fn write(&self, writer: &mut Writer) -> Result<(), RopError> {
        check_count("EssdnSize", self.essdn_size as usize, self.essdn.len())?;
        writer.u8(self.rop_id);
        writer.u8(self.logon_id);
        writer.u8(self.output_handle_index);
        writer.u8(self.logon_flags);
        writer.u32(self.open_flags);
        writer.u32(self.store_state);
        writer.u16(self.essdn_size);
        writer.buf(&self.essdn);
        Ok(())
    }
}

impl RopDecode for RopLogonRequest {
    fn read(reader: &mut Reader<'_>) -> Result<Self, RopError> {
        let rop_id = read_rop_id(reader, RopId::Logon)?;
        let logon_id = reader.u8()?;
        let output_handle_index = reader.u8()?;
        let logon_flags = reader.u8()?;
        let open_flags = reader.u32()?;
        let store_state = reader.u32()?;
        let essdn_size = reader.u16()?;
        let essdn = reader.buf(essdn_size as usize)?.to_vec();
        Ok(Self {
            rop_id,
            logon_id,
            output_handle_index,
            logon_flags,
            open_flags,
            store_state,
            essdn_size,
            essdn,
        })
    }
}

/// Server time of the logon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct LogonTime {
    pub seconds: u8,
    pub minutes: u8,
    pub hour: u8,
    pub day_of_week: u8,
    pub day: u8,
    pub month: u8,
    pub year: u16,
}

impl LogonTime {
    pub const SIZE: usize = 8;

    fn write(&self, writer: &mut Writer) {
        writer.u8(self.seconds);
        writer.u8(self.minutes);
        writer.u8(self.hour);
        writer.u8(self.day_of_week);
        writer.u8(self.day);
        writer.u8(self.month);
        writer.u16(self.year);
    }

    fn read(reader: &mut Reader<'_>) -> Result<Self, RopError> {
        Ok(Self {
            seconds: reader.u8()?,
            minutes: reader.u8()?,
            hour: reader.u8()?,
            day_of_week: reader.u8()?,
            day: reader.u8()?,
            month: reader.u8()?,
            year: reader.u16()?,
        })
    }
}

/// Body of a successful private mailbox logon.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct PrivateMailboxLogon {
    pub logon_flags: u8,
    pub folder_ids: [u64; FOLDER_ID_COUNT],
    pub response_flags: u8,
    pub mailbox_guid: [u8; 16],
    pub repl_id: u16,
    pub repl_guid: [u8; 16],
    pub logon_time: LogonTime,
    pub gwart_time: u64,
    pub store_state: u32,
}

impl PrivateMailboxLogon {
    pub const SIZE: usize = 1 + 8 * FOLDER_ID_COUNT + 1 + 16 + 2 + 16 + LogonTime::SIZE + 8 + 4;
}

/// Body of a successful public folder logon.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct PublicFolderLogon {
    pub logon_flags: u8,
    pub folder_ids: [u64; FOLDER_ID_COUNT],
    pub repl_id: u16,
    pub repl_guid: [u8; 16],
    pub per_user_guid: [u8; 16],
}

impl PublicFolderLogon {
    pub const SIZE: usize = 1 + 8 * FOLDER_ID_COUNT + 2 + 16 + 16;
}

/// Body of an [`EC_WRONG_SERVER`] logon response.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct LogonRedirect {
    pub logon_flags: u8,
    pub server_name_size: u8,
    /// Server to retry on, including its null terminator.
    pub server_name: Vec<u8>,
}

/// Outcome-specific part of a logon response.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub enum LogonResponseBody {
    /// Failed logon; only the header is present.
    #[default]
    None,
    Private(Box<PrivateMailboxLogon>),
    PublicFolders(Box<PublicFolderLogon>),
    Redirect(LogonRedirect),
}

/// RopLogon response.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RopLogonResponse {
    pub rop_id: u8,
    pub output_handle_index: u8,
    pub return_value: u32,
    pub body: LogonResponseBody,
}

impl Default for RopLogonResponse {
    fn default() -> Self {
        Self {
            rop_id: RopId::Logon as u8,
            output_handle_index: 0,
            return_value: 0,
            body: LogonResponseBody::None,
        }
    }
}

fn write_folder_ids(writer: &mut Writer, folder_ids: &[u64; FOLDER_ID_COUNT]) {
    for id in folder_ids {
        writer.u64(*id);
    }
}

fn read_folder_ids(reader: &mut Reader<'_>) -> Result<[u64; FOLDER_ID_COUNT], RopError> {
    let mut folder_ids = [0u64; FOLDER_ID_COUNT];
    for id in folder_ids.iter_mut() {
        *id = reader.u64()?;
    }
    Ok(folder_ids)
}

impl RopLogonResponse {
    /// Checks that the body is the one a decoder would select for this
    /// return value.
    fn check_body(&self) -> Result<(), RopError> {
        let consistent = match (&self.body, self.return_value) {
            (LogonResponseBody::Private(body), 0) => body.logon_flags & logon_flags::PRIVATE != 0,
            (LogonResponseBody::PublicFolders(body), 0) => {
                body.logon_flags & logon_flags::PRIVATE == 0
            }
            (LogonResponseBody::Redirect(_), EC_WRONG_SERVER) => true,
            (LogonResponseBody::None, rv) => rv != 0 && rv != EC_WRONG_SERVER,
            _ => false,
        };
        if !consistent {
            return Err(RopError::InvalidState(format!(
                "logon response body does not match return value {:#010x}",
                self.return_value
            )));
        }
        Ok(())
    }
}

impl RopEncode for RopLogonResponse {
    fn size(&self) -> usize {
        6 + match &self.body {
            LogonResponseBody::None => 0,
            LogonResponseBody::Private(_) => PrivateMailboxLogon::SIZE,
            LogonResponseBody::PublicFolders(_) => PublicFolderLogon::SIZE,
            LogonResponseBody::Redirect(r) => 2 + r.server_name.len(),
        }
    }

    fn write(&self, writer: &mut Writer) -> Result<(), RopError> {
        self.check_body()?;
        writer.u8(self.rop_id);
        writer.u8(self.output_handle_index);
        writer.u32(self.return_value);
        match &self.body {
            LogonResponseBody::None => {}
            LogonResponseBody::Private(body) => {
                writer.u8(body.logon_flags);
                write_folder_ids(writer, &body.folder_ids);
                writer.u8(body.response_flags);
                writer.buf(&body.mailbox_guid);
                writer.u16(body.repl_id);
                writer.buf(&body.repl_guid);
                body.logon_time.write(writer);
                writer.u64(body.gwart_time);
                writer.u32(body.store_state);
            }
            LogonResponseBody::PublicFolders(body) => {
                writer.u8(body.logon_flags);
                write_folder_ids(writer, &body.folder_ids);
                writer.u16(body.repl_id);
                writer.buf(&body.repl_guid);
                writer.buf(&body.per_user_guid);
            }
            LogonResponseBody::Redirect(body) => {
                check_count(
                    "ServerNameSize",
                    body.server_name_size as usize,
                    body.server_name.len(),
                )?;
                writer.u8(body.logon_flags);
                writer.u8(body.server_name_size);
                writer.buf(&body.server_name);
            }
        }
        Ok(())
    }
}

impl RopDecode for RopLogonResponse {
    fn read(reader: &mut Reader<'_>) -> Result<Self, RopError> {
        let rop_id = read_rop_id(reader, RopId::Logon)?;
        let output_handle_index = reader.u8()?;
        let return_value = reader.u32()?;
        let body = match return_value {
            0 => {
                let flags = reader.u8()?;
                if flags & logon_flags::PRIVATE != 0 {
                    LogonResponseBody::Private(Box::new(PrivateMailboxLogon {
                        logon_flags: flags,
                        folder_ids: read_folder_ids(reader)?,
                        response_flags: reader.u8()?,
                        mailbox_guid: reader.array()?,
                        repl_id: reader.u16()?,
                        repl_guid: reader.array()?,
                        logon_time: LogonTime::read(reader)?,
                        gwart_time: reader.u64()?,
                        store_state: reader.u32()?,
                    }))
                } else {
                    LogonResponseBody::PublicFolders(Box::new(PublicFolderLogon {
                        logon_flags: flags,
                        folder_ids: read_folder_ids(reader)?,
                        repl_id: reader.u16()?,
                        repl_guid: reader.array()?,
                        per_user_guid: reader.array()?,
                    }))
                }
            }
            EC_WRONG_SERVER => {
                let logon_flags = reader.u8()?;
                let server_name_size = reader.u8()?;
                let server_name = reader.buf(server_name_size as usize)?.to_vec();
                LogonResponseBody::Redirect(LogonRedirect {
                    logon_flags,
                    server_name_size,
                    server_name,
                })
            }
            _ => LogonResponseBody::None,
        };
        Ok(Self {
            rop_id,
            output_handle_index,
            return_value,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn private_response() -> RopLogonResponse {
        let mut folder_ids = [0u64; FOLDER_ID_COUNT];
        for (i, id) in folder_ids.iter_mut().enumerate() {
            *id = 0x0001_0000_0000_0001 + i as u64;
        }
        RopLogonResponse {
            body: LogonResponseBody::Private(Box::new(PrivateMailboxLogon {
                logon_flags: logon_flags::PRIVATE,
                folder_ids,
                response_flags: 0x07,
                mailbox_guid: [0x11; 16],
                repl_id: 1,
                repl_guid: [0x22; 16],
                logon_time: LogonTime {
                    seconds: 30,
                    minutes: 15,
                    hour: 9,
                    day_of_week: 2,
                    day: 14,
                    month: 5,
                    year: 2024,
                },
                gwart_time: 0,
                store_state: 0,
            })),
            ..Default::default()
        }
    }

    #[test]
    fn test_request_layout() {
        let request = RopLogonRequest::private_mailbox(0, 0x0100_0C04, "/o=x").unwrap();
        let bytes = request.serialize().unwrap();
        assert_eq!(
            bytes,
            [
                0xFE, 0x00, 0x00, 0x01, 0x04, 0x0C, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x05,
                0x00, b'/', b'o', b'=', b'x', 0x00
            ]
        );
        assert_eq!(RopLogonRequest::deserialize(&bytes, 0).unwrap().0, request);
    }

    #[test]
    fn test_private_roundtrip() {
        let response = private_response();
        let bytes = response.serialize().unwrap();
        assert_eq!(bytes.len(), 6 + 160);
        let (decoded, consumed) = RopLogonResponse::deserialize(&bytes, 0).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(decoded, response);
    }

    #[test]
    fn test_public_folder_roundtrip() {
        let response = RopLogonResponse {
            body: LogonResponseBody::PublicFolders(Box::default()),
            ..Default::default()
        };
        let bytes = response.serialize().unwrap();
        assert_eq!(bytes.len(), 6 + PublicFolderLogon::SIZE);
        assert_eq!(RopLogonResponse::deserialize(&bytes, 0).unwrap().0, response);
    }

    #[test]
    fn test_redirect_and_failure() {
        let bytes = [0xFE, 0x00, 0x78, 0x04, 0x00, 0x00, 0x01, 0x03, b'a', b'b', 0x00];
        let (response, consumed) = RopLogonResponse::deserialize(&bytes, 0).unwrap();
        assert_eq!(consumed, bytes.len());
        match &response.body {
            LogonResponseBody::Redirect(r) => assert_eq!(r.server_name, b"ab\0"),
            other => panic!("unexpected body {other:?}"),
        }
        assert_eq!(response.serialize().unwrap(), bytes);

        let failed = [0xFE, 0x00, 0x0F, 0x01, 0x04, 0x80, 0xEE];
        let (response, consumed) = RopLogonResponse::deserialize(&failed, 0).unwrap();
        assert_eq!(consumed, 6);
        assert_eq!(response.body, LogonResponseBody::None);
    }

    #[test]
    fn test_inconsistent_body() {
        let mut response = private_response();
        response.return_value = 0x8004_010F;
        assert!(matches!(response.serialize(), Err(RopError::InvalidState(_))));
        let failed_without_code = RopLogonResponse::default();
        assert!(failed_without_code.serialize().is_err());
    }
}
