//! Folder permission ROPs: RopModifyPermissions (0x40) and
//! RopGetPermissionsTable (0x3E).

use oxcrops_buffers::{Reader, Writer};

use crate::codec::{check_count, read_rop_id, wire_count, RopDecode, RopEncode};
use crate::property::TaggedPropertyValue;
use crate::{RopError, RopId};

/// `ModifyFlags` bits of RopModifyPermissions.
pub mod modify_flags {
    /// Replace every existing row with the rows in the request.
    pub const REPLACE_ROWS: u8 = 0x01;
    /// Include the free/busy permission bits.
    pub const INCLUDE_FREE_BUSY: u8 = 0x02;
}

/// `PermissionDataFlags` values: what to do with one permissions row.
pub mod permission_data_flags {
    pub const ADD_ROW: u8 = 0x01;
    pub const MODIFY_ROW: u8 = 0x02;
    pub const REMOVE_ROW: u8 = 0x04;
}

/// One row change inside RopModifyPermissions.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
pub struct PermissionData {
    pub permission_data_flags: u8,
    pub property_value_count: u16,
    pub property_values: Vec<TaggedPropertyValue>,
}

impl PermissionData {
    pub fn new(
        permission_data_flags: u8,
        property_values: Vec<TaggedPropertyValue>,
    ) -> Result<Self, RopError> {
        Ok(Self {
            permission_data_flags,
            property_value_count: wire_count("PropertyValueCount", property_values.len())?,
            property_values,
        })
    }
}

impl RopEncode for PermissionData {
    fn size(&self) -> usize {
        1 + 2 + self.property_values.iter().map(RopEncode::size).sum::<usize>()
    }

    fn write(&self, writer: &mut Writer) -> Result<(), RopError> {
        check_count(
            "PropertyValueCount",
            self.property_value_count as usize,
            self.property_values.len(),
        )?;
        writer.u8(self.permission_data_flags);
        writer.u16(self.property_value_count);
        for value in &self.property_values {
            value.write(writer)?;
        }
        Ok(())
    }
}

impl RopDecode for PermissionData {
    fn read(reader: &mut Reader<'_>) -> Result<Self, RopError> {
        let permission_data_flags = reader.u8()?;
        let property_value_count = reader.u16()?;
        let property_values = (0..property_value_count)
            .map(|_| TaggedPropertyValue::read(reader))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            permission_data_flags,
            property_value_count,
            property_values,
        })
    }
}

/// RopModifyPermissions request.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RopModifyPermissionsRequest {
    pub rop_id: u8,
    pub logon_id: u8,
    pub input_handle_index: u8,
    pub modify_flags: u8,
    pub modify_count: u16,
    pub permissions_data: Vec<PermissionData>,
}

impl Default for RopModifyPermissionsRequest {
    fn default() -> Self {
        Self {
            rop_id: RopId::ModifyPermissions as u8,
            logon_id: 0,
            input_handle_index: 0,
            modify_flags: 0,
            modify_count: 0,
            permissions_data: Vec::new(),
        }
    }
}

impl RopModifyPermissionsRequest {
    pub fn new(
        logon_id: u8,
        input_handle_index: u8,
        modify_flags: u8,
        permissions_data: Vec<PermissionData>,
    ) -> Result<Self, RopError> {
        Ok(Self {
            logon_id,
            input_handle_index,
            modify_flags,
            modify_count: wire_count("ModifyCount", permissions_data.len())?,
            permissions_data,
            ..Default::default()
        })
    }
}

impl RopEncode for RopModifyPermissionsRequest {
    fn size(&self) -> usize {
        1 + 1 + 1 + 1 + 2 + self.permissions_data.iter().map(RopEncode::size).sum::<usize>()
    }

    fn write(&self, writer: &mut Writer) -> Result<(), RopError> {
        check_count(
            "ModifyCount",
            self.modify_count as usize,
            self.permissions_data.len(),
        )?;
        writer.u8(self.rop_id);
        writer.u8(self.logon_id);
        writer.u8(self.input_handle_index);
        writer.u8(self.modify_flags);
        writer.u16(self.modify_count);
        for row in &self.permissions_data {
            row.write(writer)?;
        }
        Ok(())
    }
}

impl RopDecode for RopModifyPermissionsRequest {
    fn read(reader: &mut Reader<'_>) -> Result<Self, RopError> {
        let rop_id = read_rop_id(reader, RopId::ModifyPermissions)?;
        let logon_id = reader.u8()?;
        let input_handle_index = reader.u8()?;
        let modify_flags = reader.u8()?;
        let modify_count = reader.u16()?;
        let permissions_data = (0..modify_count)
            .map(|_| PermissionData::read(reader))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            rop_id,
            logon_id,
            input_handle_index,
            modify_flags,
            modify_count,
            permissions_data,
        })
    }
}

/// RopModifyPermissions response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct RopModifyPermissionsResponse {
    pub rop_id: u8,
    pub input_handle_index: u8,
    pub return_value: u32,
}

impl Default for RopModifyPermissionsResponse {
    fn default() -> Self {
        Self {
            rop_id: RopId::ModifyPermissions as u8,
            input_handle_index: 0,
            return_value: 0,
        }
    }
}

impl RopEncode for RopModifyPermissionsResponse {
    fn size(&self) -> usize {
        6
    }

    fn write(&self, writer: &mut Writer) -> Result<(), RopError> {
        writer.u8(self.rop_id);
        writer.u8(self.input_handle_index);
        writer.u32(self.return_value);
        Ok(())
    }
}

impl RopDecode for RopModifyPermissionsResponse {
    fn read(reader: &mut Reader<'_>) -> Result<Self, RopError> {
        Ok(Self {
            rop_id: read_rop_id(reader, RopId::ModifyPermissions)?,
            input_handle_index: reader.u8()?,
            return_value: reader.u32()?,
        })
    }
}

/// RopGetPermissionsTable request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct RopGetPermissionsTableRequest {
    pub rop_id: u8,
    pub logon_id: u8,
    pub input_handle_index: u8,
    pub output_handle_index: u8,
    /// `IncludeFreeBusy` (0x02) is the only defined bit.
    pub table_flags: u8,
}

impl Default for RopGetPermissionsTableRequest {
    fn default() -> Self {
        Self {
            rop_id: RopId::GetPermissionsTable as u8,
            logon_id: 0,
            input_handle_index: 0,
            output_handle_index: 1,
            table_flags: 0,
        }
    }
}

impl RopEncode for RopGetPermissionsTableRequest {
    fn size(&self) -> usize {
        5
    }

    fn write(&self, writer: &mut Writer) -> Result<(), RopError> {
        writer.u8(self.rop_id);
        writer.u8(self.logon_id);
        writer.u8(self.input_handle_index);
        writer.u8(self.output_handle_index);
        writer.u8(self.table_flags);
        Ok(())
    }
}

impl RopDecode for RopGetPermissionsTableRequest {
    fn read(reader: &mut Reader<'_>) -> Result<Self, RopError> {
        Ok(Self {
            rop_id: read_rop_id(reader, RopId::GetPermissionsTable)?,
            logon_id: reader.u8()?,
            input_handle_index: reader.u8()?,
            output_handle_index: reader.u8()?,
            table_flags: reader.u8()?,
        })
    }
}

/// RopGetPermissionsTable response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct RopGetPermissionsTableResponse {
    pub rop_id: u8,
    pub output_handle_index: u8,
    pub return_value: u32,
}

impl Default for RopGetPermissionsTableResponse {
    fn default() -> Self {
        Self {
            rop_id: RopId::GetPermissionsTable as u8,
            output_handle_index: 0,
            return_value: 0,
        }
    }
}

impl RopEncode for RopGetPermissionsTableResponse {
    fn size(&self) -> usize {
        6
    }

    fn write(&self, writer: &mut Writer) -> Result<(), RopError> {
        writer.u8(self.rop_id);
        writer.u8(self.output_handle_index);
        writer.u32(self.return_value);
        Ok(())
    }
}

impl RopDecode for RopGetPermissionsTableResponse {
    fn read(reader: &mut Reader<'_>) -> Result<Self, RopError> {
        Ok(Self {
            rop_id: read_rop_id(reader, RopId::GetPermissionsTable)?,
            output_handle_index: reader.u8()?,
            return_value: reader.u32()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{PropertyTag, PropertyType, PropertyValue};

    const PID_TAG_MEMBER_ID: u16 = 0x6671;
    const PID_TAG_MEMBER_RIGHTS: u16 = 0x6673;
    const PID_TAG_ENTRY_ID: u16 = 0x0FFF;

    fn add_row() -> PermissionData {
        PermissionData::new(
            permission_data_flags::ADD_ROW,
            vec![
                TaggedPropertyValue::new(PID_TAG_ENTRY_ID, PropertyValue::Binary(vec![0xAB; 4])),
                TaggedPropertyValue::new(PID_TAG_MEMBER_RIGHTS, PropertyValue::Integer32(0x0000_0403)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_request_layout() {
        let request = RopModifyPermissionsRequest::new(0, 1, modify_flags::INCLUDE_FREE_BUSY, vec![add_row()])
            .unwrap();
        let bytes = request.serialize().unwrap();
        let mut expected = vec![0x40, 0x00, 0x01, 0x02, 0x01, 0x00];
        expected.extend([0x01, 0x02, 0x00]);
        expected.extend([0x02, 0x01, 0xFF, 0x0F, 0x04, 0x00, 0xAB, 0xAB, 0xAB, 0xAB]);
        expected.extend([0x03, 0x00, 0x73, 0x66, 0x03, 0x04, 0x00, 0x00]);
        assert_eq!(bytes, expected);
        assert_eq!(request.size(), expected.len());

        let (decoded, consumed) = RopModifyPermissionsRequest::deserialize(&bytes, 0).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(decoded, request);
    }

    #[test]
    fn test_rows_of_differing_length() {
        let remove = PermissionData::new(
            permission_data_flags::REMOVE_ROW,
            vec![TaggedPropertyValue::new(PID_TAG_MEMBER_ID, PropertyValue::Integer64(-1))],
        )
        .unwrap();
        let request = RopModifyPermissionsRequest::new(0, 0, 0, vec![add_row(), remove.clone()]).unwrap();
        let bytes = request.serialize().unwrap();
        let (decoded, _) = RopModifyPermissionsRequest::deserialize(&bytes, 0).unwrap();
        assert_eq!(decoded.permissions_data[1], remove);
        assert_eq!(decoded.modify_count, 2);
    }

    #[test]
    fn test_row_count_mismatch() {
        let mut row = add_row();
        row.property_value_count = 3;
        let request = RopModifyPermissionsRequest::new(0, 0, 0, vec![row]).unwrap();
        assert!(matches!(request.serialize(), Err(RopError::InvalidState(_))));

        let request = RopModifyPermissionsRequest {
            modify_count: 1,
            ..Default::default()
        };
        assert!(matches!(request.serialize(), Err(RopError::InvalidState(_))));
    }

    #[test]
    fn test_tag_type_mismatch() {
        let row = PermissionData::new(
            permission_data_flags::MODIFY_ROW,
            vec![TaggedPropertyValue {
                property_tag: PropertyTag::new(PID_TAG_MEMBER_RIGHTS, PropertyType::Integer32),
                property_value: PropertyValue::Integer64(1),
            }],
        )
        .unwrap();
        assert!(matches!(row.serialize(), Err(RopError::InvalidState(_))));
    }

    #[test]
    fn test_responses() {
        let bytes = [0x40, 0x01, 0x05, 0x01, 0x04, 0x80];
        let (response, consumed) = RopModifyPermissionsResponse::deserialize(&bytes, 0).unwrap();
        assert_eq!(consumed, 6);
        assert_eq!(response.return_value, 0x8004_0105);
        assert_eq!(response.serialize().unwrap(), bytes);

        let request = RopGetPermissionsTableRequest {
            table_flags: modify_flags::INCLUDE_FREE_BUSY,
            ..Default::default()
        };
        assert_eq!(request.serialize().unwrap(), [0x3E, 0x00, 0x00, 0x01, 0x02]);

        let (table, _) = RopGetPermissionsTableResponse::deserialize(&[0x3E, 0x01, 0, 0, 0, 0], 0).unwrap();
        assert_eq!(table.output_handle_index, 1);
        assert!(RopGetPermissionsTableResponse::deserialize(&[0x40, 0x01, 0, 0, 0, 0], 0).is_err());
    }
}
