use oxcrops_buffers::{Reader, Writer};

use crate::codec::{RopDecode, RopEncode};
use crate::RopError;

macro_rules! property_types {
    ($($name:ident = $value:literal,)*) => {
        /// Wire type of a property value.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
        #[repr(u16)]
        pub enum PropertyType {
            $($name = $value,)*
        }

        impl PropertyType {
            pub const ALL: &'static [PropertyType] = &[$(PropertyType::$name,)*];
        }

        impl TryFrom<u16> for PropertyType {
            type Error = u16;

            fn try_from(value: u16) -> Result<Self, u16> {
                match value {
                    $($value => Ok(PropertyType::$name),)*
                    other => Err(other),
                }
            }
        }
    };
}

property_types! {
    Integer16 = 0x0002,
    Integer32 = 0x0003,
    Floating32 = 0x0004,
    Floating64 = 0x0005,
    Currency = 0x0006,
    FloatingTime = 0x0007,
    ErrorCode = 0x000A,
    Boolean = 0x000B,
    Integer64 = 0x0014,
    String8 = 0x001E,
    String = 0x001F,
    Time = 0x0040,
    Guid = 0x0048,
    ServerId = 0x00FB,
    Binary = 0x0102,
    MultipleInteger16 = 0x1002,
    MultipleInteger32 = 0x1003,
    MultipleInteger64 = 0x1014,
    MultipleString8 = 0x101E,
    MultipleString = 0x101F,
    MultipleGuid = 0x1048,
    MultipleBinary = 0x1102,
}

impl PropertyType {
    /// True for the multi-valued (`0x1000`) forms.
    pub fn is_multi_valued(self) -> bool {
        self as u16 & 0x1000 != 0
    }
}

/// A property tag: the value type plus the property identifier.
///
/// On the wire the type comes first, then the identifier, both as `u16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct PropertyTag {
    pub property_type: PropertyType,
    pub property_id: u16,
}

impl PropertyTag {
    pub const SIZE: usize = 4;

    pub fn new(property_id: u16, property_type: PropertyType) -> Self {
        Self {
            property_type,
            property_id,
        }
    }

    /// The tag as the 32-bit `PidTag` constant, id in the high half.
    pub fn to_u32(self) -> u32 {
        ((self.property_id as u32) << 16) | self.property_type as u32
    }
}

impl RopEncode for PropertyTag {
    fn size(&self) -> usize {
        Self::SIZE
    }

    fn write(&self, writer: &mut Writer) -> Result<(), RopError> {
        writer.u16(self.property_type as u16);
        writer.u16(self.property_id);
        Ok(())
    }
}

impl RopDecode for PropertyTag {
    fn read(reader: &mut Reader<'_>) -> Result<Self, RopError> {
        let offset = reader.x;
        let raw_type = reader.u16()?;
        let property_type = PropertyType::try_from(raw_type).map_err(|raw| {
            RopError::ParseError(format!(
                "unknown property type {raw:#06x} at offset {offset}"
            ))
        })?;
        let property_id = reader.u16()?;
        Ok(Self {
            property_type,
            property_id,
        })
    }
}
