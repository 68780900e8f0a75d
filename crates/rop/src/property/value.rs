use oxcrops_buffers::{Reader, Writer};

use super::{PropertyTag, PropertyType};
use crate::codec::{wire_count, RopDecode, RopEncode};
use crate::RopError;

/// A property value in its wire representation.
///
/// Variants map one-to-one onto [`PropertyType`]. `String8` holds the raw
/// 8-bit bytes without their terminator; `Time` is a FILETIME.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum PropertyValue {
    Integer16(i16),
    Integer32(i32),
    Floating32(f32),
    Floating64(f64),
    Currency(i64),
    FloatingTime(f64),
    ErrorCode(u32),
    Boolean(bool),
    Integer64(i64),
    String8(Vec<u8>),
    String(String),
    Time(u64),
    Guid([u8; 16]),
    ServerId(Vec<u8>),
    Binary(Vec<u8>),
    MultipleInteger16(Vec<i16>),
    MultipleInteger32(Vec<i32>),
    MultipleInteger64(Vec<i64>),
    MultipleString8(Vec<Vec<u8>>),
    MultipleString(Vec<String>),
    MultipleGuid(Vec<[u8; 16]>),
    MultipleBinary(Vec<Vec<u8>>),
}

fn utf16_len(s: &str) -> usize {
    (s.encode_utf16().count() + 1) * 2
}

fn check_ascii_z(bytes: &[u8]) -> Result<(), RopError> {
    if bytes.contains(&0) {
        return Err(RopError::InvalidState(
            "String8 value contains an embedded null".into(),
        ));
    }
    Ok(())
}

fn check_utf16_z(s: &str) -> Result<(), RopError> {
    if s.contains('\0') {
        return Err(RopError::InvalidState(
            "String value contains an embedded null".into(),
        ));
    }
    Ok(())
}

fn write_counted_bytes(writer: &mut Writer, field: &str, bytes: &[u8]) -> Result<(), RopError> {
    writer.u16(wire_count::<u16>(field, bytes.len())?);
    writer.buf(bytes);
    Ok(())
}

fn read_counted_bytes(reader: &mut Reader<'_>) -> Result<Vec<u8>, RopError> {
    let count = reader.u16()? as usize;
    Ok(reader.buf(count)?.to_vec())
}

/// Reads a `u32` element count followed by that many elements.
fn read_multiple<T>(
    reader: &mut Reader<'_>,
    mut element: impl FnMut(&mut Reader<'_>) -> Result<T, RopError>,
) -> Result<Vec<T>, RopError> {
    let count = reader.u32()? as usize;
    // Each element takes at least one byte, so this caps the allocation.
    let mut values = Vec::with_capacity(count.min(reader.size()));
    for _ in 0..count {
        values.push(element(reader)?);
    }
    Ok(values)
}

impl PropertyValue {
    pub fn property_type(&self) -> PropertyType {
        match self {
            PropertyValue::Integer16(_) => PropertyType::Integer16,
            PropertyValue::Integer32(_) => PropertyType::Integer32,
            PropertyValue::Floating32(_) => PropertyType::Floating32,
            PropertyValue::Floating64(_) => PropertyType::Floating64,
            PropertyValue::Currency(_) => PropertyType::Currency,
            PropertyValue::FloatingTime(_) => PropertyType::FloatingTime,
            PropertyValue::ErrorCode(_) => PropertyType::ErrorCode,
            PropertyValue::Boolean(_) => PropertyType::Boolean,
            PropertyValue::Integer64(_) => PropertyType::Integer64,
            PropertyValue::String8(_) => PropertyType::String8,
            PropertyValue::String(_) => PropertyType::String,
            PropertyValue::Time(_) => PropertyType::Time,
            PropertyValue::Guid(_) => PropertyType::Guid,
            PropertyValue::ServerId(_) => PropertyType::ServerId,
            PropertyValue::Binary(_) => PropertyType::Binary,
            PropertyValue::MultipleInteger16(_) => PropertyType::MultipleInteger16,
            PropertyValue::MultipleInteger32(_) => PropertyType::MultipleInteger32,
            PropertyValue::MultipleInteger64(_) => PropertyType::MultipleInteger64,
            PropertyValue::MultipleString8(_) => PropertyType::MultipleString8,
            PropertyValue::MultipleString(_) => PropertyType::MultipleString,
            PropertyValue::MultipleGuid(_) => PropertyType::MultipleGuid,
            PropertyValue::MultipleBinary(_) => PropertyType::MultipleBinary,
        }
    }

    /// Encoded length in bytes.
    pub fn size(&self) -> usize {
        match self {
            PropertyValue::Boolean(_) => 1,
            PropertyValue::Integer16(_) => 2,
            PropertyValue::Integer32(_)
            | PropertyValue::Floating32(_)
            | PropertyValue::ErrorCode(_) => 4,
            PropertyValue::Floating64(_)
            | PropertyValue::Currency(_)
            | PropertyValue::FloatingTime(_)
            | PropertyValue::Integer64(_)
            | PropertyValue::Time(_) => 8,
            PropertyValue::Guid(_) => 16,
            PropertyValue::String8(bytes) => bytes.len() + 1,
            PropertyValue::String(s) => utf16_len(s),
            PropertyValue::ServerId(bytes) | PropertyValue::Binary(bytes) => 2 + bytes.len(),
            PropertyValue::MultipleInteger16(v) => 4 + 2 * v.len(),
            PropertyValue::MultipleInteger32(v) => 4 + 4 * v.len(),
            PropertyValue::MultipleInteger64(v) => 4 + 8 * v.len(),
            PropertyValue::MultipleGuid(v) => 4 + 16 * v.len(),
            PropertyValue::MultipleString8(v) => 4 + v.iter().map(|b| b.len() + 1).sum::<usize>(),
            PropertyValue::MultipleString(v) => 4 + v.iter().map(|s| utf16_len(s)).sum::<usize>(),
            PropertyValue::MultipleBinary(v) => 4 + v.iter().map(|b| 2 + b.len()).sum::<usize>(),
        }
    }

    /// Appends the value, without its tag.
    pub fn write(&self, writer: &mut Writer) -> Result<(), RopError> {
        match self {
            PropertyValue::Integer16(v) => writer.i16(*v),
            PropertyValue::Integer32(v) => writer.i32(*v),
            PropertyValue::Floating32(v) => writer.f32(*v),
            PropertyValue::Floating64(v) | PropertyValue::FloatingTime(v) => writer.f64(*v),
            PropertyValue::Currency(v) | PropertyValue::Integer64(v) => writer.i64(*v),
            PropertyValue::ErrorCode(v) => writer.u32(*v),
            PropertyValue::Boolean(v) => writer.u8(u8::from(*v)),
            PropertyValue::Time(v) => writer.u64(*v),
            PropertyValue::Guid(g) => writer.buf(g),
            PropertyValue::String8(bytes) => {
                check_ascii_z(bytes)?;
                writer.ascii_z(bytes);
            }
            PropertyValue::String(s) => {
                check_utf16_z(s)?;
                writer.utf16_z(s);
            }
            PropertyValue::ServerId(bytes) => write_counted_bytes(writer, "ServerId size", bytes)?,
            PropertyValue::Binary(bytes) => write_counted_bytes(writer, "Binary size", bytes)?,
            PropertyValue::MultipleInteger16(v) => {
                writer.u32(wire_count("MultipleInteger16 count", v.len())?);
                v.iter().for_each(|x| writer.i16(*x));
            }
            PropertyValue::MultipleInteger32(v) => {
                writer.u32(wire_count("MultipleInteger32 count", v.len())?);
                v.iter().for_each(|x| writer.i32(*x));
            }
            PropertyValue::MultipleInteger64(v) => {
                writer.u32(wire_count("MultipleInteger64 count", v.len())?);
                v.iter().for_each(|x| writer.i64(*x));
            }
            PropertyValue::MultipleGuid(v) => {
                writer.u32(wire_count("MultipleGuid count", v.len())?);
                v.iter().for_each(|g| writer.buf(g));
            }
            PropertyValue::MultipleString8(v) => {
                writer.u32(wire_count("MultipleString8 count", v.len())?);
                for bytes in v {
                    check_ascii_z(bytes)?;
                    writer.ascii_z(bytes);
                }
            }
            PropertyValue::MultipleString(v) => {
                writer.u32(wire_count("MultipleString count", v.len())?);
                for s in v {
                    check_utf16_z(s)?;
                    writer.utf16_z(s);
                }
            }
            PropertyValue::MultipleBinary(v) => {
                writer.u32(wire_count("MultipleBinary count", v.len())?);
                for bytes in v {
                    write_counted_bytes(writer, "MultipleBinary element size", bytes)?;
                }
            }
        }
        Ok(())
    }

    /// Reads a value whose layout is given by `property_type`.
    pub fn read(reader: &mut Reader<'_>, property_type: PropertyType) -> Result<Self, RopError> {
        Ok(match property_type {
            PropertyType::Integer16 => PropertyValue::Integer16(reader.i16()?),
            PropertyType::Integer32 => PropertyValue::Integer32(reader.i32()?),
            PropertyType::Floating32 => PropertyValue::Floating32(reader.f32()?),
            PropertyType::Floating64 => PropertyValue::Floating64(reader.f64()?),
            PropertyType::Currency => PropertyValue::Currency(reader.i64()?),
            PropertyType::FloatingTime => PropertyValue::FloatingTime(reader.f64()?),
            PropertyType::ErrorCode => PropertyValue::ErrorCode(reader.u32()?),
            PropertyType::Boolean => PropertyValue::Boolean(reader.u8()? != 0),
            PropertyType::Integer64 => PropertyValue::Integer64(reader.i64()?),
            PropertyType::String8 => PropertyValue::String8(reader.ascii_z()?.to_vec()),
            PropertyType::String => PropertyValue::String(reader.utf16_z()?),
            PropertyType::Time => PropertyValue::Time(reader.u64()?),
            PropertyType::Guid => PropertyValue::Guid(reader.array()?),
            PropertyType::ServerId => PropertyValue::ServerId(read_counted_bytes(reader)?),
            PropertyType::Binary => PropertyValue::Binary(read_counted_bytes(reader)?),
            PropertyType::MultipleInteger16 => {
                PropertyValue::MultipleInteger16(read_multiple(reader, |r| Ok(r.i16()?))?)
            }
            PropertyType::MultipleInteger32 => {
                PropertyValue::MultipleInteger32(read_multiple(reader, |r| Ok(r.i32()?))?)
            }
            PropertyType::MultipleInteger64 => {
                PropertyValue::MultipleInteger64(read_multiple(reader, |r| Ok(r.i64()?))?)
            }
            PropertyType::MultipleString8 => PropertyValue::MultipleString8(read_multiple(
                reader,
                |r| Ok(r.ascii_z()?.to_vec()),
            )?),
            PropertyType::MultipleString => {
                PropertyValue::MultipleString(read_multiple(reader, |r| Ok(r.utf16_z()?))?)
            }
            PropertyType::MultipleGuid => {
                PropertyValue::MultipleGuid(read_multiple(reader, |r| Ok(r.array()?))?)
            }
            PropertyType::MultipleBinary => {
                PropertyValue::MultipleBinary(read_multiple(reader, read_counted_bytes)?)
            }
        })
    }
}

/// A property tag followed by a value of the tagged type.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TaggedPropertyValue {
    pub property_tag: PropertyTag,
    pub property_value: PropertyValue,
}

impl TaggedPropertyValue {
    /// Builds a tagged value whose tag type is taken from `value`.
    pub fn new(property_id: u16, value: PropertyValue) -> Self {
        Self {
            property_tag: PropertyTag::new(property_id, value.property_type()),
            property_value: value,
        }
    }
}

impl RopEncode for TaggedPropertyValue {
    fn size(&self) -> usize {
        PropertyTag::SIZE + self.property_value.size()
    }

    fn write(&self, writer: &mut Writer) -> Result<(), RopError> {
        let value_type = self.property_value.property_type();
        if self.property_tag.property_type != value_type {
            return Err(RopError::InvalidState(format!(
                "property tag {:#010x} carries a {value_type:?} value",
                self.property_tag.to_u32()
            )));
        }
        self.property_tag.write(writer)?;
        self.property_value.write(writer)
    }
}

impl RopDecode for TaggedPropertyValue {
    fn read(reader: &mut Reader<'_>) -> Result<Self, RopError> {
        let property_tag = PropertyTag::read(reader)?;
        let property_value = PropertyValue::read(reader, property_tag.property_type)?;
        Ok(Self {
            property_tag,
            property_value,
        })
    }
}
