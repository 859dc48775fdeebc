//! Primitive codec for on-chain layouts
//!
//! Little-endian fixed-width integers, u32 length-prefixed UTF-8 strings,
//! single-byte bools and option tags, and 32-byte public keys. Every read
//! is bounds-checked before slicing and advances the cursor only on success.

use crate::error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
use crate::is_printable_ascii;
use crate::pubkey::Pubkey;

/// Constraints applied to a length-prefixed string on both read and write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLimit {
    /// Field name reported in errors
    pub field: &'static str,
    /// Maximum encoded length in bytes
    pub max: usize,
    /// Whether an empty string is acceptable
    pub allow_empty: bool,
    /// Whether every byte must be printable ASCII (0x20..=0x7E)
    pub printable: bool,
}

impl StringLimit {
    pub const fn new(field: &'static str, max: usize) -> Self {
        Self {
            field,
            max,
            allow_empty: false,
            printable: false,
        }
    }

    pub const fn printable(mut self) -> Self {
        self.printable = true;
        self
    }

    pub const fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    fn check_decoded(&self, value: &str) -> DecodeResult<()> {
        if value.is_empty() && !self.allow_empty {
            return Err(DecodeError::EmptyString { field: self.field });
        }
        if self.printable && !is_printable_ascii(value.as_bytes()) {
            return Err(DecodeError::NonPrintable { field: self.field });
        }
        Ok(())
    }

    /// Validate a string before it is written
    pub fn check_encoded(&self, value: &str) -> EncodeResult<()> {
        if value.is_empty() && !self.allow_empty {
            return Err(EncodeError::EmptyString { field: self.field });
        }
        if value.len() > self.max {
            return Err(EncodeError::StringTooLong {
                field: self.field,
                len: value.len(),
                max: self.max,
            });
        }
        if self.printable && !is_printable_ascii(value.as_bytes()) {
            return Err(EncodeError::NonPrintable { field: self.field });
        }
        Ok(())
    }
}

/// Cursor over an immutable byte buffer
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current cursor position
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes left after the cursor
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Read `len` raw bytes
    pub fn read_bytes(&mut self, len: usize) -> DecodeResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(DecodeError::Truncated {
                offset: self.offset,
                needed: len,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> DecodeResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> DecodeResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> DecodeResult<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a bool byte, rejecting anything but 0 or 1
    pub fn read_bool(&mut self) -> DecodeResult<bool> {
        let offset = self.offset;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(DecodeError::InvalidBool { offset, value }),
        }
    }

    /// Read a 32-byte public key
    pub fn read_pubkey(&mut self) -> DecodeResult<Pubkey> {
        Ok(Pubkey::new(self.read_array()?))
    }

    /// Read a u32 length-prefixed UTF-8 string
    ///
    /// The declared length is checked against `limit.max` and the remaining
    /// buffer before any bytes are sliced. On failure the cursor is left
    /// where it was.
    pub fn read_string(&mut self, limit: StringLimit) -> DecodeResult<String> {
        let start = self.offset;
        let result = self.read_string_inner(limit);
        if result.is_err() {
            self.offset = start;
        }
        result
    }

    fn read_string_inner(&mut self, limit: StringLimit) -> DecodeResult<String> {
        let len = self.read_u32()? as usize;
        if len > limit.max {
            return Err(DecodeError::StringTooLong {
                field: limit.field,
                len,
                max: limit.max,
            });
        }
        let bytes = self.read_bytes(len)?;
        let value = std::str::from_utf8(bytes)
            .map_err(|_| DecodeError::InvalidUtf8 { field: limit.field })?
            .to_string();
        limit.check_decoded(&value)?;
        Ok(value)
    }

    /// Read an optional value preceded by a 0/1 presence byte
    pub fn read_option<T, F>(&mut self, read: F) -> DecodeResult<Option<T>>
    where
        F: FnOnce(&mut Self) -> DecodeResult<T>,
    {
        let offset = self.offset;
        match self.read_u8()? {
            0 => Ok(None),
            1 => read(self).map(Some),
            value => Err(DecodeError::InvalidOptionTag { offset, value }),
        }
    }

    /// Read a u32 length-prefixed vector with at most `max` elements
    pub fn read_vec<T, F>(&mut self, field: &'static str, max: usize, mut read: F) -> DecodeResult<Vec<T>>
    where
        F: FnMut(&mut Self) -> DecodeResult<T>,
    {
        let len = self.read_u32()? as usize;
        if len > max {
            return Err(DecodeError::FieldOutOfRange {
                field,
                value: len as u64,
            });
        }
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(read(self)?);
        }
        Ok(items)
    }

    /// Fail unless the whole buffer was consumed
    pub fn finish(&self) -> DecodeResult<()> {
        match self.remaining() {
            0 => Ok(()),
            count => Err(DecodeError::TrailingBytes { count }),
        }
    }

    /// Fail unless everything left is zero padding
    pub fn finish_padding(&self) -> DecodeResult<()> {
        let rest = &self.data[self.offset..];
        if rest.iter().all(|byte| *byte == 0) {
            return Ok(());
        }
        Err(DecodeError::TrailingBytes { count: rest.len() })
    }
}

/// Growable output buffer mirroring [`Reader`]
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn write_u16(&mut self, value: u16) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u64(&mut self, value: u64) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        self.write_u8(value as u8)
    }

    pub fn write_pubkey(&mut self, key: &Pubkey) -> &mut Self {
        self.write_bytes(key.as_bytes())
    }

    /// Write a u32 length-prefixed string after checking it against `limit`
    pub fn write_string(&mut self, value: &str, limit: StringLimit) -> EncodeResult<&mut Self> {
        limit.check_encoded(value)?;
        // length fits in u32: bounded by limit.max
        self.write_u32(value.len() as u32);
        Ok(self.write_bytes(value.as_bytes()))
    }

    /// Write a presence byte followed by the value when present
    pub fn write_option<T, F>(&mut self, value: Option<&T>, write: F) -> &mut Self
    where
        F: FnOnce(&mut Self, &T),
    {
        match value {
            Some(inner) => {
                self.write_u8(1);
                write(self, inner);
            }
            None => {
                self.write_u8(0);
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: StringLimit = StringLimit::new("name", 10).printable();

    #[test]
    fn test_integers_are_little_endian() {
        let mut writer = Writer::new();
        writer.write_u8(0xAB).write_u16(500).write_u64(1_000_000_000);
        let bytes = writer.into_bytes();
        assert_eq!(&bytes[..3], &[0xAB, 0xF4, 0x01]);
        assert_eq!(&bytes[3..], &1_000_000_000u64.to_le_bytes());

        let mut reader = Reader::new(&bytes);
        assert_eq!(reader.read_u8().unwrap(), 0xAB);
        assert_eq!(reader.read_u16().unwrap(), 500);
        assert_eq!(reader.read_u64().unwrap(), 1_000_000_000);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn test_u64_keeps_full_precision() {
        let value = u64::MAX - 1;
        let bytes = value.to_le_bytes();
        assert_eq!(Reader::new(&bytes).read_u64().unwrap(), value);
    }

    #[test]
    fn test_read_past_end_is_truncation() {
        let bytes = [1u8, 2, 3];
        let mut reader = Reader::new(&bytes);
        assert_eq!(reader.read_u16().unwrap(), 0x0201);
        let err = reader.read_u16().unwrap_err();
        assert_eq!(
            err,
            DecodeError::Truncated {
                offset: 2,
                needed: 2,
                remaining: 1
            }
        );
        // cursor untouched by the failed read
        assert_eq!(reader.offset(), 2);
    }

    #[test]
    fn test_string_prefix_checked_before_slicing() {
        let mut bytes = 4_000_000_000u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"abc");
        let err = Reader::new(&bytes).read_string(NAME).unwrap_err();
        assert!(matches!(err, DecodeError::StringTooLong { len: 4_000_000_000, .. }));

        // declared length within limit but beyond the buffer
        let mut bytes = 8u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"abc");
        let err = Reader::new(&bytes).read_string(NAME).unwrap_err();
        assert!(err.is_truncation());
    }

    #[test]
    fn test_string_validation() {
        let mut writer = Writer::new();
        writer.write_u32(0);
        let err = Reader::new(&writer.into_bytes()).read_string(NAME).unwrap_err();
        assert_eq!(err, DecodeError::EmptyString { field: "name" });

        let mut writer = Writer::new();
        writer.write_u32(3).write_bytes(&[b'a', 0x07, b'b']);
        let err = Reader::new(&writer.into_bytes()).read_string(NAME).unwrap_err();
        assert_eq!(err, DecodeError::NonPrintable { field: "name" });

        let mut writer = Writer::new();
        writer.write_u32(2).write_bytes(&[0xC3, 0x28]);
        let limit = StringLimit::new("uri", 10);
        let err = Reader::new(&writer.into_bytes()).read_string(limit).unwrap_err();
        assert_eq!(err, DecodeError::InvalidUtf8 { field: "uri" });
    }

    #[test]
    fn test_failed_string_read_restores_cursor() {
        let mut writer = Writer::new();
        writer.write_u32(0);
        let bytes = writer.into_bytes();
        let mut reader = Reader::new(&bytes);
        assert!(reader.read_string(NAME).is_err());
        assert_eq!(reader.offset(), 0);
    }

    #[test]
    fn test_write_string_rejects_bad_input() {
        let mut writer = Writer::new();
        assert_eq!(
            writer.write_string("", NAME).unwrap_err(),
            EncodeError::EmptyString { field: "name" }
        );
        assert_eq!(
            writer.write_string("abcdefghijk", NAME).unwrap_err(),
            EncodeError::StringTooLong {
                field: "name",
                len: 11,
                max: 10
            }
        );
        assert!(writer.is_empty());

        writer.write_string("Heroes", NAME).unwrap();
        assert_eq!(writer.into_bytes(), b"\x06\x00\x00\x00Heroes".to_vec());
    }

    #[test]
    fn test_option_presence_byte() {
        let mut writer = Writer::new();
        writer
            .write_option(Some(&7u8), |w, v| {
                w.write_u8(*v);
            })
            .write_option(None::<&u8>, |w, v| {
                w.write_u8(*v);
            });
        let bytes = writer.into_bytes();
        assert_eq!(bytes, vec![1, 7, 0]);

        let mut reader = Reader::new(&bytes);
        assert_eq!(reader.read_option(|r| r.read_u8()).unwrap(), Some(7));
        assert_eq!(reader.read_option(|r| r.read_u8()).unwrap(), None);
        assert!(reader.is_empty());

        let err = Reader::new(&[2]).read_option(|r| r.read_u8()).unwrap_err();
        assert_eq!(err, DecodeError::InvalidOptionTag { offset: 0, value: 2 });
    }

    #[test]
    fn test_bool_rejects_other_values() {
        let mut reader = Reader::new(&[1, 0, 5]);
        assert!(reader.read_bool().unwrap());
        assert!(!reader.read_bool().unwrap());
        assert_eq!(
            reader.read_bool().unwrap_err(),
            DecodeError::InvalidBool { offset: 2, value: 5 }
        );
    }

    #[test]
    fn test_finish_padding_allows_only_zeros() {
        let mut reader = Reader::new(&[7, 0, 0, 0]);
        reader.read_u8().unwrap();
        assert!(reader.finish_padding().is_ok());
        assert_eq!(reader.finish(), Err(DecodeError::TrailingBytes { count: 3 }));

        let mut reader = Reader::new(&[7, 0, 9]);
        reader.read_u8().unwrap();
        assert_eq!(
            reader.finish_padding(),
            Err(DecodeError::TrailingBytes { count: 2 })
        );
    }

    #[test]
    fn test_vec_length_bounded() {
        let mut writer = Writer::new();
        writer.write_u32(100);
        let err = Reader::new(&writer.into_bytes())
            .read_vec("creators", 5, |r| r.read_u8())
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::FieldOutOfRange {
                field: "creators",
                value: 100
            }
        );
    }
}
