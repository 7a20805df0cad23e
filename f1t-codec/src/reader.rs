//! Bounds-checked little-endian payload reader
//!
//! All multi-byte fields on the wire are little-endian with no implicit
//! padding. Every read checks the remaining length and reports the offset
//! of the failure, so a malformed or truncated region aborts its decoder
//! without reading past the buffer.

use f1t_core::DecodeError;

pub struct PayloadReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> PayloadReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::FieldDecode { offset: self.pos });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        self.take(n).map(|_| ())
    }

    pub fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    pub fn i8(&mut self) -> Result<i8, DecodeError> {
        Ok(self.take(1)?[0] as i8)
    }

    pub fn u16(&mut self) -> Result<u16, DecodeError> {
        let offset = self.pos;
        let bytes = self.take(2)?;
        bytes
            .try_into()
            .map(u16::from_le_bytes)
            .map_err(|_| DecodeError::FieldDecode { offset })
    }

    pub fn u32(&mut self) -> Result<u32, DecodeError> {
        let offset = self.pos;
        let bytes = self.take(4)?;
        bytes
            .try_into()
            .map(u32::from_le_bytes)
            .map_err(|_| DecodeError::FieldDecode { offset })
    }

    pub fn u64(&mut self) -> Result<u64, DecodeError> {
        let offset = self.pos;
        let bytes = self.take(8)?;
        bytes
            .try_into()
            .map(u64::from_le_bytes)
            .map_err(|_| DecodeError::FieldDecode { offset })
    }

    pub fn f32(&mut self) -> Result<f32, DecodeError> {
        let offset = self.pos;
        let bytes = self.take(4)?;
        bytes
            .try_into()
            .map(f32::from_le_bytes)
            .map_err(|_| DecodeError::FieldDecode { offset })
    }
}

/// Decode a fixed-width NUL-padded UTF-8 name field, truncated at the first
/// NUL byte. Fails on invalid UTF-8 rather than substituting.
pub fn read_name_field(buf: &[u8]) -> Result<&str, DecodeError> {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    std::str::from_utf8(&buf[..end]).map_err(|e| DecodeError::FieldDecode {
        offset: e.valid_up_to(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_scalars_in_order() {
        let mut buf = Vec::new();
        buf.push(0x2Au8);
        buf.push(0xFFu8); // -1 as i8
        buf.extend_from_slice(&0x1234u16.to_le_bytes());
        buf.extend_from_slice(&0xDEADBEEFu32.to_le_bytes());
        buf.extend_from_slice(&42.5f32.to_le_bytes());
        buf.extend_from_slice(&0x0102030405060708u64.to_le_bytes());

        let mut r = PayloadReader::new(&buf);
        assert_eq!(r.u8().unwrap(), 0x2A);
        assert_eq!(r.i8().unwrap(), -1);
        assert_eq!(r.u16().unwrap(), 0x1234);
        assert_eq!(r.u32().unwrap(), 0xDEADBEEF);
        assert_eq!(r.f32().unwrap(), 42.5);
        assert_eq!(r.u64().unwrap(), 0x0102030405060708);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_short_read_reports_offset() {
        let buf = [1u8, 2, 3];
        let mut r = PayloadReader::new(&buf);
        r.skip(2).unwrap();
        assert_eq!(r.u32().unwrap_err(), DecodeError::FieldDecode { offset: 2 });
        // A failed read consumes nothing
        assert_eq!(r.position(), 2);
        assert_eq!(r.u8().unwrap(), 3);
    }

    #[test]
    fn test_skip_past_end_fails() {
        let buf = [0u8; 4];
        let mut r = PayloadReader::new(&buf);
        assert!(r.skip(5).is_err());
        assert!(r.skip(4).is_ok());
    }

    #[test]
    fn test_read_name_field_nul_truncation() {
        let mut field = [0u8; 32];
        field[..7].copy_from_slice(b"NORRIS\0");
        assert_eq!(read_name_field(&field).unwrap(), "NORRIS");
    }

    #[test]
    fn test_read_name_field_unterminated() {
        let field = *b"XY";
        assert_eq!(read_name_field(&field).unwrap(), "XY");
    }

    #[test]
    fn test_read_name_field_invalid_utf8() {
        let field = [b'A', 0xFF, 0xFE, 0];
        assert!(read_name_field(&field).is_err());
    }

    #[test]
    fn test_read_name_field_multibyte_utf8() {
        let mut field = [0u8; 16];
        let name = "PÉREZ";
        field[..name.len()].copy_from_slice(name.as_bytes());
        assert_eq!(read_name_field(&field).unwrap(), "PÉREZ");
    }
}
