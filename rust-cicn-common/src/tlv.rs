//! TLV (Type‑Length‑Value) encoding and decoding utilities.
//!
//! CCNx schema v1 uses a fixed 2‑byte type and 2‑byte length, both in network
//! byte order. Decoding goes through [`TlvDecoder`], a bounds-checked cursor
//! over a shared [`Bytes`] buffer with a sticky error: once any read fails,
//! every later read fails with the same error.

use crate::error::{CodecError, CodecErrorKind};
use bytes::{BufMut, Bytes, BytesMut};

/// Size of a TLV header (type + length).
pub const TLV_HEADER_LEN: usize = 4;

/// Longest integer a var-int TLV may carry, in bytes.
pub const MAX_VAR_INT_LEN: usize = 8;

/* ---------------------------------------------------------------- *
 * Encoding helpers
 * ---------------------------------------------------------------- */

/// Encode a TLV header.
pub fn encode_tlv_header(tlv_type: u16, length: u16, buf: &mut BytesMut) {
    buf.put_u16(tlv_type);
    buf.put_u16(length);
}

/// Encode a complete TLV.
///
/// Fails with `MissingMandatory` if `value` does not fit a 16-bit length.
pub fn encode_tlv(tlv_type: u16, value: &[u8], buf: &mut BytesMut) -> Result<(), CodecError> {
    let length = u16::try_from(value.len())
        .map_err(|_| CodecError::new(CodecErrorKind::MissingMandatory, buf.len()))?;
    encode_tlv_header(tlv_type, length, buf);
    buf.extend_from_slice(value);
    Ok(())
}

/// Number of bytes `value` needs as a var-int (at least one).
pub fn var_int_len(value: u64) -> usize {
    let significant = 8 - (value.leading_zeros() as usize / 8);
    significant.max(1)
}

/// Write `value` with the fewest big-endian bytes, returning how many were written.
pub fn encode_var_int(value: u64, buf: &mut BytesMut) -> usize {
    let len = var_int_len(value);
    buf.extend_from_slice(&value.to_be_bytes()[8 - len..]);
    len
}

/// Encode an unsigned integer TLV using the var-int representation.
pub fn encode_var_int_tlv(tlv_type: u16, value: u64, buf: &mut BytesMut) {
    encode_tlv_header(tlv_type, var_int_len(value) as u16, buf);
    encode_var_int(value, buf);
}

/* ---------------------------------------------------------------- *
 * Decoding helpers
 * ---------------------------------------------------------------- */

/// Interpret `bytes` as a big-endian var-int. Valid lengths are 1..=8.
pub fn var_int_from_slice(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() || bytes.len() > MAX_VAR_INT_LEN {
        return None;
    }
    Some(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
}

/* ---------------------------------------------------------------- *
 * Decoder cursor
 * ---------------------------------------------------------------- */

/// Bounds-checked reader over a TLV buffer.
///
/// The position never exceeds the buffer length, and no read returns bytes
/// outside the buffer. A read that fails leaves the position where it was.
#[derive(Debug, Clone)]
pub struct TlvDecoder {
    buffer: Bytes,
    position: usize,
    error: Option<CodecError>,
}

impl TlvDecoder {
    /// Create a decoder positioned at the start of `buffer`.
    pub fn new(buffer: Bytes) -> Self {
        Self {
            buffer,
            position: 0,
            error: None,
        }
    }

    /// Create a decoder over a copy of `data`.
    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The underlying buffer, regardless of position.
    pub fn buffer(&self) -> &Bytes {
        &self.buffer
    }

    /// True if at least `n` bytes remain and no error is pending.
    pub fn ensure_remaining(&self, n: usize) -> bool {
        self.error.is_none() && self.remaining() >= n
    }

    pub fn error(&self) -> Option<CodecError> {
        self.error
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Drop the pending error so the decoder can be reused.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn check(&self) -> Result<(), CodecError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fail<T>(&mut self, kind: CodecErrorKind) -> Result<T, CodecError> {
        let err = CodecError::new(kind, self.position);
        self.error = Some(err);
        Err(err)
    }

    /// Borrow the next `n` bytes and step past them.
    fn take(&mut self, n: usize, kind: CodecErrorKind) -> Result<&[u8], CodecError> {
        self.check()?;
        if self.remaining() < n {
            return self.fail(kind);
        }
        let start = self.position;
        self.position += n;
        Ok(&self.buffer[start..start + n])
    }

    /// Read the next `N` bytes as an array.
    pub fn get_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, CodecErrorKind::Decode)?);
        Ok(out)
    }

    pub fn get_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.get_array::<1>()?[0])
    }

    pub fn get_u16(&mut self) -> Result<u16, CodecError> {
        self.get_array().map(u16::from_be_bytes)
    }

    pub fn get_u32(&mut self) -> Result<u32, CodecError> {
        self.get_array().map(u32::from_be_bytes)
    }

    pub fn get_u64(&mut self) -> Result<u64, CodecError> {
        self.get_array().map(u64::from_be_bytes)
    }

    /// Read a TLV type field.
    pub fn get_type(&mut self) -> Result<u16, CodecError> {
        self.get_u16()
    }

    /// Read a TLV length field.
    pub fn get_length(&mut self) -> Result<u16, CodecError> {
        self.get_u16()
    }

    /// Look at the next TLV type without consuming it.
    pub fn peek_type(&self) -> Result<u16, CodecError> {
        self.check()?;
        if self.remaining() < 2 {
            return Err(CodecError::new(CodecErrorKind::Underrun, self.position));
        }
        let p = self.position;
        Ok(u16::from_be_bytes([self.buffer[p], self.buffer[p + 1]]))
    }

    /// Zero-copy view of the next `len` bytes.
    pub fn get_value(&mut self, len: usize) -> Result<Bytes, CodecError> {
        self.check()?;
        if self.remaining() < len {
            return self.fail(CodecErrorKind::Overrun);
        }
        let start = self.position;
        self.position += len;
        Ok(self.buffer.slice(start..start + len))
    }

    /// Skip `n` bytes.
    pub fn advance(&mut self, n: usize) -> Result<(), CodecError> {
        self.take(n, CodecErrorKind::Decode).map(|_| ())
    }

    /// Sub-decoder over the next `len` bytes, which are consumed from `self`.
    pub fn get_container(&mut self, len: usize) -> Result<TlvDecoder, CodecError> {
        self.get_value(len).map(TlvDecoder::new)
    }

    /// Check the next TLV header against `tlv_type` and return its value length.
    /// Does not move the cursor.
    fn peek_header(&mut self, tlv_type: u16) -> Result<usize, CodecError> {
        self.check()?;
        if self.remaining() < TLV_HEADER_LEN {
            return self.fail(CodecErrorKind::Underrun);
        }
        let p = self.position;
        let found = u16::from_be_bytes([self.buffer[p], self.buffer[p + 1]]);
        let length = u16::from_be_bytes([self.buffer[p + 2], self.buffer[p + 3]]) as usize;
        if found != tlv_type {
            return self.fail(CodecErrorKind::TypeMismatch);
        }
        if self.remaining() - TLV_HEADER_LEN < length {
            return self.fail(CodecErrorKind::Overrun);
        }
        Ok(length)
    }

    /// Read a TLV of type `tlv_type` and return its value.
    pub fn get_buffer(&mut self, tlv_type: u16) -> Result<Bytes, CodecError> {
        let length = self.peek_header(tlv_type)?;
        self.position += TLV_HEADER_LEN;
        self.get_value(length)
    }

    fn get_fixed_tlv<const N: usize>(&mut self, tlv_type: u16) -> Result<[u8; N], CodecError> {
        let length = self.peek_header(tlv_type)?;
        if length != N {
            return self.fail(CodecErrorKind::LengthMismatch);
        }
        self.position += TLV_HEADER_LEN;
        self.get_array()
    }

    /// Read a TLV of type `tlv_type` holding exactly one byte.
    pub fn get_uint8_tlv(&mut self, tlv_type: u16) -> Result<u8, CodecError> {
        Ok(self.get_fixed_tlv::<1>(tlv_type)?[0])
    }

    pub fn get_uint16_tlv(&mut self, tlv_type: u16) -> Result<u16, CodecError> {
        self.get_fixed_tlv(tlv_type).map(u16::from_be_bytes)
    }

    pub fn get_uint32_tlv(&mut self, tlv_type: u16) -> Result<u32, CodecError> {
        self.get_fixed_tlv(tlv_type).map(u32::from_be_bytes)
    }

    pub fn get_uint64_tlv(&mut self, tlv_type: u16) -> Result<u64, CodecError> {
        self.get_fixed_tlv(tlv_type).map(u64::from_be_bytes)
    }

    /// Read a `len` byte big-endian unsigned integer.
    pub fn get_var_int(&mut self, len: usize) -> Result<u64, CodecError> {
        self.check()?;
        if len == 0 || len > MAX_VAR_INT_LEN {
            return self.fail(CodecErrorKind::LengthMismatch);
        }
        let bytes = self.take(len, CodecErrorKind::Decode)?;
        Ok(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
    }
}

/* ---------------------------------------------------------------- *
 * TLV element wrapper
 * ---------------------------------------------------------------- */

/// A generic TLV element consisting of *type*, *length* and *value*.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvElement {
    pub tlv_type: u16,
    pub value: Bytes,
}

impl TlvElement {
    /// Create a new wrapper from raw parts.
    pub fn new(tlv_type: u16, value: impl Into<Bytes>) -> Self {
        Self {
            tlv_type,
            value: value.into(),
        }
    }

    /// Total number of bytes when this element is encoded.
    pub fn len(&self) -> usize {
        TLV_HEADER_LEN + self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Encode this element into `buf`.
    pub fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_tlv(self.tlv_type, &self.value, buf)
    }

    /// Decode the next element, whatever its type.
    ///
    /// A header that does not fit is an `Underrun`; a value that does not
    /// fit is an `Overrun`. The value is a zero-copy slice of the decoder's buffer.
    pub fn decode(decoder: &mut TlvDecoder) -> Result<Self, CodecError> {
        decoder.check()?;
        if decoder.remaining() < TLV_HEADER_LEN {
            return decoder.fail(CodecErrorKind::Underrun);
        }
        let tlv_type = decoder.peek_type()?;
        let length = decoder.peek_header(tlv_type)?;
        decoder.position += TLV_HEADER_LEN;
        let value = decoder.get_value(length)?;
        Ok(Self { tlv_type, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_reads() {
        let mut d = TlvDecoder::from_slice(&[
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
        ]);
        assert_eq!(d.get_u8().unwrap(), 0x01);
        assert_eq!(d.get_u16().unwrap(), 0x0203);
        assert_eq!(d.get_u32().unwrap(), 0x0405_0607);
        assert_eq!(d.get_u64().unwrap(), 0x0809_0A0B_0C0D_0E0F);
        assert!(d.is_empty());
        assert!(!d.has_error());
    }

    #[test]
    fn test_short_read_keeps_position_and_sticks() {
        let mut d = TlvDecoder::from_slice(&[0xAA, 0xBB, 0xCC]);
        assert_eq!(d.get_u16().unwrap(), 0xAABB);

        let err = d.get_u16().unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::Decode);
        assert_eq!(err.position(), 2);
        assert_eq!(d.position(), 2);

        // One byte is left, but the decoder is now poisoned.
        assert!(!d.ensure_remaining(1));
        assert_eq!(d.get_u8().unwrap_err(), err);

        d.clear_error();
        assert_eq!(d.get_u8().unwrap(), 0xCC);
    }

    #[test]
    fn test_advance_past_end() {
        let mut d = TlvDecoder::from_slice(&[0; 4]);
        d.advance(3).unwrap();
        assert!(d.advance(2).is_err());
        assert_eq!(d.position(), 3);
    }

    #[test]
    fn test_ensure_remaining() {
        let d = TlvDecoder::from_slice(&[0; 8]);
        assert!(d.ensure_remaining(8));
        assert!(!d.ensure_remaining(9));
        assert_eq!(d.position(), 0);
    }

    #[test]
    fn test_get_buffer() {
        let mut d = TlvDecoder::from_slice(&[0x00, 0x09, 0x00, 0x03, b'a', b'b', b'c', 0xFF]);
        assert_eq!(d.peek_type().unwrap(), 0x0009);
        assert_eq!(&d.get_buffer(0x0009).unwrap()[..], b"abc");
        assert_eq!(d.position(), 7);
    }

    #[test]
    fn test_get_buffer_wrong_type() {
        let mut d = TlvDecoder::from_slice(&[0x00, 0x09, 0x00, 0x01, 0x00]);
        let err = d.get_buffer(0x0001).unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::TypeMismatch);
        assert_eq!(d.position(), 0);
    }

    #[test]
    fn test_get_buffer_too_long() {
        let mut d = TlvDecoder::from_slice(&[0x00, 0x09, 0x00, 0x05, 0x00]);
        assert_eq!(d.get_buffer(0x0009).unwrap_err().kind(), CodecErrorKind::Overrun);
        assert_eq!(d.position(), 0);
    }

    #[test]
    fn test_typed_uint_reads() {
        let mut d = TlvDecoder::from_slice(&[
            0x10, 0x20, 0x00, 0x01, 0x07, // u8
            0x10, 0x21, 0x00, 0x02, 0x01, 0x02, // u16
            0x10, 0x22, 0x00, 0x04, 0x01, 0x02, 0x03, 0x04, // u32
            0x10, 0x23, 0x00, 0x08, 1, 2, 3, 4, 5, 6, 7, 8, // u64
        ]);
        assert_eq!(d.get_uint8_tlv(0x1020).unwrap(), 7);
        assert_eq!(d.get_uint16_tlv(0x1021).unwrap(), 0x0102);
        assert_eq!(d.get_uint32_tlv(0x1022).unwrap(), 0x0102_0304);
        assert_eq!(d.get_uint64_tlv(0x1023).unwrap(), 0x0102_0304_0506_0708);
        assert!(d.is_empty());
    }

    #[test]
    fn test_typed_uint_wrong_length() {
        let mut d = TlvDecoder::from_slice(&[0x10, 0x20, 0x00, 0x02, 0x07, 0x08]);
        assert_eq!(d.get_uint8_tlv(0x1020).unwrap_err().kind(), CodecErrorKind::LengthMismatch);
        assert_eq!(d.position(), 0);
    }

    #[test]
    fn test_get_container() {
        let mut d = TlvDecoder::from_slice(&[1, 2, 3, 4, 5]);
        d.advance(1).unwrap();
        let mut inner = d.get_container(3).unwrap();
        assert_eq!(d.position(), 4);
        assert_eq!(inner.remaining(), 3);
        assert_eq!(inner.get_u8().unwrap(), 2);
        assert!(d.get_container(2).is_err());
    }

    #[test]
    fn test_var_int() {
        let mut d = TlvDecoder::from_slice(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09]);
        assert_eq!(d.get_var_int(0).unwrap_err().kind(), CodecErrorKind::LengthMismatch);
        d.clear_error();
        assert_eq!(d.get_var_int(9).unwrap_err().kind(), CodecErrorKind::LengthMismatch);
        d.clear_error();
        assert_eq!(d.get_var_int(3).unwrap(), 0x010203);
        assert_eq!(d.position(), 3);

        assert_eq!(var_int_from_slice(&[]), None);
        assert_eq!(var_int_from_slice(&[0xFF; 9]), None);
        assert_eq!(var_int_from_slice(&[0x01, 0x00]), Some(256));
        assert_eq!(
            var_int_from_slice(&[0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80, 0x90]),
            Some(0x2030_4050_6070_8090)
        );
    }

    #[test]
    fn test_encode_var_int_is_minimal() {
        for (value, expected) in [
            (0u64, vec![0x00]),
            (0xFF, vec![0xFF]),
            (0x100, vec![0x01, 0x00]),
            (u64::MAX, vec![0xFF; 8]),
        ] {
            let mut buf = BytesMut::new();
            assert_eq!(encode_var_int(value, &mut buf), expected.len());
            assert_eq!(&buf[..], &expected[..]);
        }
    }

    #[test]
    fn test_element_decode() {
        let mut d = TlvDecoder::from_slice(&[0x01, 0x00, 0x00, 0x02, 0xA0, 0xA1, 0x00, 0x01]);
        let el = TlvElement::decode(&mut d).unwrap();
        assert_eq!(el.tlv_type, 0x0100);
        assert_eq!(&el.value[..], &[0xA0, 0xA1]);
        assert_eq!(el.len(), 6);

        // Two trailing bytes are not a header.
        assert_eq!(TlvElement::decode(&mut d).unwrap_err().kind(), CodecErrorKind::Underrun);
    }

    #[test]
    fn test_element_encode() {
        let mut buf = BytesMut::new();
        TlvElement::new(0x0003, &b"xy"[..]).encode(&mut buf).unwrap();
        assert_eq!(&buf[..], &[0x00, 0x03, 0x00, 0x02, b'x', b'y']);

        let huge = vec![0u8; 70_000];
        let err = encode_tlv(1, &huge, &mut BytesMut::new()).unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::MissingMandatory);
    }
}
