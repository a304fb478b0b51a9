//! CCNx names and their TLV form.
//!
//! A name is an ordered list of typed segments. On the wire it is a Name TLV
//! (type 0x0000) whose value is the segment TLVs back to back. The segment
//! region alone (no outer header) is what the prefix hash engine calls a
//! "prefix"; with the header it is a "full name".

use crate::error::{CodecError, CodecErrorKind, Error};
use crate::tlv::{self, TLV_HEADER_LEN};
use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outer TLV type of a name.
pub const TLV_NAME: u16 = 0x0000;

/// Generic name segment.
pub const SEGMENT_NAME: u16 = 0x0001;

/// Payload identifier segment.
pub const SEGMENT_PAYLOAD_ID: u16 = 0x0002;

/// Chunk number segment. Ends the hashable part of a name.
pub const SEGMENT_CHUNK: u16 = 0x0010;

/// Application-defined segment types.
pub const SEGMENT_APP_MIN: u16 = 0x1000;
pub const SEGMENT_APP_MAX: u16 = 0x1FFF;

mod tests;

/// One typed name segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameSegment {
    pub segment_type: u16,
    pub value: Bytes,
}

impl NameSegment {
    pub fn new(segment_type: u16, value: impl Into<Bytes>) -> Self {
        Self {
            segment_type,
            value: value.into(),
        }
    }

    /// A generic `SEGMENT_NAME` segment.
    pub fn generic(value: impl Into<Bytes>) -> Self {
        Self::new(SEGMENT_NAME, value)
    }

    pub fn chunk(value: impl Into<Bytes>) -> Self {
        Self::new(SEGMENT_CHUNK, value)
    }

    pub fn is_chunk(&self) -> bool {
        self.segment_type == SEGMENT_CHUNK
    }

    /// Encoded size, header included.
    pub fn encoded_len(&self) -> usize {
        TLV_HEADER_LEN + self.value.len()
    }

    pub fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        tlv::encode_tlv(self.segment_type, &self.value, buf)
    }
}

impl fmt::Display for NameSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segment_type != SEGMENT_NAME {
            write!(f, "0x{:04x}=", self.segment_type)?;
        }

        // Print printable ASCII characters directly, otherwise use hex
        let printable = self
            .value
            .iter()
            .all(|&b| (b.is_ascii_graphic() && b != b'/') || b == b' ');

        if printable {
            write!(f, "{}", String::from_utf8_lossy(&self.value))
        } else {
            write!(f, "0x")?;
            for &b in self.value.iter() {
                write!(f, "{:02x}", b)?;
            }
            Ok(())
        }
    }
}

/// A CCNx name, which is a sequence of name segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name {
    segments: Vec<NameSegment>,
}

impl Name {
    /// Creates a new empty name.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<NameSegment>) -> Self {
        Self { segments }
    }

    /// Parse a `/`-separated name.
    ///
    /// The empty string and `"/"` give the empty name. One leading and one
    /// trailing slash are ignored; an inner `//` is an empty segment. Every
    /// segment is `SEGMENT_NAME` except that, with `chunk_last`, the final
    /// one becomes `SEGMENT_CHUNK`.
    pub fn from_uri(uri: &str, chunk_last: bool) -> Result<Self, Error> {
        let body = uri.strip_prefix('/').unwrap_or(uri);
        let mut parts: Vec<&str> = body.split('/').collect();
        if parts.last() == Some(&"") {
            parts.pop();
        }

        let mut segments = Vec::with_capacity(parts.len());
        for part in parts {
            if part.len() > u16::MAX as usize {
                return Err(Error::InvalidInput(format!(
                    "name segment of {} bytes does not fit a TLV",
                    part.len()
                )));
            }
            segments.push(NameSegment::generic(Bytes::copy_from_slice(part.as_bytes())));
        }

        if chunk_last {
            if let Some(last) = segments.last_mut() {
                last.segment_type = SEGMENT_CHUNK;
            }
        }

        Ok(Self { segments })
    }

    /// Adds a segment to the name.
    pub fn push(&mut self, segment: NameSegment) -> &mut Self {
        self.segments.push(segment);
        self
    }

    /// Returns the number of segments in the name.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[NameSegment] {
        &self.segments
    }

    pub fn get(&self, index: usize) -> Option<&NameSegment> {
        self.segments.get(index)
    }

    /// The first `len` segments (all of them if `len` is larger).
    pub fn prefix(&self, len: usize) -> Self {
        Self {
            segments: self.segments.iter().take(len).cloned().collect(),
        }
    }

    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.segments.iter().zip(&other.segments).all(|(a, b)| a == b)
    }

    /// Size of the segment region (no outer header).
    pub fn encoded_len(&self) -> usize {
        self.segments.iter().map(NameSegment::encoded_len).sum()
    }

    /// Write the segment TLVs back to back, without the outer Name header.
    pub fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        buf.reserve(self.encoded_len());
        for segment in &self.segments {
            segment.encode(buf)?;
        }
        Ok(())
    }

    /// The full Name TLV, outer header included.
    pub fn to_tlv_bytes(&self) -> Result<Bytes, CodecError> {
        let length = u16::try_from(self.encoded_len())
            .map_err(|_| CodecError::new(CodecErrorKind::MissingMandatory, 0))?;
        let mut buf = BytesMut::with_capacity(TLV_HEADER_LEN + length as usize);
        tlv::encode_tlv_header(TLV_NAME, length, &mut buf);
        self.encode(&mut buf)?;
        Ok(buf.freeze())
    }

    /// Decode segments from `buffer[offset..end]`.
    ///
    /// Segment values are zero-copy slices of `buffer`. An empty range is the
    /// empty name. A trailing fragment shorter than a TLV header is an
    /// `Underrun`; a segment whose value runs past `end` is an `Overrun`.
    pub fn decode(buffer: &Bytes, offset: usize, end: usize) -> Result<Self, CodecError> {
        if end > buffer.len() || offset > end {
            return Err(CodecError::new(CodecErrorKind::Underrun, offset));
        }

        let mut segments = Vec::new();
        let mut pos = offset;
        while pos < end {
            if end - pos < TLV_HEADER_LEN {
                return Err(CodecError::new(CodecErrorKind::Underrun, pos));
            }
            let segment_type = u16::from_be_bytes([buffer[pos], buffer[pos + 1]]);
            let length = u16::from_be_bytes([buffer[pos + 2], buffer[pos + 3]]) as usize;
            let value_start = pos + TLV_HEADER_LEN;
            if value_start + length > end {
                return Err(CodecError::new(CodecErrorKind::Overrun, pos));
            }
            segments.push(NameSegment {
                segment_type,
                value: buffer.slice(value_start..value_start + length),
            });
            pos = value_start + length;
        }

        Ok(Self { segments })
    }

    /// Decode a full Name TLV occupying all of `buffer`.
    pub fn from_tlv_bytes(buffer: &Bytes) -> Result<Self, CodecError> {
        if buffer.len() < TLV_HEADER_LEN {
            return Err(CodecError::new(CodecErrorKind::Underrun, 0));
        }
        let tlv_type = u16::from_be_bytes([buffer[0], buffer[1]]);
        if tlv_type != TLV_NAME {
            return Err(CodecError::new(CodecErrorKind::TypeMismatch, 0));
        }
        let length = u16::from_be_bytes([buffer[2], buffer[3]]) as usize;
        if TLV_HEADER_LEN + length != buffer.len() {
            return Err(CodecError::new(CodecErrorKind::LengthMismatch, 2));
        }
        Self::decode(buffer, TLV_HEADER_LEN, buffer.len())
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uri(s, false)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }

        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }

        Ok(())
    }
}
