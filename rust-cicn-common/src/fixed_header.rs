//! The 8 byte CCNx schema v1 fixed header.
//!
//! ```text
//!  0         1         2         3
//! +---------+---------+---------+---------+
//! | version |  type   |   packet length   |
//! +---------+---------+---------+---------+
//! |hop limit| ret code|  flags  | hdr len |
//! +---------+---------+---------+---------+
//! ```

use crate::dictionary::PacketDictionary;
use crate::error::{CodecError, CodecErrorKind};
use crate::tlv::TlvDecoder;
use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of the fixed header on the wire.
pub const FIXED_HEADER_LEN: usize = 8;

/// Schema version this codec speaks.
pub const CCNX_VERSION: u8 = 1;

/// Hop limit written by [`FixedHeader::new`].
pub const DEFAULT_HOP_LIMIT: u8 = 255;

/// Packet type octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PacketType {
    Interest,
    ContentObject,
    InterestReturn,
    HopByHopFragment,
    Control,
    Unknown(u8),
}

impl From<u8> for PacketType {
    fn from(value: u8) -> Self {
        match value {
            0x00 => PacketType::Interest,
            0x01 => PacketType::ContentObject,
            0x02 => PacketType::InterestReturn,
            0x04 => PacketType::HopByHopFragment,
            0xA4 => PacketType::Control,
            other => PacketType::Unknown(other),
        }
    }
}

impl From<PacketType> for u8 {
    fn from(value: PacketType) -> Self {
        match value {
            PacketType::Interest => 0x00,
            PacketType::ContentObject => 0x01,
            PacketType::InterestReturn => 0x02,
            PacketType::HopByHopFragment => 0x04,
            PacketType::Control => 0xA4,
            PacketType::Unknown(other) => other,
        }
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketType::Interest => write!(f, "Interest"),
            PacketType::ContentObject => write!(f, "ContentObject"),
            PacketType::InterestReturn => write!(f, "InterestReturn"),
            PacketType::HopByHopFragment => write!(f, "HopByHopFragment"),
            PacketType::Control => write!(f, "Control"),
            PacketType::Unknown(t) => write!(f, "Unknown(0x{:02x})", t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedHeader {
    pub version: u8,
    pub packet_type: PacketType,
    /// Whole packet, fixed header included.
    pub packet_length: u16,
    pub hop_limit: u8,
    pub return_code: u8,
    pub flags: u8,
    /// Fixed header plus optional headers.
    pub header_length: u8,
}

impl FixedHeader {
    pub fn new(packet_type: PacketType, packet_length: u16, header_length: u8) -> Self {
        Self {
            version: CCNX_VERSION,
            packet_type,
            packet_length,
            hop_limit: DEFAULT_HOP_LIMIT,
            return_code: 0,
            flags: 0,
            header_length,
        }
    }

    pub fn with_hop_limit(mut self, hop_limit: u8) -> Self {
        self.hop_limit = hop_limit;
        self
    }

    pub fn with_return_code(mut self, return_code: u8) -> Self {
        self.return_code = return_code;
        self
    }

    /// Bytes of optional headers following the fixed header.
    pub fn optional_header_length(&self) -> usize {
        (self.header_length as usize).saturating_sub(FIXED_HEADER_LEN)
    }

    fn from_bytes(raw: [u8; FIXED_HEADER_LEN]) -> Self {
        Self {
            version: raw[0],
            packet_type: PacketType::from(raw[1]),
            packet_length: u16::from_be_bytes([raw[2], raw[3]]),
            hop_limit: raw[4],
            return_code: raw[5],
            flags: raw[6],
            header_length: raw[7],
        }
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.version);
        buf.put_u8(self.packet_type.into());
        buf.put_u16(self.packet_length);
        buf.put_u8(self.hop_limit);
        buf.put_u8(self.return_code);
        buf.put_u8(self.flags);
        buf.put_u8(self.header_length);
    }

    /// First invariant this header breaks, if any.
    fn validate(&self, supported_version: u8) -> Option<CodecErrorKind> {
        if self.version != supported_version {
            Some(CodecErrorKind::Version)
        } else if (self.packet_length as usize) < FIXED_HEADER_LEN {
            Some(CodecErrorKind::PacketLengthTooShort)
        } else if (self.header_length as usize) < FIXED_HEADER_LEN {
            Some(CodecErrorKind::HeaderLengthTooShort)
        } else if self.packet_length < self.header_length as u16 {
            Some(CodecErrorKind::PacketLengthShorterThanHeader)
        } else {
            None
        }
    }
}

/// Reads and validates fixed headers for one schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedHeaderDecoder {
    supported_version: u8,
}

impl Default for FixedHeaderDecoder {
    fn default() -> Self {
        Self::new(CCNX_VERSION)
    }
}

impl FixedHeaderDecoder {
    pub fn new(supported_version: u8) -> Self {
        Self { supported_version }
    }

    pub fn supported_version(&self) -> u8 {
        self.supported_version
    }

    /// Decode the fixed header at the cursor into `dictionary`.
    ///
    /// If fewer than 8 bytes remain the cursor does not move. Otherwise the
    /// 8 bytes are consumed, and the hop limit and return code are stored
    /// whether or not the header then passes validation. The header itself
    /// is stored only on success.
    pub fn decode(
        &self,
        decoder: &mut TlvDecoder,
        dictionary: &mut PacketDictionary,
    ) -> Result<FixedHeader, CodecError> {
        let start = decoder.position();
        let header = FixedHeader::from_bytes(decoder.get_array()?);

        dictionary.hop_limit = Some(header.hop_limit);
        dictionary.return_code = Some(header.return_code);

        if let Some(kind) = header.validate(self.supported_version) {
            log::trace!("fixed header at {} rejected: {:?}", start, kind);
            return Err(CodecError::new(kind, start));
        }

        dictionary.fixed_header = Some(header);
        Ok(header)
    }
}

/* ---------------------------------------------------------------- *
 * Dictionary getters
 * ---------------------------------------------------------------- */

impl PacketDictionary {
    pub fn fixed_header(&self) -> Option<&FixedHeader> {
        self.fixed_header.as_ref()
    }

    pub fn version(&self) -> Option<u8> {
        self.fixed_header.map(|h| h.version)
    }

    pub fn packet_type(&self) -> Option<PacketType> {
        self.fixed_header.map(|h| h.packet_type)
    }

    pub fn packet_length(&self) -> Option<u16> {
        self.fixed_header.map(|h| h.packet_length)
    }

    /// Header length, or `None` if it is below the fixed header size.
    pub fn header_length(&self) -> Option<u8> {
        self.fixed_header
            .map(|h| h.header_length)
            .filter(|&len| len as usize >= FIXED_HEADER_LEN)
    }

    pub fn optional_header_length(&self) -> Option<usize> {
        self.header_length()
            .map(|len| len as usize - FIXED_HEADER_LEN)
    }

    /// Hop limit from the last fixed header read, valid or not.
    pub fn hop_limit(&self) -> Option<u8> {
        self.hop_limit
    }

    /// Return code from the last fixed header read, valid or not.
    pub fn return_code(&self) -> Option<u8> {
        self.return_code
    }

    pub fn flags(&self) -> Option<u8> {
        self.fixed_header.map(|h| h.flags)
    }

    /// Hop limit for [`encode_packet`](crate::packet::encode_packet) to write.
    pub fn set_hop_limit(&mut self, hop_limit: u8) -> &mut Self {
        self.hop_limit = Some(hop_limit);
        self
    }
}
