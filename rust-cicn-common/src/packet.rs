//! Whole-packet decoding.
//!
//! [`PacketDecoder`] runs the pieces in wire order: fixed header, optional
//! headers, message TLV, name, prefix hashes, then any validation TLVs
//! after the message. Each decoder keeps its own [`DecodeStats`], so one
//! decoder per worker thread needs no synchronisation.

use crate::config::CodecConfig;
use crate::dictionary::PacketDictionary;
use crate::error::{CodecError, CodecErrorKind, Error};
use crate::fixed_header::{FixedHeader, FixedHeaderDecoder, PacketType, FIXED_HEADER_LEN};
use crate::metrics::DecodeStats;
use crate::name::{Name, TLV_NAME};
use crate::optional_headers::{decode_optional_headers, encode_optional_headers};
use crate::prefix_hash::{hash_prefixes_with, PrefixHashError, PrefixHashInfo};
use crate::tlv::{self, TlvDecoder, TlvElement, TLV_HEADER_LEN};
use crate::Result;
use bytes::{Bytes, BytesMut};
use log::{debug, trace, warn};
use std::fmt;

pub const T_INTEREST: u16 = 0x0001;
pub const T_CONTENT_OBJECT: u16 = 0x0002;
pub const T_VALIDATION_ALG: u16 = 0x0003;
pub const T_VALIDATION_PAYLOAD: u16 = 0x0004;
pub const T_MANIFEST: u16 = 0x0006;

/// Top-level message TLV type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Interest,
    ContentObject,
    Manifest,
    Unknown(u16),
}

impl From<u16> for MessageType {
    fn from(value: u16) -> Self {
        match value {
            T_INTEREST => MessageType::Interest,
            T_CONTENT_OBJECT => MessageType::ContentObject,
            T_MANIFEST => MessageType::Manifest,
            other => MessageType::Unknown(other),
        }
    }
}

impl From<MessageType> for u16 {
    fn from(value: MessageType) -> Self {
        match value {
            MessageType::Interest => T_INTEREST,
            MessageType::ContentObject => T_CONTENT_OBJECT,
            MessageType::Manifest => T_MANIFEST,
            MessageType::Unknown(other) => other,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageType::Unknown(t) => write!(f, "Unknown(0x{:04x})", t),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Everything [`PacketDecoder::decode`] extracted from one packet.
#[derive(Debug, Clone)]
pub struct DecodedPacket {
    pub dictionary: PacketDictionary,
    pub message_type: MessageType,
    pub name: Option<Name>,
    /// The Name TLV as it appeared on the wire, outer header included.
    pub name_wire: Option<Bytes>,
    pub prefixes: Option<PrefixHashInfo>,
    /// Message TLVs after the name.
    pub fields: Vec<TlvElement>,
    /// TLVs between the end of the message and the end of the packet.
    pub validation: Vec<TlvElement>,
}

impl DecodedPacket {
    pub fn header(&self) -> Option<&FixedHeader> {
        self.dictionary.fixed_header()
    }

    pub fn packet_type(&self) -> Option<PacketType> {
        self.dictionary.packet_type()
    }

    /// True if the name had more segments than the prefix limit allowed.
    pub fn name_truncated(&self) -> bool {
        self.prefixes.as_ref().map_or(false, PrefixHashInfo::overflow)
    }
}

pub struct PacketDecoder {
    config: CodecConfig,
    header_decoder: FixedHeaderDecoder,
    stats: DecodeStats,
}

impl Default for PacketDecoder {
    fn default() -> Self {
        Self::new(CodecConfig::default())
    }
}

impl PacketDecoder {
    pub fn new(config: CodecConfig) -> Self {
        Self {
            header_decoder: FixedHeaderDecoder::new(config.supported_version),
            config,
            stats: DecodeStats::default(),
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    /// Hand back the counters gathered so far and start again from zero.
    pub fn take_stats(&mut self) -> DecodeStats {
        std::mem::take(&mut self.stats)
    }

    /// Decode one packet. Bytes past the fixed header's packet length are ignored.
    pub fn decode(&mut self, packet: Bytes) -> Result<DecodedPacket> {
        let len = packet.len();
        match self.decode_packet(packet) {
            Ok(decoded) => {
                if let Some(packet_type) = decoded.packet_type() {
                    self.stats.record_packet(packet_type, len);
                }
                if let Some(info) = &decoded.prefixes {
                    self.stats.record_prefixes(info);
                }
                debug!(
                    "decoded {} bytes: {:?} {} name={}",
                    len,
                    decoded.packet_type(),
                    decoded.message_type,
                    decoded
                        .name
                        .as_ref()
                        .map_or_else(|| "-".to_string(), Name::to_string)
                );
                Ok(decoded)
            }
            Err(e) => {
                self.stats.record_error(&e);
                warn!("dropping {} byte packet: {}", len, e);
                Err(e)
            }
        }
    }

    fn decode_packet(&self, packet: Bytes) -> Result<DecodedPacket> {
        let mut dictionary = PacketDictionary::new();
        let header = {
            let mut decoder = TlvDecoder::new(packet.clone());
            self.header_decoder.decode(&mut decoder, &mut dictionary)?
        };

        let packet_length = header.packet_length as usize;
        if packet_length > packet.len() {
            return Err(CodecError::new(CodecErrorKind::Underrun, 2).into());
        }

        let mut decoder = TlvDecoder::new(packet.slice(..packet_length));
        decoder.advance(FIXED_HEADER_LEN)?;

        let mut optional = decoder.get_container(header.optional_header_length())?;
        decode_optional_headers(&mut optional, &mut dictionary)?;

        if !decoder.ensure_remaining(TLV_HEADER_LEN) {
            return Err(Error::Packet(format!(
                "no message TLV after {} header bytes",
                header.header_length
            )));
        }
        let message_type = MessageType::from(decoder.get_type()?);
        let message_len = decoder.get_length()? as usize;
        let mut message = decoder.get_container(message_len)?;
        trace!("message {} of {} bytes", message_type, message_len);

        let mut name = None;
        let mut name_wire = None;
        let mut prefixes = None;
        if !message.is_empty() && message.peek_type()? == TLV_NAME {
            let start = message.position();
            let element = TlvElement::decode(&mut message)?;
            let wire = message.buffer().slice(start..start + element.len());

            name = Some(Name::decode(&element.value, 0, element.value.len())?);
            prefixes = Some(self.hash_name(&wire)?);
            name_wire = Some(wire);
        }

        let mut fields = Vec::new();
        while !message.is_empty() {
            fields.push(TlvElement::decode(&mut message)?);
        }

        let mut validation = Vec::new();
        while !decoder.is_empty() {
            validation.push(TlvElement::decode(&mut decoder)?);
        }

        Ok(DecodedPacket {
            dictionary,
            message_type,
            name,
            name_wire,
            prefixes,
            fields,
            validation,
        })
    }

    fn hash_name(&self, wire: &[u8]) -> Result<PrefixHashInfo> {
        match hash_prefixes_with(
            wire,
            true,
            self.config.prefix_limit,
            self.config.hash_strategy,
        ) {
            Ok(info) => Ok(info),
            Err(PrefixHashError::NoSpace(info)) => {
                debug!("name has more than {} segments, keeping partial hashes", info.count());
                Ok(*info)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Assemble a packet: fixed header, the optional headers held in
/// `headers`, then a message TLV holding `name` followed by `fields`.
///
/// The hop limit comes from `headers` if set. Fails if the result does not
/// fit the 16-bit packet length or the 8-bit header length.
pub fn encode_packet(
    packet_type: PacketType,
    message_type: MessageType,
    headers: &PacketDictionary,
    name: &Name,
    fields: &[TlvElement],
) -> Result<Bytes> {
    let mut optional = BytesMut::new();
    encode_optional_headers(headers, &mut optional)?;

    let mut message = BytesMut::new();
    message.extend_from_slice(&name.to_tlv_bytes()?);
    for field in fields {
        field.encode(&mut message)?;
    }

    let header_length = u8::try_from(FIXED_HEADER_LEN + optional.len())
        .map_err(|_| Error::InvalidInput("optional headers exceed 247 bytes".into()))?;
    let packet_length = u16::try_from(header_length as usize + TLV_HEADER_LEN + message.len())
        .map_err(|_| Error::InvalidInput("packet exceeds 65535 bytes".into()))?;

    let mut header = FixedHeader::new(packet_type, packet_length, header_length);
    if let Some(hop_limit) = headers.hop_limit() {
        header = header.with_hop_limit(hop_limit);
    }

    let mut buf = BytesMut::with_capacity(packet_length as usize);
    header.encode(&mut buf);
    buf.extend_from_slice(&optional);
    tlv::encode_tlv(message_type.into(), &message, &mut buf)?;
    Ok(buf.freeze())
}
