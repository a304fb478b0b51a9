//! Per-hop optional headers.
//!
//! The optional headers sit between the fixed header and the message body
//! and are a flat run of TLVs. Known types are decoded into typed fields of
//! the [`PacketDictionary`]; anything else is kept verbatim as a custom
//! header keyed by its type.

use crate::dictionary::PacketDictionary;
use crate::error::{CodecError, CodecErrorKind};
use crate::tlv::{self, TlvDecoder, TlvElement};
use bytes::{Bytes, BytesMut};

pub const T_INTEREST_LIFETIME: u16 = 0x0001;
pub const T_RECOMMENDED_CACHE_TIME: u16 = 0x0002;
pub const T_PATH_LABEL: u16 = 0x0003;
pub const T_INTEREST_FRAGMENT: u16 = 0x0004;
pub const T_CONTENT_OBJECT_FRAGMENT: u16 = 0x0005;

/// Known optional header types, in encoding order.
const KNOWN_HEADERS: [u16; 5] = [
    T_INTEREST_LIFETIME,
    T_RECOMMENDED_CACHE_TIME,
    T_PATH_LABEL,
    T_INTEREST_FRAGMENT,
    T_CONTENT_OBJECT_FRAGMENT,
];

fn is_known(tlv_type: u16) -> bool {
    KNOWN_HEADERS.contains(&tlv_type)
}

/// Decode every optional header left in `decoder` into `dictionary`.
///
/// `decoder` should span exactly the optional header region. A TLV that
/// extends past it fails with `Overrun`; an integer header whose length is
/// not 1..=8 bytes fails with `LengthMismatch`. A repeated header replaces
/// the earlier one.
pub fn decode_optional_headers(
    decoder: &mut TlvDecoder,
    dictionary: &mut PacketDictionary,
) -> Result<(), CodecError> {
    while !decoder.is_empty() {
        let position = decoder.position();
        let element = TlvElement::decode(decoder)?;
        log::trace!(
            "optional header type 0x{:04x} len {} at {}",
            element.tlv_type,
            element.value.len(),
            position
        );

        let var_int = |value: &Bytes| {
            tlv::var_int_from_slice(value)
                .ok_or_else(|| CodecError::new(CodecErrorKind::LengthMismatch, position))
        };

        match element.tlv_type {
            T_INTEREST_LIFETIME => dictionary.interest_lifetime = Some(var_int(&element.value)?),
            T_RECOMMENDED_CACHE_TIME => {
                dictionary.recommended_cache_time = Some(var_int(&element.value)?)
            }
            T_PATH_LABEL => dictionary.path_label = Some(var_int(&element.value)?),
            T_INTEREST_FRAGMENT => dictionary.interest_fragment = Some(element.value),
            T_CONTENT_OBJECT_FRAGMENT => dictionary.object_fragment = Some(element.value),
            other => {
                dictionary.custom_headers.insert(other, element.value);
            }
        }
    }
    Ok(())
}

/// Encode the optional headers held in `dictionary`: known headers first in
/// type order, then custom headers in type order.
pub fn encode_optional_headers(
    dictionary: &PacketDictionary,
    buf: &mut BytesMut,
) -> Result<(), CodecError> {
    if let Some(v) = dictionary.interest_lifetime {
        tlv::encode_var_int_tlv(T_INTEREST_LIFETIME, v, buf);
    }
    if let Some(v) = dictionary.recommended_cache_time {
        tlv::encode_var_int_tlv(T_RECOMMENDED_CACHE_TIME, v, buf);
    }
    if let Some(v) = dictionary.path_label {
        tlv::encode_var_int_tlv(T_PATH_LABEL, v, buf);
    }
    if let Some(v) = &dictionary.interest_fragment {
        tlv::encode_tlv(T_INTEREST_FRAGMENT, v, buf)?;
    }
    if let Some(v) = &dictionary.object_fragment {
        tlv::encode_tlv(T_CONTENT_OBJECT_FRAGMENT, v, buf)?;
    }
    for (&tlv_type, value) in &dictionary.custom_headers {
        tlv::encode_tlv(tlv_type, value, buf)?;
    }
    Ok(())
}

/* ---------------------------------------------------------------- *
 * Dictionary accessors
 * ---------------------------------------------------------------- */

impl PacketDictionary {
    /// Interest lifetime in milliseconds.
    pub fn interest_lifetime(&self) -> Option<u64> {
        self.interest_lifetime
    }

    /// Recommended cache time, an absolute UTC time in milliseconds.
    pub fn recommended_cache_time(&self) -> Option<u64> {
        self.recommended_cache_time
    }

    pub fn path_label(&self) -> Option<u64> {
        self.path_label
    }

    pub fn interest_fragment(&self) -> Option<&Bytes> {
        self.interest_fragment.as_ref()
    }

    pub fn object_fragment(&self) -> Option<&Bytes> {
        self.object_fragment.as_ref()
    }

    pub fn custom_header(&self, tlv_type: u16) -> Option<&Bytes> {
        self.custom_headers.get(&tlv_type)
    }

    pub fn custom_headers(&self) -> impl Iterator<Item = (u16, &Bytes)> {
        self.custom_headers.iter().map(|(&t, v)| (t, v))
    }

    pub fn set_interest_lifetime(&mut self, millis: u64) -> &mut Self {
        self.interest_lifetime = Some(millis);
        self
    }

    pub fn set_recommended_cache_time(&mut self, millis: u64) -> &mut Self {
        self.recommended_cache_time = Some(millis);
        self
    }

    pub fn set_path_label(&mut self, label: u64) -> &mut Self {
        self.path_label = Some(label);
        self
    }

    pub fn set_interest_fragment(&mut self, fragment: impl Into<Bytes>) -> &mut Self {
        self.interest_fragment = Some(fragment.into());
        self
    }

    pub fn set_object_fragment(&mut self, fragment: impl Into<Bytes>) -> &mut Self {
        self.object_fragment = Some(fragment.into());
        self
    }

    /// Store an application header. Fails with `TypeMismatch` for a type
    /// that has a typed slot.
    pub fn set_custom_header(
        &mut self,
        tlv_type: u16,
        value: impl Into<Bytes>,
    ) -> Result<&mut Self, CodecError> {
        if is_known(tlv_type) {
            return Err(CodecError::new(CodecErrorKind::TypeMismatch, 0));
        }
        self.custom_headers.insert(tlv_type, value.into());
        Ok(self)
    }
}
