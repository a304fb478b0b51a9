//! Hash TLVs, as used for content object hash restrictions and key ids.
//!
//! The TLV type names the hash function. Digest lengths are checked against
//! what the function can produce: SHA-256 is exactly 32 bytes, SHA-512 is
//! 64 bytes or 32 when truncated, and application hashes are opaque.

use crate::error::{CodecError, CodecErrorKind};
use crate::tlv::{self, TlvDecoder, TlvElement};
use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const T_SHA256: u16 = 0x0001;
pub const T_SHA512: u16 = 0x0002;
pub const T_APP_HASH: u16 = 0x7FFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashType {
    Sha256,
    Sha512,
    App,
}

impl HashType {
    pub fn from_tlv_type(tlv_type: u16) -> Option<Self> {
        match tlv_type {
            T_SHA256 => Some(HashType::Sha256),
            T_SHA512 => Some(HashType::Sha512),
            T_APP_HASH => Some(HashType::App),
            _ => None,
        }
    }

    pub fn tlv_type(self) -> u16 {
        match self {
            HashType::Sha256 => T_SHA256,
            HashType::Sha512 => T_SHA512,
            HashType::App => T_APP_HASH,
        }
    }

    /// Whether a digest of `len` bytes is acceptable for this hash type.
    pub fn accepts_len(self, len: usize) -> bool {
        match self {
            HashType::Sha256 => len == 32,
            HashType::Sha512 => len == 32 || len == 64,
            HashType::App => true,
        }
    }
}

/// A digest together with the function that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CryptoHash {
    pub hash_type: HashType,
    pub digest: Bytes,
}

impl CryptoHash {
    pub fn new(hash_type: HashType, digest: impl Into<Bytes>) -> Self {
        Self {
            hash_type,
            digest: digest.into(),
        }
    }
}

impl fmt::Display for CryptoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:", self.hash_type)?;
        for b in self.digest.iter() {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// Read one hash TLV.
///
/// Fails with `TypeMismatch` for an unknown hash type and
/// `InvalidHashLength` for a digest of the wrong size. On failure the
/// cursor is past the TLV, so a caller scanning a list can keep going after
/// clearing the error.
pub fn decode_hash_value(decoder: &mut TlvDecoder) -> Result<CryptoHash, CodecError> {
    let position = decoder.position();
    let element = TlvElement::decode(decoder)?;

    let hash_type = HashType::from_tlv_type(element.tlv_type)
        .ok_or_else(|| CodecError::new(CodecErrorKind::TypeMismatch, position))?;

    if !hash_type.accepts_len(element.value.len()) {
        log::debug!(
            "{:?} hash TLV at {} has bad length {}",
            hash_type,
            position,
            element.value.len()
        );
        return Err(CodecError::new(CodecErrorKind::InvalidHashLength, position));
    }

    Ok(CryptoHash {
        hash_type,
        digest: element.value,
    })
}

/// Write `hash` as a TLV. Nothing is written if the digest length is wrong
/// for its type, which fails with `MissingMandatory`.
pub fn encode_hash_value(hash: &CryptoHash, buf: &mut BytesMut) -> Result<(), CodecError> {
    if !hash.hash_type.accepts_len(hash.digest.len()) {
        return Err(CodecError::new(CodecErrorKind::MissingMandatory, buf.len()));
    }
    tlv::encode_tlv(hash.hash_type.tlv_type(), &hash.digest, buf)
}
