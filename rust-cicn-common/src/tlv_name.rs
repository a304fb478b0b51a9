//! Wire-form names for table keys.
//!
//! [`TlvName`] keeps a name as its encoded segment TLVs plus the extent of
//! each segment and a cumulative 32-bit FNV-1a hash through every prefix.
//! Slicing to a shorter prefix shares the buffer and hash table, so a
//! longest-prefix walk over a FIB costs no re-encoding or re-hashing.

use crate::error::{CodecError, CodecErrorKind};
use crate::hash::{cumulative_hash32, hash32};
use crate::name::Name;
use crate::tlv::TLV_HEADER_LEN;
use bytes::{Bytes, BytesMut};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Byte span of one segment TLV, header included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Extent {
    offset: usize,
    length: usize,
}

impl Extent {
    fn end(&self) -> usize {
        self.offset + self.length
    }
}

#[derive(Debug, Clone)]
pub struct TlvName {
    memory: Bytes,
    extents: Arc<[Extent]>,
    hashes: Arc<[u32]>,
    segment_count: usize,
}

impl TlvName {
    /// Build from a segment region (no outer Name header).
    pub fn from_segments(memory: Bytes) -> Result<Self, CodecError> {
        let mut extents = Vec::new();
        let mut pos = 0;
        while pos < memory.len() {
            if memory.len() - pos < TLV_HEADER_LEN {
                return Err(CodecError::new(CodecErrorKind::Underrun, pos));
            }
            let value_len = u16::from_be_bytes([memory[pos + 2], memory[pos + 3]]) as usize;
            let extent = Extent {
                offset: pos,
                length: TLV_HEADER_LEN + value_len,
            };
            if extent.end() > memory.len() {
                return Err(CodecError::new(CodecErrorKind::Overrun, pos));
            }
            extents.push(extent);
            pos = extent.end();
        }

        let mut hashes = Vec::with_capacity(extents.len());
        let mut running = None;
        for extent in &extents {
            let bytes = &memory[extent.offset..extent.end()];
            let h = match running {
                None => hash32(bytes),
                Some(seed) => cumulative_hash32(bytes, seed),
            };
            hashes.push(h);
            running = Some(h);
        }

        Ok(Self {
            segment_count: extents.len(),
            memory,
            extents: extents.into(),
            hashes: hashes.into(),
        })
    }

    pub fn from_name(name: &Name) -> Result<Self, CodecError> {
        let mut buf = BytesMut::with_capacity(name.encoded_len());
        name.encode(&mut buf)?;
        Self::from_segments(buf.freeze())
    }

    pub fn to_name(&self) -> Result<Name, CodecError> {
        Name::decode(&self.memory, 0, self.used_len())
    }

    /// The first `segment_count` segments (all of them if the name is shorter).
    pub fn slice(&self, segment_count: usize) -> Self {
        Self {
            memory: self.memory.clone(),
            extents: Arc::clone(&self.extents),
            hashes: Arc::clone(&self.hashes),
            segment_count: segment_count.min(self.segment_count),
        }
    }

    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    pub fn is_empty(&self) -> bool {
        self.segment_count == 0
    }

    fn used_len(&self) -> usize {
        match self.segment_count {
            0 => 0,
            n => self.extents[n - 1].end(),
        }
    }

    /// Encoded segments of this (possibly sliced) name.
    pub fn as_bytes(&self) -> &[u8] {
        &self.memory[..self.used_len()]
    }

    /// Cumulative hash through the last segment; 0 for the empty name.
    pub fn hash_code(&self) -> u32 {
        match self.segment_count {
            0 => 0,
            n => self.hashes[n - 1],
        }
    }

    /// Cumulative hash through the first `segments` segments.
    pub fn prefix_hash(&self, segments: usize) -> Option<u32> {
        match segments {
            0 => Some(0),
            n if n <= self.segment_count => Some(self.hashes[n - 1]),
            _ => None,
        }
    }

    pub fn starts_with(&self, prefix: &TlvName) -> bool {
        self.as_bytes().starts_with(prefix.as_bytes())
    }
}

impl PartialEq for TlvName {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for TlvName {}

impl Hash for TlvName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash_code());
    }
}

/// Shorter encodings sort first; equal lengths compare bytewise.
impl Ord for TlvName {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.as_bytes(), other.as_bytes());
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    }
}

impl PartialOrd for TlvName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
