//! Hashing every prefix of a name in one pass.
//!
//! Longest-prefix-match lookups need a digest for `/a`, `/a/b`, `/a/b/c`
//! and so on. [`hash_prefixes`] walks the segment TLVs once, records the
//! cumulative byte length of each prefix, and hashes each prefix with
//! [`hash64`]. A prefix digest is always equal to `hash64` of the prefix's
//! bytes, so tables can be probed with names that were never parsed here.
//!
//! A chunk segment ends the walk: chunk numbers are not routable.

use crate::error::Error;
use crate::hash::{cumulative_hash64, hash64, FNV_OFFSET_64};
use crate::name::SEGMENT_CHUNK;
use crate::tlv::TLV_HEADER_LEN;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Most prefixes one call will hash.
pub const MAX_NAME_COMPS: usize = 32;

/// How each prefix digest is produced. Both give identical digests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashStrategy {
    /// Re-hash every prefix from its first byte.
    #[default]
    Independent,
    /// Extend the previous prefix's digest with the new segment's bytes.
    Cumulative,
}

impl fmt::Display for HashStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashStrategy::Independent => write!(f, "independent"),
            HashStrategy::Cumulative => write!(f, "cumulative"),
        }
    }
}

impl FromStr for HashStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "independent" => Ok(HashStrategy::Independent),
            "cumulative" => Ok(HashStrategy::Cumulative),
            other => Err(Error::InvalidInput(format!("unknown hash strategy '{}'", other))),
        }
    }
}

/// Prefix lengths and digests for one name.
///
/// Lives on the stack; only the first [`count`](Self::count) entries of the
/// arrays are meaningful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixHashInfo {
    pfx_offset: u16,
    pfx_len: u16,
    count: u16,
    overflow: bool,
    lens: [u16; MAX_NAME_COMPS],
    hashes: [u64; MAX_NAME_COMPS],
    full_hash: Option<u64>,
}

impl PrefixHashInfo {
    fn empty(pfx_offset: u16, pfx_len: u16) -> Self {
        Self {
            pfx_offset,
            pfx_len,
            count: 0,
            overflow: false,
            lens: [0; MAX_NAME_COMPS],
            hashes: [0; MAX_NAME_COMPS],
            full_hash: None,
        }
    }

    /// Where the segment region starts in the hashed input (4 for full names).
    pub fn pfx_offset(&self) -> usize {
        self.pfx_offset as usize
    }

    /// Length of the segment region.
    pub fn pfx_len(&self) -> usize {
        self.pfx_len as usize
    }

    /// Number of prefixes hashed.
    pub fn count(&self) -> usize {
        self.count as usize
    }

    /// True if segments remain past the last hashed prefix (other than a chunk).
    pub fn overflow(&self) -> bool {
        self.overflow
    }

    /// Byte length of each prefix, measured from the start of the segment region.
    pub fn lens(&self) -> &[u16] {
        &self.lens[..self.count()]
    }

    /// Digest of each prefix, shortest first.
    pub fn hashes(&self) -> &[u64] {
        &self.hashes[..self.count()]
    }

    /// Hash of the entire input, outer header included. Only set for full names.
    pub fn full_hash(&self) -> Option<u64> {
        self.full_hash
    }

    /// Digest of the longest hashed prefix.
    pub fn longest(&self) -> Option<u64> {
        self.hashes().last().copied()
    }

    /// Byte range of prefix `i` within the hashed input.
    pub fn prefix_range(&self, i: usize) -> Option<Range<usize>> {
        self.lens()
            .get(i)
            .map(|&len| self.pfx_offset()..self.pfx_offset() + len as usize)
    }

    /// Bytes of prefix `i`, given the same input that was hashed.
    pub fn prefix_bytes<'a>(&self, name: &'a [u8], i: usize) -> Option<&'a [u8]> {
        self.prefix_range(i).and_then(|r| name.get(r))
    }
}

/// Why [`hash_prefixes`] did not return a complete result.
#[derive(Debug, thiserror::Error)]
pub enum PrefixHashError {
    /// The input is not a well formed name.
    #[error("invalid name: {0}")]
    InvalidInput(&'static str),

    /// More than [`MAX_NAME_COMPS`] segments. The first `MAX_NAME_COMPS`
    /// prefixes were hashed and are carried here.
    #[error("name has more than {} hashable components", MAX_NAME_COMPS)]
    NoSpace(Box<PrefixHashInfo>),
}

impl PrefixHashError {
    /// The partial result of a `NoSpace` failure.
    pub fn partial(&self) -> Option<&PrefixHashInfo> {
        match self {
            PrefixHashError::NoSpace(info) => Some(info),
            PrefixHashError::InvalidInput(_) => None,
        }
    }

    /// Take the partial result of a `NoSpace` failure.
    pub fn into_partial(self) -> Option<PrefixHashInfo> {
        match self {
            PrefixHashError::NoSpace(info) => Some(*info),
            PrefixHashError::InvalidInput(_) => None,
        }
    }
}

impl From<PrefixHashError> for Error {
    fn from(err: PrefixHashError) -> Self {
        match err {
            PrefixHashError::InvalidInput(msg) => Error::InvalidInput(msg.to_string()),
            PrefixHashError::NoSpace(_) => Error::NoSpace { max: MAX_NAME_COMPS },
        }
    }
}

/// Hash every prefix of `name` with the default strategy.
///
/// `name` is a full Name TLV if `is_full_name`, otherwise just its segment
/// region. `limit` caps the number of prefixes; 0 or anything above
/// [`MAX_NAME_COMPS`] means `MAX_NAME_COMPS`.
pub fn hash_prefixes(
    name: &[u8],
    is_full_name: bool,
    limit: usize,
) -> Result<PrefixHashInfo, PrefixHashError> {
    hash_prefixes_with(name, is_full_name, limit, HashStrategy::default())
}

pub fn hash_prefixes_with(
    name: &[u8],
    is_full_name: bool,
    limit: usize,
    strategy: HashStrategy,
) -> Result<PrefixHashInfo, PrefixHashError> {
    if name.len() < TLV_HEADER_LEN {
        return Err(PrefixHashError::InvalidInput("shorter than a TLV header"));
    }
    let name_len =
        u16::try_from(name.len()).map_err(|_| PrefixHashError::InvalidInput("longer than 65535 bytes"))?;

    let limit = if limit == 0 || limit > MAX_NAME_COMPS {
        MAX_NAME_COMPS
    } else {
        limit
    };

    let start = if is_full_name { TLV_HEADER_LEN } else { 0 };
    let name_end = name.len();
    let mut info = PrefixHashInfo::empty(start as u16, name_len - start as u16);

    let mut end = start;
    let mut running = FNV_OFFSET_64;
    let mut stopped_on_chunk = false;
    let mut i = 0;

    while i < limit && end < name_end {
        if name_end - end < TLV_HEADER_LEN {
            return Err(PrefixHashError::InvalidInput("trailing bytes shorter than a TLV header"));
        }

        let segment_type = u16::from_be_bytes([name[end], name[end + 1]]);
        if segment_type == SEGMENT_CHUNK {
            stopped_on_chunk = true;
            break;
        }

        let length = u16::from_be_bytes([name[end + 2], name[end + 3]]) as usize;
        let next = end + TLV_HEADER_LEN + length;
        if next > name_end {
            return Err(PrefixHashError::InvalidInput("segment overruns the name"));
        }

        info.lens[i] = (next - start) as u16;
        info.hashes[i] = match strategy {
            HashStrategy::Independent => hash64(&name[start..next]),
            HashStrategy::Cumulative => {
                running = cumulative_hash64(&name[end..next], running);
                running
            }
        };

        end = next;
        i += 1;
    }

    let remaining = end < name_end;
    if remaining && !stopped_on_chunk && name_end - end >= TLV_HEADER_LEN {
        // Stopped on the limit: a chunk next is still not overflow
        stopped_on_chunk = u16::from_be_bytes([name[end], name[end + 1]]) == SEGMENT_CHUNK;
    }

    info.count = i as u16;
    info.overflow = remaining && !stopped_on_chunk;

    if is_full_name {
        info.full_hash = Some(hash64(name));
    }

    // Every slot used with something left over, chunk or not
    if remaining && i == MAX_NAME_COMPS {
        return Err(PrefixHashError::NoSpace(Box::new(info)));
    }

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::{Name, NameSegment};

    fn full(uri: &str, chunk: bool) -> Vec<u8> {
        Name::from_uri(uri, chunk).unwrap().to_tlv_bytes().unwrap().to_vec()
    }

    fn deep_uri(segments: usize) -> String {
        (0..segments).map(|i| format!("/s{}", i)).collect()
    }

    fn deep_name(segments: usize) -> Vec<u8> {
        full(&deep_uri(segments), false)
    }

    #[test]
    fn test_root_name() {
        let wire = full("/", false);
        assert_eq!(wire.len(), 4);

        let info = hash_prefixes(&wire, true, 0).unwrap();
        assert_eq!(info.count(), 0);
        assert!(!info.overflow());
        assert_eq!(info.full_hash(), Some(hash64(&wire)));
        assert_eq!(info.pfx_offset(), 4);
        assert_eq!(info.pfx_len(), 0);
    }

    #[test]
    fn test_three_segments() {
        let wire = full("/1/2/3", false);
        let info = hash_prefixes(&wire, true, 0).unwrap();

        assert_eq!(info.count(), 3);
        assert_eq!(info.lens(), &[5, 10, 15]);
        assert_eq!(info.lens()[2] as usize, wire.len() - 4);
        assert_eq!(info.hashes()[2], hash64(&wire[4..]));
        assert_eq!(info.prefix_bytes(&wire, 0), Some(&wire[4..9]));
        assert!(!info.overflow());
    }

    #[test]
    fn test_prefix_only_input() {
        let wire = full("/a/bb", false);
        let info = hash_prefixes(&wire[4..], false, 0).unwrap();
        assert_eq!(info.count(), 2);
        assert_eq!(info.pfx_offset(), 0);
        assert_eq!(info.full_hash(), None);
        assert_eq!(info.hashes()[0], hash64(&wire[4..9]));
    }

    #[test]
    fn test_lookup_consistency() {
        // Hashing `/a/b` directly matches prefix 1 of `/a/b/c`.
        let long = full("/a/b/c", false);
        let short = full("/a/b", false);
        let info = hash_prefixes(&long, true, 0).unwrap();
        let direct = hash_prefixes(&short, true, 0).unwrap();
        assert_eq!(info.hashes()[1], direct.longest().unwrap());
    }

    #[test]
    fn test_chunk_terminates() {
        let wire = full("/movie/part/42", true);
        let info = hash_prefixes(&wire, true, 0).unwrap();
        assert_eq!(info.count(), 2);
        assert!(!info.overflow());
        // Chunk bytes are in no prefix.
        assert_eq!(info.lens()[1] as usize, wire.len() - 4 - (4 + 2));
        assert_eq!(info.full_hash(), Some(hash64(&wire)));
    }

    #[test]
    fn test_caller_limit_is_soft() {
        let wire = full("/a/b/c/d", false);
        let info = hash_prefixes(&wire, true, 2).unwrap();
        assert_eq!(info.count(), 2);
        assert!(info.overflow());
    }

    #[test]
    fn test_limit_clamped() {
        let wire = full("/a/b", false);
        let a = hash_prefixes(&wire, true, 0).unwrap();
        let b = hash_prefixes(&wire, true, 1000).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_too_many_segments() {
        let wire = deep_name(MAX_NAME_COMPS + 3);
        let err = hash_prefixes(&wire, true, 0).unwrap_err();
        let partial = err.partial().unwrap();
        assert_eq!(partial.count(), MAX_NAME_COMPS);
        assert!(partial.overflow());

        let truncated = deep_name(MAX_NAME_COMPS);
        let expected = hash_prefixes(&truncated, true, 0).unwrap();
        assert_eq!(partial.hashes(), expected.hashes());
        assert_eq!(partial.lens(), expected.lens());
    }

    #[test]
    fn test_exactly_max_segments_is_ok() {
        let wire = deep_name(MAX_NAME_COMPS);
        let info = hash_prefixes(&wire, true, 0).unwrap();
        assert_eq!(info.count(), MAX_NAME_COMPS);
        assert!(!info.overflow());
    }

    #[test]
    fn test_chunk_after_max_is_no_space_without_overflow() {
        let mut name = Name::from_uri(&deep_uri(MAX_NAME_COMPS), false).unwrap();
        name.push(NameSegment::chunk(vec![1]));
        let wire = name.to_tlv_bytes().unwrap();
        let err = hash_prefixes(&wire, true, 0).unwrap_err();
        let partial = err.partial().unwrap();
        assert_eq!(partial.count(), MAX_NAME_COMPS);
        assert!(!partial.overflow());
    }

    #[test]
    fn test_chunk_right_after_caller_limit() {
        let mut name = Name::from_uri("/a/b", false).unwrap();
        name.push(NameSegment::chunk(vec![7]));
        let wire = name.to_tlv_bytes().unwrap();

        for strategy in [HashStrategy::Independent, HashStrategy::Cumulative] {
            let info = hash_prefixes_with(&wire, true, 2, strategy).unwrap();
            assert_eq!(info.count(), 2);
            assert!(!info.overflow());
            assert_eq!(info.full_hash(), Some(hash64(&wire)));
        }

        // A generic segment in the same place is overflow.
        let wire = full("/a/b/7", false);
        assert!(hash_prefixes(&wire, true, 2).unwrap().overflow());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            hash_prefixes(&[0, 0, 0], true, 0),
            Err(PrefixHashError::InvalidInput(_))
        ));

        // Two stray bytes after a good segment.
        let bad = [0x00, 0x01, 0x00, 0x01, b'a', 0x00, 0x01];
        assert!(matches!(
            hash_prefixes(&bad, false, 0),
            Err(PrefixHashError::InvalidInput(_))
        ));

        // Last segment claims more bytes than exist.
        let bad = [0x00, 0x01, 0x00, 0x01, b'a', 0x00, 0x01, 0x00, 0x09, b'b'];
        assert!(matches!(
            hash_prefixes(&bad, false, 0),
            Err(PrefixHashError::InvalidInput(_))
        ));

        let huge = vec![0u8; u16::MAX as usize + 1];
        assert!(hash_prefixes(&huge, false, 0).is_err());
    }

    #[test]
    fn test_strategies_agree() {
        for uri in ["/", "/a", "/ccnx/example/org/videos/clip.mp4", "a//b"] {
            let wire = full(uri, false);
            let a = hash_prefixes_with(&wire, true, 0, HashStrategy::Independent).unwrap();
            let b = hash_prefixes_with(&wire, true, 0, HashStrategy::Cumulative).unwrap();
            assert_eq!(a, b, "strategies disagree on {}", uri);
        }
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = hash_prefixes(&deep_name(40), true, 0).unwrap_err().into();
        assert!(matches!(err, Error::NoSpace { max: MAX_NAME_COMPS }));
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("Cumulative".parse::<HashStrategy>().unwrap(), HashStrategy::Cumulative);
        assert_eq!(HashStrategy::default().to_string(), "independent");
        assert!("fast".parse::<HashStrategy>().is_err());
    }
}
