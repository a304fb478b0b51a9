//! Lookup keys derived from prefix hashes.
//!
//! Forwarding tables key on the 64-bit prefix digest plus enough length
//! information to make collisions between prefixes of different depth
//! impossible. The table implementations themselves live elsewhere.

use crate::hash::hash64;
use crate::prefix_hash::PrefixHashInfo;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key for a longest-prefix-match table (FIB).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrefixKey {
    /// `hash64` of the prefix's segment bytes.
    pub hash: u64,
    /// Number of segments in the prefix.
    pub components: u16,
    /// Encoded length of the prefix's segments.
    pub byte_len: u16,
}

impl PrefixKey {
    /// Key for a standalone segment region, e.g. a route being installed.
    /// `None` if the region is longer than a TLV length can express.
    pub fn for_segments(segments: &[u8], components: u16) -> Option<Self> {
        let byte_len = u16::try_from(segments.len()).ok()?;
        Some(Self {
            hash: hash64(segments),
            components,
            byte_len,
        })
    }
}

impl fmt::Display for PrefixKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrefixKey({:016x}/{})", self.hash, self.components)
    }
}

/// Key for an exact-match table (PIT, content store).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameKey {
    /// `hash64` of the full Name TLV.
    pub hash: u64,
    pub byte_len: u16,
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameKey({:016x})", self.hash)
    }
}

impl PrefixHashInfo {
    /// Keys for every hashed prefix, longest first, in LPM probe order.
    pub fn prefix_keys(&self) -> impl Iterator<Item = PrefixKey> + '_ {
        self.hashes()
            .iter()
            .zip(self.lens())
            .enumerate()
            .rev()
            .map(|(i, (&hash, &byte_len))| PrefixKey {
                hash,
                components: (i + 1) as u16,
                byte_len,
            })
    }

    /// Exact-match key, present when a full name was hashed.
    pub fn name_key(&self) -> Option<NameKey> {
        self.full_hash().map(|hash| NameKey {
            hash,
            byte_len: (self.pfx_offset() + self.pfx_len()) as u16,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::Name;
    use crate::prefix_hash::hash_prefixes;
    use std::collections::HashMap;

    #[test]
    fn test_prefix_keys_longest_first() {
        let wire = Name::from_uri("/a/b/c", false).unwrap().to_tlv_bytes().unwrap();
        let info = hash_prefixes(&wire, true, 0).unwrap();

        let keys: Vec<PrefixKey> = info.prefix_keys().collect();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0].components, 3);
        assert_eq!(keys[2].components, 1);
        assert_eq!(keys[2].byte_len, 5);
    }

    #[test]
    fn test_route_lookup() {
        // Install /a/b as a route, then look up /a/b/c/d.
        let route = Name::from_uri("/a/b", false).unwrap().to_tlv_bytes().unwrap();
        let mut fib = HashMap::new();
        fib.insert(PrefixKey::for_segments(&route[4..], 2).unwrap(), "face-7");

        let wire = Name::from_uri("/a/b/c/d", false).unwrap().to_tlv_bytes().unwrap();
        let info = hash_prefixes(&wire, true, 0).unwrap();
        let hit = info.prefix_keys().find_map(|k| fib.get(&k));
        assert_eq!(hit, Some(&"face-7"));
    }

    #[test]
    fn test_oversized_route_has_no_key() {
        let segments = vec![0u8; u16::MAX as usize + 1];
        assert!(PrefixKey::for_segments(&segments, 1).is_none());

        let key = PrefixKey::for_segments(&segments[..u16::MAX as usize], 1).unwrap();
        assert_eq!(key.byte_len, u16::MAX);
    }

    #[test]
    fn test_name_key() {
        let wire = Name::from_uri("/x", false).unwrap().to_tlv_bytes().unwrap();
        let info = hash_prefixes(&wire, true, 0).unwrap();
        let key = info.name_key().unwrap();
        assert_eq!(key.hash, hash64(&wire));
        assert_eq!(key.byte_len as usize, wire.len());

        let info = hash_prefixes(&wire[4..], false, 0).unwrap();
        assert!(info.name_key().is_none());
    }
}
