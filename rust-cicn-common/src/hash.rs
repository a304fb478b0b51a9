//! FNV-1a hashing over byte ranges.
//!
//! Both widths come in a cumulative form that takes the running hash as its
//! seed, so a long buffer can be hashed piecewise: hashing `a ++ b` gives the
//! same result as hashing `b` seeded with the hash of `a`. The prefix hash
//! engine and [`TlvName`](crate::tlv_name::TlvName) both depend on that.

use std::hash::{BuildHasherDefault, Hasher};

pub const FNV_OFFSET_32: u32 = 0x811C_9DC5;
pub const FNV_PRIME_32: u32 = 0x0100_0193;

pub const FNV_OFFSET_64: u64 = 0xCBF2_9CE4_8422_2325;
pub const FNV_PRIME_64: u64 = 0x0000_0100_0000_01B3;

/// 32-bit FNV-1a of `data`.
#[inline]
pub fn hash32(data: &[u8]) -> u32 {
    cumulative_hash32(data, FNV_OFFSET_32)
}

/// Continue a 32-bit FNV-1a hash from `seed`. Empty input returns `seed`.
#[inline]
pub fn cumulative_hash32(data: &[u8], seed: u32) -> u32 {
    data.iter()
        .fold(seed, |h, &b| (h ^ b as u32).wrapping_mul(FNV_PRIME_32))
}

/// 64-bit FNV-1a of `data`.
#[inline]
pub fn hash64(data: &[u8]) -> u64 {
    cumulative_hash64(data, FNV_OFFSET_64)
}

/// Continue a 64-bit FNV-1a hash from `seed`. Empty input returns `seed`.
#[inline]
pub fn cumulative_hash64(data: &[u8], seed: u64) -> u64 {
    data.iter()
        .fold(seed, |h, &b| (h ^ b as u64).wrapping_mul(FNV_PRIME_64))
}

/// [`Hasher`] adapter so FNV-1a can key the standard collections.
///
/// Prefix hashes are already FNV values; tables built over them with
/// [`FnvBuildHasher`] stay consistent with the wire-level digests.
#[derive(Debug, Clone, Copy)]
pub struct Fnv1a64(u64);

impl Fnv1a64 {
    pub fn with_seed(seed: u64) -> Self {
        Self(seed)
    }
}

impl Default for Fnv1a64 {
    fn default() -> Self {
        Self(FNV_OFFSET_64)
    }
}

impl Hasher for Fnv1a64 {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        self.0 = cumulative_hash64(bytes, self.0);
    }
}

pub type FnvBuildHasher = BuildHasherDefault<Fnv1a64>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_known_vectors() {
        // Reference values from the FNV test suite.
        assert_eq!(hash32(b""), 0x811c_9dc5);
        assert_eq!(hash32(b"a"), 0xe40c_292c);
        assert_eq!(hash32(b"foobar"), 0xbf9c_f968);

        assert_eq!(hash64(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(hash64(b"a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(hash64(b"foobar"), 0x8594_4171_f739_67e8);
    }

    #[test]
    fn test_empty_returns_seed() {
        assert_eq!(cumulative_hash32(&[], 0xdead_beef), 0xdead_beef);
        assert_eq!(cumulative_hash64(&[], 42), 42);
    }

    #[test]
    fn test_cumulative_split() {
        let data = b"/ccnx/example/content";
        for split in 0..=data.len() {
            let (a, b) = data.split_at(split);
            assert_eq!(cumulative_hash32(b, hash32(a)), hash32(data));
            assert_eq!(cumulative_hash64(b, hash64(a)), hash64(data));
        }
    }

    #[test]
    fn test_hasher_matches_free_function() {
        let mut h = Fnv1a64::default();
        h.write(b"foo");
        h.write(b"bar");
        assert_eq!(h.finish(), hash64(b"foobar"));

        let mut map: HashMap<&str, u32, FnvBuildHasher> = HashMap::default();
        map.insert("x", 1);
        assert_eq!(map.get("x"), Some(&1));
    }
}
