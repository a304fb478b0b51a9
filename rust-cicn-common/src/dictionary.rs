//! Decoded packet fields.
//!
//! Decoders write what they find into a [`PacketDictionary`]; readers use the
//! getters in [`fixed_header`](crate::fixed_header) and
//! [`optional_headers`](crate::optional_headers), which return `None` for
//! anything that was absent or failed validation.

use crate::fixed_header::FixedHeader;
use bytes::Bytes;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacketDictionary {
    pub(crate) fixed_header: Option<FixedHeader>,
    // Kept outside `fixed_header`: these are recorded even when the header
    // fails validation.
    pub(crate) hop_limit: Option<u8>,
    pub(crate) return_code: Option<u8>,

    pub(crate) interest_lifetime: Option<u64>,
    pub(crate) recommended_cache_time: Option<u64>,
    pub(crate) path_label: Option<u64>,
    pub(crate) interest_fragment: Option<Bytes>,
    pub(crate) object_fragment: Option<Bytes>,
    pub(crate) custom_headers: BTreeMap<u16, Bytes>,
}

impl PacketDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything, keeping the custom header map's allocation.
    pub fn clear(&mut self) {
        self.fixed_header = None;
        self.hop_limit = None;
        self.return_code = None;
        self.interest_lifetime = None;
        self.recommended_cache_time = None;
        self.path_label = None;
        self.interest_fragment = None;
        self.object_fragment = None;
        self.custom_headers.clear();
    }
}
