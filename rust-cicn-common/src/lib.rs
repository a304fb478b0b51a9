//! Name hashing and CCNx TLV codec core for CICN forwarders.
//!
//! This crate provides the pieces a forwarder needs before any table lookup:
//! a bounds-checked TLV cursor, the schema v1 fixed and optional headers,
//! name segments, hash TLVs, and single-pass hashing of every prefix of a
//! name for longest-prefix match.

pub mod config;
pub mod dictionary;
pub mod error;
pub mod fixed_header;
pub mod hash;
pub mod hash_value;
pub mod metrics;
pub mod name;
pub mod optional_headers;
pub mod packet;
pub mod prefix_hash;
pub mod tlv;
pub mod tlv_name;
pub mod types;

/// Reexport of common types
pub use crate::config::CodecConfig;
pub use dictionary::PacketDictionary;
pub use error::{CodecError, CodecErrorKind, Error};
pub use name::{Name, NameSegment};
pub use packet::{DecodedPacket, PacketDecoder};
pub use prefix_hash::{hash_prefixes, HashStrategy, PrefixHashInfo, MAX_NAME_COMPS};
pub use tlv::TlvDecoder;

pub type Result<T> = std::result::Result<T, Error>;
