//! Error types for the CICN codec core.

use thiserror::Error;

/// What went wrong while reading or writing wire data.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecErrorKind {
    /// Generic decode failure (short read on a fixed-width field).
    #[error("decode error")]
    Decode,
    /// Fewer bytes remain than a TLV header needs.
    #[error("TLV header underrun")]
    Underrun,
    /// A TLV value runs past the end of its container.
    #[error("TLV value overruns container")]
    Overrun,
    /// A typed read found a different TLV type.
    #[error("unexpected TLV type")]
    TypeMismatch,
    /// A typed read found a TLV of the wrong length.
    #[error("unexpected TLV length")]
    LengthMismatch,
    /// Fixed header carries an unsupported version.
    #[error("unsupported packet version")]
    Version,
    /// Fixed header packet length is below the 8 byte minimum.
    #[error("packet length shorter than fixed header")]
    PacketLengthTooShort,
    /// Fixed header header length is below the 8 byte minimum.
    #[error("header length shorter than fixed header")]
    HeaderLengthTooShort,
    /// Fixed header packet length is smaller than its header length.
    #[error("packet length shorter than header length")]
    PacketLengthShorterThanHeader,
    /// A hash TLV carries a digest of the wrong size for its type.
    #[error("invalid hash length")]
    InvalidHashLength,
    /// An encoder was handed a value it cannot put on the wire.
    #[error("missing mandatory element")]
    MissingMandatory,
}

/// A codec failure together with the buffer offset it was detected at.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[error("{kind} at offset {position}")]
pub struct CodecError {
    kind: CodecErrorKind,
    position: usize,
}

impl CodecError {
    pub fn new(kind: CodecErrorKind, position: usize) -> Self {
        Self { kind, position }
    }

    pub fn kind(&self) -> CodecErrorKind {
        self.kind
    }

    /// Offset into the buffer being decoded (or encoded) when the error was raised.
    pub fn position(&self) -> usize {
        self.position
    }

    /// True for malformed-TLV errors, as opposed to semantic validation failures.
    pub fn is_structural(&self) -> bool {
        matches!(
            self.kind,
            CodecErrorKind::Decode
                | CodecErrorKind::Underrun
                | CodecErrorKind::Overrun
                | CodecErrorKind::TypeMismatch
                | CodecErrorKind::LengthMismatch
        )
    }

    pub fn is_validation(&self) -> bool {
        !self.is_structural()
    }
}

/// All possible errors that can occur within the CICN codec core.
#[derive(Error, Debug)]
pub enum Error {
    /// Error related to TLV encoding/decoding.
    #[error("TLV error: {0}")]
    Tlv(#[from] CodecError),

    /// Caller handed in something the operation cannot work with.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A name had more components than the prefix hash engine can record.
    #[error("name exceeds {max} hashable components")]
    NoSpace { max: usize },

    /// Error related to CCNx packet processing.
    #[error("CCNx packet error: {0}")]
    Packet(String),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let e = CodecError::new(CodecErrorKind::Overrun, 12);
        assert!(e.is_structural());
        assert!(!e.is_validation());

        let e = CodecError::new(CodecErrorKind::Version, 0);
        assert!(e.is_validation());
    }

    #[test]
    fn test_display_includes_offset() {
        let e = CodecError::new(CodecErrorKind::Underrun, 7);
        assert_eq!(e.to_string(), "TLV header underrun at offset 7");

        assert_eq!(
            CodecError::new(CodecErrorKind::InvalidHashLength, 12).to_string(),
            "invalid hash length at offset 12"
        );

        let wrapped: Error = e.into();
        assert_eq!(wrapped.to_string(), "TLV error: TLV header underrun at offset 7");
    }
}
