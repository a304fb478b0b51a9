//! Codec configuration.
//!
//! Settings come from defaults, then an optional file (any format the
//! `config` crate recognises by extension), then `CICN_*` environment
//! variables, later sources winning.

use crate::prefix_hash::{HashStrategy, MAX_NAME_COMPS};
use crate::fixed_header::CCNX_VERSION;
use crate::Result;
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for [`PacketDecoder`](crate::packet::PacketDecoder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Fixed header version the decoder accepts.
    pub supported_version: u8,

    /// Most prefixes hashed per name. 0 means the engine maximum.
    pub prefix_limit: usize,

    /// How prefix digests are computed.
    pub hash_strategy: HashStrategy,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            supported_version: CCNX_VERSION,
            prefix_limit: 0,
            hash_strategy: HashStrategy::Independent,
        }
    }
}

impl CodecConfig {
    /// Load settings, reading `path` if one is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(Environment::with_prefix("CICN"));

        let config: CodecConfig = builder.build()?.try_deserialize()?;
        log::debug!("loaded codec config: {:?}", config);
        Ok(config)
    }

    /// Prefix limit with 0 resolved to the engine maximum.
    pub fn effective_prefix_limit(&self) -> usize {
        match self.prefix_limit {
            0 => MAX_NAME_COMPS,
            n => n.min(MAX_NAME_COMPS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CodecConfig::default();
        assert_eq!(config.supported_version, 1);
        assert_eq!(config.effective_prefix_limit(), MAX_NAME_COMPS);
        assert_eq!(config.hash_strategy, HashStrategy::Independent);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "supported_version = 0").unwrap();
        writeln!(file, "hash_strategy = \"cumulative\"").unwrap();

        let config = CodecConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.supported_version, 0);
        assert_eq!(config.hash_strategy, HashStrategy::Cumulative);
        assert_eq!(config.prefix_limit, 0);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = CodecConfig::load(Some(Path::new("/nonexistent/cicn.toml"))).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_prefix_limit_clamped() {
        let config = CodecConfig {
            prefix_limit: 500,
            ..Default::default()
        };
        assert_eq!(config.effective_prefix_limit(), MAX_NAME_COMPS);
    }
}
