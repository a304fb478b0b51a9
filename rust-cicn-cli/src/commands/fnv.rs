//! FNV-1a hashing of a raw string

use anyhow::{bail, Result};
use rust_cicn_common::hash::{hash32, hash64};

/// Print the FNV-1a digest of `input` at the requested width
pub fn print_hash(input: &str, bits: u32) -> Result<()> {
    match bits {
        32 => println!("0x{:08x}", hash32(input.as_bytes())),
        64 => println!("0x{:016x}", hash64(input.as_bytes())),
        other => bail!("Unsupported hash width {}, expected 32 or 64", other),
    }
    Ok(())
}
