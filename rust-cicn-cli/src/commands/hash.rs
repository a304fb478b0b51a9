//! Prefix hashing command

use anyhow::{Context, Result};
use log::{debug, warn};
use rust_cicn_common::prefix_hash::{hash_prefixes_with, PrefixHashError};
use rust_cicn_common::{CodecConfig, Name, PrefixHashInfo};
use serde_json::json;

use crate::utils::print_header;

/// Hash every prefix of `name` and print the result
pub fn hash_name(name: &str, chunk: bool, config: &CodecConfig, json: bool) -> Result<()> {
    let name = Name::from_uri(name, chunk).context("Invalid name")?;
    let wire = name.to_tlv_bytes().context("Failed to encode name")?;
    debug!("Hashing {} ({} bytes, {} strategy)", name, wire.len(), config.hash_strategy);

    let info = match hash_prefixes_with(&wire, true, config.prefix_limit, config.hash_strategy) {
        Ok(info) => info,
        Err(PrefixHashError::NoSpace(info)) => {
            warn!("Name has more segments than can be hashed, showing the first {}", info.count());
            *info
        }
        Err(e) => return Err(e).context("Failed to hash name"),
    };

    if json {
        let prefixes: Vec<_> = info
            .prefix_keys()
            .map(|key| {
                json!({
                    "prefix": name.prefix(key.components as usize).to_string(),
                    "components": key.components,
                    "length": key.byte_len,
                    "hash": format!("0x{:016x}", key.hash),
                })
            })
            .collect();
        let output = json!({
            "name": name.to_string(),
            "wire": hex::encode(&wire),
            "strategy": config.hash_strategy.to_string(),
            "overflow": info.overflow(),
            "full_hash": info.full_hash().map(|h| format!("0x{:016x}", h)),
            "prefixes": prefixes,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Name: {}", name);
    println!("Wire: {}", hex::encode(&wire));
    println!("Strategy: {}", config.hash_strategy);
    print_prefixes(&name, &info);
    Ok(())
}

/// Print a table of prefix digests, shortest prefix first
pub fn print_prefixes(name: &Name, info: &PrefixHashInfo) {
    print_header(&format!("Prefixes: {}", info.count()));
    for (i, (&len, &hash)) in info.lens().iter().zip(info.hashes()).enumerate() {
        println!(
            "  {:>2}  {:<32} len {:>5}  0x{:016x}",
            i + 1,
            name.prefix(i + 1).to_string(),
            len,
            hash
        );
    }
    if info.overflow() {
        println!("  (name continues past the last hashed prefix)");
    }
    if let Some(full) = info.full_hash() {
        println!("Full name hash: 0x{:016x}", full);
    }
}
