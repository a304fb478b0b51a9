//! Interest encoding command

use anyhow::{Context, Result};
use log::debug;
use rust_cicn_common::fixed_header::PacketType;
use rust_cicn_common::packet::{encode_packet, MessageType};
use rust_cicn_common::{Name, PacketDictionary};

/// Build an Interest for `name` and print the packet as hex
pub fn encode_interest(name: &str, lifetime: u64, hop_limit: u8, chunk: bool) -> Result<()> {
    let name = Name::from_uri(name, chunk).context("Invalid name")?;

    let mut headers = PacketDictionary::new();
    headers.set_interest_lifetime(lifetime);
    headers.set_hop_limit(hop_limit);

    let packet = encode_packet(PacketType::Interest, MessageType::Interest, &headers, &name, &[])
        .context("Failed to encode interest")?;
    debug!("Encoded {} as {} bytes", name, packet.len());

    println!("{}", hex::encode(&packet));
    Ok(())
}
