//! Packet decoding command

use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use log::info;
use rust_cicn_common::{CodecConfig, DecodedPacket, PacketDecoder};
use std::path::PathBuf;

use super::hash::print_prefixes;
use crate::utils::{format_bytes, parse_hex, print_header};

/// Decode a packet given as hex, or read raw from `file`, and print its contents
pub async fn decode_packet(hex: Option<String>, file: Option<PathBuf>, config: &CodecConfig) -> Result<()> {
    let bytes = match (hex, file) {
        (Some(hex), _) => parse_hex(&hex)?,
        (None, Some(path)) => tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => return Err(anyhow!("Either a hex packet or --file is required")),
    };
    info!("Decoding {}", format_bytes(bytes.len() as u64));

    let mut decoder = PacketDecoder::new(config.clone());
    let packet = decoder
        .decode(Bytes::from(bytes))
        .context("Failed to decode packet")?;

    print_packet(&packet);
    Ok(())
}

fn print_packet(packet: &DecodedPacket) {
    let dict = &packet.dictionary;

    print_header("Fixed header");
    if let Some(header) = packet.header() {
        println!("  Version:       {}", header.version);
        println!("  Packet type:   {}", header.packet_type);
        println!("  Packet length: {}", header.packet_length);
        println!("  Hop limit:     {}", header.hop_limit);
        println!("  Return code:   {}", header.return_code);
        println!("  Flags:         0x{:02x}", header.flags);
        println!("  Header length: {}", header.header_length);
    }

    print_header("Optional headers");
    if let Some(lifetime) = dict.interest_lifetime() {
        println!("  Interest lifetime: {} ms", lifetime);
    }
    if let Some(cache_time) = dict.recommended_cache_time() {
        println!("  Recommended cache time: {}", cache_time);
    }
    if let Some(label) = dict.path_label() {
        println!("  Path label: 0x{:x}", label);
    }
    if let Some(fragment) = dict.interest_fragment() {
        println!("  Interest fragment: {}", hex::encode(fragment));
    }
    if let Some(fragment) = dict.object_fragment() {
        println!("  Content object fragment: {}", hex::encode(fragment));
    }
    for (tlv_type, value) in dict.custom_headers() {
        println!("  Custom 0x{:04x}: {}", tlv_type, hex::encode(value));
    }

    print_header(&format!("Message: {}", packet.message_type));
    match (&packet.name, &packet.prefixes) {
        (Some(name), Some(info)) => {
            println!("Name: {}", name);
            print_prefixes(name, info);
        }
        _ => println!("No name"),
    }
    for field in &packet.fields {
        println!("  Field 0x{:04x}: {}", field.tlv_type, hex::encode(&field.value));
    }
    for element in &packet.validation {
        println!("  Validation 0x{:04x}: {}", element.tlv_type, hex::encode(&element.value));
    }
}
