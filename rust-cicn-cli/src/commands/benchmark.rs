//! Benchmarking command implementation for the CICN CLI

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use futures::future::join_all;
use log::{debug, info};
use rust_cicn_common::fixed_header::PacketType;
use rust_cicn_common::metrics::DecodeStats;
use rust_cicn_common::packet::{encode_packet, MessageType};
use rust_cicn_common::{CodecConfig, Name, NameSegment, PacketDecoder, PacketDictionary};
use std::sync::Arc;

use crate::utils::{format_bytes, format_duration, print_header, Timer};

/// Decode `count` generated Interests across `workers` threads and report throughput
pub async fn run_benchmark(count: usize, depth: usize, workers: usize, config: &CodecConfig) -> Result<()> {
    if workers == 0 {
        bail!("At least one worker is required");
    }
    info!(
        "Running benchmark: count={}, depth={}, workers={}",
        count, depth, workers
    );

    print_header("CICN decode benchmark");
    println!("Parameters:");
    println!("  Packets: {}", count);
    println!("  Name depth: {}", depth);
    println!("  Workers: {}", workers);
    println!("  Strategy: {}", config.hash_strategy);

    let packets = Arc::new(build_packets(count, depth)?);
    let timer = Timer::new("decode benchmark");

    // Split the packets into one contiguous batch per worker
    let batch_size = std::cmp::max(1, (count + workers - 1) / workers);
    let mut tasks = Vec::new();

    for batch_index in 0..workers {
        let start_index = batch_index * batch_size;
        if start_index >= count {
            break;
        }
        let end_index = std::cmp::min(count, start_index + batch_size);

        let packets = Arc::clone(&packets);
        let config = config.clone();
        tasks.push(tokio::task::spawn_blocking(move || {
            let mut decoder = PacketDecoder::new(config);
            for packet in &packets[start_index..end_index] {
                // Failures are counted in the decoder's stats
                let _ = decoder.decode(packet.clone());
            }
            debug!("Worker {} decoded {} packets", batch_index, end_index - start_index);
            decoder.take_stats()
        }));
    }

    let mut stats = DecodeStats::new();
    for result in join_all(tasks).await {
        stats += &result.context("Benchmark worker panicked")?;
    }
    let elapsed = timer.elapsed();
    drop(timer);

    print_results(&stats, elapsed);
    Ok(())
}

/// Interests named `/bench/c1/.../c{depth-2}/{i}`, with the last segment a chunk
fn build_packets(count: usize, depth: usize) -> Result<Vec<Bytes>> {
    let mut headers = PacketDictionary::new();
    headers.set_interest_lifetime(4000);

    let mut prefix = Name::new();
    for i in 0..depth.saturating_sub(1) {
        if i == 0 {
            prefix.push(NameSegment::generic("bench"));
        } else {
            prefix.push(NameSegment::generic(format!("c{}", i)));
        }
    }

    (0..count)
        .map(|i| {
            let mut name = prefix.clone();
            if depth > 0 {
                name.push(NameSegment::chunk((i as u32).to_be_bytes().to_vec()));
            }
            encode_packet(PacketType::Interest, MessageType::Interest, &headers, &name, &[])
                .context("Failed to build benchmark packet")
        })
        .collect()
}

fn print_results(stats: &DecodeStats, elapsed: std::time::Duration) {
    let secs = elapsed.as_secs_f64().max(f64::EPSILON);

    print_header("Benchmark Results");
    println!("Packets decoded: {}", stats.packets);
    println!("Errors: {} ({:.2}%)", stats.errors(), stats.error_rate() * 100.0);
    println!("Bytes: {}", format_bytes(stats.bytes));
    println!("Prefixes hashed: {}", stats.prefixes_hashed);
    println!("Average name depth: {:.2}", stats.name_depth.average());
    println!("Total time: {}", format_duration(elapsed));
    println!("Throughput: {:.0} packets/s", stats.packets as f64 / secs);
}
