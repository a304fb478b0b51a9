use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::debug;
use rust_cicn_common::{CodecConfig, HashStrategy};
use std::path::PathBuf;

mod commands;
mod utils;

/// CICN name hashing and packet codec tool
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Sets the level of verbosity
    #[clap(short, long, global = true)]
    verbose: bool,

    /// Codec configuration file (TOML, JSON or YAML)
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash every prefix of a name
    Hash {
        /// Name to hash ("/"-separated)
        name: String,

        /// Make the last segment a chunk number
        #[clap(long)]
        chunk: bool,

        /// Most prefixes to hash (0 means the engine maximum)
        #[clap(short, long)]
        limit: Option<usize>,

        /// independent or cumulative
        #[clap(short, long)]
        strategy: Option<HashStrategy>,

        /// Print JSON instead of a table
        #[clap(long)]
        json: bool,
    },

    /// Build an Interest packet for a name and print it as hex
    Encode {
        /// Name to request ("/"-separated)
        name: String,

        /// Interest lifetime in milliseconds
        #[clap(short, long, default_value = "4000")]
        lifetime: u64,

        /// Hop limit
        #[clap(long, default_value = "255")]
        hop_limit: u8,

        /// Make the last segment a chunk number
        #[clap(long)]
        chunk: bool,
    },

    /// Decode a packet
    Decode {
        /// Packet bytes as hex
        hex: Option<String>,

        /// Read raw packet bytes from a file instead
        #[clap(short, long, conflicts_with = "hex")]
        file: Option<PathBuf>,
    },

    /// FNV-1a hash of a string
    Fnv {
        /// Input string
        input: String,

        /// Hash width, 32 or 64
        #[clap(short, long, default_value = "64")]
        bits: u32,
    },

    /// Benchmark packet decoding and prefix hashing
    Benchmark {
        /// Number of packets to decode
        #[clap(short = 'n', long, default_value = "100000")]
        count: usize,

        /// Segments per name
        #[clap(short, long, default_value = "8")]
        depth: usize,

        /// Number of worker threads
        #[clap(short, long, default_value = "4")]
        workers: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        if cli.verbose { "debug" } else { "info" }
    )).init();

    let config = CodecConfig::load(cli.config.as_deref())
        .context("Failed to load codec configuration")?;
    debug!("Using {:?}", config);

    // Execute the specified command
    match cli.command {
        Commands::Hash { name, chunk, limit, strategy, json } => {
            let config = CodecConfig {
                prefix_limit: limit.unwrap_or(config.prefix_limit),
                hash_strategy: strategy.unwrap_or(config.hash_strategy),
                ..config
            };
            commands::hash::hash_name(&name, chunk, &config, json)?;
        }
        Commands::Encode { name, lifetime, hop_limit, chunk } => {
            commands::encode::encode_interest(&name, lifetime, hop_limit, chunk)?;
        }
        Commands::Decode { hex, file } => {
            commands::decode::decode_packet(hex, file, &config).await?;
        }
        Commands::Fnv { input, bits } => {
            commands::fnv::print_hash(&input, bits)?;
        }
        Commands::Benchmark { count, depth, workers } => {
            commands::benchmark::run_benchmark(count, depth, workers, &config).await?;
        }
    }

    Ok(())
}
