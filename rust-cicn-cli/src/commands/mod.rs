//! Command implementations for the CICN CLI

pub mod benchmark;
pub mod decode;
pub mod encode;
pub mod fnv;
pub mod hash;
