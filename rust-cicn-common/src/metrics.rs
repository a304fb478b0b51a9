//! Decode statistics.
//!
//! Every worker owns its own [`DecodeStats`] and bumps plain integers; a
//! reader that wants totals sums the per-worker copies with
//! [`DecodeStats::merge`] or `Iterator::sum`. Nothing here is shared
//! between threads while counting.

use crate::error::Error;
use crate::fixed_header::PacketType;
use crate::prefix_hash::PrefixHashInfo;
use serde::Serialize;
use std::iter::Sum;
use std::ops::AddAssign;

/* ---------------------------------------------------------------- *
 * Histogram
 * ---------------------------------------------------------------- */

/// Bucketed counts of small integer observations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Histogram {
    boundaries: Vec<u64>,
    buckets: Vec<u64>,
    overflow: u64,
    sum: u64,
    count: u64,
}

impl Histogram {
    /// `boundaries` are inclusive upper bounds, ascending.
    pub fn new(boundaries: Vec<u64>) -> Self {
        Self {
            buckets: vec![0; boundaries.len()],
            boundaries,
            overflow: 0,
            sum: 0,
            count: 0,
        }
    }

    pub fn observe(&mut self, value: u64) {
        self.sum += value;
        self.count += 1;

        match self.boundaries.iter().position(|&b| value <= b) {
            Some(idx) => self.buckets[idx] += 1,
            None => self.overflow += 1,
        }
    }

    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum as f64 / self.count as f64
        }
    }

    pub fn counts(&self) -> Vec<(u64, u64)> {
        self.boundaries
            .iter()
            .copied()
            .zip(self.buckets.iter().copied())
            .collect()
    }

    /// Observations above the last boundary.
    pub fn overflow(&self) -> u64 {
        self.overflow
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn sum(&self) -> u64 {
        self.sum
    }

    /// Fold `other` into `self`. Both must share boundaries; if they do not,
    /// `other`'s bucket detail is dropped and only its totals are kept.
    pub fn merge(&mut self, other: &Histogram) {
        if self.boundaries == other.boundaries {
            for (a, b) in self.buckets.iter_mut().zip(&other.buckets) {
                *a += b;
            }
            self.overflow += other.overflow;
        } else {
            self.overflow += other.count;
        }
        self.sum += other.sum;
        self.count += other.count;
    }
}

/// Name depth buckets: 0, 1, 2, 4, 8, 16 and 32 prefixes.
fn depth_histogram() -> Histogram {
    Histogram::new(vec![0, 1, 2, 4, 8, 16, 32])
}

/* ---------------------------------------------------------------- *
 * Per-worker decode counters
 * ---------------------------------------------------------------- */

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodeStats {
    pub packets: u64,
    pub bytes: u64,
    pub interests: u64,
    pub content_objects: u64,
    pub other_packets: u64,
    /// Malformed TLV structure.
    pub structural_errors: u64,
    /// Well formed but invalid (bad version, inconsistent lengths, bad hash size).
    pub validation_errors: u64,
    pub names_hashed: u64,
    pub prefixes_hashed: u64,
    /// Names with more segments than the prefix limit.
    pub name_overflows: u64,
    pub name_depth: Histogram,
}

impl Default for DecodeStats {
    fn default() -> Self {
        Self {
            packets: 0,
            bytes: 0,
            interests: 0,
            content_objects: 0,
            other_packets: 0,
            structural_errors: 0,
            validation_errors: 0,
            names_hashed: 0,
            prefixes_hashed: 0,
            name_overflows: 0,
            name_depth: depth_histogram(),
        }
    }
}

impl DecodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a successfully decoded packet of `len` bytes.
    pub fn record_packet(&mut self, packet_type: PacketType, len: usize) {
        self.packets += 1;
        self.bytes += len as u64;
        match packet_type {
            PacketType::Interest => self.interests += 1,
            PacketType::ContentObject => self.content_objects += 1,
            _ => self.other_packets += 1,
        }
    }

    pub fn record_prefixes(&mut self, info: &PrefixHashInfo) {
        self.names_hashed += 1;
        self.prefixes_hashed += info.count() as u64;
        if info.overflow() {
            self.name_overflows += 1;
        }
        self.name_depth.observe(info.count() as u64);
    }

    pub fn record_error(&mut self, error: &Error) {
        match error {
            Error::Tlv(e) if e.is_validation() => self.validation_errors += 1,
            _ => self.structural_errors += 1,
        }
    }

    pub fn errors(&self) -> u64 {
        self.structural_errors + self.validation_errors
    }

    /// Fraction of attempted decodes that failed.
    pub fn error_rate(&self) -> f64 {
        let attempts = self.packets + self.errors();
        if attempts == 0 {
            0.0
        } else {
            self.errors() as f64 / attempts as f64
        }
    }

    pub fn merge(&mut self, other: &DecodeStats) {
        self.packets += other.packets;
        self.bytes += other.bytes;
        self.interests += other.interests;
        self.content_objects += other.content_objects;
        self.other_packets += other.other_packets;
        self.structural_errors += other.structural_errors;
        self.validation_errors += other.validation_errors;
        self.names_hashed += other.names_hashed;
        self.prefixes_hashed += other.prefixes_hashed;
        self.name_overflows += other.name_overflows;
        self.name_depth.merge(&other.name_depth);
    }
}

impl AddAssign<&DecodeStats> for DecodeStats {
    fn add_assign(&mut self, other: &DecodeStats) {
        self.merge(other);
    }
}

impl Sum for DecodeStats {
    fn sum<I: Iterator<Item = DecodeStats>>(iter: I) -> Self {
        iter.fold(DecodeStats::default(), |mut acc, s| {
            acc += &s;
            acc
        })
    }
}

impl<'a> Sum<&'a DecodeStats> for DecodeStats {
    fn sum<I: Iterator<Item = &'a DecodeStats>>(iter: I) -> Self {
        iter.fold(DecodeStats::default(), |mut acc, s| {
            acc += s;
            acc
        })
    }
}
