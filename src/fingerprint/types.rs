use serde::Deserialize;
use std::collections::BTreeMap;

/// Measured size of one built asset, as reported by the size reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AssetSize {
    /// Size on disk in bytes
    pub raw: u64,
    /// Gzip-compressed size in bytes
    pub gzip: u64,
}

/// Per-file size snapshot for one branch at one point in time.
///
/// Keyed by the literal file paths the size reporter emitted for the
/// configured glob patterns.
pub type Fingerprint = BTreeMap<String, AssetSize>;

/// Signed per-file byte change between two fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeDelta {
    pub raw: i64,
    pub gzip: i64,
}

/// Per-file size changes, keyed by the head fingerprint's file set.
pub type Delta = BTreeMap<String, SizeDelta>;

/// Classification of a file's raw-size change against the reporting
/// threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Bigger,
    Smaller,
    Unchanged,
}
