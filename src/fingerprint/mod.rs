pub mod types;

pub use types::{AssetSize, Bucket, Delta, Fingerprint, SizeDelta};

use tracing::debug;

/// Raw-size change (in bytes) a file must exceed before it is reported as
/// bigger or smaller rather than unchanged.
pub const REPORT_THRESHOLD_BYTES: i64 = 2000;

impl Bucket {
    /// Classify a raw byte delta. The threshold is exclusive on both sides:
    /// a delta of exactly ±2000 bytes still counts as unchanged.
    pub fn classify(raw_delta: i64) -> Bucket {
        if raw_delta > REPORT_THRESHOLD_BYTES {
            Bucket::Bigger
        } else if raw_delta < -REPORT_THRESHOLD_BYTES {
            Bucket::Smaller
        } else {
            Bucket::Unchanged
        }
    }
}

/// Copy a fingerprint into fresh storage, entry by entry.
///
/// Downstream code only ever sees maps built here, independent of whatever
/// the reporter's JSON deserialized into.
pub fn normalize_fingerprint(fingerprint: &Fingerprint) -> Fingerprint {
    fingerprint
        .iter()
        .map(|(file, size)| (file.clone(), *size))
        .collect()
}

/// Diff two fingerprints into per-file byte deltas.
///
/// The result is keyed exactly by `head`'s file set. A file absent from
/// `base` is treated as newly added and reported at its full size. Files
/// present only in `base` (deleted on the head branch) are not represented
/// in the delta.
pub fn diff_sizes(base: &Fingerprint, head: &Fingerprint) -> Delta {
    let delta: Delta = head
        .iter()
        .map(|(file, head_size)| {
            let entry = match base.get(file) {
                None => SizeDelta {
                    raw: head_size.raw as i64,
                    gzip: head_size.gzip as i64,
                },
                Some(base_size) => SizeDelta {
                    raw: head_size.raw as i64 - base_size.raw as i64,
                    gzip: head_size.gzip as i64 - base_size.gzip as i64,
                },
            };
            (file.clone(), entry)
        })
        .collect();

    let deleted = base.keys().filter(|file| !head.contains_key(*file)).count();
    if deleted > 0 {
        debug!(count = deleted, "files present only on the base branch are not reported");
    }

    delta
}
