//! First pass: count how often routable features reference each node.

use std::collections::HashSet;

use camino::Utf8Path;
use cartopack_core::{Area, CodecMode, Id, Progress, TypeConfig, Way};
use log::debug;

use super::OptimizeError;
use super::usage::UsageScan;
use crate::datafile::{Record, open_reader};

/// How a record contributes to node usage counts.
pub trait UsageRule {
    /// Mark the node ids this record references.
    fn mark_usage(&self, usage: &mut UsageScan);
}

impl UsageRule for Area {
    /// Every routable ring counts each of its distinct ids once.
    fn mark_usage(&self, usage: &mut UsageScan) {
        for ring in self.rings.iter().filter(|ring| ring.type_info.can_route) {
            mark_distinct(usage, &ring.ids);
        }
    }
}

impl UsageRule for Way {
    /// A routable way counts each distinct id once; the shared endpoint of a
    /// closed way is marked again so it always survives compaction.
    fn mark_usage(&self, usage: &mut UsageScan) {
        if !self.type_info.can_route {
            return;
        }
        mark_distinct(usage, &self.ids);
        if self.is_closed()
            && let Some(&endpoint) = self.ids.first()
        {
            usage.mark(endpoint);
        }
    }
}

fn mark_distinct(usage: &mut UsageScan, ids: &[Id]) {
    let mut seen = HashSet::with_capacity(ids.len());
    for &id in ids {
        if id != 0 && seen.insert(id) {
            usage.mark(id);
        }
    }
}

/// Feed every record of `path` into `usage`, returning the record count.
///
/// # Errors
///
/// Returns [`OptimizeError::Open`] or [`OptimizeError::Decode`].
pub fn scan_file<F: Record + UsageRule>(
    path: &Utf8Path,
    types: &TypeConfig,
    usage: &mut UsageScan,
    progress: &mut dyn Progress,
) -> Result<u32, OptimizeError> {
    progress.set_action(&format!("Scanning ids from '{}'", file_label(path)));
    let mut reader = open_reader(path)?;
    let total = reader.total();
    loop {
        let next = reader
            .next_record::<F>(types, CodecMode::Import)
            .map_err(|source| OptimizeError::Decode {
                path: path.to_owned(),
                record: reader.position() + 1,
                source,
            })?;
        let Some((_, record)) = next else {
            break;
        };
        progress.set_progress(u64::from(reader.position()), u64::from(total));
        record.mark_usage(usage);
    }
    debug!(
        "scanned {total} {} records from {path}; {} distinct ids so far",
        F::KIND,
        usage.counter().len()
    );
    Ok(total)
}

pub(crate) fn file_label(path: &Utf8Path) -> &str {
    path.file_name().unwrap_or(path.as_str())
}
