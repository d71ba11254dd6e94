//! Second pass: rewrite records keeping only ids of shared nodes.

use camino::Utf8Path;
use cartopack_core::{Area, CodecMode, Id, Progress, TypeConfig, Way};
use log::debug;

use super::scan::file_label;
use super::usage::FrozenUsage;
use super::{OptimizeError, PassReport};
use crate::datafile::{Record, create_writer, finish_writer, open_reader};

/// Ids kept and dropped while compacting one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdTally {
    /// Non-zero ids left in place.
    pub kept: u64,
    /// Ids replaced with 0.
    pub dropped: u64,
}

impl IdTally {
    fn add(self, other: Self) -> Self {
        Self {
            kept: self.kept + other.kept,
            dropped: self.dropped + other.dropped,
        }
    }
}

/// Zeroing of ids that do not mark shared nodes.
pub trait Compact {
    /// Replace every id `usage` does not keep with 0.
    fn compact(&mut self, usage: &FrozenUsage) -> IdTally;
}

impl Compact for Area {
    fn compact(&mut self, usage: &FrozenUsage) -> IdTally {
        self.rings
            .iter_mut()
            .map(|ring| strip_ids(&mut ring.ids, usage))
            .fold(IdTally::default(), IdTally::add)
    }
}

impl Compact for Way {
    fn compact(&mut self, usage: &FrozenUsage) -> IdTally {
        strip_ids(&mut self.ids, usage)
    }
}

fn strip_ids(ids: &mut [Id], usage: &FrozenUsage) -> IdTally {
    let mut tally = IdTally::default();
    for id in ids.iter_mut().filter(|id| **id != 0) {
        if usage.keeps(*id) {
            tally.kept += 1;
        } else {
            *id = 0;
            tally.dropped += 1;
        }
    }
    tally
}

/// Copy `input` to `output`, zeroing ids `usage` does not keep.
///
/// Records are re-read in import mode and written back in import mode, so
/// types, attributes, roles and geometry are copied unchanged.
///
/// # Errors
///
/// Returns an [`OptimizeError`] naming the failing file; a partially
/// written output may remain on disk.
pub fn compact_file<F: Record + Compact>(
    input: &Utf8Path,
    output: &Utf8Path,
    types: &TypeConfig,
    usage: &FrozenUsage,
    progress: &mut dyn Progress,
) -> Result<PassReport, OptimizeError> {
    progress.set_action(&format!(
        "Copying from '{}' to '{}'",
        file_label(input),
        file_label(output)
    ));
    let mut reader = open_reader(input)?;
    let mut writer = create_writer(output)?;
    let total = reader.total();
    let mut tally = IdTally::default();

    loop {
        let next = reader
            .next_record::<F>(types, CodecMode::Import)
            .map_err(|source| OptimizeError::Decode {
                path: input.to_owned(),
                record: reader.position() + 1,
                source,
            })?;
        let Some((header, mut record)) = next else {
            break;
        };
        progress.set_progress(u64::from(reader.position()), u64::from(total));
        tally = tally.add(record.compact(usage));
        writer
            .write_record(header, &record, types, CodecMode::Import)
            .map_err(|source| OptimizeError::Encode {
                path: output.to_owned(),
                record: reader.position(),
                source,
            })?;
    }

    let written = writer.written();
    if written != total {
        return Err(OptimizeError::CountMismatch {
            path: output.to_owned(),
            expected: total,
            found: written,
        });
    }
    finish_writer(writer, output)?;
    debug!(
        "compacted {written} {} records into {output}: {} ids kept, {} dropped",
        F::KIND,
        tally.kept,
        tally.dropped
    );
    Ok(PassReport {
        records: written,
        ids_kept: tally.kept,
        ids_dropped: tally.dropped,
    })
}
