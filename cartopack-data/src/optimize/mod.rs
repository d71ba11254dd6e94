//! Area and way node-id optimisation stage.
//!
//! Node ids are only needed downstream where routable features meet. The
//! stage scans merged areas and ways to count how often each node is
//! referenced by routable features, then rewrites both files replacing every
//! id referenced fewer than two times with 0.

mod compact;
mod error;
mod scan;
mod usage;

use cartopack_core::{
    Area, ImportModule, ImportParameter, ModuleDescription, Progress, TypeConfig, Way,
};
use log::info;

pub use compact::{Compact, IdTally, compact_file};
pub use error::OptimizeError;
pub use scan::{UsageRule, scan_file};
pub use usage::{FrozenUsage, NodeUsageCounter, UsageScan};

/// Merged areas read by the stage.
pub const AREAS_INPUT: &str = "areas2.tmp";
/// Merged ways read by the stage.
pub const WAYS_INPUT: &str = "wayway.tmp";
/// Compacted areas written by the stage.
pub const AREAS_OUTPUT: &str = "areas3.tmp";
/// Compacted ways written by the stage.
pub const WAYS_OUTPUT: &str = "ways.tmp";

/// Outcome of compacting one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Records copied.
    pub records: u32,
    /// Non-zero ids left in place.
    pub ids_kept: u64,
    /// Ids replaced with 0.
    pub ids_dropped: u64,
}

/// Outcome of a whole stage run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimizeReport {
    /// Area compaction.
    pub areas: PassReport,
    /// Way compaction.
    pub ways: PassReport,
    /// Distinct node ids referenced by routable features.
    pub distinct_ids: usize,
    /// Node ids referenced at least twice.
    pub shared_ids: usize,
}

/// Stage that drops node ids not needed to join routable features.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimizeAreaWayIds;

impl OptimizeAreaWayIds {
    /// Run the four passes: scan areas, scan ways, compact areas, compact ways.
    ///
    /// # Errors
    ///
    /// Returns the first [`OptimizeError`]; later passes are not attempted.
    pub fn optimize(
        self,
        types: &TypeConfig,
        parameter: &ImportParameter,
        progress: &mut dyn Progress,
    ) -> Result<OptimizeReport, OptimizeError> {
        let areas_in = parameter.path_of(AREAS_INPUT);
        let ways_in = parameter.path_of(WAYS_INPUT);

        let mut scan = UsageScan::new();
        scan_file::<Area>(&areas_in, types, &mut scan, progress)?;
        scan_file::<Way>(&ways_in, types, &mut scan, progress)?;
        let usage = scan.finish();
        let distinct_ids = usage.counter().len();
        let shared_ids = usage.counter().shared_len();
        progress.info(&format!(
            "{distinct_ids} distinct routable node ids, {shared_ids} shared"
        ));

        let areas = compact_file::<Area>(
            &areas_in,
            &parameter.path_of(AREAS_OUTPUT),
            types,
            &usage,
            progress,
        )?;
        let ways = compact_file::<Way>(
            &ways_in,
            &parameter.path_of(WAYS_OUTPUT),
            types,
            &usage,
            progress,
        )?;

        info!(
            "optimised {} areas and {} ways; kept {} node ids",
            areas.records,
            ways.records,
            areas.ids_kept + ways.ids_kept
        );
        Ok(OptimizeReport {
            areas,
            ways,
            distinct_ids,
            shared_ids,
        })
    }
}

impl ImportModule for OptimizeAreaWayIds {
    type Report = OptimizeReport;
    type Error = OptimizeError;

    fn describe(&self) -> ModuleDescription {
        ModuleDescription {
            name: "OptimizeAreaWayIds".to_owned(),
            description: "Optimize ids for areas and ways".to_owned(),
            required_files: vec![AREAS_INPUT.to_owned(), WAYS_INPUT.to_owned()],
            provided_files: vec![AREAS_OUTPUT.to_owned(), WAYS_OUTPUT.to_owned()],
        }
    }

    fn run(
        &self,
        types: &TypeConfig,
        parameter: &ImportParameter,
        progress: &mut dyn Progress,
    ) -> Result<OptimizeReport, OptimizeError> {
        self.optimize(types, parameter, progress).inspect_err(|err| {
            progress.error(&err.to_string());
        })
    }
}
