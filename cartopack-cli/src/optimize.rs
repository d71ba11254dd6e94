//! `optimize` command: run the area/way id optimisation stage.

use std::io::{self, BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use cartopack_core::{ImportModule, ImportParameter, LogProgress, TypeConfig};
use cartopack_data::{OptimizeAreaWayIds, OptimizeReport};
use clap::Parser;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{ARG_DESTINATION_DIR, ARG_TYPE_CONFIG, CliError, ENV_DESTINATION_DIR, ENV_TYPE_CONFIG};

/// CLI arguments for the `optimize` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Scan the merged area and way files in the destination \
                 directory, count node references from routable features and \
                 rewrite both files keeping only ids shared by at least two \
                 references. Paths can come from CLI flags, configuration \
                 files, or environment variables.",
    about = "Drop node ids not needed to join routable features"
)]
#[ortho_config(prefix = "CARTOPACK")]
pub(crate) struct OptimizeArgs {
    /// Directory holding the merged inputs; outputs are written next to them.
    #[arg(long = ARG_DESTINATION_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) destination_dir: Option<Utf8PathBuf>,
    /// JSON document defining the feature types (`{"types": [...]}`).
    #[arg(long = ARG_TYPE_CONFIG, value_name = "path")]
    #[serde(default)]
    pub(crate) type_config: Option<Utf8PathBuf>,
}

impl OptimizeArgs {
    pub(crate) fn into_config(self) -> Result<OptimizeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        OptimizeConfig::try_from(merged)
    }
}

/// Resolved `optimize` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OptimizeConfig {
    /// Directory the stage reads from and writes to.
    pub(crate) destination_dir: Utf8PathBuf,
    /// Type definition document.
    pub(crate) type_config: Utf8PathBuf,
}

impl OptimizeConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_directory(&self.destination_dir)?;
        Self::require_existing(&self.type_config, ARG_TYPE_CONFIG)?;
        let parameter = self.parameter();
        for file_name in OptimizeAreaWayIds.describe().required_files {
            Self::require_existing(&parameter.path_of(&file_name), ARG_DESTINATION_DIR)?;
        }
        Ok(())
    }

    pub(crate) fn parameter(&self) -> ImportParameter {
        ImportParameter::new(self.destination_dir.clone())
    }

    pub(crate) fn load_types(&self) -> Result<TypeConfig, CliError> {
        let file = cartopack_fs::open_input(&self.type_config).map_err(|source| {
            CliError::OpenTypeConfig {
                path: self.type_config.clone(),
                source,
            }
        })?;
        TypeConfig::from_json_reader(BufReader::new(file)).map_err(|source| {
            CliError::LoadTypeConfig {
                path: self.type_config.clone(),
                source,
            }
        })
    }

    fn require_directory(path: &Utf8Path) -> Result<(), CliError> {
        match cartopack_fs::is_directory(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::DestinationNotDirectory {
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                Err(CliError::MissingDestinationDirectory {
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field: ARG_DESTINATION_DIR,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match cartopack_fs::is_regular_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl TryFrom<OptimizeArgs> for OptimizeConfig {
    type Error = CliError;

    fn try_from(args: OptimizeArgs) -> Result<Self, Self::Error> {
        let destination_dir = args.destination_dir.ok_or(CliError::MissingArgument {
            field: ARG_DESTINATION_DIR,
            env: ENV_DESTINATION_DIR,
        })?;
        let type_config = args.type_config.ok_or(CliError::MissingArgument {
            field: ARG_TYPE_CONFIG,
            env: ENV_TYPE_CONFIG,
        })?;
        Ok(Self {
            destination_dir,
            type_config,
        })
    }
}

/// Merge configuration layers, validate inputs and run the stage.
pub(crate) fn run_optimize(args: OptimizeArgs) -> Result<OptimizeReport, CliError> {
    let config = args.into_config()?;
    run_with_config(&config)
}

pub(crate) fn run_with_config(config: &OptimizeConfig) -> Result<OptimizeReport, CliError> {
    config.validate_sources()?;
    let types = config.load_types()?;
    debug!(
        "loaded {} types from {}",
        types.len(),
        config.type_config
    );
    let mut progress = LogProgress::new();
    let report = OptimizeAreaWayIds.run(&types, &config.parameter(), &mut progress)?;
    Ok(report)
}

/// Write a human-readable summary of `report`.
pub(crate) fn write_summary<W: Write>(out: &mut W, report: &OptimizeReport) -> io::Result<()> {
    writeln!(
        out,
        "node ids: {} distinct, {} shared",
        report.distinct_ids, report.shared_ids
    )?;
    for (label, pass) in [("areas", &report.areas), ("ways", &report.ways)] {
        writeln!(
            out,
            "{label}: {} records, {} ids kept, {} ids dropped",
            pass.records, pass.ids_kept, pass.ids_dropped
        )?;
    }
    Ok(())
}
