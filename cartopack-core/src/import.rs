//! Contract between the pipeline and its import stages.

use camino::{Utf8Path, Utf8PathBuf};

use crate::progress::Progress;
use crate::types::TypeConfig;

/// Static description of a stage and the files it consumes and produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleDescription {
    /// Stable stage name.
    pub name: String,
    /// Human-readable summary.
    pub description: String,
    /// Files the stage reads from the destination directory.
    pub required_files: Vec<String>,
    /// Files the stage writes to the destination directory.
    pub provided_files: Vec<String>,
}

/// Parameters shared by every stage of one import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportParameter {
    /// Directory holding intermediate and final files.
    pub destination_directory: Utf8PathBuf,
}

impl ImportParameter {
    /// Parameters for a run writing into `destination_directory`.
    pub fn new(destination_directory: impl Into<Utf8PathBuf>) -> Self {
        Self {
            destination_directory: destination_directory.into(),
        }
    }

    /// Path of `file_name` inside the destination directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use cartopack_core::ImportParameter;
    ///
    /// let parameter = ImportParameter::new("/tmp/build");
    /// assert_eq!(parameter.path_of("ways.tmp").as_str(), "/tmp/build/ways.tmp");
    /// ```
    #[must_use]
    pub fn path_of(&self, file_name: &str) -> Utf8PathBuf {
        self.destination_directory.join(file_name)
    }

    /// The destination directory.
    #[must_use]
    pub fn destination_directory(&self) -> &Utf8Path {
        &self.destination_directory
    }
}

/// A pipeline stage.
pub trait ImportModule {
    /// Summary returned by a successful run.
    type Report;
    /// Failure returned by an aborted run.
    type Error;

    /// Name, summary and file contract of the stage.
    fn describe(&self) -> ModuleDescription;

    /// Run the stage to completion.
    ///
    /// # Errors
    ///
    /// Implementations abort on the first failure and report it through
    /// `progress` before returning it.
    fn run(
        &self,
        types: &TypeConfig,
        parameter: &ImportParameter,
        progress: &mut dyn Progress,
    ) -> Result<Self::Report, Self::Error>;
}
