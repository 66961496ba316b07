use std::path::PathBuf;
use std::process::ExitStatus;

use dicom_core::header::Tag;
use dicom_core::value::ConvertValueError;
use serde::{Deserialize, Serialize};
use snafu::Snafu;

/// Why a field could not be read.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FieldError {
    #[snafu(display("Could not read DICOM file {}", path.display()))]
    OpenFile {
        path: PathBuf,
        #[snafu(source(from(dicom_object::ReadError, Box::new)))]
        source: Box<dicom_object::ReadError>,
    },

    #[snafu(display("Could not read file {}", path.display()))]
    ReadBytes {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Missing element {tag}
    MissingElement { tag: Tag },

    /// Could not convert value of element {tag}
    ConvertValue {
        tag: Tag,
        source: ConvertValueError,
    },

    /// Value {text:?} of element {tag} is not an integer
    ParseInteger { tag: Tag, text: String },

    /// Invalid tag {text:?}
    InvalidTag { text: String },

    /// Could not run {program}
    SpawnTool {
        program: String,
        source: std::io::Error,
    },

    /// {program} exited with {status}
    ToolStatus { program: String, status: ExitStatus },

    #[snafu(display("Could not use dump output file {}", path.display()))]
    DumpOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No line containing {marker:?} in dump output
    MarkerNotFound { marker: String },

    /// No slice count in dump line {line:?}
    ParseSliceCount { line: String },
}

/// Coarse classification of a [`FieldError`].
#[cfg_attr(feature = "node", napi(string_enum))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// The field is legitimately absent
    FieldMissing,
    /// The file or the value could not be decoded
    ParseFailure,
    /// The external dump tool could not be run or failed
    SubprocessFailure,
}

impl FieldError {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldError::MissingElement { .. } | FieldError::MarkerNotFound { .. } => {
                FieldKind::FieldMissing
            }
            FieldError::SpawnTool { .. }
            | FieldError::ToolStatus { .. }
            | FieldError::DumpOutput { .. } => FieldKind::SubprocessFailure,
            FieldError::OpenFile { .. }
            | FieldError::ReadBytes { .. }
            | FieldError::ConvertValue { .. }
            | FieldError::ParseInteger { .. }
            | FieldError::InvalidTag { .. }
            | FieldError::ParseSliceCount { .. } => FieldKind::ParseFailure,
        }
    }

    /// Whether the dump program is simply not installed
    pub(crate) fn is_tool_not_found(&self) -> bool {
        matches!(
            self,
            FieldError::SpawnTool { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Whether no dump listing could be produced at all: the program is not
    /// installed, or its output file cannot be written beside the input
    pub(crate) fn is_dump_unavailable(&self) -> bool {
        self.is_tool_not_found() || matches!(self, FieldError::DumpOutput { .. })
    }
}
