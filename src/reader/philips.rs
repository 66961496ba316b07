//! Philips StackNumberOfSlices.
//!
//! The element lives inside the private stack sequence (2001,105F), so the
//! count is taken from a `dcmdump` listing of the file. When no listing can be
//! produced (no dump program installed, or a read-only directory) the data set
//! is searched in-process instead.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt};
use tracing::debug;
use uuid::Uuid;

use crate::reader::{
    or_default, DumpOutputSnafu, FieldError, MarkerNotFoundSnafu, MissingElementSnafu,
    ParseSliceCountSnafu, SpawnToolSnafu, ToolStatusSnafu,
};
use crate::utils::dicom_tags::PHILIPS_STACK_NUMBER_OF_SLICES;
use crate::utils::{element_int, find_nested, open_dataset};

pub const DEFAULT_DUMP_PROGRAM: &str = "dcmdump";
pub const DEFAULT_SLICE_MARKER: &str = "StackNumberOfSlices";
/// Overrides [`DEFAULT_DUMP_PROGRAM`] when no program is configured
pub const DUMP_PROGRAM_ENV: &str = "DCMREADER_DCMDUMP";
pub const DEFAULT_NUMBER_OF_SLICES_PHILIPS: i32 = 0;

/// Configuration of the external dump fallback
#[cfg_attr(feature = "node", napi(object))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DumpToolOptions {
    /// Dump program (default `dcmdump`, or `$DCMREADER_DCMDUMP`)
    pub program: Option<String>,
    /// Arguments passed before the file path
    pub args: Option<Vec<String>>,
    /// Text identifying the slice count line (default `StackNumberOfSlices`)
    pub marker: Option<String>,
    /// Search the data set in-process when the program is not installed (default true)
    pub native_fallback: Option<bool>,
}

impl DumpToolOptions {
    fn program(&self) -> String {
        self.program
            .clone()
            .or_else(|| std::env::var(DUMP_PROGRAM_ENV).ok())
            .unwrap_or_else(|| DEFAULT_DUMP_PROGRAM.to_string())
    }

    fn marker(&self) -> &str {
        self.marker.as_deref().unwrap_or(DEFAULT_SLICE_MARKER)
    }

    fn native_fallback(&self) -> bool {
        self.native_fallback.unwrap_or(true)
    }
}

/// Dump output file placed beside the input, removed on drop
struct DumpFile {
    path: PathBuf,
}

impl DumpFile {
    fn beside(input: &Path) -> Self {
        let dir = input
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        DumpFile {
            path: dir.join(format!(".dcmreader-{}.txt", Uuid::new_v4())),
        }
    }
}

impl Drop for DumpFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!("Could not remove {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Philips StackNumberOfSlices taken from the dump listing
pub fn try_number_of_slices_philips(
    path: impl AsRef<Path>,
    options: &DumpToolOptions,
) -> Result<i32, FieldError> {
    let path = path.as_ref();
    let err = match dump_slice_count(path, options) {
        Ok(count) => return Ok(count),
        Err(e) => e,
    };

    if err.is_dump_unavailable() && options.native_fallback() {
        debug!("{}, searching {} in-process", err, path.display());
        let obj = open_dataset(path)?;
        let elem = find_nested(&obj, PHILIPS_STACK_NUMBER_OF_SLICES).context(
            MissingElementSnafu {
                tag: PHILIPS_STACK_NUMBER_OF_SLICES,
            },
        )?;
        return element_int(elem, PHILIPS_STACK_NUMBER_OF_SLICES);
    }
    Err(err)
}

/// Philips slice count with default options, `0` if unavailable
pub fn get_number_of_slices_philips(path: impl AsRef<Path>) -> i32 {
    let path = path.as_ref();
    or_default(
        path,
        "NumberOfSlicesMR",
        try_number_of_slices_philips(path, &DumpToolOptions::default()),
        DEFAULT_NUMBER_OF_SLICES_PHILIPS,
    )
}

fn dump_slice_count(path: &Path, options: &DumpToolOptions) -> Result<i32, FieldError> {
    let program = options.program();
    let dump = DumpFile::beside(path);
    let output = File::create(&dump.path).context(DumpOutputSnafu { path: &dump.path })?;

    let status = Command::new(&program)
        .args(options.args.iter().flatten())
        .arg(path)
        .stdout(Stdio::from(output))
        .stderr(Stdio::null())
        .status()
        .context(SpawnToolSnafu { program: &program })?;

    let listing = fs::read(&dump.path).context(DumpOutputSnafu { path: &dump.path })?;
    let listing = String::from_utf8_lossy(&listing);
    let marker = options.marker();

    match listing.lines().find(|line| line.contains(marker)) {
        Some(line) => parse_slice_count(line),
        // a failing dump may still have listed the element, so the status only matters here
        None if !status.success() => ToolStatusSnafu { program, status }.fail(),
        None => MarkerNotFoundSnafu { marker }.fail(),
    }
}

/// Slice count from one dump line such as
/// `(2001,102d) SS 24    #   2, 1 StackNumberOfSlices`.
///
/// Spaces are dropped, the line is cut at the first `#`, and the run of
/// digits ending the remaining segment is the count. A sign or a value
/// separator in front of that run makes the line unusable.
pub(crate) fn parse_slice_count(line: &str) -> Result<i32, FieldError> {
    let compact: String = line.chars().filter(|c| *c != ' ').collect();
    let segment = compact
        .split('#')
        .next()
        .unwrap_or_default()
        .trim_end_matches(']');
    let head = segment.trim_end_matches(|c: char| c.is_ascii_digit());
    if head.ends_with(['-', '\\']) {
        return ParseSliceCountSnafu { line: line.trim() }.fail();
    }

    segment[head.len()..]
        .parse::<i32>()
        .ok()
        .context(ParseSliceCountSnafu { line: line.trim() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::FieldKind;
    use crate::testing::{philips_stack_sequence, text_element, Scratch};
    use crate::utils::dicom_tags::SERIES_NUMBER;
    use dicom_core::VR;

    const LISTING: &str = "\
echo '# Dicom-Data-Set'
echo '(0008,0016) UI =MRImageStorage                          #  26, 1 SOPClassUID'
echo '(2001,102d) SS 24                                       #   2, 1 StackNumberOfSlices'
echo '(2001,102d) SS 99                                       #   2, 1 StackNumberOfSlices'
";

    /// Options running a shell script in place of dcmdump
    fn script_options(scratch: &Scratch, body: &str) -> DumpToolOptions {
        let script = scratch.write_bytes("fake-dcmdump.sh", body.as_bytes());
        DumpToolOptions {
            program: Some("sh".to_string()),
            args: Some(vec![script.display().to_string()]),
            native_fallback: Some(false),
            ..Default::default()
        }
    }

    fn leftover_dumps(scratch: &Scratch) -> usize {
        fs::read_dir(scratch.dir())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(".dcmreader-"))
            .count()
    }

    #[test]
    fn test_parse_slice_count() {
        assert_eq!(
            parse_slice_count("(2001,102d) SS 24    #   2, 1 StackNumberOfSlices").unwrap(),
            24
        );
        assert_eq!(
            parse_slice_count("(2001,102d) SS 9     #   2, 1 StackNumberOfSlices").unwrap(),
            9
        );
        assert_eq!(
            parse_slice_count("(2001,102d) SS 120   #   2, 1 StackNumberOfSlices").unwrap(),
            120
        );
        assert_eq!(
            parse_slice_count("(2001,102d) IS [36]  #   2, 1 StackNumberOfSlices").unwrap(),
            36
        );
        assert!(matches!(
            parse_slice_count("(2001,102d) SS (no value available) # 0, 0 StackNumberOfSlices"),
            Err(FieldError::ParseSliceCount { .. })
        ));
        assert!(matches!(
            parse_slice_count("(2001,102d) SS -5    #   2, 1 StackNumberOfSlices"),
            Err(FieldError::ParseSliceCount { .. })
        ));
        assert!(matches!(
            parse_slice_count("(2001,102d) SS 24\\25 #   4, 2 StackNumberOfSlices"),
            Err(FieldError::ParseSliceCount { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_scrapes_first_marker_line() {
        let scratch = Scratch::new();
        let path = scratch.write_bytes("scan one.dcm", b"unused");
        let options = script_options(
            &scratch,
            &format!("case \"$1\" in\n*'scan one.dcm')\n{}\n;;\nesac\n", LISTING),
        );

        assert_eq!(try_number_of_slices_philips(&path, &options).unwrap(), 24);
        assert_eq!(leftover_dumps(&scratch), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_marker_not_found() {
        let scratch = Scratch::new();
        let path = scratch.write_bytes("scan.dcm", b"unused");
        let options = script_options(&scratch, "echo '(0020,0011) IS [3] # 2, 1 SeriesNumber'\n");

        let err = try_number_of_slices_philips(&path, &options).unwrap_err();
        assert!(matches!(err, FieldError::MarkerNotFound { .. }));
        assert_eq!(err.kind(), FieldKind::FieldMissing);
        assert_eq!(leftover_dumps(&scratch), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_tool_failure() {
        let scratch = Scratch::new();
        let path = scratch.write_bytes("scan.dcm", b"unused");
        let options = script_options(&scratch, "echo 'E: cannot read file' >&2\nexit 1\n");

        let err = try_number_of_slices_philips(&path, &options).unwrap_err();
        assert!(matches!(err, FieldError::ToolStatus { .. }));
        assert_eq!(err.kind(), FieldKind::SubprocessFailure);
        assert_eq!(leftover_dumps(&scratch), 0);
    }

    #[test]
    fn test_missing_tool() {
        let scratch = Scratch::new();
        let path = scratch.write_dicom("stack.dcm", vec![philips_stack_sequence(32)]);
        let mut options = DumpToolOptions {
            program: Some(scratch.path("no-such-dcmdump").display().to_string()),
            native_fallback: Some(false),
            ..Default::default()
        };

        let err = try_number_of_slices_philips(&path, &options).unwrap_err();
        assert!(err.is_tool_not_found());
        assert_eq!(err.kind(), FieldKind::SubprocessFailure);
        assert_eq!(leftover_dumps(&scratch), 0);

        options.native_fallback = Some(true);
        assert_eq!(try_number_of_slices_philips(&path, &options).unwrap(), 32);
    }

    #[test]
    fn test_native_fallback_without_element() {
        let scratch = Scratch::new();
        let path = scratch.write_dicom("plain.dcm", vec![text_element(SERIES_NUMBER, VR::IS, "4")]);
        let options = DumpToolOptions {
            program: Some(scratch.path("no-such-dcmdump").display().to_string()),
            ..Default::default()
        };

        let err = try_number_of_slices_philips(&path, &options).unwrap_err();
        assert_eq!(err.kind(), FieldKind::FieldMissing);
    }

    #[test]
    fn test_default_accessor_without_count() {
        // whether or not dcmdump is installed, no count is found for this file
        let scratch = Scratch::new();
        let path = scratch.write_dicom("plain.dcm", vec![text_element(SERIES_NUMBER, VR::IS, "4")]);
        assert_eq!(get_number_of_slices_philips(&path), DEFAULT_NUMBER_OF_SLICES_PHILIPS);
        assert_eq!(leftover_dumps(&scratch), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_report_masks_tool_failure() {
        let scratch = Scratch::new();
        let path = scratch.write_dicom("stack.dcm", vec![philips_stack_sequence(60)]);
        let options = script_options(&scratch, "exit 1\n");

        let report = crate::reader::read_field_report(&path, &options);
        assert_eq!(report.number_of_slices_philips, DEFAULT_NUMBER_OF_SLICES_PHILIPS);
        assert_eq!(leftover_dumps(&scratch), 0);
    }

    #[test]
    fn test_unwritable_dump_output_uses_native_fallback() {
        let err = FieldError::DumpOutput {
            path: PathBuf::from("/read-only/.dcmreader-x.txt"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.is_dump_unavailable());
        assert!(!err.is_tool_not_found());
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_directory() {
        use std::os::unix::fs::PermissionsExt;

        let scratch = Scratch::new();
        let path = scratch.write_dicom("stack.dcm", vec![philips_stack_sequence(32)]);
        let options = DumpToolOptions {
            program: Some(scratch.path("no-such-dcmdump").display().to_string()),
            ..Default::default()
        };

        fs::set_permissions(scratch.dir(), fs::Permissions::from_mode(0o555)).unwrap();
        let count = try_number_of_slices_philips(&path, &options);
        fs::set_permissions(scratch.dir(), fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(count.unwrap(), 32);
        assert_eq!(leftover_dumps(&scratch), 0);
    }
}
