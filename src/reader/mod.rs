//! Field accessors.
//!
//! Every field comes in two flavours: `try_*` returns a typed [`FieldError`]
//! the caller can classify, `get_*` masks any failure behind the field's
//! default value and logs it. Each call opens and parses the file anew.

mod error;
pub mod philips;
pub mod report;

use std::path::Path;

use dicom_core::header::Tag;
use snafu::Report;
use tracing::{debug, warn};

use crate::utils::dicom_tags::*;
use crate::utils::{
    element, element_float, element_int, element_text, is_enhanced_storage, open_dataset,
    parse_tag, underscore_spaces,
};

pub use error::*;
pub use philips::{
    get_number_of_slices_philips, try_number_of_slices_philips, DumpToolOptions,
};
pub use report::{read_field_report, FieldReport};

pub const DEFAULT_DATE_SCAN: &str = "0";
pub const DEFAULT_REPETITION_TIME: &str = "0";
pub const DEFAULT_ECHO_TIME: f64 = -1.0;
pub const DEFAULT_RAW_DATA_RUN_NUMBER: i32 = -1;
pub const DEFAULT_SEQUENCE_NUMBER: &str = "0";
pub const DEFAULT_NB_SLICES: i32 = -1;
pub const DEFAULT_NB_TEMPORAL_POSITION: i32 = 0;
pub const UNKNOWN: &str = "Unknown";

fn read_text(path: &Path, tag: Tag) -> Result<String, FieldError> {
    let obj = open_dataset(path)?;
    element_text(element(&obj, tag)?, tag)
}

fn read_int(path: &Path, tag: Tag) -> Result<i32, FieldError> {
    let obj = open_dataset(path)?;
    element_int(element(&obj, tag)?, tag)
}

/// Log a failed lookup and fall back to the field default
pub(crate) fn or_default<T>(
    path: &Path,
    field: &str,
    result: Result<T, FieldError>,
    default: T,
) -> T {
    result.unwrap_or_else(|e| {
        warn!(
            "no {} field in {}: {}",
            field,
            path.display(),
            Report::from_error(e)
        );
        default
    })
}

/// AcquisitionDate (0008,0022)
pub fn try_date_scan(path: impl AsRef<Path>) -> Result<String, FieldError> {
    read_text(path.as_ref(), ACQUISITION_DATE)
}

/// Session date as written in the file, `"0"` if unavailable
pub fn get_date_scan(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    or_default(
        path,
        "AcquisitionDate",
        try_date_scan(path),
        DEFAULT_DATE_SCAN.to_string(),
    )
}

/// RepetitionTime (0018,0080), as text
pub fn try_repetition_time(path: impl AsRef<Path>) -> Result<String, FieldError> {
    read_text(path.as_ref(), REPETITION_TIME)
}

pub fn get_repetition_time(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    or_default(
        path,
        "RepetitionTime",
        try_repetition_time(path),
        DEFAULT_REPETITION_TIME.to_string(),
    )
}

/// EchoTime (0018,0081)
pub fn try_echo_time(path: impl AsRef<Path>) -> Result<f64, FieldError> {
    let obj = open_dataset(path.as_ref())?;
    element_float(element(&obj, ECHO_TIME)?, ECHO_TIME)
}

pub fn get_echo_time(path: impl AsRef<Path>) -> f64 {
    let path = path.as_ref();
    or_default(path, "EchoTime", try_echo_time(path), DEFAULT_ECHO_TIME)
}

/// Whether SOPClassUID (0008,0016) names an Enhanced storage class
pub fn try_sop_storage_type(path: impl AsRef<Path>) -> Result<bool, FieldError> {
    read_text(path.as_ref(), SOP_CLASS_UID).map(|uid| is_enhanced_storage(&uid))
}

/// `true` for Enhanced storage, `false` otherwise or if unavailable
pub fn get_sop_storage_type(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    or_default(path, "SOPClassUID", try_sop_storage_type(path), false)
}

/// GE private RawDataRunNumber (0019,10a2)
pub fn try_raw_data_run_number(path: impl AsRef<Path>) -> Result<i32, FieldError> {
    read_int(path.as_ref(), GE_RAW_DATA_RUN_NUMBER)
}

pub fn get_raw_data_run_number(path: impl AsRef<Path>) -> i32 {
    let path = path.as_ref();
    or_default(
        path,
        "RawDataRunNumber",
        try_raw_data_run_number(path),
        DEFAULT_RAW_DATA_RUN_NUMBER,
    )
}

/// SeriesNumber (0020,0011), as text
pub fn try_sequence_number(path: impl AsRef<Path>) -> Result<String, FieldError> {
    read_text(path.as_ref(), SERIES_NUMBER)
}

pub fn get_sequence_number(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    or_default(
        path,
        "SeriesNumber",
        try_sequence_number(path),
        DEFAULT_SEQUENCE_NUMBER.to_string(),
    )
}

/// ImagesInAcquisition (0020,1002), falling back to Philips
/// NumberOfSlicesMR (2001,1018) when the standard element is unusable.
pub fn try_nb_slices(path: impl AsRef<Path>) -> Result<i32, FieldError> {
    let obj = open_dataset(path.as_ref())?;
    element(&obj, IMAGES_IN_ACQUISITION)
        .and_then(|elem| element_int(elem, IMAGES_IN_ACQUISITION))
        .or_else(|e| {
            debug!("{}, trying {}", e, PHILIPS_NUMBER_OF_SLICES);
            element_int(
                element(&obj, PHILIPS_NUMBER_OF_SLICES)?,
                PHILIPS_NUMBER_OF_SLICES,
            )
        })
}

pub fn get_nb_slices(path: impl AsRef<Path>) -> i32 {
    let path = path.as_ref();
    try_nb_slices(path).unwrap_or_else(|e| {
        debug!(
            "no ImagesInAcquisition field in {}: {}",
            path.display(),
            Report::from_error(e)
        );
        DEFAULT_NB_SLICES
    })
}

/// NumberOfTemporalPositions (0020,0105)
pub fn try_nb_temporal_position(path: impl AsRef<Path>) -> Result<i32, FieldError> {
    read_int(path.as_ref(), NUMBER_OF_TEMPORAL_POSITIONS)
}

pub fn get_nb_temporal_position(path: impl AsRef<Path>) -> i32 {
    let path = path.as_ref();
    or_default(
        path,
        "NumberOfTemporalPositions",
        try_nb_temporal_position(path),
        DEFAULT_NB_TEMPORAL_POSITION,
    )
}

/// SeriesDescription (0008,103e), spaces replaced by underscores
pub fn try_sequence_name(path: impl AsRef<Path>) -> Result<String, FieldError> {
    read_text(path.as_ref(), SERIES_DESCRIPTION).map(|text| underscore_spaces(&text))
}

pub fn get_sequence_name(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    or_default(
        path,
        "SeriesDescription",
        try_sequence_name(path),
        UNKNOWN.to_string(),
    )
}

/// ProtocolName (0018,1030), spaces replaced by underscores
pub fn try_protocol_name(path: impl AsRef<Path>) -> Result<String, FieldError> {
    read_text(path.as_ref(), PROTOCOL_NAME).map(|text| underscore_spaces(&text))
}

pub fn get_protocol_name(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    or_default(
        path,
        "ProtocolName",
        try_protocol_name(path),
        UNKNOWN.to_string(),
    )
}

/// SeriesInstanceUID (0020,000e), spaces replaced by underscores
pub fn try_serie_serie_instance_uid(path: impl AsRef<Path>) -> Result<String, FieldError> {
    read_text(path.as_ref(), SERIES_INSTANCE_UID).map(|text| underscore_spaces(&text))
}

pub fn get_serie_serie_instance_uid(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    or_default(
        path,
        "SeriesInstanceUID",
        try_serie_serie_instance_uid(path),
        UNKNOWN.to_string(),
    )
}

/// Text value of an arbitrary element.
///
/// `tag` is a keyword (`"EchoTime"`), `(GGGG,EEEE)` or `GGGGEEEE`.
pub fn get_field(path: impl AsRef<Path>, tag: &str) -> Result<String, FieldError> {
    let tag = parse_tag(tag)?;
    read_text(path.as_ref(), tag)
}
