//! Node.js bindings.
//!
//! Every accessor is exported under its camelCase name. The `get*` exports
//! never throw: they return the field default and log the failure.

use std::path::Path;

use crate::reader::{self, DumpToolOptions, FieldError, FieldReport};

fn to_napi_error(e: FieldError) -> napi::Error {
    napi::Error::from_reason(format!("{:?}: {}", e.kind(), snafu::Report::from_error(e)))
}

/**
 * Install the process-wide logger.
 *
 * `RUST_LOG` takes precedence over the `verbose` flag. Only the first call
 * in a process has an effect.
 *
 * @param verbose - Log debug output (default false, warnings only)
 * @returns true if this call installed the logger
 *
 * @example
 * ```typescript
 * import { initLogger, getDateScan } from 'node-dcmreader';
 *
 * initLogger(true);
 * getDateScan('/data/scan.dcm');
 * ```
 */
#[napi]
pub fn init_logger(verbose: Option<bool>) -> bool {
    crate::logging::init_logger(verbose.unwrap_or(false))
}

/**
 * Acquisition date (0008,0022) as written in the file.
 *
 * @param path - Path to the DICOM file
 * @returns The date string, or "0" if unavailable
 */
#[napi]
pub fn get_date_scan(path: String) -> String {
    reader::get_date_scan(path)
}

/**
 * Repetition time (0018,0080) as text.
 *
 * @returns The value, or "0" if unavailable
 */
#[napi]
pub fn get_repetition_time(path: String) -> String {
    reader::get_repetition_time(path)
}

/**
 * Echo time (0018,0081).
 *
 * @returns The echo time, or -1 if unavailable
 */
#[napi]
pub fn get_echo_time(path: String) -> f64 {
    reader::get_echo_time(path)
}

/**
 * Whether the SOP Class UID (0008,0016) is an Enhanced (multi-frame) storage class.
 *
 * @returns true for Enhanced storage, false otherwise or if unavailable
 */
#[napi(js_name = "getSOPStorageType")]
pub fn get_sop_storage_type(path: String) -> bool {
    reader::get_sop_storage_type(path)
}

/**
 * GE private RawDataRunNumber (0019,10a2).
 *
 * @returns The run number, or -1 if unavailable
 */
#[napi]
pub fn get_raw_data_run_number(path: String) -> i32 {
    reader::get_raw_data_run_number(path)
}

/**
 * Philips StackNumberOfSlices, scraped from a `dcmdump` listing.
 *
 * The dump program receives the path as a plain argument. Its output goes to a
 * uniquely named temporary file beside the input, which is always removed.
 * If the program is not installed, or its output cannot be written beside the
 * input, the file is searched in-process unless `nativeFallback` is false.
 *
 * @param path - Path to the DICOM file
 * @param options - Dump program, extra arguments, marker text, fallback switch
 * @returns The slice count, or 0 if unavailable
 *
 * @example
 * ```typescript
 * const slices = getNumberOfSlicesPhilips('/data/philips.dcm', {
 *   program: '/opt/dcmtk/bin/dcmdump',
 * });
 * ```
 */
#[napi]
pub fn get_number_of_slices_philips(path: String, options: Option<DumpToolOptions>) -> i32 {
    let path = Path::new(&path);
    reader::or_default(
        path,
        "NumberOfSlicesMR",
        reader::try_number_of_slices_philips(path, &options.unwrap_or_default()),
        reader::philips::DEFAULT_NUMBER_OF_SLICES_PHILIPS,
    )
}

/**
 * Series number (0020,0011) as text.
 *
 * @returns The value, or "0" if unavailable
 */
#[napi]
pub fn get_sequence_number(path: String) -> String {
    reader::get_sequence_number(path)
}

/**
 * Images in acquisition (0020,1002), falling back to the Philips private
 * NumberOfSlicesMR (2001,1018).
 *
 * @returns The count, or -1 if neither element is usable
 */
#[napi]
pub fn get_nb_slices(path: String) -> i32 {
    reader::get_nb_slices(path)
}

/**
 * Number of temporal positions (0020,0105).
 *
 * @returns The count, or 0 if unavailable
 */
#[napi]
pub fn get_nb_temporal_position(path: String) -> i32 {
    reader::get_nb_temporal_position(path)
}

/**
 * Series description (0008,103e) with spaces replaced by underscores.
 *
 * @returns e.g. "T1_MPRAGE_SENSE", or "Unknown" if unavailable
 */
#[napi]
pub fn get_sequence_name(path: String) -> String {
    reader::get_sequence_name(path)
}

/**
 * Protocol name (0018,1030) with spaces replaced by underscores.
 *
 * @returns The name, or "Unknown" if unavailable
 */
#[napi]
pub fn get_protocol_name(path: String) -> String {
    reader::get_protocol_name(path)
}

/**
 * Series instance UID (0020,000e).
 *
 * @returns The UID, or "Unknown" if unavailable
 */
#[napi(js_name = "getSerieSerieInstanceUID")]
pub fn get_serie_serie_instance_uid(path: String) -> String {
    reader::get_serie_serie_instance_uid(path)
}

/**
 * Text value of any element.
 *
 * @param path - Path to the DICOM file
 * @param tag - Keyword ("EchoTime"), "(GGGG,EEEE)" or "GGGGEEEE"
 * @returns The value with DICOM padding removed
 * @throws Error prefixed with the failure kind (FieldMissing, ParseFailure)
 *
 * @example
 * ```typescript
 * getField('/data/scan.dcm', 'PatientName');
 * getField('/data/scan.dcm', '(0019,10a2)');
 * ```
 */
#[napi]
pub fn get_field(path: String, tag: String) -> napi::Result<String> {
    reader::get_field(path, &tag).map_err(to_napi_error)
}

/**
 * All fields of one file, each read by its own accessor.
 *
 * @param path - Path to the DICOM file
 * @param options - Options for the Philips slice count
 * @returns Object with every field, defaults where unavailable
 *
 * @example
 * ```typescript
 * const report = readFieldReport('/data/scan.dcm');
 * console.log(report.sequenceName, report.nbSlices);
 * ```
 */
#[napi]
pub fn read_field_report(path: String, options: Option<DumpToolOptions>) -> FieldReport {
    reader::read_field_report(path, &options.unwrap_or_default())
}
