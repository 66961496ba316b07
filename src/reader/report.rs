use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::reader::philips::DEFAULT_NUMBER_OF_SLICES_PHILIPS;
use crate::reader::{
    get_date_scan, get_echo_time, get_nb_slices, get_nb_temporal_position, get_protocol_name,
    get_raw_data_run_number, get_repetition_time, get_sequence_name, get_sequence_number,
    get_serie_serie_instance_uid, get_sop_storage_type, or_default, try_number_of_slices_philips,
    DumpToolOptions,
};

/// Every field of one file, as the `get_*` accessors return them
#[cfg_attr(feature = "node", napi(object))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReport {
    pub path: String,
    pub date_scan: String,
    pub repetition_time: String,
    pub echo_time: f64,
    pub enhanced_storage: bool,
    pub raw_data_run_number: i32,
    pub number_of_slices_philips: i32,
    pub sequence_number: String,
    pub nb_slices: i32,
    pub nb_temporal_position: i32,
    pub sequence_name: String,
    pub protocol_name: String,
    pub series_instance_uid: String,
}

impl FieldReport {
    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

/// Read every field of `path`, one accessor call (and one parse) at a time
pub fn read_field_report(path: impl AsRef<Path>, options: &DumpToolOptions) -> FieldReport {
    let path = path.as_ref();
    FieldReport {
        path: path.display().to_string(),
        date_scan: get_date_scan(path),
        repetition_time: get_repetition_time(path),
        echo_time: get_echo_time(path),
        enhanced_storage: get_sop_storage_type(path),
        raw_data_run_number: get_raw_data_run_number(path),
        number_of_slices_philips: or_default(
            path,
            "NumberOfSlicesMR",
            try_number_of_slices_philips(path, options),
            DEFAULT_NUMBER_OF_SLICES_PHILIPS,
        ),
        sequence_number: get_sequence_number(path),
        nb_slices: get_nb_slices(path),
        nb_temporal_position: get_nb_temporal_position(path),
        sequence_name: get_sequence_name(path),
        protocol_name: get_protocol_name(path),
        series_instance_uid: get_serie_serie_instance_uid(path),
    }
}
