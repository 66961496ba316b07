use std::path::Path;

use dicom_core::header::Tag;
use dicom_core::VR;
use dicom_object::file::ReadPreamble;
use dicom_object::mem::InMemElement;
use dicom_object::{InMemDicomObject, OpenFileOptions};
use snafu::{OptionExt, ResultExt};
use tracing::debug;

use crate::reader::{
    ConvertValueSnafu, FieldError, MissingElementSnafu, OpenFileSnafu, ParseIntegerSnafu,
    ReadBytesSnafu,
};

/// Open a DICOM file and return its main data set.
///
/// Files with a preamble and file meta group are read the regular way. Files
/// that fail that route are retried as a bare data set (explicit VR little
/// endian, then implicit VR little endian), which covers dataset-only files
/// written by older modalities.
pub fn open_dataset(path: &Path) -> Result<InMemDicomObject, FieldError> {
    let open_error = match OpenFileOptions::new()
        .read_preamble(ReadPreamble::Auto)
        .open_file(path)
    {
        Ok(file) => return Ok(file.into_inner()),
        Err(e) => e,
    };

    let data = std::fs::read(path).context(ReadBytesSnafu { path })?;

    // A DICM magic code means the file meta group is there but broken
    let has_dicm_magic = (data.len() >= 132 && &data[128..132] == b"DICM") || data.starts_with(b"DICM");
    if !has_dicm_magic {
        if let Some(obj) = read_bare_dataset(&data) {
            debug!("Read {} as a dataset-only file", path.display());
            return Ok(obj);
        }
    }

    Err(open_error).context(OpenFileSnafu { path })
}

fn read_bare_dataset(data: &[u8]) -> Option<InMemDicomObject> {
    InMemDicomObject::read_dataset_with_ts(
        data,
        &dicom_transfer_syntax_registry::entries::EXPLICIT_VR_LITTLE_ENDIAN.erased(),
    )
    .or_else(|_| {
        InMemDicomObject::read_dataset_with_ts(
            data,
            &dicom_transfer_syntax_registry::entries::IMPLICIT_VR_LITTLE_ENDIAN.erased(),
        )
    })
    .ok()
    // an empty read means nothing in the file looked like a data set
    .filter(|obj| obj.iter().next().is_some())
}

/// Look up an element, failing with `MissingElement` if absent
pub fn element(obj: &InMemDicomObject, tag: Tag) -> Result<&InMemElement, FieldError> {
    obj.get(tag).context(MissingElementSnafu { tag })
}

/// Text value of an element with DICOM padding removed
pub fn element_text(elem: &InMemElement, tag: Tag) -> Result<String, FieldError> {
    let text = elem.to_str().context(ConvertValueSnafu { tag })?;
    Ok(trim_padding(&text).to_string())
}

/// Integer value of an element.
///
/// Native integer VRs convert directly; anything else goes through its
/// text form, so `IS` values and integer strings in private elements work too.
/// Elements of unknown VR (private tags in implicit VR files) are decoded
/// from their raw bytes, see [`un_bytes_int`].
pub fn element_int(elem: &InMemElement, tag: Tag) -> Result<i32, FieldError> {
    if elem.vr() == VR::UN {
        let bytes = elem.to_bytes().context(ConvertValueSnafu { tag })?;
        return un_bytes_int(&bytes, tag);
    }
    if let Ok(value) = elem.to_int::<i32>() {
        return Ok(value);
    }
    let text = element_text(elem, tag)?;
    text.parse::<i32>()
        .ok()
        .context(ParseIntegerSnafu { tag, text })
}

/// Integer from the raw bytes of a `UN` element: ASCII text as in `IS`,
/// else a 4-byte little endian `SL`
pub fn un_bytes_int(bytes: &[u8], tag: Tag) -> Result<i32, FieldError> {
    let text = String::from_utf8_lossy(bytes);
    let text = trim_padding(&text);
    if let Ok(value) = text.parse::<i32>() {
        return Ok(value);
    }
    match <[u8; 4]>::try_from(bytes) {
        Ok(raw) => Ok(i32::from_le_bytes(raw)),
        Err(_) => ParseIntegerSnafu { tag, text }.fail(),
    }
}

pub fn element_float(elem: &InMemElement, tag: Tag) -> Result<f64, FieldError> {
    elem.to_float64().context(ConvertValueSnafu { tag })
}

/// Find an element anywhere in the data set, descending into sequence items
pub fn find_nested(obj: &InMemDicomObject, tag: Tag) -> Option<&InMemElement> {
    if let Some(elem) = obj.get(tag) {
        return Some(elem);
    }
    obj.iter()
        .filter_map(|elem| elem.value().items())
        .flatten()
        .find_map(|item| find_nested(item, tag))
}

pub fn trim_padding(text: &str) -> &str {
    text.trim_matches(|c: char| c == '\0' || c.is_whitespace())
}

/// Replace spaces with underscores, for descriptive fields used in file names
pub fn underscore_spaces(text: &str) -> String {
    text.replace(' ', "_")
}
