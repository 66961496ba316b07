use dicom_core::header::Tag;
use dicom_core::DataDictionary;
use dicom_dictionary_std::{tags, StandardDataDictionary};

use crate::reader::FieldError;

pub const ACQUISITION_DATE: Tag = tags::ACQUISITION_DATE;
pub const REPETITION_TIME: Tag = tags::REPETITION_TIME;
pub const ECHO_TIME: Tag = tags::ECHO_TIME;
pub const SOP_CLASS_UID: Tag = tags::SOP_CLASS_UID;
pub const SERIES_NUMBER: Tag = tags::SERIES_NUMBER;
pub const IMAGES_IN_ACQUISITION: Tag = tags::IMAGES_IN_ACQUISITION;
pub const NUMBER_OF_TEMPORAL_POSITIONS: Tag = tags::NUMBER_OF_TEMPORAL_POSITIONS;
pub const SERIES_DESCRIPTION: Tag = tags::SERIES_DESCRIPTION;
pub const PROTOCOL_NAME: Tag = tags::PROTOCOL_NAME;
pub const SERIES_INSTANCE_UID: Tag = tags::SERIES_INSTANCE_UID;

// Vendor private tags

/// GE RawDataRunNumber
pub const GE_RAW_DATA_RUN_NUMBER: Tag = Tag(0x0019, 0x10A2);
/// Philips NumberOfSlicesMR
pub const PHILIPS_NUMBER_OF_SLICES: Tag = Tag(0x2001, 0x1018);
/// Philips StackNumberOfSlices, nested inside the stack sequence (2001,105F)
pub const PHILIPS_STACK_NUMBER_OF_SLICES: Tag = Tag(0x2001, 0x102D);

/// Parse tag from string (keyword, hex, or (GGGG,EEEE) format)
/// Uses dicom-rs StandardDataDictionary for keyword lookup
pub fn parse_tag(tag_str: &str) -> Result<Tag, FieldError> {
    let tag_str = tag_str.trim();
    if let Some(tag) = StandardDataDictionary.parse_tag(tag_str) {
        return Ok(tag);
    }

    // Fallback: GGGGEEEE, GGGG,EEEE or (GGGG,EEEE)
    let hex: String = tag_str
        .trim_start_matches('(')
        .trim_end_matches(')')
        .split(',')
        .collect();
    if hex.len() == 8 && hex.is_ascii() {
        if let (Ok(group), Ok(element)) = (
            u16::from_str_radix(&hex[0..4], 16),
            u16::from_str_radix(&hex[4..8], 16),
        ) {
            return Ok(Tag(group, element));
        }
    }

    Err(FieldError::InvalidTag {
        text: tag_str.to_string(),
    })
}
