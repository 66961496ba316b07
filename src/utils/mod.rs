pub mod dicom_tags;
pub mod helpers;
pub mod sop_classes;

// Re-export commonly used items
pub use dicom_tags::parse_tag;
pub use helpers::*;
pub use sop_classes::{is_enhanced_storage, sop_class_name};
