//! SOP Class UID to friendly name mappings

use dicom_dictionary_std::uids;

/// Map a SOP Class UID to its friendly name
pub fn sop_class_name(uid: &str) -> Option<&'static str> {
    match uid.trim_end_matches('\0').trim() {
        uids::CT_IMAGE_STORAGE => Some("CTImageStorage"),
        uids::ENHANCED_CT_IMAGE_STORAGE => Some("EnhancedCTImageStorage"),
        uids::MR_IMAGE_STORAGE => Some("MRImageStorage"),
        uids::ENHANCED_MR_IMAGE_STORAGE => Some("EnhancedMRImageStorage"),
        uids::ULTRASOUND_MULTI_FRAME_IMAGE_STORAGE => Some("UltrasoundMultiFrameImageStorage"),
        uids::SECONDARY_CAPTURE_IMAGE_STORAGE => Some("SecondaryCaptureImageStorage"),
        uids::COMPUTED_RADIOGRAPHY_IMAGE_STORAGE => Some("ComputedRadiographyImageStorage"),
        uids::POSITRON_EMISSION_TOMOGRAPHY_IMAGE_STORAGE => Some("PositronEmissionTomographyImageStorage"),
        uids::ENHANCED_PET_IMAGE_STORAGE => Some("EnhancedPETImageStorage"),
        uids::NUCLEAR_MEDICINE_IMAGE_STORAGE => Some("NuclearMedicineImageStorage"),
        uids::RT_IMAGE_STORAGE => Some("RTImageStorage"),
        uids::BASIC_TEXT_SR_STORAGE => Some("BasicTextSRStorage"),
        uids::ENHANCED_SR_STORAGE => Some("EnhancedSRStorage"),
        uids::COMPREHENSIVE_SR_STORAGE => Some("ComprehensiveSRStorage"),
        uids::ENHANCED_MR_COLOR_IMAGE_STORAGE => Some("EnhancedMRColorImageStorage"),
        uids::LEGACY_CONVERTED_ENHANCED_MR_IMAGE_STORAGE => Some("LegacyConvertedEnhancedMRImageStorage"),
        uids::LEGACY_CONVERTED_ENHANCED_CT_IMAGE_STORAGE => Some("LegacyConvertedEnhancedCTImageStorage"),
        uids::LEGACY_CONVERTED_ENHANCED_PET_IMAGE_STORAGE => Some("LegacyConvertedEnhancedPETImageStorage"),
        uids::ENHANCED_US_VOLUME_STORAGE => Some("EnhancedUSVolumeStorage"),
        uids::ENHANCED_XA_IMAGE_STORAGE => Some("EnhancedXAImageStorage"),
        uids::ENHANCED_XRF_IMAGE_STORAGE => Some("EnhancedXRFImageStorage"),
        _ => None,
    }
}

/// Whether a SOP Class value denotes an Enhanced (multi-frame) storage class.
///
/// Accepts either the raw UID or a descriptive value that already names the class.
pub fn is_enhanced_storage(value: &str) -> bool {
    value.contains("Enhanced")
        || sop_class_name(value).is_some_and(|name| name.contains("Enhanced"))
}
