//! Fixtures shared by the unit tests.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use dicom_core::header::Tag;
use dicom_core::value::DataSetSequence;
use dicom_core::{DataElement, PrimitiveValue, VR};
use dicom_dictionary_std::uids;
use dicom_object::mem::InMemElement;
use dicom_object::{FileMetaTableBuilder, InMemDicomObject};
use uuid::Uuid;

use crate::utils::dicom_tags::PHILIPS_STACK_NUMBER_OF_SLICES;

/// Scratch directory removed when dropped
pub(crate) struct Scratch {
    dir: PathBuf,
}

impl Scratch {
    pub fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("dcmreader-test-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        Scratch { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn write_bytes(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    /// Write a Part 10 file (preamble + file meta group) holding `elements`
    pub fn write_dicom(&self, name: &str, elements: Vec<InMemElement>) -> PathBuf {
        self.write_dicom_with_ts(name, uids::EXPLICIT_VR_LITTLE_ENDIAN, elements)
    }

    /// Same as [`Scratch::write_dicom`], encoded with the given transfer syntax
    pub fn write_dicom_with_ts(
        &self,
        name: &str,
        transfer_syntax: &str,
        elements: Vec<InMemElement>,
    ) -> PathBuf {
        let path = self.path(name);
        InMemDicomObject::from_element_iter(elements)
            .with_meta(
                FileMetaTableBuilder::new()
                    .transfer_syntax(transfer_syntax)
                    .media_storage_sop_class_uid(uids::MR_IMAGE_STORAGE)
                    .media_storage_sop_instance_uid("2.25.314159265358979323846"),
            )
            .unwrap()
            .write_to_file(&path)
            .unwrap();
        path
    }

    /// Write only the data set, in explicit VR little endian, with no preamble or meta group
    pub fn write_bare_dataset(&self, name: &str, elements: Vec<InMemElement>) -> PathBuf {
        let mut data = Vec::new();
        InMemDicomObject::from_element_iter(elements)
            .write_dataset_with_ts(
                &mut data,
                &dicom_transfer_syntax_registry::entries::EXPLICIT_VR_LITTLE_ENDIAN.erased(),
            )
            .unwrap();
        self.write_bytes(name, &data)
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

pub(crate) fn text_element(tag: Tag, vr: VR, value: &str) -> InMemElement {
    DataElement::new(tag, vr, PrimitiveValue::from(value))
}

pub(crate) fn int_element(tag: Tag, vr: VR, value: i32) -> InMemElement {
    DataElement::new(tag, vr, PrimitiveValue::from(value))
}

/// Philips stack sequence (2001,105F) with one item carrying StackNumberOfSlices
pub(crate) fn philips_stack_sequence(slices: i16) -> InMemElement {
    let item = InMemDicomObject::from_element_iter([DataElement::new(
        PHILIPS_STACK_NUMBER_OF_SLICES,
        VR::SS,
        PrimitiveValue::from(slices),
    )]);
    DataElement::new(
        Tag(0x2001, 0x105F),
        VR::SQ,
        DataSetSequence::from(vec![item]),
    )
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return what it logged
pub(crate) fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let out = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (out, logs)
}
