//! Catalog row types
//!
//! An [`ImageRecord`] is one discovered image file. Values are kept as the
//! strings the scanner extracted; dates stay in whatever textual form the
//! image carried.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One discovered image file
///
/// `sop_uid` is the deduplication key of the catalog.
///
/// # Examples
///
/// ```
/// use studyferry::domain::ImageRecord;
///
/// let record = ImageRecord::new("1.2.840.1.3", "/data/IM0001")
///     .with_patient("DOE^JANE", "PID-7", "19700101")
///     .with_study("1.2.840.1", "CT", "CHEST", "20240312")
///     .with_series("1.2.840.1.2", "AXIAL 5mm");
///
/// assert_eq!(record.patient_name, "DOE^JANE");
/// assert!(!record.sent);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageRecord {
    pub patient_name: String,
    pub patient_id: String,
    pub birth_date: String,
    pub study_uid: String,
    pub modality: String,
    pub study_description: String,
    pub study_date: String,
    pub series_uid: String,
    pub series_description: String,
    pub sop_uid: String,
    pub file_path: PathBuf,
    /// Set by the send job once the file has been transferred
    pub sent: bool,
}

impl ImageRecord {
    /// Creates a record for an instance with empty patient, study and series fields
    pub fn new(sop_uid: impl Into<String>, file_path: impl Into<PathBuf>) -> Self {
        Self {
            sop_uid: sop_uid.into(),
            file_path: file_path.into(),
            ..Default::default()
        }
    }

    /// Sets the patient identity fields
    pub fn with_patient(
        mut self,
        name: impl Into<String>,
        patient_id: impl Into<String>,
        birth_date: impl Into<String>,
    ) -> Self {
        self.patient_name = name.into();
        self.patient_id = patient_id.into();
        self.birth_date = birth_date.into();
        self
    }

    /// Sets the study fields
    pub fn with_study(
        mut self,
        study_uid: impl Into<String>,
        modality: impl Into<String>,
        description: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        self.study_uid = study_uid.into();
        self.modality = modality.into();
        self.study_description = description.into();
        self.study_date = date.into();
        self
    }

    /// Sets the series fields
    pub fn with_series(mut self, series_uid: impl Into<String>, description: impl Into<String>) -> Self {
        self.series_uid = series_uid.into();
        self.series_description = description.into();
        self
    }

    /// Returns the patient triple this record belongs to
    pub fn patient(&self) -> PatientSummary {
        PatientSummary {
            name: self.patient_name.clone(),
            patient_id: self.patient_id.clone(),
            birth_date: self.birth_date.clone(),
        }
    }
}

/// A distinct (name, patient id, birth date) triple present in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientSummary {
    pub name: String,
    pub patient_id: String,
    pub birth_date: String,
}
