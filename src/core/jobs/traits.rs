//! Job contracts
//!
//! The scan and send algorithms live outside this crate. The orchestrator
//! only needs them to run to completion on a blocking worker and to honour
//! the cancellation token between units of work.

use super::cancel::CancelToken;
use crate::adapters::catalog::CatalogHandle;
use crate::domain::{DestinationEntry, PatientSummary, Result};
use std::path::Path;

/// Walks a filesystem location and fills the catalog
pub trait Scanner: Send + Sync + 'static {
    /// Runs one scan of `root` to completion or until `cancel` fires
    ///
    /// The catalog has already been cleared when this is called.
    fn scan(&self, catalog: CatalogHandle, root: &Path, cancel: &CancelToken) -> Result<()>;
}

/// Transfers one patient's images to a network destination
pub trait StudySender: Send + Sync + 'static {
    /// Runs one transfer to completion or until `cancel` fires
    ///
    /// Implementations are expected to call
    /// [`Catalog::mark_sent`](crate::adapters::catalog::Catalog::mark_sent)
    /// for every image that reached the destination.
    fn send(&self, catalog: CatalogHandle, request: &SendRequest, cancel: &CancelToken) -> Result<()>;
}

/// Replacement patient identity applied to outgoing images
///
/// `None` keeps the value found in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientOverrides {
    pub patient_name: Option<String>,
    pub patient_id: Option<String>,
    pub birth_date: Option<String>,
}

impl PatientOverrides {
    /// Builds overrides from form-style fields where blank means "keep"
    pub fn from_fields(patient_name: &str, patient_id: &str, birth_date: &str) -> Self {
        Self {
            patient_name: non_blank(patient_name),
            patient_id: non_blank(patient_id),
            birth_date: non_blank(birth_date),
        }
    }

    /// Returns `true` if no field is overridden
    pub fn is_empty(&self) -> bool {
        self.patient_name.is_none() && self.patient_id.is_none() && self.birth_date.is_none()
    }

    /// The identity an outgoing image carries after overrides
    pub fn apply(&self, original: &PatientSummary) -> PatientSummary {
        PatientSummary {
            name: self.patient_name.clone().unwrap_or_else(|| original.name.clone()),
            patient_id: self
                .patient_id
                .clone()
                .unwrap_or_else(|| original.patient_id.clone()),
            birth_date: self
                .birth_date
                .clone()
                .unwrap_or_else(|| original.birth_date.clone()),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Everything a send job needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    /// Catalog patient name selecting the images to send
    pub source_patient_name: String,
    pub overrides: PatientOverrides,
    /// Resolved destination, copied so later registry edits do not affect the job
    pub destination: DestinationEntry,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient() -> PatientSummary {
        PatientSummary {
            name: "DOE^JANE".to_string(),
            patient_id: "P001".to_string(),
            birth_date: "19700101".to_string(),
        }
    }

    #[test]
    fn test_blank_fields_keep_original() {
        let overrides = PatientOverrides::from_fields("", "  ", "");
        assert!(overrides.is_empty());
        assert_eq!(overrides.apply(&patient()), patient());
    }

    #[test]
    fn test_partial_override() {
        let overrides = PatientOverrides::from_fields("ANON^ONE", "", "19000101");
        let applied = overrides.apply(&patient());

        assert_eq!(applied.name, "ANON^ONE");
        assert_eq!(applied.patient_id, "P001");
        assert_eq!(applied.birth_date, "19000101");
    }
}
