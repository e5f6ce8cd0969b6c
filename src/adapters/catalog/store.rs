//! SQLite-backed image catalog
//!
//! The catalog lives in a private `:memory:` database and disappears with the
//! process. A single connection sits behind a mutex; every public method runs
//! its statements while holding it, so readers never see half-written rows.

use crate::domain::errors::EngineError;
use crate::domain::image::{ImageRecord, PatientSummary};
use crate::domain::Result;
use rusqlite::{params, Connection, Row};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

/// Shared handle to the catalog, passed to background jobs
pub type CatalogHandle = Arc<Catalog>;

const SCHEMA: &str = "
    PRAGMA encoding = 'UTF-8';
    CREATE TABLE images (
        patient_name        TEXT NOT NULL,
        patient_id          TEXT NOT NULL,
        birth_date          TEXT NOT NULL,
        study_uid           TEXT NOT NULL,
        modality            TEXT NOT NULL,
        study_description   TEXT NOT NULL,
        study_date          TEXT NOT NULL,
        series_uid          TEXT NOT NULL,
        series_description  TEXT NOT NULL,
        sop_uid             TEXT NOT NULL UNIQUE,
        file_path           TEXT NOT NULL,
        sent                INTEGER NOT NULL DEFAULT 0
    );
    CREATE INDEX idx_images_patient ON images(patient_name, patient_id);
";

const SELECT_IMAGE_COLUMNS: &str = "SELECT patient_name, patient_id, birth_date, study_uid, modality, \
     study_description, study_date, series_uid, series_description, sop_uid, file_path, sent \
     FROM images";

/// The in-memory image catalog
pub struct Catalog {
    conn: Mutex<Connection>,
}

impl Catalog {
    /// Creates an empty catalog
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StoreCreation`] if SQLite cannot open the
    /// in-memory database or create the schema.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| EngineError::StoreCreation(e.to_string()))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| EngineError::StoreCreation(e.to_string()))?;

        tracing::debug!("Catalog database initialized in memory");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Wraps the catalog in a shareable handle
    pub fn into_handle(self) -> CatalogHandle {
        Arc::new(self)
    }

    fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> Result<T> {
        // Statements are atomic, so a panic elsewhere cannot leave a torn row behind.
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&conn).map_err(EngineError::from)
    }

    /// Deletes every row, returning how many were removed
    pub fn clear(&self) -> Result<usize> {
        let removed = self.with_connection(|conn| conn.execute("DELETE FROM images", []))?;
        tracing::debug!(removed, "Catalog cleared");
        Ok(removed)
    }

    /// Inserts one image
    ///
    /// Returns `false` when an image with the same SOP instance UID is
    /// already cataloged; the existing row is kept unchanged.
    pub fn insert(&self, record: &ImageRecord) -> Result<bool> {
        let inserted = self.with_connection(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO images (patient_name, patient_id, birth_date, study_uid, \
                 modality, study_description, study_date, series_uid, series_description, \
                 sop_uid, file_path, sent) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    record.patient_name,
                    record.patient_id,
                    record.birth_date,
                    record.study_uid,
                    record.modality,
                    record.study_description,
                    record.study_date,
                    record.series_uid,
                    record.series_description,
                    record.sop_uid,
                    record.file_path.to_string_lossy().into_owned(),
                    record.sent,
                ],
            )
        })?;

        if inserted == 0 {
            tracing::debug!(sop_uid = %record.sop_uid, "Duplicate SOP instance ignored");
        }
        Ok(inserted > 0)
    }

    /// Returns the number of cataloged images
    pub fn image_count(&self) -> Result<usize> {
        let count: i64 = self.with_connection(|conn| {
            conn.query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))
        })?;
        Ok(count as usize)
    }

    /// Returns the number of images not yet sent
    pub fn pending_count(&self) -> Result<usize> {
        let count: i64 = self.with_connection(|conn| {
            conn.query_row("SELECT COUNT(*) FROM images WHERE sent = 0", [], |row| {
                row.get(0)
            })
        })?;
        Ok(count as usize)
    }

    /// Returns every distinct patient, ordered by name then patient id
    ///
    /// Birth date breaks ties so the order is total.
    pub fn patients(&self) -> Result<Vec<PatientSummary>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT DISTINCT patient_name, patient_id, birth_date FROM images \
                 ORDER BY patient_name, patient_id, birth_date",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(PatientSummary {
                    name: row.get(0)?,
                    patient_id: row.get(1)?,
                    birth_date: row.get(2)?,
                })
            })?;
            rows.collect()
        })
    }

    /// Calls `visitor` once per distinct patient, in [`Catalog::patients`] order
    ///
    /// The snapshot is taken before the first call, so the visitor may use
    /// the catalog itself. Returns the number of invocations.
    pub fn for_each_patient<F>(&self, mut visitor: F) -> Result<usize>
    where
        F: FnMut(&PatientSummary),
    {
        let patients = self.patients()?;
        for patient in &patients {
            visitor(patient);
        }
        Ok(patients.len())
    }

    /// Returns every image of the named patient, ordered by study, series and instance
    pub fn images_for_patient(&self, patient_name: &str) -> Result<Vec<ImageRecord>> {
        self.query_images(
            &format!(
                "{SELECT_IMAGE_COLUMNS} WHERE patient_name = ?1 \
                 ORDER BY study_uid, series_uid, sop_uid"
            ),
            patient_name,
        )
    }

    /// Returns the named patient's images that have not been sent yet
    pub fn unsent_images_for_patient(&self, patient_name: &str) -> Result<Vec<ImageRecord>> {
        self.query_images(
            &format!(
                "{SELECT_IMAGE_COLUMNS} WHERE patient_name = ?1 AND sent = 0 \
                 ORDER BY study_uid, series_uid, sop_uid"
            ),
            patient_name,
        )
    }

    fn query_images(&self, sql: &str, patient_name: &str) -> Result<Vec<ImageRecord>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare_cached(sql)?;
            let rows = stmt.query_map([patient_name], row_to_record)?;
            rows.collect()
        })
    }

    /// Flags an image as transferred
    ///
    /// Returns `false` if no image has that SOP instance UID.
    pub fn mark_sent(&self, sop_uid: &str) -> Result<bool> {
        let updated = self.with_connection(|conn| {
            conn.execute("UPDATE images SET sent = 1 WHERE sop_uid = ?1", [sop_uid])
        })?;
        Ok(updated > 0)
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<ImageRecord> {
    Ok(ImageRecord {
        patient_name: row.get(0)?,
        patient_id: row.get(1)?,
        birth_date: row.get(2)?,
        study_uid: row.get(3)?,
        modality: row.get(4)?,
        study_description: row.get(5)?,
        study_date: row.get(6)?,
        series_uid: row.get(7)?,
        series_description: row.get(8)?,
        sop_uid: row.get(9)?,
        file_path: PathBuf::from(row.get::<_, String>(10)?),
        sent: row.get(11)?,
    })
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog").field("location", &":memory:").finish()
    }
}
