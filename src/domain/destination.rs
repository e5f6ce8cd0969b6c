//! Transfer destinations and their persisted record format
//!
//! A destination is stored as a single line of five comma-separated fields:
//!
//! ```text
//! name,host,port,destination AE title,our AE title
//! ```
//!
//! The first four fields end at the next comma. The fifth field takes the
//! rest of the line, commas included, so `A,host,104,AE,OUR,TITLE` has
//! `OUR,TITLE` as its last field. Surrounding ASCII whitespace is dropped
//! from every field, as the legacy reader did; other Unicode spacing is kept.

use super::errors::RecordParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const DELIMITER: char = ',';
const FIELD_COUNT: usize = 5;

/// A named network transfer target
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DestinationEntry {
    pub name: String,
    pub destination_host: String,
    pub destination_port: u16,
    pub destination_ae_title: String,
    pub our_ae_title: String,
}

impl DestinationEntry {
    /// Creates a destination entry
    pub fn new(
        name: impl Into<String>,
        destination_host: impl Into<String>,
        destination_port: u16,
        destination_ae_title: impl Into<String>,
        our_ae_title: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            destination_host: destination_host.into(),
            destination_port,
            destination_ae_title: destination_ae_title.into(),
            our_ae_title: our_ae_title.into(),
        }
    }

    /// Parses one persisted record
    ///
    /// # Errors
    ///
    /// Returns [`RecordParseError::FieldCount`] when the line has fewer than
    /// five fields and [`RecordParseError::InvalidPort`] when the third field
    /// is not a base-10 port number.
    ///
    /// # Examples
    ///
    /// ```
    /// use studyferry::domain::DestinationEntry;
    ///
    /// let entry = DestinationEntry::parse_record("A,host,104,AE,OUR,TITLE").unwrap();
    /// assert_eq!(entry.destination_ae_title, "AE");
    /// assert_eq!(entry.our_ae_title, "OUR,TITLE");
    /// ```
    pub fn parse_record(record: &str) -> Result<Self, RecordParseError> {
        let fields: Vec<&str> = record.splitn(FIELD_COUNT, DELIMITER).map(trim_field).collect();
        if fields.len() != FIELD_COUNT {
            return Err(RecordParseError::FieldCount(fields.len()));
        }

        let port = fields[2]
            .parse::<u16>()
            .map_err(|_| RecordParseError::InvalidPort(fields[2].to_string()))?;

        Ok(Self::new(fields[0], fields[1], port, fields[3], fields[4]))
    }

    /// Serializes the entry into its persisted record form
    pub fn to_record(&self) -> String {
        format!(
            "{name}{d}{host}{d}{port}{d}{ae}{d}{ours}",
            name = self.name,
            host = self.destination_host,
            port = self.destination_port,
            ae = self.destination_ae_title,
            ours = self.our_ae_title,
            d = DELIMITER,
        )
    }

    /// Checks that the entry survives a save/load round trip
    ///
    /// Only the last field may contain the delimiter; a comma anywhere else
    /// would shift the fields when the record is read back.
    /// Fields must not start or end with whitespace either, since reading
    /// the record back would strip it.
    pub fn validate(&self) -> Result<(), String> {
        for (label, value) in [
            ("name", &self.name),
            ("host", &self.destination_host),
            ("destination AE title", &self.destination_ae_title),
            ("our AE title", &self.our_ae_title),
        ] {
            if trim_field(value) != value.as_str() {
                return Err(format!("{label} '{value}' has leading or trailing whitespace"));
            }
        }
        if self.name.trim().is_empty() {
            return Err("destination name cannot be empty".to_string());
        }
        if self.destination_host.trim().is_empty() {
            return Err("destination host cannot be empty".to_string());
        }
        if self.destination_port == 0 {
            return Err("destination port must be greater than 0".to_string());
        }
        for (label, value) in [
            ("name", &self.name),
            ("host", &self.destination_host),
            ("destination AE title", &self.destination_ae_title),
        ] {
            if value.contains(DELIMITER) {
                return Err(format!("{label} '{value}' must not contain '{DELIMITER}'"));
            }
        }
        Ok(())
    }
}

/// Strips the whitespace the record reader skips around each field
fn trim_field(field: &str) -> &str {
    field.trim_matches(|c: char| c.is_ascii_whitespace())
}

impl fmt::Display for DestinationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}@{}:{} as {})",
            self.name,
            self.destination_ae_title,
            self.destination_host,
            self.destination_port,
            self.our_ae_title
        )
    }
}

impl FromStr for DestinationEntry {
    type Err = RecordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_record(s)
    }
}
