//! Saved-pin interchange documents.
//!
//! A document is a versioned list of saved DIGIPINs with an address, a note,
//! a favourite flag and a creation time. It can be written as JSON or CSV and
//! read back from either. Only version `1.0.0` is understood.

use crate::core::codec::decode;
use crate::core::format::format_code;
use crate::util::error::DigipinError;
use chrono::{DateTime, SecondsFormat, Utc};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const CSV_HEADER: &str = "DIGIPIN,Address,Latitude,Longitude,Note,Favourite,Created At,Version";
const CSV_FIELDS: usize = 8;

/// Document format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportVersion {
    #[serde(rename = "1.0.0")]
    V1,
    /// Reserved; not readable yet.
    #[serde(rename = "2.0.0")]
    V2,
}

impl ExportVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportVersion::V1 => "1.0.0",
            ExportVersion::V2 => "2.0.0",
        }
    }
}

impl fmt::Display for ExportVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportVersion {
    type Err = DigipinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1.0.0" => Ok(ExportVersion::V1),
            "2.0.0" => Ok(ExportVersion::V2),
            other => Err(DigipinError::UnsupportedVersion(other.to_string())),
        }
    }
}

/// Serialization format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

/// One saved pin. Every field is a string, as written by the mobile app.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportItem {
    pub digipin: String,
    pub note: String,
    pub address: String,
    pub latitude: String,
    pub longitude: String,
    pub favourite: String,
    pub created_at: String,
}

impl ExportItem {
    /// Builds an item from a DIGIPIN, filling the coordinates from its centroid.
    ///
    /// # Example
    /// ```
    /// use digipin_rs::ExportItem;
    /// use chrono::{TimeZone, Utc};
    ///
    /// # fn main() -> Result<(), digipin_rs::DigipinError> {
    /// let created = Utc.with_ymd_and_hms(2025, 8, 11, 9, 30, 0).unwrap();
    /// let item = ExportItem::from_code("4p333c4635", "Campus", "", true, created)?;
    /// assert_eq!(item.digipin, "4P3-33C-4635");
    /// assert_eq!(item.latitude, "13.0060024");
    /// assert_eq!(item.favourite, "Yes");
    /// assert_eq!(item.created_at, "2025-08-11T09:30:00Z");
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_code(
        code: &str,
        address: impl Into<String>,
        note: impl Into<String>,
        favourite: bool,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DigipinError> {
        let digipin = format_code(code)?;
        let center = decode(&digipin)?;

        Ok(Self {
            digipin,
            note: note.into(),
            address: address.into(),
            latitude: format!("{:.7}", center.latitude),
            longitude: format!("{:.7}", center.longitude),
            favourite: if favourite { "Yes" } else { "No" }.to_string(),
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        })
    }

    pub fn is_favourite(&self) -> bool {
        self.favourite.eq_ignore_ascii_case("yes")
    }

    fn csv_fields(&self, version: ExportVersion) -> [&str; CSV_FIELDS] {
        [
            self.digipin.as_str(),
            self.address.as_str(),
            self.latitude.as_str(),
            self.longitude.as_str(),
            self.note.as_str(),
            self.favourite.as_str(),
            self.created_at.as_str(),
            version.as_str(),
        ]
    }

    fn from_csv_record(record: &StringRecord, row: usize) -> Result<Self, DigipinError> {
        if record.len() != CSV_FIELDS {
            return Err(DigipinError::ExportError(format!(
                "row {}: expected {} fields, got {}",
                row,
                CSV_FIELDS,
                record.len()
            )));
        }

        let field = |i: usize| record.get(i).unwrap_or_default().to_string();
        let digipin = format_code(record.get(0).unwrap_or_default())
            .map_err(|e| DigipinError::ExportError(format!("row {}: {}", row, e)))?;

        Ok(Self {
            digipin,
            address: field(1),
            latitude: field(2),
            longitude: field(3),
            note: field(4),
            favourite: field(5),
            created_at: field(6),
        })
    }
}

/// A versioned collection of saved pins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub version: ExportVersion,
    #[serde(rename = "exportDate")]
    pub export_date: String,
    #[serde(rename = "dpItems")]
    pub items: Vec<ExportItem>,
}

#[derive(Deserialize)]
struct VersionHeader {
    version: String,
}

impl ExportDocument {
    /// Creates a v1 document stamped with the current UTC time.
    pub fn new(items: Vec<ExportItem>) -> Self {
        Self {
            version: ExportVersion::V1,
            export_date: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            items,
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, DigipinError> {
        let result = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        result.map_err(|e| DigipinError::ExportError(e.to_string()))
    }

    /// Renders the document as CSV with every field quoted.
    ///
    /// The trailing `Version` column repeats the document version on each row.
    pub fn to_csv(&self) -> Result<String, DigipinError> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .from_writer(Vec::new());

        for item in &self.items {
            writer
                .write_record(item.csv_fields(self.version))
                .map_err(|e| DigipinError::ExportError(e.to_string()))?;
        }

        let body = writer
            .into_inner()
            .map_err(|e| DigipinError::ExportError(e.to_string()))?;
        let body = String::from_utf8(body).map_err(|e| DigipinError::ExportError(e.to_string()))?;

        Ok(format!("{}\n{}", CSV_HEADER, body))
    }

    pub fn to_format(&self, format: ExportFormat) -> Result<String, DigipinError> {
        match format {
            ExportFormat::Json => self.to_json(true),
            ExportFormat::Csv => self.to_csv(),
        }
    }
}

/// Reads a document written by [`ExportDocument::to_json`] or [`ExportDocument::to_csv`].
///
/// # Example
/// ```
/// use digipin_rs::{import_document, ExportFormat, ExportVersion};
///
/// # fn main() -> Result<(), digipin_rs::DigipinError> {
/// let json = r#"{"version":"1.0.0","exportDate":"2025-08-11T09:30:00Z","dpItems":[]}"#;
/// let doc = import_document(json, ExportFormat::Json)?;
/// assert_eq!(doc.version, ExportVersion::V1);
/// assert!(doc.items.is_empty());
/// # Ok(())
/// # }
/// ```
pub fn import_document(content: &str, format: ExportFormat) -> Result<ExportDocument, DigipinError> {
    match format {
        ExportFormat::Json => import_json(content),
        ExportFormat::Csv => import_csv(content),
    }
}

fn import_json(content: &str) -> Result<ExportDocument, DigipinError> {
    let header: VersionHeader = serde_json::from_str(content)
        .map_err(|e| DigipinError::ExportError(format!("failed to read version: {}", e)))?;
    let version = ExportVersion::from_str(&header.version)?;
    debug!("importing JSON document version {}", version);

    match version {
        ExportVersion::V1 => {
            let mut doc: ExportDocument = serde_json::from_str(content)
                .map_err(|e| DigipinError::ExportError(e.to_string()))?;
            for (i, item) in doc.items.iter_mut().enumerate() {
                item.digipin = format_code(&item.digipin)
                    .map_err(|e| DigipinError::ExportError(format!("item {}: {}", i + 1, e)))?;
            }
            Ok(doc)
        }
        ExportVersion::V2 => Err(DigipinError::UnsupportedVersion(version.to_string())),
    }
}

fn import_csv(content: &str) -> Result<ExportDocument, DigipinError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| DigipinError::ExportError(e.to_string()))?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        records.push(record);
    }

    if records.len() < 2 {
        return Err(DigipinError::ExportError(
            "not enough data: expected a header row and at least one item".to_string(),
        ));
    }

    let rows = &records[1..];
    let version_field = rows
        .last()
        .and_then(|record| record.iter().last())
        .unwrap_or_default();
    let version = ExportVersion::from_str(version_field)?;
    debug!("importing CSV document version {}", version);

    match version {
        ExportVersion::V1 => {
            let items = rows
                .iter()
                .enumerate()
                .map(|(i, record)| ExportItem::from_csv_record(record, i + 1))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ExportDocument::new(items))
        }
        ExportVersion::V2 => Err(DigipinError::UnsupportedVersion(version.to_string())),
    }
}
