//! Roster loading and the per-recipient record type.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::compose::Template;

/// One roster row, constructed once at load time.
///
/// The course variant populates the optional fields; the certificate
/// variant leaves whatever columns are absent as `None`. Cells are kept as
/// trimmed text: numeric-looking entries are never parsed into numbers, so
/// identifiers keep their leading zeros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientRecord {
    pub full_name: String,
    pub email: String,
    pub cert_no: String,
    pub father_name: Option<String>,
    pub course_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub issue_date: Option<String>,
    pub roll_no: Option<String>,
}

impl RecipientRecord {
    /// Identifier used in logs and file naming: the roll number when
    /// present, the certificate number otherwise.
    pub fn key(&self) -> &str {
        self.roll_no
            .as_deref()
            .filter(|roll| !roll.is_empty())
            .unwrap_or(&self.cert_no)
    }
}

/// Ordered sequence of recipient records; roster order defines processing
/// order.
#[derive(Debug)]
pub struct Roster {
    records: Vec<RecipientRecord>,
}

/// Fatal roster problems, raised before any row is processed.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("cannot read roster {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("roster {} is missing required columns: {missing}", .path.display())]
    MissingColumns { path: PathBuf, missing: String },
}

impl Roster {
    /// Load a roster, enforcing the template's required column set.
    ///
    /// A missing column is fatal; empty cells are not — those surface later
    /// as per-row validation failures.
    pub fn load(path: &Path, template: Template) -> Result<Self, RosterError> {
        let unreadable = |source| RosterError::Unreadable {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(unreadable)?;
        let headers = reader.headers().map_err(unreadable)?.clone();

        let missing: Vec<&str> = template
            .required_columns()
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|header| header == *column))
            .collect();
        if !missing.is_empty() {
            return Err(RosterError::MissingColumns {
                path: path.to_path_buf(),
                missing: missing.join(", "),
            });
        }

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(unreadable)?;
            let cell = |name: &str| -> Option<String> {
                headers
                    .iter()
                    .position(|header| header == name)
                    .and_then(|index| row.get(index))
                    .map(str::to_string)
            };
            records.push(RecipientRecord {
                full_name: cell("full_name").unwrap_or_default(),
                email: cell("email").unwrap_or_default(),
                cert_no: cell("cert_no").unwrap_or_default(),
                father_name: cell("father_name"),
                course_name: cell("course_name"),
                start_date: cell("start_date"),
                end_date: cell("end_date"),
                issue_date: cell("issue_date"),
                roll_no: cell("roll_no"),
            });
        }

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecipientRecord> {
        self.records.iter()
    }
}
