//! CSV adapter turning booking exports into demand records.
//!
//! Every file carries one row per stay date with a date, a room-night count
//! and an ADR column. Column names are configurable; matching ignores case,
//! surrounding whitespace and byte-order marks.

mod normalizer;
mod parser;

pub use normalizer::parse_date;

use crate::workflows::displacement::{DemandRecord, DemandSources};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum DemandImportError {
    #[error("failed to read demand export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid demand CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("demand export has no '{column}' column")]
    MissingColumn { column: String },
    #[error("line {line}: '{value}' is not a YYYY-MM-DD or DD/MM/YYYY date")]
    InvalidDate { line: usize, value: String },
    #[error("line {line}: '{value}' in column '{column}' is not a number")]
    InvalidNumber {
        line: usize,
        column: String,
        value: String,
    },
}

/// Header names of the date, room-night and ADR columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandColumns {
    pub date: String,
    pub room_nights: String,
    pub adr: String,
}

impl Default for DemandColumns {
    fn default() -> Self {
        Self {
            date: "Data".to_string(),
            room_nights: "RN".to_string(),
            adr: "ADR".to_string(),
        }
    }
}

/// Paths of the four demand exports. Group files are optional.
#[derive(Debug, Clone)]
pub struct DemandFiles<P> {
    pub current_year: P,
    pub last_year: P,
    pub confirmed_groups: Option<P>,
    pub optioned_groups: Option<P>,
}

#[derive(Debug, Clone, Default)]
pub struct DemandImporter {
    columns: DemandColumns,
}

impl DemandImporter {
    pub fn new(columns: DemandColumns) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &DemandColumns {
        &self.columns
    }

    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<DemandRecord>, DemandImportError> {
        let file = std::fs::File::open(path.as_ref())?;
        let records = self.from_reader(file)?;
        debug!(
            path = %path.as_ref().display(),
            records = records.len(),
            "imported demand export"
        );
        Ok(records)
    }

    pub fn from_reader<R: Read>(&self, reader: R) -> Result<Vec<DemandRecord>, DemandImportError> {
        parser::parse_records(reader, &self.columns)
    }

    pub fn sources_from_paths<P: AsRef<Path>>(
        &self,
        files: &DemandFiles<P>,
    ) -> Result<DemandSources, DemandImportError> {
        let optional = |path: &Option<P>| {
            path.as_ref()
                .map(|path| self.from_path(path))
                .transpose()
        };

        Ok(DemandSources {
            current_year: Some(self.from_path(&files.current_year)?),
            last_year: Some(self.from_path(&files.last_year)?),
            confirmed_groups: optional(&files.confirmed_groups)?,
            optioned_groups: optional(&files.optioned_groups)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn default_columns_read_standard_export() {
        let csv = "Data,RN,ADR\n2025-06-10,12,150.5\n11/06/2025,8,\n,,\n";
        let records = DemandImporter::default()
            .from_reader(Cursor::new(csv))
            .expect("import succeeds");

        assert_eq!(
            records,
            vec![
                DemandRecord {
                    date: date(2025, 6, 10),
                    room_nights: 12.0,
                    adr: 150.5,
                },
                DemandRecord {
                    date: date(2025, 6, 11),
                    room_nights: 8.0,
                    adr: 0.0,
                },
            ]
        );
    }

    #[test]
    fn custom_columns_match_regardless_of_case_and_order() {
        let csv = "\u{feff}Rate, Stay Date ,Rooms Sold,Notes\n180,2025-06-10,4,vip\n";
        let importer = DemandImporter::new(DemandColumns {
            date: "stay date".to_string(),
            room_nights: "ROOMS SOLD".to_string(),
            adr: "rate".to_string(),
        });

        let records = importer
            .from_reader(Cursor::new(csv))
            .expect("import succeeds");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].room_nights, 4.0);
        assert_eq!(records[0].adr, 180.0);
    }

    #[test]
    fn missing_column_is_named() {
        let csv = "Data,Rooms,ADR\n2025-06-10,3,100\n";
        let error = DemandImporter::default()
            .from_reader(Cursor::new(csv))
            .expect_err("missing RN column");
        assert!(matches!(
            error,
            DemandImportError::MissingColumn { ref column } if column == "RN"
        ));
    }

    #[test]
    fn invalid_cells_report_their_line() {
        let csv = "Data,RN,ADR\n2025-06-10,3,100\n2025-13-01,3,100\n";
        let error = DemandImporter::default()
            .from_reader(Cursor::new(csv))
            .expect_err("bad date");
        assert!(matches!(
            error,
            DemandImportError::InvalidDate { line: 3, ref value } if value == "2025-13-01"
        ));

        let csv = "Data,RN,ADR\n2025-06-10,three,100\n";
        let error = DemandImporter::default()
            .from_reader(Cursor::new(csv))
            .expect_err("bad number");
        assert_eq!(
            error.to_string(),
            "line 2: 'three' in column 'RN' is not a number"
        );
    }
}
