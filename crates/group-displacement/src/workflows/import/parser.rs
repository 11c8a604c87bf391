use super::normalizer::{normalize_header, parse_amount, parse_date};
use super::{DemandColumns, DemandImportError};
use crate::workflows::displacement::DemandRecord;
use std::io::Read;

struct ColumnIndexes {
    date: usize,
    room_nights: usize,
    adr: usize,
}

impl ColumnIndexes {
    fn locate(
        headers: &csv::StringRecord,
        columns: &DemandColumns,
    ) -> Result<Self, DemandImportError> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let find = |name: &str| {
            let wanted = normalize_header(name);
            normalized
                .iter()
                .position(|header| *header == wanted)
                .ok_or_else(|| DemandImportError::MissingColumn {
                    column: name.to_string(),
                })
        };

        Ok(Self {
            date: find(&columns.date)?,
            room_nights: find(&columns.room_nights)?,
            adr: find(&columns.adr)?,
        })
    }
}

pub(crate) fn parse_records<R: Read>(
    reader: R,
    columns: &DemandColumns,
) -> Result<Vec<DemandRecord>, DemandImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let indexes = ColumnIndexes::locate(csv_reader.headers()?, columns)?;
    let mut records = Vec::new();

    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let line = index + 2;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let cell = |position: usize| record.get(position).unwrap_or("");

        let raw_date = cell(indexes.date);
        let date = parse_date(raw_date).ok_or_else(|| DemandImportError::InvalidDate {
            line,
            value: raw_date.to_string(),
        })?;

        let amount = |position: usize, column: &str| {
            let raw = cell(position);
            parse_amount(raw).ok_or_else(|| DemandImportError::InvalidNumber {
                line,
                column: column.to_string(),
                value: raw.to_string(),
            })
        };

        records.push(DemandRecord {
            date,
            room_nights: amount(indexes.room_nights, &columns.room_nights)?,
            adr: amount(indexes.adr, &columns.adr)?,
        });
    }

    Ok(records)
}
