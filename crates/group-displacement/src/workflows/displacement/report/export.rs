use super::super::analyzer::AnalysisResult;
use super::super::demand::DemandTable;
use super::views::{AnalysisRowView, DemandRowView};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV record: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV output: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub fn write_analysis_csv<W: Write>(result: &AnalysisResult, writer: W) -> Result<(), ExportError> {
    write_records(result.rows().iter().map(AnalysisRowView::from), writer)
}

pub fn write_demand_csv<W: Write>(table: &DemandTable, writer: W) -> Result<(), ExportError> {
    write_records(table.rows().iter().map(DemandRowView::from), writer)
}

pub fn analysis_csv(result: &AnalysisResult) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_analysis_csv(result, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

pub fn demand_csv(table: &DemandTable) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_demand_csv(table, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

fn write_records<T, W>(records: impl Iterator<Item = T>, writer: W) -> Result<(), ExportError>
where
    T: Serialize,
    W: Write,
{
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
