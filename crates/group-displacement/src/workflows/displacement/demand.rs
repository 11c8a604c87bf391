use super::calendar::{comparable_last_year_date, nights};
use super::domain::{DateRow, Demand, DemandOptions, DemandRecord, ObservedDemand};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DemandError {
    #[error("current-year individual demand is required to build a baseline")]
    MissingCurrentYear,
    #[error("prior-year individual demand is required to build a baseline")]
    MissingLastYear,
}

/// Raw demand exports feeding the builder.
///
/// Individual demand for both years is mandatory. Group tables are optional:
/// an absent table means no group demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemandSources {
    #[serde(default)]
    pub current_year: Option<Vec<DemandRecord>>,
    #[serde(default)]
    pub last_year: Option<Vec<DemandRecord>>,
    #[serde(default)]
    pub confirmed_groups: Option<Vec<DemandRecord>>,
    #[serde(default)]
    pub optioned_groups: Option<Vec<DemandRecord>>,
}

/// A hand-entered set of observed figures for one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManualDemandEntry {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub observed: ObservedDemand,
}

/// Gap-free, date-ordered demand table. Dates are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<DateRow>", into = "Vec<DateRow>")]
pub struct DemandTable {
    rows: Vec<DateRow>,
}

impl From<Vec<DateRow>> for DemandTable {
    fn from(rows: Vec<DateRow>) -> Self {
        let by_date: BTreeMap<NaiveDate, DateRow> =
            rows.into_iter().map(|row| (row.date, row)).collect();
        Self {
            rows: by_date.into_values().collect(),
        }
    }
}

impl From<DemandTable> for Vec<DateRow> {
    fn from(table: DemandTable) -> Self {
        table.rows
    }
}

impl DemandTable {
    /// Zero-filled template for manual entry over the given dates.
    pub fn manual(dates: &[NaiveDate]) -> Self {
        Self::from(dates.iter().copied().map(DateRow::empty).collect::<Vec<_>>())
    }

    pub fn rows(&self) -> &[DateRow] {
        &self.rows
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DateRow> {
        self.rows
            .binary_search_by_key(&date, |row| row.date)
            .ok()
            .map(|index| &self.rows[index])
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|row| row.date).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// New table with forecast and baseline columns re-derived under `options`.
    pub fn recompute(&self, options: &DemandOptions) -> Self {
        let rows = self
            .rows
            .iter()
            .map(|row| DateRow::from_observed(row.date, row.observed(), options))
            .collect();
        Self { rows }
    }
}

/// Reconciles the demand sources into one row per date.
#[derive(Debug, Clone, Default)]
pub struct DemandBuilder {
    options: DemandOptions,
}

impl DemandBuilder {
    pub fn new(options: DemandOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DemandOptions {
        &self.options
    }

    /// Builds the table for every night from `start` up to, not including, `end`.
    pub fn build(
        &self,
        sources: &DemandSources,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DemandTable, DemandError> {
        self.build_for_dates(sources, &nights(start, end))
    }

    pub fn build_for_dates(
        &self,
        sources: &DemandSources,
        dates: &[NaiveDate],
    ) -> Result<DemandTable, DemandError> {
        let current_year = sources
            .current_year
            .as_deref()
            .ok_or(DemandError::MissingCurrentYear)?;
        let last_year = sources
            .last_year
            .as_deref()
            .ok_or(DemandError::MissingLastYear)?;

        let target: BTreeSet<NaiveDate> = dates.iter().copied().collect();
        let comparable: BTreeSet<NaiveDate> =
            target.iter().copied().map(comparable_last_year_date).collect();

        let current_year = aggregate(current_year, &target);
        let last_year = aggregate(last_year, &comparable);
        let confirmed = aggregate(sources.confirmed_groups.as_deref().unwrap_or(&[]), &target);
        let optioned = aggregate(sources.optioned_groups.as_deref().unwrap_or(&[]), &target);

        let rows: Vec<DateRow> = target
            .iter()
            .map(|&date| {
                let lookup = |source: &HashMap<NaiveDate, Demand>, key: NaiveDate| {
                    source.get(&key).copied().unwrap_or(Demand::ZERO)
                };
                let observed = ObservedDemand {
                    current_year: lookup(&current_year, date),
                    last_year: lookup(&last_year, comparable_last_year_date(date)),
                    confirmed_groups: lookup(&confirmed, date),
                    optioned_groups: lookup(&optioned, date),
                };
                DateRow::from_observed(date, observed, &self.options)
            })
            .collect();

        debug!(
            dates = rows.len(),
            forecast = self.options.forecast.label(),
            "built demand table"
        );

        Ok(DemandTable { rows })
    }

    /// Builds a table from hand-entered figures, deriving forecast and baseline.
    pub fn from_manual_entries(&self, entries: &[ManualDemandEntry]) -> DemandTable {
        let rows = entries
            .iter()
            .map(|entry| DateRow::from_observed(entry.date, entry.observed, &self.options))
            .collect::<Vec<_>>();
        DemandTable::from(rows)
    }
}

#[derive(Default)]
struct Accumulator {
    room_nights: f64,
    adr_total: f64,
    rows: usize,
}

// Room-nights are summed; ADR is the plain mean of the matching rows.
fn aggregate(
    records: &[DemandRecord],
    dates: &BTreeSet<NaiveDate>,
) -> HashMap<NaiveDate, Demand> {
    let mut totals: HashMap<NaiveDate, Accumulator> = HashMap::new();
    for record in records.iter().filter(|record| dates.contains(&record.date)) {
        let entry = totals.entry(record.date).or_default();
        entry.room_nights += record.room_nights;
        entry.adr_total += record.adr;
        entry.rows += 1;
    }

    totals
        .into_iter()
        .map(|(date, acc)| {
            let adr = if acc.rows > 0 {
                acc.adr_total / acc.rows as f64
            } else {
                0.0
            };
            (
                date,
                Demand {
                    room_nights: acc.room_nights,
                    adr,
                },
            )
        })
        .collect()
}
