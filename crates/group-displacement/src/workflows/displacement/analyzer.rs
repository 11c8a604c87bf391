use super::demand::DemandTable;
use super::domain::{AnalysisSettings, DateRow, DecisionParameters};
use super::request::{GroupNight, GroupRequest};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingInput {
    DemandTable,
    GroupRequest,
    DecisionParameters,
}

impl fmt::Display for MissingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MissingInput::DemandTable => "demand table",
            MissingInput::GroupRequest => "group request",
            MissingInput::DecisionParameters => "decision parameters",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisplacementError {
    #[error("displacement analysis is missing its {0}")]
    MissingConfiguration(MissingInput),
    #[error("hotel capacity must be at least one room")]
    ZeroCapacity,
    #[error("tax rate must be a finite value above -100%")]
    InvalidTaxRate,
    #[error("requested room count is too large for a single night")]
    RoomCountOverflow,
}

/// Everything a displacement run needs, fully populated.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInput<'a> {
    pub demand: &'a DemandTable,
    pub request: &'a GroupRequest,
    pub settings: &'a AnalysisSettings,
    pub decision: &'a DecisionParameters,
}

/// Outcome for one night of the candidate group's stay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRow {
    #[serde(flatten)]
    pub demand: DateRow,
    pub requested_rooms: f64,
    pub group_gross_adr: f64,
    pub group_net_adr: f64,
    pub ancillary_revenue: f64,
    pub rooms_available_before_group: f64,
    pub rooms_displaced: f64,
    pub rooms_group_accepted: f64,
    pub revenue_displaced: f64,
    pub revenue_group_rooms_effective: f64,
    pub revenue_impact_rooms: f64,
    pub revenue_impact_total: f64,
    pub occupancy_before_pct: f64,
    pub occupancy_with_group_pct: f64,
    pub avg_adr_current_year: f64,
    pub avg_adr_last_year: f64,
    pub extra_adr_vs_last_year: f64,
}

impl AnalysisRow {
    pub fn date(&self) -> NaiveDate {
        self.demand.date
    }
}

/// Immutable result of one run; a new run always produces a new value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    rows: Vec<AnalysisRow>,
    settings: AnalysisSettings,
    decision: DecisionParameters,
}

impl AnalysisResult {
    pub fn rows(&self) -> &[AnalysisRow] {
        &self.rows
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub fn decision_parameters(&self) -> &DecisionParameters {
        &self.decision
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(AnalysisRow::date).collect()
    }

    /// Copy limited to `dates`. Period ADRs keep the values of the full run.
    pub fn restrict_to(&self, dates: &[NaiveDate]) -> Self {
        let keep: BTreeSet<NaiveDate> = dates.iter().copied().collect();
        Self {
            rows: self
                .rows
                .iter()
                .filter(|row| keep.contains(&row.date()))
                .cloned()
                .collect(),
            settings: self.settings,
            decision: self.decision,
        }
    }
}

/// Runs the per-date displacement calculation.
///
/// The result holds exactly the request's nights. Nights missing from the
/// demand table are analysed against a zero baseline and are left out of the
/// period ADRs.
pub fn analyze(input: AnalysisInput<'_>) -> Result<AnalysisResult, DisplacementError> {
    let AnalysisInput {
        demand,
        request,
        settings,
        decision,
    } = input;

    if settings.capacity == 0 {
        return Err(DisplacementError::ZeroCapacity);
    }
    if !settings.tax_rate.is_finite() || settings.tax_rate <= -1.0 {
        return Err(DisplacementError::InvalidTaxRate);
    }

    debug!(
        group = %request.group_name,
        nights = request.nights.len(),
        capacity = settings.capacity,
        "running displacement analysis"
    );

    let joined: Vec<JoinedNight<'_>> = request
        .nights
        .iter()
        .map(|night| {
            let known = demand.get(night.date);
            let mut row = known
                .cloned()
                .unwrap_or_else(|| DateRow::empty(night.date));
            row.apply_baseline(settings.baseline);
            JoinedNight {
                row,
                night,
                in_table: known.is_some(),
            }
        })
        .collect();

    // Zero-filled nights carry no observed rates.
    let observed = || joined.iter().filter(|entry| entry.in_table).map(|entry| &entry.row);
    let avg_adr_current_year = period_adr(observed().map(|row| {
        (
            row.individual_room_nights_current_year,
            row.individual_adr_current_year,
        )
    }));
    let avg_adr_last_year = period_adr(observed().map(|row| {
        (
            row.individual_room_nights_last_year,
            row.individual_adr_last_year,
        )
    }));

    let capacity = f64::from(settings.capacity);
    let rows = joined
        .into_iter()
        .map(|JoinedNight { row, night, .. }| {
            let total_before = row.total_room_nights_before_new_group;
            if total_before > capacity {
                warn!(
                    date = %row.date,
                    total_before,
                    capacity,
                    "baseline demand already exceeds capacity"
                );
            }

            let requested = f64::from(night.requested_rooms);
            let rooms_displaced = (total_before + requested - capacity).max(0.0);
            let rooms_group_accepted = settings
                .acceptance
                .accepted_rooms(requested, rooms_displaced);
            let revenue_displaced = rooms_displaced * row.total_adr_before_new_group;
            let revenue_group_rooms_effective = rooms_group_accepted * night.net_adr;
            let revenue_impact_rooms = revenue_group_rooms_effective - revenue_displaced;

            AnalysisRow {
                requested_rooms: requested,
                group_gross_adr: night.gross_adr,
                group_net_adr: night.net_adr,
                ancillary_revenue: night.ancillary_revenue_per_day,
                rooms_available_before_group: capacity - total_before,
                rooms_displaced,
                rooms_group_accepted,
                revenue_displaced,
                revenue_group_rooms_effective,
                revenue_impact_rooms,
                revenue_impact_total: revenue_impact_rooms + night.ancillary_revenue_per_day,
                occupancy_before_pct: total_before / capacity * 100.0,
                occupancy_with_group_pct: (total_before + rooms_group_accepted - rooms_displaced)
                    / capacity
                    * 100.0,
                avg_adr_current_year,
                avg_adr_last_year,
                extra_adr_vs_last_year: night.net_adr - avg_adr_last_year,
                demand: row,
            }
        })
        .collect();

    Ok(AnalysisResult {
        rows,
        settings: *settings,
        decision: *decision,
    })
}

struct JoinedNight<'a> {
    row: DateRow,
    night: &'a GroupNight,
    in_table: bool,
}

/// Room-night weighted ADR over the period, falling back to the plain mean
/// of the rates when no room-nights were sold, and to zero without data.
pub fn period_adr(pairs: impl Iterator<Item = (f64, f64)>) -> f64 {
    let pairs: Vec<(f64, f64)> = pairs
        .filter(|(room_nights, adr)| room_nights.is_finite() && adr.is_finite())
        .collect();
    let room_nights: f64 = pairs.iter().map(|(room_nights, _)| room_nights).sum();
    if room_nights > 0.0 {
        let revenue: f64 = pairs.iter().map(|(room_nights, adr)| room_nights * adr).sum();
        return revenue / room_nights;
    }

    if pairs.is_empty() {
        0.0
    } else {
        pairs.iter().map(|(_, adr)| adr).sum::<f64>() / pairs.len() as f64
    }
}

/// Step-by-step configuration for callers that gather inputs incrementally.
///
/// Prefer [`analyze`] when every input is already at hand.
#[derive(Debug, Clone)]
pub struct DisplacementAnalyzer {
    settings: AnalysisSettings,
    demand: Option<DemandTable>,
    request: Option<GroupRequest>,
    decision: Option<DecisionParameters>,
}

impl DisplacementAnalyzer {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self {
            settings,
            demand: None,
            request: None,
            decision: None,
        }
    }

    pub fn with_demand(mut self, demand: DemandTable) -> Self {
        self.demand = Some(demand);
        self
    }

    pub fn with_group_request(mut self, request: GroupRequest) -> Self {
        self.request = Some(request);
        self
    }

    pub fn with_decision_parameters(mut self, decision: DecisionParameters) -> Self {
        self.decision = Some(decision);
        self
    }

    pub fn analyze(&self) -> Result<AnalysisResult, DisplacementError> {
        let demand = self
            .demand
            .as_ref()
            .ok_or(DisplacementError::MissingConfiguration(MissingInput::DemandTable))?;
        let request = self
            .request
            .as_ref()
            .ok_or(DisplacementError::MissingConfiguration(MissingInput::GroupRequest))?;
        let decision = self.decision.as_ref().ok_or(DisplacementError::MissingConfiguration(
            MissingInput::DecisionParameters,
        ))?;

        analyze(AnalysisInput {
            demand,
            request,
            settings: &self.settings,
            decision,
        })
    }
}
