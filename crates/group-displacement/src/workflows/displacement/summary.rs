use super::analyzer::{AnalysisResult, AnalysisRow};
use serde::Serialize;
use tracing::info;

/// Floor rates derived from the period ADRs and the revenue-manager percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdrBenchmarks {
    pub minimum_adr_current_year: f64,
    pub minimum_adr_last_year: f64,
    pub meets_current_year: bool,
    pub meets_last_year: bool,
}

/// Decision metrics for one analysis, recomputed from the rows on every call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub revenue_displaced: f64,
    pub group_room_revenue: f64,
    pub group_ancillary: f64,
    pub total_impact: f64,
    pub total_gross: f64,
    pub total_net: f64,
    pub authorization_threshold: f64,
    pub needs_authorization: bool,
    pub should_accept: bool,
    pub mean_group_gross_adr: f64,
    pub mean_group_net_adr: f64,
    pub avg_adr_current_year: f64,
    pub avg_adr_last_year: f64,
    pub extra_adr_vs_last_year: f64,
    pub extra_revenue_vs_last_year: f64,
    pub total_group_rooms: f64,
    pub accepted_rooms: f64,
    pub displaced_rooms: f64,
    pub avg_occupancy_before_pct: f64,
    pub avg_occupancy_with_group_pct: f64,
    pub room_profit: f64,
    pub total_revenue_profit: f64,
    pub profit_per_room: f64,
    pub adr_benchmarks: AdrBenchmarks,
}

impl AnalysisResult {
    pub fn summarize(&self) -> SummaryMetrics {
        summarize(self)
    }
}

fn sum(rows: &[AnalysisRow], field: impl Fn(&AnalysisRow) -> f64) -> f64 {
    rows.iter().map(field).sum()
}

fn mean(rows: &[AnalysisRow], field: impl Fn(&AnalysisRow) -> f64) -> f64 {
    if rows.is_empty() {
        0.0
    } else {
        sum(rows, field) / rows.len() as f64
    }
}

fn summarize(result: &AnalysisResult) -> SummaryMetrics {
    let rows = result.rows();
    let settings = result.settings();
    let decision = result.decision_parameters();

    let revenue_displaced = sum(rows, |row| row.revenue_displaced);
    let group_room_revenue = sum(rows, |row| row.revenue_group_rooms_effective);
    let group_ancillary = sum(rows, |row| row.ancillary_revenue);
    let total_impact = sum(rows, |row| row.revenue_impact_total);
    let total_gross = settings.gross_from_net(group_room_revenue) + group_ancillary;

    let mean_group_net_adr = mean(rows, |row| row.group_net_adr);
    let (avg_adr_current_year, avg_adr_last_year) = rows
        .first()
        .map(|row| (row.avg_adr_current_year, row.avg_adr_last_year))
        .unwrap_or((0.0, 0.0));
    let extra_adr_vs_last_year = mean_group_net_adr - avg_adr_last_year;

    let accepted_rooms = sum(rows, |row| row.rooms_group_accepted);
    let room_profit = group_room_revenue - revenue_displaced;
    let profit_per_room = if accepted_rooms > 0.0 {
        room_profit / accepted_rooms
    } else {
        0.0
    };

    let minimum_adr_current_year = avg_adr_current_year * decision.min_adr_pct_current_year / 100.0;
    let minimum_adr_last_year = avg_adr_last_year * decision.min_adr_pct_last_year / 100.0;

    let summary = SummaryMetrics {
        revenue_displaced,
        group_room_revenue,
        group_ancillary,
        total_impact,
        total_gross,
        total_net: group_room_revenue + group_ancillary,
        authorization_threshold: settings.authorization_threshold,
        needs_authorization: total_gross > settings.authorization_threshold,
        should_accept: total_impact > 0.0,
        mean_group_gross_adr: mean(rows, |row| row.group_gross_adr),
        mean_group_net_adr,
        avg_adr_current_year,
        avg_adr_last_year,
        extra_adr_vs_last_year,
        extra_revenue_vs_last_year: extra_adr_vs_last_year * accepted_rooms,
        total_group_rooms: sum(rows, |row| row.requested_rooms),
        accepted_rooms,
        displaced_rooms: sum(rows, |row| row.rooms_displaced),
        avg_occupancy_before_pct: mean(rows, |row| row.occupancy_before_pct),
        avg_occupancy_with_group_pct: mean(rows, |row| row.occupancy_with_group_pct),
        room_profit,
        total_revenue_profit: room_profit + group_ancillary,
        profit_per_room,
        adr_benchmarks: AdrBenchmarks {
            minimum_adr_current_year,
            minimum_adr_last_year,
            meets_current_year: mean_group_net_adr >= minimum_adr_current_year,
            meets_last_year: mean_group_net_adr >= minimum_adr_last_year,
        },
    };

    info!(
        nights = rows.len(),
        total_impact = summary.total_impact,
        total_gross = summary.total_gross,
        should_accept = summary.should_accept,
        needs_authorization = summary.needs_authorization,
        "displacement decision"
    );

    summary
}
