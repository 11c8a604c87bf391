use super::super::analyzer::AnalysisRow;
use super::super::calendar::weekday_label;
use super::super::domain::DateRow;
use super::super::summary::SummaryMetrics;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DemandRowView {
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub comparable_last_year_date: NaiveDate,
    pub comparable_weekday: &'static str,
    pub individual_room_nights_current_year: f64,
    pub individual_adr_current_year: f64,
    pub individual_revenue_current_year: f64,
    pub individual_room_nights_last_year: f64,
    pub individual_adr_last_year: f64,
    pub individual_revenue_last_year: f64,
    pub forecast_individual_room_nights: f64,
    pub forecast_individual_adr: f64,
    pub forecast_individual_revenue: f64,
    pub confirmed_group_room_nights: f64,
    pub confirmed_group_adr: f64,
    pub confirmed_group_revenue: f64,
    pub optioned_group_room_nights: f64,
    pub optioned_group_adr: f64,
    pub optioned_group_revenue: f64,
    pub total_room_nights_before_new_group: f64,
    pub total_adr_before_new_group: f64,
    pub total_revenue_before_new_group: f64,
    pub total_room_nights_with_options: f64,
}

impl From<&DateRow> for DemandRowView {
    fn from(row: &DateRow) -> Self {
        Self {
            date: row.date,
            weekday: weekday_label(row.date),
            comparable_last_year_date: row.comparable_last_year_date,
            comparable_weekday: weekday_label(row.comparable_last_year_date),
            individual_room_nights_current_year: row.individual_room_nights_current_year,
            individual_adr_current_year: row.individual_adr_current_year,
            individual_revenue_current_year: row.individual_revenue_current_year(),
            individual_room_nights_last_year: row.individual_room_nights_last_year,
            individual_adr_last_year: row.individual_adr_last_year,
            individual_revenue_last_year: row.individual_revenue_last_year(),
            forecast_individual_room_nights: row.forecast_individual_room_nights,
            forecast_individual_adr: row.forecast_individual_adr,
            forecast_individual_revenue: row.forecast_individual_revenue(),
            confirmed_group_room_nights: row.confirmed_group_room_nights,
            confirmed_group_adr: row.confirmed_group_adr,
            confirmed_group_revenue: row.confirmed_group_revenue(),
            optioned_group_room_nights: row.optioned_group_room_nights,
            optioned_group_adr: row.optioned_group_adr,
            optioned_group_revenue: row.optioned_group_revenue(),
            total_room_nights_before_new_group: row.total_room_nights_before_new_group,
            total_adr_before_new_group: row.total_adr_before_new_group,
            total_revenue_before_new_group: row.total_revenue_before_new_group(),
            total_room_nights_with_options: row.total_room_nights_with_options,
        }
    }
}

/// Condensed per-night outcome for reports and exports.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRowView {
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub total_room_nights_before_new_group: f64,
    pub total_adr_before_new_group: f64,
    pub rooms_available_before_group: f64,
    pub requested_rooms: f64,
    pub rooms_displaced: f64,
    pub rooms_group_accepted: f64,
    pub group_gross_adr: f64,
    pub group_net_adr: f64,
    pub revenue_displaced: f64,
    pub revenue_group_rooms_effective: f64,
    pub ancillary_revenue: f64,
    pub revenue_impact_rooms: f64,
    pub revenue_impact_total: f64,
    pub occupancy_before_pct: f64,
    pub occupancy_with_group_pct: f64,
    pub extra_adr_vs_last_year: f64,
}

impl From<&AnalysisRow> for AnalysisRowView {
    fn from(row: &AnalysisRow) -> Self {
        Self {
            date: row.date(),
            weekday: weekday_label(row.date()),
            total_room_nights_before_new_group: row.demand.total_room_nights_before_new_group,
            total_adr_before_new_group: row.demand.total_adr_before_new_group,
            rooms_available_before_group: row.rooms_available_before_group,
            requested_rooms: row.requested_rooms,
            rooms_displaced: row.rooms_displaced,
            rooms_group_accepted: row.rooms_group_accepted,
            group_gross_adr: row.group_gross_adr,
            group_net_adr: row.group_net_adr,
            revenue_displaced: row.revenue_displaced,
            revenue_group_rooms_effective: row.revenue_group_rooms_effective,
            ancillary_revenue: row.ancillary_revenue,
            revenue_impact_rooms: row.revenue_impact_rooms,
            revenue_impact_total: row.revenue_impact_total,
            occupancy_before_pct: row.occupancy_before_pct,
            occupancy_with_group_pct: row.occupancy_with_group_pct,
            extra_adr_vs_last_year: row.extra_adr_vs_last_year,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Accept,
    Decline,
}

impl Recommendation {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Accept => "Accept the group",
            Self::Decline => "Decline or renegotiate",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DecisionView {
    pub recommendation: Recommendation,
    pub recommendation_label: &'static str,
    pub needs_authorization: bool,
    pub authorization_label: String,
    pub total_impact: f64,
    pub total_gross: f64,
}

impl From<&SummaryMetrics> for DecisionView {
    fn from(summary: &SummaryMetrics) -> Self {
        let recommendation = if summary.should_accept {
            Recommendation::Accept
        } else {
            Recommendation::Decline
        };
        let authorization_label = if summary.needs_authorization {
            format!(
                "Revenue manager authorization required above {}",
                super::format_amount(summary.authorization_threshold)
            )
        } else {
            "Within sales authority".to_string()
        };

        Self {
            recommendation,
            recommendation_label: recommendation.label(),
            needs_authorization: summary.needs_authorization,
            authorization_label,
            total_impact: summary.total_impact,
            total_gross: summary.total_gross,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FinancialLine {
    pub label: &'static str,
    pub value: f64,
}

/// Financial breakdown in the order it is presented to the revenue manager.
pub fn financial_lines(summary: &SummaryMetrics) -> Vec<FinancialLine> {
    [
        ("Group room revenue (net)", summary.group_room_revenue),
        ("Ancillary revenue", summary.group_ancillary),
        ("Total net", summary.total_net),
        ("Total gross", summary.total_gross),
        ("Displaced revenue", summary.revenue_displaced),
        ("Room profit", summary.room_profit),
        ("Extra revenue vs last year", summary.extra_revenue_vs_last_year),
        ("Extra ADR vs last year", summary.extra_adr_vs_last_year),
        ("Profit per room", summary.profit_per_room),
        ("Total revenue profit", summary.total_revenue_profit),
        ("Total revenue impact", summary.total_impact),
    ]
    .into_iter()
    .map(|(label, value)| FinancialLine { label, value })
    .collect()
}
