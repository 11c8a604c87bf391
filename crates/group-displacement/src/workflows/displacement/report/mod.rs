mod email;
mod export;
pub mod views;

use super::analyzer::AnalysisResult;
use super::summary::SummaryMetrics;
use serde::Serialize;
use views::{financial_lines, AnalysisRowView, DecisionView, FinancialLine};

pub use email::AuthorizationEmail;
pub use export::{analysis_csv, demand_csv, write_analysis_csv, write_demand_csv, ExportError};

/// Everything shown to the revenue manager after a run.
#[derive(Debug, Clone, Serialize)]
pub struct DisplacementReport {
    pub group_name: String,
    pub rows: Vec<AnalysisRowView>,
    pub summary: SummaryMetrics,
    pub decision: DecisionView,
    pub financials: Vec<FinancialLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_email: Option<AuthorizationEmail>,
}

impl DisplacementReport {
    pub fn new(group_name: &str, result: &AnalysisResult, requester: &str) -> Self {
        let summary = result.summarize();
        Self {
            group_name: group_name.to_string(),
            rows: result.rows().iter().map(AnalysisRowView::from).collect(),
            decision: DecisionView::from(&summary),
            financials: financial_lines(&summary),
            authorization_email: AuthorizationEmail::for_result(
                group_name, result, &summary, requester,
            ),
            summary,
        }
    }
}

/// Euro amount with thousands separators and two decimals, e.g. `€35,000.01`.
pub fn format_amount(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (whole, fraction) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && formatted != "0.00" {
        "-"
    } else {
        ""
    };
    format!("{sign}€{grouped}.{fraction}")
}
