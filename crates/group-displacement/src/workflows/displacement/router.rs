use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::analyzer::{analyze, AnalysisInput, AnalysisResult};
use super::demand::{DemandBuilder, DemandSources, DemandTable, ManualDemandEntry};
use super::domain::{AnalysisSettings, DecisionParameters, DemandOptions};
use super::report::views::DemandRowView;
use super::report::{analysis_csv, demand_csv, DisplacementReport};
use super::request::GroupRequestParams;
use super::scenarios::{sweep, ScenarioSweep};
use crate::error::AppError;

const DEFAULT_REQUESTER: &str = "Sales team";

/// Router exposing demand building, analysis, scenario and export endpoints.
///
/// `defaults` apply whenever a request omits its own hotel settings.
pub fn displacement_router(defaults: AnalysisSettings) -> Router {
    Router::new()
        .route("/api/v1/displacement/demand", post(demand_handler))
        .route("/api/v1/displacement/analyze", post(analyze_handler))
        .route("/api/v1/displacement/scenarios", post(scenarios_handler))
        .route("/api/v1/displacement/export", post(export_handler))
        .with_state(defaults)
}

#[derive(Debug, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DemandPayload {
    Sources {
        sources: DemandSources,
        start: NaiveDate,
        end: NaiveDate,
        #[serde(default)]
        options: DemandOptions,
    },
    Manual {
        entries: Vec<ManualDemandEntry>,
        #[serde(default)]
        options: DemandOptions,
    },
}

#[derive(Debug, Serialize)]
pub struct DemandResponse {
    pub table: DemandTable,
    pub rows: Vec<DemandRowView>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub demand: DemandTable,
    pub group: GroupRequestParams,
    #[serde(default)]
    pub settings: Option<AnalysisSettings>,
    #[serde(default)]
    pub decision: DecisionParameters,
    /// Limits the summary to these nights; every night is kept when absent.
    #[serde(default)]
    pub selected_dates: Option<Vec<NaiveDate>>,
    #[serde(default)]
    pub requester: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub indicative_total_value: f64,
    pub indicative_needs_authorization: bool,
    #[serde(flatten)]
    pub report: DisplacementReport,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportTable {
    #[default]
    Analysis,
    Demand,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub table: ExportTable,
    #[serde(flatten)]
    pub analysis: AnalyzeRequest,
}

impl AnalyzeRequest {
    fn settings(&self, defaults: AnalysisSettings) -> AnalysisSettings {
        self.settings.unwrap_or(defaults)
    }

    fn run(&self, defaults: AnalysisSettings) -> Result<AnalysisResult, AppError> {
        let settings = self.settings(defaults);
        let request = self.group.to_request(&settings)?;
        let result = analyze(AnalysisInput {
            demand: &self.demand,
            request: &request,
            settings: &settings,
            decision: &self.decision,
        })?;

        Ok(match &self.selected_dates {
            Some(dates) => result.restrict_to(dates),
            None => result,
        })
    }
}

pub(crate) async fn demand_handler(
    Json(payload): Json<DemandPayload>,
) -> Result<Json<DemandResponse>, AppError> {
    let table = match payload {
        DemandPayload::Sources {
            sources,
            start,
            end,
            options,
        } => DemandBuilder::new(options).build(&sources, start, end)?,
        DemandPayload::Manual { entries, options } => {
            DemandBuilder::new(options).from_manual_entries(&entries)
        }
    };

    let rows = table.rows().iter().map(DemandRowView::from).collect();
    Ok(Json(DemandResponse { table, rows }))
}

pub(crate) async fn analyze_handler(
    State(defaults): State<AnalysisSettings>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let result = payload.run(defaults)?;
    let requester = payload.requester.as_deref().unwrap_or(DEFAULT_REQUESTER);
    let report = DisplacementReport::new(&payload.group.group_name, &result, requester);
    let settings = payload.settings(defaults);

    Ok(Json(AnalyzeResponse {
        indicative_total_value: payload.group.indicative_total_value(&settings)?,
        indicative_needs_authorization: payload.group.indicative_needs_authorization(&settings)?,
        report,
    }))
}

pub(crate) async fn scenarios_handler(
    State(defaults): State<AnalysisSettings>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<ScenarioSweep>, AppError> {
    let settings = payload.settings(defaults);
    let request = payload.group.to_request(&settings)?;
    let scenarios = sweep(AnalysisInput {
        demand: &payload.demand,
        request: &request,
        settings: &settings,
        decision: &payload.decision,
    })?;
    Ok(Json(scenarios))
}

pub(crate) async fn export_handler(
    State(defaults): State<AnalysisSettings>,
    Json(payload): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let body = match payload.table {
        ExportTable::Analysis => analysis_csv(&payload.analysis.run(defaults)?)?,
        ExportTable::Demand => demand_csv(&payload.analysis.demand)?,
    };

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        body,
    )
        .into_response())
}
