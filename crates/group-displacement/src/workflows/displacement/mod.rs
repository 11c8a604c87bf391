mod analyzer;
pub mod calendar;
mod demand;
pub mod domain;
pub mod report;
mod request;
mod router;
mod scenarios;
mod summary;

#[cfg(test)]
mod tests;

pub use analyzer::{
    analyze, period_adr, AnalysisInput, AnalysisResult, AnalysisRow, DisplacementAnalyzer,
    DisplacementError, MissingInput,
};
pub use calendar::{comparable_last_year_date, nights, weekday_label};
pub use demand::{DemandBuilder, DemandError, DemandSources, DemandTable, ManualDemandEntry};
pub use domain::{
    AnalysisSettings, BaselineComposition, DateRow, DecisionParameters, Demand, DemandOptions,
    DemandRecord, ForecastMethod, GroupAcceptancePolicy, ObservedDemand, AUTHORIZATION_THRESHOLD,
    DEFAULT_HOTEL_CAPACITY, DEFAULT_TAX_RATE,
};
pub use report::{AuthorizationEmail, DisplacementReport, ExportError};
pub use request::{
    weighted_net_adr, AncillaryRevenue, DailyRooms, GroupNight, GroupRequest, GroupRequestParams,
    RoomAllocation, RoomType,
};
pub use router::{
    displacement_router, AnalyzeRequest, AnalyzeResponse, DemandPayload, DemandResponse,
    ExportRequest, ExportTable,
};
pub use scenarios::{forward_increment, sweep, ScenarioKind, ScenarioOutcome, ScenarioSweep};
pub use summary::{AdrBenchmarks, SummaryMetrics};
