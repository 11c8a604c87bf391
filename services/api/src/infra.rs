use chrono::NaiveDate;
use group_displacement::workflows::import;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Clap value parser sharing the date formats accepted by the CSV import.
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    import::parse_date(raw)
        .ok_or_else(|| format!("failed to parse '{raw}' as YYYY-MM-DD or DD/MM/YYYY"))
}
