use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::displacement::domain::{AnalysisSettings, DateRow, DecisionParameters};
use crate::workflows::displacement::request::{
    AncillaryRevenue, GroupRequest, GroupRequestParams, RoomAllocation,
};
use crate::workflows::displacement::DemandTable;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn stay_dates() -> Vec<NaiveDate> {
    vec![date(2025, 6, 10), date(2025, 6, 11), date(2025, 6, 12)]
}

/// Row whose default baseline is `on_the_books + forecast + confirmed`.
pub(super) fn demand_row(
    day: NaiveDate,
    on_the_books: f64,
    forecast: f64,
    confirmed: f64,
) -> DateRow {
    let mut row = DateRow::empty(day);
    row.individual_room_nights_current_year = on_the_books;
    row.individual_adr_current_year = 150.0;
    row.individual_room_nights_last_year = forecast - 2.0;
    row.individual_adr_last_year = 140.0;
    row.forecast_individual_room_nights = forecast;
    row.forecast_individual_adr = 150.0;
    row.confirmed_group_room_nights = confirmed;
    row.confirmed_group_adr = 100.0;
    row.apply_baseline(Default::default());
    row
}

/// Baselines of 50, 52 and 48 rooms over the three stay nights.
pub(super) fn demand_table() -> DemandTable {
    let dates = stay_dates();
    DemandTable::from(vec![
        demand_row(dates[0], 20.0, 25.0, 5.0),
        demand_row(dates[1], 20.0, 27.0, 5.0),
        demand_row(dates[2], 18.0, 25.0, 5.0),
    ])
}

pub(super) fn settings() -> AnalysisSettings {
    AnalysisSettings::default()
}

pub(super) fn decision() -> DecisionParameters {
    DecisionParameters::default()
}

pub(super) fn group_params(rooms: u32) -> GroupRequestParams {
    GroupRequestParams {
        group_name: "Pharma Congress".to_string(),
        arrival: date(2025, 6, 10),
        departure: date(2025, 6, 13),
        allocation: RoomAllocation::Uniform { rooms },
        gross_adr: 900.0,
        net_adr: None,
        ancillary: AncillaryRevenue {
            food_and_beverage: 1_500.0,
            meeting_space: 600.0,
            other: 0.0,
        },
    }
}

pub(super) fn group_request(rooms: u32) -> GroupRequest {
    group_params(rooms).to_request(&settings()).expect("valid request")
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
