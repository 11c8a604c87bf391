use chrono::NaiveDate;
use group_displacement::workflows::displacement::{
    analyze, comparable_last_year_date, AnalysisInput, AnalysisSettings, DecisionParameters,
    DemandBuilder, DemandOptions, DemandTable, DisplacementReport, GroupRequestParams,
    RoomAllocation,
};
use group_displacement::workflows::import::{DemandFiles, DemandImporter};
use std::path::PathBuf;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn imported_table() -> DemandTable {
    let sources = DemandImporter::default()
        .sources_from_paths(&DemandFiles {
            current_year: fixture("individual_current_year.csv"),
            last_year: fixture("individual_last_year.csv"),
            confirmed_groups: Some(fixture("confirmed_groups.csv")),
            optioned_groups: None,
        })
        .expect("fixtures import");

    DemandBuilder::new(DemandOptions::default())
        .build(&sources, date(2025, 6, 10), date(2025, 6, 13))
        .expect("demand table builds")
}

fn group() -> GroupRequestParams {
    GroupRequestParams {
        group_name: "Automotive Launch".to_string(),
        arrival: date(2025, 6, 10),
        departure: date(2025, 6, 13),
        allocation: RoomAllocation::Uniform { rooms: 20 },
        gross_adr: 330.0,
        net_adr: None,
        ancillary: Default::default(),
    }
}

#[test]
fn imported_exports_build_aligned_demand() {
    let table = imported_table();
    assert_eq!(
        table.dates(),
        vec![date(2025, 6, 10), date(2025, 6, 11), date(2025, 6, 12)]
    );

    let first = table.get(date(2025, 6, 10)).expect("first night");
    assert_eq!(first.comparable_last_year_date, date(2024, 6, 11));
    assert_eq!(first.individual_room_nights_current_year, 20.0);
    assert_eq!(first.individual_adr_current_year, 160.0);
    assert_eq!(first.individual_room_nights_last_year, 30.0);
    assert_eq!(first.forecast_individual_room_nights, 33.0);
    assert_eq!(first.confirmed_group_room_nights, 5.0);
    assert_eq!(first.optioned_group_room_nights, 0.0);

    let totals: Vec<f64> = table
        .rows()
        .iter()
        .map(|row| row.total_room_nights_before_new_group)
        .collect();
    assert_eq!(totals, vec![58.0, 51.0, 50.0]);

    for row in table.rows() {
        assert_eq!(row.comparable_last_year_date, comparable_last_year_date(row.date));
    }
}

#[test]
fn imported_demand_drives_a_full_decision() {
    let table = imported_table();
    let settings = AnalysisSettings::default();
    let request = group().to_request(&settings).expect("valid request");

    let result = analyze(AnalysisInput {
        demand: &table,
        request: &request,
        settings: &settings,
        decision: &DecisionParameters::default(),
    })
    .expect("analysis succeeds");

    let displaced: Vec<f64> = result
        .rows()
        .iter()
        .map(|row| row.rooms_displaced)
        .collect();
    assert_eq!(displaced, vec![12.0, 5.0, 4.0]);

    let summary = result.summarize();
    assert_eq!(summary.displaced_rooms, 21.0);
    assert!((summary.group_room_revenue - 60.0 * 300.0).abs() < 1e-6);
    assert!((summary.total_gross - 60.0 * 330.0).abs() < 1e-6);
    assert!(!summary.needs_authorization);

    let report = DisplacementReport::new("Automotive Launch", &result, "Front Office");
    assert_eq!(report.rows.len(), 3);
    assert!(report.authorization_email.is_none());
    assert_eq!(report.decision.total_impact, summary.total_impact);
}

#[test]
fn forecast_method_changes_rebuild_the_table() {
    let table = imported_table();
    let options = DemandOptions {
        forecast: group_displacement::workflows::displacement::ForecastMethod::RemainingPickup,
        ..DemandOptions::default()
    };

    let recomputed = table.recompute(&options);
    let forecasts: Vec<f64> = recomputed
        .rows()
        .iter()
        .map(|row| row.forecast_individual_room_nights)
        .collect();
    assert_eq!(forecasts, vec![10.0, 4.0, 2.0]);
    assert_eq!(table.rows()[0].forecast_individual_room_nights, 33.0);
}
