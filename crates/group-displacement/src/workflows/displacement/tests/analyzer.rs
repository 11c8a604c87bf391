use super::common::*;
use crate::workflows::displacement::domain::{AnalysisSettings, DateRow, GroupAcceptancePolicy};
use crate::workflows::displacement::request::{RoomAllocation, RoomType};
use crate::workflows::displacement::{
    analyze, period_adr, AnalysisInput, DemandTable, DisplacementAnalyzer, DisplacementError,
    MissingInput,
};

fn run(
    table: &DemandTable,
    rooms: u32,
    settings: &AnalysisSettings,
) -> crate::workflows::displacement::AnalysisResult {
    let request = group_params(rooms).to_request(settings).expect("valid request");
    analyze(AnalysisInput {
        demand: table,
        request: &request,
        settings,
        decision: &decision(),
    })
    .expect("analysis succeeds")
}

#[test]
fn end_to_end_capacity_66_matches_manual_recomputation() {
    let table = demand_table();
    let result = run(&table, 25, &settings());
    let rows = result.rows();

    assert_eq!(result.dates(), stay_dates());
    let baselines: Vec<f64> = rows
        .iter()
        .map(|row| row.demand.total_room_nights_before_new_group)
        .collect();
    assert_eq!(baselines, vec![50.0, 52.0, 48.0]);

    let displaced: Vec<f64> = rows.iter().map(|row| row.rooms_displaced).collect();
    assert_eq!(displaced, vec![9.0, 11.0, 7.0]);

    let net = 900.0 / 1.1;
    let blended = [
        (45.0 * 150.0 + 5.0 * 100.0) / 50.0,
        (47.0 * 150.0 + 5.0 * 100.0) / 52.0,
        (43.0 * 150.0 + 5.0 * 100.0) / 48.0,
    ];
    assert_close(rows[1].revenue_displaced, 11.0 * blended[1]);

    let expected_total: f64 = displaced
        .iter()
        .zip(blended)
        .map(|(rooms, adr)| 25.0 * net - rooms * adr + 700.0)
        .sum();
    let actual_total: f64 = rows.iter().map(|row| row.revenue_impact_total).sum();
    assert_close(actual_total, expected_total);

    for row in rows {
        assert_eq!(row.rooms_group_accepted, 25.0);
        assert_close(row.group_net_adr, net);
        assert_close(row.revenue_group_rooms_effective, 25.0 * net);
        assert_close(
            row.rooms_available_before_group,
            66.0 - row.demand.total_room_nights_before_new_group,
        );
    }
}

#[test]
fn displacement_is_never_negative() {
    let table = demand_table();
    for rooms in [0, 1, 5, 14, 16, 25, 80] {
        let result = run(&table, rooms, &settings());
        assert!(result.rows().iter().all(|row| row.rooms_displaced >= 0.0));
    }

    let light = run(&table, 10, &settings());
    assert!(light.rows().iter().all(|row| row.rooms_displaced == 0.0));
}

#[test]
fn zero_requested_rooms_leave_only_ancillary() {
    let table = demand_table();
    let result = run(&table, 0, &settings());

    for row in result.rows() {
        assert_eq!(row.rooms_displaced, 0.0);
        assert_eq!(row.revenue_displaced, 0.0);
        assert_close(row.revenue_impact_total, row.ancillary_revenue);
        assert_close(row.occupancy_with_group_pct, row.occupancy_before_pct);
    }
}

#[test]
fn occupancy_follows_baseline_and_may_exceed_capacity() {
    let day = stay_dates()[0];
    let table = DemandTable::from(vec![demand_row(day, 30.0, 35.0, 5.0)]);
    let mut params = group_params(10);
    params.departure = stay_dates()[1];
    let request = params.to_request(&settings()).expect("valid request");

    let result = analyze(AnalysisInput {
        demand: &table,
        request: &request,
        settings: &settings(),
        decision: &decision(),
    })
    .expect("analysis succeeds");

    let row = &result.rows()[0];
    assert_close(row.occupancy_before_pct, 70.0 / 66.0 * 100.0);
    assert!(row.occupancy_before_pct > 100.0);
    assert_eq!(row.rooms_displaced, 14.0);
    assert_close(row.occupancy_with_group_pct, (70.0 + 10.0 - 14.0) / 66.0 * 100.0);
    assert!(row.rooms_available_before_group < 0.0);
}

#[test]
fn nights_missing_from_demand_use_zero_baseline() {
    let dates = stay_dates();
    let table = DemandTable::from(vec![demand_row(dates[0], 20.0, 25.0, 5.0)]);
    let result = run(&table, 25, &settings());

    assert_eq!(result.rows().len(), 3);
    let missing = &result.rows()[2];
    assert_eq!(missing.date(), dates[2]);
    assert_eq!(missing.demand.total_room_nights_before_new_group, 0.0);
    assert_eq!(missing.rooms_displaced, 0.0);
    assert_close(missing.occupancy_with_group_pct, 25.0 / 66.0 * 100.0);
}

#[test]
fn nights_missing_from_demand_do_not_dilute_period_adr() {
    let dates = stay_dates();
    let mut unsold = DateRow::empty(dates[0]);
    unsold.individual_adr_current_year = 100.0;
    unsold.individual_adr_last_year = 120.0;
    let table = DemandTable::from(vec![unsold]);

    let mut params = group_params(10);
    params.departure = dates[2];
    let request = params.to_request(&settings()).expect("valid request");
    let result = analyze(AnalysisInput {
        demand: &table,
        request: &request,
        settings: &settings(),
        decision: &decision(),
    })
    .expect("analysis succeeds");

    assert_eq!(result.rows().len(), 2);
    for row in result.rows() {
        assert_close(row.avg_adr_current_year, 100.0);
        assert_close(row.avg_adr_last_year, 120.0);
    }

    let summary = result.summarize();
    assert_close(summary.extra_adr_vs_last_year, 900.0 / 1.1 - 120.0);
    assert_close(summary.adr_benchmarks.minimum_adr_current_year, 100.0);
}

#[test]
fn period_adr_is_zero_when_no_night_is_in_the_table() {
    let result = run(&DemandTable::default(), 10, &settings());
    assert!(result
        .rows()
        .iter()
        .all(|row| row.avg_adr_current_year == 0.0 && row.avg_adr_last_year == 0.0));
}

#[test]
fn net_of_displaced_policy_reduces_accepted_rooms() {
    let settings = AnalysisSettings {
        acceptance: GroupAcceptancePolicy::NetOfDisplaced,
        ..settings()
    };
    let table = demand_table();
    let result = run(&table, 25, &settings);

    let accepted: Vec<f64> = result
        .rows()
        .iter()
        .map(|row| row.rooms_group_accepted)
        .collect();
    assert_eq!(accepted, vec![16.0, 14.0, 18.0]);

    let row = &result.rows()[1];
    assert_close(row.revenue_group_rooms_effective, 14.0 * 900.0 / 1.1);
    assert_close(row.occupancy_with_group_pct, (52.0 + 14.0 - 11.0) / 66.0 * 100.0);
}

#[test]
fn single_room_type_without_addon_matches_uniform_request() {
    let table = demand_table();
    let uniform = run(&table, 25, &settings());

    let mut params = group_params(25);
    params.allocation = RoomAllocation::RoomTypes {
        types: vec![RoomType {
            name: "ROH".to_string(),
            count: 25,
            adr_addon: 0.0,
        }],
    };
    let request = params.to_request(&settings()).expect("valid request");
    let typed = analyze(AnalysisInput {
        demand: &table,
        request: &request,
        settings: &settings(),
        decision: &decision(),
    })
    .expect("analysis succeeds");

    for (left, right) in uniform.rows().iter().zip(typed.rows()) {
        assert_eq!(left.rooms_displaced, right.rooms_displaced);
        assert_close(left.group_net_adr, right.group_net_adr);
        assert_close(left.group_gross_adr, right.group_gross_adr);
        assert_close(left.revenue_impact_total, right.revenue_impact_total);
    }
}

#[test]
fn period_adrs_are_broadcast_on_every_row() {
    let table = demand_table();
    let result = run(&table, 25, &settings());

    // Every fixture row books current-year rooms at 150 and prior-year at 140.
    for row in result.rows() {
        assert_close(row.avg_adr_current_year, 150.0);
        assert_close(row.avg_adr_last_year, 140.0);
        assert_close(row.extra_adr_vs_last_year, 900.0 / 1.1 - 140.0);
    }
}

#[test]
fn period_adr_falls_back_to_plain_mean_then_zero() {
    let weighted = period_adr([(10.0, 100.0), (30.0, 200.0)].into_iter());
    assert_close(weighted, (1_000.0 + 6_000.0) / 40.0);

    let unweighted = period_adr([(0.0, 100.0), (0.0, 200.0)].into_iter());
    assert_close(unweighted, 150.0);

    assert_eq!(period_adr(std::iter::empty()), 0.0);
}

#[test]
fn baseline_is_recomputed_from_components() {
    let day = stay_dates()[0];
    let mut row = demand_row(day, 20.0, 25.0, 5.0);
    row.total_room_nights_before_new_group = 0.0;
    row.total_adr_before_new_group = 0.0;
    let table = DemandTable::from(vec![row]);

    let result = run(&table, 25, &settings());
    assert_eq!(result.rows()[0].demand.total_room_nights_before_new_group, 50.0);
    assert_eq!(result.rows()[0].rooms_displaced, 9.0);
}

#[test]
fn builder_reports_each_missing_input() {
    let analyzer = DisplacementAnalyzer::new(settings());
    assert_eq!(
        analyzer.analyze(),
        Err(DisplacementError::MissingConfiguration(MissingInput::DemandTable))
    );

    let analyzer = analyzer.with_demand(demand_table());
    assert_eq!(
        analyzer.analyze(),
        Err(DisplacementError::MissingConfiguration(MissingInput::GroupRequest))
    );

    let analyzer = analyzer.with_group_request(group_request(25));
    assert_eq!(
        analyzer.analyze(),
        Err(DisplacementError::MissingConfiguration(
            MissingInput::DecisionParameters
        ))
    );

    let result = analyzer
        .with_decision_parameters(decision())
        .analyze()
        .expect("fully configured analyzer runs");
    assert_eq!(result.rows().len(), 3);
}

#[test]
fn invalid_settings_are_rejected() {
    let table = demand_table();
    let request = group_request(25);

    let zero_capacity = AnalysisSettings {
        capacity: 0,
        ..settings()
    };
    let error = analyze(AnalysisInput {
        demand: &table,
        request: &request,
        settings: &zero_capacity,
        decision: &decision(),
    })
    .expect_err("zero capacity fails");
    assert_eq!(error, DisplacementError::ZeroCapacity);

    let bad_tax = AnalysisSettings {
        tax_rate: -1.0,
        ..settings()
    };
    let error = analyze(AnalysisInput {
        demand: &table,
        request: &request,
        settings: &bad_tax,
        decision: &decision(),
    })
    .expect_err("tax of -100% fails");
    assert_eq!(error, DisplacementError::InvalidTaxRate);
}

#[test]
fn restrict_to_keeps_selected_nights_only() {
    let table = demand_table();
    let result = run(&table, 25, &settings());
    let dates = stay_dates();

    let subset = result.restrict_to(&[dates[0], dates[2], date(2025, 7, 1)]);
    assert_eq!(subset.dates(), vec![dates[0], dates[2]]);
    assert_eq!(subset.rows()[0], result.rows()[0]);
    assert_eq!(result.rows().len(), 3);
}
