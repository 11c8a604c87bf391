use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use clap::Args;
use group_displacement::config::AppConfig;
use group_displacement::error::AppError;
use group_displacement::workflows::displacement::report::format_amount;
use group_displacement::workflows::displacement::report::write_analysis_csv;
use group_displacement::workflows::displacement::{
    analyze, comparable_last_year_date, nights, sweep, AnalysisInput, AnalysisSettings,
    AncillaryRevenue, DecisionParameters, DemandBuilder, DemandOptions, DemandRecord,
    DemandSources, DisplacementReport, ForecastMethod, GroupRequestParams, RoomAllocation,
    ScenarioSweep,
};
use group_displacement::workflows::import::{DemandColumns, DemandFiles, DemandImporter};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Current-year individual bookings export (CSV)
    #[arg(long)]
    pub(crate) current_year: PathBuf,
    /// Prior-year individual bookings export (CSV)
    #[arg(long)]
    pub(crate) last_year: PathBuf,
    /// Confirmed group bookings export (CSV)
    #[arg(long)]
    pub(crate) confirmed_groups: Option<PathBuf>,
    /// Optioned group bookings export (CSV)
    #[arg(long)]
    pub(crate) optioned_groups: Option<PathBuf>,
    /// Header of the stay-date column
    #[arg(long, default_value = "Data")]
    pub(crate) date_column: String,
    /// Header of the room-nights column
    #[arg(long, default_value = "RN")]
    pub(crate) rn_column: String,
    /// Header of the ADR column
    #[arg(long, default_value = "ADR")]
    pub(crate) adr_column: String,
    /// Name of the group under evaluation
    #[arg(long, default_value = "Group request")]
    pub(crate) group_name: String,
    /// Arrival date (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) arrival: NaiveDate,
    /// Departure date; the night before departure is the last night analysed
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) departure: NaiveDate,
    /// Rooms requested per night
    #[arg(long)]
    pub(crate) rooms: u32,
    /// Gross group ADR, tax included
    #[arg(long)]
    pub(crate) gross_adr: f64,
    /// Net group ADR; derived from the gross rate when omitted
    #[arg(long)]
    pub(crate) net_adr: Option<f64>,
    /// Food and beverage revenue for the whole stay
    #[arg(long, default_value_t = 0.0)]
    pub(crate) food_and_beverage: f64,
    /// Meeting space revenue for the whole stay
    #[arg(long, default_value_t = 0.0)]
    pub(crate) meeting_space: f64,
    /// Other ancillary revenue for the whole stay
    #[arg(long, default_value_t = 0.0)]
    pub(crate) other_ancillary: f64,
    /// Multiplier applied to prior-year demand for the individual forecast
    #[arg(long, default_value_t = 1.1)]
    pub(crate) last_year_multiplier: f64,
    /// Override the configured hotel capacity
    #[arg(long)]
    pub(crate) capacity: Option<u32>,
    /// Override the configured tax rate (0.10 = 10%)
    #[arg(long)]
    pub(crate) tax_rate: Option<f64>,
    /// Name signing the authorization email
    #[arg(long, default_value = "Sales team")]
    pub(crate) requester: String,
    /// Also run the rate scenario sweep
    #[arg(long)]
    pub(crate) scenarios: bool,
    /// Write the per-night results to this CSV file
    #[arg(long)]
    pub(crate) export: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Arrival date for the synthetic group. Defaults to 30 days from today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) arrival: Option<NaiveDate>,
    /// Rooms requested per night
    #[arg(long, default_value_t = 25)]
    pub(crate) rooms: u32,
    /// Gross group ADR
    #[arg(long, default_value_t = 240.0)]
    pub(crate) gross_adr: f64,
    /// Skip the rate scenario sweep
    #[arg(long)]
    pub(crate) skip_scenarios: bool,
}

pub(crate) fn run_analysis(args: AnalyzeArgs) -> Result<(), AppError> {
    let mut settings = AppConfig::load()?.analysis;
    if let Some(capacity) = args.capacity {
        settings.capacity = capacity;
    }
    if let Some(tax_rate) = args.tax_rate {
        settings.tax_rate = tax_rate;
    }

    let importer = DemandImporter::new(DemandColumns {
        date: args.date_column.clone(),
        room_nights: args.rn_column.clone(),
        adr: args.adr_column.clone(),
    });
    let sources = importer.sources_from_paths(&DemandFiles {
        current_year: &args.current_year,
        last_year: &args.last_year,
        confirmed_groups: args.confirmed_groups.as_ref(),
        optioned_groups: args.optioned_groups.as_ref(),
    })?;

    let options = DemandOptions {
        forecast: ForecastMethod::LastYearBased {
            multiplier: args.last_year_multiplier,
        },
        baseline: settings.baseline,
    };
    let group = GroupRequestParams {
        group_name: args.group_name.clone(),
        arrival: args.arrival,
        departure: args.departure,
        allocation: RoomAllocation::Uniform { rooms: args.rooms },
        gross_adr: args.gross_adr,
        net_adr: args.net_adr,
        ancillary: AncillaryRevenue {
            food_and_beverage: args.food_and_beverage,
            meeting_space: args.meeting_space,
            other: args.other_ancillary,
        },
    };

    let report = evaluate(&sources, options, &group, &settings, &args.requester)?;
    render_report(&report, &group, &settings)?;

    if args.scenarios {
        let sweep = run_sweep(&sources, options, &group, &settings)?;
        render_scenarios(&sweep);
    }

    if let Some(path) = args.export {
        let result = analyze_sources(&sources, options, &group, &settings)?;
        let file = std::fs::File::create(&path)?;
        write_analysis_csv(&result, file)?;
        println!("\nPer-night results written to {}", path.display());
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        arrival,
        rooms,
        gross_adr,
        skip_scenarios,
    } = args;

    let arrival = arrival.unwrap_or_else(|| Local::now().date_naive() + Duration::days(30));
    let departure = arrival + Duration::days(4);
    let settings = AnalysisSettings::default();
    let options = DemandOptions::default();
    let sources = synthetic_sources(arrival - Duration::days(3), departure + Duration::days(3));

    println!("Group displacement demo (synthetic demand, {} rooms)", settings.capacity);

    let group = GroupRequestParams {
        group_name: "Demo Incentive Trip".to_string(),
        arrival,
        departure,
        allocation: RoomAllocation::Uniform { rooms },
        gross_adr,
        net_adr: None,
        ancillary: AncillaryRevenue {
            food_and_beverage: 4_800.0,
            meeting_space: 1_200.0,
            other: 0.0,
        },
    };

    let report = evaluate(&sources, options, &group, &settings, "Demo Sales")?;
    render_report(&report, &group, &settings)?;

    if !skip_scenarios {
        let sweep = run_sweep(&sources, options, &group, &settings)?;
        render_scenarios(&sweep);
    }

    Ok(())
}

fn analyze_sources(
    sources: &DemandSources,
    options: DemandOptions,
    group: &GroupRequestParams,
    settings: &AnalysisSettings,
) -> Result<group_displacement::workflows::displacement::AnalysisResult, AppError> {
    let table = DemandBuilder::new(options).build(sources, group.arrival, group.departure)?;
    let request = group.to_request(settings)?;
    Ok(analyze(AnalysisInput {
        demand: &table,
        request: &request,
        settings,
        decision: &DecisionParameters::default(),
    })?)
}

fn evaluate(
    sources: &DemandSources,
    options: DemandOptions,
    group: &GroupRequestParams,
    settings: &AnalysisSettings,
    requester: &str,
) -> Result<DisplacementReport, AppError> {
    let result = analyze_sources(sources, options, group, settings)?;
    Ok(DisplacementReport::new(&group.group_name, &result, requester))
}

fn run_sweep(
    sources: &DemandSources,
    options: DemandOptions,
    group: &GroupRequestParams,
    settings: &AnalysisSettings,
) -> Result<ScenarioSweep, AppError> {
    let table = DemandBuilder::new(options).build(sources, group.arrival, group.departure)?;
    let request = group.to_request(settings)?;
    Ok(sweep(AnalysisInput {
        demand: &table,
        request: &request,
        settings,
        decision: &DecisionParameters::default(),
    })?)
}

fn render_report(
    report: &DisplacementReport,
    group: &GroupRequestParams,
    settings: &AnalysisSettings,
) -> Result<(), AppError> {
    println!("\nGroup: {}", report.group_name);
    let indicative = if group.indicative_needs_authorization(settings)? {
        "requires authorization"
    } else {
        "within sales authority"
    };
    println!(
        "Indicative value: {} ({indicative})",
        format_amount(group.indicative_total_value(settings)?)
    );

    println!("\nPer-night analysis");
    for row in &report.rows {
        println!(
            "- {} {} | baseline {:.0} | requested {:.0} | displaced {:.0} | occupancy {:.1}% -> {:.1}% | impact {}",
            row.weekday,
            row.date,
            row.total_room_nights_before_new_group,
            row.requested_rooms,
            row.rooms_displaced,
            row.occupancy_before_pct,
            row.occupancy_with_group_pct,
            format_amount(row.revenue_impact_total)
        );
    }

    println!("\nFinancials");
    for line in &report.financials {
        println!("- {}: {}", line.label, format_amount(line.value));
    }

    println!("\nDecision: {}", report.decision.recommendation_label);
    println!("Authorization: {}", report.decision.authorization_label);

    if let Some(email) = &report.authorization_email {
        println!("\nAuthorization email\n{}", email.render());
    }

    Ok(())
}

fn render_scenarios(sweep: &ScenarioSweep) {
    println!("\nRate scenarios");
    for (index, scenario) in sweep.scenarios.iter().enumerate() {
        let marker = if index == sweep.best_index { "*" } else { " " };
        println!(
            "{marker} {} | net ADR {} | total impact {}",
            scenario.label,
            format_amount(scenario.mean_net_adr),
            format_amount(scenario.summary.total_impact)
        );
    }
}

fn synthetic_sources(start: NaiveDate, end: NaiveDate) -> DemandSources {
    let dates = nights(start, end);
    let weekend = |date: NaiveDate| matches!(date.weekday(), Weekday::Fri | Weekday::Sat);

    let current_year = dates
        .iter()
        .map(|&date| DemandRecord {
            date,
            room_nights: if weekend(date) { 30.0 } else { 18.0 },
            adr: if weekend(date) { 185.0 } else { 150.0 },
        })
        .collect();
    let last_year = dates
        .iter()
        .map(|&date| DemandRecord {
            date: comparable_last_year_date(date),
            room_nights: if weekend(date) { 26.0 } else { 15.0 },
            adr: if weekend(date) { 170.0 } else { 140.0 },
        })
        .collect();
    let confirmed_groups = dates
        .iter()
        .filter(|date| date.weekday() == Weekday::Wed)
        .map(|&date| DemandRecord {
            date,
            room_nights: 12.0,
            adr: 120.0,
        })
        .collect();

    DemandSources {
        current_year: Some(current_year),
        last_year: Some(last_year),
        confirmed_groups: Some(confirmed_groups),
        optioned_groups: None,
    }
}
