use super::calendar::comparable_last_year_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Gross figures above this value require revenue-manager sign-off.
///
/// The comparison is strict: a gross total of exactly 35,000 does not need
/// authorization. Override per deployment through
/// [`AnalysisSettings::authorization_threshold`].
pub const AUTHORIZATION_THRESHOLD: f64 = 35_000.0;

pub const DEFAULT_HOTEL_CAPACITY: u32 = 66;
pub const DEFAULT_TAX_RATE: f64 = 0.10;
pub const DEFAULT_LAST_YEAR_MULTIPLIER: f64 = 1.1;

/// One raw row from a demand export: bookings for a single stay date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandRecord {
    pub date: NaiveDate,
    pub room_nights: f64,
    pub adr: f64,
}

/// Aggregated room-nights and average daily rate for one source on one date.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Demand {
    pub room_nights: f64,
    pub adr: f64,
}

impl Demand {
    pub const ZERO: Self = Self {
        room_nights: 0.0,
        adr: 0.0,
    };

    pub fn revenue(&self) -> f64 {
        self.room_nights * self.adr
    }
}

/// Projection policy for individual demand not yet on the books.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ForecastMethod {
    /// `ceil(last_year * multiplier)`
    LastYearBased { multiplier: f64 },
    /// `ceil(current_year * (1 + percentage / 100))`
    PercentageOverOtb { percentage: f64 },
    /// `current_year + rooms`
    AbsoluteAddition { rooms: f64 },
    /// Remaining pickup: `max(0, last_year - current_year)`
    RemainingPickup,
}

impl Default for ForecastMethod {
    fn default() -> Self {
        Self::LastYearBased {
            multiplier: DEFAULT_LAST_YEAR_MULTIPLIER,
        }
    }
}

impl ForecastMethod {
    pub fn forecast_room_nights(&self, current_year: f64, last_year: f64) -> f64 {
        match *self {
            Self::LastYearBased { multiplier } => ceil_rooms(last_year * multiplier),
            Self::PercentageOverOtb { percentage } => {
                ceil_rooms(current_year * (1.0 + percentage / 100.0))
            }
            Self::AbsoluteAddition { rooms } => current_year + rooms,
            Self::RemainingPickup => (last_year - current_year).max(0.0),
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::LastYearBased { .. } => "Last year based",
            Self::PercentageOverOtb { .. } => "Percentage over OTB",
            Self::AbsoluteAddition { .. } => "Absolute addition",
            Self::RemainingPickup => "Remaining pickup",
        }
    }
}

// Rounds away float noise first so 30 * 1.1 forecasts 33 rooms, not 34.
fn ceil_rooms(value: f64) -> f64 {
    ((value * 1e6).round() / 1e6).ceil()
}

/// Which demand streams make up the baseline a new group is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineComposition {
    /// Forecast individual + on-the-books individual + confirmed groups.
    #[default]
    ForecastOtbAndGroups,
    /// Forecast individual + confirmed groups.
    ForecastAndGroups,
}

impl BaselineComposition {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "forecast_otb_and_groups" => Some(Self::ForecastOtbAndGroups),
            "forecast_and_groups" => Some(Self::ForecastAndGroups),
            _ => None,
        }
    }

    pub fn room_nights(self, row: &DateRow) -> f64 {
        let base = row.forecast_individual_room_nights + row.confirmed_group_room_nights;
        match self {
            Self::ForecastOtbAndGroups => base + row.individual_room_nights_current_year,
            Self::ForecastAndGroups => base,
        }
    }

    pub fn revenue(self, row: &DateRow) -> f64 {
        let base = row.forecast_individual_revenue() + row.confirmed_group_revenue();
        match self {
            Self::ForecastOtbAndGroups => base + row.individual_revenue_current_year(),
            Self::ForecastAndGroups => base,
        }
    }

    /// Blended ADR of the baseline; zero when the baseline holds no rooms.
    pub fn adr(self, row: &DateRow) -> f64 {
        let room_nights = self.room_nights(row);
        if room_nights > 0.0 {
            self.revenue(row) / room_nights
        } else {
            0.0
        }
    }
}

/// How many requested group rooms count as accepted once displacement is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupAcceptancePolicy {
    /// The contracted count is always honored; displacement is a revenue penalty only.
    #[default]
    HonorRequested,
    /// Displaced rooms are deducted from the group's count, floored at zero.
    NetOfDisplaced,
}

impl GroupAcceptancePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "honor_requested" => Some(Self::HonorRequested),
            "net_of_displaced" => Some(Self::NetOfDisplaced),
            _ => None,
        }
    }

    pub fn accepted_rooms(self, requested: f64, displaced: f64) -> f64 {
        match self {
            Self::HonorRequested => requested,
            Self::NetOfDisplaced => (requested - displaced).max(0.0),
        }
    }
}

/// Per-date demand picture before the candidate group is seated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRow {
    pub date: NaiveDate,
    pub comparable_last_year_date: NaiveDate,
    pub individual_room_nights_current_year: f64,
    pub individual_adr_current_year: f64,
    pub individual_room_nights_last_year: f64,
    pub individual_adr_last_year: f64,
    pub forecast_individual_room_nights: f64,
    pub forecast_individual_adr: f64,
    pub confirmed_group_room_nights: f64,
    pub confirmed_group_adr: f64,
    pub optioned_group_room_nights: f64,
    pub optioned_group_adr: f64,
    pub total_room_nights_before_new_group: f64,
    pub total_adr_before_new_group: f64,
    #[serde(default)]
    pub total_room_nights_with_options: f64,
}

impl DateRow {
    /// Zero-demand row, used for manual entry and for dates missing from the table.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            comparable_last_year_date: comparable_last_year_date(date),
            individual_room_nights_current_year: 0.0,
            individual_adr_current_year: 0.0,
            individual_room_nights_last_year: 0.0,
            individual_adr_last_year: 0.0,
            forecast_individual_room_nights: 0.0,
            forecast_individual_adr: 0.0,
            confirmed_group_room_nights: 0.0,
            confirmed_group_adr: 0.0,
            optioned_group_room_nights: 0.0,
            optioned_group_adr: 0.0,
            total_room_nights_before_new_group: 0.0,
            total_adr_before_new_group: 0.0,
            total_room_nights_with_options: 0.0,
        }
    }

    /// Derives forecast and baseline totals from the observed streams.
    pub fn from_observed(
        date: NaiveDate,
        observed: ObservedDemand,
        options: &DemandOptions,
    ) -> Self {
        let mut row = Self::empty(date);
        row.individual_room_nights_current_year = observed.current_year.room_nights;
        row.individual_adr_current_year = observed.current_year.adr;
        row.individual_room_nights_last_year = observed.last_year.room_nights;
        row.individual_adr_last_year = observed.last_year.adr;
        row.confirmed_group_room_nights = observed.confirmed_groups.room_nights;
        row.confirmed_group_adr = observed.confirmed_groups.adr;
        row.optioned_group_room_nights = observed.optioned_groups.room_nights;
        row.optioned_group_adr = observed.optioned_groups.adr;
        row.refresh(options);
        row
    }

    /// Recomputes the forecast and baseline columns in place.
    pub(crate) fn refresh(&mut self, options: &DemandOptions) {
        self.forecast_individual_room_nights = options.forecast.forecast_room_nights(
            self.individual_room_nights_current_year,
            self.individual_room_nights_last_year,
        );
        self.forecast_individual_adr = self.individual_adr_current_year;
        self.apply_baseline(options.baseline);
    }

    pub(crate) fn apply_baseline(&mut self, baseline: BaselineComposition) {
        self.total_room_nights_before_new_group = baseline.room_nights(self);
        self.total_adr_before_new_group = baseline.adr(self);
        self.total_room_nights_with_options =
            self.total_room_nights_before_new_group + self.optioned_group_room_nights;
    }

    pub fn observed(&self) -> ObservedDemand {
        ObservedDemand {
            current_year: Demand {
                room_nights: self.individual_room_nights_current_year,
                adr: self.individual_adr_current_year,
            },
            last_year: Demand {
                room_nights: self.individual_room_nights_last_year,
                adr: self.individual_adr_last_year,
            },
            confirmed_groups: Demand {
                room_nights: self.confirmed_group_room_nights,
                adr: self.confirmed_group_adr,
            },
            optioned_groups: Demand {
                room_nights: self.optioned_group_room_nights,
                adr: self.optioned_group_adr,
            },
        }
    }

    pub fn individual_revenue_current_year(&self) -> f64 {
        self.individual_room_nights_current_year * self.individual_adr_current_year
    }

    pub fn individual_revenue_last_year(&self) -> f64 {
        self.individual_room_nights_last_year * self.individual_adr_last_year
    }

    pub fn forecast_individual_revenue(&self) -> f64 {
        self.forecast_individual_room_nights * self.forecast_individual_adr
    }

    pub fn confirmed_group_revenue(&self) -> f64 {
        self.confirmed_group_room_nights * self.confirmed_group_adr
    }

    pub fn optioned_group_revenue(&self) -> f64 {
        self.optioned_group_room_nights * self.optioned_group_adr
    }

    pub fn total_revenue_before_new_group(&self) -> f64 {
        self.total_room_nights_before_new_group * self.total_adr_before_new_group
    }
}

/// The four aggregated input streams for a single date.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ObservedDemand {
    pub current_year: Demand,
    pub last_year: Demand,
    pub confirmed_groups: Demand,
    pub optioned_groups: Demand,
}

/// Business rules applied when deriving forecast and baseline columns.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DemandOptions {
    #[serde(default)]
    pub forecast: ForecastMethod,
    #[serde(default)]
    pub baseline: BaselineComposition,
}

/// Hotel-level parameters for a displacement run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    pub capacity: u32,
    pub tax_rate: f64,
    #[serde(default)]
    pub acceptance: GroupAcceptancePolicy,
    #[serde(default)]
    pub baseline: BaselineComposition,
    #[serde(default = "default_authorization_threshold")]
    pub authorization_threshold: f64,
}

fn default_authorization_threshold() -> f64 {
    AUTHORIZATION_THRESHOLD
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HOTEL_CAPACITY,
            tax_rate: DEFAULT_TAX_RATE,
            acceptance: GroupAcceptancePolicy::default(),
            baseline: BaselineComposition::default(),
            authorization_threshold: AUTHORIZATION_THRESHOLD,
        }
    }
}

impl AnalysisSettings {
    pub fn net_from_gross(&self, gross: f64) -> f64 {
        gross / (1.0 + self.tax_rate)
    }

    pub fn gross_from_net(&self, net: f64) -> f64 {
        net * (1.0 + self.tax_rate)
    }
}

/// Revenue-manager thresholds accepted with every run.
///
/// Only the minimum-ADR percentages feed the summary benchmarks; the
/// occupancy and flexibility bands are carried for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionParameters {
    pub min_adr_pct_current_year: f64,
    pub min_adr_pct_last_year: f64,
    pub ancillary_weight: f64,
    pub occupancy_threshold_low: f64,
    pub occupancy_threshold_high: f64,
    pub adr_flexibility_low: f64,
    pub adr_flexibility_high: f64,
}

impl Default for DecisionParameters {
    fn default() -> Self {
        Self {
            min_adr_pct_current_year: 100.0,
            min_adr_pct_last_year: 100.0,
            ancillary_weight: 1.0,
            occupancy_threshold_low: 30.0,
            occupancy_threshold_high: 80.0,
            adr_flexibility_low: 0.3,
            adr_flexibility_high: 0.1,
        }
    }
}
