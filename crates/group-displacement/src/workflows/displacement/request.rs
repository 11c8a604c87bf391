use super::analyzer::DisplacementError;
use super::calendar::nights;
use super::domain::AnalysisSettings;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One night of the candidate group's stay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupNight {
    pub date: NaiveDate,
    pub requested_rooms: u32,
    pub gross_adr: f64,
    pub net_adr: f64,
    pub ancillary_revenue_per_day: f64,
}

impl GroupNight {
    pub fn room_revenue(&self) -> f64 {
        f64::from(self.requested_rooms) * self.net_adr
    }
}

/// Candidate group, one entry per night of stay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRequest {
    pub group_name: String,
    pub nights: Vec<GroupNight>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub room_types: Vec<RoomType>,
}

impl GroupRequest {
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.nights.iter().map(|night| night.date).collect()
    }

    pub fn total_rooms(&self) -> u64 {
        self.nights
            .iter()
            .map(|night| u64::from(night.requested_rooms))
            .sum()
    }

    /// Mean net ADR across the stay; zero for an empty request.
    pub fn mean_net_adr(&self) -> f64 {
        if self.nights.is_empty() {
            return 0.0;
        }
        self.nights.iter().map(|night| night.net_adr).sum::<f64>() / self.nights.len() as f64
    }

    /// Same request with gross and net rates scaled by `factor`.
    pub fn with_rate_factor(&self, factor: f64) -> Self {
        let nights = self
            .nights
            .iter()
            .map(|night| GroupNight {
                gross_adr: night.gross_adr * factor,
                net_adr: night.net_adr * factor,
                ..*night
            })
            .collect();
        Self {
            group_name: self.group_name.clone(),
            nights,
            room_types: self.room_types.clone(),
        }
    }
}

/// Room category within a multi-type request. `adr_addon` is a gross supplement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomType {
    pub name: String,
    pub count: u32,
    #[serde(default)]
    pub adr_addon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRooms {
    pub date: NaiveDate,
    pub rooms: u32,
}

/// How the group's rooms are laid out over the stay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoomAllocation {
    Uniform { rooms: u32 },
    PerDate { rooms: Vec<DailyRooms> },
    RoomTypes { types: Vec<RoomType> },
}

impl RoomAllocation {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Uniform { .. } => "Fixed allotment",
            Self::PerDate { .. } => "Variable rooms per day",
            Self::RoomTypes { .. } => "Multiple room types",
        }
    }
}

/// Non-room revenue for the whole stay.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AncillaryRevenue {
    #[serde(default)]
    pub food_and_beverage: f64,
    #[serde(default)]
    pub meeting_space: f64,
    #[serde(default)]
    pub other: f64,
}

impl AncillaryRevenue {
    pub fn total(&self) -> f64 {
        self.food_and_beverage + self.meeting_space + self.other
    }

    pub fn per_day(&self, nights: usize) -> f64 {
        if nights == 0 {
            0.0
        } else {
            self.total() / nights as f64
        }
    }
}

/// Entered or parsed group parameters, before they are expanded per night.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRequestParams {
    pub group_name: String,
    pub arrival: NaiveDate,
    pub departure: NaiveDate,
    pub allocation: RoomAllocation,
    pub gross_adr: f64,
    /// Taken from `gross_adr` and the tax rate when absent.
    #[serde(default)]
    pub net_adr: Option<f64>,
    #[serde(default)]
    pub ancillary: AncillaryRevenue,
}

impl GroupRequestParams {
    pub fn stay(&self) -> Vec<NaiveDate> {
        nights(self.arrival, self.departure)
    }

    pub fn base_net_adr(&self, settings: &AnalysisSettings) -> f64 {
        self.net_adr
            .unwrap_or_else(|| settings.net_from_gross(self.gross_adr))
    }

    /// Gross value quoted before any displacement is known:
    /// `gross_adr * rooms * nights + ancillary`.
    pub fn indicative_total_value(
        &self,
        settings: &AnalysisSettings,
    ) -> Result<f64, DisplacementError> {
        let request = self.to_request(settings)?;
        let room_value: f64 = request
            .nights
            .iter()
            .map(|night| night.gross_adr * f64::from(night.requested_rooms))
            .sum();
        Ok(room_value + self.ancillary.total())
    }

    pub fn indicative_needs_authorization(
        &self,
        settings: &AnalysisSettings,
    ) -> Result<bool, DisplacementError> {
        Ok(self.indicative_total_value(settings)? > settings.authorization_threshold)
    }

    /// Expands the parameters into one [`GroupNight`] per night of stay.
    ///
    /// Fails when the room types add up to more rooms than a night can hold.
    pub fn to_request(&self, settings: &AnalysisSettings) -> Result<GroupRequest, DisplacementError> {
        let stay = self.stay();
        let ancillary = self.ancillary.per_day(stay.len());
        let base_net = self.base_net_adr(settings);

        let (rooms, gross_adr, net_adr, room_types) = match &self.allocation {
            RoomAllocation::Uniform { rooms } => {
                (vec![*rooms; stay.len()], self.gross_adr, base_net, Vec::new())
            }
            RoomAllocation::PerDate { rooms } => {
                let by_date: BTreeMap<NaiveDate, u32> = rooms
                    .iter()
                    .map(|entry| (entry.date, entry.rooms))
                    .collect();
                let rooms: Vec<u32> = stay
                    .iter()
                    .map(|date| by_date.get(date).copied().unwrap_or(0))
                    .collect();
                (rooms, self.gross_adr, base_net, Vec::new())
            }
            RoomAllocation::RoomTypes { types } => {
                let total = types
                    .iter()
                    .try_fold(0_u32, |total, room_type| total.checked_add(room_type.count))
                    .ok_or(DisplacementError::RoomCountOverflow)?;
                let net = weighted_net_adr(types, base_net, settings.tax_rate);
                (
                    vec![total; stay.len()],
                    settings.gross_from_net(net),
                    net,
                    types.clone(),
                )
            }
        };

        let nights = stay
            .into_iter()
            .zip(rooms)
            .map(|(date, requested_rooms)| GroupNight {
                date,
                requested_rooms,
                gross_adr,
                net_adr,
                ancillary_revenue_per_day: ancillary,
            })
            .collect();

        Ok(GroupRequest {
            group_name: self.group_name.clone(),
            nights,
            room_types,
        })
    }
}

/// Room-count weighted net ADR over the room types, converting each gross
/// add-on to net. Falls back to `base_net_adr` when no rooms are requested.
pub fn weighted_net_adr(types: &[RoomType], base_net_adr: f64, tax_rate: f64) -> f64 {
    let total_rooms: f64 = types
        .iter()
        .map(|room_type| f64::from(room_type.count))
        .sum();
    if total_rooms == 0.0 {
        return base_net_adr;
    }

    let revenue: f64 = types
        .iter()
        .map(|room_type| {
            f64::from(room_type.count) * (base_net_adr + room_type.adr_addon / (1.0 + tax_rate))
        })
        .sum();
    revenue / total_rooms
}
