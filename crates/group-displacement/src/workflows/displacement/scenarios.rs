use super::analyzer::{analyze, AnalysisInput, DisplacementError};
use super::summary::SummaryMetrics;
use serde::Serialize;
use tracing::debug;

/// Rate multipliers tried on every sweep, in percent.
pub const RATE_STEPS_PCT: [f64; 5] = [-10.0, -5.0, 0.0, 5.0, 10.0];

/// Forward-looking increment by average baseline occupancy.
pub fn forward_increment(avg_occupancy_pct: f64) -> f64 {
    if avg_occupancy_pct < 60.0 {
        0.03
    } else if avg_occupancy_pct < 80.0 {
        0.05
    } else {
        0.07
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioKind {
    RateStep { percent: f64 },
    /// Mean of the period current-year and prior-year ADRs.
    HistoricalAverage,
    /// Higher period ADR raised by an occupancy-tiered increment.
    ForwardLooking { increment: f64 },
}

impl ScenarioKind {
    pub fn label(&self) -> String {
        match self {
            Self::RateStep { percent } if *percent == 0.0 => "Requested rate".to_string(),
            Self::RateStep { percent } => format!("Requested rate {percent:+.0}%"),
            Self::HistoricalAverage => "Average of CY/LY ADR".to_string(),
            Self::ForwardLooking { increment } => {
                format!("Forward-looking ADR (+{:.0}%)", increment * 100.0)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioOutcome {
    pub kind: ScenarioKind,
    pub label: String,
    pub rate_factor: f64,
    pub mean_net_adr: f64,
    pub summary: SummaryMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSweep {
    pub scenarios: Vec<ScenarioOutcome>,
    pub best_index: usize,
}

impl ScenarioSweep {
    /// Scenario with the highest total revenue impact; the earliest wins ties.
    pub fn best(&self) -> Option<&ScenarioOutcome> {
        self.scenarios.get(self.best_index)
    }
}

/// Re-runs the analysis over a set of group rates and ranks them by total impact.
///
/// The demand table is shared read-only; every scenario builds its own
/// request and result. Anchored scenarios are skipped when the request has
/// no net rate to scale from or the anchor itself is zero.
pub fn sweep(input: AnalysisInput<'_>) -> Result<ScenarioSweep, DisplacementError> {
    let baseline = analyze(input)?.summarize();
    let base_net = input.request.mean_net_adr();

    let mut plan: Vec<(ScenarioKind, f64)> = RATE_STEPS_PCT
        .iter()
        .map(|&percent| (ScenarioKind::RateStep { percent }, 1.0 + percent / 100.0))
        .collect();

    if base_net > 0.0 {
        let historical = (baseline.avg_adr_current_year + baseline.avg_adr_last_year) / 2.0;
        if historical > 0.0 {
            plan.push((ScenarioKind::HistoricalAverage, historical / base_net));
        }

        let increment = forward_increment(baseline.avg_occupancy_before_pct);
        let forward = baseline
            .avg_adr_current_year
            .max(baseline.avg_adr_last_year)
            * (1.0 + increment);
        if forward > 0.0 {
            plan.push((ScenarioKind::ForwardLooking { increment }, forward / base_net));
        }
    }

    let mut scenarios = Vec::with_capacity(plan.len());
    for (kind, rate_factor) in plan {
        let request = input.request.with_rate_factor(rate_factor);
        let summary = analyze(AnalysisInput {
            request: &request,
            ..input
        })?
        .summarize();
        scenarios.push(ScenarioOutcome {
            kind,
            label: kind.label(),
            rate_factor,
            mean_net_adr: request.mean_net_adr(),
            summary,
        });
    }

    let best_index = scenarios
        .iter()
        .enumerate()
        .fold(None::<(usize, f64)>, |best, (index, scenario)| match best {
            Some((_, impact)) if scenario.summary.total_impact <= impact => best,
            _ => Some((index, scenario.summary.total_impact)),
        })
        .map(|(index, _)| index)
        .unwrap_or(0);

    debug!(
        scenarios = scenarios.len(),
        best_index, "completed rate scenario sweep"
    );

    Ok(ScenarioSweep {
        scenarios,
        best_index,
    })
}
