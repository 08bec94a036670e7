use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One simulated month of the projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProjection {
    /// 1-indexed month within the horizon.
    pub month: u32,
    pub units: Decimal,
    pub revenue: Decimal,
    pub variable_costs: Decimal,
    pub fixed_costs: Decimal,
    pub total_costs: Decimal,
    pub profit: Decimal,
    /// Running total of `profit` for months 1..=month.
    pub cumulative_profit: Decimal,
}

/// The complete output of the `ProjectionEngine`.
///
/// Serves as the response body of the metrics endpoint and the source of the
/// CSV export. It is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakEvenMetrics {
    // I. Unit Economics
    pub contribution_margin: Decimal,
    /// Contribution margin as a percentage of price.
    pub contribution_margin_ratio: Decimal,

    // II. Steady-State Break-Even
    /// Units needed in one month to cover that month's fixed costs.
    /// `None` when the contribution margin is zero or negative.
    pub break_even_units: Option<Decimal>,
    pub break_even_revenue: Option<Decimal>,

    // III. Break-Even Timing
    /// First month whose cumulative profit is non-negative.
    pub break_even_month: Option<u32>,
    pub break_even_date: Option<NaiveDate>,
    /// Currently identical to `break_even_month`; there is no capital outlay to
    /// pay back yet.
    pub payback_period: Option<u32>,

    // IV. The Projection Itself
    pub baseline_units_per_month: Decimal,
    pub horizon_months: u32,
    pub cumulative_profits: Vec<Decimal>,
    pub monthly_projections: Vec<MonthlyProjection>,
}

impl BreakEvenMetrics {
    /// Cumulative profit at the end of the horizon.
    pub fn final_cumulative_profit(&self) -> Decimal {
        self.cumulative_profits
            .last()
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Whether the projection breaks even within the horizon.
    pub fn breaks_even(&self) -> bool {
        self.break_even_month.is_some()
    }
}
