use crate::error::ProjectionError;
use crate::metrics::{BreakEvenMetrics, MonthlyProjection};
use chrono::{Months, NaiveDate};
use configuration::ProjectionSettings;
use core_types::Assumptions;
use rust_decimal::Decimal;

/// A stateless calculator for the break-even projection of a set of assumptions.
///
/// The engine only holds its settings (horizon and accepted growth-rate range),
/// so a single instance can be cloned into every request handler.
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    settings: ProjectionSettings,
}

impl ProjectionEngine {
    /// Creates a new `ProjectionEngine`, rejecting settings it cannot run with.
    pub fn new(settings: ProjectionSettings) -> Result<Self, ProjectionError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn horizon_months(&self) -> u32 {
        self.settings.horizon_months
    }

    /// The main entry point for the projection.
    ///
    /// # Arguments
    ///
    /// * `assumptions` - Price, unit variable cost, fixed costs and growth rate.
    /// * `baseline_units_per_month` - Unit volume of month 1, before any growth.
    /// * `start_date` - Calendar date of month 1, used for `break_even_date`.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `BreakEvenMetrics` or a `ProjectionError`.
    /// Invalid input is reported before any month is simulated.
    pub fn compute_metrics(
        &self,
        assumptions: &Assumptions,
        baseline_units_per_month: Decimal,
        start_date: NaiveDate,
    ) -> Result<BreakEvenMetrics, ProjectionError> {
        self.validate_inputs(assumptions, baseline_units_per_month)?;

        let (contribution_margin, contribution_margin_ratio) = calculate_margins(assumptions)?;
        let (break_even_units, break_even_revenue) =
            calculate_steady_state(assumptions, contribution_margin)?;

        let monthly_projections = self.simulate(assumptions, baseline_units_per_month)?;
        let cumulative_profits: Vec<Decimal> = monthly_projections
            .iter()
            .map(|p| p.cumulative_profit)
            .collect();

        let break_even_month = find_break_even_month(&monthly_projections);
        let break_even_date = break_even_month
            .map(|month| calendar_date_of_month(start_date, month))
            .transpose()?;

        tracing::debug!(
            price = %assumptions.price,
            growth_rate = %assumptions.growth_rate,
            baseline = %baseline_units_per_month,
            horizon = self.settings.horizon_months,
            ?break_even_month,
            "Projection computed."
        );

        Ok(BreakEvenMetrics {
            contribution_margin,
            contribution_margin_ratio,
            break_even_units,
            break_even_revenue,
            break_even_month,
            break_even_date,
            payback_period: break_even_month,
            baseline_units_per_month,
            horizon_months: self.settings.horizon_months,
            cumulative_profits,
            monthly_projections,
        })
    }

    /// Checks `assumptions` against what this engine accepts, including the
    /// configured growth-rate range, naming the first offending field.
    pub fn check_assumptions(&self, assumptions: &Assumptions) -> Result<(), ProjectionError> {
        if assumptions.price <= Decimal::ZERO {
            return Err(ProjectionError::validation(
                "price",
                format!("must be greater than 0, got {}", assumptions.price),
            ));
        }
        if assumptions.unit_variable_cost < Decimal::ZERO {
            return Err(ProjectionError::validation(
                "unitVariableCost",
                format!("must not be negative, got {}", assumptions.unit_variable_cost),
            ));
        }
        if assumptions.fixed_costs_per_month < Decimal::ZERO {
            return Err(ProjectionError::validation(
                "fixedCostsPerMonth",
                format!("must not be negative, got {}", assumptions.fixed_costs_per_month),
            ));
        }
        let (min, max) = (self.settings.min_growth_rate, self.settings.max_growth_rate);
        if assumptions.growth_rate < min || assumptions.growth_rate > max {
            return Err(ProjectionError::validation(
                "growthRate",
                format!("must be between {min} and {max}, got {}", assumptions.growth_rate),
            ));
        }
        Ok(())
    }

    /// Rejects inputs the simulation is not defined for, naming the field.
    fn validate_inputs(
        &self,
        assumptions: &Assumptions,
        baseline_units_per_month: Decimal,
    ) -> Result<(), ProjectionError> {
        self.check_assumptions(assumptions)?;
        if baseline_units_per_month < Decimal::ZERO {
            return Err(ProjectionError::validation(
                "baselineUnitsPerMonth",
                format!("must not be negative, got {baseline_units_per_month}"),
            ));
        }
        Ok(())
    }

    /// Runs the month-by-month simulation over the configured horizon.
    ///
    /// Units compound from the raw baseline in month 1; cumulative profit is a
    /// running total carried from the previous month.
    fn simulate(
        &self,
        assumptions: &Assumptions,
        baseline_units_per_month: Decimal,
    ) -> Result<Vec<MonthlyProjection>, ProjectionError> {
        let growth_factor = checked(
            Decimal::ONE.checked_add(assumptions.growth_rate),
            1,
            "growth factor",
        )?;

        let mut projections = Vec::with_capacity(self.settings.horizon_months as usize);
        let mut compounding = Decimal::ONE;
        let mut cumulative_profit = Decimal::ZERO;

        for month in 1..=self.settings.horizon_months {
            if month > 1 {
                compounding = checked(compounding.checked_mul(growth_factor), month, "growth")?;
            }

            let units = checked(baseline_units_per_month.checked_mul(compounding), month, "units")?;
            let revenue = checked(units.checked_mul(assumptions.price), month, "revenue")?;
            let variable_costs = checked(
                units.checked_mul(assumptions.unit_variable_cost),
                month,
                "variable costs",
            )?;
            let fixed_costs = assumptions.fixed_costs_per_month;
            let total_costs = checked(
                variable_costs.checked_add(fixed_costs),
                month,
                "total costs",
            )?;
            let profit = checked(revenue.checked_sub(total_costs), month, "profit")?;
            cumulative_profit = checked(
                cumulative_profit.checked_add(profit),
                month,
                "cumulative profit",
            )?;

            projections.push(MonthlyProjection {
                month,
                units,
                revenue,
                variable_costs,
                fixed_costs,
                total_costs,
                profit,
                cumulative_profit,
            });
        }

        Ok(projections)
    }
}

/// Contribution margin per unit and as a percentage of price.
fn calculate_margins(assumptions: &Assumptions) -> Result<(Decimal, Decimal), ProjectionError> {
    let margin = assumptions
        .price
        .checked_sub(assumptions.unit_variable_cost)
        .ok_or_else(|| overflow("contribution margin"))?;
    let ratio = margin
        .checked_div(assumptions.price)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| overflow("contribution margin ratio"))?;
    Ok((margin, ratio))
}

/// Units and revenue that cover one month of fixed costs.
///
/// Undefined (None) when each unit sold does not contribute anything.
fn calculate_steady_state(
    assumptions: &Assumptions,
    contribution_margin: Decimal,
) -> Result<(Option<Decimal>, Option<Decimal>), ProjectionError> {
    if contribution_margin <= Decimal::ZERO {
        return Ok((None, None));
    }
    let units = assumptions
        .fixed_costs_per_month
        .checked_div(contribution_margin)
        .ok_or_else(|| overflow("break-even units"))?;
    let revenue = units
        .checked_mul(assumptions.price)
        .ok_or_else(|| overflow("break-even revenue"))?;
    Ok((Some(units), Some(revenue)))
}

/// The first month whose cumulative profit is non-negative.
fn find_break_even_month(projections: &[MonthlyProjection]) -> Option<u32> {
    projections
        .iter()
        .find(|p| p.cumulative_profit >= Decimal::ZERO)
        .map(|p| p.month)
}

/// Month 1 falls on `start_date`; month m is m - 1 calendar months later.
fn calendar_date_of_month(start_date: NaiveDate, month: u32) -> Result<NaiveDate, ProjectionError> {
    start_date
        .checked_add_months(Months::new(month.saturating_sub(1)))
        .ok_or_else(|| {
            ProjectionError::Computation(format!(
                "date of month {month} after {start_date} is out of range"
            ))
        })
}

fn checked(value: Option<Decimal>, month: u32, quantity: &str) -> Result<Decimal, ProjectionError> {
    value.ok_or_else(|| {
        ProjectionError::Computation(format!("{quantity} overflowed in month {month}"))
    })
}

fn overflow(quantity: &str) -> ProjectionError {
    ProjectionError::Computation(format!("{quantity} overflowed"))
}
