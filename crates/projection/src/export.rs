use crate::error::ProjectionError;
use crate::metrics::MonthlyProjection;
use std::io::Write;

const HEADERS: [&str; 8] = [
    "Month",
    "Units",
    "Revenue",
    "Variable Costs",
    "Fixed Costs",
    "Total Costs",
    "Profit",
    "Cumulative Profit",
];

/// Writes the monthly projection table as CSV, one row per month.
pub fn write_projections_csv<W: Write>(
    projections: &[MonthlyProjection],
    writer: W,
) -> Result<(), ProjectionError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADERS).map_err(export_error)?;

    for p in projections {
        wtr.write_record([
            p.month.to_string(),
            p.units.to_string(),
            p.revenue.to_string(),
            p.variable_costs.to_string(),
            p.fixed_costs.to_string(),
            p.total_costs.to_string(),
            p.profit.to_string(),
            p.cumulative_profit.to_string(),
        ])
        .map_err(export_error)?;
    }

    wtr.flush()
        .map_err(|e| ProjectionError::Export(e.to_string()))?;
    Ok(())
}

/// Renders the monthly projection table into an in-memory CSV document.
pub fn projections_to_csv(projections: &[MonthlyProjection]) -> Result<String, ProjectionError> {
    let mut buffer = Vec::new();
    write_projections_csv(projections, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| ProjectionError::Export(e.to_string()))
}

fn export_error(err: csv::Error) -> ProjectionError {
    ProjectionError::Export(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProjectionEngine;
    use chrono::NaiveDate;
    use core_types::Assumptions;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_csv_has_header_and_one_row_per_month() {
        let engine = ProjectionEngine::default();
        let a = Assumptions::new(dec!(10), dec!(6), dec!(4000), dec!(0.10));
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let metrics = engine.compute_metrics(&a, dec!(900), start).unwrap();

        let csv = projections_to_csv(&metrics.monthly_projections).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 13);
        assert_eq!(
            lines[0],
            "Month,Units,Revenue,Variable Costs,Fixed Costs,Total Costs,Profit,Cumulative Profit"
        );
        assert_eq!(lines[1], "1,900,9000,5400,4000,9400,-400,-400");
        let month_four: Vec<&str> = lines[4].split(',').collect();
        assert_eq!(month_four.len(), 8);
        assert_eq!(month_four[0], "4");
        let cumulative: Decimal = month_four[7].parse().unwrap();
        assert_eq!(cumulative, dec!(707.6));
    }

    #[test]
    fn test_empty_projection_still_writes_header() {
        let csv = projections_to_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
