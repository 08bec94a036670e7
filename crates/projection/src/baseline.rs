use core_types::MonthlySales;
use rust_decimal::Decimal;

/// Mean units sold over the most recent `window_months` months of `history`.
///
/// Only months that actually appear in the history count towards the mean, so
/// a tenant with a single month of sales gets that month's volume back. An
/// empty history or a zero window yields zero.
pub fn trailing_average_units(history: &[MonthlySales], window_months: u32) -> Decimal {
    if history.is_empty() || window_months == 0 {
        return Decimal::ZERO;
    }

    let mut months: Vec<&MonthlySales> = history.iter().collect();
    months.sort_by_key(|s| s.month);

    let window = months.len().min(window_months as usize);
    let recent = &months[months.len() - window..];

    let total = recent
        .iter()
        .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.units));

    total / Decimal::from(window as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sales(year: i32, month: u32, units: Decimal) -> MonthlySales {
        MonthlySales {
            month: NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
            units,
            revenue: units * dec!(10),
        }
    }

    #[test]
    fn test_empty_history_gives_zero() {
        assert_eq!(trailing_average_units(&[], 3), Decimal::ZERO);
    }

    #[test]
    fn test_zero_window_gives_zero() {
        let history = vec![sales(2025, 1, dec!(100))];
        assert_eq!(trailing_average_units(&history, 0), Decimal::ZERO);
    }

    #[test]
    fn test_uses_only_the_most_recent_months() {
        let history = vec![
            sales(2025, 1, dec!(1000)),
            sales(2025, 2, dec!(600)),
            sales(2025, 3, dec!(700)),
            sales(2025, 4, dec!(800)),
        ];
        assert_eq!(trailing_average_units(&history, 3), dec!(700));
    }

    #[test]
    fn test_unsorted_history_is_ordered_by_month() {
        let history = vec![
            sales(2025, 4, dec!(800)),
            sales(2024, 12, dec!(5000)),
            sales(2025, 3, dec!(700)),
        ];
        assert_eq!(trailing_average_units(&history, 2), dec!(750));
    }

    #[test]
    fn test_short_history_is_not_diluted() {
        let history = vec![sales(2025, 6, dec!(420))];
        assert_eq!(trailing_average_units(&history, 3), dec!(420));
    }
}
