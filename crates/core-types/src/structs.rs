use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The smallest unit price a tenant may store.
pub const MIN_PRICE: Decimal = dec!(0.01);
/// Lower bound of the month-over-month growth rate (-100%: volume drops to zero).
pub const MIN_GROWTH_RATE: Decimal = dec!(-1);
/// Upper bound of the month-over-month growth rate (+1000%).
pub const MAX_GROWTH_RATE: Decimal = dec!(10);

/// Identifies the tenant (farm) that owns a set of assumptions and sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(pub Uuid);

impl TenantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TenantId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// The single active set of financial assumptions for a tenant.
///
/// All money fields are per unit or per month in the tenant's currency. The
/// struct travels as `{ price, unitVariableCost, fixedCostsPerMonth, growthRate, notes }`
/// with decimals encoded as strings. Integers are also accepted on input;
/// fractional JSON numbers are not, since they would arrive already rounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assumptions {
    /// Revenue per unit sold.
    #[serde(deserialize_with = "crate::decimal_wire::deserialize")]
    pub price: Decimal,
    /// Variable cost per unit. Not required to be below `price`.
    #[serde(deserialize_with = "crate::decimal_wire::deserialize")]
    pub unit_variable_cost: Decimal,
    /// Recurring costs independent of volume.
    #[serde(deserialize_with = "crate::decimal_wire::deserialize")]
    pub fixed_costs_per_month: Decimal,
    /// Fractional month-over-month change in unit volume (0.05 = +5%/month).
    #[serde(deserialize_with = "crate::decimal_wire::deserialize")]
    pub growth_rate: Decimal,
    /// Free text, no effect on any calculation.
    #[serde(default)]
    pub notes: Option<String>,
}

impl Assumptions {
    pub fn new(
        price: Decimal,
        unit_variable_cost: Decimal,
        fixed_costs_per_month: Decimal,
        growth_rate: Decimal,
    ) -> Self {
        Self {
            price,
            unit_variable_cost,
            fixed_costs_per_month,
            growth_rate,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Checks the storage-level bounds of every field.
    ///
    /// Returns the first offending field, in declaration order.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.price < MIN_PRICE {
            return Err(CoreError::InvalidInput(
                "price".to_string(),
                format!("must be at least {MIN_PRICE}, got {}", self.price),
            ));
        }
        if self.unit_variable_cost < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "unitVariableCost".to_string(),
                format!("must not be negative, got {}", self.unit_variable_cost),
            ));
        }
        if self.fixed_costs_per_month < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "fixedCostsPerMonth".to_string(),
                format!("must not be negative, got {}", self.fixed_costs_per_month),
            ));
        }
        if self.growth_rate < MIN_GROWTH_RATE || self.growth_rate > MAX_GROWTH_RATE {
            return Err(CoreError::InvalidInput(
                "growthRate".to_string(),
                format!(
                    "must be between {MIN_GROWTH_RATE} and {MAX_GROWTH_RATE}, got {}",
                    self.growth_rate
                ),
            ));
        }
        Ok(())
    }
}

/// The empty object handed out before a tenant has configured anything.
impl Default for Assumptions {
    fn default() -> Self {
        Self::new(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    }
}

/// Units and revenue sold during one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySales {
    /// First day of the calendar month.
    pub month: NaiveDate,
    pub units: Decimal,
    pub revenue: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Assumptions {
        Assumptions::new(dec!(10), dec!(6), dec!(4000), dec!(0.05))
    }

    #[test]
    fn test_valid_assumptions_pass() {
        assert_eq!(valid().validate(), Ok(()));
    }

    #[test]
    fn test_price_below_minimum_is_rejected() {
        let mut a = valid();
        a.price = dec!(0.001);
        let err = a.validate().unwrap_err();
        assert_eq!(err.field(), "price");

        a.price = Decimal::ZERO;
        assert_eq!(a.validate().unwrap_err().field(), "price");
    }

    #[test]
    fn test_negative_costs_are_rejected() {
        let mut a = valid();
        a.unit_variable_cost = dec!(-0.5);
        assert_eq!(a.validate().unwrap_err().field(), "unitVariableCost");

        let mut a = valid();
        a.fixed_costs_per_month = dec!(-1);
        assert_eq!(a.validate().unwrap_err().field(), "fixedCostsPerMonth");
    }

    #[test]
    fn test_variable_cost_above_price_is_allowed() {
        let mut a = valid();
        a.unit_variable_cost = dec!(12);
        assert!(a.validate().is_ok());
    }

    #[test]
    fn test_growth_rate_bounds_are_inclusive() {
        let mut a = valid();
        a.growth_rate = dec!(-1);
        assert!(a.validate().is_ok());
        a.growth_rate = dec!(10);
        assert!(a.validate().is_ok());
        a.growth_rate = dec!(10.0001);
        assert_eq!(a.validate().unwrap_err().field(), "growthRate");
        a.growth_rate = dec!(-1.5);
        assert_eq!(a.validate().unwrap_err().field(), "growthRate");
    }

    #[test]
    fn test_wire_format_is_camel_case_with_string_decimals() {
        let json = serde_json::to_value(valid().with_notes("layers only")).unwrap();
        assert_eq!(json["price"], "10");
        assert_eq!(json["unitVariableCost"], "6");
        assert_eq!(json["fixedCostsPerMonth"], "4000");
        assert_eq!(json["growthRate"], "0.05");
        assert_eq!(json["notes"], "layers only");
    }

    #[test]
    fn test_deserializes_numbers_and_missing_notes() {
        let a: Assumptions = serde_json::from_str(
            r#"{"price": 10, "unitVariableCost": "6", "fixedCostsPerMonth": 4000, "growthRate": "0"}"#,
        )
        .unwrap();
        assert_eq!(a.price, dec!(10));
        assert_eq!(a.fixed_costs_per_month, dec!(4000));
        assert_eq!(a.notes, None);
    }

    #[test]
    fn test_long_decimal_strings_keep_every_digit() {
        let a: Assumptions = serde_json::from_str(
            r#"{"price": "1234567890.123456789", "unitVariableCost": "0.000000000000000001",
                "fixedCostsPerMonth": "1.5e3", "growthRate": "-0.05"}"#,
        )
        .unwrap();
        assert_eq!(a.price, dec!(1234567890.123456789));
        assert_eq!(a.unit_variable_cost, dec!(0.000000000000000001));
        assert_eq!(a.fixed_costs_per_month, dec!(1500));
        assert_eq!(a.growth_rate, dec!(-0.05));
    }

    #[test]
    fn test_fractional_json_numbers_are_rejected() {
        let err = serde_json::from_str::<Assumptions>(
            r#"{"price": 1234567890.123456789, "unitVariableCost": "6", "fixedCostsPerMonth": "4000", "growthRate": "0"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("floating point"));

        let err = serde_json::from_str::<Assumptions>(
            r#"{"price": "10", "unitVariableCost": "6", "fixedCostsPerMonth": "4000", "growthRate": "fast"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("fast"));
    }

    #[test]
    fn test_tenant_id_parses_from_header_text() {
        let id = TenantId::new();
        let parsed: TenantId = format!(" {id} ").parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<TenantId>().is_err());
    }
}
