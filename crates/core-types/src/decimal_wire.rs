use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Unexpected, Visitor};
use std::fmt;

/// Deserializes a `Decimal` without ever going through `f64`.
///
/// Accepts decimal strings (plain or scientific) and JSON integers, which are
/// exact. Fractional JSON numbers are rejected because the parser has already
/// rounded them to a float by the time they arrive here.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(ExactDecimalVisitor)
}

struct ExactDecimalVisitor;

impl<'de> Visitor<'de> for ExactDecimalVisitor {
    type Value = Decimal;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a decimal string such as \"12.50\" or an integer")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Decimal, E> {
        let trimmed = value.trim();
        Decimal::from_str_exact(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| E::invalid_value(Unexpected::Str(value), &self))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Decimal, E> {
        Ok(Decimal::from(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Decimal, E> {
        Ok(Decimal::from(value))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Decimal, E> {
        Err(E::invalid_type(Unexpected::Float(value), &self))
    }
}
