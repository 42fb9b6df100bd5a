//! Field-level validation and parsing of raw form values.
//!
//! Form inputs arrive as strings. These helpers turn them into typed values
//! or a [`Error::Validation`] naming the offending field.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{Error, Result};

/// Fractional digits kept for prices.
pub const PRICE_SCALE: u32 = 2;

/// Largest price representable as NUMERIC(10, 2).
pub fn price_max() -> Decimal { Decimal::new(9_999_999_999, PRICE_SCALE) }

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reject empty or whitespace-only text.
pub fn required_text(field: &'static str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::validation(field, "must not be blank"));
  }
  Ok(())
}

pub fn quantity(field: &'static str, value: i64) -> Result<()> {
  if value < 0 {
    return Err(Error::validation(field, format!("{value} is negative")));
  }
  Ok(())
}

pub fn price(field: &'static str, value: Decimal) -> Result<()> {
  if value.is_sign_negative() && !value.is_zero() {
    return Err(Error::validation(field, format!("{value} is negative")));
  }
  if value.normalize().scale() > PRICE_SCALE {
    return Err(Error::validation(
      field,
      format!("{value} has more than {PRICE_SCALE} fractional digits"),
    ));
  }
  let max = price_max();
  if value > max {
    return Err(Error::validation(field, format!("{value} exceeds {max}")));
  }
  Ok(())
}

/// Rescale a validated price to exactly [`PRICE_SCALE`] fractional digits.
pub fn normalize_price(value: Decimal) -> Decimal {
  let mut value = value;
  value.rescale(PRICE_SCALE);
  value
}

// ─── Form parsing ────────────────────────────────────────────────────────────

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
    .map_err(|e| Error::validation(field, format!("{raw:?}: {e}")))
}

/// Parse an optional date; a blank input means "no date".
pub fn parse_optional_date(
  field: &'static str,
  raw: &str,
) -> Result<Option<NaiveDate>> {
  if raw.trim().is_empty() {
    return Ok(None);
  }
  parse_date(field, raw).map(Some)
}

pub fn parse_price(field: &'static str, raw: &str) -> Result<Decimal> {
  let value = Decimal::from_str(raw.trim())
    .map_err(|e| Error::validation(field, format!("{raw:?}: {e}")))?;
  price(field, value)?;
  Ok(normalize_price(value))
}

pub fn parse_quantity(field: &'static str, raw: &str) -> Result<i64> {
  let value = raw
    .trim()
    .parse::<i64>()
    .map_err(|e| Error::validation(field, format!("{raw:?}: {e}")))?;
  quantity(field, value)?;
  Ok(value)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_text_is_rejected() {
    assert!(required_text("name", "M1").is_ok());
    let err = required_text("name", "   ").unwrap_err();
    assert!(matches!(err, Error::Validation { field: "name", .. }));
  }

  #[test]
  fn negative_quantity_is_rejected() {
    assert!(quantity("quantity", 0).is_ok());
    assert!(quantity("quantity", -1).is_err());
    assert!(parse_quantity("quantity", "-3").is_err());
    assert!(parse_quantity("quantity", "two").is_err());
    assert_eq!(parse_quantity("quantity", " 7 ").unwrap(), 7);
  }

  #[test]
  fn price_keeps_two_fractional_digits() {
    let p = parse_price("price", "12.5").unwrap();
    assert_eq!(p.to_string(), "12.50");
    assert_eq!(p.scale(), 2);

    // Trailing zeros beyond the scale are harmless.
    assert_eq!(parse_price("price", "3.1000").unwrap().to_string(), "3.10");
  }

  #[test]
  fn price_rejects_excess_precision_and_range() {
    assert!(parse_price("price", "1.005").is_err());
    assert!(parse_price("price", "-0.01").is_err());
    assert!(parse_price("price", "100000000.00").is_err());
    assert!(parse_price("price", "99999999.99").is_ok());
    assert!(parse_price("price", "abc").is_err());
  }

  #[test]
  fn dates_are_calendar_dates() {
    let d = parse_date("completion_date", "2024-03-01").unwrap();
    assert_eq!(d, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    assert!(parse_date("completion_date", "2024-02-30").is_err());
    assert!(parse_date("completion_date", "01/03/2024").is_err());
    assert_eq!(parse_optional_date("last_maintenance_date", "").unwrap(), None);
  }
}
