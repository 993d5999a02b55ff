//! Interval parsing.

use crate::error::{TabbyError, TabbyResult};
use std::time::Duration;

/// Parse an interval like `500ms`, `1s`, `1.5s`, `2m` or `1m30s`.
///
/// Units: `ns`, `us`/`µs`, `ms`, `s`, `m`, `h`. A bare `0` is accepted;
/// any other number needs a unit. A leading `+` is allowed, surrounding
/// whitespace is not. Negative intervals are rejected.
pub fn parse_interval(input: &str) -> TabbyResult<Duration> {
    if input.is_empty() {
        return Err(TabbyError::invalid_interval(input, "empty interval"));
    }

    let s = input.strip_prefix('+').unwrap_or(input);
    if s.is_empty() {
        return Err(TabbyError::invalid_interval(input, "expected a number"));
    }
    if s.starts_with('-') {
        return Err(TabbyError::invalid_interval(input, "interval cannot be negative"));
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total_nanos: f64 = 0.0;
    let mut rest = s;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        if number.is_empty() {
            return Err(TabbyError::invalid_interval(input, "expected a number"));
        }

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);

        let unit_nanos: f64 = match unit {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => return Err(TabbyError::invalid_interval(input, "missing unit")),
            other => {
                return Err(TabbyError::invalid_interval(
                    input,
                    &format!("unknown unit '{}'", other),
                ))
            }
        };

        let value: f64 = number
            .parse()
            .map_err(|_| TabbyError::invalid_interval(input, &format!("invalid number '{}'", number)))?;

        total_nanos += value * unit_nanos;
        rest = tail;
    }

    if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
        return Err(TabbyError::invalid_interval(input, "interval is too large"));
    }

    Ok(Duration::from_nanos(total_nanos.round() as u64))
}
