//! # runwith timespan
//!
//! Parser for the compact time span notation accepted by `--time-limit` and
//! `--grace-time`.
//!
//! A time span is a sequence of `<number><unit>` components. Units must
//! appear in this order and at most once each:
//!
//! | Unit | Meaning |
//! |------|---------|
//! | `w`  | weeks |
//! | `d`  | days |
//! | `h`  | hours |
//! | `m`  | minutes |
//! | `s`  | seconds |
//! | `ms` | milliseconds |
//!
//! Numbers may carry a decimal fraction (`1.5h`, `.7s`).
//!
//! ```rust
//! use runwith_timespan::parse_timespan;
//! use std::time::Duration;
//!
//! assert_eq!(parse_timespan("1h30m").unwrap(), Duration::from_secs(5400));
//! assert_eq!(parse_timespan("200ms").unwrap(), Duration::from_millis(200));
//! assert!(parse_timespan("123abc").is_err());
//! ```

use std::fmt;
use std::time::Duration;

use runwith_common::{ConfigError, ConfigResult};

const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SECOND: u64 = 1_000 * NANOS_PER_MILLI;

/// Components of a time span, in the order they must appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Unit {
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
}

impl Unit {
    const ALL: [Unit; 6] = [
        Unit::Weeks,
        Unit::Days,
        Unit::Hours,
        Unit::Minutes,
        Unit::Seconds,
        Unit::Milliseconds,
    ];

    /// Length of one unit in nanoseconds.
    pub fn nanos(self) -> u64 {
        match self {
            Unit::Weeks => 7 * 24 * 3600 * NANOS_PER_SECOND,
            Unit::Days => 24 * 3600 * NANOS_PER_SECOND,
            Unit::Hours => 3600 * NANOS_PER_SECOND,
            Unit::Minutes => 60 * NANOS_PER_SECOND,
            Unit::Seconds => NANOS_PER_SECOND,
            Unit::Milliseconds => NANOS_PER_MILLI,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Weeks => "w",
            Unit::Days => "d",
            Unit::Hours => "h",
            Unit::Minutes => "m",
            Unit::Seconds => "s",
            Unit::Milliseconds => "ms",
        }
    }

    /// Split a unit suffix off the front of `text`.
    ///
    /// `ms` is checked before `m` so that milliseconds never read as minutes.
    fn strip_prefix(text: &str) -> Option<(Unit, &str)> {
        if let Some(rest) = text.strip_prefix("ms") {
            return Some((Unit::Milliseconds, rest));
        }
        let unit = match text.chars().next()? {
            'w' => Unit::Weeks,
            'd' => Unit::Days,
            'h' => Unit::Hours,
            'm' => Unit::Minutes,
            's' => Unit::Seconds,
            _ => return None,
        };
        Some((unit, &text[1..]))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Parse a time span such as `"1h30m"` into a [`Duration`].
///
/// Fails with [`ConfigError::InvalidTimespan`] naming the input verbatim when
/// the text is empty, has a component without a number or unit, repeats a
/// unit, or lists units out of order.
pub fn parse_timespan(input: &str) -> ConfigResult<Duration> {
    let invalid = || ConfigError::invalid_timespan(input);

    if input.is_empty() {
        return Err(invalid());
    }

    let mut rest = input;
    let mut previous: Option<Unit> = None;
    let mut total_nanos = 0.0_f64;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        let value = parse_number(number).ok_or_else(invalid)?;

        let (unit, tail) = Unit::strip_prefix(tail).ok_or_else(invalid)?;
        if previous.map_or(false, |prev| unit <= prev) {
            return Err(invalid());
        }
        previous = Some(unit);

        total_nanos += (value * unit.nanos() as f64).round();
        rest = tail;
    }

    if !total_nanos.is_finite() || total_nanos >= u64::MAX as f64 {
        return Err(invalid());
    }
    Ok(Duration::from_nanos(total_nanos as u64))
}

/// `digits[.digits]`, `.digits` or `digits.`; anything else is rejected.
fn parse_number(text: &str) -> Option<f64> {
    if text.is_empty() || text == "." || text.matches('.').count() > 1 {
        return None;
    }
    let normalized = match (text.starts_with('.'), text.ends_with('.')) {
        (true, _) => format!("0{}", text),
        (false, true) => format!("{}0", text),
        (false, false) => text.to_string(),
    };
    normalized.parse::<f64>().ok()
}

/// Render a duration in the same notation, using whole units.
///
/// Sub-millisecond remainders are dropped. A zero duration renders as `0s`.
pub fn format_timespan(duration: Duration) -> String {
    let mut remaining = duration.as_nanos();
    let mut out = String::new();

    for unit in Unit::ALL {
        let size = u128::from(unit.nanos());
        let count = remaining / size;
        if count > 0 {
            out.push_str(&format!("{}{}", count, unit));
            remaining -= count * size;
        }
    }

    if out.is_empty() {
        out.push_str("0s");
    }
    out
}
