use std::{fmt, str::FromStr};

use super::{Error, ErrorKind, Result};

const NANOSECOND: u128 = 1;
const MICROSECOND: u128 = 1000 * NANOSECOND;
const MILLISECOND: u128 = 1000 * MICROSECOND;
const SECOND: u128 = 1000 * MILLISECOND;
const MINUTE: u128 = 60 * SECOND;
const HOUR: u128 = 60 * MINUTE;

/// A signed span of time with nanosecond resolution
///
/// Values stored in knative config maps are written and read in the textual
/// form used by the autoscaler, e.g. `60s`, `1m30s`, `1h`, `500ms`.
/// Parsing and `Display` follow those rules exactly, so `"2m".parse()` gives
/// 120 seconds and displays back as `2m0s`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(i64);

impl Duration {
    pub const fn from_nanos(nanos: i64) -> Self {
        Duration(nanos)
    }

    pub const fn from_secs(secs: i64) -> Self {
        Duration(secs * 1_000_000_000)
    }

    pub const fn from_millis(millis: i64) -> Self {
        Duration(millis * 1_000_000)
    }

    pub fn as_nanos(&self) -> i64 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Seconds as a float, the unit used when storing durations
    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1e9
    }

    /// Whether rounding to the nearest second would change the value
    pub fn is_whole_seconds(&self) -> bool {
        self.0 % (SECOND as i64) == 0
    }

    /// Canonical storage form: the number of seconds suffixed with `s`
    ///
    /// `2m` is stored as `120s`, `6.5s` as `6.5s`.
    pub fn to_seconds_string(&self) -> String {
        format!("{}s", self.as_secs_f64())
    }

    /// Display form without redundant zero remainders
    ///
    /// `1m0s` becomes `1m` and `1h0m0s` becomes `1h`, everything else is
    /// left in full (`2m3s`, `344h2m28s`).
    pub fn describe(&self) -> String {
        let mut s = self.to_string();
        if s.ends_with("m0s") {
            s.truncate(s.len() - 2);
        }
        if s.ends_with("h0m") {
            s.truncate(s.len() - 2);
        }
        s
    }
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(NANOSECOND),
        "us" | "µs" | "μs" => Some(MICROSECOND),
        "ms" => Some(MILLISECOND),
        "s" => Some(SECOND),
        "m" => Some(MINUTE),
        "h" => Some(HOUR),
        _ => None,
    }
}

impl FromStr for Duration {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        let invalid = || Error::from(ErrorKind::InvalidDuration(raw.to_string()));
        let mut s = raw;
        let mut negative = false;
        if let Some(rest) = s.strip_prefix('-') {
            negative = true;
            s = rest;
        } else if let Some(rest) = s.strip_prefix('+') {
            s = rest;
        }
        // special case: a bare zero needs no unit
        if s == "0" {
            return Ok(Duration(0));
        }
        if s.is_empty() {
            return Err(invalid());
        }

        let mut total: u128 = 0;
        while !s.is_empty() {
            // leading integer part
            let int_len = s.chars().take_while(|c| c.is_ascii_digit()).count();
            let int_part = &s[..int_len];
            s = &s[int_len..];

            // optional fraction
            let mut frac_part = "";
            if let Some(rest) = s.strip_prefix('.') {
                let frac_len = rest.chars().take_while(|c| c.is_ascii_digit()).count();
                frac_part = &rest[..frac_len];
                s = &rest[frac_len..];
            }
            if int_part.is_empty() && frac_part.is_empty() {
                return Err(invalid());
            }

            let unit_len = s
                .char_indices()
                .find(|(_, c)| *c == '.' || c.is_ascii_digit())
                .map(|(i, _)| i)
                .unwrap_or_else(|| s.len());
            let unit = &s[..unit_len];
            s = &s[unit_len..];
            if unit.is_empty() {
                bail!(ErrorKind::MissingDurationUnit(raw.to_string()));
            }
            let scale = match unit_nanos(unit) {
                Some(n) => n,
                None => bail!(ErrorKind::UnknownDurationUnit(unit.to_string(), raw.to_string())),
            };

            let whole: u128 = if int_part.is_empty() {
                0
            } else {
                int_part.parse().map_err(|_| invalid())?
            };
            let mut value = whole.checked_mul(scale).ok_or_else(invalid)?;
            if !frac_part.is_empty() {
                // digits beyond nanosecond precision can never contribute
                let digits = &frac_part[..frac_part.len().min(18)];
                let frac: u128 = digits.parse().map_err(|_| invalid())?;
                let denom = 10u128.pow(digits.len() as u32);
                value += frac * scale / denom;
            }
            total = total.checked_add(value).ok_or_else(invalid)?;
            if total > i64::MAX as u128 {
                return Err(invalid());
            }
        }
        let nanos = total as i64;
        Ok(Duration(if negative { -nanos } else { nanos }))
    }
}

// integer and fractional part of v / 10^prec, fraction trimmed of trailing zeros
fn split_frac(v: u128, prec: u32) -> (u128, String) {
    let pow = 10u128.pow(prec);
    let int = v / pow;
    let frac = v % pow;
    if frac == 0 {
        return (int, String::new());
    }
    let digits = format!("{:0width$}", frac, width = prec as usize);
    (int, format!(".{}", digits.trim_end_matches('0')))
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("0s");
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        let u = (self.0 as i128).abs() as u128;

        if u < SECOND {
            return if u < MICROSECOND {
                write!(f, "{}{}ns", sign, u)
            } else if u < MILLISECOND {
                let (int, frac) = split_frac(u, 3);
                write!(f, "{}{}{}µs", sign, int, frac)
            } else {
                let (int, frac) = split_frac(u, 6);
                write!(f, "{}{}{}ms", sign, int, frac)
            };
        }

        let (secs, frac) = split_frac(u, 9);
        let mut out = format!("{}{}s", secs % 60, frac);
        let mins = secs / 60;
        if mins > 0 {
            out = format!("{}m{}", mins % 60, out);
            let hours = mins / 60;
            if hours > 0 {
                out = format!("{}h{}", hours, out);
            }
        }
        write!(f, "{}{}", sign, out)
    }
}
