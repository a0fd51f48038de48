//! Parsing of date/time arguments from the command line.

use anyhow::{Result, bail};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Parses a CLI timestamp: either a full `YYYY-MM-DDTHH:MM[:SS]` or a bare
/// `YYYY-MM-DD`, which maps to the start or end of that day depending on
/// which bound it is used for.
pub fn parse_datetime_arg(s: &str, end_of_day: bool) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let time = if end_of_day {
            NaiveTime::from_hms_opt(23, 59, 59)
        } else {
            NaiveTime::from_hms_opt(0, 0, 0)
        };
        if let Some(time) = time {
            return Ok(date.and_time(time));
        }
    }
    bail!("invalid date '{s}': expected YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS]")
}
