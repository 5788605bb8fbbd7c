use anyhow::{Context, Result, bail};

/// Convert seconds since Unix epoch to an ISO 8601 UTC string.
pub fn unix_to_iso8601(secs: i64) -> String {
    let days = secs.div_euclid(86400);
    let tod = secs.rem_euclid(86400);
    let h = tod / 3600;
    let m = (tod % 3600) / 60;
    let s = tod % 60;
    let (y, mo, d) = civil_from_days(days);
    format!("{y:04}-{mo:02}-{d:02}T{h:02}:{m:02}:{s:02}Z")
}

/// Days since Unix epoch for a given calendar date.
pub fn epoch_days(year: i32, month: u32, day: u32) -> i64 {
    let y = year as i64;
    let m = month as i64;
    let d = day as i64;
    let a = (14 - m) / 12;
    let y2 = y + 4800 - a;
    let m2 = m + 12 * a - 3;
    let jdn = d + (153 * m2 + 2) / 5 + 365 * y2 + y2 / 4 - y2 / 100 + y2 / 400 - 32045;
    jdn - 2440588 // Unix epoch is Julian day 2440588
}

pub fn civil_from_days(z: i64) -> (i32, u32, u32) {
    let z = z + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y as i32, m as u32, d as u32)
}

/// Parse a UTC instant given either as Unix seconds (`1344230220.5`) or as
/// `YYYY-MM-DD[THH:MM[:SS[.fff]]][Z]`.
pub fn parse_utc(input: &str) -> Result<f64> {
    let input = input.trim();
    if let Ok(secs) = input.parse::<f64>() {
        if !secs.is_finite() {
            bail!("instant '{input}' is not finite");
        }
        return Ok(secs);
    }

    let input = input.strip_suffix('Z').unwrap_or(input);
    let (date, time) = input
        .split_once(['T', ' '])
        .map_or((input, None), |(d, t)| (d, Some(t)));

    let parts: Vec<&str> = date.splitn(3, '-').collect();
    let [year, month, day] = parts.as_slice() else {
        bail!("expected YYYY-MM-DD, found '{date}'");
    };
    let year: i32 = year.parse().context("invalid year")?;
    let month: u32 = month.parse().context("invalid month")?;
    let day: u32 = day.parse().context("invalid day")?;
    let days = epoch_days(year, month, day);
    if civil_from_days(days) != (year, month, day) {
        bail!("date '{date}' is out of range");
    }

    let mut secs_of_day = 0.0;
    if let Some(time) = time {
        let mut parts = time.splitn(3, ':');
        let h: u32 = parts.next().unwrap_or("0").parse().context("invalid hour")?;
        let m: u32 = parts.next().unwrap_or("0").parse().context("invalid minute")?;
        let s: f64 = parts.next().unwrap_or("0").parse().context("invalid second")?;
        if h > 23 || m > 59 || !(0.0..61.0).contains(&s) {
            bail!("time '{time}' is out of range");
        }
        secs_of_day = f64::from(h * 3600 + m * 60) + s;
    }

    Ok(days as f64 * 86400.0 + secs_of_day)
}
