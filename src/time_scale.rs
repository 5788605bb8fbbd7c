//! Terrestrial time scales: UTC -> TAI -> TT -> days since J2000.
//!
//! Instants are Unix-style seconds counted in the named scale; J2000 values are
//! TT days since 2000-01-01 12:00 TT.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Result;
use crate::leap_table::{LeapTable, Offset};

/// TT - TAI, exact by definition.
pub const TT_TAI_SECONDS: f64 = 32.184;
pub const SECONDS_PER_DAY: f64 = 86_400.0;
/// Days from 1970-01-01 00:00 to 2000-01-01 12:00.
pub const UNIX_J2000_DAYS: f64 = 10_957.5;

/// A UTC wall-clock sample with microsecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcInstant {
    pub secs: i64,
    pub micros: u32,
}

impl UtcInstant {
    pub fn now() -> Self {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => UtcInstant {
                secs: d.as_secs() as i64,
                micros: d.subsec_micros(),
            },
            // Clock set before 1970.
            Err(e) => Self::from_seconds(-e.duration().as_secs_f64()),
        }
    }

    pub fn from_seconds(t: f64) -> Self {
        let secs = t.floor();
        let micros = (((t - secs) * 1e6).round() as u32).min(999_999);
        UtcInstant {
            secs: secs as i64,
            micros,
        }
    }

    pub fn as_seconds(&self) -> f64 {
        self.secs as f64 + f64::from(self.micros) / 1e6
    }
}

/// UTC seconds to TAI seconds, resolving TAI-UTC from `table`.
///
/// The offset is looked up for the whole UTC second containing `instant`.
pub fn utc_to_tai(instant: UtcInstant, table: &LeapTable) -> Result<(f64, Offset)> {
    let offset = table.offset(instant.secs)?;
    Ok((instant.as_seconds() + f64::from(offset.seconds), offset))
}

pub fn tai_to_tt(tai: f64) -> f64 {
    tai + TT_TAI_SECONDS
}

pub fn tt_to_tai(tt: f64) -> f64 {
    tt - TT_TAI_SECONDS
}

pub fn tt_to_j2k(tt: f64) -> f64 {
    tt / SECONDS_PER_DAY - UNIX_J2000_DAYS
}

pub fn j2k_to_tt(j2k: f64) -> f64 {
    SECONDS_PER_DAY * (j2k + UNIX_J2000_DAYS)
}

pub fn tai_to_j2k(tai: f64) -> f64 {
    (tai + TT_TAI_SECONDS) / SECONDS_PER_DAY - UNIX_J2000_DAYS
}

pub fn j2k_to_tai(j2k: f64) -> f64 {
    SECONDS_PER_DAY * (j2k + UNIX_J2000_DAYS) - TT_TAI_SECONDS
}
