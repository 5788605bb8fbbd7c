use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{MarsTimeError, Result};
use crate::time_scale::SECONDS_PER_DAY;

fn default_min_digits() -> usize {
    4
}

/// A Mars time zone together with the epoch its sols are counted from.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TimeZoneProfile {
    /// MSD of this frame's sol 0.
    pub start_sol: i64,
    /// Mars seconds (1/86400 sol) ahead of MTC.
    pub offset_seconds: f64,
    pub epoch_name: String,
    #[serde(default)]
    pub zone_name: String,
    #[serde(default = "default_min_digits")]
    pub min_digits: usize,
}

impl TimeZoneProfile {
    fn mission(start_sol: i64, offset_seconds: f64, epoch_name: &str) -> Self {
        TimeZoneProfile {
            start_sol,
            offset_seconds,
            epoch_name: epoch_name.to_string(),
            zone_name: String::new(),
            min_digits: 4,
        }
    }

    /// Coordinated Mars Time (also AMT), counting sols from the MSD epoch.
    pub fn mtc() -> Self {
        TimeZoneProfile {
            start_sol: 0,
            offset_seconds: 0.0,
            epoch_name: "MSD".to_string(),
            zone_name: "MTC".to_string(),
            min_digits: 5,
        }
    }

    /// Local mean solar time at a longitude given in degrees west.
    pub fn local_mean(lon_west: f64) -> Self {
        TimeZoneProfile {
            start_sol: 0,
            offset_seconds: -lon_west / 360.0 * SECONDS_PER_DAY,
            epoch_name: "MSD".to_string(),
            zone_name: format!("LMST@{lon_west}W"),
            min_digits: 5,
        }
    }
}

/// Named profiles, built once at startup and only read afterwards.
#[derive(Debug, Clone)]
pub struct ZoneRegistry {
    zones: BTreeMap<String, TimeZoneProfile>,
}

impl ZoneRegistry {
    /// MTC and the landed-local frames of past surface missions.
    pub fn builtin() -> Self {
        let zones = [
            ("mtc", TimeZoneProfile::mtc()),
            // Sol 1 = 1997-07-04 16:56:55, AAT-02:13:01
            ("pathfinder", TimeZoneProfile::mission(43904, -7981.0, "MP")),
            // Sol 1 = 2004-01-04 04:35, AAT+11:00:04
            ("spirit", TimeZoneProfile::mission(46215, 39840.0, "MER-A")),
            // Sol 1 = 2004-01-25 05:05, AAT-01:01:06
            ("opportunity", TimeZoneProfile::mission(46235, -3666.0, "MER-B")),
            // Sol 0 = 2008-05-25 23:53:52, LMST at 233.35 E
            ("phoenix", TimeZoneProfile::mission(47776, -30396.0, "MPh")),
            // Sol 0 = 2012-08-05 05:51, LMST at 137.4239 E
            ("curiosity", TimeZoneProfile::mission(49269, 32981.736, "MSL")),
        ];
        ZoneRegistry {
            zones: zones
                .into_iter()
                .map(|(name, tz)| (name.to_string(), tz))
                .collect(),
        }
    }

    /// Built-in zones overlaid with `custom` (custom wins on conflict).
    pub fn with_custom(custom: &HashMap<String, TimeZoneProfile>) -> Self {
        let mut registry = Self::builtin();
        for (name, tz) in custom {
            registry.zones.insert(name.to_lowercase(), tz.clone());
        }
        registry
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Result<&TimeZoneProfile> {
        self.zones
            .get(&name.to_lowercase())
            .ok_or_else(|| MarsTimeError::UnknownZone(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TimeZoneProfile)> {
        self.zones.iter().map(|(name, tz)| (name.as_str(), tz))
    }
}
