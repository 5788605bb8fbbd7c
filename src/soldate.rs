use std::fmt::{self, Write};

use crate::error::Result;
use crate::time_scale::SECONDS_PER_DAY;
use crate::zones::TimeZoneProfile;

/// Broken-down Mars time: sols since a profile's epoch plus Mars h:m:s.
///
/// Mars hours, minutes and seconds are 1/24, 1/1440 and 1/86400 of a sol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Soldate<'tz> {
    pub sol: i64,
    pub hour: u32,
    pub min: u32,
    pub sec: u32,
    pub profile: &'tz TimeZoneProfile,
}

impl<'tz> Soldate<'tz> {
    /// Split a Mars Sol Date into sol and time of sol in `profile`'s frame.
    pub fn from_msd(msd: f64, profile: &'tz TimeZoneProfile) -> Self {
        let shifted = msd - profile.start_sol as f64 + profile.offset_seconds / SECONDS_PER_DAY;
        let sol = shifted.floor();
        let mut rest = (shifted - sol) * 24.0;

        let hour = rest.floor();
        rest = (rest - hour) * 60.0;
        let min = rest.floor();
        rest = (rest - min) * 60.0;
        let sec = rest.floor();

        let mut date = Soldate {
            sol: sol as i64,
            hour: hour as u32,
            min: min as u32,
            sec: sec as u32,
            profile,
        };
        date.normalize();
        date
    }

    /// Carry fields pushed onto their upper bound by rounding.
    fn normalize(&mut self) {
        if self.sec >= 60 {
            self.sec -= 60;
            self.min += 1;
        }
        if self.min >= 60 {
            self.min -= 60;
            self.hour += 1;
        }
        if self.hour >= 24 {
            self.hour -= 24;
            self.sol += 1;
        }
    }

    /// Render into a freshly allocated string, reporting allocation failure
    /// instead of aborting.
    pub fn render(&self) -> Result<String> {
        let tz = self.profile;
        let mut out = String::new();
        // epoch, sol, "hh:mm:ss", zone and separators
        out.try_reserve(tz.epoch_name.len() + tz.min_digits.max(20) + 12 + tz.zone_name.len())?;
        write!(out, "{self}")?;
        Ok(out)
    }
}

/// `MSD 44796 12:34:56 MTC`, or `MSL 0034 14:54:49` when the zone has no name.
impl fmt::Display for Soldate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tz = self.profile;
        write!(
            f,
            "{} {:0width$} {:02}:{:02}:{:02}",
            tz.epoch_name,
            self.sol,
            self.hour,
            self.min,
            self.sec,
            width = tz.min_digits
        )?;
        if !tz.zone_name.is_empty() {
            write!(f, " {}", tz.zone_name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(epoch: &str, zone: &str, digits: usize) -> TimeZoneProfile {
        TimeZoneProfile {
            start_sol: 0,
            offset_seconds: 0.0,
            epoch_name: epoch.to_string(),
            zone_name: zone.to_string(),
            min_digits: digits,
        }
    }

    #[test]
    fn negative_fraction_floors() {
        let tz = plain("MSD", "MTC", 5);
        let d = Soldate::from_msd(-0.25, &tz);
        assert_eq!((d.sol, d.hour, d.min, d.sec), (-1, 18, 0, 0));

        let d = Soldate::from_msd(-0.3, &tz);
        assert_eq!(d.sol, -1);
        assert_eq!(d.hour, 16);
    }

    #[test]
    fn splits_time_of_sol() {
        let tz = plain("MSD", "MTC", 5);
        // 12:34:56 is 45296 Mars seconds into the sol; add half a second so
        // truncation lands on 56.
        let msd = 44796.0 + 45296.5 / 86400.0;
        let d = Soldate::from_msd(msd, &tz);
        assert_eq!((d.sol, d.hour, d.min, d.sec), (44796, 12, 34, 56));
    }

    #[test]
    fn applies_start_sol_and_offset() {
        let tz = TimeZoneProfile {
            start_sol: 49269,
            offset_seconds: 21_600.0,
            ..plain("MSL", "", 4)
        };
        let d = Soldate::from_msd(49303.5, &tz);
        assert_eq!((d.sol, d.hour, d.min, d.sec), (34, 18, 0, 0));

        // A negative offset can pull the time back into the previous sol.
        let tz = TimeZoneProfile {
            offset_seconds: -43_200.0,
            ..tz
        };
        let d = Soldate::from_msd(49303.25, &tz);
        assert_eq!((d.sol, d.hour), (33, 18));
    }

    #[test]
    fn never_emits_sixty() {
        let tz = plain("MSD", "MTC", 5);
        // Just below the next sol.
        let d = Soldate::from_msd(44796.0 - 1e-11, &tz);
        assert!(d.hour < 24 && d.min < 60 && d.sec < 60);

        let mut d = Soldate {
            sol: 1,
            hour: 23,
            min: 59,
            sec: 60,
            profile: &tz,
        };
        d.normalize();
        assert_eq!((d.sol, d.hour, d.min, d.sec), (2, 0, 0, 0));
    }

    #[test]
    fn fraction_rounding_to_a_whole_sol_carries() {
        let tz = plain("MSD", "MTC", 5);
        // -1e-17 - floor(-1e-17) rounds to exactly 1.0, i.e. hour 24.
        let d = Soldate::from_msd(-1e-17, &tz);
        assert_eq!((d.sol, d.hour, d.min, d.sec), (0, 0, 0, 0));
        assert_eq!(d.render().unwrap(), "MSD 00000 00:00:00 MTC");
    }

    #[test]
    fn formats_without_zone_name() {
        let tz = plain("MSL", "", 4);
        let d = Soldate {
            sol: 34,
            hour: 14,
            min: 54,
            sec: 49,
            profile: &tz,
        };
        assert_eq!(d.to_string(), "MSL 0034 14:54:49");
        assert_eq!(d.render().unwrap(), "MSL 0034 14:54:49");
    }

    #[test]
    fn formats_with_zone_name() {
        let tz = plain("MSD", "MTC", 5);
        let d = Soldate {
            sol: 44796,
            hour: 12,
            min: 34,
            sec: 56,
            profile: &tz,
        };
        assert_eq!(d.render().unwrap(), "MSD 44796 12:34:56 MTC");
    }

    #[test]
    fn wide_sols_are_not_truncated() {
        let tz = plain("MSL", "", 4);
        let d = Soldate {
            sol: 123456,
            hour: 1,
            min: 2,
            sec: 3,
            profile: &tz,
        };
        assert_eq!(d.to_string(), "MSL 123456 01:02:03");
    }
}
