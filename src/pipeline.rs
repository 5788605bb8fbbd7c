//! UTC wall-clock sample to Mars time, end to end.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::leap_table::{LeapTable, Offset, OffsetStatus};
use crate::msd::j2k_to_msd;
use crate::orbit;
use crate::soldate::Soldate;
use crate::time_scale::{UtcInstant, tai_to_j2k, tai_to_tt, utc_to_tai};
use crate::time_utils::unix_to_iso8601;
use crate::zones::TimeZoneProfile;

/// Every intermediate of one conversion, for display and for picking zones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarsClock {
    pub utc: f64,
    pub tai_utc: Offset,
    pub tai: f64,
    pub tt: f64,
    /// TT days since J2000.
    pub j2000: f64,
    pub msd: f64,
    /// Coordinated Mars Time in hours.
    pub mtc: f64,
    /// Areocentric solar longitude, degrees in [0, 360).
    pub ls: f64,
    pub equation_of_center: f64,
    pub equation_of_time: f64,
}

impl MarsClock {
    pub fn at(instant: UtcInstant, table: &LeapTable) -> Result<Self> {
        let (tai, tai_utc) = utc_to_tai(instant, table)?;
        match tai_utc.status {
            OffsetStatus::Authoritative => {}
            OffsetStatus::PreRange => warn!(
                utc = %unix_to_iso8601(instant.secs),
                "instant predates the leap second table, assuming TAI-UTC = 0; result is approximate"
            ),
            OffsetStatus::Stale => warn!(
                expired = %unix_to_iso8601(table.expires()),
                "leap second table has expired, using TAI-UTC = {}; run `marstime leap update`",
                tai_utc.seconds
            ),
        }

        let j2000 = tai_to_j2k(tai);
        let msd = j2k_to_msd(j2000);
        debug!(tai, j2000, msd, "converted");

        Ok(MarsClock {
            utc: instant.as_seconds(),
            tai_utc,
            tai,
            tt: tai_to_tt(tai),
            j2000,
            msd,
            mtc: msd.rem_euclid(1.0) * 24.0,
            ls: orbit::normalize_degrees(orbit::areocentric_longitude(j2000)),
            equation_of_center: orbit::equation_of_center(j2000),
            equation_of_time: orbit::equation_of_time(j2000),
        })
    }

    pub fn soldate<'tz>(&self, profile: &'tz TimeZoneProfile) -> Soldate<'tz> {
        Soldate::from_msd(self.msd, profile)
    }
}

/// The display line for `instant` in `profile`.
pub fn mars_time(
    instant: UtcInstant,
    table: &LeapTable,
    profile: &TimeZoneProfile,
) -> Result<String> {
    MarsClock::at(instant, table)?.soldate(profile).render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarsTimeError;
    use crate::zones::ZoneRegistry;

    const LEAP_LIST: &str = "\
#$	 3676924800
#@	 3928521600
2272060800	10	# 1 Jan 1972
3550089600	35	# 1 Jul 2012
3644697600	36	# 1 Jul 2015
3692217600	37	# 1 Jan 2017
";

    fn table() -> LeapTable {
        LeapTable::parse(LEAP_LIST).unwrap()
    }

    #[test]
    fn curiosity_landing() {
        let zones = ZoneRegistry::builtin();
        // Touchdown, 2012-08-06 05:17:57 UTC.
        let landing = UtcInstant::from_seconds(1_344_230_277.0);

        let clock = MarsClock::at(landing, &table()).unwrap();
        assert_eq!(clock.tai_utc.seconds, 35);
        assert_eq!(clock.tai, 1_344_230_312.0);
        assert!((clock.msd - 49_269.245_471_302_66).abs() < 1e-8);

        let msl = zones.get("curiosity").unwrap();
        assert_eq!(clock.soldate(msl).to_string(), "MSL 0000 15:03:10");
        assert_eq!(
            mars_time(landing, &table(), zones.get("mtc").unwrap()).unwrap(),
            "MSD 49269 05:53:28 MTC"
        );
    }

    #[test]
    fn leap_second_boundary() {
        let zones = ZoneRegistry::builtin();
        let msl = zones.get("curiosity").unwrap();
        let new_year = UtcInstant::from_seconds(1_483_228_800.0);
        let clock = MarsClock::at(new_year, &table()).unwrap();
        assert_eq!(clock.tai_utc.seconds, 37);
        assert!(clock.tai_utc.is_authoritative());
        assert_eq!(clock.soldate(msl).to_string(), "MSL 1566 08:41:52");
    }

    #[test]
    fn stale_and_pre_range_still_convert() {
        let stale = MarsClock::at(UtcInstant::from_seconds(1.9e9), &table()).unwrap();
        assert_eq!(stale.tai_utc.status, OffsetStatus::Stale);
        assert_eq!(stale.tai_utc.seconds, 37);

        let early = MarsClock::at(UtcInstant::from_seconds(0.0), &table()).unwrap();
        assert_eq!(early.tai_utc.status, OffsetStatus::PreRange);
        assert_eq!(early.tai, 0.0);
    }

    #[test]
    fn derived_quantities_are_consistent() {
        let clock = MarsClock::at(UtcInstant::from_seconds(1_700_000_000.5), &table()).unwrap();
        assert!((clock.tt - clock.tai - 32.184).abs() < 1e-6);
        assert!((0.0..24.0).contains(&clock.mtc));
        assert!((0.0..360.0).contains(&clock.ls));
        assert!((clock.mtc - 18.0).abs() < 1.0);
    }

    #[test]
    fn frozen_instant_is_idempotent() {
        let zones = ZoneRegistry::builtin();
        let t = UtcInstant::from_seconds(1_700_000_000.5);
        for (_, tz) in zones.iter() {
            let first = mars_time(t, &table(), tz).unwrap();
            let second = mars_time(t, &table(), tz).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn empty_table_fails() {
        let empty = LeapTable::parse("#$ 3676924800\n#@ 3928521600\n").unwrap();
        let err = MarsClock::at(UtcInstant::from_seconds(0.0), &empty).unwrap_err();
        assert!(matches!(err, MarsTimeError::EmptyTable));
    }
}
