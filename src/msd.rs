//! Mars Sol Date: sols elapsed since the 1873-12-29 reference midnight.
//!
//! The constants come from Mars24 equation C-2 with the 0.00096 sol
//! correction to the prime meridian.

use crate::time_scale::tai_to_j2k;

/// Length of a sol in Earth days.
pub const SOL_IN_DAYS: f64 = 1.027491252;
/// MSD at J2000 + 4.5 days, before the prime-meridian correction.
pub const MSD_AT_J2000_PLUS_4_5: f64 = 44_796.0;
pub const PRIME_MERIDIAN_CORRECTION: f64 = 0.00096;

pub fn j2k_to_msd(j2k: f64) -> f64 {
    (j2k - 4.5) / SOL_IN_DAYS + MSD_AT_J2000_PLUS_4_5 - PRIME_MERIDIAN_CORRECTION
}

pub fn msd_to_j2k(msd: f64) -> f64 {
    SOL_IN_DAYS * (msd - MSD_AT_J2000_PLUS_4_5 + PRIME_MERIDIAN_CORRECTION) + 4.5
}

/// TAI seconds since the Unix epoch straight to Mars Sol Date.
pub fn tai_to_msd(tai: f64) -> f64 {
    j2k_to_msd(tai_to_j2k(tai))
}
