//! Mars orbital parameters as functions of J2000 TT days.
//!
//! Angles are in degrees unless noted. Formulas follow the Mars24 algorithm
//! (Allison & McEwen 2000), sections B and C.

const DEG: f64 = std::f64::consts::PI / 180.0;

/// Mean motion of the perturbation terms, radians per day per unit period.
const PERTURBATION_RATE: f64 = 2.0 * std::f64::consts::PI / 365.25;

/// (amplitude, period in Julian years, phase) for each planetary perturber.
const PERTURBERS: [(f64, f64, f64); 7] = [
    (0.0071, 2.2353, 49.409),
    (0.0057, 2.7543, 168.173),
    (0.0039, 1.1177, 191.837),
    (0.0037, 15.7866, 21.736),
    (0.0021, 2.1354, 15.704),
    (0.0020, 2.4694, 95.528),
    (0.0018, 32.8493, 49.095),
];

/// Mars mean anomaly (B-1).
pub fn mean_anomaly(j2k: f64) -> f64 {
    19.3780 + 0.52402075 * j2k
}

/// Angle of the fictitious mean sun (B-2).
pub fn fictitious_mean_sun(j2k: f64) -> f64 {
    270.3863 + 0.52403840 * j2k
}

/// Sum of planetary perturbations (B-3).
pub fn perturbation(j2k: f64) -> f64 {
    PERTURBERS
        .iter()
        .map(|&(amplitude, period, phase)| {
            amplitude * (PERTURBATION_RATE * j2k / period).cos() + phase
        })
        .sum()
}

/// Equation of center (B-4).
pub fn equation_of_center(j2k: f64) -> f64 {
    let m = mean_anomaly(j2k) * DEG;
    (10.691 + 3e-7 * j2k) * m.sin()
        + 0.623 * (2.0 * m).sin()
        + 0.050 * (3.0 * m).sin()
        + 0.005 * (4.0 * m).sin()
        + 0.0005 * (5.0 * m).sin()
        + perturbation(j2k)
}

/// Areocentric solar longitude, Ls (B-5). Not reduced to [0, 360).
pub fn areocentric_longitude(j2k: f64) -> f64 {
    fictitious_mean_sun(j2k) + equation_of_center(j2k)
}

/// Equation of time (C-1).
pub fn equation_of_time(j2k: f64) -> f64 {
    let ls = areocentric_longitude(j2k) * DEG;
    2.861 * (2.0 * ls).sin() - 0.071 * (4.0 * ls).sin() + 0.002 * (6.0 * ls).sin()
        - equation_of_center(j2k)
}

/// Local mean solar time in sols at `lon_west` degrees west (C-4).
pub fn local_mean_solar_time(msd: f64, lon_west: f64) -> f64 {
    msd - lon_west / 360.0
}

pub fn normalize_degrees(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}
