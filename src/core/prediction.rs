use nalgebra::{Matrix3, Vector3};

use crate::core::interpolate::{
    interpolate_angles, interpolate_continuous, interpolate_nearest, unwrap_angles,
};
use crate::types::{Attitude, NavError, NavResult, Orbit, OrbitAngles};

/// Attitude prediction time series.
///
/// Construction validates the series and unwraps the 2-pi periodicity of
/// every angle once, so repeated interpolation queries need no unwrapping.
/// Instances are immutable and shared read-only across parallel chunks.
#[derive(Debug, Clone)]
pub struct AttitudePrediction {
    prediction_times: Vec<f64>,
    angle_between_earth_and_sun: Vec<f64>,
    angle_between_sat_spin_and_z_axis: Vec<f64>,
    angle_between_sat_spin_and_yz_plane: Vec<f64>,
}

impl AttitudePrediction {
    pub fn new(
        prediction_times: Vec<f64>,
        angle_between_earth_and_sun: Vec<f64>,
        angle_between_sat_spin_and_z_axis: Vec<f64>,
        angle_between_sat_spin_and_yz_plane: Vec<f64>,
    ) -> NavResult<Self> {
        validate_prediction_times(&prediction_times)?;
        let expected = prediction_times.len();
        validate_series_len(
            "angle_between_earth_and_sun",
            expected,
            angle_between_earth_and_sun.len(),
        )?;
        validate_series_len(
            "angle_between_sat_spin_and_z_axis",
            expected,
            angle_between_sat_spin_and_z_axis.len(),
        )?;
        validate_series_len(
            "angle_between_sat_spin_and_yz_plane",
            expected,
            angle_between_sat_spin_and_yz_plane.len(),
        )?;
        log::debug!("Attitude prediction with {} samples", expected);

        Ok(Self {
            prediction_times,
            angle_between_earth_and_sun: unwrap_angles(&angle_between_earth_and_sun),
            angle_between_sat_spin_and_z_axis: unwrap_angles(&angle_between_sat_spin_and_z_axis),
            angle_between_sat_spin_and_yz_plane: unwrap_angles(&angle_between_sat_spin_and_yz_plane),
        })
    }

    /// Interpolate the attitude at an observation time.
    ///
    /// Out-of-range queries yield NaN angles, marking the affected pixel
    /// unnavigable downstream.
    pub fn interpolate(&self, time: f64) -> Attitude {
        Attitude {
            angle_between_earth_and_sun: interpolate_angles(
                time,
                &self.prediction_times,
                &self.angle_between_earth_and_sun,
            ),
            angle_between_sat_spin_and_z_axis: interpolate_angles(
                time,
                &self.prediction_times,
                &self.angle_between_sat_spin_and_z_axis,
            ),
            angle_between_sat_spin_and_yz_plane: interpolate_angles(
                time,
                &self.prediction_times,
                &self.angle_between_sat_spin_and_yz_plane,
            ),
        }
    }

    pub fn prediction_times(&self) -> &[f64] {
        &self.prediction_times
    }
}

/// Orbit prediction time series.
///
/// Angular series are unwrapped at construction like the attitude series;
/// satellite positions stay as plain earth-fixed coordinate series and the
/// nutation/precession matrices are kept per sample.
#[derive(Debug, Clone)]
pub struct OrbitPrediction {
    prediction_times: Vec<f64>,
    greenwich_sidereal_time: Vec<f64>,
    declination_from_sat_to_sun: Vec<f64>,
    right_ascension_from_sat_to_sun: Vec<f64>,
    sat_position_x: Vec<f64>,
    sat_position_y: Vec<f64>,
    sat_position_z: Vec<f64>,
    nutation_precession: Vec<Matrix3<f64>>,
}

impl OrbitPrediction {
    pub fn new(
        prediction_times: Vec<f64>,
        greenwich_sidereal_time: Vec<f64>,
        declination_from_sat_to_sun: Vec<f64>,
        right_ascension_from_sat_to_sun: Vec<f64>,
        sat_position: Vec<Vector3<f64>>,
        nutation_precession: Vec<Matrix3<f64>>,
    ) -> NavResult<Self> {
        validate_prediction_times(&prediction_times)?;
        let expected = prediction_times.len();
        validate_series_len(
            "greenwich_sidereal_time",
            expected,
            greenwich_sidereal_time.len(),
        )?;
        validate_series_len(
            "declination_from_sat_to_sun",
            expected,
            declination_from_sat_to_sun.len(),
        )?;
        validate_series_len(
            "right_ascension_from_sat_to_sun",
            expected,
            right_ascension_from_sat_to_sun.len(),
        )?;
        validate_series_len("sat_position", expected, sat_position.len())?;
        validate_series_len("nutation_precession", expected, nutation_precession.len())?;
        log::debug!("Orbit prediction with {} samples", expected);

        Ok(Self {
            prediction_times,
            greenwich_sidereal_time: unwrap_angles(&greenwich_sidereal_time),
            declination_from_sat_to_sun: unwrap_angles(&declination_from_sat_to_sun),
            right_ascension_from_sat_to_sun: unwrap_angles(&right_ascension_from_sat_to_sun),
            sat_position_x: sat_position.iter().map(|p| p.x).collect(),
            sat_position_y: sat_position.iter().map(|p| p.y).collect(),
            sat_position_z: sat_position.iter().map(|p| p.z).collect(),
            nutation_precession,
        })
    }

    /// Interpolate the orbital state at an observation time.
    ///
    /// Orbit angles interpolate with periodicity handling, the satellite
    /// position componentwise linearly, and the nutation/precession matrix
    /// by nearest neighbour. Out-of-range queries yield NaN throughout.
    pub fn interpolate(&self, time: f64) -> Orbit {
        Orbit {
            angles: OrbitAngles {
                greenwich_sidereal_time: interpolate_angles(
                    time,
                    &self.prediction_times,
                    &self.greenwich_sidereal_time,
                ),
                declination_from_sat_to_sun: interpolate_angles(
                    time,
                    &self.prediction_times,
                    &self.declination_from_sat_to_sun,
                ),
                right_ascension_from_sat_to_sun: interpolate_angles(
                    time,
                    &self.prediction_times,
                    &self.right_ascension_from_sat_to_sun,
                ),
            },
            sat_position: Vector3::new(
                interpolate_continuous(time, &self.prediction_times, &self.sat_position_x),
                interpolate_continuous(time, &self.prediction_times, &self.sat_position_y),
                interpolate_continuous(time, &self.prediction_times, &self.sat_position_z),
            ),
            nutation_precession: interpolate_nearest(
                time,
                &self.prediction_times,
                &self.nutation_precession,
            ),
        }
    }

    pub fn prediction_times(&self) -> &[f64] {
        &self.prediction_times
    }
}

/// Predicted time-dependent navigation parameters for one image.
#[derive(Debug, Clone)]
pub struct PredictedNavigationParameters {
    pub attitude: AttitudePrediction,
    pub orbit: OrbitPrediction,
}

impl PredictedNavigationParameters {
    /// Interpolate attitude and orbit at an observation time.
    pub fn interpolate(&self, time: f64) -> (Attitude, Orbit) {
        (
            self.attitude.interpolate(time),
            self.orbit.interpolate(time),
        )
    }
}

fn validate_prediction_times(times: &[f64]) -> NavResult<()> {
    if times.windows(2).any(|w| w[1] <= w[0]) {
        return Err(NavError::NonMonotonicTimes);
    }
    Ok(())
}

fn validate_series_len(name: &'static str, expected: usize, actual: usize) -> NavResult<()> {
    if actual != expected {
        return Err(NavError::SeriesLengthMismatch {
            name,
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::TAU;

    fn attitude_prediction() -> AttitudePrediction {
        AttitudePrediction::new(
            vec![0.0, 1.0, 2.0],
            vec![0.0, 0.5, 1.0],
            vec![0.1, 0.1, 0.1],
            vec![-0.2, 0.0, 0.2],
        )
        .unwrap()
    }

    fn orbit_prediction() -> OrbitPrediction {
        OrbitPrediction::new(
            vec![0.0, 1.0],
            vec![0.0, 0.2],
            vec![0.1, 0.1],
            vec![0.3, 0.5],
            vec![
                Vector3::new(42_164_000.0, 0.0, 0.0),
                Vector3::new(42_164_000.0, 1000.0, -500.0),
            ],
            vec![Matrix3::identity(), Matrix3::from_element(2.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_attitude_interpolation() {
        let prediction = attitude_prediction();
        let attitude = prediction.interpolate(0.5);
        assert_abs_diff_eq!(attitude.angle_between_earth_and_sun, 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(
            attitude.angle_between_sat_spin_and_z_axis,
            0.1,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            attitude.angle_between_sat_spin_and_yz_plane,
            -0.1,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_attitude_series_unwrapped_at_construction() {
        // Raw series jumps from just below pi to just above -pi; the
        // interpolated midpoint must stay on the short arc.
        let prediction = AttitudePrediction::new(
            vec![0.0, 1.0],
            vec![3.0, -3.0],
            vec![0.0, 0.0],
            vec![0.0, 0.0],
        )
        .unwrap();
        let attitude = prediction.interpolate(0.25);
        let expected = 3.0 + 0.25 * (TAU - 6.0);
        assert_abs_diff_eq!(
            attitude.angle_between_earth_and_sun,
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_attitude_out_of_range_is_nan() {
        let prediction = attitude_prediction();
        for time in [-1.0, 2.0, 3.0] {
            let attitude = prediction.interpolate(time);
            assert!(attitude.angle_between_earth_and_sun.is_nan());
            assert!(attitude.angle_between_sat_spin_and_z_axis.is_nan());
            assert!(attitude.angle_between_sat_spin_and_yz_plane.is_nan());
        }
    }

    #[test]
    fn test_orbit_interpolation() {
        let prediction = orbit_prediction();
        let orbit = prediction.interpolate(0.5);
        assert_abs_diff_eq!(orbit.angles.greenwich_sidereal_time, 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(
            orbit.angles.right_ascension_from_sat_to_sun,
            0.4,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(orbit.sat_position.x, 42_164_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(orbit.sat_position.y, 500.0, epsilon = 1e-9);
        assert_abs_diff_eq!(orbit.sat_position.z, -250.0, epsilon = 1e-9);
        // Nearest neighbour keeps the left sample matrix.
        assert_eq!(orbit.nutation_precession, Matrix3::identity());
    }

    #[test]
    fn test_orbit_out_of_range_is_nan() {
        let prediction = orbit_prediction();
        let orbit = prediction.interpolate(1.0);
        assert!(orbit.angles.greenwich_sidereal_time.is_nan());
        assert!(orbit.sat_position.x.is_nan());
        assert!(orbit.nutation_precession.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_non_monotonic_times_rejected() {
        let result = AttitudePrediction::new(
            vec![0.0, 1.0, 1.0],
            vec![0.0; 3],
            vec![0.0; 3],
            vec![0.0; 3],
        );
        assert!(matches!(result, Err(NavError::NonMonotonicTimes)));
    }

    #[test]
    fn test_series_length_mismatch_rejected() {
        let result = OrbitPrediction::new(
            vec![0.0, 1.0],
            vec![0.0, 0.1],
            vec![0.0, 0.1],
            vec![0.0, 0.1],
            vec![Vector3::zeros()],
            vec![Matrix3::identity(), Matrix3::identity()],
        );
        assert!(matches!(
            result,
            Err(NavError::SeriesLengthMismatch {
                name: "sat_position",
                ..
            })
        ));
    }
}
