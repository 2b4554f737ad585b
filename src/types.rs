use chrono::{DateTime, Utc};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Earth flattening of the GMS navigation model (JMA Msial value).
pub const EARTH_FLATTENING: f64 = 1.0 / 298.257;

/// Earth equatorial radius in meters (JMA Msial value).
pub const EARTH_EQUATORIAL_RADIUS: f64 = 6_378_136.0;

/// Earth polar radius in meters, derived from the flattening.
pub const EARTH_POLAR_RADIUS: f64 = EARTH_EQUATORIAL_RADIUS * (1.0 - EARTH_FLATTENING);

/// Days between the modified Julian day epoch (1858-11-17) and the Unix epoch.
const MJD_OF_UNIX_EPOCH: f64 = 40_587.0;

/// Convert a UTC timestamp to a fractional modified Julian day.
///
/// Scan start times and prediction times share a fractional-day timebase:
/// the spin frequency of the instrument is expressed in revolutions per day,
/// so all navigation timestamps are plain `f64` day counts.
pub fn datetime_to_mjd(time: DateTime<Utc>) -> f64 {
    time.timestamp_micros() as f64 / 86_400e6 + MJD_OF_UNIX_EPOCH
}

/// Instantaneous satellite attitude.
///
/// All angles in radians. The spin-axis angles locate the satellite's
/// angular momentum vector in mean-of-1950 coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Attitude {
    pub angle_between_earth_and_sun: f64,
    pub angle_between_sat_spin_and_z_axis: f64,
    pub angle_between_sat_spin_and_yz_plane: f64,
}

/// Angular orbital quantities in radians, conceptually periodic in 2-pi.
#[derive(Debug, Clone, Copy)]
pub struct OrbitAngles {
    pub greenwich_sidereal_time: f64,
    pub declination_from_sat_to_sun: f64,
    pub right_ascension_from_sat_to_sun: f64,
}

/// Instantaneous orbital state.
///
/// The satellite position is in earth-fixed coordinates (meters). The
/// nutation/precession matrix rotates mean-of-1950 vectors to the true
/// equator and equinox of date.
#[derive(Debug, Clone)]
pub struct Orbit {
    pub angles: OrbitAngles,
    pub sat_position: Vector3<f64>,
    pub nutation_precession: Matrix3<f64>,
}

/// Image coordinate of a pixel center (zero-based line and pixel index).
#[derive(Debug, Clone, Copy)]
pub struct ImagePoint {
    pub line: f64,
    pub pixel: f64,
}

impl ImagePoint {
    pub fn new(line: f64, pixel: f64) -> Self {
        Self { line, pixel }
    }
}

/// Scanning angles at a pixel center in radians.
///
/// `x` is the spin-scan angle (along pixels), `y` the stepping angle
/// (along lines).
#[derive(Debug, Clone, Copy)]
pub struct ScanningAngles {
    pub x: f64,
    pub y: f64,
}

/// Geodetic coordinates in degrees.
#[derive(Debug, Clone, Copy)]
pub struct GeodeticPoint {
    pub longitude: f64,
    pub latitude: f64,
}

/// Oblate spheroid Earth model for the viewing-ray intersection.
#[derive(Debug, Clone, Copy)]
pub struct EarthEllipsoid {
    pub equatorial_radius: f64,
    pub flattening: f64,
}

/// Instrument scan timing parameters.
///
/// `start_time_of_scan` is a fractional day (see [`datetime_to_mjd`]);
/// `spinning_rate` is in revolutions per minute; `sampling_angle` is the
/// angular step between adjacent pixels of one scan line (radians).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanningParameters {
    pub start_time_of_scan: f64,
    pub spinning_rate: f64,
    pub num_sensors: usize,
    pub sampling_angle: f64,
}

/// Static instrument and Earth geometry parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionParameters {
    /// Line offset from the image center
    pub line_offset: f64,
    /// Pixel offset from the image center
    pub pixel_offset: f64,
    /// Angular step between adjacent lines (radians)
    pub stepping_angle: f64,
    /// Angular step between adjacent pixels (radians)
    pub sampling_angle: f64,
    /// Instrument misalignment matrix (3x3)
    pub misalignment: Matrix3<f64>,
    pub earth_flattening: f64,
    pub earth_equatorial_radius: f64,
}

impl ProjectionParameters {
    /// Earth model used by the viewing-ray intersection.
    pub fn ellipsoid(&self) -> EarthEllipsoid {
        EarthEllipsoid {
            equatorial_radius: self.earth_equatorial_radius,
            flattening: self.earth_flattening,
        }
    }
}

/// Static navigation parameters, constructed once per image and shared
/// read-only across all pixels and parallel chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticNavigationParameters {
    pub scanning: ScanningParameters,
    pub projection: ProjectionParameters,
}

impl StaticNavigationParameters {
    /// Validate and assemble static navigation parameters.
    ///
    /// Contract violations are rejected here rather than discovered
    /// mid-grid: the per-pixel pipeline itself never fails.
    pub fn new(
        scanning: ScanningParameters,
        projection: ProjectionParameters,
    ) -> NavResult<Self> {
        if scanning.spinning_rate <= 0.0 {
            return Err(NavError::InvalidParameters(format!(
                "spinning rate must be positive, got {}",
                scanning.spinning_rate
            )));
        }
        if scanning.num_sensors == 0 {
            return Err(NavError::InvalidParameters(
                "sensor count must be positive".to_string(),
            ));
        }
        if projection.earth_equatorial_radius <= 0.0 {
            return Err(NavError::InvalidParameters(format!(
                "equatorial radius must be positive, got {}",
                projection.earth_equatorial_radius
            )));
        }
        if !(0.0..1.0).contains(&projection.earth_flattening) {
            return Err(NavError::InvalidParameters(format!(
                "flattening must be in [0, 1), got {}",
                projection.earth_flattening
            )));
        }
        Ok(Self {
            scanning,
            projection,
        })
    }
}

/// Error types for navigation parameter construction
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("prediction times must be strictly increasing")]
    NonMonotonicTimes,

    #[error("prediction series '{name}' has {actual} samples, expected {expected}")]
    SeriesLengthMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid navigation parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for navigation operations
pub type NavResult<T> = Result<T, NavError>;
