//! vissr-nav: pixel navigation for spin-scan geostationary satellite imagery
//!
//! This library computes geographic coordinates (longitude, latitude) for
//! every pixel of a GMS-5 VISSR image, given a time-dependent orbit and
//! attitude prediction plus the static scan geometry of the instrument.
//! Reference: GMS User Guide, Appendix E, S-VISSR Mapping.

pub mod core;
pub mod types;

#[cfg(feature = "python")]
mod python;

// Re-export main types and functions for easier access
pub use crate::core::geolocate::{get_lons_lats, get_lons_lats_parallel};
pub use crate::core::navigation::{get_lon_lat, get_observation_time, navigate_pixel};
pub use crate::core::prediction::{
    AttitudePrediction, OrbitPrediction, PredictedNavigationParameters,
};
pub use types::{
    datetime_to_mjd, Attitude, EarthEllipsoid, GeodeticPoint, ImagePoint, NavError, NavResult,
    Orbit, OrbitAngles, ProjectionParameters, ScanningAngles, ScanningParameters,
    StaticNavigationParameters, EARTH_EQUATORIAL_RADIUS, EARTH_FLATTENING, EARTH_POLAR_RADIUS,
};
