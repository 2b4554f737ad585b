//! Core navigation modules

pub mod geolocate;
pub mod interpolate;
pub mod navigation;
pub mod prediction;

// Re-export main types
pub use geolocate::{get_lons_lats, get_lons_lats_parallel};
pub use interpolate::{
    find_enclosing_index, interpolate_angles, interpolate_continuous, interpolate_nearest,
    unwrap_angles,
};
pub use navigation::{
    get_lon_lat, get_observation_time, intersect_with_earth, navigate_pixel,
    transform_earth_fixed_to_geodetic_coords, transform_image_coords_to_scanning_angles,
    transform_satellite_to_earth_fixed_coords, transform_scanning_angles_to_satellite_coords,
};
pub use prediction::{AttitudePrediction, OrbitPrediction, PredictedNavigationParameters};
