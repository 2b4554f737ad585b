//! Per-pixel navigation pipeline.
//!
//! Maps one (line, pixel) image coordinate plus the shared static and
//! predicted parameters to geodetic longitude/latitude, following the
//! S-VISSR mapping of the GMS User Guide (Appendix E): observation time
//! from the spin phase, scanning angles, satellite angular momentum frame,
//! earth-fixed frame, ellipsoid intersection, geodetic conversion.
//!
//! Every function is pure; numerical edge cases (interpolation outside the
//! prediction window, a viewing ray missing the earth) surface as NaN for
//! the affected pixel and never abort neighbouring pixels.

use nalgebra::{Matrix3, Vector3};
use std::f64::consts::PI;

use crate::core::prediction::PredictedNavigationParameters;
use crate::types::{
    Attitude, EarthEllipsoid, GeodeticPoint, ImagePoint, Orbit, OrbitAngles,
    ProjectionParameters, ScanningAngles, ScanningParameters, StaticNavigationParameters,
};

/// Navigate a single image pixel to geodetic coordinates.
pub fn navigate_pixel(
    point: ImagePoint,
    static_params: &StaticNavigationParameters,
    predicted_params: &PredictedNavigationParameters,
) -> GeodeticPoint {
    let obs_time = get_observation_time(point, &static_params.scanning);
    let (attitude, orbit) = predicted_params.interpolate(obs_time);
    get_lon_lat(point, &attitude, &orbit, &static_params.projection)
}

/// Calculate the observation time of a pixel.
///
/// The scan mirror steps one line block per spin revolution; within a
/// line, pixels map to spin phase through the sampling angle. Line and
/// pixel indices are converted to the instrument's one-based numbering
/// before the offset is derived.
pub fn get_observation_time(point: ImagePoint, scan_params: &ScanningParameters) -> f64 {
    scan_params.start_time_of_scan + relative_observation_time(point, scan_params)
}

fn relative_observation_time(point: ImagePoint, scan_params: &ScanningParameters) -> f64 {
    let line = point.line + 1.0;
    let pixel = point.pixel + 1.0;
    // Spinning rate is per minute, observation times are fractional days.
    let spinning_freq = 1440.0 * scan_params.spinning_rate;
    let line_step = ((line - 1.0) / scan_params.num_sensors as f64).floor();
    let pixel_step = scan_params.sampling_angle * pixel / (2.0 * PI);
    (line_step + pixel_step) / spinning_freq
}

/// Get longitude and latitude coordinates for a given image pixel.
///
/// Attitude and orbit must already be interpolated to the pixel's
/// observation time. Output in degrees.
pub fn get_lon_lat(
    point: ImagePoint,
    attitude: &Attitude,
    orbit: &Orbit,
    proj_params: &ProjectionParameters,
) -> GeodeticPoint {
    let scan_angles = transform_image_coords_to_scanning_angles(point, proj_params);
    let view_vector_sat =
        transform_scanning_angles_to_satellite_coords(scan_angles, &proj_params.misalignment);
    let view_vector_earth_fixed =
        transform_satellite_to_earth_fixed_coords(view_vector_sat, orbit, attitude);
    let point_on_earth = intersect_with_earth(
        view_vector_earth_fixed,
        orbit.sat_position,
        proj_params.ellipsoid(),
    );
    transform_earth_fixed_to_geodetic_coords(point_on_earth, proj_params.earth_flattening)
}

/// Transform image coordinates to scanning angles at the pixel center.
pub fn transform_image_coords_to_scanning_angles(
    point: ImagePoint,
    proj_params: &ProjectionParameters,
) -> ScanningAngles {
    ScanningAngles {
        x: proj_params.sampling_angle * (point.pixel + 1.0 - proj_params.pixel_offset),
        y: proj_params.stepping_angle * (point.line + 1.0 - proj_params.line_offset),
    }
}

/// Transform scanning angles to a viewing vector in satellite angular
/// momentum coordinates.
///
/// The misalignment matrix is applied to the stepping-angle direction
/// before the spin rotation about the z-axis.
pub fn transform_scanning_angles_to_satellite_coords(
    angles: ScanningAngles,
    misalignment: &Matrix3<f64>,
) -> Vector3<f64> {
    let (sin_x, cos_x) = angles.x.sin_cos();
    let rotation = Matrix3::new(
        cos_x, -sin_x, 0.0, //
        sin_x, cos_x, 0.0, //
        0.0, 0.0, 1.0,
    );
    let vector = Vector3::new(angles.y.cos(), 0.0, angles.y.sin());
    rotation * (misalignment * vector)
}

/// Transform a viewing vector from satellite angular momentum coordinates
/// to earth-fixed coordinates.
pub fn transform_satellite_to_earth_fixed_coords(
    point: Vector3<f64>,
    orbit: &Orbit,
    attitude: &Attitude,
) -> Vector3<f64> {
    satellite_unit_vectors(orbit, attitude) * point
}

/// Orthonormal satellite basis in earth-fixed coordinates, as matrix
/// columns (x, y, z).
fn satellite_unit_vectors(orbit: &Orbit, attitude: &Attitude) -> Matrix3<f64> {
    let unit_z = satellite_unit_vector_z(attitude, orbit);
    let unit_x = satellite_unit_vector_x(
        attitude.angle_between_earth_and_sun,
        &orbit.angles,
        unit_z,
    );
    let unit_y = unit_z.cross(&unit_x).normalize();
    Matrix3::from_columns(&[unit_x, unit_y, unit_z])
}

/// Satellite spin axis in earth-fixed coordinates.
fn satellite_unit_vector_z(attitude: &Attitude, orbit: &Orbit) -> Vector3<f64> {
    let sat_z_axis_1950 = satellite_z_axis_1950(attitude);
    let rotation = transform_from_1950_to_earth_fixed(orbit.angles.greenwich_sidereal_time);
    (rotation * (orbit.nutation_precession * sat_z_axis_1950)).normalize()
}

/// Satellite spin axis in mean-of-1950 coordinates.
fn satellite_z_axis_1950(attitude: &Attitude) -> Vector3<f64> {
    let alpha = attitude.angle_between_sat_spin_and_z_axis;
    let delta = attitude.angle_between_sat_spin_and_yz_plane;
    let cos_delta = delta.cos();
    Vector3::new(
        delta.sin(),
        -cos_delta * alpha.sin(),
        cos_delta * alpha.cos(),
    )
}

/// Rotation about the z-axis by the Greenwich sidereal time.
fn transform_from_1950_to_earth_fixed(greenwich_sidereal_time: f64) -> Matrix3<f64> {
    let (sin_gst, cos_gst) = greenwich_sidereal_time.sin_cos();
    Matrix3::new(
        cos_gst, sin_gst, 0.0, //
        -sin_gst, cos_gst, 0.0, //
        0.0, 0.0, 1.0,
    )
}

/// Satellite x-axis from the earth-sun angle and the sun direction.
///
/// The sun vector is split into components normal to and within the plane
/// spanned by the spin axis, then rotated by the earth-sun angle beta.
fn satellite_unit_vector_x(
    earth_sun_angle: f64,
    orbit_angles: &OrbitAngles,
    sat_unit_vector_z: Vector3<f64>,
) -> Vector3<f64> {
    let beta = earth_sun_angle;
    let sat_sun_vector = vector_from_satellite_to_sun(orbit_angles);
    let z_cross_satsun = sat_unit_vector_z.cross(&sat_sun_vector).normalize();
    let x_vec = z_cross_satsun * beta.sin()
        + z_cross_satsun.cross(&sat_unit_vector_z) * beta.cos();
    x_vec.normalize()
}

/// Unit vector from the satellite towards the sun.
fn vector_from_satellite_to_sun(orbit_angles: &OrbitAngles) -> Vector3<f64> {
    let declination = orbit_angles.declination_from_sat_to_sun;
    let right_ascension = orbit_angles.right_ascension_from_sat_to_sun;
    let cos_declination = declination.cos();
    Vector3::new(
        cos_declination * right_ascension.cos(),
        cos_declination * right_ascension.sin(),
        declination.sin(),
    )
}

/// Intersect the instrument viewing vector with the earth's surface.
///
/// A ray pointing towards the earth crosses the ellipsoid twice; the
/// intersection on the instrument-facing side is the one at the smaller
/// distance. A ray that misses the earth yields NaN coordinates.
pub fn intersect_with_earth(
    view_vector: Vector3<f64>,
    sat_pos: Vector3<f64>,
    ellipsoid: EarthEllipsoid,
) -> Vector3<f64> {
    let distance = distance_to_intersection(view_vector, sat_pos, ellipsoid);
    sat_pos + view_vector * distance
}

fn distance_to_intersection(
    view_vector: Vector3<f64>,
    sat_pos: Vector3<f64>,
    ellipsoid: EarthEllipsoid,
) -> f64 {
    let (dist_1, dist_2) = distances_to_intersections(view_vector, sat_pos, ellipsoid);
    dist_1.min(dist_2)
}

/// Both solutions of the quadratic ray/ellipsoid equation.
///
/// A negative discriminant (the ray misses the earth) propagates as NaN
/// through the square root.
fn distances_to_intersections(
    view_vector: Vector3<f64>,
    sat_pos: Vector3<f64>,
    ellipsoid: EarthEllipsoid,
) -> (f64, f64) {
    let flat2 = (1.0 - ellipsoid.flattening).powi(2);
    let (ux, uy, uz) = (view_vector.x, view_vector.y, view_vector.z);
    let (x, y, z) = (sat_pos.x, sat_pos.y, sat_pos.z);

    let a = flat2 * (ux * ux + uy * uy) + uz * uz;
    let b = flat2 * (x * ux + y * uy) + z * uz;
    let c = flat2 * (x * x + y * y - ellipsoid.equatorial_radius.powi(2)) + z * z;

    let tmp = (b * b - a * c).sqrt();
    ((-b + tmp) / a, (-b - tmp) / a)
}

/// Transform from earth-fixed to geodetic coordinates (degrees).
pub fn transform_earth_fixed_to_geodetic_coords(
    point: Vector3<f64>,
    earth_flattening: f64,
) -> GeodeticPoint {
    let f = earth_flattening;
    let lon = point.y.atan2(point.x);
    let lat = point
        .z
        .atan2((1.0 - f).powi(2) * (point.x * point.x + point.y * point.y).sqrt());
    GeodeticPoint {
        longitude: lon.to_degrees(),
        latitude: lat.to_degrees(),
    }
}
