use std::f64::consts::PI;

use nalgebra::{Matrix3, Vector3};
use ndarray::Array2;
use vissr_nav::{
    get_lons_lats, get_lons_lats_parallel, AttitudePrediction, OrbitPrediction,
    PredictedNavigationParameters, ProjectionParameters, ScanningParameters,
    StaticNavigationParameters, EARTH_EQUATORIAL_RADIUS, EARTH_FLATTENING,
};

fn build_params() -> (StaticNavigationParameters, PredictedNavigationParameters) {
    let scanning = ScanningParameters {
        start_time_of_scan: 50_000.0,
        spinning_rate: 100.0,
        num_sensors: 6,
        sampling_angle: 0.000095719,
    };
    let projection = ProjectionParameters {
        line_offset: 12.0,
        pixel_offset: 8.0,
        stepping_angle: 0.000140000047,
        sampling_angle: 0.000095719,
        misalignment: Matrix3::identity(),
        earth_flattening: EARTH_FLATTENING,
        earth_equatorial_radius: EARTH_EQUATORIAL_RADIUS,
    };
    let static_params = StaticNavigationParameters::new(scanning, projection).unwrap();

    let times = vec![49_999.0, 50_001.0];
    let attitude = AttitudePrediction::new(
        times.clone(),
        vec![PI, PI],
        vec![0.0, 0.0],
        vec![0.0, 0.0],
    )
    .unwrap();
    let sat_position = Vector3::new(42_164_000.0, 0.0, 0.0);
    let orbit = OrbitPrediction::new(
        times,
        vec![0.0, 0.0],
        vec![0.0, 0.0],
        vec![0.0, 0.0],
        vec![sat_position, sat_position],
        vec![Matrix3::identity(), Matrix3::identity()],
    )
    .unwrap();

    (
        static_params,
        PredictedNavigationParameters { attitude, orbit },
    )
}

/// Bitwise grid comparison so NaN pixels compare equal as well.
fn assert_same_grid(reference: &Array2<f32>, candidate: &Array2<f32>, context: &str) {
    assert_eq!(reference.dim(), candidate.dim(), "{}", context);
    for (a, b) in reference.iter().zip(candidate.iter()) {
        assert_eq!(a.to_bits(), b.to_bits(), "{}", context);
    }
}

#[test]
fn test_chunk_shape_invariance() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (static_params, predicted_params) = build_params();
    let lines: Vec<i64> = (0..24).collect();
    let pixels: Vec<i64> = (0..15).collect();

    let (ref_lons, ref_lats) = get_lons_lats(&lines, &pixels, &static_params, &predicted_params);

    for chunk_size in [1, 2, 5, 8, 24, 1000] {
        let (lons, lats) = get_lons_lats_parallel(
            &lines,
            &pixels,
            &static_params,
            &predicted_params,
            Some(chunk_size),
        );
        let context = format!("chunk size {}", chunk_size);
        assert_same_grid(&ref_lons, &lons, &context);
        assert_same_grid(&ref_lats, &lats, &context);
    }

    let (lons, lats) =
        get_lons_lats_parallel(&lines, &pixels, &static_params, &predicted_params, None);
    assert_same_grid(&ref_lons, &lons, "default chunking");
    assert_same_grid(&ref_lats, &lats, "default chunking");
}

#[test]
fn test_chunk_invariance_with_unnavigable_rows() {
    let (static_params, mut predicted_params) = build_params();
    // Shrink the attitude window so the lower half of the grid falls past
    // the last prediction time and comes out as NaN.
    predicted_params.attitude = AttitudePrediction::new(
        vec![49_999.0, 50_000.0 + 2e-5],
        vec![PI, PI],
        vec![0.0, 0.0],
        vec![0.0, 0.0],
    )
    .unwrap();

    let lines: Vec<i64> = (0..40).collect();
    let pixels: Vec<i64> = (0..6).collect();
    let (ref_lons, ref_lats) = get_lons_lats(&lines, &pixels, &static_params, &predicted_params);
    assert!(ref_lons.iter().any(|v| v.is_nan()));
    assert!(ref_lons.iter().any(|v| v.is_finite()));

    for chunk_size in [3, 7, 40] {
        let (lons, lats) = get_lons_lats_parallel(
            &lines,
            &pixels,
            &static_params,
            &predicted_params,
            Some(chunk_size),
        );
        let context = format!("chunk size {} with NaN rows", chunk_size);
        assert_same_grid(&ref_lons, &lons, &context);
        assert_same_grid(&ref_lats, &lats, &context);
    }
}

#[test]
fn test_parallel_grid_stays_within_earth_disc() {
    let (static_params, predicted_params) = build_params();
    let lines: Vec<i64> = (0..24).collect();
    let pixels: Vec<i64> = (0..15).collect();
    let (lons, lats) =
        get_lons_lats_parallel(&lines, &pixels, &static_params, &predicted_params, None);

    for (lon, lat) in lons.iter().zip(lats.iter()) {
        assert!(lon.abs() < 5.0, "longitude {} too far from nadir", lon);
        assert!(lat.abs() < 5.0, "latitude {} too far from nadir", lat);
    }
}
