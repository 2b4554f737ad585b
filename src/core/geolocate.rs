use ndarray::Array2;
use rayon::prelude::*;

use crate::core::navigation::navigate_pixel;
use crate::core::prediction::PredictedNavigationParameters;
use crate::types::{ImagePoint, StaticNavigationParameters};

/// Compute lon/lat coordinates for the given image coordinates.
///
/// The output arrays have shape `(lines.len(), pixels.len())`, in degrees;
/// NaN marks pixels with no valid navigation solution. The evaluation never
/// aborts on per-pixel numerical edge cases.
pub fn get_lons_lats(
    lines: &[i64],
    pixels: &[i64],
    static_params: &StaticNavigationParameters,
    predicted_params: &PredictedNavigationParameters,
) -> (Array2<f32>, Array2<f32>) {
    log::info!("Navigating {}x{} pixel grid", lines.len(), pixels.len());
    navigate_block(lines, pixels, static_params, predicted_params)
}

/// Compute lon/lat coordinates with chunked parallel processing.
///
/// The grid is partitioned into independent row chunks, each computed on a
/// rayon worker from shared read-only parameter references and reassembled
/// by position. Results are identical to [`get_lons_lats`] for any chunk
/// size.
pub fn get_lons_lats_parallel(
    lines: &[i64],
    pixels: &[i64],
    static_params: &StaticNavigationParameters,
    predicted_params: &PredictedNavigationParameters,
    chunk_size: Option<usize>,
) -> (Array2<f32>, Array2<f32>) {
    let n_lines = lines.len();
    let n_pixels = pixels.len();
    if n_lines == 0 || n_pixels == 0 {
        return (
            Array2::from_elem((n_lines, n_pixels), f32::NAN),
            Array2::from_elem((n_lines, n_pixels), f32::NAN),
        );
    }

    let chunk_rows = chunk_size
        .unwrap_or_else(|| n_lines / (rayon::current_num_threads() * 4))
        .max(1);
    let row_starts: Vec<usize> = (0..n_lines).step_by(chunk_rows).collect();
    log::info!(
        "Navigating {}x{} pixel grid in {} chunks of up to {} rows using {} threads",
        n_lines,
        n_pixels,
        row_starts.len(),
        chunk_rows,
        rayon::current_num_threads()
    );

    let chunks: Vec<(Array2<f32>, Array2<f32>)> = row_starts
        .par_iter()
        .map(|&start| {
            let end = (start + chunk_rows).min(n_lines);
            navigate_block(&lines[start..end], pixels, static_params, predicted_params)
        })
        .collect();

    // Reassemble chunk results by row position.
    let mut lons = Array2::from_elem((n_lines, n_pixels), f32::NAN);
    let mut lats = Array2::from_elem((n_lines, n_pixels), f32::NAN);
    for (&start, (chunk_lons, chunk_lats)) in row_starts.iter().zip(chunks) {
        for (local_i, i) in (start..start + chunk_lons.nrows()).enumerate() {
            for j in 0..n_pixels {
                lons[[i, j]] = chunk_lons[[local_i, j]];
                lats[[i, j]] = chunk_lats[[local_i, j]];
            }
        }
    }
    (lons, lats)
}

/// Navigate one rectangular block of the grid.
fn navigate_block(
    lines: &[i64],
    pixels: &[i64],
    static_params: &StaticNavigationParameters,
    predicted_params: &PredictedNavigationParameters,
) -> (Array2<f32>, Array2<f32>) {
    let shape = (lines.len(), pixels.len());
    let mut lons = Array2::from_elem(shape, f32::NAN);
    let mut lats = Array2::from_elem(shape, f32::NAN);
    for (i, &line) in lines.iter().enumerate() {
        for (j, &pixel) in pixels.iter().enumerate() {
            let point = ImagePoint::new(line as f64, pixel as f64);
            let geodetic = navigate_pixel(point, static_params, predicted_params);
            lons[[i, j]] = geodetic.longitude as f32;
            lats[[i, j]] = geodetic.latitude as f32;
        }
    }
    (lons, lats)
}
