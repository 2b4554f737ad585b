use nalgebra::Matrix3;
use std::f64::consts::PI;

const TWO_PI: f64 = 2.0 * PI;

/// Find the index `i` such that `x_sample[i] <= x < x_sample[i + 1]`.
///
/// The interval test is left-inclusive, right-exclusive: a query exactly at
/// the last sample time has no enclosing interval and yields `None`. The
/// reference mapping model depends on this boundary behavior.
pub fn find_enclosing_index(x: f64, x_sample: &[f64]) -> Option<usize> {
    x_sample.windows(2).position(|w| w[0] <= x && x < w[1])
}

/// Linear interpolation of continuous quantities.
///
/// Returns NaN when `x` lies outside the sampled interval; the caller
/// treats the affected pixel as unnavigable instead of failing.
pub fn interpolate_continuous(x: f64, x_sample: &[f64], y_sample: &[f64]) -> f64 {
    match find_enclosing_index(x, x_sample) {
        Some(i) => {
            let slope = (y_sample[i + 1] - y_sample[i]) / (x_sample[i + 1] - x_sample[i]);
            y_sample[i] + slope * (x - x_sample[i])
        }
        None => f64::NAN,
    }
}

/// Linear interpolation of angles.
///
/// Requires the 2-pi periodicity of the sample series to be unwrapped
/// beforehand (done once at prediction construction). The interpolated
/// angle is wrapped back to [-pi, pi] to restore periodicity.
pub fn interpolate_angles(x: f64, x_sample: &[f64], y_sample: &[f64]) -> f64 {
    wrap_2pi(interpolate_continuous(x, x_sample, y_sample))
}

/// Nearest-neighbour interpolation of matrix-valued samples.
///
/// Returns the left endpoint of the enclosing interval; interpolating
/// between nutation/precession matrices is not meaningful at the required
/// precision. Out-of-range queries yield a NaN-filled matrix.
pub fn interpolate_nearest(x: f64, x_sample: &[f64], y_sample: &[Matrix3<f64>]) -> Matrix3<f64> {
    match find_enclosing_index(x, x_sample) {
        Some(i) => y_sample[i],
        None => Matrix3::from_element(f64::NAN),
    }
}

/// Remove 2-pi jumps from an angle series.
///
/// Phase differences greater than pi between consecutive samples are
/// collapsed to their 2-pi complement, so the returned series can be
/// linearly interpolated. Matches numpy's `unwrap`, including the tie
/// where an exactly-pi jump keeps the sign of the raw difference.
pub fn unwrap_angles(values: &[f64]) -> Vec<f64> {
    let mut unwrapped = Vec::with_capacity(values.len());
    let mut prev = match values.first() {
        Some(&first) => first,
        None => return unwrapped,
    };
    unwrapped.push(prev);
    for pair in values.windows(2) {
        let raw = pair[1] - pair[0];
        let mut delta = wrap_2pi(raw);
        if delta == -PI && raw > 0.0 {
            delta = PI;
        }
        prev += delta;
        unwrapped.push(prev);
    }
    unwrapped
}

/// Wrap a value to the interval [-pi, pi].
fn wrap_2pi(value: f64) -> f64 {
    (value + PI).rem_euclid(TWO_PI) - PI
}
