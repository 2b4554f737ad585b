//! Python bindings for the navigation core.
//!
//! Exposes parameter construction and the grid evaluator to a Python host
//! pipeline as the `_core` extension module.

use nalgebra::{Matrix3, Vector3};
use numpy::ndarray::ArrayView2;
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray1, PyReadonlyArray2, PyReadonlyArray3};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::geolocate::get_lons_lats_parallel;
use crate::core::prediction::{AttitudePrediction, OrbitPrediction, PredictedNavigationParameters};
use crate::types::{
    NavError, ProjectionParameters, ScanningParameters, StaticNavigationParameters,
};

/// Python module definition
#[pymodule]
fn _core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyScanningParameters>()?;
    m.add_class::<PyProjectionParameters>()?;
    m.add_class::<PyAttitudePrediction>()?;
    m.add_class::<PyOrbitPrediction>()?;
    m.add_function(wrap_pyfunction!(py_get_lons_lats, m)?)?;
    Ok(())
}

fn to_value_error(err: NavError) -> PyErr {
    PyErr::new::<PyValueError, _>(format!("{}", err))
}

fn matrix3_from_view(view: ArrayView2<'_, f64>) -> PyResult<Matrix3<f64>> {
    if view.dim() != (3, 3) {
        return Err(PyErr::new::<PyValueError, _>(format!(
            "expected a 3x3 matrix, got {:?}",
            view.dim()
        )));
    }
    Ok(Matrix3::from_fn(|i, j| view[[i, j]]))
}

/// Python wrapper for ScanningParameters
#[pyclass(name = "ScanningParameters")]
#[derive(Clone)]
struct PyScanningParameters {
    inner: ScanningParameters,
}

#[pymethods]
impl PyScanningParameters {
    #[new]
    fn new(
        start_time_of_scan: f64,
        spinning_rate: f64,
        num_sensors: usize,
        sampling_angle: f64,
    ) -> Self {
        PyScanningParameters {
            inner: ScanningParameters {
                start_time_of_scan,
                spinning_rate,
                num_sensors,
                sampling_angle,
            },
        }
    }
}

/// Python wrapper for ProjectionParameters
#[pyclass(name = "ProjectionParameters")]
#[derive(Clone)]
struct PyProjectionParameters {
    inner: ProjectionParameters,
}

#[pymethods]
impl PyProjectionParameters {
    #[new]
    #[allow(clippy::too_many_arguments)]
    fn new(
        line_offset: f64,
        pixel_offset: f64,
        stepping_angle: f64,
        sampling_angle: f64,
        misalignment: PyReadonlyArray2<'_, f64>,
        earth_flattening: f64,
        earth_equatorial_radius: f64,
    ) -> PyResult<Self> {
        let misalignment = matrix3_from_view(misalignment.as_array())?;
        Ok(PyProjectionParameters {
            inner: ProjectionParameters {
                line_offset,
                pixel_offset,
                stepping_angle,
                sampling_angle,
                misalignment,
                earth_flattening,
                earth_equatorial_radius,
            },
        })
    }
}

/// Python wrapper for AttitudePrediction
#[pyclass(name = "AttitudePrediction")]
#[derive(Clone)]
struct PyAttitudePrediction {
    inner: AttitudePrediction,
}

#[pymethods]
impl PyAttitudePrediction {
    #[new]
    fn new(
        prediction_times: PyReadonlyArray1<'_, f64>,
        angle_between_earth_and_sun: PyReadonlyArray1<'_, f64>,
        angle_between_sat_spin_and_z_axis: PyReadonlyArray1<'_, f64>,
        angle_between_sat_spin_and_yz_plane: PyReadonlyArray1<'_, f64>,
    ) -> PyResult<Self> {
        let inner = AttitudePrediction::new(
            prediction_times.as_array().to_vec(),
            angle_between_earth_and_sun.as_array().to_vec(),
            angle_between_sat_spin_and_z_axis.as_array().to_vec(),
            angle_between_sat_spin_and_yz_plane.as_array().to_vec(),
        )
        .map_err(to_value_error)?;
        Ok(PyAttitudePrediction { inner })
    }
}

/// Python wrapper for OrbitPrediction
#[pyclass(name = "OrbitPrediction")]
#[derive(Clone)]
struct PyOrbitPrediction {
    inner: OrbitPrediction,
}

#[pymethods]
impl PyOrbitPrediction {
    #[new]
    fn new(
        prediction_times: PyReadonlyArray1<'_, f64>,
        greenwich_sidereal_time: PyReadonlyArray1<'_, f64>,
        declination_from_sat_to_sun: PyReadonlyArray1<'_, f64>,
        right_ascension_from_sat_to_sun: PyReadonlyArray1<'_, f64>,
        sat_position: PyReadonlyArray2<'_, f64>,
        nutation_precession: PyReadonlyArray3<'_, f64>,
    ) -> PyResult<Self> {
        let positions = sat_position.as_array();
        if positions.ncols() != 3 {
            return Err(PyErr::new::<PyValueError, _>(format!(
                "expected satellite positions of shape (n, 3), got {:?}",
                positions.dim()
            )));
        }
        let sat_position: Vec<Vector3<f64>> = positions
            .rows()
            .into_iter()
            .map(|row| Vector3::new(row[0], row[1], row[2]))
            .collect();

        let matrices = nutation_precession.as_array();
        let (n, rows, cols) = matrices.dim();
        if rows != 3 || cols != 3 {
            return Err(PyErr::new::<PyValueError, _>(format!(
                "expected nutation/precession matrices of shape (n, 3, 3), got {:?}",
                matrices.dim()
            )));
        }
        let nutation_precession: Vec<Matrix3<f64>> = (0..n)
            .map(|k| Matrix3::from_fn(|i, j| matrices[[k, i, j]]))
            .collect();

        let inner = OrbitPrediction::new(
            prediction_times.as_array().to_vec(),
            greenwich_sidereal_time.as_array().to_vec(),
            declination_from_sat_to_sun.as_array().to_vec(),
            right_ascension_from_sat_to_sun.as_array().to_vec(),
            sat_position,
            nutation_precession,
        )
        .map_err(to_value_error)?;
        Ok(PyOrbitPrediction { inner })
    }
}

/// Compute lon/lat coordinates for the given image coordinates.
#[pyfunction]
#[pyo3(name = "get_lons_lats")]
fn py_get_lons_lats<'py>(
    py: Python<'py>,
    lines: PyReadonlyArray1<'py, i64>,
    pixels: PyReadonlyArray1<'py, i64>,
    scanning: PyScanningParameters,
    projection: PyProjectionParameters,
    attitude: PyAttitudePrediction,
    orbit: PyOrbitPrediction,
) -> PyResult<(&'py PyArray2<f32>, &'py PyArray2<f32>)> {
    let static_params =
        StaticNavigationParameters::new(scanning.inner, projection.inner).map_err(to_value_error)?;
    let predicted_params = PredictedNavigationParameters {
        attitude: attitude.inner,
        orbit: orbit.inner,
    };
    let lines = lines.as_array().to_vec();
    let pixels = pixels.as_array().to_vec();
    let (lons, lats) =
        get_lons_lats_parallel(&lines, &pixels, &static_params, &predicted_params, None);
    Ok((lons.into_pyarray(py), lats.into_pyarray(py)))
}
