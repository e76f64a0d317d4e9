use ndarray::Array2;

use crate::transform::TransformError;

/// Narrows a spatial-domain value to a sample.
///
/// Truncates toward zero and saturates into `0..=255`; NaN maps to 0.
#[inline]
pub fn to_byte(value: f64) -> u8 {
    value as u8
}

fn zeroed(len: usize) -> Option<Vec<f64>> {
    let mut storage: Vec<f64> = Vec::new();
    storage.try_reserve_exact(len).ok()?;
    storage.resize(len, 0.0);
    Some(storage)
}

/// Allocates `len` zeroed cells, reporting allocation failure instead of aborting.
pub fn try_vec(len: usize) -> Result<Vec<f64>, TransformError> {
    zeroed(len).ok_or(TransformError::OutOfMemory { rows: 1, cols: len })
}

/// Allocates a zeroed `rows x cols` grid, reporting allocation failure instead of aborting.
pub fn try_grid(rows: usize, cols: usize) -> Result<Array2<f64>, TransformError> {
    let oom = || TransformError::OutOfMemory { rows, cols };

    let len = rows.checked_mul(cols).ok_or_else(oom)?;
    let storage = zeroed(len).ok_or_else(oom)?;

    Array2::from_shape_vec((rows, cols), storage).map_err(|_| oom())
}
