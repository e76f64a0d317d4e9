//! Two-dimensional DCT-II / DCT-III pair.
//!
//! Grids are `Array2<f64>` indexed `[[row, col]]`, so a grid for a `width x height`
//! channel has shape `(height, width)`.
//!
//! With [`Normalization::Reference`] the forward transform is the unnormalized
//! basis product
//!
//! ```text
//! X[i][j] = sum_k sum_l x[k][l] * cos((2k+1)iπ / 2H) * cos((2l+1)jπ / 2W)
//! ```
//!
//! and the inverse applies a flat `0.25` factor whatever the grid size. This pair
//! is not an exact inverse of itself; [`Normalization::Orthonormal`] gives the
//! textbook pair that is.

use std::f64::consts::PI;

use ndarray::{linalg::general_mat_mul, Array2, ArrayView2, ArrayViewMut2};
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::util::{try_grid, try_vec};

// scale of the reference inverse transform, independent of the grid size
pub const REFERENCE_INVERSE_SCALE: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Normalization {
    #[default]
    Reference,
    Orthonormal,
}

impl Normalization {
    #[inline]
    fn inverse_scale(self) -> f64 {
        match self {
            Normalization::Reference => REFERENCE_INVERSE_SCALE,
            Normalization::Orthonormal => 1.0,
        }
    }

    #[inline]
    fn weight(self, frequency: usize, len: usize) -> f64 {
        match self {
            Normalization::Reference => 1.0,
            Normalization::Orthonormal if frequency == 0 => (1.0 / len as f64).sqrt(),
            Normalization::Orthonormal => (2.0 / len as f64).sqrt(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Algorithm {
    /// Quadruple loop, one full double sum per output cell: O(W²·H²).
    #[default]
    Direct,
    /// Same sums as two matrix products: O(W·H·(W+H)).
    Separable,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("Invalid grid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Grid shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Out of memory allocating a {rows}x{cols} grid")]
    OutOfMemory { rows: usize, cols: usize },
}

/// Cosine basis of one axis of length `n`, scaled by the normalization weights.
///
/// `cos((2p + 1)fπ / 2n)` depends only on `(2p + 1)f mod 4n`, so one period of
/// `4n` samples covers every (frequency, position) pair.
#[derive(Debug, Clone)]
struct Axis {
    weights: Vec<f64>,
    cosines: Vec<f64>,
}

impl Axis {
    fn new(len: usize, normalization: Normalization) -> Result<Axis, TransformError> {
        let period = len
            .checked_mul(4)
            .ok_or(TransformError::OutOfMemory { rows: 4, cols: len })?;

        let mut weights = try_vec(len)?;
        for (frequency, weight) in weights.iter_mut().enumerate() {
            *weight = normalization.weight(frequency, len);
        }

        let mut cosines = try_vec(period)?;
        let denominator = (2 * len) as f64;
        for (step, value) in cosines.iter_mut().enumerate() {
            *value = (step as f64 * PI / denominator).cos();
        }

        Ok(Axis { weights, cosines })
    }

    fn len(&self) -> usize {
        self.weights.len()
    }

    /// `w(frequency) * cos((2 * position + 1) * frequency * π / 2n)`
    #[inline]
    fn value(&self, frequency: usize, position: usize) -> f64 {
        let period = self.cosines.len() as u128;
        let step = (2 * position as u128 + 1) * frequency as u128 % period;
        self.weights[frequency] * self.cosines[step as usize]
    }

    // factors[position] for one frequency; the step walks f, 3f, 5f, ... mod 4n
    fn fill_positions(&self, frequency: usize, factors: &mut [f64]) {
        let period = self.cosines.len();
        let weight = self.weights[frequency];
        let stride = 2 * frequency;
        let mut step = frequency;

        for factor in factors.iter_mut() {
            *factor = weight * self.cosines[step];
            step += stride;
            if step >= period {
                step -= period;
            }
        }
    }

    // factors[frequency] for one position; the step walks 0, 2p+1, 2(2p+1), ... mod 4n
    fn fill_frequencies(&self, position: usize, factors: &mut [f64]) {
        let period = self.cosines.len();
        let stride = 2 * position + 1;
        let mut step = 0;

        for (factor, &weight) in factors.iter_mut().zip(&self.weights) {
            *factor = weight * self.cosines[step];
            step += stride;
            if step >= period {
                step -= period;
            }
        }
    }

    /// Full `n x n` basis, `table[[frequency, position]]`.
    fn table(&self) -> Result<Array2<f64>, TransformError> {
        let mut table = try_grid(self.len(), self.len())?;
        for ((frequency, position), value) in table.indexed_iter_mut() {
            *value = self.value(frequency, position);
        }
        Ok(table)
    }
}

#[derive(Debug, Clone)]
enum Kernel {
    // one basis factor per input row / column of the current output cell
    Direct {
        row_factors: Vec<f64>,
        col_factors: Vec<f64>,
    },
    Separable {
        row_table: Array2<f64>, // height x height
        col_table: Array2<f64>, // width x width
        scratch: Array2<f64>,
    },
}

// sum_k sum_l x[k][l] * row_factors[k] * col_factors[l]
#[inline]
fn weighted_sum(input: &ArrayView2<f64>, row_factors: &[f64], col_factors: &[f64]) -> f64 {
    let mut sum = 0.0;
    for (input_row, &ck) in input.outer_iter().zip(row_factors) {
        for (&x, &cl) in input_row.iter().zip(col_factors) {
            sum += x * ck * cl;
        }
    }
    sum
}

fn check_dimensions(width: usize, height: usize) -> Result<(), TransformError> {
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Transform plan for one grid size.
///
/// [`Algorithm::Direct`] keeps one folded cosine period per axis, so a plan grows
/// linearly with `width + height`. [`Algorithm::Separable`] additionally holds the
/// full square basis of each axis and the intermediate product. Neither
/// `forward_into` nor `inverse_into` allocates.
#[derive(Debug, Clone)]
pub struct Dct2d {
    width: usize,
    height: usize,
    normalization: Normalization,

    rows: Axis,
    cols: Axis,
    kernel: Kernel,
}

impl Dct2d {
    pub fn new(
        width: usize,
        height: usize,
        normalization: Normalization,
        algorithm: Algorithm,
    ) -> Result<Dct2d, TransformError> {
        check_dimensions(width, height)?;

        let rows = Axis::new(height, normalization)?;
        let cols = Axis::new(width, normalization)?;
        let kernel = match algorithm {
            Algorithm::Direct => Kernel::Direct {
                row_factors: try_vec(height)?,
                col_factors: try_vec(width)?,
            },
            Algorithm::Separable => Kernel::Separable {
                row_table: rows.table()?,
                col_table: cols.table()?,
                scratch: try_grid(height, width)?,
            },
        };

        Ok(Dct2d {
            width,
            height,
            normalization,
            rows,
            cols,
            kernel,
        })
    }

    /// Number of `f64` cells a plan of this size holds, `None` if that overflows `usize`.
    pub fn scratch_len(width: usize, height: usize, algorithm: Algorithm) -> Option<usize> {
        let perimeter = width.checked_add(height)?;
        // weights plus one folded period per axis
        let axes = perimeter.checked_mul(5)?;
        let kernel = match algorithm {
            Algorithm::Direct => perimeter,
            Algorithm::Separable => width
                .checked_mul(width)?
                .checked_add(height.checked_mul(height)?)?
                .checked_add(width.checked_mul(height)?)?,
        };
        axes.checked_add(kernel)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    pub fn algorithm(&self) -> Algorithm {
        match self.kernel {
            Kernel::Direct { .. } => Algorithm::Direct,
            Kernel::Separable { .. } => Algorithm::Separable,
        }
    }

    fn check_shape(&self, found: (usize, usize)) -> Result<(), TransformError> {
        let expected = (self.height, self.width);
        if found != expected {
            return Err(TransformError::ShapeMismatch { expected, found });
        }
        Ok(())
    }

    pub fn forward(&mut self, input: ArrayView2<f64>) -> Result<Array2<f64>, TransformError> {
        let mut output = try_grid(self.height, self.width)?;
        self.forward_into(input, output.view_mut())?;
        Ok(output)
    }

    pub fn inverse(&mut self, input: ArrayView2<f64>) -> Result<Array2<f64>, TransformError> {
        let mut output = try_grid(self.height, self.width)?;
        self.inverse_into(input, output.view_mut())?;
        Ok(output)
    }

    /// Forward DCT-II of `input` into `output`. The two grids must not overlap.
    pub fn forward_into(
        &mut self,
        input: ArrayView2<f64>,
        mut output: ArrayViewMut2<f64>,
    ) -> Result<(), TransformError> {
        self.check_shape(input.dim())?;
        self.check_shape(output.dim())?;

        let Dct2d {
            rows, cols, kernel, ..
        } = self;

        match kernel {
            Kernel::Direct {
                row_factors,
                col_factors,
            } => {
                for (i, mut output_row) in output.outer_iter_mut().enumerate() {
                    rows.fill_positions(i, row_factors);
                    for (j, out) in output_row.iter_mut().enumerate() {
                        cols.fill_positions(j, col_factors);
                        *out = weighted_sum(&input, &*row_factors, &*col_factors);
                    }
                }
            }
            Kernel::Separable {
                row_table,
                col_table,
                scratch,
            } => {
                // X = B_H · x · B_Wᵀ
                general_mat_mul(1.0, &input, &col_table.t(), 0.0, scratch);
                general_mat_mul(1.0, &*row_table, &*scratch, 0.0, &mut output);
            }
        }

        Ok(())
    }

    /// Inverse DCT-III of `input` into `output`. The two grids must not overlap.
    pub fn inverse_into(
        &mut self,
        input: ArrayView2<f64>,
        mut output: ArrayViewMut2<f64>,
    ) -> Result<(), TransformError> {
        self.check_shape(input.dim())?;
        self.check_shape(output.dim())?;

        let scale = self.normalization.inverse_scale();
        let Dct2d {
            rows, cols, kernel, ..
        } = self;

        match kernel {
            Kernel::Direct {
                row_factors,
                col_factors,
            } => {
                for (i, mut output_row) in output.outer_iter_mut().enumerate() {
                    rows.fill_frequencies(i, row_factors);
                    for (j, out) in output_row.iter_mut().enumerate() {
                        cols.fill_frequencies(j, col_factors);
                        *out = weighted_sum(&input, &*row_factors, &*col_factors) * scale;
                    }
                }
            }
            Kernel::Separable {
                row_table,
                col_table,
                scratch,
            } => {
                // x = scale · B_Hᵀ · X · B_W
                general_mat_mul(1.0, &input, &*col_table, 0.0, scratch);
                general_mat_mul(scale, &row_table.t(), &*scratch, 0.0, &mut output);
            }
        }

        Ok(())
    }
}

/// Reference forward transform of a `(height, width)` grid.
pub fn forward(input: ArrayView2<f64>) -> Result<Array2<f64>, TransformError> {
    let (height, width) = input.dim();
    Dct2d::new(width, height, Normalization::Reference, Algorithm::Direct)?.forward(input)
}

/// Reference inverse transform of a `(height, width)` grid.
pub fn inverse(input: ArrayView2<f64>) -> Result<Array2<f64>, TransformError> {
    let (height, width) = input.dim();
    Dct2d::new(width, height, Normalization::Reference, Algorithm::Direct)?.inverse(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use strum::IntoEnumIterator;

    fn sample_grid(height: usize, width: usize) -> Array2<f64> {
        Array2::from_shape_fn((height, width), |(i, j)| {
            ((i * 7 + j * 13) % 17) as f64 * 1.5 - 4.0 + (i as f64 * 0.3).sin()
        })
    }

    fn assert_grids_close(actual: &Array2<f64>, expected: &Array2<f64>, tolerance: f64) {
        assert_eq!(actual.dim(), expected.dim());
        for ((index, a), e) in actual.indexed_iter().zip(expected.iter()) {
            let bound = tolerance * e.abs().max(1.0);
            assert!(
                (a - e).abs() <= bound,
                "mismatch at {index:?}: {a} vs {e}"
            );
        }
    }

    #[test]
    fn forward_of_constant_grid_keeps_only_dc() {
        let grid = Array2::from_elem((4, 6), 2.0);
        let freq = forward(grid.view()).unwrap();

        assert!((freq[[0, 0]] - 48.0).abs() < 1e-12);
        for ((i, j), &value) in freq.indexed_iter() {
            if (i, j) != (0, 0) {
                assert!(value.abs() < 1e-9, "({i}, {j}) = {value}");
            }
        }
    }

    #[test]
    fn reference_inverse_scale_is_size_independent() {
        let mut freq = Array2::zeros((3, 5));
        freq[[0, 0]] = 8.0;

        let spatial = inverse(freq.view()).unwrap();
        assert!(spatial.iter().all(|&v| (v - 2.0).abs() < 1e-12));
    }

    #[test]
    fn reference_pair_on_two_by_two() {
        let grid = array![[10.0, 20.0], [30.0, 40.0]];
        let freq = forward(grid.view()).unwrap();

        let c = (PI / 4.0).cos();
        let expected = array![
            [100.0, (10.0 - 20.0 + 30.0 - 40.0) * c],
            [(10.0 + 20.0 - 30.0 - 40.0) * c, (10.0 - 20.0 - 30.0 + 40.0) * c * c]
        ];
        assert_grids_close(&freq, &expected, 1e-12);

        // per axis the reference pair multiplies by [[1.5, 0.5], [0.5, 1.5]]
        let spatial = inverse(freq.view()).unwrap();
        let expected = array![[17.5, 22.5], [27.5, 32.5]];
        assert_grids_close(&spatial, &expected, 1e-12);
    }

    #[test]
    fn inverse_of_zero_grid_is_exactly_zero() {
        for algorithm in Algorithm::iter() {
            let mut plan = Dct2d::new(5, 4, Normalization::Reference, algorithm).unwrap();
            let spatial = plan.inverse(Array2::zeros((4, 5)).view()).unwrap();
            assert!(spatial.iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let empty: Array2<f64> = Array2::zeros((0, 4));
        assert_eq!(
            forward(empty.view()).unwrap_err(),
            TransformError::InvalidDimensions {
                width: 4,
                height: 0
            }
        );

        let empty: Array2<f64> = Array2::zeros((3, 0));
        assert_eq!(
            inverse(empty.view()).unwrap_err(),
            TransformError::InvalidDimensions {
                width: 0,
                height: 3
            }
        );

        assert!(Dct2d::new(0, 0, Normalization::Orthonormal, Algorithm::Separable).is_err());
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let mut plan = Dct2d::new(4, 3, Normalization::Reference, Algorithm::Direct).unwrap();
        let input = Array2::zeros((4, 3));
        assert_eq!(
            plan.forward(input.view()).unwrap_err(),
            TransformError::ShapeMismatch {
                expected: (3, 4),
                found: (4, 3)
            }
        );

        let input = Array2::zeros((3, 4));
        let mut output = Array2::zeros((3, 5));
        assert!(plan.inverse_into(input.view(), output.view_mut()).is_err());
    }

    #[test]
    fn orthonormal_pair_round_trips() {
        let grid = sample_grid(8, 8);
        for algorithm in Algorithm::iter() {
            let mut plan = Dct2d::new(8, 8, Normalization::Orthonormal, algorithm).unwrap();
            let freq = plan.forward(grid.view()).unwrap();
            let spatial = plan.inverse(freq.view()).unwrap();
            assert_grids_close(&spatial, &grid, 1e-6);
        }
    }

    #[test]
    fn orthonormal_pair_round_trips_rectangular_grids() {
        let grid = sample_grid(5, 11);
        let mut plan = Dct2d::new(11, 5, Normalization::Orthonormal, Algorithm::Direct).unwrap();
        let freq = plan.forward(grid.view()).unwrap();
        let spatial = plan.inverse(freq.view()).unwrap();
        assert_grids_close(&spatial, &grid, 1e-6);
    }

    #[test]
    fn separable_matches_direct() {
        let grid = sample_grid(6, 9);
        for normalization in Normalization::iter() {
            let mut direct = Dct2d::new(9, 6, normalization, Algorithm::Direct).unwrap();
            let mut separable = Dct2d::new(9, 6, normalization, Algorithm::Separable).unwrap();

            let a = direct.forward(grid.view()).unwrap();
            let b = separable.forward(grid.view()).unwrap();
            assert_grids_close(&b, &a, 1e-9);

            let a = direct.inverse(grid.view()).unwrap();
            let b = separable.inverse(grid.view()).unwrap();
            assert_grids_close(&b, &a, 1e-9);
        }
    }

    #[test]
    fn plan_is_reusable() {
        let mut plan = Dct2d::new(4, 4, Normalization::Reference, Algorithm::Separable).unwrap();
        let first = plan.forward(sample_grid(4, 4).view()).unwrap();
        plan.forward(Array2::from_elem((4, 4), 9.0).view()).unwrap();
        let again = plan.forward(sample_grid(4, 4).view()).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn folded_axis_matches_unfolded_cosines() {
        let len = 37;
        for normalization in Normalization::iter() {
            let axis = Axis::new(len, normalization).unwrap();
            for frequency in 0..len {
                for position in 0..len {
                    let angle = ((2 * position + 1) * frequency) as f64 * PI / (2 * len) as f64;
                    let expected = normalization.weight(frequency, len) * angle.cos();
                    let actual = axis.value(frequency, position);
                    assert!(
                        (actual - expected).abs() < 1e-12,
                        "({frequency}, {position}): {actual} vs {expected}"
                    );
                }
            }

            let mut factors = vec![0.0; len];
            for index in 0..len {
                axis.fill_positions(index, &mut factors);
                for (position, &factor) in factors.iter().enumerate() {
                    assert_eq!(factor, axis.value(index, position));
                }

                axis.fill_frequencies(index, &mut factors);
                for (frequency, &factor) in factors.iter().enumerate() {
                    assert_eq!(factor, axis.value(frequency, index));
                }
            }
        }
    }

    #[test]
    fn direct_plan_grows_linearly_with_the_axes() {
        assert_eq!(
            Dct2d::scratch_len(40_000, 1, Algorithm::Direct),
            Some(6 * 40_001)
        );
        assert_eq!(Dct2d::scratch_len(4, 3, Algorithm::Separable), Some(5 * 7 + 16 + 9 + 12));
        assert_eq!(Dct2d::scratch_len(usize::MAX, 1, Algorithm::Direct), None);

        let plan = Dct2d::new(40_000, 1, Normalization::Reference, Algorithm::Direct).unwrap();
        assert_eq!(plan.algorithm(), Algorithm::Direct);
        assert_eq!((plan.width(), plan.height()), (40_000, 1));
    }

    #[test]
    fn narrow_strip_transforms_without_square_tables() {
        let strip = Array2::from_shape_fn((1, 4_000), |(_, j)| (j % 50) as f64);
        let mut plan = Dct2d::new(4_000, 1, Normalization::Orthonormal, Algorithm::Direct).unwrap();

        let freq = plan.forward(strip.view()).unwrap();
        let spatial = plan.inverse(freq.view()).unwrap();
        assert_grids_close(&spatial, &strip, 1e-6);
    }
}
