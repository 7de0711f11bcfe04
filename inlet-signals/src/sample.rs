//! Interpolation and hold evaluation of sampled input signals.
//!
//! The sampler answers one question: given a time grid, a matrix of sample
//! values, and a query time, what is each variable's value and time
//! derivative? Rows are evaluated independently, either piecewise-linearly
//! or with a zero-order hold, and a caller-supplied flag disambiguates
//! queries that land exactly on a duplicated timestamp (an event boundary).

use ndarray::{ArrayView1, ArrayView2};
use thiserror::Error;

/// How a variable row is evaluated between samples.
///
/// The kind is always chosen explicitly by the caller; it is never inferred
/// from a value's numeric representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    /// Piecewise-linear between samples; the derivative is the slope of the
    /// bracketing segment.
    Linear,
    /// Zero-order hold: the most recent sample's value, derivative 0.
    Hold,
}

/// Value and time derivative of one variable at a query time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub value: f64,
    pub derivative: f64,
}

impl Sample {
    fn held(value: f64) -> Self {
        Self {
            value,
            derivative: 0.0,
        }
    }
}

/// Errors raised by the sampling entry points.
#[derive(Debug, Error)]
pub enum SampleError {
    /// The time grid has no samples. A single-sample grid is valid; an empty
    /// one is not.
    #[error("time grid is empty")]
    EmptyTimeGrid,

    /// A value row's length differs from the time grid's length.
    #[error("value row has {actual} samples but the time grid has {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// The time grid strictly decreases somewhere.
    #[error("time grid decreases at index {index}: {prev} > {next}")]
    DecreasingTime { index: usize, prev: f64, next: f64 },

    /// The number of row kinds differs from the number of matrix rows.
    #[error("got {actual} row kinds for {expected} value rows")]
    KindCountMismatch { expected: usize, actual: usize },
}

/// Samples a single variable row at the given time.
///
/// Outside the sampled range the boundary sample is held with derivative 0;
/// extrapolation never extends a slope. At a duplicated timestamp,
/// `after_event` selects the sample on the far side of the event boundary.
///
/// # Errors
///
/// Returns an error if the grid is empty, strictly decreases somewhere, or
/// does not match the row's length.
///
/// # Examples
///
/// ```
/// use inlet_signals::{Interpolation, sample_row};
/// use ndarray::array;
///
/// let grid = array![0.0, 1.0, 2.0, 3.0];
/// let values = array![0.0, 0.0, 3.0, 3.0];
///
/// let s = sample_row(1.5, grid.view(), values.view(), Interpolation::Linear, false).unwrap();
/// assert_eq!((s.value, s.derivative), (1.5, 3.0));
///
/// let s = sample_row(4.0, grid.view(), values.view(), Interpolation::Linear, false).unwrap();
/// assert_eq!((s.value, s.derivative), (3.0, 0.0));
/// ```
pub fn sample_row(
    time: f64,
    grid: ArrayView1<'_, f64>,
    values: ArrayView1<'_, f64>,
    kind: Interpolation,
    after_event: bool,
) -> Result<Sample, SampleError> {
    validate_grid(grid)?;

    if values.len() != grid.len() {
        return Err(SampleError::ShapeMismatch {
            expected: grid.len(),
            actual: values.len(),
        });
    }

    Ok(evaluate(time, grid, values, kind, after_event))
}

/// Samples every row of a value matrix at the given time.
///
/// Rows are evaluated independently; `kinds` supplies one [`Interpolation`]
/// per row, in row order.
///
/// # Errors
///
/// Returns an error if the grid is empty or strictly decreases somewhere,
/// if the matrix's column count differs from the grid's length, or if the
/// kind count differs from the row count.
pub fn sample(
    time: f64,
    grid: ArrayView1<'_, f64>,
    matrix: ArrayView2<'_, f64>,
    kinds: &[Interpolation],
    after_event: bool,
) -> Result<Vec<Sample>, SampleError> {
    validate_grid(grid)?;

    if matrix.ncols() != grid.len() {
        return Err(SampleError::ShapeMismatch {
            expected: grid.len(),
            actual: matrix.ncols(),
        });
    }
    if kinds.len() != matrix.nrows() {
        return Err(SampleError::KindCountMismatch {
            expected: matrix.nrows(),
            actual: kinds.len(),
        });
    }

    Ok(matrix
        .rows()
        .into_iter()
        .zip(kinds)
        .map(|(values, &kind)| evaluate(time, grid, values, kind, after_event))
        .collect())
}

fn validate_grid(grid: ArrayView1<'_, f64>) -> Result<(), SampleError> {
    if grid.is_empty() {
        return Err(SampleError::EmptyTimeGrid);
    }

    for i in 1..grid.len() {
        if grid[i] < grid[i - 1] {
            return Err(SampleError::DecreasingTime {
                index: i,
                prev: grid[i - 1],
                next: grid[i],
            });
        }
    }

    Ok(())
}

/// Evaluates one row against an already-validated, non-empty grid.
pub(crate) fn evaluate(
    time: f64,
    grid: ArrayView1<'_, f64>,
    values: ArrayView1<'_, f64>,
    kind: Interpolation,
    after_event: bool,
) -> Sample {
    let n = grid.len();

    if n == 1 {
        return Sample::held(values[0]);
    }

    // Strictly outside the sampled range: hold the boundary sample.
    if time < grid[0] {
        return Sample::held(values[0]);
    }
    if time > grid[n - 1] {
        return Sample::held(values[n - 1]);
    }

    // An exact endpoint hit holds with derivative 0, unless the endpoint is
    // a duplicated event boundary and the query asks for its far side.
    if time == grid[0] && !(after_event && grid[1] == grid[0]) {
        return Sample::held(values[0]);
    }
    if time == grid[n - 1] && (after_event || grid[n - 2] < grid[n - 1]) {
        return Sample::held(values[n - 1]);
    }

    // Upper end of the bracketing segment. Searching on the "right" side of
    // coincident timestamps when after_event is set makes the segment start
    // at the last coincident sample, so the bracket always has nonzero width.
    let i1 = upper_index(grid, time, after_event);
    let i0 = i1 - 1;

    match kind {
        Interpolation::Hold => Sample::held(values[i0]),
        Interpolation::Linear => {
            let derivative = (values[i1] - values[i0]) / (grid[i1] - grid[i0]);
            Sample {
                value: values[i0] + (time - grid[i0]) * derivative,
                derivative,
            }
        }
    }
}

/// Returns the first index whose grid time is above `time`, where "above"
/// means `>=` before an event and `>` after it.
fn upper_index(grid: ArrayView1<'_, f64>, time: f64, after_event: bool) -> usize {
    let mut low = 0;
    let mut high = grid.len();

    while low < high {
        let mid = low + (high - low) / 2;
        let below = if after_event {
            grid[mid] <= time
        } else {
            grid[mid] < time
        };
        if below {
            low = mid + 1;
        } else {
            high = mid;
        }
    }

    low
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::{array, Array1, Array2};

    fn continuous_fixture() -> (Array1<f64>, Array2<f64>) {
        let grid = array![0.0, 1.0, 2.0, 3.0];
        let matrix = array![[0.0, 0.0, 3.0, 3.0], [-1.0, 0.0, 1.0, 2.0]];
        (grid, matrix)
    }

    fn sample_both(time: f64, after_event: bool) -> Vec<Sample> {
        let (grid, matrix) = continuous_fixture();
        sample(
            time,
            grid.view(),
            matrix.view(),
            &[Interpolation::Linear, Interpolation::Linear],
            after_event,
        )
        .unwrap()
    }

    #[test]
    fn single_sample_holds_everywhere() {
        let grid = array![0.0];
        let values = array![2.0];

        for time in [-10.0, 0.0, 1.0, 1e9] {
            let s = sample_row(time, grid.view(), values.view(), Interpolation::Linear, false)
                .unwrap();
            assert_eq!((s.value, s.derivative), (2.0, 0.0));
        }
    }

    #[test]
    fn extrapolation_holds_the_boundary_samples() {
        let left = sample_both(-1.0, false);
        assert_eq!((left[0].value, left[1].value), (0.0, -1.0));
        assert_eq!((left[0].derivative, left[1].derivative), (0.0, 0.0));

        let right = sample_both(4.0, false);
        assert_eq!((right[0].value, right[1].value), (3.0, 2.0));
        assert_eq!((right[0].derivative, right[1].derivative), (0.0, 0.0));
    }

    #[test]
    fn linear_interpolation_inside_a_segment() {
        let s = sample_both(1.5, false);
        assert_eq!((s[0].value, s[0].derivative), (1.5, 3.0));
        assert_eq!((s[1].value, s[1].derivative), (0.5, 1.0));
    }

    #[test]
    fn exact_hit_returns_the_sample_with_the_bracketing_slope() {
        let s = sample_both(1.0, false);
        assert_eq!((s[0].value, s[0].derivative), (0.0, 0.0));
        assert_eq!((s[1].value, s[1].derivative), (0.0, 1.0));
    }

    #[test]
    fn exact_endpoint_hit_holds_with_zero_derivative() {
        let s = sample_both(3.0, false);
        assert_eq!((s[0].value, s[0].derivative), (3.0, 0.0));
        assert_eq!((s[1].value, s[1].derivative), (2.0, 0.0));

        let s = sample_both(0.0, false);
        assert_eq!((s[0].value, s[0].derivative), (0.0, 0.0));
        assert_eq!((s[1].value, s[1].derivative), (-1.0, 0.0));
    }

    #[test]
    fn derivative_is_constant_within_a_segment() {
        let a = sample_both(1.25, false);
        let b = sample_both(1.75, false);
        assert_eq!(a[0].derivative, b[0].derivative);
        assert_eq!(a[1].derivative, b[1].derivative);
    }

    #[test]
    fn hold_row_with_event_disambiguation() {
        let grid = array![0.0, 1.0, 1.0, 1.0, 2.0];
        let values = array![0.0, 0.0, 4.0, 3.0, 3.0];

        let cases = [
            (-1.0, false, 0.0), // extrapolate left
            (0.0, false, 0.0),  // hit the first sample
            (0.5, false, 0.0),  // hold the previous value
            (1.0, false, 0.0),  // before the event
            (1.0, true, 3.0),   // after the event
            (3.0, false, 3.0),  // extrapolate right
        ];

        for (time, after_event, expected) in cases {
            let s = sample_row(
                time,
                grid.view(),
                values.view(),
                Interpolation::Hold,
                after_event,
            )
            .unwrap();
            assert_eq!(
                (s.value, s.derivative),
                (expected, 0.0),
                "time {time}, after_event {after_event}"
            );
        }
    }

    #[test]
    fn linear_row_with_duplicated_interior_timestamp() {
        let grid = array![0.0, 1.0, 1.0, 2.0];
        let values = array![0.0, 2.0, 6.0, 8.0];

        let before = sample_row(1.0, grid.view(), values.view(), Interpolation::Linear, false)
            .unwrap();
        assert_eq!((before.value, before.derivative), (2.0, 2.0));

        let after = sample_row(1.0, grid.view(), values.view(), Interpolation::Linear, true)
            .unwrap();
        assert_eq!((after.value, after.derivative), (6.0, 2.0));

        let past = sample_row(1.5, grid.view(), values.view(), Interpolation::Linear, false)
            .unwrap();
        assert_eq!((past.value, past.derivative), (7.0, 2.0));
    }

    #[test]
    fn duplicated_endpoints_follow_the_event_side() {
        let grid = array![0.0, 0.0, 1.0, 1.0];
        let values = array![5.0, 1.0, 2.0, 9.0];

        let before_start =
            sample_row(0.0, grid.view(), values.view(), Interpolation::Linear, false).unwrap();
        assert_eq!((before_start.value, before_start.derivative), (5.0, 0.0));

        let after_start =
            sample_row(0.0, grid.view(), values.view(), Interpolation::Linear, true).unwrap();
        assert_eq!((after_start.value, after_start.derivative), (1.0, 1.0));

        let before_end =
            sample_row(1.0, grid.view(), values.view(), Interpolation::Linear, false).unwrap();
        assert_eq!((before_end.value, before_end.derivative), (2.0, 1.0));

        let after_end =
            sample_row(1.0, grid.view(), values.view(), Interpolation::Linear, true).unwrap();
        assert_eq!((after_end.value, after_end.derivative), (9.0, 0.0));
    }

    #[test]
    fn repeated_queries_are_bit_identical() {
        let (grid, matrix) = continuous_fixture();
        let kinds = [Interpolation::Linear, Interpolation::Linear];

        let first = sample(1.7, grid.view(), matrix.view(), &kinds, false).unwrap();
        let second = sample(1.7, grid.view(), matrix.view(), &kinds, false).unwrap();

        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.value.to_bits(), b.value.to_bits());
            assert_eq!(a.derivative.to_bits(), b.derivative.to_bits());
        }
    }

    #[test]
    fn empty_grid_is_rejected() {
        let grid = Array1::<f64>::zeros(0);
        let values = Array1::<f64>::zeros(0);

        let err = sample_row(0.0, grid.view(), values.view(), Interpolation::Linear, false)
            .unwrap_err();
        assert!(matches!(err, SampleError::EmptyTimeGrid));
    }

    #[test]
    fn decreasing_grid_is_rejected() {
        let grid = array![0.0, 2.0, 1.0];
        let values = array![0.0, 0.0, 0.0];

        let err = sample_row(0.5, grid.view(), values.view(), Interpolation::Linear, false)
            .unwrap_err();

        match err {
            SampleError::DecreasingTime { index, prev, next } => {
                assert_eq!(index, 2);
                assert_eq!(prev, 2.0);
                assert_eq!(next, 1.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn row_shape_mismatch_is_rejected() {
        let grid = array![0.0, 1.0, 2.0];
        let values = array![0.0, 1.0];

        let err = sample_row(0.5, grid.view(), values.view(), Interpolation::Linear, false)
            .unwrap_err();
        assert!(matches!(
            err,
            SampleError::ShapeMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn kind_count_mismatch_is_rejected() {
        let (grid, matrix) = continuous_fixture();

        let err = sample(
            0.5,
            grid.view(),
            matrix.view(),
            &[Interpolation::Linear],
            false,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SampleError::KindCountMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }
}
