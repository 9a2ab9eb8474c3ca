//! Per-position median across aligned input rows.
//!
//! For one channel of one row segment, every input's samples are fetched and
//! scattered into a position-major table, so the `n` values belonging to one
//! output column sit next to each other. Each group is then sorted in place
//! and its median written out.

use crate::core::context::InputContext;
use crate::core::error::{RenderError, RenderResult};
use crate::core::types::{span, Channel};

/// Median of `values`, sorting them ascending in place.
///
/// Odd counts give the middle element; even counts the mean of the two
/// middle elements. `values` must not be empty.
pub fn median_in_place(values: &mut [f32]) -> f32 {
    values.sort_unstable_by(f32::total_cmp);
    let n = values.len();
    let mid = n / 2;
    if n % 2 == 1 {
        values[mid]
    } else {
        (values[mid] + values[mid - 1]) / 2.0
    }
}

/// Working buffers for one engine call.
///
/// Sized on first use and reused for every channel of the call.
#[derive(Debug, Default)]
pub struct MedianScratch {
    segment: Vec<f32>,
    samples: Vec<f32>,
}

impl MedianScratch {
    /// Create empty scratch buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create scratch buffers for `width` positions across `input_count` inputs.
    pub fn with_capacity(width: usize, input_count: usize) -> Self {
        Self {
            segment: Vec::with_capacity(width),
            samples: Vec::with_capacity(width * input_count),
        }
    }

    fn prepare(&mut self, width: usize, input_count: usize) {
        self.segment.clear();
        self.segment.resize(width, 0.0);
        self.samples.clear();
        self.samples.resize(width * input_count, 0.0);
    }
}

/// Fill `out` with the per-position median of columns `x..r` of row `y`,
/// channel `channel`, across every connected input.
///
/// `out` must hold `r - x` samples. A fetch failure aborts the call and is
/// returned with the failing input's index; `out` is left untouched.
pub fn merge_channel(
    inputs: &dyn InputContext,
    y: i32,
    x: i32,
    r: i32,
    channel: Channel,
    scratch: &mut MedianScratch,
    out: &mut [f32],
) -> RenderResult<()> {
    let input_count = inputs.input_count();
    let width = out.len();
    debug_assert_eq!(width, span(x, r));
    if width == 0 || input_count == 0 {
        return Ok(());
    }

    scratch.prepare(width, input_count);
    let MedianScratch { segment, samples } = scratch;

    for input in 0..input_count {
        inputs
            .fetch_row(input, y, x, r, channel, segment)
            .map_err(|source| RenderError::Fetch { input, source })?;

        for (xx, value) in segment.iter().enumerate() {
            samples[xx * input_count + input] = *value;
        }
    }

    for (value, column) in out.iter_mut().zip(samples.chunks_exact_mut(input_count)) {
        *value = median_in_place(column);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FetchError;
    use crate::core::types::{BBox, ChannelSet, ImageInfo};
    use proptest::prelude::*;

    /// Inputs given as explicit rows; every row spans columns `0..len`.
    struct RowInputs {
        rows: Vec<Vec<f32>>,
        failing: Option<usize>,
    }

    impl RowInputs {
        fn new(rows: Vec<Vec<f32>>) -> Self {
            Self { rows, failing: None }
        }
    }

    impl InputContext for RowInputs {
        fn input_count(&self) -> usize {
            self.rows.len()
        }

        fn metadata(&self, input: usize) -> Option<ImageInfo> {
            self.rows.get(input).map(|row| {
                ImageInfo::new(BBox::new(0, 0, row.len() as i32, 1), ChannelSet::rgb(), Default::default())
            })
        }

        fn request_region(&self, _input: usize, _region: BBox, _channels: ChannelSet, _count: u32) {}

        fn fetch_row(
            &self,
            input: usize,
            _y: i32,
            x: i32,
            r: i32,
            _channel: Channel,
            out: &mut [f32],
        ) -> Result<(), FetchError> {
            if self.failing == Some(input) {
                return Err(FetchError::Source("tile cache miss".to_string()));
            }
            out.copy_from_slice(&self.rows[input][x as usize..r as usize]);
            Ok(())
        }
    }

    fn merge(rows: Vec<Vec<f32>>) -> Vec<f32> {
        let width = rows[0].len();
        let inputs = RowInputs::new(rows);
        let mut out = vec![0.0; width];
        let mut scratch = MedianScratch::new();
        merge_channel(&inputs, 0, 0, width as i32, Channel::RED, &mut scratch, &mut out).unwrap();
        out
    }

    #[test]
    fn test_median_odd() {
        assert_eq!(median_in_place(&mut [1.0, 5.0, 2.0]), 2.0);
        assert_eq!(median_in_place(&mut [7.0]), 7.0);
    }

    #[test]
    fn test_median_even() {
        assert_eq!(median_in_place(&mut [1.0, 2.0, 3.0, 4.0]), 2.5);
        assert_eq!(median_in_place(&mut [4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_two_inputs_average() {
        let out = merge(vec![vec![0.0, 1.0, -4.0], vec![2.0, 1.0, 4.0]]);
        assert_eq!(out, vec![1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_three_inputs_per_position() {
        let out = merge(vec![
            vec![1.0, 9.0],
            vec![5.0, 8.0],
            vec![2.0, 7.0],
        ]);
        assert_eq!(out, vec![2.0, 8.0]);
    }

    #[test]
    fn test_hundred_inputs() {
        // Input i holds the value i everywhere: median of 0..100 is 49.5.
        let rows: Vec<Vec<f32>> = (0..100).map(|i| vec![i as f32; 4]).collect();
        assert_eq!(merge(rows), vec![49.5; 4]);

        let rows: Vec<Vec<f32>> = (0..99).map(|i| vec![i as f32; 4]).collect();
        assert_eq!(merge(rows), vec![49.0; 4]);
    }

    #[test]
    fn test_all_equal_even() {
        let rows: Vec<Vec<f32>> = (0..100).map(|_| vec![0.3; 3]).collect();
        assert_eq!(merge(rows), vec![0.3; 3]);
    }

    #[test]
    fn test_sub_range() {
        let inputs = RowInputs::new(vec![
            vec![0.0, 1.0, 2.0, 3.0],
            vec![10.0, 11.0, 12.0, 13.0],
            vec![5.0, 5.0, 5.0, 5.0],
        ]);
        let mut out = vec![0.0; 2];
        let mut scratch = MedianScratch::new();
        merge_channel(&inputs, 0, 1, 3, Channel::GREEN, &mut scratch, &mut out).unwrap();
        assert_eq!(out, vec![5.0, 5.0]);
    }

    #[test]
    fn test_fetch_error_propagates() {
        let mut inputs = RowInputs::new(vec![vec![1.0; 2], vec![2.0; 2], vec![3.0; 2]]);
        inputs.failing = Some(2);
        let mut out = vec![-1.0; 2];
        let mut scratch = MedianScratch::new();

        let err = merge_channel(&inputs, 0, 0, 2, Channel::RED, &mut scratch, &mut out).unwrap_err();
        match err {
            RenderError::Fetch { input, source } => {
                assert_eq!(input, 2);
                assert_eq!(source, FetchError::Source("tile cache miss".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(out, vec![-1.0; 2]);
    }

    #[test]
    fn test_scratch_reuse_across_widths() {
        let inputs = RowInputs::new(vec![vec![1.0, 2.0, 3.0], vec![3.0, 4.0, 5.0]]);
        let mut scratch = MedianScratch::with_capacity(3, 2);

        let mut wide = vec![0.0; 3];
        merge_channel(&inputs, 0, 0, 3, Channel::RED, &mut scratch, &mut wide).unwrap();
        let mut narrow = vec![0.0; 1];
        merge_channel(&inputs, 0, 2, 3, Channel::RED, &mut scratch, &mut narrow).unwrap();

        assert_eq!(wide, vec![2.0, 3.0, 4.0]);
        assert_eq!(narrow, vec![4.0]);
    }

    fn rows_strategy() -> impl Strategy<Value = Vec<Vec<f32>>> {
        (2usize..12, 1usize..8).prop_flat_map(|(n, width)| {
            prop::collection::vec(prop::collection::vec(-1000i32..1000, width), n)
                .prop_map(|rows| {
                    rows.into_iter()
                        .map(|row| row.into_iter().map(|v| v as f32).collect())
                        .collect()
                })
        })
    }

    proptest! {
        #[test]
        fn prop_order_independent(rows in rows_strategy(), seed in any::<u64>()) {
            let expected = merge(rows.clone());
            let mut shuffled = rows;
            // Deterministic rotation plus reversal driven by the seed.
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            if seed & 1 == 1 {
                shuffled.reverse();
            }
            prop_assert_eq!(merge(shuffled), expected);
        }

        #[test]
        fn prop_shift_invariant(rows in rows_strategy(), k in -500i32..500) {
            let base = merge(rows.clone());
            let shifted_rows: Vec<Vec<f32>> = rows
                .iter()
                .map(|row| row.iter().map(|v| v + k as f32).collect())
                .collect();
            let shifted = merge(shifted_rows);
            for (b, s) in base.iter().zip(&shifted) {
                prop_assert_eq!(b + k as f32, *s);
            }
        }

        #[test]
        fn prop_deterministic(rows in rows_strategy()) {
            let first = merge(rows.clone());
            let second = merge(rows);
            let first_bits: Vec<u32> = first.iter().map(|v| v.to_bits()).collect();
            let second_bits: Vec<u32> = second.iter().map(|v| v.to_bits()).collect();
            prop_assert_eq!(first_bits, second_bits);
        }

        #[test]
        fn prop_median_is_bounded(rows in rows_strategy()) {
            let out = merge(rows.clone());
            for (xx, value) in out.iter().enumerate() {
                let column: Vec<f32> = rows.iter().map(|row| row[xx]).collect();
                let lo = column.iter().cloned().fold(f32::INFINITY, f32::min);
                let hi = column.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
                prop_assert!(*value >= lo && *value <= hi);
            }
        }
    }
}
