//! Small numeric helpers
use crate::error::{ParaxError, ParaxResult};

/// Converts a `usize` into an `f64`. Values above 2^53 lose precision.
#[must_use]
pub const fn usize_to_f64(value: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let newval = value as f64;
    newval
}

/// Creates a vector of `num` linearly spaced values from `start` to `end` (both inclusive).
///
/// For `num == 1` the result only contains `start`, for `num == 0` it is empty.
///
/// # Errors
/// This function will return an error if `start` or `end` is not finite.
pub fn linspace(start: f64, end: f64, num: usize) -> ParaxResult<Vec<f64>> {
    if !start.is_finite() || !end.is_finite() {
        return Err(ParaxError::InvalidArgument(
            "start and end values must be finite!".into(),
        ));
    };
    if num < 2 {
        return Ok(vec![start; num]);
    }
    let last = usize_to_f64(num - 1);
    let range = end - start;
    let mut values: Vec<f64> = (0..num)
        .map(|step| start + range * (usize_to_f64(step) / last))
        .collect();
    // avoid rounding drift on the last sample
    values[num - 1] = end;
    Ok(values)
}
