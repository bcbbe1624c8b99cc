//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where 
    T: Float 
{
    target_range.0 
        + ((value - source_range.0) 
        * (target_range.1 - target_range.0) 
        / (source_range.1 - source_range.0))
}

/// Limit a value to the range `[min, max]`.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T 
where
    T: PartialOrd + Copy
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Return the arithmetic mean of the values, or `None` if there are none.
pub fn mean<T>(values: &[T]) -> Option<T>
where
    T: Float
{
    if values.is_empty() {
        return None;
    }

    let sum = values.iter().fold(T::zero(), |acc, v| acc + *v);

    T::from(values.len()).map(|n| sum / n)
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
/// 
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

/// Normalise an angle in degrees into the range `[0, 360)`.
pub fn norm_deg_360(angle_deg: f64) -> f64 {
    let a = rem_euclid(angle_deg, 360.0);

    // Round-off can land exactly on the upper bound
    if a >= 360.0 { 0.0 } else { a }
}

/// Signed error between two headings in degrees, in the range `[-180, 180)`.
///
/// The target is moved to 180 degrees and the heading is rotated by the same
/// amount, so that the 0/360 transition never lies between the two. A
/// positive error means the heading is clockwise of the target.
pub fn heading_error_deg(heading_deg: f64, target_deg: f64) -> f64 {
    let delta = norm_deg_360(target_deg) - 180.0;
    norm_deg_360(heading_deg - delta) - 180.0
}
