use std::convert::TryInto;
use std::fmt::Debug;

/// Convert `n` to `u32` using `TryFrom` or panic.
///
/// # Panics
/// Panics if the conversion returns an error.
pub fn cast_u32<T>(n: T) -> u32
where
    T: TryInto<u32>,
    <T as TryInto<u32>>::Error: Debug,
{
    n.try_into().expect("Expected N to fit in u32")
}

/// Convert `n` to `usize` using `TryFrom` or panic.
///
/// # Panics
/// Panics if the conversion returns an error.
pub fn cast_usize<T>(n: T) -> usize
where
    T: TryInto<usize>,
    <T as TryInto<usize>>::Error: Debug,
{
    n.try_into().expect("Expected N to fit in usize")
}

/// Converts a continuous voxel coordinate to a grid index if it lies within
/// `0..dimension` after rounding to the nearest integer.
pub fn round_to_index(coordinate: f64, dimension: usize) -> Option<usize> {
    if !coordinate.is_finite() {
        return None;
    }
    let rounded = coordinate.round();
    if rounded < 0.0 || rounded >= dimension as f64 {
        None
    } else {
        Some(rounded as usize)
    }
}
