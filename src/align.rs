/// Rounds `value` up to the next multiple of `align`.
///
/// `align` must be a power of two.
///
/// # Examples
///
/// ```rust
/// use slotpool::align_up;
///
/// assert_eq!(align_up!(13, 8), 16);
/// assert_eq!(align_up!(16, 8), 16);
/// assert_eq!(align_up!(1, 64), 64);
/// ```
#[macro_export]
macro_rules! align_up {
  ($value:expr, $align:expr) => {
    ($value + $align - 1) & !($align - 1)
  };
}

/// Number of bytes needed to move `addr` forward onto an `align` boundary.
///
/// Computed as `(align - addr) mod align` with wrapping subtraction, which is
/// exact for any power-of-two `align`.
#[inline]
pub fn padding_for(
  addr: usize,
  align: usize,
) -> usize {
  debug_assert!(align.is_power_of_two());
  align.wrapping_sub(addr) % align
}
