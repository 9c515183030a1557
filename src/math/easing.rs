//! Easing and interpolation helpers shared by the stimulus evaluators

use num_traits::Float;

/// Cubic Hermite step between two edges
///
/// Maps `x` linearly into `[0, 1]` over `[edge0, edge1]`, clamps, then applies
/// `3t² − 2t³`. When both edges coincide the step is a hard threshold at `edge1`.
pub fn smoothstep<T: Float>(edge0: T, edge1: T, x: T) -> T {
    if edge0 == edge1 {
        return if x >= edge1 { T::one() } else { T::zero() };
    }
    let t = clamp_unit((x - edge0) / (edge1 - edge0));
    let two = T::one() + T::one();
    let three = two + T::one();
    t * t * (three - two * t)
}

/// Clamp a value into `[0, 1]`, mapping NaN to zero
pub fn clamp_unit<T: Float>(value: T) -> T {
    if value.is_nan() {
        return T::zero();
    }
    value.max(T::zero()).min(T::one())
}

/// Linear interpolation between `start` and `end` at fraction `t`
pub fn lerp<T: Float>(start: T, end: T, t: T) -> T {
    (end - start).mul_add(t, start)
}
