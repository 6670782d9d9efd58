//! Linear interpolation and incremental stepping of values.

/// Trait for linear interpolation between two values.
pub trait Lerp: Sized {
    /// Linearly interpolates between `self` and `other`.
    ///
    /// If `t` = 0, returns `self`; if `t` = 1, returns `other`. Values of `t`
    /// outside the unit interval extrapolate.
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

/// A trait for *varyings*: values interpolated across the screen-space
/// extent of a primitive by repeatedly adding a constant per-pixel or
/// per-line delta, rather than by evaluating [`Lerp::lerp`] at each point.
pub trait Vary: Lerp + Copy {
    /// Returns `self` offset by `delta`.
    fn step(&self, delta: &Self) -> Self;

    /// Returns the rate of change from `self` to `other` given the
    /// reciprocal of the distance between them.
    fn dv_dt(&self, other: &Self, recip_dt: f32) -> Self;

    /// Returns an iterator yielding `self`, then `self` offset by `delta`
    /// and so on, `n` values in total.
    ///
    /// # Examples
    /// ```
    /// use facet_core::math::vary::Vary;
    /// let vs: Vec<f32> = 1.0f32.vary(0.5, 3).collect();
    /// assert_eq!(vs, [1.0, 1.5, 2.0]);
    /// ```
    fn vary(self, delta: Self, n: u32) -> Iter<Self> {
        Iter { val: self, delta, n }
    }
}

/// Iterator returned by [`Vary::vary`].
#[derive(Copy, Clone, Debug)]
pub struct Iter<T> {
    val: T,
    delta: T,
    n: u32,
}

/// Linearly interpolates between `from` and `to`.
#[inline]
pub fn lerp<T: Lerp>(t: f32, from: T, to: T) -> T {
    from.lerp(&to, t)
}

/// Returns the relative position of `t` between `min` and `max`.
///
/// The inverse of [`lerp`]: if `t` equals `min`, returns 0, and if `t`
/// equals `max`, returns 1. Does not clamp the result.
///
/// Returns 0 if `min` equals `max`.
#[inline]
pub fn inv_lerp(t: f32, min: f32, max: f32) -> f32 {
    let d = max - min;
    if d == 0.0 { 0.0 } else { (t - min) / d }
}

impl Lerp for f32 {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + t * (other - self)
    }
}

impl Vary for f32 {
    #[inline]
    fn step(&self, delta: &Self) -> Self {
        self + delta
    }
    #[inline]
    fn dv_dt(&self, other: &Self, recip_dt: f32) -> Self {
        (other - self) * recip_dt
    }
}

impl<T: Vary> Iterator for Iter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.n == 0 {
            return None;
        }
        self.n -= 1;
        let res = self.val;
        self.val = self.val.step(&self.delta);
        Some(res)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.n as usize, Some(self.n as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints_and_midpoint() {
        assert_eq!(2.0f32.lerp(&4.0, 0.0), 2.0);
        assert_eq!(2.0f32.lerp(&4.0, 1.0), 4.0);
        assert_eq!(lerp(0.5, 2.0f32, 4.0), 3.0);
    }

    #[test]
    fn inv_lerp_inverts_lerp() {
        assert_eq!(inv_lerp(3.0, 2.0, 4.0), 0.5);
        assert_eq!(inv_lerp(6.0, 2.0, 4.0), 2.0);
        assert_eq!(inv_lerp(1.0, 2.0, 2.0), 0.0);
    }

    #[test]
    fn vary_steps_n_times() {
        let mut it = 0.0f32.vary(0.25, 3);
        assert_eq!(it.size_hint(), (3, Some(3)));
        assert_eq!(it.next(), Some(0.0));
        assert_eq!(it.next(), Some(0.25));
        assert_eq!(it.next(), Some(0.5));
        assert_eq!(it.next(), None);
    }

    #[test]
    fn dv_dt() {
        assert_eq!(1.0f32.dv_dt(&3.0, 0.5), 1.0);
    }
}
