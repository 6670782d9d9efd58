//! Approximate equality of floating-point quantities.

use core::iter::zip;

/// Trait for comparing values for approximate equality.
///
/// Rounding errors accumulate quickly in a transform pipeline, so results
/// such as projected coordinates or normalized vectors are compared with a
/// tolerance rather than exactly. The tolerance is *relative*: it is scaled
/// by the magnitude of `self` if that is greater than one.
pub trait ApproxEq<Other: ?Sized = Self, Epsilon = Self> {
    /// Returns whether `self` and `other` are approximately equal, using
    /// the default epsilon of the type.
    fn approx_eq(&self, other: &Other) -> bool {
        self.approx_eq_eps(other, &Self::relative_epsilon())
    }

    /// Returns whether `self` and `other` are approximately equal,
    /// using the relative epsilon `rel_eps`.
    fn approx_eq_eps(&self, other: &Other, rel_eps: &Epsilon) -> bool;

    /// Returns the default relative epsilon.
    fn relative_epsilon() -> Epsilon;
}

impl ApproxEq for f32 {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &Self) -> bool {
        use super::float::f32;
        let diff = f32::abs(self - other);
        diff <= *rel_eps * f32::abs(*self).max(1.0)
    }

    fn relative_epsilon() -> Self {
        // micromath is only accurate to a few decimal places
        if cfg!(any(feature = "std", feature = "libm")) {
            1e-6
        } else {
            5e-3
        }
    }
}

impl<E, T: ApproxEq<T, E>> ApproxEq<Self, E> for [T] {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &E) -> bool {
        self.len() == other.len()
            && zip(self, other).all(|(s, o)| s.approx_eq_eps(o, rel_eps))
    }
    fn relative_epsilon() -> E {
        T::relative_epsilon()
    }
}

impl<E, T: ApproxEq<T, E>, const N: usize> ApproxEq<Self, E> for [T; N] {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &E) -> bool {
        self.as_slice().approx_eq_eps(other, rel_eps)
    }
    fn relative_epsilon() -> E {
        T::relative_epsilon()
    }
}

impl<E, T: ApproxEq<T, E>> ApproxEq<Self, E> for Option<T> {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &E) -> bool {
        match (self, other) {
            (Some(s), Some(o)) => s.approx_eq_eps(o, rel_eps),
            (None, None) => true,
            _ => false,
        }
    }
    fn relative_epsilon() -> E {
        T::relative_epsilon()
    }
}

/// Asserts that two values are approximately equal.
///
/// The left operand must have an applicable [`ApproxEq`] impl, and both
/// must impl `Debug` unless a custom message is given. An explicit epsilon
/// may be given as `eps = <literal>` before the optional message.
///
/// # Examples
/// ```
/// # use facet_core::assert_approx_eq;
/// assert_ne!(0.1 + 0.2, 0.3);
/// assert_approx_eq!(0.1 + 0.2, 0.3);
/// assert_approx_eq!(5.0, 5.04, eps = 0.01);
/// ```
/// # Panics
/// If the values are not approximately equal.
#[macro_export]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr) => {
        match (&$a, &$b) {
            (a, b) => $crate::assert_approx_eq!(
                *a, *b,
                "assertion failed: `{a:?} ≅ {b:?}`"
            )
        }
    };
    ($a:expr, $b:expr, eps = $eps:literal) => {
        match (&$a, &$b) {
            (a, b) => $crate::assert_approx_eq!(
                *a, *b, eps = $eps,
                "assertion failed: `{a:?} ≅ {b:?}` (eps = {})", $eps
            )
        }
    };
    ($a:expr, $b:expr, $fmt:literal $(, $args:expr)*) => {{
        use $crate::math::approx::ApproxEq;
        match (&$a, &$b) {
            (a, b) => assert!(ApproxEq::approx_eq(a, b), $fmt $(, $args)*)
        }
    }};
    ($a:expr, $b:expr, eps = $eps:literal, $fmt:literal $(, $args:expr)*) => {{
        use $crate::math::approx::ApproxEq;
        match (&$a, &$b) {
            (a, b) => assert!(
                ApproxEq::approx_eq_eps(a, b, &$eps),
                $fmt $(, $args)*
            )
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn zeros_of_either_sign() {
        assert_approx_eq!(0.0, -0.0);
        assert_approx_eq!(-0.0, 0.0);
    }

    #[test]
    fn tolerance_is_relative_above_one() {
        assert_approx_eq!(1.0e10, 1.0000001e10);
        assert_approx_eq!(-1.0, -1.0000001);
    }

    #[test]
    fn custom_epsilon() {
        assert_approx_eq!(100.0, 99.9, eps = 0.01);
        assert_approx_eq!([1.0f32, 2.0], [1.001, 2.001], eps = 0.01);
    }

    #[test]
    fn options() {
        assert_approx_eq!(Some(1.0f32), Some(1.0000001));
        assert_approx_eq!(None::<f32>, None);
    }

    #[test]
    #[should_panic]
    fn one_not_approx_eq_to_1_00001() {
        assert_approx_eq!(1.0, 1.00001);
    }

    #[test]
    #[should_panic]
    fn nan_not_approx_eq_to_nan() {
        assert_approx_eq!(f32::NAN, f32::NAN);
    }
}
