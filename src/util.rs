use crate::types::Float;

pub fn assert_close(a: Float, b: Float, tol: Float) {
    assert!((a - b).abs() < tol, "{} != {}", a, b);
}

#[macro_export]
macro_rules! assert_close {
    ($left:expr, $right:expr, $tolerance:expr) => {
        let left = $left;
        let right = $right;
        let tol = $tolerance;
        let diff = (left - right).abs();
        if diff > tol {
            panic!(
                "assertion failed: {} ~= {} \
                (tolerance: {}, difference: {})",
                left, right, tol, diff
            );
        }
    };
}

#[macro_export]
macro_rules! assert_vec_close {
    ($left:expr, $right:expr, $tolerance:expr) => {
        let left = $left;
        let right = $right;
        let tol = $tolerance;
        for (a, b) in left.iter().zip(right.iter()) {
            $crate::assert_close!(a, b, tol);
        }
    };
}

#[cfg(test)]
pub mod test_utils {
    use rand::{rngs::ThreadRng, Rng};

    use crate::{params::ParameterInputs, types::Float};

    /// Draw pendulum inputs uniformly from the accepted input domain, with
    /// the given damping. Angles start at 10 degrees: below that a slow,
    /// long pendulum can swing through the rest thresholds without damping.
    pub fn random_inputs(rng: &mut ThreadRng, damping: Float) -> ParameterInputs {
        ParameterInputs::new(
            rng.random_range(0.2..=5.0),
            rng.random_range(1.0..=25.0),
            rng.random_range(10.0..=179.0),
            damping,
        )
    }
}
