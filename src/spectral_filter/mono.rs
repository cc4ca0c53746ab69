use super::SpectralFilter;
use crate::math::sinc;
use std::f64::consts::PI;

/// Monochromatic spectral filter `sin²(πx)`
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Mono;

impl SpectralFilter for Mono {
    fn eval(&self, x: f64) -> f64 {
        (PI * x).sin().powi(2)
    }
    fn regular(&self, x: f64) -> f64 {
        (PI * sinc(PI * x)).powi(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn eval() {
        assert_eq!(Mono.eval(0.0), 0.0);
        assert_abs_diff_eq!(Mono.eval(0.1), 0.095_491_502_812_526_3, epsilon = 2.0 * f64::EPSILON);
        assert_abs_diff_eq!(Mono.eval(0.5), 1.0, epsilon = 2.0 * f64::EPSILON);
        assert_abs_diff_eq!(Mono.eval(1.0), 0.0, epsilon = 2.0 * f64::EPSILON);
    }

    #[test]
    fn regular() {
        assert_eq!(Mono.regular(0.0), PI * PI);
        assert_abs_diff_eq!(Mono.regular(0.5), 4.0, epsilon = 20.0 * f64::EPSILON);
        assert_abs_diff_eq!(Mono.regular(0.1), 9.549_150_281_252_629, epsilon = 20.0 * f64::EPSILON);
    }

    #[test]
    fn slices() {
        let x = [0.0, 0.25, 0.5];
        assert_eq!(Mono.eval_slice(&x), vec![Mono.eval(0.0), Mono.eval(0.25), Mono.eval(0.5)]);
        assert_eq!(Mono.regular_slice(&x)[0], PI * PI);
    }
}
