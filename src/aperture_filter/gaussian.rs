use super::{ApertureFilter, ApertureFilter2d};

/// Gaussian apodized aperture, `exp(-u²)`
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Gaussian;

impl ApertureFilter for Gaussian {
    fn eval(&self, u: f64) -> f64 {
        (-u * u).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn separable() {
        let af = Gaussian;
        assert_eq!(af.eval(0.0), 1.0);
        assert_eq!(af.eval(f64::INFINITY), 0.0);
        assert_eq!(af.eval(f64::INFINITY), 0.0);
        assert_relative_eq!(
            af.eval_xy(0.7, 1.1),
            af.eval(0.7) * af.eval(1.1),
            max_relative = 1e-14
        );
    }
}
