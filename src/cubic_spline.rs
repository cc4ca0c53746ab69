use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SplineError {
    #[error("A cubic spline requires at least 2 samples, found {0}")]
    TooFewNodes(usize),
}
type Result<T> = std::result::Result<T, SplineError>;

/// Spline boundary conditions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Boundary {
    /// Prescribed first derivatives at both ends
    FirstOrder { left: f64, right: f64 },
    /// Prescribed second derivatives at both ends
    SecondOrder { left: f64, right: f64 },
}
impl Default for Boundary {
    fn default() -> Self {
        Boundary::SecondOrder {
            left: 0f64,
            right: 0f64,
        }
    }
}
impl Boundary {
    /// Zero slope at both ends
    pub fn clamped() -> Self {
        Boundary::FirstOrder {
            left: 0f64,
            right: 0f64,
        }
    }
    /// Zero curvature at both ends
    pub fn natural() -> Self {
        Self::default()
    }
}

/// Cubic spline on the unit-spaced nodes `0, 1, ..., N-1`
///
/// Arguments are expressed in node index units, callers map their own
/// coordinates onto `[0, N-1]` with a [UniformGrid](crate::UniformGrid).
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    values: Vec<f64>,
    second_derivatives: Vec<f64>,
}
impl CubicSpline {
    /// Fits the spline through `values` with the given boundary conditions
    pub fn new(values: Vec<f64>, boundary: Boundary) -> Result<Self> {
        let n = values.len();
        if n < 2 {
            return Err(SplineError::TooFewNodes(n));
        }
        let y = &values;
        let (first, last, d_first, d_last) = match boundary {
            Boundary::FirstOrder { left, right } => (
                1f64,
                1f64,
                (y[1] - y[0] - left) * 6f64,
                (right - (y[n - 1] - y[n - 2])) * 6f64,
            ),
            Boundary::SecondOrder { left, right } => (0f64, 0f64, left * 2f64, right * 2f64),
        };
        // right hand side of the interior rows
        let rhs: Vec<f64> = y
            .windows(3)
            .map(|w| (w[2] - 2f64 * w[1] + w[0]) * 3f64)
            .collect();

        let mut c_prime = vec![0f64; n];
        let mut d2 = vec![0f64; n];
        c_prime[0] = first / 2f64;
        d2[0] = d_first / 2f64;
        for i in 1..n - 1 {
            let denom = 2f64 - 0.5 * c_prime[i - 1];
            c_prime[i] = 0.5 / denom;
            d2[i] = (rhs[i - 1] - 0.5 * d2[i - 1]) / denom;
        }
        d2[n - 1] = (d_last - last * d2[n - 2]) / (2f64 - last * c_prime[n - 2]);
        for i in (1..n).rev() {
            d2[i - 1] -= c_prime[i - 1] * d2[i];
        }

        Ok(Self {
            values,
            second_derivatives: d2,
        })
    }
    pub fn values(&self) -> &[f64] {
        &self.values
    }
    pub fn second_derivatives(&self) -> &[f64] {
        &self.second_derivatives
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    /// Evaluates the spline at `x`, with `x` in `[0, N-1]`
    pub fn eval(&self, x: f64) -> f64 {
        let idx = (x.floor() as usize).min(self.len() - 2);
        let delta_0 = x - idx as f64;
        let delta_1 = 1f64 - delta_0;
        let d2_0 = self.second_derivatives[idx] / 6f64;
        let d2_1 = self.second_derivatives[idx + 1] / 6f64;
        d2_0 * delta_1.powi(3)
            + d2_1 * delta_0.powi(3)
            + (self.values[idx] - d2_0) * delta_1
            + (self.values[idx + 1] - d2_1) * delta_0
    }
    pub fn eval_slice(&self, x: &[f64]) -> Vec<f64> {
        x.iter().map(|&x| self.eval(x)).collect()
    }
}
impl AddAssign<f64> for CubicSpline {
    fn add_assign(&mut self, rhs: f64) {
        self.values.iter_mut().for_each(|v| *v += rhs);
    }
}
impl SubAssign<f64> for CubicSpline {
    fn sub_assign(&mut self, rhs: f64) {
        self.values.iter_mut().for_each(|v| *v -= rhs);
    }
}
impl MulAssign<f64> for CubicSpline {
    fn mul_assign(&mut self, rhs: f64) {
        self.values
            .iter_mut()
            .chain(self.second_derivatives.iter_mut())
            .for_each(|v| *v *= rhs);
    }
}
impl DivAssign<f64> for CubicSpline {
    fn div_assign(&mut self, rhs: f64) {
        self.values
            .iter_mut()
            .chain(self.second_derivatives.iter_mut())
            .for_each(|v| *v /= rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn too_few_nodes() {
        assert_eq!(
            CubicSpline::new(vec![1.0], Boundary::default()),
            Err(SplineError::TooFewNodes(1))
        );
    }

    #[test]
    fn linear_natural() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let spline = CubicSpline::new(vec![1.0, 2.0, 3.0, 4.0], Boundary::natural())?;
        for (x, y) in [
            (0.0, 1.0),
            (0.5, 1.5),
            (1.0, 2.0),
            (1.5, 2.5),
            (2.0, 3.0),
            (2.5, 3.5),
            (3.0, 4.0),
        ] {
            assert_relative_eq!(spline.eval(x), y, epsilon = f64::EPSILON * 4.0);
        }
        Ok(())
    }

    #[test]
    fn linear_first_order() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let spline = CubicSpline::new(
            vec![1.0, 2.0, 3.0, 4.0],
            Boundary::FirstOrder {
                left: 1.0,
                right: 1.0,
            },
        )?;
        assert_relative_eq!(spline.eval(0.5), 1.5, epsilon = f64::EPSILON * 4.0);
        assert_relative_eq!(spline.eval(2.5), 3.5, epsilon = f64::EPSILON * 4.0);
        assert_relative_eq!(spline.eval(3.0), 4.0, epsilon = f64::EPSILON * 4.0);
        Ok(())
    }

    #[test]
    fn clamped_two_nodes() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let spline = CubicSpline::new(vec![0.0, 1.0], Boundary::clamped())?;
        assert_relative_eq!(spline.eval(0.25), 0.15625, epsilon = f64::EPSILON * 4.0);
        assert_relative_eq!(spline.eval(0.5), 0.5, epsilon = f64::EPSILON * 4.0);
        assert_relative_eq!(spline.eval(1.0), 1.0, epsilon = f64::EPSILON * 4.0);
        Ok(())
    }

    #[test]
    fn interpolates_nodes() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let values: Vec<f64> = (0..16).map(|i| (i as f64 * 0.3).sin()).collect();
        let spline = CubicSpline::new(values.clone(), Boundary::clamped())?;
        for (i, v) in values.iter().enumerate() {
            assert_relative_eq!(spline.eval(i as f64), *v, epsilon = 1e-14);
        }
        Ok(())
    }

    #[test]
    fn affine() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let values: Vec<f64> = (0..8).map(|i| (i as f64).powi(2)).collect();
        let spline = CubicSpline::new(values, Boundary::default())?;
        let mut scaled = spline.clone();
        scaled *= 3.0;
        scaled += 1.0;
        for x in [0.25, 1.5, 3.75, 6.5] {
            assert_relative_eq!(scaled.eval(x), 3.0 * spline.eval(x) + 1.0, epsilon = 1e-12);
        }
        scaled -= 1.0;
        scaled /= 3.0;
        for x in [0.25, 1.5, 3.75, 6.5] {
            assert_relative_eq!(scaled.eval(x), spline.eval(x), epsilon = 1e-12);
        }
        Ok(())
    }
}
