//! Double exponential quadratures
//!
//! Both integrators sum a trapezoidal rule in the variable `t` of a double
//! exponential change of variable, halving the step at each refinement level
//! and only evaluating the new (odd) nodes.

use std::f64::consts::FRAC_PI_2;

/// Quadrature result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Integral estimate
    pub value: f64,
    /// Difference between the last two refinement levels
    pub error: f64,
    /// Estimate of the integral of the absolute value of the integrand
    pub l1: f64,
    /// Number of refinement levels
    pub levels: usize,
}
impl Estimate {
    pub fn converged(&self, tolerance: f64) -> bool {
        self.error <= tolerance * self.l1
    }
}

/// Default tolerance `ε^(2/3)`
pub fn default_tolerance() -> f64 {
    f64::EPSILON.powf(2f64 / 3f64)
}

/// Largest `t` keeping both `exp(π/2 sinh t)` and its weight finite
fn t_max() -> f64 {
    (0.5 * f64::MAX.ln() / FRAC_PI_2).asinh()
}

/// Trapezoidal refinement in `t` of `term(t) = w(t) f(x(t))`
fn refine<T>(mut term: T, t_max: f64, tolerance: f64, min_levels: usize, max_levels: usize) -> Estimate
where
    T: FnMut(f64) -> f64,
{
    let mut sum = 0f64;
    let mut l1 = 0f64;
    let mut add = |t: f64, sum: &mut f64, l1: &mut f64| {
        let v = term(t);
        *sum += v;
        *l1 += v.abs();
    };

    let mut h = 1f64;
    add(0f64, &mut sum, &mut l1);
    let mut k = 1f64;
    while k * h <= t_max {
        add(k * h, &mut sum, &mut l1);
        add(-k * h, &mut sum, &mut l1);
        k += 1f64;
    }
    let mut estimate = Estimate {
        value: h * sum,
        error: f64::INFINITY,
        l1: h * l1,
        levels: 0,
    };

    for level in 1..=max_levels {
        h *= 0.5;
        let mut k = 1f64;
        while k * h <= t_max {
            add(k * h, &mut sum, &mut l1);
            add(-k * h, &mut sum, &mut l1);
            k += 2f64;
        }
        let value = h * sum;
        estimate = Estimate {
            value,
            error: (value - estimate.value).abs(),
            l1: h * l1,
            levels: level,
        };
        if level >= min_levels && estimate.converged(tolerance) {
            return estimate;
        }
    }
    log::debug!(
        "quadrature stopped after {} levels: error {:e} (L1 {:e})",
        estimate.levels,
        estimate.error,
        estimate.l1
    );
    estimate
}

/// Exp-sinh quadrature over `(0, ∞)`
///
/// The nodes are `x = exp(π/2 sinh t)`, the integrand is never called at `0`
/// or `∞` and a null integrand value is never multiplied by its weight.
#[derive(Debug, Clone, Copy)]
pub struct ExpSinh {
    min_levels: usize,
    max_levels: usize,
    t_max: f64,
}
impl Default for ExpSinh {
    fn default() -> Self {
        Self {
            min_levels: 4,
            max_levels: 9,
            t_max: t_max(),
        }
    }
}
impl ExpSinh {
    pub fn max_levels(self, max_levels: usize) -> Self {
        Self { max_levels, ..self }
    }
    pub fn estimate<F>(&self, mut f: F, tolerance: f64) -> Estimate
    where
        F: FnMut(f64) -> f64,
    {
        refine(
            |t| {
                let x = (FRAC_PI_2 * t.sinh()).exp();
                let y = f(x);
                if y == 0f64 {
                    0f64
                } else {
                    FRAC_PI_2 * t.cosh() * x * y
                }
            },
            self.t_max,
            tolerance,
            self.min_levels,
            self.max_levels,
        )
    }
    pub fn integrate<F>(&self, f: F, tolerance: f64) -> f64
    where
        F: FnMut(f64) -> f64,
    {
        self.estimate(f, tolerance).value
    }
}

/// Tanh-sinh quadrature over `[-1, 1]`
///
/// The integrand receives the node `x` and its signed distance to the closest
/// end point, `1 - x` for positive `x` and `-1 - x` for negative `x`, which is
/// accurate where `x` rounds to `±1`.
#[derive(Debug, Clone, Copy)]
pub struct TanhSinh {
    min_levels: usize,
    max_levels: usize,
    t_max: f64,
}
impl Default for TanhSinh {
    fn default() -> Self {
        Self {
            min_levels: 4,
            max_levels: 15,
            t_max: t_max(),
        }
    }
}
impl TanhSinh {
    pub fn max_levels(self, max_levels: usize) -> Self {
        Self { max_levels, ..self }
    }
    pub fn estimate<F>(&self, mut f: F, tolerance: f64) -> Estimate
    where
        F: FnMut(f64, f64) -> f64,
    {
        refine(
            |t| {
                let s = FRAC_PI_2 * t.abs().sinh();
                let cosh_s = s.cosh();
                let weight = FRAC_PI_2 * t.cosh() / (cosh_s * cosh_s);
                let complement = (-s).exp() / cosh_s;
                if weight == 0f64 || complement == 0f64 {
                    return 0f64;
                }
                let x = s.tanh();
                let y = if t < 0f64 {
                    f(-x, -complement)
                } else {
                    f(x, complement)
                };
                if y == 0f64 {
                    0f64
                } else {
                    weight * y
                }
            },
            self.t_max,
            tolerance,
            self.min_levels,
            self.max_levels,
        )
    }
    pub fn integrate<F>(&self, f: F, tolerance: f64) -> f64
    where
        F: FnMut(f64, f64) -> f64,
    {
        self.estimate(f, tolerance).value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn exp_sinh_exponential() {
        let estimate = ExpSinh::default().estimate(|x| (-x).exp(), default_tolerance());
        assert_relative_eq!(estimate.value, 1.0, max_relative = 1e-12);
        assert!(estimate.converged(default_tolerance()));
    }

    #[test]
    fn exp_sinh_lorentzian() {
        let value = ExpSinh::default().integrate(|x| 1.0 / (1.0 + x * x), default_tolerance());
        assert_relative_eq!(value, PI / 2.0, max_relative = 1e-12);
    }

    #[test]
    fn exp_sinh_singular_origin() {
        // ∫ x^(-1/2) exp(-x) dx = √π
        let value = ExpSinh::default().integrate(|x| (-x).exp() / x.sqrt(), default_tolerance());
        assert_relative_eq!(value, PI.sqrt(), max_relative = 1e-10);
    }

    #[test]
    fn exp_sinh_null() {
        let estimate = ExpSinh::default().estimate(|_| 0.0, default_tolerance());
        assert_eq!(estimate.value, 0.0);
        assert_eq!(estimate.levels, 4);
    }

    #[test]
    fn tanh_sinh_polynomials() {
        let tol = default_tolerance();
        assert_relative_eq!(TanhSinh::default().integrate(|_, _| 1.0, tol), 2.0, max_relative = 1e-14);
        assert_relative_eq!(
            TanhSinh::default().integrate(|x, _| x * x, tol),
            2.0 / 3.0,
            max_relative = 1e-14
        );
    }

    #[test]
    fn tanh_sinh_end_point_singularity() {
        // ∫ (1 - x²)^(-1/2) dx = π, evaluated with the complement near the ends
        let value = TanhSinh::default().integrate(
            |x, xc| {
                let d = if x > 0.0 { xc * (2.0 - xc) } else { -xc * (2.0 + xc) };
                1.0 / d.sqrt()
            },
            default_tolerance(),
        );
        assert_relative_eq!(value, PI, max_relative = 1e-8);
    }

    #[test]
    fn tanh_sinh_complement() {
        TanhSinh::default().integrate(
            |x, xc| {
                if x > 0.0 {
                    assert_relative_eq!(1.0 - x, xc, epsilon = 1e-15);
                } else {
                    assert_relative_eq!(-1.0 - x, xc, epsilon = 1e-15);
                }
                1.0
            },
            default_tolerance(),
        );
    }
}
