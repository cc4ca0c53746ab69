use scilib::math::bessel;
use std::f64::consts::{FRAC_PI_4, PI};

/// Scale of the Kolmogorov refractive index power spectrum
pub const KOLMOGOROV_CN2_SCALE: f64 = 0.009_693_150_704_312_342;

/// `sin(x)/x`, 1 at 0 and 0 at infinity
pub fn sinc(x: f64) -> f64 {
    if x.is_infinite() {
        0f64
    } else if x.abs() < f64::EPSILON.powf(0.25) {
        1f64 - x * x / 6f64
    } else {
        x.sin() / x
    }
}

// Hankel expansion is used above this argument
const BESSEL_ASYMPTOTIC: f64 = 12f64;

/// Bessel function of the first kind of order 1
pub fn j1(x: f64) -> f64 {
    if x.abs() < BESSEL_ASYMPTOTIC {
        return bessel::j_n(1, x);
    }
    if x < 0f64 {
        return -j1(-x);
    }
    // P and Q series of the Hankel expansion, truncated at the smallest term
    let mu = 4f64;
    let z = 8f64 * x;
    let (mut p, mut q) = (1f64, 0f64);
    let mut term = 1f64;
    for k in 1..64 {
        let next = term * (mu - ((2 * k - 1) as f64).powi(2)) / (k as f64 * z);
        if next.abs() >= term.abs() || next.abs() < f64::EPSILON * 1e-2 {
            break;
        }
        term = next;
        let sign = if (k / 2) % 2 == 0 { 1f64 } else { -1f64 };
        if k % 2 == 0 {
            p += sign * term;
        } else {
            q += sign * term;
        }
    }
    let chi = x - 3f64 * FRAC_PI_4;
    (2f64 / (PI * x)).sqrt() * (p * chi.cos() - q * chi.sin())
}

/// `2 J1(x)/x`, 1 at 0 and 0 at infinity
pub fn jinc(x: f64) -> f64 {
    if x.is_infinite() {
        0f64
    } else if x.abs() < 3.7 * f64::EPSILON.powf(0.25) {
        1f64 - x * x / 8f64
    } else {
        2f64 * j1(x) / x
    }
}

/// `n` evenly spaced samples over `[start, end]`
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + i as f64 * step })
                .collect()
        }
    }
}
