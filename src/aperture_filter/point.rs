use super::ApertureFilter;

/// Infinitely small aperture
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point;

impl ApertureFilter for Point {
    fn eval(&self, _u: f64) -> f64 {
        1f64
    }
}
