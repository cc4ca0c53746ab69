use super::ApertureFilter2d;
use crate::math::sinc;
use std::f64::consts::PI;

/// Square aperture, `(sinc(πux) sinc(πuy))²`
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Square;

impl ApertureFilter2d for Square {
    fn eval_xy(&self, ux: f64, uy: f64) -> f64 {
        (sinc(PI * ux) * sinc(PI * uy)).powi(2)
    }
}
