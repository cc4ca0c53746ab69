//! Scintillation weight functions
//!
//! Weight functions relate the vertical profile of the refractive index
//! structure constant `Cn²(h)` to the scintillation indices measured through
//! an aperture with a given spectral response:
//! `s² = ∫ W(h) Cn²(h) dh`.
//!
//! A weight function is built from
//!  - a [spectral filter](spectral_filter), either monochromatic or derived from a
//!    [SpectralResponse] of the optical path,
//!  - an [aperture filter](aperture_filter) describing the pupil,
//!
//! and is precomputed with double exponential quadratures
//! ([WeightFunction], [WeightFunction2d]) or evaluated altitude by altitude for
//! a grid of sub-apertures ([GridWeightFunction]).
//!
//! Units: altitudes in km, wavelengths in nm and aperture scales in mm.

pub mod aperture_filter;
pub mod cubic_spline;
pub mod digital_filter;
pub mod error;
pub mod fft;
pub mod grid_weight_function;
pub mod math;
pub mod quadrature;
pub mod spectral_filter;
pub mod spectral_response;
pub mod uniform_grid;
pub mod weight_function;

pub use aperture_filter::{ApertureFilter, ApertureFilter2d};
pub use cubic_spline::{Boundary, CubicSpline};
pub use digital_filter::DigitalFilter2d;
pub use error::{Error, Result};
pub use grid_weight_function::GridWeightFunction;
pub use spectral_filter::{Polychromatic, SpectralFilter};
pub use spectral_response::SpectralResponse;
pub use uniform_grid::UniformGrid;
pub use weight_function::{WeightFunction, WeightFunction2d};
