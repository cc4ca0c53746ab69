use crate::{
    aperture_filter::ApertureFilter2d,
    fft::{self, Dct2d},
    math::linspace,
};
use itertools::iproduct;
use std::f64::consts::PI;

/// 2D digital filter with an even impulse response
///
/// The impulse response `h(i, j)`, `i < nx` and `j < ny`, is the type-I
/// cosine transform of the filter kernel sampled over `[0, 1/2]²` and the
/// frequency response is the cosine series
/// `Σ wi wj h(i, j) cos(2π(i ux + j uy))` with `w0 = 1` and `wk = 2` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct DigitalFilter2d {
    // row-major nx x ny
    impulse: Vec<f64>,
    shape: [usize; 2],
}
impl DigitalFilter2d {
    /// Samples the frequency `kernel` and computes the impulse response of shape `[nx, ny]`
    pub fn new<F>(kernel: F, shape: [usize; 2]) -> fft::Result<Self>
    where
        F: Fn(f64, f64) -> f64,
    {
        let [nx, ny] = shape;
        let mut dct = Dct2d::new(shape)?;
        let mut impulse: Vec<f64> = iproduct!(linspace(0f64, 0.5, nx), linspace(0f64, 0.5, ny))
            .map(|(ux, uy)| kernel(ux, uy))
            .collect();
        dct.transform(&mut impulse)?;
        let fft_norm = 1f64 / (4 * (nx - 1) * (ny - 1)) as f64;
        impulse.iter_mut().for_each(|h| *h *= fft_norm);
        Ok(Self { impulse, shape })
    }
    /// Creates the filter from a row-major impulse response
    pub fn from_impulse(impulse: Vec<f64>, shape: [usize; 2]) -> fft::Result<Self> {
        let [nx, ny] = shape;
        if impulse.len() != nx * ny {
            return Err(fft::FftError::Shape {
                expected: nx * ny,
                actual: impulse.len(),
            });
        }
        Ok(Self { impulse, shape })
    }
    pub fn impulse(&self) -> &[f64] {
        &self.impulse
    }
    pub fn shape(&self) -> [usize; 2] {
        self.shape
    }
    /// Evaluates the frequency response at `(ux, uy)`
    pub fn eval(&self, ux: f64, uy: f64) -> f64 {
        let [_, ny] = self.shape;
        if self.impulse.is_empty() {
            return 0f64;
        }
        let (sx, cx) = (2f64 * PI * ux).sin_cos();
        let (sy, cy) = (2f64 * PI * uy).sin_cos();

        let mut response = 0f64;
        // cos(iθx), sin(iθx) by recurrence
        let (mut cix, mut six) = (1f64, 0f64);
        for (i, row) in self.impulse.chunks_exact(ny).enumerate() {
            let i_norm = if i > 0 { 2f64 } else { 1f64 };
            let (mut cjy, mut sjy) = (1f64, 0f64);
            for (j, h) in row.iter().enumerate() {
                let j_norm = if j > 0 { 2f64 } else { 1f64 };
                response += h * i_norm * j_norm * (cix * cjy - six * sjy);
                (cjy, sjy) = (cjy * cy - sjy * sy, sjy * cy + cjy * sy);
            }
            (cix, six) = (cix * cx - six * sx, six * cx + cix * sx);
        }
        response
    }
    /// Spreads the DC impulse coefficient over the impulse response
    ///
    /// The coefficient is added with a `(-1)^(i+j+1)` checkerboard sign and
    /// the DC coefficient is zeroed.
    pub fn mix(&mut self) -> &mut Self {
        let [_, ny] = self.shape;
        let Some(&amplitude) = self.impulse.first() else {
            return self;
        };
        for (k, h) in self.impulse.iter_mut().enumerate() {
            let (i, j) = (k / ny, k % ny);
            if (i + j) % 2 == 1 {
                *h += amplitude;
            } else {
                *h -= amplitude;
            }
        }
        self.impulse[0] = 0f64;
        self
    }
    pub fn mixed(&self) -> Self {
        let mut this = self.clone();
        this.mix();
        this
    }
}
impl ApertureFilter2d for DigitalFilter2d {
    fn eval_xy(&self, ux: f64, uy: f64) -> f64 {
        self.eval(ux, uy)
    }
}
