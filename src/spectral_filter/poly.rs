use super::{Polychromatic, SpectralFilter};
use crate::{
    cubic_spline::{Boundary, CubicSpline, SplineError},
    fft::{FftError, RealToComplex},
    math::sinc,
    quadrature::ExpSinh,
    spectral_response::SpectralResponse,
    uniform_grid::UniformGrid,
};
use serde::Serialize;
use std::{f64::consts::PI, path::Path, time::Instant};

#[derive(thiserror::Error, Debug)]
pub enum SpectralFilterError {
    #[error("Spectral response Fourier transform failed")]
    Fft(#[from] FftError),
    #[error("Failed to interpolate the spectral response Fourier transform")]
    Spline(#[from] SplineError),
    #[error("Carrier wavelength {0}nm is outside the spectral response grid")]
    Carrier(f64),
    #[error("Empty spectral response")]
    EmptyResponse,
    #[error("Failed to write the spectral filter")]
    Csv(#[from] csv::Error),
}
type Result<T> = std::result::Result<T, SpectralFilterError>;

#[derive(Serialize)]
struct Record {
    frequency: f64,
    real: f64,
    imag: f64,
}

/// Polychromatic spectral filter
///
/// The filter is built from the Fourier transform of the photon weighted
/// spectral response `F(λ)/λ`, shifted to a carrier wavelength `λc`:
/// `S(x) = (sin(πλc x) Re(x/2) - cos(πλc x) Im(x/2))²`.
/// The real and imaginary parts are interpolated on the reciprocal
/// wavelength grid, the filter is null beyond the last node.
#[derive(Debug, Clone)]
pub struct Poly {
    // reciprocal wavelength grid [1/nm]
    grid: UniformGrid,
    real: CubicSpline,
    imag: CubicSpline,
    carrier: f64,
    equivalent_wavelength: f64,
}
impl Poly {
    /// Builds the filter with the response effective wavelength as carrier
    ///
    /// The response is zero padded to at least `size` samples before the transform.
    pub fn new(response: &SpectralResponse, size: usize) -> Result<Self> {
        if response.grid().is_empty() {
            return Err(SpectralFilterError::EmptyResponse);
        }
        let carrier = response.effective_lambda();
        log::debug!("Effective wavelength: {:.3}nm", carrier);
        Self::with_carrier(response, size, carrier)
    }
    /// Builds the filter with an explicit carrier wavelength
    pub fn with_carrier(response: &SpectralResponse, size: usize, carrier: f64) -> Result<Self> {
        let grid = response.grid();
        if grid.is_empty() {
            return Err(SpectralFilterError::EmptyResponse);
        }
        if carrier.is_nan() || carrier < grid.origin() || grid.to_index(carrier) >= grid.size() {
            return Err(SpectralFilterError::Carrier(carrier));
        }
        log::info!("Building polychromatic filter of {}...", grid);
        let now = Instant::now();

        let carrier_idx = grid.to_index(carrier);
        let padded = grid.size().max(size);
        let mut weighted = vec![0f64; padded];
        weighted
            .iter_mut()
            .zip(response.data().iter().zip(grid.values()))
            .for_each(|(w, (d, l))| *w = d / l);
        // circular shift bringing the carrier to the origin
        let sequence: Vec<f64> = weighted
            .iter()
            .cycle()
            .skip(carrier_idx)
            .take(padded)
            .cloned()
            .collect();
        let mut spectrum = RealToComplex::new(padded)?.forward(&sequence)?;
        if let Some(last) = spectrum.last_mut() {
            last.re = 0f64;
            last.im = 0f64;
        }

        let (re, im): (Vec<f64>, Vec<f64>) = spectrum.iter().map(|c| (c.re, c.im)).unzip();
        let mut this = Self {
            grid: UniformGrid::new(0f64, 1f64 / (grid.delta() * padded as f64), spectrum.len()),
            real: CubicSpline::new(re, Boundary::clamped())?,
            imag: CubicSpline::new(im, Boundary::natural())?,
            carrier: grid.value(carrier_idx),
            equivalent_wavelength: f64::NAN,
        };
        this.equivalent_wavelength = this.compute_equivalent_wavelength();
        log::info!(
            "... carrier: {:.3}nm, equivalent wavelength: {:.3}nm, computed in {:}ms",
            this.carrier,
            this.equivalent_wavelength,
            now.elapsed().as_millis()
        );
        Ok(this)
    }
    // λ0 = 3.28 (∫ x^(-11/6) S(x) dx)^(-6/7)
    fn compute_equivalent_wavelength(&self) -> f64 {
        let integral = ExpSinh::default().integrate(
            |x| {
                if x == 0f64 || x.is_infinite() {
                    0f64
                } else if x < 1f64 {
                    x.powf(1f64 / 6f64) * self.regular(x)
                } else {
                    x.powf(-11f64 / 6f64) * self.eval(x)
                }
            },
            f64::EPSILON.sqrt(),
        );
        3.28 * integral.powf(-6f64 / 7f64)
    }
    pub fn grid(&self) -> &UniformGrid {
        &self.grid
    }
    pub fn real(&self) -> &CubicSpline {
        &self.real
    }
    pub fn imag(&self) -> &CubicSpline {
        &self.imag
    }
    pub fn carrier(&self) -> f64 {
        self.carrier
    }
    pub fn normalized(&self) -> Self {
        let mut this = self.clone();
        this.normalize();
        this
    }
    /// Writes the reciprocal wavelength grid and the Fourier transform nodes as CSV
    pub fn dump<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        for ((frequency, &real), &imag) in self
            .grid
            .values()
            .zip(self.real.values())
            .zip(self.imag.values())
        {
            wtr.serialize(Record {
                frequency,
                real,
                imag,
            })?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }
    // spline argument of x = u²/λ
    fn node(&self, ax: f64) -> f64 {
        (ax / 2f64 - self.grid.origin()) / self.grid.delta()
    }
}
impl SpectralFilter for Poly {
    fn eval(&self, x: f64) -> f64 {
        let ax = x.abs();
        if self.grid.last() <= ax {
            return 0f64;
        }
        let cx = ax * PI * self.carrier;
        let dx = self.node(ax);
        // FFTW forward transform sign convention
        (cx.sin() * self.real.eval(dx) - cx.cos() * self.imag.eval(dx)).powi(2)
    }
    fn regular(&self, x: f64) -> f64 {
        let ax = x.abs();
        if self.grid.last() <= ax {
            return 0f64;
        }
        let c = PI * self.carrier;
        let cx = ax * c;
        let dx = self.node(ax);
        // Im vanishes at the origin, Im(dx)/x is expanded on the first interval
        let im = if dx < 1f64 {
            (self.imag.values()[1] + self.imag.second_derivatives()[1] * (dx * dx - 1f64) / 6f64)
                / (self.grid.delta() * 2f64)
        } else {
            self.imag.eval(dx) / ax
        };
        (c * sinc(cx) * self.real.eval(dx) - cx.cos() * im).powi(2)
    }
}
impl Polychromatic for Poly {
    fn equivalent_wavelength(&self) -> f64 {
        self.equivalent_wavelength
    }
    fn normalize(&mut self) -> &mut Self {
        let lambda_0 = self.equivalent_wavelength;
        self.grid *= lambda_0;
        self.carrier /= lambda_0;
        self.equivalent_wavelength /= lambda_0;
        self.real *= lambda_0;
        self.imag *= lambda_0;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral_filter::Mono;
    use approx::assert_abs_diff_eq;

    fn spike(lambda: f64) -> SpectralResponse {
        let grid = UniformGrid::new(400.0, 1.0, 201);
        let data = grid.values().map(|l| if l == lambda { 1.0 } else { 0.0 }).collect();
        SpectralResponse::new(grid, data).unwrap()
    }

    fn slab(from: f64, to: f64) -> SpectralResponse {
        let grid = UniformGrid::new(400.0, 1.0, 201);
        let data = grid
            .values()
            .map(|l| if (from..=to).contains(&l) { 1.0 } else { 0.0 })
            .collect();
        SpectralResponse::new(grid, data).unwrap().normalized()
    }

    #[test]
    fn spike_is_monochromatic() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let sf = Poly::new(&spike(500.0).normalized(), 1024)?;
        assert_eq!(sf.carrier(), 500.0);
        assert_eq!(sf.grid().size(), 513);
        assert_abs_diff_eq!(sf.equivalent_wavelength(), 500.0, epsilon = 2.5);
        let sf = sf.normalized();
        assert_abs_diff_eq!(sf.equivalent_wavelength(), 1.0, epsilon = 1e-12);
        for x in [0.05, 0.25, 0.5, 0.75] {
            assert_abs_diff_eq!(sf.eval(x), Mono.eval(x), epsilon = 1e-2);
            assert_abs_diff_eq!(sf.regular(x), Mono.regular(x), epsilon = 5e-2);
        }
        Ok(())
    }

    #[test]
    fn wide_band() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let response = slab(450.0, 550.0);
        let sf = Poly::new(&response, 1024)?;
        assert_eq!(sf.carrier(), response.effective_lambda().floor());
        assert!(sf.equivalent_wavelength() > 500.0 && sf.equivalent_wavelength() < 550.0);
        Ok(())
    }

    #[test]
    fn explicit_carrier() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let response = slab(450.0, 550.0);
        let sf = Poly::with_carrier(&response, 512, 480.5)?;
        assert_eq!(sf.carrier(), 480.0);
        assert!(matches!(
            Poly::with_carrier(&response, 512, 700.0),
            Err(SpectralFilterError::Carrier(_))
        ));
        assert!(matches!(
            Poly::with_carrier(&response, 512, 300.0),
            Err(SpectralFilterError::Carrier(_))
        ));
        Ok(())
    }

    #[test]
    fn empty_response() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let response = SpectralResponse::new(UniformGrid::default(), vec![])?;
        assert!(matches!(
            Poly::new(&response, 16),
            Err(SpectralFilterError::EmptyResponse)
        ));
        Ok(())
    }

    #[test]
    fn normalize_twice() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut sf = Poly::new(&slab(450.0, 550.0), 1024)?;
        sf.normalize();
        let once = (sf.grid().delta(), sf.carrier(), sf.eval(0.3), sf.regular(0.3));
        sf.normalize();
        assert_eq!(sf.equivalent_wavelength(), 1.0);
        assert_eq!(sf.grid().delta(), once.0);
        assert_eq!(sf.carrier(), once.1);
        assert_eq!(sf.eval(0.3), once.2);
        assert_eq!(sf.regular(0.3), once.3);
        Ok(())
    }

    #[test]
    fn null_beyond_grid() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let sf = Poly::new(&slab(450.0, 550.0), 256)?;
        let last = sf.grid().last();
        assert_eq!(sf.eval(last), 0.0);
        assert_eq!(sf.eval(-2.0 * last), 0.0);
        assert_eq!(sf.regular(last * 1.5), 0.0);
        assert_eq!(sf.eval(0.0), 0.0);
        Ok(())
    }

    #[test]
    fn dump() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let sf = Poly::new(&slab(450.0, 550.0), 64)?;
        let path = std::env::temp_dir().join(format!(
            "scintillation-weights_poly_dump_{}.csv",
            std::process::id()
        ));
        sf.dump(&path)?;
        let mut rdr = csv::Reader::from_path(&path)?;
        assert_eq!(rdr.headers()?, vec!["frequency", "real", "imag"]);
        assert_eq!(rdr.records().count(), sf.grid().size());
        Ok(())
    }
}
