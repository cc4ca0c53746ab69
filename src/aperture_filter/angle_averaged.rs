use super::{ApertureFilter, ApertureFilter2d, ApertureFilterError};
use crate::{
    cubic_spline::{Boundary, CubicSpline},
    math::linspace,
    quadrature::{default_tolerance, TanhSinh},
    uniform_grid::UniformGrid,
};
use rayon::prelude::*;
use std::{f64::consts::PI, time::Instant};

type Result<T> = std::result::Result<T, ApertureFilterError>;

/// Azimuthal average of a 2D aperture filter
///
/// The average is tabulated on `z = 1/(1+u)` over `[0, 1]` and interpolated.
#[derive(Debug, Clone)]
pub struct AngleAveraged {
    grid: UniformGrid,
    filter: CubicSpline,
}
impl AngleAveraged {
    pub fn new<A>(aperture_filter: &A, size: usize) -> Result<Self>
    where
        A: ApertureFilter2d + Sync + ?Sized,
    {
        log::info!("Averaging aperture filter over {} nodes...", size);
        let now = Instant::now();
        let values: Vec<f64> = linspace(0f64, 1f64, size)
            .into_par_iter()
            .map(|z| {
                if z == 0f64 {
                    return 0f64;
                }
                let u = (1f64 - z) / z;
                TanhSinh::default().integrate(
                    |t, _| {
                        let (s, c) = (PI * (t + 1f64)).sin_cos();
                        aperture_filter.eval_xy(u * c, u * s)
                    },
                    default_tolerance(),
                ) / 2f64
            })
            .collect();
        let this = Self {
            grid: UniformGrid::new(0f64, 1f64 / (size as f64 - 1f64), size),
            filter: CubicSpline::new(values, Boundary::clamped())?,
        };
        log::info!("... computed in {:}ms", now.elapsed().as_millis());
        Ok(this)
    }
}
impl ApertureFilter for AngleAveraged {
    fn eval(&self, u: f64) -> f64 {
        let z = (1f64 / (1f64 + u) - self.grid.origin()) / self.grid.delta();
        self.filter.eval(z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aperture_filter::{Circular, Gaussian, Square};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn axisymmetric_unchanged() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let af = AngleAveraged::new(&Gaussian, 257)?;
        for u in [0.0, 0.25, 1.0, 2.0] {
            assert_abs_diff_eq!(af.eval(u), Gaussian.eval(u), epsilon = 1e-6);
        }
        let af = AngleAveraged::new(&Circular, 101)?;
        // z = 1/2 is a node
        assert_relative_eq!(af.eval(1.0), Circular.eval(1.0), max_relative = 1e-9);
        Ok(())
    }

    #[test]
    fn square() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let af = AngleAveraged::new(&Square, 65)?;
        assert_relative_eq!(af.eval(0.0), 1.0, max_relative = 1e-12);
        assert_eq!(af.eval(f64::INFINITY), 0.0);
        // the average lies between the values along the axis and the diagonal
        let u = 1.0;
        let diagonal = Square.eval_xy(u / 2f64.sqrt(), u / 2f64.sqrt());
        assert!(af.eval(u) < diagonal);
        assert!(af.eval(u) > Square.eval_xy(u, 0.0));
        Ok(())
    }

    #[test]
    fn too_few_nodes() {
        assert!(matches!(
            AngleAveraged::new(&Circular, 1),
            Err(ApertureFilterError::Spline(_))
        ));
    }
}
