//! FFTW plan owners
//!
//! Each adapter owns its plans and aligned work buffers, plans are created once
//! for a given shape and released when the adapter is dropped.

use fftw::array::AlignedVec;
use fftw::plan::*;
use fftw::types::*;

#[derive(thiserror::Error, Debug)]
pub enum FftError {
    #[error("FFTW failed")]
    Fftw(#[from] fftw::error::Error),
    #[error("Expected an input of length {expected}, found {actual}")]
    Shape { expected: usize, actual: usize },
    #[error("A type-I cosine transform needs at least 2 samples per axis, found {0:?}")]
    DctSize([usize; 2]),
}
pub type Result<T> = std::result::Result<T, FftError>;

/// 1D real to complex forward transform
pub struct RealToComplex {
    plan: R2CPlan64,
    input: AlignedVec<f64>,
    output: AlignedVec<c64>,
}
impl RealToComplex {
    /// Creates the plan for sequences of length `n`
    pub fn new(n: usize) -> Result<Self> {
        Ok(Self {
            plan: R2CPlan::aligned(&[n], Flag::ESTIMATE)?,
            input: AlignedVec::new(n),
            output: AlignedVec::new(n / 2 + 1),
        })
    }
    pub fn len(&self) -> usize {
        self.input.len()
    }
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }
    /// Returns the `n/2+1` non-negative frequency coefficients of `sequence`
    pub fn forward(&mut self, sequence: &[f64]) -> Result<Vec<c64>> {
        if sequence.len() != self.len() {
            return Err(FftError::Shape {
                expected: self.len(),
                actual: sequence.len(),
            });
        }
        self.input.copy_from_slice(sequence);
        self.plan.r2c(&mut self.input, &mut self.output)?;
        Ok(self.output.to_vec())
    }
}

/// 2D type-I discrete cosine transform (FFTW REDFT00), unnormalized
///
/// The transform is separable: the rows and then the columns of a row-major
/// `nx x ny` array go through 1D REDFT00 plans.
pub struct Dct2d {
    shape: [usize; 2],
    rows: R2RPlan64,
    columns: R2RPlan64,
    row_in: AlignedVec<f64>,
    row_out: AlignedVec<f64>,
    column_in: AlignedVec<f64>,
    column_out: AlignedVec<f64>,
}
impl Dct2d {
    /// Creates the plans for `[nx, ny]` arrays
    pub fn new(shape: [usize; 2]) -> Result<Self> {
        let [nx, ny] = shape;
        if nx < 2 || ny < 2 {
            return Err(FftError::DctSize(shape));
        }
        Ok(Self {
            shape,
            rows: R2RPlan::aligned(&[ny], R2RKind::FFTW_REDFT00, Flag::ESTIMATE)?,
            columns: R2RPlan::aligned(&[nx], R2RKind::FFTW_REDFT00, Flag::ESTIMATE)?,
            row_in: AlignedVec::new(ny),
            row_out: AlignedVec::new(ny),
            column_in: AlignedVec::new(nx),
            column_out: AlignedVec::new(nx),
        })
    }
    pub fn shape(&self) -> [usize; 2] {
        self.shape
    }
    /// Transforms the row-major `data` in place
    pub fn transform(&mut self, data: &mut [f64]) -> Result<()> {
        let [nx, ny] = self.shape;
        if data.len() != nx * ny {
            return Err(FftError::Shape {
                expected: nx * ny,
                actual: data.len(),
            });
        }
        for row in data.chunks_exact_mut(ny) {
            self.row_in.copy_from_slice(row);
            self.rows.r2r(&mut self.row_in, &mut self.row_out)?;
            row.copy_from_slice(&self.row_out);
        }
        for j in 0..ny {
            self.column_in
                .iter_mut()
                .zip(data.iter().skip(j).step_by(ny))
                .for_each(|(c, d)| *c = *d);
            self.columns.r2r(&mut self.column_in, &mut self.column_out)?;
            data.iter_mut()
                .skip(j)
                .step_by(ny)
                .zip(self.column_out.iter())
                .for_each(|(d, c)| *d = *c);
        }
        Ok(())
    }
}
