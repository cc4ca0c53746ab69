use crate::{
    aperture_filter::ApertureFilterError, cubic_spline::SplineError, fft::FftError,
    spectral_filter::SpectralFilterError, spectral_response::SpectralResponseError,
    uniform_grid::GridError, weight_function::WeightFunctionError,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error in the `uniform_grid` module")]
    Grid(#[from] GridError),
    #[error("Error in the `cubic_spline` module")]
    Spline(#[from] SplineError),
    #[error("Error in the `fft` module")]
    Fft(#[from] FftError),
    #[error("Error in the `spectral_response` module")]
    SpectralResponse(#[from] SpectralResponseError),
    #[error("Error in the `spectral_filter` module")]
    SpectralFilter(#[from] SpectralFilterError),
    #[error("Error in the `aperture_filter` module")]
    ApertureFilter(#[from] ApertureFilterError),
    #[error("Error in the `weight_function` module")]
    WeightFunction(#[from] WeightFunctionError),
}
pub type Result<T> = std::result::Result<T, Error>;
