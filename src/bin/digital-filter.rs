use anyhow::Context;
use scintillation_weights::{
    aperture_filter::{AngleAveraged, Product, Square},
    math::linspace,
    spectral_filter::Poly,
    ApertureFilter2d, DigitalFilter2d, Polychromatic, SpectralResponse, WeightFunction,
};
use serde::Serialize;
use std::{path::PathBuf, time::Instant};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "digital-filter",
    about = "Weight function of a square aperture followed by a digital filter"
)]
struct Opt {
    /// Spectral response files, stacked together
    #[structopt(parse(from_os_str), required = true)]
    responses: Vec<PathBuf>,
    /// Number of altitude samples between 0 and 30km
    #[structopt(long, default_value = "1024")]
    size: usize,
    /// Size of the filter impulse response along each axis
    #[structopt(long, default_value = "121")]
    impulse_size: usize,
    /// Aperture size [mm]
    #[structopt(short = "D", long, default_value = "11")]
    aperture_scale: f64,
    /// Minimum size of the spectral response Fourier transform
    #[structopt(long, default_value = "4096")]
    fft_size: usize,
    /// Output CSV file
    #[structopt(short, long, parse(from_os_str), default_value = "wf.csv")]
    output: PathBuf,
}

#[derive(Serialize)]
struct Record {
    altitude: f64,
    weight: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let response = SpectralResponse::stack_from_paths(&opt.responses)
        .context("failed to load the spectral responses")?
        .normalized();
    let mut sf = Poly::new(&response, opt.fft_size)
        .context("failed to build the polychromatic spectral filter")?;
    let lambda = sf.equivalent_wavelength();
    sf.normalize();

    let now = Instant::now();
    // whitens the u^(-5/3) spectrum of the square pupil
    let df = DigitalFilter2d::new(
        |ux, uy| (4f64 * (ux * ux + uy * uy)).powf(5f64 / 6f64) / Square.eval_xy(ux, uy),
        [opt.impulse_size, opt.impulse_size],
    )
    .context("failed to compute the digital filter impulse response")?;
    let af = AngleAveraged::new(&Product::new(Square, df), 1024)?;
    let wf = WeightFunction::new(&sf, lambda, &af, opt.aperture_scale, 1025)?;
    log::info!("Weight function computed in {:}ms", now.elapsed().as_millis());

    let altitudes = linspace(0f64, 30f64, opt.size);
    let mut wtr = csv::Writer::from_path(&opt.output)
        .with_context(|| format!("failed to create {:?}", opt.output))?;
    for (altitude, weight) in altitudes.iter().zip(wf.eval_slice(&altitudes)) {
        wtr.serialize(Record {
            altitude: *altitude,
            weight,
        })?;
    }
    wtr.flush()?;

    Ok(())
}
