use anyhow::Context;
use scintillation_weights::{
    aperture_filter::{Annular, Circular},
    spectral_filter::{Mono, Poly},
    ApertureFilter2d, GridWeightFunction, Polychromatic, SpectralFilter, SpectralResponse,
};
use std::{path::PathBuf, time::Instant};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "grid-weight-function",
    about = "Weight functions of a regular grid of sub-apertures"
)]
struct Opt {
    /// Spectral response files, stacked together
    #[structopt(parse(from_os_str))]
    responses: Vec<PathBuf>,
    /// Monochromatic wavelength [nm], used in place of the spectral responses
    #[structopt(long)]
    mono: Option<f64>,
    /// Sub-aperture size [mm]
    #[structopt(short = "D", long, default_value = "11")]
    aperture_scale: f64,
    /// Sub-aperture central obscuration
    #[structopt(long, default_value = "0")]
    obscuration: f64,
    /// Distance between sub-apertures [mm]
    #[structopt(long, default_value = "11")]
    grid_step: f64,
    /// Number of sub-apertures along each axis
    #[structopt(long, default_value = "121")]
    grid_size: usize,
    /// Turbulent layer altitude [km]
    #[structopt(long, default_value = "2")]
    altitude: f64,
    /// Minimum size of the spectral response Fourier transform
    #[structopt(long, default_value = "4096")]
    fft_size: usize,
    /// Output CSV file
    #[structopt(short, long, parse(from_os_str), default_value = "wf.csv")]
    output: PathBuf,
}

fn grid_weights<S, A>(
    spectral_filter: S,
    lambda: f64,
    aperture_filter: A,
    opt: &Opt,
) -> anyhow::Result<Vec<f64>>
where
    S: SpectralFilter,
    A: ApertureFilter2d,
{
    let now = Instant::now();
    let mut gwf = GridWeightFunction::new(
        spectral_filter,
        lambda,
        aperture_filter,
        opt.aperture_scale,
        [opt.grid_size, opt.grid_size],
    )?
    .grid_step(opt.grid_step);
    let weights = gwf.eval(opt.altitude)?;
    log::info!("Grid weight functions computed in {:}ms", now.elapsed().as_millis());
    Ok(weights)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let weights = match opt.mono {
        Some(lambda) if opt.obscuration > 0f64 => {
            grid_weights(Mono, lambda, Annular::new(opt.obscuration), &opt)?
        }
        Some(lambda) => grid_weights(Mono, lambda, Circular, &opt)?,
        None => {
            let response = SpectralResponse::stack_from_paths(&opt.responses)
                .context("failed to load the spectral responses")?
                .normalized();
            let mut sf = Poly::new(&response, opt.fft_size)
                .context("failed to build the polychromatic spectral filter")?;
            let lambda = sf.equivalent_wavelength();
            sf.normalize();
            log::info!("Equivalent wavelength: {:.3}nm", lambda);
            if opt.obscuration > 0f64 {
                grid_weights(sf, lambda, Annular::new(opt.obscuration), &opt)?
            } else {
                grid_weights(sf, lambda, Circular, &opt)?
            }
        }
    };

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&opt.output)
        .with_context(|| format!("failed to create {:?}", opt.output))?;
    for row in weights.chunks(opt.grid_size) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    Ok(())
}
