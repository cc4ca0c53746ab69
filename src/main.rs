use anyhow::Context;
use scintillation_weights::{
    aperture_filter::{Annular, Circular, Gaussian, Point, Square},
    math::linspace,
    spectral_filter::{Mono, Poly},
    Polychromatic, SpectralFilter, SpectralResponse, WeightFunction, WeightFunction2d,
};
use serde::Serialize;
use std::{fs::File, io, path::PathBuf};
use strum_macros::{Display, EnumIter, EnumString};
use structopt::StructOpt;

#[derive(Debug, Clone, Copy, PartialEq, EnumString, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
enum Aperture {
    Point,
    Circular,
    Annular,
    Square,
    Gaussian,
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "weight-function",
    about = "Scintillation weight function of an aperture"
)]
struct Opt {
    /// Spectral response files, stacked together
    #[structopt(parse(from_os_str))]
    responses: Vec<PathBuf>,
    /// Monochromatic wavelength [nm], used in place of the spectral responses
    #[structopt(long)]
    mono: Option<f64>,
    /// Aperture shape: point, circular, annular, square or gaussian
    #[structopt(short, long, default_value = "circular")]
    aperture: Aperture,
    /// Aperture size [mm]
    #[structopt(short = "D", long, default_value = "10")]
    aperture_scale: f64,
    /// Central obscuration of the annular aperture
    #[structopt(long, default_value = "0")]
    obscuration: f64,
    /// Number of nodes of the weight function interpolant
    #[structopt(long, default_value = "1025")]
    size: usize,
    /// Minimum size of the spectral response Fourier transform
    #[structopt(long, default_value = "4096")]
    fft_size: usize,
    /// Highest altitude [km]
    #[structopt(long, default_value = "30")]
    max_altitude: f64,
    /// Number of altitude samples
    #[structopt(short = "n", long, default_value = "301")]
    samples: usize,
    /// Output CSV file, standard output if not given
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct Record {
    // altitude [km]
    altitude: f64,
    weight: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let (spectral_filter, lambda) = match opt.mono {
        Some(lambda) => (Box::new(Mono) as Box<dyn SpectralFilter + Sync>, lambda),
        None => {
            let response = SpectralResponse::stack_from_paths(&opt.responses)
                .context("failed to load the spectral responses")?
                .normalized();
            let mut poly = Poly::new(&response, opt.fft_size)
                .context("failed to build the polychromatic spectral filter")?;
            let lambda = poly.equivalent_wavelength();
            poly.normalize();
            (Box::new(poly) as Box<dyn SpectralFilter + Sync>, lambda)
        }
    };
    log::info!("Equivalent wavelength: {:.3}nm", lambda);

    let sf = spectral_filter.as_ref();
    let d = opt.aperture_scale;
    let altitudes = linspace(0f64, opt.max_altitude, opt.samples);
    let weights = match opt.aperture {
        Aperture::Point => {
            WeightFunction::new(sf, lambda, &Point, d, opt.size)?.eval_slice(&altitudes)
        }
        Aperture::Circular => {
            WeightFunction::new(sf, lambda, &Circular, d, opt.size)?.eval_slice(&altitudes)
        }
        Aperture::Annular => {
            let af = Annular::new(opt.obscuration);
            WeightFunction::new(sf, lambda, &af, d, opt.size)?.eval_slice(&altitudes)
        }
        Aperture::Gaussian => {
            WeightFunction::new(sf, lambda, &Gaussian, d, opt.size)?.eval_slice(&altitudes)
        }
        Aperture::Square => {
            WeightFunction2d::new(sf, lambda, &Square, d, opt.size)?.eval_slice(&altitudes)
        }
    };

    let writer: Box<dyn io::Write> = match &opt.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("failed to create {:?}", path))?,
        ),
        None => Box::new(io::stdout()),
    };
    let mut wtr = csv::Writer::from_writer(writer);
    for (altitude, weight) in altitudes.into_iter().zip(weights) {
        wtr.serialize(Record { altitude, weight })?;
    }
    wtr.flush()?;

    Ok(())
}
