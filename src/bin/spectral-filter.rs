use anyhow::Context;
use scintillation_weights::{spectral_filter::Poly, Polychromatic, SpectralResponse};
use std::{path::PathBuf, time::Instant};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "spectral-filter",
    about = "Polychromatic spectral filter of stacked spectral responses"
)]
struct Opt {
    /// Spectral response files, stacked together
    #[structopt(parse(from_os_str), required = true)]
    responses: Vec<PathBuf>,
    /// Minimum size of the spectral response Fourier transform
    #[structopt(long, default_value = "4096")]
    fft_size: usize,
    /// Carrier wavelength [nm], the effective wavelength if not given
    #[structopt(long)]
    carrier: Option<f64>,
    /// Rescales the filter to a unit equivalent wavelength
    #[structopt(long)]
    normalize: bool,
    /// Writes the filter Fourier transform to this CSV file
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let now = Instant::now();
    let response = SpectralResponse::stack_from_paths(&opt.responses)
        .context("failed to load the spectral responses")?
        .normalized();
    let effective_lambda = response.effective_lambda();
    log::info!("Effective wavelength: {:.3}nm", effective_lambda);

    let mut poly = match opt.carrier {
        Some(carrier) => Poly::with_carrier(&response, opt.fft_size, carrier),
        None => Poly::new(&response, opt.fft_size),
    }
    .context("failed to build the polychromatic spectral filter")?;
    let carrier = poly.carrier();
    log::debug!("Carrier wavelength: {:.3}nm", carrier);
    let equivalent_lambda = poly.equivalent_wavelength();
    log::info!("Equivalent wavelength: {:.3}nm", equivalent_lambda);
    if opt.normalize {
        poly.normalize();
    }
    log::info!("Spectral filter computed in {:}ms", now.elapsed().as_millis());

    println!("Spectral response: {}", response.grid());
    println!(" . effective wavelength : {:8.3}nm", effective_lambda);
    println!(" . carrier wavelength   : {:8.3}nm", carrier);
    println!(" . equivalent wavelength: {:8.3}nm", equivalent_lambda);
    println!(
        " . Fourier transform    : {} nodes up to {:.3e}{}",
        poly.grid().size(),
        poly.grid().last(),
        if opt.normalize { "" } else { "nm^-1" }
    );

    if let Some(path) = &opt.output {
        poly.dump(path)
            .with_context(|| format!("failed to write {:?}", path))?;
        log::info!("Spectral filter written to {:?}", path);
    }

    Ok(())
}
