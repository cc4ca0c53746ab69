//! Weight functions of the MASS scintillation sensor
//!
//! The four concentric apertures A, B, C and D of the Multi-Aperture
//! Scintillation Sensor give 4 normal and 6 differential scintillation
//! indices. Each one is the weight function of the cross filter of a pair of
//! annular apertures, magnified to the telescope entrance pupil.

use anyhow::Context;
use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;
use scintillation_weights::{
    aperture_filter::CrossAnnular, math::linspace, spectral_filter::Poly, Polychromatic,
    SpectralResponse, WeightFunction,
};
use std::{path::PathBuf, time::Instant};
use structopt::StructOpt;

// aperture inner and outer diameters [mm]
const INNER: [f64; 4] = [0.00, 1.30, 2.20, 3.90];
const OUTER: [f64; 4] = [1.27, 2.15, 3.85, 5.50];
const NAMES: [&str; 4] = ["A", "B", "C", "D"];

#[derive(Debug, StructOpt)]
#[structopt(name = "mass", about = "MASS scintillation weight functions")]
struct Opt {
    /// Spectral response files, stacked together
    #[structopt(parse(from_os_str), required = true)]
    responses: Vec<PathBuf>,
    /// Number of altitude samples between 0 and 30km
    #[structopt(long, default_value = "1024")]
    size: usize,
    /// Magnification from the apertures to the entrance pupil
    #[structopt(long, default_value = "16.2")]
    magnification: f64,
    /// Number of nodes of the weight function interpolants
    #[structopt(long, default_value = "1025")]
    nodes: usize,
    /// Minimum size of the spectral response Fourier transform
    #[structopt(long, default_value = "4096")]
    fft_size: usize,
    /// Output CSV file
    #[structopt(short, long, parse(from_os_str), default_value = "weights.csv")]
    output: PathBuf,
}

/// Aperture pairs `(i, j)` with `j <= i`, normal indices on the diagonal
fn pairs() -> Vec<(usize, usize)> {
    (0..INNER.len())
        .flat_map(|i| (0..=i).map(move |j| (i, j)))
        .collect()
}

/// Cross filter of apertures `i` and `j`, scaled by the outer diameter of `i`
fn cross_filter(i: usize, j: usize) -> (CrossAnnular, f64) {
    (
        CrossAnnular::new(OUTER[j] / OUTER[i], INNER[i] / OUTER[i], INNER[j] / OUTER[j]),
        OUTER[i],
    )
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
    log::info!("Equivalent wavelength: {:.3}nm", lambda);

    let now = Instant::now();
    let pairs = pairs();
    let pb = ProgressBar::new(pairs.len() as u64);
    let weight_functions = pairs
        .par_iter()
        .progress_with(pb)
        .map(|&(i, j)| {
            let (af, diameter) = cross_filter(i, j);
            WeightFunction::new(&sf, lambda, &af, diameter * opt.magnification, opt.nodes)
        })
        .collect::<Result<Vec<_>, _>>()?;
    log::info!(
        "{} weight functions computed in {:}ms",
        weight_functions.len(),
        now.elapsed().as_millis()
    );

    let altitudes = linspace(0f64, 30f64, opt.size);
    let weights: Vec<Vec<f64>> = weight_functions
        .iter()
        .map(|wf| wf.eval_slice(&altitudes))
        .collect();

    let mut wtr = csv::Writer::from_path(&opt.output)
        .with_context(|| format!("failed to create {:?}", opt.output))?;
    let mut header = vec!["altitude".to_string()];
    header.extend(
        pairs
            .iter()
            .map(|&(i, j)| format!("{}{}", NAMES[i], if i == j { "" } else { NAMES[j] })),
    );
    wtr.write_record(&header)?;
    for (k, altitude) in altitudes.iter().enumerate() {
        let mut record = vec![altitude.to_string()];
        record.extend(weights.iter().map(|w| w[k].to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use scintillation_weights::{aperture_filter::Annular, spectral_filter::Mono, ApertureFilter};

    #[test]
    fn aperture_pairs() {
        let pairs = pairs();
        assert_eq!(pairs.len(), 10);
        assert_eq!(pairs.iter().filter(|(i, j)| i == j).count(), 4);
        assert!(pairs.iter().all(|(i, j)| j <= i));
    }

    #[test]
    fn normal_filters_are_annular() {
        for i in 0..4 {
            let (cross, diameter) = cross_filter(i, i);
            assert_eq!(diameter, OUTER[i]);
            let annular = Annular::new(INNER[i] / OUTER[i]);
            for u in [0.0, 0.3, 1.1, 2.7] {
                assert_abs_diff_eq!(cross.eval(u), annular.eval(u), epsilon = 1e-15);
            }
        }
    }

    #[test]
    fn finite_weights() -> std::result::Result<(), Box<dyn std::error::Error>> {
        for (i, j) in pairs() {
            let (af, diameter) = cross_filter(i, j);
            assert_eq!(af.eval(f64::INFINITY), 0.0);
            let wf = WeightFunction::new(&Mono, 500.0, &af, diameter * 16.2, 33)?;
            for altitude in [0.5, 2.0, 8.0, 30.0] {
                let weight = wf.eval(altitude);
                assert!(weight.is_finite(), "{}{}: {}", NAMES[i], NAMES[j], weight);
                if i == j {
                    assert!(weight > 0.0);
                }
            }
        }
        Ok(())
    }
}
