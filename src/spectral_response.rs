use crate::uniform_grid::{GridError, UniformGrid};
use serde::Deserialize;
use std::{fs::File, path::Path, time::Instant};

#[derive(thiserror::Error, Debug)]
pub enum SpectralResponseError {
    #[error("Failed to open the spectral response file")]
    Io(#[from] std::io::Error),
    #[error("Failed to read the spectral response file")]
    Csv(#[from] csv::Error),
    #[error("Invalid wavelength grid")]
    Grid(#[from] GridError),
    #[error("Wavelength grid of size {grid} and response of size {data} do not match")]
    Length { grid: usize, data: usize },
    #[error("No spectral response file to stack")]
    Empty,
}
type Result<T> = std::result::Result<T, SpectralResponseError>;

#[derive(Deserialize, Debug)]
struct Record {
    // wavelength [nm]
    wavelength: f64,
    response: f64,
}

/// Spectral response sampled on a uniform wavelength grid
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralResponse {
    // wavelength grid [nm]
    grid: UniformGrid,
    data: Vec<f64>,
}
impl SpectralResponse {
    pub fn new(grid: UniformGrid, data: Vec<f64>) -> Result<Self> {
        if grid.size() != data.len() {
            return Err(SpectralResponseError::Length {
                grid: grid.size(),
                data: data.len(),
            });
        }
        Ok(Self { grid, data })
    }
    /// Loads a response from a file of space separated `wavelength response` lines
    ///
    /// Lines starting with `#` are skipped, the wavelengths must be uniformly spaced.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        log::info!("Loading {:?}...", path.as_ref());
        let now = Instant::now();
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(file);
        let mut wavelength = vec![];
        let mut data = vec![];
        for result in rdr.records() {
            // consecutive spaces yield empty fields
            let record: csv::StringRecord = result?.iter().filter(|f| !f.is_empty()).collect();
            if record.is_empty() {
                continue;
            }
            let record: Record = record.deserialize(None)?;
            wavelength.push(record.wavelength);
            data.push(record.response);
        }
        let this = Self::new(UniformGrid::try_from(wavelength)?, data)?;
        log::info!(
            "... {} loaded in {:}ms",
            this.grid,
            now.elapsed().as_millis()
        );
        Ok(this)
    }
    /// Loads and stacks the responses of several files
    pub fn stack_from_paths<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        paths
            .into_iter()
            .try_fold(None, |acc: Option<Self>, path| -> Result<Option<Self>> {
                let mut response = Self::from_path(path)?;
                if let Some(acc) = acc {
                    response.stack(&acc)?;
                }
                Ok(Some(response))
            })?
            .ok_or(SpectralResponseError::Empty)
    }
    pub fn grid(&self) -> &UniformGrid {
        &self.grid
    }
    pub fn data(&self) -> &[f64] {
        &self.data
    }
    /// Scales the response to a unit sum
    pub fn normalize(&mut self) -> &mut Self {
        let norm: f64 = self.data.iter().sum();
        self.data.iter_mut().for_each(|v| *v /= norm);
        self
    }
    pub fn normalized(&self) -> Self {
        let mut this = self.clone();
        this.normalize();
        this
    }
    /// Multiplies both responses over the overlap of their wavelength grids
    pub fn stack(&mut self, other: &SpectralResponse) -> Result<()> {
        let grid = self.grid.intersect(&other.grid)?;
        let data: Vec<f64> = if grid.is_empty() {
            vec![]
        } else {
            let idx = self.grid.to_index(grid.origin());
            let other_idx = other.grid.to_index(grid.origin());
            self.data[idx..idx + grid.size()]
                .iter()
                .zip(&other.data[other_idx..other_idx + grid.size()])
                .map(|(a, b)| a * b)
                .collect()
        };
        self.grid = grid;
        self.data = data;
        Ok(())
    }
    pub fn stacked(&self, other: &SpectralResponse) -> Result<Self> {
        let mut this = self.clone();
        this.stack(other)?;
        Ok(this)
    }
    /// Photon weighted mean wavelength
    pub fn effective_lambda(&self) -> f64 {
        let (num, den) = self
            .data
            .iter()
            .zip(self.grid.values())
            .enumerate()
            .fold((0f64, 0f64), |(num, den), (i, (d, l))| {
                let w = d / l;
                (num + i as f64 * w, den + w)
            });
        self.grid.origin() + self.grid.delta() * num / den
    }
}
