use std::{
    fmt,
    ops::{Add, Div, DivAssign, Mul, MulAssign, Sub},
};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GridError {
    #[error("Non uniform input grid at position {index}, actual value {actual}, expected {expected}")]
    NonUniform {
        index: usize,
        actual: f64,
        expected: f64,
    },
    #[error("Mismatched grids")]
    Mismatched,
}
type Result<T> = std::result::Result<T, GridError>;

/// Uniformly spaced 1D sample grid
///
/// The sample `i` is located at `origin + i * delta`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformGrid {
    origin: f64,
    delta: f64,
    size: usize,
}
impl Default for UniformGrid {
    fn default() -> Self {
        Self {
            origin: 0f64,
            delta: 1f64,
            size: 0,
        }
    }
}
impl UniformGrid {
    pub fn new(origin: f64, delta: f64, size: usize) -> Self {
        Self {
            origin,
            delta,
            size,
        }
    }
    pub fn origin(&self) -> f64 {
        self.origin
    }
    pub fn delta(&self) -> f64 {
        self.delta
    }
    pub fn size(&self) -> usize {
        self.size
    }
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
    /// Returns the value of the sample `i`
    pub fn value(&self, i: usize) -> f64 {
        self.origin + i as f64 * self.delta
    }
    /// Returns the value of the last sample
    pub fn last(&self) -> f64 {
        self.value(self.size.saturating_sub(1))
    }
    /// Iterator over the grid sample values
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.size).map(move |i| self.value(i))
    }
    /// Returns the index of the sample at or below `value`
    pub fn to_index(&self, value: f64) -> usize {
        ((value - self.origin) / self.delta).floor() as usize
    }
    /// Checks if both grids share the same spacing and the same phase
    pub fn matches(&self, other: &UniformGrid) -> bool {
        self.delta == other.delta && self.origin % self.delta == other.origin % other.delta
    }
    /// Returns the overlap of two matching grids
    ///
    /// The overlap is expressed on the lattice of the grid with the larger origin
    /// and is empty if the grids do not overlap.
    pub fn intersect(&self, other: &UniformGrid) -> Result<UniformGrid> {
        if other.origin < self.origin {
            return other.intersect(self);
        }
        if !self.matches(other) {
            return Err(GridError::Mismatched);
        }
        let size = if self.is_empty() || other.is_empty() || self.last() < other.origin {
            0
        } else {
            ((self.last().min(other.last()) - other.origin) / other.delta).floor() as usize + 1
        };
        Ok(UniformGrid::new(other.origin, other.delta, size))
    }
}
impl TryFrom<&[f64]> for UniformGrid {
    type Error = GridError;

    fn try_from(sequence: &[f64]) -> Result<Self> {
        match sequence {
            [] => Ok(Self::default()),
            [origin] => Ok(Self::new(*origin, 1f64, 1)),
            [origin, next, tail @ ..] => {
                let grid = Self::new(*origin, next - origin, sequence.len());
                tail.iter()
                    .enumerate()
                    .map(|(i, actual)| (i + 2, *actual))
                    .try_for_each(|(index, actual)| {
                        // no tolerance: the spacing must match to the last bit
                        let expected = grid.value(index);
                        if actual != expected {
                            Err(GridError::NonUniform {
                                index,
                                actual,
                                expected,
                            })
                        } else {
                            Ok(())
                        }
                    })?;
                Ok(grid)
            }
        }
    }
}
impl TryFrom<Vec<f64>> for UniformGrid {
    type Error = GridError;

    fn try_from(sequence: Vec<f64>) -> Result<Self> {
        Self::try_from(sequence.as_slice())
    }
}
impl Add<f64> for UniformGrid {
    type Output = UniformGrid;

    fn add(self, rhs: f64) -> Self::Output {
        Self {
            origin: self.origin + rhs,
            ..self
        }
    }
}
impl Sub<f64> for UniformGrid {
    type Output = UniformGrid;

    fn sub(self, rhs: f64) -> Self::Output {
        Self {
            origin: self.origin - rhs,
            ..self
        }
    }
}
impl Mul<f64> for UniformGrid {
    type Output = UniformGrid;

    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            origin: self.origin * rhs,
            delta: self.delta * rhs,
            ..self
        }
    }
}
impl Div<f64> for UniformGrid {
    type Output = UniformGrid;

    fn div(self, rhs: f64) -> Self::Output {
        Self {
            origin: self.origin / rhs,
            delta: self.delta / rhs,
            ..self
        }
    }
}
impl MulAssign<f64> for UniformGrid {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}
impl DivAssign<f64> for UniformGrid {
    fn div_assign(&mut self, rhs: f64) {
        *self = *self / rhs;
    }
}
impl fmt::Display for UniformGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}:{}:{}] ({})",
            self.origin,
            self.delta,
            self.last(),
            self.size
        )
    }
}
