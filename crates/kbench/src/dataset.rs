//! Synthetic integer datasets for the clustering candidates.
//!
//! One point per line, coordinates separated by single spaces.

use crate::error::{BenchError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Shape and value range of a generated dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSpec {
    pub points: u64,
    pub dimensions: u32,
    /// Coordinates are drawn uniformly from `0..=max_value`.
    pub max_value: u32,
}

impl DatasetSpec {
    pub fn validate(&self) -> Result<()> {
        if self.points == 0 || self.dimensions == 0 || self.max_value == 0 {
            return Err(BenchError::InvalidConfig(
                "points, dimensions and max value must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Write `spec.points` random points to `out`.
pub fn write_dataset<W: Write, R: Rng>(spec: &DatasetSpec, rng: &mut R, out: W) -> Result<()> {
    spec.validate()?;

    let mut out = BufWriter::new(out);
    for _ in 0..spec.points {
        for d in 0..spec.dimensions {
            let value = rng.gen_range(0..=spec.max_value);
            let sep = if d + 1 == spec.dimensions { '\n' } else { ' ' };
            write!(out, "{value}{sep}")?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Generate a dataset file. A fixed `seed` makes the output reproducible.
pub fn generate_dataset(spec: &DatasetSpec, path: &Path, seed: Option<u64>) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(
        path = %path.display(),
        points = spec.points,
        dimensions = spec.dimensions,
        max_value = spec.max_value,
        "Generating dataset"
    );
    let file = File::create(path)?;
    write_dataset(spec, &mut rng, file)?;
    info!(path = %path.display(), "Dataset generated");
    Ok(())
}
