// ============================================================
// Layer 6 — Schedule Logger
// ============================================================
// Records the learning rate of every step to a CSV file so a
// schedule can be plotted before committing to a training run.
//
// Output file: <dir>/schedule.csv
//
//   step,lr
//   0,0.000040
//   1,0.000520
//   ...

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// One row: the rate used at a given optimiser step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LrPoint {
    pub step: usize,
    pub lr:   f64,
}

pub struct ScheduleLogger {
    csv_path: PathBuf,
    out:      BufWriter<File>,
}

impl ScheduleLogger {
    /// Create (or truncate) `<dir>/schedule.csv` and write the header.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join("schedule.csv");
        let file = File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;

        let mut out = BufWriter::new(file);
        writeln!(out, "step,lr")?;
        tracing::debug!("Created schedule CSV: '{}'", csv_path.display());

        Ok(Self { csv_path, out })
    }

    pub fn log(&mut self, p: LrPoint) -> Result<()> {
        writeln!(self.out, "{},{:.9}", p.step, p.lr)?;
        Ok(())
    }

    /// Flush buffered rows and return the file path.
    pub fn finish(mut self) -> Result<PathBuf> {
        self.out
            .flush()
            .with_context(|| format!("Cannot write '{}'", self.csv_path.display()))?;
        Ok(self.csv_path)
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
