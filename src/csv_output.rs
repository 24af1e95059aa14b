//! CSV output for load matrices
//!
//! Two files per run, mirroring the usual spreadsheet workflow:
//! - `<base>_overall.csv`: `window_start_ns,overall_load`
//! - `<base>_per_core.csv`: `window_start_ns,cpu,load` (one row per CPU per window)

use crate::load::LoadMatrix;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// CSV formatter over a computed matrix
#[derive(Debug)]
pub struct CsvLoadOutput<'a> {
    matrix: &'a LoadMatrix,
}

/// Paths written by [`CsvLoadOutput::write_files`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvPaths {
    pub overall: PathBuf,
    pub per_core: PathBuf,
}

impl<'a> CsvLoadOutput<'a> {
    pub fn new(matrix: &'a LoadMatrix) -> Self {
        Self { matrix }
    }

    /// Overall load, one row per window
    pub fn overall_csv(&self) -> String {
        let mut output = String::from("window_start_ns,overall_load\n");
        for (ts, load) in self.matrix.timestamps().iter().zip(self.matrix.overall()) {
            output.push_str(&format!("{},{}\n", *ts as i64, load));
        }
        output
    }

    /// Per-CPU load in long format
    pub fn per_core_csv(&self) -> String {
        let mut output = String::from("window_start_ns,cpu,load\n");
        let timestamps = self.matrix.timestamps();
        for (w, ts) in timestamps.iter().enumerate() {
            for (cpu, row) in self.matrix.cpu_rows().enumerate() {
                output.push_str(&format!("{},{},{}\n", *ts as i64, cpu, row[w]));
            }
        }
        output
    }

    /// Write both files next to `base`, creating its directory if needed
    pub fn write_files(&self, base: &Path) -> io::Result<CsvPaths> {
        if let Some(dir) = base.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let paths = CsvPaths {
            overall: suffixed(base, "_overall.csv"),
            per_core: suffixed(base, "_per_core.csv"),
        };
        fs::write(&paths.overall, self.overall_csv())?;
        fs::write(&paths.per_core, self.per_core_csv())?;
        Ok(paths)
    }
}

fn suffixed(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}
