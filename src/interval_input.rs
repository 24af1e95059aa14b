//! CSV input of CPU running slices
//!
//! Reads the columnar export of a "thread running slices" query. The header
//! must name `ts_ns`, `ts_end_ns` and `ucpu`; column order is free and any
//! other columns are ignored.
//!
//! ```text
//! ts_ns,ts_end_ns,ucpu,utid
//! 0,110,0,12
//! 88,180,1,40
//! ```

use crate::load::{Interval, LoadEngine, LoadMatrix, TraceParameters, ValidationError};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

const START_COLUMN: &str = "ts_ns";
const END_COLUMN: &str = "ts_end_ns";
const CPU_COLUMN: &str = "ucpu";

#[derive(Error, Debug)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Input is empty (no header row)")]
    MissingHeader,

    #[error("The input must contain columns: ts_ns, ts_end_ns, ucpu (missing {0})")]
    MissingColumn(&'static str),

    #[error("Line {line}: expected at least {expected} fields, found {found}")]
    ShortRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: invalid integer {value:?} in column {column}")]
    InvalidInteger {
        line: usize,
        column: &'static str,
        value: String,
    },
}

/// Interval columns as read from input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalSet {
    pub slice_start_ns: Vec<i64>,
    pub slice_end_ns: Vec<i64>,
    pub cpu_id: Vec<i64>,
}

impl IntervalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, interval: Interval) {
        self.slice_start_ns.push(interval.start_ns);
        self.slice_end_ns.push(interval.end_ns);
        self.cpu_id.push(interval.cpu_id);
    }

    pub fn len(&self) -> usize {
        self.slice_start_ns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slice_start_ns.is_empty()
    }

    /// Row-oriented copy of the columns
    pub fn to_intervals(&self) -> Vec<Interval> {
        self.slice_start_ns
            .iter()
            .zip(&self.slice_end_ns)
            .zip(&self.cpu_id)
            .map(|((&start, &end), &cpu)| Interval::new(start, end, cpu))
            .collect()
    }

    /// Trace duration implied by the data: the latest slice end
    ///
    /// The trace is taken to start at 0, so early gaps count as idle time.
    pub fn trace_duration_ns(&self) -> Option<i64> {
        self.slice_end_ns.iter().copied().max()
    }

    /// Number of distinct CPU ids present
    pub fn distinct_cpus(&self) -> usize {
        let mut ids = self.cpu_id.clone();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// Run the load engine over these columns
    pub fn compute(
        &self,
        engine: &LoadEngine,
        params: TraceParameters,
    ) -> Result<LoadMatrix, ValidationError> {
        engine.compute_columns(&self.slice_start_ns, &self.slice_end_ns, &self.cpu_id, params)
    }

    /// Open and parse a CSV file
    pub fn from_path(path: &Path) -> Result<Self, InputError> {
        let file = File::open(path)?;
        Self::read_csv(BufReader::new(file))
    }

    /// Parse CSV from any buffered reader
    ///
    /// # Example
    /// ```
    /// use cpuload::interval_input::IntervalSet;
    ///
    /// let csv = "ucpu,ts_ns,ts_end_ns\n0,100,300\n2,0,50\n";
    /// let set = IntervalSet::read_csv(csv.as_bytes()).unwrap();
    /// assert_eq!(set.len(), 2);
    /// assert_eq!(set.cpu_id, vec![0, 2]);
    /// assert_eq!(set.trace_duration_ns(), Some(300));
    /// ```
    pub fn read_csv<R: BufRead>(reader: R) -> Result<Self, InputError> {
        let mut lines = reader.lines().enumerate();

        let header = loop {
            match lines.next() {
                Some((_, line)) => {
                    let line = line?;
                    if !line.trim().is_empty() {
                        break line;
                    }
                }
                None => return Err(InputError::MissingHeader),
            }
        };
        let columns = ColumnIndex::from_header(&header)?;

        let mut set = Self::new();
        for (idx, line) in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            set.push(columns.parse_row(&line, idx + 1)?);
        }

        tracing::debug!(intervals = set.len(), "intervals read");
        Ok(set)
    }
}

/// Positions of the required columns within a row
struct ColumnIndex {
    start: usize,
    end: usize,
    cpu: usize,
}

impl ColumnIndex {
    fn from_header(header: &str) -> Result<Self, InputError> {
        let names: Vec<&str> = header.split(',').map(|h| h.trim().trim_matches('"')).collect();
        let find = |column: &'static str| {
            names
                .iter()
                .position(|name| *name == column)
                .ok_or(InputError::MissingColumn(column))
        };

        Ok(Self {
            start: find(START_COLUMN)?,
            end: find(END_COLUMN)?,
            cpu: find(CPU_COLUMN)?,
        })
    }

    fn width(&self) -> usize {
        self.start.max(self.end).max(self.cpu) + 1
    }

    fn parse_row(&self, row: &str, line: usize) -> Result<Interval, InputError> {
        let fields: Vec<&str> = row.split(',').map(str::trim).collect();
        if fields.len() < self.width() {
            return Err(InputError::ShortRow {
                line,
                expected: self.width(),
                found: fields.len(),
            });
        }

        let parse = |column: &'static str, idx: usize| -> Result<i64, InputError> {
            fields[idx]
                .parse::<i64>()
                .map_err(|_| InputError::InvalidInteger {
                    line,
                    column,
                    value: fields[idx].to_string(),
                })
        };

        Ok(Interval::new(
            parse(START_COLUMN, self.start)?,
            parse(END_COLUMN, self.end)?,
            parse(CPU_COLUMN, self.cpu)?,
        ))
    }
}
