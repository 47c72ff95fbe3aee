//! Aggregate CPU counters from a `/proc/stat`-style source.
//!
//! The aggregate row looks like:
//!
//! ```text
//! cpu  user nice system idle iowait irq softirq steal guest guest_nice
//! ```
//!
//! Only `idle` (index 3) and `iowait` (index 4) are consumed by name; every
//! field contributes to the total.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Marker token of the all-cores row.
const AGGREGATE_MARKER: &str = "cpu";

/// Smallest field count that still reaches `iowait`.
const MIN_FIELDS: usize = 5;

const IDLE: usize = 3;
const IOWAIT: usize = 4;

#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("CPU counter source unavailable: {0}")]
    SourceUnavailable(#[from] io::Error),

    #[error("Malformed CPU counter data: {0}")]
    MalformedData(String),
}

/// Cumulative ticks since boot, reduced to the two scalars the
/// utilization formula needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CpuSample {
    pub total: f64,
    pub idle: f64,
}

/// Anything that can produce a fresh [`CpuSample`].
///
/// Implementations hold no state between reads, so one instance can be
/// shared by every stream session.
pub trait CpuSampler: Send + Sync + 'static {
    fn read(&self) -> Result<CpuSample, SamplerError>;
}

/// Reads the host counter file on every call.
#[derive(Debug, Clone)]
pub struct ProcStatSampler {
    path: PathBuf,
}

impl ProcStatSampler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CpuSampler for ProcStatSampler {
    fn read(&self) -> Result<CpuSample, SamplerError> {
        let content = fs::read_to_string(&self.path)?;
        parse_stat(&content)
    }
}

/// Finds the aggregate row in `content` and reduces it to a [`CpuSample`].
pub fn parse_stat(content: &str) -> Result<CpuSample, SamplerError> {
    let line = content
        .lines()
        .find(|line| is_aggregate_row(line))
        .ok_or_else(|| SamplerError::MalformedData("aggregate cpu line not found".into()))?;

    let fields = line
        .split_whitespace()
        .skip(1)
        .map(parse_field)
        .collect::<Result<Vec<f64>, _>>()?;

    if fields.len() < MIN_FIELDS {
        return Err(SamplerError::MalformedData(format!(
            "aggregate cpu line has {} fields, expected at least {MIN_FIELDS}",
            fields.len()
        )));
    }

    let total: f64 = fields.iter().sum();
    if !total.is_finite() {
        return Err(SamplerError::MalformedData(
            "aggregate cpu line total overflows".into(),
        ));
    }

    Ok(CpuSample {
        total,
        idle: fields[IDLE] + fields[IOWAIT],
    })
}

/// `cpu` followed by whitespace; `cpu0`, `cpu12`, ... are per-core rows.
fn is_aggregate_row(line: &str) -> bool {
    line.strip_prefix(AGGREGATE_MARKER)
        .is_some_and(|rest| rest.starts_with(char::is_whitespace))
}

fn parse_field(raw: &str) -> Result<f64, SamplerError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(SamplerError::MalformedData(format!(
            "field '{raw}' is not a non-negative number"
        ))),
    }
}

/// Utilization between two samples, in percent.
///
/// Computes `100 * (1 - idle_delta / total_delta)`, arranged so integral
/// tick counts give exact results. Returns `0.0` when the total has not
/// advanced. The result is not clamped: a counter reset yields whatever the
/// formula produces.
pub fn percentage(previous: CpuSample, current: CpuSample) -> f64 {
    let total_delta = current.total - previous.total;
    let idle_delta = current.idle - previous.idle;

    if total_delta == 0.0 {
        return 0.0;
    }

    100.0 * (total_delta - idle_delta) / total_delta
}
