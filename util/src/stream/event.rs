use bytes::Bytes;
use serde::Serialize;

/// One pushed utilization value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UtilizationReading {
    pub usage: f64,
    /// Whole seconds since the Unix epoch at emission.
    pub timestamp: i64,
}

/// Whole seconds since the Unix epoch, from the wall clock.
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

impl UtilizationReading {
    /// Encodes the reading as a single event-stream frame:
    /// `data: {"usage":..,"timestamp":..}` followed by a blank line.
    pub fn to_frame(&self) -> Result<Bytes, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(Bytes::from(format!("data: {json}\n\n")))
    }
}
