use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::connection::StreamConnection;
use super::event::{UtilizationReading, unix_now};
use crate::cpu_stat::{self, CpuSample, CpuSampler, SamplerError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("client connection closed")]
    TransportFailure,

    #[error("failed to encode utilization reading: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Why a session left the streaming state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The client went away between writes.
    Disconnected,
    /// A write to the client failed.
    TransportFailure,
}

enum Wake {
    Disconnect,
    Tick,
}

/// Source of the `timestamp` stamped on each reading.
pub type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

/// One subscribed client.
///
/// [`StreamSession::start`] is the `Starting` state: it performs the single
/// baseline read. [`StreamSession::run`] is `Streaming` and returns once the
/// session is `Closed`.
pub struct StreamSession<S: ?Sized, C> {
    sampler: Arc<S>,
    conn: C,
    period: Duration,
    clock: Clock,
    previous_sample: CpuSample,
}

impl<S, C> StreamSession<S, C>
where
    S: CpuSampler + ?Sized,
    C: StreamConnection,
{
    /// Takes the baseline sample. A failure here means no stream is opened.
    pub fn start(sampler: Arc<S>, conn: C, period: Duration) -> Result<Self, SamplerError> {
        let previous_sample = sampler.read()?;
        Ok(Self {
            sampler,
            conn,
            period,
            clock: Box::new(unix_now),
            previous_sample,
        })
    }

    /// Replaces the wall clock used to stamp readings.
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn previous_sample(&self) -> CpuSample {
        self.previous_sample
    }

    /// Streams one reading per successful tick until the client is gone.
    ///
    /// A pending disconnect always beats a pending tick, and a disconnect
    /// during a write abandons the write.
    pub async fn run(mut self) -> SessionEnd {
        let mut ticker = time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::debug!(period_ms = self.period.as_millis() as u64, "Stream session started");

        loop {
            let wake = tokio::select! {
                biased;
                _ = self.conn.disconnected() => Wake::Disconnect,
                _ = ticker.tick() => Wake::Tick,
            };

            if let Wake::Disconnect = wake {
                tracing::info!("Client disconnected, closing stream session");
                return SessionEnd::Disconnected;
            }

            let frame = match self.next_frame() {
                Some(frame) => frame,
                None => continue,
            };

            let sent = tokio::select! {
                biased;
                _ = self.conn.disconnected() => {
                    tracing::info!("Client disconnected mid-tick, closing stream session");
                    return SessionEnd::Disconnected;
                }
                sent = self.conn.push(frame) => sent,
            };

            if let Err(e) = sent {
                tracing::info!(error = %e, "Write to client failed, closing stream session");
                return SessionEnd::TransportFailure;
            }
        }
    }

    /// Samples, computes the reading against the baseline and encodes it.
    ///
    /// Returns `None` when the tick must be skipped; the baseline is then
    /// left untouched so the next tick spans both intervals.
    fn next_frame(&mut self) -> Option<bytes::Bytes> {
        let current = match self.sampler.read() {
            Ok(sample) => sample,
            Err(e) => {
                tracing::warn!(error = %e, "Error reading CPU stats, skipping tick");
                return None;
            }
        };

        let reading = UtilizationReading {
            usage: cpu_stat::percentage(self.previous_sample, current),
            timestamp: (self.clock)(),
        };
        match reading.to_frame().map_err(SessionError::from) {
            Ok(frame) => {
                self.previous_sample = current;
                Some(frame)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Skipping tick");
                None
            }
        }
    }
}
