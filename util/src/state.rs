//! Application state container shared across Axum route handlers.
//!
//! Holds the CPU sampler and the tick period handed to every stream session.
//! Nothing in here is mutable; sessions never share state with each other.

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::cpu_stat::{CpuSampler, ProcStatSampler};

/// Central application state shared across the server.
#[derive(Clone)]
pub struct AppState {
    sampler: Arc<dyn CpuSampler>,
    stream_interval: Duration,
}

impl AppState {
    /// Creates a new `AppState` from an explicit sampler and tick period.
    ///
    /// # Arguments
    ///
    /// * `sampler` - Source of CPU samples, shared by all sessions.
    /// * `stream_interval` - Time between two pushed readings.
    pub fn new(sampler: Arc<dyn CpuSampler>, stream_interval: Duration) -> Self {
        Self {
            sampler,
            stream_interval,
        }
    }

    /// Builds the state from the global [`AppConfig`], reading the host
    /// counter file it names.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(ProcStatSampler::new(&config.cpu_stat_path)),
            config.stream_interval(),
        )
    }

    /// Returns a cloned handle to the sampler, for moving into a session task.
    pub fn sampler(&self) -> Arc<dyn CpuSampler> {
        Arc::clone(&self.sampler)
    }

    pub fn stream_interval(&self) -> Duration {
        self.stream_interval
    }
}
