//! Upload transport abstraction.
//!
//! The [`Transport`] trait decouples the submission flow from how files
//! reach the platform. [`SimulatedTransport`] only waits out a configured
//! delay; tests use recording transports that return immediately.

use std::thread;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info, instrument};

use crate::core::upload::FileMeta;
use crate::core::wizard::SubmissionPayload;
use crate::io::config::LatencyConfig;

pub trait Transport {
    /// Send one file. Runs to completion; there is no cancellation.
    fn upload(&self, file: &FileMeta) -> Result<()>;

    /// Deliver the frozen submission.
    fn submit(&self, payload: &SubmissionPayload) -> Result<()>;
}

/// Transport that sleeps for the configured latency and always succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    upload_latency: Duration,
    submit_latency: Duration,
}

impl SimulatedTransport {
    pub fn new(upload_latency: Duration, submit_latency: Duration) -> Self {
        Self {
            upload_latency,
            submit_latency,
        }
    }

    pub fn from_config(latency: &LatencyConfig) -> Self {
        Self::new(latency.upload(), latency.submit())
    }
}

impl Transport for SimulatedTransport {
    #[instrument(skip_all, fields(file = %file.name, bytes = file.size))]
    fn upload(&self, file: &FileMeta) -> Result<()> {
        debug!(delay_ms = self.upload_latency.as_millis() as u64, "simulating upload");
        thread::sleep(self.upload_latency);
        Ok(())
    }

    #[instrument(skip_all, fields(reference = %payload.reference))]
    fn submit(&self, payload: &SubmissionPayload) -> Result<()> {
        debug!(delay_ms = self.submit_latency.as_millis() as u64, "simulating submit");
        thread::sleep(self.submit_latency);
        info!(exercise_id = payload.exercise_id, "submission delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn simulated_upload_waits_for_latency() {
        let transport = SimulatedTransport::new(Duration::from_millis(20), Duration::ZERO);
        let start = Instant::now();
        transport
            .upload(&FileMeta::new("a.mp4", "video/mp4", 1))
            .expect("upload");
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
