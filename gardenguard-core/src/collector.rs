//! Sample Collector
//!
//! Gathers a batch of acceptable raw samples for one reference condition.
//! Failed reads, samples the driver flagged invalid, non-finite values and
//! values outside the raw range are discarded. Each discarded read still
//! uses up an attempt.
//!
//! Reads are paced with an `embedded_hal` delay so the collector never
//! polls faster than the sensor allows (2 s for the DHT22). There is no
//! delay before the first attempt.

use embedded_hal::delay::DelayNs;

use crate::constants::MAX_BATCH_SAMPLES;
use crate::errors::{CalibrationError, CalibrationResult};
use crate::sample::SampleBatch;
use crate::source::RawReadingSource;

/// Collects fixed-size sample batches from a raw reading source
pub struct SampleCollector<S, D> {
    source: S,
    delay: D,
    interval_ms: u32,
}

impl<S: RawReadingSource, D: DelayNs> SampleCollector<S, D> {
    /// Collector waiting `interval_ms` between attempts
    pub fn new(source: S, delay: D, interval_ms: u32) -> Self {
        Self { source, delay, interval_ms }
    }

    /// Give back the source and delay
    pub fn into_inner(self) -> (S, D) {
        (self.source, self.delay)
    }

    /// Collect `n` acceptable samples using at most `max_attempts` reads
    ///
    /// Stops as soon as `n` samples are accepted. Fails with
    /// `InsufficientSamples` when the attempt budget runs out first.
    pub fn collect(
        &mut self,
        n: usize,
        max_attempts: usize,
        valid_range: (f32, f32),
    ) -> CalibrationResult<SampleBatch> {
        if n == 0 || n > MAX_BATCH_SAMPLES {
            return Err(CalibrationError::InvalidConfig {
                reason: "sample count must be between 1 and batch capacity",
            });
        }

        let (min, max) = valid_range;
        if !(min <= max) {
            return Err(CalibrationError::InvalidConfig {
                reason: "valid range minimum exceeds maximum",
            });
        }

        let mut batch = SampleBatch::new();

        for attempt in 0..max_attempts {
            if batch.len() == n {
                break;
            }

            if attempt > 0 && self.interval_ms > 0 {
                self.delay.delay_ms(self.interval_ms);
            }

            match self.source.read() {
                Ok(sample) if sample.is_acceptable(min, max) => {
                    // Capacity was checked against `n` above
                    let _ = batch.push(sample);
                }
                Ok(sample) => {
                    log_debug!(
                        "Discarding sample {} (valid: {}) on attempt {}",
                        sample.raw_value, sample.valid, attempt + 1
                    );
                }
                Err(_err) => {
                    log_debug!("Read failed on attempt {}", attempt + 1);
                }
            }
        }

        if batch.len() < n {
            log_warn!("Collected {} of {} samples", batch.len(), n);
            return Err(CalibrationError::InsufficientSamples {
                required: n,
                collected: batch.len(),
            });
        }

        Ok(batch)
    }
}
