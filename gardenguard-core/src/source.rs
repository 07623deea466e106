//! Raw reading sources
//!
//! The engine never talks to a bus. Board crates implement
//! `RawReadingSource` on top of their ADC, one-wire or I2C drivers; the
//! engine only sees timestamped samples or a `ReadError`.
//!
//! ## Implementing a source
//!
//! ```rust,ignore
//! struct Hw080<'d> {
//!     adc: Adc<'d, Blocking>,
//!     channel: Channel<'d>,
//!     clock: TickClock,
//! }
//!
//! impl RawReadingSource for Hw080<'_> {
//!     fn read(&mut self) -> Result<Sample, ReadError> {
//!         let raw = self.adc.blocking_read(&mut self.channel).map_err(|_| ReadError::Timeout)?;
//!         Ok(Sample::new(raw as f32, self.clock.now()))
//!     }
//! }
//! ```
//!
//! A read blocks until the bus transaction completes or times out. Pacing
//! between reads is the caller's job (see `SampleCollector` and
//! `SensorMonitor`).

use crate::errors::ReadError;
use crate::sample::Sample;

/// Supplier of raw measurements
pub trait RawReadingSource {
    /// Take one reading
    fn read(&mut self) -> Result<Sample, ReadError>;
}

impl<S: RawReadingSource + ?Sized> RawReadingSource for &mut S {
    fn read(&mut self) -> Result<Sample, ReadError> {
        (**self).read()
    }
}

/// Replays a recorded sequence of read outcomes
///
/// ## Use Cases
///
/// 1. **Unit Testing**: feed known sample and failure sequences
/// 2. **Replay**: re-run a calibration from logged raw values
/// 3. **Simulation**: scripted sensors on a host
///
/// Once the script is exhausted every read times out.
///
/// ```rust
/// use gardenguard_core::{ReplaySource, RawReadingSource, Sample, ReadError};
///
/// let script = [Ok(Sample::new(65535.0, 0)), Err(ReadError::ChecksumFailure)];
/// let mut source = ReplaySource::new(&script);
///
/// assert!(source.read().is_ok());
/// assert_eq!(source.read(), Err(ReadError::ChecksumFailure));
/// assert_eq!(source.read(), Err(ReadError::Timeout));
/// ```
pub struct ReplaySource<'a> {
    script: &'a [Result<Sample, ReadError>],
    position: usize,
    cycle: bool,
}

impl<'a> ReplaySource<'a> {
    /// Replay `script` once
    pub fn new(script: &'a [Result<Sample, ReadError>]) -> Self {
        Self { script, position: 0, cycle: false }
    }

    /// Replay `script` forever
    pub fn cycling(script: &'a [Result<Sample, ReadError>]) -> Self {
        Self { script, position: 0, cycle: true }
    }

    /// Reset to beginning
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Reads served so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// Check if the script has been consumed
    pub fn is_exhausted(&self) -> bool {
        !self.cycle && self.position >= self.script.len()
    }
}

impl RawReadingSource for ReplaySource<'_> {
    fn read(&mut self) -> Result<Sample, ReadError> {
        if self.script.is_empty() || self.is_exhausted() {
            return Err(ReadError::Timeout);
        }

        let outcome = self.script[self.position % self.script.len()];
        self.position += 1;
        outcome
    }
}
