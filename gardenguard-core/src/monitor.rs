//! Sensor Monitor
//!
//! ## Overview
//!
//! `SensorMonitor` owns everything belonging to one sensor channel: its
//! profile, raw source, clock, installed mapping, compensation, read
//! statistics and recent history. There are no globals; a node with three
//! sensors holds three monitors.
//!
//! ## Modes
//!
//! ```text
//!            begin_calibration()
//!   Running ───────────────────▶ Calibrating
//!      ▲                              │
//!      │  finish_calibration()        │ capture_reference(Low)
//!      │  abort_calibration()         │ capture_reference(High)
//!      └──────────────────────────────┘
//! ```
//!
//! Runtime reads are refused while calibrating, and reference captures are
//! refused while running, so a calibration batch never interleaves with
//! runtime reads on the same bus.
//!
//! ## Runtime Path
//!
//! ```text
//! source.read() → range check → mapping.to_physical() → compensation → bands
//! ```
//!
//! Reads are rate limited to the profile's minimum interval. A rejected
//! read counts against sensor health; a rate-limited one does not touch
//! the bus and is not counted.

use embedded_hal::delay::DelayNs;

use crate::buffer::{ReadingHistory, TimestampedReading};
use crate::calibration::{calibrate, CalibrationMapping, CalibrationPoint, ReferenceLabel};
use crate::collector::SampleCollector;
use crate::compensation::{compensate_and_clamp, CompensationStore, OffsetCompensation};
use crate::constants::calibration::ATTEMPTS_PER_SAMPLE;
use crate::constants::quality::HISTORY_SIZE;
use crate::constants::time::REFERENCE_STABILIZATION_MS;
use crate::constants::CALIBRATION_SAMPLES;
use crate::diagnostics::{ReadStats, SensorHealth};
use crate::errors::{MonitorError, ReadError};
use crate::evaluator::ClassifiedReading;
use crate::profile::SensorProfile;
use crate::source::RawReadingSource;
use crate::store::{CalibrationStore, SaveError};
use crate::time::{remaining_interval, TimeSource, Timestamp};

/// What the monitor is currently allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MonitorMode {
    /// Runtime reads allowed
    Running,
    /// Reference captures allowed
    Calibrating,
}

/// One calibrated sensor channel
pub struct SensorMonitor<S, T> {
    profile: SensorProfile,
    source: S,
    clock: T,
    mapping: Option<CalibrationMapping>,
    compensation: CompensationStore,
    mode: MonitorMode,
    last_read: Option<Timestamp>,
    stats: ReadStats,
    history: ReadingHistory<HISTORY_SIZE>,
}

impl<S: RawReadingSource, T: TimeSource> SensorMonitor<S, T> {
    /// Uncalibrated monitor in `Running` mode with zero compensation
    pub fn new(profile: SensorProfile, source: S, clock: T) -> Self {
        let compensation = CompensationStore::with_bound(profile.offset_bound());
        Self {
            profile,
            source,
            clock,
            mapping: None,
            compensation,
            mode: MonitorMode::Running,
            last_read: None,
            stats: ReadStats::default(),
            history: ReadingHistory::new(),
        }
    }

    /// Sensor profile
    pub fn profile(&self) -> &SensorProfile {
        &self.profile
    }

    /// Current mode
    pub fn mode(&self) -> MonitorMode {
        self.mode
    }

    /// Installed mapping
    pub fn mapping(&self) -> Option<&CalibrationMapping> {
        self.mapping.as_ref()
    }

    /// Compensation in effect
    pub fn compensation(&self) -> OffsetCompensation {
        self.compensation.current()
    }

    /// Lifetime read counters
    pub fn stats(&self) -> ReadStats {
        self.stats
    }

    /// Health from the read success rate
    pub fn health(&self) -> SensorHealth {
        self.stats.health()
    }

    /// Recent compensated readings
    pub fn history(&self) -> &ReadingHistory<HISTORY_SIZE> {
        &self.history
    }

    /// Change between the last two readings if above the profile threshold
    pub fn significant_change(&self) -> Option<f32> {
        self.history.significant_change(self.profile.change_threshold())
    }

    /// Mutable access to the clock (tests, replays)
    pub fn clock_mut(&mut self) -> &mut T {
        &mut self.clock
    }

    /// Mutable access to the raw source
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Enter calibration mode
    pub fn begin_calibration(&mut self) {
        log_info!("Calibration started");
        self.mode = MonitorMode::Calibrating;
    }

    /// Leave calibration mode without touching the installed mapping
    pub fn abort_calibration(&mut self) {
        if self.mode == MonitorMode::Calibrating {
            log_info!("Calibration aborted");
        }
        self.mode = MonitorMode::Running;
    }

    /// Let the reference settle, then sample it
    ///
    /// Waits the stabilization time, then collects `CALIBRATION_SAMPLES`
    /// readings at the profile's sample interval.
    pub fn capture_reference<D: DelayNs>(
        &mut self,
        label: ReferenceLabel,
        mut delay: D,
    ) -> Result<CalibrationPoint, MonitorError> {
        if self.mode != MonitorMode::Calibrating {
            return Err(MonitorError::NotCalibrating);
        }

        log_info!("Capturing {} reference", label.name());
        delay.delay_ms(REFERENCE_STABILIZATION_MS as u32);

        let mut collector =
            SampleCollector::new(&mut self.source, delay, self.profile.sample_interval_ms());
        let batch = collector.collect(
            CALIBRATION_SAMPLES,
            CALIBRATION_SAMPLES * ATTEMPTS_PER_SAMPLE,
            self.profile.raw_range(),
        )?;

        Ok(CalibrationPoint::from_batch(label, batch)?)
    }

    /// Run the calibration engine and install the result
    ///
    /// Returns to `Running` whether or not the references were accepted.
    /// A rejected calibration leaves the previous mapping in place.
    pub fn finish_calibration(
        &mut self,
        low: &CalibrationPoint,
        high: &CalibrationPoint,
    ) -> Result<CalibrationMapping, MonitorError> {
        if self.mode != MonitorMode::Calibrating {
            return Err(MonitorError::NotCalibrating);
        }
        self.mode = MonitorMode::Running;

        let mapping = calibrate(low, high, &self.profile.calibration, self.clock.now())?;
        self.install(mapping);
        Ok(mapping)
    }

    /// Install a mapping obtained elsewhere
    ///
    /// The mapping must be valid and must pass `validate_against` for this
    /// monitor's profile.
    pub fn install_mapping(&mut self, mapping: CalibrationMapping) -> Result<(), MonitorError> {
        if self.mode == MonitorMode::Calibrating {
            return Err(MonitorError::CalibrationInProgress);
        }
        if !mapping.is_valid() {
            return Err(MonitorError::InvalidMapping);
        }
        mapping.validate_against(&self.profile.calibration)?;
        self.install(mapping);
        Ok(())
    }

    fn install(&mut self, mapping: CalibrationMapping) {
        log_info!(
            "Installed mapping: scale {} offset {}",
            mapping.scale(), mapping.offset()
        );
        self.mapping = Some(mapping);
        // Old readings were produced by a different mapping
        self.history.clear();
    }

    /// Replace both compensation offsets, stamped with the clock's time
    pub fn set_compensation(&mut self, primary: f32, secondary: f32) -> Result<(), MonitorError> {
        let now = self.clock.now();
        self.compensation.set_compensation(primary, secondary, now)?;
        Ok(())
    }

    /// Take one runtime reading and classify it
    pub fn read(&mut self) -> Result<ClassifiedReading, MonitorError> {
        if self.mode == MonitorMode::Calibrating {
            return Err(MonitorError::CalibrationInProgress);
        }

        let mapping = match self.mapping {
            Some(mapping) if mapping.is_valid() => mapping,
            _ => return Err(MonitorError::NotCalibrated),
        };

        let now = self.clock.now();
        let wait_ms = remaining_interval(self.last_read, now, self.profile.min_read_interval_ms());
        if wait_ms > 0 {
            return Err(MonitorError::RateLimited { wait_ms });
        }
        self.last_read = Some(now);

        let sample = match self.source.read() {
            Ok(sample) => sample,
            Err(err) => {
                self.stats.record_failure();
                log_debug!("Runtime read failed");
                return Err(err.into());
            }
        };

        let (raw_min, raw_max) = self.profile.raw_range();
        if !sample.is_acceptable(raw_min, raw_max) {
            self.stats.record_failure();
            log_warn!("Rejected runtime sample {}", sample.raw_value);
            return Err(ReadError::OutOfRange { value: sample.raw_value }.into());
        }
        self.stats.record_success();

        let value = compensate_and_clamp(
            mapping.to_physical(sample.raw_value),
            &self.compensation.current(),
            self.profile.channel(),
            self.profile.physical_range(),
        )
        .value;

        self.history.push(TimestampedReading { value, timestamp: sample.timestamp });
        if let Some(_delta) = self.significant_change() {
            log_info!("Significant change of {} since last reading", _delta);
        }

        Ok(self.profile.bands.classify(value))
    }

    /// Persist the installed mapping with the current compensation
    pub fn save<St: CalibrationStore>(&self, store: &mut St) -> Result<(), SaveError<St::Error>> {
        let mapping = self.mapping.as_ref().ok_or(SaveError::NotCalibrated)?;
        if !mapping.is_valid() {
            return Err(SaveError::InvalidMapping);
        }
        store.save(mapping, &self.compensation.current()).map_err(SaveError::Store)
    }

    /// Load calibration from a store
    ///
    /// The stored compensation is always taken (when it fits the profile's
    /// offset bound). The stored mapping is installed only if it passes
    /// `validate_against` for this profile. Returns whether a mapping was
    /// installed.
    pub fn restore<St: CalibrationStore>(&mut self, store: &mut St) -> Result<bool, MonitorError> {
        if self.mode == MonitorMode::Calibrating {
            return Err(MonitorError::CalibrationInProgress);
        }

        let Some(persisted) = store.load() else {
            log_info!("No stored calibration");
            return Ok(false);
        };

        if self.compensation.replace(persisted.compensation).is_err() {
            log_warn!("Stored compensation exceeds offset bound, keeping current");
        }

        match persisted.mapping.validate_against(&self.profile.calibration) {
            Ok(()) => {
                log_info!("Restored calibration from store");
                self.install(persisted.mapping);
                Ok(true)
            }
            Err(_err) => {
                log_warn!("Stored mapping does not fit this sensor, not installed");
                Ok(false)
            }
        }
    }

    /// Give back the source and clock
    pub fn into_parts(self) -> (S, T) {
        (self.source, self.clock)
    }
}
