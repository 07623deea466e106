//! JSON file persistence for GardenGuard calibration
//!
//! ## Overview
//!
//! `JsonFileStore` implements `gardenguard_core::CalibrationStore` on top
//! of a single JSON document per sensor:
//!
//! ```json
//! {
//!   "dry_value": 65535.0,
//!   "wet_value": 26221.0,
//!   "scale": -0.0025436,
//!   "offset": 166.696,
//!   "created_at": 1700000000000,
//!   "validation_passed": true,
//!   "temperature_offset": 0.0,
//!   "humidity_offset": 0.0,
//!   "last_calibration": null
//! }
//! ```
//!
//! `dry_value`/`wet_value` are the low and high reference raw means. The
//! two offsets are the primary and secondary compensation channels (named
//! after the DHT22, which is the only two-channel sensor).
//!
//! ## Crash Safety
//!
//! A save writes the whole document to a sibling temp file, syncs it and
//! renames it over the target. Either the old or the new calibration is on
//! disk at any time, never a torn mix.
//!
//! ## Failure Policy
//!
//! - Invalid mappings are refused before anything touches the disk
//! - A missing, unreadable or corrupt file loads as `None` with a warning,
//!   so a node with a damaged file boots uncalibrated instead of crashing
//!
//! ```rust,no_run
//! use gardenguard_core::{CalibrationStore, SensorMonitor, SensorProfile, ReplaySource};
//! use gardenguard_core::time::SystemTime;
//! use gardenguard_store::JsonFileStore;
//!
//! let mut store = JsonFileStore::new("/var/lib/gardenguard/hw080.json");
//! let mut monitor = SensorMonitor::new(
//!     SensorProfile::hw080_soil_moisture(),
//!     ReplaySource::new(&[]),
//!     SystemTime,
//! );
//! let restored = monitor.restore(&mut store)?;
//! # Ok::<(), gardenguard_core::MonitorError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use gardenguard_core::time::Timestamp;
use gardenguard_core::{CalibrationMapping, CalibrationStore, OffsetCompensation, PersistedCalibration};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

/// Store failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(io::Error),

    /// Document could not be encoded or decoded
    #[error("JSON error: {0}")]
    Json(serde_json::Error),

    /// Refused to persist a mapping marked invalid
    #[error("Refusing to persist an invalid calibration mapping")]
    InvalidMapping,
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Json(err)
    }
}

/// On-disk calibration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    /// Low reference raw mean
    pub dry_value: f32,
    /// High reference raw mean
    pub wet_value: f32,
    /// Mapping slope
    pub scale: f32,
    /// Mapping intercept
    pub offset: f32,
    /// When the mapping was calibrated
    pub created_at: Timestamp,
    /// Whether the mapping passed its checks
    pub validation_passed: bool,
    /// Primary compensation offset
    #[serde(default)]
    pub temperature_offset: f32,
    /// Secondary compensation offset
    #[serde(default)]
    pub humidity_offset: f32,
    /// When the offsets were last set
    #[serde(default)]
    pub last_calibration: Option<Timestamp>,
}

impl CalibrationRecord {
    /// Document for a mapping and compensation pair
    pub fn new(mapping: &CalibrationMapping, compensation: &OffsetCompensation) -> Self {
        Self {
            dry_value: mapping.low_raw(),
            wet_value: mapping.high_raw(),
            scale: mapping.scale(),
            offset: mapping.offset(),
            created_at: mapping.created_at(),
            validation_passed: mapping.is_valid(),
            temperature_offset: compensation.primary_offset,
            humidity_offset: compensation.secondary_offset,
            last_calibration: compensation.last_calibration,
        }
    }

    /// Rebuild the engine types
    ///
    /// The mapping is re-checked on the way in; a document claiming
    /// `validation_passed` with unusable numbers comes back invalid.
    pub fn into_persisted(self) -> PersistedCalibration {
        PersistedCalibration {
            mapping: CalibrationMapping::restore(
                self.scale,
                self.offset,
                self.dry_value,
                self.wet_value,
                self.created_at,
                self.validation_passed,
            ),
            compensation: OffsetCompensation {
                primary_offset: self.temperature_offset,
                secondary_offset: self.humidity_offset,
                last_calibration: self.last_calibration,
            },
        }
    }
}

/// Calibration stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by `path`; the file need not exist yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Read and decode the document; `Ok(None)` when the file is missing
    pub fn read_record(&self) -> Result<Option<CalibrationRecord>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Encode and atomically replace the document
    pub fn write_record(&self, record: &CalibrationRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(record)?;
        let temp = self.temp_path();

        let result = File::create(&temp)
            .and_then(|mut file| {
                file.write_all(json.as_bytes())?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&temp, &self.path));

        if let Err(err) = result {
            // Leftover temp file is harmless but untidy
            let _ = fs::remove_file(&temp);
            return Err(err.into());
        }

        debug!("Wrote calibration to {}", self.path.display());
        Ok(())
    }

    /// Delete the stored calibration
    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

impl CalibrationStore for JsonFileStore {
    type Error = StoreError;

    fn load(&mut self) -> Option<PersistedCalibration> {
        match self.read_record() {
            Ok(Some(record)) => {
                info!("Loaded calibration from {}", self.path.display());
                Some(record.into_persisted())
            }
            Ok(None) => {
                warn!("No calibration file at {}", self.path.display());
                None
            }
            Err(err) => {
                warn!("Ignoring unreadable calibration file {}: {}", self.path.display(), err);
                None
            }
        }
    }

    fn save(
        &mut self,
        mapping: &CalibrationMapping,
        compensation: &OffsetCompensation,
    ) -> Result<(), Self::Error> {
        if !mapping.is_valid() {
            warn!("Refusing to save invalid mapping");
            return Err(StoreError::InvalidMapping);
        }
        self.write_record(&CalibrationRecord::new(mapping, compensation))
    }
}
