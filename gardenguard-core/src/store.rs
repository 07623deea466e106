//! Calibration persistence
//!
//! The engine only defines what gets persisted and the trait a backend
//! implements. `MemoryStore` lives here for tests and for boards that keep
//! calibration in RAM across soft resets; the JSON file backend lives in
//! the `gardenguard-store` crate.
//!
//! Backends must never accept an invalid mapping, and a failed save must
//! leave the previously stored calibration readable.

use core::fmt;

use thiserror_no_std::Error;

use crate::calibration::CalibrationMapping;
use crate::compensation::OffsetCompensation;

/// Mapping and compensation as stored together
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersistedCalibration {
    /// Raw-to-physical mapping
    pub mapping: CalibrationMapping,
    /// User offsets
    pub compensation: OffsetCompensation,
}

/// Storage backend for calibration data
pub trait CalibrationStore {
    /// Backend-specific failure
    type Error;

    /// Last saved calibration, or `None` if nothing usable is stored
    fn load(&mut self) -> Option<PersistedCalibration>;

    /// Replace the stored calibration
    fn save(
        &mut self,
        mapping: &CalibrationMapping,
        compensation: &OffsetCompensation,
    ) -> Result<(), Self::Error>;
}

impl<S: CalibrationStore + ?Sized> CalibrationStore for &mut S {
    type Error = S::Error;

    fn load(&mut self) -> Option<PersistedCalibration> {
        (**self).load()
    }

    fn save(
        &mut self,
        mapping: &CalibrationMapping,
        compensation: &OffsetCompensation,
    ) -> Result<(), Self::Error> {
        (**self).save(mapping, compensation)
    }
}

/// Why `SensorMonitor::save` did not persist anything
#[derive(Debug, Clone, PartialEq)]
pub enum SaveError<E> {
    /// No mapping installed
    NotCalibrated,
    /// Installed mapping is marked invalid
    InvalidMapping,
    /// The backend failed
    Store(E),
}

impl<E: fmt::Display> fmt::Display for SaveError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotCalibrated => write!(f, "Nothing to save: sensor not calibrated"),
            Self::InvalidMapping => write!(f, "Refusing to save an invalid mapping"),
            Self::Store(e) => write!(f, "Store error: {}", e),
        }
    }
}

/// `MemoryStore` failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryStoreError {
    /// Mapping marked invalid
    #[error("Invalid mapping rejected")]
    InvalidMapping,

    /// Injected write failure
    #[error("Write failed")]
    WriteFailed,
}

/// In-memory calibration store
///
/// ```rust
/// use gardenguard_core::{CalibrationStore, MemoryStore};
///
/// let mut store = MemoryStore::new();
/// assert!(store.load().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    stored: Option<PersistedCalibration>,
    saves: u32,
    fail_saves: bool,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with a calibration
    pub fn with(calibration: PersistedCalibration) -> Self {
        Self { stored: Some(calibration), ..Self::default() }
    }

    /// Make every following save fail (or succeed again)
    pub fn set_failing(&mut self, failing: bool) {
        self.fail_saves = failing;
    }

    /// Successful saves so far
    pub fn saves(&self) -> u32 {
        self.saves
    }

    /// Peek at the stored value without going through `load`
    pub fn stored(&self) -> Option<&PersistedCalibration> {
        self.stored.as_ref()
    }
}

impl CalibrationStore for MemoryStore {
    type Error = MemoryStoreError;

    fn load(&mut self) -> Option<PersistedCalibration> {
        self.stored
    }

    fn save(
        &mut self,
        mapping: &CalibrationMapping,
        compensation: &OffsetCompensation,
    ) -> Result<(), Self::Error> {
        if !mapping.is_valid() {
            return Err(MemoryStoreError::InvalidMapping);
        }
        if self.fail_saves {
            return Err(MemoryStoreError::WriteFailed);
        }

        self.stored = Some(PersistedCalibration {
            mapping: *mapping,
            compensation: *compensation,
        });
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(valid: bool) -> CalibrationMapping {
        CalibrationMapping::restore(-0.0025, 166.7, 65535.0, 26221.0, 1_000, valid)
    }

    #[test]
    fn save_then_load() {
        let mut store = MemoryStore::new();
        let comp = OffsetCompensation { primary_offset: 1.0, secondary_offset: 0.0, last_calibration: Some(5) };

        store.save(&mapping(true), &comp).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.mapping, mapping(true));
        assert_eq!(loaded.compensation, comp);
        assert_eq!(store.saves(), 1);
    }

    #[test]
    fn invalid_mapping_is_refused() {
        let mut store = MemoryStore::new();
        let err = store.save(&mapping(false), &OffsetCompensation::zero()).unwrap_err();
        assert_eq!(err, MemoryStoreError::InvalidMapping);
        assert!(store.load().is_none());
    }

    #[test]
    fn failed_save_keeps_previous() {
        let mut store = MemoryStore::new();
        store.save(&mapping(true), &OffsetCompensation::zero()).unwrap();

        store.set_failing(true);
        let newer = CalibrationMapping::restore(-0.003, 150.0, 60000.0, 27000.0, 2_000, true);
        assert_eq!(
            store.save(&newer, &OffsetCompensation::zero()),
            Err(MemoryStoreError::WriteFailed)
        );
        assert_eq!(store.load().unwrap().mapping.created_at(), 1_000);
    }

    #[test]
    fn save_error_display() {
        let err: SaveError<&str> = SaveError::Store("disk full");
        assert_eq!(format!("{}", err), "Store error: disk full");
    }
}
