//! File-backed calibration persistence

use std::fs;

use gardenguard_core::calibration::calibrate_batches;
use gardenguard_core::sample::{Sample, SampleBatch};
use gardenguard_core::time::FixedTime;
use gardenguard_core::{
    CalibrationMapping, CalibrationStore, OffsetCompensation, ReadError, ReplaySource,
    SaveError, SensorMonitor, SensorProfile,
};
use gardenguard_store::{CalibrationRecord, JsonFileStore, StoreError};
use tempfile::TempDir;

fn batch(raw: f32) -> SampleBatch {
    let mut batch = SampleBatch::new();
    for i in 0..15 {
        batch.push(Sample::new(raw, i * 300)).ok();
    }
    batch
}

fn hw080_mapping() -> CalibrationMapping {
    let profile = SensorProfile::hw080_soil_moisture();
    calibrate_batches(batch(65535.0), batch(26221.0), &profile.calibration, 1_700_000_000_000).unwrap()
}

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonFileStore::new(dir.path().join("hw080.json"));

    let comp = OffsetCompensation { primary_offset: -1.5, secondary_offset: 0.0, last_calibration: Some(42) };
    store.save(&hw080_mapping(), &comp).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.mapping, hw080_mapping());
    assert_eq!(loaded.compensation, comp);
    assert!(!dir.path().join("hw080.json.tmp").exists());
}

#[test]
fn test_missing_file_loads_none() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonFileStore::new(dir.path().join("absent.json"));

    assert!(store.load().is_none());
    assert!(store.read_record().unwrap().is_none());
}

#[test]
fn test_corrupt_file_loads_none() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hw080.json");
    fs::write(&path, "{ \"dry_value\": 65535.0, \"wet_").unwrap();

    let mut store = JsonFileStore::new(&path);
    assert!(store.load().is_none());
    assert!(matches!(store.read_record(), Err(StoreError::Json(_))));
}

#[test]
fn test_invalid_mapping_keeps_previous_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hw080.json");
    let mut store = JsonFileStore::new(&path);

    store.save(&hw080_mapping(), &OffsetCompensation::zero()).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let invalid = CalibrationMapping::restore(1.0, 0.0, 5.0, 5.0, 0, true);
    let err = store.save(&invalid, &OffsetCompensation::zero()).unwrap_err();
    assert!(matches!(err, StoreError::InvalidMapping));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_failed_write_keeps_previous_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hw080.json");
    let mut store = JsonFileStore::new(&path);
    store.save(&hw080_mapping(), &OffsetCompensation::zero()).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    // A directory squatting on the temp path makes the write fail
    fs::create_dir(dir.path().join("hw080.json.tmp")).unwrap();
    let comp = OffsetCompensation { primary_offset: 3.0, secondary_offset: 0.0, last_calibration: Some(1) };
    let err = store.save(&hw080_mapping(), &comp).unwrap_err();

    assert!(matches!(err, StoreError::Io(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_document_field_names() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hw080.json");
    let mut store = JsonFileStore::new(&path);
    store.save(&hw080_mapping(), &OffsetCompensation::zero()).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    for key in [
        "dry_value",
        "wet_value",
        "scale",
        "offset",
        "created_at",
        "validation_passed",
        "temperature_offset",
        "humidity_offset",
        "last_calibration",
    ] {
        assert!(value.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(value["created_at"], 1_700_000_000_000u64);
}

#[test]
fn test_tampered_record_is_not_installed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hw080.json");
    let store = JsonFileStore::new(&path);

    let mut record = CalibrationRecord::new(&hw080_mapping(), &OffsetCompensation::zero());
    record.wet_value = record.dry_value;
    store.write_record(&record).unwrap();

    let mut store = store;
    let mut monitor = hw080_monitor();
    assert_eq!(monitor.restore(&mut store), Ok(false));
    assert!(monitor.mapping().is_none());
}

fn hw080_monitor() -> SensorMonitor<ReplaySource<'static>, FixedTime> {
    SensorMonitor::new(SensorProfile::hw080_soil_moisture(), ReplaySource::new(&[]), FixedTime::new(0))
}

#[test]
fn test_close_references_are_not_installed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hw080.json");
    // Coefficients are consistent, but the references sit 1 raw unit apart
    fs::write(
        &path,
        r#"{
            "dry_value": 30001.0, "wet_value": 30000.0,
            "scale": -100.0, "offset": 3000100.0,
            "created_at": 5, "validation_passed": true,
            "temperature_offset": 1.0
        }"#,
    )
    .unwrap();

    let mut store = JsonFileStore::new(&path);
    let mut monitor = hw080_monitor();
    assert_eq!(monitor.restore(&mut store), Ok(false));
    assert!(monitor.mapping().is_none());
    assert_eq!(monitor.compensation().primary_offset, 1.0);
}

#[test]
fn test_inverted_record_is_not_installed() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("hw080.json"));

    // Raw rising with moisture, the opposite of the HW-080
    let scale = 100.0 / (65535.0 - 26221.0);
    let inverted = CalibrationMapping::restore(scale, -scale * 26221.0, 26221.0, 65535.0, 0, true);
    assert!(inverted.is_valid());
    store.write_record(&CalibrationRecord::new(&inverted, &OffsetCompensation::zero())).unwrap();

    let mut store = store;
    let mut monitor = hw080_monitor();
    assert_eq!(monitor.restore(&mut store), Ok(false));
    assert!(monitor.mapping().is_none());
}

#[test]
fn test_monitor_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hw080.json");

    {
        let mut monitor = SensorMonitor::new(
            SensorProfile::hw080_soil_moisture(),
            ReplaySource::new(&[]),
            FixedTime::new(1_000),
        );
        let mut store = JsonFileStore::new(&path);
        assert!(matches!(monitor.save(&mut store), Err(SaveError::NotCalibrated)));

        monitor.install_mapping(hw080_mapping()).unwrap();
        monitor.set_compensation(2.0, 0.0).unwrap();
        monitor.save(&mut store).unwrap();
    }

    let script: [Result<Sample, ReadError>; 1] = [Ok(Sample::new(45000.0, 0))];
    let mut monitor = SensorMonitor::new(
        SensorProfile::hw080_soil_moisture(),
        ReplaySource::new(&script),
        FixedTime::new(10_000),
    );
    let mut store = JsonFileStore::new(&path);
    assert_eq!(monitor.restore(&mut store), Ok(true));
    assert_eq!(monitor.compensation().primary_offset, 2.0);
    assert_eq!(monitor.compensation().last_calibration, Some(1_000));

    let reading = monitor.read().unwrap();
    let expected = hw080_mapping().to_physical(45000.0) + 2.0;
    assert!((reading.physical_value - expected).abs() < 1e-3);
}

#[test]
fn test_clear_removes_file() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonFileStore::new(dir.path().join("hw080.json"));
    store.save(&hw080_mapping(), &OffsetCompensation::zero()).unwrap();

    store.clear().unwrap();
    assert!(store.load().is_none());
    // Clearing twice is fine
    store.clear().unwrap();
}
