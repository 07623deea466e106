//! Time Constants
//!
//! Read intervals dictated by the sensors' bus protocols.

/// Minimum spacing between DHT22 reads (ms).
///
/// Reading faster returns stale or corrupt frames.
/// Source: AM2302 datasheet (sampling period 2 s)
pub const DHT22_MIN_READ_INTERVAL_MS: u64 = 2000;

/// Spacing between HW-080 samples while calibrating (ms).
pub const HW080_SAMPLE_INTERVAL_MS: u64 = 300;

/// BH1750 high-resolution measurement time (ms).
///
/// Source: BH1750FVI datasheet (typ. 120 ms, max. 180 ms)
pub const BH1750_MEASUREMENT_TIME_MS: u64 = 180;

/// Settling time before a reference batch is sampled (ms).
pub const REFERENCE_STABILIZATION_MS: u64 = 3000;
