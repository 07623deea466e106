//! Shared fixtures for integration tests
//!
//! - `ScriptedSource`: owned, queue-backed raw source with failure injection
//! - `RecordingDelay`: `DelayNs` that records requested waits instead of sleeping
//! - Batch builders for reference conditions

#![allow(dead_code)]

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use gardenguard_core::sample::SampleBatch;
use gardenguard_core::time::Timestamp;
use gardenguard_core::{RawReadingSource, ReadError, Sample};

/// HW-080 raw reading in open air
pub const HW080_DRY_RAW: f32 = 65535.0;

/// HW-080 raw reading in saturated soil
pub const HW080_WET_RAW: f32 = 26221.0;

/// Raw source fed from a queue of outcomes
#[derive(Default)]
pub struct ScriptedSource {
    queue: VecDeque<Result<Sample, ReadError>>,
    reads: usize,
    clock: Timestamp,
    step_ms: u64,
}

impl ScriptedSource {
    /// Empty source; timestamps advance by `step_ms` per read
    pub fn new(step_ms: u64) -> Self {
        Self { step_ms, ..Self::default() }
    }

    /// Queue `count` valid readings of `raw`
    pub fn push_constant(&mut self, raw: f32, count: usize) -> &mut Self {
        for _ in 0..count {
            self.queue.push_back(Ok(Sample::new(raw, 0)));
        }
        self
    }

    /// Queue readings alternating `raw - spread` and `raw + spread`
    pub fn push_jitter(&mut self, raw: f32, spread: f32, count: usize) -> &mut Self {
        for i in 0..count {
            let value = if i % 2 == 0 { raw - spread } else { raw + spread };
            self.queue.push_back(Ok(Sample::new(value, 0)));
        }
        self
    }

    /// Queue a failure
    pub fn push_error(&mut self, err: ReadError) -> &mut Self {
        self.queue.push_back(Err(err));
        self
    }

    /// Queue a sample the driver flagged invalid
    pub fn push_invalid(&mut self, raw: f32) -> &mut Self {
        self.queue.push_back(Ok(Sample::invalid(raw, 0)));
        self
    }

    /// Reads served so far
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Outcomes still queued
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl RawReadingSource for ScriptedSource {
    fn read(&mut self) -> Result<Sample, ReadError> {
        self.reads += 1;
        let timestamp = self.clock;
        self.clock += self.step_ms;

        match self.queue.pop_front() {
            Some(Ok(sample)) => Ok(Sample { timestamp, ..sample }),
            Some(Err(err)) => Err(err),
            None => Err(ReadError::Timeout),
        }
    }
}

/// Records requested delays
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub waits_ms: Vec<u32>,
}

impl RecordingDelay {
    pub fn total_ms(&self) -> u64 {
        self.waits_ms.iter().map(|&ms| ms as u64).sum()
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waits_ms.push(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.waits_ms.push(ms);
    }
}

/// Batch of identical valid samples
pub fn constant_batch(raw: f32, count: usize) -> SampleBatch {
    let mut batch = SampleBatch::new();
    for i in 0..count {
        batch.push(Sample::new(raw, i as Timestamp * 300)).ok();
    }
    batch
}

/// Batch from explicit raw values
pub fn batch_of(values: &[f32]) -> SampleBatch {
    let mut batch = SampleBatch::new();
    for (i, &raw) in values.iter().enumerate() {
        batch.push(Sample::new(raw, i as Timestamp * 300)).ok();
    }
    batch
}
