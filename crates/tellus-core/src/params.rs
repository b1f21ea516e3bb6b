//! User-facing generation parameters.
//!
//! Every field is quantized: sliders snap to their step on entry so a
//! serialized parameter code reproduces the exact same planet.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Region-count bounds the pipeline is validated for.
pub const MIN_REGIONS: u32 = 2_000;
pub const MAX_REGIONS: u32 = 2_560_000;

/// Plate-count bounds.
pub const MIN_PLATES: u32 = 4;
pub const MAX_PLATES: u32 = 120;

/// Full parameter set (all sliders + seed).
/// Defaults match the reference Earth-like configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetParams {
    /// Master seed, `< 2^24` so it packs into the parameter code.
    pub seed: u32,
    /// Requested region count. The host mesh may deviate slightly
    /// (e.g. pole closure adds a region); stages read the actual mesh size.
    pub regions: u32,
    /// Fibonacci-point jitter, 0–1. Consumed by host mesh builders only.
    pub jitter: f32,
    /// Tectonic plate count.
    pub plates: u32,
    /// Continent seeds grown during ocean/land tagging, 1–10.
    pub continents: u32,
    /// Coastal roughening amplitude, 0–0.5.
    pub roughness: f32,
    /// Post-processing sliders, all 0–1.
    pub smoothing: f32,
    pub glacial_erosion: f32,
    pub hydraulic_erosion: f32,
    pub thermal_erosion: f32,
    pub ridge_sharpening: f32,
    /// Reserved: any nonzero value runs the fixed creep schedule.
    pub soil_creep: f32,
    /// Axial tilt in degrees; shifts the insolation profile per season.
    pub axial_tilt_deg: f32,
    /// Plates (in seed order) whose land/ocean status is flipped after tagging.
    pub toggled_plates: Vec<u16>,
}

impl Default for PlanetParams {
    fn default() -> Self {
        Self {
            seed: 42,
            regions: 10_000,
            jitter: 0.5,
            plates: 24,
            continents: 3,
            roughness: 0.2,
            smoothing: 0.0,
            glacial_erosion: 0.0,
            hydraulic_erosion: 0.0,
            thermal_erosion: 0.0,
            ridge_sharpening: 0.0,
            soil_creep: 0.0,
            axial_tilt_deg: 23.5,
            toggled_plates: Vec::new(),
        }
    }
}

/// Snap `v` to multiples of `step` (stable for the serialized code).
fn quantize(v: f32, step: f32) -> f32 {
    (v / step).round() * step
}

impl PlanetParams {
    /// Snap every slider to its quantization step. Idempotent.
    pub fn snap(&mut self) {
        self.jitter = quantize(self.jitter, 0.01);
        self.roughness = quantize(self.roughness, 0.005);
        self.smoothing = quantize(self.smoothing, 0.01);
        self.glacial_erosion = quantize(self.glacial_erosion, 0.01);
        self.hydraulic_erosion = quantize(self.hydraulic_erosion, 0.01);
        self.thermal_erosion = quantize(self.thermal_erosion, 0.01);
        self.ridge_sharpening = quantize(self.ridge_sharpening, 0.01);
        self.soil_creep = quantize(self.soil_creep, 0.01);
        self.axial_tilt_deg = quantize(self.axial_tilt_deg, 0.5);
    }

    /// Pre-flight range check of every field.
    pub fn validate(&self) -> Result<(), PipelineError> {
        use PipelineError::ParamOutOfRange;
        if self.seed >= 1 << 24 {
            return Err(ParamOutOfRange("seed"));
        }
        if !(MIN_REGIONS..=MAX_REGIONS).contains(&self.regions) {
            return Err(ParamOutOfRange("regions"));
        }
        if !(0.0..=1.0).contains(&self.jitter) {
            return Err(ParamOutOfRange("jitter"));
        }
        if !(MIN_PLATES..=MAX_PLATES).contains(&self.plates) {
            return Err(ParamOutOfRange("plates"));
        }
        if !(1..=10).contains(&self.continents) {
            return Err(ParamOutOfRange("continents"));
        }
        if !(0.0..=0.5).contains(&self.roughness) {
            return Err(ParamOutOfRange("roughness"));
        }
        for (field, v) in [
            ("smoothing", self.smoothing),
            ("glacial_erosion", self.glacial_erosion),
            ("hydraulic_erosion", self.hydraulic_erosion),
            ("thermal_erosion", self.thermal_erosion),
            ("ridge_sharpening", self.ridge_sharpening),
            ("soil_creep", self.soil_creep),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(ParamOutOfRange(field));
            }
        }
        if !(0.0..=90.0).contains(&self.axial_tilt_deg) {
            return Err(ParamOutOfRange("axial_tilt_deg"));
        }
        for &p in &self.toggled_plates {
            if p as u32 >= self.plates {
                return Err(ParamOutOfRange("toggled_plates"));
            }
        }
        Ok(())
    }
}
