//! The single-owner output value of the pipeline.

use serde::{Deserialize, Serialize};

use crate::climate::koppen::KoppenClass;
use crate::mesh::SphereMesh;
use crate::plates::{BoundaryType, PlateSet};

/// The two simulated seasons. `Summer` means northern-hemisphere summer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Summer,
    Winter,
}

impl Season {
    pub const ALL: [Season; 2] = [Season::Summer, Season::Winter];

    /// +1 for summer, −1 for winter; multiplies hemisphere-flipped terms.
    pub fn sign(self) -> f64 {
        match self {
            Season::Summer => 1.0,
            Season::Winter => -1.0,
        }
    }
}

/// A pair of per-season values (fields, results, scratch).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seasonal<T> {
    pub summer: T,
    pub winter: T,
}

impl<T> Seasonal<T> {
    pub fn get(&self, season: Season) -> &T {
        match season {
            Season::Summer => &self.summer,
            Season::Winter => &self.winter,
        }
    }

    pub fn get_mut(&mut self, season: Season) -> &mut T {
        match season {
            Season::Summer => &mut self.summer,
            Season::Winter => &mut self.winter,
        }
    }

    /// Build both seasons from the same constructor.
    pub fn build(mut f: impl FnMut(Season) -> T) -> Self {
        Self { summer: f(Season::Summer), winter: f(Season::Winter) }
    }
}

/// Tangent-plane wind per region, in (east, north) components, plus the
/// p95-normalized speed in [0, 1].
#[derive(Debug, Clone)]
pub struct WindField {
    pub east: Vec<f32>,
    pub north: Vec<f32>,
    pub speed: Vec<f32>,
}

/// Ocean surface flow per region. Vectors are zero on land; `warmth` is a
/// latitude/advection scalar in [0, 1].
#[derive(Debug, Clone)]
pub struct CurrentField {
    pub east: Vec<f32>,
    pub north: Vec<f32>,
    pub speed: Vec<f32>,
    pub warmth: Vec<f32>,
}

/// Post-run health counters. A nonzero `nan_count` never reaches callers;
/// the generator turns it into an internal error first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    pub nan_count: usize,
    pub land_fraction: f32,
    pub min_elevation: f32,
    pub max_elevation: f32,
    pub max_stress: f32,
}

/// Wall-clock per stage, diagnostics only (excluded from determinism).
#[derive(Debug, Clone, Serialize)]
pub struct StageTiming {
    pub label: &'static str,
    pub ms: u64,
}

/// Everything the pipeline produces for one parameter set.
///
/// Arrays are dense over `mesh.n_regions()` and written in strict stage
/// order; once a stage completes its outputs are never mutated again
/// (terrain post-processing is part of the elevation chain).
pub struct Planet {
    pub mesh: SphereMesh,
    pub plates: PlateSet,
    pub elevation: Vec<f32>,
    pub stress: Vec<f32>,
    pub subduct_factor: Vec<f32>,
    pub boundary_type: Vec<BoundaryType>,
    /// Sea-level pressure in hPa.
    pub pressure: Seasonal<Vec<f32>>,
    pub wind: Seasonal<WindField>,
    pub current: Seasonal<CurrentField>,
    /// Normalized precipitation in [0, 1] (denorm: 250 mm/month at 1.0).
    pub precipitation: Seasonal<Vec<f32>>,
    /// Normalized temperature in [0, 1] spanning −45..+45 °C.
    pub temperature: Seasonal<Vec<f32>>,
    pub koppen: Vec<KoppenClass>,
    pub diagnostics: Diagnostics,
    pub timings: Vec<StageTiming>,
}

impl Planet {
    /// Region is ocean at final elevation (≤ 0).
    #[inline]
    pub fn is_ocean(&self, r: usize) -> bool {
        self.elevation[r] <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seasonal_indexing_matches_fields() {
        let s = Seasonal { summer: 1, winter: 2 };
        assert_eq!(*s.get(Season::Summer), 1);
        assert_eq!(*s.get(Season::Winter), 2);
    }

    #[test]
    fn season_signs_oppose() {
        assert_eq!(Season::Summer.sign(), -Season::Winter.sign());
    }
}
