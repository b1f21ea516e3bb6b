//! Atmospheric and oceanic climate stages: ITCZ, pressure, wind, surface
//! currents, precipitation, temperature, Köppen classification.
//!
//! Each stage is a free function over the mesh plus earlier-stage arrays;
//! the generator owns the ordering. Seasonal stages run twice with only the
//! season sign differing.

pub mod currents;
pub mod itcz;
pub mod koppen;
pub mod precip;
pub mod pressure;
pub mod temperature;
pub mod wind;

use crate::mesh::SphereMesh;

/// Hermite smoothstep of `x` between `e0` and `e1`.
pub(crate) fn smoothstep(e0: f64, e1: f64, x: f64) -> f64 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Uniform-weight Laplacian smoothing: each pass replaces a value with the
/// mean of itself and its neighbors, via a swapped scratch buffer.
pub(crate) fn laplacian_smooth(mesh: &SphereMesh, field: &mut Vec<f32>, passes: usize) {
    let n = mesh.n_regions();
    let mut next = vec![0.0f32; n];
    for _ in 0..passes {
        for r in 0..n {
            let nbrs = mesh.neighbors(r);
            let mut sum = field[r];
            for &nb in nbrs {
                sum += field[nb as usize];
            }
            next[r] = sum / (nbrs.len() as f32 + 1.0);
        }
        std::mem::swap(field, &mut next);
    }
}

/// Normalize magnitudes so the 95th percentile maps to 1, clamped to [0, 1].
/// A degenerate (all-zero) field stays zero.
pub(crate) fn p95_normalize(speeds: &mut [f32]) {
    if speeds.is_empty() {
        return;
    }
    let mut sorted: Vec<f32> = speeds.to_vec();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let p95 = sorted[(0.95 * (sorted.len() - 1) as f64) as usize];
    if p95 < 1e-9 {
        return;
    }
    for s in speeds {
        *s = (*s / p95).clamp(0.0, 1.0);
    }
}
