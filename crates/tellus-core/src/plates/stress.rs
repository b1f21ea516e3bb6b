//! Stress diffusion from plate boundaries into plate interiors.
//!
//! Frontier BFS within each plate: every frontier region hands a decayed
//! copy of its stress to intra-plate neighbors that currently hold less,
//! carrying its subduction factor along. One pass runs the frontier to
//! exhaustion; the pass count re-seeds and repeats the diffusion.

use crate::mesh::SphereMesh;
use crate::plates::PlateSet;

/// Stress below which a region never joins the seed frontier.
const SEED_FLOOR: f32 = 0.01;

/// Propagated stress below this dies out instead of spreading.
const PROPAGATION_FLOOR: f32 = 0.005;

/// Resolution-independent decay pair for a given spread setting.
///
/// `spread` ∈ [0, 1]. The per-hop factors are the base decay raised to
/// `1/√(N/10000)` so a mountain root spans the same arc at any mesh size.
pub fn decay_factors(n_regions: usize, spread: f32) -> (f32, f32) {
    let base = 0.5 + 0.04 * spread;
    let exp = 1.0 / (n_regions as f64 / 10_000.0).sqrt();
    let decay = (base as f64).powf(exp) as f32;
    let subduct_decay = (base as f64 * 0.45).powf(exp) as f32;
    (decay, subduct_decay)
}

/// Pass budget for a given spread setting.
pub fn pass_count(n_regions: usize, spread: f32) -> usize {
    let scale = (n_regions as f64 / 10_000.0).sqrt();
    ((3.0 * spread as f64 * scale).round() as usize).max(1)
}

/// Diffuse `stress`/`subduct` in place. Regions on ocean plates receive
/// stress but never forward it.
pub fn propagate(
    mesh: &SphereMesh,
    plates: &PlateSet,
    stress: &mut [f32],
    subduct: &mut [f32],
    decay: f32,
    subduct_decay: f32,
    passes: usize,
) {
    for _ in 0..passes {
        let mut frontier: Vec<u32> = (0..mesh.n_regions() as u32)
            .filter(|&r| stress[r as usize] > SEED_FLOOR)
            .collect();

        while !frontier.is_empty() {
            let mut next: Vec<u32> = Vec::new();
            for &r in &frontier {
                let r = r as usize;
                let plate = plates.region_plate[r];
                if plates.is_ocean[plate as usize] {
                    continue;
                }
                let eff = if subduct[r] > 0.5 { subduct_decay } else { decay };
                let propagated = stress[r] * eff;
                if propagated < PROPAGATION_FLOOR {
                    continue;
                }
                for &nb in mesh.neighbors(r) {
                    let nbu = nb as usize;
                    if plates.region_plate[nbu] == plate && propagated > stress[nbu] {
                        stress[nbu] = propagated;
                        subduct[nbu] = subduct[r];
                        next.push(nb);
                    }
                }
            }
            frontier = next;
        }
    }
}
