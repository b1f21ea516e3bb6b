//! Cross-plate boundary detection: compression test, boundary
//! classification, stress, subduction factor, and the elevation seed sets.

use serde::{Deserialize, Serialize};

use crate::mesh::SphereMesh;
use crate::noise::NoiseBasis;
use crate::plates::PlateSet;

/// Boundary classification per region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum BoundaryType {
    Interior = 0,
    Convergent = 1,
    Divergent = 2,
    Transform = 3,
}

/// Raw collision outputs, consumed by stress propagation and elevation.
pub struct CollisionField {
    pub stress: Vec<f32>,
    pub subduct_factor: Vec<f32>,
    pub boundary_type: Vec<BoundaryType>,
    /// Both plates at the best boundary are oceanic.
    pub both_ocean: Vec<bool>,
    /// At least one plate at the best boundary is oceanic.
    pub has_ocean: Vec<bool>,
    pub colliding: Vec<bool>,
    /// Elevation feature seeds, classified from the collision geometry.
    pub mountain_seeds: Vec<u32>,
    pub coastline_seeds: Vec<u32>,
    pub ocean_seeds: Vec<u32>,
}

/// Drift-advection step. Scales with mesh resolution so the compression
/// threshold keeps the same meaning from 2k to 2.5M regions.
pub fn drift_dt(n_regions: usize) -> f64 {
    1e-2 / (n_regions as f64 / 10_000.0).sqrt().max(1.0)
}

/// Detect plate boundaries and compute stress/subduction per region.
///
/// For each region the single cross-plate neighbor with the greatest
/// compression (3D distance reduction after advancing both endpoints by
/// their plate drifts for `dt`) decides the boundary character.
pub fn detect_collisions(mesh: &SphereMesh, plates: &PlateSet, noise: &NoiseBasis) -> CollisionField {
    let n = mesh.n_regions();
    let dt = drift_dt(n);

    let mut field = CollisionField {
        stress: vec![0.0; n],
        subduct_factor: vec![0.0; n],
        boundary_type: vec![BoundaryType::Interior; n],
        both_ocean: vec![false; n],
        has_ocean: vec![false; n],
        colliding: vec![false; n],
        mountain_seeds: Vec::new(),
        coastline_seeds: Vec::new(),
        ocean_seeds: Vec::new(),
    };

    for r in 0..n {
        let pr = plates.region_plate[r] as usize;
        let p_r = mesh.pos[r];
        let v_r = plates.drift[pr];

        let mut best: Option<usize> = None;
        let mut best_comp = f64::NEG_INFINITY;
        for &nb in mesh.neighbors(r) {
            let nbu = nb as usize;
            let pn = plates.region_plate[nbu] as usize;
            if pn == pr {
                continue;
            }
            let p_n = mesh.pos[nbu];
            let v_n = plates.drift[pn];
            let before = (p_r - p_n).length();
            let after = ((p_r + v_r * dt) - (p_n + v_n * dt)).length();
            let comp = before - after;
            if comp > best_comp {
                best_comp = comp;
                best = Some(nbu);
            }
        }

        let Some(nb) = best else {
            continue; // interior: all neighbors share the plate
        };
        let pn = plates.region_plate[nb] as usize;
        let p_n = mesh.pos[nb];
        let v_n = plates.drift[pn];

        let colliding = best_comp > 0.75 * dt;
        field.colliding[r] = colliding;

        let delta = p_r - p_n;
        let sep = delta.length().max(1e-12);
        let normal_comp = -((v_r - v_n).dot(delta)) / sep;
        field.boundary_type[r] = if normal_comp > 0.3 * dt {
            BoundaryType::Convergent
        } else if normal_comp < -0.3 * dt {
            BoundaryType::Divergent
        } else {
            BoundaryType::Transform
        };

        let both_ocean = plates.is_ocean[pr] && plates.is_ocean[pn];
        let has_ocean = plates.is_ocean[pr] || plates.is_ocean[pn];
        field.both_ocean[r] = both_ocean;
        field.has_ocean[r] = has_ocean;

        if colliding {
            field.stress[r] = (best_comp / dt) as f32 * pair_intensity(pr as u16, pn as u16);
        }

        // Denser side subducts; mesoscale undulation where densities tie.
        let rho_r = plates.density[pr] as f64;
        let rho_n = plates.density[pn] as f64;
        let undulation = noise.fbm(p_r.x * 6.0, p_r.y * 6.0, p_r.z * 6.0, 3)
            * 0.4
            * (-12.0 * (rho_r - rho_n).abs()).exp();
        let sf = 0.5 + 0.5 * (8.0 * (rho_r - rho_n)).tanh() + undulation;
        field.subduct_factor[r] = sf.clamp(0.0, 1.0) as f32;

        let sf = field.subduct_factor[r];
        let r32 = r as u32;
        if both_ocean {
            if colliding {
                field.coastline_seeds.push(r32);
            } else {
                field.ocean_seeds.push(r32);
            }
        } else if !has_ocean {
            if colliding {
                if sf < 0.55 {
                    field.mountain_seeds.push(r32);
                } else {
                    field.coastline_seeds.push(r32);
                }
            }
        } else if colliding {
            field.mountain_seeds.push(r32);
        } else {
            field.coastline_seeds.push(r32);
        }
    }

    field
}

/// Deterministic intensity in [0.5, 1.5] for an unordered plate pair.
/// Same pair, same value, across every call site.
pub fn pair_intensity(a: u16, b: u16) -> f32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let h = splitmix64(((lo as u64) << 16) | hi as u64);
    0.5 + (h >> 40) as f32 / (1u64 << 24) as f32
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
