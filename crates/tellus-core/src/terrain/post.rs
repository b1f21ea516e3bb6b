//! Terrain post-processing: smoothing, composite erosion, ridge
//! sharpening, soil creep.
//!
//! Every step gates its stencil on a land/ocean snapshot taken before the
//! step sequence, so no pass can move a cell across the shoreline.

use crate::mesh::SphereMesh;
use crate::params::PlanetParams;

/// Fixed soil-creep schedule; the slider only switches it on.
const CREEP_PASSES: usize = 3;
const CREEP_STRENGTH: f32 = 0.1125;

/// Floor for land cells eroded toward sea level.
const LAND_FLOOR: f32 = 1e-4;

/// Run the enabled post-processing steps in their fixed order.
pub fn apply_post_processing(mesh: &SphereMesh, elevation: &mut Vec<f32>, params: &PlanetParams) {
    let is_ocean: Vec<bool> = elevation.iter().map(|&e| e <= 0.0).collect();

    if params.smoothing > 0.0 {
        let passes = (1.0 + 4.0 * params.smoothing).round() as usize;
        let strength = 0.2 + 0.5 * params.smoothing;
        smooth(mesh, elevation, &is_ocean, passes, strength);
    }
    if params.hydraulic_erosion > 0.0 {
        let iters = (30.0 * params.hydraulic_erosion).round().max(1.0) as usize;
        hydraulic(mesh, elevation, &is_ocean, iters, 0.02 * params.hydraulic_erosion);
    }
    if params.thermal_erosion > 0.0 {
        let iters = (20.0 * params.thermal_erosion).round().max(1.0) as usize;
        thermal(mesh, elevation, &is_ocean, iters, 0.15);
    }
    if params.glacial_erosion > 0.0 {
        glacial(mesh, elevation, &is_ocean, 8, 0.25 * params.glacial_erosion);
    }
    if params.ridge_sharpening > 0.0 {
        sharpen_ridges(mesh, elevation, &is_ocean, 0.5 * params.ridge_sharpening);
    }
    if params.soil_creep > 0.0 {
        creep(mesh, elevation, &is_ocean, CREEP_PASSES, CREEP_STRENGTH);
    }
}

/// Gaussian-weighted neighbor smoothing, restricted to same-class stencils.
fn smooth(mesh: &SphereMesh, elev: &mut Vec<f32>, is_ocean: &[bool], passes: usize, strength: f32) {
    let n = mesh.n_regions();
    let w_nb = (-0.5f32).exp(); // one hop out on a unit-sigma kernel
    let mut next = vec![0.0f32; n];
    for _ in 0..passes {
        for r in 0..n {
            let mut sum = elev[r];
            let mut total = 1.0f32;
            for &nb in mesh.neighbors(r) {
                let nbu = nb as usize;
                if is_ocean[nbu] == is_ocean[r] {
                    sum += elev[nbu] * w_nb;
                    total += w_nb;
                }
            }
            let mean = sum / total;
            next[r] = elev[r] + (mean - elev[r]) * strength;
        }
        std::mem::swap(elev, &mut next);
    }
}

/// Stream-power erosion with a talus-limited detachment and partial
/// downstream deposition.
fn hydraulic(mesh: &SphereMesh, elev: &mut [f32], is_ocean: &[bool], iters: usize, k: f32) {
    let n = mesh.n_regions();
    let mut order: Vec<u32> = (0..n as u32).filter(|&r| !is_ocean[r as usize]).collect();

    for _ in 0..iters {
        // High-to-low order so flow accumulates before it erodes.
        order.sort_unstable_by(|&a, &b| {
            elev[b as usize].partial_cmp(&elev[a as usize]).unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut area = vec![1.0f32; n];
        let mut downhill = vec![u32::MAX; n];
        for &r in &order {
            let ru = r as usize;
            let mut best = u32::MAX;
            let mut best_drop = 0.0f32;
            for &nb in mesh.neighbors(ru) {
                let drop = elev[ru] - elev[nb as usize];
                if drop > best_drop {
                    best_drop = drop;
                    best = nb;
                }
            }
            downhill[ru] = best;
        }
        for &r in &order {
            let ru = r as usize;
            if downhill[ru] != u32::MAX {
                area[downhill[ru] as usize] += area[ru];
            }
        }

        for &r in &order {
            let ru = r as usize;
            let d = downhill[ru];
            if d == u32::MAX {
                continue; // local pit; nothing to detach into
            }
            let du = d as usize;
            let slope = elev[ru] - elev[du];
            // Capacity grows with drainage area; talus caps the cut so the
            // cell cannot drop below its receiver.
            let cut = (k * area[ru].sqrt() * slope).min(0.5 * slope);
            elev[ru] = (elev[ru] - cut).max(LAND_FLOOR);
            if !is_ocean[du] {
                elev[du] += cut * 0.3; // partial deposition, rest leaves the system
            }
        }
    }
}

/// Angle-of-repose slumping: excess slope above the talus threshold moves
/// material to the steepest same-class neighbor.
fn thermal(mesh: &SphereMesh, elev: &mut [f32], is_ocean: &[bool], iters: usize, talus: f32) {
    let n = mesh.n_regions();
    for _ in 0..iters {
        for r in 0..n {
            if is_ocean[r] {
                continue;
            }
            let mut best = usize::MAX;
            let mut best_drop = talus;
            for &nb in mesh.neighbors(r) {
                let nbu = nb as usize;
                if is_ocean[nbu] {
                    continue;
                }
                let drop = elev[r] - elev[nbu];
                if drop > best_drop {
                    best_drop = drop;
                    best = nbu;
                }
            }
            if best != usize::MAX {
                let transfer = (best_drop - talus) * 0.25;
                elev[r] = (elev[r] - transfer).max(LAND_FLOOR);
                elev[best] += transfer;
            }
        }
    }
}

/// Glacial planing at high latitude or altitude: a high-pass taken off the
/// peaks and fed into the hollows, weighted by a glaciation gate.
fn glacial(mesh: &SphereMesh, elev: &mut Vec<f32>, is_ocean: &[bool], iters: usize, strength: f32) {
    let n = mesh.n_regions();
    let gate: Vec<f32> = (0..n)
        .map(|r| {
            let lat_part = ((mesh.lat_deg[r].abs() - 55.0) / 25.0).clamp(0.0, 1.0) as f32;
            let alt_part = ((elev[r] - 0.5) / 0.4).clamp(0.0, 1.0);
            lat_part.max(alt_part)
        })
        .collect();
    let mut next = vec![0.0f32; n];
    for _ in 0..iters {
        for r in 0..n {
            next[r] = elev[r];
            if is_ocean[r] || gate[r] == 0.0 {
                continue;
            }
            let mut sum = 0.0f32;
            let mut count = 0u32;
            for &nb in mesh.neighbors(r) {
                if is_ocean[nb as usize] == is_ocean[r] {
                    sum += elev[nb as usize];
                    count += 1;
                }
            }
            if count == 0 {
                continue;
            }
            let mean = sum / count as f32;
            next[r] = (elev[r] - (elev[r] - mean) * strength * gate[r]).max(LAND_FLOOR);
        }
        std::mem::swap(elev, &mut next);
    }
}

/// One-sided high-pass on land: cells above their neighborhood mean get
/// pushed further up, steepening crest lines without touching valleys.
fn sharpen_ridges(mesh: &SphereMesh, elev: &mut Vec<f32>, is_ocean: &[bool], strength: f32) {
    let n = mesh.n_regions();
    let mut next = elev.clone();
    for r in 0..n {
        if is_ocean[r] {
            continue;
        }
        let mut sum = 0.0f32;
        let mut count = 0u32;
        for &nb in mesh.neighbors(r) {
            if !is_ocean[nb as usize] {
                sum += elev[nb as usize];
                count += 1;
            }
        }
        if count == 0 {
            continue;
        }
        let highpass = elev[r] - sum / count as f32;
        if highpass > 0.0 {
            next[r] = elev[r] + highpass * strength;
        }
    }
    *elev = next;
}

/// Mild same-class diffusion.
fn creep(mesh: &SphereMesh, elev: &mut Vec<f32>, is_ocean: &[bool], passes: usize, strength: f32) {
    smooth(mesh, elev, is_ocean, passes, strength);
}
