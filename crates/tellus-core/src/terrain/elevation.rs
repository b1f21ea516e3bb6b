//! Elevation assembly: three feature distance fields plus propagated stress
//! plus domain-warped noise.
//!
//! The base profile interpolates between mountain cores (near), ocean
//! basins (far) and coastlines via reciprocal hop distances; stress then
//! sculpts uplift, forearc depressions, rifts, ridges and trenches on top.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::mesh::SphereMesh;
use crate::noise::NoiseBasis;
use crate::plates::collision::{BoundaryType, CollisionField};
use crate::plates::distance::{bfs_distance, distance_field, UNREACHABLE};
use crate::plates::PlateSet;

/// Reciprocal-distance softening; also the seed-cell peak height scale.
const EPS: f64 = 1e-2;

/// Mountain seeds on the overriding side only.
const SUBDUCT_MOUNTAIN_CUTOFF: f32 = 0.55;

/// Combine the collision seed sets and propagated stress into elevation.
///
/// `field.stress` / `field.subduct_factor` must already be propagated.
/// Distance-field RNGs derive from `seed+1`, `seed+2`, `seed+3` so the
/// three fields reproduce in isolation.
pub fn assemble_elevation(
    mesh: &SphereMesh,
    plates: &PlateSet,
    field: &CollisionField,
    seed: u32,
) -> Vec<f32> {
    let n = mesh.n_regions();

    // Plate seeds join the feature sets by their ocean status.
    let mut ocean_seeds = field.ocean_seeds.clone();
    let mut coastline_seeds = field.coastline_seeds.clone();
    for (p, &s) in plates.seeds.iter().enumerate() {
        if plates.is_ocean[p] {
            ocean_seeds.push(s);
        } else {
            coastline_seeds.push(s);
        }
    }
    let stress_mountains: Vec<u32> = field
        .mountain_seeds
        .iter()
        .copied()
        .filter(|&r| field.subduct_factor[r as usize] < SUBDUCT_MOUNTAIN_CUTOFF)
        .collect();

    let ocean_mask = mask(n, &ocean_seeds);
    let coast_mask = mask(n, &coastline_seeds);
    let mut triple_mask = mask(n, &stress_mountains);
    for r in 0..n {
        triple_mask[r] = triple_mask[r] || ocean_mask[r] || coast_mask[r];
    }

    let dist_mountain = distance_field(
        mesh,
        &stress_mountains,
        &ocean_mask,
        &mut StdRng::seed_from_u64(seed as u64 + 1),
    );
    let dist_ocean = distance_field(
        mesh,
        &ocean_seeds,
        &coast_mask,
        &mut StdRng::seed_from_u64(seed as u64 + 2),
    );
    let dist_coastline = distance_field(
        mesh,
        &coastline_seeds,
        &triple_mask,
        &mut StdRng::seed_from_u64(seed as u64 + 3),
    );

    // Shore-adjacent ocean cells, expanded unblocked: ocean-floor depth.
    let shore: Vec<u32> = (0..n as u32)
        .filter(|&r| {
            plates.is_ocean[plates.region_plate[r as usize] as usize]
                && mesh.neighbors(r as usize).iter().any(|&nb| {
                    !plates.is_ocean[plates.region_plate[nb as usize] as usize]
                })
        })
        .collect();
    let dist_coast = bfs_distance(mesh, &shore, &[]);

    let max_stress = field.stress.iter().fold(1e-2f32, |a, &s| a.max(s));
    let noise = NoiseBasis::new(seed);

    let mut elevation = vec![0.0f32; n];
    for r in 0..n {
        let p = mesh.pos[r];
        let w = noise.warped(p, 0.4);

        let a = recip_dist(dist_mountain[r]);
        let b = recip_dist(dist_ocean[r]);
        let c = recip_dist(dist_coastline[r]);

        let mut elev = if a == 0.0 && b == 0.0 {
            0.1
        } else {
            (a - b) / (a + b + c)
        };

        let stress_norm = (field.stress[r] / max_stress) as f64;
        let sf = field.subduct_factor[r] as f64;
        let on_ocean_plate = plates.is_ocean[plates.region_plate[r] as usize];

        if !on_ocean_plate {
            // Subducting side of a convergent margin sits lower.
            if sf > 0.5 && elev > 0.0 {
                elev *= 1.0 - 0.35 * (sf - 0.5) * 2.0;
            }

            let height_var = 0.75 + 0.5 * noise.fbm(w.x * 3.0, w.y * 3.0, w.z * 3.0, 3);
            if stress_norm > 0.05 {
                elev += stress_norm * 0.8 * height_var;
            } else if stress_norm > 0.0 {
                // Foreland sag where the stress tail peters out.
                elev -= 0.05 * (1.0 - stress_norm / 0.05);
            }

            if field.boundary_type[r] == BoundaryType::Divergent && !field.has_ocean[r] {
                elev -= 0.12; // continental rift valley
            }

            let blend = (stress_norm * 3.0).min(1.0);
            let smooth = noise.fbm(w.x * 2.0, w.y * 2.0, w.z * 2.0, 3) * 0.15;
            let ridged = (noise.ridged(w.x * 2.5, w.y * 2.5, w.z * 2.5, 3) - 0.5) * 0.2;
            elev += smooth * (1.0 - blend) + ridged * blend * 1.5;
        } else {
            let base = ocean_depth_base(dist_coast[r], &noise, w.x, w.y, w.z);
            elev = elev.min(base);

            if field.boundary_type[r] == BoundaryType::Divergent && field.both_ocean[r] {
                elev += 0.12 * noise.ridged(w.x * 3.0, w.y * 3.0, w.z * 3.0, 3) + 0.06;
            }
            if field.boundary_type[r] == BoundaryType::Convergent {
                elev -= 0.15 + 0.15 * stress_norm; // trench
            }
            elev += 0.03 * noise.fbm(w.x * 4.0, w.y * 4.0, w.z * 4.0, 2);
        }

        elevation[r] = elev as f32;
    }

    elevation
}

fn mask(n: usize, seeds: &[u32]) -> Vec<bool> {
    let mut m = vec![false; n];
    for &s in seeds {
        m[s as usize] = true;
    }
    m
}

/// 1/(d + ε), zero for unreachable regions.
#[inline]
fn recip_dist(d: u32) -> f64 {
    if d == UNREACHABLE {
        0.0
    } else {
        1.0 / (d as f64 + EPS)
    }
}

/// Shelf 0–5 hops, steeper slope 5–12, abyssal plain with mild noise beyond.
fn ocean_depth_base(dist_coast: u32, noise: &NoiseBasis, x: f64, y: f64, z: f64) -> f64 {
    let d = if dist_coast == UNREACHABLE { 999.0 } else { dist_coast as f64 };
    if d <= 5.0 {
        -0.02 - 0.016 * d
    } else if d <= 12.0 {
        -0.10 - 0.05 * (d - 5.0)
    } else {
        -0.45 + 0.05 * noise.fbm(x * 2.0, y * 2.0, z * 2.0, 2)
    }
}
