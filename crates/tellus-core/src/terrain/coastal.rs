//! Coastal roughening and island arcs.
//!
//! Both kernels band their effect by hop distance from a feature front
//! (the shoreline, or convergent ocean-ocean boundaries) and carry the
//! front cell's stress/subduction attributes inward, first write wins.

use crate::mesh::SphereMesh;
use crate::noise::NoiseBasis;
use crate::plates::collision::{BoundaryType, CollisionField};
use crate::plates::PlateSet;

/// Per-cell attributes carried from the nearest coastal boundary cell.
struct CoastBand {
    dist: Vec<u32>,
    stress_norm: Vec<f32>,
    subduct: Vec<f32>,
    convergent: Vec<bool>,
}

const UNSET: u32 = u32::MAX;

/// Distance band of the roughening falloff, resolution-scaled.
pub fn coastal_band_width(n_regions: usize) -> u32 {
    ((8.0 * (n_regions as f64 / 10_000.0).sqrt()).round() as u32).max(8)
}

/// Island arcs hug the trench within this many hops.
pub fn arc_band_width(n_regions: usize) -> u32 {
    ((5.0 * (n_regions as f64 / 10_000.0).sqrt()).round() as u32).max(5)
}

/// Apply the three coastal noise layers within `coastal_band_width` hops of
/// the shoreline. `roughness` is the 0–0.5 slider; 0 is a no-op.
///
/// Layer seeds are `seed+77`, `seed+133`, `seed+211`.
pub fn roughen_coasts(
    mesh: &SphereMesh,
    elevation: &mut [f32],
    field: &CollisionField,
    max_stress: f32,
    roughness: f32,
    seed: u32,
) {
    if roughness <= 0.0 {
        return;
    }
    let n = mesh.n_regions();
    let max_cd = coastal_band_width(n);

    // Shoreline cells: elevation sign differs from some neighbor.
    let front: Vec<u32> = (0..n as u32)
        .filter(|&r| {
            let land = elevation[r as usize] > 0.0;
            mesh.neighbors(r as usize)
                .iter()
                .any(|&nb| (elevation[nb as usize] > 0.0) != land)
        })
        .collect();
    let band = carry_band(mesh, &front, field, max_stress, max_cd);

    let rough = NoiseBasis::new(seed.wrapping_add(77));
    let island = NoiseBasis::new(seed.wrapping_add(133));
    let warped = NoiseBasis::new(seed.wrapping_add(211));

    let amp = roughness as f64;
    for r in 0..n {
        if band.dist[r] == UNSET || band.dist[r] > max_cd {
            continue;
        }
        let t = band.dist[r] as f64 / max_cd as f64;
        let falloff = (1.0 - t) * (1.0 - t);
        let p = mesh.pos[r];
        let sn = band.stress_norm[r] as f64;
        let is_ocean = elevation[r] <= 0.0;

        // (i) high-frequency fractal relief, stress-amplified, damped on
        // the subducting ocean side so trenches keep their shape.
        let mut d1 = rough.fbm(p.x * 12.0, p.y * 12.0, p.z * 12.0, 3) * 0.3 * amp * falloff * (1.0 + 5.0 * sn);
        if is_ocean && band.subduct[r] > 0.5 {
            d1 *= 0.2;
        }
        elevation[r] += d1 as f32;

        // (ii) island scattering on near-coast ocean cells; convergent
        // margins scatter more readily.
        if is_ocean {
            let nv = island.fbm(p.x * 8.0, p.y * 8.0, p.z * 8.0, 3);
            let mut threshold = 0.55 - 0.25 * sn;
            if band.convergent[r] {
                threshold -= 0.05;
            }
            let over = (nv - threshold).max(0.0);
            elevation[r] += (over * over * 6.0 * amp * falloff) as f32;
        }

        // (iii) shoreline-aware domain-warped noise; the warp widens as the
        // shore gets closer.
        let w = warped.warped(p * 4.0, 0.2 + 0.6 * falloff);
        let d3 = warped.fbm(w.x, w.y, w.z, 3) * 0.25 * amp * falloff;
        elevation[r] += d3 as f32;
    }
}

/// Raise volcanic island arcs behind convergent ocean-ocean trenches.
///
/// Sources are convergent both-ocean cells on the overriding side
/// (`subduct_factor < 0.45`); the uplift stays on the source's plate and on
/// ocean regions, peaks a Gaussian band away from the trench, and is capped
/// at 0.55. Noise basis seeds from `seed+307`.
pub fn raise_island_arcs(
    mesh: &SphereMesh,
    elevation: &mut [f32],
    plates: &PlateSet,
    field: &CollisionField,
    max_stress: f32,
    seed: u32,
) {
    let n = mesh.n_regions();
    let max_arc = arc_band_width(n);

    let sources: Vec<u32> = (0..n as u32)
        .filter(|&r| {
            let r = r as usize;
            field.boundary_type[r] == BoundaryType::Convergent
                && field.both_ocean[r]
                && field.subduct_factor[r] < 0.45
        })
        .collect();
    if sources.is_empty() {
        return;
    }

    // BFS constrained to the source's plate and ocean regions, carrying the
    // source stress.
    let mut dist = vec![UNSET; n];
    let mut arc_stress = vec![0.0f32; n];
    let mut plate_of = vec![u16::MAX; n];
    let mut queue: Vec<u32> = Vec::new();
    for &s in &sources {
        let su = s as usize;
        dist[su] = 0;
        arc_stress[su] = field.stress[su] / max_stress;
        plate_of[su] = plates.region_plate[su];
        queue.push(s);
    }
    let mut qi = 0;
    while qi < queue.len() {
        let r = queue[qi] as usize;
        qi += 1;
        let d = dist[r] + 1;
        if d > max_arc {
            continue;
        }
        for &nb in mesh.neighbors(r) {
            let nbu = nb as usize;
            if dist[nbu] != UNSET {
                continue;
            }
            if plates.region_plate[nbu] != plate_of[r] {
                continue;
            }
            if !plates.is_ocean[plates.region_plate[nbu] as usize] {
                continue;
            }
            dist[nbu] = d;
            arc_stress[nbu] = arc_stress[r];
            plate_of[nbu] = plate_of[r];
            queue.push(nb);
        }
    }

    let noise = NoiseBasis::new(seed.wrapping_add(307));
    let peak = 0.6 * max_arc as f64;
    let sigma = max_arc as f64 / 3.0;
    for r in 0..n {
        if dist[r] == UNSET || dist[r] > max_arc {
            continue;
        }
        let p = mesh.pos[r];
        let g = (-((dist[r] as f64 - peak).powi(2)) / (2.0 * sigma * sigma)).exp();
        let ridge = noise.ridged(p.x * 7.0, p.y * 7.0, p.z * 7.0, 3);
        let uplift = (g * ridge * (0.5 + arc_stress[r] as f64)).min(0.55);
        elevation[r] += uplift as f32;
    }
}

/// BFS from `front`, carrying each front cell's stress/subduction/convergent
/// attributes inward. First write wins; ties resolve in adjacency order.
fn carry_band(
    mesh: &SphereMesh,
    front: &[u32],
    field: &CollisionField,
    max_stress: f32,
    max_dist: u32,
) -> CoastBand {
    let n = mesh.n_regions();
    let mut band = CoastBand {
        dist: vec![UNSET; n],
        stress_norm: vec![0.0; n],
        subduct: vec![0.0; n],
        convergent: vec![false; n],
    };
    let mut queue: Vec<u32> = Vec::new();
    for &f in front {
        let fu = f as usize;
        if band.dist[fu] != UNSET {
            continue;
        }
        band.dist[fu] = 0;
        band.stress_norm[fu] = field.stress[fu] / max_stress;
        band.subduct[fu] = field.subduct_factor[fu];
        band.convergent[fu] = field.boundary_type[fu] == BoundaryType::Convergent;
        queue.push(f);
    }
    let mut qi = 0;
    while qi < queue.len() {
        let r = queue[qi] as usize;
        qi += 1;
        let d = band.dist[r] + 1;
        if d > max_dist {
            continue;
        }
        for &nb in mesh.neighbors(r) {
            let nbu = nb as usize;
            if band.dist[nbu] == UNSET {
                band.dist[nbu] = d;
                band.stress_norm[nbu] = band.stress_norm[r];
                band.subduct[nbu] = band.subduct[r];
                band.convergent[nbu] = band.convergent[r];
                queue.push(nb);
            }
        }
    }
    band
}
