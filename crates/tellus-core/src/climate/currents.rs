//! Wind-driven ocean surface flow.
//!
//! Ocean cells start from the local wind damped by latitude, then a few
//! relaxation passes deflect flow along coasts, smooth it over ocean
//! neighbors, and advect a warmth scalar downstream. Land cells carry zero
//! vectors and zero warmth.

use crate::climate::p95_normalize;
use crate::mesh::SphereMesh;
use crate::planet::{CurrentField, WindField};

/// Relaxation passes (deflect, smooth, advect warmth).
const PASSES: usize = 5;

/// Blend factor for neighbor smoothing and warmth advection.
const MIX: f32 = 0.5;

pub fn surface_currents(mesh: &SphereMesh, elevation: &[f32], wind: &WindField) -> CurrentField {
    let n = mesh.n_regions();
    let is_ocean: Vec<bool> = elevation.iter().map(|&e| e <= 0.0).collect();

    let mut east = vec![0.0f32; n];
    let mut north = vec![0.0f32; n];
    let mut warmth = vec![0.0f32; n];
    for r in 0..n {
        if !is_ocean[r] {
            continue;
        }
        // Wind stress couples weaker at high latitude (ice, stratification).
        let damp = (0.7 - 0.3 * mesh.sin_lat[r].abs()) as f32;
        east[r] = wind.east[r] * damp;
        north[r] = wind.north[r] * damp;
        warmth[r] = (1.0 - mesh.lat_deg[r].abs() / 90.0) as f32;
    }

    let mut next_e = vec![0.0f32; n];
    let mut next_n = vec![0.0f32; n];
    let mut next_w = vec![0.0f32; n];
    for _ in 0..PASSES {
        // (a) zero the into-coast component where a land neighbor looms.
        for r in 0..n {
            if !is_ocean[r] {
                continue;
            }
            let pos = mesh.pos[r];
            let e_axis = mesh.east[r];
            let n_axis = mesh.north[r];
            let mut cx = 0.0f64;
            let mut cy = 0.0f64;
            for &nb in mesh.neighbors(r) {
                let nbu = nb as usize;
                if !is_ocean[nbu] {
                    let off = mesh.pos[nbu] - pos;
                    cx += off.dot(e_axis);
                    cy += off.dot(n_axis);
                }
            }
            let len = (cx * cx + cy * cy).sqrt();
            if len > 1e-12 {
                let nx = (cx / len) as f32;
                let ny = (cy / len) as f32;
                let into = east[r] * nx + north[r] * ny;
                if into > 0.0 {
                    east[r] -= into * nx;
                    north[r] -= into * ny;
                }
            }
        }

        // (b) smooth with ocean neighbors.
        for r in 0..n {
            next_e[r] = east[r];
            next_n[r] = north[r];
            if !is_ocean[r] {
                continue;
            }
            let mut se = 0.0f32;
            let mut sn = 0.0f32;
            let mut count = 0u32;
            for &nb in mesh.neighbors(r) {
                let nbu = nb as usize;
                if is_ocean[nbu] {
                    se += east[nbu];
                    sn += north[nbu];
                    count += 1;
                }
            }
            if count > 0 {
                next_e[r] = east[r] * (1.0 - MIX) + se / count as f32 * MIX;
                next_n[r] = north[r] * (1.0 - MIX) + sn / count as f32 * MIX;
            }
        }
        std::mem::swap(&mut east, &mut next_e);
        std::mem::swap(&mut north, &mut next_n);

        // (c) advect warmth from upstream ocean neighbors.
        for r in 0..n {
            next_w[r] = warmth[r];
            if !is_ocean[r] {
                continue;
            }
            let pos = mesh.pos[r];
            let mut acc = 0.0f32;
            let mut total = 0.0f32;
            for &nb in mesh.neighbors(r) {
                let nbu = nb as usize;
                if !is_ocean[nbu] {
                    continue;
                }
                // Flow at the neighbor, projected on the neighbor→r offset.
                let off = (pos - mesh.pos[nbu]).reject_from(mesh.pos[nbu]);
                let Some(dir) = off.try_normalize() else { continue };
                let toward =
                    east[nbu] * dir.dot(mesh.east[nbu]) as f32 + north[nbu] * dir.dot(mesh.north[nbu]) as f32;
                if toward > 0.0 {
                    acc += toward * warmth[nbu];
                    total += toward;
                }
            }
            if total > 1e-9 {
                next_w[r] = warmth[r] * (1.0 - MIX) + acc / total * MIX;
            }
        }
        std::mem::swap(&mut warmth, &mut next_w);
    }

    let mut speed: Vec<f32> = (0..n)
        .map(|r| (east[r] * east[r] + north[r] * north[r]).sqrt())
        .collect();
    p95_normalize(&mut speed);
    for w in warmth.iter_mut() {
        *w = w.clamp(0.0, 1.0);
    }

    CurrentField { east, north, speed, warmth }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Uniform eastward wind over a world with a polar continent.
    fn wind_world() -> (SphereMesh, Vec<f32>, WindField) {
        let mesh = SphereMesh::banded(24);
        let n = mesh.n_regions();
        let elev: Vec<f32> = (0..n)
            .map(|r| if mesh.lat_deg[r] > 50.0 { 0.5f32 } else { -0.4 })
            .collect();
        let wind = WindField {
            east: vec![1.0; n],
            north: vec![0.0; n],
            speed: vec![0.5; n],
        };
        (mesh, elev, wind)
    }

    #[test]
    fn land_cells_carry_no_current() {
        let (mesh, elev, wind) = wind_world();
        let cur = surface_currents(&mesh, &elev, &wind);
        for r in 0..mesh.n_regions() {
            if elev[r] > 0.0 {
                assert_eq!(cur.east[r], 0.0, "land region {r} has current");
                assert_eq!(cur.north[r], 0.0);
                assert_eq!(cur.warmth[r], 0.0);
            }
        }
    }

    #[test]
    fn speeds_and_warmth_stay_in_unit_interval() {
        let (mesh, elev, wind) = wind_world();
        let cur = surface_currents(&mesh, &elev, &wind);
        for r in 0..mesh.n_regions() {
            assert!((0.0..=1.0).contains(&cur.speed[r]), "speed {} at {r}", cur.speed[r]);
            assert!((0.0..=1.0).contains(&cur.warmth[r]), "warmth {} at {r}", cur.warmth[r]);
        }
    }

    #[test]
    fn equatorial_water_is_warmer_than_polar() {
        let (mesh, elev, wind) = wind_world();
        let cur = surface_currents(&mesh, &elev, &wind);
        let avg = |lo: f64, hi: f64| -> f32 {
            let mut s = 0.0f32;
            let mut c = 0u32;
            for r in 0..mesh.n_regions() {
                if elev[r] <= 0.0 && (lo..hi).contains(&mesh.lat_deg[r].abs()) {
                    s += cur.warmth[r];
                    c += 1;
                }
            }
            s / c as f32
        };
        let tropics = avg(0.0, 15.0);
        let subpolar = avg(55.0, 90.0);
        assert!(
            tropics > subpolar + 0.2,
            "tropical warmth {tropics} should clearly exceed subpolar {subpolar}"
        );
    }

    #[test]
    fn currents_are_tangent_components_only_and_finite() {
        let (mesh, elev, wind) = wind_world();
        let cur = surface_currents(&mesh, &elev, &wind);
        for r in 0..mesh.n_regions() {
            assert!(cur.east[r].is_finite() && cur.north[r].is_finite(), "NaN current at {r}");
        }
    }

    #[test]
    fn coastal_cells_do_not_flow_into_land() {
        let (mesh, elev, wind) = wind_world();
        let cur = surface_currents(&mesh, &elev, &wind);
        // Ocean cells bordering the polar continent: northward (into-coast)
        // flow should have been deflected away or zeroed.
        for r in 0..mesh.n_regions() {
            if elev[r] > 0.0 {
                continue;
            }
            let coastal = mesh.neighbors(r).iter().any(|&nb| elev[nb as usize] > 0.0);
            if coastal && mesh.lat_deg[r] > 40.0 {
                assert!(
                    cur.north[r] < 0.35,
                    "coastal cell {r} still drives {} into the coast",
                    cur.north[r]
                );
            }
        }
    }
}
