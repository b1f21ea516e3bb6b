//! Seasonal precipitation: oceanic moisture advected downwind, orographic
//! uplift over land, and an ITCZ convective belt, p95-normalized to [0, 1].

use crate::climate::itcz::ItczSpline;
use crate::climate::p95_normalize;
use crate::climate::wind::mesh_gradient;
use crate::mesh::SphereMesh;
use crate::planet::WindField;

/// Downwind relaxation passes for the moisture field.
const ADVECTION_PASSES: usize = 6;

/// Moisture fraction surviving one hop of travel.
const RETAIN_OCEAN: f32 = 0.9;
const RETAIN_LAND: f32 = 0.75;

/// Denormalization scale: a normalized value of 1.0 is 250 mm/month.
pub const MM_MONTH_AT_ONE: f32 = 250.0;

pub fn to_mm_month(p: f32) -> f32 {
    p * MM_MONTH_AT_ONE
}

pub fn from_mm_month(mm: f32) -> f32 {
    mm / MM_MONTH_AT_ONE
}

/// Compute the seasonal precipitation field.
pub fn precipitation(
    mesh: &SphereMesh,
    elevation: &[f32],
    wind: &WindField,
    itcz: &ItczSpline,
) -> Vec<f32> {
    let n = mesh.n_regions();
    let is_ocean: Vec<bool> = elevation.iter().map(|&e| e <= 0.0).collect();

    // Moisture sources: open water, richer where insolation is strong.
    let mut moisture: Vec<f32> = (0..n)
        .map(|r| {
            if is_ocean[r] {
                let cos_lat = (1.0 - mesh.sin_lat[r] * mesh.sin_lat[r]).max(0.0).sqrt();
                (0.4 + 0.6 * cos_lat) as f32
            } else {
                0.0
            }
        })
        .collect();

    // Downwind relaxation: each region absorbs moisture carried from
    // neighbors whose flow points at it, with rainout over land.
    let mut next = vec![0.0f32; n];
    for _ in 0..ADVECTION_PASSES {
        for r in 0..n {
            let pos = mesh.pos[r];
            let mut acc = 0.0f32;
            let mut total = 0.0f32;
            for &nb in mesh.neighbors(r) {
                let nbu = nb as usize;
                let off = (pos - mesh.pos[nbu]).reject_from(mesh.pos[nbu]);
                let Some(dir) = off.try_normalize() else { continue };
                let toward = wind.east[nbu] * dir.dot(mesh.east[nbu]) as f32
                    + wind.north[nbu] * dir.dot(mesh.north[nbu]) as f32;
                if toward > 0.0 {
                    acc += toward * moisture[nbu];
                    total += toward;
                }
            }
            let retain = if is_ocean[r] { RETAIN_OCEAN } else { RETAIN_LAND };
            let carried = if total > 1e-9 { acc / total * retain } else { 0.0 };
            next[r] = moisture[r].max(carried);
        }
        std::mem::swap(&mut moisture, &mut next);
    }

    // Orographic uplift: wind blowing up the elevation gradient wrings
    // moisture out on the windward side.
    let (slope_e, slope_n) = mesh_gradient(mesh, elevation);

    let mut precip = vec![0.0f32; n];
    for r in 0..n {
        let base = moisture[r] * 0.35;

        let orographic = if is_ocean[r] {
            0.0
        } else {
            let uphill = wind.east[r] * slope_e[r] + wind.north[r] * slope_n[r];
            uphill.max(0.0) * moisture[r] * 3.0
        };

        let d_itcz = mesh.lat_deg[r] - itcz.eval(mesh.lon_deg[r]);
        let convective = ((-0.5 * (d_itcz / 10.0) * (d_itcz / 10.0)).exp() as f32) * moisture[r] * 0.8;

        precip[r] = base + orographic + convective;
    }

    p95_normalize(&mut precip);
    precip
}
