//! Seasonal sea-level pressure assembly.
//!
//! Sum of zonal Gaussian bands (ITCZ low, subtropical highs, subpolar lows,
//! polar highs), a thermal land/sea term driven by continentality, an
//! elevation term, and low-octave noise, then Laplacian-smoothed on the
//! mesh.

use crate::climate::itcz::ItczSpline;
use crate::climate::{laplacian_smooth, smoothstep};
use crate::mesh::SphereMesh;
use crate::noise::NoiseBasis;
use crate::planet::Season;

/// Reference sea-level pressure the anomaly terms sit on.
const BASE_HPA: f64 = 1013.0;

/// Smoothing passes after assembly.
const SMOOTH_PASSES: usize = 3;

/// Continentality: the land mask diffused by 10 Laplacian passes.
/// High deep inside continents, low over open ocean.
pub fn continentality(mesh: &SphereMesh, elevation: &[f32]) -> Vec<f32> {
    let mut field: Vec<f32> = elevation.iter().map(|&e| if e > 0.0 { 1.0 } else { 0.0 }).collect();
    laplacian_smooth(mesh, &mut field, 10);
    field
}

/// Assemble the seasonal pressure field in hPa and smooth it.
pub fn assemble_pressure(
    mesh: &SphereMesh,
    elevation: &[f32],
    contn: &[f32],
    itcz: &ItczSpline,
    season: Season,
    noise: &NoiseBasis,
) -> Vec<f32> {
    let n = mesh.n_regions();
    let sign = season.sign();
    let shift = 5.0 * sign; // subtropical highs migrate with the sun

    let mut pressure = vec![0.0f32; n];
    for r in 0..n {
        let lat = mesh.lat_deg[r];
        let lon = mesh.lon_deg[r];
        let cn = contn[r] as f64;
        let mut p = BASE_HPA;

        // ITCZ trough follows the spline, not the equator.
        let d_itcz = lat - itcz.eval(lon);
        p -= 15.0 * gaussian(d_itcz, 8.0);

        // Subtropical ridges, damped over continental interiors.
        p += 12.0
            * (1.0 - 0.3 * cn)
            * (gaussian(lat - (30.0 + shift), 10.0) + gaussian(lat + (30.0 - shift), 10.0));

        // Subpolar troughs and polar ridges.
        p -= 10.0 * (gaussian(lat - 60.0, 10.0) + gaussian(lat + 60.0, 10.0));
        p += 8.0 * (gaussian(lat - 85.0, 8.0) + gaussian(lat + 85.0, 8.0));

        // Thermal land/sea contrast: continental interiors run hot lows in
        // their summer and strong cold highs in their winter.
        let lf = lat_factor(lat.abs());
        let cw = smoothstep(0.2, 0.5, cn);
        if lat * sign >= 0.0 {
            p -= 10.0 * lf * cw;
        } else {
            p += 14.0 * lf * cw;
        }

        p -= 8.0 * f64::from(elevation[r].max(0.0));

        let pos = mesh.pos[r];
        p += 2.0 * noise.fbm(pos.x * 2.0, pos.y * 2.0, pos.z * 2.0, 3);

        pressure[r] = p as f32;
    }

    laplacian_smooth(mesh, &mut pressure, SMOOTH_PASSES);
    pressure
}

#[inline]
fn gaussian(x: f64, sigma: f64) -> f64 {
    (-0.5 * (x / sigma) * (x / sigma)).exp()
}

/// Latitude profile of the thermal term: zero in the tropics, 0.75 at 30°,
/// full strength through 45–60°, tapering to zero at the pole.
fn lat_factor(abs_lat: f64) -> f64 {
    if abs_lat < 15.0 {
        0.0
    } else if abs_lat < 30.0 {
        (abs_lat - 15.0) / 15.0 * 0.75
    } else if abs_lat < 45.0 {
        0.75 + (abs_lat - 30.0) / 15.0 * 0.25
    } else if abs_lat <= 60.0 {
        1.0
    } else {
        1.0 - (abs_lat - 60.0) / 30.0
    }
}
