//! Seasonal surface temperature.
//!
//! Insolation base shifted by axial tilt, elevation lapse, continental
//! seasonal swing, ocean-warmth moderation near coasts, then two smoothing
//! passes. Output is normalized to [0, 1] spanning −45..+45 °C.

use crate::climate::{laplacian_smooth, smoothstep};
use crate::mesh::SphereMesh;
use crate::planet::{CurrentField, Season};

/// Physical range represented by the normalized field.
pub const MIN_C: f32 = -45.0;
pub const MAX_C: f32 = 45.0;

/// Cooling per unit of positive elevation.
const LAPSE_C: f64 = 25.0;

/// Peak continental summer/winter swing in °C.
const CONTINENTAL_SWING_C: f64 = 12.0;

/// Post-assembly smoothing passes.
const SMOOTH_PASSES: usize = 2;

pub fn to_celsius(t: f32) -> f32 {
    MIN_C + (MAX_C - MIN_C) * t
}

pub fn from_celsius(c: f32) -> f32 {
    ((c - MIN_C) / (MAX_C - MIN_C)).clamp(0.0, 1.0)
}

/// Compute the normalized seasonal temperature field.
pub fn temperature(
    mesh: &SphereMesh,
    elevation: &[f32],
    contn: &[f32],
    current: &CurrentField,
    season: Season,
    axial_tilt_deg: f32,
) -> Vec<f32> {
    let n = mesh.n_regions();
    let sign = season.sign();
    let shift = axial_tilt_deg as f64 * sign;

    let mut celsius = vec![0.0f32; n];
    for r in 0..n {
        let lat = mesh.lat_deg[r];

        // Radiative base: the subsolar latitude migrates with the season.
        let insolation = (lat - shift).to_radians().cos().max(0.0);
        let mut c = -25.0 + 55.0 * insolation;

        c -= LAPSE_C * f64::from(elevation[r].max(0.0));

        // Continental interiors swing hard between the seasons.
        let swing = CONTINENTAL_SWING_C
            * f64::from(contn[r])
            * smoothstep(0.1, 0.6, mesh.sin_lat[r].abs());
        if lat * sign >= 0.0 {
            c += swing * 0.6; // local summer
        } else {
            c -= swing;
        }

        // Warm/cold surface water moderates its own cell and, through the
        // later smoothing passes, the adjacent coast.
        if elevation[r] <= 0.0 {
            c += (f64::from(current.warmth[r]) - 0.5) * 8.0;
        }

        celsius[r] = c as f32;
    }

    laplacian_smooth(mesh, &mut celsius, SMOOTH_PASSES);
    celsius.iter().map(|&c| from_celsius(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::currents::surface_currents;
    use crate::climate::pressure::continentality;
    use crate::planet::WindField;

    fn temp_world(season: Season) -> (SphereMesh, Vec<f32>, Vec<f32>) {
        let mesh = SphereMesh::banded(24);
        let n = mesh.n_regions();
        let elev: Vec<f32> = (0..n)
            .map(|r| {
                let lat = mesh.lat_deg[r];
                let lon = mesh.lon_deg[r];
                if (10.0..55.0).contains(&lat) && (-80.0..20.0).contains(&lon) {
                    0.5
                } else {
                    -0.4
                }
            })
            .collect();
        let contn = continentality(&mesh, &elev);
        let wind = WindField { east: vec![0.5; n], north: vec![0.0; n], speed: vec![0.4; n] };
        let current = surface_currents(&mesh, &elev, &wind);
        let t = temperature(&mesh, &elev, &contn, &current, season, 23.5);
        (mesh, elev, t)
    }

    #[test]
    fn temperatures_stay_normalized() {
        for season in Season::ALL {
            let (mesh, _, t) = temp_world(season);
            for r in 0..mesh.n_regions() {
                assert!((0.0..=1.0).contains(&t[r]), "t {} at region {r}", t[r]);
            }
        }
    }

    #[test]
    fn equator_is_warmer_than_poles() {
        let (mesh, _, t) = temp_world(Season::Summer);
        let avg = |lo: f64, hi: f64| -> f32 {
            let mut s = 0.0f32;
            let mut c = 0u32;
            for r in 0..mesh.n_regions() {
                if (lo..hi).contains(&mesh.lat_deg[r].abs()) {
                    s += t[r];
                    c += 1;
                }
            }
            s / c as f32
        };
        assert!(avg(0.0, 10.0) > avg(70.0, 90.0) + 0.2);
    }

    #[test]
    fn summer_hemisphere_is_warmer_than_its_winter() {
        let (mesh, _, summer) = temp_world(Season::Summer);
        let (_, _, winter) = temp_world(Season::Winter);
        let mut northern_summer = 0.0f32;
        let mut northern_winter = 0.0f32;
        let mut count = 0u32;
        for r in 0..mesh.n_regions() {
            if mesh.lat_deg[r] > 30.0 {
                northern_summer += summer[r];
                northern_winter += winter[r];
                count += 1;
            }
        }
        assert!(count > 0);
        assert!(
            northern_summer > northern_winter,
            "northern mid-latitudes must cool from summer {northern_summer} to winter {northern_winter}"
        );
    }

    #[test]
    fn altitude_cools_the_surface() {
        let (mesh, elev, t) = temp_world(Season::Summer);
        // Compare land cells against ocean cells in the same latitude belt.
        let mut land = 0.0f32;
        let mut nland = 0u32;
        let mut sea = 0.0f32;
        let mut nsea = 0u32;
        for r in 0..mesh.n_regions() {
            let lat = mesh.lat_deg[r];
            if (20.0..40.0).contains(&lat) {
                if elev[r] > 0.0 {
                    land += t[r];
                    nland += 1;
                } else {
                    sea += t[r];
                    nsea += 1;
                }
            }
        }
        assert!(nland > 0 && nsea > 0);
        assert!(
            land / (nland as f32) < sea / (nsea as f32),
            "elevated land should be cooler than the adjacent sea surface"
        );
    }

    #[test]
    fn celsius_roundtrip_is_exact_inside_range() {
        for c in [-45.0f32, -10.0, 0.0, 17.5, 45.0] {
            let back = to_celsius(from_celsius(c));
            assert!((back - c).abs() < 1e-4, "{c} °C round-tripped to {back}");
        }
    }
}
