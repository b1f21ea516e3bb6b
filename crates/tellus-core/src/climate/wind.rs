//! Pressure-gradient wind on the irregular mesh.
//!
//! The gradient comes from two independent 1-D least-squares fits of
//! neighbor differences projected on the local east/north basis; the
//! pressure-gradient force is then rotated by a latitude-dependent
//! geostrophic angle minus a fixed friction angle, deflecting clockwise in
//! the northern hemisphere and counter-clockwise in the southern.

use crate::climate::{p95_normalize, smoothstep};
use crate::mesh::SphereMesh;
use crate::planet::WindField;

/// Full geostrophic deflection away from the equator belt.
const GEOSTROPHIC_DEG: f64 = 70.0;

/// Surface friction backs the deflection off everywhere.
const FRICTION_DEG: f64 = 20.0;

/// Magnitude scale applied after rotation.
const SPEED_SCALE: f64 = 0.6;

/// Least-squares gradient of a scalar field in the local tangent frame.
///
/// Returns `(grad_east, grad_north)` per region; a denominator below 1e-12
/// (degenerate neighbor geometry) yields a zero component.
pub fn mesh_gradient(mesh: &SphereMesh, field: &[f32]) -> (Vec<f32>, Vec<f32>) {
    let n = mesh.n_regions();
    let mut grad_e = vec![0.0f32; n];
    let mut grad_n = vec![0.0f32; n];
    for r in 0..n {
        let pos = mesh.pos[r];
        let east = mesh.east[r];
        let north = mesh.north[r];
        let mut ee = 0.0f64;
        let mut ep = 0.0f64;
        let mut nn = 0.0f64;
        let mut np = 0.0f64;
        for &nb in mesh.neighbors(r) {
            let nbu = nb as usize;
            let offset = mesh.pos[nbu] - pos;
            let de = offset.dot(east);
            let dn = offset.dot(north);
            let dp = (field[nbu] - field[r]) as f64;
            ee += de * de;
            ep += de * dp;
            nn += dn * dn;
            np += dn * dp;
        }
        grad_e[r] = if ee > 1e-12 { (ep / ee) as f32 } else { 0.0 };
        grad_n[r] = if nn > 1e-12 { (np / nn) as f32 } else { 0.0 };
    }
    (grad_e, grad_n)
}

/// Turn a smoothed pressure field into the tangent-plane wind field with
/// p95-normalized speeds.
pub fn wind_from_pressure(mesh: &SphereMesh, pressure: &[f32]) -> WindField {
    let n = mesh.n_regions();
    let (grad_e, grad_n) = mesh_gradient(mesh, pressure);

    let sin5 = 5.0f64.to_radians().sin();
    let mut east = vec![0.0f32; n];
    let mut north = vec![0.0f32; n];
    let mut speed = vec![0.0f32; n];

    for r in 0..n {
        let pgf_e = -grad_e[r] as f64;
        let pgf_n = -grad_n[r] as f64;

        let sin_lat = mesh.sin_lat[r];
        let geo = GEOSTROPHIC_DEG.to_radians() * smoothstep(0.0, sin5, sin_lat.abs());
        let total = if sin_lat > 0.0 { -1.0 } else { 1.0 } * (geo - FRICTION_DEG.to_radians());

        let (sin_a, cos_a) = total.sin_cos();
        let we = (cos_a * pgf_e - sin_a * pgf_n) * SPEED_SCALE;
        let wn = (sin_a * pgf_e + cos_a * pgf_n) * SPEED_SCALE;

        east[r] = we as f32;
        north[r] = wn as f32;
        speed[r] = (we * we + wn * wn).sqrt() as f32;
    }

    p95_normalize(&mut speed);
    WindField { east, north, speed }
}
