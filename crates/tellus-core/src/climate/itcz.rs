//! Seasonal ITCZ latitude curve.
//!
//! 72 longitude knots sample tropical land fraction and relief through a
//! 5°×5° geographic index; the knots are smoothed with a periodic moving
//! average and fitted with a periodic natural cubic spline, solved by
//! Gauss–Seidel relaxation (20 sweeps converge far below evaluation
//! tolerance at this system size).

use crate::mesh::SphereMesh;
use crate::planet::Season;

/// Knot count (one per 5° of longitude).
const KNOTS: usize = 72;

/// Knot spacing in degrees.
const H: f64 = 360.0 / KNOTS as f64;

/// Gauss–Seidel sweeps for the periodic tridiagonal system.
const RELAX_SWEEPS: usize = 20;

/// ITCZ magnitude bounds in degrees.
const ITCZ_MIN: f64 = 5.0;
const ITCZ_MAX: f64 = 20.0;

/// Periodic natural cubic spline through the 72 ITCZ knots.
pub struct ItczSpline {
    y: Vec<f64>,
    second: Vec<f64>,
    /// Longitude of knot 0 in degrees.
    x0: f64,
}

impl ItczSpline {
    /// Evaluate the ITCZ latitude (degrees) at any longitude (degrees).
    /// Periodic: `eval(−180) == eval(+180)` exactly.
    pub fn eval(&self, lon_deg: f64) -> f64 {
        let t = (lon_deg - self.x0).rem_euclid(360.0);
        let i = ((t / H) as usize).min(KNOTS - 1);
        let j = (i + 1) % KNOTS;
        let u = t - i as f64 * H; // 0..H within the segment
        let v = H - u;

        self.second[i] * v * v * v / (6.0 * H)
            + self.second[j] * u * u * u / (6.0 * H)
            + (self.y[i] / H - self.second[i] * H / 6.0) * v
            + (self.y[j] / H - self.second[j] * H / 6.0) * u
    }
}

/// Build the seasonal ITCZ spline from land fraction and relief.
///
/// At each knot longitude the four tropical 5° latitude bins of the summer
/// hemisphere are sampled within a 20° longitude radius; more land and less
/// relief pull the ITCZ further poleward.
pub fn build_itcz(mesh: &SphereMesh, elevation: &[f32], season: Season) -> ItczSpline {
    let index = GeoIndex::build(mesh);
    let sign = season.sign();

    // Summer-hemisphere tropical latitude bins (centers 2.5°..17.5°).
    let lat_bins: [usize; 4] = if sign > 0.0 { [18, 19, 20, 21] } else { [14, 15, 16, 17] };

    let mut knots = vec![0.0f64; KNOTS];
    for (li, knot) in knots.iter_mut().enumerate() {
        let mut samples = 0usize;
        let mut land = 0usize;
        let mut elev_sum = 0.0f64;
        for dj in -4i32..=4 {
            let lj = (li as i32 + dj).rem_euclid(KNOTS as i32) as usize;
            for &bi in &lat_bins {
                for &r in index.bin(bi, lj) {
                    let e = elevation[r as usize];
                    samples += 1;
                    if e > 0.0 {
                        land += 1;
                    }
                    elev_sum += e.max(0.0) as f64;
                }
            }
        }
        let (land_frac, avg_elev) = if samples > 0 {
            (land as f64 / samples as f64, elev_sum / samples as f64)
        } else {
            (0.0, 0.0)
        };
        let deg = (5.0 + 15.0 * (2.0 * land_frac).min(1.0) - 5.0 * avg_elev).clamp(ITCZ_MIN, ITCZ_MAX);
        *knot = deg * sign;
    }

    // Three passes of periodic (¼, ½, ¼) smoothing, then re-clamp.
    for _ in 0..3 {
        let prev = knots.clone();
        for i in 0..KNOTS {
            let l = prev[(i + KNOTS - 1) % KNOTS];
            let r = prev[(i + 1) % KNOTS];
            knots[i] = 0.25 * l + 0.5 * prev[i] + 0.25 * r;
        }
    }
    for k in knots.iter_mut() {
        *k = k.abs().clamp(ITCZ_MIN, ITCZ_MAX) * sign;
    }

    // Periodic natural cubic spline: relax the tridiagonal system
    //   M[i-1] + 4 M[i] + M[i+1] = 6 (y[i-1] - 2 y[i] + y[i+1]) / h².
    let mut rhs = vec![0.0f64; KNOTS];
    for i in 0..KNOTS {
        let l = knots[(i + KNOTS - 1) % KNOTS];
        let r = knots[(i + 1) % KNOTS];
        rhs[i] = 6.0 * (l - 2.0 * knots[i] + r) / (H * H);
    }
    let mut second = vec![0.0f64; KNOTS];
    for _ in 0..RELAX_SWEEPS {
        for i in 0..KNOTS {
            let l = second[(i + KNOTS - 1) % KNOTS];
            let r = second[(i + 1) % KNOTS];
            second[i] = (rhs[i] - l - r) / 4.0;
        }
    }

    ItczSpline { y: knots, second, x0: -180.0 + H / 2.0 }
}

/// Regions binned 5° × 5° by latitude and longitude.
struct GeoIndex {
    bins: Vec<Vec<u32>>,
}

impl GeoIndex {
    fn build(mesh: &SphereMesh) -> Self {
        let mut bins: Vec<Vec<u32>> = vec![Vec::new(); 36 * KNOTS];
        for r in 0..mesh.n_regions() {
            let bi = (((mesh.lat_deg[r] + 90.0) / 5.0) as usize).min(35);
            let bj = (((mesh.lon_deg[r] + 180.0) / 5.0) as usize).min(KNOTS - 1);
            bins[bi * KNOTS + bj].push(r as u32);
        }
        Self { bins }
    }

    #[inline]
    fn bin(&self, lat_bin: usize, lon_bin: usize) -> &[u32] {
        &self.bins[lat_bin * KNOTS + lon_bin]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_world() -> (SphereMesh, Vec<f32>) {
        let mesh = SphereMesh::banded(24);
        let elev = vec![-0.3f32; mesh.n_regions()];
        (mesh, elev)
    }

    fn tropic_land_world() -> (SphereMesh, Vec<f32>) {
        let mesh = SphereMesh::banded(24);
        let elev = (0..mesh.n_regions())
            .map(|r| if (0.0..25.0).contains(&mesh.lat_deg[r]) { 0.3f32 } else { -0.3 })
            .collect();
        (mesh, elev)
    }

    #[test]
    fn summer_itcz_sits_north_winter_south() {
        let (mesh, elev) = flat_world();
        let summer = build_itcz(&mesh, &elev, Season::Summer);
        let winter = build_itcz(&mesh, &elev, Season::Winter);
        for lon in [-180.0, -90.0, 0.0, 90.0, 179.0] {
            let s = summer.eval(lon);
            let w = winter.eval(lon);
            assert!((5.0..=20.0).contains(&s), "summer ITCZ {s}° at lon {lon}");
            assert!((-20.0..=-5.0).contains(&w), "winter ITCZ {w}° at lon {lon}");
        }
    }

    #[test]
    fn land_pulls_the_itcz_poleward() {
        let (mesh, ocean) = flat_world();
        let (_, land) = tropic_land_world();
        let over_ocean = build_itcz(&mesh, &ocean, Season::Summer);
        let over_land = build_itcz(&mesh, &land, Season::Summer);
        let mean = |s: &ItczSpline| -> f64 {
            (0..36).map(|i| s.eval(-180.0 + i as f64 * 10.0)).sum::<f64>() / 36.0
        };
        assert!(
            mean(&over_land) > mean(&over_ocean) + 1.0,
            "tropical land ({:.2}°) should push the ITCZ past the all-ocean case ({:.2}°)",
            mean(&over_land),
            mean(&over_ocean)
        );
    }

    #[test]
    fn spline_is_continuous_at_the_seam() {
        let (mesh, elev) = tropic_land_world();
        for season in Season::ALL {
            let spline = build_itcz(&mesh, &elev, season);
            let gap = (spline.eval(-180.0) - spline.eval(180.0)).abs();
            assert!(gap < 1e-6, "seam gap {gap} for {season:?}");
        }
    }

    #[test]
    fn spline_interpolates_its_knots() {
        let (mesh, elev) = tropic_land_world();
        let spline = build_itcz(&mesh, &elev, Season::Summer);
        for i in 0..KNOTS {
            let x = spline.x0 + i as f64 * H;
            let got = spline.eval(x);
            assert!(
                (got - spline.y[i]).abs() < 1e-9,
                "knot {i}: eval {got} vs y {}",
                spline.y[i]
            );
        }
    }

    #[test]
    fn spline_stays_within_clamp_band() {
        let (mesh, elev) = tropic_land_world();
        let spline = build_itcz(&mesh, &elev, Season::Summer);
        for i in 0..720 {
            let v = spline.eval(-180.0 + i as f64 * 0.5);
            assert!(
                (4.0..=21.0).contains(&v),
                "spline overshoot {v}° at lon {}",
                -180.0 + i as f64 * 0.5
            );
        }
    }
}
