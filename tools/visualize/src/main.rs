//! Diagnostic visualizer — writes equirectangular PNG debug maps of the
//! per-region fields to data/debug/. Not part of the main pipeline.

use std::fs;
use std::path::Path;

use tellus_core::climate::koppen::KoppenClass;
use tellus_core::planet::{Planet, Season};
use tellus_core::{PlanetGenerator, PlanetParams, SphereMesh};

const W: u32 = 720;
const H: u32 = 360;

// ── Colour helpers ────────────────────────────────────────────────────────────

/// Elevation → hypsometric tint (deep blue → shallow blue → green → brown → white).
fn elevation_color(e: f32) -> [u8; 3] {
    if e <= 0.0 {
        let t = (-e / 0.6).clamp(0.0, 1.0);
        [(120.0 * (1.0 - t)) as u8, (160.0 * (1.0 - t) + 30.0) as u8, (220.0 - 120.0 * t) as u8]
    } else if e < 0.4 {
        let t = e / 0.4;
        [(90.0 + 80.0 * t) as u8, (160.0 - 40.0 * t) as u8, (70.0 - 30.0 * t) as u8]
    } else {
        let t = ((e - 0.4) / 0.6).clamp(0.0, 1.0);
        [(170.0 + 85.0 * t) as u8, (120.0 + 135.0 * t) as u8, (40.0 + 215.0 * t) as u8]
    }
}

/// Plate id → stable distinct colour.
fn plate_color(p: u16) -> [u8; 3] {
    let h = (p as u32).wrapping_mul(2654435761);
    [(h >> 8) as u8 | 0x40, (h >> 16) as u8 | 0x40, (h >> 24) as u8 | 0x40]
}

/// Unit scalar → white-to-blue ramp.
fn blue_ramp(v: f32) -> [u8; 3] {
    let t = v.clamp(0.0, 1.0);
    [(255.0 * (1.0 - t)) as u8, (255.0 - 140.0 * t) as u8, 255]
}

/// Unit scalar → cold-to-hot ramp.
fn thermal_ramp(v: f32) -> [u8; 3] {
    let t = v.clamp(0.0, 1.0);
    [(255.0 * t) as u8, (90.0 + 60.0 * (1.0 - (2.0 * t - 1.0).abs())) as u8, (255.0 * (1.0 - t)) as u8]
}

fn koppen_color(k: KoppenClass) -> [u8; 3] {
    use KoppenClass::*;
    match k {
        Ocean => [150, 180, 220],
        Af => [0, 0, 254],
        Am => [0, 119, 255],
        Aw | As => [70, 169, 250],
        BWh => [254, 0, 0],
        BWk => [254, 150, 149],
        BSh => [245, 163, 1],
        BSk => [255, 219, 99],
        Csa => [255, 255, 0],
        Csb => [198, 199, 0],
        Csc => [150, 150, 0],
        Cwa => [150, 255, 150],
        Cwb => [99, 199, 100],
        Cwc => [50, 150, 51],
        Cfa => [198, 255, 78],
        Cfb => [102, 255, 51],
        Cfc => [51, 199, 1],
        Dsa => [255, 0, 254],
        Dsb => [198, 0, 199],
        Dsc => [150, 50, 149],
        Dsd => [150, 100, 149],
        Dwa => [171, 177, 255],
        Dwb => [90, 119, 219],
        Dwc => [76, 81, 181],
        Dwd => [50, 0, 135],
        Dfa => [0, 255, 255],
        Dfb => [56, 199, 255],
        Dfc => [0, 126, 125],
        Dfd => [0, 69, 94],
        ET => [178, 178, 178],
        EF => [104, 104, 104],
    }
}

// ── Nearest-region lookup ─────────────────────────────────────────────────────

/// 2°-binned index for nearest-region queries per pixel.
struct RegionIndex<'a> {
    mesh: &'a SphereMesh,
    bins: Vec<Vec<u32>>,
}

const BIN_DEG: f64 = 2.0;
const BINS_LAT: usize = 90;
const BINS_LON: usize = 180;

impl<'a> RegionIndex<'a> {
    fn build(mesh: &'a SphereMesh) -> Self {
        let mut bins = vec![Vec::new(); BINS_LAT * BINS_LON];
        for r in 0..mesh.n_regions() {
            let bi = (((mesh.lat_deg[r] + 90.0) / BIN_DEG) as usize).min(BINS_LAT - 1);
            let bj = (((mesh.lon_deg[r] + 180.0) / BIN_DEG) as usize).min(BINS_LON - 1);
            bins[bi * BINS_LON + bj].push(r as u32);
        }
        Self { mesh, bins }
    }

    /// Closest region to (lat, lon), searching an expanding bin ring.
    fn nearest(&self, lat: f64, lon: f64) -> usize {
        let p = tellus_core::sphere::Vec3::from_latlon(lat, lon);
        let bi = (((lat + 90.0) / BIN_DEG) as usize).min(BINS_LAT - 1) as i64;
        let bj = (((lon + 180.0) / BIN_DEG) as usize).min(BINS_LON - 1) as i64;
        let mut best = 0usize;
        let mut best_dot = f64::NEG_INFINITY;
        for ring in 0..6i64 {
            for di in -ring..=ring {
                for dj in -ring..=ring {
                    if di.abs() != ring && dj.abs() != ring {
                        continue;
                    }
                    let i = bi + di;
                    if i < 0 || i >= BINS_LAT as i64 {
                        continue;
                    }
                    let j = (bj + dj).rem_euclid(BINS_LON as i64);
                    for &r in &self.bins[i as usize * BINS_LON + j as usize] {
                        let d = p.dot(self.mesh.pos[r as usize]);
                        if d > best_dot {
                            best_dot = d;
                            best = r as usize;
                        }
                    }
                }
            }
            if best_dot > f64::NEG_INFINITY && ring >= 2 {
                break;
            }
        }
        best
    }
}

// ── Map rendering ─────────────────────────────────────────────────────────────

fn render(planet: &Planet, color: impl Fn(usize) -> [u8; 3]) -> image::RgbImage {
    let index = RegionIndex::build(&planet.mesh);
    let mut img = image::RgbImage::new(W, H);
    for y in 0..H {
        let lat = 90.0 - (y as f64 + 0.5) / H as f64 * 180.0;
        for x in 0..W {
            let lon = (x as f64 + 0.5) / W as f64 * 360.0 - 180.0;
            let r = index.nearest(lat, lon);
            img.put_pixel(x, y, image::Rgb(color(r)));
        }
    }
    img
}

fn main() {
    let params = PlanetParams { seed: 42, regions: 10_000, roughness: 0.2, ..Default::default() };
    let generator = PlanetGenerator::new(params).expect("default params are valid");
    let mesh = SphereMesh::banded(SphereMesh::bands_for_regions(10_000));
    let planet = generator.generate(mesh).expect("pipeline run");

    let out = Path::new("data/debug");
    fs::create_dir_all(out).expect("create data/debug");

    render(&planet, |r| elevation_color(planet.elevation[r]))
        .save(out.join("elevation.png"))
        .expect("write elevation.png");

    render(&planet, |r| {
        let p = planet.plates.region_plate[r];
        let boundary = planet
            .mesh
            .neighbors(r)
            .iter()
            .any(|&nb| planet.plates.region_plate[nb as usize] != p);
        if boundary {
            [20, 20, 20]
        } else {
            plate_color(p)
        }
    })
    .save(out.join("plates.png"))
    .expect("write plates.png");

    render(&planet, |r| blue_ramp(planet.wind.get(Season::Summer).speed[r]))
        .save(out.join("wind_summer.png"))
        .expect("write wind_summer.png");

    render(&planet, |r| blue_ramp(planet.precipitation.get(Season::Summer)[r]))
        .save(out.join("precip_summer.png"))
        .expect("write precip_summer.png");

    render(&planet, |r| thermal_ramp(planet.temperature.get(Season::Summer)[r]))
        .save(out.join("temp_summer.png"))
        .expect("write temp_summer.png");

    render(&planet, |r| koppen_color(planet.koppen[r]))
        .save(out.join("koppen.png"))
        .expect("write koppen.png");

    eprintln!("wrote 6 debug maps to {}", out.display());
}
