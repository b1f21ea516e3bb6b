//! Ocean/land plate tagging.
//!
//! All plates start oceanic. Continent seeds are picked by greedy
//! farthest-point spacing over plate-seed angular distance, then land
//! status grows across the plate adjacency graph toward a target land
//! fraction, always claiming the frontier plate closest to the existing
//! land mass.

use rand::rngs::StdRng;
use rand::Rng;

use crate::mesh::SphereMesh;
use crate::sphere::great_circle_distance_rad;

/// Fraction of all regions that land plates should cover.
const TARGET_LAND_FRACTION: f64 = 0.35;

/// Returns `is_ocean` per plate.
pub fn tag_ocean_plates(
    mesh: &SphereMesh,
    region_plate: &[u16],
    seeds: &[u32],
    continents: u32,
    rng: &mut StdRng,
) -> Vec<bool> {
    let n_plates = seeds.len();
    let continents = (continents as usize).min(n_plates);

    // Plate sizes (regions) and the plate adjacency graph.
    let mut size = vec![0usize; n_plates];
    for &p in region_plate {
        size[p as usize] += 1;
    }
    let adj = plate_adjacency(mesh, region_plate, n_plates);

    // Greedy farthest-point continent seeds.
    let mut is_land = vec![false; n_plates];
    let first = rng.gen_range(0..n_plates);
    is_land[first] = true;
    let mut picks = vec![first];
    while picks.len() < continents {
        let mut best = usize::MAX;
        let mut best_sep = -1.0f64;
        for p in 0..n_plates {
            if is_land[p] {
                continue;
            }
            let sep = picks
                .iter()
                .map(|&q| seed_distance(mesh, seeds, p, q))
                .fold(f64::INFINITY, f64::min);
            if sep > best_sep {
                best_sep = sep;
                best = p;
            }
        }
        is_land[best] = true;
        picks.push(best);
    }

    // Grow land over the plate graph until the land fraction target.
    let target = (TARGET_LAND_FRACTION * mesh.n_regions() as f64) as usize;
    let mut land_regions: usize = (0..n_plates).filter(|&p| is_land[p]).map(|p| size[p]).sum();
    while land_regions < target {
        let mut best = usize::MAX;
        let mut best_near = f64::INFINITY;
        for p in 0..n_plates {
            if is_land[p] || !adj[p].iter().any(|&q| is_land[q as usize]) {
                continue;
            }
            let near = (0..n_plates)
                .filter(|&q| is_land[q])
                .map(|q| seed_distance(mesh, seeds, p, q))
                .fold(f64::INFINITY, f64::min);
            if near < best_near {
                best_near = near;
                best = p;
            }
        }
        if best == usize::MAX {
            break; // no ocean plate touches land; degenerate but legal
        }
        is_land[best] = true;
        land_regions += size[best];
    }

    is_land.iter().map(|&l| !l).collect()
}

/// Land density 2.4–2.9, ocean density 3.0–3.5, drawn in plate order.
pub fn plate_densities(is_ocean: &[bool], rng: &mut StdRng) -> Vec<f32> {
    is_ocean
        .iter()
        .map(|&ocean| {
            if ocean {
                3.0 + rng.gen::<f32>() * 0.5
            } else {
                2.4 + rng.gen::<f32>() * 0.5
            }
        })
        .collect()
}

fn seed_distance(mesh: &SphereMesh, seeds: &[u32], a: usize, b: usize) -> f64 {
    great_circle_distance_rad(mesh.pos[seeds[a] as usize], mesh.pos[seeds[b] as usize])
}

fn plate_adjacency(mesh: &SphereMesh, region_plate: &[u16], n_plates: usize) -> Vec<Vec<u16>> {
    let mut adj: Vec<Vec<u16>> = vec![Vec::new(); n_plates];
    for r in 0..mesh.n_regions() {
        let pr = region_plate[r];
        for &nb in mesh.neighbors(r) {
            let pn = region_plate[nb as usize];
            if pn != pr && !adj[pr as usize].contains(&pn) {
                adj[pr as usize].push(pn);
            }
        }
    }
    adj
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plates::assign::assign_regions;
    use rand::SeedableRng;

    fn tagged(seed: u64, n_plates: usize, continents: u32) -> (SphereMesh, Vec<u16>, Vec<u32>, Vec<bool>) {
        let mesh = SphereMesh::banded(24);
        let mut rng = StdRng::seed_from_u64(seed);
        let (plate, seeds) = assign_regions(&mesh, n_plates, &mut rng);
        let is_ocean = tag_ocean_plates(&mesh, &plate, &seeds, continents, &mut rng);
        (mesh, plate, seeds, is_ocean)
    }

    #[test]
    fn some_plates_stay_oceanic() {
        let (_, _, _, is_ocean) = tagged(42, 16, 3);
        assert!(is_ocean.iter().any(|&o| o), "every plate became land");
        assert!(is_ocean.iter().any(|&o| !o), "no land plates at all");
    }

    #[test]
    fn land_fraction_is_reasonable() {
        for seed in [1u64, 7, 42, 99] {
            let (mesh, plate, _, is_ocean) = tagged(seed, 16, 3);
            let land = plate.iter().filter(|&&p| !is_ocean[p as usize]).count();
            let frac = land as f64 / mesh.n_regions() as f64;
            assert!(
                (0.15..=0.55).contains(&frac),
                "seed {seed}: land fraction {frac:.3} outside [0.15, 0.55]"
            );
        }
    }

    #[test]
    fn continent_count_never_exceeds_plate_count() {
        let (_, _, _, is_ocean) = tagged(3, 4, 10);
        let land = is_ocean.iter().filter(|&&o| !o).count();
        assert!(land >= 1 && land <= 4);
    }

    #[test]
    fn densities_are_in_band() {
        let mut rng = StdRng::seed_from_u64(11);
        let d = plate_densities(&[true, false, true, false], &mut rng);
        assert!((3.0..=3.5).contains(&d[0]) && (3.0..=3.5).contains(&d[2]));
        assert!((2.4..=2.9).contains(&d[1]) && (2.4..=2.9).contains(&d[3]));
    }
}
