//! Tectonic plate pipeline: region assignment, ocean tagging, collision
//! detection, stress propagation, and the shared distance-field engine.

pub mod assign;
pub mod collision;
pub mod distance;
pub mod oceans;
pub mod stress;

use rand::rngs::StdRng;

pub use collision::{detect_collisions, BoundaryType, CollisionField};

use crate::mesh::SphereMesh;
use crate::params::PlanetParams;
use crate::sphere::Vec3;

/// Per-plate attributes plus the region→plate labeling.
pub struct PlateSet {
    /// Seed region of each plate, in plate-id order.
    pub seeds: Vec<u32>,
    /// Unit drift vector, tangential to the sphere at the plate seed.
    pub drift: Vec<Vec3>,
    /// Crust density: land plates 2.4–2.9, ocean plates 3.0–3.5.
    pub density: Vec<f32>,
    pub is_ocean: Vec<bool>,
    /// Plate id per region, dense over the mesh.
    pub region_plate: Vec<u16>,
}

impl PlateSet {
    pub fn n_plates(&self) -> usize {
        self.seeds.len()
    }
}

/// Run plate assignment, ocean/land tagging, post-hoc toggles, and density
/// draws, in that order (densities depend on the final ocean status).
pub fn build_plates(mesh: &SphereMesh, params: &PlanetParams, rng: &mut StdRng) -> PlateSet {
    let (region_plate, seeds) = assign::assign_regions(mesh, params.plates as usize, rng);
    let drift = assign::drift_vectors(mesh, &seeds, rng);
    let mut is_ocean = oceans::tag_ocean_plates(mesh, &region_plate, &seeds, params.continents, rng);
    for &t in &params.toggled_plates {
        is_ocean[t as usize] = !is_ocean[t as usize];
    }
    let density = oceans::plate_densities(&is_ocean, rng);
    PlateSet { seeds, drift, density, is_ocean, region_plate }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn build(seed: u64, plates: u32, continents: u32) -> (SphereMesh, PlateSet) {
        let mesh = SphereMesh::banded(24);
        let params = PlanetParams { plates, continents, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(seed);
        let set = build_plates(&mesh, &params, &mut rng);
        (mesh, set)
    }

    #[test]
    fn every_region_gets_exactly_one_plate() {
        let (mesh, set) = build(42, 12, 3);
        assert_eq!(set.region_plate.len(), mesh.n_regions());
        for (r, &p) in set.region_plate.iter().enumerate() {
            assert!((p as usize) < set.n_plates(), "region {r} has plate {p} out of range");
        }
    }

    #[test]
    fn drift_vectors_are_unit_and_tangential() {
        let (mesh, set) = build(42, 12, 3);
        for (p, &seed) in set.seeds.iter().enumerate() {
            let v = set.drift[p];
            let pos = mesh.pos[seed as usize];
            assert!((v.length() - 1.0).abs() < 1e-9, "plate {p} drift not unit");
            assert!(v.dot(pos).abs() < 1e-9, "plate {p} drift not tangential");
        }
    }

    #[test]
    fn densities_split_by_ocean_status() {
        let (_, set) = build(7, 16, 4);
        for p in 0..set.n_plates() {
            let d = set.density[p];
            if set.is_ocean[p] {
                assert!((3.0..=3.5).contains(&d), "ocean plate {p} density {d}");
            } else {
                assert!((2.4..=2.9).contains(&d), "land plate {p} density {d}");
            }
        }
    }

    #[test]
    fn toggled_plate_flips_exactly_that_plate() {
        let mesh = SphereMesh::banded(24);
        let base = PlanetParams { plates: 8, continents: 1, ..Default::default() };
        let toggled = PlanetParams { toggled_plates: vec![0], ..base.clone() };

        let mut rng_a = StdRng::seed_from_u64(1);
        let mut rng_b = StdRng::seed_from_u64(1);
        let a = build_plates(&mesh, &base, &mut rng_a);
        let b = build_plates(&mesh, &toggled, &mut rng_b);

        assert_eq!(a.seeds, b.seeds, "toggling must not disturb assignment");
        assert_ne!(a.is_ocean[0], b.is_ocean[0]);
        for p in 1..a.n_plates() {
            assert_eq!(a.is_ocean[p], b.is_ocean[p], "plate {p} status must be unchanged");
        }
    }
}
