//! Region→plate labeling by randomized multi-source BFS, plus per-plate
//! drift vectors.

use rand::rngs::StdRng;
use rand::Rng;

use crate::mesh::SphereMesh;
use crate::sphere::Vec3;

/// Grow `n_plates` labels from distinct random seed regions.
///
/// Uses the same swap-to-head randomized frontier as the distance-field
/// engine, so plate shapes are irregular but fully determined by the RNG.
/// Returns `(region_plate, seeds)`.
pub fn assign_regions(mesh: &SphereMesh, n_plates: usize, rng: &mut StdRng) -> (Vec<u16>, Vec<u32>) {
    let n = mesh.n_regions();
    let seeds = sample_distinct(n, n_plates, rng);

    let mut plate = vec![u16::MAX; n];
    let mut queue: Vec<u32> = Vec::with_capacity(n);
    for (p, &s) in seeds.iter().enumerate() {
        plate[s as usize] = p as u16;
        queue.push(s);
    }

    let mut qi = 0;
    while qi < queue.len() {
        let pick = qi + rng.gen_range(0..queue.len() - qi);
        queue.swap(qi, pick);
        let r = queue[qi] as usize;
        qi += 1;
        for &nb in mesh.neighbors(r) {
            if plate[nb as usize] == u16::MAX {
                plate[nb as usize] = plate[r];
                queue.push(nb);
            }
        }
    }

    (plate, seeds)
}

/// Unit drift vector per plate, tangential at the plate seed: a random
/// 3-vector projected onto the tangent plane, resampled while degenerate.
pub fn drift_vectors(mesh: &SphereMesh, seeds: &[u32], rng: &mut StdRng) -> Vec<Vec3> {
    seeds
        .iter()
        .map(|&s| {
            let pos = mesh.pos[s as usize];
            loop {
                let raw = Vec3::new(
                    rng.gen::<f64>() * 2.0 - 1.0,
                    rng.gen::<f64>() * 2.0 - 1.0,
                    rng.gen::<f64>() * 2.0 - 1.0,
                );
                if let Some(v) = raw.reject_from(pos).try_normalize() {
                    return v;
                }
            }
        })
        .collect()
}

/// `k` distinct region ids out of `n`.
fn sample_distinct(n: usize, k: usize, rng: &mut StdRng) -> Vec<u32> {
    debug_assert!(k <= n, "cannot place {k} plate seeds on {n} regions");
    let mut picked = Vec::with_capacity(k);
    while picked.len() < k {
        let c = rng.gen_range(0..n) as u32;
        if !picked.contains(&c) {
            picked.push(c);
        }
    }
    picked
}
