//! Randomized-BFS distance-field engine.
//!
//! Hop distances from a seed set, blocked by a barrier set. The frontier
//! pops a random position within the remaining queue (swap-to-head), so
//! tie-breaking between equally-near expansions is shuffled while the
//! result stays fully determined by the RNG seed and inputs.

use rand::rngs::StdRng;
use rand::Rng;

use crate::mesh::SphereMesh;

/// Distance value for barrier or unreached regions.
pub const UNREACHABLE: u32 = u32::MAX;

/// Compute hop distances from `seeds`, never expanding into `stops`.
///
/// `stops` is a per-region mask; pass `&[]` for no barriers. Seeds listed
/// in `stops` still emit distance 0; barriers only block entry.
/// An empty seed set leaves every region at `UNREACHABLE`.
pub fn distance_field(mesh: &SphereMesh, seeds: &[u32], stops: &[bool], rng: &mut StdRng) -> Vec<u32> {
    let n = mesh.n_regions();
    let mut dist = vec![UNREACHABLE; n];
    let mut queue: Vec<u32> = Vec::with_capacity(n);
    for &s in seeds {
        if dist[s as usize] == UNREACHABLE {
            dist[s as usize] = 0;
            queue.push(s);
        }
    }

    let mut qi = 0;
    while qi < queue.len() {
        let pick = qi + rng.gen_range(0..queue.len() - qi);
        queue.swap(qi, pick);
        let r = queue[qi] as usize;
        qi += 1;
        let d = dist[r] + 1;
        for &nb in mesh.neighbors(r) {
            let nbu = nb as usize;
            if dist[nbu] == UNREACHABLE && !stops.get(nbu).copied().unwrap_or(false) {
                dist[nbu] = d;
                queue.push(nb);
            }
        }
    }

    dist
}

/// Plain FIFO BFS hop distance, used where exact shortest hops matter
/// (coastal falloff bands, diagnostics).
pub fn bfs_distance(mesh: &SphereMesh, seeds: &[u32], stops: &[bool]) -> Vec<u32> {
    let n = mesh.n_regions();
    let mut dist = vec![UNREACHABLE; n];
    let mut queue: Vec<u32> = Vec::with_capacity(n);
    for &s in seeds {
        if dist[s as usize] == UNREACHABLE {
            dist[s as usize] = 0;
            queue.push(s);
        }
    }
    let mut qi = 0;
    while qi < queue.len() {
        let r = queue[qi] as usize;
        qi += 1;
        let d = dist[r] + 1;
        for &nb in mesh.neighbors(r) {
            let nbu = nb as usize;
            if dist[nbu] == UNREACHABLE && !stops.get(nbu).copied().unwrap_or(false) {
                dist[nbu] = d;
                queue.push(nb);
            }
        }
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn single_seed_reaches_every_region() {
        let mesh = SphereMesh::banded(SphereMesh::bands_for_regions(2000));
        let mut rng = StdRng::seed_from_u64(42);
        let dist = distance_field(&mesh, &[0], &[], &mut rng);

        assert!(dist.iter().all(|&d| d != UNREACHABLE), "unreached region with no barriers");

        // The randomized pop order can only lengthen paths relative to true
        // BFS, never shorten them below the eccentricity of the seed.
        let exact = bfs_distance(&mesh, &[0], &[]);
        let ecc = *exact.iter().max().unwrap();
        let max = *dist.iter().max().unwrap();
        assert!(max >= ecc, "randomized max {max} below BFS eccentricity {ecc}");
        for r in 0..mesh.n_regions() {
            assert!(dist[r] >= exact[r], "region {r}: randomized dist beat BFS");
        }
    }

    #[test]
    fn barriers_stay_unreachable() {
        let mesh = SphereMesh::banded(16);
        let n = mesh.n_regions();
        let mut stops = vec![false; n];
        // Block an entire latitude band worth of regions around the middle.
        for r in n / 3..n / 2 {
            stops[r] = true;
        }
        let mut rng = StdRng::seed_from_u64(7);
        let dist = distance_field(&mesh, &[0], &stops, &mut rng);
        for r in n / 3..n / 2 {
            assert_eq!(dist[r], UNREACHABLE, "barrier region {r} was entered");
        }
    }

    #[test]
    fn same_rng_seed_is_deterministic() {
        let mesh = SphereMesh::banded(16);
        let a = distance_field(&mesh, &[3, 77], &[], &mut StdRng::seed_from_u64(9));
        let b = distance_field(&mesh, &[3, 77], &[], &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_seed_set_leaves_field_unreachable() {
        let mesh = SphereMesh::banded(8);
        let mut rng = StdRng::seed_from_u64(1);
        let dist = distance_field(&mesh, &[], &[], &mut rng);
        assert!(dist.iter().all(|&d| d == UNREACHABLE));
    }

    #[test]
    fn seed_inside_barrier_still_emits() {
        let mesh = SphereMesh::banded(8);
        let n = mesh.n_regions();
        let mut stops = vec![false; n];
        stops[0] = true;
        let mut rng = StdRng::seed_from_u64(4);
        let dist = distance_field(&mesh, &[0], &stops, &mut rng);
        assert_eq!(dist[0], 0);
        assert!(mesh.neighbors(0).iter().all(|&nb| dist[nb as usize] == 1));
    }
}
