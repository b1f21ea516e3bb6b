//! Seeded 3D noise basis: fBm, ridged fBm, and domain warping over Perlin.
//!
//! One `NoiseBasis` per stage, seeded from the master seed, so stage outputs
//! reproduce in isolation. Octave sums are amplitude-normalized to roughly
//! ±1 regardless of octave count.

use noise::{NoiseFn, Perlin};

use crate::sphere::Vec3;

pub struct NoiseBasis {
    perlin: Perlin,
    warp_x: Perlin,
    warp_y: Perlin,
    warp_z: Perlin,
}

impl NoiseBasis {
    /// Seed threads into the Perlin permutation tables; the warp channels
    /// decorrelate via fixed xor constants.
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            warp_x: Perlin::new(seed ^ 0x0001),
            warp_y: Perlin::new(seed ^ 0x0002),
            warp_z: Perlin::new(seed ^ 0x0003),
        }
    }

    /// Raw 3D Perlin sample, ≈ ±1.
    #[inline]
    pub fn noise3(&self, x: f64, y: f64, z: f64) -> f64 {
        self.perlin.get([x, y, z])
    }

    /// fBm with lacunarity 2, gain 0.5, normalized to ≈ ±1.
    pub fn fbm(&self, x: f64, y: f64, z: f64, octaves: u32) -> f64 {
        self.fbm_with(x, y, z, octaves, 2.0, 0.5)
    }

    pub fn fbm_with(&self, x: f64, y: f64, z: f64, octaves: u32, lacunarity: f64, gain: f64) -> f64 {
        let mut value = 0.0;
        let mut amp = 1.0;
        let mut freq = 1.0;
        let mut norm = 0.0;
        for _ in 0..octaves {
            value += amp * self.perlin.get([x * freq, y * freq, z * freq]);
            norm += amp;
            amp *= gain;
            freq *= lacunarity;
        }
        value / norm
    }

    /// Ridged fBm in [0, 1]: sharp crests where the base noise crosses zero.
    pub fn ridged(&self, x: f64, y: f64, z: f64, octaves: u32) -> f64 {
        self.ridged_with(x, y, z, octaves, 2.0, 0.5, 1.0)
    }

    pub fn ridged_with(
        &self,
        x: f64,
        y: f64,
        z: f64,
        octaves: u32,
        lacunarity: f64,
        gain: f64,
        offset: f64,
    ) -> f64 {
        let mut value = 0.0;
        let mut amp = 1.0;
        let mut freq = 1.0;
        let mut norm = 0.0;
        for _ in 0..octaves {
            let n = self.perlin.get([x * freq, y * freq, z * freq]);
            let r = offset - n.abs();
            value += amp * r * r;
            norm += amp;
            amp *= gain;
            freq *= lacunarity;
        }
        value / norm
    }

    /// Domain-warp `p` (already scaled to noise space): each component is
    /// displaced by `amp` times a 2-octave fBm over a decorrelated channel.
    pub fn warped(&self, p: Vec3, amp: f64) -> Vec3 {
        Vec3::new(
            p.x + amp * channel_fbm(&self.warp_x, p.x, p.y, p.z),
            p.y + amp * channel_fbm(&self.warp_y, p.x + 5.2, p.y + 1.3, p.z),
            p.z + amp * channel_fbm(&self.warp_z, p.x + 3.7, p.y + 9.1, p.z + 2.8),
        )
    }
}

fn channel_fbm(perlin: &Perlin, x: f64, y: f64, z: f64) -> f64 {
    (perlin.get([x, y, z]) + 0.5 * perlin.get([x * 2.0, y * 2.0, z * 2.0])) / 1.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fbm_is_bounded_and_non_constant() {
        let nb = NoiseBasis::new(42);
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for i in 0..500 {
            let t = i as f64 * 0.13;
            let v = nb.fbm(t.sin() * 2.0, t.cos() * 2.0, t * 0.1, 3);
            min = min.min(v);
            max = max.max(v);
            assert!(v.abs() <= 1.0 + 1e-9, "normalized fbm must stay within ±1, got {v}");
        }
        assert!(max - min > 0.05, "fbm should vary, range was {:.4}", max - min);
    }

    #[test]
    fn ridged_stays_in_unit_interval() {
        let nb = NoiseBasis::new(7);
        for i in 0..300 {
            let t = i as f64 * 0.21;
            let v = nb.ridged(t.sin() * 3.0, t.cos() * 3.0, t * 0.3, 3);
            assert!((0.0..=1.0 + 1e-9).contains(&v), "ridged out of [0,1]: {v}");
        }
    }

    #[test]
    fn same_seed_reproduces_same_field() {
        let a = NoiseBasis::new(99);
        let b = NoiseBasis::new(99);
        for i in 0..50 {
            let t = i as f64 * 0.37;
            assert_eq!(a.fbm(t, -t, 0.5, 3), b.fbm(t, -t, 0.5, 3));
        }
    }

    #[test]
    fn different_seeds_differ() {
        let a = NoiseBasis::new(1);
        let b = NoiseBasis::new(2);
        let pts = 50;
        let same = (0..pts)
            .filter(|&i| {
                let t = i as f64 * 0.41;
                (a.noise3(t, t * 0.5, 1.0) - b.noise3(t, t * 0.5, 1.0)).abs() < 1e-12
            })
            .count();
        assert!(same < pts / 2, "seeds 1 and 2 agreed on {same}/{pts} samples");
    }

    #[test]
    fn warp_displacement_is_bounded_by_amplitude() {
        let nb = NoiseBasis::new(5);
        let p = Vec3::new(0.4, -0.2, 0.8);
        let w = nb.warped(p, 0.4);
        assert!((w.x - p.x).abs() <= 0.4 + 1e-9);
        assert!((w.y - p.y).abs() <= 0.4 + 1e-9);
        assert!((w.z - p.z).abs() <= 0.4 + 1e-9);
    }
}
