//! Unit-sphere geometry shared by every pipeline stage.
//! All coordinate math uses f64 precision; field values elsewhere are f32.

use std::ops::{Add, Mul, Neg, Sub};

/// A point or direction in 3-space. Region positions are unit vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn from_latlon(lat_deg: f64, lon_deg: f64) -> Self {
        let lat = lat_deg.to_radians();
        let lon = lon_deg.to_radians();
        Self {
            x: lat.cos() * lon.cos(),
            y: lat.cos() * lon.sin(),
            z: lat.sin(),
        }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Self {
        let len = self.length();
        Self { x: self.x / len, y: self.y / len, z: self.z / len }
    }

    /// Normalize, or `None` when the vector is shorter than `1e-12`.
    pub fn try_normalize(self) -> Option<Self> {
        let len = self.length();
        if len < 1e-12 {
            None
        } else {
            Some(Self { x: self.x / len, y: self.y / len, z: self.z / len })
        }
    }

    /// Component of `self` lying in the tangent plane at unit vector `at`.
    pub fn reject_from(self, at: Vec3) -> Self {
        self - at * self.dot(at)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, o: Vec3) -> Vec3 {
        Vec3::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, o: Vec3) -> Vec3 {
        Vec3::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f64) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Great-circle distance between two unit vectors, in radians.
pub fn great_circle_distance_rad(a: Vec3, b: Vec3) -> f64 {
    a.dot(b).clamp(-1.0, 1.0).acos()
}

/// Local east/north tangent frame at unit position `p` (z is the spin axis).
///
/// `east` points along increasing longitude, `north` toward the +z pole.
/// Within 1e-6 of either pole the frame degenerates; the fallback axes are
/// `east = (1, 0, 0)`, `north = p × east`.
pub fn tangent_frame(p: Vec3) -> (Vec3, Vec3) {
    let east = if p.z.abs() > 1.0 - 1e-6 {
        Vec3::new(1.0, 0.0, 0.0)
    } else {
        Vec3::new(0.0, 0.0, 1.0).cross(p).normalize()
    };
    let north = p.cross(east);
    (east, north)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latlon_to_cartesian_equator_and_pole() {
        let e = Vec3::from_latlon(0.0, 0.0);
        assert!((e.x - 1.0).abs() < 1e-12 && e.y.abs() < 1e-12 && e.z.abs() < 1e-12);
        let np = Vec3::from_latlon(90.0, 0.0);
        assert!((np.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn great_circle_distance_antipodes() {
        let a = Vec3::from_latlon(90.0, 0.0);
        let b = Vec3::from_latlon(-90.0, 0.0);
        let d = great_circle_distance_rad(a, b);
        assert!((d - std::f64::consts::PI).abs() < 1e-12, "pole-to-pole should be π, got {d}");
    }

    #[test]
    fn tangent_frame_is_orthonormal_everywhere() {
        for lat in [-89.0, -45.0, 0.0, 30.0, 89.0] {
            for lon in [-180.0, -90.0, 0.0, 45.0, 179.0] {
                let p = Vec3::from_latlon(lat, lon);
                let (e, n) = tangent_frame(p);
                assert!(e.dot(p).abs() < 1e-9, "east·pos at ({lat},{lon})");
                assert!(n.dot(p).abs() < 1e-9, "north·pos at ({lat},{lon})");
                assert!(e.dot(n).abs() < 1e-9, "east·north at ({lat},{lon})");
                assert!((e.length() - 1.0).abs() < 1e-9);
                assert!((n.length() - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn tangent_frame_pole_fallback() {
        let (e, n) = tangent_frame(Vec3::new(0.0, 0.0, 1.0));
        assert!((e.x - 1.0).abs() < 1e-12, "polar east must fall back to (1,0,0)");
        assert!(e.dot(n).abs() < 1e-12);
    }

    #[test]
    fn north_points_poleward() {
        let p = Vec3::from_latlon(10.0, 40.0);
        let (_, n) = tangent_frame(p);
        assert!(n.z > 0.0, "northern-hemisphere north component must aim at +z");
    }

    #[test]
    fn reject_from_removes_radial_component() {
        let p = Vec3::from_latlon(35.0, -60.0);
        let v = Vec3::new(0.3, -1.2, 0.8);
        let t = v.reject_from(p);
        assert!(t.dot(p).abs() < 1e-12);
    }
}
