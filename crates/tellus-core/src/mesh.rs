//! The spherical region mesh every stage runs over.
//!
//! A `SphereMesh` is consumed pre-built: region positions on the unit sphere
//! plus a flat CSR adjacency list in consistent rotational order. Mesh
//! *construction* (Fibonacci point sets, spherical Delaunay, pole closure)
//! belongs to the host; `banded` provides a deterministic quasi-uniform
//! latitude-band grid so harnesses and tests have a real mesh to run on.
//!
//! The flat `adj_offset + adj_list` layout is load-bearing for throughput:
//! kernels index neighbor slices directly instead of materialising
//! per-region iterators.

use crate::error::PipelineError;
use crate::sphere::{tangent_frame, Vec3};

/// Immutable dual-mesh adjacency plus precomputed per-region geometry.
#[derive(Debug)]
pub struct SphereMesh {
    n_regions: usize,
    adj_offset: Vec<u32>,
    adj_list: Vec<u32>,
    /// Unit-sphere region positions.
    pub pos: Vec<Vec3>,
    /// Geodetic latitude in degrees, −90..+90.
    pub lat_deg: Vec<f64>,
    /// Longitude in degrees, −180..+180.
    pub lon_deg: Vec<f64>,
    /// sin(latitude); cached because wind rotation reads it per region.
    pub sin_lat: Vec<f64>,
    /// Local tangent frame, orthonormal with `pos` (polar fallback applied).
    pub east: Vec<Vec3>,
    pub north: Vec<Vec3>,
}

impl SphereMesh {
    /// Build from raw positions and per-region neighbor lists.
    ///
    /// Rejects: empty meshes, non-normalizable positions, out-of-range or
    /// self-referential neighbor ids, and asymmetric adjacency.
    pub fn from_raw(positions: Vec<Vec3>, adjacency: &[Vec<u32>]) -> Result<Self, PipelineError> {
        let n = positions.len();
        if n == 0 {
            return Err(PipelineError::MeshRejected("empty mesh".into()));
        }
        if adjacency.len() != n {
            return Err(PipelineError::MeshRejected(format!(
                "adjacency covers {} regions, positions cover {n}",
                adjacency.len()
            )));
        }
        let mut unit = Vec::with_capacity(n);
        for (r, p) in positions.iter().enumerate() {
            match p.try_normalize() {
                Some(u) => unit.push(u),
                None => {
                    return Err(PipelineError::MeshRejected(format!(
                        "region {r} position has zero length"
                    )))
                }
            }
        }
        for (r, nbrs) in adjacency.iter().enumerate() {
            for &nb in nbrs {
                if nb as usize >= n {
                    return Err(PipelineError::MeshRejected(format!(
                        "region {r} lists neighbor {nb} outside [0, {n})"
                    )));
                }
                if nb as usize == r {
                    return Err(PipelineError::MeshRejected(format!(
                        "region {r} lists itself as a neighbor"
                    )));
                }
                if !adjacency[nb as usize].contains(&(r as u32)) {
                    return Err(PipelineError::MeshRejected(format!(
                        "edge {r} -> {nb} has no reverse edge"
                    )));
                }
            }
        }
        Ok(Self::build(unit, adjacency))
    }

    /// Assemble the CSR layout and geometric fields. Inputs must be valid.
    fn build(positions: Vec<Vec3>, adjacency: &[Vec<u32>]) -> Self {
        let n = positions.len();
        let mut adj_offset = Vec::with_capacity(n + 1);
        let mut adj_list = Vec::with_capacity(adjacency.iter().map(Vec::len).sum());
        adj_offset.push(0u32);
        for nbrs in adjacency {
            adj_list.extend_from_slice(nbrs);
            adj_offset.push(adj_list.len() as u32);
        }

        let mut lat_deg = Vec::with_capacity(n);
        let mut lon_deg = Vec::with_capacity(n);
        let mut sin_lat = Vec::with_capacity(n);
        let mut east = Vec::with_capacity(n);
        let mut north = Vec::with_capacity(n);
        for &p in &positions {
            let lat = p.z.clamp(-1.0, 1.0).asin();
            lat_deg.push(lat.to_degrees());
            lon_deg.push(p.y.atan2(p.x).to_degrees());
            sin_lat.push(lat.sin());
            let (e, no) = tangent_frame(p);
            east.push(e);
            north.push(no);
        }

        Self { n_regions: n, adj_offset, adj_list, pos: positions, lat_deg, lon_deg, sin_lat, east, north }
    }

    #[inline]
    pub fn n_regions(&self) -> usize {
        self.n_regions
    }

    /// Neighbor region ids of `r`, in the mesh's rotational order.
    #[inline]
    pub fn neighbors(&self, r: usize) -> &[u32] {
        &self.adj_list[self.adj_offset[r] as usize..self.adj_offset[r + 1] as usize]
    }

    /// Deterministic quasi-uniform latitude-band host grid.
    ///
    /// `rows` latitude bands; band `i` carries `max(1, round(2·rows·cos φ_i))`
    /// cells so cell solid angles stay roughly even from equator to pole.
    /// Within-band cells link east/west (wrapping); cross-band cells link
    /// wherever their longitude spans overlap. Total regions ≈ `4·rows²/π`.
    pub fn banded(rows: usize) -> Self {
        assert!(rows >= 3, "banded mesh needs at least 3 latitude bands");
        let mut band_size = Vec::with_capacity(rows);
        let mut band_start = Vec::with_capacity(rows);
        let mut positions = Vec::new();
        for i in 0..rows {
            let lat = -90.0 + (i as f64 + 0.5) * 180.0 / rows as f64;
            let m = ((2.0 * rows as f64 * lat.to_radians().cos()).round() as usize).max(1);
            band_start.push(positions.len() as u32);
            band_size.push(m);
            for j in 0..m {
                let lon = (j as f64 + 0.5) * 360.0 / m as f64 - 180.0;
                positions.push(Vec3::from_latlon(lat, lon));
            }
        }

        let n = positions.len();
        let mut adjacency: Vec<Vec<u32>> = vec![Vec::new(); n];
        for i in 0..rows {
            let m = band_size[i];
            let s = band_start[i];
            for j in 0..m {
                let r = (s + j as u32) as usize;
                if m >= 3 {
                    adjacency[r].push(s + ((j + m - 1) % m) as u32);
                    adjacency[r].push(s + ((j + 1) % m) as u32);
                } else if m == 2 {
                    adjacency[r].push(s + (j ^ 1) as u32);
                }
            }
            if i + 1 < rows {
                let mu = band_size[i + 1];
                let su = band_start[i + 1];
                for j in 0..m {
                    let a0 = j as f64 / m as f64;
                    let a1 = (j + 1) as f64 / m as f64;
                    for k in 0..mu {
                        let b0 = k as f64 / mu as f64;
                        let b1 = (k + 1) as f64 / mu as f64;
                        if a0 < b1 - 1e-12 && b0 < a1 - 1e-12 {
                            let r = (s + j as u32) as usize;
                            let u = (su + k as u32) as usize;
                            adjacency[r].push(u as u32);
                            adjacency[u].push(r as u32);
                        }
                    }
                }
            }
        }

        Self::build(positions, &adjacency)
    }

    /// Band count whose `banded` mesh lands closest to `n` regions.
    pub fn bands_for_regions(n: usize) -> usize {
        (((n as f64) * std::f64::consts::PI).sqrt() / 2.0).round().max(3.0) as usize
    }
}
