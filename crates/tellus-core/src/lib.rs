//! tellus-core: procedural planet geophysics pipeline.
//!
//! Turns a seeded parameter set and a pre-built spherical region mesh into
//! per-region elevation, wind, ocean-current, precipitation, temperature
//! and Köppen-class fields. Pipeline order:
//!
//!   1. Plates (assignment, drift, density, ocean tagging)
//!   2. Collision & stress (detection, diffusion)
//!   3. Elevation (distance fields, assembly, coasts, arcs, post-processing)
//!   4. Climate (ITCZ, pressure, wind, currents, precipitation,
//!      temperature, Köppen)
//!
//! Everything is deterministic for a fixed `PlanetParams`.

pub mod climate;
pub mod error;
pub mod generator;
pub mod mesh;
pub mod noise;
pub mod params;
pub mod planet;
pub mod plates;
pub mod sphere;
pub mod terrain;

pub use error::PipelineError;
pub use generator::{CancelFlag, PlanetGenerator};
pub use mesh::SphereMesh;
pub use params::PlanetParams;
pub use planet::{Planet, Season, Seasonal};
