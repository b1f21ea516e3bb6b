//! Pipeline orchestrator: runs all geophysics stages in dependency order.
//!
//! Between stages the generator checks the cooperative cancel flag, emits
//! `(percent, label)` progress, and records wall-clock timings. No stage is
//! ever partially applied: cancellation drops the in-flight planet and the
//! host restarts from `PlanetParams`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::climate::{currents, itcz, koppen, precip, pressure, temperature, wind};
use crate::error::PipelineError;
use crate::mesh::SphereMesh;
use crate::noise::NoiseBasis;
use crate::params::PlanetParams;
use crate::planet::{Diagnostics, Planet, Season, Seasonal, StageTiming};
use crate::plates::{self, stress};
use crate::terrain::{coastal, elevation, post};

/// Cooperative cancellation, checked at stage boundaries only.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Land fraction below which the run is flagged as degenerate (warning,
/// not an error).
const LAND_FRACTION_WARN: f32 = 0.10;

/// The main pipeline entry point.
pub struct PlanetGenerator {
    params: PlanetParams,
}

impl PlanetGenerator {
    /// Snap the sliders to their steps and validate every field.
    pub fn new(mut params: PlanetParams) -> Result<Self, PipelineError> {
        params.snap();
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &PlanetParams {
        &self.params
    }

    /// Run the full pipeline without progress reporting or cancellation.
    pub fn generate(&self, mesh: SphereMesh) -> Result<Planet, PipelineError> {
        self.generate_with(mesh, |_, _| {}, &CancelFlag::new())
    }

    /// Run the full pipeline. `progress` receives `(percent, label)` at each
    /// stage boundary; `cancel` aborts at the next boundary.
    pub fn generate_with(
        &self,
        mesh: SphereMesh,
        mut progress: impl FnMut(f32, &str),
        cancel: &CancelFlag,
    ) -> Result<Planet, PipelineError> {
        let p = &self.params;
        let seed = p.seed;
        let mut timings: Vec<StageTiming> = Vec::new();
        let mut clock = Instant::now();

        macro_rules! checkpoint {
            ($pct:expr, $label:expr) => {
                if cancel.is_cancelled() {
                    return Err(PipelineError::Cancelled);
                }
                progress($pct, $label);
            };
        }
        macro_rules! lap {
            ($label:expr) => {
                timings.push(StageTiming { label: $label, ms: clock.elapsed().as_millis() as u64 });
                clock = Instant::now();
            };
        }

        // A–B: plate assignment, drift, density, ocean tagging.
        checkpoint!(0.0, "plates");
        let mut rng = StdRng::seed_from_u64(seed as u64);
        let plate_set = plates::build_plates(&mesh, p, &mut rng);
        lap!("plates");

        // C: collision and raw stress.
        checkpoint!(6.0, "collision");
        let collision_noise = NoiseBasis::new(seed);
        let mut field = plates::detect_collisions(&mesh, &plate_set, &collision_noise);
        lap!("collision");

        // D: stress diffusion into plate interiors.
        checkpoint!(10.0, "stress");
        let spread = (2.0 * p.roughness).clamp(0.0, 1.0);
        let n = mesh.n_regions();
        let (decay, subduct_decay) = stress::decay_factors(n, spread);
        let passes = stress::pass_count(n, spread);
        stress::propagate(
            &mesh,
            &plate_set,
            &mut field.stress,
            &mut field.subduct_factor,
            decay,
            subduct_decay,
            passes,
        );
        lap!("stress");

        // E–F: distance fields and elevation assembly.
        checkpoint!(14.0, "elevation");
        let mut elev = elevation::assemble_elevation(&mesh, &plate_set, &field, seed);
        let nan_count = elev.iter().filter(|e| !e.is_finite()).count();
        if nan_count > 0 {
            return Err(PipelineError::Internal {
                stage: "elevation",
                detail: format!("{nan_count} non-finite regions after assembly"),
            });
        }
        lap!("elevation");

        // F6–F7: coastal roughening and island arcs.
        checkpoint!(26.0, "coastal");
        let max_stress = field.stress.iter().fold(1e-2f32, |a, &s| a.max(s));
        coastal::roughen_coasts(&mesh, &mut elev, &field, max_stress, p.roughness, seed);
        coastal::raise_island_arcs(&mesh, &mut elev, &plate_set, &field, max_stress, seed);
        lap!("coastal");

        // G: optional terrain post-processing.
        checkpoint!(32.0, "post-processing");
        post::apply_post_processing(&mesh, &mut elev, p);
        lap!("post-processing");

        // H: ITCZ, pressure, wind, one run per season.
        checkpoint!(38.0, "wind");
        let contn = pressure::continentality(&mesh, &elev);
        let pressure_noise = NoiseBasis::new(seed.wrapping_add(409));
        let run_season = |season: Season| {
            let spline = itcz::build_itcz(&mesh, &elev, season);
            let press = pressure::assemble_pressure(&mesh, &elev, &contn, &spline, season, &pressure_noise);
            let wind_field = wind::wind_from_pressure(&mesh, &press);
            (spline, press, wind_field)
        };
        #[cfg(feature = "threading")]
        let (summer_run, winter_run) =
            rayon::join(|| run_season(Season::Summer), || run_season(Season::Winter));
        #[cfg(not(feature = "threading"))]
        let (summer_run, winter_run) = (run_season(Season::Summer), run_season(Season::Winter));
        let (itcz_summer, press_summer, wind_summer) = summer_run;
        let (itcz_winter, press_winter, wind_winter) = winter_run;
        let itcz_splines = Seasonal { summer: itcz_summer, winter: itcz_winter };
        let press = Seasonal { summer: press_summer, winter: press_winter };
        let wind_fields = Seasonal { summer: wind_summer, winter: wind_winter };
        lap!("wind");

        // I: wind-driven surface currents.
        checkpoint!(58.0, "currents");
        let current =
            Seasonal::build(|s| currents::surface_currents(&mesh, &elev, wind_fields.get(s)));
        lap!("currents");

        // J: precipitation.
        checkpoint!(70.0, "precipitation");
        let precipitation = Seasonal::build(|s| {
            precip::precipitation(&mesh, &elev, wind_fields.get(s), itcz_splines.get(s))
        });
        lap!("precipitation");

        // K: temperature.
        checkpoint!(80.0, "temperature");
        let temp = Seasonal::build(|s| {
            temperature::temperature(&mesh, &elev, &contn, current.get(s), s, p.axial_tilt_deg)
        });
        lap!("temperature");

        // L: Köppen classification.
        checkpoint!(92.0, "koppen");
        let koppen_classes = koppen::classify(&mesh, &elev, &temp, &precipitation);
        lap!("koppen");

        let land = elev.iter().filter(|&&e| e > 0.0).count();
        let land_fraction = land as f32 / n as f32;
        if land_fraction < LAND_FRACTION_WARN {
            log::warn!(
                "degenerate ocean growth: land fraction {land_fraction:.3} below {LAND_FRACTION_WARN}"
            );
        }
        let diagnostics = Diagnostics {
            nan_count,
            land_fraction,
            min_elevation: elev.iter().fold(f32::INFINITY, |a, &b| a.min(b)),
            max_elevation: elev.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b)),
            max_stress,
        };

        checkpoint!(100.0, "done");
        Ok(Planet {
            mesh,
            plates: plate_set,
            elevation: elev,
            stress: field.stress,
            subduct_factor: field.subduct_factor,
            boundary_type: field.boundary_type,
            pressure: press,
            wind: wind_fields,
            current,
            precipitation,
            temperature: temp,
            koppen: koppen_classes,
            diagnostics,
            timings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plates::BoundaryType;

    fn small_params(seed: u32) -> PlanetParams {
        PlanetParams {
            seed,
            regions: 2_000,
            plates: 8,
            continents: 3,
            roughness: 0.1,
            ..Default::default()
        }
    }

    fn small_mesh() -> SphereMesh {
        SphereMesh::banded(SphereMesh::bands_for_regions(2_000))
    }

    #[test]
    fn reference_scenario_produces_a_plausible_world() {
        let generator = PlanetGenerator::new(small_params(42)).unwrap();
        let planet = generator.generate(small_mesh()).unwrap();

        let lf = planet.diagnostics.land_fraction;
        assert!((0.15..=0.55).contains(&lf), "land fraction {lf}");
        assert!(
            planet.boundary_type.iter().any(|&b| b == BoundaryType::Convergent),
            "no convergent boundary"
        );
        assert!(planet.diagnostics.max_stress > 0.0, "no stress anywhere");
        assert_eq!(planet.diagnostics.nan_count, 0);
    }

    #[test]
    fn pipeline_is_deterministic() {
        let generator = PlanetGenerator::new(small_params(7)).unwrap();
        let a = generator.generate(small_mesh()).unwrap();
        let b = generator.generate(small_mesh()).unwrap();
        assert_eq!(a.elevation, b.elevation);
        assert_eq!(a.stress, b.stress);
        assert_eq!(a.pressure.summer, b.pressure.summer);
        assert_eq!(a.wind.winter.east, b.wind.winter.east);
        assert_eq!(a.precipitation.summer, b.precipitation.summer);
        assert_eq!(a.temperature.winter, b.temperature.winter);
        assert_eq!(a.koppen, b.koppen);
    }

    #[test]
    fn seed_change_keeps_invariants() {
        for seed in [1u32, 2, 3] {
            let generator = PlanetGenerator::new(small_params(seed)).unwrap();
            let planet = generator.generate(small_mesh()).unwrap();
            for r in 0..planet.mesh.n_regions() {
                assert!(planet.elevation[r].is_finite());
                assert!((0.0..=1.0).contains(&planet.subduct_factor[r]));
                assert!(planet.stress[r] >= 0.0);
                for season in Season::ALL {
                    assert!((0.0..=1.0).contains(&planet.wind.get(season).speed[r]));
                    assert!((0.0..=1.0).contains(&planet.current.get(season).speed[r]));
                    assert!((0.0..=1.0).contains(&planet.precipitation.get(season)[r]));
                    assert!((0.0..=1.0).contains(&planet.temperature.get(season)[r]));
                }
            }
        }
    }

    #[test]
    fn boundary_type_interior_iff_same_plate_neighbors() {
        let generator = PlanetGenerator::new(small_params(42)).unwrap();
        let planet = generator.generate(small_mesh()).unwrap();
        for r in 0..planet.mesh.n_regions() {
            let interior = planet
                .mesh
                .neighbors(r)
                .iter()
                .all(|&nb| planet.plates.region_plate[nb as usize] == planet.plates.region_plate[r]);
            assert_eq!(
                planet.boundary_type[r] == BoundaryType::Interior,
                interior,
                "region {r}"
            );
        }
    }

    #[test]
    fn progress_is_monotonic_and_labelled() {
        let generator = PlanetGenerator::new(small_params(5)).unwrap();
        let mut seen: Vec<(f32, String)> = Vec::new();
        generator
            .generate_with(small_mesh(), |pct, label| seen.push((pct, label.to_string())), &CancelFlag::new())
            .unwrap();
        assert!(seen.len() >= 10, "expected a checkpoint per stage, got {}", seen.len());
        for w in seen.windows(2) {
            assert!(w[0].0 <= w[1].0, "progress went backwards: {w:?}");
        }
        assert_eq!(seen.last().unwrap().0, 100.0);
        assert!(seen.iter().any(|(_, l)| l == "elevation"));
    }

    #[test]
    fn cancelled_flag_aborts_before_work() {
        let generator = PlanetGenerator::new(small_params(5)).unwrap();
        let cancel = CancelFlag::new();
        cancel.cancel();
        let result = generator.generate_with(small_mesh(), |_, _| {}, &cancel);
        assert!(matches!(result, Err(PipelineError::Cancelled)));
    }

    #[test]
    fn invalid_params_are_rejected_up_front() {
        let bad = PlanetParams { plates: 1, ..Default::default() };
        assert!(matches!(
            PlanetGenerator::new(bad),
            Err(PipelineError::ParamOutOfRange("plates"))
        ));
    }

    #[test]
    fn per_stage_timings_cover_the_pipeline() {
        let generator = PlanetGenerator::new(small_params(9)).unwrap();
        let planet = generator.generate(small_mesh()).unwrap();
        let labels: Vec<&str> = planet.timings.iter().map(|t| t.label).collect();
        for expected in ["plates", "collision", "stress", "elevation", "coastal", "wind", "currents", "precipitation", "temperature", "koppen"] {
            assert!(labels.contains(&expected), "missing stage timing `{expected}`");
        }
    }
}
