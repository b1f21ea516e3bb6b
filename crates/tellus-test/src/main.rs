/// Offline pipeline harness: runs the full geophysics pipeline on the
/// banded host mesh and reports diagnostics, per-stage timings, and a
/// Köppen census. `--json` emits a machine-readable summary instead.

use std::collections::BTreeMap;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tellus_core::planet::{Diagnostics, Season, StageTiming};
use tellus_core::{CancelFlag, PlanetGenerator, PlanetParams, SphereMesh};

#[derive(Parser, Debug)]
#[command(name = "tellus-test", about = "Run the planet geophysics pipeline and print diagnostics")]
struct Args {
    /// Master seed (0..2^24).
    #[arg(short, long, default_value_t = 42)]
    seed: u32,

    /// Requested region count; the banded host mesh lands nearby.
    #[arg(short, long, default_value_t = 10_000)]
    regions: u32,

    /// Tectonic plate count.
    #[arg(short, long, default_value_t = 24)]
    plates: u32,

    /// Continent count.
    #[arg(short, long, default_value_t = 3)]
    continents: u32,

    /// Coastal roughness, 0–0.5.
    #[arg(long, default_value_t = 0.2)]
    roughness: f32,

    /// Smoothing slider, 0–1.
    #[arg(long, default_value_t = 0.0)]
    smoothing: f32,

    /// Hydraulic erosion slider, 0–1.
    #[arg(long, default_value_t = 0.0)]
    hydraulic: f32,

    /// Emit a JSON summary on stdout instead of the human report.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Summary {
    params: PlanetParams,
    n_regions: usize,
    diagnostics: Diagnostics,
    timings: Vec<StageTiming>,
    koppen_census: BTreeMap<&'static str, usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let params = PlanetParams {
        seed: args.seed,
        regions: args.regions,
        plates: args.plates,
        continents: args.continents,
        roughness: args.roughness,
        smoothing: args.smoothing,
        hydraulic_erosion: args.hydraulic,
        ..Default::default()
    };
    let generator = PlanetGenerator::new(params)?;

    let mesh = SphereMesh::banded(SphereMesh::bands_for_regions(args.regions as usize));
    let quiet = args.json;
    let planet = generator.generate_with(
        mesh,
        |pct, label| {
            if !quiet {
                eprintln!("[{pct:5.1}%] {label}");
            }
        },
        &CancelFlag::new(),
    )?;

    let mut census: BTreeMap<&'static str, usize> = BTreeMap::new();
    for &class in &planet.koppen {
        *census.entry(class.code()).or_insert(0) += 1;
    }

    if args.json {
        let summary = Summary {
            params: generator.params().clone(),
            n_regions: planet.mesh.n_regions(),
            diagnostics: planet.diagnostics.clone(),
            timings: planet.timings.clone(),
            koppen_census: census,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("regions:        {}", planet.mesh.n_regions());
    println!("land fraction:  {:.3}", planet.diagnostics.land_fraction);
    println!(
        "elevation:      [{:.3}, {:.3}]",
        planet.diagnostics.min_elevation, planet.diagnostics.max_elevation
    );
    println!("max stress:     {:.3}", planet.diagnostics.max_stress);

    let speed_mean = |season: Season| -> f32 {
        let s = &planet.wind.get(season).speed;
        s.iter().sum::<f32>() / s.len() as f32
    };
    println!(
        "mean wind:      summer {:.3}, winter {:.3}",
        speed_mean(Season::Summer),
        speed_mean(Season::Winter)
    );

    println!("timings:");
    for t in &planet.timings {
        println!("  {:<16} {:>6} ms", t.label, t.ms);
    }

    println!("koppen census:");
    for (code, count) in &census {
        let pct = 100.0 * *count as f64 / planet.koppen.len() as f64;
        println!("  {code:<6} {count:>8}  ({pct:5.1}%)");
    }

    Ok(())
}
