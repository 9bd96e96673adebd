//! raster-prep: Gaussian mixture rasterization tool and synthetic model generator.
//!
//! Usage:
//!   raster-prep mixture --model mixture.json --center 49.87,8.65 --extent 1000,1000 \
//!       --resolution 100x100 --png out.png --csv out.csv
//!   raster-prep synthetic --center 49.87,8.65 --seed 42 --model-out mixture.json
//!   raster-prep split --model mixture.json --center 49.87,8.65 --depth 2 --out-dir leaves/

use std::path::PathBuf;
use std::process;

use glam::{DMat2, DVec2};
use probmap_core::PolarLocation;
use probmap_models::{Gaussian, GaussianMixture};
use probmap_raster::RasterBand;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "mixture" => cmd_mixture(&args[2..]),
        "synthetic" => cmd_synthetic(&args[2..]),
        "split" => cmd_split(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "raster-prep: PROBMAP mixture rasterization tool\n\
         \n\
         Commands:\n\
         \n\
         mixture   Rasterize a Gaussian mixture model over a grid\n\
         \n\
           --model <path>       Mixture model JSON file\n\
           --center <lat,lon>   Geodetic center of the grid\n\
           --extent <w,h>       Physical extent in meters (default: 1000,1000)\n\
           --resolution <WxH>   Grid resolution in cells (default: 100x100)\n\
           --png <path>         Write a grayscale PNG\n\
           --csv <path>         Write a geodetic CSV table\n\
           --time <stamp>       Constant datetime column for the CSV\n\
         \n\
         synthetic Generate a seeded random mixture and rasterize it\n\
         \n\
           --center <lat,lon>   Geodetic center of the grid\n\
           --components <N>     Number of components (default: 4)\n\
           --seed <N>           RNG seed (default: 0)\n\
           --model-out <path>   Write the generated model JSON\n\
           (plus the mixture output options above)\n\
         \n\
         split     Rasterize a mixture, split recursively, write leaf CSVs\n\
         \n\
           --depth <N>          Split depth (default: 1)\n\
           --out-dir <path>     Output directory for leaf CSVs (default: .)\n\
           (plus the mixture options above)\n\
         \n\
         Examples:\n\
         \n\
           raster-prep mixture --model uav.json --center 49.87,8.65 --csv uav.csv\n\
           raster-prep synthetic --center 49.87,8.65 --seed 7 --png synth.png\n"
    );
}

// --- Argument helpers ---

fn parse_flag_value(args: &[String], flag: &str) -> Option<String> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

fn parse_center(args: &[String]) -> Option<PolarLocation> {
    let raw = parse_flag_value(args, "--center")?;
    let parts: Vec<&str> = raw.split(',').collect();
    if parts.len() != 2 {
        return None;
    }
    let latitude: f64 = parts[0].parse().ok()?;
    let longitude: f64 = parts[1].parse().ok()?;
    Some(PolarLocation::new(latitude, longitude))
}

fn parse_extent(args: &[String]) -> (f64, f64) {
    if let Some(raw) = parse_flag_value(args, "--extent") {
        let parts: Vec<&str> = raw.split(',').collect();
        if parts.len() == 2 {
            if let (Ok(w), Ok(h)) = (parts[0].parse(), parts[1].parse()) {
                return (w, h);
            }
        }
        eprintln!("Error: cannot parse --extent '{raw}', expected <w,h> in meters");
        process::exit(1);
    }
    (1000.0, 1000.0)
}

fn parse_resolution(args: &[String]) -> (usize, usize) {
    if let Some(raw) = parse_flag_value(args, "--resolution") {
        let parts: Vec<&str> = raw.split('x').collect();
        if parts.len() == 2 {
            if let (Ok(w), Ok(h)) = (parts[0].parse(), parts[1].parse()) {
                return (w, h);
            }
        }
        eprintln!("Error: cannot parse --resolution '{raw}', expected <WxH> in cells");
        process::exit(1);
    }
    (100, 100)
}

fn parse_number<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    match parse_flag_value(args, flag) {
        Some(raw) => raw.parse().unwrap_or(default),
        None => default,
    }
}

fn require_center(args: &[String]) -> PolarLocation {
    match parse_center(args) {
        Some(c) => c,
        None => {
            eprintln!("Error: --center <lat,lon> is required");
            process::exit(1);
        }
    }
}

fn load_mixture(args: &[String]) -> GaussianMixture {
    let path = match parse_flag_value(args, "--model") {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("Error: --model <path> is required");
            process::exit(1);
        }
    };

    let text = match std::fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error reading model file {}: {e}", path.display());
            process::exit(1);
        }
    };

    match serde_json::from_str(&text) {
        Ok(mixture) => mixture,
        Err(e) => {
            eprintln!("Error parsing model file {}: {e}", path.display());
            process::exit(1);
        }
    }
}

fn write_outputs(band: &RasterBand, args: &[String]) {
    let time = parse_flag_value(args, "--time");

    if let Some(path) = parse_flag_value(args, "--png") {
        match band.save_image(&path) {
            Ok(()) => eprintln!("Wrote image: {path}"),
            Err(e) => {
                eprintln!("Error writing image: {e}");
                process::exit(1);
            }
        }
    }

    if let Some(path) = parse_flag_value(args, "--csv") {
        match band.save_csv(&path, time.as_deref(), false) {
            Ok(()) => eprintln!("Wrote CSV: {path}"),
            Err(e) => {
                eprintln!("Error writing CSV: {e}");
                process::exit(1);
            }
        }
    }
}

// --- Mixture command ---

fn cmd_mixture(args: &[String]) {
    let mixture = load_mixture(args);
    let center = require_center(args);
    let (width, height) = parse_extent(args);
    let resolution = parse_resolution(args);

    eprintln!(
        "Rasterizing {} component(s) over {width}m x {height}m at {}x{}...",
        mixture.len(),
        resolution.0,
        resolution.1
    );

    let band = match RasterBand::from_gaussian_mixture(&mixture, center, width, height, resolution)
    {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error rasterizing mixture: {e}");
            process::exit(1);
        }
    };

    eprintln!("Total probability mass on grid: {:.6}", band.sum());
    write_outputs(&band, args);
}

// --- Synthetic command ---

fn cmd_synthetic(args: &[String]) {
    let center = require_center(args);
    let (width, height) = parse_extent(args);
    let resolution = parse_resolution(args);
    let components: usize = parse_number(args, "--components", 4);
    let seed: u64 = parse_number(args, "--seed", 0);

    eprintln!("Generating {components} component(s) with seed {seed}...");
    let mixture = generate_synthetic_mixture(components, seed, width, height);

    if let Some(path) = parse_flag_value(args, "--model-out") {
        let json = serde_json::to_string_pretty(&mixture).expect("mixture serializes");
        match std::fs::write(&path, json) {
            Ok(()) => eprintln!("Wrote model: {path}"),
            Err(e) => {
                eprintln!("Error writing model: {e}");
                process::exit(1);
            }
        }
    }

    let band = match RasterBand::from_gaussian_mixture(&mixture, center, width, height, resolution)
    {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error rasterizing mixture: {e}");
            process::exit(1);
        }
    };

    eprintln!("Total probability mass on grid: {:.6}", band.sum());
    write_outputs(&band, args);
}

/// Generate a normalized random mixture spread over the grid extent.
fn generate_synthetic_mixture(
    components: usize,
    seed: u64,
    width: f64,
    height: f64,
) -> GaussianMixture {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut mixture = GaussianMixture::default();

    for _ in 0..components {
        let mean = DVec2::new(
            rng.gen_range(-0.35..0.35) * width,
            rng.gen_range(-0.35..0.35) * height,
        );
        let covariance = random_spd_matrix(&mut rng, (width.min(height) / 12.0).powi(2));
        let weight: f64 = rng.gen_range(0.1..1.0);

        match Gaussian::new(mean, covariance, weight) {
            Ok(gaussian) => mixture.push(gaussian),
            Err(e) => {
                eprintln!("Error building synthetic component: {e}");
                process::exit(1);
            }
        }
    }

    mixture.normalize_weights();
    mixture
}

/// Random symmetric positive-definite 2x2 covariance.
fn random_spd_matrix<R: Rng + ?Sized>(rng: &mut R, scale: f64) -> DMat2 {
    let a = DMat2::from_cols(
        DVec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0)),
        DVec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0)),
    );
    let c = a.transpose() * a;
    (c + DMat2::IDENTITY * 0.5) * scale
}

// --- Split command ---

fn cmd_split(args: &[String]) {
    let mixture = load_mixture(args);
    let center = require_center(args);
    let (width, height) = parse_extent(args);
    let resolution = parse_resolution(args);
    let depth: usize = parse_number(args, "--depth", 1);
    let out_dir = PathBuf::from(parse_flag_value(args, "--out-dir").unwrap_or_else(|| ".".into()));
    let time = parse_flag_value(args, "--time");

    let band = match RasterBand::from_gaussian_mixture(&mixture, center, width, height, resolution)
    {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error rasterizing mixture: {e}");
            process::exit(1);
        }
    };

    eprintln!("Splitting to depth {depth}...");
    let leaves = band.split_to_depth(depth);
    eprintln!("Got {} leaf band(s)", leaves.len());

    if let Err(e) = std::fs::create_dir_all(&out_dir) {
        eprintln!("Error creating output directory: {e}");
        process::exit(1);
    }

    for (index, leaf) in leaves.iter().enumerate() {
        let path = out_dir.join(format!("leaf_{index:03}.csv"));
        if let Err(e) = leaf.save_csv(&path, time.as_deref(), false) {
            eprintln!("Error writing {}: {e}", path.display());
            process::exit(1);
        }
    }
    eprintln!("Done! Output: {}", out_dir.display());
}
