// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: Turn a floor plan blueprint into extruded room walls (OBJ output)
//!
//! Usage:
//!   floorplan <image_path> [options]
//!
//! Build with: cargo build -p blueprint3d-vision --features cli --bin floorplan

use anyhow::{bail, Context, Result};
use blueprint3d_vision::{
    write_obj, BlueprintConfig, DetachedRoot, DisplayImage, IntensityBuffer, ModelCollection,
    PreviewSession, WindingPolicy,
};
use image::ImageReader;
use std::env;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

struct Options {
    image_path: PathBuf,
    config_path: Option<PathBuf>,
    threshold: Option<f32>,
    wall_height: Option<f64>,
    scale: Option<f64>,
    min_area: Option<f64>,
    winding: Option<WindingPolicy>,
    output_path: PathBuf,
    preview_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "info,blueprint3d_vision=debug".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return Ok(());
    }

    let options = match parse_args(&args[1..]) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    run(&options)
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options {
        image_path: PathBuf::from(&args[0]),
        config_path: None,
        threshold: None,
        wall_height: None,
        scale: None,
        min_area: None,
        winding: None,
        output_path: PathBuf::from("model.obj"),
        preview_dir: None,
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--threshold" => options.threshold = Some(parse_value(args, &mut i)?),
            "--height" => options.wall_height = Some(parse_value(args, &mut i)?),
            "--scale" => options.scale = Some(parse_value(args, &mut i)?),
            "--min-area" => options.min_area = Some(parse_value(args, &mut i)?),
            "--winding" => {
                options.winding = Some(match value(args, &mut i)? {
                    "outward" => WindingPolicy::Outward,
                    "as-traced" => WindingPolicy::AsTraced,
                    other => bail!("Invalid winding '{}', expected outward or as-traced", other),
                });
            }
            "--config" => options.config_path = Some(PathBuf::from(value(args, &mut i)?)),
            "--output" => options.output_path = PathBuf::from(value(args, &mut i)?),
            "--preview-dir" => options.preview_dir = Some(PathBuf::from(value(args, &mut i)?)),
            other => bail!("Unknown option: {}", other),
        }
        i += 1;
    }

    Ok(options)
}

/// Advance past a flag and return its argument
fn value<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .with_context(|| format!("Missing value for {}", flag))
}

fn parse_value<T>(args: &[String], i: &mut usize) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let flag = args[*i].clone();
    let raw = value(args, i)?;
    raw.parse()
        .with_context(|| format!("Invalid value for {}: '{}'", flag, raw))
}

fn run(options: &Options) -> Result<()> {
    println!("=== Blueprint to 3D Walls ===");
    println!();

    // Step 1: Configuration
    let mut config = match &options.config_path {
        Some(path) => BlueprintConfig::from_json_file(path)
            .with_context(|| format!("Cannot load config '{}'", path.display()))?,
        None => BlueprintConfig::default(),
    };
    if let Some(threshold) = options.threshold {
        config.threshold = threshold;
    }
    if let Some(height) = options.wall_height {
        config.wall_height = height;
    }
    if let Some(scale) = options.scale {
        config.pixel_to_meter = scale;
    }
    if let Some(min_area) = options.min_area {
        config.min_contour_area = min_area;
    }
    if let Some(winding) = options.winding {
        config.winding = winding;
    }
    config.validate().context("Invalid configuration")?;

    // Step 2: Load image
    println!("[1/4] Loading image: {}", options.image_path.display());
    let img = ImageReader::open(&options.image_path)
        .with_context(|| format!("Cannot open image '{}'", options.image_path.display()))?
        .decode()
        .with_context(|| format!("Cannot decode image '{}'", options.image_path.display()))?;
    let grayscale = img.to_luma8();
    println!("  Image size: {}x{} pixels", grayscale.width(), grayscale.height());

    // Step 3: Edge preview
    println!(
        "[2/4] Detecting edges (low {:.1}, high {:.1})...",
        config.threshold,
        config.high_threshold()
    );
    let mut session = PreviewSession::new(config.clone());
    session.load(IntensityBuffer::from_gray_image(grayscale))?;

    if let Some(dir) = &options.preview_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create preview directory '{}'", dir.display()))?;
        if let Some(source) = session.source_preview() {
            save_preview(source, &dir.join("source.png"))?;
        }
        if let Some(edges) = session.edge_preview() {
            save_preview(edges, &dir.join("edges.png"))?;
        }
    }

    // Step 4: Walls
    println!("[3/4] Tracing rooms and extruding walls...");
    let mut model = ModelCollection::new(DetachedRoot);
    let report = session.generate(&mut model)?;
    println!("  Contours traced:   {}", report.input);
    println!("  Filtered (noise):  {}", report.filtered_out);
    println!("  Skipped (invalid): {}", report.skipped);
    println!("  Rooms created:     {}", report.created);

    if model.is_empty() {
        eprintln!("Warning: no rooms found.");
        eprintln!("  Try: --threshold with a lower value");
        eprintln!("  Try: --min-area with a lower value");
    }

    // Step 5: Export
    println!("[4/4] Writing OBJ file: {}", options.output_path.display());
    let file = fs::File::create(&options.output_path)
        .with_context(|| format!("Cannot create output file '{}'", options.output_path.display()))?;
    let mut out = BufWriter::new(file);
    write_obj(&mut out, &model)?;
    out.flush()?;

    let combined = model.combined_mesh();
    let (min, max) = combined.bounds();
    println!();
    println!("=== Model Summary ===");
    println!("  Rooms: {}", model.len());
    println!("  Vertices: {}", combined.vertex_count());
    println!("  Triangles: {}", combined.triangle_count());
    if !combined.is_empty() {
        println!(
            "  Footprint: {:.2}m x {:.2}m, wall height {:.2}m",
            max.x - min.x,
            max.z - min.z,
            config.wall_height
        );
    }

    Ok(())
}

fn save_preview(image: &DisplayImage, path: &Path) -> Result<()> {
    image
        .pixels()
        .save(path)
        .with_context(|| format!("Cannot write preview '{}'", path.display()))?;
    println!("  Preview saved: {}", path.display());
    Ok(())
}

fn print_usage() {
    println!("floorplan - Extrude room walls from a floor plan blueprint");
    println!();
    println!("Usage: floorplan <image_path> [options]");
    println!();
    println!("Options:");
    println!("  --threshold <t>        Low Canny threshold, high is t * ratio (default: 100)");
    println!("  --height <m>           Wall height in meters (default: 3.0)");
    println!("  --scale <m/px>         Meters per pixel (default: 0.01)");
    println!("  --min-area <px2>       Minimum room outline area in pixels (default: 50)");
    println!("  --winding <mode>       outward | as-traced (default: outward)");
    println!("  --config <file.json>   Load settings from a JSON file, flags override it");
    println!("  --output <path>        Output OBJ file (default: model.obj)");
    println!("  --preview-dir <dir>    Save source and edge previews as PNG");
    println!();
    println!("Logging is controlled with RUST_LOG (default: info,blueprint3d_vision=debug).");
}
