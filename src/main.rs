//! comcad - inspect plan files and try the canvas grid snap from a terminal.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use comcad_core::config::{DEFAULT_GRID_SPACING, DEFAULT_MAJOR_EVERY, DEFAULT_SNAP_TOLERANCE_PX};
use comcad_core::{
    load_file, snap, Capabilities, GridSpec, LoadError, LoadOptions, LoadResult, LoadedDocument,
    PdfBackends, Point, Vector, ViewTransform,
};

/// Inspect DWG/PDF plans and exercise the ComCAD grid snap.
#[derive(Parser, Debug)]
#[command(name = "comcad")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a plan and print what was found in it
    Inspect {
        /// DWG, DXF or PDF file
        file: PathBuf,

        /// Print the whole load result as JSON
        #[arg(long)]
        json: bool,

        /// Longest side of a rendered PDF preview
        #[arg(long)]
        preview_max_px: Option<u32>,
    },

    /// Show which loader backends are available
    Capabilities,

    /// Snap a world point to the grid
    Snap {
        /// World X
        #[arg(long, allow_hyphen_values = true)]
        x: f64,

        /// World Y
        #[arg(long, allow_hyphen_values = true)]
        y: f64,

        /// Minor grid spacing in world units
        #[arg(long, default_value_t = DEFAULT_GRID_SPACING)]
        spacing: f64,

        /// Snap tolerance in pixels
        #[arg(long, default_value_t = DEFAULT_SNAP_TOLERANCE_PX)]
        tolerance: f64,

        /// Pixels per world unit
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
    },
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Inspect {
            file,
            json,
            preview_max_px,
        } => inspect(file, json, preview_max_px),
        Command::Capabilities => {
            println!("{}", Capabilities::detect(&PdfBackends::detect()));
            Ok(ExitCode::SUCCESS)
        }
        Command::Snap {
            x,
            y,
            spacing,
            tolerance,
            scale,
        } => {
            println!("{}", snap_report(Point::new(x, y), spacing, tolerance, scale)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load `file` and print it. A failed load exits with `exit_status`.
fn inspect(file: PathBuf, json: bool, preview_max_px: Option<u32>) -> Result<ExitCode> {
    let backends = PdfBackends::detect();
    let caps = Capabilities::detect(&backends);
    let mut options = LoadOptions::default();
    if let Some(max_px) = preview_max_px {
        options.preview_max_px = max_px.max(1);
    }

    info!("Inspecting: {}", file.display());
    let result = load_file(&file, &options, &caps, &backends);

    if json {
        let json =
            serde_json::to_string_pretty(&result).context("Failed to serialize load result")?;
        println!("{}", json);
    } else {
        print!("{}", describe(&result));
    }

    if let Some(err) = result.error() {
        let report = anyhow::Error::new(err.clone())
            .context(format!("Failed to load {}", file.display()));
        error!("{:#}", report);
        return Ok(ExitCode::from(exit_status(err)));
    }
    Ok(ExitCode::SUCCESS)
}

/// Process exit status for a load failure: the magnitude of its error code.
fn exit_status(err: &LoadError) -> u8 {
    u8::try_from(err.code_value().unsigned_abs()).unwrap_or(1)
}

/// Human-readable report for a load result.
fn describe(result: &LoadResult) -> String {
    let mut out = format!("{}\n{}\n", result.file_name(), result.short_description());

    match result.document() {
        Some(LoadedDocument::Dwg(info)) => {
            if !info.layers.is_empty() {
                out.push_str("\nLayers:\n");
                for layer in &info.layers {
                    out.push_str(&format!("  {:<24} {:>6}", layer.name, layer.entity_count));
                    if !layer.on {
                        out.push_str("  off");
                    }
                    if layer.frozen == Some(true) {
                        out.push_str("  frozen");
                    }
                    if layer.locked == Some(true) {
                        out.push_str("  locked");
                    }
                    out.push('\n');
                }
            }
            if !info.entity_types.is_empty() {
                out.push_str("\nEntity types:\n");
                for (name, count) in &info.entity_types {
                    out.push_str(&format!("  {:<24} {:>6}\n", name, count));
                }
            }
            if let Some(e) = info.extents {
                out.push_str(&format!(
                    "\nExtents: ({:.2}, {:.2}) - ({:.2}, {:.2})\n",
                    e.min.x, e.min.y, e.max.x, e.max.y
                ));
            }
        }
        Some(LoadedDocument::Pdf(info)) => {
            if let Some((w, h)) = info.page_size {
                out.push_str(&format!("Page size: {:.0} x {:.0} pt\n", w, h));
            }
            if info.has_preview() {
                out.push_str("Preview rendered\n");
            }
            if !info.metadata.is_empty() {
                out.push_str("\nMetadata:\n");
                for (key, value) in &info.metadata {
                    out.push_str(&format!("  {}: {}\n", key, value));
                }
            }
        }
        None => {
            if let Some(detail) = result.error().and_then(|e| e.detail()) {
                out.push_str(&format!("Detail: {}\n", detail));
            }
        }
    }
    out
}

/// Snap `raw` on a grid of `spacing` viewed at `scale` pixels per unit.
fn snap_report(raw: Point, spacing: f64, tolerance: f64, scale: f64) -> Result<String> {
    let grid = GridSpec::new(spacing, DEFAULT_MAJOR_EVERY)?;
    let view = ViewTransform::default().with_scale(scale, Vector::ZERO)?;
    if !tolerance.is_finite() || tolerance < 0.0 {
        anyhow::bail!("Tolerance must be a finite value >= 0, got {}", tolerance);
    }

    let report = match snap(raw, &grid, &view, tolerance) {
        // + 0.0 turns a rounded -0 into 0
        Some(p) => format!("{:.2}, {:.2} (snapped)", p.x + 0.0, p.y + 0.0),
        None => format!("{:.2}, {:.2} (not snapped)", raw.x, raw.y),
    };
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_snap_report() {
        assert_eq!(
            snap_report(Point::new(24.0, 1.0), 25.0, 14.0, 1.0).unwrap(),
            "25.00, 0.00 (snapped)"
        );
        assert_eq!(
            snap_report(Point::new(37.0, 12.0), 25.0, 14.0, 1.0).unwrap(),
            "37.00, 12.00 (not snapped)"
        );
        assert_eq!(
            snap_report(Point::new(-24.0, -1.0), 25.0, 14.0, 1.0).unwrap(),
            "-25.00, 0.00 (snapped)"
        );
    }

    #[test]
    fn test_snap_report_rejects_bad_input() {
        assert!(snap_report(Point::new(0.0, 0.0), 0.0, 14.0, 1.0).is_err());
        assert!(snap_report(Point::new(0.0, 0.0), 25.0, -1.0, 1.0).is_err());
        assert!(snap_report(Point::new(0.0, 0.0), 25.0, 14.0, 0.0).is_err());
    }

    #[test]
    fn test_exit_status_follows_error_code() {
        let dir = tempfile::tempdir().unwrap();
        let unsupported = comcad_core::load_with_defaults(&dir.path().join("plan.txt"));
        assert_eq!(exit_status(unsupported.error().unwrap()), 2);

        let missing = comcad_core::load_with_defaults(&dir.path().join("plan.pdf"));
        match missing.error().unwrap() {
            err @ LoadError::FileNotFound { .. } => assert_eq!(exit_status(err), 1),
            err @ LoadError::MissingDependency { .. } => assert_eq!(exit_status(err), 4),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_describe_failed_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.txt");
        let result = comcad_core::load_with_defaults(&path);
        assert_eq!(
            describe(&result),
            "plan.txt\nError: Unsupported extension: .txt\n"
        );
    }
}
