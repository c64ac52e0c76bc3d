//! Developer utility: pick a velocity model from a synthetic gather.

use std::path::PathBuf;

use serde::Serialize;
use velpick::config::{self, AppConfig};
use velpick::logging::{self, LogOptions};
use velpick::picker::{AnalysisSummary, VelocityPicker};
use velpick::synthetic::synthetic_gather;
use velpick::VelocityGrid;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone, Default)]
struct Options {
    config_path: Option<PathBuf>,
    out_path: Option<PathBuf>,
    velocities: Option<(f32, f32, f32)>,
    refine: bool,
    log: LogOptions,
}

#[derive(Debug, Serialize)]
struct Report {
    true_velocity: f32,
    velocity_gradient: f32,
    refined: bool,
    analysis: AnalysisSummary,
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    if let Err(err) = logging::init(&options.log) {
        eprintln!("Logging disabled: {err}");
    }
    let app_config = load_config(options.config_path.as_ref())?;
    let gather = synthetic_gather(&app_config.synthetic).map_err(|err| err.to_string())?;
    let grid = velocity_grid(&options, &app_config)?;
    tracing::info!(
        times = gather.num_times(),
        offsets = gather.num_offsets(),
        velocities = grid.len(),
        "Synthetic gather ready"
    );

    let picker = VelocityPicker::new(app_config.picker.clone()).map_err(|err| err.to_string())?;
    let analysis = if options.refine {
        picker.refine(&gather, &grid)
    } else {
        picker.pick(&gather, &grid, None)
    }
    .map_err(|err| err.to_string())?;

    let report = Report {
        true_velocity: app_config.synthetic.velocity,
        velocity_gradient: app_config.synthetic.velocity_gradient,
        refined: options.refine,
        analysis: analysis.summary(),
    };
    let json = serde_json::to_string_pretty(&report)
        .map_err(|err| format!("Serialize report failed: {err}"))?;
    match &options.out_path {
        Some(path) => {
            std::fs::write(path, json).map_err(|err| format!("Write report failed: {err}"))?;
            println!("Wrote report to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig, String> {
    match path {
        Some(path) => config::load_from_path(path),
        None => config::load_or_default(),
    }
    .map_err(|err| err.to_string())
}

fn velocity_grid(options: &Options, app_config: &AppConfig) -> Result<VelocityGrid, String> {
    let (start, stop, step) = options.velocities.unwrap_or_else(|| {
        let center = app_config.synthetic.velocity;
        (center * 0.75, center * 1.25, center * 0.025)
    });
    VelocityGrid::linspace(start, stop, step).map_err(|err| err.to_string())
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let mut options = Options::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--config" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--config requires a value".to_string())?;
                options.config_path = Some(PathBuf::from(value));
            }
            "--out" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--out requires a value".to_string())?;
                options.out_path = Some(PathBuf::from(value));
            }
            "--velocities" => {
                idx += 1;
                let value =
                    args.get(idx).ok_or_else(|| "--velocities requires a value".to_string())?;
                options.velocities = Some(parse_range(value)?);
            }
            "--log-dir" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--log-dir requires a value".to_string())?;
                options.log.dir = Some(PathBuf::from(value));
            }
            "--refine" => options.refine = true,
            "--no-log-file" => options.log.stderr_only = true,
            "-v" | "--verbose" => options.log.verbose = true,
            unknown => {
                return Err(format!("Unknown argument: {unknown}\n\n{}", help_text()));
            }
        }
        idx += 1;
    }
    Ok(Some(options))
}

fn parse_range(value: &str) -> Result<(f32, f32, f32), String> {
    let parts: Vec<&str> = value.split(':').collect();
    let [start, stop, step] = parts.as_slice() else {
        return Err(format!("Invalid --velocities value: {value} (expected MIN:MAX:STEP)"));
    };
    let parse = |part: &str| {
        part.trim()
            .parse::<f32>()
            .map_err(|_| format!("Invalid --velocities value: {value}"))
    };
    Ok((parse(*start)?, parse(*stop)?, parse(*step)?))
}

fn help_text() -> String {
    [
        "velpick",
        "",
        "Pick a velocity model from a synthetic common-midpoint gather.",
        "",
        "Usage:",
        "  velpick [--config <path>] [--velocities MIN:MAX:STEP] [--refine] [--out <path>]",
        "",
        "Options:",
        "  --config <path>         TOML config (defaults to the .velpick config directory).",
        "  --velocities <range>    Trial velocity grid (default: 75%..125% of the true velocity).",
        "  --refine                Follow the full pass with a bounded pass around its maxima.",
        "  --out <path>            Write the JSON report here instead of stdout.",
        "  --log-dir <path>        Directory for run logs.",
        "  --no-log-file           Log to stderr only.",
        "  -v, --verbose           Enable debug logging for velpick.",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parses_velocity_range_and_flags() {
        let options = parse_args(args(&["--velocities", "1500:2500:50", "--refine", "-v"]))
            .unwrap()
            .unwrap();
        assert_eq!(options.velocities, Some((1500.0, 2500.0, 50.0)));
        assert!(options.refine);
        assert!(options.log.verbose);
    }

    #[test]
    fn rejects_malformed_range_and_unknown_flags() {
        assert!(parse_args(args(&["--velocities", "1500:2500"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
        assert!(parse_args(args(&["--out"])).is_err());
    }
}
