use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use percolation::config::{Params, Sampling};
use percolation::error::{PercolationError, Result};
use percolation::{render, stats};

const USAGE: &str = "usage:
  percolation stats <N> <trials> [seed] [--json] [--blocked-set] [--sequential]
  percolation viz <N> [seed] [out_dir] [cell_px]";

fn parse<T: std::str::FromStr>(arg: Option<&String>, name: &str) -> Result<Option<T>> {
    match arg {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| PercolationError::Usage(format!("invalid {name}: {s}\n{USAGE}"))),
    }
}

fn required<T: std::str::FromStr>(arg: Option<&String>, name: &str) -> Result<T> {
    parse(arg, name)?.ok_or_else(|| PercolationError::Usage(format!("missing {name}\n{USAGE}")))
}

const STATS_FLAGS: &[&str] = &["--json", "--blocked-set", "--sequential"];

fn check_flags(flags: &[String], known: &[&str]) -> Result<()> {
    match flags.iter().find(|f| !known.contains(&f.as_str())) {
        Some(f) => Err(PercolationError::Usage(format!("unknown flag: {f}\n{USAGE}"))),
        None => Ok(()),
    }
}

/// Pixel side of the rendered square image.
fn image_side(n: usize, cell_px: usize) -> Result<u32> {
    if cell_px == 0 {
        return Err(PercolationError::Usage(format!("cell_px must be > 0\n{USAGE}")));
    }
    n.checked_mul(cell_px)
        .and_then(|side| u32::try_from(side).ok())
        .ok_or_else(|| PercolationError::Usage(format!("image too large: {n} x {cell_px}px")))
}

fn run_stats(pos: &[String], flags: &[String]) -> Result<()> {
    check_flags(flags, STATS_FLAGS)?;
    let defaults = Params::default();
    let params = Params {
        grid_size: required(pos.first(), "N")?,
        trials: required(pos.get(1), "trials")?,
        seed: parse(pos.get(2), "seed")?.unwrap_or(defaults.seed),
        sampling: if flags.iter().any(|f| f == "--blocked-set") {
            Sampling::BlockedSet
        } else {
            defaults.sampling
        },
        parallel: !flags.iter().any(|f| f == "--sequential"),
    };

    info!(
        n = params.grid_size,
        trials = params.trials,
        seed = params.seed,
        sampling = ?params.sampling,
        parallel = params.parallel,
        "running threshold estimate"
    );
    let (stats, timings) = percolation::estimate(&params)?;

    eprintln!("\nTimings:");
    for t in &timings {
        eprintln!("  {:20} {:8.1} ms", t.name, t.ms);
    }

    let summary = stats.summary();
    if flags.iter().any(|f| f == "--json") {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{summary}");
    }
    Ok(())
}

fn run_viz(pos: &[String], flags: &[String]) -> Result<()> {
    check_flags(flags, &[])?;
    let n: usize = required(pos.first(), "N")?;
    let seed: u64 = parse(pos.get(1), "seed")?.unwrap_or(42);
    let out_dir: PathBuf = pos
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("artifacts"));
    let cell_px: usize = parse(pos.get(3), "cell_px")?.unwrap_or_else(|| (720 / n.max(1)).max(1));
    let side = image_side(n, cell_px)?;

    std::fs::create_dir_all(&out_dir)?;

    let perc = stats::percolate_randomly(n, seed, Sampling::Rejection)?;
    let open = perc.number_of_open_sites();
    info!(
        open,
        closed = n * n - open,
        fraction = perc.open_fraction(),
        percolates = perc.percolates(),
        "grid percolated"
    );

    // Replay up to the step before percolation to see how close it was.
    if open > 0 {
        let before = stats::open_random_sites(n, seed, Sampling::Rejection, open - 1)?;
        info!(
            critical_sites = before.critical_sites(),
            next_step_probability = before.next_step_probability(),
            "state before final open"
        );
    }

    let states = render::classify_sites(&perc);
    let rgba = render::render_sites(&states, cell_px);
    let path = out_dir.join("percolation.png");
    image::save_buffer(&path, &rgba, side, side, image::ColorType::Rgba8)?;
    eprintln!("Saved {}", path.display());
    Ok(())
}

fn run(args: &[String]) -> Result<()> {
    let (flags, pos): (Vec<String>, Vec<String>) =
        args.iter().skip(1).cloned().partition(|a| a.starts_with("--"));

    match pos.first().map(String::as_str) {
        Some("stats") => run_stats(&pos[1..], &flags),
        Some("viz") => run_viz(&pos[1..], &flags),
        _ => Err(PercolationError::Usage(USAGE.to_string())),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
