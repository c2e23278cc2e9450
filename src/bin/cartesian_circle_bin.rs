use cartesian_circle_lib::motion::dry_run::DryRunGroup;
use cartesian_circle_lib::motion::planner::{plan_cartesian_circle, MoveGroup};
use cartesian_circle_lib::motion::waypoints::{build_circle_waypoints, Plane};
use cartesian_circle_lib::utils::config_parser::Config;
use cartesian_circle_lib::Error;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Plan a closed cartesian circle on the dry-run move group
#[derive(Parser)]
struct Cli {
    /// Specify path to the settings file.
    #[arg(
        short,
        long,
        default_value = "configs/circle.toml",
        value_name = "FILE PATH"
    )]
    settings: PathBuf,
    /// Circle radius
    #[arg(short, long, value_name = "METERS")]
    radius: Option<f64>,
    /// Samples around the circle
    #[arg(short, long)]
    n_points: Option<usize>,
    /// Plane of the circle (xy, yz or xz)
    #[arg(short, long)]
    plane: Option<Plane>,
    #[arg(long, value_name = "METERS")]
    eef_step: Option<f64>,
    #[arg(long)]
    jump_threshold: Option<f64>,
    #[arg(long)]
    velocity_scale: Option<f64>,
    #[arg(long)]
    completeness_threshold: Option<f64>,
    /// Plan only
    #[arg(long, default_value_t = false)]
    no_execute: bool,
    /// Print the coarse waypoints
    #[arg(short, long, default_value_t = false)]
    dump: bool,
}

fn run(cli: Cli) -> Result<(), Error> {
    log::info!("Using settings file {}", cli.settings.display());
    let config = Config::from_settings_file(&cli.settings)?;
    log::debug!("Parsing successful {config:?}");

    let mut params = config.circle;
    params.radius = cli.radius.unwrap_or(params.radius);
    params.n_points = cli.n_points.unwrap_or(params.n_points);
    params.plane = cli.plane.unwrap_or(params.plane);
    params.eef_step = cli.eef_step.unwrap_or(params.eef_step);
    params.jump_threshold = cli.jump_threshold.unwrap_or(params.jump_threshold);
    params.velocity_scale = cli.velocity_scale.unwrap_or(params.velocity_scale);
    params.completeness_threshold = cli
        .completeness_threshold
        .unwrap_or(params.completeness_threshold);
    params.execute &= !cli.no_execute;

    let mut group = DryRunGroup::from_settings(&config.dry_run)?;

    if cli.dump {
        let start = group.current_pose()?;
        for (i, p) in build_circle_waypoints(&start, params.radius, params.n_points, params.plane)?
            .iter()
            .enumerate()
        {
            let v = p.translation.vector;
            println!("{i:4} {:+.5} {:+.5} {:+.5}", v.x, v.y, v.z);
        }
    }

    let (trajectory, fraction) = plan_cartesian_circle(&mut group, &params)?;
    println!("Fraction: {:.3}", fraction);
    println!(
        "Trajectory: {} poses, {:.4} m",
        trajectory.len(),
        trajectory.path_length()
    );
    println!("Executed: {}", !group.executed().is_empty());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
