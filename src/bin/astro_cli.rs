use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use kepler_orrery::astro::{OrbitalElements, Propagator};
use kepler_orrery::catalog::read_catalog;
use kepler_orrery::logging::init_logging;
use kepler_orrery::math::anomaly::AnomalySolver;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SolverArg {
    /// Single step, E = M + e sin(M)
    Fixed,
    /// Newton's method, converged to 1e-6
    Newton,
}

#[derive(Debug, Parser)]
struct Args {
    /// Name of the body to describe
    name: String,
    /// Catalog of bodies to load
    #[arg(long, default_value = "bodies.ron")]
    catalog: PathBuf,
    /// Simulation time at which to report the body's position
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    time: f64,
    /// Also print the orbit path, sampled with this many segments
    #[arg(long)]
    segments: Option<usize>,
    /// Override the catalog's Kepler solver
    #[arg(long, value_enum)]
    solver: Option<SolverArg>,
    /// Log filter, used when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut catalog = read_catalog(&args.catalog)?;
    init_logging(
        args.log_level
            .as_deref()
            .unwrap_or(&catalog.simulation.log_level),
    );

    match args.solver {
        Some(SolverArg::Fixed) => catalog.simulation.solver = AnomalySolver::FixedPoint,
        Some(SolverArg::Newton) => catalog.simulation.solver = AnomalySolver::newton(),
        None => {}
    }
    let orrery = catalog.build_orrery()?;

    let body = match orrery.find_body(&args.name) {
        Some(body) => body,
        None => {
            let known: Vec<_> = orrery.bodies().map(|b| b.info.name.as_str()).collect();
            return Err(format!(
                "No body named {} in {} (known: {})",
                args.name,
                args.catalog.display(),
                known.join(", ")
            )
            .into());
        }
    };
    let orbit = &body.elements;

    println!("Orbital characteristics for {}", body.info.name);
    println!("- Semi-major axis: {}", orbit.semimajor_axis());
    println!("- Apoapsis: {}", orbit.apoapsis());
    println!("- Periapsis: {}", orbit.periapsis());
    println!("- Orbital eccentricity: {}", orbit.eccentricity());
    println!(
        "- Orbital inclination: {}",
        orbit.inclination().to_degrees()
    );
    println!(
        "- Argument of periapsis: {}",
        orbit.arg_periapse().to_degrees()
    );
    println!("- LAN: {}", orbit.long_asc_node().to_degrees());
    println!("- Period: {}", orbit.period());
    println!("- Orbit normal: {:?}", orbit.normal_vector().as_ref());
    println!();

    let state = orrery
        .state_of(body.id, args.time)
        .ok_or("body vanished from the orrery")?;
    println!("State at t = {} ({:?})", args.time, orrery.propagator().solver());
    println!("- Mean anomaly: {}", orbit.mean_anomaly_at(args.time));
    println!("- Eccentric anomaly: {}", state.eccentric_anomaly);
    println!("- True anomaly: {}", state.true_anomaly.to_degrees());
    println!("- Radius: {}", state.radius());
    println!(
        "- Position: ({}, {}, {})",
        state.position.x, state.position.y, state.position.z
    );
    if !state.converged {
        println!("- Warning: Kepler solver did not converge");
    }

    if let Some(segments) = args.segments {
        print_path(orrery.propagator(), orbit, segments)?;
    }

    Ok(())
}

fn print_path(
    propagator: &Propagator<AnomalySolver>,
    orbit: &OrbitalElements,
    segments: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    if segments == 0 {
        return Err("--segments must be at least 1".into());
    }

    println!();
    println!("Path with {} segments:", segments);
    for (k, point) in propagator.path(orbit, segments).enumerate() {
        println!("{:4} {:>12.6} {:>12.6} {:>12.6}", k, point.x, point.y, point.z);
    }
    Ok(())
}
