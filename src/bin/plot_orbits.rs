use std::path::{Path, PathBuf};

use clap::Parser;
use plotters::prelude::*;
use tracing::info;

use kepler_orrery::catalog::read_catalog;
use kepler_orrery::logging::init_logging;
use kepler_orrery::orrery::Orrery;

#[derive(Debug, Parser)]
struct Args {
    /// Catalog of bodies to plot
    #[arg(long, default_value = "bodies.ron")]
    catalog: PathBuf,
    /// Directory to write the PNGs into
    #[arg(long, default_value = "plots")]
    out_dir: PathBuf,
}

#[derive(Debug, Clone, Copy)]
enum Projection {
    XY,
    XZ,
}

impl Projection {
    fn file_name(self) -> &'static str {
        match self {
            Projection::XY => "orbits-xy.png",
            Projection::XZ => "orbits-xz.png",
        }
    }

    fn project(self, x: f64, y: f64, z: f64) -> (f64, f64) {
        match self {
            Projection::XY => (x, y),
            Projection::XZ => (x, z),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let catalog = read_catalog(&args.catalog)?;
    init_logging(&catalog.simulation.log_level);
    let orrery = catalog.build_orrery()?;

    std::fs::create_dir_all(&args.out_dir)?;
    for projection in [Projection::XY, Projection::XZ] {
        let path = args.out_dir.join(projection.file_name());
        draw_plot(&path, &orrery, projection)?;
        info!("Wrote {}", path.display());
    }

    Ok(())
}

fn draw_plot(
    path: &Path,
    orrery: &Orrery,
    projection: Projection,
) -> Result<(), Box<dyn std::error::Error>> {
    // Square, centered on the focus, big enough for the widest orbit
    let extent = orrery
        .bodies()
        .map(|body| body.elements.apoapsis())
        .fold(1.0, f64::max)
        * 1.1;

    let root = BitMapBackend::new(path, (640, 640)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{:?} projection", projection), ("sans-serif", 20))
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(-extent..extent, -extent..extent)?;

    chart.configure_mesh().draw()?;

    for body in orrery.bodies() {
        let color = &body.info.color;
        let style = RGBColor(
            (color.x * 255.0) as u8,
            (color.y * 255.0) as u8,
            (color.z * 255.0) as u8,
        );
        chart
            .draw_series(LineSeries::new(
                body.path()
                    .iter()
                    .map(|p| projection.project(p.x, p.y, p.z)),
                &style,
            ))?
            .label(body.info.name.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    chart.draw_series(std::iter::once(Circle::new((0.0, 0.0), 4, BLUE.filled())))?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
