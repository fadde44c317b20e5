use std::path::PathBuf;

use clap::Parser;
use kiss3d::camera::ArcBall;
use kiss3d::event::{Action, Key, WindowEvent};
use kiss3d::light::Light;
use kiss3d::scene::SceneNode;
use kiss3d::window::Window;
use nalgebra::{Point3, Translation3, Vector3};
use tracing::info;

use kepler_orrery::catalog::read_catalog;
use kepler_orrery::logging::init_logging;
use kepler_orrery::orrery::{Orrery, SimulationClock};

const CENTRAL_BODY_RADIUS: f32 = 1.0;
const CENTRAL_BODY_COLOR: (f32, f32, f32) = (0.2, 0.4, 1.0);

#[derive(Debug, Parser)]
struct Args {
    /// Catalog of bodies to display
    #[arg(long, default_value = "bodies.ron")]
    catalog: PathBuf,
    /// Start paused
    #[arg(long)]
    paused: bool,
}

struct Viewer {
    orrery: Orrery,
    clock: SimulationClock,
    spheres: Vec<SceneNode>,
    paths: Vec<(Vec<Point3<f32>>, Point3<f32>)>,

    window: Window,
    camera: ArcBall,
    paused: bool,
}

impl Viewer {
    fn new(mut window: Window, orrery: Orrery, clock: SimulationClock) -> Self {
        let mut central = window.add_sphere(CENTRAL_BODY_RADIUS);
        let (r, g, b) = CENTRAL_BODY_COLOR;
        central.set_color(r, g, b);

        let mut spheres = Vec::with_capacity(orrery.len());
        let mut paths = Vec::with_capacity(orrery.len());
        let mut farthest = CENTRAL_BODY_RADIUS as f64;
        for body in orrery.bodies() {
            let mut sphere = window.add_sphere(body.info.radius);
            let color = &body.info.color;
            sphere.set_color(color.x, color.y, color.z);
            spheres.push(sphere);

            let nodes = body.path().iter().map(convert_f32).collect();
            paths.push((nodes, body.info.color));
            farthest = farthest.max(body.elements.apoapsis());
        }

        let eye = Point3::new(0.0, -2.0, 1.0) * farthest as f32;
        let camera = ArcBall::new(eye, Point3::origin());

        Viewer {
            orrery,
            clock,
            spheres,
            paths,
            window,
            camera,
            paused: false,
        }
    }

    fn draw_loop(&mut self) {
        loop {
            self.process_user_input();
            self.update_scene_objects();

            if !self.render_scene() {
                break;
            }

            if !self.paused {
                self.clock.tick();
            }
        }
    }

    fn process_user_input(&mut self) {
        for event in self.window.events().iter() {
            match event.value {
                WindowEvent::Key(Key::Period, Action::Press, _) => {
                    self.clock.set_step(self.clock.step() * 2.0);
                    info!("Time step is {}", self.clock.step());
                }
                WindowEvent::Key(Key::Comma, Action::Press, _) => {
                    self.clock.set_step(self.clock.step() / 2.0);
                    info!("Time step is {}", self.clock.step());
                }
                WindowEvent::Key(Key::R, Action::Press, _) => {
                    self.clock.set_step(-self.clock.step());
                    self.paused = false;
                }
                WindowEvent::Key(Key::P, Action::Press, _) => {
                    self.paused = !self.paused;
                }
                WindowEvent::Key(Key::Z, Action::Press, _) => {
                    self.clock.reset();
                    info!("Clock reset");
                }
                _ => {}
            }
        }
    }

    fn update_scene_objects(&mut self) {
        for (id, position) in self.orrery.positions_at(self.clock.time()) {
            let position = convert_f32(&position);
            self.spheres[id.0].set_local_translation(Translation3::from(position.coords));
        }
    }

    fn render_scene(&mut self) -> bool {
        for (nodes, color) in self.paths.iter() {
            draw_path(&mut self.window, nodes, color);
        }

        self.window.render_with_camera(&mut self.camera)
    }
}

fn convert_f32(v: &Vector3<f64>) -> Point3<f32> {
    let v: Vector3<f32> = nalgebra::convert(*v);
    Point3::from(v)
}

fn draw_path(window: &mut Window, pts: &[Point3<f32>], color: &Point3<f32>) {
    for pair in pts.windows(2) {
        window.draw_line(&pair[0], &pair[1], color);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let catalog = read_catalog(&args.catalog)?;
    init_logging(&catalog.simulation.log_level);
    let orrery = catalog.build_orrery()?;
    info!(
        "Loaded {} bodies from {}",
        orrery.len(),
        args.catalog.display()
    );

    let mut window = Window::new("Kepler Orrery");
    window.set_light(Light::StickToCamera);
    window.set_framerate_limit(Some(60));

    let clock = SimulationClock::new(catalog.simulation.time_step);
    let mut viewer = Viewer::new(window, orrery, clock);
    viewer.paused = args.paused;
    viewer.draw_loop();

    Ok(())
}
