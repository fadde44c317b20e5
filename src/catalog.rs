//! Body catalogs: RON files describing the simulation settings and the orbit
//! of every body in a scene.
//!
//! ```text
//! (
//!     simulation: (time_step: 1.0, path_segments: 100, solver: FixedPoint),
//!     bodies: [
//!         (
//!             name: "Moon",
//!             radius: 0.5,
//!             color: "cccccc",
//!             time_scale: 1.0,
//!             elements: (
//!                 semimajor_axis: 5.0,
//!                 eccentricity: 0.6,
//!                 inclination: 30.0,
//!                 long_asc_node: 60.0,
//!                 arg_periapsis: 45.0,
//!                 period: 1000.0,
//!             ),
//!         ),
//!     ],
//! )
//! ```
//!
//! Angles are in degrees. `time_scale` multiplies the simulation time seen by
//! one body, so bodies from different scenes can share a clock.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::astro::{ElementsError, OrbitalElements, Propagator};
use crate::math::anomaly::AnomalySolver;
use crate::orrery::{BodyInfo, Orrery};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[source] ron::error::SpannedError),
    #[error("invalid orbit for {name}: {source}")]
    InvalidElements {
        name: String,
        #[source]
        source: ElementsError,
    },
    #[error("invalid color {color:?} for {name}, expected six hex digits")]
    InvalidColor { name: String, color: String },
    #[error("time scale for {name} must be positive and finite, got {time_scale}")]
    InvalidTimeScale { name: String, time_scale: f64 },
    #[error("body {0} is listed more than once")]
    DuplicateBody(String),
    #[error("invalid simulation settings: {0}")]
    InvalidSimulation(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulated time added on every frame.
    pub time_step: f64,
    /// Number of segments in each drawn orbit.
    pub path_segments: usize,
    pub solver: AnomalySolver,
    /// Log filter used when RUST_LOG is not set.
    pub log_level: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: 1.0,
            path_segments: 100,
            solver: AnomalySolver::FixedPoint,
            log_level: "info".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementsEntry {
    pub semimajor_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub long_asc_node: f64,
    pub arg_periapsis: f64,
    pub period: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BodyEntry {
    pub name: String,
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    pub elements: ElementsEntry,
}

fn default_radius() -> f32 {
    0.5
}

fn default_color() -> String {
    "ffffff".to_owned()
}

fn default_time_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    #[serde(default)]
    pub simulation: SimulationConfig,
    pub bodies: Vec<BodyEntry>,
}

pub fn read_catalog(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_owned(),
        source,
    })?;
    Catalog::from_ron_str(&contents)
}

impl Catalog {
    pub fn from_ron_str(contents: &str) -> Result<Self, CatalogError> {
        ron::from_str(contents).map_err(CatalogError::Parse)
    }

    /// Validates every entry and builds the registry, computing each body's
    /// orbit path along the way.
    pub fn build_orrery(&self) -> Result<Orrery, CatalogError> {
        let sim = &self.simulation;
        if sim.path_segments == 0 {
            return Err(CatalogError::InvalidSimulation(
                "path_segments must be at least 1".to_owned(),
            ));
        }
        if !(sim.time_step.is_finite() && sim.time_step > 0.0) {
            return Err(CatalogError::InvalidSimulation(format!(
                "time_step must be positive and finite, got {}",
                sim.time_step
            )));
        }
        if let AnomalySolver::Newton {
            tolerance,
            max_iterations,
        } = sim.solver
        {
            if !(tolerance.is_finite() && tolerance >= 0.0) {
                return Err(CatalogError::InvalidSimulation(format!(
                    "Newton tolerance must be non-negative and finite, got {}",
                    tolerance
                )));
            }
            if max_iterations == 0 {
                return Err(CatalogError::InvalidSimulation(
                    "Newton max_iterations must be at least 1".to_owned(),
                ));
            }
        }
        debug!(
            bodies = self.bodies.len(),
            solver = ?sim.solver,
            "Building orrery from catalog"
        );

        let mut orrery = Orrery::new(Propagator::with_solver(sim.solver), sim.path_segments);
        let mut seen = HashSet::new();

        for entry in self.bodies.iter() {
            if !seen.insert(entry.name.to_lowercase()) {
                return Err(CatalogError::DuplicateBody(entry.name.clone()));
            }

            let color = parse_color(&entry.color).ok_or_else(|| CatalogError::InvalidColor {
                name: entry.name.clone(),
                color: entry.color.clone(),
            })?;
            let elements = entry.elements.to_elements().map_err(|source| {
                CatalogError::InvalidElements {
                    name: entry.name.clone(),
                    source,
                }
            })?;
            if !(entry.time_scale.is_finite() && entry.time_scale > 0.0) {
                return Err(CatalogError::InvalidTimeScale {
                    name: entry.name.clone(),
                    time_scale: entry.time_scale,
                });
            }

            let info = BodyInfo {
                name: entry.name.clone(),
                radius: entry.radius,
                color,
                time_scale: entry.time_scale,
            };
            orrery.add_body(info, elements);
        }

        Ok(orrery)
    }
}

impl ElementsEntry {
    pub fn to_elements(&self) -> Result<OrbitalElements, ElementsError> {
        OrbitalElements::from_degrees(
            self.semimajor_axis,
            self.eccentricity,
            self.inclination,
            self.long_asc_node,
            self.arg_periapsis,
            self.period,
        )
    }
}

fn parse_color(s: &str) -> Option<Point3<f32>> {
    if s.len() != 6 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&s[0..2], 16).ok()?;
    let g = u8::from_str_radix(&s[2..4], 16).ok()?;
    let b = u8::from_str_radix(&s[4..6], 16).ok()?;

    Some(Point3::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use approx::assert_relative_eq;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    use super::*;

    const TWO_BODIES: &str = r#"(
        simulation: (time_step: 0.5, path_segments: 20),
        bodies: [
            (
                name: "Moon",
                color: "ff8000",
                elements: (
                    semimajor_axis: 5.0,
                    eccentricity: 0.6,
                    inclination: 30.0,
                    long_asc_node: 60.0,
                    arg_periapsis: 45.0,
                    period: 1000.0,
                ),
            ),
            (
                name: "Planet",
                radius: 1.2,
                time_scale: 0.5,
                elements: (
                    semimajor_axis: 14.111156,
                    eccentricity: 0.016708,
                    inclination: 7.155,
                    long_asc_node: 23.439281,
                    arg_periapsis: -11.26064,
                    period: 1000.0,
                ),
            ),
        ],
    )"#;

    fn with_moon_eccentricity(ecc: &str) -> String {
        TWO_BODIES.replace("eccentricity: 0.6", &format!("eccentricity: {}", ecc))
    }

    #[test]
    fn test_parse_with_defaults() {
        let catalog = Catalog::from_ron_str(TWO_BODIES).unwrap();
        assert_eq!(catalog.simulation.time_step, 0.5);
        assert_eq!(catalog.simulation.path_segments, 20);
        assert_eq!(catalog.simulation.solver, AnomalySolver::FixedPoint);
        assert_eq!(catalog.simulation.log_level, "info");

        assert_eq!(catalog.bodies.len(), 2);
        assert_eq!(catalog.bodies[0].radius, 0.5);
        assert_eq!(catalog.bodies[0].time_scale, 1.0);
        assert_eq!(catalog.bodies[1].color, "ffffff");
        assert_eq!(catalog.bodies[1].time_scale, 0.5);
    }

    #[test]
    fn test_missing_simulation_section() {
        let catalog = Catalog::from_ron_str("(bodies: [])").unwrap();
        assert_eq!(catalog.simulation, SimulationConfig::default());
        assert!(catalog.build_orrery().unwrap().is_empty());
    }

    #[test]
    fn test_newton_solver_setting() {
        let text = TWO_BODIES.replace(
            "path_segments: 20",
            "path_segments: 20, solver: Newton(tolerance: 1e-8, max_iterations: 30)",
        );
        let catalog = Catalog::from_ron_str(&text).unwrap();
        assert_eq!(
            catalog.simulation.solver,
            AnomalySolver::Newton {
                tolerance: 1e-8,
                max_iterations: 30
            }
        );
        let orrery = catalog.build_orrery().unwrap();
        assert_eq!(orrery.propagator().solver(), &catalog.simulation.solver);
    }

    #[test]
    fn test_build_orrery() {
        let orrery = Catalog::from_ron_str(TWO_BODIES)
            .unwrap()
            .build_orrery()
            .unwrap();
        assert_eq!(orrery.len(), 2);
        assert_eq!(orrery.path_segments(), 20);

        let moon = orrery.find_body("moon").unwrap();
        assert_relative_eq!(moon.info.color.x, 1.0);
        assert_relative_eq!(moon.info.color.y, 128.0 / 255.0);
        assert_relative_eq!(moon.info.color.z, 0.0);
        assert_relative_eq!(moon.elements.inclination(), 30.0_f64.to_radians());
        assert_eq!(moon.path().len(), 21);

        let planet = orrery.find_body("planet").unwrap();
        assert_eq!(planet.info.time_scale, 0.5);
        assert_eq!(
            orrery.position_of(planet.id, 300.0),
            Some(orrery.propagator().position_at_time(&planet.elements, 150.0))
        );
    }

    #[test]
    fn test_invalid_time_scale() {
        for bad in ["0.0", "-0.5", "inf"] {
            let text = TWO_BODIES.replace("time_scale: 0.5", &format!("time_scale: {}", bad));
            let catalog = Catalog::from_ron_str(&text).unwrap();
            assert!(matches!(
                catalog.build_orrery(),
                Err(CatalogError::InvalidTimeScale { name, .. }) if name == "Planet"
            ));
        }
    }

    #[test]
    fn test_invalid_eccentricity() {
        let catalog = Catalog::from_ron_str(&with_moon_eccentricity("1.2")).unwrap();
        match catalog.build_orrery() {
            Err(CatalogError::InvalidElements { name, source }) => {
                assert_eq!(name, "Moon");
                assert_eq!(source, ElementsError::InvalidEccentricity(1.2));
            }
            other => panic!("Expected invalid elements, got {:?}", other.map(|o| o.len())),
        }
    }

    #[test]
    fn test_invalid_color() {
        let catalog = Catalog::from_ron_str(&TWO_BODIES.replace("ff8000", "orange")).unwrap();
        assert!(matches!(
            catalog.build_orrery(),
            Err(CatalogError::InvalidColor { .. })
        ));
    }

    #[test]
    fn test_duplicate_names() {
        let catalog = Catalog::from_ron_str(&TWO_BODIES.replace("\"Planet\"", "\"moon\"")).unwrap();
        assert!(matches!(
            catalog.build_orrery(),
            Err(CatalogError::DuplicateBody(name)) if name == "moon"
        ));
    }

    #[test]
    fn test_invalid_simulation() {
        let catalog =
            Catalog::from_ron_str(&TWO_BODIES.replace("path_segments: 20", "path_segments: 0"))
                .unwrap();
        assert!(matches!(
            catalog.build_orrery(),
            Err(CatalogError::InvalidSimulation(_))
        ));

        let catalog =
            Catalog::from_ron_str(&TWO_BODIES.replace("time_step: 0.5", "time_step: -1.0"))
                .unwrap();
        assert!(matches!(
            catalog.build_orrery(),
            Err(CatalogError::InvalidSimulation(_))
        ));

        // Newton settings that could never converge
        for solver in [
            "Newton(tolerance: 1e-6, max_iterations: 0)",
            "Newton(tolerance: -1.0, max_iterations: 50)",
            "Newton(tolerance: NaN, max_iterations: 50)",
            "Newton(tolerance: -1.0, max_iterations: 0)",
        ] {
            let text = TWO_BODIES.replace(
                "path_segments: 20",
                &format!("path_segments: 20, solver: {}", solver),
            );
            let catalog = Catalog::from_ron_str(&text).unwrap();
            assert!(
                matches!(catalog.build_orrery(), Err(CatalogError::InvalidSimulation(_))),
                "Accepted solver {}",
                solver
            );
        }

        // Zero tolerance is allowed, it means "iterate until the bracket collapses"
        let text = TWO_BODIES.replace(
            "path_segments: 20",
            "path_segments: 20, solver: Newton(tolerance: 0.0, max_iterations: 100)",
        );
        assert!(Catalog::from_ron_str(&text).unwrap().build_orrery().is_ok());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Catalog::from_ron_str("{{not valid}}"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bodies.ron");
        std::fs::write(&path, TWO_BODIES).unwrap();

        let catalog = read_catalog(&path).unwrap();
        assert_eq!(catalog.bodies.len(), 2);

        let missing = read_catalog(dir.path().join("nope.ron"));
        assert!(matches!(missing, Err(CatalogError::Read { .. })));
    }

    #[derive(Clone, Default)]
    struct EventCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCounter {
        fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_events_only_after_reading() {
        // Binaries read the catalog before logging is set up, so reading and
        // parsing must stay silent and the report comes from build_orrery.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bodies.ron");
        std::fs::write(&path, TWO_BODIES).unwrap();

        let counter = EventCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        tracing::subscriber::with_default(subscriber, || {
            let catalog = read_catalog(&path).unwrap();
            assert_eq!(counter.0.load(Ordering::SeqCst), 0);

            catalog.build_orrery().unwrap();
            assert!(counter.0.load(Ordering::SeqCst) > 0);
        });
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("000000"), Some(Point3::new(0.0, 0.0, 0.0)));
        assert_eq!(parse_color("ffffff"), Some(Point3::new(1.0, 1.0, 1.0)));
        assert_eq!(parse_color("fffff"), None);
        assert_eq!(parse_color("gg0000"), None);
        assert_eq!(parse_color("ééé"), None);
        assert_eq!(parse_color("+f+f+f"), None);
        assert_eq!(parse_color("-1-1-1"), None);
    }
}
