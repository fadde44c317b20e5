//! A module for computing simple Keplerian orbits.
//!
//! The two important items in this module are:
//! - [OrbitalElements], a validated set of the six classical elements of an
//!   elliptic orbit, with the period standing in for the gravitational
//!   parameter.
//! - [Propagator], which turns elements and a time into a position, and
//!   samples whole orbits into closed polylines for drawing. It is generic
//!   over the [KeplerSolver](crate::math::anomaly::KeplerSolver) used for the
//!   mean-to-eccentric anomaly step.

mod elements;
mod propagator;

pub use elements::{ElementsError, OrbitalElements};
pub use propagator::{build_path, position_at_time, OrbitState, Propagator};
