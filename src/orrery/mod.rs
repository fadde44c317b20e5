mod body;
mod clock;
mod orrery;

pub use body::{Body, BodyID, BodyInfo};
pub use clock::SimulationClock;
pub use orrery::Orrery;
