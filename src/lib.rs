pub mod astro;
pub mod catalog;
pub mod logging;
pub mod math;
pub mod orrery;
