/// Simulated time that advances by a fixed logical step each frame, no
/// matter how long the frame actually took.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    time: f64,
    step: f64,
}

impl SimulationClock {
    pub fn new(step: f64) -> Self {
        Self { time: 0.0, step }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn set_step(&mut self, step: f64) {
        self.step = step;
    }

    /// Advances by one step and returns the new time.
    pub fn tick(&mut self) -> f64 {
        self.time += self.step;
        self.time
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_steps() {
        let mut clock = SimulationClock::new(0.5);
        assert_eq!(clock.time(), 0.0);
        assert_eq!(clock.tick(), 0.5);
        assert_eq!(clock.tick(), 1.0);

        clock.set_step(2.0);
        assert_eq!(clock.tick(), 3.0);
        assert_eq!(clock.step(), 2.0);

        clock.reset();
        assert_eq!(clock.time(), 0.0);
    }

    #[test]
    fn test_reversed() {
        let mut clock = SimulationClock::new(1.0);
        clock.tick();
        clock.set_step(-clock.step());
        assert_eq!(clock.tick(), 0.0);
        assert_eq!(clock.tick(), -1.0);
    }
}
