//! Wall-clock timer bracketing the render loop only.
//!
//! Mirrors the original source's placement of `stopWatch.tick()` right
//! before the sample loop starts, explicitly after any acceleration
//! structure has already been built — so `elapsed()` never includes
//! `TriangleTree` construction time, only the cost of the wavefront stages
//! themselves.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Stopwatch {
    start: Option<Instant>,
    elapsed: Duration,
}

impl Stopwatch {
    pub fn new() -> Stopwatch {
        Stopwatch {
            start: None,
            elapsed: Duration::ZERO,
        }
    }

    pub fn tick(&mut self) {
        self.start = Some(Instant::now());
    }

    pub fn tock(&mut self) {
        if let Some(start) = self.start.take() {
            self.elapsed += start.elapsed();
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

impl Default for Stopwatch {
    fn default() -> Stopwatch {
        Stopwatch::new()
    }
}
