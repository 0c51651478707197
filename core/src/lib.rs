//! `wavefront-core` — a data-parallel, buffer-oriented Monte Carlo path
//! tracer (see the top-level spec for the full design).
//!
//! The crate is organized leaves-first, mirroring the teacher's own module
//! layout: geometry/color primitives, RNG, the external-collaborator traits
//! (`Surfel`, `Light`, `Camera`, `TriangleTree`) plus thin concrete
//! implementations of each, the wavefront buffers, the six stages, and the
//! `PathTracer` engine that sequences them.

#![deny(unused_qualifications, unused_must_use)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![allow(clippy::too_many_arguments, clippy::excessive_precision)]

pub mod buffers;
pub mod bvh;
pub mod camera;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod image;
pub mod light;
pub mod ray;
pub mod rng;
pub mod sampling;
pub mod scene;
pub mod spectrum;
mod stages;
mod stats;
pub mod stopwatch;
pub mod surfel;
pub mod triangle;

pub use engine::PathTracer;
pub use error::RenderError;
pub use image::Image;
pub use scene::Scene;
pub use stats::RenderStats;
pub use stopwatch::Stopwatch;

/// A single tuning constant used uniformly for shadow-ray endpoint offsets,
/// squared-distance tolerance, and ray-parameter floors (spec §3).
pub const EPSILON: f32 = 1e-4;
