//! The six wavefront stages (spec §4.2-§4.7), each a `parallel_for` over the
//! pixel index range with an implicit join at the end (spec §5). The engine
//! (`crate::engine`) sequences them as strict barriers; no stage reaches
//! into another stage's buffer.

mod accumulate;
mod intersect;
mod light_select;
mod ray_gen;
mod scatter;
mod visibility;

pub use accumulate::accumulate;
pub use intersect::trace_closest;
pub use light_select::choose_lights;
pub use ray_gen::generate_primary_rays;
pub use scatter::generate_scatter_rays;
pub use visibility::test_visibility;
