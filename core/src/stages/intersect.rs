//! §4.3 — closest-hit intersection. Submits the whole `ray` buffer to the
//! triangle tree in one batched call; the tree (not this stage) decides how
//! to exploit ray coherence.

use crate::bvh::{IntersectOptions, TriangleTree};
use crate::ray::Ray;
use crate::stats::Counters;
use crate::surfel::Surfel;

pub fn trace_closest(
    tree: &dyn TriangleTree,
    ray: &[Ray],
    surfel: &mut [Option<Box<dyn Surfel>>],
    counters: &Counters,
    parallel: bool,
) {
    // Closest-hit must be two-sided: a `LambertianSurfel` scatters off either
    // face (surfel.rs's two-sided `scatter()`), and nothing here culls rays
    // reaching a surface from behind its geometric normal.
    let mut options = IntersectOptions::DO_NOT_CULL_BACKFACES;
    if parallel {
        options |= IntersectOptions::COHERENT_RAY_HINT;
    }
    tree.intersect_closest(ray, surfel, options);
    for _ in ray {
        counters.record_primary_ray();
    }
}
