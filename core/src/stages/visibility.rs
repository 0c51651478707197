//! §4.5 — visibility test.

use crate::bvh::{IntersectOptions, TriangleTree};
use crate::ray::Ray;
use crate::stats::Counters;

/// Submits the whole `shadow_ray` buffer to the triangle tree in
/// occlusion-only mode with backface culling disabled, then honors spec
/// §9's `casts_shadows()` open question: pixels whose chosen light reported
/// no shadowing are forced un-occluded regardless of what the tree found,
/// rather than special-cased before the batched query.
pub fn test_visibility(
    tree: &dyn TriangleTree,
    shadow_ray: &[Ray],
    light_casts_shadows: &[bool],
    light_shadowed: &mut [bool],
    counters: &Counters,
    parallel: bool,
) {
    let options = if parallel {
        IntersectOptions::DO_NOT_CULL_BACKFACES | IntersectOptions::COHERENT_RAY_HINT
    } else {
        IntersectOptions::DO_NOT_CULL_BACKFACES
    };
    tree.intersect_occlusion(shadow_ray, light_shadowed, options);
    for _ in shadow_ray {
        counters.record_shadow_ray();
    }

    let honor_flag = |i: usize, flag: &mut bool| {
        if !light_casts_shadows[i] {
            *flag = false;
        }
    };
    if parallel {
        use rayon::prelude::*;
        light_shadowed.par_iter_mut().enumerate().for_each(|(i, f)| honor_flag(i, f));
    } else {
        light_shadowed.iter_mut().enumerate().for_each(|(i, f)| honor_flag(i, f));
    }
}
