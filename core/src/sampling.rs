//! Monte Carlo sampling helpers. Trimmed from the teacher's
//! `sampling/mod.rs` (which also carries 1-D/2-D piecewise-constant
//! distributions for importance-sampled infinite lights and textures, not
//! needed here) down to the two routines the demo Lambertian surfel's
//! `scatter()` uses.

use std::f32::consts;

use crate::geometry::{Point2, Vector3};

const FRAC_PI_4: f32 = consts::FRAC_PI_2 / 2.0;

/// Maps a uniform `(u, v) \in [0,1)^2` sample to a unit disk with uniform
/// area density, Shirley & Chiu's concentric mapping.
pub fn concentric_sample_disk(u: Point2) -> Point2 {
    let ox = 2.0 * u.x - 1.0;
    let oy = 2.0 * u.y - 1.0;

    if ox == 0.0 && oy == 0.0 {
        return Point2::new(0.0, 0.0);
    }

    let (r, theta) = if ox.abs() > oy.abs() {
        (ox, FRAC_PI_4 * (oy / ox))
    } else {
        (oy, consts::FRAC_PI_2 - FRAC_PI_4 * (ox / oy))
    };
    Point2::new(r * theta.cos(), r * theta.sin())
}

/// Samples a direction over the hemisphere above `z = 0` with density
/// proportional to `cos(theta)` — the importance-sampling distribution a
/// Lambertian BSDF wants, so its `scatter()` weight collapses to the
/// surface's reflectivity alone (see `surfel::LambertianSurfel::scatter`).
pub fn cosine_sample_hemisphere(u: Point2) -> Vector3 {
    let d = concentric_sample_disk(u);
    let z = (1.0 - d.x * d.x - d.y * d.y).max(0.0).sqrt();
    Vector3::new(d.x, d.y, z)
}
