//! A ray in world space. Deliberately without the teacher's
//! `RayDifferential`/`transform()` machinery — this crate has no camera
//! transform stack or texture filtering that would consume ray
//! differentials, only the wavefront stages' plain intersect/occlusion
//! queries.

use std::fmt;

use crate::geometry::{Point3, Vector3};

#[derive(Debug, Copy, Clone)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vector3,
    pub t_min: f32,
    pub t_max: f32,
}

impl Ray {
    /// `direction` must already be unit length (spec §3's ray invariant);
    /// callers that compute a fresh direction should normalize before
    /// calling this.
    pub fn new(origin: Point3, direction: Vector3) -> Ray {
        debug_assert!(!origin.x.is_nan() && !origin.y.is_nan() && !origin.z.is_nan());
        debug_assert!(!direction.x.is_nan() && !direction.y.is_nan() && !direction.z.is_nan());
        debug_assert_ne!(direction.length_squared(), 0.0);
        Ray {
            origin,
            direction,
            t_min: 0.0,
            t_max: f32::INFINITY,
        }
    }

    pub fn segment(origin: Point3, direction: Vector3, t_min: f32, t_max: f32) -> Ray {
        let mut r = Ray::new(origin, direction);
        r.t_min = t_min;
        r.t_max = t_max;
        r
    }

    pub fn at(&self, t: f32) -> Point3 {
        self.origin + self.direction * t
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[o={:?}, d={:?}, t_min={}, t_max={}]",
            self.origin, self.direction, self.t_min, self.t_max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_follows_parametric_line() {
        let r = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(r.at(3.0), Point3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn segment_sets_bounds() {
        let r = Ray::segment(
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            0.01,
            5.0,
        );
        assert_eq!(r.t_min, 0.01);
        assert_eq!(r.t_max, 5.0);
    }
}
