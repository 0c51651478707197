//! §4.2 — primary ray generation.

use crate::camera::{Camera, Viewport};
use crate::ray::Ray;

pub fn generate_primary_rays(ray: &mut [Ray], camera: &dyn Camera, viewport: Viewport, parallel: bool) {
    let width = viewport.width;
    let body = |i: usize, slot: &mut Ray| {
        let x = (i as u32) % width;
        let y = (i as u32) / width;
        *slot = camera.world_ray(x, y, viewport);
    };

    if parallel {
        use rayon::prelude::*;
        ray.par_iter_mut().enumerate().for_each(|(i, slot)| body(i, slot));
    } else {
        ray.iter_mut().enumerate().for_each(|(i, slot)| body(i, slot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PinholeCamera;
    use crate::geometry::{Point3, Vector3};

    #[test]
    fn fills_every_pixel_with_a_unit_ray() {
        let cam = PinholeCamera::look_at(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 1.0, 0.0),
            60.0,
        );
        let vp = Viewport::new(4, 4);
        let mut rays = vec![Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0)); 16];
        generate_primary_rays(&mut rays, &cam, vp, false);
        for r in &rays {
            assert!((r.direction.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn serial_and_parallel_paths_agree() {
        let cam = PinholeCamera::look_at(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 1.0, 0.0),
            60.0,
        );
        let vp = Viewport::new(4, 4);
        let mut serial = vec![Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0)); 16];
        let mut par = serial.clone();
        generate_primary_rays(&mut serial, &cam, vp, false);
        generate_primary_rays(&mut par, &cam, vp, true);
        for (a, b) in serial.iter().zip(par.iter()) {
            assert_eq!(a.direction, b.direction);
        }
    }
}
