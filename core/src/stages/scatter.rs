//! §4.7 — recursive ray generation.

use crate::ray::Ray;
use crate::rng::{stage_seed, Stage};
use crate::spectrum::Spectrum;
use crate::surfel::{PathDirection, Surfel};

fn sign(v: f32) -> f32 {
    if v >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// For every pixel with a surfel present: samples the surfel's scatter
/// distribution, bumps the new ray's origin off the surface along the
/// shading normal (§4.7 step 2's sign convention), and folds the sampled
/// weight into `modulation`. Pixels with no surfel are left untouched, so
/// the next sample's stages see the same absence again and accumulate
/// nothing further for that path.
#[allow(clippy::too_many_arguments)]
pub fn generate_scatter_rays(
    ray: &mut [Ray],
    modulation: &mut [Spectrum],
    surfel: &[Option<Box<dyn Surfel>>],
    engine_seed: u64,
    sample_index: u64,
    bounce: u64,
    parallel: bool,
) {
    let body = |i: usize, ray_slot: &mut Ray, mod_slot: &mut Spectrum| {
        let Some(s) = &surfel[i] else {
            return;
        };
        let w_o = -ray_slot.direction;
        let mut rng = stage_seed(engine_seed, i as u64, sample_index, bounce, Stage::Scatter);
        let (w_i_new, weight) = s.scatter(PathDirection::EyeToSource, w_o, &mut rng);

        let hemisphere_sign = -sign(s.n_g().dot_vector(&(-w_i_new)));
        let bump = s.p() + s.n_s().as_vector() * (crate::EPSILON * hemisphere_sign);

        *ray_slot = Ray::new(bump, w_i_new);
        *mod_slot = *mod_slot * weight;
    };

    if parallel {
        use rayon::prelude::*;
        ray.par_iter_mut()
            .zip(modulation.par_iter_mut())
            .enumerate()
            .for_each(|(i, (r, m))| body(i, r, m));
    } else {
        ray.iter_mut()
            .zip(modulation.iter_mut())
            .enumerate()
            .for_each(|(i, (r, m))| body(i, r, m));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Normal3, Point3, Vector3};
    use crate::surfel::LambertianSurfel;

    #[test]
    fn absent_surfel_leaves_ray_and_modulation_unchanged() {
        let original = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
        let mut ray = vec![original];
        let mut modulation = vec![Spectrum::grey(0.25)];
        let surfel: Vec<Option<Box<dyn Surfel>>> = vec![None];

        generate_scatter_rays(&mut ray, &mut modulation, &surfel, 1, 0, 0, false);
        assert_eq!(ray[0].direction, original.direction);
        assert_eq!(modulation[0], Spectrum::grey(0.25));
    }

    #[test]
    fn scattered_ray_stays_unit_and_modulation_updates() {
        let mut ray = vec![Ray::new(Point3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, -1.0))];
        let mut modulation = vec![Spectrum::grey(1.0)];
        let surfel: Vec<Option<Box<dyn Surfel>>> = vec![Some(Box::new(LambertianSurfel::diffuse(
            Point3::new(0.0, 0.0, 0.0),
            Normal3::new(0.0, 0.0, 1.0),
            Spectrum::grey(0.8),
        )))];

        generate_scatter_rays(&mut ray, &mut modulation, &surfel, 1, 0, 0, false);
        assert!((ray[0].direction.length() - 1.0).abs() < 1e-5);
        assert_eq!(modulation[0], Spectrum::grey(0.8));
    }
}
