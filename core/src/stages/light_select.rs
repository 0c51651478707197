//! §4.4 — light selection & shadow-ray formation.

use std::sync::Arc;

use crate::light::Light;
use crate::ray::Ray;
use crate::rng::{stage_seed, Stage};
use crate::spectrum::Spectrum;
use crate::surfel::Surfel;

#[allow(clippy::too_many_arguments)]
pub fn choose_lights(
    surfel: &[Option<Box<dyn Surfel>>],
    lights: &[Arc<dyn Light>],
    biradiance: &mut [Spectrum],
    shadow_ray: &mut [Ray],
    light_casts_shadows: &mut [bool],
    engine_seed: u64,
    sample_index: u64,
    bounce: u64,
    parallel: bool,
) {
    let body = |i: usize, b_slot: &mut Spectrum, s_slot: &mut Ray, shadow_flag: &mut bool| {
        let Some(s) = &surfel[i] else {
            return;
        };
        let p = s.p();

        let weights: Vec<f32> = lights.iter().map(|l| l.biradiance(p).sum()).collect();
        let total: f32 = weights.iter().sum();

        if total <= 0.0 {
            *b_slot = Spectrum::black();
            return;
        }

        let mut rng = stage_seed(engine_seed, i as u64, sample_index, bounce, Stage::LightSelect);
        let u = rng.uniform_f32() * total;

        let mut running = 0.0;
        let mut chosen = weights.len() - 1;
        for (j, w) in weights.iter().enumerate() {
            running += w;
            if running > u {
                chosen = j;
                break;
            }
        }

        let light = &lights[chosen];
        let b = light.biradiance(p);
        let mean = b.mean();
        *b_slot = if mean > 0.0 { b * (total / mean) } else { Spectrum::black() };
        *shadow_flag = light.casts_shadows();

        let light_pos = light.position();
        let to_surfel = p - light_pos;
        let distance = to_surfel.length();
        let direction = if distance > 0.0 {
            to_surfel / distance
        } else {
            to_surfel
        };
        *s_slot = Ray::segment(light_pos, direction, crate::EPSILON, (distance - crate::EPSILON).max(0.0));
    };

    if parallel {
        use rayon::prelude::*;
        biradiance
            .par_iter_mut()
            .zip(shadow_ray.par_iter_mut())
            .zip(light_casts_shadows.par_iter_mut())
            .enumerate()
            .for_each(|(i, ((b, s), f))| body(i, b, s, f));
    } else {
        biradiance
            .iter_mut()
            .zip(shadow_ray.iter_mut())
            .zip(light_casts_shadows.iter_mut())
            .enumerate()
            .for_each(|(i, ((b, s), f))| body(i, b, s, f));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Normal3, Point3};
    use crate::light::PointLight;
    use crate::surfel::LambertianSurfel;

    fn one_surfel_buffer(p: Point3) -> Vec<Option<Box<dyn Surfel>>> {
        vec![Some(Box::new(LambertianSurfel::diffuse(p, Normal3::new(0.0, 1.0, 0.0), Spectrum::white())))]
    }

    #[test]
    fn no_lights_means_zero_biradiance_and_no_panic() {
        let surfel = one_surfel_buffer(Point3::new(0.0, 0.0, 0.0));
        let lights: Vec<Arc<dyn Light>> = vec![];
        let mut biradiance = vec![Spectrum::white()];
        let mut shadow_ray = vec![Ray::new(Point3::new(0.0, 0.0, 0.0), crate::geometry::Vector3::new(0.0, 1.0, 0.0))];
        let mut flags = vec![true];
        choose_lights(&surfel, &lights, &mut biradiance, &mut shadow_ray, &mut flags, 1, 0, 0, false);
        assert!(biradiance[0].is_black());
    }

    #[test]
    fn single_light_is_always_chosen_and_flagged() {
        let surfel = one_surfel_buffer(Point3::new(0.0, 0.0, 0.0));
        let lights: Vec<Arc<dyn Light>> = vec![Arc::new(PointLight::without_shadows(
            Point3::new(0.0, 2.0, 0.0),
            Spectrum::grey(4.0),
        ))];
        let mut biradiance = vec![Spectrum::black()];
        let mut shadow_ray = vec![Ray::new(Point3::new(0.0, 0.0, 0.0), crate::geometry::Vector3::new(0.0, 1.0, 0.0))];
        let mut flags = vec![true];
        choose_lights(&surfel, &lights, &mut biradiance, &mut shadow_ray, &mut flags, 1, 0, 0, false);
        assert!(!biradiance[0].is_black());
        assert!(!flags[0]);
        assert_eq!(shadow_ray[0].origin, Point3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn shadow_ray_t_max_excludes_epsilon_margin_from_light_to_surfel_distance() {
        let surfel = one_surfel_buffer(Point3::new(0.0, 0.0, 0.0));
        let lights: Vec<Arc<dyn Light>> = vec![Arc::new(PointLight::new(Point3::new(0.0, 3.0, 0.0), Spectrum::white()))];
        let mut biradiance = vec![Spectrum::black()];
        let mut shadow_ray = vec![Ray::new(Point3::new(0.0, 0.0, 0.0), crate::geometry::Vector3::new(0.0, 1.0, 0.0))];
        let mut flags = vec![false];
        choose_lights(&surfel, &lights, &mut biradiance, &mut shadow_ray, &mut flags, 1, 0, 0, false);
        assert!((shadow_ray[0].t_max - (3.0 - crate::EPSILON)).abs() < 1e-6);
        assert_eq!(shadow_ray[0].t_min, crate::EPSILON);
    }
}
