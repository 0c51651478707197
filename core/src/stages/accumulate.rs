//! §4.6 — radiance accumulation.

use crate::image::Image;
use crate::ray::Ray;
use crate::spectrum::Spectrum;
use crate::stats::Counters;
use crate::surfel::Surfel;

/// Adds the emissive and (if unshadowed) direct-lighting contribution of
/// bounce `k` into `image`, for every pixel with a surfel present. Non-finite
/// contributions are discarded rather than written, per spec §4.6/§7.
#[allow(clippy::too_many_arguments)]
pub fn accumulate(
    image: &Image,
    ray: &[Ray],
    surfel: &[Option<Box<dyn Surfel>>],
    biradiance: &[Spectrum],
    shadow_ray: &[Ray],
    light_shadowed: &[bool],
    modulation: &[Spectrum],
    width: u32,
    counters: &Counters,
    parallel: bool,
) {
    let body = |i: usize| {
        let Some(s) = &surfel[i] else {
            return;
        };
        let w_o = -ray[i].direction;
        let m = modulation[i];

        let l_e = s.emitted_radiance(w_o) * m;

        let l_d = if light_shadowed[i] {
            Spectrum::black()
        } else {
            let w_i = -shadow_ray[i].direction;
            let f = s.finite_scattering_density(w_i, w_o);
            biradiance[i] * m * f * s.n_g().dot_vector(&w_i).abs()
        };

        let contribution = l_e + l_d;
        if !contribution.is_finite() {
            counters.record_numeric_hazard();
            return;
        }
        if contribution.is_black() {
            counters.record_zero_radiance_path();
        }

        let px = ((i as u32) % width, (i as u32) / width);
        image.increment(px, contribution);
    };

    if parallel {
        use rayon::prelude::*;
        (0..surfel.len()).into_par_iter().for_each(body);
    } else {
        (0..surfel.len()).for_each(body);
    }
}
