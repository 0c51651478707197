//! The wavefront buffers (spec §3): contiguous per-pixel state the engine
//! owns for the duration of one `render` call and the stages borrow from,
//! one stage at a time, per the barrier discipline in §4.1/§5.

use crate::geometry::Vector3;
use crate::ray::Ray;
use crate::spectrum::Spectrum;
use crate::surfel::Surfel;

/// A placeholder ray for buffer slots that haven't been written by a stage
/// yet this sample — `generate_primary_rays` overwrites every slot before
/// anything reads it, so the direction here is never traced against.
fn dummy_ray() -> Ray {
    Ray::new(crate::geometry::Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0))
}

pub struct WavefrontBuffers {
    pub ray: Vec<Ray>,
    pub surfel: Vec<Option<Box<dyn Surfel>>>,
    pub biradiance: Vec<Spectrum>,
    pub shadow_ray: Vec<Ray>,
    pub light_shadowed: Vec<bool>,
    pub modulation: Vec<Spectrum>,
    /// Whether the light chosen for pixel `i` this bounce reports
    /// `casts_shadows() == true`. Populated by the light-selection stage
    /// alongside `biradiance`/`shadow_ray`, consumed by the visibility stage
    /// to honor spec §9's `casts_shadows()` open question without
    /// re-deriving the selection.
    pub light_casts_shadows: Vec<bool>,
}

impl WavefrontBuffers {
    pub fn new(n: usize) -> WavefrontBuffers {
        WavefrontBuffers {
            ray: (0..n).map(|_| dummy_ray()).collect(),
            surfel: (0..n).map(|_| None).collect(),
            biradiance: vec![Spectrum::black(); n],
            shadow_ray: (0..n).map(|_| dummy_ray()).collect(),
            light_shadowed: vec![false; n],
            modulation: vec![Spectrum::black(); n],
            light_casts_shadows: vec![true; n],
        }
    }

    pub fn len(&self) -> usize {
        self.ray.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ray.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_every_buffer_at_requested_length() {
        let b = WavefrontBuffers::new(16);
        assert_eq!(b.len(), 16);
        assert_eq!(b.surfel.len(), 16);
        assert_eq!(b.biradiance.len(), 16);
        assert_eq!(b.shadow_ray.len(), 16);
        assert_eq!(b.light_shadowed.len(), 16);
        assert_eq!(b.modulation.len(), 16);
        assert_eq!(b.light_casts_shadows.len(), 16);
    }
}
