//! The light collaborator (spec §3/§6). Grounded in the teacher's
//! `light/mod.rs` trait seam and its `PointLight` concrete implementation,
//! simplified from a full `sample_li`/`pdf_li`/`VisibilityTester` importance
//! sampler (needed for PBRT's MIS-driven direct lighting) down to the three
//! operations the wavefront light-selection stage (§4.4) actually calls.

use std::fmt::Debug;

use crate::geometry::Point3;
use crate::spectrum::Spectrum;

pub trait Light: Debug + Send + Sync {
    fn position(&self) -> Point3;

    /// Radiance-equivalent irradiance arriving at `p` from this light,
    /// ignoring occlusion — the shadow-ray visibility test (§4.5) accounts
    /// for blockers separately.
    fn biradiance(&self, p: Point3) -> Spectrum;

    fn casts_shadows(&self) -> bool;
}

/// An isotropic point emitter with inverse-square falloff — the
/// `PointLight` the §8 scenarios need.
#[derive(Debug, Copy, Clone)]
pub struct PointLight {
    position: Point3,
    /// Power such that `biradiance(p) = power / distance_squared(p)`.
    power: Spectrum,
    casts_shadows: bool,
}

impl PointLight {
    pub fn new(position: Point3, power: Spectrum) -> PointLight {
        PointLight {
            position,
            power,
            casts_shadows: true,
        }
    }

    pub fn without_shadows(position: Point3, power: Spectrum) -> PointLight {
        PointLight {
            position,
            power,
            casts_shadows: false,
        }
    }
}

impl Light for PointLight {
    fn position(&self) -> Point3 {
        self.position
    }

    fn biradiance(&self, p: Point3) -> Spectrum {
        let d2 = self.position.distance_squared(&p);
        if d2 <= 0.0 {
            Spectrum::black()
        } else {
            self.power / d2
        }
    }

    fn casts_shadows(&self) -> bool {
        self.casts_shadows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn biradiance_falls_off_with_distance_squared() {
        let l = PointLight::new(Point3::new(0.0, 1.0, 0.0), Spectrum::grey(4.0));
        let near = l.biradiance(Point3::new(0.0, 0.0, 0.0));
        let far = l.biradiance(Point3::new(0.0, -1.0, 0.0));
        assert!((near.r - 4.0).abs() < 1e-6);
        assert!((far.r - 1.0).abs() < 1e-6);
    }
}
