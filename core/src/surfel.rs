//! The shading-record collaborator (spec §3/§6). `Surfel` is the capability
//! table the engine calls through at a hit point; it never inspects what
//! concrete material produced it, matching the teacher's `BxDF`/`Light`
//! trait-object seams rather than a deep material class hierarchy (spec §9,
//! "dynamic dispatch -> capability abstraction").

use std::f32::consts::FRAC_1_PI;

use crate::geometry::{Normal3, Point3, Vector3};
use crate::rng::Rng;
use crate::sampling::cosine_sample_hemisphere;
use crate::spectrum::Spectrum;

/// Mirrors the original source's `PathDirection` — only `EyeToSource`
/// is ever passed by this wavefront tracer (it never traces from a light),
/// but the enum is kept two-valued so a `Surfel` implementation could honor
/// the other direction if reused bidirectionally.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PathDirection {
    EyeToSource,
    SourceToEye,
}

pub trait Surfel: Send + Sync {
    fn p(&self) -> Point3;
    fn n_g(&self) -> Normal3;
    fn n_s(&self) -> Normal3;

    fn emitted_radiance(&self, w_o: Vector3) -> Spectrum;

    fn finite_scattering_density(&self, w_i: Vector3, w_o: Vector3) -> Spectrum;

    /// Returns `(w_i, weight)` with `weight = f(w_i,w_o)*|n_s.w_i| / pdf(w_i)`,
    /// per spec §3. `w_i` is the propagation direction of the new outgoing
    /// ray (spec §4.7's sign convention), not the direction back toward the
    /// eye.
    fn scatter(&self, direction_from_eye: PathDirection, w_o: Vector3, rng: &mut Rng) -> (Vector3, Spectrum);

    fn reflectivity(&self, rng: &mut Rng) -> Spectrum;
}

/// A Lambertian surface with an optional constant emission, the minimal
/// concrete surfel this crate ships to make §8's scenarios runnable: it
/// alone covers S1 (pure emitter), S2/S3 (pure diffuse reflector).
#[derive(Debug, Clone)]
pub struct LambertianSurfel {
    p: Point3,
    n_g: Normal3,
    n_s: Normal3,
    reflectivity: Spectrum,
    emission: Spectrum,
}

impl LambertianSurfel {
    pub fn new(p: Point3, n_g: Normal3, reflectivity: Spectrum, emission: Spectrum) -> LambertianSurfel {
        LambertianSurfel {
            p,
            n_g,
            n_s: n_g,
            reflectivity,
            emission,
        }
    }

    pub fn emitter(p: Point3, n_g: Normal3, emission: Spectrum) -> LambertianSurfel {
        LambertianSurfel::new(p, n_g, Spectrum::black(), emission)
    }

    pub fn diffuse(p: Point3, n_g: Normal3, reflectivity: Spectrum) -> LambertianSurfel {
        LambertianSurfel::new(p, n_g, reflectivity, Spectrum::black())
    }
}

impl Surfel for LambertianSurfel {
    fn p(&self) -> Point3 {
        self.p
    }

    fn n_g(&self) -> Normal3 {
        self.n_g
    }

    fn n_s(&self) -> Normal3 {
        self.n_s
    }

    fn emitted_radiance(&self, _w_o: Vector3) -> Spectrum {
        self.emission
    }

    fn finite_scattering_density(&self, w_i: Vector3, w_o: Vector3) -> Spectrum {
        if self.n_s.dot_vector(&w_i) * self.n_s.dot_vector(&w_o) > 0.0 {
            self.reflectivity * FRAC_1_PI
        } else {
            Spectrum::black()
        }
    }

    fn scatter(&self, _direction_from_eye: PathDirection, w_o: Vector3, rng: &mut Rng) -> (Vector3, Spectrum) {
        // Cosine-weighted hemisphere sample aligned to the shading normal.
        // Reflects back into the same hemisphere `w_o` arrived from, a
        // two-sided convention that keeps the demo surfel usable on both
        // faces of a single-sided emissive quad.
        let hemisphere_sign = if self.n_s.dot_vector(&w_o) >= 0.0 {
            1.0
        } else {
            -1.0
        };
        let n = self.n_s.as_vector() * hemisphere_sign;
        let (tangent, bitangent) = n.coordinate_system();
        let (u, v) = rng.uniform_point2();
        let local = cosine_sample_hemisphere(crate::geometry::Point2::new(u, v));
        let w_i = (tangent * local.x + bitangent * local.y + n * local.z).normalize();
        // f*|cos| / pdf collapses to reflectivity for a cosine-weighted
        // Lambertian sample; see sampling::cosine_sample_hemisphere's doc.
        (w_i, self.reflectivity)
    }

    fn reflectivity(&self, _rng: &mut Rng) -> Spectrum {
        self.reflectivity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Rng;

    #[test]
    fn emitter_has_zero_scattering_density() {
        let s = LambertianSurfel::emitter(
            Point3::new(0.0, 0.0, 0.0),
            Normal3::new(0.0, 1.0, 0.0),
            Spectrum::white(),
        );
        let d = s.finite_scattering_density(Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
        assert!(d.is_black());
        assert_eq!(s.emitted_radiance(Vector3::new(0.0, 1.0, 0.0)), Spectrum::white());
    }

    #[test]
    fn scatter_direction_stays_on_the_same_side_as_wo() {
        let s = LambertianSurfel::diffuse(
            Point3::new(0.0, 0.0, 0.0),
            Normal3::new(0.0, 1.0, 0.0),
            Spectrum::white(),
        );
        let mut rng = Rng::new();
        let w_o = Vector3::new(0.0, 1.0, 0.0);
        for _ in 0..64 {
            let (w_i, weight) = s.scatter(PathDirection::EyeToSource, w_o, &mut rng);
            assert!((w_i.length() - 1.0).abs() < 1e-5);
            assert!(s.n_s().dot_vector(&w_i) >= -1e-6);
            assert_eq!(weight, Spectrum::white());
        }
    }
}
