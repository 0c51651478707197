//! Flat-shaded triangles and the `Surface` records a `Scene` hands to the
//! triangle tree (spec §6, `TriangleTree::set_contents(&[Surface])`).
//!
//! No per-vertex normals, UVs or material graph — the spec treats
//! material/BSDF evaluation as an external collaborator, so each `Surface`
//! only carries the flat reflectivity/emission a `LambertianSurfel` needs
//! (§9's "no deep hierarchy worth preserving").

use crate::geometry::{Normal3, Point3, Vector3};
use crate::ray::Ray;
use crate::spectrum::Spectrum;

#[derive(Debug, Copy, Clone)]
pub struct Triangle {
    pub v0: Point3,
    pub v1: Point3,
    pub v2: Point3,
}

/// Result of a ray/triangle hit: parametric distance and barycentric
/// coordinates of vertices 1 and 2 (vertex 0's weight is `1 - u - v`).
#[derive(Debug, Copy, Clone)]
pub struct TriangleHit {
    pub t: f32,
    pub u: f32,
    pub v: f32,
}

impl Triangle {
    pub fn new(v0: Point3, v1: Point3, v2: Point3) -> Triangle {
        Triangle { v0, v1, v2 }
    }

    pub fn centroid(&self) -> Point3 {
        Point3::new(
            (self.v0.x + self.v1.x + self.v2.x) / 3.0,
            (self.v0.y + self.v1.y + self.v2.y) / 3.0,
            (self.v0.z + self.v1.z + self.v2.z) / 3.0,
        )
    }

    pub fn bounds(&self) -> crate::bvh::Bounds3 {
        crate::bvh::Bounds3::from_points(&[self.v0, self.v1, self.v2])
    }

    /// Unnormalized geometric normal, following the right-hand winding
    /// `v0 -> v1 -> v2`.
    pub fn normal(&self) -> Normal3 {
        Normal3::from_vector((self.v1 - self.v0).cross(&(self.v2 - self.v0)).normalize())
    }

    /// Moller-Trumbore ray/triangle intersection, single-sided or
    /// double-sided per `cull_backfaces`. Returns `None` when the ray
    /// misses or the hit falls outside `[ray.t_min, ray.t_max]`.
    pub fn intersect(&self, ray: &Ray, cull_backfaces: bool) -> Option<TriangleHit> {
        const EPS: f32 = 1e-8;
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        let pvec = ray.direction.cross(&e2);
        let det = e1.dot(&pvec);

        if cull_backfaces {
            if det < EPS {
                return None;
            }
        } else if det.abs() < EPS {
            return None;
        }

        let inv_det = 1.0 / det;
        let tvec = ray.origin - self.v0;
        let u = tvec.dot(&pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(&e1);
        let v = ray.direction.dot(&qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e2.dot(&qvec) * inv_det;
        if t < ray.t_min || t > ray.t_max {
            return None;
        }

        Some(TriangleHit { t, u, v })
    }
}

/// A triangle plus the flat shading data a `LambertianSurfel` is built
/// from at hit time.
#[derive(Debug, Clone)]
pub struct Surface {
    pub triangle: Triangle,
    pub reflectivity: Spectrum,
    pub emission: Spectrum,
}

impl Surface {
    pub fn reflective(triangle: Triangle, reflectivity: Spectrum) -> Surface {
        Surface {
            triangle,
            reflectivity,
            emission: Spectrum::black(),
        }
    }

    pub fn emissive(triangle: Triangle, emission: Spectrum) -> Surface {
        Surface {
            triangle,
            reflectivity: Spectrum::black(),
            emission,
        }
    }

    /// Both a reflector and an emitter (e.g. a visible light source).
    pub fn emissive_reflective(triangle: Triangle, emission: Spectrum, reflectivity: Spectrum) -> Surface {
        Surface {
            triangle,
            reflectivity,
            emission,
        }
    }
}

/// Splits an axis-aligned quad (given as four corners, wound
/// counter-clockwise as seen from its front face) into two triangles —
/// the shape every §8 scenario's "plane"/"quad" is built from.
pub fn quad(p00: Point3, p10: Point3, p11: Point3, p01: Point3, reflectivity: Spectrum, emission: Spectrum) -> Vec<Surface> {
    vec![
        Surface::emissive_reflective(Triangle::new(p00, p10, p11), emission, reflectivity),
        Surface::emissive_reflective(Triangle::new(p00, p11, p01), emission, reflectivity),
    ]
}
