//! The triangle-tree collaborator (spec §3/§4.3/§4.5/§6) and its default
//! implementation: a flattened, median-split bounding volume hierarchy.
//!
//! Grounded in the teacher's `bvh/mod.rs` linear-node flattening and
//! stack-based traversal, simplified from its full SAH-bucket builder (the
//! teacher partitions via a 12-bucket surface-area heuristic) down to a
//! largest-extent median split — adequate for the flat, low polygon counts
//! this crate's demo scenes use, and it keeps the one structural idea the
//! spec actually cares about: *batched* closest-hit and occlusion-only
//! queries over a shared flattened tree, not per-ray recursive descent.

use crate::geometry::Point3;
use crate::ray::Ray;
use crate::surfel::{LambertianSurfel, Surfel};
use crate::triangle::Surface;

bitflags::bitflags! {
    /// Matches the flag names spec §6 calls out for
    /// `intersect_rays(..., options)`.
    pub struct IntersectOptions: u32 {
        const OCCLUSION_ONLY        = 0b001;
        const DO_NOT_CULL_BACKFACES = 0b010;
        const COHERENT_RAY_HINT     = 0b100;
    }
}

#[derive(Debug, Copy, Clone)]
pub struct Bounds3 {
    pub min: Point3,
    pub max: Point3,
}

impl Bounds3 {
    pub fn empty() -> Bounds3 {
        Bounds3 {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn from_points(pts: &[Point3]) -> Bounds3 {
        let mut b = Bounds3::empty();
        for p in pts {
            b = b.union_point(p);
        }
        b
    }

    pub fn union(&self, other: &Bounds3) -> Bounds3 {
        Bounds3 {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    pub fn union_point(&self, p: &Point3) -> Bounds3 {
        Bounds3 {
            min: Point3::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z)),
            max: Point3::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z)),
        }
    }

    /// Axis (0=x, 1=y, 2=z) along which this box is widest.
    pub fn maximum_extent(&self) -> usize {
        let d = self.max - self.min;
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    fn axis(&self, i: usize) -> (f32, f32) {
        match i {
            0 => (self.min.x, self.max.x),
            1 => (self.min.y, self.max.y),
            _ => (self.min.z, self.max.z),
        }
    }

    fn intersect_p(&self, ray: &Ray, inv_dir: [f32; 3]) -> bool {
        let mut t0 = ray.t_min;
        let mut t1 = ray.t_max;
        for axis in 0..3 {
            let (lo, hi) = self.axis(axis);
            let origin = match axis {
                0 => ray.origin.x,
                1 => ray.origin.y,
                _ => ray.origin.z,
            };
            let mut t_near = (lo - origin) * inv_dir[axis];
            let mut t_far = (hi - origin) * inv_dir[axis];
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }
            t0 = t0.max(t_near);
            t1 = t1.min(t_far);
            if t0 > t1 {
                return false;
            }
        }
        true
    }
}

pub trait TriangleTree: Send + Sync {
    fn set_contents(&mut self, surfaces: &[Surface]);

    /// Batched closest-hit query: `out[i]` receives the nearest hit for
    /// `rays[i]`, or `None`.
    fn intersect_closest(&self, rays: &[Ray], out: &mut [Option<Box<dyn Surfel>>], options: IntersectOptions);

    /// Batched occlusion-only query: `out[i]` is `true` iff some triangle
    /// blocks `rays[i]` within `[t_min, t_max]`.
    fn intersect_occlusion(&self, rays: &[Ray], out: &mut [bool], options: IntersectOptions);
}

#[derive(Debug, Clone)]
enum NodeData {
    Leaf { offset: usize, count: usize },
    Interior { second_child_offset: usize },
}

#[derive(Debug, Clone)]
struct LinearNode {
    bounds: Bounds3,
    data: NodeData,
}

/// Median-split flattened BVH over a fixed set of triangles.
pub struct Bvh {
    surfaces: Vec<Surface>,
    nodes: Vec<LinearNode>,
}

impl Bvh {
    pub fn new() -> Bvh {
        Bvh {
            surfaces: Vec::new(),
            nodes: Vec::new(),
        }
    }

    fn build(&mut self) {
        self.nodes.clear();
        if self.surfaces.is_empty() {
            return;
        }
        let mut order: Vec<usize> = (0..self.surfaces.len()).collect();
        let bounds: Vec<Bounds3> = self.surfaces.iter().map(|s| s.triangle.bounds()).collect();
        let centroids: Vec<Point3> = self.surfaces.iter().map(|s| s.triangle.centroid()).collect();
        let mut nodes = Vec::with_capacity(self.surfaces.len() * 2);
        Self::recursive_build(&bounds, &centroids, &mut order, 0, order.len(), &mut nodes);
        // `order` is now the permutation leaves reference by contiguous
        // range; reorder `surfaces` to match so `NodeData::Leaf { offset,
        // count }` indexes directly into it.
        let mut reordered = Vec::with_capacity(self.surfaces.len());
        for &i in &order {
            reordered.push(self.surfaces[i].clone());
        }
        self.surfaces = reordered;
        self.nodes = nodes;
    }

    fn recursive_build(
        bounds: &[Bounds3],
        centroids: &[Point3],
        order: &mut [usize],
        start: usize,
        end: usize,
        nodes: &mut Vec<LinearNode>,
    ) -> usize {
        let node_bounds = order[start..end]
            .iter()
            .fold(Bounds3::empty(), |acc, &i| acc.union(&bounds[i]));

        let n = end - start;
        if n <= 2 {
            let idx = nodes.len();
            nodes.push(LinearNode {
                bounds: node_bounds,
                data: NodeData::Leaf {
                    offset: start,
                    count: n,
                },
            });
            return idx;
        }

        let centroid_bounds = order[start..end]
            .iter()
            .fold(Bounds3::empty(), |acc, &i| acc.union_point(&centroids[i]));
        let axis = centroid_bounds.maximum_extent();
        let (lo, hi) = centroid_bounds.axis(axis);

        if hi - lo < 1e-8 {
            let idx = nodes.len();
            nodes.push(LinearNode {
                bounds: node_bounds,
                data: NodeData::Leaf {
                    offset: start,
                    count: n,
                },
            });
            return idx;
        }

        let mid = (start + end) / 2;
        order[start..end].sort_by(|&a, &b| {
            let va = match axis {
                0 => centroids[a].x,
                1 => centroids[a].y,
                _ => centroids[a].z,
            };
            let vb = match axis {
                0 => centroids[b].x,
                1 => centroids[b].y,
                _ => centroids[b].z,
            };
            va.partial_cmp(&vb).unwrap()
        });

        let idx = nodes.len();
        nodes.push(LinearNode {
            bounds: node_bounds,
            data: NodeData::Interior { second_child_offset: 0 },
        });
        Self::recursive_build(bounds, centroids, order, start, mid, nodes);
        let second = Self::recursive_build(bounds, centroids, order, mid, end, nodes);
        nodes[idx].data = NodeData::Interior { second_child_offset: second };
        idx
    }

    fn traverse(&self, ray: &Ray, occlusion_only: bool, cull_backfaces: bool) -> TraverseResult {
        if self.nodes.is_empty() {
            return TraverseResult::Miss;
        }
        let inv_dir = [1.0 / ray.direction.x, 1.0 / ray.direction.y, 1.0 / ray.direction.z];

        let mut best: Option<(usize, crate::triangle::TriangleHit)> = None;
        let mut t_max = ray.t_max;
        let mut stack = [0usize; 64];
        let mut sp = 0usize;
        let mut current = 0usize;
        loop {
            let node = &self.nodes[current];
            if node.bounds.intersect_p(ray, inv_dir) {
                match node.data {
                    NodeData::Leaf { offset, count } => {
                        for i in offset..offset + count {
                            let mut probe = *ray;
                            probe.t_max = t_max;
                            if let Some(hit) = self.surfaces[i].triangle.intersect(&probe, cull_backfaces) {
                                if occlusion_only {
                                    return TraverseResult::Occluded;
                                }
                                t_max = hit.t;
                                best = Some((i, hit));
                            }
                        }
                        if sp == 0 {
                            break;
                        }
                        sp -= 1;
                        current = stack[sp];
                    }
                    NodeData::Interior { second_child_offset } => {
                        stack[sp] = second_child_offset;
                        sp += 1;
                        current += 1;
                    }
                }
            } else {
                if sp == 0 {
                    break;
                }
                sp -= 1;
                current = stack[sp];
            }
        }

        match best {
            Some((i, hit)) => TraverseResult::Hit(i, hit),
            None => TraverseResult::Miss,
        }
    }
}

enum TraverseResult {
    Miss,
    Occluded,
    Hit(usize, crate::triangle::TriangleHit),
}

impl Default for Bvh {
    fn default() -> Bvh {
        Bvh::new()
    }
}

impl TriangleTree for Bvh {
    fn set_contents(&mut self, surfaces: &[Surface]) {
        self.surfaces = surfaces.to_vec();
        self.build();
        log::info!(
            "built triangle tree with {} surfaces over {} nodes",
            self.surfaces.len(),
            self.nodes.len()
        );
    }

    fn intersect_closest(&self, rays: &[Ray], out: &mut [Option<Box<dyn Surfel>>], options: IntersectOptions) {
        debug_assert_eq!(rays.len(), out.len());
        let cull_backfaces = !options.contains(IntersectOptions::DO_NOT_CULL_BACKFACES);
        let hit_surfel = |ray: &Ray| -> Option<Box<dyn Surfel>> {
            match self.traverse(ray, false, cull_backfaces) {
                TraverseResult::Hit(i, hit) => {
                    let surface = &self.surfaces[i];
                    let p = ray.at(hit.t);
                    let n_g = surface.triangle.normal();
                    let surfel = LambertianSurfel::new(p, n_g, surface.reflectivity, surface.emission);
                    Some(Box::new(surfel) as Box<dyn Surfel>)
                }
                _ => None,
            }
        };

        if options.contains(IntersectOptions::COHERENT_RAY_HINT) {
            use rayon::prelude::*;
            rays.par_iter().zip(out.par_iter_mut()).for_each(|(ray, slot)| *slot = hit_surfel(ray));
        } else {
            rays.iter().zip(out.iter_mut()).for_each(|(ray, slot)| *slot = hit_surfel(ray));
        }
    }

    fn intersect_occlusion(&self, rays: &[Ray], out: &mut [bool], options: IntersectOptions) {
        debug_assert_eq!(rays.len(), out.len());
        // Spec §4.5: occlusion queries run "with backface culling
        // disabled" unconditionally, regardless of `options`.
        let occluded = |ray: &Ray| matches!(self.traverse(ray, true, false), TraverseResult::Occluded);

        if options.contains(IntersectOptions::COHERENT_RAY_HINT) {
            use rayon::prelude::*;
            rays.par_iter().zip(out.par_iter_mut()).for_each(|(ray, slot)| *slot = occluded(ray));
        } else {
            rays.iter().zip(out.iter_mut()).for_each(|(ray, slot)| *slot = occluded(ray));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vector3;
    use crate::spectrum::Spectrum;
    use crate::triangle::Triangle;

    fn single_triangle_tree() -> Bvh {
        let mut tree = Bvh::new();
        tree.set_contents(&[Surface::reflective(
            Triangle::new(
                Point3::new(-1.0, -1.0, -5.0),
                Point3::new(1.0, -1.0, -5.0),
                Point3::new(0.0, 1.0, -5.0),
            ),
            Spectrum::white(),
        )]);
        tree
    }

    #[test]
    fn closest_hit_finds_the_triangle() {
        let tree = single_triangle_tree();
        let rays = vec![Ray::new(Point3::new(0.0, -0.3, 0.0), Vector3::new(0.0, 0.0, -1.0))];
        let mut out: Vec<Option<Box<dyn Surfel>>> = vec![None];
        tree.intersect_closest(&rays, &mut out, IntersectOptions::empty());
        assert!(out[0].is_some());
    }

    #[test]
    fn occlusion_query_detects_the_blocker() {
        let tree = single_triangle_tree();
        let rays = vec![Ray::segment(
            Point3::new(0.0, -0.3, 0.0),
            Vector3::new(0.0, 0.0, -1.0),
            1e-4,
            10.0,
        )];
        let mut out = vec![false];
        tree.intersect_occlusion(&rays, &mut out, IntersectOptions::empty());
        assert!(out[0]);
    }

    #[test]
    fn empty_tree_reports_no_hits() {
        let tree = Bvh::new();
        let rays = vec![Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0))];
        let mut closest: Vec<Option<Box<dyn Surfel>>> = vec![None];
        tree.intersect_closest(&rays, &mut closest, IntersectOptions::empty());
        assert!(closest[0].is_none());
        let mut occluded = vec![false];
        tree.intersect_occlusion(&rays, &mut occluded, IntersectOptions::empty());
        assert!(!occluded[0]);
    }
}
