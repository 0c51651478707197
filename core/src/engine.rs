//! The path-tracer engine (spec §4.1, §6): orchestrates one `render` call
//! across samples-per-pixel and bounce depth, sequencing the six stages in
//! `crate::stages` as strict barriers.

use std::sync::Arc;

use crate::buffers::WavefrontBuffers;
use crate::bvh::{Bvh, TriangleTree};
use crate::camera::{Camera, Viewport};
use crate::error::RenderError;
use crate::image::Image;
use crate::light::Light;
use crate::scene::Scene;
use crate::spectrum::Spectrum;
use crate::stages;
use crate::stats::{self, RenderStats};
use crate::stopwatch::Stopwatch;

/// Drives one render of a [`Scene`] against a [`Camera`], accumulating into
/// an [`Image`]. Caches the scene's triangle tree and light list between
/// calls; stateless otherwise (spec §6, "Persisted state: None").
pub struct PathTracer {
    tree: Box<dyn TriangleTree>,
    lights: Vec<Arc<dyn Light>>,
    seed: u64,
}

impl PathTracer {
    pub fn new(scene: &Scene) -> PathTracer {
        let mut tracer = PathTracer {
            tree: Box::new(Bvh::new()),
            lights: Vec::new(),
            seed: 0,
        };
        tracer.set_scene(scene);
        tracer
    }

    /// Overrides the engine seed every per-(pixel, sample, stage) RNG stream
    /// is derived from (spec §9's "engine-supplied seed policy"). Defaults
    /// to `0`; callers wanting S6's determinism guarantee across runs just
    /// need to hold this fixed.
    pub fn with_seed(mut self, seed: u64) -> PathTracer {
        self.seed = seed;
        self
    }

    /// Rebuilds the triangle tree and re-snapshots the light list from
    /// `scene`. Called by `new`; may also be called later to re-pose a
    /// scene between renders, matching the teacher's `set_scene` seam.
    pub fn set_scene(&mut self, scene: &Scene) {
        let surfaces = scene.pose();
        if surfaces.is_empty() {
            log::info!("scene has no triangles; all primary rays will miss (spec §7 SceneEmpty)");
        }
        self.tree.set_contents(&surfaces);
        self.lights = scene.lights();
    }

    /// Renders `samples_per_pixel` paths of up to `scattering_events + 1`
    /// vertices per pixel into `image`, accumulating into its existing
    /// contents (spec §4.1's contract: callers clear `image` themselves for
    /// a fresh render).
    pub fn render(
        &self,
        image: &mut Image,
        stopwatch: &mut Stopwatch,
        samples_per_pixel: u32,
        parallel: bool,
        scattering_events: u32,
        camera: &dyn Camera,
    ) -> Result<RenderStats, RenderError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(RenderError::InvalidConfiguration(
                "image must have non-zero width and height".to_string(),
            ));
        }
        if samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfiguration(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }

        stopwatch.tick();

        let width = image.width();
        let height = image.height();
        let viewport = Viewport::new(width, height);
        let n = (width as usize) * (height as usize);
        let mut buffers = WavefrontBuffers::new(n);
        let inv_spp = 1.0 / samples_per_pixel as f32;
        let has_lights = !self.lights.is_empty();
        let counters = stats::Counters::new();

        for s in 0..samples_per_pixel {
            stages::generate_primary_rays(&mut buffers.ray, camera, viewport, parallel);
            buffers.modulation.fill(Spectrum::grey(inv_spp));

            for k in 0..=scattering_events {
                stages::trace_closest(self.tree.as_ref(), &buffers.ray, &mut buffers.surfel, &counters, parallel);

                if has_lights {
                    stages::choose_lights(
                        &buffers.surfel,
                        &self.lights,
                        &mut buffers.biradiance,
                        &mut buffers.shadow_ray,
                        &mut buffers.light_casts_shadows,
                        self.seed,
                        s as u64,
                        k as u64,
                        parallel,
                    );
                    stages::test_visibility(
                        self.tree.as_ref(),
                        &buffers.shadow_ray,
                        &buffers.light_casts_shadows,
                        &mut buffers.light_shadowed,
                        &counters,
                        parallel,
                    );
                } else {
                    // No lights: the direct term is always zero. Mark every
                    // entry shadowed so accumulate's gate skips a read of
                    // stale biradiance/shadow_ray contents from a prior
                    // bounce rather than leaving the buffers untouched.
                    buffers.light_shadowed.iter_mut().for_each(|f| *f = true);
                }

                stages::accumulate(
                    image,
                    &buffers.ray,
                    &buffers.surfel,
                    &buffers.biradiance,
                    &buffers.shadow_ray,
                    &buffers.light_shadowed,
                    &buffers.modulation,
                    width,
                    &counters,
                    parallel,
                );

                stages::generate_scatter_rays(
                    &mut buffers.ray,
                    &mut buffers.modulation,
                    &buffers.surfel,
                    self.seed,
                    s as u64,
                    k as u64,
                    parallel,
                );
            }
        }

        stopwatch.tock();
        Ok(counters.snapshot(stopwatch.elapsed_secs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PinholeCamera;
    use crate::geometry::{Normal3, Point3, Vector3};
    use crate::light::PointLight;
    use crate::triangle::{quad, Surface, Triangle};

    fn simple_camera() -> PinholeCamera {
        PinholeCamera::look_at(
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            90.0,
        )
    }

    #[test]
    fn render_rejects_zero_dimension_image() {
        let scene = Scene::new();
        let tracer = PathTracer::new(&scene);
        let mut image = Image::new(0, 4);
        let mut sw = Stopwatch::new();
        let cam = simple_camera();
        let err = tracer.render(&mut image, &mut sw, 1, false, 0, &cam).unwrap_err();
        assert!(matches!(err, RenderError::InvalidConfiguration(_)));
    }

    #[test]
    fn render_rejects_zero_samples() {
        let scene = Scene::new();
        let tracer = PathTracer::new(&scene);
        let mut image = Image::new(4, 4);
        let mut sw = Stopwatch::new();
        let cam = simple_camera();
        let err = tracer.render(&mut image, &mut sw, 0, false, 0, &cam).unwrap_err();
        assert!(matches!(err, RenderError::InvalidConfiguration(_)));
    }

    #[test]
    fn empty_scene_leaves_preloaded_image_untouched() {
        let scene = Scene::new();
        let tracer = PathTracer::new(&scene);
        let mut image = Image::new(2, 2);
        image.fill(Spectrum::grey(0.5));
        let mut sw = Stopwatch::new();
        let cam = PinholeCamera::look_at(
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            60.0,
        );
        tracer.render(&mut image, &mut sw, 4, false, 3, &cam).unwrap();
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(image.get((x, y)), Spectrum::grey(0.5));
            }
        }
    }

    #[test]
    fn emissive_quad_fills_every_pixel_with_its_radiance() {
        let mut scene = Scene::new();
        scene.add_surfaces(quad(
            Point3::new(-10.0, -10.0, -5.0),
            Point3::new(10.0, -10.0, -5.0),
            Point3::new(10.0, 10.0, -5.0),
            Point3::new(-10.0, 10.0, -5.0),
            Spectrum::black(),
            Spectrum::white(),
        ));
        let tracer = PathTracer::new(&scene).with_seed(1);
        let mut image = Image::new(4, 4);
        let mut sw = Stopwatch::new();
        let cam = PinholeCamera::look_at(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 1.0, 0.0),
            60.0,
        );
        tracer.render(&mut image, &mut sw, 1, false, 0, &cam).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let px = image.get((x, y));
                assert!((px.r - 1.0).abs() < 1e-5, "pixel ({x},{y}) = {px:?}");
            }
        }
    }

    #[test]
    fn determinism_serial_runs_twice_are_byte_identical() {
        let mut scene = Scene::new();
        scene.add_surfaces(vec![Surface::reflective(
            Triangle::new(Point3::new(-5.0, -5.0, -5.0), Point3::new(5.0, -5.0, -5.0), Point3::new(0.0, 5.0, -5.0)),
            Spectrum::grey(0.8),
        )]);
        scene.add_light(Arc::new(PointLight::new(Point3::new(0.0, 5.0, -2.0), Spectrum::grey(10.0))));
        let tracer = PathTracer::new(&scene).with_seed(1);
        let cam = PinholeCamera::look_at(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 1.0, 0.0),
            60.0,
        );

        let mut image_a = Image::new(6, 6);
        tracer.render(&mut image_a, &mut Stopwatch::new(), 8, false, 2, &cam).unwrap();
        let mut image_b = Image::new(6, 6);
        tracer.render(&mut image_b, &mut Stopwatch::new(), 8, false, 2, &cam).unwrap();

        for y in 0..6 {
            for x in 0..6 {
                assert_eq!(image_a.get((x, y)), image_b.get((x, y)));
            }
        }
    }

    #[test]
    fn occluded_triangle_blocks_direct_light_on_its_half() {
        let mut scene = Scene::new();
        scene.add_surfaces(vec![Surface::reflective(
            Triangle::new(Point3::new(-5.0, -1.0, -5.0), Point3::new(5.0, -1.0, -5.0), Point3::new(5.0, -1.0, 5.0)),
            Spectrum::grey(1.0 / std::f32::consts::PI),
        )]);
        scene.add_surfaces(vec![Surface::reflective(
            Triangle::new(Point3::new(-5.0, -1.0, -5.0), Point3::new(5.0, -1.0, 5.0), Point3::new(-5.0, -1.0, 5.0)),
            Spectrum::grey(1.0 / std::f32::consts::PI),
        )]);
        // Opaque occluder above the left half of the plane, between it and
        // the light.
        scene.add_surfaces(vec![
            Surface::reflective(
                Triangle::new(Point3::new(-5.0, -0.5, -5.0), Point3::new(0.0, -0.5, -5.0), Point3::new(0.0, -0.5, 5.0)),
                Spectrum::grey(0.5),
            ),
            Surface::reflective(
                Triangle::new(Point3::new(-5.0, -0.5, -5.0), Point3::new(0.0, -0.5, 5.0), Point3::new(-5.0, -0.5, 5.0)),
                Spectrum::grey(0.5),
            ),
        ]);
        scene.add_light(Arc::new(PointLight::new(Point3::new(0.0, 5.0, 0.0), Spectrum::grey(50.0))));

        let tracer = PathTracer::new(&scene).with_seed(1);
        let cam = PinholeCamera::look_at(
            Point3::new(0.0, 3.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Vector3::new(0.0, 0.0, -1.0),
            80.0,
        );
        let mut image = Image::new(8, 8);
        tracer.render(&mut image, &mut Stopwatch::new(), 1, false, 0, &cam).unwrap();

        let left = image.get((1, 4));
        let right = image.get((6, 4));
        assert!(right.r > left.r, "left={left:?} right={right:?}");
    }

    #[test]
    fn render_returns_statistics_with_recorded_ray_counts() {
        let mut scene = Scene::new();
        scene.add_surfaces(vec![Surface::reflective(
            Triangle::new(Point3::new(-5.0, -5.0, -5.0), Point3::new(5.0, -5.0, -5.0), Point3::new(0.0, 5.0, -5.0)),
            Spectrum::grey(0.8),
        )]);
        scene.add_light(Arc::new(PointLight::new(Point3::new(0.0, 5.0, -2.0), Spectrum::grey(10.0))));
        let tracer = PathTracer::new(&scene).with_seed(1);
        let cam = PinholeCamera::look_at(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 1.0, 0.0),
            60.0,
        );
        let mut image = Image::new(4, 4);
        let stats = tracer.render(&mut image, &mut Stopwatch::new(), 2, false, 1, &cam).unwrap();
        assert_eq!(stats.primary_rays_traced, 4 * 4 * 2 * 2);
    }
}
