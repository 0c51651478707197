//! The read-only scene view (spec §2 item 3, §6): `pose()` hands the
//! triangle tree its contents, `lights()` hands the engine the list the
//! light-selection stage samples from. A `Scene` is host-environment setup,
//! not a render-time object — the engine copies out of it once, in
//! `PathTracer::set_scene`.

use std::sync::Arc;

use crate::light::Light;
use crate::triangle::Surface;

#[derive(Default)]
pub struct Scene {
    surfaces: Vec<Surface>,
    lights: Vec<Arc<dyn Light>>,
}

impl Scene {
    pub fn new() -> Scene {
        Scene::default()
    }

    pub fn add_surface(&mut self, surface: Surface) {
        self.surfaces.push(surface);
    }

    pub fn add_surfaces(&mut self, surfaces: impl IntoIterator<Item = Surface>) {
        self.surfaces.extend(surfaces);
    }

    pub fn add_light(&mut self, light: Arc<dyn Light>) {
        self.lights.push(light);
    }

    pub fn pose(&self) -> Vec<Surface> {
        self.surfaces.clone()
    }

    pub fn lights(&self) -> Vec<Arc<dyn Light>> {
        self.lights.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3;
    use crate::light::PointLight;
    use crate::spectrum::Spectrum;
    use crate::triangle::Triangle;

    #[test]
    fn pose_and_lights_reflect_additions() {
        let mut scene = Scene::new();
        assert!(scene.is_empty());
        scene.add_surface(Surface::reflective(
            Triangle::new(
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ),
            Spectrum::white(),
        ));
        scene.add_light(Arc::new(PointLight::new(Point3::new(0.0, 1.0, 0.0), Spectrum::white())));
        assert!(!scene.is_empty());
        assert_eq!(scene.pose().len(), 1);
        assert_eq!(scene.lights().len(), 1);
    }
}
