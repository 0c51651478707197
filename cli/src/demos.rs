//! Hardcoded demo scenes, standing in for the scene-loading collaborator the
//! spec treats as external (§1). Mirrors the spirit of the original
//! `App::makeGUI`/scene setup (a small number of fixed rooms to point a
//! camera at) without loading `.scn.any` files or any of its G3D scaffolding.

use std::sync::Arc;

use wavefront_core::camera::PinholeCamera;
use wavefront_core::geometry::{Point3, Vector3};
use wavefront_core::light::PointLight;
use wavefront_core::scene::Scene;
use wavefront_core::spectrum::Spectrum;
use wavefront_core::triangle::{quad, Surface, Triangle};

/// A single emissive quad filling the frame — spec §8 scenario S1's scene.
pub fn emissive_quad() -> (Scene, PinholeCamera) {
    let mut scene = Scene::new();
    scene.add_surfaces(quad(
        Point3::new(-10.0, -10.0, -5.0),
        Point3::new(10.0, -10.0, -5.0),
        Point3::new(10.0, 10.0, -5.0),
        Point3::new(-10.0, 10.0, -5.0),
        Spectrum::black(),
        Spectrum::white(),
    ));
    let camera = PinholeCamera::look_at(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, -1.0),
        Vector3::new(0.0, 1.0, 0.0),
        60.0,
    );
    (scene, camera)
}

/// A Lambertian plane lit by a single point light overhead, with a small
/// occluding slab over its left half — spec §8 scenarios S2/S3's scene.
pub fn lit_plane_with_occluder() -> (Scene, PinholeCamera) {
    let mut scene = Scene::new();
    scene.add_surfaces(quad(
        Point3::new(-5.0, -1.0, -5.0),
        Point3::new(5.0, -1.0, -5.0),
        Point3::new(5.0, -1.0, 5.0),
        Point3::new(-5.0, -1.0, 5.0),
        Spectrum::grey(1.0 / std::f32::consts::PI),
        Spectrum::black(),
    ));
    scene.add_surfaces(quad(
        Point3::new(-5.0, -0.5, -5.0),
        Point3::new(0.0, -0.5, -5.0),
        Point3::new(0.0, -0.5, 5.0),
        Point3::new(-5.0, -0.5, 5.0),
        Spectrum::grey(0.5),
        Spectrum::black(),
    ));
    scene.add_light(Arc::new(PointLight::new(Point3::new(0.0, 5.0, 0.0), Spectrum::grey(50.0))));
    let camera = PinholeCamera::look_at(
        Point3::new(0.0, 3.0, 0.0),
        Point3::new(0.0, -1.0, 0.0),
        Vector3::new(0.0, 0.0, -1.0),
        80.0,
    );
    (scene, camera)
}

/// A small Cornell-box-like room (five walls, no ceiling light fixture, one
/// point light), the closest this crate gets to the original's enclosed
/// test room: red/green side walls, a white floor/back wall, and a
/// reflective block for indirect-bounce inspection.
pub fn cornell_room() -> (Scene, PinholeCamera) {
    let mut scene = Scene::new();

    // Floor, back wall, ceiling: white.
    scene.add_surfaces(quad(
        Point3::new(-5.0, -5.0, -5.0),
        Point3::new(5.0, -5.0, -5.0),
        Point3::new(5.0, -5.0, 5.0),
        Point3::new(-5.0, -5.0, 5.0),
        Spectrum::grey(0.73),
        Spectrum::black(),
    ));
    scene.add_surfaces(quad(
        Point3::new(-5.0, 5.0, -5.0),
        Point3::new(-5.0, -5.0, -5.0),
        Point3::new(5.0, -5.0, -5.0),
        Point3::new(5.0, 5.0, -5.0),
        Spectrum::grey(0.73),
        Spectrum::black(),
    ));
    scene.add_surfaces(quad(
        Point3::new(-5.0, 5.0, 5.0),
        Point3::new(5.0, 5.0, 5.0),
        Point3::new(5.0, 5.0, -5.0),
        Point3::new(-5.0, 5.0, -5.0),
        Spectrum::grey(0.73),
        Spectrum::black(),
    ));

    // Left wall: red. Right wall: green.
    scene.add_surfaces(quad(
        Point3::new(-5.0, -5.0, 5.0),
        Point3::new(-5.0, -5.0, -5.0),
        Point3::new(-5.0, 5.0, -5.0),
        Point3::new(-5.0, 5.0, 5.0),
        Spectrum::rgb(0.63, 0.065, 0.05),
        Spectrum::black(),
    ));
    scene.add_surfaces(quad(
        Point3::new(5.0, -5.0, -5.0),
        Point3::new(5.0, -5.0, 5.0),
        Point3::new(5.0, 5.0, 5.0),
        Point3::new(5.0, 5.0, -5.0),
        Spectrum::rgb(0.12, 0.45, 0.15),
        Spectrum::black(),
    ));

    // A reflective block sitting on the floor.
    scene.add_surfaces(vec![
        Surface::reflective(
            Triangle::new(Point3::new(-2.0, -5.0, -2.0), Point3::new(-2.0, -5.0, 2.0), Point3::new(-2.0, -1.0, 2.0)),
            Spectrum::grey(0.8),
        ),
        Surface::reflective(
            Triangle::new(Point3::new(-2.0, -5.0, -2.0), Point3::new(-2.0, -1.0, 2.0), Point3::new(-2.0, -1.0, -2.0)),
            Spectrum::grey(0.8),
        ),
    ]);

    scene.add_light(Arc::new(PointLight::new(Point3::new(0.0, 4.5, 0.0), Spectrum::grey(80.0))));

    let camera = PinholeCamera::look_at(
        Point3::new(0.0, 0.0, 4.5),
        Point3::new(0.0, 0.0, -1.0),
        Vector3::new(0.0, 1.0, 0.0),
        60.0,
    );
    (scene, camera)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DemoScene {
    EmissiveQuad,
    LitPlane,
    CornellRoom,
}

pub fn build(scene: DemoScene) -> (Scene, PinholeCamera) {
    match scene {
        DemoScene::EmissiveQuad => emissive_quad(),
        DemoScene::LitPlane => lit_plane_with_occluder(),
        DemoScene::CornellRoom => cornell_room(),
    }
}
