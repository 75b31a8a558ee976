use glam::{Vec2, Vec3};
use tablekit_scene::{Bounds, Camera, Viewport};

fn approx(a: Vec2, b: Vec2) -> bool {
    (a - b).length() < 1e-3
}

fn camera_for(viewport: &Viewport) -> Camera {
    let mut camera = Camera::new("Test");
    camera.set_aspect(viewport);
    camera
}

#[test]
fn test_screen_centre_maps_to_camera_position() {
    let viewport = Viewport::new(800.0, 600.0);
    let mut camera = camera_for(&viewport);
    camera.set_position(Vec3::new(3.0, -2.0, 10.0));

    let world = camera.screen_to_world(&viewport, viewport.center()).unwrap();
    assert!(approx(world, Vec2::new(3.0, -2.0)));
}

#[test]
fn test_screen_y_points_down() {
    let viewport = Viewport::new(1280.0, 720.0);
    let camera = camera_for(&viewport);

    let top_left = camera.screen_to_world(&viewport, Vec2::ZERO).unwrap();
    assert!(approx(top_left, Vec2::new(-8.0, 4.5)));
    let bottom_right = camera
        .screen_to_world(&viewport, Vec2::new(1280.0, 720.0))
        .unwrap();
    assert!(approx(bottom_right, Vec2::new(8.0, -4.5)));
}

#[test]
fn test_world_to_screen_inverts_screen_to_world() {
    let viewport = Viewport::new(1024.0, 768.0);
    let mut camera = camera_for(&viewport);
    camera.set_focal(2.0);
    camera.pan_by(Vec2::new(1.5, 0.5));

    for screen in [Vec2::new(10.0, 20.0), Vec2::new(512.0, 384.0), Vec2::new(900.0, 700.0)] {
        let world = camera.screen_to_world(&viewport, screen).unwrap();
        assert!(approx(camera.world_to_screen(&viewport, world), screen));
    }
}

#[test]
fn test_perspective_unprojects_onto_plane() {
    let viewport = Viewport::new(1280.0, 720.0);
    let mut camera = camera_for(&viewport);
    camera.set_ortho(false);
    camera.set_position(Vec3::new(2.0, 1.0, 10.0));

    let centre = camera.screen_to_world(&viewport, viewport.center()).unwrap();
    assert!(approx(centre, Vec2::new(2.0, 1.0)));

    let corner = camera.screen_to_world(&viewport, Vec2::ZERO).unwrap();
    assert!(corner.x < 2.0 && corner.y > 1.0);
    assert!(approx(camera.world_to_screen(&viewport, corner), Vec2::ZERO));
}

#[test]
fn test_set_aspect_keeps_horizontal_aperture() {
    let mut camera = Camera::new("Test");
    let h = camera.h_aperture();
    camera.set_aspect(&Viewport::new(1000.0, 500.0));
    assert_eq!(camera.h_aperture(), h);
    assert_eq!(camera.v_aperture(), h / 2.0);
}

#[test]
fn test_frame_bounds_fits_and_centres() {
    let viewport = Viewport::new(1280.0, 720.0);
    let mut camera = camera_for(&viewport);
    let bounds = Bounds::from_corners(Vec2::new(10.0, 10.0), Vec2::new(50.0, 20.0));

    camera.frame_bounds(&bounds, 0.0);
    assert!(approx(camera.position().truncate(), Vec2::new(30.0, 15.0)));

    let half = camera.visible_half_extents();
    assert!(half.x >= 20.0 - 1e-3 && half.y >= 5.0 - 1e-3);
    // The wider axis is the one that fits exactly.
    assert!((half.x - 20.0).abs() < 1e-3);
}

#[test]
fn test_zoom_changes_focal() {
    let mut camera = Camera::new("Test");
    camera.zoom_by(2.0);
    assert_eq!(camera.focal(), 2.0);
    camera.zoom_by(0.0);
    assert_eq!(camera.focal(), 2.0);
    camera.zoom_by(1e6);
    assert_eq!(camera.focal(), 100.0);
}
