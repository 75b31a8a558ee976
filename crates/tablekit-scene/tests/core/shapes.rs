use glam::Vec2;
use std::rc::Rc;
use tablekit_core::{BuiltinTexture, ResourceProvider, Visibility};
use tablekit_scene::{BgImage, Bounds, Shape, ShapeId, StatusMarker, StatusSet, Token, Transform2D};

#[test]
fn test_token_containment_is_circular_but_bounds_are_square() {
    let mut token = Token::new(ShapeId(1), None);
    token.transform_mut().set_position(Vec2::new(2.0, 2.0));
    token.transform_mut().set_uniform_scale(2.0);

    assert!(token.contains(Vec2::new(2.5, 2.5)));
    // Inside the bounding square, outside the disc.
    let corner = Vec2::new(2.9, 2.9);
    assert!(!token.contains(corner));
    assert!(token.bounds().contains(corner));
    assert_eq!(
        token.bounds(),
        Bounds::from_corners(Vec2::new(1.0, 1.0), Vec2::new(3.0, 3.0))
    );
}

#[test]
fn test_image_contains_its_rectangle() {
    let mut image = BgImage::new(ShapeId(1), None);
    image
        .transform_mut()
        .set_scale(Vec2::new(4.0, 2.0));
    assert!(image.contains(Vec2::new(1.9, 0.9)));
    assert!(image.contains(Vec2::new(-2.0, -1.0)));
    assert!(!image.contains(Vec2::new(0.0, 1.1)));
}

#[test]
fn test_image_follows_texture_aspect_unless_locked() {
    let mut resources = ResourceProvider::new(".");
    let wide = resources.builtin(BuiltinTexture::Image);
    let square = resources.builtin(BuiltinTexture::Token);

    let mut image = BgImage::new(ShapeId(1), Some(Rc::clone(&wide)));
    let width = image.transform().scale().x;
    image.set_texture(Some(Rc::clone(&square)));
    assert_eq!(image.transform().scale(), Vec2::new(width, width));

    image.lock_ratio = true;
    image.set_texture(Some(wide));
    assert_eq!(image.transform().scale(), Vec2::new(width, width));
}

#[test]
fn test_shape_flags() {
    let mut token = Token::new(ShapeId(7), None);
    assert_eq!(token.id(), ShapeId(7));
    assert!(token.is_visible_to(Visibility::HOST));
    assert!(token.is_visible_to(Visibility::PRESENTATION));

    token.set_visibility(Visibility::HOST);
    assert!(!token.is_visible_to(Visibility::PRESENTATION));

    token.set_selected(true);
    token.set_highlighted(true);
    assert!(token.is_selected() && token.is_highlighted());
}

#[test]
fn test_status_markers() {
    let set = StatusSet::empty()
        .toggled(StatusMarker::Green)
        .toggled(StatusMarker::Blue);
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![StatusMarker::Green, StatusMarker::Blue]);
    assert_eq!(set.toggled(StatusMarker::Green).iter().count(), 1);
    assert_eq!(StatusMarker::ALL.len(), StatusMarker::COUNT);
}

#[test]
fn test_transform_matrix_tracks_fields() {
    let mut t = Transform2D::new(Vec2::new(1.0, 2.0), Vec2::new(2.0, 2.0), 90.0);
    let p = t.transform_point(Vec2::new(0.5, 0.0));
    assert!((p - Vec2::new(1.0, 3.0)).length() < 1e-5);

    t.set_rotation(0.0);
    t.offset(Vec2::new(-1.0, -2.0));
    assert!((t.transform_point(Vec2::new(0.5, 0.5)) - Vec2::new(1.0, 1.0)).length() < 1e-5);
}
