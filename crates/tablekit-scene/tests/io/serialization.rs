use glam::{Vec2, Vec3};
use proptest::prelude::*;
use std::rc::Rc;
use tablekit_core::{BuiltinTexture, ResourceProvider, Rgba, SceneError, Visibility};
use tablekit_scene::{
    load_scene, save_scene, Camera, Scene, SceneDocument, SerializeOptions, Shape, StatusMarker,
    StatusSet, ViewId,
};
use tempfile::TempDir;

fn sample_scene(resources: &mut ResourceProvider) -> Scene {
    let mut scene = Scene::new();
    scene.grid_mut().set_scale(1.5);
    scene.default_visibility = Visibility::HOST;

    let portrait = resources.builtin(BuiltinTexture::Token);
    let goblin = scene.add_token(Some(Rc::clone(&portrait)));
    {
        let token = scene.token_mut(goblin).unwrap();
        token.name = "Goblin".to_string();
        token.transform_mut().set_position(Vec2::new(1.5, -0.5));
        token.transform_mut().set_uniform_scale(1.5);
        token.statuses.set(StatusMarker::Red, true);
        token.statuses.set(StatusMarker::Cyan, true);
        token.border_colour = Rgba::new(0.8, 0.1, 0.1, 1.0);
    }
    let ogre = scene.add_token(Some(portrait));
    {
        let token = scene.token_mut(ogre).unwrap();
        token.name = "Ogre".to_string();
        token.transform_mut().set_position(Vec2::new(-3.0, 3.0));
        token.transform_mut().set_uniform_scale(3.0);
        token.transform_mut().set_rotation(45.0);
        token.x_status = true;
        token.opacity = 0.5;
    }

    let map = scene.add_image(Some(resources.builtin(BuiltinTexture::Image)));
    {
        let image = scene.image_mut(map).unwrap();
        image.lock_ratio = true;
        image.set_visibility(Visibility::ALL);
    }

    scene.set_view_camera(ViewId::Editor, Camera::new("Editor"));
    let mut presentation = Camera::new("Table");
    presentation.set_position(Vec3::new(2.0, 1.0, 10.0));
    presentation.set_focal(0.5);
    scene.set_view_camera(ViewId::Presentation, presentation);
    scene
}

fn document(scene: &Scene) -> SceneDocument {
    SceneDocument::from_scene(scene, SerializeOptions::all())
}

#[test]
fn test_document_uses_scene_file_keys() {
    let mut resources = ResourceProvider::new(".");
    let scene = sample_scene(&mut resources);
    let json = document(&scene).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["defaultVisibility"], 1);
    assert_eq!(value["tokensLocked"], false);
    assert_eq!(value["grid"]["scale"], 1.5);

    let goblin = &value["tokens"][0];
    assert_eq!(goblin["name"], "Goblin");
    assert_eq!(goblin["texture"], "builtin:token");
    assert_eq!(goblin["statuses"], "00010001");
    assert_eq!(goblin["xstatus"], false);
    assert_eq!(goblin["matrix2D"]["pos"][0], 1.5);
    assert_eq!(goblin["visibility"], 1);

    assert_eq!(value["images"][0]["lockRatio"], true);
    assert_eq!(value["views"][1]["id"], "presentation");
    assert_eq!(value["views"][1]["index"], 1);
    assert_eq!(value["cameras"][1]["name"], "Table");
}

#[test]
fn test_save_and_load_keeps_shapes_and_order() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("scene.json");
    let mut resources = ResourceProvider::new(".");
    let mut scene = sample_scene(&mut resources);

    save_scene(&mut scene, &path).unwrap();
    assert_eq!(scene.file_path.as_deref(), Some(path.as_path()));

    let loaded = load_scene(&path, &mut resources).unwrap();
    assert_eq!(loaded.tokens().len(), 2);
    assert_eq!(loaded.images().len(), 1);
    for (before, after) in scene.tokens().iter().zip(loaded.tokens()) {
        assert_eq!(before.name, after.name);
        assert_eq!(before.transform(), after.transform());
        assert_eq!(
            before.texture().map(|t| t.key()),
            after.texture().map(|t| t.key())
        );
        assert_eq!(before.statuses, after.statuses);
        assert_eq!(before.visibility(), after.visibility());
    }
    assert!(loaded.images()[0].lock_ratio);
    assert_eq!(loaded.grid().scale(), 1.5);
    assert_eq!(loaded.default_visibility, Visibility::HOST);

    let presentation = loaded.view_camera(ViewId::Presentation).unwrap();
    assert_eq!(presentation.name, "Table");
    assert_eq!(presentation.focal(), 0.5);
    assert_eq!(presentation.position(), Vec3::new(2.0, 1.0, 10.0));
}

#[test]
fn test_loaded_textures_are_shared() {
    let mut resources = ResourceProvider::new(".");
    let scene = sample_scene(&mut resources);
    let json = document(&scene).to_json().unwrap();

    let mut loaded = Scene::new();
    SceneDocument::parse(&json)
        .unwrap()
        .apply_to(&mut loaded, &mut resources, false)
        .unwrap();
    let a = loaded.tokens()[0].texture().unwrap();
    let b = loaded.tokens()[1].texture().unwrap();
    assert!(Rc::ptr_eq(a, b));
}

#[test]
fn test_serialize_is_idempotent() {
    let mut resources = ResourceProvider::new(".");
    let scene = sample_scene(&mut resources);
    let first = document(&scene);

    let mut loaded = Scene::new();
    first.apply_to(&mut loaded, &mut resources, false).unwrap();
    let second = document(&loaded);
    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn test_missing_sections_leave_scene_untouched() {
    let mut resources = ResourceProvider::new(".");
    let mut scene = sample_scene(&mut resources);

    let doc = SceneDocument::parse(r#"{ "grid": { "scale": 2.0 } }"#).unwrap();
    let created = doc.apply_to(&mut scene, &mut resources, false).unwrap();
    assert!(created.is_empty());
    assert_eq!(scene.tokens().len(), 2);
    assert_eq!(scene.images().len(), 1);
    assert_eq!(scene.cameras().len(), 2);
    assert_eq!(scene.grid().scale(), 2.0);
}

#[test]
fn test_missing_token_fields_take_defaults() {
    let mut resources = ResourceProvider::new(".");
    let mut scene = Scene::new();
    let doc = SceneDocument::parse(r#"{ "tokens": [ { "name": "Bare" } ] }"#).unwrap();
    doc.apply_to(&mut scene, &mut resources, false).unwrap();

    let token = &scene.tokens()[0];
    assert_eq!(token.name, "Bare");
    assert!(token.texture().is_none());
    assert_eq!(token.border_width, 0.05);
    assert_eq!(token.opacity, 1.0);
    assert_eq!(token.statuses, StatusSet::empty());
    assert_eq!(token.visibility(), Visibility::ALL);
    assert_eq!(token.transform().scale(), Vec2::ONE);
}

#[test]
fn test_merge_appends() {
    let mut resources = ResourceProvider::new(".");
    let mut scene = sample_scene(&mut resources);
    let doc = document(&scene);

    let created = doc.apply_to(&mut scene, &mut resources, true).unwrap();
    assert_eq!(created.len(), 3);
    assert_eq!(scene.tokens().len(), 4);
    assert_eq!(scene.images().len(), 2);
    assert_eq!(scene.cameras().len(), 4);

    let mut ids: Vec<_> = scene.shapes().map(|s| s.id()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 6, "merged shapes get fresh ids");
}

#[test]
fn test_replace_clears_present_sections() {
    let mut resources = ResourceProvider::new(".");
    let mut scene = sample_scene(&mut resources);

    let doc = SceneDocument::parse(r#"{ "tokens": [], "cameras": [ { "name": "Solo" } ] }"#).unwrap();
    doc.apply_to(&mut scene, &mut resources, false).unwrap();
    assert!(scene.tokens().is_empty());
    assert_eq!(scene.images().len(), 1);
    assert_eq!(scene.cameras().len(), 1);
    // Bindings pointed at the removed cameras.
    assert!(scene.view_camera(ViewId::Editor).is_none());
}

#[test]
fn test_bad_view_bindings_are_skipped() {
    let mut resources = ResourceProvider::new(".");
    let mut scene = Scene::new();
    let doc = SceneDocument::parse(
        r#"{
            "cameras": [ { "name": "Only" } ],
            "views": [
                { "id": "editor", "index": 0 },
                { "id": "presentation", "index": 3 },
                { "id": "sidebar", "index": 0 },
                { "id": "presentation", "index": -1 }
            ]
        }"#,
    )
    .unwrap();
    doc.apply_to(&mut scene, &mut resources, false).unwrap();

    assert_eq!(scene.view_camera(ViewId::Editor).unwrap().name, "Only");
    assert!(scene.view_camera(ViewId::Presentation).is_none());
}

#[test]
fn test_malformed_documents_are_rejected_before_applying() {
    let mut resources = ResourceProvider::new(".");
    let mut scene = sample_scene(&mut resources);

    assert!(matches!(
        SceneDocument::parse("{ not json"),
        Err(SceneError::Parse(_))
    ));

    let bad_statuses =
        SceneDocument::parse(r#"{ "tokens": [ { "statuses": "2" } ] }"#).unwrap();
    assert!(bad_statuses
        .apply_to(&mut scene, &mut resources, false)
        .is_err());
    assert_eq!(scene.tokens().len(), 2);

    let bad_grid = SceneDocument::parse(r#"{ "tokens": [], "grid": { "scale": 0 } }"#).unwrap();
    assert!(matches!(
        bad_grid.apply_to(&mut scene, &mut resources, false),
        Err(SceneError::InvalidDocument { .. })
    ));
    assert_eq!(scene.tokens().len(), 2);
}

#[test]
fn test_load_missing_file_is_read_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut resources = ResourceProvider::new(".");
    let err = load_scene(temp_dir.path().join("absent.json"), &mut resources).unwrap_err();
    assert!(matches!(err, SceneError::Read { .. }));
    assert!(err.is_io_error());
}

#[test]
fn test_selection_document_has_only_selected_shapes() {
    let mut resources = ResourceProvider::new(".");
    let mut scene = sample_scene(&mut resources);
    let ogre = scene.tokens()[1].id();
    scene.token_mut(ogre).unwrap().set_selected(true);

    let doc = SceneDocument::from_scene(&scene, SerializeOptions::selection());
    assert_eq!(doc.tokens.as_ref().unwrap().len(), 1);
    assert_eq!(doc.tokens.as_ref().unwrap()[0].name, "Ogre");
    assert!(doc.images.as_ref().unwrap().is_empty());
    assert!(doc.cameras.is_none());
    assert!(doc.views.is_none());
    assert!(doc.grid.is_none());
    assert!(doc.default_visibility.is_none());
    assert!(doc.tokens_locked.is_none());
}

#[test]
fn test_texture_files_are_measured() {
    let temp_dir = TempDir::new().unwrap();
    let img = image::RgbaImage::new(40, 20);
    img.save(temp_dir.path().join("map.png")).unwrap();

    let mut resources = ResourceProvider::new(temp_dir.path());
    let mut scene = Scene::new();
    let doc = SceneDocument::parse(
        r#"{ "images": [ { "texture": "map.png" }, { "texture": "missing.png" } ] }"#,
    )
    .unwrap();
    doc.apply_to(&mut scene, &mut resources, false).unwrap();

    let map = scene.images()[0].texture().unwrap();
    assert_eq!(map.size(), Some((40, 20)));
    let missing = scene.images()[1].texture().unwrap();
    assert!(!missing.is_valid());
    assert_eq!(missing.key(), "missing.png");
}

fn token_strategy() -> impl Strategy<Value = (f32, f32, f32, f32, String, u8, bool, u32)> {
    (
        -100.0f32..100.0,
        -100.0f32..100.0,
        0.1f32..10.0,
        -180.0f32..180.0,
        "[A-Za-z ]{0,12}",
        any::<u8>(),
        any::<bool>(),
        0u32..4,
    )
}

proptest! {
    #[test]
    fn prop_serialize_round_trip_is_stable(
        tokens in prop::collection::vec(token_strategy(), 0..6),
        grid_scale in 0.1f32..10.0,
        tokens_locked in any::<bool>(),
    ) {
        let mut resources = ResourceProvider::new(".");
        let mut scene = Scene::new();
        scene.grid_mut().set_scale(grid_scale);
        scene.tokens_locked = tokens_locked;
        for (x, y, size, rotation, name, statuses, x_status, visibility) in tokens {
            let id = scene.add_token(None);
            let token = scene.token_mut(id).unwrap();
            token.transform_mut().set_position(Vec2::new(x, y));
            token.transform_mut().set_uniform_scale(size);
            token.transform_mut().set_rotation(rotation);
            token.name = name;
            token.statuses = StatusSet::from_bitstring(&format!("{:08b}", statuses)).unwrap();
            token.x_status = x_status;
            token.set_visibility(Visibility::from_bits(visibility));
        }

        let first = SceneDocument::from_scene(&scene, SerializeOptions::all());
        let json = first.to_json().unwrap();
        let mut loaded = Scene::new();
        SceneDocument::parse(&json)
            .unwrap()
            .apply_to(&mut loaded, &mut resources, false)
            .unwrap();
        let second = SceneDocument::from_scene(&loaded, SerializeOptions::all());
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(json, second.to_json().unwrap());
    }
}
