//! Editor file operations against a temporary directory.

use tablekit_core::SceneError;
use tablekit_scene::{EditorState, Shape, ViewId};
use tablekit_settings::Config;
use tempfile::TempDir;

fn editor_with_goblin() -> EditorState {
    let mut editor = EditorState::new(Config::default());
    let id = editor.add_token_at_view_centre(None);
    editor.set_token_name(id, "Goblin");
    editor
}

#[test]
fn test_save_without_path_fails() {
    let mut editor = editor_with_goblin();
    assert!(matches!(editor.save(), Err(SceneError::NoFilePath)));
    assert!(editor.is_modified);
}

#[test]
fn test_save_as_then_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("crypt.json");

    let mut editor = editor_with_goblin();
    editor.save_as(&path).unwrap();
    assert!(!editor.is_modified);
    assert_eq!(editor.display_name(), "crypt");
    assert_eq!(editor.scene.file_path.as_deref(), Some(path.as_path()));
    assert_eq!(editor.config().recent_files.first(), Some(&path));

    // Saving again reuses the remembered path.
    editor.set_token_name(editor.scene.tokens()[0].id(), "Hobgoblin");
    assert_eq!(editor.display_name(), "crypt*");
    editor.save().unwrap();

    let mut other = EditorState::new(Config::default());
    other.open(&path).unwrap();
    assert_eq!(other.scene.tokens().len(), 1);
    assert_eq!(other.scene.tokens()[0].name, "Hobgoblin");
    assert_eq!(other.scene_name, "crypt");
    assert!(!other.is_modified);
    assert!(!other.can_undo());
    assert!(other.scene.view_camera(ViewId::Editor).is_some());
    assert!(other.scene.view_camera(ViewId::Presentation).is_some());
}

#[test]
fn test_open_clears_history() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.json");
    editor_with_goblin().save_as(&path).unwrap();

    let mut editor = editor_with_goblin();
    assert!(editor.can_undo());
    editor.open(&path).unwrap();
    assert!(!editor.can_undo());
    assert!(!editor.can_redo());
}

#[test]
fn test_failed_open_keeps_scene() {
    let dir = TempDir::new().unwrap();
    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();

    let mut editor = editor_with_goblin();
    let err = editor.open(&broken).unwrap_err();
    assert!(matches!(err, SceneError::Parse(_)));

    let err = editor.open(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, SceneError::Read { .. }));

    assert_eq!(editor.scene.tokens().len(), 1);
    assert_eq!(editor.scene.tokens()[0].name, "Goblin");
    assert!(editor.is_modified);
    assert!(editor.can_undo());
    assert!(editor.config().recent_files.is_empty());
}

#[test]
fn test_import_merges_and_undoes_as_one() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("monsters.json");

    let mut source = editor_with_goblin();
    source.add_image_at_view_centre(None);
    source.add_token_at_view_centre(None);
    source.scene.grid_mut().set_scale(5.0);
    source.save_as(&path).unwrap();

    let mut editor = editor_with_goblin();
    let existing = editor.scene.tokens()[0].id();
    let created = editor.import(&path).unwrap();

    assert_eq!(created.len(), 3);
    assert_eq!(editor.scene.tokens().len(), 3);
    assert_eq!(editor.scene.images().len(), 1);
    assert!(!created.contains(&existing));
    assert_eq!(editor.selected_count(), 3);
    // Scene-wide settings of the imported file are ignored.
    assert_eq!(editor.scene.grid().scale(), 1.0);
    assert_eq!(editor.history().undo_name(), Some("Import"));

    assert!(editor.undo());
    assert_eq!(editor.scene.tokens().len(), 1);
    assert!(editor.scene.images().is_empty());
    assert_eq!(editor.scene.tokens()[0].id(), existing);

    assert!(editor.redo());
    assert_eq!(editor.scene.tokens().len(), 3);
    assert_eq!(editor.scene.images().len(), 1);
}

#[test]
fn test_import_failure_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, r#"{ "tokens": [{ "name": "Ok" }, { "statuses": "2" }] }"#).unwrap();

    let mut editor = editor_with_goblin();
    let undo_depth = editor.history().undo_depth();
    assert!(editor.import(&broken).is_err());
    assert_eq!(editor.scene.tokens().len(), 1);
    assert_eq!(editor.history().undo_depth(), undo_depth);
}

#[test]
fn test_new_scene_resets() {
    let mut editor = editor_with_goblin();
    editor.select_all();
    editor.new_scene();

    assert!(editor.scene.is_empty());
    assert!(editor.scene.file_path.is_none());
    assert_eq!(editor.display_name(), "Untitled");
    assert!(!editor.can_undo());
    assert_eq!(editor.selected_count(), 0);
    assert!(editor.scene.view_camera(ViewId::Editor).is_some());
}
