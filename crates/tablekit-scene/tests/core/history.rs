use glam::Vec2;
use proptest::prelude::*;
use tablekit_core::Visibility;
use tablekit_scene::{Action, ActionStack, Change, Scene, SceneObject, Shape, ShapeId, Token};

fn names(scene: &Scene) -> Vec<String> {
    scene.tokens().iter().map(|t| t.name.clone()).collect()
}

fn rename(scene: &Scene, id: ShapeId, name: &str) -> Action {
    let old = scene.token(id).unwrap().name.clone();
    Action::TokenName(Change::new(id, old, name.to_string()))
}

#[test]
fn test_stack_creation() {
    let stack = ActionStack::new(50);
    assert!(!stack.can_undo());
    assert!(!stack.can_redo());
    assert_eq!(stack.undo_depth(), 0);
    assert_eq!(stack.capacity(), 50);
    assert_eq!(ActionStack::new(0).capacity(), 1);
}

#[test]
fn test_undo_redo_single_action() {
    let mut scene = Scene::new();
    let id = scene.add_token(None);
    let mut stack = ActionStack::default();

    stack.perform(rename(&scene, id, "Goblin"), &mut scene);
    assert_eq!(names(&scene), vec!["Goblin"]);
    assert_eq!(stack.undo_name(), Some("Rename Token"));

    assert!(stack.undo(&mut scene));
    assert_eq!(names(&scene), vec![""]);
    assert!(stack.can_redo());

    assert!(stack.redo(&mut scene));
    assert_eq!(names(&scene), vec!["Goblin"]);
    assert!(!stack.can_redo());
}

#[test]
fn test_new_action_clears_redo() {
    let mut scene = Scene::new();
    let id = scene.add_token(None);
    let mut stack = ActionStack::default();

    stack.perform(rename(&scene, id, "A"), &mut scene);
    stack.undo(&mut scene);
    assert_eq!(stack.redo_depth(), 1);

    stack.perform(rename(&scene, id, "B"), &mut scene);
    assert_eq!(stack.redo_depth(), 0);
    assert!(!stack.redo(&mut scene));
}

#[test]
fn test_capacity_drops_oldest() {
    let mut scene = Scene::new();
    let id = scene.add_token(None);
    let mut stack = ActionStack::new(3);

    for name in ["1", "2", "3", "4", "5"] {
        stack.perform(rename(&scene, id, name), &mut scene);
    }
    assert_eq!(stack.undo_depth(), 3);

    while stack.undo(&mut scene) {}
    // Only the last three renames could be undone.
    assert_eq!(names(&scene), vec!["2"]);

    stack.set_capacity(1);
    assert_eq!(stack.undo_depth(), 0);
    assert_eq!(stack.redo_depth(), 3);

    // Redoing refills the undo stack no deeper than the capacity.
    assert!(stack.redo(&mut scene));
    assert!(stack.redo(&mut scene));
    assert_eq!(names(&scene), vec!["4"]);
    assert_eq!(stack.undo_depth(), 1);
    assert_eq!(stack.redo_depth(), 1);

    assert!(stack.undo(&mut scene));
    assert!(!stack.undo(&mut scene));
    assert_eq!(names(&scene), vec!["3"]);
}

#[test]
fn test_add_and_remove_restore_draw_order() {
    let mut scene = Scene::new();
    let a = scene.add_token(None);
    let b = scene.add_token(None);
    let c = scene.add_token(None);
    let mut stack = ActionStack::default();

    stack.perform(Action::remove(b), &mut scene);
    assert_eq!(scene.tokens().len(), 2);
    assert!(!scene.contains_shape(b));

    stack.undo(&mut scene);
    let order: Vec<_> = scene.tokens().iter().map(|t| t.id()).collect();
    assert_eq!(order, vec![a, b, c]);

    let token = Token::new(scene.allocate_id(), None);
    let added = token.id();
    stack.perform(Action::add(SceneObject::Token(token), 3), &mut scene);
    assert!(scene.contains_shape(added));
    stack.undo(&mut scene);
    assert!(!scene.contains_shape(added));
    stack.redo(&mut scene);
    assert_eq!(scene.draw_index(added), Some(3));
}

#[test]
fn test_grouped_removal_undoes_as_one() {
    let mut scene = Scene::new();
    let ids: Vec<_> = (0..4).map(|_| scene.add_token(None)).collect();
    let mut stack = ActionStack::default();

    stack.perform(
        Action::group("Delete", vec![Action::remove(ids[0]), Action::remove(ids[2])]),
        &mut scene,
    );
    assert_eq!(scene.tokens().len(), 2);
    assert_eq!(stack.undo_name(), Some("Delete"));

    stack.undo(&mut scene);
    let order: Vec<_> = scene.tokens().iter().map(|t| t.id()).collect();
    assert_eq!(order, ids);
}

#[test]
fn test_stale_target_is_skipped() {
    let mut scene = Scene::new();
    let id = scene.add_token(None);
    let mut stack = ActionStack::default();
    let action = rename(&scene, id, "Orc");

    scene.clear_tokens();
    stack.perform(action, &mut scene);
    assert!(stack.undo(&mut scene));
    assert!(scene.tokens().is_empty());
}

#[test]
fn test_grid_and_visibility_actions() {
    let mut scene = Scene::new();
    let id = scene.add_image(None);
    let mut stack = ActionStack::default();

    stack.perform(Action::GridScale { old: 1.0, new: 2.5 }, &mut scene);
    stack.perform(
        Action::Visibility(Change::new(id, Visibility::ALL, Visibility::HOST)),
        &mut scene,
    );
    assert_eq!(scene.grid().scale(), 2.5);
    assert_eq!(scene.image(id).unwrap().visibility(), Visibility::HOST);

    stack.undo(&mut scene);
    stack.undo(&mut scene);
    assert_eq!(scene.grid().scale(), 1.0);
    assert_eq!(scene.image(id).unwrap().visibility(), Visibility::ALL);
}

proptest! {
    #[test]
    fn prop_undo_restores_positions(moves in prop::collection::vec((-50.0f32..50.0, -50.0f32..50.0), 1..20)) {
        let mut scene = Scene::new();
        let id = scene.add_token(None);
        let mut stack = ActionStack::new(moves.len());

        for (x, y) in &moves {
            let old = *scene.token(id).unwrap().transform();
            let mut new = old;
            new.set_position(Vec2::new(*x, *y));
            stack.perform(Action::Transform(Change::new(id, old, new)), &mut scene);
        }
        let (x, y) = moves[moves.len() - 1];
        prop_assert_eq!(scene.token(id).unwrap().transform().position(), Vec2::new(x, y));

        for _ in 0..moves.len() {
            prop_assert!(stack.undo(&mut scene));
        }
        prop_assert_eq!(scene.token(id).unwrap().transform().position(), Vec2::ZERO);
        prop_assert!(!stack.undo(&mut scene));
    }
}
