use anyhow::Context;
use std::path::PathBuf;
use tablekit::{init_logging, Config, EditorState, Shape, ViewId, BUILD_DATE, VERSION};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logging()?;
    tracing::info!("Tablekit {} (built {})", VERSION, BUILD_DATE);

    let config_path = Config::default_path().context("Locating the config file")?;
    let config = Config::load_or_default(&config_path);
    let mut editor = EditorState::new(config);

    if let Some(scene_path) = std::env::args_os().nth(1).map(PathBuf::from) {
        editor
            .open(&scene_path)
            .with_context(|| format!("Opening {}", scene_path.display()))?;
        editor.frame_scene();
    }

    let scene = &editor.scene;
    let hidden_from_players = scene
        .shapes()
        .filter(|s| !s.is_visible_to(ViewId::Presentation.role()))
        .count();
    tracing::info!(
        "{}: {} tokens, {} images, grid {} ({} hidden from players)",
        editor.display_name(),
        scene.tokens().len(),
        scene.images().len(),
        scene.grid().scale(),
        hidden_from_players
    );

    editor
        .config()
        .save_to_file(&config_path)
        .with_context(|| format!("Saving {}", config_path.display()))?;

    Ok(())
}
