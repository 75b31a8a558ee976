//! # Tablekit Scene
//!
//! The scene model of the tabletop editor and everything that edits it.
//!
//! ## Core Components
//!
//! ### Scene Elements
//! - **Tokens**: Circular textured pieces with a name, border, status markers and opacity
//! - **Background images**: Textured quads drawn under the grid
//! - **Overlays**: Transient rectangles such as the drag-select box
//! - **Grid**: Cell size plus size and position snapping
//! - **Cameras**: Orthographic or perspective, bound to the editor and presentation views
//!
//! ### Editing
//! - **Selection**: Click, additive click and drag-select with hover highlight
//! - **History/Undo-Redo**: Bounded action stack of reversible actions
//! - **Persistence**: JSON scene documents with merge-loading for import and paste
//! - **Editor state**: Input handling, clipboard and file operations
//!
//! ## Architecture
//!
//! ```text
//! EditorState (input, clipboard, files)
//!   ├── Scene
//!   │     ├── Tokens / Images / Overlays (Shape trait)
//!   │     ├── Grid
//!   │     └── Cameras + view bindings
//!   ├── SelectionManager
//!   └── ActionStack (undo/redo)
//!
//! RenderBackend (implemented by the windowing layer)
//! ```
//!
//! World coordinates are Y-up with the grid origin at (0, 0). Screen
//! coordinates are framebuffer pixels with the origin at the top-left.

pub mod camera;
pub mod commands;
pub mod editor;
pub mod grid;
pub mod history;
pub mod input;
pub mod render;
pub mod scene;
pub mod selection;
pub mod serialization;
pub mod shapes;
pub mod transform;
pub mod viewport;

pub use camera::{Camera, CameraId};
pub use commands::{Action, Change};
pub use editor::EditorState;
pub use grid::{Grid, SizeCategory};
pub use history::ActionStack;
pub use input::{Button, InputEvent, Key, Modifiers};
pub use render::{MeshKind, RenderBackend, ShaderKind, Uniform};
pub use scene::{Scene, SceneObject, ViewId};
pub use selection::{SelectState, SelectionManager};
pub use serialization::{load_scene, save_scene, SceneDocument, SerializeOptions};
pub use shapes::{BgImage, Bounds, RectOverlay, Shape, ShapeBase, ShapeId, StatusMarker, StatusSet, Token};
pub use transform::Transform2D;
pub use viewport::Viewport;
