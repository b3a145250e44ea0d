pub mod canvas;
pub mod drag;
pub mod input;
pub mod inventory;
pub mod layers;
pub mod placement;
pub mod session;
pub mod shortcuts;
pub mod tools;

pub use canvas::{EditorCanvas, EditorState};
pub use drag::{DragController, DragState};
pub use input::{InputEvent, Modifiers};
pub use layers::{LayerEvent, LayerGroups};
pub use session::{Applied, DesignMutation, Session};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::{Tool, ToolContext, ToolKind};
