use std::fmt;

use ember_engine::events::{Event, EventDispatcher, KeyPressedEvent};
use ember_engine::input::Key;
use ember_engine::layer::{Layer, LayerCtx};

/// Editor actions reachable from keyboard shortcuts.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EditorCommand {
    NewScene,
    OpenScene,
    SaveSceneAs,
    Quit,
}

impl fmt::Display for EditorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EditorCommand::NewScene => "new scene",
            EditorCommand::OpenScene => "open scene",
            EditorCommand::SaveSceneAs => "save scene as",
            EditorCommand::Quit => "quit",
        })
    }
}

/// Keyboard shortcuts of the editor.
///
/// | shortcut       | command       |
/// |----------------|---------------|
/// | Ctrl+N         | new scene     |
/// | Ctrl+O         | open scene    |
/// | Ctrl+Shift+S   | save scene as |
/// | Escape         | quit          |
///
/// Auto-repeated presses and every other key pass through unhandled.
#[derive(Debug, Default)]
pub struct EditorLayer {
    history: Vec<EditorCommand>,
    scene_generation: u32,
}

impl EditorLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands executed so far, oldest first.
    pub fn history(&self) -> &[EditorCommand] {
        &self.history
    }

    /// Bumped every time a fresh scene replaces the active one.
    pub fn scene_generation(&self) -> u32 {
        self.scene_generation
    }

    fn on_key_pressed(&mut self, ctx: &mut LayerCtx<'_>, e: &KeyPressedEvent) -> bool {
        if e.is_repeat() {
            return false;
        }

        let control = ctx.is_key_pressed(Key::LeftControl) || ctx.is_key_pressed(Key::RightControl);
        let shift = ctx.is_key_pressed(Key::LeftShift) || ctx.is_key_pressed(Key::RightShift);

        let command = match e.key {
            Key::N if control => EditorCommand::NewScene,
            Key::O if control => EditorCommand::OpenScene,
            Key::S if control && shift => EditorCommand::SaveSceneAs,
            Key::Escape => EditorCommand::Quit,
            _ => return false,
        };

        self.execute(ctx, command);
        true
    }

    fn execute(&mut self, ctx: &mut LayerCtx<'_>, command: EditorCommand) {
        log::info!("editor: {command}");

        match command {
            EditorCommand::NewScene => self.scene_generation += 1,
            // No file dialogs here; the scene stays as it is.
            EditorCommand::OpenScene | EditorCommand::SaveSceneAs => {
                log::warn!("editor: '{command}' has no file dialog on this platform");
            }
            EditorCommand::Quit => ctx.close(),
        }

        self.history.push(command);
    }
}

impl Layer for EditorLayer {
    fn name(&self) -> &str {
        "Editor"
    }

    fn on_event(&mut self, ctx: &mut LayerCtx<'_>, event: &mut Event) {
        let mut dispatcher = EventDispatcher::new(event);
        dispatcher.dispatch::<KeyPressedEvent, _>(|e| self.on_key_pressed(ctx, e));
    }
}
