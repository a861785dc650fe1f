//! PuppetController - input hooks driving the scene tree
//!
//! Owns the session state: the tree and the description it was built
//! from, the joint selection, the command history and the in-flight drag.
//! The windowing layer forwards events here and calls
//! [`PuppetController::process_pending_pick`] once per frame with its
//! GPU readback.

use crate::config::{ViewerConfig, WindowConfig};
use crate::gesture::{is_manipulation_button, DragGesture};
use crate::input::{ButtonAction, ButtonState, Key, MouseButton};
use crate::picking::{self, PickOutcome, PickReadback, Selection};
use crate::render::{render_tree, MeshBatchTable, RenderFrame, RenderMode};
use crate::undo::CommandHistory;
use glam::{Mat4, Vec2};
use puppet_core::{NodeId, NodeIdAllocator, Result};
use puppet_scene::{build_tree, SceneFile, SceneTree};

pub struct PuppetController {
    scene: SceneFile,
    alloc: NodeIdAllocator,
    tree: SceneTree,
    history: CommandHistory,
    selection: Selection,
    batches: MeshBatchTable,
    config: ViewerConfig,
    window: WindowConfig,
    view: Mat4,
    buttons: ButtonState,
    mouse_pos: Vec2,
    gesture: Option<DragGesture>,
    pending_pick: Option<(u32, u32)>,
    quit_requested: bool,
}

impl PuppetController {
    pub fn new(scene: SceneFile, batches: MeshBatchTable, config: ViewerConfig) -> Result<Self> {
        let mut alloc = NodeIdAllocator::new();
        let tree = build_tree(&scene, &mut alloc)?;
        Ok(Self {
            scene,
            alloc,
            tree,
            history: CommandHistory::new(),
            selection: Selection::new(),
            batches,
            window: config.window,
            config,
            view: Mat4::IDENTITY,
            buttons: ButtonState::default(),
            mouse_pos: Vec2::ZERO,
            gesture: None,
            pending_pick: None,
            quit_requested: false,
        })
    }

    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneFile {
        &self.scene
    }

    pub fn set_view(&mut self, view: Mat4) {
        self.view = view;
    }

    /// Current window size in pixels
    pub fn window(&self) -> WindowConfig {
        self.window
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.window = WindowConfig { width, height };
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    /// Cursor moved to window position `(x, y)`. Returns true if consumed.
    pub fn on_mouse_move(&mut self, x: f64, y: f64) -> bool {
        let pos = Vec2::new(x as f32, y as f32);
        let delta = pos - self.mouse_pos;
        self.mouse_pos = pos;

        let Some(button) = self.drag_button() else {
            return false;
        };
        if delta == Vec2::ZERO {
            return true;
        }

        let gesture = self
            .gesture
            .get_or_insert_with(|| DragGesture::begin(&self.tree, &self.selection, button));
        gesture.apply_delta(&mut self.tree, delta, self.config.radians_per_pixel());
        true
    }

    /// Button pressed or released. Returns true if consumed.
    pub fn on_mouse_button(&mut self, button: MouseButton, action: ButtonAction) -> bool {
        self.buttons.set(button, action);

        match (button, action) {
            (MouseButton::Left, ButtonAction::Press) => {
                self.pending_pick = self.cursor_pixel();
                true
            }
            (MouseButton::Left, ButtonAction::Release) => false,
            (_, ButtonAction::Press) => true,
            (_, ButtonAction::Release) => {
                if self.gesture.as_ref().map(|g| g.button()) == Some(button) {
                    self.end_drag();
                }
                true
            }
        }
    }

    /// Keyboard shortcuts. Returns true if consumed.
    ///
    /// Undo and redo are ignored while a drag is in progress.
    pub fn on_key(&mut self, key: Key) -> bool {
        let key = match key {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other,
        };
        match key {
            Key::Char('u') => {
                if self.gesture.is_none() && self.can_undo() {
                    self.undo();
                }
                true
            }
            Key::Char('r') => {
                if self.gesture.is_none() && self.can_redo() {
                    self.redo();
                }
                true
            }
            Key::Char('n') => {
                self.reset_joints();
                true
            }
            Key::Char('a') => {
                if let Err(e) = self.reset_all() {
                    log::error!("Failed to rebuild scene: {}", e);
                }
                true
            }
            Key::Char('q') | Key::Escape => {
                self.quit_requested = true;
                true
            }
            _ => false,
        }
    }

    /// Run the pick queued by the last left click, if any
    pub fn process_pending_pick(&mut self, reader: &mut dyn PickReadback) -> Option<PickOutcome> {
        let (x, y) = self.pending_pick.take()?;
        Some(self.pick_at(x, y, reader))
    }

    pub fn pick_at(&mut self, x: u32, y: u32, reader: &mut dyn PickReadback) -> PickOutcome {
        picking::pick_at(
            &mut self.tree,
            &mut self.selection,
            &self.batches,
            self.view,
            reader,
            x,
            y,
        )
    }

    /// Toggle a node as if it had been picked
    pub fn select_node(&mut self, id: NodeId) -> PickOutcome {
        picking::toggle_pick(&mut self.tree, &mut self.selection, id)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Panics when [`PuppetController::can_undo`] is false
    pub fn undo(&mut self) {
        self.history.undo(&mut self.tree);
    }

    /// Panics when [`PuppetController::can_redo`] is false
    pub fn redo(&mut self) {
        self.history.redo(&mut self.tree);
    }

    /// Rest pose, empty selection, empty history. Not undoable.
    pub fn reset_joints(&mut self) {
        self.gesture = None;
        self.tree.reset_tree();
        self.selection.clear();
        self.history.clear();
        log::info!("Joints reset");
    }

    /// Rebuild the tree from its description. Ids from the old tree go stale.
    pub fn reset_all(&mut self) -> Result<()> {
        let tree = build_tree(&self.scene, &mut self.alloc)?;
        self.tree = tree;
        self.gesture = None;
        self.pending_pick = None;
        self.selection.clear();
        self.history.clear();
        log::info!("Scene rebuilt");
        Ok(())
    }

    pub fn render(&self, mode: RenderMode) -> RenderFrame {
        render_tree(
            &self.tree,
            &self.batches,
            self.view,
            mode,
            self.config.highlight_colour,
        )
    }

    /// The pixel under the cursor, if it lies inside the window
    fn cursor_pixel(&self) -> Option<(u32, u32)> {
        let Vec2 { x, y } = self.mouse_pos;
        let inside = x >= 0.0
            && y >= 0.0
            && x < self.window.width as f32
            && y < self.window.height as f32;
        inside.then(|| (x as u32, y as u32))
    }

    fn drag_button(&self) -> Option<MouseButton> {
        if let Some(gesture) = &self.gesture {
            return Some(gesture.button());
        }
        MouseButton::ALL
            .into_iter()
            .filter(|b| is_manipulation_button(*b))
            .find(|b| self.buttons.is_pressed(*b))
    }

    fn end_drag(&mut self) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        if let Some(command) = gesture.finish(&self.tree) {
            self.history.push(command);
        }
    }
}
