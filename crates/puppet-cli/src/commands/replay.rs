//! Headless replay of scripted input events
//!
//! A script is a TOML file with an `[[event]]` array:
//!
//! ```toml
//! [[event]]
//! type = "select"
//! node = "leftUpperArm"
//!
//! [[event]]
//! type = "press"
//! button = "middle"
//!
//! [[event]]
//! type = "move"
//! x = 0.0
//! y = 40.0
//! ```

use super::{format_structured, OutputFormat};
use anyhow::{Context, Result};
use puppet_core::{NodeId, NodeIdAllocator};
use puppet_scene::{load_scene, SceneFile};
use puppet_viewer::{
    BatchInfo, ButtonAction, Key, MeshBatchTable, MouseButton, PickReadback, PuppetController,
    RenderFrame, ViewerConfig,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub struct ReplayArgs {
    pub scene: String,
    pub script: String,
    pub config: Option<String>,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default, rename = "event")]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Event {
    Press { button: MouseButton },
    Release { button: MouseButton },
    Move { x: f64, y: f64 },
    Key { key: String },
    /// Toggle a node by name, as a click on it would
    Select { node: String },
}

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub scene: String,
    pub events: usize,
    pub history_position: usize,
    pub history_len: usize,
    pub selected: Vec<String>,
    pub joints: Vec<JointPose>,
}

#[derive(Debug, Serialize)]
pub struct JointPose {
    pub name: String,
    pub pitch: f32,
    pub yaw: f32,
}

/// No framebuffer exists headlessly, so clicks never resolve to a node.
struct NoFramebuffer;

impl PickReadback for NoFramebuffer {
    fn read_pixel(&mut self, _frame: &RenderFrame, x: u32, y: u32) -> Option<[u8; 3]> {
        log::warn!("Ignoring click at ({}, {}): use a select event when headless", x, y);
        None
    }
}

/// Give every mesh named in the scene a batch so draw commands are produced
fn batches_for(scene: &SceneFile) -> MeshBatchTable {
    let mut meshes: Vec<&str> = Vec::new();
    scene.root.walk(&mut |def| {
        if let Some(mesh) = def.mesh.as_deref() {
            if !meshes.contains(&mesh) {
                meshes.push(mesh);
            }
        }
    });

    let mut batches = MeshBatchTable::new();
    for (i, mesh) in meshes.into_iter().enumerate() {
        batches.insert(
            mesh,
            BatchInfo {
                start_index: i as u32 * 36,
                num_indices: 36,
            },
        );
    }
    batches
}

pub fn replay(
    scene: SceneFile,
    script: &Script,
    config: ViewerConfig,
) -> Result<(PuppetController, usize)> {
    let batches = batches_for(&scene);
    let mut controller = PuppetController::new(scene, batches, config)?;
    let mut reader = NoFramebuffer;
    let mut handled = 0;

    for (index, event) in script.events.iter().enumerate() {
        match event {
            Event::Press { button } => {
                controller.on_mouse_button(*button, ButtonAction::Press);
            }
            Event::Release { button } => {
                controller.on_mouse_button(*button, ButtonAction::Release);
            }
            Event::Move { x, y } => {
                controller.on_mouse_move(*x, *y);
            }
            Event::Key { key } => {
                let parsed = Key::parse(key)
                    .with_context(|| format!("Event {}: unknown key '{}'", index, key))?;
                controller.on_key(parsed);
            }
            Event::Select { node } => {
                let id = controller
                    .tree()
                    .find_by_name(node)
                    .map(|n| n.id())
                    .with_context(|| format!("Event {}: no node named '{}'", index, node))?;
                let outcome = controller.select_node(id);
                log::debug!("select {} -> {:?}", node, outcome);
            }
        }
        controller.process_pending_pick(&mut reader);
        handled += 1;

        if controller.quit_requested() {
            log::info!("Quit requested at event {}", index);
            break;
        }
    }

    Ok((controller, handled))
}

pub fn report(controller: &PuppetController, events: usize) -> ReplayReport {
    let tree = controller.tree();
    let name_of = |id: NodeId| {
        tree.get_node(id)
            .map(|n| n.name.clone())
            .unwrap_or_else(|| id.to_string())
    };

    let joints: Vec<JointPose> = tree
        .joint_ids()
        .into_iter()
        .filter_map(|id| {
            let rotation = tree.joint_rotation(id)?;
            Some(JointPose {
                name: name_of(id),
                pitch: rotation.x.to_degrees(),
                yaw: rotation.y.to_degrees(),
            })
        })
        .collect();

    ReplayReport {
        scene: controller.scene().scene.name.clone(),
        events,
        history_position: controller.history().position(),
        history_len: controller.history().len(),
        selected: controller.selection().joints().map(name_of).collect(),
        joints,
    }
}

pub fn run(args: ReplayArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ViewerConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load config '{}'", path))?,
        None => ViewerConfig::default(),
    };

    let (_, scene) = load_scene(&args.scene, &mut NodeIdAllocator::new())
        .with_context(|| format!("Failed to load scene '{}'", args.scene))?;

    let script_content = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read script '{}'", args.script))?;
    let script: Script = toml::from_str(&script_content)
        .with_context(|| format!("Failed to parse script '{}'", args.script))?;

    let (controller, events) = replay(scene, &script, config)?;
    let report = report(&controller, events);

    match args.format {
        OutputFormat::Text => print_report_text(&report),
        _ => println!("{}", format_structured(&report, args.format)?),
    }

    Ok(())
}

fn print_report_text(report: &ReplayReport) {
    println!("Scene: {} ({} events)", report.scene, report.events);
    println!(
        "History: {}/{} command(s)",
        report.history_position, report.history_len
    );
    if !report.selected.is_empty() {
        println!("Selected: {}", report.selected.join(", "));
    }
    for joint in &report.joints {
        println!(
            "  {:<20} pitch {:>8.2}  yaw {:>8.2}",
            joint.name, joint.pitch, joint.yaw
        );
    }
}
