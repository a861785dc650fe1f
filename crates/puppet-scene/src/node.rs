//! Scene node variants

use glam::{Mat4, Vec2, Vec3};
use puppet_core::{axis_rotation, rotation_xy, Axis, JointRange, Material, NodeId, NodeIdAllocator};
use std::fmt;

/// Name of the joint that gets head-specific drag handling
pub const HEAD_JOINT_NAME: &str = "neckJoint";

/// A drawable mesh reference with its material
#[derive(Debug, Clone)]
pub struct GeometryNode {
    mesh_id: String,
    pub material: Material,
    parent_joint: Option<NodeId>,
}

impl GeometryNode {
    pub fn new(mesh_id: impl Into<String>) -> Self {
        Self {
            mesh_id: mesh_id.into(),
            material: Material::default(),
            parent_joint: None,
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn mesh_id(&self) -> &str {
        &self.mesh_id
    }

    /// The nearest articulated ancestor joint, set by `SceneTree::initialize_tree`
    pub fn parent_joint(&self) -> Option<NodeId> {
        self.parent_joint
    }

    pub(crate) fn set_parent_joint(&mut self, joint: Option<NodeId>) {
        self.parent_joint = joint;
    }
}

/// A two-axis articulation with clamped rotation.
///
/// `rotation.x` is pitch, `rotation.y` is yaw, both in radians. Every write
/// goes through [`JointNode::set_rotation`], so the stored rotation always
/// lies inside both ranges.
#[derive(Debug, Clone)]
pub struct JointNode {
    rotation: Vec2,
    x_range: JointRange,
    y_range: JointRange,
}

impl JointNode {
    pub fn new() -> Self {
        Self {
            rotation: Vec2::ZERO,
            x_range: JointRange::fixed(0.0),
            y_range: JointRange::fixed(0.0),
        }
    }

    /// Set the pitch range in degrees and move pitch to its rest value
    pub fn set_joint_x(&mut self, min: f64, init: f64, max: f64) {
        self.set_x_range(JointRange::from_degrees(min, init, max));
    }

    /// Set the yaw range in degrees and move yaw to its rest value
    pub fn set_joint_y(&mut self, min: f64, init: f64, max: f64) {
        self.set_y_range(JointRange::from_degrees(min, init, max));
    }

    pub fn set_x_range(&mut self, range: JointRange) {
        self.x_range = range;
        self.rotation.x = range.init;
    }

    pub fn set_y_range(&mut self, range: JointRange) {
        self.y_range = range;
        self.rotation.y = range.init;
    }

    pub fn x_range(&self) -> JointRange {
        self.x_range
    }

    pub fn y_range(&self) -> JointRange {
        self.y_range
    }

    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    /// Clamp each component to its range and store it. Returns the stored value.
    pub fn set_rotation(&mut self, rotation: Vec2) -> Vec2 {
        self.rotation = Vec2::new(self.x_range.clamp(rotation.x), self.y_range.clamp(rotation.y));
        self.rotation
    }

    pub fn init_rotation(&self) -> Vec2 {
        Vec2::new(self.x_range.init, self.y_range.init)
    }

    pub fn reset(&mut self) {
        self.set_rotation(self.init_rotation());
    }

    /// False for helper joints that cannot move on either axis
    pub fn is_articulated(&self) -> bool {
        !(self.x_range.is_degenerate() && self.y_range.is_degenerate())
    }

    pub fn rotation_matrix(&self) -> Mat4 {
        rotation_xy(self.rotation)
    }
}

impl Default for JointNode {
    fn default() -> Self {
        Self::new()
    }
}

/// The concrete variant of a scene node
#[derive(Debug, Clone)]
pub enum NodeKind {
    Plain,
    Geometry(GeometryNode),
    Joint(JointNode),
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Plain => "SceneNode",
            NodeKind::Geometry(_) => "GeometryNode",
            NodeKind::Joint(_) => "JointNode",
        }
    }
}

/// A node in the scene tree. Children are owned exclusively.
#[derive(Debug, Clone)]
pub struct SceneNode {
    id: NodeId,
    pub name: String,
    transform: Mat4,
    selected: bool,
    kind: NodeKind,
    children: Vec<SceneNode>,
}

impl SceneNode {
    fn with_kind(alloc: &mut NodeIdAllocator, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: alloc.next_id(),
            name: name.into(),
            transform: Mat4::IDENTITY,
            selected: false,
            kind,
            children: Vec::new(),
        }
    }

    pub fn new_plain(alloc: &mut NodeIdAllocator, name: impl Into<String>) -> Self {
        Self::with_kind(alloc, name, NodeKind::Plain)
    }

    pub fn new_geometry(
        alloc: &mut NodeIdAllocator,
        name: impl Into<String>,
        geometry: GeometryNode,
    ) -> Self {
        Self::with_kind(alloc, name, NodeKind::Geometry(geometry))
    }

    pub fn new_joint(alloc: &mut NodeIdAllocator, name: impl Into<String>, joint: JointNode) -> Self {
        Self::with_kind(alloc, name, NodeKind::Joint(joint))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub fn as_joint(&self) -> Option<&JointNode> {
        match &self.kind {
            NodeKind::Joint(joint) => Some(joint),
            _ => None,
        }
    }

    pub fn as_joint_mut(&mut self) -> Option<&mut JointNode> {
        match &mut self.kind {
            NodeKind::Joint(joint) => Some(joint),
            _ => None,
        }
    }

    pub fn as_geometry(&self) -> Option<&GeometryNode> {
        match &self.kind {
            NodeKind::Geometry(geometry) => Some(geometry),
            _ => None,
        }
    }

    pub fn as_geometry_mut(&mut self) -> Option<&mut GeometryNode> {
        match &mut self.kind {
            NodeKind::Geometry(geometry) => Some(geometry),
            _ => None,
        }
    }

    /// True for the joint named [`HEAD_JOINT_NAME`]
    pub fn is_head(&self) -> bool {
        self.as_joint().is_some() && self.name == HEAD_JOINT_NAME
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn toggle_selected(&mut self) -> bool {
        self.selected = !self.selected;
        self.selected
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [SceneNode] {
        &mut self.children
    }

    /// Base transform set at construction (excludes joint rotation)
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub fn set_transform(&mut self, m: Mat4) {
        self.transform = m;
    }

    /// Transform relative to the parent. Joints append their current rotation.
    pub fn local_transform(&self) -> Mat4 {
        match &self.kind {
            NodeKind::Joint(joint) => self.transform * joint.rotation_matrix(),
            _ => self.transform,
        }
    }

    pub fn rotate(&mut self, axis: Axis, degrees: f32) {
        self.transform = axis_rotation(axis, degrees) * self.transform;
    }

    pub fn scale(&mut self, amount: Vec3) {
        self.transform = Mat4::from_scale(amount) * self.transform;
    }

    pub fn translate(&mut self, amount: Vec3) {
        self.transform = Mat4::from_translation(amount) * self.transform;
    }

    /// Number of nodes in this subtree, including self
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(SceneNode::subtree_len).sum::<usize>()
    }
}

impl fmt::Display for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:[name:{}, id:{}]", self.kind.label(), self.name, self.id)
    }
}
