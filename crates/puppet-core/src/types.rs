//! Joint, material and rotation types

use crate::{PuppetError, Result};
use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// A coordinate axis used by scene-description rotations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(&self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

/// Rotation about a single axis, in degrees
pub fn axis_rotation(axis: Axis, degrees: f32) -> Mat4 {
    Mat4::from_axis_angle(axis.unit(), degrees.to_radians())
}

/// Joint rotation matrix, composed as `Rx * Ry` in the joint's local space
pub fn rotation_xy(rotation: Vec2) -> Mat4 {
    Mat4::from_rotation_x(rotation.x) * Mat4::from_rotation_y(rotation.y)
}

/// Legal rotation interval for one joint axis, in radians
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointRange {
    pub min: f32,
    pub init: f32,
    pub max: f32,
}

impl JointRange {
    /// Build a range from degree values without checking ordering
    pub fn from_degrees(min: f64, init: f64, max: f64) -> Self {
        Self {
            min: min.to_radians() as f32,
            init: init.to_radians() as f32,
            max: max.to_radians() as f32,
        }
    }

    /// Build a range from degree values, rejecting non-finite values,
    /// `min > max` and an `init` outside `[min, max]`.
    pub fn checked_from_degrees(node: &str, min: f64, init: f64, max: f64) -> Result<Self> {
        let finite = min.is_finite() && init.is_finite() && max.is_finite();
        if !finite || min > max || init < min || init > max {
            return Err(PuppetError::InvalidJointRange {
                node: node.to_string(),
                min,
                init,
                max,
            });
        }
        Ok(Self::from_degrees(min, init, max))
    }

    /// A fixed range that admits only `value`
    pub fn fixed(value: f32) -> Self {
        Self {
            min: value,
            init: value,
            max: value,
        }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.min(self.max).max(self.min)
    }

    /// True when the axis cannot move at all
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

/// Phong material coefficients. Opaque to the scene tree; read by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub kd: [f32; 3],
    pub ks: [f32; 3],
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            kd: [0.8, 0.8, 0.8],
            ks: [0.0, 0.0, 0.0],
            shininess: 1.0,
        }
    }
}
