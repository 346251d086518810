//! Visual adapter seam
//!
//! The core never draws. It writes per-instance state through `DieVisual`;
//! a backend either implements the trait on its own sprite objects or
//! uploads `DieInstance` structs straight into an instance buffer.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Vec3};

use crate::dice::Die;
use crate::island::Resource;

/// Per-instance state the core writes for a die
pub trait DieVisual {
    fn set_position(&mut self, pos: Vec3);
    fn set_orientation(&mut self, rotation: Mat3);
    fn set_scale(&mut self, scale: f32);
    fn set_color(&mut self, color: [f32; 4]);
}

/// GPU instance data for one die (80 bytes, no padding)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DieInstance {
    pub position: [f32; 3],
    pub scale: f32,
    /// Rotation matrix columns, each padded to four floats
    pub rotation: [[f32; 4]; 3],
    pub color: [f32; 4],
}

impl Default for DieInstance {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            scale: 1.0,
            rotation: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
            ],
            color: colors::DIE,
        }
    }
}

impl DieInstance {
    /// Rotation as a matrix
    pub fn orientation(&self) -> Mat3 {
        let [x, y, z] = self.rotation;
        Mat3::from_cols(
            Vec3::new(x[0], x[1], x[2]),
            Vec3::new(y[0], y[1], y[2]),
            Vec3::new(z[0], z[1], z[2]),
        )
    }
}

impl DieVisual for DieInstance {
    fn set_position(&mut self, pos: Vec3) {
        self.position = pos.to_array();
    }

    fn set_orientation(&mut self, rotation: Mat3) {
        self.rotation = [
            rotation.x_axis.extend(0.0).to_array(),
            rotation.y_axis.extend(0.0).to_array(),
            rotation.z_axis.extend(0.0).to_array(),
        ];
    }

    fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    fn set_color(&mut self, color: [f32; 4]) {
        self.color = color;
    }
}

/// Copy a die's pose into its visual; settled dice are tinted
pub fn sync_die(die: &Die, visual: &mut impl DieVisual) {
    visual.set_position(die.pos);
    visual.set_orientation(Mat3::from_quat(die.rotation));
    visual.set_scale(die.size);
    visual.set_color(if die.locked { colors::DIE_LOCKED } else { colors::DIE });
}

/// Instance data for a whole set of dice
pub fn die_instances(dice: &[Die]) -> Vec<DieInstance> {
    dice.iter()
        .map(|die| {
            let mut instance = DieInstance::default();
            sync_die(die, &mut instance);
            instance
        })
        .collect()
}

/// HUD color of a resource
pub fn resource_color(resource: Resource) -> [f32; 4] {
    match resource {
        Resource::Food => colors::FOOD,
        Resource::Magic => colors::MAGIC,
        Resource::Cube => colors::CUBE,
        Resource::Thing => colors::THING,
    }
}

/// Colors for game elements
pub mod colors {
    pub const DIE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const DIE_LOCKED: [f32; 4] = [0.85, 0.9, 1.0, 1.0];
    pub const FOOD: [f32; 4] = [0.9, 0.4, 0.1, 1.0];
    pub const MAGIC: [f32; 4] = [0.1, 0.7, 0.9, 1.0];
    pub const CUBE: [f32; 4] = [0.8, 0.9, 0.1, 1.0];
    pub const THING: [f32; 4] = [0.9, 1.0, 1.0, 1.0];
}
