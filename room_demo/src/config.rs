//! Demo settings

use rigid_world::config::{Config, WorldConfig};
use serde::{Deserialize, Serialize};

/// Room geometry, robot size and the scripted walk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Room width (X)
    pub width: f32,
    /// Room depth (Z)
    pub depth: f32,
    /// Wall height (Y)
    pub height: f32,
    /// Wall thickness
    pub thick: f32,
    /// Robot height
    pub emer_height: f32,
    /// Distance covered by one forward step
    pub move_step: f32,
    /// Degrees turned by one head rotation
    pub rot_step: f32,
    /// Number of forward steps (or physics steps) to simulate
    pub steps: u32,
    /// Drive the robot by integrating velocities with `step_phys` instead of
    /// scripted moves
    pub physics: bool,
    /// Walking speed in physics mode (units per second)
    pub speed: f32,
    /// Seed for the turn-around angles
    pub seed: u64,
    /// Optional `.ron`/`.toml` world description used instead of the built-in room
    pub scene: Option<String>,
    /// Simulation settings
    pub world: WorldConfig,
}

impl Default for RoomConfig {
    fn default() -> Self {
        let emer_height = 1.0;
        Self {
            width: 10.0,
            depth: 15.0,
            height: 2.0,
            thick: 0.2,
            emer_height,
            move_step: emer_height * 0.2,
            rot_step: 15.0,
            steps: 200,
            physics: false,
            speed: 2.0,
            seed: 1,
            scene: None,
            world: WorldConfig::default(),
        }
    }
}

impl Config for RoomConfig {}
