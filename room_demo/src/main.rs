//! Room demo
//!
//! Builds a walled room with a small robot ("emer") in it, walks the robot
//! forward and turns it around whenever the broad phase reports its body near
//! a wall. The walk is either scripted (relative moves propagated with
//! `relative_to_absolute`) or physical (velocities integrated with
//! `step_phys` at the configured step size). Runs headless and logs what
//! happens.
//!
//! Usage: `room_demo [config.toml|config.ron]`

mod config;

use config::RoomConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rigid_world::prelude::*;
use thiserror::Error;

/// Demo errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Settings or scene file could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// World construction failed
    #[error("World error: {0}")]
    World(#[from] WorldError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}

/// Four walls in a new group
fn make_room(world: &mut World, name: &str, width: f32, depth: f32, height: f32, thick: f32) -> Result<NodeId, AppError> {
    let room = world.add_group(world.root(), name)?;
    let walls = [
        ("back-wall", Vec3::new(0.0, height / 2.0, -depth / 2.0), Vec3::new(width, height, thick), "blue"),
        ("left-wall", Vec3::new(-width / 2.0, height / 2.0, 0.0), Vec3::new(thick, height, depth), "red"),
        ("right-wall", Vec3::new(width / 2.0, height / 2.0, 0.0), Vec3::new(thick, height, depth), "green"),
        ("front-wall", Vec3::new(0.0, height / 2.0, depth / 2.0), Vec3::new(width, height, thick), "brown"),
    ];
    for (name, position, size, color) in walls {
        let wall = world.add_box(room, name, size, position)?;
        set_color(world, wall, color)?;
    }
    Ok(room)
}

/// Robot of the given height: a body box and a head group with two eyes
fn make_emer(world: &mut World, height: f32) -> Result<NodeId, AppError> {
    let emer = world.add_group(world.root(), "emer")?;
    let width = height * 0.4;
    let depth = height * 0.15;

    let body = world.add_box(emer, "body", Vec3::new(width, height, depth), Vec3::new(0.0, height / 2.0, 0.0))?;
    set_color(world, body, "purple")?;
    world.set_dynamic(body, true)?;

    let head_size = depth * 1.5;
    let half_head = 0.5 * head_size;
    let head_group = world.add_group(emer, "head")?;
    world
        .get_mut(head_group)?
        .set_initial_position(Vec3::new(0.0, height + half_head, 0.0));

    let head = world.add_box(head_group, "head", Vec3::repeat(head_size), Vec3::zeros())?;
    set_color(world, head, "tan")?;
    world.set_dynamic(head, true)?;

    let eye_size = head_size * 0.2;
    let eye_shape = Vec3::new(eye_size, eye_size * 0.5, eye_size * 0.2);
    let eye_z = -(half_head + eye_size * 0.3);
    for (name, x) in [("eye-l", -half_head * 0.6), ("eye-r", half_head * 0.6)] {
        let eye = world.add_box(head_group, name, eye_shape, Vec3::new(x, head_size * 0.1, eye_z))?;
        set_color(world, eye, "green")?;
        world.set_dynamic(eye, true)?;
    }
    Ok(emer)
}

fn set_color(world: &mut World, id: NodeId, color: &str) -> Result<(), AppError> {
    match world.get_mut(id)?.body_mut() {
        Some(body) => {
            body.color = color.to_string();
            Ok(())
        }
        None => Err(AppError::Custom(format!("cannot color non-body node {id:?}"))),
    }
}

/// Scripted walk through the room
struct RoomDemo {
    config: RoomConfig,
    world: World,
    emer: NodeId,
    rng: StdRng,
    turns: u32,
}

impl RoomDemo {
    fn new(config: RoomConfig) -> Result<Self, AppError> {
        let mut world = match &config.scene {
            Some(path) => {
                log::info!("Loading scene from '{}'", path);
                World::from_description(&WorldDescription::load_from_file(path)?)?
            }
            None => {
                let mut world = World::new("RoomWorld");
                make_room(&mut world, "room1", config.width, config.depth, config.height, config.thick)?;
                make_emer(&mut world, config.emer_height)?;
                world
            }
        };
        let emer = world
            .find_by_name("emer")
            .ok_or_else(|| AppError::Custom("world has no 'emer' group".to_string()))?;
        world.init();
        log::info!("World '{}' ready: {} nodes", world.name(), world.node_count());

        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            world,
            emer,
            rng,
            turns: 0,
        })
    }

    /// Whether the robot's body is among the broad-phase candidates
    fn body_hit(&self) -> Result<bool, AppError> {
        let contacts = self.world.collide(self.config.world.dynamic_layout);

        let mut hit = false;
        for list in &contacts {
            for contact in list {
                let a = &self.world.get(contact.a)?.name;
                let b = &self.world.get(contact.b)?.name;
                log::debug!("A: {}  B: {}", a, b);
                hit |= a == "body";
            }
        }
        Ok(hit)
    }

    /// Random turn-around angle in degrees
    fn turn_angle(&mut self) -> f32 {
        let angle = 100.0 + 90.0 * self.rng.gen::<f32>();
        log::info!("Hit wall: turning {:.1} degrees", angle);
        self.turns += 1;
        angle
    }

    /// Propagate scripted motion and turn around on contact
    fn world_step(&mut self) -> Result<(), AppError> {
        self.world.relative_to_absolute();
        if self.body_hit()? {
            let angle = self.turn_angle();
            self.world
                .get_mut(self.emer)?
                .relative
                .rotate_on_axis(Vec3::new(0.0, 1.0, 0.0), angle);
        }
        Ok(())
    }

    /// Give every robot body the walking velocity, in world axes
    fn launch(&mut self) -> Result<(), AppError> {
        let velocity = Vec3::new(0.0, 0.0, -self.config.speed);
        for id in self.world.bodies_under(self.emer) {
            self.world.get_mut(id)?.absolute.linear_velocity = velocity;
        }
        Ok(())
    }

    /// Integrate one physics step and turn the velocities around on contact
    fn physics_step(&mut self) -> Result<(), AppError> {
        self.world.step_phys(self.config.world.step_size);
        if self.body_hit()? {
            let turn = Quat::from_axis_angle(&Vec3::y_axis(), self.turn_angle().to_radians());
            for id in self.world.bodies_under(self.emer) {
                let pose = &mut self.world.get_mut(id)?.absolute;
                pose.linear_velocity = turn * pose.linear_velocity;
            }
        }
        Ok(())
    }

    /// Move forward in the current facing direction
    fn step_forward(&mut self) -> Result<(), AppError> {
        let step = self.config.move_step;
        self.world
            .get_mut(self.emer)?
            .relative
            .move_on_axis(Vec3::new(0.0, 0.0, 1.0), -step);
        self.world_step()
    }

    /// Turn the head about the vertical axis
    fn rotate_head(&mut self, degrees: f32) -> Result<(), AppError> {
        let head = self
            .world
            .child_by_name(self.emer, "head")
            .ok_or_else(|| AppError::Custom("emer has no head".to_string()))?;
        self.world
            .get_mut(head)?
            .relative
            .rotate_on_axis(Vec3::new(0.0, 1.0, 0.0), degrees);
        self.world_step()
    }

    fn run(&mut self) -> Result<(), AppError> {
        if self.config.physics {
            self.launch()?;
            for _ in 0..self.config.steps {
                self.physics_step()?;
            }
        } else {
            for step in 0..self.config.steps {
                self.step_forward()?;
                if step % 10 == 5 {
                    let degrees = if step % 20 == 5 { self.config.rot_step } else { -self.config.rot_step };
                    self.rotate_head(degrees)?;
                }
            }
        }

        let body = self
            .world
            .child_by_name(self.emer, "body")
            .ok_or_else(|| AppError::Custom("emer has no body".to_string()))?;
        let position = self.world.get(body)?.absolute.position;
        log::info!(
            "Walked {} steps, turned {} times; body at ({:.2}, {:.2}, {:.2})",
            self.config.steps,
            self.turns,
            position.x,
            position.y,
            position.z
        );

        if let Some(eye) = self.world.find_by_name("eye-l") {
            if let Some(camera) = self.world.capture_pose(eye) {
                log::info!("Left eye camera at {:?}", camera.position);
            }
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "room_demo.toml".to_string());
    let config = RoomConfig::load_or_default(&config_path)?;
    log::info!("Room {}x{}, {} steps of {}", config.width, config.depth, config.steps, config.move_step);

    let mut demo = RoomDemo::new(config)?;
    demo.run()?;
    Ok(())
}
