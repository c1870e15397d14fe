//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Single-writer world state
//! - Output goes through the sink traits, never to a platform API

pub mod ammo;
pub mod collision;
pub mod grid;
pub mod state;
pub mod tick;

pub use ammo::AmmoRegulator;
pub use grid::Grid;
pub use state::{
    Entity, GameData, GameEvent, GameOverReason, GamePhase, GameWorld, Invader, Obstacle,
    Particle, Player, Projectile, Star, Viewport,
};
pub use tick::{Control, InputState, tick};
