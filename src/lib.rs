//! Gridfall - a Space Invaders style arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, game state)
//! - `render` / `hud` / `audio`: Sink traits the hosting shell implements
//! - `tuning`: Data-driven game balance
//! - `scoreboard`: In-memory session leaderboard

pub mod audio;
pub mod hud;
pub mod render;
pub mod scoreboard;
pub mod sim;
pub mod tuning;

pub use scoreboard::ScoreBoard;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Player ship dimensions
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 24.0;
    /// Gap between the ship and the bottom of the screen
    pub const PLAYER_BOTTOM_MARGIN: f32 = 30.0;

    /// Invader dimensions and formation spacing
    pub const INVADER_WIDTH: f32 = 24.0;
    pub const INVADER_HEIGHT: f32 = 20.0;
    pub const FORMATION_PADDING: f32 = 8.0;
    /// Distance from the screen top to the formation's first row
    pub const FORMATION_TOP: f32 = 60.0;

    /// Formation dimensions always clamp into this range
    pub const GRID_MIN_DIM: u32 = 2;
    pub const GRID_MAX_DIM: u32 = 8;
    /// Fresh formations roll a random base dimension in [GRID_MIN_DIM, GRID_BASE_MAX]
    pub const GRID_BASE_MAX: u32 = 5;

    /// Projectile dimensions
    pub const PROJECTILE_WIDTH: f32 = 3.0;
    pub const PROJECTILE_HEIGHT: f32 = 10.0;
    /// Updates between the projectile's two animation frames (cosmetic)
    pub const PROJECTILE_FRAME_INTERVAL: u8 = 6;

    /// Obstacle dimensions
    pub const OBSTACLE_WIDTH: f32 = 100.0;
    pub const OBSTACLE_HEIGHT: f32 = 20.0;
    /// Obstacle pair: vertical placement above the bottom edge
    pub const OBSTACLE_RAISE: f32 = 250.0;
    /// Obstacle pair: horizontal offset from center, as a viewport fraction
    pub const OBSTACLE_SPREAD: f32 = 0.15;

    /// Score awarded per destroyed invader
    pub const INVADER_REWARD: u32 = 10;

    /// Explosion particles
    pub const PARTICLE_RADIUS: f32 = 2.0;
    /// Burst velocity range, +/- px/s on each axis
    pub const BURST_SPREAD: f32 = 45.0;
    /// Opacity lost per second (full fade in ~1.7s)
    pub const PARTICLE_FADE: f32 = 0.6;
    /// Particles in an invader-kill burst
    pub const INVADER_BURST: usize = 10;
    /// Particles in the three game-over bursts
    pub const DEATH_BURST_PRIMARY: usize = 10;
    pub const DEATH_BURST_ACCENT: usize = 5;

    /// Background star count
    pub const NUM_STARS: usize = 100;

    /// Palette (0xRRGGBB)
    pub const COLOR_INVADER_BURST: u32 = 0x941CFF;
    pub const COLOR_WHITE: u32 = 0xFFFFFF;
    pub const COLOR_PLAYER_ACCENT: u32 = 0x4D9BE6;
    pub const COLOR_CRIMSON: u32 = 0xDC143C;
    pub const COLOR_PROJECTILE: u32 = 0xFF8C00;
    pub const COLOR_PROJECTILE_ALT: u32 = 0xFFD54F;
    pub const COLOR_PLAYER: u32 = 0x5CE65C;
    pub const COLOR_INVADER: u32 = 0xE64D4D;
    /// Glow radius applied to projectile draws
    pub const PROJECTILE_GLOW: f32 = 12.0;
}
