//! Game state and core simulation types
//!
//! Everything the tick mutates lives here: the entity collections, the run
//! counters, and the lifecycle transitions between phases.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::ammo::AmmoRegulator;
use super::grid::Grid;
use crate::consts::*;
use crate::render::RenderSink;
use crate::scoreboard::ScoreBoard;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen: background animates, no simulation
    Start,
    /// Active gameplay
    Playing,
    /// Run ended; formation and particles keep animating until restart
    GameOver,
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// Invader projectile reached the ship
    PlayerShot,
    /// An invader descended into the ship's band
    InvaderContact,
    /// Phase timer ran out
    TimeUp,
}

/// Events raised during a tick, drained at the start of the next one.
///
/// The tick also maps these onto audio cues, so hosts that only care about
/// sound never need to read them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ShotFired,
    InvaderDestroyed { pos: Vec2 },
    WaveCleared { level: u32 },
    GameOver { reason: GameOverReason, score: u32 },
}

/// Capability contract shared by every entity kind.
///
/// `update` covers autonomous per-entity motion only. Entities whose movement
/// is driven from outside (formation invaders, the input-steered player) keep
/// the default no-op and are advanced by their owner.
pub trait Entity {
    fn update(&mut self, _dt: f32) {}
    fn draw(&self, sink: &mut dyn RenderSink);
}

/// Screen dimensions, read once at startup from the hosting viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Terminal once false, until restart
    pub alive: bool,
}

impl Player {
    pub fn new(bounds: &Viewport) -> Self {
        Self {
            pos: Self::spawn_pos(bounds),
            vel: Vec2::ZERO,
            alive: true,
        }
    }

    /// Bottom-center resting position
    pub fn spawn_pos(bounds: &Viewport) -> Vec2 {
        Vec2::new(
            bounds.width / 2.0 - PLAYER_WIDTH / 2.0,
            bounds.height - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN,
        )
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size() / 2.0
    }

    /// Append an upward projectile from the ship's nose
    pub fn shoot(&self, out: &mut Vec<Projectile>, speed: f32) {
        let nose = Vec2::new(
            self.pos.x + PLAYER_WIDTH / 2.0 - PROJECTILE_WIDTH / 2.0,
            self.pos.y,
        );
        out.push(Projectile::new(nose, -speed.abs()));
    }
}

impl Entity for Player {
    fn draw(&self, sink: &mut dyn RenderSink) {
        sink.fill_rect(self.pos, self.size(), COLOR_PLAYER, 1.0, 0.0);
    }
}

/// A single formation invader. Liveness is membership in `Grid::invaders`;
/// there is no tombstone flag.
#[derive(Debug, Clone)]
pub struct Invader {
    pub pos: Vec2,
    /// Formation slot, fixed at spawn
    pub row: u32,
    pub col: u32,
}

impl Invader {
    pub fn new(pos: Vec2, row: u32, col: u32) -> Self {
        Self { pos, row, col }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(INVADER_WIDTH, INVADER_HEIGHT)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size() / 2.0
    }

    /// Append a downward projectile from the invader's underside
    pub fn shoot(&self, out: &mut Vec<Projectile>, speed: f32) {
        let muzzle = Vec2::new(
            self.pos.x + INVADER_WIDTH / 2.0 - PROJECTILE_WIDTH / 2.0,
            self.pos.y + INVADER_HEIGHT,
        );
        out.push(Projectile::new(muzzle, speed.abs()));
    }
}

impl Entity for Invader {
    fn draw(&self, sink: &mut dyn RenderSink) {
        sink.fill_rect(self.pos, self.size(), COLOR_INVADER, 1.0, 0.0);
    }
}

/// A projectile from either side.
///
/// Velocity is a scalar: negative moves up (player shots), positive moves
/// down (invader shots). The two-frame animation is cosmetic only.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: f32,
    frame: u8,
    frame_counter: u8,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: f32) -> Self {
        Self {
            pos,
            vel,
            frame: 0,
            frame_counter: 0,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT)
    }
}

impl Entity for Projectile {
    fn update(&mut self, dt: f32) {
        self.pos.y += self.vel * dt;

        self.frame_counter += 1;
        if self.frame_counter >= PROJECTILE_FRAME_INTERVAL {
            self.frame = (self.frame + 1) % 2;
            self.frame_counter = 0;
        }
    }

    fn draw(&self, sink: &mut dyn RenderSink) {
        if self.frame == 0 {
            sink.fill_rect(self.pos, self.size(), COLOR_PROJECTILE, 1.0, PROJECTILE_GLOW);
        } else {
            let radius = PROJECTILE_WIDTH.max(PROJECTILE_HEIGHT) * 0.6;
            sink.fill_circle(
                self.pos + self.size() / 2.0,
                radius,
                COLOR_PROJECTILE_ALT,
                1.0,
                PROJECTILE_GLOW,
            );
        }
    }
}

/// A destructible barrier. Absorbs projectiles; demolished by invader contact.
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub pos: Vec2,
    pub color: u32,
}

impl Obstacle {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            color: COLOR_CRIMSON,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT)
    }
}

impl Entity for Obstacle {
    fn draw(&self, sink: &mut dyn RenderSink) {
        sink.fill_rect(self.pos, self.size(), self.color, 1.0, 0.0);
    }
}

/// An explosion particle. Removed once opacity decays to zero.
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: u32,
    pub opacity: f32,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, color: u32) -> Self {
        Self {
            pos,
            vel,
            radius,
            color,
            opacity: 1.0,
        }
    }
}

impl Entity for Particle {
    fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.opacity -= PARTICLE_FADE * dt;
    }

    fn draw(&self, sink: &mut dyn RenderSink) {
        sink.fill_circle(self.pos, self.radius, self.color, self.opacity.max(0.0), 0.0);
    }
}

/// Maximum particles alive at once
pub const MAX_PARTICLES: usize = 256;

/// Background decoration; drifts down and wraps, never interacts
#[derive(Debug, Clone)]
pub struct Star {
    pub pos: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub opacity: f32,
}

impl Star {
    pub fn new<R: Rng>(rng: &mut R, bounds: &Viewport) -> Self {
        Self {
            pos: Vec2::new(
                rng.random_range(0.0..bounds.width),
                rng.random_range(0.0..bounds.height),
            ),
            speed: rng.random_range(20.0..80.0),
            radius: rng.random_range(1.0..2.5),
            opacity: rng.random_range(0.3..1.0),
        }
    }
}

impl Entity for Star {
    fn update(&mut self, dt: f32) {
        self.pos.y += self.speed * dt;
    }

    fn draw(&self, sink: &mut dyn RenderSink) {
        sink.fill_circle(self.pos, self.radius, COLOR_WHITE, self.opacity, 0.0);
    }
}

/// Run counters shown on the HUD
#[derive(Debug, Clone, Default)]
pub struct GameData {
    /// Monotonic within a run; zeroed on restart
    pub score: u32,
    /// Session best, survives restarts
    pub high_score: u32,
    pub level: u32,
    pub kills: u32,
    /// Phase countdown in seconds; unused when the timer is disabled
    pub time_left: f32,
}

impl GameData {
    /// Add to the score, keeping the session high water mark current
    pub fn add_score(&mut self, amount: u32) {
        self.score += amount;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }
}

/// Fixed-period schedule for autonomous enemy fire.
///
/// Owned by the world and advanced by the tick, so the resulting appends can
/// never interleave with collection iteration. Lifecycle transitions arm and
/// cancel it.
#[derive(Debug, Clone)]
pub struct FireScheduler {
    period: f32,
    elapsed: f32,
    armed: bool,
}

impl FireScheduler {
    pub fn new(period: f32) -> Self {
        Self {
            period: period.max(0.05),
            elapsed: 0.0,
            armed: false,
        }
    }

    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Disarm and drop any accumulated time
    pub fn cancel(&mut self) {
        self.armed = false;
        self.elapsed = 0.0;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Advance by dt, returning how many shots came due
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.armed {
            return 0;
        }
        self.elapsed += dt;
        let mut due = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            due += 1;
        }
        due
    }
}

/// Complete game state: the single-writer context the tick mutates
#[derive(Debug, Clone)]
pub struct GameWorld {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub data: GameData,
    pub bounds: Viewport,
    pub tuning: Tuning,
    pub player: Player,
    pub grid: Grid,
    pub ammo: AmmoRegulator,
    pub player_projectiles: Vec<Projectile>,
    pub invader_projectiles: Vec<Projectile>,
    pub obstacles: Vec<Obstacle>,
    /// Visual only, never gameplay-affecting
    pub particles: Vec<Particle>,
    pub stars: Vec<Star>,
    /// Raised this tick, cleared at the start of the next
    pub events: Vec<GameEvent>,
    pub scoreboard: ScoreBoard,
    pub fire_schedule: FireScheduler,
    /// Simulation tick counter, monotonic across restarts
    pub tick_count: u64,
    pub(crate) rng: Pcg32,
}

impl GameWorld {
    /// Create a world in the `Start` phase with a populated first wave
    pub fn new(bounds: Viewport, mut tuning: Tuning, seed: u64) -> Self {
        tuning.sanitize();

        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = (0..NUM_STARS).map(|_| Star::new(&mut rng, &bounds)).collect();

        let rows = rng.random_range(GRID_MIN_DIM..=GRID_BASE_MAX);
        let cols = rng.random_range(GRID_MIN_DIM..=GRID_BASE_MAX);
        let mut grid = Grid::new(rows, cols, tuning.invader_speed, tuning.descent_step);
        grid.restart(tuning.invader_speed, &bounds);

        Self {
            seed,
            phase: GamePhase::Start,
            data: GameData {
                level: 1,
                time_left: tuning.phase_time.max(0.0),
                ..GameData::default()
            },
            bounds,
            player: Player::new(&bounds),
            grid,
            ammo: AmmoRegulator::new(
                tuning.ammo_max,
                tuning.ammo_recharge_delay,
                tuning.ammo_recharge_rate,
            ),
            player_projectiles: Vec::new(),
            invader_projectiles: Vec::new(),
            obstacles: Self::default_obstacles(&bounds),
            particles: Vec::new(),
            stars,
            events: Vec::new(),
            scoreboard: ScoreBoard::new(),
            fire_schedule: FireScheduler::new(tuning.enemy_fire_period),
            tick_count: 0,
            rng,
            tuning,
        }
    }

    /// The default obstacle pair, flanking the ship's spawn point
    fn default_obstacles(bounds: &Viewport) -> Vec<Obstacle> {
        let x = bounds.width / 2.0 - OBSTACLE_WIDTH / 2.0;
        let y = bounds.height - OBSTACLE_RAISE;
        let offset = bounds.width * OBSTACLE_SPREAD;
        vec![
            Obstacle::new(Vec2::new(x - offset, y)),
            Obstacle::new(Vec2::new(x + offset, y)),
        ]
    }

    /// Respawn the default obstacle pair
    pub fn spawn_obstacle_pair(&mut self) {
        self.obstacles = Self::default_obstacles(&self.bounds);
    }

    /// Roll fresh formation dimensions: random base plus the level bonus,
    /// capped by the formation maximum
    pub(crate) fn roll_formation(&mut self, extra: u32) -> (u32, u32) {
        let rows = (self.rng.random_range(GRID_MIN_DIM..=GRID_BASE_MAX) + extra).min(GRID_MAX_DIM);
        let cols = (self.rng.random_range(GRID_MIN_DIM..=GRID_BASE_MAX) + extra).min(GRID_MAX_DIM);
        (rows, cols)
    }

    /// Spawn an explosion burst centered on `center`. Spawns fewer particles
    /// when near the global cap.
    pub fn spawn_burst(&mut self, center: Vec2, count: usize, color: u32) {
        let available = MAX_PARTICLES.saturating_sub(self.particles.len());
        for _ in 0..count.min(available) {
            let vel = Vec2::new(
                self.rng.random_range(-BURST_SPREAD..BURST_SPREAD),
                self.rng.random_range(-BURST_SPREAD..BURST_SPREAD),
            );
            self.particles
                .push(Particle::new(center, vel, PARTICLE_RADIUS, color));
        }
    }

    /// Whether the phase countdown is active this run
    pub fn timer_enabled(&self) -> bool {
        self.tuning.phase_time > 0.0
    }

    /// Start trigger: leaves the title screen and arms the enemy-fire
    /// schedule. Ignored outside the `Start` phase.
    pub fn start(&mut self) {
        if self.phase != GamePhase::Start {
            return;
        }
        self.phase = GamePhase::Playing;
        self.fire_schedule.arm();
        log::info!(
            "run started: seed {}, {}x{} formation",
            self.seed,
            self.grid.rows,
            self.grid.cols
        );
    }

    /// Restart trigger: atomically resets every collection and counter, then
    /// re-enters `Playing`. The session high score and scoreboard survive.
    pub fn restart(&mut self) {
        self.phase = GamePhase::Playing;

        self.player.pos = Player::spawn_pos(&self.bounds);
        self.player.vel = Vec2::ZERO;
        self.player.alive = true;

        self.player_projectiles.clear();
        self.invader_projectiles.clear();
        self.particles.clear();
        self.events.clear();

        self.data.score = 0;
        self.data.level = 1;
        self.data.kills = 0;
        self.data.time_left = self.tuning.phase_time.max(0.0);

        self.ammo.refill();

        let (rows, cols) = self.roll_formation(0);
        self.grid.set_dims(rows, cols);
        let velocity = self.tuning.invader_speed;
        let bounds = self.bounds;
        self.grid.restart(velocity, &bounds);
        self.spawn_obstacle_pair();

        self.fire_schedule.cancel();
        self.fire_schedule.arm();

        log::info!("run restarted: {}x{} formation", self.grid.rows, self.grid.cols);
    }

    /// Flip into `GameOver`: the ship dies in three bursts, the run is
    /// recorded, and the formation keeps animating until restart.
    pub fn trigger_game_over(&mut self, reason: GameOverReason) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        let center = self.player.center();
        self.spawn_burst(center, DEATH_BURST_PRIMARY, COLOR_WHITE);
        self.spawn_burst(center, DEATH_BURST_ACCENT, COLOR_PLAYER_ACCENT);
        self.spawn_burst(center, DEATH_BURST_ACCENT, COLOR_CRIMSON);

        self.player.alive = false;
        self.phase = GamePhase::GameOver;
        self.scoreboard.record(self.data.score, self.data.level);
        self.events.push(GameEvent::GameOver {
            reason,
            score: self.data.score,
        });
        log::info!(
            "game over ({:?}): score {}, level {}",
            reason,
            self.data.score,
            self.data.level
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    fn world() -> GameWorld {
        GameWorld::new(Viewport::new(800.0, 600.0), Tuning::default(), 7)
    }

    #[test]
    fn test_new_world_is_ready() {
        let w = world();
        assert_eq!(w.phase, GamePhase::Start);
        assert!(w.player.alive);
        assert_eq!(w.data.level, 1);
        assert_eq!(w.obstacles.len(), 2);
        assert_eq!(w.stars.len(), NUM_STARS);
        assert_eq!(
            w.grid.invaders.len(),
            (w.grid.rows * w.grid.cols) as usize
        );
        assert!(!w.fire_schedule.is_armed());
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = GameWorld::new(Viewport::new(800.0, 600.0), Tuning::default(), 99);
        let b = GameWorld::new(Viewport::new(800.0, 600.0), Tuning::default(), 99);
        assert_eq!(a.grid.rows, b.grid.rows);
        assert_eq!(a.grid.cols, b.grid.cols);
        assert_eq!(a.stars[0].pos, b.stars[0].pos);
    }

    #[test]
    fn test_start_arms_fire_schedule() {
        let mut w = world();
        w.start();
        assert_eq!(w.phase, GamePhase::Playing);
        assert!(w.fire_schedule.is_armed());

        // Start is a no-op once out of the title screen
        w.trigger_game_over(GameOverReason::PlayerShot);
        w.start();
        assert_eq!(w.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_game_over_bursts_and_flags() {
        let mut w = world();
        w.start();
        w.data.add_score(120);
        w.trigger_game_over(GameOverReason::PlayerShot);

        assert_eq!(w.phase, GamePhase::GameOver);
        assert!(!w.player.alive);
        assert_eq!(
            w.particles.len(),
            DEATH_BURST_PRIMARY + 2 * DEATH_BURST_ACCENT
        );
        assert_eq!(w.scoreboard.best(), Some(120));
        assert!(matches!(
            w.events.last(),
            Some(GameEvent::GameOver {
                reason: GameOverReason::PlayerShot,
                score: 120
            })
        ));

        // A second trigger must not double the bursts
        w.trigger_game_over(GameOverReason::InvaderContact);
        assert_eq!(
            w.particles.len(),
            DEATH_BURST_PRIMARY + 2 * DEATH_BURST_ACCENT
        );
    }

    #[test]
    fn test_restart_scenario() {
        let mut w = world();
        w.start();

        w.data.score = 500;
        w.data.high_score = 500;
        w.data.level = 7;
        w.data.kills = 42;
        w.ammo.set_charge(3.0);
        w.player_projectiles.push(Projectile::new(Vec2::ZERO, -600.0));
        w.invader_projectiles.push(Projectile::new(Vec2::ZERO, 300.0));
        w.obstacles.clear();
        w.trigger_game_over(GameOverReason::InvaderContact);

        w.restart();

        assert_eq!(w.phase, GamePhase::Playing);
        assert!(w.player.alive);
        assert_eq!(w.data.score, 0);
        assert_eq!(w.data.level, 1);
        assert_eq!(w.data.kills, 0);
        assert_eq!(w.data.high_score, 500);
        assert_eq!(w.ammo.displayed(), w.tuning.ammo_max);
        assert!(w.player_projectiles.is_empty());
        assert!(w.invader_projectiles.is_empty());
        assert!(w.particles.is_empty());
        assert!(w.events.is_empty());
        assert_eq!(w.obstacles.len(), 2);
        assert!(w.grid.rows >= GRID_MIN_DIM && w.grid.rows <= GRID_MAX_DIM);
        assert_eq!(
            w.grid.invaders.len(),
            (w.grid.rows * w.grid.cols) as usize
        );
        assert_eq!(w.player.pos, Player::spawn_pos(&w.bounds));
        assert!(w.fire_schedule.is_armed());
    }

    #[test]
    fn test_fire_scheduler_period() {
        let mut s = FireScheduler::new(1.0);
        assert_eq!(s.advance(10.0), 0); // not armed yet

        s.arm();
        assert_eq!(s.advance(0.5), 0);
        assert_eq!(s.advance(0.5), 1);
        assert_eq!(s.advance(2.0), 2);

        s.cancel();
        assert_eq!(s.advance(5.0), 0);
        s.arm();
        // Cancel dropped the accumulated time
        assert_eq!(s.advance(0.9), 0);
        assert_eq!(s.advance(0.1), 1);
    }

    #[test]
    fn test_burst_respects_particle_cap() {
        let mut w = world();
        w.spawn_burst(Vec2::ZERO, MAX_PARTICLES + 50, COLOR_WHITE);
        assert_eq!(w.particles.len(), MAX_PARTICLES);
        w.spawn_burst(Vec2::ZERO, 10, COLOR_WHITE);
        assert_eq!(w.particles.len(), MAX_PARTICLES);
    }

    #[test]
    fn test_score_tracks_high_water_mark() {
        let mut data = GameData::default();
        data.add_score(30);
        assert_eq!(data.high_score, 30);
        data.score = 0;
        data.add_score(10);
        assert_eq!(data.score, 10);
        assert_eq!(data.high_score, 30);
    }
}
