//! Per-frame simulation tick
//!
//! One synchronous pass per rendered frame, in a fixed order. The host feeds
//! measured time through an accumulator and calls `tick` with `SIM_DT`
//! substeps; everything below is deterministic given the world and inputs.

use glam::Vec2;
use rand::Rng;

use super::collision;
use super::state::{Entity, GameEvent, GameOverReason, GamePhase, GameWorld};
use crate::audio::{AudioCue, AudioSink};
use crate::consts::*;
use crate::hud::{HudFrame, HudSink};
use crate::render::RenderSink;

/// Keyboard controls the host can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    Up,
    Down,
    Shoot,
}

/// Shoot is edge-triggered: one shot per press, re-armed on release
#[derive(Debug, Clone)]
pub struct ShootLatch {
    pub pressed: bool,
    pub released: bool,
}

impl Default for ShootLatch {
    fn default() -> Self {
        Self {
            pressed: false,
            released: true,
        }
    }
}

/// Key state shared with the host. Event handlers mutate it between ticks;
/// the tick only reads it, except for clearing the shoot latch when a shot
/// actually fires.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub shoot: ShootLatch,
}

impl InputState {
    pub fn press(&mut self, control: Control) {
        match control {
            Control::Left => self.left = true,
            Control::Right => self.right = true,
            Control::Up => self.up = true,
            Control::Down => self.down = true,
            Control::Shoot => self.shoot.pressed = true,
        }
    }

    pub fn release(&mut self, control: Control) {
        match control {
            Control::Left => self.left = false,
            Control::Right => self.right = false,
            Control::Up => self.up = false,
            Control::Down => self.down = false,
            Control::Shoot => {
                self.shoot.pressed = false;
                self.shoot.released = true;
            }
        }
    }
}

/// Advance the world by one tick and emit this frame's draw calls, HUD
/// frame, and audio cues.
pub fn tick<R, H, A>(
    world: &mut GameWorld,
    input: &mut InputState,
    dt: f32,
    render: &mut R,
    hud: &mut H,
    audio: &mut A,
) where
    R: RenderSink,
    H: HudSink,
    A: AudioSink,
{
    world.events.clear();
    world.tick_count += 1;

    render.clear();
    draw_and_update_stars(world, render, dt);

    match world.phase {
        GamePhase::Start => {}
        GamePhase::Playing => playing_tick(world, input, dt, render, hud),
        GamePhase::GameOver => game_over_tick(world, dt, render),
    }

    for event in &world.events {
        audio.play(cue_for(event));
    }
}

/// The full gameplay pipeline, in the canonical order
fn playing_tick<R: RenderSink, H: HudSink>(
    world: &mut GameWorld,
    input: &mut InputState,
    dt: f32,
    render: &mut R,
    hud: &mut H,
) {
    if world.timer_enabled() {
        world.data.time_left -= dt;
        if world.data.time_left <= 0.0 {
            world.data.time_left = 0.0;
            world.trigger_game_over(GameOverReason::TimeUp);
            return;
        }
    }

    hud.show(&hud_frame(world));

    run_progression(world);
    world.ammo.recharge(dt);

    draw_and_update(&mut world.player_projectiles, render, dt);
    draw_and_update(&mut world.invader_projectiles, render, dt);
    draw_and_update(&mut world.particles, render, dt);
    draw_obstacles(world, render);

    prune_expired(world);
    collision::resolve(world);
    run_enemy_fire(world, dt);

    world.grid.draw(render);
    let bounds = world.bounds;
    world.grid.update(dt, &bounds);

    // A lethal hit above flips the phase mid-tick; the dead ship takes no
    // input and is not drawn again
    if world.phase == GamePhase::Playing {
        apply_input(world, input, dt);
        world.player.draw(render);
    }
}

/// Game over: the scene keeps animating, the player is out of the loop
fn game_over_tick<R: RenderSink>(world: &mut GameWorld, dt: f32, render: &mut R) {
    collision::resolve_obstacle_hits(world);

    draw_and_update(&mut world.player_projectiles, render, dt);
    draw_and_update(&mut world.invader_projectiles, render, dt);
    draw_and_update(&mut world.particles, render, dt);
    draw_obstacles(world, render);

    prune_expired(world);
    run_enemy_fire(world, dt);

    world.grid.draw(render);
    let bounds = world.bounds;
    world.grid.update(dt, &bounds);
}

fn hud_frame(world: &GameWorld) -> HudFrame {
    HudFrame {
        score: world.data.score,
        high_score: world.data.high_score,
        level: world.data.level,
        kills: world.data.kills,
        ammo: world.ammo.displayed(),
        ammo_max: world.ammo.max(),
        time_left_ms: world
            .timer_enabled()
            .then(|| (world.data.time_left.max(0.0) * 1000.0).round() as u32),
    }
}

/// Wave-cleared check: level up, reroll the formation, restock obstacles
fn run_progression(world: &mut GameWorld) {
    if !world.grid.is_cleared() {
        return;
    }

    world.data.level += 1;
    world.data.time_left = world.tuning.phase_time.max(0.0);

    // The new formation accounts for the level just reached
    let extra = ((world.data.level as f32 * 0.2).floor() as u32).min(2);
    let (rows, cols) = world.roll_formation(extra);
    world.grid.set_dims(rows, cols);
    let velocity = world.tuning.invader_speed_for(world.data.level);
    let bounds = world.bounds;
    world.grid.restart(velocity, &bounds);

    if world.obstacles.is_empty() {
        world.spawn_obstacle_pair();
    }

    world.events.push(GameEvent::WaveCleared {
        level: world.data.level,
    });
    log::info!(
        "wave cleared: level {}, {}x{} formation at {:.0} px/s",
        world.data.level,
        world.grid.rows,
        world.grid.cols,
        world.grid.velocity
    );
}

/// Perform any autonomous enemy shots that came due this tick
fn run_enemy_fire(world: &mut GameWorld, dt: f32) {
    let due = world.fire_schedule.advance(dt);
    for _ in 0..due {
        let speed = world.tuning.invader_projectile_speed;
        if let Some(invader) = world.grid.random_invader(&mut world.rng) {
            invader.shoot(&mut world.invader_projectiles, speed);
        }
    }
}

/// Drop projectiles that left the screen and particles that faded out
fn prune_expired(world: &mut GameWorld) {
    world.player_projectiles.retain(|p| p.pos.y > 0.0);
    let bottom = world.bounds.height;
    world.invader_projectiles.retain(|p| p.pos.y <= bottom);
    world.particles.retain(|p| p.opacity > 0.0);
}

/// Movement and the press-edge shot, bounded to the viewport
fn apply_input(world: &mut GameWorld, input: &mut InputState, dt: f32) {
    if input.shoot.pressed && input.shoot.released && world.ammo.shoot() {
        let speed = world.tuning.player_projectile_speed;
        world.player.shoot(&mut world.player_projectiles, speed);
        world.events.push(GameEvent::ShotFired);
        input.shoot.released = false;
    }

    let speed = world.tuning.player_speed;
    let mut vel = Vec2::ZERO;
    if input.left {
        vel.x -= speed;
    }
    if input.right {
        vel.x += speed;
    }
    if world.tuning.vertical_movement {
        if input.up {
            vel.y -= speed;
        }
        if input.down {
            vel.y += speed;
        }
    }
    world.player.vel = vel;
    world.player.pos += vel * dt;

    world.player.pos.x = world.player.pos.x.clamp(0.0, world.bounds.width - PLAYER_WIDTH);
    world.player.pos.y = world
        .player
        .pos
        .y
        .clamp(0.0, world.bounds.height - PLAYER_HEIGHT);
}

fn draw_and_update<E: Entity, R: RenderSink>(entities: &mut [E], render: &mut R, dt: f32) {
    for entity in entities.iter_mut() {
        entity.draw(render);
        entity.update(dt);
    }
}

fn draw_obstacles<R: RenderSink>(world: &GameWorld, render: &mut R) {
    for obstacle in &world.obstacles {
        obstacle.draw(render);
    }
}

/// Stars draw and drift in every phase, wrapping back to the top edge
fn draw_and_update_stars<R: RenderSink>(world: &mut GameWorld, render: &mut R, dt: f32) {
    let bottom = world.bounds.height;
    let width = world.bounds.width;
    for star in &mut world.stars {
        star.draw(render);
        star.update(dt);
        if star.pos.y - star.radius > bottom {
            star.pos.y = -star.radius;
            star.pos.x = world.rng.random_range(0.0..width);
        }
    }
}

fn cue_for(event: &GameEvent) -> AudioCue {
    match event {
        GameEvent::ShotFired => AudioCue::Shoot,
        GameEvent::InvaderDestroyed { .. } => AudioCue::Hit,
        GameEvent::WaveCleared { .. } => AudioCue::NextLevel,
        GameEvent::GameOver { .. } => AudioCue::Explosion,
    }
}
