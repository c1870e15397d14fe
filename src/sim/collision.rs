//! Collision and interaction resolution
//!
//! One pass per tick, in a fixed order. Hits are marked into tick-local
//! consumed masks so later checks observe earlier removals, and every touched
//! collection is compacted once at the end. Nothing is spliced mid-iteration
//! and nothing can be consumed twice.

use glam::Vec2;

use super::state::{
    GameEvent, GameOverReason, GamePhase, GameWorld, Invader, Obstacle, Player, Projectile,
};
use crate::consts::*;

/// Axis-aligned rectangle overlap. Touching edges do not count.
pub fn rects_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && a_pos.x + a_size.x > b_pos.x
        && a_pos.y < b_pos.y + b_size.y
        && a_pos.y + a_size.y > b_pos.y
}

/// Contact kill: the invader has descended into the ship's horizontal band
fn reaches_player(invader: &Invader, player: &Player) -> bool {
    invader.pos.x >= player.pos.x
        && invader.pos.x <= player.pos.x + PLAYER_WIDTH
        && invader.pos.y >= player.pos.y
}

/// Mark every not-yet-consumed shot that overlaps a surviving obstacle.
/// Obstacles absorb shots without taking damage.
fn mark_shots_vs_obstacles(
    shots: &[Projectile],
    obstacles: &[Obstacle],
    obstacle_dead: &[bool],
    used: &mut [bool],
) {
    for (s, shot) in shots.iter().enumerate() {
        if used[s] {
            continue;
        }
        for (o, obstacle) in obstacles.iter().enumerate() {
            if obstacle_dead[o] {
                continue;
            }
            if rects_overlap(shot.pos, shot.size(), obstacle.pos, obstacle.size()) {
                used[s] = true;
                break;
            }
        }
    }
}

/// Drop every item whose mask bit is set, preserving order
fn compact<T>(items: &mut Vec<T>, consumed: &[bool]) {
    debug_assert_eq!(items.len(), consumed.len());
    let mut idx = 0;
    items.retain(|_| {
        let keep = !consumed[idx];
        idx += 1;
        keep
    });
}

/// Full resolver for the `Playing` phase. Five checks, order-dependent:
/// player shots vs invaders, invader shots vs the ship, shots vs obstacles,
/// invaders vs obstacles, invaders vs the ship.
pub fn resolve(world: &mut GameWorld) {
    let mut invader_dead = vec![false; world.grid.invaders.len()];
    let mut player_shot_used = vec![false; world.player_projectiles.len()];
    let mut invader_shot_used = vec![false; world.invader_projectiles.len()];
    let mut obstacle_dead = vec![false; world.obstacles.len()];

    // 1. Player shots vs invaders. First match wins for both sides.
    let mut kill_bursts: Vec<Vec2> = Vec::new();
    for (i, invader) in world.grid.invaders.iter().enumerate() {
        for (s, shot) in world.player_projectiles.iter().enumerate() {
            if player_shot_used[s] {
                continue;
            }
            if rects_overlap(shot.pos, shot.size(), invader.pos, invader.size()) {
                invader_dead[i] = true;
                player_shot_used[s] = true;
                kill_bursts.push(invader.center());
                break;
            }
        }
    }
    for center in kill_bursts {
        world.spawn_burst(center, INVADER_BURST, COLOR_INVADER_BURST);
        world.data.add_score(INVADER_REWARD);
        world.data.kills += 1;
        world.events.push(GameEvent::InvaderDestroyed { pos: center });
    }

    // 2. Invader shots vs the ship
    let mut player_hit = false;
    if world.player.alive {
        for (s, shot) in world.invader_projectiles.iter().enumerate() {
            if rects_overlap(
                shot.pos,
                shot.size(),
                world.player.pos,
                world.player.size(),
            ) {
                invader_shot_used[s] = true;
                player_hit = true;
                break;
            }
        }
    }
    if player_hit {
        world.trigger_game_over(GameOverReason::PlayerShot);
    }

    // 3. Remaining shots from either side vs obstacles
    mark_shots_vs_obstacles(
        &world.player_projectiles,
        &world.obstacles,
        &obstacle_dead,
        &mut player_shot_used,
    );
    mark_shots_vs_obstacles(
        &world.invader_projectiles,
        &world.obstacles,
        &obstacle_dead,
        &mut invader_shot_used,
    );

    // 4. Invaders demolish obstacles they reach
    for (o, obstacle) in world.obstacles.iter().enumerate() {
        for (i, invader) in world.grid.invaders.iter().enumerate() {
            if invader_dead[i] {
                continue;
            }
            if rects_overlap(invader.pos, invader.size(), obstacle.pos, obstacle.size()) {
                obstacle_dead[o] = true;
                break;
            }
        }
    }

    // 5. Surviving invaders reaching the ship's band end the run
    if world.phase == GamePhase::Playing {
        let contact = world
            .grid
            .invaders
            .iter()
            .enumerate()
            .any(|(i, invader)| !invader_dead[i] && reaches_player(invader, &world.player));
        if contact {
            world.trigger_game_over(GameOverReason::InvaderContact);
        }
    }

    compact(&mut world.grid.invaders, &invader_dead);
    compact(&mut world.player_projectiles, &player_shot_used);
    compact(&mut world.invader_projectiles, &invader_shot_used);
    compact(&mut world.obstacles, &obstacle_dead);
}

/// Reduced resolver for the `GameOver` phase: stray shots still vanish into
/// obstacles while the rest of the scene animates.
pub fn resolve_obstacle_hits(world: &mut GameWorld) {
    let obstacle_dead = vec![false; world.obstacles.len()];
    let mut player_shot_used = vec![false; world.player_projectiles.len()];
    let mut invader_shot_used = vec![false; world.invader_projectiles.len()];

    mark_shots_vs_obstacles(
        &world.player_projectiles,
        &world.obstacles,
        &obstacle_dead,
        &mut player_shot_used,
    );
    mark_shots_vs_obstacles(
        &world.invader_projectiles,
        &world.obstacles,
        &obstacle_dead,
        &mut invader_shot_used,
    );

    compact(&mut world.player_projectiles, &player_shot_used);
    compact(&mut world.invader_projectiles, &invader_shot_used);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use crate::tuning::Tuning;

    fn world() -> GameWorld {
        let mut w = GameWorld::new(Viewport::new(800.0, 600.0), Tuning::default(), 11);
        w.start();
        w.grid.invaders.clear();
        w.obstacles.clear();
        w
    }

    #[test]
    fn test_rects_overlap() {
        let size = Vec2::new(10.0, 10.0);
        assert!(rects_overlap(
            Vec2::new(0.0, 0.0),
            size,
            Vec2::new(5.0, 5.0),
            size
        ));
        assert!(!rects_overlap(
            Vec2::new(0.0, 0.0),
            size,
            Vec2::new(20.0, 0.0),
            size
        ));
        // Touching edges are not an overlap
        assert!(!rects_overlap(
            Vec2::new(0.0, 0.0),
            size,
            Vec2::new(10.0, 0.0),
            size
        ));
    }

    #[test]
    fn test_player_shot_kills_invader() {
        let mut w = world();
        w.grid.invaders.push(Invader::new(Vec2::new(100.0, 100.0), 0, 0));
        w.player_projectiles
            .push(Projectile::new(Vec2::new(110.0, 105.0), -600.0));
        let score_before = w.data.score;

        resolve(&mut w);

        assert!(w.grid.invaders.is_empty());
        assert!(w.player_projectiles.is_empty());
        assert_eq!(w.data.score, score_before + INVADER_REWARD);
        assert_eq!(w.data.kills, 1);
        assert_eq!(w.particles.len(), INVADER_BURST);
        assert!(matches!(
            w.events.last(),
            Some(GameEvent::InvaderDestroyed { .. })
        ));
    }

    #[test]
    fn test_one_shot_consumes_one_invader() {
        let mut w = world();
        // Two invaders stacked on the same spot, one shot through both
        w.grid.invaders.push(Invader::new(Vec2::new(100.0, 100.0), 0, 0));
        w.grid.invaders.push(Invader::new(Vec2::new(100.0, 100.0), 0, 1));
        w.player_projectiles
            .push(Projectile::new(Vec2::new(110.0, 105.0), -600.0));

        resolve(&mut w);

        assert_eq!(w.grid.invaders.len(), 1);
        assert_eq!(w.data.kills, 1);
    }

    #[test]
    fn test_one_invader_consumes_one_shot() {
        let mut w = world();
        w.grid.invaders.push(Invader::new(Vec2::new(100.0, 100.0), 0, 0));
        w.player_projectiles
            .push(Projectile::new(Vec2::new(110.0, 105.0), -600.0));
        w.player_projectiles
            .push(Projectile::new(Vec2::new(112.0, 105.0), -600.0));

        resolve(&mut w);

        assert!(w.grid.invaders.is_empty());
        assert_eq!(w.player_projectiles.len(), 1);
        assert_eq!(w.data.score, INVADER_REWARD);
    }

    #[test]
    fn test_invader_shot_ends_the_run() {
        let mut w = world();
        let hit = w.player.center();
        w.invader_projectiles.push(Projectile::new(hit, 300.0));

        resolve(&mut w);

        assert_eq!(w.phase, GamePhase::GameOver);
        assert!(!w.player.alive);
        assert!(w.invader_projectiles.is_empty());
        assert_eq!(
            w.particles.len(),
            DEATH_BURST_PRIMARY + 2 * DEATH_BURST_ACCENT
        );
        assert!(matches!(
            w.events.last(),
            Some(GameEvent::GameOver {
                reason: GameOverReason::PlayerShot,
                ..
            })
        ));
    }

    #[test]
    fn test_obstacle_absorbs_shots_from_both_sides() {
        let mut w = world();
        w.obstacles.push(Obstacle::new(Vec2::new(300.0, 400.0)));
        w.player_projectiles
            .push(Projectile::new(Vec2::new(320.0, 405.0), -600.0));
        w.invader_projectiles
            .push(Projectile::new(Vec2::new(360.0, 405.0), 300.0));

        resolve(&mut w);

        assert!(w.player_projectiles.is_empty());
        assert!(w.invader_projectiles.is_empty());
        assert_eq!(w.obstacles.len(), 1);
        assert_eq!(w.phase, GamePhase::Playing);
    }

    #[test]
    fn test_invader_contact_demolishes_obstacle() {
        let mut w = world();
        w.obstacles.push(Obstacle::new(Vec2::new(300.0, 400.0)));
        w.grid.invaders.push(Invader::new(Vec2::new(310.0, 395.0), 0, 0));

        resolve(&mut w);

        assert!(w.obstacles.is_empty());
        assert_eq!(w.grid.invaders.len(), 1);
    }

    #[test]
    fn test_consumed_shot_skips_obstacles() {
        let mut w = world();
        // The shot overlaps both the invader and the obstacle; the invader
        // check runs first and consumes it, so the obstacle sees nothing.
        // Invader and obstacle do not touch each other.
        w.grid.invaders.push(Invader::new(Vec2::new(100.0, 100.0), 0, 0));
        w.obstacles.push(Obstacle::new(Vec2::new(104.0, 78.0)));
        w.player_projectiles
            .push(Projectile::new(Vec2::new(104.0, 95.0), -600.0));

        resolve(&mut w);

        assert!(w.grid.invaders.is_empty());
        assert!(w.player_projectiles.is_empty());
        assert_eq!(w.obstacles.len(), 1);
    }

    #[test]
    fn test_invader_reaching_ship_band_is_lethal() {
        let mut w = world();
        let ship = w.player.pos;
        w.grid
            .invaders
            .push(Invader::new(Vec2::new(ship.x + 5.0, ship.y + 2.0), 0, 0));

        resolve(&mut w);

        assert_eq!(w.phase, GamePhase::GameOver);
        assert!(matches!(
            w.events.last(),
            Some(GameEvent::GameOver {
                reason: GameOverReason::InvaderContact,
                ..
            })
        ));
    }

    #[test]
    fn test_dead_invader_cannot_demolish_or_kill() {
        let mut w = world();
        // Shot kills the invader in the first check; the same invader then
        // overlaps an obstacle and the ship band, and must do neither.
        let ship = w.player.pos;
        w.grid
            .invaders
            .push(Invader::new(Vec2::new(ship.x + 5.0, ship.y + 2.0), 0, 0));
        w.obstacles
            .push(Obstacle::new(Vec2::new(ship.x - 10.0, ship.y)));
        w.player_projectiles
            .push(Projectile::new(Vec2::new(ship.x + 6.0, ship.y + 3.0), -600.0));

        resolve(&mut w);

        assert!(w.grid.invaders.is_empty());
        assert_eq!(w.obstacles.len(), 1);
        assert_eq!(w.phase, GamePhase::Playing);
    }

    #[test]
    fn test_empty_collections_are_noops() {
        let mut w = world();
        resolve(&mut w);
        resolve_obstacle_hits(&mut w);
        assert_eq!(w.phase, GamePhase::Playing);
        assert!(w.events.is_empty());
    }

    #[test]
    fn test_game_over_resolver_only_touches_shots() {
        let mut w = world();
        w.trigger_game_over(GameOverReason::TimeUp);
        w.events.clear();
        w.obstacles.push(Obstacle::new(Vec2::new(300.0, 400.0)));
        w.invader_projectiles
            .push(Projectile::new(Vec2::new(320.0, 405.0), 300.0));
        w.grid.invaders.push(Invader::new(Vec2::new(310.0, 395.0), 0, 0));

        resolve_obstacle_hits(&mut w);

        assert!(w.invader_projectiles.is_empty());
        // Invader overlap is a Playing-phase concern
        assert_eq!(w.obstacles.len(), 1);
        assert_eq!(w.grid.invaders.len(), 1);
    }
}
