//! Balance knobs
//!
//! Everything a designer would want to nudge without touching sim code.
//! Loaded from JSON by the host; out-of-range values are clamped back to
//! safe defaults rather than rejected.

use serde::{Deserialize, Serialize};

/// Minimum autonomous fire period the scheduler will honor
const MIN_FIRE_PERIOD: f32 = 0.05;

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Movement ===
    /// Ship speed in px/s
    pub player_speed: f32,
    /// Whether the ship may also move vertically
    pub vertical_movement: bool,

    // === Projectiles ===
    /// Ship shot speed in px/s (applied upward)
    pub player_projectile_speed: f32,
    /// Enemy shot speed in px/s (applied downward)
    pub invader_projectile_speed: f32,

    // === Formation ===
    /// Horizontal march speed at level 1, px/s
    pub invader_speed: f32,
    /// Vertical drop applied on each boundary flip, px
    pub descent_step: f32,
    /// Per-level march speed bonus (0.05 = +5% per level)
    pub speed_ramp: f32,
    /// Hard multiplier cap for the march speed bonus
    pub speed_cap: f32,

    // === Ammo ===
    /// Clip size
    pub ammo_max: u32,
    /// Idle time before charge starts returning, seconds
    pub ammo_recharge_delay: f32,
    /// Charge returned per second once recharging
    pub ammo_recharge_rate: f32,

    // === Pacing ===
    /// Seconds between autonomous enemy shots
    pub enemy_fire_period: f32,
    /// Seconds allowed per wave; zero or less disables the timer
    pub phase_time: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            // Movement
            player_speed: 400.0,
            vertical_movement: true,

            // Projectiles
            player_projectile_speed: 600.0,
            invader_projectile_speed: 300.0,

            // Formation
            invader_speed: 60.0,
            descent_step: 30.0,
            speed_ramp: 0.05,
            speed_cap: 1.5,

            // Ammo
            ammo_max: 10,
            ammo_recharge_delay: 0.5,
            ammo_recharge_rate: 1.0 / 3.0,

            // Pacing
            enemy_fire_period: 1.0,
            phase_time: 60.0,
        }
    }
}

impl Tuning {
    /// Parse from JSON, filling missing fields with defaults and clamping
    /// anything out of range
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        tuning.sanitize();
        Ok(tuning)
    }

    /// Horizontal march speed for a level, with the ramp applied
    pub fn invader_speed_for(&self, level: u32) -> f32 {
        let ramp = 1.0 + self.speed_ramp * level.saturating_sub(1) as f32;
        self.invader_speed * ramp.min(self.speed_cap)
    }

    /// Clamp every field into its valid range, logging anything corrected.
    /// NaN counts as out of range everywhere.
    pub fn sanitize(&mut self) {
        let defaults = Self::default();

        if !(self.player_speed > 0.0) {
            log::warn!(
                "tuning: player_speed {} invalid, using {}",
                self.player_speed,
                defaults.player_speed
            );
            self.player_speed = defaults.player_speed;
        }
        if !(self.player_projectile_speed > 0.0) {
            log::warn!(
                "tuning: player_projectile_speed {} invalid, using {}",
                self.player_projectile_speed,
                defaults.player_projectile_speed
            );
            self.player_projectile_speed = defaults.player_projectile_speed;
        }
        if !(self.invader_projectile_speed > 0.0) {
            log::warn!(
                "tuning: invader_projectile_speed {} invalid, using {}",
                self.invader_projectile_speed,
                defaults.invader_projectile_speed
            );
            self.invader_projectile_speed = defaults.invader_projectile_speed;
        }
        if !(self.invader_speed > 0.0) {
            log::warn!(
                "tuning: invader_speed {} invalid, using {}",
                self.invader_speed,
                defaults.invader_speed
            );
            self.invader_speed = defaults.invader_speed;
        }
        if !(self.descent_step >= 0.0) {
            log::warn!(
                "tuning: descent_step {} invalid, using {}",
                self.descent_step,
                defaults.descent_step
            );
            self.descent_step = defaults.descent_step;
        }
        if !(0.0..=1.0).contains(&self.speed_ramp) {
            log::warn!(
                "tuning: speed_ramp {} invalid, using {}",
                self.speed_ramp,
                defaults.speed_ramp
            );
            self.speed_ramp = defaults.speed_ramp;
        }
        if !(self.speed_cap >= 1.0) {
            log::warn!(
                "tuning: speed_cap {} invalid, using {}",
                self.speed_cap,
                defaults.speed_cap
            );
            self.speed_cap = defaults.speed_cap;
        }
        if self.ammo_max == 0 {
            log::warn!("tuning: ammo_max 0 invalid, using {}", defaults.ammo_max);
            self.ammo_max = defaults.ammo_max;
        }
        if !(self.ammo_recharge_delay >= 0.0) {
            log::warn!(
                "tuning: ammo_recharge_delay {} invalid, using {}",
                self.ammo_recharge_delay,
                defaults.ammo_recharge_delay
            );
            self.ammo_recharge_delay = defaults.ammo_recharge_delay;
        }
        if !(self.ammo_recharge_rate > 0.0) {
            log::warn!(
                "tuning: ammo_recharge_rate {} invalid, using {}",
                self.ammo_recharge_rate,
                defaults.ammo_recharge_rate
            );
            self.ammo_recharge_rate = defaults.ammo_recharge_rate;
        }
        if self.enemy_fire_period.is_nan() {
            log::warn!(
                "tuning: enemy_fire_period NaN, using {}",
                defaults.enemy_fire_period
            );
            self.enemy_fire_period = defaults.enemy_fire_period;
        } else if self.enemy_fire_period < MIN_FIRE_PERIOD {
            log::warn!(
                "tuning: enemy_fire_period {} below minimum, using {}",
                self.enemy_fire_period,
                MIN_FIRE_PERIOD
            );
            self.enemy_fire_period = MIN_FIRE_PERIOD;
        }
        if self.phase_time.is_nan() {
            log::warn!("tuning: phase_time NaN, using {}", defaults.phase_time);
            self.phase_time = defaults.phase_time;
        } else if self.phase_time < 0.0 {
            // Negative means the same as zero: no wave timer
            self.phase_time = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_survive_sanitize() {
        let mut tuning = Tuning::default();
        tuning.sanitize();
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_sanitize_clamps_bad_values() {
        let mut tuning = Tuning::default();
        tuning.player_speed = -10.0;
        tuning.invader_speed = f32::NAN;
        tuning.ammo_max = 0;
        tuning.enemy_fire_period = 0.001;
        tuning.phase_time = -5.0;
        tuning.sanitize();

        let defaults = Tuning::default();
        assert_eq!(tuning.player_speed, defaults.player_speed);
        assert_eq!(tuning.invader_speed, defaults.invader_speed);
        assert_eq!(tuning.ammo_max, defaults.ammo_max);
        assert_eq!(tuning.enemy_fire_period, MIN_FIRE_PERIOD);
        assert_eq!(tuning.phase_time, 0.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning = Tuning::from_json(r#"{"player_speed": 250.0, "ammo_max": 4}"#)
            .expect("valid json");
        assert_eq!(tuning.player_speed, 250.0);
        assert_eq!(tuning.ammo_max, 4);
        assert_eq!(tuning.phase_time, Tuning::default().phase_time);
    }

    #[test]
    fn test_json_out_of_range_is_clamped() {
        let tuning = Tuning::from_json(r#"{"invader_speed": -5.0}"#).expect("valid json");
        assert_eq!(tuning.invader_speed, Tuning::default().invader_speed);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Tuning::from_json("{not json").is_err());
    }

    #[test]
    fn test_speed_ramp_caps_out() {
        let tuning = Tuning::default();
        assert_eq!(tuning.invader_speed_for(1), tuning.invader_speed);

        let level5 = tuning.invader_speed_for(5);
        assert!((level5 - tuning.invader_speed * 1.2).abs() < 1e-3);

        // +5% per level caps at the 1.5x multiplier from level 11 on
        let capped = tuning.invader_speed * tuning.speed_cap;
        assert!((tuning.invader_speed_for(11) - capped).abs() < 1e-3);
        assert_eq!(tuning.invader_speed_for(40), tuning.invader_speed_for(11));
    }
}
