//! Ammunition regulator: a capacity-plus-trickle gate on the player's fire
//! rate. Shots spend whole units; regeneration is continuous and only begins
//! after a short period without firing.

/// Regenerating ammunition pool.
///
/// Charge is fractional so the trickle is smooth; the HUD shows the ceiling.
#[derive(Debug, Clone)]
pub struct AmmoRegulator {
    max: u32,
    current: f32,
    /// Seconds since the last successful shot
    since_last_shot: f32,
    /// Inactivity required before regeneration starts, seconds
    recharge_delay: f32,
    /// Charge regained per second once regenerating
    recharge_rate: f32,
}

impl AmmoRegulator {
    pub fn new(max: u32, recharge_delay: f32, recharge_rate: f32) -> Self {
        Self {
            max,
            current: max as f32,
            since_last_shot: recharge_delay,
            recharge_delay,
            recharge_rate,
        }
    }

    /// A shot is allowed whenever any charge remains
    pub fn can_shoot(&self) -> bool {
        self.current > 0.0
    }

    /// Spend one unit of charge. Returns false (and spawns nothing) when the
    /// pool is empty; the caller must not fire in that case.
    pub fn shoot(&mut self) -> bool {
        if !self.can_shoot() {
            return false;
        }
        self.current = (self.current - 1.0).max(0.0);
        self.since_last_shot = 0.0;
        true
    }

    /// Advance the inactivity clock and trickle charge back once the delay
    /// has passed. Clamped to capacity.
    pub fn recharge(&mut self, dt: f32) {
        self.since_last_shot += dt;
        if self.since_last_shot > self.recharge_delay && self.current < self.max as f32 {
            self.current = (self.current + self.recharge_rate * dt).min(self.max as f32);
        }
    }

    /// Restore full charge, with regeneration immediately eligible
    pub fn refill(&mut self) {
        self.current = self.max as f32;
        self.since_last_shot = self.recharge_delay;
    }

    /// Force the charge to a value, clamped into [0, max]
    pub fn set_charge(&mut self, charge: f32) {
        self.current = charge.clamp(0.0, self.max as f32);
    }

    pub fn charge(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// HUD value: the ceiling of the fractional charge
    pub fn displayed(&self) -> u32 {
        self.current.ceil() as u32
    }
}
