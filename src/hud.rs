//! UI readout sink
//!
//! The tick publishes one `HudFrame` per `Playing` tick; what the host does
//! with it (DOM text, overlay, nothing) is its own business.

/// Snapshot of everything the HUD shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HudFrame {
    pub score: u32,
    pub high_score: u32,
    pub level: u32,
    pub kills: u32,
    /// Ceiling of the fractional ammo charge
    pub ammo: u32,
    /// Capacity of the ammo pool
    pub ammo_max: u32,
    /// Phase countdown in whole milliseconds, None when the timer is off
    pub time_left_ms: Option<u32>,
}

/// Receiver for per-tick HUD updates. Implementations without a display
/// surface should ignore frames, never fail.
pub trait HudSink {
    fn show(&mut self, frame: &HudFrame);
}

/// Discards every frame
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHud;

impl HudSink for NullHud {
    fn show(&mut self, _frame: &HudFrame) {}
}
