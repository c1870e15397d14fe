//! Render sink: the seam between the simulation and whatever draws it
//!
//! The core issues flat draw calls and never reads anything back. A host
//! backs this with a canvas, a GPU pipeline, or nothing at all; sinks must
//! swallow calls they cannot honor rather than fail into the tick.

use glam::Vec2;

/// Receiver for one frame's draw calls. Colors are packed `0xRRGGBB`;
/// `opacity` is 0..1 and `glow` a blur radius in pixels (0 = none).
pub trait RenderSink {
    /// Wipe the surface at the start of a frame
    fn clear(&mut self);
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: u32, opacity: f32, glow: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: u32, opacity: f32, glow: f32);
}

/// Discards every draw call. For headless runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRender;

impl RenderSink for NullRender {
    fn clear(&mut self) {}
    fn fill_rect(&mut self, _pos: Vec2, _size: Vec2, _color: u32, _opacity: f32, _glow: f32) {}
    fn fill_circle(
        &mut self,
        _center: Vec2,
        _radius: f32,
        _color: u32,
        _opacity: f32,
        _glow: f32,
    ) {
    }
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    Rect {
        pos: Vec2,
        size: Vec2,
        color: u32,
        opacity: f32,
        glow: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: u32,
        opacity: f32,
        glow: f32,
    },
}

/// Records draw calls in issue order, for tests and frame dumps
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    pub calls: Vec<DrawCall>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rects(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Rect { .. }))
            .count()
    }

    pub fn circles(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Circle { .. }))
            .count()
    }
}

impl RenderSink for FrameRecorder {
    fn clear(&mut self) {
        self.calls.clear();
        self.calls.push(DrawCall::Clear);
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: u32, opacity: f32, glow: f32) {
        self.calls.push(DrawCall::Rect {
            pos,
            size,
            color,
            opacity,
            glow,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: u32, opacity: f32, glow: f32) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            color,
            opacity,
            glow,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_keeps_one_frame() {
        let mut frame = FrameRecorder::new();
        frame.fill_rect(Vec2::ZERO, Vec2::ONE, 0xFFFFFF, 1.0, 0.0);
        frame.fill_circle(Vec2::ZERO, 2.0, 0xFFFFFF, 0.5, 0.0);
        assert_eq!(frame.rects(), 1);
        assert_eq!(frame.circles(), 1);

        // A new frame starts from the clear
        frame.clear();
        assert_eq!(frame.calls, vec![DrawCall::Clear]);
    }
}
