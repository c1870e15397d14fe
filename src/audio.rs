//! Audio sink: fire-and-forget sound cues
//!
//! The simulation raises cues and never waits on them; a host maps each one
//! to whatever synth or sample playback it has.

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Player fired a shot
    Shoot,
    /// Player shot destroyed an invader
    Hit,
    /// The ship was destroyed
    Explosion,
    /// Wave cleared, next level starting
    NextLevel,
}

/// Receiver for sound cues. No acknowledgment, no error channel.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

/// Drops every cue. For headless runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, cue: AudioCue) {
        log::debug!("audio cue dropped: {:?}", cue);
    }
}
