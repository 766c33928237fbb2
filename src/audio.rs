//! Audio mapping for simulation events
//!
//! The simulation never plays sound itself. Consumers drain [`GameEvent`]s and
//! hand them to an [`AudioManager`], which turns each one into a short tone
//! description for whatever backend the front end provides.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Cue tip meets the cue ball
    CueStrike,
    /// Ball bounces off a rail
    WallHit,
    /// Two balls click together
    BallHit,
    /// Ball drops into a pocket
    Sunk,
}

/// Oscillator shape for a tone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
}

/// Backend-neutral description of one sound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Start frequency (Hz)
    pub freq: f32,
    /// Frequency reached at the end of the tone (Hz)
    pub end_freq: f32,
    pub waveform: Waveform,
    /// Seconds
    pub duration: f32,
    /// Final gain (0.0 - 1.0) after volume settings
    pub gain: f32,
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<SoundEffect> {
        match event {
            GameEvent::CueStrike { .. } => Some(SoundEffect::CueStrike),
            GameEvent::WallHit { .. } => Some(SoundEffect::WallHit),
            GameEvent::BallHit { .. } => Some(SoundEffect::BallHit),
            GameEvent::Pocketed { .. } => Some(SoundEffect::Sunk),
            _ => None,
        }
    }

    /// Base tone at full volume
    fn base_tone(self) -> Tone {
        match self {
            // Solid thump
            SoundEffect::CueStrike => Tone {
                freq: 150.0,
                end_freq: 60.0,
                waveform: Waveform::Sine,
                duration: 0.15,
                gain: 0.6,
            },
            // Dull knock
            SoundEffect::WallHit => Tone {
                freq: 220.0,
                end_freq: 180.0,
                waveform: Waveform::Triangle,
                duration: 0.08,
                gain: 0.3,
            },
            // Sharp click
            SoundEffect::BallHit => Tone {
                freq: 1200.0,
                end_freq: 900.0,
                waveform: Waveform::Square,
                duration: 0.04,
                gain: 0.4,
            },
            // Falling rattle
            SoundEffect::Sunk => Tone {
                freq: 300.0,
                end_freq: 80.0,
                waveform: Waveform::Triangle,
                duration: 0.3,
                gain: 0.5,
            },
        }
    }
}

/// Something that can actually make noise
pub trait AudioBackend {
    fn play_tone(&mut self, effect: SoundEffect, tone: Tone);
}

/// Backend for headless runs: logs each sound at debug level
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play_tone(&mut self, effect: SoundEffect, tone: Tone) {
        log::debug!("sfx {:?} ({:.0} Hz, gain {:.2})", effect, tone.freq, tone.gain);
    }
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect, scaled by `intensity` (0.0 - 1.0)
    pub fn play(&mut self, effect: SoundEffect, intensity: f32) {
        let vol = self.effective_volume() * intensity.clamp(0.0, 1.0);
        if vol <= 0.0 {
            return;
        }
        let mut tone = effect.base_tone();
        tone.gain *= vol;
        self.backend.play_tone(effect, tone);
    }

    /// Play one sound per audible event. Returns how many were played.
    pub fn consume(&mut self, events: &[GameEvent]) -> usize {
        let mut played = 0;
        for event in events {
            let Some(effect) = SoundEffect::for_event(event) else {
                continue;
            };
            let intensity = match event {
                // Harder strikes are louder; even the softest tap is audible
                GameEvent::CueStrike { speed } => (speed / 20.0).max(0.2),
                _ => 1.0,
            };
            if self.effective_volume() > 0.0 {
                played += 1;
            }
            self.play(effect, intensity);
        }
        played
    }
}
