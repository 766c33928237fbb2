//! Headless demo driver
//!
//! Plays both seats with seeded random shots at live balls. There is no shot
//! planning: it exists to exercise the engine end to end and to give the
//! binary something to show.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::{AudioBackend, AudioManager};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, PlayerId, TickInput, tick};

/// Placement attempts before giving up and dropping the cue ball where it lies
const PLACEMENT_ATTEMPTS: u32 = 64;

/// Picks inputs for whichever player is at the table
pub struct DemoDriver {
    rng: Pcg32,
}

impl DemoDriver {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Input for the next frame given the current phase
    pub fn next_input(&mut self, state: &GameState) -> TickInput {
        match state.phase {
            GamePhase::Aiming => self.shot(state),
            GamePhase::BallInHand => self.placement(state),
            _ => TickInput::default(),
        }
    }

    fn shot(&mut self, state: &GameState) -> TickInput {
        let live: Vec<Vec2> = state
            .balls
            .iter()
            .filter(|b| !b.is_cue() && !b.pocketed)
            .map(|b| b.pos)
            .collect();
        let target = if live.is_empty() {
            CUE_SPOT
        } else {
            live[self.rng.random_range(0..live.len())]
        };
        let jitter = Vec2::new(
            self.rng.random_range(-BALL_RADIUS..BALL_RADIUS),
            self.rng.random_range(-BALL_RADIUS..BALL_RADIUS),
        );
        TickInput {
            aim_at: Some(target + jitter),
            strike: Some(self.rng.random_range(40.0..=MAX_STRIKE_DISTANCE)),
            ..Default::default()
        }
    }

    fn placement(&mut self, state: &GameState) -> TickInput {
        let spot = (0..PLACEMENT_ATTEMPTS)
            .map(|_| {
                Vec2::new(
                    self.rng.random_range(PLACEMENT_MIN.x + 1.0..PLACEMENT_MAX.x),
                    self.rng.random_range(PLACEMENT_MIN.y + 1.0..PLACEMENT_MAX.y),
                )
            })
            .find(|&pos| state.cue_position_free(pos));
        TickInput {
            place_cue_ball: spot,
            drop_cue_ball: true,
            ..Default::default()
        }
    }
}

/// Summary of a demo game
#[derive(Debug, Clone)]
pub struct DemoReport {
    pub winner: Option<PlayerId>,
    pub shots: u32,
    pub frames: u64,
    /// A shot exceeded the frame limit without settling
    pub stalled: bool,
    pub final_state: GameState,
}

/// Play one seeded game to completion (or until a limit is hit), feeding
/// every event to `audio`
pub fn play_game<B: AudioBackend>(settings: &Settings, audio: &mut AudioManager<B>) -> DemoReport {
    let mut state = GameState::new();
    let mut driver = DemoDriver::new(settings.seed);
    let mut shots = 0;
    let mut frames_this_shot = 0;
    let mut stalled = false;

    while state.winner.is_none() && shots < settings.max_shots {
        let input = driver.next_input(&state);
        if state.phase == GamePhase::Aiming && input.strike.is_some() {
            shots += 1;
            frames_this_shot = 0;
        }

        tick(&mut state, &input);
        audio.consume(&state.drain_events());

        if matches!(state.phase, GamePhase::InMotion | GamePhase::Resolving) {
            frames_this_shot += 1;
            if frames_this_shot > settings.max_frames_per_shot {
                log::warn!("Shot {} did not settle after {} frames", shots, frames_this_shot);
                stalled = true;
                break;
            }
        }
    }

    DemoReport {
        winner: state.winner,
        shots,
        frames: state.frame,
        stalled,
        final_state: state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::LogBackend;

    #[test]
    fn test_same_seed_same_game() {
        let settings = Settings {
            seed: 77,
            max_shots: 12,
            ..Default::default()
        };
        let a = play_game(&settings, &mut AudioManager::new(LogBackend));
        let b = play_game(&settings, &mut AudioManager::new(LogBackend));
        assert_eq!(a.winner, b.winner);
        assert_eq!(a.shots, b.shots);
        assert_eq!(a.frames, b.frames);
        assert_eq!(a.final_state.pocketed, b.final_state.pocketed);
        for (x, y) in a.final_state.balls.iter().zip(&b.final_state.balls) {
            assert_eq!(x.pos, y.pos);
        }
    }

    #[test]
    fn test_shot_limit_respected() {
        let settings = Settings {
            max_shots: 3,
            ..Default::default()
        };
        let report = play_game(&settings, &mut AudioManager::new(LogBackend));
        assert!(report.shots <= 3);
        assert!(report.frames > 0);
    }

    #[test]
    fn test_placement_is_free() {
        let mut state = GameState::new();
        state.phase = GamePhase::BallInHand;
        let mut driver = DemoDriver::new(5);
        for _ in 0..20 {
            let input = driver.next_input(&state);
            let pos = input.place_cue_ball.expect("open table has room");
            assert!(state.cue_position_free(pos));
            assert!(input.drop_cue_ball);
        }
    }

    #[test]
    fn test_aims_and_strikes_while_aiming() {
        let state = GameState::new();
        let mut driver = DemoDriver::new(5);
        let input = driver.next_input(&state);
        assert!(input.aim_at.is_some());
        let d = input.strike.expect("strike");
        assert!((40.0..=MAX_STRIKE_DISTANCE).contains(&d));
    }
}
