//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed frame per tick, no wall-clock time
//! - Stable iteration order (by ball ID)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod rules;
pub mod state;
pub mod tick;

pub use collision::{ContactResponse, Rail, ball_contact, pocket_at, wall_reflection};
pub use rules::{PocketTally, resolve_shot};
pub use state::{
    Ball, BallGroup, BallId, CUE_BALL, EIGHT_BALL, GameEvent, GamePhase, GameState, Player,
    PlayerId, ShotOutcome, rack,
};
pub use tick::{
    CommandError, TickInput, aim_at, check_placement, drop_cue_ball, place_cue_ball, step_frame, strike, tick,
};
