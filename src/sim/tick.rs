//! Frame-synchronous simulation tick
//!
//! One call to [`tick`] advances the table by one frame. Input is applied
//! first, then whatever the current phase requires: integrating motion,
//! resolving a finished shot, or nothing at all while waiting on the player.

use glam::Vec2;
use thiserror::Error;

use super::collision::{ball_contact, find_ball_contact, pocket_at, suppress_pair, wall_reflection};
use super::rules::resolve_shot;
use super::state::{CUE_BALL, GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::{angle_between, project};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position to aim the cue at
    pub aim_at: Option<Vec2>,
    /// Release the cue after pulling back this far
    pub strike: Option<f32>,
    /// Move the cue ball while it is in hand
    pub place_cue_ball: Option<Vec2>,
    /// Finish ball-in-hand placement
    pub drop_cue_ball: bool,
}

/// Reasons a command is refused. The state is untouched when this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CommandError {
    #[error("command not valid during {0:?}")]
    WrongPhase(GamePhase),
    #[error("strike distance {0} is below the minimum pull")]
    StrikeTooWeak(f32),
    #[error("cue ball placement {0} is off the playing field")]
    OutOfBounds(Vec2),
    #[error("cue ball placement {0} overlaps another ball")]
    Overlapping(Vec2),
    #[error("cue ball is missing from the table")]
    NoCueBall,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    apply_input(state, input);

    match state.phase {
        GamePhase::InMotion => {
            state.frame += 1;
            step_frame(state);
            if state.all_stopped() {
                state.phase = GamePhase::Resolving;
            }
        }
        GamePhase::Resolving => resolve_shot(state),
        GamePhase::Aiming | GamePhase::BallInHand | GamePhase::GameOver => {}
    }
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    if let Some(pos) = input.place_cue_ball {
        if let Err(e) = place_cue_ball(state, pos) {
            log::debug!("Placement ignored: {e}");
        }
    }
    if input.drop_cue_ball {
        if let Err(e) = drop_cue_ball(state) {
            log::debug!("Drop ignored: {e}");
        }
    }
    if let Some(target) = input.aim_at {
        if state.phase == GamePhase::Aiming {
            aim_at(state, target);
        }
    }
    if let Some(distance) = input.strike {
        if let Err(e) = strike(state, distance) {
            log::debug!("Strike ignored: {e}");
        }
    }
}

/// Point the cue from the cue ball toward `target`
pub fn aim_at(state: &mut GameState, target: Vec2) {
    if let Some(cue) = state.cue_ball() {
        state.aim = angle_between(cue.pos, target);
    }
}

/// Cue ball speed for a pull-back distance (capped, then scaled down by ten)
pub fn strike_speed(distance: f32) -> f32 {
    let d = distance.min(MAX_STRIKE_DISTANCE);
    ((d - MIN_STRIKE_DISTANCE) / 10.0).round()
}

/// Strike the cue ball along the current aim
pub fn strike(state: &mut GameState, distance: f32) -> Result<(), CommandError> {
    if state.phase != GamePhase::Aiming {
        return Err(CommandError::WrongPhase(state.phase));
    }
    if distance <= MIN_STRIKE_DISTANCE {
        return Err(CommandError::StrikeTooWeak(distance));
    }

    let speed = strike_speed(distance);
    let aim = state.aim;
    let cue = state.ball_mut(CUE_BALL).ok_or(CommandError::NoCueBall)?;
    cue.heading = aim;
    cue.speed = speed;
    cue.frames_since_slowdown = 0;

    state.reset_suppression();
    state.shot.clear();
    state.phase = GamePhase::InMotion;
    state.emit(GameEvent::CueStrike { speed });
    log::debug!(
        "Player {} strikes at {:.1} degrees, speed {}",
        state.current_player.number(),
        aim,
        speed
    );
    Ok(())
}

/// Move the cue ball while it is in hand
pub fn place_cue_ball(state: &mut GameState, pos: Vec2) -> Result<(), CommandError> {
    if state.phase != GamePhase::BallInHand {
        return Err(CommandError::WrongPhase(state.phase));
    }
    check_placement(state, pos)?;

    let cue = state.ball_mut(CUE_BALL).ok_or(CommandError::NoCueBall)?;
    cue.pos = pos;
    Ok(())
}

/// Leave ball-in-hand and return to aiming with the cue ball where it is.
///
/// Refused when the current spot would not be accepted by [`place_cue_ball`].
pub fn drop_cue_ball(state: &mut GameState) -> Result<(), CommandError> {
    if state.phase != GamePhase::BallInHand {
        return Err(CommandError::WrongPhase(state.phase));
    }
    let pos = state.cue_ball().map(|b| b.pos).ok_or(CommandError::NoCueBall)?;
    check_placement(state, pos)?;
    state.phase = GamePhase::Aiming;
    Ok(())
}

/// Whether the cue ball may rest at `pos`: strictly inside the placement
/// window and clear of every live object ball
pub fn check_placement(state: &GameState, pos: Vec2) -> Result<(), CommandError> {
    let inside = pos.x > PLACEMENT_MIN.x
        && pos.x < PLACEMENT_MAX.x
        && pos.y > PLACEMENT_MIN.y
        && pos.y < PLACEMENT_MAX.y;
    if !inside {
        return Err(CommandError::OutOfBounds(pos));
    }
    if !state.cue_position_free(pos) {
        return Err(CommandError::Overlapping(pos));
    }
    Ok(())
}

/// Friction threshold: faster balls go more frames between slowdowns
pub fn slowdown_threshold(speed: f32) -> f32 {
    -30.0 * (0.05 * (speed + 1.0)).log10()
}

/// Integrate one frame of motion for every rolling ball, in id order.
///
/// Balls later in the roster see the already-updated positions of earlier ones.
pub fn step_frame(state: &mut GameState) {
    for i in 0..state.balls.len() {
        if !state.balls[i].is_moving() {
            continue;
        }

        roll(state, i);

        let pos = state.balls[i].pos;
        if pocket_at(pos).is_some() {
            let id = state.balls[i].id;
            state.balls[i].sink();
            state.shot.pocketed.push(id);
            state.pocketed.push(id);
            state.emit(GameEvent::Pocketed { ball: id });
            continue;
        }

        if let Some(j) = find_ball_contact(&state.balls[i], &state.balls) {
            resolve_contact(state, i, j);
        }

        apply_friction(state, i);
    }
}

/// Move ball `i` one unit at a time, bouncing off rails as it goes
fn roll(state: &mut GameState, i: usize) {
    let mut step = 0u32;
    while (step as f32) < state.balls[i].speed.floor() {
        let ball = &mut state.balls[i];
        if let Some(heading) = wall_reflection(ball.pos, ball.heading) {
            ball.heading = heading;
            if ball.speed > 1.0 {
                ball.speed -= 1.0;
            }
            let id = ball.id;
            state.emit(GameEvent::WallHit { ball: id });
            state.reset_suppression();
        }
        let ball = &mut state.balls[i];
        ball.pos = project(ball.pos, ball.heading, 1.0);
        step += 1;
    }
}

fn resolve_contact(state: &mut GameState, i: usize, j: usize) {
    let (mover_id, struck_id) = (state.balls[i].id, state.balls[j].id);
    let response = ball_contact(
        state.balls[i].pos,
        state.balls[j].pos,
        state.balls[i].heading,
        state.balls[i].speed,
    );

    let (mover, struck) = if i < j {
        let (lo, hi) = state.balls.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = state.balls.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    };
    mover.heading = response.mover_heading;
    mover.speed = response.mover_speed;
    struck.heading = response.struck_heading;
    struck.speed = response.struck_speed;
    suppress_pair(mover, struck);

    if state.shot.first_struck.is_none() {
        if mover_id == CUE_BALL {
            state.shot.first_struck = Some(struck_id);
        } else if struck_id == CUE_BALL {
            state.shot.first_struck = Some(mover_id);
        }
    }
    state.emit(GameEvent::BallHit {
        mover: mover_id,
        struck: struck_id,
    });
}

fn apply_friction(state: &mut GameState, i: usize) {
    let ball = &mut state.balls[i];
    if ball.frames_since_slowdown as f32 >= slowdown_threshold(ball.speed) {
        ball.speed = (ball.speed - 1.0).max(0.0);
        ball.frames_since_slowdown = 0;
    } else {
        ball.frames_since_slowdown += 1;
    }
}
