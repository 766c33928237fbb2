//! Shot resolution for 8-ball
//!
//! Runs once per shot, after every ball has stopped. Reads the shot
//! accumulator, decides groups, fouls, whose turn it is and whether the game
//! is over, then clears the accumulator.

use glam::Vec2;

use super::state::{BallGroup, CUE_BALL, GameEvent, GamePhase, GameState, PlayerId};
use super::tick::check_placement;
use crate::consts::*;

/// Per-shot tally of what went down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PocketTally {
    pub solids: usize,
    pub stripes: usize,
    pub eight: bool,
    pub cue: bool,
}

impl PocketTally {
    pub fn of(&self, group: BallGroup) -> usize {
        match group {
            BallGroup::Solids => self.solids,
            BallGroup::Stripes => self.stripes,
            BallGroup::Eight => usize::from(self.eight),
            BallGroup::Cue => usize::from(self.cue),
        }
    }
}

/// Interpret the finished shot and move to the next phase
pub fn resolve_shot(state: &mut GameState) {
    let acting = state.current_player;
    let opponent = acting.other();
    // Legality is judged against what the player was aiming for when the shot began
    let target_at_start = state.acting_player().target_group();
    let was_on_final = state.acting_player().on_final_ball;
    let shot = std::mem::take(&mut state.shot);

    let mut tally = PocketTally::default();
    for &id in &shot.pocketed {
        let group = state.group_of(id);
        match group {
            BallGroup::Solids => tally.solids += 1,
            BallGroup::Stripes => tally.stripes += 1,
            BallGroup::Eight => tally.eight = true,
            BallGroup::Cue => tally.cue = true,
        }
        if state.initial_break_pending && matches!(group, BallGroup::Solids | BallGroup::Stripes) {
            assign_groups(state, acting, group);
        }
    }

    let first_struck_group = shot.first_struck.map(|id| state.group_of(id));

    if tally.eight {
        let legal_finish =
            was_on_final && !tally.cue && first_struck_group == Some(BallGroup::Eight);
        let winner = if legal_finish { acting } else { opponent };
        finish(state, winner);
        return;
    }

    let own_pocketed = state
        .acting_player()
        .group
        .map(|g| tally.of(g))
        .unwrap_or(0);
    let mut switch_turn = was_on_final || own_pocketed == 0;
    let mut ball_in_hand = false;

    let foul = match (first_struck_group, target_at_start) {
        (None, _) => true,
        (Some(struck), Some(target)) => struck != target,
        (Some(_), None) => false,
    };
    if foul {
        switch_turn = true;
        ball_in_hand = true;
    }

    update_final_ball(state);

    if tally.cue {
        respot_cue_ball(state);
        switch_turn = true;
        ball_in_hand = true;
    }

    if foul || tally.cue {
        state.emit(GameEvent::Foul { player: acting });
        log::debug!(
            "Foul by player {} (first struck {:?}, scratch {})",
            acting.number(),
            shot.first_struck,
            tally.cue
        );
    }

    if switch_turn {
        state.current_player = opponent;
        state.emit(GameEvent::TurnChanged { player: opponent });
        log::info!("Player {}'s turn", opponent.number());
    }

    if ball_in_hand {
        let player = state.current_player;
        state.phase = GamePhase::BallInHand;
        state.emit(GameEvent::BallInHand { player });
    } else {
        state.phase = GamePhase::Aiming;
    }
}

/// Give `player` the group of the first object ball they sank, opponent the other
fn assign_groups(state: &mut GameState, player: PlayerId, group: BallGroup) {
    let Some(other_group) = group.complement() else {
        return;
    };
    state.player_mut(player).group = Some(group);
    state.player_mut(player.other()).group = Some(other_group);
    state.initial_break_pending = false;
    state.emit(GameEvent::GroupsAssigned { player, group });
    log::info!(
        "Player {} takes {}, player {} takes {}",
        player.number(),
        group.as_str(),
        player.other().number(),
        other_group.as_str()
    );
}

/// Flag every player whose whole group is down
fn update_final_ball(state: &mut GameState) {
    for id in [PlayerId::One, PlayerId::Two] {
        let Some(group) = state.player(id).group else {
            continue;
        };
        if !state.player(id).on_final_ball && state.pocketed_count(group) >= GROUP_SIZE {
            state.player_mut(id).on_final_ball = true;
            log::info!("Player {} is on the eight ball", id.number());
        }
    }
}

/// Bring a scratched cue ball back into play on the head spot, or the
/// nearest legal spot to it when something is sitting there
fn respot_cue_ball(state: &mut GameState) {
    state.pocketed.retain(|&id| id != CUE_BALL);
    let spot = respot_position(state);
    if spot.is_none() {
        log::warn!("No free spot for the cue ball; it stays where it dropped");
    }
    if let Some(cue) = state.ball_mut(CUE_BALL) {
        cue.pocketed = false;
        cue.speed = 0.0;
        if let Some(pos) = spot {
            cue.pos = pos;
        }
    }
}

/// First legal placement searching out from the head spot: along the head
/// string in unit steps (alternating sides), then on parallel lines one ball
/// radius further toward the head rail each time
pub fn respot_position(state: &GameState) -> Option<Vec2> {
    let half_span = ((PLACEMENT_MAX.y - PLACEMENT_MIN.y) / 2.0).ceil() as i32;
    let lines = ((CUE_SPOT.x - PLACEMENT_MIN.x) / BALL_RADIUS).ceil() as i32;
    (0..lines)
        .flat_map(|line| {
            (0..=half_span).flat_map(move |d| {
                let x = CUE_SPOT.x - line as f32 * BALL_RADIUS;
                [Vec2::new(x, CUE_SPOT.y - d as f32), Vec2::new(x, CUE_SPOT.y + d as f32)]
            })
        })
        .find(|&pos| check_placement(state, pos).is_ok())
}

fn finish(state: &mut GameState, winner: PlayerId) {
    state.winner = Some(winner);
    state.phase = GamePhase::GameOver;
    state.emit(GameEvent::GameOver { winner });
    log::info!("Player {} wins", winner.number());
}
