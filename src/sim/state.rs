//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives in [`GameState`]; front ends only read it.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::distance;

/// Stable ball identity (0 is the cue ball)
pub type BallId = u32;

pub const CUE_BALL: BallId = 0;
pub const EIGHT_BALL: BallId = 8;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the acting player to strike
    Aiming,
    /// Balls rolling
    InMotion,
    /// Every ball has stopped; the shot is interpreted on the next tick
    Resolving,
    /// Acting player may reposition the cue ball before aiming
    BallInHand,
    /// A winner has been decided
    GameOver,
}

/// Ball category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallGroup {
    /// The cue ball belongs to nobody
    Cue,
    Solids,
    Stripes,
    Eight,
}

impl BallGroup {
    /// The other player's group, for solids and stripes only
    pub fn complement(self) -> Option<BallGroup> {
        match self {
            BallGroup::Solids => Some(BallGroup::Stripes),
            BallGroup::Stripes => Some(BallGroup::Solids),
            BallGroup::Cue | BallGroup::Eight => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BallGroup::Cue => "cue",
            BallGroup::Solids => "solids",
            BallGroup::Stripes => "stripes",
            BallGroup::Eight => "eight",
        }
    }
}

/// A ball on the table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub group: BallGroup,
    pub pos: Vec2,
    /// Direction of travel in degrees [0, 360), north = 90
    pub heading: f32,
    /// Distance travelled per frame, never negative
    pub speed: f32,
    /// Frames since friction last took a unit of speed
    pub frames_since_slowdown: u32,
    pub pocketed: bool,
    /// Balls this one already resolved a contact with (reset table-wide)
    pub suppressed: BTreeSet<BallId>,
}

impl Ball {
    pub fn new(id: BallId, group: BallGroup, pos: Vec2) -> Self {
        Self {
            id,
            group,
            pos,
            heading: 0.0,
            speed: 0.0,
            frames_since_slowdown: 0,
            pocketed: false,
            suppressed: BTreeSet::new(),
        }
    }

    #[inline]
    pub fn is_cue(&self) -> bool {
        self.id == CUE_BALL
    }

    /// On the table and rolling
    #[inline]
    pub fn is_moving(&self) -> bool {
        !self.pocketed && self.speed > 0.0
    }

    /// Drop the ball into a pocket. Speed is zeroed so it can never move again
    /// until respotted.
    pub fn sink(&mut self) {
        self.pocketed = true;
        self.speed = 0.0;
        self.frames_since_slowdown = 0;
        self.suppressed.clear();
    }
}

/// Player seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub fn other(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Solids or stripes once assigned; never changes afterwards
    pub group: Option<BallGroup>,
    /// All seven group balls are down, only the eight remains
    pub on_final_ball: bool,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            group: None,
            on_final_ball: false,
        }
    }

    /// Group whose ball must be struck first for the shot to be legal
    pub fn target_group(&self) -> Option<BallGroup> {
        if self.on_final_ball {
            Some(BallGroup::Eight)
        } else {
            self.group
        }
    }
}

/// What happened during the shot in progress
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShotOutcome {
    /// Balls sunk this shot, in the order they dropped
    pub pocketed: Vec<BallId>,
    /// First ball the cue ball touched
    pub first_struck: Option<BallId>,
}

impl ShotOutcome {
    pub fn clear(&mut self) {
        self.pocketed.clear();
        self.first_struck = None;
    }
}

/// Discrete occurrences emitted by the simulation, drained by consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Cue ball struck with the given speed
    CueStrike { speed: f32 },
    /// Ball bounced off a rail
    WallHit { ball: BallId },
    /// Two balls collided
    BallHit { mover: BallId, struck: BallId },
    /// Ball dropped into a pocket
    Pocketed { ball: BallId },
    /// Groups assigned after the break
    GroupsAssigned { player: PlayerId, group: BallGroup },
    /// A foul was called against the player
    Foul { player: PlayerId },
    /// Play passed to the given player
    TurnChanged { player: PlayerId },
    /// Cue ball can be placed by the given player
    BallInHand { player: PlayerId },
    /// Game decided
    GameOver { winner: PlayerId },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// All sixteen balls, sorted by id
    pub balls: Vec<Ball>,
    pub players: [Player; 2],
    pub current_player: PlayerId,
    /// True until the first object ball assigns groups
    pub initial_break_pending: bool,
    pub winner: Option<PlayerId>,
    /// Every ball sunk this game, in order (the cue ball leaves it on respot)
    pub pocketed: Vec<BallId>,
    /// Accumulator for the shot in progress
    pub shot: ShotOutcome,
    /// Current aim heading for the cue
    pub aim: f32,
    /// Simulation frame counter
    pub frame: u64,
    /// Events not yet drained by consumers
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// A freshly racked table with player one to break
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Aiming,
            balls: rack(),
            players: [Player::new(PlayerId::One), Player::new(PlayerId::Two)],
            current_player: PlayerId::One,
            initial_break_pending: true,
            winner: None,
            pocketed: Vec::new(),
            shot: ShotOutcome::default(),
            aim: 0.0,
            frame: 0,
            events: Vec::new(),
        }
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    pub fn acting_player(&self) -> &Player {
        self.player(self.current_player)
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn ball_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.id == id)
    }

    /// Group of a ball by id; unknown ids count as the cue
    pub fn group_of(&self, id: BallId) -> BallGroup {
        self.ball(id).map(|b| b.group).unwrap_or(BallGroup::Cue)
    }

    pub fn cue_ball(&self) -> Option<&Ball> {
        self.ball(CUE_BALL)
    }

    /// Whether every ball still on the table is at rest
    pub fn all_stopped(&self) -> bool {
        !self.balls.iter().any(Ball::is_moving)
    }

    /// Number of balls of `group` sunk this game
    pub fn pocketed_count(&self, group: BallGroup) -> usize {
        self.pocketed
            .iter()
            .filter(|&&id| self.group_of(id) == group)
            .count()
    }

    /// Balls of the player's group still on the table (the eight once on the final ball)
    pub fn remaining_for(&self, player: PlayerId) -> usize {
        match self.player(player).target_group() {
            Some(group) => self
                .balls
                .iter()
                .filter(|b| b.group == group && !b.pocketed)
                .count(),
            None => self
                .balls
                .iter()
                .filter(|b| matches!(b.group, BallGroup::Solids | BallGroup::Stripes) && !b.pocketed)
                .count(),
        }
    }

    /// True when the cue ball could sit at `pos` without touching any other live ball
    pub fn cue_position_free(&self, pos: Vec2) -> bool {
        self.balls
            .iter()
            .filter(|b| !b.is_cue() && !b.pocketed)
            .all(|b| distance(b.pos, pos) > CONTACT_DISTANCE)
    }

    /// Clear every pairwise suppression flag on the table
    pub fn reset_suppression(&mut self) {
        for ball in &mut self.balls {
            ball.suppressed.clear();
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Rack layout: (id, group, x, y). Apex at the foot spot, eight in the middle.
const RACK: [(BallId, BallGroup, f32, f32); 15] = [
    (1, BallGroup::Solids, 950.0, 400.0),
    (2, BallGroup::Solids, 986.0, 420.0),
    (3, BallGroup::Solids, 1022.0, 420.0),
    (4, BallGroup::Solids, 1022.0, 360.0),
    (5, BallGroup::Solids, 968.0, 390.0),
    (6, BallGroup::Solids, 1004.0, 410.0),
    (7, BallGroup::Solids, 1004.0, 370.0),
    (8, BallGroup::Eight, 986.0, 400.0),
    (9, BallGroup::Stripes, 986.0, 380.0),
    (10, BallGroup::Stripes, 1004.0, 430.0),
    (11, BallGroup::Stripes, 1004.0, 390.0),
    (12, BallGroup::Stripes, 1022.0, 440.0),
    (13, BallGroup::Stripes, 1022.0, 380.0),
    (14, BallGroup::Stripes, 968.0, 410.0),
    (15, BallGroup::Stripes, 1022.0, 400.0),
];

/// Cue ball plus the fifteen racked object balls, sorted by id
pub fn rack() -> Vec<Ball> {
    let mut balls = Vec::with_capacity(16);
    balls.push(Ball::new(CUE_BALL, BallGroup::Cue, CUE_SPOT));
    balls.extend(
        RACK.iter()
            .map(|&(id, group, x, y)| Ball::new(id, group, Vec2::new(x, y))),
    );
    balls
}
