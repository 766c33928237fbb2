//! Eight Ball - a deterministic 8-ball pool engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, pockets, rules)
//! - `audio`: Maps simulation events to sound effects
//! - `settings`: Demo driver and audio preferences
//! - `demo`: Seeded headless shot driver

pub mod audio;
pub mod demo;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Table configuration constants
pub mod consts {
    use glam::Vec2;

    /// Playing field bounds (inner edges of the rails)
    pub const FIELD_LEFT: f32 = 200.0;
    pub const FIELD_RIGHT: f32 = 1200.0;
    pub const FIELD_TOP: f32 = 150.0;
    pub const FIELD_BOTTOM: f32 = 650.0;
    pub const RAIL_THICKNESS: f32 = 50.0;

    pub const BALL_RADIUS: f32 = 10.0;
    /// Center distance at which two balls touch
    pub const CONTACT_DISTANCE: f32 = 2.0 * BALL_RADIUS;

    /// Corner pockets sit slightly inside the rail corners, side pockets on the rail line
    pub const POCKETS: [Vec2; 6] = [
        Vec2::new(210.0, 160.0),
        Vec2::new(700.0, 150.0),
        Vec2::new(1190.0, 160.0),
        Vec2::new(210.0, 640.0),
        Vec2::new(700.0, 650.0),
        Vec2::new(1190.0, 640.0),
    ];
    /// Ball center must come closer than this to a pocket center to drop
    pub const POCKET_CAPTURE_RADIUS: f32 = 17.0;

    /// Cue ball start position (head spot)
    pub const CUE_SPOT: Vec2 = Vec2::new(550.0, 400.0);

    /// Strike distance cap
    pub const MAX_STRIKE_DISTANCE: f32 = 210.0;
    /// Strikes must pull back further than this to register
    pub const MIN_STRIKE_DISTANCE: f32 = 10.0;

    /// Ball-in-hand placement window (cue center, exclusive)
    pub const PLACEMENT_MIN: Vec2 = Vec2::new(210.0, 160.0);
    pub const PLACEMENT_MAX: Vec2 = Vec2::new(1190.0, 640.0);

    /// Balls per group
    pub const GROUP_SIZE: usize = 7;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(p1: Vec2, p2: Vec2) -> f32 {
    p1.distance(p2)
}

/// Heading in degrees [0, 360) of the line from `p1` to `p2`.
///
/// Screen y grows downward, so the y difference is flipped: north is 90°.
/// Coincident points resolve to 0.
pub fn angle_between(p1: Vec2, p2: Vec2) -> f32 {
    let dx = p2.x - p1.x;
    let dy = -(p2.y - p1.y);

    if dx == 0.0 {
        return if dy > 0.0 {
            90.0
        } else if dy < 0.0 {
            270.0
        } else {
            0.0
        };
    }

    let beta = (dy / dx).atan().to_degrees();
    let angle = if dx < 0.0 {
        beta + 180.0
    } else if dy < 0.0 {
        beta + 360.0
    } else {
        beta
    };
    normalize_heading(angle)
}

/// Shortest angular distance between two headings, in [0, 180]
pub fn angular_difference(a1: f32, a2: f32) -> f32 {
    let d = (a1 - a2).abs().rem_euclid(360.0);
    if d > 180.0 { 360.0 - d } else { d }
}

/// End point of a ray of `length` leaving `origin` along `heading`
#[inline]
pub fn project(origin: Vec2, heading: f32, length: f32) -> Vec2 {
    let rad = heading.to_radians();
    Vec2::new(origin.x + length * rad.cos(), origin.y - length * rad.sin())
}

/// Wrap a heading into [0, 360)
#[inline]
pub fn normalize_heading(heading: f32) -> f32 {
    let h = heading.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if h >= 360.0 { 0.0 } else { h }
}
