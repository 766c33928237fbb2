//! Collision detection and response
//!
//! Rails are axis-aligned, so reflection works directly on headings: a rail
//! mirrors the component of travel that points into it and leaves everything
//! else alone. This holds for the top and bottom rails as well as the sides,
//! so a ball already leaving any rail is never flipped back into it. Ball-ball contacts use an equal-mass projection along and
//! across the line of centers.

use glam::Vec2;

use super::state::Ball;
use crate::consts::*;
use crate::{angle_between, angular_difference, distance, normalize_heading};

/// Rails a ball can be touching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rail {
    Top,
    Bottom,
    Left,
    Right,
}

/// Rails whose inner edge lies within one ball radius of `pos`
pub fn touching_rails(pos: Vec2) -> impl Iterator<Item = Rail> {
    [
        (pos.y - BALL_RADIUS <= FIELD_TOP, Rail::Top),
        (pos.y + BALL_RADIUS >= FIELD_BOTTOM, Rail::Bottom),
        (pos.x - BALL_RADIUS <= FIELD_LEFT, Rail::Left),
        (pos.x + BALL_RADIUS >= FIELD_RIGHT, Rail::Right),
    ]
    .into_iter()
    .filter_map(|(touching, rail)| touching.then_some(rail))
}

/// Whether a ball travelling along `heading` is closing on `rail`
pub fn heading_into(rail: Rail, heading: f32) -> bool {
    let h = normalize_heading(heading);
    match rail {
        Rail::Top => h > 0.0 && h < 180.0,
        Rail::Bottom => h > 180.0 && h < 360.0,
        Rail::Left => h > 90.0 && h < 270.0,
        Rail::Right => h < 90.0 || h > 270.0,
    }
}

/// Mirror `heading` off `rail`
///
/// Top and bottom flip the vertical component (`360 - h`); the side rails
/// flip the horizontal component (`180 - h`, wrapped).
pub fn reflect_heading(rail: Rail, heading: f32) -> f32 {
    match rail {
        Rail::Top | Rail::Bottom => normalize_heading(360.0 - heading),
        Rail::Left | Rail::Right => normalize_heading(180.0 - heading),
    }
}

/// Bounce a ball at `pos` off every rail it touches and is moving into.
///
/// Returns the new heading, or `None` when no reflection happened (not
/// touching, or already travelling away from the rail). A corner contact
/// reflects both components.
pub fn wall_reflection(pos: Vec2, heading: f32) -> Option<f32> {
    let mut h = heading;
    let mut reflected = false;
    for rail in touching_rails(pos) {
        if heading_into(rail, h) {
            h = reflect_heading(rail, h);
            reflected = true;
        }
    }
    reflected.then_some(h)
}

/// First ball (in id order) that `mover` is newly in contact with
pub fn find_ball_contact(mover: &Ball, balls: &[Ball]) -> Option<usize> {
    if mover.pocketed {
        return None;
    }
    balls.iter().position(|other| {
        other.id != mover.id
            && !other.pocketed
            && !mover.suppressed.contains(&other.id)
            && !other.suppressed.contains(&mover.id)
            && other.pos.round() != mover.pos.round()
            && distance(mover.pos, other.pos) <= CONTACT_DISTANCE
    })
}

/// Post-contact headings and speeds for a moving ball striking a resting one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactResponse {
    pub mover_heading: f32,
    pub mover_speed: f32,
    pub struck_heading: f32,
    pub struck_speed: f32,
}

/// Minimum speed either ball keeps after a contact
pub const MIN_CONTACT_SPEED: f32 = 1.0;

/// Unclamped contact response.
///
/// The struck ball leaves along the line of centers; the mover deflects to
/// whichever perpendicular is closer to its incoming heading. Each speed is
/// the incoming speed projected onto the outgoing direction.
pub fn project_contact(mover_pos: Vec2, struck_pos: Vec2, heading: f32, speed: f32) -> ContactResponse {
    let axis = angle_between(mover_pos, struck_pos);
    let clockwise = axis - 90.0;
    let counter_clockwise = axis + 90.0;

    let mover_heading = if angular_difference(clockwise, heading)
        < angular_difference(counter_clockwise, heading)
    {
        clockwise
    } else {
        counter_clockwise
    };

    let mover_speed = speed * angular_difference(mover_heading, heading).to_radians().cos();
    let struck_speed = speed * angular_difference(axis, heading).to_radians().cos();

    ContactResponse {
        mover_heading: normalize_heading(mover_heading),
        mover_speed,
        struck_heading: normalize_heading(axis),
        struck_speed,
    }
}

/// Contact response with both speeds floored at [`MIN_CONTACT_SPEED`]
pub fn ball_contact(mover_pos: Vec2, struck_pos: Vec2, heading: f32, speed: f32) -> ContactResponse {
    let mut response = project_contact(mover_pos, struck_pos, heading, speed);
    response.mover_speed = response.mover_speed.max(MIN_CONTACT_SPEED);
    response.struck_speed = response.struck_speed.max(MIN_CONTACT_SPEED);
    response
}

/// Mark two balls as having resolved their contact
pub fn suppress_pair(a: &mut Ball, b: &mut Ball) {
    a.suppressed.insert(b.id);
    b.suppressed.insert(a.id);
}

/// Index of the pocket whose capture radius contains `pos`
pub fn pocket_at(pos: Vec2) -> Option<usize> {
    POCKETS
        .iter()
        .position(|&pocket| distance(pos, pocket) < POCKET_CAPTURE_RADIUS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::BallGroup;
    use proptest::prelude::*;

    #[test]
    fn test_right_rail_reflects_incoming() {
        let pos = Vec2::new(FIELD_RIGHT - BALL_RADIUS, 400.0);
        let h = wall_reflection(pos, 30.0).expect("should bounce");
        assert!((h - 150.0).abs() < 1e-4);
        let h = wall_reflection(pos, 300.0).expect("should bounce");
        assert!((h - 240.0).abs() < 1e-4);
    }

    #[test]
    fn test_left_rail_reflects_incoming() {
        let pos = Vec2::new(FIELD_LEFT + BALL_RADIUS, 400.0);
        let h = wall_reflection(pos, 135.0).expect("should bounce");
        assert!((h - 45.0).abs() < 1e-4);
        let h = wall_reflection(pos, 200.0).expect("should bounce");
        assert!((h - 340.0).abs() < 1e-4);
        // Dead-on hit comes straight back
        let h = wall_reflection(pos, 180.0).expect("should bounce");
        assert!(h.abs() < 1e-4);
    }

    #[test]
    fn test_rail_ignores_departing_ball() {
        let left = Vec2::new(FIELD_LEFT + 5.0, 400.0);
        assert_eq!(wall_reflection(left, 10.0), None);
        let top = Vec2::new(500.0, FIELD_TOP + 5.0);
        assert_eq!(wall_reflection(top, 270.0), None);
        let open = Vec2::new(500.0, 400.0);
        assert_eq!(wall_reflection(open, 45.0), None);
    }

    #[test]
    fn test_top_and_bottom_flip_vertical() {
        let top = Vec2::new(500.0, FIELD_TOP + BALL_RADIUS);
        let h = wall_reflection(top, 60.0).expect("should bounce");
        assert!((h - 300.0).abs() < 1e-4);
        let bottom = Vec2::new(500.0, FIELD_BOTTOM - BALL_RADIUS);
        let h = wall_reflection(bottom, 250.0).expect("should bounce");
        assert!((h - 110.0).abs() < 1e-4);
    }

    #[test]
    fn test_corner_reflects_both_components() {
        let corner = Vec2::new(FIELD_RIGHT - 5.0, FIELD_TOP + 5.0);
        let h = wall_reflection(corner, 45.0).expect("should bounce");
        assert!((h - 225.0).abs() < 1e-3);
    }

    #[test]
    fn test_head_on_contact_transfers_speed() {
        let r = ball_contact(Vec2::new(100.0, 100.0), Vec2::new(120.0, 100.0), 0.0, 10.0);
        assert!(r.struck_heading.abs() < 1e-4);
        assert!((r.struck_speed - 10.0).abs() < 1e-3);
        // Mover's projection is zero and gets floored
        assert_eq!(r.mover_speed, MIN_CONTACT_SPEED);
        assert!(angular_difference(r.mover_heading, 0.0) > 89.9);
    }

    #[test]
    fn test_cut_shot_splits_at_right_angle() {
        // Struck ball sits up and to the right: axis 45 degrees
        let mover = Vec2::new(100.0, 100.0);
        let struck = project(mover, 45.0, 20.0);
        let r = project_contact(mover, struck, 0.0, 10.0);
        assert!((r.struck_heading - 45.0).abs() < 1e-3);
        assert!((r.mover_heading - 315.0).abs() < 1e-3);
        assert!((angular_difference(r.mover_heading, r.struck_heading) - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_projected_speeds_recombine() {
        let mover = Vec2::new(300.0, 300.0);
        for (axis, heading) in [(30.0f32, 0.0f32), (100.0, 80.0), (200.0, 240.0), (350.0, 10.0)] {
            let struck = project(mover, axis, 20.0);
            let speed = 12.0;
            let r = project_contact(mover, struck, heading, speed);
            let d1 = angular_difference(r.mover_heading, heading).to_radians();
            let d2 = angular_difference(r.struck_heading, heading).to_radians();
            let recombined = r.mover_speed * d1.cos() + r.struck_speed * d2.cos();
            assert!((recombined - speed).abs() < 1e-2, "axis {axis} heading {heading}: {recombined}");
        }
    }

    #[test]
    fn test_find_contact_respects_suppression() {
        let mut a = Ball::new(0, BallGroup::Cue, Vec2::new(100.0, 100.0));
        let b = Ball::new(1, BallGroup::Solids, Vec2::new(115.0, 100.0));
        let far = Ball::new(2, BallGroup::Solids, Vec2::new(400.0, 100.0));
        let balls = vec![a.clone(), b.clone(), far];
        assert_eq!(find_ball_contact(&a, &balls), Some(1));

        a.suppressed.insert(1);
        assert_eq!(find_ball_contact(&a, &balls), None);
    }

    #[test]
    fn test_find_contact_skips_same_integer_position() {
        let a = Ball::new(0, BallGroup::Cue, Vec2::new(300.2, 300.4));
        let b = Ball::new(1, BallGroup::Solids, Vec2::new(299.9, 299.7));
        assert_eq!(find_ball_contact(&a, &[a.clone(), b.clone()]), None);

        let c = Ball::new(1, BallGroup::Solids, Vec2::new(301.0, 300.0));
        assert_eq!(find_ball_contact(&a, &[a.clone(), c]), Some(1));
    }

    #[test]
    fn test_find_contact_skips_pocketed() {
        let a = Ball::new(0, BallGroup::Cue, Vec2::new(100.0, 100.0));
        let mut b = Ball::new(1, BallGroup::Solids, Vec2::new(110.0, 100.0));
        b.sink();
        assert_eq!(find_ball_contact(&a, &[a.clone(), b]), None);
    }

    #[test]
    fn test_pocket_capture() {
        assert_eq!(pocket_at(Vec2::new(700.0, 160.0)), Some(1));
        assert_eq!(pocket_at(Vec2::new(700.0, 170.0)), None);
        assert_eq!(pocket_at(Vec2::new(1180.0, 630.0)), Some(5));
    }

    use crate::project;

    proptest! {
        #[test]
        fn prop_double_reflection_restores_heading(h in 0.0f32..360.0) {
            for rail in [Rail::Top, Rail::Bottom, Rail::Left, Rail::Right] {
                let back = reflect_heading(rail, reflect_heading(rail, h));
                prop_assert!(angular_difference(back, h) < 1e-3);
            }
        }

        #[test]
        fn prop_reflection_leaves_rail(h in 0.0f32..360.0) {
            for rail in [Rail::Top, Rail::Bottom, Rail::Left, Rail::Right] {
                if heading_into(rail, h) {
                    prop_assert!(!heading_into(rail, reflect_heading(rail, h)));
                }
            }
        }
    }
}
