use glam::Vec2;

/// One movement step along a waypoint sequence.
///
/// The heading is recomputed toward the current waypoint every step. A
/// waypoint counts as reached once it is within one step of the position; the
/// position snaps onto it and the index advances. Past the last waypoint the
/// mover keeps its final heading.
pub fn advance(
    pos: &mut Vec2,
    heading: &mut Vec2,
    waypoint: &mut usize,
    waypoints: &[Vec2],
    step: f32,
) {
    match waypoints.get(*waypoint) {
        Some(&target) => {
            let to_target = target - *pos;
            let distance = to_target.length();
            if distance > f32::EPSILON {
                *heading = to_target / distance;
            }
            if distance <= step {
                *pos = target;
                *waypoint += 1;
            } else {
                *pos += *heading * step;
            }
        }
        None => *pos += *heading * step,
    }
}
