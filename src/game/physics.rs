//! Motion: the character's jump arc, obstacle scrolling and the speed ramp.
//!
//! Every update scales with `dt` (seconds) so motion is frame-rate independent.

use super::types::*;

/// Accept a jump only while grounded. Returns true if the jump started.
pub fn request_jump(character: &mut Character) -> bool {
    if character.is_grounded() {
        character.phase = MotionPhase::Rising;
        true
    } else {
        false
    }
}

/// Advance the character's vertical phase by `dt` seconds.
///
/// `now_ms` is the session clock, used to release the apex hold.
pub fn advance_character(character: &mut Character, dt: f64, now_ms: f64) {
    if let MotionPhase::Apex { release_at_ms } = character.phase {
        if now_ms >= release_at_ms {
            character.phase = MotionPhase::Falling;
        }
    }

    match character.phase {
        MotionPhase::Grounded => {
            character.y = character.ground_line;
        }
        MotionPhase::Rising => {
            character.y -= JUMP_SPEED * dt;
            if character.y <= character.jump_limit {
                character.y = character.jump_limit;
                character.phase = MotionPhase::Apex {
                    release_at_ms: now_ms + APEX_HOLD_MS,
                };
            }
        }
        MotionPhase::Apex { .. } => {
            character.y = character.jump_limit;
        }
        MotionPhase::Falling => {
            character.y += GRAVITY * dt;
            if character.y >= character.ground_line {
                character.y = character.ground_line;
                character.phase = MotionPhase::Grounded;
            }
        }
    }
}

/// Scroll every obstacle left and drop the ones whose right edge has left
/// the viewport. Returns how many were dropped (each one is a point).
pub fn advance_obstacles(obstacles: &mut Vec<Obstacle>, scroll_speed: f64, dt: f64) -> u32 {
    let before = obstacles.len();
    for obstacle in obstacles.iter_mut() {
        obstacle.x -= scroll_speed * dt;
    }
    obstacles.retain(|o| o.right() >= 0.0);
    (before - obstacles.len()) as u32
}

/// One step of the wall-clock speed ramp, capped at `MAX_SCROLL_SPEED`.
pub fn ramp_scroll_speed(speed: f64) -> f64 {
    if speed < MAX_SCROLL_SPEED {
        (speed + SCROLL_SPEED_STEP).min(MAX_SCROLL_SPEED)
    } else {
        speed
    }
}

/// Advance the background layer offset, wrapped into `(-width, 0]`.
pub fn scroll_backdrop(offset: f64, scroll_speed: f64, dt: f64, width: f64) -> f64 {
    (offset - scroll_speed * dt) % width
}
