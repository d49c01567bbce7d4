//! Obstacle spawning and the score-driven spawn interval.
//!
//! After each spawn the next delay is
//! `max(min, max * exp(-score / 50)) * jitter`, where the window scales with
//! viewport width and scroll speed and the jitter breaks up any rhythm.

use super::catalog::ObstacleCatalog;
use super::types::*;
use rand::Rng;

/// Probability that a spawned obstacle is elevated.
pub const ELEVATED_CHANCE: f64 = 0.2;
/// Score at which the difficulty factor has fallen to 1/e.
pub const DIFFICULTY_SCALE: f64 = 50.0;
/// Jitter band applied to every spawn delay.
pub const JITTER_MIN: f64 = 0.6;
pub const JITTER_MAX: f64 = 1.5;

/// Bounds of the spawn interval before the difficulty factor and jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnWindow {
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Multiplier in (0, 1] that shrinks the interval as score grows.
pub fn difficulty_factor(score: u32) -> f64 {
    (-(score as f64) / DIFFICULTY_SCALE).exp()
}

pub fn spawn_window(viewport_width: f64, scroll_speed: f64) -> SpawnWindow {
    let speed_factor = scroll_speed.max(1.0);
    SpawnWindow {
        min_ms: viewport_width * 0.9 + speed_factor * 0.25,
        max_ms: viewport_width * 1.1 + speed_factor * 0.25,
    }
}

/// Interval before jitter. Never below the window minimum.
pub fn base_interval_ms(viewport_width: f64, scroll_speed: f64, score: u32) -> f64 {
    let window = spawn_window(viewport_width, scroll_speed);
    window.min_ms.max(window.max_ms * difficulty_factor(score))
}

/// Delay until the next spawn, jitter included.
pub fn next_spawn_delay_ms<R: Rng>(
    rng: &mut R,
    viewport_width: f64,
    scroll_speed: f64,
    score: u32,
) -> f64 {
    base_interval_ms(viewport_width, scroll_speed, score) * rng.gen_range(JITTER_MIN..JITTER_MAX)
}

/// Build a new obstacle at the right edge of the viewport.
///
/// Returns `None` only if the chosen catalog category is empty, which a
/// validated catalog rules out.
pub fn create_obstacle<R: Rng>(
    rng: &mut R,
    viewport: &Viewport,
    character: &Character,
    catalog: &ObstacleCatalog,
) -> Option<Obstacle> {
    let placement = if rng.gen::<f64>() < ELEVATED_CHANCE {
        Placement::Elevated
    } else {
        Placement::Ground
    };

    let count = catalog.variants(placement).len();
    if count == 0 {
        return None;
    }
    let variant = rng.gen_range(0..count);

    let y = match placement {
        Placement::Ground => viewport.ground_line(),
        Placement::Elevated => viewport.ground_line() - character.height * ELEVATED_LIFT,
    };

    Some(Obstacle {
        x: viewport.width,
        y,
        width: viewport.width * OBSTACLE_WIDTH_RATIO,
        height: viewport.height * OBSTACLE_HEIGHT_RATIO,
        placement,
        variant,
    })
}
