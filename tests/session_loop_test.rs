//! Integration test: session loop
//!
//! Runs whole sessions frame by frame with seeded randomness and checks the
//! world invariants after every tick, then hands the final score to the
//! submission rules.

use dino_run::game::{
    GameOverAction, GameSession, MotionPhase, ObstacleCatalog, Placement, RenderSurface,
    SessionPhase, TickOutcome, Viewport, FIRST_SPAWN_DELAY_MS,
};
use dino_run::game::{Character, Obstacle, ObstacleVariant};
use dino_run::leaderboard::{ScoreState, SubmissionStatus};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const FRAME_MS: f64 = 16.0;
/// Upper bound on simulated time before a session must have ended.
const MAX_SESSION_MS: f64 = 600_000.0;

fn new_session(seed: u64) -> GameSession<ChaCha8Rng> {
    GameSession::with_rng(
        Viewport::default(),
        ObstacleCatalog::builtin().unwrap(),
        ScoreState::new("tester", "Tester"),
        ChaCha8Rng::seed_from_u64(seed),
    )
    .unwrap()
}

/// Counts draw calls per frame.
#[derive(Default)]
struct CountingSurface {
    clears: u32,
    obstacles_drawn: u32,
    last_score: Option<(u32, u32)>,
}

impl RenderSurface for CountingSurface {
    fn clear(&mut self) {
        self.clears += 1;
    }
    fn draw_backdrop(&mut self, _viewport: &Viewport, offset: f64) {
        assert!(offset <= 0.0 && offset > -Viewport::default().width);
    }
    fn draw_character(&mut self, _character: &Character) {}
    fn draw_obstacle(&mut self, _obstacle: &Obstacle, _variant: &ObstacleVariant) {
        self.obstacles_drawn += 1;
    }
    fn draw_score(&mut self, score: u32, best: u32) {
        self.last_score = Some((score, best));
    }
}

/// Run until game over, checking invariants each frame. Returns the final score.
fn run_to_end(session: &mut GameSession<ChaCha8Rng>, jump_every_ms: Option<f64>) -> u32 {
    let mut surface = CountingSurface::default();
    let mut now = 0.0;
    let mut last_score = 0;
    let mut last_jump = 0.0;
    session.start(now);

    while now < MAX_SESSION_MS {
        now += FRAME_MS;
        if let Some(period) = jump_every_ms {
            if now - last_jump >= period {
                session.jump();
                last_jump = now;
            }
        }

        let outcome = session.tick(now, &mut surface);

        let character = session.character();
        assert!(character.y >= character.jump_limit - 1e-9);
        assert!(character.y <= character.ground_line + 1e-9);
        let score = session.difficulty().score;
        assert!(score >= last_score && score - last_score <= 1);
        last_score = score;
        for obstacle in session.obstacles() {
            assert!(obstacle.right() >= 0.0);
        }
        assert!(session.scores().local_best >= score);

        if let TickOutcome::GameOver { score } = outcome {
            assert_eq!(session.phase(), SessionPhase::GameOver);
            assert!(!session.spawn_task().is_active());
            assert!(!session.ramp_task().is_active());
            assert!(surface.clears > 0);
            return score;
        }
    }
    panic!("session did not end within {} ms", MAX_SESSION_MS);
}

#[test]
fn test_idle_runner_eventually_crashes() {
    for seed in 0..8 {
        let mut session = new_session(seed);
        run_to_end(&mut session, None);
        assert_eq!(session.character().phase, MotionPhase::Grounded);
    }
}

#[test]
fn test_no_obstacle_before_first_spawn_delay() {
    let mut session = new_session(3);
    let mut surface = CountingSurface::default();
    session.start(0.0);
    let mut now = 0.0;
    while now + FRAME_MS < FIRST_SPAWN_DELAY_MS {
        now += FRAME_MS;
        session.tick(now, &mut surface);
        assert!(session.obstacles().is_empty());
    }
    assert_eq!(surface.obstacles_drawn, 0);
}

#[test]
fn test_ticks_after_game_over_are_idle() {
    let mut session = new_session(11);
    let score = run_to_end(&mut session, None);
    let obstacles_before = session.obstacles().len();

    let mut surface = CountingSurface::default();
    assert_eq!(session.tick(MAX_SESSION_MS, &mut surface), TickOutcome::Idle);
    assert_eq!(surface.clears, 0);
    assert_eq!(session.obstacles().len(), obstacles_before);
    assert_eq!(session.difficulty().score, score);
    assert!(!session.jump());
}

#[test]
fn test_speed_ramps_during_play() {
    let mut session = new_session(5);
    run_to_end(&mut session, None);
    // The first obstacle reaches the runner several seconds in, past the first ramp step
    assert!(session.difficulty().scroll_speed > 300.0);
}

#[test]
fn test_jumping_runner_still_ends_and_submits() {
    let mut session = new_session(21);
    let score = run_to_end(&mut session, Some(700.0));

    let action = session.finish().expect("first decision");
    match action {
        // No leader known, so any positive score is a new record
        GameOverAction::AskForQuote => {
            assert!(score > 0);
            let submission = session.submit_with_quote("see you").unwrap();
            assert_eq!(submission.score, score);
            assert_eq!(submission.quote, "see you");
        }
        GameOverAction::Send(submission) => {
            assert_eq!(score, 0);
            assert_eq!(submission.score, 0);
            assert!(submission.quote.is_empty());
        }
        GameOverAction::Nothing => panic!("best is 0, nothing to skip"),
    }
    assert_eq!(session.scores().submission, SubmissionStatus::Pending);
    assert!(session.finish().is_none());
}

#[test]
fn test_elevated_obstacles_pass_a_grounded_runner() {
    // Whatever ended the run, it was a ground obstacle: elevated ones never hit
    // a runner that stays on the ground.
    for seed in 0..8 {
        let mut session = new_session(seed);
        run_to_end(&mut session, None);
        let character = session.character().clone();
        let hit = session
            .obstacles()
            .iter()
            .find(|o| character.right() > o.left() && character.left() < o.right())
            .expect("an overlapping obstacle ended the run");
        assert_eq!(hit.placement, Placement::Ground);
    }
}

#[test]
fn test_same_seed_same_run() {
    let mut a = new_session(99);
    let mut b = new_session(99);
    assert_eq!(run_to_end(&mut a, Some(900.0)), run_to_end(&mut b, Some(900.0)));
    assert_eq!(a.obstacles().len(), b.obstacles().len());
}
