//! Game session orchestrator.
//!
//! A `GameSession` owns all per-run state and advances it one animation
//! frame at a time. The shell passes the frame timestamp and the rendering
//! surface to `tick`; background chains (obstacle spawning, the speed ramp)
//! are cancellable tasks polled at the start of each tick, so everything runs
//! on the caller's thread in a fixed order:
//!
//! 1. due timers (speed ramp, spawner)
//! 2. backdrop scroll and character draw
//! 3. obstacle motion and scoring
//! 4. character motion
//! 5. collision
//! 6. score overlay

use super::catalog::{ObstacleCatalog, ObstacleVariant};
use super::types::*;
use super::{collision, physics, spawner};
use crate::error::GameError;
use crate::game::timer::RepeatingTask;
use crate::leaderboard::client::ScoreEvent;
use crate::leaderboard::protocol::{build_submission, plan_submission, SubmissionPlan};
use crate::leaderboard::types::{ScoreState, ScoreSubmission, SubmissionStatus};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Drawing capability handed to the session by its owner.
pub trait RenderSurface {
    fn clear(&mut self);
    /// `offset` is the scrolling layer's position in `(-width, 0]`.
    fn draw_backdrop(&mut self, viewport: &Viewport, offset: f64);
    fn draw_character(&mut self, character: &Character);
    fn draw_obstacle(&mut self, obstacle: &Obstacle, variant: &ObstacleVariant);
    fn draw_score(&mut self, score: u32, best: u32);
}

/// Surface that draws nothing. Used for headless runs.
#[derive(Debug, Default)]
pub struct NullSurface;

impl RenderSurface for NullSurface {
    fn clear(&mut self) {}
    fn draw_backdrop(&mut self, _viewport: &Viewport, _offset: f64) {}
    fn draw_character(&mut self, _character: &Character) {}
    fn draw_obstacle(&mut self, _obstacle: &Obstacle, _variant: &ObstacleVariant) {}
    fn draw_score(&mut self, _score: u32, _best: u32) {}
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Session not running; nothing happened.
    Idle,
    /// Schedule the next frame.
    Continue,
    /// A collision ended the session this tick.
    GameOver { score: u32 },
}

/// What the shell must do once the session is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameOverAction {
    /// Score is below the confirmed best.
    Nothing,
    Send(ScoreSubmission),
    /// New global record: ask for a quote, then call `submit_with_quote`.
    AskForQuote,
}

pub struct GameSession<R: Rng = StdRng> {
    viewport: Viewport,
    catalog: ObstacleCatalog,
    rng: R,
    phase: SessionPhase,
    character: Character,
    obstacles: Vec<Obstacle>,
    difficulty: DifficultyState,
    scores: ScoreState,
    backdrop_offset: f64,
    last_timestamp_ms: f64,
    spawn_task: RepeatingTask,
    ramp_task: RepeatingTask,
    max_frame_dt_ms: Option<f64>,
}

impl GameSession<StdRng> {
    pub fn new(
        viewport: Viewport,
        catalog: ObstacleCatalog,
        scores: ScoreState,
    ) -> Result<Self, GameError> {
        Self::with_rng(viewport, catalog, scores, StdRng::from_entropy())
    }
}

impl<R: Rng> GameSession<R> {
    /// Create a session. Fails if the catalog or viewport cannot support play.
    pub fn with_rng(
        viewport: Viewport,
        catalog: ObstacleCatalog,
        scores: ScoreState,
        rng: R,
    ) -> Result<Self, GameError> {
        if !viewport.is_usable() {
            return Err(GameError::AssetNotReady(format!(
                "viewport {}x{} is not drawable",
                viewport.width, viewport.height
            )));
        }
        catalog.validate()?;

        Ok(Self {
            character: Character::for_viewport(&viewport),
            viewport,
            catalog,
            rng,
            phase: SessionPhase::NotStarted,
            obstacles: Vec::new(),
            difficulty: DifficultyState::default(),
            scores,
            backdrop_offset: 0.0,
            last_timestamp_ms: 0.0,
            spawn_task: RepeatingTask::idle(),
            ramp_task: RepeatingTask::idle(),
            max_frame_dt_ms: None,
        })
    }

    /// Cap the physics step after a long stall. `None` leaves `dt` unclamped.
    pub fn with_max_frame_dt(mut self, max_frame_dt_ms: Option<f64>) -> Self {
        self.max_frame_dt_ms = max_frame_dt_ms;
        self
    }

    /// Begin running at the first frame timestamp. Arms the spawner and the
    /// speed ramp. Has no effect once started.
    pub fn start(&mut self, timestamp_ms: f64) {
        if self.phase != SessionPhase::NotStarted {
            return;
        }
        self.phase = SessionPhase::Running;
        self.last_timestamp_ms = timestamp_ms;
        self.spawn_task = RepeatingTask::after(timestamp_ms, FIRST_SPAWN_DELAY_MS);
        self.ramp_task = RepeatingTask::after(timestamp_ms, SPEED_RAMP_INTERVAL_MS);
        log::info!(
            "session started for '{}' (best {}, leader {})",
            self.scores.player_key,
            self.scores.confirmed_best,
            self.scores.leader_score()
        );
    }

    /// Jump signal from the shell. Accepted only while running and grounded.
    pub fn jump(&mut self) -> bool {
        self.phase == SessionPhase::Running && physics::request_jump(&mut self.character)
    }

    /// Advance one animation frame.
    pub fn tick<S: RenderSurface + ?Sized>(
        &mut self,
        timestamp_ms: f64,
        surface: &mut S,
    ) -> TickOutcome {
        if self.phase != SessionPhase::Running {
            return TickOutcome::Idle;
        }

        let dt = self.frame_dt(timestamp_ms);
        self.run_speed_ramp(timestamp_ms);
        self.run_spawner(timestamp_ms);

        surface.clear();
        self.backdrop_offset = physics::scroll_backdrop(
            self.backdrop_offset,
            self.difficulty.scroll_speed,
            dt,
            self.viewport.width,
        );
        surface.draw_backdrop(&self.viewport, self.backdrop_offset);
        surface.draw_character(&self.character);

        let passed =
            physics::advance_obstacles(&mut self.obstacles, self.difficulty.scroll_speed, dt);
        if passed > 0 {
            self.difficulty.score += passed;
            self.scores.record_score(self.difficulty.score);
        }
        for obstacle in &self.obstacles {
            if let Some(variant) = self.catalog.variant(obstacle.placement, obstacle.variant) {
                surface.draw_obstacle(obstacle, variant);
            }
        }

        physics::advance_character(&mut self.character, dt, timestamp_ms);

        let outcome = match collision::first_hit(&self.character, &self.obstacles) {
            Some(index) => {
                log::info!(
                    "collision with {:?} obstacle at x={:.0}, score {}",
                    self.obstacles[index].placement,
                    self.obstacles[index].x,
                    self.difficulty.score
                );
                self.end();
                TickOutcome::GameOver {
                    score: self.difficulty.score,
                }
            }
            None => TickOutcome::Continue,
        };

        surface.draw_score(self.difficulty.score, self.scores.local_best);
        outcome
    }

    fn frame_dt(&mut self, timestamp_ms: f64) -> f64 {
        let mut dt_ms = (timestamp_ms - self.last_timestamp_ms).max(0.0);
        if let Some(max) = self.max_frame_dt_ms {
            dt_ms = dt_ms.min(max);
        }
        self.last_timestamp_ms = timestamp_ms;
        dt_ms / 1000.0
    }

    fn run_speed_ramp(&mut self, now_ms: f64) {
        let steps = self.ramp_task.fire_every(now_ms, SPEED_RAMP_INTERVAL_MS);
        for _ in 0..steps {
            self.difficulty.scroll_speed = physics::ramp_scroll_speed(self.difficulty.scroll_speed);
        }
    }

    fn run_spawner(&mut self, now_ms: f64) {
        if !self.spawn_task.fire_once(now_ms) {
            return;
        }
        if let Some(obstacle) =
            spawner::create_obstacle(&mut self.rng, &self.viewport, &self.character, &self.catalog)
        {
            self.obstacles.push(obstacle);
        }
        if self.phase == SessionPhase::Running {
            let delay = spawner::next_spawn_delay_ms(
                &mut self.rng,
                self.viewport.width,
                self.difficulty.scroll_speed,
                self.difficulty.score,
            );
            self.spawn_task.schedule_at(now_ms + delay);
        }
    }

    fn end(&mut self) {
        self.phase = SessionPhase::GameOver;
        self.spawn_task.cancel();
        self.ramp_task.cancel();
    }

    /// Tear the session down without a result (player quit mid-run).
    /// No submission follows.
    pub fn teardown(&mut self) {
        if self.phase == SessionPhase::GameOver {
            return;
        }
        self.end();
        self.scores.submission = SubmissionStatus::Skipped;
    }

    /// Decide the fate of the final score. Returns `None` unless the session
    /// is over and no decision has been made yet.
    pub fn finish(&mut self) -> Option<GameOverAction> {
        if self.phase != SessionPhase::GameOver
            || self.scores.submission != SubmissionStatus::NotSubmitted
        {
            return None;
        }

        let score = self.difficulty.score;
        let action = match plan_submission(score, &self.scores) {
            SubmissionPlan::Skip => {
                self.scores.submission = SubmissionStatus::Skipped;
                GameOverAction::Nothing
            }
            SubmissionPlan::Submit => {
                self.scores.submission = SubmissionStatus::Pending;
                GameOverAction::Send(build_submission(&self.scores, score, None))
            }
            SubmissionPlan::CrownAndSubmit => {
                self.scores.submission = SubmissionStatus::AwaitingQuote;
                GameOverAction::AskForQuote
            }
        };
        Some(action)
    }

    /// Complete a crowned submission with the player's quote (may be empty).
    pub fn submit_with_quote(&mut self, quote: &str) -> Option<ScoreSubmission> {
        if self.scores.submission != SubmissionStatus::AwaitingQuote {
            return None;
        }
        self.scores.submission = SubmissionStatus::Pending;
        Some(build_submission(
            &self.scores,
            self.difficulty.score,
            Some(quote),
        ))
    }

    /// Fold a background score-service result into the session.
    pub fn apply_score_event(&mut self, event: ScoreEvent) {
        match event {
            ScoreEvent::ProfileLoaded(profile) => self.scores.apply_profile(profile),
            ScoreEvent::ProfileFailed(_) => {}
            ScoreEvent::Submitted(response) => self.scores.apply_submit_response(response),
            ScoreEvent::SubmitFailed(_) => self.scores.mark_submit_failed(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn catalog(&self) -> &ObstacleCatalog {
        &self.catalog
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn difficulty(&self) -> &DifficultyState {
        &self.difficulty
    }

    pub fn scores(&self) -> &ScoreState {
        &self.scores
    }

    pub fn backdrop_offset(&self) -> f64 {
        self.backdrop_offset
    }

    pub fn spawn_task(&self) -> &RepeatingTask {
        &self.spawn_task
    }

    pub fn ramp_task(&self) -> &RepeatingTask {
        &self.ramp_task
    }
}
