//! Dino Run data structures.
//!
//! All world coordinates are logical pixels measured from the top-left corner
//! of the viewport: lower `y` values are higher on screen. Sizes are fixed
//! fractions of the viewport so the same session plays identically at any
//! resolution.

/// Default logical viewport used by the terminal client.
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 720.0;

/// Ground line as a fraction of viewport height (character's top edge when standing).
pub const GROUND_LINE_RATIO: f64 = 0.7;
/// Topmost altitude of a jump as a fraction of viewport height.
pub const JUMP_LIMIT_RATIO: f64 = 0.25;

/// Character placement and size.
pub const CHARACTER_X_RATIO: f64 = 0.05;
pub const CHARACTER_WIDTH_RATIO: f64 = 0.08;
pub const CHARACTER_HEIGHT_RATIO: f64 = 0.1;

/// Obstacle size.
pub const OBSTACLE_WIDTH_RATIO: f64 = 0.05;
pub const OBSTACLE_HEIGHT_RATIO: f64 = 0.1;

/// Elevated obstacles hang this many character heights above the ground line.
pub const ELEVATED_LIFT: f64 = 1.5;

/// Upward speed while rising (px/s).
pub const JUMP_SPEED: f64 = 850.0;
/// Downward speed while falling (px/s).
pub const GRAVITY: f64 = 650.0;
/// How long the character hangs at the jump limit before falling.
pub const APEX_HOLD_MS: f64 = 120.0;

/// Scroll speed ramp (px/s).
pub const INITIAL_SCROLL_SPEED: f64 = 300.0;
pub const SCROLL_SPEED_STEP: f64 = 25.0;
pub const MAX_SCROLL_SPEED: f64 = 10_000.0;
pub const SPEED_RAMP_INTERVAL_MS: f64 = 2000.0;

/// Delay between session start and the first obstacle.
pub const FIRST_SPAWN_DELAY_MS: f64 = 1500.0;

/// Logical drawing area. Everything else is derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// False for zero, negative or non-finite dimensions.
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn ground_line(&self) -> f64 {
        self.height * GROUND_LINE_RATIO
    }

    pub fn jump_limit(&self) -> f64 {
        self.height * JUMP_LIMIT_RATIO
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT)
    }
}

/// Vertical motion phase of the character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionPhase {
    Grounded,
    Rising,
    /// Hanging at the jump limit until the session clock reaches `release_at_ms`.
    Apex { release_at_ms: f64 },
    Falling,
}

/// The player-controlled runner. Only `y` and `phase` change during a session.
#[derive(Debug, Clone)]
pub struct Character {
    pub x: f64,
    /// Top edge of the character.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub ground_line: f64,
    pub jump_limit: f64,
    pub phase: MotionPhase,
}

impl Character {
    /// Create a grounded character sized for the viewport.
    pub fn for_viewport(viewport: &Viewport) -> Self {
        Self {
            x: viewport.width * CHARACTER_X_RATIO,
            y: viewport.ground_line(),
            width: viewport.width * CHARACTER_WIDTH_RATIO,
            height: viewport.height * CHARACTER_HEIGHT_RATIO,
            ground_line: viewport.ground_line(),
            jump_limit: viewport.jump_limit(),
            phase: MotionPhase::Grounded,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_grounded(&self) -> bool {
        self.phase == MotionPhase::Grounded
    }
}

/// Vertical placement class of an obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Sits on the ground line. Jump over it.
    Ground,
    /// Hangs above the ground line. Stay low while it passes.
    Elevated,
}

/// A single obstacle scrolling toward the character.
#[derive(Debug, Clone)]
pub struct Obstacle {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub placement: Placement,
    /// Index of the visual variant within the catalog category for `placement`.
    pub variant: usize,
}

impl Obstacle {
    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Created but no frame timestamp seen yet.
    NotStarted,
    Running,
    /// Terminal. Only score submission may still happen.
    GameOver,
}

/// Score and scroll speed for the running session.
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyState {
    /// Obstacles passed this session.
    pub score: u32,
    /// Horizontal scroll speed in px/s.
    pub scroll_speed: f64,
}

impl Default for DifficultyState {
    fn default() -> Self {
        Self {
            score: 0,
            scroll_speed: INITIAL_SCROLL_SPEED,
        }
    }
}
