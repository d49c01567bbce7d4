//! Dino Run - terminal endless runner with a shared online leaderboard.
//!
//! The game core (`game`) is pure and clock-driven so it can be tested
//! headless; `leaderboard` holds the score protocol, its HTTP client and the
//! score service; `ui` renders a session into a ratatui frame.

pub mod build_info;
pub mod config;
pub mod error;
pub mod game;
pub mod leaderboard;
pub mod logging;
pub mod ui;
pub mod utils;
