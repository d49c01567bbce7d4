//! Terminal user interface.

pub mod canvas;
pub mod game_common;
pub mod prompt_screen;
pub mod run_scene;
