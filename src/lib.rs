//! fitfocus - Workout session planner and focus-mode trainer
//!
//! Pick body parts and a duration, get a warmup / main / cooldown plan,
//! step through it with timers, and keep a local history.

pub mod db;
pub mod exercises;
pub mod metronome;
pub mod planner;
pub mod session;
pub mod tui;

pub use db::Database;
pub use planner::{WorkoutPlan, generate_workout};
pub use session::SessionController;
