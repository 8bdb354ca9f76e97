//! Repository modules implementing operations for all Studyhall entities.
//!
//! Each module adds methods to `HallService` via `impl HallService` blocks.

pub mod achievement;
pub mod activity;
pub mod file;
pub mod goal;
pub mod group;
pub mod invitation;
pub mod leaderboard;
pub mod member;
pub mod message;
pub mod notification;
pub mod points;
pub mod profile;
pub mod study_session;
pub mod subject;
pub mod water;
