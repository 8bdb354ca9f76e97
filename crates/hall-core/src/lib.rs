//! # hall-core
//!
//! Core types and study-group rules for Studyhall.
//!
//! This crate provides the foundational types shared across all Studyhall crates:
//! - Entity structs for all domain objects (groups, goals, sessions, points, etc.)
//! - Status enums with state machine transitions
//! - ID prefix constants
//! - Cross-cutting error types
//! - Pure business rules: goal progress and points, leaderboard ranking,
//!   study streaks, achievements, water progress
//! - Composite response types

pub mod achievements;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod leaderboard;
pub mod responses;
pub mod scoring;
pub mod streak;
pub mod water;
