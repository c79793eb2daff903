//! Line Follower Navigation
//!
//! Turns zone states, the obstacle distance and the line offset into one
//! named action per cycle:
//! - Closed set of driving actions with operator-facing labels
//! - Priority-ordered decision engine
//! - Committed multi-phase obstacle avoidance sequence

pub mod action;
pub mod avoidance;
pub mod config;
pub mod engine;

pub use action::{ActionKind, Area, AvoidancePhase, DecisionOutput, TurnDirection};
pub use avoidance::{AvoidanceState, ObstacleAvoidance};
pub use config::NavigationConfig;
pub use engine::DecisionEngine;
