//! Physics helpers for demonstration content
//!
//! Deliberately simple: per-frame explicit updates, no integrators or solvers.

pub mod collision;
pub mod vector;

pub use collision::{Body, Circle, check_circle_collision, resolve_elastic_collision};
pub use vector::Vector2;
