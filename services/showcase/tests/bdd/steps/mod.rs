//! BDD step definitions for the showcase service

pub mod activity_steps;
pub mod reachability_steps;
