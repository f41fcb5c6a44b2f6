//! Arc Anatomy - body-part damage, health and capacity simulation

pub mod body;
pub mod capacity;
pub mod core;
pub mod health;
pub mod scheduler;
pub mod simulation;
