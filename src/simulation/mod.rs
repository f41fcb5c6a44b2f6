pub mod creature;
pub mod events;
pub mod world;

pub use creature::Creature;
pub use events::{BodyDamaged, CapacityChanged, EventBuses, PartHpChanged};
pub use world::{CapacityCommand, HealthCommand, TickReport, World};
