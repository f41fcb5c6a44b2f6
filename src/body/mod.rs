//! Body system module
//!
//! Provides the arena part tree, body instances, damage propagation and the
//! template registry that builds bodies from definitions.

pub mod instance;
pub mod part;
pub mod propagation;
pub mod template;
pub mod tree;

// Re-export commonly used types
pub use instance::{Body, BodyDamageEvent, HealingProfile, HealthChange};
pub use part::BodyPart;
pub use propagation::{sample_dispersion, PartDamageEvent};
pub use template::{BodyDefinitions, BodyTemplate, PartTemplate, TemplateRegistry};
pub use tree::{BodyNode, BodyTree, NodeId, MAX_CHILDREN, MAX_PARTS};
