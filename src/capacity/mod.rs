//! Derived capacities: movement, cognition, pain and friends

pub mod info;
pub mod model;
pub mod modifier;

pub use info::CapacityInfo;
pub use model::{CapacityModel, SeverityTable};
pub use modifier::CapacityModifier;
