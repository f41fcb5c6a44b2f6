//! Per-subsystem time gating, event queues and the notification bus

pub mod bus;
pub mod queue;
pub mod timer;

pub use bus::{ListenerError, ListenerId, NotificationBus};
pub use queue::{Batch, Scheduled};
pub use timer::UpdateTimer;
