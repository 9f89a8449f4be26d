pub mod event_bus;
pub mod frame;
pub mod metrics;
pub mod stats;

pub use event_bus::*;
pub use frame::*;
pub use stats::*;
