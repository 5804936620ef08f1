pub mod event_bus;
pub mod ready;

pub use event_bus::*;
pub use ready::*;
