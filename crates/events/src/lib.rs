//! Domain events and the in-process bus that distributes them.
//!
//! Inventory mutations emit events; the presentation layer subscribes so it can
//! re-render derived views after every change.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
