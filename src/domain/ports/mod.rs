//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod change_source;
pub mod display;

pub use change_source::{ChangeSource, Subscription, SubscriptionId};
pub use display::Display;
