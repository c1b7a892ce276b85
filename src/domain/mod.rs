//! Domain Layer
//!
//! The vocabulary of watchrun, free of threads and I/O.
//!
//! ## Structure
//!
//! - `value_objects/` - Immutable value types (ChangeEvent, RunId, RunStatus)
//! - `ports/` - Interface definitions for infrastructure (ChangeSource, Display)

pub mod ports;
pub mod value_objects;
