//! ChangeSource adapters

mod manual;
mod native;
mod routes;

pub use manual::ManualChangeSource;
pub use native::NotifyChangeSource;
