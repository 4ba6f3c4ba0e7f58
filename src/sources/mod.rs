//! Generation sources, storage and synthetic input profiles.

/// Battery storage model.
pub mod battery;
/// Synthetic load and PV profiles.
pub mod profiles;
pub mod types;

pub use battery::Battery;
pub use types::{Source, SourceKind, StorageParams};
