//! Core data models for the filter reconciler.

mod common;
mod filters;
mod presets;
mod requests;
mod scope;
mod slots;
mod stats;

pub use common::*;
pub use filters::*;
pub use presets::*;
pub use requests::*;
pub use scope::*;
pub use slots::*;
pub use stats::*;
