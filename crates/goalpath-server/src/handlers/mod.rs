//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod calculators;
pub mod catalog;
pub mod milestones;
pub mod plans;
pub mod profiles;
pub mod projections;

// Re-export all handlers for use in router
pub use calculators::*;
pub use catalog::*;
pub use milestones::*;
pub use plans::*;
pub use profiles::*;
pub use projections::*;
