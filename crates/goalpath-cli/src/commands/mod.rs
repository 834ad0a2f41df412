//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `calc` - Standalone calculators (savings, loan, invest, retire, credit)
//! - `core` - Shared context, plan file loading, catalog and profile commands
//! - `plan` - Plan and milestone commands
//! - `projection` - Project, simulate, scenarios and schedule commands
//! - `serve` - Web server command

pub mod calc;
pub mod core;
pub mod plan;
pub mod projection;
pub mod serve;

// Re-export command functions for main.rs
pub use calc::*;
pub use core::*;
pub use plan::*;
pub use projection::*;
pub use serve::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
