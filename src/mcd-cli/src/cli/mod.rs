//! CLI argument definitions

mod core;
mod save;

pub use self::core::*;
pub use save::*;
