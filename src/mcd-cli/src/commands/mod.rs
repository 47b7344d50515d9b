//! Command handlers for mcd CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod configure;
pub mod items;
pub mod save;
