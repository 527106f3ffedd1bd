//! `reportkit` command-line support: JSON input loading, commands and logging.

pub mod commands;
pub mod logging;
pub mod source;
