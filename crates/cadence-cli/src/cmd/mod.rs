//! Command handlers, one module per subcommand.

pub mod assign;
pub mod calendar;
pub mod complete;
pub mod completions;
pub mod import;
pub mod init;
pub mod list;
pub mod show;
