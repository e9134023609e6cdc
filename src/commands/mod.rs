//! CLI subcommands

pub mod import;
pub mod init;
pub mod list;
pub mod new;
pub mod search;
