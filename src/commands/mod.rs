//! CLI subcommands

pub mod check;
pub mod clean;
pub mod consent;
pub mod generate;
pub mod init;
pub mod list;
pub mod new;
pub mod related;
pub mod search;
