//! # CLI Layer
//!
//! One possible UI client for draftpad. This is the only place that knows
//! about the terminal: it parses arguments, prints results, reads stdin in
//! `edit`, installs the log subscriber and maps errors to exit codes.
//!
//! - `setup`: clap definitions
//! - `commands`: context setup and per-command handlers
//! - `edit`: the line-based editing session
//! - `print`: output formatting

mod commands;
mod edit;
mod print;
mod setup;

pub use commands::run;
