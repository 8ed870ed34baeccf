//! CLI module for alphadesk - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for sweep submission,
//! job watching, curve geometry, and cancellation.

pub mod commands;

pub use commands::Cli;
