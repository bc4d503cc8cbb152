//! karaoke-sync command-line editor.
//!
//! Wires the HTTP alignment store adapter into the editor session and exposes
//! it as a set of subcommands.

pub mod bootstrap;
pub mod cli;
pub mod events;
