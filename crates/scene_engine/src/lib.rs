//! Scene Engine - Mutable scene state and command execution
//!
//! This crate owns the authoritative scene state: every mutation goes
//! through [`SceneStore`] so that history snapshots, selection pruning,
//! and change notification stay consistent. It also hosts the command
//! interpreter and the entry points that resolve live node positions
//! before delegating to the pure algorithms in `geometry`.

mod animation;
mod commands;
mod derived;
mod error;
mod events;
mod history;
mod store;

pub use animation::*;
pub use commands::*;
pub use error::*;
pub use events::*;
pub use history::*;
pub use store::*;
