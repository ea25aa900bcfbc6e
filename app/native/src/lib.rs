//! Pasta Sink - tray placement and cook timers for an eight-cell pasta sink.
//!
//! The sink is a fixed grid of eight cells shown as four columns by two rows
//! (wide) or two columns by four rows (narrow). Trays come in three sizes: two
//! single-cell sizes and an extra-large tray that covers a 2x2 block. Each
//! tray holds a bounded number of timed cooking items.
//!
//! - [`sink`] holds the geometry, placement rules, the swap resolver and the
//!   observable sink state.
//! - [`presets`] lists named pasta types with default cook times.
//! - [`config`] loads the JSONC configuration file.
//! - [`cli`] replays session scripts and manages the configuration.

pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod presets;
pub mod schema;
pub mod sink;
